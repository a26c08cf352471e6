//! # Dashboard Stats
//!
//! Time-series aggregation behind the operations dashboard's statistics page.
//! Loosely-typed records from two sources are classified into regions, bucketed
//! by calendar month and turned into chart-ready series with totals and scaling.
//!
//! ## Core Concepts
//!
//! - **Report**: one of the two views, device collections or sales growth, each
//!   with its own provider and pipeline
//! - **Adapter**: a typed reader per source that pulls a date and a region out of a
//!   raw record, dropping records it cannot date
//! - **Eligibility filter**: partner / MRR / year rules applied to sales records only
//! - **Bucket**: one calendar month's Gauteng / Limpopo / Other counts
//! - **Selection token**: tags each fetch so only the latest selection's result is applied
//!
//! ## Example
//!
//! ```rust,ignore
//! use dashboard_stats::*;
//! use std::sync::Arc;
//!
//! let collections = Arc::new(StaticProvider::from_json_str(
//!     r#"[{"Date": "2025-03-01", "Province": "Gauteng"}]"#,
//! )?);
//! let sales = Arc::new(StaticProvider::default());
//!
//! let mut stats = StatsOrchestrator::new(collections, sales, StatsConfig::default());
//! stats.load(Report::Collection).await;
//!
//! for bucket in stats.time_series(Report::Collection) {
//!     println!("{}: {}", bucket.label, bucket.total());
//! }
//! ```

pub mod chart;
pub mod classifier;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod ingestion;
pub mod orchestrator;
pub mod providers;
pub mod report;
pub mod schema;
pub mod utils;

pub use chart::{AxisTick, BarLayout, ChartScale, Segment};
pub use classifier::RegionClassifier;
pub use config::{ChartSettings, EligibilityRules, RegionRules, StatsConfig};
pub use eligibility::{Ineligibility, RejectionCounts, SalesEligibilityFilter};
pub use engine::{aggregate_monthly, MonthlyAggregator};
pub use error::{ProviderError, Result, StatsError};
pub use ingestion::{normalize_records, CollectionAdapter, SalesAdapter, SourceAdapter};
pub use orchestrator::{
    FetchOutcome, LoadState, SelectionTicket, SelectionToken, StatsOrchestrator,
};
pub use providers::{CollectionHistoryProvider, SalesDataProvider, StaticProvider};
pub use report::{build_collection_view, build_report, build_sales_view, ReportView};
pub use schema::*;
