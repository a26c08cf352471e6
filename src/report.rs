use crate::chart::ChartScale;
use crate::config::StatsConfig;
use crate::eligibility::SalesEligibilityFilter;
use crate::engine::aggregate_monthly;
use crate::ingestion::{normalize_records, CollectionAdapter, SalesAdapter};
use crate::schema::{RawRecord, RawSalesRecord, Report, TimeSeries, Totals};
use log::debug;
use serde::{Deserialize, Serialize};

/// Everything the presentation layer needs to draw one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportView {
    pub report: Report,
    pub series: TimeSeries,
    pub totals: Totals,
    pub chart: ChartScale,
    /// Records received from the provider.
    pub raw_count: usize,
    /// Records that passed filtering (equal to `raw_count` for collections).
    pub eligible_count: usize,
    /// Human-readable status line.
    pub status: String,
}

impl ReportView {
    /// True when no record made it into the series. Rendered as "no matching
    /// data", distinct from a failed load.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

pub fn build_collection_view(records: &[RawRecord], config: &StatsConfig) -> ReportView {
    let adapter = CollectionAdapter::new(&config.regions);
    let events = normalize_records(&adapter, records);
    let series = aggregate_monthly(&events);

    finish_view(
        Report::Collection,
        series,
        records.len(),
        records.len(),
        format!("Loaded {} collection records.", records.len()),
        config,
    )
}

pub fn build_sales_view(records: &[RawSalesRecord], config: &StatsConfig) -> ReportView {
    let filter = SalesEligibilityFilter::new(&config.eligibility);
    let (eligible, rejected) = filter.screen(records);
    if rejected.total() > 0 {
        debug!(
            "Rejected {} sales records: {} wrong partner, {} wrong MRR, {} outside {}",
            rejected.total(),
            rejected.partner,
            rejected.mrr,
            rejected.year,
            config.eligibility.year_marker
        );
    }

    let adapter = SalesAdapter::new(&config.regions);
    let events = normalize_records(&adapter, eligible.iter().copied());
    let series = aggregate_monthly(&events);

    let rules = &config.eligibility;
    let status = format!(
        "Loaded {} raw, filtered to {} ({}, Partner {}, MRR {}).",
        records.len(),
        eligible.len(),
        rules.year_marker,
        rules.partner_id,
        rules.mrr_target
    );

    finish_view(
        Report::Sales,
        series,
        records.len(),
        eligible.len(),
        status,
        config,
    )
}

/// Runs the full pipeline for `report` over already-fetched records.
pub fn build_report(report: Report, records: &[RawRecord], config: &StatsConfig) -> ReportView {
    match report {
        Report::Collection => build_collection_view(records, config),
        Report::Sales => build_sales_view(records, config),
    }
}

fn finish_view(
    report: Report,
    series: TimeSeries,
    raw_count: usize,
    eligible_count: usize,
    status: String,
    config: &StatsConfig,
) -> ReportView {
    let totals = Totals::from_series(&series);
    let chart = ChartScale::compute(&series, &config.chart);

    debug!(
        "Built {} report: {} months, {} counted records, axis max {}",
        report.key(),
        series.len(),
        totals.all,
        chart.chart_max
    );

    ReportView {
        report,
        series,
        totals,
        chart,
        raw_count,
        eligible_count,
        status,
    }
}
