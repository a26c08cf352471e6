use crate::chart::ChartScale;
use crate::config::StatsConfig;
use crate::error::ProviderError;
use crate::providers::{CollectionHistoryProvider, SalesDataProvider};
use crate::report::{build_report, ReportView};
use crate::schema::{MonthBucket, RawRecord, Report, Totals};
use futures::future::{BoxFuture, FutureExt};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Identifies one `select` call. Tokens only ever increase, so a fetch
/// outcome can be matched against the selection that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionToken(u64);

impl SelectionToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket {
    pub report: Report,
    pub token: SelectionToken,
}

/// Result of a fetch, tagged with the selection it was issued for.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub ticket: SelectionTicket,
    pub result: Result<Vec<RawRecord>, ProviderError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed {
        /// Fixed per-report message shown to users.
        message: String,
        /// Underlying provider error, for the status footer.
        diagnostic: String,
    },
}

impl LoadState {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Status footer text for states that have no report view.
    pub fn status_line(&self) -> &str {
        match self {
            LoadState::Idle => "Initializing...",
            LoadState::Loading => "Loading...",
            LoadState::Ready => "Ready.",
            LoadState::Failed { diagnostic, .. } => diagnostic,
        }
    }
}

#[derive(Debug)]
struct ActiveSelection {
    ticket: SelectionTicket,
    state: LoadState,
    view: Option<ReportView>,
}

/// Drives report selection, fetching and aggregation.
///
/// Only the most recent selection owns derived state. A selection clears the
/// previous series and totals before its fetch starts, and [`apply`] ignores
/// outcomes whose token no longer matches, so a slow earlier fetch can never
/// overwrite a newer one.
///
/// [`apply`]: StatsOrchestrator::apply
pub struct StatsOrchestrator {
    collection: Arc<dyn CollectionHistoryProvider>,
    sales: Arc<dyn SalesDataProvider>,
    config: StatsConfig,
    last_token: u64,
    active: Option<ActiveSelection>,
}

impl StatsOrchestrator {
    pub fn new(
        collection: Arc<dyn CollectionHistoryProvider>,
        sales: Arc<dyn SalesDataProvider>,
        config: StatsConfig,
    ) -> Self {
        Self {
            collection,
            sales,
            config,
            last_token: 0,
            active: None,
        }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Currently selected report, if any.
    pub fn current_report(&self) -> Option<Report> {
        self.active.as_ref().map(|a| a.ticket.report)
    }

    /// Makes `report` the active selection and moves it to `Loading`,
    /// discarding everything derived for the previous selection.
    pub fn select(&mut self, report: Report) -> SelectionTicket {
        self.last_token += 1;
        let ticket = SelectionTicket {
            report,
            token: SelectionToken(self.last_token),
        };

        info!(
            "Selected {} report (selection {})",
            report.key(),
            ticket.token.value()
        );

        self.active = Some(ActiveSelection {
            ticket,
            state: LoadState::Loading,
            view: None,
        });

        ticket
    }

    /// Fetch future for `ticket`. It owns its providers, so it may be held
    /// or awaited while further selections are made.
    pub fn fetch(&self, ticket: SelectionTicket) -> BoxFuture<'static, FetchOutcome> {
        let collection = Arc::clone(&self.collection);
        let sales = Arc::clone(&self.sales);

        async move {
            let result = match ticket.report {
                Report::Collection => collection.fetch_all().await,
                Report::Sales => sales.fetch_all().await,
            };
            FetchOutcome { ticket, result }
        }
        .boxed()
    }

    /// Commits a fetch outcome if it belongs to the current selection.
    /// Returns `false` when the outcome was stale and discarded.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let config = &self.config;
        let active = match self.active.as_mut() {
            Some(active) if active.ticket == outcome.ticket => active,
            _ => {
                debug!(
                    "Discarding stale {} result from selection {}",
                    outcome.ticket.report.key(),
                    outcome.ticket.token.value()
                );
                return false;
            }
        };

        let report = outcome.ticket.report;
        match outcome.result {
            Ok(records) => {
                let view = build_report(report, &records, config);
                info!("{} report ready: {}", report.key(), view.status);
                active.state = LoadState::Ready;
                active.view = Some(view);
            }
            Err(err) => {
                warn!("Failed to load {} data: {}", report.key(), err);
                active.state = LoadState::Failed {
                    message: report.failure_message(),
                    diagnostic: format!("Error: {}", err),
                };
                active.view = None;
            }
        }

        true
    }

    /// Selects `report`, fetches it and applies the result.
    pub async fn load(&mut self, report: Report) -> LoadState {
        let ticket = self.select(report);
        let outcome = self.fetch(ticket).await;
        self.apply(outcome);
        self.state(report)
    }

    pub fn state(&self, report: Report) -> LoadState {
        match &self.active {
            Some(active) if active.ticket.report == report => active.state.clone(),
            _ => LoadState::Idle,
        }
    }

    pub fn view(&self, report: Report) -> Option<&ReportView> {
        self.active
            .as_ref()
            .filter(|active| active.ticket.report == report)
            .and_then(|active| active.view.as_ref())
    }

    /// Series for `report`; empty unless it is the selected, ready report.
    pub fn time_series(&self, report: Report) -> &[MonthBucket] {
        self.view(report)
            .map(|view| view.series.as_slice())
            .unwrap_or_default()
    }

    pub fn totals(&self, report: Report) -> Totals {
        self.view(report).map(|view| view.totals).unwrap_or_default()
    }

    pub fn chart(&self, report: Report) -> Option<&ChartScale> {
        self.view(report).map(|view| &view.chart)
    }

    /// Footer text: the report's status once loaded, otherwise the state's.
    pub fn status_line(&self, report: Report) -> String {
        match self.view(report) {
            Some(view) => view.status.clone(),
            None => self.state(report).status_line().to_string(),
        }
    }
}
