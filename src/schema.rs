use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EligibilityRules;

/// A record from the collection history source. No schema is enforced upstream,
/// so any subset of keys may be missing and values may be strings or numbers.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// A customer record from the sales source (`partner_id`, `mrr_total`,
/// `date_add`, `location_id`), as loosely typed as [`RawRecord`].
pub type RawSalesRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Gauteng,
    Limpopo,
    Other,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Gauteng, Region::Limpopo, Region::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Gauteng => "Gauteng",
            Region::Limpopo => "Limpopo",
            Region::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Report {
    Collection,
    Sales,
}

impl Report {
    pub fn key(&self) -> &'static str {
        match self {
            Report::Collection => "collection",
            Report::Sales => "sales",
        }
    }

    pub fn tab_label(&self, rules: &EligibilityRules) -> String {
        match self {
            Report::Collection => "Device Collections".to_string(),
            Report::Sales => format!("Sales Growth ({})", rules.year_marker),
        }
    }

    pub fn chart_title(&self, rules: &EligibilityRules) -> String {
        match self {
            Report::Collection => "Collections per Month".to_string(),
            Report::Sales => format!(
                "New Sales ({} - Partner {})",
                rules.year_marker, rules.partner_id
            ),
        }
    }

    /// Fixed user-facing message shown when the report's fetch fails.
    pub fn failure_message(&self) -> String {
        format!("Failed to load {} data.", self.key())
    }
}

/// One record reduced to what the aggregation needs. Only built from records
/// with a parseable date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub date: NaiveDate,
    pub region: Region,
}

/// Aggregated counts for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthBucket {
    /// "<ShortMonth> <Year>", e.g. "Mar 2025"
    pub label: String,
    /// year * 100 + zero-based month index
    #[serde(rename = "sortKey")]
    pub sort_key: i32,
    #[serde(rename = "Gauteng")]
    pub gauteng: u64,
    #[serde(rename = "Limpopo")]
    pub limpopo: u64,
    #[serde(rename = "Other")]
    pub other: u64,
}

impl MonthBucket {
    pub fn new(label: String, sort_key: i32) -> Self {
        Self {
            label,
            sort_key,
            gauteng: 0,
            limpopo: 0,
            other: 0,
        }
    }

    pub fn increment(&mut self, region: Region) {
        match region {
            Region::Gauteng => self.gauteng += 1,
            Region::Limpopo => self.limpopo += 1,
            Region::Other => self.other += 1,
        }
    }

    pub fn count(&self, region: Region) -> u64 {
        match region {
            Region::Gauteng => self.gauteng,
            Region::Limpopo => self.limpopo,
            Region::Other => self.other,
        }
    }

    pub fn total(&self) -> u64 {
        self.gauteng + self.limpopo + self.other
    }
}

/// Month buckets in ascending `sort_key` order.
pub type TimeSeries = Vec<MonthBucket>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "Gauteng")]
    pub gauteng: u64,
    #[serde(rename = "Limpopo")]
    pub limpopo: u64,
    #[serde(rename = "Other")]
    pub other: u64,
    #[serde(rename = "All")]
    pub all: u64,
}

impl Totals {
    pub fn from_series(series: &[MonthBucket]) -> Self {
        let gauteng = series.iter().map(|b| b.gauteng).sum();
        let limpopo = series.iter().map(|b| b.limpopo).sum();
        let other = series.iter().map(|b| b.other).sum();

        Self {
            gauteng,
            limpopo,
            other,
            all: gauteng + limpopo + other,
        }
    }

    /// The Other legend entry and summary card are only shown when something
    /// actually landed there.
    pub fn has_other(&self) -> bool {
        self.other > 0
    }
}
