use crate::error::{Result, StatsError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Region matching rules for both sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct RegionRules {
    #[schemars(description = "Substring that marks a province text as Gauteng (case-insensitive)")]
    pub gauteng_keyword: String,

    #[schemars(description = "Substring that marks a province text as Limpopo (case-insensitive)")]
    pub limpopo_keyword: String,

    #[schemars(description = "Sales location ids that belong to Gauteng")]
    pub gauteng_location_ids: Vec<i64>,

    #[schemars(description = "Sales location ids that belong to Limpopo")]
    pub limpopo_location_ids: Vec<i64>,
}

impl Default for RegionRules {
    fn default() -> Self {
        Self {
            gauteng_keyword: "gauteng".to_string(),
            limpopo_keyword: "limpopo".to_string(),
            gauteng_location_ids: vec![3, 5, 6, 7, 8, 9, 10],
            limpopo_location_ids: vec![2, 11],
        }
    }
}

/// Business rules a sales record must satisfy to be counted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EligibilityRules {
    #[schemars(description = "Required partner id")]
    pub partner_id: i64,

    #[schemars(description = "Required monthly recurring revenue amount")]
    pub mrr_target: f64,

    #[schemars(
        description = "Absolute tolerance when comparing mrr_total to mrr_target. Absorbs formatting noise such as '399.0000'."
    )]
    pub mrr_tolerance: f64,

    #[schemars(
        description = "Literal substring that date_add must contain. This is a loose text check, not a parsed year comparison."
    )]
    pub year_marker: String,
}

impl Default for EligibilityRules {
    fn default() -> Self {
        Self {
            partner_id: 3,
            mrr_target: 399.0,
            mrr_tolerance: 0.01,
            year_marker: "2025".to_string(),
        }
    }
}

/// Scaling parameters for the stacked bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ChartSettings {
    #[schemars(description = "Axis maximum used before headroom when the series is empty")]
    pub empty_floor: u64,

    #[schemars(description = "Headroom added above the tallest bar, in percent (20 = 20%)")]
    pub headroom_pct: u32,

    #[schemars(description = "Height of the plotting area in pixels")]
    pub plot_height_px: u32,

    #[schemars(description = "Minimum rendered bar height in pixels, so empty months stay visible")]
    pub min_bar_height_px: u32,

    #[schemars(description = "Axis tick positions as fractions of the axis maximum, top to bottom")]
    pub tick_fractions: Vec<f64>,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            empty_floor: 10,
            headroom_pct: 20,
            plot_height_px: 320,
            min_bar_height_px: 4,
            tick_fractions: vec![1.0, 0.75, 0.5, 0.25, 0.0],
        }
    }
}

impl ChartSettings {
    /// Minimum bar height expressed as a percentage of the plotting area.
    pub fn min_height_pct(&self) -> f64 {
        if self.plot_height_px == 0 {
            return 0.0;
        }
        (self.min_bar_height_px as f64 / self.plot_height_px as f64 * 100.0).min(100.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatsConfig {
    #[schemars(description = "Region classification rules")]
    pub regions: RegionRules,

    #[schemars(description = "Sales eligibility filter")]
    pub eligibility: EligibilityRules,

    #[schemars(description = "Chart scaling")]
    pub chart: ChartSettings,
}

impl StatsConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: StatsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.regions.gauteng_keyword.trim().is_empty()
            || self.regions.limpopo_keyword.trim().is_empty()
        {
            return Err(StatsError::InvalidConfig(
                "Region keywords must not be empty".to_string(),
            ));
        }

        let gauteng: HashSet<i64> = self.regions.gauteng_location_ids.iter().copied().collect();
        if let Some(id) = self
            .regions
            .limpopo_location_ids
            .iter()
            .find(|id| gauteng.contains(*id))
        {
            return Err(StatsError::InvalidConfig(format!(
                "Location id {} is mapped to both Gauteng and Limpopo",
                id
            )));
        }

        let tolerance = self.eligibility.mrr_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(StatsError::InvalidConfig(format!(
                "MRR tolerance {} must be a finite, non-negative number",
                tolerance
            )));
        }

        if self.chart.plot_height_px == 0 {
            return Err(StatsError::InvalidConfig(
                "Chart plot height must be greater than zero".to_string(),
            ));
        }

        if let Some(fraction) = self
            .chart
            .tick_fractions
            .iter()
            .find(|f| !(0.0..=1.0).contains(*f))
        {
            return Err(StatsError::InvalidConfig(format!(
                "Tick fraction {} must be between 0.0 and 1.0",
                fraction
            )));
        }

        Ok(())
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(StatsConfig)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StatsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.eligibility.partner_id, 3);
        assert_eq!(config.regions.limpopo_location_ids, vec![2, 11]);
        assert!((config.chart.min_height_pct() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config =
            StatsConfig::from_json_str(r#"{ "eligibility": { "year_marker": "2026" } }"#).unwrap();
        assert_eq!(config.eligibility.year_marker, "2026");
        assert_eq!(config.eligibility.partner_id, 3);
        assert_eq!(config.chart.empty_floor, 10);
    }

    #[test]
    fn test_overlapping_location_ids_rejected() {
        let json = r#"{ "regions": { "gauteng_location_ids": [2, 3], "limpopo_location_ids": [2] } }"#;
        let err = StatsConfig::from_json_str(json).unwrap_err();
        assert!(matches!(err, StatsError::InvalidConfig(_)));
    }

    #[test]
    fn test_mixed_case_keyword_still_classifies() {
        use crate::report::build_report;
        use crate::schema::Report;

        let config =
            StatsConfig::from_json_str(r#"{ "regions": { "gauteng_keyword": "Gauteng" } }"#)
                .unwrap();
        let record = serde_json::json!({ "Date": "2025-03-01", "Province": "Gauteng" })
            .as_object()
            .cloned()
            .unwrap();

        let view = build_report(Report::Collection, &[record], &config);
        assert_eq!(view.totals.gauteng, 1);
        assert_eq!(view.totals.other, 0);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let json = r#"{ "eligibility": { "mrr_tolerance": -1.0 } }"#;
        assert!(StatsConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = StatsConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, StatsError::SerializationError(_)));
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = StatsConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("eligibility"));
        assert!(schema_json.contains("mrr_tolerance"));
        assert!(schema_json.contains("tick_fractions"));
    }
}
