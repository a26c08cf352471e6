use crate::config::ChartSettings;
use crate::schema::{MonthBucket, Region};
use crate::utils::split_month_label;
use serde::{Deserialize, Serialize};

/// One region's slice of a stacked bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub region: Region,
    pub count: u64,
    /// Share of the bar's total, 0..=100.
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarLayout {
    pub label: String,
    pub month: String,
    pub year: String,
    pub total: u64,
    /// Height relative to `chart_max`, before the minimum height is applied.
    pub raw_height_pct: f64,
    /// Rendered height, never below the configured minimum sliver.
    pub height_pct: f64,
    /// Bottom-up stacking order; regions with no count are left out.
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTick {
    pub fraction: f64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartScale {
    pub max_value: u64,
    pub chart_max: u64,
    pub bars: Vec<BarLayout>,
    pub ticks: Vec<AxisTick>,
}

impl ChartScale {
    pub fn compute(series: &[MonthBucket], settings: &ChartSettings) -> Self {
        let max_value = series
            .iter()
            .map(MonthBucket::total)
            .max()
            .unwrap_or(settings.empty_floor);
        let chart_max = with_headroom(max_value, settings.headroom_pct);
        let min_height_pct = settings.min_height_pct();

        let bars = series
            .iter()
            .map(|bucket| layout_bar(bucket, chart_max, min_height_pct))
            .collect();

        let ticks = settings
            .tick_fractions
            .iter()
            .map(|&fraction| AxisTick {
                fraction,
                value: (chart_max as f64 * fraction).round() as u64,
            })
            .collect();

        Self {
            max_value,
            chart_max,
            bars,
            ticks,
        }
    }
}

/// ceil(value * (100 + headroom_pct) / 100), in integer arithmetic so that
/// e.g. 5 with 20% headroom is exactly 6.
pub fn with_headroom(value: u64, headroom_pct: u32) -> u64 {
    let scaled = value.saturating_mul(100 + headroom_pct as u64);
    scaled.div_ceil(100)
}

fn layout_bar(bucket: &MonthBucket, chart_max: u64, min_height_pct: f64) -> BarLayout {
    let total = bucket.total();
    let raw_height_pct = if chart_max > 0 {
        total as f64 / chart_max as f64 * 100.0
    } else {
        0.0
    };

    let segments = if total > 0 {
        Region::ALL
            .iter()
            .map(|&region| (region, bucket.count(region)))
            .filter(|&(_, count)| count > 0)
            .map(|(region, count)| Segment {
                region,
                count,
                pct: count as f64 / total as f64 * 100.0,
            })
            .collect()
    } else {
        Vec::new()
    };

    let (month, year) = split_month_label(&bucket.label);

    BarLayout {
        label: bucket.label.clone(),
        month: month.to_string(),
        year: year.to_string(),
        total,
        raw_height_pct,
        height_pct: raw_height_pct.max(min_height_pct).min(100.0),
        segments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(label: &str, gauteng: u64, limpopo: u64, other: u64) -> MonthBucket {
        MonthBucket {
            label: label.to_string(),
            sort_key: 0,
            gauteng,
            limpopo,
            other,
        }
    }

    #[test]
    fn test_empty_series_uses_floor() {
        let scale = ChartScale::compute(&[], &ChartSettings::default());
        assert_eq!(scale.max_value, 10);
        assert_eq!(scale.chart_max, 12);
        assert!(scale.bars.is_empty());
    }

    #[test]
    fn test_headroom_is_exact_ceiling() {
        assert_eq!(with_headroom(10, 20), 12);
        assert_eq!(with_headroom(5, 20), 6);
        assert_eq!(with_headroom(7, 20), 9);
        assert_eq!(with_headroom(1, 20), 2);
        assert_eq!(with_headroom(0, 20), 0);
        assert_eq!(with_headroom(7, 0), 7);
    }

    #[test]
    fn test_bar_heights_and_segments() {
        let series = vec![bucket("Mar 2025", 3, 1, 0), bucket("Apr 2025", 1, 0, 1)];
        let scale = ChartScale::compute(&series, &ChartSettings::default());

        assert_eq!(scale.max_value, 4);
        assert_eq!(scale.chart_max, 5);

        let march = &scale.bars[0];
        assert_eq!(march.total, 4);
        assert!((march.height_pct - 80.0).abs() < 1e-9);
        assert_eq!(march.month, "Mar");
        assert_eq!(march.year, "2025");
        assert_eq!(march.segments.len(), 2);
        assert_eq!(march.segments[0].region, Region::Gauteng);
        assert!((march.segments[0].pct - 75.0).abs() < 1e-9);
        assert_eq!(march.segments[1].region, Region::Limpopo);
        assert!((march.segments[1].pct - 25.0).abs() < 1e-9);

        let april = &scale.bars[1];
        let regions: Vec<Region> = april.segments.iter().map(|s| s.region).collect();
        assert_eq!(regions, vec![Region::Gauteng, Region::Other]);
    }

    #[test]
    fn test_zero_bar_keeps_minimum_height() {
        let series = vec![bucket("Jan 2025", 0, 0, 0), bucket("Feb 2025", 50, 0, 0)];
        let scale = ChartScale::compute(&series, &ChartSettings::default());

        let empty = &scale.bars[0];
        assert_eq!(empty.raw_height_pct, 0.0);
        assert!((empty.height_pct - 1.25).abs() < 1e-9);
        assert!(empty.segments.is_empty());
    }

    #[test]
    fn test_all_zero_series_has_zero_axis() {
        let series = vec![bucket("Jan 2025", 0, 0, 0)];
        let scale = ChartScale::compute(&series, &ChartSettings::default());
        assert_eq!(scale.chart_max, 0);
        assert_eq!(scale.bars[0].raw_height_pct, 0.0);
    }

    #[test]
    fn test_ticks() {
        let scale = ChartScale::compute(&[], &ChartSettings::default());
        let values: Vec<u64> = scale.ticks.iter().map(|t| t.value).collect();
        assert_eq!(values, vec![12, 9, 6, 3, 0]);
    }

    #[test]
    fn test_heights_never_exceed_full_scale() {
        let series: Vec<MonthBucket> = (0..40)
            .map(|i| bucket("Jan 2025", i * 7 % 13, i % 5, i % 2))
            .collect();
        let scale = ChartScale::compute(&series, &ChartSettings::default());

        let max_total = series.iter().map(MonthBucket::total).max().unwrap();
        assert!(scale.chart_max >= max_total);
        for bar in &scale.bars {
            assert!(bar.height_pct <= 100.0);
            assert!(bar.raw_height_pct <= 100.0);
        }
    }
}
