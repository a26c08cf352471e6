use crate::schema::{MonthBucket, NormalizedEvent, TimeSeries};
use crate::utils::{month_label, month_sort_key};
use std::collections::BTreeMap;

/// Folds dated, region-tagged events into per-month counts.
///
/// Buckets are keyed by their sort key (`year * 100 + month0`), which is unique
/// per calendar month, so the resulting series is ordered chronologically no
/// matter what order events arrive in.
#[derive(Debug, Default)]
pub struct MonthlyAggregator {
    buckets: BTreeMap<i32, MonthBucket>,
}

impl MonthlyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: &NormalizedEvent) {
        let sort_key = month_sort_key(event.date);
        self.buckets
            .entry(sort_key)
            .or_insert_with(|| MonthBucket::new(month_label(event.date), sort_key))
            .increment(event.region);
    }

    pub fn extend<'a, I>(&mut self, events: I)
    where
        I: IntoIterator<Item = &'a NormalizedEvent>,
    {
        for event in events {
            self.add(event);
        }
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn into_series(self) -> TimeSeries {
        self.buckets.into_values().collect()
    }
}

pub fn aggregate_monthly<'a, I>(events: I) -> TimeSeries
where
    I: IntoIterator<Item = &'a NormalizedEvent>,
{
    let mut aggregator = MonthlyAggregator::new();
    aggregator.extend(events);
    aggregator.into_series()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Region;
    use chrono::NaiveDate;

    fn event(y: i32, m: u32, d: u32, region: Region) -> NormalizedEvent {
        NormalizedEvent {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            region,
        }
    }

    #[test]
    fn test_groups_by_calendar_month() {
        let events = vec![
            event(2025, 3, 1, Region::Gauteng),
            event(2025, 3, 31, Region::Limpopo),
            event(2025, 3, 15, Region::Gauteng),
            event(2025, 4, 2, Region::Other),
        ];

        let series = aggregate_monthly(&events);
        assert_eq!(series.len(), 2);

        assert_eq!(series[0].label, "Mar 2025");
        assert_eq!(series[0].sort_key, 202502);
        assert_eq!((series[0].gauteng, series[0].limpopo, series[0].other), (2, 1, 0));

        assert_eq!(series[1].label, "Apr 2025");
        assert_eq!((series[1].gauteng, series[1].limpopo, series[1].other), (0, 0, 1));
    }

    #[test]
    fn test_year_boundary_ordering() {
        let events = vec![
            event(2025, 1, 5, Region::Gauteng),
            event(2024, 12, 28, Region::Gauteng),
            event(2023, 11, 1, Region::Limpopo),
        ];

        let labels: Vec<String> = aggregate_monthly(&events)
            .into_iter()
            .map(|b| b.label)
            .collect();
        assert_eq!(labels, vec!["Nov 2023", "Dec 2024", "Jan 2025"]);
    }

    #[test]
    fn test_same_month_different_years_stay_separate() {
        let events = vec![
            event(2024, 6, 1, Region::Gauteng),
            event(2025, 6, 1, Region::Gauteng),
        ];

        let series = aggregate_monthly(&events);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].label, "Jun 2024");
        assert_eq!(series[1].label, "Jun 2025");
    }

    #[test]
    fn test_empty_input() {
        let aggregator = MonthlyAggregator::new();
        assert!(aggregator.is_empty());
        assert!(aggregator.into_series().is_empty());
    }
}
