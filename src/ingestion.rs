use crate::classifier::RegionClassifier;
use crate::config::RegionRules;
use crate::schema::{NormalizedEvent, RawRecord, Region};
use crate::utils::{parse_calendar_date, present_text};
use log::debug;

pub const COLLECTION_DATE_FIELDS: &[&str] = &["Date", "date", "created_at"];
pub const COLLECTION_PROVINCE_FIELDS: &[&str] = &["Province", "province"];
pub const SALES_DATE_FIELDS: &[&str] = &["date_add"];
pub const SALES_LOCATION_FIELD: &str = "location_id";

/// Typed view over one loosely-typed source. Each source names its own date
/// fields (in priority order) and its own way of deciding the region.
pub trait SourceAdapter {
    fn source_name(&self) -> &'static str;

    fn date_fields(&self) -> &'static [&'static str];

    fn region(&self, record: &RawRecord) -> Region;

    /// Text of the first date field that holds a non-empty value.
    fn date_text(&self, record: &RawRecord) -> Option<String> {
        first_present_text(record, self.date_fields())
    }

    /// Reduces a record to a dated, region-tagged event. Records without a
    /// usable date yield `None`.
    fn normalize(&self, record: &RawRecord) -> Option<NormalizedEvent> {
        let date = parse_calendar_date(&self.date_text(record)?)?;
        Some(NormalizedEvent {
            date,
            region: self.region(record),
        })
    }
}

pub struct CollectionAdapter<'a> {
    classifier: RegionClassifier<'a>,
}

impl<'a> CollectionAdapter<'a> {
    pub fn new(rules: &'a RegionRules) -> Self {
        Self {
            classifier: RegionClassifier::new(rules),
        }
    }
}

impl SourceAdapter for CollectionAdapter<'_> {
    fn source_name(&self) -> &'static str {
        "collection"
    }

    fn date_fields(&self) -> &'static [&'static str] {
        COLLECTION_DATE_FIELDS
    }

    fn region(&self, record: &RawRecord) -> Region {
        let province = first_present_text(record, COLLECTION_PROVINCE_FIELDS);
        self.classifier.classify_province(province.as_deref())
    }
}

pub struct SalesAdapter<'a> {
    classifier: RegionClassifier<'a>,
}

impl<'a> SalesAdapter<'a> {
    pub fn new(rules: &'a RegionRules) -> Self {
        Self {
            classifier: RegionClassifier::new(rules),
        }
    }
}

impl SourceAdapter for SalesAdapter<'_> {
    fn source_name(&self) -> &'static str {
        "sales"
    }

    fn date_fields(&self) -> &'static [&'static str] {
        SALES_DATE_FIELDS
    }

    fn region(&self, record: &RawRecord) -> Region {
        self.classifier
            .classify_location(record.get(SALES_LOCATION_FIELD))
    }
}

/// Normalizes a batch, silently dropping records that cannot be dated.
pub fn normalize_records<'r, A, I>(adapter: &A, records: I) -> Vec<NormalizedEvent>
where
    A: SourceAdapter + ?Sized,
    I: IntoIterator<Item = &'r RawRecord>,
{
    let mut seen = 0usize;
    let events: Vec<NormalizedEvent> = records
        .into_iter()
        .inspect(|_| seen += 1)
        .filter_map(|record| adapter.normalize(record))
        .collect();

    let dropped = seen - events.len();
    if dropped > 0 {
        debug!(
            "Dropped {} of {} {} records without a usable date",
            dropped,
            seen,
            adapter.source_name()
        );
    }

    events
}

fn first_present_text(record: &RawRecord, fields: &[&str]) -> Option<String> {
    fields
        .iter()
        .find_map(|field| record.get(*field).and_then(present_text))
}
