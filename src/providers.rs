use crate::error::ProviderError;
use crate::schema::{RawRecord, RawSalesRecord};
use async_trait::async_trait;

/// Source of raw device-collection history records.
#[async_trait]
pub trait CollectionHistoryProvider: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, ProviderError>;
}

/// Source of raw sales (customer) records.
#[async_trait]
pub trait SalesDataProvider: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<RawSalesRecord>, ProviderError>;
}

/// Provider backed by records already held in memory. Useful for fixtures
/// and for callers that fetch through their own transport.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: Vec<RawRecord>,
}

impl StaticProvider {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    /// Builds a provider from a JSON array of objects. Non-object entries are
    /// skipped.
    pub fn from_json_str(json: &str) -> crate::error::Result<Self> {
        let values: Vec<serde_json::Value> = serde_json::from_str(json)?;
        let records = values
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::Object(map) => Some(map),
                _ => None,
            })
            .collect();
        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CollectionHistoryProvider for StaticProvider {
    async fn fetch_all(&self) -> Result<Vec<RawRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}

#[async_trait]
impl SalesDataProvider for StaticProvider {
    async fn fetch_all(&self) -> Result<Vec<RawSalesRecord>, ProviderError> {
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_str_skips_non_objects() {
        let provider =
            StaticProvider::from_json_str(r#"[{"Date": "2025-03-01"}, 42, null, {"date": "x"}]"#)
                .unwrap();
        assert_eq!(provider.len(), 2);
    }

    #[test]
    fn test_from_json_str_rejects_non_array() {
        assert!(StaticProvider::from_json_str(r#"{"Date": "2025-03-01"}"#).is_err());
    }

    #[tokio::test]
    async fn test_static_provider_returns_records() {
        let provider = StaticProvider::from_json_str(r#"[{"partner_id": "3"}]"#).unwrap();
        let records = SalesDataProvider::fetch_all(&provider).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["partner_id"], "3");
    }
}
