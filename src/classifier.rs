use crate::config::RegionRules;
use crate::schema::Region;
use crate::utils::value_as_int;
use serde_json::Value;

/// Maps raw region identifiers onto [`Region`]. Every input maps to exactly
/// one region; anything unrecognised is [`Region::Other`].
pub struct RegionClassifier<'a> {
    rules: &'a RegionRules,
}

impl<'a> RegionClassifier<'a> {
    pub fn new(rules: &'a RegionRules) -> Self {
        Self { rules }
    }

    /// Classifies free-text province names ("Gauteng", " limpopo region ").
    pub fn classify_province(&self, province: Option<&str>) -> Region {
        let normalized = province.unwrap_or_default().trim().to_lowercase();

        if normalized.is_empty() {
            Region::Other
        } else if normalized.contains(&normalize_keyword(&self.rules.gauteng_keyword)) {
            Region::Gauteng
        } else if normalized.contains(&normalize_keyword(&self.rules.limpopo_keyword)) {
            Region::Limpopo
        } else {
            Region::Other
        }
    }

    /// Classifies numeric location codes, given as numbers or numeric text.
    pub fn classify_location(&self, location: Option<&Value>) -> Region {
        match location.and_then(value_as_int) {
            Some(id) => self.classify_location_id(id),
            None => Region::Other,
        }
    }

    pub fn classify_location_id(&self, id: i64) -> Region {
        if self.rules.gauteng_location_ids.contains(&id) {
            Region::Gauteng
        } else if self.rules.limpopo_location_ids.contains(&id) {
            Region::Limpopo
        } else {
            Region::Other
        }
    }
}

// Keywords come from config and may be written in any case.
fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_province_text() {
        let rules = RegionRules::default();
        let classifier = RegionClassifier::new(&rules);

        assert_eq!(classifier.classify_province(Some("Gauteng")), Region::Gauteng);
        assert_eq!(
            classifier.classify_province(Some("  GAUTENG North ")),
            Region::Gauteng
        );
        assert_eq!(
            classifier.classify_province(Some("limpopo region")),
            Region::Limpopo
        );
        assert_eq!(
            classifier.classify_province(Some("Western Cape")),
            Region::Other
        );
        assert_eq!(classifier.classify_province(Some("")), Region::Other);
        assert_eq!(classifier.classify_province(Some("   ")), Region::Other);
        assert_eq!(classifier.classify_province(None), Region::Other);
    }

    #[test]
    fn test_gauteng_wins_when_both_keywords_present() {
        let rules = RegionRules::default();
        let classifier = RegionClassifier::new(&rules);
        assert_eq!(
            classifier.classify_province(Some("Limpopo / Gauteng border")),
            Region::Gauteng
        );
    }

    #[test]
    fn test_keywords_match_regardless_of_configured_case() {
        let rules = RegionRules {
            gauteng_keyword: " Gauteng ".to_string(),
            limpopo_keyword: "LIMPOPO".to_string(),
            ..RegionRules::default()
        };
        let classifier = RegionClassifier::new(&rules);

        assert_eq!(classifier.classify_province(Some("Gauteng")), Region::Gauteng);
        assert_eq!(classifier.classify_province(Some("gauteng east")), Region::Gauteng);
        assert_eq!(classifier.classify_province(Some("Limpopo")), Region::Limpopo);
        assert_eq!(classifier.classify_province(Some("Free State")), Region::Other);
    }

    #[test]
    fn test_location_codes() {
        let rules = RegionRules::default();
        let classifier = RegionClassifier::new(&rules);

        for id in [3, 5, 6, 7, 8, 9, 10] {
            assert_eq!(classifier.classify_location_id(id), Region::Gauteng, "id {}", id);
        }
        for id in [2, 11] {
            assert_eq!(classifier.classify_location_id(id), Region::Limpopo, "id {}", id);
        }
        for id in [-1, 0, 1, 4, 12, 999] {
            assert_eq!(classifier.classify_location_id(id), Region::Other, "id {}", id);
        }
    }

    #[test]
    fn test_location_values_are_total() {
        let rules = RegionRules::default();
        let classifier = RegionClassifier::new(&rules);

        assert_eq!(classifier.classify_location(Some(&json!("5"))), Region::Gauteng);
        assert_eq!(classifier.classify_location(Some(&json!(11))), Region::Limpopo);
        assert_eq!(classifier.classify_location(Some(&json!("abc"))), Region::Other);
        assert_eq!(classifier.classify_location(Some(&json!(null))), Region::Other);
        assert_eq!(classifier.classify_location(Some(&json!([5]))), Region::Other);
        assert_eq!(classifier.classify_location(None), Region::Other);
    }
}
