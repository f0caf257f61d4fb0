use crate::core::coerce::clean_value;
use crate::domain::model::RawRow;
use serde_json::Value;
use std::collections::HashMap;

/// "Key Features & Benefits" -> "key_features_and_benefits"
pub fn normalize_key(header: &str) -> String {
    header
        .to_lowercase()
        .trim()
        .replace([' ', '-'], "_")
        .replace('&', "and")
        .replace('/', "_")
}

/// A row keyed by normalized header. Later duplicate headers win.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRow {
    fields: HashMap<String, Value>,
}

impl NormalizedRow {
    pub fn from_raw(raw: &RawRow) -> Self {
        let fields = raw
            .cells
            .iter()
            .map(|(header, value)| (normalize_key(header), value.clone()))
            .collect();
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// First alias whose value survives `clean_value`.
    pub fn first(&self, aliases: &[&str]) -> Option<&Value> {
        aliases
            .iter()
            .filter_map(|alias| self.fields.get(*alias))
            .find(|value| clean_value(Some(value)).is_some())
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for NormalizedRow {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (normalize_key(k.as_ref()), v))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Program ID"), "program_id");
        assert_eq!(normalize_key("  Resource Name "), "resource_name");
        assert_eq!(normalize_key("Key Features & Benefits"), "key_features_and_benefits");
        assert_eq!(normalize_key("key_features_&_benefits"), "key_features_and_benefits");
        assert_eq!(normalize_key("Real-World Context"), "real_world_context");
        assert_eq!(normalize_key("Known As / Stage Name"), "known_as___stage_name");
        assert_eq!(normalize_key(""), "");
    }

    #[test]
    fn test_from_raw_later_duplicate_wins() {
        let raw: RawRow = [
            ("Program ID", json!("FIN-001")),
            ("program_id", json!("FIN-002")),
        ]
        .into_iter()
        .collect();

        let row = NormalizedRow::from_raw(&raw);
        assert_eq!(row.get("program_id"), Some(&json!("FIN-002")));
        assert!(!row.contains_key("Program ID"));
    }

    #[test]
    fn test_first_skips_null_like_aliases() {
        let row: NormalizedRow = [
            ("Known As", json!("n/a")),
            ("Known As / Stage Name", json!("  DJ Sam ")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            row.first(&["known_as", "known_as___stage_name", "stage_name"]),
            Some(&json!("  DJ Sam "))
        );
        assert_eq!(row.first(&["stage_name"]), None);
    }
}
