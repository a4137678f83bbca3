//! Current field values of a form

use super::field::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

static EMPTY: FieldValue = FieldValue::Empty;

/// Mapping from field name to its raw value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormValues(HashMap<String, FieldValue>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Value for `name`, treating absent fields as empty
    pub fn value(&self, name: &str) -> &FieldValue {
        self.0.get(name).unwrap_or(&EMPTY)
    }

    /// Text value for `name`, trimmed; empty string when absent
    pub fn text(&self, name: &str) -> &str {
        self.value(name).as_text().map(str::trim).unwrap_or("")
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Overwrite entries with those present in `other`
    pub fn merge(&mut self, other: FormValues) {
        self.0.extend(other.0);
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for FormValues {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_value_is_empty() {
        let values = FormValues::new();
        assert!(values.value("missing").is_empty());
        assert!(values.get("missing").is_none());
        assert_eq!(values.text("missing"), "");
    }

    #[test]
    fn test_text_is_trimmed() {
        let mut values = FormValues::new();
        values.set("name", "  Jane Doe ");
        assert_eq!(values.text("name"), "Jane Doe");
    }

    #[test]
    fn test_merge_overwrites() {
        let mut base: FormValues = [("a", FieldValue::text("1")), ("b", FieldValue::text("2"))]
            .into_iter()
            .collect();
        let overlay: FormValues = [("b", FieldValue::text("3"))].into_iter().collect();
        base.merge(overlay);
        assert_eq!(base.text("a"), "1");
        assert_eq!(base.text("b"), "3");
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let json = r#"{"fullName": "Jane", "skills": ["xss", "sqli"], "portfolio": null}"#;
        let values: FormValues = serde_json::from_str(json).unwrap();
        assert_eq!(values.text("fullName"), "Jane");
        assert_eq!(values.value("skills").item_count(), 2);
        assert!(values.value("portfolio").is_empty());
    }
}
