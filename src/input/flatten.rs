//! Flattening of nested coding records into variable → raw value maps.
//!
//! Model coders group variables into sections (`application`, `ai`, ...);
//! human coders write one flat `variables` object. Both shapes end up as a
//! single map before anything reaches the rating table.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Sections merged in order; later sections override earlier keys.
pub const SECTIONS: &[&str] = &[
    "application",
    "development",
    "ai",
    "social",
    "governance",
    "moderators",
    "variables",
    "coding",
];

const ID_KEYS: &[&str] = &["platform_id", "platform_ID", "subject_id"];

#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub subject_id: String,
    pub subject_name: String,
    pub values: BTreeMap<String, Value>,
}

impl FlatRecord {
    pub fn get(&self, variable: &str) -> Option<&Value> {
        self.values.get(variable)
    }
}

fn subject_id(object: &Map<String, Value>) -> Option<String> {
    ID_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Returns `None` when the record is not an object or carries no id.
pub fn flatten_record(record: &Value) -> Option<FlatRecord> {
    let object = record.as_object()?;
    let subject_id = subject_id(object)?;
    let subject_name = object
        .get("platform_name")
        .or_else(|| object.get("subject_name"))
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .unwrap_or(subject_id.as_str())
        .to_string();

    let values = SECTIONS
        .iter()
        .filter_map(|section| object.get(*section)?.as_object())
        .flat_map(|section| section.iter())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Some(FlatRecord {
        subject_id,
        subject_name,
        values,
    })
}

/// One CSV row keyed by header. Every column except the id and name is a
/// candidate variable.
pub fn flatten_csv_row(headers: &[String], row: &[String]) -> Option<FlatRecord> {
    let cells: BTreeMap<&str, &str> = headers
        .iter()
        .map(String::as_str)
        .zip(row.iter().map(String::as_str))
        .collect();
    let subject_id = ID_KEYS
        .iter()
        .find_map(|key| cells.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()))?
        .to_string();
    let subject_name = cells
        .get("platform_name")
        .filter(|name| !name.is_empty())
        .map(|name| name.to_string())
        .unwrap_or_else(|| subject_id.clone());

    let values = cells
        .iter()
        .filter(|(header, _)| !ID_KEYS.contains(*header) && **header != "platform_name")
        .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
        .collect();

    Some(FlatRecord {
        subject_id,
        subject_name,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_sections() {
        let record = json!({
            "platform_id": "VG7",
            "platform_name": "Acme Cloud",
            "application": {"API": 1, "DOCS": "1"},
            "development": {"SDK": 0, "METH": 12},
            "ai": {"AI_MODEL": null}
        });
        let flat = flatten_record(&record).unwrap();
        assert_eq!(flat.subject_id, "VG7");
        assert_eq!(flat.subject_name, "Acme Cloud");
        assert_eq!(flat.get("API"), Some(&json!(1)));
        assert_eq!(flat.get("METH"), Some(&json!(12)));
        assert_eq!(flat.get("AI_MODEL"), Some(&Value::Null));
        assert_eq!(flat.values.len(), 5);
    }

    #[test]
    fn test_flatten_human_variables_shape() {
        let record = json!({
            "platform_ID": "VG2",
            "variables": {"DOCS": 1, "SDK": ""}
        });
        let flat = flatten_record(&record).unwrap();
        assert_eq!(flat.subject_id, "VG2");
        assert_eq!(flat.subject_name, "VG2");
        assert_eq!(flat.get("SDK"), Some(&json!("")));
    }

    #[test]
    fn test_later_sections_override() {
        let record = json!({
            "platform_id": "VG1",
            "application": {"API": 0},
            "variables": {"API": 1}
        });
        assert_eq!(flatten_record(&record).unwrap().get("API"), Some(&json!(1)));
    }

    #[test]
    fn test_records_without_id_are_skipped() {
        assert!(flatten_record(&json!({"platform_name": "x"})).is_none());
        assert!(flatten_record(&json!({"platform_id": ""})).is_none());
        assert!(flatten_record(&json!([1, 2])).is_none());
    }

    #[test]
    fn test_flatten_csv_row() {
        let headers: Vec<String> = ["platform_ID", "platform_name", "DOCS", "METH"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let row: Vec<String> = ["VG3", "Beta", "1", ""].iter().map(|s| s.to_string()).collect();
        let flat = flatten_csv_row(&headers, &row).unwrap();
        assert_eq!(flat.subject_id, "VG3");
        assert_eq!(flat.subject_name, "Beta");
        assert_eq!(flat.get("DOCS"), Some(&json!("1")));
        assert_eq!(flat.get("METH"), Some(&json!("")));
        assert!(flat.get("platform_ID").is_none());
    }
}
