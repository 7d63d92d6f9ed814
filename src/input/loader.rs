//! Loading rater result directories and assembling the rating table.

use super::flatten::{flatten_csv_row, flatten_record, FlatRecord};
use super::parse::{parse_rating, ParsedRating};
use crate::config::InputConfig;
use crate::core::{
    Error, Rating, RatingTable, RatingValue, Result, Schema, Subject, SubjectId, VariableType,
};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One rater's flattened records, keyed by subject id.
#[derive(Debug, Clone, PartialEq)]
pub struct RaterResults {
    pub name: String,
    pub source: PathBuf,
    pub records: BTreeMap<String, FlatRecord>,
}

impl RaterResults {
    pub fn new(name: impl Into<String>, records: impl IntoIterator<Item = FlatRecord>) -> Self {
        Self {
            name: name.into(),
            source: PathBuf::new(),
            records: records
                .into_iter()
                .map(|r| (r.subject_id.clone(), r))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sorted_entries(dir: &Path, matches: impl Fn(&Path) -> bool) -> Result<Vec<PathBuf>> {
    let mut paths = fs::read_dir(dir)
        .map_err(|e| Error::input(dir, e.to_string()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && matches(path))
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default()
}

fn load_json_record(path: &Path) -> Result<Option<FlatRecord>> {
    let contents = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    Ok(flatten_record(&value))
}

fn load_csv_records(path: &Path) -> Result<Vec<FlatRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    reader
        .records()
        .map(|record| -> Result<Option<FlatRecord>> {
            let row: Vec<String> = record?.iter().map(str::to_string).collect();
            Ok(flatten_csv_row(&headers, &row))
        })
        .filter_map(|r| r.transpose())
        .collect()
}

/// Read every `*.json` record in `dir`, skipping summary files. Files that
/// fail to parse are logged and skipped. Falls back to the first
/// `*_coding_results.csv` when no JSON record was found.
pub fn load_rater_dir(dir: &Path, name: &str) -> Result<RaterResults> {
    if !dir.is_dir() {
        return Err(Error::input(dir, "not a directory"));
    }

    let json_files = sorted_entries(dir, |p| {
        p.extension().is_some_and(|ext| ext == "json") && !file_name(p).contains("summary")
    })?;

    let mut records = BTreeMap::new();
    for path in &json_files {
        match load_json_record(path) {
            Ok(Some(record)) => {
                if records.contains_key(&record.subject_id) {
                    debug!(
                        "{} overrides an earlier record for {}",
                        path.display(),
                        record.subject_id
                    );
                }
                records.insert(record.subject_id.clone(), record);
            }
            Ok(None) => debug!("Skipping {}: no subject id", path.display()),
            Err(e) => warn!("Could not load {}: {}", path.display(), e),
        }
    }

    if records.is_empty() {
        let csv_files = sorted_entries(dir, |p| file_name(p).ends_with("_coding_results.csv"))?;
        if let Some(csv_path) = csv_files.first() {
            info!("No JSON records in {}, reading {}", dir.display(), csv_path.display());
            records = load_csv_records(csv_path)?
                .into_iter()
                .map(|r| (r.subject_id.clone(), r))
                .collect();
        }
    }

    info!("Loaded {} records for {} from {}", records.len(), name, dir.display());
    Ok(RaterResults {
        name: name.to_string(),
        source: dir.to_path_buf(),
        records,
    })
}

/// Positive binary codes become 1; zero stays 0 and negatives pass through.
fn binarize(value: RatingValue) -> RatingValue {
    if value.get() > 0.0 {
        RatingValue::ONE
    } else {
        value
    }
}

fn coerce(
    raw: Option<&serde_json::Value>,
    var_type: VariableType,
    config: &InputConfig,
) -> (Rating, bool) {
    let parsed = raw.map(parse_rating).unwrap_or(ParsedRating::Empty);
    let invalid = parsed.is_invalid();
    let rating = parsed.into_rating().map(|v| {
        if config.binarize && var_type == VariableType::Binary {
            binarize(v)
        } else {
            v
        }
    });
    (rating, invalid)
}

/// Build a rating table over every subject any rater coded, sorted by id.
/// Only schema variables are read; raw values that fail to parse become
/// Missing. Each analysis later narrows to the subjects its own raters
/// share.
pub fn build_table(
    schema: &Schema,
    raters: &[RaterResults],
    config: &InputConfig,
) -> Result<RatingTable> {
    let names: Vec<String> = raters.iter().map(|r| r.name.clone()).collect();
    if let Some(dup) = names
        .iter()
        .enumerate()
        .find_map(|(i, n)| names[..i].contains(n).then_some(n))
    {
        return Err(Error::Structure(format!("rater name '{dup}' used twice")));
    }

    let subjects: BTreeSet<&String> = raters.iter().flat_map(|r| r.records.keys()).collect();
    let n_shared = subjects
        .iter()
        .filter(|id| raters.iter().all(|r| r.records.contains_key(**id)))
        .count();
    if n_shared == 0 {
        warn!("No subject was coded by all {} raters", raters.len());
    }
    info!(
        "{} subjects coded, {} by all {} raters",
        subjects.len(),
        n_shared,
        raters.len()
    );

    let mut builder = RatingTable::builder(schema.clone(), names);
    let mut n_invalid = 0usize;
    for id in &subjects {
        let subject_name = raters
            .iter()
            .find_map(|r| r.records.get(*id))
            .map(|r| r.subject_name.clone())
            .unwrap_or_else(|| id.to_string());
        builder.subject(Subject::new(id.as_str(), subject_name));
        let subject_id = SubjectId::new(id.as_str());

        for rater in raters {
            let Some(record) = rater.records.get(*id) else {
                continue;
            };
            for (variable, var_type) in schema.iter() {
                let (rating, invalid) = coerce(record.get(variable), var_type, config);
                if invalid {
                    n_invalid += 1;
                    debug!(
                        "{}: unparseable {} value {:?} for {}",
                        rater.name,
                        variable,
                        record.get(variable),
                        id
                    );
                }
                builder.rate(&subject_id, variable, &rater.name, rating)?;
            }
        }
    }
    if n_invalid > 0 {
        warn!("{} raw values could not be parsed and were treated as missing", n_invalid);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;
    use indoc::indoc;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(id: &str, values: serde_json::Value) -> FlatRecord {
        flatten_record(&json!({"platform_id": id, "variables": values})).unwrap()
    }

    fn schema() -> Schema {
        Schema::new()
            .with("DOCS", VariableType::Binary)
            .with("METH", VariableType::Count)
    }

    #[test]
    fn test_build_table_keeps_every_coded_subject() {
        let a = RaterResults::new(
            "A",
            [
                record("VG2", json!({"DOCS": 1})),
                record("VG1", json!({"DOCS": 0})),
                record("VG9", json!({"DOCS": 1})),
            ],
        );
        let b = RaterResults::new(
            "B",
            [record("VG1", json!({"DOCS": 0})), record("VG2", json!({"DOCS": "1"}))],
        );
        let table = build_table(&schema(), &[a, b], &InputConfig::default()).unwrap();
        let ids: Vec<_> = table.subjects().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["VG1", "VG2", "VG9"]);
        let docs = table.matrix("DOCS").unwrap();
        assert_eq!(docs.rows()[1], vec![rating(1.0), rating(1.0)]);
        assert_eq!(docs.rows()[2], vec![rating(1.0), None]);
        assert!(table.is_coded(2, 0));
        assert!(!table.is_coded(2, 1));
        assert_eq!(table.shared_subjects().subjects().len(), 2);
    }

    #[test]
    fn test_invalid_values_become_missing() {
        let a = RaterResults::new("A", [record("VG1", json!({"METH": "abc"}))]);
        let b = RaterResults::new("B", [record("VG1", json!({"METH": 3}))]);
        let table = build_table(&schema(), &[a, b], &InputConfig::default()).unwrap();
        assert_eq!(table.matrix("METH").unwrap().rows()[0], vec![None, rating(3.0)]);
    }

    #[test]
    fn test_binarize_only_touches_binary_variables() {
        let a = RaterResults::new("A", [record("VG1", json!({"DOCS": 3, "METH": 3}))]);
        let b = RaterResults::new("B", [record("VG1", json!({"DOCS": 0, "METH": 2}))]);
        let config = InputConfig { binarize: true };
        let table = build_table(&schema(), &[a, b], &config).unwrap();
        assert_eq!(table.matrix("DOCS").unwrap().rows()[0], vec![rating(1.0), rating(0.0)]);
        assert_eq!(table.matrix("METH").unwrap().rows()[0], vec![rating(3.0), rating(2.0)]);
    }

    #[test]
    fn test_duplicate_rater_names_rejected() {
        let a = RaterResults::new("A", [record("VG1", json!({}))]);
        let err = build_table(&schema(), &[a.clone(), a], &InputConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_load_rater_dir_reads_json_and_skips_summary() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("VG1.json"),
            r#"{"platform_id": "VG1", "platform_name": "Acme", "application": {"DOCS": 1}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("coding_summary.json"), r#"{"platform_id": "ALL"}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{not json").unwrap();

        let results = load_rater_dir(dir.path(), "Claude").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.records["VG1"].subject_name, "Acme");
    }

    #[test]
    fn test_load_rater_dir_falls_back_to_csv() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("human_coding_results.csv"),
            indoc! {"
                platform_ID,platform_name,DOCS,METH
                VG1,Acme,1,4
                VG2,Beta,,2
            "},
        )
        .unwrap();
        let results = load_rater_dir(dir.path(), "Human").unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results.records["VG2"].get("DOCS"), Some(&json!("")));
    }

    #[test]
    fn test_load_rater_dir_requires_directory() {
        let dir = TempDir::new().unwrap();
        let err = load_rater_dir(&dir.path().join("missing"), "X").unwrap_err();
        assert!(matches!(err, Error::Input { .. }));
    }
}
