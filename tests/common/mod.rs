// Shared fixtures for concordance integration tests
#![allow(dead_code)]

use concordance::{rating, Rating, RatingTable, Schema, Subject, SubjectId};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

pub fn ratings(values: &[f64]) -> Vec<Rating> {
    values.iter().map(|v| rating(*v)).collect()
}

pub fn partial(values: &[Option<f64>]) -> Vec<Rating> {
    values.iter().map(|v| v.and_then(rating)).collect()
}

/// Rows of `[rater values]` per subject for one variable.
pub fn rows(values: &[&[f64]]) -> Vec<Vec<Rating>> {
    values.iter().map(|row| ratings(row)).collect()
}

/// Builds a table from `(subject, variable, one value per rater)` triples.
pub fn table(schema: Schema, raters: &[&str], data: &[(&str, &str, Vec<Rating>)]) -> RatingTable {
    let mut builder =
        RatingTable::builder(schema, raters.iter().map(|r| r.to_string()).collect());
    let mut seen: Vec<&str> = Vec::new();
    for (subject, _, _) in data {
        if !seen.contains(subject) {
            builder.subject(Subject::anonymous(*subject));
            seen.push(*subject);
        }
    }
    for (subject, variable, values) in data {
        for (rater, value) in raters.iter().zip(values) {
            builder
                .rate(&SubjectId::new(*subject), variable, rater, *value)
                .unwrap();
        }
    }
    builder.build().unwrap()
}

/// Writes one `<id>.json` coding record per subject into `root/name`.
pub fn write_rater_dir(root: &Path, name: &str, records: &[(&str, Value)]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (id, variables) in records {
        let record = serde_json::json!({
            "platform_id": id,
            "platform_name": format!("Platform {id}"),
            "variables": variables,
        });
        fs::write(
            dir.join(format!("{id}.json")),
            serde_json::to_string_pretty(&record).unwrap(),
        )
        .unwrap();
    }
    dir
}
