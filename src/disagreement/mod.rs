//! Subject-level disagreement detection and agreement-level classification.

use crate::core::{Rating, RatingMatrix, RatingValue, Statistic, SubjectId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One subject on which the raters' non-missing values differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disagreement {
    pub variable: String,
    pub subject_id: SubjectId,
    pub subject_name: String,
    /// Every rater's raw value, including Missing ones, in rater order
    pub values: Vec<(String, Rating)>,
}

/// Records subjects with at least two non-missing values that are not all
/// equal.
pub fn find_disagreements(matrix: &RatingMatrix) -> Vec<Disagreement> {
    matrix
        .rows()
        .iter()
        .zip(matrix.subjects())
        .filter(|(row, _)| disagrees(row))
        .map(|(row, subject)| Disagreement {
            variable: matrix.variable().to_string(),
            subject_id: subject.id.clone(),
            subject_name: subject.name.clone(),
            values: matrix
                .raters()
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect(),
        })
        .collect()
}

fn disagrees(row: &[Rating]) -> bool {
    let mut present = row.iter().flatten();
    match (present.next(), present.clone().next()) {
        (Some(first), Some(_)) => present.any(|v| v != first),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementLevel {
    AllAgree,
    /// Strictly more than half of the raters share the modal value
    MajorityAgree,
    NoneAgree,
}

/// Classifies a complete row. `None` if any rating is missing or fewer than
/// three raters are present.
pub fn classify(row: &[Rating]) -> Option<AgreementLevel> {
    if row.len() < 3 {
        return None;
    }
    let values: Vec<RatingValue> = row.iter().copied().collect::<Option<_>>()?;
    let modal = values
        .iter()
        .fold(BTreeMap::<RatingValue, usize>::new(), |mut acc, v| {
            *acc.entry(*v).or_default() += 1;
            acc
        })
        .into_values()
        .max()
        .unwrap_or(0);

    Some(if modal == values.len() {
        AgreementLevel::AllAgree
    } else if modal * 2 > values.len() {
        AgreementLevel::MajorityAgree
    } else {
        AgreementLevel::NoneAgree
    })
}

/// Counts of complete subjects per agreement level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelBreakdown {
    pub all: usize,
    pub majority: usize,
    pub none: usize,
}

impl LevelBreakdown {
    pub fn from_matrix(matrix: &RatingMatrix) -> Self {
        matrix
            .rows()
            .iter()
            .filter_map(|row| classify(row))
            .fold(Self::default(), |acc, level| acc.record(level))
    }

    fn record(mut self, level: AgreementLevel) -> Self {
        match level {
            AgreementLevel::AllAgree => self.all += 1,
            AgreementLevel::MajorityAgree => self.majority += 1,
            AgreementLevel::NoneAgree => self.none += 1,
        }
        self
    }

    pub fn total(&self) -> usize {
        self.all + self.majority + self.none
    }

    /// all-agree / total
    pub fn full_agreement_rate(&self) -> Statistic {
        self.rate(self.all)
    }

    /// (all-agree + majority-agree) / total
    pub fn majority_agreement_rate(&self) -> Statistic {
        self.rate(self.all + self.majority)
    }

    fn rate(&self, count: usize) -> Statistic {
        match self.total() {
            0 => Statistic::NO_DATA,
            total => Statistic::value(count as f64 / total as f64),
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            all: self.all + other.all,
            majority: self.majority + other.majority,
            none: self.none + other.none,
        }
    }
}

/// Flat export row for adjudication spreadsheets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisagreementRow {
    pub variable: String,
    pub subject_id: String,
    pub subject_name: String,
    /// One cell per rater, empty for Missing
    pub values: Vec<String>,
}

pub fn disagreement_rows<'a>(
    disagreements: impl IntoIterator<Item = &'a Disagreement>,
) -> Vec<DisagreementRow> {
    disagreements
        .into_iter()
        .map(|d| DisagreementRow {
            variable: d.variable.clone(),
            subject_id: d.subject_id.to_string(),
            subject_name: d.subject_name.clone(),
            values: d
                .values
                .iter()
                .map(|(_, v)| v.map(|v| v.to_string()).unwrap_or_default())
                .collect(),
        })
        .collect()
}
