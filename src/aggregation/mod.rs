//! Dataset-level roll-ups of per-variable statistics.
//!
//! Means are taken over `Value` results only. Undefined, Missing and
//! insufficient-sample results are counted, never averaged as zero.

pub mod interpretation;

pub use interpretation::{interpretation_label, Interpretation};

use crate::analysis::{MultiRaterVariableResult, PairwiseVariableResult};
use crate::core::{Bucket, Statistic, SubjectId};
use crate::disagreement::LevelBreakdown;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatSummary {
    pub mean: Option<f64>,
    pub n_valid: usize,
    pub n_undefined: usize,
    pub n_missing: usize,
    pub n_insufficient: usize,
}

impl StatSummary {
    pub fn interpretation(&self) -> Option<Interpretation> {
        self.mean.map(Interpretation::of)
    }

    /// Number of entries excluded from the mean.
    pub fn n_excluded(&self) -> usize {
        self.n_undefined + self.n_missing + self.n_insufficient
    }

    pub fn display(&self, precision: usize) -> String {
        self.mean
            .map(|m| format!("{m:.precision$}"))
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn display_percent(&self) -> String {
        self.mean
            .map(|m| format!("{:.1}%", m * 100.0))
            .unwrap_or_else(|| "N/A".to_string())
    }
}

/// Single reducer pass over a set of statistic results.
pub fn summarize<'a>(stats: impl IntoIterator<Item = &'a Statistic>) -> StatSummary {
    let (sum, summary) = stats.into_iter().fold(
        (0.0, StatSummary::default()),
        |(sum, mut acc), stat| {
            let sum = match stat.bucket() {
                Bucket::Valid => {
                    acc.n_valid += 1;
                    sum + stat.as_value().unwrap_or(0.0)
                }
                Bucket::Undefined => {
                    acc.n_undefined += 1;
                    sum
                }
                Bucket::Missing => {
                    acc.n_missing += 1;
                    sum
                }
                Bucket::InsufficientSample => {
                    acc.n_insufficient += 1;
                    sum
                }
            };
            (sum, acc)
        },
    );
    StatSummary {
        mean: (summary.n_valid > 0).then(|| sum / summary.n_valid as f64),
        ..summary
    }
}

/// A variable whose raw agreement fell below the configured threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlaggedVariable {
    pub variable: String,
    pub agreement: f64,
    pub n_disagreements: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseSummary {
    pub rater_a: String,
    pub rater_b: String,
    pub n_subjects: usize,
    pub subject_ids: Vec<SubjectId>,
    pub n_variables: usize,
    pub agreement: StatSummary,
    pub kappa: StatSummary,
    pub gwet_ac1: StatSummary,
    pub kripp_alpha: StatSummary,
    pub icc: StatSummary,
    pub n_disagreements: usize,
    pub low_agreement_threshold: f64,
    pub low_agreement: Vec<FlaggedVariable>,
}

/// Applicable statistics only: Kappa/AC1 over categorical variables, ICC
/// over count variables. `NoData` placeholders for inapplicable types are
/// skipped so they do not inflate the missing counts.
pub fn summarize_pairwise(
    rater_a: &str,
    rater_b: &str,
    subject_ids: &[SubjectId],
    variables: &[PairwiseVariableResult],
    low_agreement_threshold: f64,
) -> PairwiseSummary {
    let categorical = || variables.iter().filter(|v| v.var_type.is_categorical());
    let counts = || variables.iter().filter(|v| !v.var_type.is_categorical());

    PairwiseSummary {
        rater_a: rater_a.to_string(),
        rater_b: rater_b.to_string(),
        n_subjects: subject_ids.len(),
        subject_ids: subject_ids.to_vec(),
        n_variables: variables.len(),
        agreement: summarize(variables.iter().map(|v| &v.agreement)),
        kappa: summarize(categorical().map(|v| &v.kappa)),
        gwet_ac1: summarize(categorical().map(|v| &v.gwet_ac1)),
        kripp_alpha: summarize(variables.iter().map(|v| &v.kripp_alpha)),
        icc: summarize(counts().map(|v| &v.icc)),
        n_disagreements: variables.iter().map(|v| v.n_disagreements).sum(),
        low_agreement_threshold,
        low_agreement: flag_low_agreement(
            variables
                .iter()
                .map(|v| (&v.variable, &v.agreement, v.n_disagreements)),
            low_agreement_threshold,
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRaterSummary {
    pub raters: Vec<String>,
    pub n_subjects: usize,
    pub subject_ids: Vec<SubjectId>,
    pub n_variables: usize,
    pub full_agreement: StatSummary,
    pub majority_agreement: StatSummary,
    pub fleiss_kappa: StatSummary,
    pub gwet_ac1: StatSummary,
    pub kripp_alpha: StatSummary,
    pub icc: StatSummary,
    /// Agreement levels summed over every variable's complete subjects
    pub levels: LevelBreakdown,
    pub n_disagreements: usize,
    pub low_agreement_threshold: f64,
    pub low_agreement: Vec<FlaggedVariable>,
}

pub fn summarize_multi(
    raters: &[String],
    subject_ids: &[SubjectId],
    variables: &[MultiRaterVariableResult],
    low_agreement_threshold: f64,
) -> MultiRaterSummary {
    let categorical = || variables.iter().filter(|v| v.var_type.is_categorical());
    let counts = || variables.iter().filter(|v| !v.var_type.is_categorical());

    MultiRaterSummary {
        raters: raters.to_vec(),
        n_subjects: subject_ids.len(),
        subject_ids: subject_ids.to_vec(),
        n_variables: variables.len(),
        full_agreement: summarize(variables.iter().map(|v| &v.full_agreement)),
        majority_agreement: summarize(variables.iter().map(|v| &v.majority_agreement)),
        fleiss_kappa: summarize(categorical().map(|v| &v.fleiss_kappa)),
        gwet_ac1: summarize(categorical().map(|v| &v.gwet_ac1)),
        kripp_alpha: summarize(variables.iter().map(|v| &v.kripp_alpha)),
        icc: summarize(counts().map(|v| &v.icc)),
        levels: variables
            .iter()
            .fold(LevelBreakdown::default(), |acc, v| acc.merge(v.levels)),
        n_disagreements: variables.iter().map(|v| v.n_disagreements).sum(),
        low_agreement_threshold,
        low_agreement: flag_low_agreement(
            variables
                .iter()
                .map(|v| (&v.variable, &v.full_agreement, v.n_disagreements)),
            low_agreement_threshold,
        ),
    }
}

fn flag_low_agreement<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Statistic, usize)>,
    threshold: f64,
) -> Vec<FlaggedVariable> {
    entries
        .filter_map(|(variable, agreement, n_disagreements)| {
            let agreement = agreement.as_value()?;
            (agreement < threshold).then(|| FlaggedVariable {
                variable: variable.clone(),
                agreement,
                n_disagreements,
            })
        })
        .collect()
}
