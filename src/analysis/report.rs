//! The top-level report handed to writers.

use super::results::{MultiRaterAnalysis, PairwiseAnalysis};
use crate::aggregation::{summarize, StatSummary};
use crate::core::Statistic;
use serde::{Deserialize, Serialize};

/// One variable's row of the side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub variable: String,
    /// Percent agreement per rater pair, in `ComparisonMatrix::pairs` order
    pub pairwise: Vec<Statistic>,
    /// Share of complete subjects on which every rater agreed
    pub full_agreement: Statistic,
}

/// Every pairwise agreement next to the k-way full agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMatrix {
    pub pairs: Vec<String>,
    pub rows: Vec<ComparisonRow>,
    pub overall_pairwise: Vec<StatSummary>,
    pub overall_full_agreement: StatSummary,
}

impl ComparisonMatrix {
    /// Rows follow the multi-rater analysis' variable order.
    pub fn build(pairs: &[PairwiseAnalysis], multi: &MultiRaterAnalysis) -> Self {
        let rows: Vec<ComparisonRow> = multi
            .variables
            .iter()
            .map(|var| ComparisonRow {
                variable: var.variable.clone(),
                pairwise: pairs
                    .iter()
                    .map(|p| {
                        p.variable(&var.variable)
                            .map(|v| v.agreement)
                            .unwrap_or(Statistic::NO_DATA)
                    })
                    .collect(),
                full_agreement: var.full_agreement,
            })
            .collect();

        let overall_pairwise = (0..pairs.len())
            .map(|i| summarize(rows.iter().map(|r| &r.pairwise[i])))
            .collect();

        Self {
            pairs: pairs.iter().map(PairwiseAnalysis::label).collect(),
            overall_full_agreement: summarize(rows.iter().map(|r| &r.full_agreement)),
            overall_pairwise,
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReliabilityReport {
    Pairwise(PairwiseAnalysis),
    MultiRater {
        pairs: Vec<PairwiseAnalysis>,
        multi: MultiRaterAnalysis,
        comparison: ComparisonMatrix,
    },
}

impl ReliabilityReport {
    pub fn raters(&self) -> Vec<String> {
        match self {
            Self::Pairwise(p) => vec![p.rater_a.clone(), p.rater_b.clone()],
            Self::MultiRater { multi, .. } => multi.raters.clone(),
        }
    }

    pub fn n_subjects(&self) -> usize {
        match self {
            Self::Pairwise(p) => p.summary.n_subjects,
            Self::MultiRater { multi, .. } => multi.summary.n_subjects,
        }
    }

    pub fn pairwise(&self) -> &[PairwiseAnalysis] {
        match self {
            Self::Pairwise(p) => std::slice::from_ref(p),
            Self::MultiRater { pairs, .. } => pairs,
        }
    }

    pub fn multi(&self) -> Option<&MultiRaterAnalysis> {
        match self {
            Self::Pairwise(_) => None,
            Self::MultiRater { multi, .. } => Some(multi),
        }
    }

    pub fn comparison(&self) -> Option<&ComparisonMatrix> {
        match self {
            Self::Pairwise(_) => None,
            Self::MultiRater { comparison, .. } => Some(comparison),
        }
    }
}
