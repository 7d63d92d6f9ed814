//! Per-variable result records and the per-run analyses that hold them.

use crate::aggregation::{MultiRaterSummary, PairwiseSummary};
use crate::core::{RatingMatrix, Statistic, VariableType};
use crate::disagreement::{find_disagreements, Disagreement, LevelBreakdown};
use crate::reliability::{multi_rater_statistics, pairwise_statistics};
use serde::{Deserialize, Serialize};

/// Two-rater statistics for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseVariableResult {
    pub variable: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub n_valid: usize,
    pub agreement: Statistic,
    pub kappa: Statistic,
    pub gwet_ac1: Statistic,
    pub kripp_alpha: Statistic,
    pub icc: Statistic,
    pub n_disagreements: usize,
    pub disagreements: Vec<Disagreement>,
}

impl PairwiseVariableResult {
    /// Computes every statistic from a two-column matrix. Columns beyond
    /// the second are ignored.
    pub fn from_matrix(matrix: &RatingMatrix) -> Self {
        let (a, b) = (matrix.column(0), matrix.column(1));
        let stats = pairwise_statistics(matrix.var_type(), &a, &b);
        let disagreements = find_disagreements(matrix);

        Self {
            variable: matrix.variable().to_string(),
            var_type: matrix.var_type(),
            n_valid: stats.n_valid,
            agreement: stats.agreement,
            kappa: stats.kappa,
            gwet_ac1: stats.gwet_ac1,
            kripp_alpha: stats.kripp_alpha,
            icc: stats.icc,
            n_disagreements: disagreements.len(),
            disagreements,
        }
    }

    /// Kappa for categorical variables, ICC for counts.
    pub fn primary_coefficient(&self) -> &Statistic {
        if self.var_type.is_categorical() {
            &self.kappa
        } else {
            &self.icc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseAnalysis {
    pub rater_a: String,
    pub rater_b: String,
    pub variables: Vec<PairwiseVariableResult>,
    pub summary: PairwiseSummary,
}

impl PairwiseAnalysis {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.rater_a, self.rater_b)
    }

    pub fn variable(&self, name: &str) -> Option<&PairwiseVariableResult> {
        self.variables.iter().find(|v| v.variable == name)
    }

    pub fn disagreements(&self) -> impl Iterator<Item = &Disagreement> {
        self.variables.iter().flat_map(|v| v.disagreements.iter())
    }
}

/// k-rater statistics for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRaterVariableResult {
    pub variable: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Subjects rated by every rater
    pub n_complete: usize,
    pub full_agreement: Statistic,
    pub majority_agreement: Statistic,
    pub levels: LevelBreakdown,
    pub fleiss_kappa: Statistic,
    pub gwet_ac1: Statistic,
    pub kripp_alpha: Statistic,
    pub icc: Statistic,
    pub n_disagreements: usize,
    pub disagreements: Vec<Disagreement>,
}

impl MultiRaterVariableResult {
    pub fn from_matrix(matrix: &RatingMatrix) -> Self {
        let stats = multi_rater_statistics(matrix);
        let levels = LevelBreakdown::from_matrix(matrix);
        let disagreements = find_disagreements(matrix);

        Self {
            variable: matrix.variable().to_string(),
            var_type: matrix.var_type(),
            n_complete: stats.n_complete,
            full_agreement: levels.full_agreement_rate(),
            majority_agreement: levels.majority_agreement_rate(),
            levels,
            fleiss_kappa: stats.fleiss_kappa,
            gwet_ac1: stats.gwet_ac1,
            kripp_alpha: stats.kripp_alpha,
            icc: stats.icc,
            n_disagreements: disagreements.len(),
            disagreements,
        }
    }

    pub fn primary_coefficient(&self) -> &Statistic {
        if self.var_type.is_categorical() {
            &self.fleiss_kappa
        } else {
            &self.icc
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRaterAnalysis {
    pub raters: Vec<String>,
    pub variables: Vec<MultiRaterVariableResult>,
    pub summary: MultiRaterSummary,
}

impl MultiRaterAnalysis {
    pub fn variable(&self, name: &str) -> Option<&MultiRaterVariableResult> {
        self.variables.iter().find(|v| v.variable == name)
    }

    pub fn disagreements(&self) -> impl Iterator<Item = &Disagreement> {
        self.variables.iter().flat_map(|v| v.disagreements.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;

    #[test]
    fn test_pairwise_result_counts_disagreements() {
        let matrix = RatingMatrix::from_columns(
            VariableType::Binary,
            &[
                vec![rating(1.0), rating(1.0), rating(0.0), rating(0.0), rating(1.0)],
                vec![rating(1.0), rating(0.0), rating(0.0), rating(0.0), rating(1.0)],
            ],
        )
        .unwrap();
        let result = PairwiseVariableResult::from_matrix(&matrix);
        assert_eq!(result.n_valid, 5);
        assert_eq!(result.agreement, Statistic::Value(0.8));
        assert_eq!(result.n_disagreements, 1);
        assert_eq!(result.disagreements[0].subject_id.as_str(), "S2");
        assert_eq!(result.primary_coefficient(), &result.kappa);
    }

    #[test]
    fn test_multi_result_level_rates() {
        let matrix = RatingMatrix::from_columns(
            VariableType::Binary,
            &[
                vec![rating(1.0), rating(1.0), rating(0.0)],
                vec![rating(1.0), rating(1.0), rating(0.0)],
                vec![rating(0.0), rating(1.0), rating(0.0)],
            ],
        )
        .unwrap();
        let result = MultiRaterVariableResult::from_matrix(&matrix);
        assert_eq!(result.n_complete, 3);
        assert_eq!(result.full_agreement, Statistic::Value(2.0 / 3.0));
        assert_eq!(result.majority_agreement, Statistic::Value(1.0));
        assert_eq!(result.n_disagreements, 1);
    }
}
