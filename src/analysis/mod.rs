//! Analysis pipeline: rating table in, reliability report out.
//!
//! Variables are fanned out (optionally on rayon's pool), each producing an
//! independent result record. The records are collected in schema order and
//! then reduced once into the dataset summary.

pub mod report;
pub mod results;

pub use report::{ComparisonMatrix, ComparisonRow, ReliabilityReport};
pub use results::{
    MultiRaterAnalysis, MultiRaterVariableResult, PairwiseAnalysis, PairwiseVariableResult,
};

use crate::aggregation::{summarize_multi, summarize_pairwise};
use crate::config::{ParallelConfig, DEFAULT_LOW_AGREEMENT};
use crate::core::{Error, RatingMatrix, RatingTable, Result, SubjectId};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub parallel: ParallelConfig,
    /// Variables whose raw agreement falls below this are flagged
    pub low_agreement: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            parallel: ParallelConfig::default(),
            low_agreement: DEFAULT_LOW_AGREEMENT,
        }
    }
}

impl AnalysisConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: ParallelConfig::sequential(),
            ..Default::default()
        }
    }
}

fn map_variables<T, F>(matrices: &[RatingMatrix], parallel: &ParallelConfig, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(&RatingMatrix) -> T + Sync + Send,
{
    if parallel.enabled {
        matrices.par_iter().map(f).collect()
    } else {
        matrices.iter().map(f).collect()
    }
}

fn subject_ids(table: &RatingTable) -> Vec<SubjectId> {
    table.subjects().iter().map(|s| s.id.clone()).collect()
}

/// Two-rater analysis of every schema variable, over the subjects both
/// raters coded.
pub fn analyze_pair(
    table: &RatingTable,
    rater_a: &str,
    rater_b: &str,
    config: &AnalysisConfig,
) -> Result<PairwiseAnalysis> {
    let projected = table.select_raters(&[rater_a, rater_b])?.shared_subjects();
    let matrices = projected.matrices()?;
    info!(
        "Analyzing {} variables for {} vs {} over {} subjects",
        matrices.len(),
        rater_a,
        rater_b,
        projected.subjects().len()
    );

    let variables = map_variables(&matrices, &config.parallel, |matrix| {
        let result = PairwiseVariableResult::from_matrix(matrix);
        debug!(
            "{} ({}): n_valid={} agreement={}",
            result.variable,
            result.var_type,
            result.n_valid,
            result.agreement.display(3)
        );
        result
    });

    let summary = summarize_pairwise(
        rater_a,
        rater_b,
        &subject_ids(&projected),
        &variables,
        config.low_agreement,
    );

    Ok(PairwiseAnalysis {
        rater_a: rater_a.to_string(),
        rater_b: rater_b.to_string(),
        variables,
        summary,
    })
}

/// k-rater analysis over the subjects every rater coded; requires at least
/// three raters.
pub fn analyze_multi(table: &RatingTable, config: &AnalysisConfig) -> Result<MultiRaterAnalysis> {
    let table = &table.shared_subjects();
    let raters = table.raters();
    if raters.len() < 3 {
        return Err(Error::Structure(format!(
            "multi-rater analysis needs at least three raters, got {}",
            raters.len()
        )));
    }
    let matrices = table.matrices()?;
    info!(
        "Analyzing {} variables across {} raters over {} subjects",
        matrices.len(),
        raters.len(),
        table.subjects().len()
    );

    let variables = map_variables(&matrices, &config.parallel, |matrix| {
        let result = MultiRaterVariableResult::from_matrix(matrix);
        debug!(
            "{} ({}): n_complete={} full_agreement={}",
            result.variable,
            result.var_type,
            result.n_complete,
            result.full_agreement.display(3)
        );
        result
    });

    let summary = summarize_multi(
        raters,
        &subject_ids(table),
        &variables,
        config.low_agreement,
    );

    Ok(MultiRaterAnalysis {
        raters: raters.to_vec(),
        variables,
        summary,
    })
}

/// Full report: a single pairwise analysis for two raters; every pair plus
/// the k-way analysis and comparison matrix for three or more.
pub fn analyze(table: &RatingTable, config: &AnalysisConfig) -> Result<ReliabilityReport> {
    let raters = table.raters();
    match raters.len() {
        0 | 1 => Err(Error::Structure(format!(
            "reliability needs at least two raters, got {}",
            raters.len()
        ))),
        2 => analyze_pair(table, &raters[0], &raters[1], config).map(ReliabilityReport::Pairwise),
        _ => {
            let pairs = rater_pairs(raters)
                .map(|(a, b)| analyze_pair(table, a, b, config))
                .collect::<Result<Vec<_>>>()?;
            let multi = analyze_multi(table, config)?;
            let comparison = ComparisonMatrix::build(&pairs, &multi);
            Ok(ReliabilityReport::MultiRater {
                pairs,
                multi,
                comparison,
            })
        }
    }
}

/// Every unordered rater pair, in rater order.
pub fn rater_pairs(raters: &[String]) -> impl Iterator<Item = (&str, &str)> {
    raters.iter().enumerate().flat_map(move |(i, a)| {
        raters[i + 1..]
            .iter()
            .map(move |b| (a.as_str(), b.as_str()))
    })
}
