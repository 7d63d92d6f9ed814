//! Inter-rater reliability for multi-coder annotation studies.
//!
//! Several raters code the same subjects against a shared schema of
//! binary, count and ordinal variables. [`analysis::analyze`] computes
//! pairwise and all-rater agreement statistics for every variable, rolls
//! them up into summaries and collects the disagreements worth
//! adjudicating.

// Export modules for library usage
pub mod aggregation;
pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod disagreement;
pub mod formatting;
pub mod input;
pub mod io;
pub mod reliability;

// Re-export commonly used types
pub use crate::core::{
    rating, Error, Rating, RatingMatrix, RatingTable, RatingTableBuilder, RatingValue, Result,
    Schema, Statistic, Subject, SubjectId, VariableType,
};

pub use crate::analysis::{
    analyze, analyze_multi, analyze_pair, AnalysisConfig, MultiRaterAnalysis, PairwiseAnalysis,
    ReliabilityReport,
};

pub use crate::aggregation::{Interpretation, MultiRaterSummary, PairwiseSummary, StatSummary};

pub use crate::disagreement::{AgreementLevel, Disagreement, LevelBreakdown};

pub use crate::reliability::{
    multi_rater_statistics, pairwise_statistics, MultiRaterStatistics, PairwiseStatistics,
};

pub use crate::config::{load_config, ConcordanceConfig};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
