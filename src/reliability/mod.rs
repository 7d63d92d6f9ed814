//! Reliability statistics engine.
//!
//! Pure functions over aligned rating sequences. Nothing here allocates
//! shared state or performs I/O, so variables and rater pairs can be
//! computed in any order or in parallel.

pub mod categories;
pub mod icc;
pub mod krippendorff;
pub mod multi;
pub mod pairwise;

pub use icc::{icc, icc_pair, TwoWayAnova};
pub use krippendorff::{krippendorff_alpha, krippendorff_alpha_pair};
pub use multi::{fleiss_kappa, gwet_ac1_multi};
pub use pairwise::{cohen_kappa, gwet_ac1, percent_agreement};

use crate::core::{Rating, RatingMatrix, Statistic, VariableType};
use serde::{Deserialize, Serialize};

/// Every two-rater statistic for one variable.
///
/// Statistics that do not apply to the variable type are `Missing(NoData)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairwiseStatistics {
    pub n_valid: usize,
    pub agreement: Statistic,
    pub kappa: Statistic,
    pub gwet_ac1: Statistic,
    pub kripp_alpha: Statistic,
    pub icc: Statistic,
}

pub fn pairwise_statistics(var_type: VariableType, a: &[Rating], b: &[Rating]) -> PairwiseStatistics {
    let n_valid = categories::valid_pairs(a, b).len();
    let agreement = percent_agreement(a, b);
    let kripp_alpha = krippendorff_alpha_pair(a, b, var_type.distance_level());

    if var_type.is_categorical() {
        PairwiseStatistics {
            n_valid,
            agreement,
            kappa: cohen_kappa(a, b),
            gwet_ac1: gwet_ac1(a, b),
            kripp_alpha,
            icc: Statistic::NO_DATA,
        }
    } else {
        PairwiseStatistics {
            n_valid,
            agreement,
            kappa: Statistic::NO_DATA,
            gwet_ac1: Statistic::NO_DATA,
            kripp_alpha,
            icc: icc_pair(a, b),
        }
    }
}

/// Every k-rater chance-corrected statistic for one variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiRaterStatistics {
    pub n_complete: usize,
    pub fleiss_kappa: Statistic,
    pub gwet_ac1: Statistic,
    pub kripp_alpha: Statistic,
    pub icc: Statistic,
}

pub fn multi_rater_statistics(matrix: &RatingMatrix) -> MultiRaterStatistics {
    let rows = matrix.rows();
    let var_type = matrix.var_type();
    let n_complete = matrix.complete_rows().count();
    let kripp_alpha = krippendorff_alpha(rows, var_type.distance_level());

    if var_type.is_categorical() {
        MultiRaterStatistics {
            n_complete,
            fleiss_kappa: fleiss_kappa(rows),
            gwet_ac1: gwet_ac1_multi(rows),
            kripp_alpha,
            icc: Statistic::NO_DATA,
        }
    } else {
        MultiRaterStatistics {
            n_complete,
            fleiss_kappa: Statistic::NO_DATA,
            gwet_ac1: Statistic::NO_DATA,
            kripp_alpha,
            icc: icc(rows),
        }
    }
}
