//! Chance-corrected agreement for three or more raters.
//!
//! Fleiss' Kappa and the multi-rater AC1 share the subject × category count
//! matrix built from subjects rated by every rater; partial rows are
//! dropped. They differ only in the chance-agreement model.

use super::categories::{ac1_chance_agreement, chance_corrected, complete_rows, CountMatrix};
use crate::core::{Degeneracy, Rating, Statistic};

/// Minimum complete subjects for Fleiss' Kappa and multi-rater AC1.
pub const MIN_COMPLETE_SUBJECTS: usize = 2;

fn count_matrix(rows: &[Vec<Rating>]) -> Result<CountMatrix, Statistic> {
    let complete = complete_rows(rows);
    if complete.len() < MIN_COMPLETE_SUBJECTS {
        return Err(Statistic::insufficient(
            MIN_COMPLETE_SUBJECTS,
            complete.len(),
        ));
    }
    let matrix = CountMatrix::from_rows(&complete);
    if matrix.raters < 2 {
        return Err(Statistic::NO_DATA);
    }
    if matrix.n_categories() < 2 {
        return Err(Statistic::undefined(Degeneracy::SingleCategory));
    }
    Ok(matrix)
}

/// Fleiss' Kappa: chance agreement is the sum of squared pooled marginals.
pub fn fleiss_kappa(rows: &[Vec<Rating>]) -> Statistic {
    let matrix = match count_matrix(rows) {
        Ok(matrix) => matrix,
        Err(stat) => return stat,
    };
    let observed = matrix.mean_observed_agreement();
    let chance: f64 = matrix.marginal_proportions().iter().map(|p| p * p).sum();
    match chance_corrected(observed, chance) {
        Some(kappa) => Statistic::value(kappa),
        None => Statistic::undefined(Degeneracy::ChanceAgreementIsOne),
    }
}

/// Multi-rater Gwet's AC1: Fleiss' observed agreement with AC1's chance term.
pub fn gwet_ac1_multi(rows: &[Vec<Rating>]) -> Statistic {
    let matrix = match count_matrix(rows) {
        Ok(matrix) => matrix,
        Err(stat) => return stat,
    };
    let observed = matrix.mean_observed_agreement();
    let chance = ac1_chance_agreement(&matrix.marginal_proportions());
    match chance_corrected(observed, chance) {
        Some(ac1) => Statistic::value(ac1),
        None => Statistic::undefined(Degeneracy::ChanceAgreementIsOne),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;

    fn grid(rows: &[&[f64]]) -> Vec<Vec<Rating>> {
        rows.iter()
            .map(|r| r.iter().map(|v| rating(*v)).collect())
            .collect()
    }

    #[test]
    fn test_fleiss_hand_computed() {
        let rows = grid(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 0.0], &[0.0, 0.0, 0.0]]);
        // P-bar = (1 + 1/3 + 1) / 3 = 7/9; p = (4/9, 5/9); Pe = 41/81
        let expected = (7.0 / 9.0 - 41.0 / 81.0) / (1.0 - 41.0 / 81.0);
        let kappa = fleiss_kappa(&rows).as_value().unwrap();
        assert!((kappa - expected).abs() < 1e-12);
    }

    #[test]
    fn test_multi_ac1_hand_computed() {
        let rows = grid(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 0.0], &[0.0, 0.0, 0.0]]);
        // pe = 2 * (4/9)(5/9) / 1 = 40/81
        let expected = (7.0 / 9.0 - 40.0 / 81.0) / (1.0 - 40.0 / 81.0);
        let ac1 = gwet_ac1_multi(&rows).as_value().unwrap();
        assert!((ac1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_partial_rows_are_excluded() {
        let rows = grid(&[&[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]]);
        let mut with_partial = rows.clone();
        with_partial.push(vec![rating(1.0), None, rating(0.0)]);
        assert_eq!(fleiss_kappa(&rows), fleiss_kappa(&with_partial));
    }

    #[test]
    fn test_single_category_is_undefined() {
        let rows = grid(&[&[1.0, 1.0, 1.0], &[1.0, 1.0, 1.0]]);
        assert_eq!(
            fleiss_kappa(&rows),
            Statistic::undefined(Degeneracy::SingleCategory)
        );
        assert_eq!(
            gwet_ac1_multi(&rows),
            Statistic::undefined(Degeneracy::SingleCategory)
        );
    }

    #[test]
    fn test_needs_two_complete_subjects() {
        let rows = vec![
            vec![rating(1.0), rating(0.0), rating(1.0)],
            vec![rating(1.0), None, rating(1.0)],
        ];
        assert_eq!(fleiss_kappa(&rows), Statistic::insufficient(2, 1));
    }
}
