//! Category universes and count matrices shared by the chance-corrected
//! statistics.

use crate::core::{Rating, RatingValue};
use std::collections::BTreeMap;

/// Tolerance for treating a chance term as exactly one.
pub(crate) const EPSILON: f64 = 1e-12;

/// Subjects where both raters supplied a value.
pub fn valid_pairs(a: &[Rating], b: &[Rating]) -> Vec<(RatingValue, RatingValue)> {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect()
}

/// Rows in which every rater supplied a value, unwrapped.
pub fn complete_rows(rows: &[Vec<Rating>]) -> Vec<Vec<RatingValue>> {
    rows.iter()
        .filter_map(|row| row.iter().copied().collect::<Option<Vec<_>>>())
        .filter(|row| !row.is_empty())
        .collect()
}

/// Occurrence count of each observed value, ordered by value.
pub fn category_counts<'a>(
    values: impl IntoIterator<Item = &'a RatingValue>,
) -> BTreeMap<RatingValue, usize> {
    values.into_iter().fold(BTreeMap::new(), |mut acc, v| {
        *acc.entry(*v).or_default() += 1;
        acc
    })
}

/// Subject × category count matrix over complete rows.
///
/// `counts[i][j]` is how many raters put subject `i` into `categories[j]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CountMatrix {
    pub categories: Vec<RatingValue>,
    pub counts: Vec<Vec<usize>>,
    pub raters: usize,
}

impl CountMatrix {
    pub fn from_rows(rows: &[Vec<RatingValue>]) -> Self {
        let categories: Vec<RatingValue> =
            category_counts(rows.iter().flatten()).into_keys().collect();
        let index: BTreeMap<RatingValue, usize> = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (*c, i))
            .collect();
        let counts = rows
            .iter()
            .map(|row| {
                row.iter().fold(vec![0; categories.len()], |mut acc, v| {
                    acc[index[v]] += 1;
                    acc
                })
            })
            .collect();
        Self {
            categories,
            counts,
            raters: rows.first().map(Vec::len).unwrap_or(0),
        }
    }

    pub fn n_subjects(&self) -> usize {
        self.counts.len()
    }

    pub fn n_categories(&self) -> usize {
        self.categories.len()
    }

    /// Mean per-subject pairwise agreement (Fleiss' P-bar).
    pub fn mean_observed_agreement(&self) -> f64 {
        let k = self.raters as f64;
        let total: f64 = self
            .counts
            .iter()
            .map(|row| {
                let squares: usize = row.iter().map(|c| c * c).sum();
                (squares as f64 - k) / (k * (k - 1.0))
            })
            .sum();
        total / self.n_subjects() as f64
    }

    /// Pooled proportion of all ratings falling in each category.
    pub fn marginal_proportions(&self) -> Vec<f64> {
        let total = (self.n_subjects() * self.raters) as f64;
        (0..self.n_categories())
            .map(|j| self.counts.iter().map(|row| row[j]).sum::<usize>() as f64 / total)
            .collect()
    }
}

/// Gwet's chance-agreement term: `(1/(q-1)) * sum(pi_k * (1 - pi_k))`.
///
/// Callers guarantee `proportions.len() >= 2`.
pub fn ac1_chance_agreement(proportions: &[f64]) -> f64 {
    let q = proportions.len() as f64;
    proportions.iter().map(|p| p * (1.0 - p)).sum::<f64>() / (q - 1.0)
}

/// `(observed - chance) / (1 - chance)`, or `None` when chance is one.
pub fn chance_corrected(observed: f64, chance: f64) -> Option<f64> {
    let denom = 1.0 - chance;
    if denom.abs() <= EPSILON {
        None
    } else {
        Some((observed - chance) / denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;

    fn v(x: f64) -> RatingValue {
        RatingValue::new(x).unwrap()
    }

    #[test]
    fn test_valid_pairs_drops_missing_on_either_side() {
        let a = vec![rating(1.0), None, rating(0.0), rating(1.0)];
        let b = vec![rating(1.0), rating(1.0), None, rating(0.0)];
        assert_eq!(valid_pairs(&a, &b), vec![(v(1.0), v(1.0)), (v(1.0), v(0.0))]);
    }

    #[test]
    fn test_complete_rows_requires_every_rater() {
        let rows = vec![
            vec![rating(1.0), rating(1.0), rating(0.0)],
            vec![rating(1.0), None, rating(0.0)],
        ];
        assert_eq!(complete_rows(&rows), vec![vec![v(1.0), v(1.0), v(0.0)]]);
    }

    #[test]
    fn test_count_matrix_and_fleiss_terms() {
        let rows = vec![
            vec![v(1.0), v(1.0), v(1.0)],
            vec![v(1.0), v(1.0), v(0.0)],
        ];
        let m = CountMatrix::from_rows(&rows);
        assert_eq!(m.categories, vec![v(0.0), v(1.0)]);
        assert_eq!(m.counts, vec![vec![0, 3], vec![1, 2]]);
        // P_1 = (9 - 3) / 6 = 1, P_2 = (1 + 4 - 3) / 6 = 1/3
        assert!((m.mean_observed_agreement() - 2.0 / 3.0).abs() < 1e-12);
        let p = m.marginal_proportions();
        assert!((p[0] - 1.0 / 6.0).abs() < 1e-12);
        assert!((p[1] - 5.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_ac1_chance_agreement_two_balanced_categories() {
        assert!((ac1_chance_agreement(&[0.5, 0.5]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_chance_corrected_none_when_chance_is_one() {
        assert_eq!(chance_corrected(1.0, 1.0), None);
        assert_eq!(chance_corrected(1.0, 0.5), Some(1.0));
    }
}
