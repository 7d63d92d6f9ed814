//! Intraclass correlation, ICC(2,1), for count variables.
//!
//! Two-way random-effects, single-rating form (Shrout & Fleiss). The two
//! rater and k-rater versions share one ANOVA decomposition over subjects
//! where every rater supplied a value.

use super::categories::{complete_rows, EPSILON};
use crate::core::{Degeneracy, Rating, RatingValue, Statistic};

/// Minimum complete subjects for the ANOVA to be meaningful.
pub const MIN_ICC_SUBJECTS: usize = 3;

/// Mean squares of the two-way subject × rater decomposition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoWayAnova {
    pub subjects: usize,
    pub raters: usize,
    pub ms_subjects: f64,
    pub ms_raters: f64,
    pub ms_error: f64,
}

impl TwoWayAnova {
    /// Decomposes a complete subject × rater grid. `None` unless there are
    /// at least two rows, all of the same length of two or more.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let n = rows.len();
        let k = rows.first().map_or(0, Vec::len);
        if n < 2 || k < 2 || rows.iter().any(|r| r.len() != k) {
            return None;
        }
        let (n_f, k_f) = (n as f64, k as f64);

        let grand_mean = rows.iter().flatten().sum::<f64>() / (n_f * k_f);
        let row_means: Vec<f64> = rows.iter().map(|r| r.iter().sum::<f64>() / k_f).collect();
        let col_means: Vec<f64> = (0..k)
            .map(|j| rows.iter().map(|r| r[j]).sum::<f64>() / n_f)
            .collect();

        let ss_total: f64 = rows.iter().flatten().map(|x| (x - grand_mean).powi(2)).sum();
        let ss_subjects = k_f * row_means.iter().map(|m| (m - grand_mean).powi(2)).sum::<f64>();
        let ss_raters = n_f * col_means.iter().map(|m| (m - grand_mean).powi(2)).sum::<f64>();
        let ss_error = (ss_total - ss_subjects - ss_raters).max(0.0);

        Some(Self {
            subjects: n,
            raters: k,
            ms_subjects: ss_subjects / (n_f - 1.0),
            ms_raters: ss_raters / (k_f - 1.0),
            ms_error: ss_error / ((n_f - 1.0) * (k_f - 1.0)),
        })
    }

    /// ICC(2,1), or `None` when the denominator vanishes.
    pub fn icc_2_1(&self) -> Option<f64> {
        let (n, k) = (self.subjects as f64, self.raters as f64);
        let denom = self.ms_subjects
            + (k - 1.0) * self.ms_error
            + k * (self.ms_raters - self.ms_error) / n;
        if denom.abs() <= EPSILON {
            return None;
        }
        Some((self.ms_subjects - self.ms_error) / denom)
    }
}

/// ICC(2,1) over a subject × rater grid, using complete subjects only.
///
/// Clamped to [-1, 1] against small-sample instability.
pub fn icc(rows: &[Vec<Rating>]) -> Statistic {
    let complete: Vec<Vec<f64>> = complete_rows(rows)
        .into_iter()
        .map(|row| row.into_iter().map(RatingValue::get).collect())
        .collect();
    if complete.len() < MIN_ICC_SUBJECTS {
        return Statistic::insufficient(MIN_ICC_SUBJECTS, complete.len());
    }
    let Some(anova) = TwoWayAnova::from_rows(&complete) else {
        return Statistic::NO_DATA;
    };

    match anova.icc_2_1() {
        Some(value) if value.is_finite() => Statistic::Value(value.clamp(-1.0, 1.0)),
        _ => Statistic::undefined(Degeneracy::ZeroVariance),
    }
}

/// ICC(2,1) for two aligned rating sequences.
pub fn icc_pair(a: &[Rating], b: &[Rating]) -> Statistic {
    let rows: Vec<Vec<Rating>> = a.iter().zip(b).map(|(x, y)| vec![*x, *y]).collect();
    icc(&rows)
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
    fn test_shrout_fleiss_reference_table() {
        // Shrout & Fleiss (1979) Table 2: ICC(2,1) = 0.29
        let rows = grid(&[
            &[9.0, 2.0, 5.0, 8.0],
            &[6.0, 1.0, 3.0, 2.0],
            &[8.0, 4.0, 6.0, 8.0],
            &[7.0, 1.0, 2.0, 6.0],
            &[10.0, 5.0, 6.0, 9.0],
            &[6.0, 2.0, 4.0, 7.0],
        ]);
        let value = icc(&rows).as_value().unwrap();
        assert!((value - 0.2898).abs() < 1e-3, "got {value}");
    }

    #[test]
    fn test_identical_raters_give_one() {
        let a: Vec<Rating> = [1.0, 4.0, 2.0, 7.0].iter().map(|v| rating(*v)).collect();
        let value = icc_pair(&a, &a).as_value().unwrap();
        assert!((value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_needs_three_complete_subjects() {
        let a = vec![rating(1.0), rating(2.0), None, rating(4.0)];
        let b = vec![rating(1.0), None, rating(3.0), rating(5.0)];
        assert_eq!(icc_pair(&a, &b), Statistic::insufficient(3, 2));
    }

    #[test]
    fn test_constant_ratings_are_undefined() {
        let a = vec![rating(2.0); 5];
        assert_eq!(
            icc_pair(&a, &a),
            Statistic::undefined(Degeneracy::ZeroVariance)
        );
    }

    #[test]
    fn test_anova_rejects_degenerate_grids() {
        assert_eq!(TwoWayAnova::from_rows(&[]), None);
        assert_eq!(TwoWayAnova::from_rows(&[vec![1.0, 2.0]]), None);
        assert_eq!(TwoWayAnova::from_rows(&[vec![1.0], vec![2.0]]), None);
        assert_eq!(
            TwoWayAnova::from_rows(&[vec![1.0, 2.0], vec![3.0]]),
            None
        );
        let anova = TwoWayAnova::from_rows(&[vec![1.0, 2.0], vec![3.0, 5.0]]).unwrap();
        assert_eq!((anova.subjects, anova.raters), (2, 2));
    }

    #[test]
    fn test_anti_correlated_ratings_stay_in_bounds() {
        let a: Vec<Rating> = [0.0, 10.0, 0.0].iter().map(|v| rating(*v)).collect();
        let b: Vec<Rating> = [10.0, 0.0, 10.0].iter().map(|v| rating(*v)).collect();
        let value = icc_pair(&a, &b).as_value().unwrap();
        assert!((-1.0..=1.0).contains(&value));
        assert!(value < 0.0);
    }
}
