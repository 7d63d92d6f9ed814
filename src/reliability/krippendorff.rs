//! Krippendorff's Alpha for any number of raters.
//!
//! Subjects qualify with at least two non-missing ratings, so partial
//! coverage still contributes. Observed disagreement is the mean distance
//! over within-subject rating pairs; expected disagreement is the mean
//! distance over every pair of pooled values from qualifying subjects.

use super::categories::category_counts;
use crate::core::{Degeneracy, DistanceLevel, Rating, RatingValue, Statistic};
use std::collections::BTreeMap;

/// Minimum number of qualifying subjects.
pub const MIN_ALPHA_SUBJECTS: usize = 2;

/// Alpha over a subject × rater grid.
pub fn krippendorff_alpha(rows: &[Vec<Rating>], level: DistanceLevel) -> Statistic {
    let units: Vec<Vec<RatingValue>> = rows
        .iter()
        .map(|row| row.iter().flatten().copied().collect::<Vec<_>>())
        .filter(|values| values.len() >= 2)
        .collect();
    if units.len() < MIN_ALPHA_SUBJECTS {
        return Statistic::insufficient(MIN_ALPHA_SUBJECTS, units.len());
    }

    let pooled = category_counts(units.iter().flatten());
    let distance = Distance::new(level, &pooled);

    let (observed_sum, observed_pairs) = units
        .iter()
        .flat_map(|unit| {
            unit.iter()
                .enumerate()
                .flat_map(move |(i, a)| unit[i + 1..].iter().map(move |b| (a, b)))
        })
        .fold((0.0, 0usize), |(sum, n), (a, b)| {
            (sum + distance.between(*a, *b), n + 1)
        });
    let observed = observed_sum / observed_pairs as f64;

    let expected = expected_disagreement(&pooled, &distance);
    if expected <= 0.0 {
        return Statistic::undefined(Degeneracy::ZeroExpectedDisagreement);
    }

    Statistic::value(1.0 - observed / expected)
}

/// Alpha for exactly two aligned rating sequences.
pub fn krippendorff_alpha_pair(a: &[Rating], b: &[Rating], level: DistanceLevel) -> Statistic {
    let rows: Vec<Vec<Rating>> = a.iter().zip(b).map(|(x, y)| vec![*x, *y]).collect();
    krippendorff_alpha(&rows, level)
}

/// Mean distance over all unordered pairs of pooled values, computed from
/// category counts. Pairs within one category contribute zero distance.
fn expected_disagreement(pooled: &BTreeMap<RatingValue, usize>, distance: &Distance) -> f64 {
    let total: usize = pooled.values().sum();
    let all_pairs = (total * (total - 1) / 2) as f64;
    let entries: Vec<(&RatingValue, &usize)> = pooled.iter().collect();
    let sum: f64 = entries
        .iter()
        .enumerate()
        .flat_map(|(i, (a, na))| {
            entries[i + 1..]
                .iter()
                .map(move |(b, nb)| (**na * **nb) as f64 * distance.between(**a, **b))
        })
        .sum();
    sum / all_pairs
}

enum Distance {
    Nominal,
    /// Squared difference of ranks in the sorted category universe
    Ordinal(BTreeMap<RatingValue, usize>),
    Ratio,
}

impl Distance {
    fn new(level: DistanceLevel, pooled: &BTreeMap<RatingValue, usize>) -> Self {
        match level {
            DistanceLevel::Nominal => Self::Nominal,
            DistanceLevel::Ordinal => Self::Ordinal(
                pooled
                    .keys()
                    .enumerate()
                    .map(|(rank, v)| (*v, rank))
                    .collect(),
            ),
            DistanceLevel::Ratio => Self::Ratio,
        }
    }

    fn between(&self, a: RatingValue, b: RatingValue) -> f64 {
        match self {
            Self::Nominal => {
                if a == b {
                    0.0
                } else {
                    1.0
                }
            }
            Self::Ordinal(ranks) => {
                let diff = ranks[&a] as f64 - ranks[&b] as f64;
                diff * diff
            }
            Self::Ratio => {
                let diff = a.get() - b.get();
                diff * diff
            }
        }
    }
}
