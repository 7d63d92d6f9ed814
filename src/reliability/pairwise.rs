//! Two-rater agreement statistics over one variable.
//!
//! Both inputs are aligned by subject. A subject only counts as a valid pair
//! when both raters supplied a value.

use super::categories::{
    ac1_chance_agreement, category_counts, chance_corrected, valid_pairs,
};
use crate::core::{Degeneracy, Rating, Statistic};

/// Minimum valid pairs for Cohen's Kappa and Gwet's AC1.
pub const MIN_KAPPA_PAIRS: usize = 2;

/// Share of valid pairs on which both raters gave the same value.
pub fn percent_agreement(a: &[Rating], b: &[Rating]) -> Statistic {
    let pairs = valid_pairs(a, b);
    if pairs.is_empty() {
        return Statistic::NO_DATA;
    }
    let matches = pairs.iter().filter(|(x, y)| x == y).count();
    Statistic::value(matches as f64 / pairs.len() as f64)
}

/// Cohen's Kappa from the observed contingency table of valid pairs.
///
/// Undefined when both raters used one and the same category for every
/// subject, since chance agreement is then one.
pub fn cohen_kappa(a: &[Rating], b: &[Rating]) -> Statistic {
    let pairs = valid_pairs(a, b);
    let n = pairs.len();
    if n < MIN_KAPPA_PAIRS {
        return Statistic::insufficient(MIN_KAPPA_PAIRS, n);
    }

    let n_f = n as f64;
    let observed = pairs.iter().filter(|(x, y)| x == y).count() as f64 / n_f;
    let first = category_counts(pairs.iter().map(|(x, _)| x));
    let second = category_counts(pairs.iter().map(|(_, y)| y));
    let chance: f64 = first
        .iter()
        .map(|(cat, count)| {
            let other = second.get(cat).copied().unwrap_or(0);
            (*count as f64 / n_f) * (other as f64 / n_f)
        })
        .sum();

    match chance_corrected(observed, chance) {
        Some(kappa) => Statistic::value(kappa),
        None => Statistic::undefined(Degeneracy::ChanceAgreementIsOne),
    }
}

/// Gwet's AC1 with marginals pooled across both raters.
pub fn gwet_ac1(a: &[Rating], b: &[Rating]) -> Statistic {
    let pairs = valid_pairs(a, b);
    let n = pairs.len();
    if n < MIN_KAPPA_PAIRS {
        return Statistic::insufficient(MIN_KAPPA_PAIRS, n);
    }

    let observed = pairs.iter().filter(|(x, y)| x == y).count() as f64 / n as f64;
    let pooled = category_counts(pairs.iter().flat_map(|(x, y)| [x, y]));
    if pooled.len() < 2 {
        return Statistic::undefined(Degeneracy::SingleCategory);
    }
    let total = (2 * n) as f64;
    let proportions: Vec<f64> = pooled.values().map(|c| *c as f64 / total).collect();
    let chance = ac1_chance_agreement(&proportions);

    match chance_corrected(observed, chance) {
        Some(ac1) => Statistic::value(ac1),
        None => Statistic::undefined(Degeneracy::ChanceAgreementIsOne),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rating;

    fn ratings(values: &[f64]) -> Vec<Rating> {
        values.iter().map(|v| rating(*v)).collect()
    }

    fn assert_value(stat: Statistic, expected: f64) {
        match stat {
            Statistic::Value(x) => assert!(
                (x - expected).abs() < 1e-9,
                "expected {expected}, got {x}"
            ),
            other => panic!("expected value {expected}, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_agreement_known_value() {
        let a = ratings(&[1.0, 1.0, 0.0, 0.0, 1.0]);
        let b = ratings(&[1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_value(percent_agreement(&a, &b), 0.8);
    }

    #[test]
    fn test_percent_agreement_without_pairs_is_missing() {
        let a = vec![rating(1.0), None];
        let b = vec![None, rating(0.0)];
        assert_eq!(percent_agreement(&a, &b), Statistic::NO_DATA);
        assert_eq!(percent_agreement(&[], &[]), Statistic::NO_DATA);
    }

    #[test]
    fn test_cohen_kappa_hand_computed() {
        // po = 0.8, pe = 0.6*0.4 + 0.4*0.6 = 0.48
        let a = ratings(&[1.0, 1.0, 0.0, 0.0, 1.0]);
        let b = ratings(&[1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_value(cohen_kappa(&a, &b), (0.8 - 0.48) / (1.0 - 0.48));
    }

    #[test]
    fn test_cohen_kappa_perfect_with_variance_is_one() {
        let a = ratings(&[1.0, 1.0, 0.0, 0.0, 1.0]);
        assert_value(cohen_kappa(&a, &a), 1.0);
    }

    #[test]
    fn test_cohen_kappa_constant_agreement_is_undefined() {
        let a = ratings(&[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(
            cohen_kappa(&a, &a),
            Statistic::undefined(Degeneracy::ChanceAgreementIsOne)
        );
    }

    #[test]
    fn test_cohen_kappa_opposite_constants_is_zero() {
        let a = ratings(&[1.0, 1.0, 1.0]);
        let b = ratings(&[0.0, 0.0, 0.0]);
        assert_value(cohen_kappa(&a, &b), 0.0);
    }

    #[test]
    fn test_cohen_kappa_needs_two_pairs() {
        let a = vec![rating(1.0), None];
        let b = vec![rating(1.0), rating(0.0)];
        assert_eq!(cohen_kappa(&a, &b), Statistic::insufficient(2, 1));
    }

    #[test]
    fn test_gwet_ac1_hand_computed() {
        // pooled: five 0s, five 1s -> pe = (0.25 + 0.25) / 1 = 0.5
        let a = ratings(&[1.0, 1.0, 0.0, 0.0, 1.0]);
        let b = ratings(&[1.0, 0.0, 0.0, 0.0, 1.0]);
        assert_value(gwet_ac1(&a, &b), 0.6);
    }

    #[test]
    fn test_gwet_ac1_single_category_is_undefined() {
        let a = ratings(&[0.0, 0.0, 0.0]);
        assert_eq!(
            gwet_ac1(&a, &a),
            Statistic::undefined(Degeneracy::SingleCategory)
        );
    }

    #[test]
    fn test_gwet_ac1_resists_prevalence_skew() {
        // 18 joint zeros, one disagreement each way
        let mut a = vec![0.0; 20];
        let mut b = vec![0.0; 20];
        a[0] = 1.0;
        b[1] = 1.0;
        let (a, b) = (ratings(&a), ratings(&b));
        let kappa = cohen_kappa(&a, &b).as_value().unwrap();
        let ac1 = gwet_ac1(&a, &b).as_value().unwrap();
        assert!(kappa < 0.0, "kappa paradox expected, got {kappa}");
        assert!(ac1 > 0.85, "AC1 should stay high, got {ac1}");
    }
}
