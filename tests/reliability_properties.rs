//! Property-based tests for the reliability engine
//!
//! These tests verify invariants that should hold for all inputs:
//! - Statistics are pure: identical inputs give identical results
//! - Percent agreement and AC1 are symmetric in the two raters
//! - ICC stays within [-1, 1]
//! - Every Value is finite
//! - Parallel and sequential analysis produce the same report

use concordance::core::DistanceLevel;
use concordance::reliability::{
    gwet_ac1, icc, icc_pair, krippendorff_alpha, percent_agreement,
};
use concordance::{
    analyze, pairwise_statistics, rating, AnalysisConfig, Rating, RatingTable, Schema, Statistic,
    Subject, SubjectId, VariableType,
};
use proptest::prelude::*;

/// A binary rating that is missing about a fifth of the time.
fn binary_rating() -> BoxedStrategy<Rating> {
    prop_oneof![
        1 => Just(None),
        2 => Just(rating(0.0)),
        2 => Just(rating(1.0)),
    ]
    .boxed()
}

fn count_rating() -> BoxedStrategy<Rating> {
    prop_oneof![
        1 => Just(None),
        6 => (0u32..40).prop_map(|v| rating(v as f64)),
    ]
    .boxed()
}

fn aligned_pair(
    element: BoxedStrategy<Rating>,
) -> impl Strategy<Value = (Vec<Rating>, Vec<Rating>)> {
    (1usize..30).prop_flat_map(move |n| {
        (
            prop::collection::vec(element.clone(), n),
            prop::collection::vec(element.clone(), n),
        )
    })
}

fn grid(raters: usize) -> impl Strategy<Value = Vec<Vec<Rating>>> {
    prop::collection::vec(prop::collection::vec(count_rating(), raters), 0..25)
}

fn finite_or_not_value(stat: Statistic) -> bool {
    stat.as_value().map(f64::is_finite).unwrap_or(true)
}

proptest! {
    #[test]
    fn prop_pairwise_statistics_are_pure((a, b) in aligned_pair(binary_rating())) {
        let first = pairwise_statistics(VariableType::Binary, &a, &b);
        let second = pairwise_statistics(VariableType::Binary, &a, &b);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_agreement_and_ac1_are_symmetric((a, b) in aligned_pair(binary_rating())) {
        prop_assert_eq!(percent_agreement(&a, &b), percent_agreement(&b, &a));
        match (gwet_ac1(&a, &b), gwet_ac1(&b, &a)) {
            (Statistic::Value(x), Statistic::Value(y)) => prop_assert!((x - y).abs() < 1e-12),
            (x, y) => prop_assert_eq!(x, y),
        }
    }

    #[test]
    fn prop_pair_icc_is_bounded((a, b) in aligned_pair(count_rating())) {
        if let Some(v) = icc_pair(&a, &b).as_value() {
            prop_assert!((-1.0..=1.0).contains(&v), "icc {} out of range", v);
        }
    }

    #[test]
    fn prop_multi_rater_icc_is_bounded(rows in grid(3)) {
        if let Some(v) = icc(&rows).as_value() {
            prop_assert!((-1.0..=1.0).contains(&v), "icc {} out of range", v);
        }
    }

    #[test]
    fn prop_statistics_never_yield_non_finite_values((a, b) in aligned_pair(count_rating())) {
        let stats = pairwise_statistics(VariableType::Count, &a, &b);
        prop_assert!(finite_or_not_value(stats.agreement));
        prop_assert!(finite_or_not_value(stats.kripp_alpha));
        prop_assert!(finite_or_not_value(stats.icc));
    }

    #[test]
    fn prop_alpha_of_perfect_agreement_is_one_or_undefined(values in prop::collection::vec(0u32..5, 2..20)) {
        let rows: Vec<Vec<Rating>> = values
            .iter()
            .map(|v| vec![rating(*v as f64); 3])
            .collect();
        match krippendorff_alpha(&rows, DistanceLevel::Ordinal) {
            Statistic::Value(alpha) => prop_assert!((alpha - 1.0).abs() < 1e-12),
            other => prop_assert!(other.is_undefined()),
        }
    }

    #[test]
    fn prop_parallel_matches_sequential(data in prop::collection::vec(
        (prop::collection::vec(binary_rating(), 3), prop::collection::vec(count_rating(), 3)),
        1..15,
    )) {
        let schema = Schema::new()
            .with("DOCS", VariableType::Binary)
            .with("METH", VariableType::Count);
        let raters = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut builder = RatingTable::builder(schema, raters.clone());
        for (i, (docs, meth)) in data.iter().enumerate() {
            let id = SubjectId::new(format!("VG{i}"));
            builder.subject(Subject::anonymous(id.as_str()));
            for (r, rater) in raters.iter().enumerate() {
                builder.rate(&id, "DOCS", rater, docs[r]).unwrap();
                builder.rate(&id, "METH", rater, meth[r]).unwrap();
            }
        }
        let table = builder.build().unwrap();

        let parallel = analyze(&table, &AnalysisConfig::default()).unwrap();
        let sequential = analyze(&table, &AnalysisConfig::sequential()).unwrap();
        prop_assert_eq!(parallel, sequential);
    }
}
