//! Tri-state statistic results.
//!
//! Every reliability coefficient returns a [`Statistic`]. A coefficient that
//! could not be computed for lack of input is `Missing`; one whose formula
//! degenerates (a zero denominator) is `Undefined`. Neither is ever folded
//! into a number, so downstream means cannot be biased by a silent zero.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Statistic {
    Value(f64),
    Undefined(Degeneracy),
    Missing(Absence),
}

/// Why there was nothing to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// No usable ratings, or the statistic does not apply to the variable type
    NoData,
    /// Fewer qualifying pairs or subjects than the statistic needs
    InsufficientSample { required: usize, observed: usize },
}

/// Why a computable statistic has no meaningful value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// Chance agreement equals one
    ChanceAgreementIsOne,
    /// Fewer than two categories observed
    SingleCategory,
    /// Krippendorff's expected disagreement is zero
    ZeroExpectedDisagreement,
    /// ANOVA denominator is zero
    ZeroVariance,
}

/// Reporting bucket for aggregate transparency counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Valid,
    Undefined,
    Missing,
    InsufficientSample,
}

impl Statistic {
    pub const NO_DATA: Statistic = Statistic::Missing(Absence::NoData);

    /// Builds a `Value`, mapping a non-finite result to `Undefined`.
    pub fn value(x: f64) -> Self {
        if x.is_finite() {
            Self::Value(x)
        } else {
            Self::Undefined(Degeneracy::ZeroVariance)
        }
    }

    pub fn insufficient(required: usize, observed: usize) -> Self {
        Self::Missing(Absence::InsufficientSample { required, observed })
    }

    pub fn undefined(reason: Degeneracy) -> Self {
        Self::Undefined(reason)
    }

    pub fn as_value(&self) -> Option<f64> {
        match self {
            Self::Value(x) => Some(*x),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing(_))
    }

    pub fn bucket(&self) -> Bucket {
        match self {
            Self::Value(_) => Bucket::Valid,
            Self::Undefined(_) => Bucket::Undefined,
            Self::Missing(Absence::NoData) => Bucket::Missing,
            Self::Missing(Absence::InsufficientSample { .. }) => Bucket::InsufficientSample,
        }
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self {
            Self::Value(x) => Self::value(f(x)),
            other => other,
        }
    }

    /// Numeric rendering with `precision` decimals, or `N/A`.
    pub fn display(&self, precision: usize) -> String {
        match self {
            Self::Value(x) => format!("{x:.precision$}"),
            _ => "N/A".to_string(),
        }
    }

    /// Percentage rendering with one decimal, or `N/A`.
    pub fn display_percent(&self) -> String {
        match self {
            Self::Value(x) => format!("{:.1}%", x * 100.0),
            _ => "N/A".to_string(),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display(3))
    }
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ChanceAgreementIsOne => "chance agreement is 1",
            Self::SingleCategory => "only one category observed",
            Self::ZeroExpectedDisagreement => "no expected disagreement",
            Self::ZeroVariance => "zero variance",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_rejects_nan() {
        assert!(Statistic::value(f64::NAN).is_undefined());
        assert_eq!(Statistic::value(0.25), Statistic::Value(0.25));
    }

    #[test]
    fn test_buckets() {
        assert_eq!(Statistic::Value(0.1).bucket(), Bucket::Valid);
        assert_eq!(Statistic::NO_DATA.bucket(), Bucket::Missing);
        assert_eq!(
            Statistic::insufficient(3, 1).bucket(),
            Bucket::InsufficientSample
        );
        assert_eq!(
            Statistic::undefined(Degeneracy::SingleCategory).bucket(),
            Bucket::Undefined
        );
    }

    #[test]
    fn test_display_renders_na_for_non_values() {
        assert_eq!(Statistic::Value(0.8).display_percent(), "80.0%");
        assert_eq!(Statistic::Value(0.12345).display(3), "0.123");
        assert_eq!(
            Statistic::undefined(Degeneracy::ChanceAgreementIsOne).display(3),
            "N/A"
        );
        assert_eq!(Statistic::NO_DATA.display_percent(), "N/A");
    }

    #[test]
    fn test_serialization_keeps_states_distinct() {
        let value = serde_json::to_value(Statistic::Value(0.5)).unwrap();
        assert_eq!(value["status"], "value");
        assert_eq!(value["detail"], 0.5);

        let undefined =
            serde_json::to_value(Statistic::undefined(Degeneracy::ChanceAgreementIsOne)).unwrap();
        assert_eq!(undefined["status"], "undefined");
        assert_eq!(undefined["detail"], "chance_agreement_is_one");

        let missing = serde_json::to_value(Statistic::insufficient(3, 2)).unwrap();
        assert_eq!(missing["status"], "missing");
        assert_eq!(missing["detail"]["insufficient_sample"]["required"], 3);
    }
}
