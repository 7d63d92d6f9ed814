use crate::core::Statistic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Landis & Koch style bands for chance-corrected coefficients.
///
/// Labels are descriptive only; nothing in the pipeline branches on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpretation {
    Poor,
    Slight,
    Fair,
    Moderate,
    Substantial,
    AlmostPerfect,
}

impl Interpretation {
    /// Each band starts at its lower cutoff: 0.0, 0.21, 0.41, 0.61, 0.81.
    pub fn of(value: f64) -> Self {
        match value {
            v if v >= 0.81 => Self::AlmostPerfect,
            v if v >= 0.61 => Self::Substantial,
            v if v >= 0.41 => Self::Moderate,
            v if v >= 0.21 => Self::Fair,
            v if v >= 0.0 => Self::Slight,
            _ => Self::Poor,
        }
    }

    pub fn of_statistic(stat: &Statistic) -> Option<Self> {
        stat.as_value().map(Self::of)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Slight => "Slight",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Substantial => "Substantial",
            Self::AlmostPerfect => "Almost Perfect",
        }
    }
}

impl fmt::Display for Interpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Label for an optional mean, `N/A` when absent.
pub fn interpretation_label(value: Option<f64>) -> &'static str {
    value.map(|v| Interpretation::of(v).label()).unwrap_or("N/A")
}
