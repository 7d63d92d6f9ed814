use serde::{Deserialize, Serialize};

/// Raw-agreement level below which a variable is flagged for review.
pub const DEFAULT_LOW_AGREEMENT: f64 = 0.80;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ThresholdsConfig {
    #[serde(default = "default_low_agreement")]
    pub low_agreement: f64,
}

impl Default for ThresholdsConfig {
    fn default() -> Self {
        Self {
            low_agreement: default_low_agreement(),
        }
    }
}

impl ThresholdsConfig {
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.low_agreement) {
            return Err(format!(
                "thresholds.low_agreement must be within [0, 1], got {}",
                self.low_agreement
            ));
        }
        Ok(())
    }
}

fn default_low_agreement() -> f64 {
    DEFAULT_LOW_AGREEMENT
}
