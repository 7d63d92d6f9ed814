//! `.concordance.toml` configuration.
//!
//! Every section is optional; missing keys fall back to serde default
//! functions so a partial file always loads.

mod loader;
mod parallel;
pub mod presets;
mod thresholds;

pub use loader::{
    directory_ancestors, load_config, load_config_from, parse_and_validate_config, CONFIG_FILE,
};
pub use parallel::{configure_thread_pool, ParallelConfig};
pub use presets::SchemaPreset;
pub use thresholds::{ThresholdsConfig, DEFAULT_LOW_AGREEMENT};

use crate::analysis::AnalysisConfig;
use crate::core::{Error, Result, Schema, VariableType};
use crate::io::output::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConcordanceConfig {
    #[serde(default)]
    pub schema: Option<SchemaConfig>,
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
    #[serde(default)]
    pub parallel: ParallelConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Explicit variable lists. Replaces the preset entirely when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SchemaConfig {
    #[serde(default)]
    pub binary: Vec<String>,
    #[serde(default)]
    pub count: Vec<String>,
    #[serde(default)]
    pub ordinal: Vec<String>,
}

impl SchemaConfig {
    /// Fails if a name is listed under two types.
    pub fn to_schema(&self) -> Result<Schema> {
        let typed = self
            .binary
            .iter()
            .map(|n| (n, VariableType::Binary))
            .chain(self.count.iter().map(|n| (n, VariableType::Count)))
            .chain(self.ordinal.iter().map(|n| (n, VariableType::Ordinal)));
        typed.into_iter().try_fold(Schema::new(), |mut schema, (name, ty)| {
            schema.try_declare(name, ty)?;
            Ok(schema)
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct InputConfig {
    /// Map positive values of binary variables to 1 while loading
    #[serde(default)]
    pub binarize: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub default_format: OutputFormat,
}

impl ConcordanceConfig {
    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate().map_err(Error::Configuration)?;
        if self.parallel.max_concurrency == Some(0) {
            return Err(Error::Configuration(
                "parallel.max_concurrency must be at least 1".to_string(),
            ));
        }
        if let Some(schema) = &self.schema {
            let resolved = schema.to_schema()?;
            if resolved.is_empty() {
                return Err(Error::Configuration(
                    "[schema] declares no variables".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The declared schema, or the platform codebook preset.
    pub fn schema(&self) -> Result<Schema> {
        match &self.schema {
            Some(schema) => schema.to_schema(),
            None => Ok(SchemaPreset::default().schema()),
        }
    }

    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            parallel: self.parallel.clone(),
            low_agreement: self.thresholds.low_agreement,
        }
    }

    pub fn default_toml() -> &'static str {
        DEFAULT_CONFIG
    }
}

const DEFAULT_CONFIG: &str = r#"# Concordance Configuration

# Leave [schema] out to use the built-in platform codebook.
# [schema]
# binary = ["DOCS", "SDK", "API"]
# count = ["METH"]
# ordinal = []

[thresholds]
low_agreement = 0.80

[parallel]
enabled = true

[input]
binarize = false

[output]
default_format = "terminal"
"#;
