//! Built-in variable schemas.
//!
//! The platform codebook preset is used whenever a configuration file does
//! not declare its own `[schema]` section.

use crate::core::Schema;
use serde::{Deserialize, Serialize};

pub const PLATFORM_BINARY: &[&str] = &[
    "DEVP",
    "DOCS",
    "SDK",
    "BUG",
    "STAN",
    "AI_MODEL",
    "AI_AGENT",
    "AI_ASSIST",
    "AI_DATA",
    "AI_MKT",
    "GIT",
    "MON",
    "API",
    "ROLE",
    "DATA",
    "STORE",
    "CERT",
    "COM_social_media",
    "COM_forum",
    "COM_blog",
    "COM_help_support",
    "COM_live_chat",
    "COM_Slack",
    "COM_Discord",
    "COM_stackoverflow",
    "COM_training",
    "COM_FAQ",
    "EVENT_webinars",
    "EVENT_virtual",
    "EVENT_in_person",
    "EVENT_conference",
    "EVENT_hackathon",
    "SPAN_internal",
    "SPAN_communities",
    "SPAN_external",
];

pub const PLATFORM_COUNT: &[&str] = &[
    "METH",
    "SDK_lang",
    "COM_lang",
    "GIT_lang",
    "SPAN_lang",
    "ROLE_lang",
    "DATA_lang",
    "STORE_lang",
    "CERT_lang",
    "SDK_prog_lang",
];

pub const PLATFORM_ORDINAL: &[&str] = &[];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPreset {
    /// Developer-platform codebook: 35 binary and 10 count variables
    #[default]
    PlatformCodebook,
}

impl SchemaPreset {
    pub fn schema(self) -> Schema {
        match self {
            SchemaPreset::PlatformCodebook => {
                Schema::from_lists(PLATFORM_BINARY, PLATFORM_COUNT, PLATFORM_ORDINAL)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VariableType;

    #[test]
    fn test_platform_preset_shape() {
        let schema = SchemaPreset::PlatformCodebook.schema();
        assert_eq!(schema.len(), 45);
        assert_eq!(schema.type_of("API"), Some(VariableType::Binary));
        assert_eq!(schema.type_of("METH"), Some(VariableType::Count));
        assert_eq!(schema.type_of("OPEN"), None);
    }
}
