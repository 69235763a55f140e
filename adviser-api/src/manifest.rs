use adviser_types::Confidence;
use serde::{Deserialize, Serialize};

/// File whose presence marks a directory as a leaf advice.
pub const ADVICE_MANIFEST: &str = "advice.toml";

/// Descriptor metadata, validated once when the catalog loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceMeta {
    pub confidence: Confidence,

    /// Requires explicit opt-in (`--preview`).
    pub preview: bool,

    /// Only runs when selected by name.
    pub manual: bool,

    /// Tie-break; lower runs first.
    pub order: i32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// On-disk shape of `advice.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AdviceManifest {
    pub kind: String,

    #[serde(default)]
    pub confidence: Confidence,

    #[serde(default)]
    pub preview: bool,

    #[serde(default)]
    pub manual: bool,

    #[serde(default)]
    pub order: i32,

    #[serde(default)]
    pub description: Option<String>,

    /// Appended to the next-step buffer whenever the advice applies.
    #[serde(default)]
    pub next_steps: Vec<String>,

    #[serde(default)]
    pub params: toml::Table,
}

impl AdviceManifest {
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn meta(&self) -> AdviceMeta {
        AdviceMeta {
            confidence: self.confidence,
            preview: self.preview,
            manual: self.manual,
            order: self.order,
            description: self.description.clone(),
        }
    }
}
