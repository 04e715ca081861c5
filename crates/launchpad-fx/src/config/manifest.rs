use serde::Deserialize;

use crate::effects::{AiToolsConfig, FlowFieldConfig, OrbitalConfig, TextMorphConfig};
use crate::error::FxResult;

/// Page-level effect configuration, loaded from a JSON file at runtime.
///
/// Every section is optional; a missing section means the page does not
/// mount that effect.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FxManifest {
    #[serde(default)]
    pub flow_field: Option<FlowFieldConfig>,
    #[serde(default)]
    pub text_morph: Option<TextMorphConfig>,
    #[serde(default)]
    pub ai_tools: Option<AiToolsConfig>,
    #[serde(default)]
    pub orbital: Option<OrbitalConfig>,
}

impl FxManifest {
    /// Parse a manifest from a JSON string and validate its sections.
    pub fn from_json(json: &str) -> FxResult<Self> {
        let manifest: Self = serde_json::from_str(json)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> FxResult<()> {
        if let Some(text) = &self.text_morph {
            text.validate()?;
        }
        Ok(())
    }

    /// Names of the effects this manifest configures.
    pub fn effects(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.flow_field.is_some() {
            names.push("flow-field");
        }
        if self.text_morph.is_some() {
            names.push("text-morph");
        }
        if self.ai_tools.is_some() {
            names.push("ai-tools");
        }
        if self.orbital.is_some() {
            names.push("orbital-timeline");
        }
        names
    }
}
