//! JSON configuration: per-effect configs and the page manifest.

pub mod manifest;

pub use manifest::FxManifest;

use serde::de::DeserializeOwned;

use crate::error::FxResult;

/// Parse one effect config. Blank input means "all defaults".
pub fn parse_config<C: DeserializeOwned + Default>(json: &str) -> FxResult<C> {
    if json.trim().is_empty() {
        return Ok(C::default());
    }
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::FlowFieldConfig;

    #[test]
    fn blank_config_is_default() {
        let cfg: FlowFieldConfig = parse_config("  ").unwrap();
        assert_eq!(cfg, FlowFieldConfig::default());
    }

    #[test]
    fn bad_color_is_rejected() {
        let res = parse_config::<FlowFieldConfig>(r#"{"color":"blue"}"#);
        assert!(res.is_err());
    }
}
