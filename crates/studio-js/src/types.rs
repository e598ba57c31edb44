//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use studio_core::StudioConfig;
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;

/// Overrides passed to `install()`. Unset fields keep the value read from the
/// page globals (or the built-in default).
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsStudioConfig {
    #[tsify(optional)]
    pub channel: Option<String>,
    #[tsify(optional)]
    pub allowed_origins: Option<Vec<String>>,
    #[tsify(optional)]
    pub target_origin: Option<String>,
    #[tsify(optional)]
    pub mode_attribute: Option<String>,
    #[tsify(optional)]
    pub display_attribute: Option<String>,
}

impl JsStudioConfig {
    pub fn apply_to(self, mut config: StudioConfig) -> StudioConfig {
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        if let Some(origins) = self.allowed_origins {
            config.allowed_origins = origins;
        }
        if let Some(target) = self.target_origin {
            config.target_origin = target;
        }
        if let Some(attr) = self.mode_attribute {
            config.mode_attribute = attr;
        }
        if let Some(attr) = self.display_attribute {
            config.display_attribute = attr;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_only_set_fields() {
        let overrides = JsStudioConfig {
            target_origin: Some("https://studio.example".into()),
            ..Default::default()
        };
        let config = overrides.apply_to(StudioConfig::default());
        assert_eq!(config.target_origin, "https://studio.example");
        assert_eq!(config.channel, "studio-shell");
        assert_eq!(config.allowed_origins, StudioConfig::default().allowed_origins);
    }
}
