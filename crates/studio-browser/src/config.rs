//! Configuration read from page globals.
//!
//! Pages can set `window.STUDIO_CONFIG = { ... }` before the runtime loads.
//! The older `STUDIO_PARENT_ORIGINS` (array) and `STUDIO_PARENT_TARGET_ORIGIN`
//! (string) globals still work and take precedence over the object.

use gloo_utils::format::JsValueSerdeExt;
use serde_json::Value;
use studio_core::{ConfigError, StudioConfig};
use wasm_bindgen::JsValue;
use web_sys::Window;

pub const CONFIG_GLOBAL: &str = "STUDIO_CONFIG";
pub const ORIGINS_GLOBAL: &str = "STUDIO_PARENT_ORIGINS";
pub const TARGET_ORIGIN_GLOBAL: &str = "STUDIO_PARENT_TARGET_ORIGIN";

pub fn config_from_window(window: &Window) -> Result<StudioConfig, ConfigError> {
    let mut config = match global(window, CONFIG_GLOBAL) {
        Some(value) if value.is_object() => value.into_serde::<StudioConfig>().unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed {CONFIG_GLOBAL}: {e}");
            StudioConfig::default()
        }),
        _ => StudioConfig::default(),
    };

    if let Some(origins) = global(window, ORIGINS_GLOBAL).filter(js_sys::Array::is_array) {
        match origins.into_serde::<Vec<Value>>() {
            // Falsy entries are skipped, as the legacy script did.
            Ok(list) => {
                config.allowed_origins = list
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_owned))
                    .collect();
            }
            Err(e) => tracing::warn!("ignoring malformed {ORIGINS_GLOBAL}: {e}"),
        }
    }

    if let Some(target) = global(window, TARGET_ORIGIN_GLOBAL).and_then(|v| v.as_string()) {
        config.target_origin = target;
    }

    config.validated()
}

fn global(window: &Window, name: &str) -> Option<JsValue> {
    let value = js_sys::Reflect::get(window, &JsValue::from_str(name)).ok()?;
    (!value.is_undefined() && !value.is_null()).then_some(value)
}
