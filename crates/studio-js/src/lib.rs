//! WASM bindings for the studio shell runtime.
//!
//! Loading the module installs the runtime with configuration read from the
//! page globals, so a plain `<script type="module">` include is enough. The
//! exported functions let QA scripts and host pages drive it directly.

mod types;

pub use types::*;

use std::cell::RefCell;

use studio_browser::{Mode, StudioRuntime, config_from_window};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNTIME: RefCell<Option<StudioRuntime>> = const { RefCell::new(None) };
}

/// Initialize panic hook, logging and the runtime.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    init_tracing();

    if let Err(e) = install_with(None) {
        tracing::warn!("studio runtime not installed: {:?}", e);
    }
}

fn init_tracing() {
    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}

fn install_with(overrides: Option<JsStudioConfig>) -> Result<(), JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("no window"))?;
    let mut config =
        config_from_window(&window).map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    if let Some(overrides) = overrides {
        config = overrides
            .apply_to(config)
            .validated()
            .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    }

    // Tear down the previous runtime before the new one attaches listeners.
    let previous = RUNTIME.with(|slot| slot.borrow_mut().take());
    drop(previous);

    let runtime =
        StudioRuntime::install(config).map_err(|e| JsError::new(&format!("Install failed: {}", e)))?;
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// Reinstall the runtime, optionally overriding configuration.
#[wasm_bindgen]
pub fn install(config: JsValue) -> Result<(), JsError> {
    let overrides = if config.is_undefined() || config.is_null() {
        None
    } else {
        Some(
            serde_wasm_bindgen::from_value::<JsStudioConfig>(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?,
        )
    };
    install_with(overrides)
}

/// Apply a mode exactly as an inbound `set-mode` command would.
#[wasm_bindgen(js_name = applyMode)]
pub fn apply_mode(mode: &str) -> Result<(), JsError> {
    let mode: Mode = mode.parse().map_err(|e| JsError::new(&format!("{}", e)))?;
    RUNTIME.with(|slot| {
        let slot = slot.borrow();
        let runtime = slot
            .as_ref()
            .ok_or_else(|| JsError::new("studio runtime is not installed"))?;
        runtime
            .apply_mode(mode)
            .map(|_| ())
            .map_err(|e| JsError::new(&format!("{}", e)))
    })
}

/// Mode recorded on the document element.
#[wasm_bindgen(js_name = currentMode)]
pub fn current_mode() -> String {
    RUNTIME.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|runtime| runtime.mode())
            .unwrap_or_default()
            .to_string()
    })
}

/// Disable both subsystems and stop listening. The mode attribute is kept.
#[wasm_bindgen]
pub fn uninstall() {
    let runtime = RUNTIME.with(|slot| slot.borrow_mut().take());
    if let Some(runtime) = runtime {
        runtime.uninstall();
    }
}
