//! `postMessage` to the parent browsing context.

use gloo_utils::format::JsValueSerdeExt;
use studio_core::{HostError, ParentLink};
use wasm_bindgen::JsValue;
use web_sys::Window;

pub struct WindowParent {
    window: Window,
}

impl WindowParent {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// The parent window, unless this is a top-level page (whose `parent` is
    /// itself).
    fn parent(&self) -> Option<Window> {
        let parent = self.window.parent().ok().flatten()?;
        let own: &JsValue = &self.window;
        let other: &JsValue = &parent;
        (own != other).then_some(parent)
    }
}

impl ParentLink for WindowParent {
    fn has_parent(&self) -> bool {
        self.parent().is_some()
    }

    fn post(&self, message: &serde_json::Value, target_origin: &str) -> Result<(), HostError> {
        let parent = self.parent().ok_or("no parent window")?;
        let data = <JsValue as JsValueSerdeExt>::from_serde(message)
            .map_err(|e| format!("message serialization failed: {e}"))?;
        parent
            .post_message(&data, target_origin)
            .map_err(|e| format!("postMessage failed: {:?}", e))?;
        Ok(())
    }
}
