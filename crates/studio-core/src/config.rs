//! Runtime configuration.
//!
//! Every field has a default matching the stock deployment, so an empty object
//! (or no config at all) yields a working runtime.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::origin::OriginPolicy;

pub const DEFAULT_CHANNEL: &str = "studio-shell";
pub const DEFAULT_PARENT_ORIGIN: &str = "http://127.0.0.1:5500";
pub const DEFAULT_MODE_ATTRIBUTE: &str = "data-studio-mode";
pub const DEFAULT_DISPLAY_ATTRIBUTE: &str = "data-mode-display";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudioConfig {
    /// Logical channel name carried in every envelope.
    pub channel: String,
    /// Origins allowed to send commands. `"*"` allows any.
    pub allowed_origins: Vec<String>,
    /// Target origin for outbound `postMessage`.
    pub target_origin: String,
    /// Root element attribute mirroring the active mode.
    pub mode_attribute: String,
    /// Marker attribute of the optional status display element.
    pub display_attribute: String,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_owned(),
            allowed_origins: vec![DEFAULT_PARENT_ORIGIN.to_owned()],
            target_origin: "*".to_owned(),
            mode_attribute: DEFAULT_MODE_ATTRIBUTE.to_owned(),
            display_attribute: DEFAULT_DISPLAY_ATTRIBUTE.to_owned(),
        }
    }
}

impl StudioConfig {
    /// Replace the allow-list. Blank entries are dropped by `validated`.
    pub fn with_allowed_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_target_origin(mut self, origin: impl Into<String>) -> Self {
        self.target_origin = origin.into();
        self
    }

    /// Check names and normalise the allow-list.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.channel.is_empty() {
            return Err(ConfigError::EmptyChannel);
        }
        for attr in [&self.mode_attribute, &self.display_attribute] {
            if !is_attribute_name(attr) {
                return Err(ConfigError::InvalidAttribute(attr.clone()));
            }
        }
        self.allowed_origins.retain(|o| !o.trim().is_empty());
        if self.target_origin.is_empty() {
            self.target_origin = "*".to_owned();
        }
        Ok(self)
    }

    pub fn origin_policy(&self) -> OriginPolicy {
        OriginPolicy::new(self.allowed_origins.iter().cloned())
    }
}

fn is_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == ':')
}
