//! Messaging gateway between the page and the shell.
//!
//! Inbound: origin check, then envelope decoding. Anything rejected is logged
//! at debug level and dropped. Outbound: wraps a payload in the channel
//! envelope and hands it to the `ParentLink`; no retry, no queue.

use serde::Serialize;
use serde_json::Value;

use crate::config::StudioConfig;
use crate::host::ParentLink;
use crate::origin::OriginPolicy;
use crate::protocol::{Command, decode_command, encode};

pub struct Gateway<L> {
    channel: String,
    target_origin: String,
    policy: OriginPolicy,
    link: L,
}

impl<L: ParentLink> Gateway<L> {
    pub fn new(config: &StudioConfig, link: L) -> Self {
        Self {
            channel: config.channel.clone(),
            target_origin: config.target_origin.clone(),
            policy: config.origin_policy(),
            link,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Validate and unwrap an inbound message.
    pub fn accept(&self, origin: &str, data: &Value) -> Option<Command> {
        if !self.policy.is_allowed(origin) {
            tracing::debug!(origin, "ignoring message from disallowed origin");
            return None;
        }
        match decode_command(data, &self.channel) {
            Ok(command) => Some(command),
            Err(e) => {
                tracing::debug!(origin, "ignoring message: {e}");
                None
            }
        }
    }

    /// Send `{channel, type, payload}` to the parent frame, if there is one.
    pub fn post_to_parent<P: Serialize>(&self, kind: &str, payload: P) {
        if !self.link.has_parent() {
            return;
        }
        let message = encode(&self.channel, kind, payload);
        if let Err(e) = self.link.post(&message, &self.target_origin) {
            tracing::warn!(kind, "post to parent failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::Mode;
    use crate::protocol::{ChildReady, MODE_APPLIED, ModeApplied};
    use crate::testing::RecordingLink;
    use serde_json::json;

    fn set_mode(mode: &str) -> Value {
        json!({"channel": "studio-shell", "type": "set-mode", "payload": {"mode": mode}})
    }

    fn gateway(link: RecordingLink) -> Gateway<RecordingLink> {
        let config = StudioConfig::default()
            .with_allowed_origins(["https://studio.example"])
            .with_target_origin("https://studio.example");
        Gateway::new(&config, link)
    }

    #[test]
    fn test_accepts_allowed_origin() {
        let gw = gateway(RecordingLink::new());
        assert_eq!(
            gw.accept("https://studio.example", &set_mode("Edit")),
            Some(Command::SetMode(Mode::Edit))
        );
    }

    #[test]
    fn test_rejects_other_origins() {
        let gw = gateway(RecordingLink::new());
        assert_eq!(gw.accept("https://evil.example", &set_mode("Edit")), None);
        assert_eq!(gw.accept("", &set_mode("Edit")), None);
    }

    #[test]
    fn test_null_origin_accepted() {
        let gw = gateway(RecordingLink::new());
        assert_eq!(
            gw.accept("null", &set_mode("View")),
            Some(Command::SetMode(Mode::View))
        );
    }

    #[test]
    fn test_malformed_messages_ignored() {
        let gw = gateway(RecordingLink::new());
        let origin = "https://studio.example";
        assert_eq!(gw.accept(origin, &json!({"type": "set-mode"})), None);
        assert_eq!(gw.accept(origin, &set_mode("")), None);
        assert_eq!(gw.accept(origin, &json!("hello")), None);
        assert_eq!(
            gw.accept(
                origin,
                &json!({"channel": "studio-shell", "type": "reload", "payload": {}})
            ),
            None
        );
    }

    #[test]
    fn test_post_wraps_envelope() {
        let gw = gateway(RecordingLink::new());
        gw.post_to_parent(
            MODE_APPLIED,
            ModeApplied {
                mode: Mode::Layout,
                at: 42,
            },
        );

        let sent = gw.link().sent();
        assert_eq!(sent.len(), 1);
        let (message, target) = &sent[0];
        assert_eq!(target, "https://studio.example");
        assert_eq!(
            message,
            &json!({
                "channel": "studio-shell",
                "type": "mode-applied",
                "payload": {"mode": "Layout", "at": 42}
            })
        );
    }

    #[test]
    fn test_post_without_parent_is_noop() {
        let gw = gateway(RecordingLink::without_parent());
        gw.post_to_parent(
            "child-ready",
            ChildReady {
                path: "/".into(),
            },
        );
        assert!(gw.link().sent().is_empty());
    }
}
