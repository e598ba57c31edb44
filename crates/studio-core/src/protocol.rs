//! Wire format shared with the shell.
//!
//! Every message in either direction is an envelope
//! `{ channel, type, payload }`. Inbound, only `set-mode` is understood;
//! outbound, the runtime sends `mode-applied` and `child-ready`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::mode::Mode;

pub const SET_MODE: &str = "set-mode";
pub const MODE_APPLIED: &str = "mode-applied";
pub const CHILD_READY: &str = "child-ready";

/// A decoded inbound command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(Mode),
}

#[derive(Debug, Deserialize)]
struct InboundEnvelope {
    #[serde(default)]
    channel: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    payload: Value,
}

/// Outbound envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<'a, P> {
    pub channel: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub payload: P,
}

/// Payload of `mode-applied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeApplied {
    pub mode: Mode,
    /// Epoch milliseconds.
    pub at: u64,
}

/// Payload of `child-ready`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildReady {
    pub path: String,
}

/// Decode message data received on the window.
///
/// Channel is checked before type, so foreign traffic is reported as
/// `WrongChannel` regardless of what it carries.
pub fn decode_command(data: &Value, channel: &str) -> Result<Command, ProtocolError> {
    if !data.is_object() {
        return Err(ProtocolError::NotAnEnvelope);
    }
    let envelope = InboundEnvelope::deserialize(data).map_err(|_| ProtocolError::NotAnEnvelope)?;

    if envelope.channel.as_deref() != Some(channel) {
        return Err(ProtocolError::WrongChannel {
            expected: channel.to_string(),
            found: envelope.channel,
        });
    }

    match envelope.kind.as_deref() {
        Some(SET_MODE) => {
            let mode = envelope
                .payload
                .get("mode")
                .ok_or(ProtocolError::MissingMode)?;
            match mode {
                Value::String(s) => Ok(Command::SetMode(s.parse()?)),
                Value::Null | Value::Bool(false) => Err(ProtocolError::MissingMode),
                other => Err(ProtocolError::UnknownMode(other.to_string())),
            }
        }
        other => Err(ProtocolError::UnknownType(
            other.unwrap_or_default().to_string(),
        )),
    }
}

/// Encode an outbound envelope as JSON.
pub fn encode<P: Serialize>(channel: &str, kind: &str, payload: P) -> Value {
    let envelope = Envelope {
        channel,
        kind,
        payload,
    };
    // Payload types are plain structs/maps, which always serialize.
    serde_json::to_value(envelope).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_set_mode() {
        let data = json!({"channel": "studio-shell", "type": "set-mode", "payload": {"mode": "Layout"}});
        assert_eq!(
            decode_command(&data, "studio-shell"),
            Ok(Command::SetMode(Mode::Layout))
        );
    }

    #[test]
    fn test_decode_wrong_channel() {
        let data = json!({"channel": "other", "type": "set-mode", "payload": {"mode": "Edit"}});
        assert!(matches!(
            decode_command(&data, "studio-shell"),
            Err(ProtocolError::WrongChannel { .. })
        ));

        let data = json!({"type": "set-mode", "payload": {"mode": "Edit"}});
        assert!(matches!(
            decode_command(&data, "studio-shell"),
            Err(ProtocolError::WrongChannel { found: None, .. })
        ));
    }

    #[test]
    fn test_decode_missing_mode() {
        for payload in [json!({}), json!({"mode": ""}), json!({"mode": null}), json!(null)] {
            let data = json!({"channel": "studio-shell", "type": "set-mode", "payload": payload});
            assert_eq!(
                decode_command(&data, "studio-shell"),
                Err(ProtocolError::MissingMode),
                "payload {payload}"
            );
        }
    }

    #[test]
    fn test_decode_unknown_mode_and_type() {
        let data = json!({"channel": "studio-shell", "type": "set-mode", "payload": {"mode": "Preview"}});
        assert_eq!(
            decode_command(&data, "studio-shell"),
            Err(ProtocolError::UnknownMode("Preview".into()))
        );

        let data = json!({"channel": "studio-shell", "type": "ping", "payload": {}});
        assert_eq!(
            decode_command(&data, "studio-shell"),
            Err(ProtocolError::UnknownType("ping".into()))
        );
    }

    #[test]
    fn test_decode_non_object() {
        assert_eq!(
            decode_command(&json!("set-mode"), "studio-shell"),
            Err(ProtocolError::NotAnEnvelope)
        );
        assert_eq!(
            decode_command(&Value::Null, "studio-shell"),
            Err(ProtocolError::NotAnEnvelope)
        );
    }

    #[test]
    fn test_encode_mode_applied() {
        let envelope = Envelope {
            channel: "studio-shell",
            kind: MODE_APPLIED,
            payload: ModeApplied {
                mode: Mode::Edit,
                at: 1_700_000_000_000,
            },
        };
        insta::assert_snapshot!(
            serde_json::to_string(&envelope).unwrap(),
            @r#"{"channel":"studio-shell","type":"mode-applied","payload":{"mode":"Edit","at":1700000000000}}"#
        );
    }

    #[test]
    fn test_encode_child_ready() {
        let value = encode(
            "studio-shell",
            CHILD_READY,
            ChildReady {
                path: "/pricing".into(),
            },
        );
        assert_eq!(value["type"], "child-ready");
        assert_eq!(value["payload"]["path"], "/pricing");
        assert_eq!(value["channel"], "studio-shell");
    }
}
