//! Error types for the studio runtime.
//!
//! None of these ever reach the host page: the gateway logs and drops
//! protocol errors, and host failures degrade to a warning.

use miette::Diagnostic;

/// Inbound message could not be turned into a command.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Message data was not a `{channel, type, payload}` object
    #[error("message is not a studio envelope")]
    #[diagnostic(code(studio::protocol::envelope))]
    NotAnEnvelope,

    /// Envelope addressed to another channel
    #[error("message on channel {found:?}, expected {expected:?}")]
    #[diagnostic(code(studio::protocol::channel))]
    WrongChannel { expected: String, found: Option<String> },

    /// Envelope type this runtime does not handle
    #[error("unknown message type {0:?}")]
    #[diagnostic(code(studio::protocol::unknown_type))]
    UnknownType(String),

    /// `set-mode` without a usable `payload.mode`
    #[error("set-mode command without a mode")]
    #[diagnostic(code(studio::protocol::missing_mode))]
    MissingMode,

    /// `payload.mode` is not one of the known modes
    #[error("unknown mode {0:?}")]
    #[diagnostic(
        code(studio::protocol::unknown_mode),
        help("expected one of View, Layout, Edit")
    )]
    UnknownMode(String),
}

/// A document or messaging operation failed on the host side.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
#[error("host operation failed: {0}")]
#[diagnostic(code(studio::host))]
pub struct HostError(pub String);

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError(s.to_string())
    }
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError(s)
    }
}

/// Configuration rejected at install time.
#[derive(thiserror::Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("channel name must not be empty")]
    #[diagnostic(code(studio::config::channel))]
    EmptyChannel,

    #[error("attribute name {0:?} is not a valid attribute name")]
    #[diagnostic(code(studio::config::attribute))]
    InvalidAttribute(String),
}
