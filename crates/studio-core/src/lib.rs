//! Core logic for the studio shell runtime.
//!
//! A page embedded in the studio shell runs in one of three modes:
//!
//! - `View`: the page behaves normally.
//! - `Layout`: generic block containers can be dragged to reorder them.
//! - `Edit`: hovering text turns it editable in place, with a floating
//!   label naming the element.
//!
//! The shell switches modes over `postMessage`. This crate holds the state
//! machine, both subsystems and the wire protocol, all written against the
//! [`DomHost`] and [`ParentLink`] traits so they run (and are tested) without
//! a browser. `studio-browser` provides the `web-sys` implementations.

pub mod config;
pub mod edit;
pub mod error;
pub mod event;
pub mod gateway;
pub mod host;
pub mod layout;
pub mod machine;
pub mod markers;
pub mod mode;
pub mod origin;
pub mod path;
pub mod protocol;
pub mod studio;

#[cfg(test)]
pub(crate) mod testing;

pub use config::StudioConfig;
pub use edit::InlineEditor;
pub use error::{ConfigError, HostError, ProtocolError};
pub use event::{EventResult, StudioEvent};
pub use gateway::Gateway;
pub use host::{DomHost, Hook, ParentLink, Placement, Rect};
pub use layout::LayoutReorder;
pub use machine::{ModeMachine, Transition};
pub use mode::Mode;
pub use origin::OriginPolicy;
pub use path::element_path;
pub use protocol::{ChildReady, Command, Envelope, ModeApplied};
pub use studio::Studio;
