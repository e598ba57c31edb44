//! Browser DOM layer for the studio shell runtime.
//!
//! Implements the `studio-core` host traits on top of `web-sys` and wires the
//! window-level listeners. It assumes a `wasm32-unknown-unknown` target
//! environment.
//!
//! # Architecture
//!
//! - `dom`: [`BrowserDom`], listener/observer management, frame scheduling
//! - `link`: [`WindowParent`], `postMessage` to the embedding shell
//! - `config`: configuration from page globals
//! - `runtime`: [`StudioRuntime`], install/uninstall and message routing
//!
//! # Re-exports
//!
//! This crate re-exports `studio-core` for convenience, so consumers only need
//! to depend on `studio-browser`.

// Re-export core crate
pub use studio_core;
pub use studio_core::*;

pub mod config;
pub mod dom;
pub mod link;
pub mod runtime;

pub use config::config_from_window;
pub use dom::{BrowserDom, EventSink};
pub use link::WindowParent;
pub use runtime::{BrowserStudio, StudioRuntime};
