//! The studio context: host, gateway and mode machine in one place.
//!
//! Browser callbacks translate DOM events into [`StudioEvent`]s and hand them
//! to [`Studio::dispatch`]; the returned [`EventResult`] tells the callback
//! what to do with the original event.

use serde_json::Value;

use crate::config::StudioConfig;
use crate::event::{EventResult, StudioEvent};
use crate::gateway::Gateway;
use crate::host::{DomHost, Hook, ParentLink};
use crate::machine::{ModeMachine, Transition};
use crate::mode::Mode;
use crate::protocol::{CHILD_READY, ChildReady, Command, MODE_APPLIED, ModeApplied};

pub struct Studio<H: DomHost, L> {
    host: H,
    gateway: Gateway<L>,
    machine: ModeMachine<H::Element>,
}

impl<H: DomHost, L: ParentLink> Studio<H, L> {
    pub fn new(host: H, link: L, config: &StudioConfig) -> Self {
        Self {
            host,
            gateway: Gateway::new(config, link),
            machine: ModeMachine::new(config),
        }
    }

    /// Watch the mode attribute and pick up whatever mode the document
    /// already declares.
    pub fn start(&mut self) {
        self.host.attach(Hook::ModeWatcher);
        self.machine.mode_attribute_changed(&mut self.host);
    }

    /// Handle one inbound cross-frame message. Returns whether it carried a
    /// command that was applied.
    pub fn handle_message(&mut self, origin: &str, data: &Value) -> bool {
        match self.gateway.accept(origin, data) {
            Some(Command::SetMode(mode)) => {
                self.apply_mode(mode);
                true
            }
            None => false,
        }
    }

    /// Run a mode transition and report it to the shell.
    pub fn apply_mode(&mut self, mode: Mode) -> Transition {
        let transition = self.machine.apply_mode(&mut self.host, mode);
        tracing::info!(%mode, "mode applied");
        self.gateway.post_to_parent(
            MODE_APPLIED,
            ModeApplied {
                mode,
                at: self.host.now_millis(),
            },
        );
        transition
    }

    /// Tell the shell this page finished loading.
    pub fn announce_ready(&self, path: &str) {
        self.gateway.post_to_parent(
            CHILD_READY,
            ChildReady {
                path: path.to_string(),
            },
        );
    }

    pub fn dispatch(&mut self, event: StudioEvent<H::Element>) -> EventResult {
        let host = &mut self.host;
        match event {
            StudioEvent::Message { origin, data } => {
                self.handle_message(&origin, &data);
                EventResult::PassThrough
            }
            StudioEvent::DocumentReady => {
                self.machine.document_ready(host);
                EventResult::PassThrough
            }
            StudioEvent::ModeAttributeChanged => {
                self.machine.mode_attribute_changed(host);
                EventResult::PassThrough
            }
            StudioEvent::BodyMutated => {
                self.machine.layout_mut().rescan(host);
                EventResult::PassThrough
            }
            StudioEvent::DragStart { target } => self.machine.layout_mut().drag_start(host, &target),
            StudioEvent::DragOver { target, client_y } => {
                self.machine.layout_mut().drag_over(host, &target, client_y)
            }
            StudioEvent::Drop => self.machine.layout_mut().drop(host),
            StudioEvent::DragEnd => {
                self.machine.layout_mut().drag_end(host);
                EventResult::PassThrough
            }
            StudioEvent::PointerMove { target } => {
                self.machine.pointer_moved(host, target.as_ref());
                EventResult::PassThrough
            }
            StudioEvent::Interaction { target } => {
                if self.machine.edit().should_suppress(&*host, target.as_ref()) {
                    EventResult::Suppressed
                } else {
                    EventResult::PassThrough
                }
            }
            StudioEvent::ViewportChanged => {
                self.machine.edit_mut().viewport_changed(host);
                EventResult::PassThrough
            }
            StudioEvent::AnimationFrame => {
                self.machine.edit_mut().frame(host);
                EventResult::PassThrough
            }
        }
    }

    /// Disable every subsystem and stop watching the mode attribute. The
    /// attribute itself is left as is.
    pub fn shutdown(&mut self) {
        self.machine.shutdown(&mut self.host);
        self.host.detach(Hook::ModeWatcher);
    }

    /// Mode currently recorded on the document.
    pub fn mode(&self) -> Mode {
        self.machine.current(&self.host)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn gateway(&self) -> &Gateway<L> {
        &self.gateway
    }

    pub fn machine(&self) -> &ModeMachine<H::Element> {
        &self.machine
    }
}
