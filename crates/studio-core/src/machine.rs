//! Mode state machine.
//!
//! The applied mode lives in the root element's mode attribute, not in this
//! struct, so CSS and other scripts see the same value we compare against.
//! Entry/exit actions run on every `apply_mode`, even when the mode did not
//! change: resending a mode re-arms a subsystem the host page perturbed.
//! Subsystem `enable` calls are idempotent, so re-arming never doubles
//! listeners.

use crate::config::StudioConfig;
use crate::edit::InlineEditor;
use crate::host::DomHost;
use crate::layout::LayoutReorder;
use crate::mode::Mode;

/// Outcome of `ModeMachine::apply_mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The mode attribute was written.
    Changed { from: Option<Mode>, to: Mode },
    /// Already in the requested mode; only entry actions re-ran.
    Unchanged(Mode),
}

impl Transition {
    pub fn mode(&self) -> Mode {
        match *self {
            Transition::Changed { to, .. } => to,
            Transition::Unchanged(mode) => mode,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModeMachine<E> {
    mode_attribute: String,
    display_attribute: String,
    layout: LayoutReorder<E>,
    edit: InlineEditor<E>,
    awaiting_ready: bool,
}

impl<E: Clone + PartialEq + std::fmt::Debug> ModeMachine<E> {
    pub fn new(config: &StudioConfig) -> Self {
        Self {
            mode_attribute: config.mode_attribute.clone(),
            display_attribute: config.display_attribute.clone(),
            layout: LayoutReorder::new(),
            edit: InlineEditor::new(),
            awaiting_ready: false,
        }
    }

    pub fn layout(&self) -> &LayoutReorder<E> {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutReorder<E> {
        &mut self.layout
    }

    pub fn edit(&self) -> &InlineEditor<E> {
        &self.edit
    }

    pub fn edit_mut(&mut self) -> &mut InlineEditor<E> {
        &mut self.edit
    }

    /// Whether a readiness callback is outstanding.
    pub fn is_awaiting_ready(&self) -> bool {
        self.awaiting_ready
    }

    /// Mode as currently recorded on the document.
    pub fn current<H>(&self, host: &H) -> Mode
    where
        H: DomHost<Element = E>,
    {
        Mode::from_attribute(host.root_attribute(&self.mode_attribute).as_deref())
    }

    pub fn apply_mode<H>(&mut self, host: &mut H, mode: Mode) -> Transition
    where
        H: DomHost<Element = E>,
    {
        let current = host.root_attribute(&self.mode_attribute);
        // An absent attribute is the implicit View state.
        let unchanged = match current.as_deref() {
            None => mode == Mode::View,
            Some(value) => value == mode.as_str(),
        };

        let transition = if unchanged {
            tracing::debug!(%mode, "mode unchanged, re-running entry actions");
            Transition::Unchanged(mode)
        } else {
            host.set_root_attribute(&self.mode_attribute, mode.as_str());
            Transition::Changed {
                from: current.as_deref().and_then(|v| v.parse().ok()),
                to: mode,
            }
        };

        self.enter(host, mode);
        self.update_display(host, mode);
        transition
    }

    /// The mode attribute changed outside `apply_mode` (or as a side effect of
    /// it). Only Layout affordances follow the attribute on their own.
    pub fn mode_attribute_changed<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if self.current(&*host) == Mode::Layout {
            self.arm_layout(host);
        } else {
            self.layout.disable(host);
        }
    }

    /// The deferred readiness point arrived: finish whatever was waiting on it.
    pub fn document_ready<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.awaiting_ready {
            return;
        }
        self.awaiting_ready = false;
        let mode = self.current(&*host);
        tracing::debug!(%mode, "document ready, resuming mode entry");
        self.enter(host, mode);
        self.update_display(host, mode);
    }

    /// Hover tracking for the Edit subsystem, which needs the mode attribute
    /// to scope its injected styles.
    pub fn pointer_moved<H>(&mut self, host: &mut H, target: Option<&E>)
    where
        H: DomHost<Element = E>,
    {
        self.edit.pointer_moved(host, target, &self.mode_attribute);
    }

    /// Disable both subsystems without touching the mode attribute.
    pub fn shutdown<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        self.layout.disable(host);
        self.edit.disable(host);
    }

    /// Exit actions for every other mode, then entry actions for `mode`.
    fn enter<H>(&mut self, host: &mut H, mode: Mode)
    where
        H: DomHost<Element = E>,
    {
        if mode != Mode::Layout {
            self.layout.disable(host);
        }
        if mode != Mode::Edit {
            self.edit.disable(host);
        }
        match mode {
            Mode::Layout => self.arm_layout(host),
            Mode::Edit => self.edit.enable(host),
            Mode::View => {}
        }
    }

    fn arm_layout<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        let styled = self.layout.ensure_styles(host, &self.mode_attribute);
        let enabled = self.layout.enable(host);
        if !(styled && enabled) {
            self.defer(host);
        }
    }

    fn defer<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.awaiting_ready {
            self.awaiting_ready = true;
            host.defer_until_ready();
        }
    }

    fn update_display<H>(&self, host: &mut H, mode: Mode)
    where
        H: DomHost<Element = E>,
    {
        if let Some(display) = host.first_with_attribute(&self.display_attribute) {
            host.set_text(&display, mode.as_str());
        }
    }
}
