//! Host abstraction traits for the studio runtime.
//!
//! These traits define the interface between the mode/edit/layout logic and the
//! live document it decorates. The browser implementation lives in
//! `studio-browser` and talks to `web-sys`; tests use an in-memory tree. Keeping
//! every DOM touch behind `DomHost` is what lets the state machine run without
//! a live document.

use crate::error::HostError;

/// Screen rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Vertical midpoint, used to pick before/after during drag-over.
    pub fn mid_y(&self) -> f64 {
        self.top + self.height / 2.0
    }
}

/// Where to move an element relative to a reference sibling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Before,
    After,
}

/// Listener groups owned by a subsystem.
///
/// A host installs the concrete listeners/observers for a hook on `attach` and
/// must synchronously remove all of them on `detach`, so nothing queued for a
/// disabled subsystem can fire afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Hook {
    /// `dragstart`/`dragover`/`drop`/`dragend` on the document.
    LayoutDrag,
    /// Subtree child-list observer on the document body.
    LayoutObserver,
    /// `mousemove`/`pointermove` target tracking.
    EditPointer,
    /// Capture-phase cancellation of click-family events.
    EditGuard,
    /// `scroll`/`resize` repositioning of the hover indicator.
    EditViewport,
    /// Attribute observer on the document element's mode attribute.
    ModeWatcher,
}

/// Live document operations needed by the studio subsystems.
///
/// Element handles compare by identity. Every method must be safe to call at
/// any document readiness point: queries against a missing head/body return
/// empty results or `false` instead of failing.
pub trait DomHost {
    type Element: Clone + PartialEq + std::fmt::Debug;

    // === Readiness ===

    /// Whether `document.head` exists yet.
    fn has_head(&self) -> bool;

    /// Whether `document.body` exists yet.
    fn has_body(&self) -> bool;

    /// Arrange for a single `StudioEvent::DocumentReady` once the document has
    /// parsed. Repeated calls before it fires must not register twice.
    fn defer_until_ready(&mut self);

    // === Document level ===

    /// Read an attribute of the root (`<html>`) element.
    fn root_attribute(&self, name: &str) -> Option<String>;

    /// Write an attribute of the root (`<html>`) element.
    fn set_root_attribute(&mut self, name: &str, value: &str);

    /// First element in the document carrying `name` as an attribute.
    fn first_with_attribute(&self, name: &str) -> Option<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Append a `<style id=..>` to the head unless one with that id exists.
    ///
    /// Returns `true` when the style is present after the call.
    fn ensure_style(&mut self, id: &str, css: &str) -> bool;

    /// Create a `<div id=..>` appended to the body.
    fn create_overlay(&mut self, id: &str) -> Option<Self::Element>;

    /// Body descendants whose tag is in `tags`, in document order.
    fn elements_by_tag(&self, tags: &[&str]) -> Vec<Self::Element>;

    fn viewport_width(&self) -> f64;

    // === Element level ===

    /// Lowercase tag name.
    fn tag_name(&self, el: &Self::Element) -> String;

    fn attribute(&self, el: &Self::Element, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: &Self::Element, name: &str, value: &str);
    fn remove_attribute(&mut self, el: &Self::Element, name: &str);

    fn add_class(&mut self, el: &Self::Element, class: &str);
    fn remove_class(&mut self, el: &Self::Element, class: &str);

    fn set_text(&mut self, el: &Self::Element, text: &str);
    fn set_style(&mut self, el: &Self::Element, property: &str, value: &str);

    /// Parent element. `None` for the root element and detached nodes.
    fn parent(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Previous element sibling.
    fn previous_sibling(&self, el: &Self::Element) -> Option<Self::Element>;

    /// Inclusive containment: `contains(a, a)` is `true`.
    fn contains(&self, ancestor: &Self::Element, node: &Self::Element) -> bool;

    fn is_connected(&self, el: &Self::Element) -> bool;

    fn bounding_rect(&self, el: &Self::Element) -> Rect;

    /// Move `el` to sit immediately before/after `reference` in its parent.
    fn move_adjacent(
        &mut self,
        el: &Self::Element,
        reference: &Self::Element,
        placement: Placement,
    ) -> Result<(), HostError>;

    /// Focus without scrolling when the platform allows it, plain focus otherwise.
    fn focus(&mut self, el: &Self::Element);

    // === Scheduling ===

    fn attach(&mut self, hook: Hook);
    fn detach(&mut self, hook: Hook);

    /// Schedule one `StudioEvent::AnimationFrame` after the next layout pass.
    fn request_frame(&mut self);

    /// Drop a pending frame request, if any.
    fn cancel_frame(&mut self);

    /// Wall clock in epoch milliseconds.
    fn now_millis(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Outbound channel to the shell in the parent browsing context.
pub trait ParentLink {
    /// Whether there is a parent frame to talk to at all.
    fn has_parent(&self) -> bool;

    /// Post a JSON-compatible message to the parent.
    fn post(&self, message: &serde_json::Value, target_origin: &str) -> Result<(), HostError>;
}
