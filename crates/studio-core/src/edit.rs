//! Edit mode: hover-targeted inline text editing.
//!
//! The text-bearing element under the pointer becomes `contenteditable`; moving
//! to another element hands the capability over, restoring the previous one
//! first. A floating indicator labels the current target with its structural
//! path. While enabled, click-family events outside the current target are
//! cancelled so links and buttons do not fire mid-edit.

use crate::host::{DomHost, Hook};
use crate::markers::{
    EDIT_STYLE_ID, EDITABLE_ATTR, EDITING_CLASS, INDICATOR_ID, TEXT_TAGS, edit_css,
};
use crate::path::element_path;

/// Horizontal margin kept between the indicator and the viewport edges.
pub const INDICATOR_MARGIN: f64 = 8.0;
/// Gap between the bottom of the target and the indicator.
pub const INDICATOR_GAP: f64 = 6.0;

const FORM_FIELD_TAGS: &[&str] = &["input", "textarea", "select"];

/// Current edit target and its `contenteditable` value before we touched it.
#[derive(Debug, Clone, PartialEq)]
struct EditTarget<E> {
    element: E,
    original_editable: Option<String>,
}

/// Inline edit subsystem state.
#[derive(Debug, Clone)]
pub struct InlineEditor<E> {
    active: bool,
    target: Option<EditTarget<E>>,
    indicator: Option<E>,
    frame_pending: bool,
}

impl<E> Default for InlineEditor<E> {
    fn default() -> Self {
        Self {
            active: false,
            target: None,
            indicator: None,
            frame_pending: false,
        }
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> InlineEditor<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn target(&self) -> Option<&E> {
        self.target.as_ref().map(|t| &t.element)
    }

    pub fn indicator(&self) -> Option<&E> {
        self.indicator.as_ref()
    }

    pub fn enable<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if self.active {
            return;
        }
        self.active = true;
        host.attach(Hook::EditPointer);
        host.attach(Hook::EditGuard);
        host.attach(Hook::EditViewport);
        tracing::debug!("edit: enabled");
    }

    /// Retarget to the text-bearing element under the pointer.
    pub fn pointer_moved<H>(&mut self, host: &mut H, target: Option<&E>, mode_attribute: &str)
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return;
        }
        if let (Some(t), Some(ind)) = (target, self.indicator.as_ref()) {
            if host.contains(ind, t) {
                return;
            }
        }

        let Some(el) = target.and_then(|t| nearest_text_element(&*host, t)) else {
            self.release(host);
            self.hide_indicator(host);
            return;
        };

        host.ensure_style(EDIT_STYLE_ID, &edit_css(mode_attribute));
        let Some(indicator) = self.ensure_indicator(host) else {
            return;
        };

        self.activate(host, &el);

        let path = element_path(&*host, &el);
        let label = if path.is_empty() {
            host.tag_name(&el)
        } else {
            path
        };
        host.set_text(&indicator, &label);
        self.schedule_reposition(host);
    }

    /// Scroll/resize: move the indicator, keep the target.
    pub fn viewport_changed<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if self.active && self.target.is_some() {
            self.schedule_reposition(host);
        }
    }

    /// Runs after layout, when target geometry is current.
    pub fn frame<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        self.frame_pending = false;
        if !self.active {
            return;
        }
        let (Some(target), Some(indicator)) = (self.target(), self.indicator.as_ref()) else {
            return;
        };

        let target = target.clone();
        let indicator = indicator.clone();

        // A hidden indicator measures zero wide; lay it out invisibly first.
        host.set_style(&indicator, "visibility", "hidden");
        host.set_style(&indicator, "display", "block");

        let rect = host.bounding_rect(&target);
        let bubble = host.bounding_rect(&indicator);
        let max_left = host.viewport_width() - bubble.width - INDICATOR_MARGIN;
        let left = rect.left.min(max_left).max(INDICATOR_MARGIN);
        let top = rect.bottom() + INDICATOR_GAP;

        host.set_style(&indicator, "left", &format!("{left}px"));
        host.set_style(&indicator, "top", &format!("{top}px"));
        host.set_style(&indicator, "visibility", "visible");
    }

    /// Whether a click-family event on `target` must be cancelled.
    ///
    /// Events inside the indicator, the current edit target or anything the
    /// page itself made editable pass through so caret placement and
    /// selection keep working.
    pub fn should_suppress<H>(&self, host: &H, target: Option<&E>) -> bool
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return false;
        }
        let Some(t) = target else {
            return true;
        };
        let inside = |el: Option<&E>| el.is_some_and(|el| host.contains(el, t));
        !(inside(self.indicator.as_ref()) || inside(self.target()) || natively_editable(host, t))
    }

    /// Remove listeners, hide the indicator and restore the last target.
    pub fn disable<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.active && self.target.is_none() {
            return;
        }
        host.detach(Hook::EditPointer);
        host.detach(Hook::EditGuard);
        host.detach(Hook::EditViewport);
        if self.frame_pending {
            host.cancel_frame();
            self.frame_pending = false;
        }
        self.hide_indicator(host);
        self.release(host);
        self.active = false;
        tracing::debug!("edit: disabled");
    }

    /// Make `el` the edit target, handing off from the previous one.
    fn activate<H>(&mut self, host: &mut H, el: &E)
    where
        H: DomHost<Element = E>,
    {
        if self.target() == Some(el) {
            return;
        }
        self.release(host);

        let original_editable = host.attribute(el, EDITABLE_ATTR);
        host.set_attribute(el, EDITABLE_ATTR, "true");
        host.add_class(el, EDITING_CLASS);
        host.focus(el);
        tracing::trace!(?el, "edit: target changed");

        self.target = Some(EditTarget {
            element: el.clone(),
            original_editable,
        });
    }

    fn release<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        let Some(prev) = self.target.take() else {
            return;
        };
        match &prev.original_editable {
            Some(value) => host.set_attribute(&prev.element, EDITABLE_ATTR, value),
            None => host.remove_attribute(&prev.element, EDITABLE_ATTR),
        }
        host.remove_class(&prev.element, EDITING_CLASS);
    }

    /// Find or create the singleton indicator.
    fn ensure_indicator<H>(&mut self, host: &mut H) -> Option<E>
    where
        H: DomHost<Element = E>,
    {
        if let Some(ind) = &self.indicator {
            if host.is_connected(ind) {
                return Some(ind.clone());
            }
        }
        let ind = match host.element_by_id(INDICATOR_ID) {
            Some(existing) => existing,
            None => host.create_overlay(INDICATOR_ID)?,
        };
        self.indicator = Some(ind.clone());
        Some(ind)
    }

    fn hide_indicator<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if let Some(ind) = &self.indicator {
            let ind = ind.clone();
            host.set_style(&ind, "display", "none");
        }
    }

    fn schedule_reposition<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.frame_pending {
            self.frame_pending = true;
            host.request_frame();
        }
    }
}

/// Closest text-bearing element at or above `el`.
fn nearest_text_element<H: DomHost>(host: &H, el: &H::Element) -> Option<H::Element> {
    let mut current = Some(el.clone());
    while let Some(candidate) = current {
        if TEXT_TAGS.contains(&host.tag_name(&candidate).as_str()) {
            return Some(candidate);
        }
        current = host.parent(&candidate);
    }
    None
}

/// Form fields and `contenteditable` regions, resolved the way the browser
/// inherits editability: the nearest explicit attribute wins.
fn natively_editable<H: DomHost>(host: &H, el: &H::Element) -> bool {
    let mut current = Some(el.clone());
    while let Some(candidate) = current {
        if FORM_FIELD_TAGS.contains(&host.tag_name(&candidate).as_str()) {
            return true;
        }
        if let Some(value) = host.attribute(&candidate, EDITABLE_ATTR) {
            match value.to_ascii_lowercase().as_str() {
                "" | "true" | "plaintext-only" => return true,
                "false" => return false,
                // Invalid values inherit.
                _ => {}
            }
        }
        current = host.parent(&candidate);
    }
    false
}
