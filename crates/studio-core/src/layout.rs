//! Layout mode: drag-reordering of structural containers.
//!
//! While enabled, every eligible container is made natively draggable and
//! tagged so it can be restored later. A body observer re-runs the same
//! marking (`rescan`) so containers inserted later are picked up too.
//!
//! Reordering is live: each `dragover` moves the dragged container before or
//! after the hovered one depending on which half of it the pointer is in.
//! There is no commit step and no undo.

use crate::event::EventResult;
use crate::host::{DomHost, Hook, Placement};
use crate::markers::{
    DRAGGABLE_ATTR, DRAGGABLE_CLASS, DRAGGABLE_MARKER, DRAGGING_CLASS, DROP_TARGET_CLASS,
    INDICATOR_ID, LAYOUT_STYLE_ID, STRUCTURAL_TAGS, layout_css,
};

/// A container we marked, with the `draggable` value it had before.
#[derive(Debug, Clone, PartialEq)]
struct Registration<E> {
    element: E,
    original_draggable: Option<String>,
}

/// Drag-reorder subsystem state.
#[derive(Debug, Clone)]
pub struct LayoutReorder<E> {
    active: bool,
    registrations: Vec<Registration<E>>,
    dragged: Option<E>,
    drop_target: Option<E>,
}

impl<E> Default for LayoutReorder<E> {
    fn default() -> Self {
        Self {
            active: false,
            registrations: Vec::new(),
            dragged: None,
            drop_target: None,
        }
    }
}

impl<E: Clone + PartialEq + std::fmt::Debug> LayoutReorder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Elements currently marked draggable by us.
    pub fn marked(&self) -> impl Iterator<Item = &E> {
        self.registrations.iter().map(|r| &r.element)
    }

    pub fn dragged(&self) -> Option<&E> {
        self.dragged.as_ref()
    }

    /// Inject the Layout affordance styles once per document.
    ///
    /// Returns `false` while the document has no head yet.
    pub fn ensure_styles<H>(&self, host: &mut H, mode_attribute: &str) -> bool
    where
        H: DomHost<Element = E>,
    {
        host.ensure_style(LAYOUT_STYLE_ID, &layout_css(mode_attribute))
    }

    /// Mark eligible containers and start listening.
    ///
    /// When already active this only rescans, so listeners are never doubled.
    /// Returns `false` if the body does not exist yet; the caller is expected
    /// to retry once the document is ready.
    pub fn enable<H>(&mut self, host: &mut H) -> bool
    where
        H: DomHost<Element = E>,
    {
        if self.active {
            self.rescan(host);
            return true;
        }
        if !host.has_body() {
            tracing::debug!("layout: body not ready, deferring");
            return false;
        }

        self.active = true;
        self.rescan(host);
        host.attach(Hook::LayoutDrag);
        host.attach(Hook::LayoutObserver);
        tracing::debug!(marked = self.registrations.len(), "layout: enabled");
        true
    }

    /// Reconcile markings with the current document.
    ///
    /// Registrations whose element left the document or stopped qualifying are
    /// restored and dropped; newly eligible containers are marked.
    pub fn rescan<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return;
        }
        let indicator = host.element_by_id(INDICATOR_ID);

        let previous = std::mem::take(&mut self.registrations);
        for reg in previous {
            if host.is_connected(&reg.element)
                && qualifies(&*host, &reg.element, indicator.as_ref())
            {
                self.registrations.push(reg);
            } else {
                if self.dragged.as_ref() == Some(&reg.element) {
                    self.dragged = None;
                }
                if self.drop_target.as_ref() == Some(&reg.element) {
                    self.drop_target = None;
                }
                restore(host, &reg);
            }
        }

        // Anything already carrying the marker is ours. A marked node cloned
        // by the page is never registered itself.
        for el in host.elements_by_tag(STRUCTURAL_TAGS) {
            if host.attribute(&el, DRAGGABLE_MARKER).is_some()
                || !qualifies(&*host, &el, indicator.as_ref())
            {
                continue;
            }
            let original_draggable = host.attribute(&el, DRAGGABLE_ATTR);
            host.set_attribute(&el, DRAGGABLE_ATTR, "true");
            host.set_attribute(&el, DRAGGABLE_MARKER, "true");
            host.add_class(&el, DRAGGABLE_CLASS);
            self.registrations.push(Registration {
                element: el,
                original_draggable,
            });
        }
    }

    pub fn drag_start<H>(&mut self, host: &mut H, target: &E) -> EventResult
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return EventResult::PassThrough;
        }
        let Some(container) = self.container_for(&*host, target) else {
            return EventResult::PassThrough;
        };

        self.clear_session(host);
        host.add_class(&container, DRAGGING_CLASS);
        tracing::trace!(?container, "layout: drag start");
        self.dragged = Some(container);
        EventResult::DragStarted
    }

    /// Live-reorder the dragged container around the hovered one.
    pub fn drag_over<H>(&mut self, host: &mut H, target: &E, client_y: f64) -> EventResult
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return EventResult::PassThrough;
        }
        let Some(dragged) = self.dragged.clone() else {
            return EventResult::PassThrough;
        };
        let Some(over) = self.container_for(&*host, target) else {
            return EventResult::PassThrough;
        };
        // Moving into itself, into a descendant or around an ancestor would
        // either throw or tear the subtree apart.
        if host.contains(&dragged, &over) || host.contains(&over, &dragged) {
            return EventResult::PassThrough;
        }

        self.set_drop_target(host, Some(over.clone()));

        let rect = host.bounding_rect(&over);
        let placement = if client_y > rect.mid_y() {
            Placement::After
        } else {
            Placement::Before
        };

        let in_place = match placement {
            Placement::After => host.previous_sibling(&dragged).as_ref() == Some(&over),
            Placement::Before => host.previous_sibling(&over).as_ref() == Some(&dragged),
        };
        if !in_place {
            if let Err(e) = host.move_adjacent(&dragged, &over, placement) {
                tracing::warn!("layout: reorder failed: {e}");
            }
        }
        EventResult::Handled
    }

    /// Drops never fall through to the browser while Layout is active. The
    /// session ends here; the `dragend` that follows finds nothing to clear.
    pub fn drop<H>(&mut self, host: &mut H) -> EventResult
    where
        H: DomHost<Element = E>,
    {
        if !self.active {
            return EventResult::PassThrough;
        }
        self.clear_session(host);
        EventResult::Handled
    }

    pub fn drag_end<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        self.clear_session(host);
    }

    /// Stop listening and restore every marked container.
    pub fn disable<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if !self.active && self.registrations.is_empty() {
            return;
        }
        host.detach(Hook::LayoutObserver);
        host.detach(Hook::LayoutDrag);
        self.clear_session(host);
        for reg in std::mem::take(&mut self.registrations) {
            restore(host, &reg);
        }
        self.active = false;
        tracing::debug!("layout: disabled");
    }

    fn is_marked(&self, el: &E) -> bool {
        self.registrations.iter().any(|r| &r.element == el)
    }

    /// Nearest marked container at or above `target`.
    fn container_for<H>(&self, host: &H, target: &E) -> Option<E>
    where
        H: DomHost<Element = E>,
    {
        let mut current = Some(target.clone());
        while let Some(el) = current {
            if host.attribute(&el, DRAGGABLE_MARKER).is_some() && self.is_marked(&el) {
                return Some(el);
            }
            current = host.parent(&el);
        }
        None
    }

    fn set_drop_target<H>(&mut self, host: &mut H, next: Option<E>)
    where
        H: DomHost<Element = E>,
    {
        if self.drop_target == next {
            return;
        }
        if let Some(prev) = self.drop_target.take() {
            host.remove_class(&prev, DROP_TARGET_CLASS);
        }
        if let Some(el) = &next {
            host.add_class(el, DROP_TARGET_CLASS);
        }
        self.drop_target = next;
    }

    fn clear_session<H>(&mut self, host: &mut H)
    where
        H: DomHost<Element = E>,
    {
        if let Some(el) = self.dragged.take() {
            host.remove_class(&el, DRAGGING_CLASS);
        }
        self.set_drop_target(host, None);
    }
}

/// Structural container that is not the indicator or inside it.
fn qualifies<H: DomHost>(host: &H, el: &H::Element, indicator: Option<&H::Element>) -> bool {
    let tag = host.tag_name(el);
    if !STRUCTURAL_TAGS.contains(&tag.as_str()) {
        return false;
    }
    !indicator.is_some_and(|ind| host.contains(ind, el))
}

fn restore<H: DomHost>(host: &mut H, reg: &Registration<H::Element>) {
    match &reg.original_draggable {
        Some(value) => host.set_attribute(&reg.element, DRAGGABLE_ATTR, value),
        None => host.remove_attribute(&reg.element, DRAGGABLE_ATTR),
    }
    host.remove_attribute(&reg.element, DRAGGABLE_MARKER);
    host.remove_class(&reg.element, DRAGGABLE_CLASS);
    host.remove_class(&reg.element, DRAGGING_CLASS);
    host.remove_class(&reg.element, DROP_TARGET_CLASS);
}
