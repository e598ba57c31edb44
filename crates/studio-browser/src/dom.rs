//! `web-sys` implementation of [`DomHost`].
//!
//! Listeners and observers installed for a [`Hook`] are owned by `BrowserDom`
//! and torn down on `detach`: gloo's `EventListener` unregisters on drop, and
//! observers are disconnected before their callback closure is released.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions, EventListenerPhase};
use studio_core::{DomHost, EventResult, HostError, Hook, Placement, Rect, StudioEvent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DragEvent, Element, Event, EventTarget, FocusOptions, HtmlElement, MouseEvent,
    MutationObserver, MutationObserverInit, Node, Window,
};

/// Where translated DOM events go. Returns what to do with the source event.
pub type EventSink = Rc<dyn Fn(StudioEvent<Element>) -> EventResult>;

/// Click-family events cancelled while inline editing is armed.
const GUARDED_EVENTS: &[&str] = &[
    "click",
    "dblclick",
    "auxclick",
    "mousedown",
    "mouseup",
    "pointerdown",
    "pointerup",
    "touchstart",
    "touchend",
    "submit",
];

struct Observer {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[derive(Default)]
struct Installed {
    listeners: Vec<EventListener>,
    observer: Option<Observer>,
}

pub struct BrowserDom {
    window: Window,
    document: Document,
    mode_attribute: String,
    sink: EventSink,
    hooks: HashMap<Hook, Installed>,
    ready: Option<EventListener>,
    frame: Rc<Cell<Option<i32>>>,
    /// Kept so a cancelled frame releases its callback (and the sink it holds).
    frame_callback: Option<Closure<dyn FnMut()>>,
}

impl BrowserDom {
    pub fn new(
        window: Window,
        document: Document,
        mode_attribute: impl Into<String>,
        sink: EventSink,
    ) -> Self {
        Self {
            window,
            document,
            mode_attribute: mode_attribute.into(),
            sink,
            hooks: HashMap::new(),
            ready: None,
            frame: Rc::new(Cell::new(None)),
            frame_callback: None,
        }
    }

    fn listen<F>(
        &self,
        target: &EventTarget,
        kind: &'static str,
        options: EventListenerOptions,
        translate: F,
    ) -> EventListener
    where
        F: Fn(&Event) -> Option<StudioEvent<Element>> + 'static,
    {
        let sink = self.sink.clone();
        EventListener::new_with_options(target, kind, options, move |event| {
            if let Some(studio_event) = translate(event) {
                apply_result(event, sink(studio_event));
            }
        })
    }

    fn observe(
        &self,
        target: &Node,
        init: &MutationObserverInit,
        event: fn() -> StudioEvent<Element>,
    ) -> Result<Observer, HostError> {
        let sink = self.sink.clone();
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                sink(event());
            },
        );
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())
            .map_err(|e| format!("MutationObserver failed: {:?}", e))?;
        observer
            .observe_with_options(target, init)
            .map_err(|e| format!("observe failed: {:?}", e))?;
        Ok(Observer {
            observer,
            _callback: callback,
        })
    }

    fn install(&self, hook: Hook) -> Result<Installed, HostError> {
        let mut installed = Installed::default();
        match hook {
            Hook::LayoutDrag => {
                let doc: &EventTarget = &self.document;
                installed.listeners = vec![
                    self.listen(doc, "dragstart", bubble(), |event| {
                        Some(StudioEvent::DragStart {
                            target: event_element(event)?,
                        })
                    }),
                    self.listen(
                        doc,
                        "dragover",
                        EventListenerOptions::enable_prevent_default(),
                        |event| {
                            let client_y = event.dyn_ref::<MouseEvent>()?.client_y() as f64;
                            Some(StudioEvent::DragOver {
                                target: event_element(event)?,
                                client_y,
                            })
                        },
                    ),
                    self.listen(
                        doc,
                        "drop",
                        EventListenerOptions::enable_prevent_default(),
                        |_| Some(StudioEvent::Drop),
                    ),
                    self.listen(doc, "dragend", bubble(), |_| Some(StudioEvent::DragEnd)),
                ];
            }
            Hook::LayoutObserver => {
                let body = self.document.body().ok_or("document has no body")?;
                let init = MutationObserverInit::new();
                init.set_child_list(true);
                init.set_subtree(true);
                installed.observer = Some(self.observe(&body, &init, || StudioEvent::BodyMutated)?);
            }
            Hook::EditPointer => {
                // Touch input never produces `mousemove` once the guard
                // cancels `touchstart`, but pointer events still arrive.
                installed.listeners = ["mousemove", "pointermove"]
                    .into_iter()
                    .map(|kind| {
                        self.listen(&self.document, kind, bubble(), |event| {
                            Some(StudioEvent::PointerMove {
                                target: event_element(event),
                            })
                        })
                    })
                    .collect();
            }
            Hook::EditGuard => {
                let capture = EventListenerOptions {
                    phase: EventListenerPhase::Capture,
                    passive: false,
                };
                installed.listeners = GUARDED_EVENTS
                    .iter()
                    .map(|&kind| {
                        self.listen(&self.document, kind, capture, |event| {
                            Some(StudioEvent::Interaction {
                                target: event_element(event),
                            })
                        })
                    })
                    .collect();
            }
            Hook::EditViewport => {
                installed.listeners = vec![
                    // Capture so scrolls of nested containers count too.
                    self.listen(
                        &self.window,
                        "scroll",
                        EventListenerOptions::run_in_capture_phase(),
                        |_| Some(StudioEvent::ViewportChanged),
                    ),
                    self.listen(&self.window, "resize", bubble(), |_| {
                        Some(StudioEvent::ViewportChanged)
                    }),
                ];
            }
            Hook::ModeWatcher => {
                let root = self
                    .document
                    .document_element()
                    .ok_or("document has no root element")?;
                let filter = js_sys::Array::of1(&JsValue::from_str(&self.mode_attribute));
                let init = MutationObserverInit::new();
                init.set_attributes(true);
                init.set_attribute_filter(&filter);
                installed.observer =
                    Some(self.observe(&root, &init, || StudioEvent::ModeAttributeChanged)?);
            }
        }
        Ok(installed)
    }
}

impl DomHost for BrowserDom {
    type Element = Element;

    fn has_head(&self) -> bool {
        self.document.head().is_some()
    }

    fn has_body(&self) -> bool {
        self.document.body().is_some()
    }

    fn defer_until_ready(&mut self) {
        if self.ready.is_some() {
            return;
        }
        let sink = self.sink.clone();
        self.ready = Some(EventListener::once(
            &self.document,
            "DOMContentLoaded",
            move |_| {
                sink(StudioEvent::DocumentReady);
            },
        ));
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.document.document_element()?.get_attribute(name)
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        if let Some(root) = self.document.document_element() {
            let _ = root.set_attribute(name, value);
        }
    }

    fn first_with_attribute(&self, name: &str) -> Option<Element> {
        self.document
            .query_selector(&format!("[{name}]"))
            .ok()
            .flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn ensure_style(&mut self, id: &str, css: &str) -> bool {
        if self.document.get_element_by_id(id).is_some() {
            return true;
        }
        let Some(head) = self.document.head() else {
            return false;
        };
        let Ok(style) = self.document.create_element("style") else {
            return false;
        };
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style).is_ok()
    }

    fn create_overlay(&mut self, id: &str) -> Option<Element> {
        let body = self.document.body()?;
        let div = self.document.create_element("div").ok()?;
        div.set_id(id);
        body.append_child(&div).ok()?;
        Some(div)
    }

    fn elements_by_tag(&self, tags: &[&str]) -> Vec<Element> {
        let Some(body) = self.document.body() else {
            return Vec::new();
        };
        let Ok(nodes) = body.query_selector_all(&tags.join(",")) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn viewport_width(&self) -> f64 {
        self.document
            .document_element()
            .map(|root| root.client_width() as f64)
            .filter(|w| *w > 0.0)
            .or_else(|| self.window.inner_width().ok()?.as_f64())
            .unwrap_or(0.0)
    }

    fn tag_name(&self, el: &Element) -> String {
        el.tag_name().to_ascii_lowercase()
    }

    fn attribute(&self, el: &Element, name: &str) -> Option<String> {
        el.get_attribute(name)
    }

    fn set_attribute(&mut self, el: &Element, name: &str, value: &str) {
        let _ = el.set_attribute(name, value);
    }

    fn remove_attribute(&mut self, el: &Element, name: &str) {
        let _ = el.remove_attribute(name);
    }

    fn add_class(&mut self, el: &Element, class: &str) {
        let _ = el.class_list().add_1(class);
    }

    fn remove_class(&mut self, el: &Element, class: &str) {
        let _ = el.class_list().remove_1(class);
    }

    fn set_text(&mut self, el: &Element, text: &str) {
        el.set_text_content(Some(text));
    }

    fn set_style(&mut self, el: &Element, property: &str, value: &str) {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let _ = html.style().set_property(property, value);
        }
    }

    fn parent(&self, el: &Element) -> Option<Element> {
        el.parent_element()
    }

    fn previous_sibling(&self, el: &Element) -> Option<Element> {
        el.previous_element_sibling()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &Node = node;
        ancestor.contains(Some(node))
    }

    fn is_connected(&self, el: &Element) -> bool {
        el.is_connected()
    }

    fn bounding_rect(&self, el: &Element) -> Rect {
        let r = el.get_bounding_client_rect();
        Rect::new(r.left(), r.top(), r.width(), r.height())
    }

    fn move_adjacent(
        &mut self,
        el: &Element,
        reference: &Element,
        placement: Placement,
    ) -> Result<(), HostError> {
        let parent = reference.parent_node().ok_or("reference has no parent")?;
        let reference: &Node = reference;
        let before = match placement {
            Placement::Before => Some(reference.clone()),
            Placement::After => reference.next_sibling(),
        };
        parent
            .insert_before(el, before.as_ref())
            .map_err(|e| format!("insert_before failed: {:?}", e))?;
        Ok(())
    }

    fn focus(&mut self, el: &Element) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        let options = FocusOptions::new();
        options.set_prevent_scroll(true);
        if html.focus_with_options(&options).is_err() {
            let _ = html.focus();
        }
    }

    fn attach(&mut self, hook: Hook) {
        if self.hooks.contains_key(&hook) {
            return;
        }
        match self.install(hook) {
            Ok(installed) => {
                self.hooks.insert(hook, installed);
            }
            Err(e) => tracing::warn!(?hook, "attach failed: {e}"),
        }
    }

    fn detach(&mut self, hook: Hook) {
        self.hooks.remove(&hook);
    }

    fn request_frame(&mut self) {
        if self.frame.get().is_some() {
            return;
        }
        let sink = self.sink.clone();
        let slot = self.frame.clone();
        // Replacing the previous callback is fine: with no frame pending it
        // has already run.
        let callback = Closure::once(move || {
            slot.set(None);
            sink(StudioEvent::AnimationFrame);
        });
        match self
            .window
            .request_animation_frame(callback.as_ref().unchecked_ref())
        {
            Ok(id) => {
                self.frame.set(Some(id));
                self.frame_callback = Some(callback);
            }
            Err(e) => tracing::warn!("requestAnimationFrame failed: {:?}", e),
        }
    }

    fn cancel_frame(&mut self) {
        if let Some(id) = self.frame.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        self.frame_callback = None;
    }

    fn now_millis(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

impl Drop for BrowserDom {
    fn drop(&mut self) {
        self.cancel_frame();
    }
}

fn bubble() -> EventListenerOptions {
    EventListenerOptions::default()
}

/// The element an event is about: its target, or the parent element when the
/// target is a text node.
pub fn event_element(event: &Event) -> Option<Element> {
    let target = event.target()?;
    match target.dyn_into::<Element>() {
        Ok(el) => Some(el),
        Err(target) => target.dyn_ref::<Node>()?.parent_element(),
    }
}

/// Carry out what the studio decided for a DOM event.
pub fn apply_result(event: &Event, result: EventResult) {
    match result {
        EventResult::PassThrough => {}
        EventResult::Handled => {
            event.prevent_default();
            if let Some(dt) = event.dyn_ref::<DragEvent>().and_then(|e| e.data_transfer()) {
                dt.set_drop_effect("move");
            }
        }
        EventResult::Suppressed => {
            event.prevent_default();
            event.stop_propagation();
            event.stop_immediate_propagation();
        }
        EventResult::DragStarted => {
            if let Some(dt) = event.dyn_ref::<DragEvent>().and_then(|e| e.data_transfer()) {
                dt.set_effect_allowed("move");
                // Firefox will not start a drag without data.
                let _ = dt.set_data("text/plain", "");
            }
        }
    }
}
