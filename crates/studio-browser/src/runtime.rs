//! Installed runtime: the studio plus the window-level listeners feeding it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_utils::format::JsValueSerdeExt;
use serde_json::Value;
use studio_core::{EventResult, HostError, Mode, Studio, StudioConfig, StudioEvent, Transition};
use wasm_bindgen::JsCast;
use web_sys::{Element, MessageEvent, Window};

use crate::dom::{BrowserDom, EventSink};
use crate::link::WindowParent;

pub type BrowserStudio = Studio<BrowserDom, WindowParent>;

/// Owns the studio for as long as the page should respond to the shell.
/// Dropping it (or calling [`StudioRuntime::uninstall`]) disables both
/// subsystems and removes every listener; the mode attribute stays as is.
pub struct StudioRuntime {
    studio: Rc<RefCell<BrowserStudio>>,
    _message: EventListener,
    _loaded: Option<EventListener>,
}

impl StudioRuntime {
    pub fn install(config: StudioConfig) -> Result<Self, HostError> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let studio = Rc::new_cyclic(|weak: &Weak<RefCell<BrowserStudio>>| {
            let dom = BrowserDom::new(
                window.clone(),
                document.clone(),
                config.mode_attribute.clone(),
                sink_for(weak.clone()),
            );
            RefCell::new(Studio::new(dom, WindowParent::new(window.clone()), &config))
        });
        studio.borrow_mut().start();

        let sink = sink_for(Rc::downgrade(&studio));
        let message = EventListener::new(&window, "message", move |event| {
            let Some(event) = event.dyn_ref::<MessageEvent>() else {
                return;
            };
            let data = match event.data().into_serde::<Value>() {
                Ok(data) => data,
                Err(e) => {
                    tracing::debug!("ignoring non-JSON message: {e}");
                    return;
                }
            };
            sink(StudioEvent::Message {
                origin: event.origin(),
                data,
            });
        });

        let loaded = if document.ready_state() == "loading" {
            let weak = Rc::downgrade(&studio);
            let window = window.clone();
            Some(EventListener::once(&document, "DOMContentLoaded", move |_| {
                if let Some(studio) = weak.upgrade() {
                    announce(&studio, &window);
                }
            }))
        } else {
            announce(&studio, &window);
            None
        };

        tracing::debug!(channel = studio.borrow().gateway().channel(), "studio runtime installed");
        Ok(Self {
            studio,
            _message: message,
            _loaded: loaded,
        })
    }

    /// Same transition as an inbound `set-mode`, minus the origin check.
    pub fn apply_mode(&self, mode: Mode) -> Result<Transition, HostError> {
        let mut studio = self
            .studio
            .try_borrow_mut()
            .map_err(|_| "studio is busy handling an event")?;
        Ok(studio.apply_mode(mode))
    }

    pub fn mode(&self) -> Mode {
        self.studio
            .try_borrow()
            .map(|studio| studio.mode())
            .unwrap_or_default()
    }

    pub fn uninstall(self) {
        drop(self);
    }
}

impl Drop for StudioRuntime {
    fn drop(&mut self) {
        match self.studio.try_borrow_mut() {
            Ok(mut studio) => studio.shutdown(),
            Err(_) => tracing::warn!("studio busy during uninstall, listeners released without cleanup"),
        }
        tracing::debug!("studio runtime uninstalled");
    }
}

/// Route events into the studio without keeping it alive.
///
/// Events arriving while the studio is already borrowed (a DOM call made by a
/// handler synchronously fired another event) are dropped.
fn sink_for(weak: Weak<RefCell<BrowserStudio>>) -> EventSink {
    Rc::new(move |event: StudioEvent<Element>| {
        let Some(studio) = weak.upgrade() else {
            return EventResult::PassThrough;
        };
        let Ok(mut studio) = studio.try_borrow_mut() else {
            tracing::trace!(?event, "studio busy, dropping re-entrant event");
            return EventResult::PassThrough;
        };
        studio.dispatch(event)
    })
}

fn announce(studio: &RefCell<BrowserStudio>, window: &Window) {
    let path = window.location().pathname().unwrap_or_default();
    match studio.try_borrow() {
        Ok(studio) => studio.announce_ready(&path),
        Err(_) => tracing::warn!("studio busy, child-ready not sent"),
    }
}
