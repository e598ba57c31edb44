//! Events funnelled from the host into `Studio::dispatch`.

use serde_json::Value;

/// Something happened on the page that the studio may care about.
///
/// Browser callbacks translate their DOM event into one of these; the target
/// element, when present, is the event target (or its parent element for
/// text nodes).
#[derive(Debug, Clone)]
pub enum StudioEvent<E> {
    /// Cross-frame `message` event.
    Message { origin: String, data: Value },
    /// The deferred readiness point was reached.
    DocumentReady,
    /// The root mode attribute changed, by us or by another script.
    ModeAttributeChanged,
    /// Nodes were added/removed somewhere under the body.
    BodyMutated,
    DragStart { target: E },
    DragOver { target: E, client_y: f64 },
    Drop,
    DragEnd,
    PointerMove { target: Option<E> },
    /// Click-family interaction that may need cancelling.
    Interaction { target: Option<E> },
    /// Scroll or resize.
    ViewportChanged,
    AnimationFrame,
}

/// What the host should do with the originating DOM event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Leave the event alone.
    PassThrough,
    /// Call `preventDefault`.
    Handled,
    /// Call `preventDefault`, `stopPropagation` and `stopImmediatePropagation`.
    Suppressed,
    /// A drag began on a marked container; let it proceed as a move.
    DragStarted,
}
