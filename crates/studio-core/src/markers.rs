//! Fixed identifiers, classes and injected styles.
//!
//! The ids double as idempotency keys: a style or overlay is only created if
//! nothing with its id exists yet.

use crate::config::DEFAULT_MODE_ATTRIBUTE;

/// Style element for Layout mode affordances.
pub const LAYOUT_STYLE_ID: &str = "studio-layout-style";
/// Style element for the Edit mode cursor and indicator.
pub const EDIT_STYLE_ID: &str = "studio-edit-style";
/// The hover indicator overlay.
pub const INDICATOR_ID: &str = "studio-hover-bubble";

/// Attribute tagging containers we made draggable.
pub const DRAGGABLE_MARKER: &str = "data-studio-draggable";
pub const DRAGGABLE_CLASS: &str = "studio-draggable";
pub const DRAGGING_CLASS: &str = "studio-dragging";
pub const DROP_TARGET_CLASS: &str = "studio-drop-target";
/// Element currently carrying inline edit capability.
pub const EDITING_CLASS: &str = "studio-editing";

pub const DRAGGABLE_ATTR: &str = "draggable";
pub const EDITABLE_ATTR: &str = "contenteditable";

/// Generic block containers eligible for reordering.
pub const STRUCTURAL_TAGS: &[&str] = &["div", "section", "article"];

/// Text-bearing elements that can become an edit target.
pub const TEXT_TAGS: &[&str] = &[
    "p", "span", "li", "a", "blockquote", "h1", "h2", "h3", "h4", "h5", "h6", "figcaption",
    "label",
];

/// Layout affordance CSS keyed on the configured mode attribute.
pub fn layout_css(mode_attribute: &str) -> String {
    LAYOUT_CSS.replace(DEFAULT_MODE_ATTRIBUTE, mode_attribute)
}

/// Edit cursor and indicator CSS keyed on the configured mode attribute.
pub fn edit_css(mode_attribute: &str) -> String {
    EDIT_CSS.replace(DEFAULT_MODE_ATTRIBUTE, mode_attribute)
}

const LAYOUT_CSS: &str = r#"
html[data-studio-mode="Layout"] [data-studio-draggable]:hover {
  outline: 2px solid rgba(59, 130, 246, 0.6);
  outline-offset: 2px;
  cursor: grab;
}
html[data-studio-mode="Layout"] .studio-drop-target {
  outline: 2px dashed rgba(59, 130, 246, 0.9);
  outline-offset: 4px;
}
html[data-studio-mode="Layout"] .studio-dragging {
  opacity: 0.4;
  cursor: grabbing;
}
"#;

const EDIT_CSS: &str = r#"
html[data-studio-mode="Edit"] p, html[data-studio-mode="Edit"] span,
html[data-studio-mode="Edit"] li, html[data-studio-mode="Edit"] a,
html[data-studio-mode="Edit"] blockquote, html[data-studio-mode="Edit"] h1,
html[data-studio-mode="Edit"] h2, html[data-studio-mode="Edit"] h3,
html[data-studio-mode="Edit"] h4, html[data-studio-mode="Edit"] h5,
html[data-studio-mode="Edit"] h6, html[data-studio-mode="Edit"] figcaption,
html[data-studio-mode="Edit"] label {
  cursor: text;
}
html[data-studio-mode="Edit"] .studio-editing {
  outline: 1px dashed rgba(16, 185, 129, 0.8);
  outline-offset: 2px;
}
#studio-hover-bubble {
  position: fixed;
  z-index: 2147483647;
  pointer-events: none;
  display: none;
  padding: 2px 6px;
  border-radius: 4px;
  background: rgba(17, 24, 39, 0.9);
  color: #fff;
  font: 11px/1.4 ui-monospace, monospace;
  white-space: nowrap;
}
"#;
