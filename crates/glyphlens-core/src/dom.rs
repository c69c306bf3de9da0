#![forbid(unsafe_code)]

//! The DOM read surface the engine depends on.
//!
//! The engine never walks a real DOM. Everything it needs from the host
//! page — resolved style, bounding geometry, tag names, direct text-node
//! children, the viewport rectangle, the current selection — comes through
//! the [`DomTree`] capability trait. The browser adapter implements it over
//! live `Element`s; tests implement it over an in-memory fake.
//!
//! # Invariants
//!
//! 1. [`NodeId`] is a transient, non-owning handle. It is revalidated on
//!    every event and never cached across event boundaries; any query for a
//!    node the page has since removed must degrade to `None`/empty/zero,
//!    never panic.
//! 2. The trait is read-only. The engine's only DOM writes go through the
//!    tooltip surface owned by the runtime.

use crate::geometry::Rect;

/// Opaque handle to one DOM node.
///
/// Identity is whatever the host adapter makes it; equal ids refer to the
/// same node for as long as that node stays in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a handle from the host adapter's raw id.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The resolved (post-cascade, post-layout) visual style of an element.
///
/// Values are the host style engine's computed strings, not authored CSS:
/// colors arrive normalized to `rgb()`/`rgba()` form, lengths in `px`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Computed `display` value.
    pub display: String,
    /// Computed `visibility` value.
    pub visibility: String,
    /// Computed `opacity`.
    pub opacity: f32,
    /// Computed `font-family` list, possibly quoted.
    pub font_family: String,
    /// Computed `font-size` (e.g. `16px`).
    pub font_size: String,
    /// Computed `font-weight` (e.g. `400`, `700`).
    pub font_weight: String,
    /// Computed `line-height` (e.g. `24px`, `normal`).
    pub line_height: String,
    /// Computed `letter-spacing` (e.g. `normal`, `0.5px`).
    pub letter_spacing: String,
    /// Computed `text-align` value.
    pub text_align: String,
    /// Computed foreground color, as the engine's canonical color string.
    pub color: String,
}

impl Default for ResolvedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
            font_family: String::new(),
            font_size: String::new(),
            font_weight: String::new(),
            line_height: String::new(),
            letter_spacing: String::new(),
            text_align: "start".to_string(),
            color: "rgb(0, 0, 0)".to_string(),
        }
    }
}

/// Read-only capability interface over the host page.
pub trait DomTree {
    /// Lowercase tag name of `node`, or `None` when `node` is not an
    /// element (text node, comment, removed node).
    fn tag_name(&self, node: NodeId) -> Option<String>;

    /// Resolved style of `node`, or `None` when `node` is not an element.
    fn resolved_style(&self, node: NodeId) -> Option<ResolvedStyle>;

    /// Rendered bounding box of `node` in viewport coordinates.
    ///
    /// Zero-sized for non-elements and nodes without layout.
    fn bounding_rect(&self, node: NodeId) -> Rect;

    /// Text of each *immediate* text-node child of `node`, in document
    /// order. Descendant elements' text is not included.
    fn direct_text_nodes(&self, node: NodeId) -> Vec<String>;

    /// Concatenated text content of `node` and all its descendants.
    fn text_content(&self, node: NodeId) -> String;

    /// The current viewport rectangle (origin at `(0, 0)`).
    fn viewport(&self) -> Rect;

    /// The page's current text selection, empty when nothing is selected.
    fn selection_text(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_round_trips_raw() {
        let id = NodeId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id, NodeId::new(42));
        assert_ne!(id, NodeId::new(43));
    }

    #[test]
    fn default_style_is_visible_text() {
        let style = ResolvedStyle::default();
        assert_eq!(style.display, "block");
        assert_eq!(style.visibility, "visible");
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.text_align, "start");
    }
}
