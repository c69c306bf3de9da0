#![forbid(unsafe_code)]

//! An in-memory page implementing the `DomTree` capability.
//!
//! Nodes are declared with [`NodeBuilder`] and can be mutated or removed
//! between events, which is exactly what a live page does to the engine.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glyphlens_core::dom::{DomTree, NodeId, ResolvedStyle};
use glyphlens_core::geometry::Rect;

/// One fake node's state.
#[derive(Debug, Clone)]
pub struct FakeNode {
    /// Lowercase tag name; `None` models a non-element node.
    pub tag: Option<String>,
    /// Resolved style returned to the sampler and classifier.
    pub style: ResolvedStyle,
    /// Bounding box in viewport coordinates.
    pub rect: Rect,
    /// Immediate text-node children.
    pub direct_text: Vec<String>,
    /// Full descendant text content.
    pub text: String,
}

#[derive(Debug, Default)]
struct Inner {
    nodes: HashMap<u64, FakeNode>,
    viewport: Rect,
    selection: String,
    next_id: u64,
}

/// Shared-handle fake page.
#[derive(Debug, Clone)]
pub struct FakeDom {
    inner: Rc<RefCell<Inner>>,
}

impl Default for FakeDom {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDom {
    /// Create an empty page with a 1024×768 viewport.
    #[must_use]
    pub fn new() -> Self {
        Self::with_viewport(Rect::new(0.0, 0.0, 1024.0, 768.0))
    }

    /// Create an empty page with the given viewport.
    #[must_use]
    pub fn with_viewport(viewport: Rect) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                viewport,
                ..Inner::default()
            })),
        }
    }

    /// Add a node, returning its handle.
    pub fn insert(&self, builder: NodeBuilder) -> NodeId {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.nodes.insert(id, builder.node);
        NodeId::new(id)
    }

    /// Mutate a node in place, as a page script would between events.
    pub fn update(&self, node: NodeId, mutate: impl FnOnce(&mut FakeNode)) {
        if let Some(entry) = self.inner.borrow_mut().nodes.get_mut(&node.raw()) {
            mutate(entry);
        }
    }

    /// Remove a node from the page. Later queries for it degrade to
    /// `None`/empty, matching the engine's transient-handle contract.
    pub fn remove(&self, node: NodeId) {
        self.inner.borrow_mut().nodes.remove(&node.raw());
    }

    /// Replace the page's current selection text.
    pub fn set_selection(&self, text: &str) {
        self.inner.borrow_mut().selection = text.to_string();
    }

    /// Resize the viewport.
    pub fn set_viewport(&self, viewport: Rect) {
        self.inner.borrow_mut().viewport = viewport;
    }
}

impl DomTree for FakeDom {
    fn tag_name(&self, node: NodeId) -> Option<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.raw())
            .and_then(|n| n.tag.clone())
    }

    fn resolved_style(&self, node: NodeId) -> Option<ResolvedStyle> {
        self.inner
            .borrow()
            .nodes
            .get(&node.raw())
            .filter(|n| n.tag.is_some())
            .map(|n| n.style.clone())
    }

    fn bounding_rect(&self, node: NodeId) -> Rect {
        self.inner
            .borrow()
            .nodes
            .get(&node.raw())
            .map(|n| n.rect)
            .unwrap_or_default()
    }

    fn direct_text_nodes(&self, node: NodeId) -> Vec<String> {
        self.inner
            .borrow()
            .nodes
            .get(&node.raw())
            .map(|n| n.direct_text.clone())
            .unwrap_or_default()
    }

    fn text_content(&self, node: NodeId) -> String {
        self.inner
            .borrow()
            .nodes
            .get(&node.raw())
            .map(|n| n.text.clone())
            .unwrap_or_default()
    }

    fn viewport(&self) -> Rect {
        self.inner.borrow().viewport
    }

    fn selection_text(&self) -> String {
        self.inner.borrow().selection.clone()
    }
}

/// Declarative node construction for tests.
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node: FakeNode,
}

impl NodeBuilder {
    /// Start a node with the given tag, a comfortable on-screen box, and
    /// no text.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            node: FakeNode {
                tag: Some(tag.to_string()),
                style: ResolvedStyle::default(),
                rect: Rect::new(50.0, 50.0, 300.0, 40.0),
                direct_text: Vec::new(),
                text: String::new(),
            },
        }
    }

    /// Start a non-element node (text node, comment).
    #[must_use]
    pub fn non_element() -> Self {
        Self {
            node: FakeNode {
                tag: None,
                style: ResolvedStyle::default(),
                rect: Rect::default(),
                direct_text: Vec::new(),
                text: String::new(),
            },
        }
    }

    /// Give the node `text` as its single direct text child (and as its
    /// text content).
    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.node.direct_text = vec![text.to_string()];
        self.node.text = text.to_string();
        self
    }

    /// Give the node descendant-only text: content without any direct
    /// text-node children.
    #[must_use]
    pub fn descendant_text(mut self, text: &str) -> Self {
        self.node.direct_text = Vec::new();
        self.node.text = text.to_string();
        self
    }

    /// Set the bounding box.
    #[must_use]
    pub fn rect(mut self, rect: Rect) -> Self {
        self.node.rect = rect;
        self
    }

    /// Set the resolved font-family.
    #[must_use]
    pub fn family(mut self, family: &str) -> Self {
        self.node.style.font_family = family.to_string();
        self
    }

    /// Set the resolved font-size.
    #[must_use]
    pub fn size(mut self, size: &str) -> Self {
        self.node.style.font_size = size.to_string();
        self
    }

    /// Set the resolved font-weight.
    #[must_use]
    pub fn weight(mut self, weight: &str) -> Self {
        self.node.style.font_weight = weight.to_string();
        self
    }

    /// Set the resolved text-align.
    #[must_use]
    pub fn align(mut self, align: &str) -> Self {
        self.node.style.text_align = align.to_string();
        self
    }

    /// Set the resolved foreground color string.
    #[must_use]
    pub fn color(mut self, color: &str) -> Self {
        self.node.style.color = color.to_string();
        self
    }

    /// Set the computed display value.
    #[must_use]
    pub fn display(mut self, display: &str) -> Self {
        self.node.style.display = display.to_string();
        self
    }

    /// Set the computed opacity.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.node.style.opacity = opacity;
        self
    }
}
