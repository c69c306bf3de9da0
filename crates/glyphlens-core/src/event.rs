#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! The host adapter translates raw browser events into these types before
//! handing them to the controller. All events derive `Clone` and `PartialEq`
//! for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are viewport-relative CSS pixels.
//! - The hovered node travels with the event; it is a transient handle,
//!   revalidated on every event and never cached across event boundaries.
//! - `Modifiers` use bitflags for easy combination.

use bitflags::bitflags;

use crate::dom::NodeId;
use crate::geometry::Point;

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The pointer moved.
    PointerMoved(PointerSample),

    /// The pointer left `from`, moving to a node that is (or is not) a
    /// descendant of it.
    PointerOut {
        /// The node the pointer left, if it was an element.
        from: Option<NodeId>,
        /// Whether the node the pointer moved to descends from `from`.
        to_descendant: bool,
    },

    /// A mouse button was released; a text selection may have settled.
    MouseUp {
        /// Release position.
        pos: Point,
        /// The element under the release point, if any.
        target: Option<NodeId>,
    },

    /// A keyboard event.
    Key(KeyEvent),
}

/// One observation of the pointer: where it is and what it is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    /// Pointer position in viewport coordinates.
    pub pos: Point,
    /// The element under the pointer, if any.
    pub target: Option<NodeId>,
}

impl PointerSample {
    /// Create a new pointer sample.
    #[must_use]
    pub const fn new(pos: Point, target: Option<NodeId>) -> Self {
        Self { pos, target }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

/// Key codes for the keys the engine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),

    /// Enter/Return key.
    Enter,

    /// Escape key.
    Escape,
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_defaults_to_no_modifiers() {
        let key = KeyEvent::new(KeyCode::Escape);
        assert_eq!(key.modifiers, Modifiers::NONE);
    }

    #[test]
    fn with_modifiers_sets_flags() {
        let key = KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL);
        assert!(key.modifiers.contains(Modifiers::CTRL));
        assert!(!key.modifiers.contains(Modifiers::SHIFT));
    }

    #[test]
    fn pointer_sample_carries_target() {
        let sample = PointerSample::new(Point::new(4.0, 8.0), Some(NodeId::new(7)));
        assert_eq!(sample.pos, Point::new(4.0, 8.0));
        assert_eq!(sample.target, Some(NodeId::new(7)));
    }
}
