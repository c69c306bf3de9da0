#![forbid(unsafe_code)]

//! Tooltip models: the floating panel, the pinned-panel collection, and
//! panel placement.
//!
//! # Invariants
//!
//! 1. Placement never puts the floating panel outside the viewport; when
//!    the pointer-offset position would overflow the right or bottom edge,
//!    the panel flips to the opposite side of the cursor, then clamps.
//! 2. A pinned panel's content is captured once at creation and never
//!    refreshed.
//! 3. One pinned panel per 10px grid bucket. Closing a pin does not free
//!    its bucket; only destroying the whole set does.

use std::collections::HashSet;

use glyphlens_core::geometry::{Point, Rect, Size};
use glyphlens_core::sample::{ColorSnapshot, StyleSnapshot, content_hash};

/// What a tooltip displays: typography plus an optional color section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    /// The typography section.
    pub style: StyleSnapshot,
    /// The color section; absent when no foreground color parsed.
    pub color: Option<ColorSnapshot>,
}

impl TooltipContent {
    /// Fingerprint used to skip no-op re-renders.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        content_hash(&self.style, self.color.as_ref())
    }
}

/// The singleton panel that follows the pointer.
///
/// Exists for the lifetime of an active session: created hidden on
/// activation, destroyed on deactivation.
#[derive(Debug, Clone, Default)]
pub struct FloatingTooltip {
    /// Whether the panel is currently shown.
    pub visible: bool,
    /// Top-left position in viewport coordinates.
    pub position: Point,
    /// Current content, if any has been sampled.
    pub content: Option<TooltipContent>,
}

impl FloatingTooltip {
    /// Create the panel in its initial hidden state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the panel at `position` with fresh content.
    pub fn show_at(&mut self, position: Point, content: TooltipContent) {
        self.visible = true;
        self.position = position;
        self.content = Some(content);
    }

    /// Move the visible panel without touching content.
    pub fn move_to(&mut self, position: Point) {
        self.position = position;
    }

    /// Hide the panel. Content is kept until the next show or teardown.
    pub fn hide(&mut self) {
        self.visible = false;
    }
}

/// Identifier of one pinned panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinId(u64);

impl PinId {
    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Quantized position bucket used to de-duplicate pinned panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridKey {
    /// Horizontal bucket index.
    pub col: i64,
    /// Vertical bucket index.
    pub row: i64,
}

impl GridKey {
    /// Quantize a position into `cell_px`-sized buckets.
    #[must_use]
    pub fn quantize(pos: Point, cell_px: f32) -> Self {
        Self {
            col: (pos.x / cell_px).round() as i64,
            row: (pos.y / cell_px).round() as i64,
        }
    }
}

/// One user-dismissable panel created from a text selection.
#[derive(Debug, Clone)]
pub struct PinnedTooltip {
    /// Stable identifier, used for close actions.
    pub id: PinId,
    /// Position captured at creation.
    pub position: Point,
    /// Content captured at creation; never refreshed.
    pub content: TooltipContent,
}

/// The pinned-panel collection.
///
/// Unbounded except by user dismissal. Occupied grid buckets outlive their
/// pins so repeated selection gestures at the same spot cannot stack
/// panels or flicker one in and out.
#[derive(Debug, Clone)]
pub struct PinnedSet {
    pins: Vec<PinnedTooltip>,
    occupied: HashSet<GridKey>,
    next_id: u64,
    cell_px: f32,
}

impl PinnedSet {
    /// Create an empty set with the given dedup bucket size.
    #[must_use]
    pub fn new(cell_px: f32) -> Self {
        Self {
            pins: Vec::new(),
            occupied: HashSet::new(),
            next_id: 0,
            cell_px,
        }
    }

    /// Create a pin at `pos` unless its grid bucket is already occupied.
    ///
    /// Returns the new pin for the surface to materialize, or `None` when
    /// creation was suppressed.
    pub fn try_pin(&mut self, pos: Point, content: TooltipContent) -> Option<&PinnedTooltip> {
        let key = GridKey::quantize(pos, self.cell_px);
        if !self.occupied.insert(key) {
            return None;
        }
        let id = PinId(self.next_id);
        self.next_id += 1;
        self.pins.push(PinnedTooltip {
            id,
            position: pos,
            content,
        });
        self.pins.last()
    }

    /// Remove the pin with `id`. Its grid bucket stays occupied.
    ///
    /// Returns whether a pin was removed.
    pub fn close(&mut self, id: PinId) -> bool {
        let before = self.pins.len();
        self.pins.retain(|pin| pin.id != id);
        self.pins.len() != before
    }

    /// Remove every pin and free every bucket, returning the removed ids.
    pub fn drain(&mut self) -> Vec<PinId> {
        self.occupied.clear();
        self.pins.drain(..).map(|pin| pin.id).collect()
    }

    /// Number of live pins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pins.len()
    }

    /// Whether the set has no live pins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pins.is_empty()
    }

    /// Iterate over live pins in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &PinnedTooltip> {
        self.pins.iter()
    }

    /// Look up a pin by id.
    #[must_use]
    pub fn get(&self, id: PinId) -> Option<&PinnedTooltip> {
        self.pins.iter().find(|pin| pin.id == id)
    }
}

/// Compute the floating panel's top-left corner for a pointer position.
///
/// The panel sits `offset` pixels right of and below the cursor. If that
/// would overflow the viewport's right or bottom edge, it flips to the
/// opposite side of the cursor on that axis; the result is then clamped so
/// the panel never renders outside the viewport.
#[must_use]
pub fn place_floating(pointer: Point, size: Size, offset: f32, viewport: Rect) -> Point {
    let mut x = pointer.x + offset;
    if x + size.width > viewport.right() {
        x = pointer.x - offset - size.width;
    }
    let mut y = pointer.y + offset;
    if y + size.height > viewport.bottom() {
        y = pointer.y - offset - size.height;
    }

    let max_x = (viewport.right() - size.width).max(viewport.x);
    let max_y = (viewport.bottom() - size.height).max(viewport.y);
    Point::new(x.clamp(viewport.x, max_x), y.clamp(viewport.y, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> TooltipContent {
        TooltipContent {
            style: StyleSnapshot {
                font_family: "Arial, sans-serif".to_string(),
                font_size: "16px".to_string(),
                font_weight: "400".to_string(),
                line_height: "24px".to_string(),
                letter_spacing: "normal".to_string(),
                text_align: "start".to_string(),
            },
            color: None,
        }
    }

    fn viewport() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    // ── Placement ────────────────────────────────────────────────────

    #[test]
    fn placement_offsets_below_right_of_cursor() {
        let at = place_floating(
            Point::new(100.0, 100.0),
            Size::new(200.0, 120.0),
            10.0,
            viewport(),
        );
        assert_eq!(at, Point::new(110.0, 110.0));
    }

    #[test]
    fn placement_flips_left_at_right_edge() {
        let at = place_floating(
            Point::new(700.0, 100.0),
            Size::new(200.0, 120.0),
            10.0,
            viewport(),
        );
        // 700 + 10 + 200 overflows 800, so the panel sits left of the cursor
        assert_eq!(at.x, 700.0 - 10.0 - 200.0);
        assert_eq!(at.y, 110.0);
    }

    #[test]
    fn placement_flips_up_at_bottom_edge() {
        let at = place_floating(
            Point::new(100.0, 550.0),
            Size::new(200.0, 120.0),
            10.0,
            viewport(),
        );
        assert_eq!(at.x, 110.0);
        assert_eq!(at.y, 550.0 - 10.0 - 120.0);
    }

    #[test]
    fn placement_never_leaves_viewport() {
        let size = Size::new(200.0, 120.0);
        for (px, py) in [
            (0.0, 0.0),
            (799.0, 599.0),
            (5.0, 595.0),
            (795.0, 5.0),
            (400.0, 300.0),
        ] {
            let at = place_floating(Point::new(px, py), size, 10.0, viewport());
            assert!(at.x >= 0.0 && at.x + size.width <= 800.0, "x at ({px},{py})");
            assert!(
                at.y >= 0.0 && at.y + size.height <= 600.0,
                "y at ({px},{py})"
            );
        }
    }

    #[test]
    fn placement_with_panel_larger_than_viewport_clamps_to_origin() {
        let at = place_floating(
            Point::new(10.0, 10.0),
            Size::new(900.0, 700.0),
            10.0,
            viewport(),
        );
        assert_eq!(at, Point::new(0.0, 0.0));
    }

    // ── Floating model ───────────────────────────────────────────────

    #[test]
    fn floating_starts_hidden() {
        let floating = FloatingTooltip::new();
        assert!(!floating.visible);
        assert!(floating.content.is_none());
    }

    #[test]
    fn show_move_hide_cycle() {
        let mut floating = FloatingTooltip::new();
        floating.show_at(Point::new(10.0, 10.0), content());
        assert!(floating.visible);

        floating.move_to(Point::new(30.0, 40.0));
        assert_eq!(floating.position, Point::new(30.0, 40.0));
        assert!(floating.content.is_some());

        floating.hide();
        assert!(!floating.visible);
        assert!(floating.content.is_some(), "hide keeps content");
    }

    // ── Pinned set ───────────────────────────────────────────────────

    #[test]
    fn grid_key_quantizes_to_ten_px_buckets() {
        assert_eq!(
            GridKey::quantize(Point::new(14.0, 26.0), 10.0),
            GridKey { col: 1, row: 3 }
        );
        assert_eq!(
            GridKey::quantize(Point::new(14.0, 26.0), 10.0),
            GridKey::quantize(Point::new(11.0, 25.0), 10.0)
        );
    }

    #[test]
    fn same_bucket_pins_once() {
        let mut pins = PinnedSet::new(10.0);
        assert!(pins.try_pin(Point::new(100.0, 100.0), content()).is_some());
        assert!(pins.try_pin(Point::new(102.0, 98.0), content()).is_none());
        assert_eq!(pins.len(), 1);
    }

    #[test]
    fn distinct_buckets_pin_separately() {
        let mut pins = PinnedSet::new(10.0);
        assert!(pins.try_pin(Point::new(100.0, 100.0), content()).is_some());
        assert!(pins.try_pin(Point::new(200.0, 100.0), content()).is_some());
        assert_eq!(pins.len(), 2);
    }

    #[test]
    fn close_removes_pin_but_keeps_bucket() {
        let mut pins = PinnedSet::new(10.0);
        let id = pins.try_pin(Point::new(100.0, 100.0), content()).unwrap().id;

        assert!(pins.close(id));
        assert!(pins.is_empty());
        assert!(!pins.close(id), "double close is a no-op");

        // Bucket intentionally stays occupied after close.
        assert!(pins.try_pin(Point::new(100.0, 100.0), content()).is_none());
    }

    #[test]
    fn drain_frees_buckets() {
        let mut pins = PinnedSet::new(10.0);
        pins.try_pin(Point::new(100.0, 100.0), content());
        pins.try_pin(Point::new(200.0, 200.0), content());

        let ids = pins.drain();
        assert_eq!(ids.len(), 2);
        assert!(pins.is_empty());

        // After a full drain the bucket is reusable.
        assert!(pins.try_pin(Point::new(100.0, 100.0), content()).is_some());
    }

    #[test]
    fn pin_ids_are_unique_across_closures() {
        let mut pins = PinnedSet::new(10.0);
        let first = pins.try_pin(Point::new(0.0, 0.0), content()).unwrap().id;
        pins.close(first);
        let second = pins.try_pin(Point::new(50.0, 0.0), content()).unwrap().id;
        assert_ne!(first, second);
    }

    #[test]
    fn get_finds_live_pins() {
        let mut pins = PinnedSet::new(10.0);
        let id = pins.try_pin(Point::new(0.0, 0.0), content()).unwrap().id;
        assert!(pins.get(id).is_some());
        pins.close(id);
        assert!(pins.get(id).is_none());
    }
}
