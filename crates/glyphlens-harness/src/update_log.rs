#![forbid(unsafe_code)]

//! Flicker auditing over a recorded surface-op stream.
//!
//! The engine's no-flicker guarantees are ordering guarantees, so they are
//! checkable from the op log alone:
//!
//! # Detection Rules
//!
//! 1. **Op before create**: `ShowFloating`/`MoveFloating`/`RefreshFloating`
//!    before `CreateFloating`.
//! 2. **Op after destroy**: the same ops after `DestroyFloating` without an
//!    intervening `CreateFloating` — an orphaned callback ran after
//!    teardown.
//! 3. **Update while hidden**: `MoveFloating`/`RefreshFloating` while the
//!    panel is not shown — a stale schedule fired after a hide.
//! 4. **Remove of unknown pin**: `RemovePinned` for an id never created.
//!
//! `HideFloating` and `DestroyFloating` are idempotent cleanup ops and are
//! legal in any state; teardown issues them unconditionally.

use glyphlens_core::geometry::Point;
use glyphlens_runtime::tooltip::PinId;

use crate::recording::SurfaceOp;

/// One rule violation found in an op stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A floating-panel op arrived before the panel existed.
    FloatingOpBeforeCreate {
        /// Index into the op stream.
        index: usize,
    },
    /// A floating-panel op arrived after the panel was destroyed.
    FloatingOpAfterDestroy {
        /// Index into the op stream.
        index: usize,
    },
    /// A move/refresh arrived while the panel was hidden.
    UpdateWhileHidden {
        /// Index into the op stream.
        index: usize,
    },
    /// A pin was removed that was never created.
    RemoveOfUnknownPin {
        /// Index into the op stream.
        index: usize,
        /// The unknown id.
        id: PinId,
    },
}

/// Audit an op stream against the detection rules.
///
/// An empty result means the stream is flicker-clean.
#[must_use]
pub fn audit(ops: &[SurfaceOp]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut created = false;
    let mut shown = false;
    let mut known_pins: Vec<PinId> = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        match op {
            SurfaceOp::CreateFloating => {
                created = true;
                shown = false;
            }
            SurfaceOp::DestroyFloating => {
                created = false;
                shown = false;
            }
            SurfaceOp::ShowFloating { .. } => {
                if !created {
                    violations.push(floating_misuse(index, ops));
                }
                shown = true;
            }
            SurfaceOp::HideFloating => {
                shown = false;
            }
            SurfaceOp::MoveFloating { .. } | SurfaceOp::RefreshFloating { .. } => {
                if !created {
                    violations.push(floating_misuse(index, ops));
                } else if !shown {
                    violations.push(Violation::UpdateWhileHidden { index });
                }
            }
            SurfaceOp::CreatePinned { id, .. } => {
                known_pins.push(*id);
            }
            SurfaceOp::RemovePinned { id } => {
                if !known_pins.contains(id) {
                    violations.push(Violation::RemoveOfUnknownPin { index, id: *id });
                }
            }
            SurfaceOp::CopyConfirmed(_) => {}
        }
    }

    violations
}

/// Classify a misuse at `index` as before-create or after-destroy.
fn floating_misuse(index: usize, ops: &[SurfaceOp]) -> Violation {
    let destroyed_earlier = ops[..index]
        .iter()
        .any(|op| matches!(op, SurfaceOp::DestroyFloating));
    if destroyed_earlier {
        Violation::FloatingOpAfterDestroy { index }
    } else {
        Violation::FloatingOpBeforeCreate { index }
    }
}

/// Every floating-panel position applied, in order: shows and moves.
///
/// Tests compare this against the positions they drove to assert the
/// latest-wins coalescing behavior.
#[must_use]
pub fn floating_positions(ops: &[SurfaceOp]) -> Vec<Point> {
    ops.iter()
        .filter_map(|op| match op {
            SurfaceOp::ShowFloating { at, .. } | SurfaceOp::MoveFloating { at } => Some(*at),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphlens_core::sample::StyleSnapshot;
    use glyphlens_runtime::tooltip::TooltipContent;

    fn content() -> TooltipContent {
        TooltipContent {
            style: StyleSnapshot {
                font_family: "serif".to_string(),
                font_size: "12px".to_string(),
                font_weight: "400".to_string(),
                line_height: "normal".to_string(),
                letter_spacing: "normal".to_string(),
                text_align: "start".to_string(),
            },
            color: None,
        }
    }

    #[test]
    fn clean_session_has_no_violations() {
        let ops = vec![
            SurfaceOp::CreateFloating,
            SurfaceOp::ShowFloating {
                at: Point::new(10.0, 10.0),
                content: content(),
            },
            SurfaceOp::MoveFloating {
                at: Point::new(20.0, 20.0),
            },
            SurfaceOp::HideFloating,
            SurfaceOp::HideFloating,
            SurfaceOp::DestroyFloating,
        ];
        assert!(audit(&ops).is_empty());
    }

    #[test]
    fn move_before_create_is_flagged() {
        let ops = vec![SurfaceOp::MoveFloating {
            at: Point::new(1.0, 1.0),
        }];
        assert_eq!(audit(&ops), vec![Violation::FloatingOpBeforeCreate { index: 0 }]);
    }

    #[test]
    fn move_after_destroy_is_flagged() {
        let ops = vec![
            SurfaceOp::CreateFloating,
            SurfaceOp::DestroyFloating,
            SurfaceOp::MoveFloating {
                at: Point::new(1.0, 1.0),
            },
        ];
        assert_eq!(audit(&ops), vec![Violation::FloatingOpAfterDestroy { index: 2 }]);
    }

    #[test]
    fn move_while_hidden_is_flagged() {
        let ops = vec![
            SurfaceOp::CreateFloating,
            SurfaceOp::MoveFloating {
                at: Point::new(1.0, 1.0),
            },
        ];
        assert_eq!(audit(&ops), vec![Violation::UpdateWhileHidden { index: 1 }]);
    }

    #[test]
    fn positions_extract_shows_and_moves() {
        let ops = vec![
            SurfaceOp::CreateFloating,
            SurfaceOp::ShowFloating {
                at: Point::new(10.0, 11.0),
                content: content(),
            },
            SurfaceOp::MoveFloating {
                at: Point::new(20.0, 21.0),
            },
            SurfaceOp::HideFloating,
        ];
        assert_eq!(
            floating_positions(&ops),
            vec![Point::new(10.0, 11.0), Point::new(20.0, 21.0)]
        );
    }
}
