//! State-machine transitions and teardown discipline.

mod common;

use common::*;
use glyphlens_core::event::Event;
use glyphlens_core::geometry::Rect;
use glyphlens_harness::{NodeBuilder, SurfaceOp, audit};
use glyphlens_runtime::controller::{Phase, TooltipSurface};
use glyphlens_runtime::message::HostSignal;
use pretty_assertions::assert_eq;

#[test]
fn escape_from_tracking_hides_deactivates_and_signals_once() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();
    hover(&mut rig, 100.0, 100.0, Some(node), 0);
    assert_eq!(rig.controller.phase(), Phase::Tracking);

    press_escape(&mut rig);

    assert!(!rig.controller.is_active());
    assert!(!rig.controller.floating().visible);
    assert!(!rig.host.attached());
    assert_eq!(rig.host.signals(), vec![HostSignal::DeactivateExtension]);

    // Inactive now; a second Escape is not even dispatched.
    press_escape(&mut rig);
    assert_eq!(rig.host.signals().len(), 1, "exactly one notification");
    assert!(audit(&rig.surface.ops()).is_empty());
}

#[test]
fn pointer_over_non_inspectable_returns_to_idle() {
    let mut rig = rig();
    let text = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    let wrapper = rig
        .dom
        .insert(NodeBuilder::new("div").descendant_text("Hello world"));
    rig.controller.activate();

    hover(&mut rig, 100.0, 100.0, Some(text), 0);
    assert_eq!(rig.controller.phase(), Phase::Tracking);

    hover(&mut rig, 120.0, 100.0, Some(wrapper), 16);
    assert_eq!(rig.controller.phase(), Phase::Idle);
    assert!(!rig.controller.floating().visible);
    assert!(
        rig.surface.ops().contains(&SurfaceOp::HideFloating),
        "tooltip hidden on leave"
    );
}

#[test]
fn pointer_near_the_viewport_edge_counts_as_leaving() {
    let mut rig = rig();
    let node = rig.dom.insert(
        NodeBuilder::new("p")
            .text("Edge paragraph")
            .rect(Rect::new(0.0, 0.0, 400.0, 40.0)),
    );
    rig.controller.activate();

    hover(&mut rig, 100.0, 100.0, Some(node), 0);
    assert_eq!(rig.controller.phase(), Phase::Tracking);

    // Within the 15px edge margin.
    hover(&mut rig, 100.0, 8.0, Some(node), 16);
    assert_eq!(rig.controller.phase(), Phase::Idle);
}

#[test]
fn mouseout_to_non_descendant_hides() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();
    hover(&mut rig, 100.0, 100.0, Some(node), 0);

    rig.controller.handle_event(Event::PointerOut {
        from: Some(node),
        to_descendant: false,
    });

    assert_eq!(rig.controller.phase(), Phase::Idle);
    assert!(!rig.controller.floating().visible);
}

#[test]
fn mouseout_to_descendant_keeps_tracking() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();
    hover(&mut rig, 100.0, 100.0, Some(node), 0);

    rig.controller.handle_event(Event::PointerOut {
        from: Some(node),
        to_descendant: true,
    });

    assert_eq!(rig.controller.phase(), Phase::Tracking);
}

#[test]
fn node_removed_mid_hover_degrades_to_idle() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();
    hover(&mut rig, 100.0, 100.0, Some(node), 0);
    assert_eq!(rig.controller.phase(), Phase::Tracking);

    // The page removes the node between events.
    rig.dom.remove(node);
    hover(&mut rig, 110.0, 100.0, Some(node), 16);

    assert_eq!(rig.controller.phase(), Phase::Idle);
    assert!(audit(&rig.surface.ops()).is_empty());
}

#[test]
fn deactivation_is_idempotent() {
    let mut rig = rig();
    rig.controller.activate();
    rig.controller.deactivate(false);
    rig.controller.deactivate(false);

    assert_eq!(rig.controller.phase(), Phase::Inactive);
    assert!(audit(&rig.surface.ops()).is_empty());
}

#[test]
fn teardown_cancels_every_outstanding_timer() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();

    // One selection debounce timer and one copy revert timer outstanding.
    rig.dom.set_selection("Hello");
    mouse_up(&mut rig, 100.0, 100.0, Some(node));
    rig.controller.copy_field("#000000");
    move_pointer(&mut rig, 100.0, 100.0, Some(node));
    assert!(rig.scheduler.pending_timer_count() > 0);
    assert!(rig.scheduler.pending_frame_count() > 0);

    rig.controller.deactivate(false);

    assert_eq!(rig.scheduler.pending_timer_count(), 0);
    assert_eq!(rig.scheduler.pending_frame_count(), 0);
}

#[test]
fn events_while_inactive_are_ignored() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));

    move_pointer(&mut rig, 100.0, 100.0, Some(node));
    press_escape(&mut rig);

    assert_eq!(rig.scheduler.pending_frame_count(), 0);
    assert!(rig.host.signals().is_empty());
    assert!(rig.surface.ops().is_empty());
}

#[test]
fn reactivation_after_escape_works() {
    let mut rig = rig();
    let node = rig
        .dom
        .insert(NodeBuilder::new("p").text("Hello world"));
    rig.controller.activate();
    hover(&mut rig, 100.0, 100.0, Some(node), 0);
    press_escape(&mut rig);

    rig.controller.activate();
    assert_eq!(rig.controller.phase(), Phase::Idle);

    hover(&mut rig, 100.0, 100.0, Some(node), 1000);
    assert_eq!(rig.controller.phase(), Phase::Tracking);
    assert!(rig.controller.floating().visible);
}

#[test]
fn tooltip_position_is_clamped_inside_the_viewport() {
    let mut rig = rig();
    let node = rig.dom.insert(
        NodeBuilder::new("p")
            .text("Bottom right corner text")
            .rect(Rect::new(700.0, 600.0, 300.0, 100.0)),
    );
    rig.controller.activate();

    // Pointer near the bottom-right corner, but inside the edge margin.
    hover(&mut rig, 1000.0, 740.0, Some(node), 0);
    assert_eq!(rig.controller.phase(), Phase::Tracking);

    let size = rig.surface.floating_size();
    let at = rig.controller.floating().position;
    assert!(at.x + size.width <= 1024.0);
    assert!(at.y + size.height <= 768.0);
    // Flipped to the opposite side of the cursor.
    assert!(at.x < 1000.0);
    assert!(at.y < 740.0);
}
