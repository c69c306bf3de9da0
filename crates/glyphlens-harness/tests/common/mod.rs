//! Shared test rig: a controller wired to all four doubles.

// Each integration test compiles its own copy; not every test uses every
// helper.
#![allow(dead_code)]

use glyphlens_core::dom::NodeId;
use glyphlens_core::event::{Event, KeyCode, KeyEvent, PointerSample};
use glyphlens_core::geometry::Point;
use glyphlens_harness::{FakeDom, ManualScheduler, RecordingHost, RecordingSurface};
use glyphlens_runtime::controller::{ControllerConfig, TooltipController};

pub type TestController =
    TooltipController<FakeDom, ManualScheduler, RecordingSurface, RecordingHost>;

pub struct Rig {
    pub dom: FakeDom,
    pub scheduler: ManualScheduler,
    pub surface: RecordingSurface,
    pub host: RecordingHost,
    pub controller: TestController,
}

pub fn rig() -> Rig {
    rig_with_config(ControllerConfig::default())
}

pub fn rig_with_config(config: ControllerConfig) -> Rig {
    let dom = FakeDom::new();
    let scheduler = ManualScheduler::new();
    let surface = RecordingSurface::new();
    let host = RecordingHost::new();
    let controller = TooltipController::new(
        dom.clone(),
        scheduler.clone(),
        surface.clone(),
        host.clone(),
        config,
    );
    Rig {
        dom,
        scheduler,
        surface,
        host,
        controller,
    }
}

/// Dispatch a pointer move over `target` at `(x, y)`.
pub fn move_pointer(rig: &mut Rig, x: f32, y: f32, target: Option<NodeId>) {
    rig.controller
        .handle_event(Event::PointerMoved(PointerSample::new(
            Point::new(x, y),
            target,
        )));
}

/// Dispatch a mouse-up at `(x, y)` over `target`.
pub fn mouse_up(rig: &mut Rig, x: f32, y: f32, target: Option<NodeId>) {
    rig.controller.handle_event(Event::MouseUp {
        pos: Point::new(x, y),
        target,
    });
}

/// Press Escape.
pub fn press_escape(rig: &mut Rig) {
    rig.controller
        .handle_event(Event::Key(KeyEvent::new(KeyCode::Escape)));
}

/// Fire the oldest pending frame callback, if any.
pub fn fire_frame(rig: &mut Rig, now_ms: u64) -> bool {
    match rig.scheduler.take_next_frame() {
        Some(token) => {
            rig.controller.on_frame(token, now_ms);
            true
        }
        None => false,
    }
}

/// Fire the oldest pending timer callback, if any.
pub fn fire_timer(rig: &mut Rig, now_ms: u64) -> bool {
    match rig.scheduler.take_next_timer() {
        Some((token, _delay)) => {
            rig.controller.on_timer(token, now_ms);
            true
        }
        None => false,
    }
}

/// Move the pointer over `target` and fire the resulting frame.
pub fn hover(rig: &mut Rig, x: f32, y: f32, target: Option<NodeId>, now_ms: u64) {
    move_pointer(rig, x, y, target);
    fire_frame(rig, now_ms);
}
