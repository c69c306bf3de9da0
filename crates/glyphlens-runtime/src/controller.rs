#![forbid(unsafe_code)]

//! The tooltip controller: owns the session lifecycle, the floating
//! tooltip, and the pinned-tooltip collection.
//!
//! # State machine
//!
//! `Inactive → Idle` on activation, `Idle ↔ Tracking` as the pointer moves
//! on and off inspectable text, back to `Inactive` on Escape or a host
//! deactivation command. The controller is the authoritative session
//! state — there is no ambient flag anywhere else.
//!
//! # Scheduling discipline
//!
//! Pointer moves are buffered in a latest-wins coalescer and processed on
//! display-frame callbacks; content resampling is throttled separately.
//! Every frame/timer the controller schedules is held as a token and
//! cancelled on every exit path; a callback arriving with a token the
//! controller no longer holds is dropped. Teardown is a single idempotent
//! routine shared by normal deactivation, Escape, and the
//! activation-failure path.
//!
//! # Error posture
//!
//! Nothing here is fatal to the hosting page. A failed listener attach
//! tears the half-open session back down; a failed clipboard write logs
//! and changes nothing; a vanished node degrades to "hide the tooltip".

use std::fmt;

use tracing::{debug, trace, warn};

use glyphlens_core::classify::{ClassifierPolicy, is_inspectable};
use glyphlens_core::coalesce::{ContentThrottle, PointerCoalescer};
use glyphlens_core::dom::{DomTree, NodeId};
use glyphlens_core::event::{Event, KeyCode, PointerSample};
use glyphlens_core::geometry::{Point, Size};
use glyphlens_core::sample::{color_snapshot, sample_color, sample_style};

use crate::message::{HostCommand, HostSignal};
use crate::scheduler::{FrameToken, Scheduler, TimerToken};
use crate::tooltip::{
    FloatingTooltip, PinId, PinnedSet, PinnedTooltip, TooltipContent, place_floating,
};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No session: listeners detached, nothing may be created.
    Inactive,
    /// Session active, no current target.
    Idle,
    /// Session active, valid target, floating tooltip visible.
    Tracking,
}

/// Failure raised by the host while opening a session.
#[derive(Debug)]
pub enum SessionError {
    /// The host could not attach one of the required listeners.
    ListenerAttach(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ListenerAttach(msg) => write!(f, "listener attach failed: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// Failure raised by the host clipboard.
#[derive(Debug)]
pub enum ClipboardError {
    /// No clipboard capability in this context.
    Unavailable,
    /// The host rejected the write.
    Rejected(String),
}

impl fmt::Display for ClipboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "clipboard unavailable"),
            Self::Rejected(msg) => write!(f, "clipboard write rejected: {msg}"),
        }
    }
}

impl std::error::Error for ClipboardError {}

/// The tooltip DOM surface owned by the host adapter.
///
/// These are the only DOM writes the engine performs. Every operation must
/// be idempotent: teardown paths call destroy/hide unconditionally.
pub trait TooltipSurface {
    /// Measured size of the floating panel, used for placement.
    fn floating_size(&self) -> Size;

    /// Materialize the floating panel, hidden.
    fn create_floating(&mut self);

    /// Show the floating panel at `at` with `content`.
    fn show_floating(&mut self, at: Point, content: &TooltipContent);

    /// Move the visible floating panel.
    fn move_floating(&mut self, at: Point);

    /// Replace the visible floating panel's content.
    fn refresh_floating(&mut self, content: &TooltipContent);

    /// Hide the floating panel.
    fn hide_floating(&mut self);

    /// Remove the floating panel from the page.
    fn destroy_floating(&mut self);

    /// Materialize a pinned panel.
    fn create_pinned(&mut self, pin: &PinnedTooltip);

    /// Remove a pinned panel from the page.
    fn remove_pinned(&mut self, id: PinId);

    /// Flip the copy affordance between normal and confirmed.
    fn set_copy_confirmed(&mut self, confirmed: bool);
}

/// The host side of the session: listeners, signals, clipboard.
///
/// `detach_listeners` must be idempotent; teardown calls it even when the
/// matching attach failed partway.
pub trait HostPort {
    /// Attach the pointer/selection/keyboard listeners.
    fn attach_listeners(&mut self) -> Result<(), SessionError>;

    /// Detach everything `attach_listeners` attached.
    fn detach_listeners(&mut self);

    /// Deliver a notification to the host.
    fn send(&mut self, signal: HostSignal);

    /// Write `text` to the host clipboard.
    fn write_clipboard(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Controller tuning knobs, fixed as explicit constants.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Offset of the floating panel from the pointer, both axes.
    pub pointer_offset_px: f32,
    /// Pointer distance from a viewport edge that counts as leaving.
    pub edge_margin_px: f32,
    /// Minimum interval between content resamples while tracking.
    pub refresh_interval_ms: u64,
    /// Settle delay between mouse-up and reading the selection.
    pub selection_debounce_ms: u64,
    /// How long the copy affordance stays in its confirmed state.
    pub copy_feedback_ms: u64,
    /// Grid bucket size for pinned-tooltip dedup.
    pub pin_grid_px: f32,
    /// Thresholds for the inspectable-text heuristic.
    pub policy: ClassifierPolicy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            pointer_offset_px: 10.0,
            edge_margin_px: 15.0,
            refresh_interval_ms: 200,
            selection_debounce_ms: 100,
            copy_feedback_ms: 2000,
            pin_grid_px: 10.0,
            policy: ClassifierPolicy::default(),
        }
    }
}

impl ControllerConfig {
    /// Set the classifier policy.
    #[must_use]
    pub fn policy(mut self, policy: ClassifierPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the content refresh interval.
    #[must_use]
    pub fn refresh_interval_ms(mut self, ms: u64) -> Self {
        self.refresh_interval_ms = ms;
        self
    }

    /// Set the selection settle delay.
    #[must_use]
    pub fn selection_debounce_ms(mut self, ms: u64) -> Self {
        self.selection_debounce_ms = ms;
        self
    }
}

/// The engine's central state machine.
///
/// Owns the session context (no globals): the DOM capability, the
/// scheduler, the tooltip surface, the host port, the current target, both
/// tooltip models, and every outstanding cancellation token.
pub struct TooltipController<D, S, U, H>
where
    D: DomTree,
    S: Scheduler,
    U: TooltipSurface,
    H: HostPort,
{
    dom: D,
    scheduler: S,
    surface: U,
    host: H,
    config: ControllerConfig,

    phase: Phase,
    current_target: Option<NodeId>,
    coalescer: PointerCoalescer,
    throttle: ContentThrottle,
    floating: FloatingTooltip,
    pins: PinnedSet,

    pending_frame: Option<FrameToken>,
    selection_timer: Option<TimerToken>,
    pending_selection: Option<(Point, Option<NodeId>)>,
    copy_timer: Option<TimerToken>,
}

impl<D, S, U, H> TooltipController<D, S, U, H>
where
    D: DomTree,
    S: Scheduler,
    U: TooltipSurface,
    H: HostPort,
{
    /// Create an inactive controller.
    pub fn new(dom: D, scheduler: S, surface: U, host: H, config: ControllerConfig) -> Self {
        let throttle = ContentThrottle::new(config.refresh_interval_ms);
        let pins = PinnedSet::new(config.pin_grid_px);
        Self {
            dom,
            scheduler,
            surface,
            host,
            config,
            phase: Phase::Inactive,
            current_target: None,
            coalescer: PointerCoalescer::new(),
            throttle,
            floating: FloatingTooltip::new(),
            pins,
            pending_frame: None,
            selection_timer: None,
            pending_selection: None,
            copy_timer: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether a session is open.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase != Phase::Inactive
    }

    /// The floating tooltip model.
    #[must_use]
    pub fn floating(&self) -> &FloatingTooltip {
        &self.floating
    }

    /// The pinned tooltip collection.
    #[must_use]
    pub fn pins(&self) -> &PinnedSet {
        &self.pins
    }

    /// The node currently under inspection, if tracking.
    #[must_use]
    pub fn current_target(&self) -> Option<NodeId> {
        self.current_target
    }

    // ── Session lifecycle ────────────────────────────────────────────

    /// Dispatch a host command.
    pub fn handle_command(&mut self, command: HostCommand) {
        match command {
            HostCommand::ToggleExtension => self.toggle(),
            HostCommand::DeactivateExtension { preserve_pinned } => {
                self.deactivate(preserve_pinned);
            }
        }
    }

    /// Toggle activation. Idempotent toggle, not a set: activates when
    /// inactive, deactivates (destroying pins) when active.
    pub fn toggle(&mut self) {
        if self.is_active() {
            self.deactivate(false);
        } else {
            self.activate();
        }
    }

    /// Open a session: attach listeners, create the floating panel hidden.
    ///
    /// A no-op when already active. If the host fails to attach listeners,
    /// the full teardown runs so no half-open session leaks.
    pub fn activate(&mut self) {
        if self.is_active() {
            return;
        }
        match self.host.attach_listeners() {
            Ok(()) => {
                self.surface.create_floating();
                self.phase = Phase::Idle;
                debug!("session activated");
            }
            Err(err) => {
                warn!(%err, "activation failed, tearing down");
                self.teardown(true);
            }
        }
    }

    /// Close the session from the host side, destroying the floating panel
    /// and — unless `preserve_pins` — every pinned panel.
    ///
    /// Safe to call in any state; teardown is idempotent.
    pub fn deactivate(&mut self, preserve_pins: bool) {
        debug!(preserve_pins, "session deactivated");
        self.teardown(!preserve_pins);
    }

    /// The single teardown routine shared by every exit path.
    fn teardown(&mut self, destroy_pins: bool) {
        self.cancel_scheduled();
        self.coalescer.clear();
        self.throttle.reset();
        self.host.detach_listeners();
        self.surface.hide_floating();
        self.surface.destroy_floating();
        self.floating = FloatingTooltip::new();
        if destroy_pins {
            for id in self.pins.drain() {
                self.surface.remove_pinned(id);
            }
        }
        self.current_target = None;
        self.pending_selection = None;
        self.phase = Phase::Inactive;
    }

    /// Escape: hide the floating panel, close the session, tell the host —
    /// but leave pinned panels in place. Emits exactly one signal.
    fn deactivate_soft(&mut self) {
        self.cancel_scheduled();
        self.coalescer.clear();
        self.throttle.reset();
        self.surface.hide_floating();
        self.floating.hide();
        self.host.detach_listeners();
        self.current_target = None;
        self.pending_selection = None;
        self.phase = Phase::Inactive;
        self.host.send(HostSignal::DeactivateExtension);
        debug!("session closed from escape, pins preserved");
    }

    /// Cancel every outstanding frame and timer token.
    fn cancel_scheduled(&mut self) {
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        if let Some(token) = self.selection_timer.take() {
            self.scheduler.cancel_timer(token);
        }
        if let Some(token) = self.copy_timer.take() {
            self.scheduler.cancel_timer(token);
        }
    }

    // ── Event intake ─────────────────────────────────────────────────

    /// Feed one host-dispatched event. Ignored while inactive.
    ///
    /// Intake only buffers and schedules; the clock enters through the
    /// frame/timer callbacks.
    pub fn handle_event(&mut self, event: Event) {
        if !self.is_active() {
            return;
        }
        match event {
            Event::PointerMoved(sample) => self.on_pointer_moved(sample),
            Event::PointerOut { from, to_descendant } => self.on_pointer_out(from, to_descendant),
            Event::MouseUp { pos, target } => self.on_mouse_up(pos, target),
            Event::Key(key) => {
                if key.code == KeyCode::Escape {
                    self.deactivate_soft();
                }
            }
        }
    }

    /// Buffer the move and (re)schedule the single frame callback.
    ///
    /// Rescheduling cancels the superseded token, so a stale position can
    /// never be applied after a newer one.
    fn on_pointer_moved(&mut self, sample: PointerSample) {
        self.coalescer.push(sample);
        if let Some(token) = self.pending_frame.take() {
            self.scheduler.cancel_frame(token);
        }
        self.pending_frame = Some(self.scheduler.request_frame());
    }

    fn on_pointer_out(&mut self, from: Option<NodeId>, to_descendant: bool) {
        if to_descendant {
            return;
        }
        if from.is_none() || from == self.current_target {
            self.leave_target();
        }
    }

    /// Debounce the selection read: reschedule on every mouse-up so the
    /// selection has settled when the timer fires.
    fn on_mouse_up(&mut self, pos: Point, target: Option<NodeId>) {
        if let Some(token) = self.selection_timer.take() {
            self.scheduler.cancel_timer(token);
        }
        self.pending_selection = Some((pos, target));
        self.selection_timer = Some(self.scheduler.set_timer(self.config.selection_debounce_ms));
    }

    // ── Scheduled callbacks ──────────────────────────────────────────

    /// Display-frame callback. Tokens the controller no longer holds are
    /// dropped — a superseded or cancelled schedule never executes.
    pub fn on_frame(&mut self, token: FrameToken, now_ms: u64) {
        if self.pending_frame != Some(token) {
            trace!(token = token.raw(), "dropping stale frame callback");
            return;
        }
        self.pending_frame = None;
        if !self.is_active() {
            return;
        }
        if let Some(sample) = self.coalescer.take() {
            self.process_sample(sample, now_ms);
        }
    }

    /// Timer callback for the selection debounce and the copy revert.
    pub fn on_timer(&mut self, token: TimerToken, now_ms: u64) {
        if self.selection_timer == Some(token) {
            self.selection_timer = None;
            if self.is_active() {
                self.settle_selection(now_ms);
            }
        } else if self.copy_timer == Some(token) {
            self.copy_timer = None;
            self.surface.set_copy_confirmed(false);
        } else {
            trace!(token = token.raw(), "dropping stale timer callback");
        }
    }

    /// Apply the most recent pointer sample: position always, content per
    /// the throttle.
    fn process_sample(&mut self, sample: PointerSample, now_ms: u64) {
        let viewport = self.dom.viewport();
        if !viewport
            .inset(self.config.edge_margin_px)
            .contains(sample.pos)
        {
            self.leave_target();
            return;
        }

        if !is_inspectable(&self.dom, sample.target, &self.config.policy) {
            self.leave_target();
            return;
        }
        // is_inspectable(None) is false, so a target exists here.
        let Some(node) = sample.target else {
            return;
        };

        let target_changed = self.current_target != Some(node);
        self.current_target = Some(node);
        if target_changed {
            self.throttle.force_next();
        }

        let at = place_floating(
            sample.pos,
            self.surface.floating_size(),
            self.config.pointer_offset_px,
            viewport,
        );

        match self.phase {
            Phase::Idle => {
                let Some(content) = self.sample_content(node) else {
                    // Node vanished between classify and sample; show nothing.
                    self.leave_target();
                    return;
                };
                self.throttle.commit(content.fingerprint(), now_ms);
                self.surface.show_floating(at, &content);
                self.floating.show_at(at, content);
                self.phase = Phase::Tracking;
                trace!(node = node.raw(), "tracking");
            }
            Phase::Tracking => {
                self.surface.move_floating(at);
                self.floating.move_to(at);

                if self.throttle.should_sample(now_ms) {
                    if let Some(content) = self.sample_content(node) {
                        let changed = self.throttle.commit(content.fingerprint(), now_ms);
                        if changed {
                            self.surface.refresh_floating(&content);
                            self.floating.content = Some(content);
                        }
                    }
                }
            }
            Phase::Inactive => {}
        }
    }

    /// Hide the floating panel and drop the current target.
    fn leave_target(&mut self) {
        if self.phase == Phase::Tracking {
            self.surface.hide_floating();
            self.floating.hide();
            self.throttle.reset();
            self.phase = Phase::Idle;
            trace!("idle");
        }
        self.current_target = None;
    }

    /// The debounced selection settled; maybe create a pin.
    ///
    /// Gated only on session activity, not on the classifier.
    fn settle_selection(&mut self, _now_ms: u64) {
        let Some((pos, target)) = self.pending_selection.take() else {
            return;
        };
        if self.dom.selection_text().trim().is_empty() {
            return;
        }
        let Some(node) = target else {
            return;
        };
        let Some(content) = self.sample_content(node) else {
            return;
        };
        if let Some(pin) = self.pins.try_pin(pos, content) {
            self.surface.create_pinned(pin);
            debug!(id = pin.id.raw(), "pinned tooltip created");
        } else {
            trace!("duplicate pin suppressed");
        }
    }

    // ── Tooltip actions ──────────────────────────────────────────────

    /// Close one pinned panel. Allowed in any phase — pins outlive Escape.
    pub fn close_pin(&mut self, id: PinId) {
        if self.pins.close(id) {
            self.surface.remove_pinned(id);
        }
    }

    /// Copy a displayed field to the clipboard.
    ///
    /// Success flips the copy affordance for the feedback interval;
    /// failure is logged and otherwise ignored.
    pub fn copy_field(&mut self, text: &str) {
        match self.host.write_clipboard(text) {
            Ok(()) => {
                self.surface.set_copy_confirmed(true);
                if let Some(token) = self.copy_timer.take() {
                    self.scheduler.cancel_timer(token);
                }
                self.copy_timer = Some(self.scheduler.set_timer(self.config.copy_feedback_ms));
            }
            Err(err) => {
                warn!(%err, "clipboard write failed");
            }
        }
    }

    /// Ask the host to look up the floating tooltip's font family.
    ///
    /// Emits exactly one signal per invocation; a no-op when the floating
    /// tooltip has no content.
    pub fn search_floating_font(&mut self) {
        let family = self
            .floating
            .content
            .as_ref()
            .map(|content| content.style.font_family.clone());
        if let Some(family) = family {
            self.emit_font_search(family);
        }
    }

    /// Ask the host to look up a pinned tooltip's font family.
    pub fn search_pinned_font(&mut self, id: PinId) {
        let family = self
            .pins
            .get(id)
            .map(|pin| pin.content.style.font_family.clone());
        if let Some(family) = family {
            self.emit_font_search(family);
        }
    }

    fn emit_font_search(&mut self, font_family: String) {
        debug!(%font_family, "font search requested");
        self.host.send(HostSignal::SearchFontFamily { font_family });
    }

    fn sample_content(&self, node: NodeId) -> Option<TooltipContent> {
        let style = sample_style(&self.dom, node)?;
        let color = sample_color(&self.dom, node).map(color_snapshot);
        Some(TooltipContent { style, color })
    }
}
