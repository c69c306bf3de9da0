#![forbid(unsafe_code)]

//! Frame and timer scheduling with first-class cancellation tokens.
//!
//! The controller never touches a clock or an event loop directly. It asks
//! the host for display-frame callbacks and fixed-delay timers through
//! [`Scheduler`], holds on to the returned tokens, and cancels them on
//! every exit path. The host calls back `on_frame(token, now)` /
//! `on_timer(token, now)` when a scheduled callback fires.
//!
//! # Invariants
//!
//! 1. Tokens are unique for the lifetime of a scheduler; a token is never
//!    reused for a different request.
//! 2. A cancelled token must never fire. If a host cannot guarantee that
//!    (cancellation raced the dispatch), the controller's own stale-token
//!    check drops the late callback.
//! 3. Cancelling an already-fired or unknown token is a no-op, never an
//!    error — teardown paths cancel unconditionally.

/// Token for one requested display-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

impl FrameToken {
    /// Create a token from the host's raw id.
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

/// Token for one requested fixed-delay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Create a token from the host's raw id.
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

/// Host-provided scheduling capability.
///
/// The browser adapter maps `request_frame` to `requestAnimationFrame` and
/// `set_timer` to `setTimeout`; tests use a manually driven double.
pub trait Scheduler {
    /// Schedule one display-frame-aligned callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a previously requested frame callback.
    fn cancel_frame(&mut self, token: FrameToken);

    /// Schedule a one-shot timer after `delay_ms`.
    fn set_timer(&mut self, delay_ms: u64) -> TimerToken;

    /// Cancel a previously requested timer.
    fn cancel_timer(&mut self, token: TimerToken);
}
