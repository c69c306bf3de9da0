#![forbid(unsafe_code)]

//! A manually driven scheduler.
//!
//! Records every frame/timer request and cancellation; nothing fires until
//! the test pops a token and hands it back to the controller. Cancelled
//! tokens leave the pending queues, so "fire everything pending" naturally
//! exercises the superseded-schedules-never-execute guarantee.

use std::cell::RefCell;
use std::rc::Rc;

use glyphlens_runtime::scheduler::{FrameToken, Scheduler, TimerToken};

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    pending_frames: Vec<FrameToken>,
    pending_timers: Vec<(TimerToken, u64)>,
    frames_requested: u64,
    frames_cancelled: u64,
    timers_requested: u64,
    timers_cancelled: u64,
}

/// Shared-handle scheduler double.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    inner: Rc<RefCell<Inner>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest still-pending frame token for the test to fire.
    #[must_use]
    pub fn take_next_frame(&self) -> Option<FrameToken> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending_frames.is_empty() {
            None
        } else {
            Some(inner.pending_frames.remove(0))
        }
    }

    /// Pop the oldest still-pending timer token and its delay.
    #[must_use]
    pub fn take_next_timer(&self) -> Option<(TimerToken, u64)> {
        let mut inner = self.inner.borrow_mut();
        if inner.pending_timers.is_empty() {
            None
        } else {
            Some(inner.pending_timers.remove(0))
        }
    }

    /// Frames still scheduled and not cancelled.
    #[must_use]
    pub fn pending_frame_count(&self) -> usize {
        self.inner.borrow().pending_frames.len()
    }

    /// Timers still scheduled and not cancelled.
    #[must_use]
    pub fn pending_timer_count(&self) -> usize {
        self.inner.borrow().pending_timers.len()
    }

    /// Total frame requests ever made.
    #[must_use]
    pub fn frames_requested(&self) -> u64 {
        self.inner.borrow().frames_requested
    }

    /// Total frame cancellations ever made.
    #[must_use]
    pub fn frames_cancelled(&self) -> u64 {
        self.inner.borrow().frames_cancelled
    }

    /// Total timer requests ever made.
    #[must_use]
    pub fn timers_requested(&self) -> u64 {
        self.inner.borrow().timers_requested
    }

    /// Total timer cancellations ever made.
    #[must_use]
    pub fn timers_cancelled(&self) -> u64 {
        self.inner.borrow().timers_cancelled
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameToken {
        let mut inner = self.inner.borrow_mut();
        let token = FrameToken::new(inner.next_id);
        inner.next_id += 1;
        inner.pending_frames.push(token);
        inner.frames_requested += 1;
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        let mut inner = self.inner.borrow_mut();
        inner.pending_frames.retain(|t| *t != token);
        inner.frames_cancelled += 1;
    }

    fn set_timer(&mut self, delay_ms: u64) -> TimerToken {
        let mut inner = self.inner.borrow_mut();
        let token = TimerToken::new(inner.next_id);
        inner.next_id += 1;
        inner.pending_timers.push((token, delay_ms));
        inner.timers_requested += 1;
        token
    }

    fn cancel_timer(&mut self, token: TimerToken) {
        let mut inner = self.inner.borrow_mut();
        inner.pending_timers.retain(|(t, _)| *t != token);
        inner.timers_cancelled += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_queue_in_order() {
        let shared = ManualScheduler::new();
        let mut scheduler = shared.clone();

        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        assert_ne!(a, b);
        assert_eq!(shared.take_next_frame(), Some(a));
        assert_eq!(shared.take_next_frame(), Some(b));
        assert_eq!(shared.take_next_frame(), None);
    }

    #[test]
    fn cancelled_frames_never_pop() {
        let shared = ManualScheduler::new();
        let mut scheduler = shared.clone();

        let a = scheduler.request_frame();
        let b = scheduler.request_frame();
        scheduler.cancel_frame(a);

        assert_eq!(shared.take_next_frame(), Some(b));
        assert_eq!(shared.take_next_frame(), None);
        assert_eq!(shared.frames_cancelled(), 1);
    }

    #[test]
    fn timers_carry_their_delay() {
        let shared = ManualScheduler::new();
        let mut scheduler = shared.clone();

        let t = scheduler.set_timer(100);
        assert_eq!(shared.take_next_timer(), Some((t, 100)));
    }
}
