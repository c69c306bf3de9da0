#![forbid(unsafe_code)]

//! Event coalescing for high-frequency pointer input.
//!
//! Pages deliver pointer-move notifications far faster than the display can
//! usefully show them. Without coalescing, each move would re-query style
//! and re-render the tooltip, causing lag and flicker.
//!
//! Two independent rate limits:
//!
//! - [`PointerCoalescer`] collapses a burst of moves into the single most
//!   recent sample ("latest wins"). The runtime schedules at most one
//!   display-frame callback per burst and drains the coalescer when it
//!   fires, so tooltip position tracks the pointer with at most one frame
//!   of latency and superseded positions are never shown.
//! - [`ContentThrottle`] gates the expensive part — resolved-style
//!   re-sampling and re-render — independently of the cheap position
//!   updates. Content is resampled when the hovered node changes or the
//!   refresh interval elapses, and re-rendered only when its fingerprint
//!   actually changed.
//!
//! Both are single-threaded; time is an explicit `now_ms` argument, never a
//! clock read.

use crate::event::PointerSample;

/// Latest-wins buffer for pointer samples.
///
/// Holds at most one pending sample. All operations are O(1).
#[derive(Debug, Clone, Default)]
pub struct PointerCoalescer {
    pending: Option<PointerSample>,
}

impl PointerCoalescer {
    /// Create an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer a pointer sample, replacing any pending one.
    pub fn push(&mut self, sample: PointerSample) {
        self.pending = Some(sample);
    }

    /// Drain the pending sample, if any.
    ///
    /// Called when the display-frame callback fires; only the most recent
    /// sample is ever returned.
    #[must_use]
    pub fn take(&mut self) -> Option<PointerSample> {
        self.pending.take()
    }

    /// Check whether a sample is pending.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Discard any pending sample without processing it.
    ///
    /// Used on deactivation so no stale sample survives into a later
    /// session.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Periodic + fingerprint-gated throttle for content recomputation.
///
/// `should_sample` answers "is a resample due", `commit` records the result
/// and answers "did the content actually change". Content staleness is
/// bounded by one interval; a committed fingerprint is never replaced by an
/// older one because commits only happen from the single event thread in
/// dispatch order.
#[derive(Debug, Clone)]
pub struct ContentThrottle {
    interval_ms: u64,
    last_sample_at: Option<u64>,
    last_hash: Option<u64>,
}

impl ContentThrottle {
    /// Create a throttle with the given refresh interval.
    #[must_use]
    pub const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_sample_at: None,
            last_hash: None,
        }
    }

    /// Whether a resample is due at `now_ms`.
    ///
    /// Always true before the first commit and after [`force_next`].
    ///
    /// [`force_next`]: ContentThrottle::force_next
    #[must_use]
    pub fn should_sample(&self, now_ms: u64) -> bool {
        match self.last_sample_at {
            None => true,
            Some(at) => now_ms.saturating_sub(at) >= self.interval_ms,
        }
    }

    /// Make the next [`should_sample`] return true regardless of elapsed
    /// time. Called when the hovered node changes.
    ///
    /// [`should_sample`]: ContentThrottle::should_sample
    pub fn force_next(&mut self) {
        self.last_sample_at = None;
    }

    /// Record a completed resample.
    ///
    /// Returns `true` when `hash` differs from the previous fingerprint,
    /// i.e. when a re-render is needed.
    pub fn commit(&mut self, hash: u64, now_ms: u64) -> bool {
        let changed = self.last_hash != Some(hash);
        self.last_hash = Some(hash);
        self.last_sample_at = Some(now_ms);
        changed
    }

    /// Forget all history. Used on deactivation and on tooltip hide so the
    /// next show renders unconditionally.
    pub fn reset(&mut self) {
        self.last_sample_at = None;
        self.last_hash = None;
    }
}
