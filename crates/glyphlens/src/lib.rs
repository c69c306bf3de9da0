#![forbid(unsafe_code)]

//! GlyphLens public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for host
//! adapters. It re-exports the common types from the internal crates and
//! offers a lightweight prelude for day-to-day usage.

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use glyphlens_core::classify::{
    AcceptReason, Classification, ClassifierPolicy, RejectReason, classify, is_inspectable,
};
pub use glyphlens_core::coalesce::{ContentThrottle, PointerCoalescer};
pub use glyphlens_core::color::{Hcl, Lch, Rgb, hex_to_rgb, rgb_to_hcl, rgb_to_hex, rgb_to_lch};
pub use glyphlens_core::dom::{DomTree, NodeId, ResolvedStyle};
pub use glyphlens_core::event::{Event, KeyCode, KeyEvent, Modifiers, PointerSample};
pub use glyphlens_core::geometry::{Point, Rect, Size};
pub use glyphlens_core::sample::{
    ColorSnapshot, StyleSnapshot, color_snapshot, sample_color, sample_style,
};

// --- Runtime re-exports ----------------------------------------------------

pub use glyphlens_runtime::controller::{
    ClipboardError, ControllerConfig, HostPort, Phase, SessionError, TooltipController,
    TooltipSurface,
};
pub use glyphlens_runtime::message::{HostCommand, HostSignal};
pub use glyphlens_runtime::scheduler::{FrameToken, Scheduler, TimerToken};
pub use glyphlens_runtime::tooltip::{
    FloatingTooltip, GridKey, PinId, PinnedSet, PinnedTooltip, TooltipContent,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for glyphlens host adapters.
#[derive(Debug)]
pub enum Error {
    /// Session lifecycle failure.
    Session(SessionError),
    /// Clipboard failure.
    Clipboard(ClipboardError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(err) => write!(f, "{err}"),
            Self::Clipboard(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<SessionError> for Error {
    fn from(err: SessionError) -> Self {
        Self::Session(err)
    }
}

impl From<ClipboardError> for Error {
    fn from(err: ClipboardError) -> Self {
        Self::Clipboard(err)
    }
}

/// Standard result type for glyphlens APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    //! The types most host adapters need.
    pub use crate::{
        ClassifierPolicy, ControllerConfig, DomTree, Error, Event, HostCommand, HostPort,
        HostSignal, NodeId, Phase, Point, Rect, Result, Scheduler, Size, TooltipController,
        TooltipSurface,
    };
}
