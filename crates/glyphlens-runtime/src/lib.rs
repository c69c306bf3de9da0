#![forbid(unsafe_code)]

//! Runtime: the tooltip controller state machine, tooltip models and
//! placement, the cancellation-token scheduler interface, and the host
//! message types.

pub mod controller;
pub mod message;
pub mod scheduler;
pub mod tooltip;

pub use controller::{
    ClipboardError, ControllerConfig, HostPort, Phase, SessionError, TooltipController,
    TooltipSurface,
};
pub use message::{HostCommand, HostSignal};
pub use scheduler::{FrameToken, Scheduler, TimerToken};
pub use tooltip::{FloatingTooltip, GridKey, PinId, PinnedSet, PinnedTooltip, TooltipContent};
