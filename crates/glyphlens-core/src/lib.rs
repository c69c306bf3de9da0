#![forbid(unsafe_code)]

//! Core: DOM capability interface, inspectable-text classification, color
//! conversion, style sampling, and event coalescing.

pub mod classify;
pub mod coalesce;
pub mod color;
pub mod dom;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod sample;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, trace, warn};
