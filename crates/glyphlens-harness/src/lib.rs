#![forbid(unsafe_code)]

//! Headless test doubles and behavioral auditing for GlyphLens.
//!
//! Everything the engine needs from a browser is a trait, so everything a
//! test needs is a double:
//!
//! - [`FakeDom`] — an in-memory page implementing `DomTree`, mutable
//!   between events the way a live page is.
//! - [`ManualScheduler`] — records frame/timer requests and fires them
//!   under test control; nothing runs until the test says so.
//! - [`RecordingSurface`] / [`RecordingHost`] — capture every tooltip DOM
//!   write and every host interaction for later assertions.
//! - [`update_log::audit`] — rule-based check over the captured surface
//!   ops that catches flicker bugs (updates to a hidden or destroyed
//!   panel, ops before creation).
//!
//! All doubles hand out cheap clones sharing one `Rc<RefCell>` state, so a
//! test keeps a handle after moving the double into the controller. The
//! engine is single-threaded by design; the doubles are too.

pub mod fake_dom;
pub mod recording;
pub mod scheduler;
pub mod update_log;

pub use fake_dom::{FakeDom, NodeBuilder};
pub use recording::{RecordingHost, RecordingSurface, SurfaceOp};
pub use scheduler::ManualScheduler;
pub use update_log::{Violation, audit, floating_positions};
