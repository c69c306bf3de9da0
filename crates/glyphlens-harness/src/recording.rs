#![forbid(unsafe_code)]

//! Recording doubles for the tooltip surface and the host port.
//!
//! [`RecordingSurface`] captures every tooltip DOM write as a [`SurfaceOp`]
//! in dispatch order; [`RecordingHost`] captures signals and clipboard
//! writes and can be scripted to fail either.

use std::cell::RefCell;
use std::rc::Rc;

use glyphlens_core::geometry::{Point, Size};
use glyphlens_runtime::controller::{ClipboardError, HostPort, SessionError, TooltipSurface};
use glyphlens_runtime::message::HostSignal;
use glyphlens_runtime::tooltip::{PinId, PinnedTooltip, TooltipContent};

/// One recorded tooltip DOM write.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    /// Floating panel materialized (hidden).
    CreateFloating,
    /// Floating panel shown.
    ShowFloating {
        /// Panel position.
        at: Point,
        /// Rendered content.
        content: TooltipContent,
    },
    /// Floating panel moved.
    MoveFloating {
        /// New position.
        at: Point,
    },
    /// Floating panel content replaced.
    RefreshFloating {
        /// New content.
        content: TooltipContent,
    },
    /// Floating panel hidden.
    HideFloating,
    /// Floating panel removed from the page.
    DestroyFloating,
    /// Pinned panel materialized.
    CreatePinned {
        /// Pin id.
        id: PinId,
        /// Pin position.
        at: Point,
        /// Captured content.
        content: TooltipContent,
    },
    /// Pinned panel removed from the page.
    RemovePinned {
        /// Pin id.
        id: PinId,
    },
    /// Copy affordance flipped.
    CopyConfirmed(bool),
}

#[derive(Debug)]
struct SurfaceState {
    ops: Vec<SurfaceOp>,
    floating_size: Size,
}

/// Shared-handle surface double.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    inner: Rc<RefCell<SurfaceState>>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Create a surface reporting a 260×140 floating panel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(Size::new(260.0, 140.0))
    }

    /// Create a surface reporting the given floating-panel size.
    #[must_use]
    pub fn with_size(floating_size: Size) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SurfaceState {
                ops: Vec::new(),
                floating_size,
            })),
        }
    }

    /// Everything recorded so far, in dispatch order.
    #[must_use]
    pub fn ops(&self) -> Vec<SurfaceOp> {
        self.inner.borrow().ops.clone()
    }

    /// Forget recorded ops (the panel size is kept).
    pub fn clear_ops(&self) {
        self.inner.borrow_mut().ops.clear();
    }

    fn push(&self, op: SurfaceOp) {
        self.inner.borrow_mut().ops.push(op);
    }
}

impl TooltipSurface for RecordingSurface {
    fn floating_size(&self) -> Size {
        self.inner.borrow().floating_size
    }

    fn create_floating(&mut self) {
        self.push(SurfaceOp::CreateFloating);
    }

    fn show_floating(&mut self, at: Point, content: &TooltipContent) {
        self.push(SurfaceOp::ShowFloating {
            at,
            content: content.clone(),
        });
    }

    fn move_floating(&mut self, at: Point) {
        self.push(SurfaceOp::MoveFloating { at });
    }

    fn refresh_floating(&mut self, content: &TooltipContent) {
        self.push(SurfaceOp::RefreshFloating {
            content: content.clone(),
        });
    }

    fn hide_floating(&mut self) {
        self.push(SurfaceOp::HideFloating);
    }

    fn destroy_floating(&mut self) {
        self.push(SurfaceOp::DestroyFloating);
    }

    fn create_pinned(&mut self, pin: &PinnedTooltip) {
        self.push(SurfaceOp::CreatePinned {
            id: pin.id,
            at: pin.position,
            content: pin.content.clone(),
        });
    }

    fn remove_pinned(&mut self, id: PinId) {
        self.push(SurfaceOp::RemovePinned { id });
    }

    fn set_copy_confirmed(&mut self, confirmed: bool) {
        self.push(SurfaceOp::CopyConfirmed(confirmed));
    }
}

#[derive(Debug, Default)]
struct HostState {
    signals: Vec<HostSignal>,
    clipboard: Vec<String>,
    attached: bool,
    attach_count: usize,
    detach_count: usize,
    fail_attach: bool,
    fail_clipboard: bool,
}

/// Shared-handle host double.
#[derive(Debug, Clone, Default)]
pub struct RecordingHost {
    inner: Rc<RefCell<HostState>>,
}

impl RecordingHost {
    /// Create a host that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next (and every) listener attach fail.
    pub fn fail_attach(&self, fail: bool) {
        self.inner.borrow_mut().fail_attach = fail;
    }

    /// Make clipboard writes fail.
    pub fn fail_clipboard(&self, fail: bool) {
        self.inner.borrow_mut().fail_clipboard = fail;
    }

    /// Signals sent so far, in order.
    #[must_use]
    pub fn signals(&self) -> Vec<HostSignal> {
        self.inner.borrow().signals.clone()
    }

    /// Clipboard writes accepted so far.
    #[must_use]
    pub fn clipboard(&self) -> Vec<String> {
        self.inner.borrow().clipboard.clone()
    }

    /// Whether listeners are currently attached.
    #[must_use]
    pub fn attached(&self) -> bool {
        self.inner.borrow().attached
    }

    /// Number of attach calls.
    #[must_use]
    pub fn attach_count(&self) -> usize {
        self.inner.borrow().attach_count
    }

    /// Number of detach calls.
    #[must_use]
    pub fn detach_count(&self) -> usize {
        self.inner.borrow().detach_count
    }
}

impl HostPort for RecordingHost {
    fn attach_listeners(&mut self) -> Result<(), SessionError> {
        let mut inner = self.inner.borrow_mut();
        inner.attach_count += 1;
        if inner.fail_attach {
            return Err(SessionError::ListenerAttach(
                "host context torn down".to_string(),
            ));
        }
        inner.attached = true;
        Ok(())
    }

    fn detach_listeners(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.detach_count += 1;
        inner.attached = false;
    }

    fn send(&mut self, signal: HostSignal) {
        self.inner.borrow_mut().signals.push(signal);
    }

    fn write_clipboard(&mut self, text: &str) -> Result<(), ClipboardError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_clipboard {
            return Err(ClipboardError::Rejected("permission denied".to_string()));
        }
        inner.clipboard.push(text.to_string());
        Ok(())
    }
}
