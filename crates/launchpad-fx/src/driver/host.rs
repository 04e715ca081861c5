//! Scheduling seam between the frame driver and whatever runs the loop.

use crate::api::types::{FrameHandle, ListenerKind};
use crate::error::FxResult;

/// Frame scheduling and listener registration, as provided by the browser
/// (`requestAnimationFrame`, `addEventListener`) or a headless loop.
pub trait Host {
    /// Ask for the frame callback to run once more.
    fn request_frame(&mut self) -> FxResult<FrameHandle>;

    fn cancel_frame(&mut self, handle: FrameHandle);

    fn add_listener(&mut self, kind: ListenerKind) -> FxResult<()>;

    fn remove_listener(&mut self, kind: ListenerKind);
}

/// In-memory host for tests and offline rendering.
///
/// Records requested frames and registered listeners; the caller decides
/// when a requested frame "fires" by calling the driver.
#[derive(Debug, Default)]
pub struct HeadlessHost {
    next_handle: u32,
    pending: Option<FrameHandle>,
    listeners: Vec<ListenerKind>,
    requests: u32,
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frame requested and neither fired nor cancelled yet.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Mark the pending frame as delivered. Returns false if none was pending.
    pub fn fire(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn listeners(&self) -> &[ListenerKind] {
        &self.listeners
    }

    /// Total `request_frame` calls so far.
    pub fn requests(&self) -> u32 {
        self.requests
    }
}

impl Host for HeadlessHost {
    fn request_frame(&mut self) -> FxResult<FrameHandle> {
        self.next_handle += 1;
        self.requests += 1;
        let handle = FrameHandle(self.next_handle);
        self.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }

    fn add_listener(&mut self, kind: ListenerKind) -> FxResult<()> {
        self.listeners.push(kind);
        Ok(())
    }

    fn remove_listener(&mut self, kind: ListenerKind) {
        if let Some(pos) = self.listeners.iter().position(|k| *k == kind) {
            self.listeners.remove(pos);
        }
    }
}
