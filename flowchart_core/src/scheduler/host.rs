//! Display-refresh and timer primitives provided by the host page.

use serde::{Deserialize, Serialize};

/// Host timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Millis(pub u64);

impl Millis {
    pub fn saturating_add(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// Handle of a pending per-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FrameHandle(pub u64);

/// Handle of a pending fixed-delay timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Cooperative scheduling primitives.
///
/// Requests only register a callback; the host later reports the firing by
/// calling back into the view with the returned handle. Cancelled handles must
/// never be reported.
pub trait FrameHost {
    fn now(&self) -> Millis;

    /// Register a callback for the next display frame.
    fn request_frame(&mut self) -> FrameHandle;

    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Register a one-shot callback after `delay_ms`.
    fn set_timeout(&mut self, delay_ms: u64) -> TimerHandle;

    fn clear_timeout(&mut self, handle: TimerHandle);
}

/// Deterministic host for headless use and tests: time only moves when told.
#[derive(Debug, Clone, Default)]
pub struct ManualFrameHost {
    now: Millis,
    next_handle: u64,
    frames: Vec<FrameHandle>,
    timers: Vec<(TimerHandle, Millis)>,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, ms: u64) {
        self.now = self.now.saturating_add(ms);
    }

    /// Frame callbacks currently registered.
    pub fn pending_frames(&self) -> &[FrameHandle] {
        &self.frames
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire the current frame: hands out every registered frame callback once.
    pub fn take_frames(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frames)
    }

    /// Timers whose delay has elapsed, in registration order.
    pub fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        let now = self.now;
        let (due, pending): (Vec<_>, Vec<_>) = self.timers.drain(..).partition(|(_, at)| *at <= now);
        self.timers = pending;
        due.into_iter().map(|(handle, _)| handle).collect()
    }

    fn next(&mut self) -> u64 {
        self.next_handle += 1;
        self.next_handle
    }
}

impl FrameHost for ManualFrameHost {
    fn now(&self) -> Millis {
        self.now
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next());
        self.frames.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.frames.retain(|pending| *pending != handle);
    }

    fn set_timeout(&mut self, delay_ms: u64) -> TimerHandle {
        let handle = TimerHandle(self.next());
        let due = self.now.saturating_add(delay_ms);
        self.timers.push((handle, due));
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.timers.retain(|(pending, _)| *pending != handle);
    }
}
