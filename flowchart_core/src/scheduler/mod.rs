//! Redraw Scheduler - decides when geometry must be recomputed.
//!
//! Two triggers:
//! - **Tab switch**: one pass after a short settle delay, once the newly
//!   active container has laid out.
//! - **Node toggle**: a time-boxed loop redrawing on every display frame for
//!   the length of the expand/collapse transition.
//!
//! At most one loop runs at a time. Starting a loop always cancels the stored
//! one first; the stored [`LoopId`] is the cancellation token.

mod host;

pub use host::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SchedulerConfig;

/// Why a redraw was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RedrawTrigger {
    TabSwitch,
    NodeToggle,
}

/// Identity of one animation loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LoopId(pub Uuid);

impl LoopId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LoopId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LoopId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveLoop {
    id: LoopId,
    frame: FrameHandle,
    deadline: Millis,
}

/// Owns the single animation loop and the pending settle timer.
#[derive(Debug, Clone, Default)]
pub struct RedrawScheduler {
    config: SchedulerConfig,
    active: Option<ActiveLoop>,
    settle: Option<TimerHandle>,
}

impl RedrawScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            active: None,
            settle: None,
        }
    }

    /// Arm a redraw. Call only after the view state has been fully mutated.
    ///
    /// Returns the id of the new loop for [`RedrawTrigger::NodeToggle`].
    pub fn schedule_redraw<H: FrameHost>(&mut self, trigger: RedrawTrigger, host: &mut H) -> Option<LoopId> {
        self.cancel_settle(host);

        match trigger {
            RedrawTrigger::TabSwitch => {
                self.cancel_loop(host);
                let timer = host.set_timeout(self.config.settle_delay_ms);
                self.settle = Some(timer);
                tracing::debug!(delay_ms = self.config.settle_delay_ms, "tab switch redraw armed");
                None
            }
            RedrawTrigger::NodeToggle => {
                self.cancel_loop(host);
                let id = LoopId::new();
                let deadline = host.now().saturating_add(self.config.transition_ms);
                let frame = host.request_frame();
                self.active = Some(ActiveLoop { id, frame, deadline });
                tracing::debug!(loop_id = %id, duration_ms = self.config.transition_ms, "animation loop started");
                Some(id)
            }
        }
    }

    /// Report a fired frame callback. Returns `true` if a redraw pass must run.
    ///
    /// Keeps the loop alive by requesting the next frame until the deadline;
    /// the frame that reaches the deadline still redraws, then the loop ends.
    pub fn on_frame<H: FrameHost>(&mut self, handle: FrameHandle, host: &mut H) -> bool {
        let Some(active) = self.active.as_mut() else {
            tracing::trace!(?handle, "frame without active loop ignored");
            return false;
        };
        if active.frame != handle {
            tracing::trace!(?handle, "stale frame ignored");
            return false;
        }

        if host.now() >= active.deadline {
            tracing::debug!(loop_id = %active.id, "animation loop finished");
            self.active = None;
        } else {
            active.frame = host.request_frame();
        }
        true
    }

    /// Report a fired timer. Returns `true` if the settle redraw must run.
    pub fn on_timer(&mut self, handle: TimerHandle) -> bool {
        if self.settle == Some(handle) {
            self.settle = None;
            true
        } else {
            tracing::trace!(?handle, "stale timer ignored");
            false
        }
    }

    /// Cancel everything pending.
    pub fn cancel_all<H: FrameHost>(&mut self, host: &mut H) {
        self.cancel_loop(host);
        self.cancel_settle(host);
    }

    pub fn active_loop(&self) -> Option<LoopId> {
        self.active.map(|active| active.id)
    }

    pub fn has_pending_settle(&self) -> bool {
        self.settle.is_some()
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.settle.is_none()
    }

    fn cancel_loop<H: FrameHost>(&mut self, host: &mut H) {
        if let Some(active) = self.active.take() {
            host.cancel_frame(active.frame);
            tracing::debug!(loop_id = %active.id, "animation loop cancelled");
        }
    }

    fn cancel_settle<H: FrameHost>(&mut self, host: &mut H) {
        if let Some(timer) = self.settle.take() {
            host.clear_timeout(timer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> RedrawScheduler {
        RedrawScheduler::new(SchedulerConfig::default())
    }

    #[test]
    fn test_tab_switch_is_single_delayed_pass() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();

        assert!(scheduler.schedule_redraw(RedrawTrigger::TabSwitch, &mut host).is_none());
        assert!(host.pending_frames().is_empty());

        host.advance(49);
        assert!(host.take_due_timers().is_empty());

        host.advance(1);
        let due = host.take_due_timers();
        assert_eq!(due.len(), 1);
        assert!(scheduler.on_timer(due[0]));
        assert!(scheduler.is_idle());
        assert!(host.pending_frames().is_empty());
    }

    #[test]
    fn test_toggle_loop_runs_for_transition() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();
        scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host);

        let mut passes = 0;
        loop {
            host.advance(16);
            let frames = host.take_frames();
            if frames.is_empty() {
                break;
            }
            for frame in frames {
                if scheduler.on_frame(frame, &mut host) {
                    passes += 1;
                }
            }
        }

        // Frames at 16, 32, ..., 400; the one at 400 is the last.
        assert_eq!(passes, 25);
        assert!(scheduler.active_loop().is_none());
    }

    #[test]
    fn test_second_toggle_replaces_loop() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();

        let first = scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host).unwrap();
        let stale = host.pending_frames()[0];
        let second = scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host).unwrap();

        assert_ne!(first, second);
        assert_eq!(scheduler.active_loop(), Some(second));
        assert_eq!(host.pending_frames().len(), 1);
        assert!(!scheduler.on_frame(stale, &mut host));
    }

    #[test]
    fn test_tab_switch_cancels_running_loop() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();

        scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host);
        scheduler.schedule_redraw(RedrawTrigger::TabSwitch, &mut host);

        assert!(scheduler.active_loop().is_none());
        assert!(host.pending_frames().is_empty());
        assert!(scheduler.has_pending_settle());
    }

    #[test]
    fn test_toggle_clears_pending_settle() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();

        scheduler.schedule_redraw(RedrawTrigger::TabSwitch, &mut host);
        scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host);

        assert!(!scheduler.has_pending_settle());
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn test_cancel_all() {
        let mut host = ManualFrameHost::new();
        let mut scheduler = scheduler();

        scheduler.schedule_redraw(RedrawTrigger::NodeToggle, &mut host);
        scheduler.cancel_all(&mut host);

        assert!(scheduler.is_idle());
        assert!(host.pending_frames().is_empty());
    }
}
