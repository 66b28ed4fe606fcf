//! Frame pacers hand out frame opportunities, the way a browser's `requestAnimationFrame` does.
//!
//! A pacer never calls back into the driver. The host loop asks the pacer for the next due frame
//! and forwards it to [`AnimationDriver::on_frame`](crate::AnimationDriver::on_frame) as a
//! [`FrameTick`].

use std::time::{Duration, Instant};

use crate::foundation::core::Fps;

/// Opaque id of one requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(pub u64);

/// A frame opportunity delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTick {
    /// The request this tick answers.
    pub handle: FrameHandle,
    /// Host time since an arbitrary, fixed epoch.
    pub now: Duration,
}

/// Host frame-pacing primitive.
pub trait FramePacer {
    /// Schedule one frame opportunity.
    fn request_frame(&mut self) -> FrameHandle;

    /// Revoke a scheduled frame. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deterministic single-slot pacer. The host decides when, and with which time, a frame fires.
#[derive(Debug, Default)]
pub struct ManualPacer {
    next_id: u64,
    pending: Option<FrameHandle>,
    requests: u64,
    cancels: u64,
}

impl ManualPacer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Deliver the pending request, if any.
    pub fn take_pending(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Deliver the pending request as a tick at `now`.
    pub fn fire(&mut self, now: Duration) -> Option<FrameTick> {
        self.take_pending().map(|handle| FrameTick { handle, now })
    }

    /// Total `request_frame` calls.
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Total `cancel_frame` calls.
    pub fn cancels(&self) -> u64 {
        self.cancels
    }
}

impl FramePacer for ManualPacer {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.requests += 1;
        self.pending = Some(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancels += 1;
        if self.pending == Some(handle) {
            self.pending = None;
        }
    }
}

/// Wall-clock pacer firing at a fixed frame rate.
///
/// [`IntervalPacer::wait_next`] blocks the host loop until the pending frame is due.
#[derive(Debug)]
pub struct IntervalPacer {
    slot: ManualPacer,
    interval: Duration,
    epoch: Instant,
    last_fire: Option<Duration>,
}

impl IntervalPacer {
    pub fn new(fps: Fps) -> Self {
        Self {
            slot: ManualPacer::new(),
            interval: fps.frame_duration(),
            epoch: Instant::now(),
            last_fire: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Time since this pacer was created.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    /// Sleep until the pending frame is due and deliver it. `None` when nothing is pending.
    pub fn wait_next(&mut self) -> Option<FrameTick> {
        let handle = self.slot.take_pending()?;
        if let Some(last) = self.last_fire {
            let due = last + self.interval;
            let now = self.now();
            if due > now {
                std::thread::sleep(due - now);
            }
        }
        let now = self.now();
        self.last_fire = Some(now);
        Some(FrameTick { handle, now })
    }
}

impl FramePacer for IntervalPacer {
    fn request_frame(&mut self) -> FrameHandle {
        self.slot.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.slot.cancel_frame(handle);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/pacer.rs"]
mod tests;
