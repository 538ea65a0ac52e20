//! Frame scheduling with centralized handle tracking.
//!
//! The [`Scheduler`] asks a [`FrameSource`] for one refresh callback per
//! `schedule` call and remembers every outstanding handle together with the
//! session that asked for it. Callbacks are taken out of the pending set
//! before they run, so a callback may freely schedule the next frame.

use std::collections::VecDeque;

use crate::api::types::{FrameHandle, SessionId};

/// The host's per-refresh callback facility (`requestAnimationFrame` in a
/// browser, a manual clock in tests).
pub trait FrameSource {
    /// Request one callback before the next refresh. `None` when the host has
    /// no frame facility.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Revoke a previously requested callback. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Deferred work for one frame. Receives the context that owns the scheduler.
pub type FrameCallback<C> = Box<dyn FnOnce(&mut C)>;

struct Pending<C> {
    handle: FrameHandle,
    owner: SessionId,
    callback: FrameCallback<C>,
}

pub struct Scheduler<F, C> {
    source: F,
    pending: VecDeque<Pending<C>>,
    degraded: bool,
}

impl<F: FrameSource, C> Scheduler<F, C> {
    pub fn new(source: F) -> Self {
        Self {
            source,
            pending: VecDeque::new(),
            degraded: false,
        }
    }

    /// Request `callback` for the next refresh on behalf of `owner`.
    ///
    /// Never fails. Without a frame facility the callback is dropped and
    /// [`FrameHandle::INERT`] returned, so the loop silently stops.
    pub fn schedule(
        &mut self,
        owner: SessionId,
        callback: impl FnOnce(&mut C) + 'static,
    ) -> FrameHandle {
        match self.source.request_frame() {
            Some(handle) => {
                self.pending.push_back(Pending {
                    handle,
                    owner,
                    callback: Box::new(callback),
                });
                log::trace!("frame {} scheduled for session {}", handle.0, owner.0);
                handle
            }
            None => {
                if !self.degraded {
                    log::warn!("no frame facility available; animation disabled");
                    self.degraded = true;
                }
                FrameHandle::INERT
            }
        }
    }

    /// Remove the callback recorded for `handle`. `None` if it was cancelled
    /// or already fired.
    pub fn take(&mut self, handle: FrameHandle) -> Option<(SessionId, FrameCallback<C>)> {
        let index = self.pending.iter().position(|p| p.handle == handle)?;
        self.pending
            .remove(index)
            .map(|pending| (pending.owner, pending.callback))
    }

    /// Run the callback for `handle` against `ctx`. Returns whether one ran.
    pub fn fire(&mut self, handle: FrameHandle, ctx: &mut C) -> bool {
        match self.take(handle) {
            Some((_, callback)) => {
                callback(ctx);
                true
            }
            None => false,
        }
    }

    /// Revoke every pending handle and clear the set. Idempotent.
    pub fn cancel_all(&mut self) {
        if !self.pending.is_empty() {
            log::trace!("cancelling {} pending frames", self.pending.len());
        }
        for pending in self.pending.drain(..) {
            self.source.cancel_frame(pending.handle);
        }
    }

    /// Revoke only the handles owned by `owner`.
    pub fn cancel_owner(&mut self, owner: SessionId) {
        let source = &mut self.source;
        self.pending.retain(|pending| {
            if pending.owner == owner {
                source.cancel_frame(pending.handle);
                false
            } else {
                true
            }
        });
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn has_pending(&self, owner: SessionId) -> bool {
        self.pending.iter().any(|p| p.owner == owner)
    }

    /// Whether scheduling has fallen back to the no-op loop.
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn source(&self) -> &F {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut F {
        &mut self.source
    }
}

/// Manually driven frame source with virtual time.
///
/// Handles are issued from 1 upward. Every refresh ([`VirtualFrames::take_due`])
/// hands out everything requested so far; callbacks that request again during
/// that refresh land in the next one.
#[derive(Debug)]
pub struct VirtualFrames {
    next: u32,
    requested: VecDeque<FrameHandle>,
    available: bool,
    interval: f64,
    now: f64,
    cancelled: usize,
}

impl VirtualFrames {
    /// A 60 Hz virtual display.
    pub fn new() -> Self {
        Self::with_interval(1.0 / 60.0)
    }

    pub fn with_interval(interval: f64) -> Self {
        Self {
            next: 1,
            requested: VecDeque::new(),
            available: true,
            interval,
            now: 0.0,
            cancelled: 0,
        }
    }

    /// A host without a frame facility.
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Advance one refresh and return the handles due in request order.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        self.now += self.interval;
        self.requested.drain(..).collect()
    }

    /// Handles requested and neither due nor cancelled yet.
    pub fn outstanding(&self) -> usize {
        self.requested.len()
    }

    /// Number of successful cancellations so far.
    pub fn cancelled(&self) -> usize {
        self.cancelled
    }

    /// Virtual seconds elapsed.
    pub fn now(&self) -> f64 {
        self.now
    }
}

impl Default for VirtualFrames {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for VirtualFrames {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.available {
            return None;
        }
        let handle = FrameHandle(self.next);
        self.next = self.next.wrapping_add(1).max(1);
        self.requested.push_back(handle);
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.requested.len();
        self.requested.retain(|h| *h != handle);
        if self.requested.len() < before {
            self.cancelled += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: SessionId = SessionId(1);
    const B: SessionId = SessionId(2);

    fn run_refresh(scheduler: &mut Scheduler<VirtualFrames, Vec<u32>>, log: &mut Vec<u32>) -> usize {
        let due = scheduler.source_mut().take_due();
        due.into_iter()
            .filter(|h| scheduler.fire(*h, log))
            .count()
    }

    #[test]
    fn callbacks_fire_in_request_order() {
        let mut scheduler = Scheduler::new(VirtualFrames::new());
        for n in 1..=3 {
            scheduler.schedule(A, move |log: &mut Vec<u32>| log.push(n));
        }
        assert_eq!(scheduler.pending_len(), 3);

        let mut log = Vec::new();
        assert_eq!(run_refresh(&mut scheduler, &mut log), 3);
        assert_eq!(log, vec![1, 2, 3]);
        assert_eq!(scheduler.pending_len(), 0);
    }

    #[test]
    fn cancel_before_fire_runs_nothing() {
        let mut scheduler = Scheduler::new(VirtualFrames::new());
        let handle = scheduler.schedule(A, |log: &mut Vec<u32>| log.push(1));
        scheduler.cancel_all();

        let mut log = Vec::new();
        assert_eq!(run_refresh(&mut scheduler, &mut log), 0);
        assert!(!scheduler.fire(handle, &mut log));
        assert!(log.is_empty());
        assert_eq!(scheduler.source().cancelled(), 1);
    }

    #[test]
    fn cancel_all_is_idempotent() {
        let mut scheduler: Scheduler<_, Vec<u32>> = Scheduler::new(VirtualFrames::new());
        scheduler.cancel_all();
        scheduler.schedule(A, |_| {});
        scheduler.cancel_all();
        scheduler.cancel_all();
        assert_eq!(scheduler.pending_len(), 0);
        assert_eq!(scheduler.source().outstanding(), 0);
    }

    #[test]
    fn cancel_owner_keeps_other_sessions() {
        let mut scheduler = Scheduler::new(VirtualFrames::new());
        scheduler.schedule(A, |log: &mut Vec<u32>| log.push(1));
        scheduler.schedule(B, |log: &mut Vec<u32>| log.push(2));
        scheduler.cancel_owner(A);
        assert!(!scheduler.has_pending(A));
        assert!(scheduler.has_pending(B));

        let mut log = Vec::new();
        run_refresh(&mut scheduler, &mut log);
        assert_eq!(log, vec![2]);
    }

    #[test]
    fn rescheduling_lands_in_next_refresh() {
        let mut scheduler = Scheduler::new(VirtualFrames::new());
        scheduler.schedule(A, |log: &mut Vec<u32>| log.push(1));
        let mut log = Vec::new();
        let due = scheduler.source_mut().take_due();
        for handle in due {
            if let Some((owner, callback)) = scheduler.take(handle) {
                callback(&mut log);
                scheduler.schedule(owner, |log: &mut Vec<u32>| log.push(2));
            }
        }
        assert_eq!(log, vec![1]);
        run_refresh(&mut scheduler, &mut log);
        assert_eq!(log, vec![1, 2]);
    }

    #[test]
    fn unavailable_source_degrades_to_inert_handles() {
        let mut scheduler = Scheduler::new(VirtualFrames::unavailable());
        let first = scheduler.schedule(A, |log: &mut Vec<u32>| log.push(1));
        let second = scheduler.schedule(A, |log: &mut Vec<u32>| log.push(2));
        assert!(first.is_inert() && second.is_inert());
        assert!(scheduler.is_degraded());
        assert_eq!(scheduler.pending_len(), 0);

        let mut log = Vec::new();
        assert!(!scheduler.fire(FrameHandle::INERT, &mut log));
        assert!(log.is_empty());
    }

    #[test]
    fn virtual_time_advances_per_refresh() {
        let mut frames = VirtualFrames::with_interval(0.5);
        frames.take_due();
        frames.take_due();
        assert!((frames.now() - 1.0).abs() < 1e-9);
    }
}
