//! Frame scheduling capability used by the timekeeper.
//!
//! The timekeeper never reads a wall clock. It asks a [`Scheduler`] for one
//! tick at the next refresh and receives the frame timestamp when that tick
//! is delivered. Hosts wrap their render loop; tests use [`ManualScheduler`].

use std::collections::VecDeque;

/// Identifies one scheduled tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Requests and cancels single refresh ticks.
pub trait Scheduler {
    /// Request one tick at the next refresh.
    fn schedule_tick(&mut self) -> TickHandle;

    /// Cancel a previously scheduled tick. Unknown handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Scheduler whose ticks are delivered by hand.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queued: VecDeque<TickHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ticks waiting for delivery.
    #[inline]
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Take the oldest pending tick.
    pub fn pop(&mut self) -> Option<TickHandle> {
        self.queued.pop_front()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.queued.push_back(handle);
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.queued.retain(|h| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_pop() {
        let mut s = ManualScheduler::new();
        let a = s.schedule_tick();
        let b = s.schedule_tick();
        assert_ne!(a, b);
        assert_eq!(s.pending(), 2);
        assert_eq!(s.pop(), Some(a));
        assert_eq!(s.pop(), Some(b));
        assert_eq!(s.pop(), None);
    }

    #[test]
    fn test_cancel() {
        let mut s = ManualScheduler::new();
        let a = s.schedule_tick();
        let b = s.schedule_tick();
        s.cancel(a);
        s.cancel(TickHandle(99));
        assert_eq!(s.pending(), 1);
        assert_eq!(s.pop(), Some(b));
    }
}
