//! Timer scheduling for the notification state machine.
//!
//! The manager never sleeps. It asks a [`Scheduler`] to deliver a
//! [`TimerEvent`] after a delay and reacts when the host hands the event back.
//! [`TimerQueue`] is the in-memory implementation: tests advance it by hand,
//! the tokio host sleeps until [`TimerQueue::next_due`].

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::notification::ElementId;

/// Handle for cancelling a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(pub(crate) u64);

/// Which lifecycle step a timer drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Next animation frame: start the entrance transition.
    Frame,
    /// Entrance transition finished.
    Settled,
    /// Display time is over: start the exit transition.
    Dismiss,
    /// Exit transition finished: take the element off the surface.
    Remove,
    /// Show the next queued request.
    Promote,
}

/// A timer firing, addressed to the element it was scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerEvent {
    pub target: ElementId,
    pub kind: TimerKind,
}

impl TimerEvent {
    pub fn new(target: ElementId, kind: TimerKind) -> Self {
        Self { target, kind }
    }
}

/// Source of delayed callbacks.
pub trait Scheduler {
    /// Current time, measured from the scheduler's origin.
    fn now(&self) -> Duration;

    /// Deliver `event` once `delay` has elapsed.
    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle;

    /// Cancel a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Virtual-time timer queue. Ties on the due time fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_seq: u64,
    pending: BTreeMap<(Duration, u64), TimerEvent>,
    due_by_handle: HashMap<TimerHandle, Duration>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Due time of the earliest pending timer.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.keys().next().map(|(due, _)| *due)
    }

    /// Remove and return the earliest timer due at or before `until`,
    /// moving the clock to its due time.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerHandle, TimerEvent)> {
        let (&(due, seq), _) = self.pending.iter().next()?;
        if due > until {
            return None;
        }
        let event = self.pending.remove(&(due, seq))?;
        let handle = TimerHandle(seq);
        self.due_by_handle.remove(&handle);
        self.now = self.now.max(due);
        Some((handle, event))
    }

    /// Move the clock forward without firing anything. Never moves it back.
    pub fn advance_clock(&mut self, to: Duration) {
        self.now = self.now.max(to);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl Scheduler for TimerQueue {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, event: TimerEvent) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        let due = self.now + delay;
        let handle = TimerHandle(seq);
        self.pending.insert((due, seq), event);
        self.due_by_handle.insert(handle, due);
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.due_by_handle.remove(&handle) {
            Some(due) => self.pending.remove(&(due, handle.0)).is_some(),
            None => false,
        }
    }
}
