//! Scheduler - per-instance timer queue.
//!
//! Each animator owns exactly one `Scheduler`. Timers hold an event value
//! instead of a callback; the owner pops due events one at a time and feeds
//! them through its pure transition function. Because events are popped one
//! by one, a transition that cancels the remaining timers takes effect before
//! anything else fires.
//!
//! Timer semantics mirror the browser primitives the animations were designed
//! around:
//!
//! - `schedule_once(now, delay, ev)` fires once at `now + delay`
//! - `schedule_every(now, delay, period, ev)` fires at `now + delay + period`,
//!   then every `period` (a timeout that starts an interval)
//!
//! Nothing here reads a clock; callers pass `now` in. The owner decides which
//! clock that is.

use std::time::Duration;

use tracing::trace;

/// Identifies one scheduled timer within its scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Repeat {
    Once,
    Every(Duration),
}

/// A timer that came due, as returned by [`Scheduler::pop_due`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<E> {
    pub id: TimerId,
    /// The time the timer was due (not the time it was popped).
    pub at: Duration,
    pub event: E,
}

#[derive(Debug, Clone)]
struct Timer<E> {
    id: TimerId,
    fire_at: Duration,
    repeat: Repeat,
    event: E,
}

/// Timer queue owned by a single animator instance.
#[derive(Debug, Clone)]
pub struct Scheduler<E> {
    timers: Vec<Timer<E>>,
    next_id: u64,
}

impl<E: Clone> Scheduler<E> {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Fire `event` once, `delay` after `now`.
    pub fn schedule_once(&mut self, now: Duration, delay: Duration, event: E) -> TimerId {
        let id = self.next_id();
        self.timers.push(Timer {
            id,
            fire_at: now + delay,
            repeat: Repeat::Once,
            event,
        });
        trace!(?id, ?delay, "timer scheduled");
        id
    }

    /// Fire `event` every `period`, starting one period after `delay` has elapsed.
    ///
    /// A zero period is bumped to one millisecond so a single poll can never loop
    /// forever.
    pub fn schedule_every(
        &mut self,
        now: Duration,
        delay: Duration,
        period: Duration,
        event: E,
    ) -> TimerId {
        let period = period.max(Duration::from_millis(1));
        let id = self.next_id();
        self.timers.push(Timer {
            id,
            fire_at: now + delay + period,
            repeat: Repeat::Every(period),
            event,
        });
        trace!(?id, ?delay, ?period, "interval scheduled");
        id
    }

    /// Cancel one timer. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        let removed = self.timers.len() != before;
        if removed {
            trace!(?id, "timer cancelled");
        }
        removed
    }

    /// Cancel every pending timer.
    pub fn cancel_all(&mut self) {
        if !self.timers.is_empty() {
            trace!(count = self.timers.len(), "all timers cancelled");
        }
        self.timers.clear();
    }

    /// Pop the earliest timer due at or before `now`.
    ///
    /// Ties go to the timer scheduled first. Repeating timers are re-armed one
    /// period later, so calling this in a loop replays every tick that elapsed.
    /// Owners that chain timers should schedule from [`Fired::at`] rather than
    /// `now` so that a late poll does not stretch the cadence.
    pub fn pop_due(&mut self, now: Duration) -> Option<Fired<E>> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.fire_at <= now)
            .min_by_key(|(_, t)| (t.fire_at, t.id))
            .map(|(i, _)| i)?;

        let timer = &self.timers[index];
        let fired = Fired {
            id: timer.id,
            at: timer.fire_at,
            event: timer.event.clone(),
        };
        let repeat = timer.repeat;
        match repeat {
            Repeat::Every(period) => self.timers[index].fire_at += period,
            Repeat::Once => {
                self.timers.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Earliest pending fire time, if any.
    pub fn next_fire_at(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.fire_at).min()
    }
}

impl<E: Clone> Default for Scheduler<E> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
