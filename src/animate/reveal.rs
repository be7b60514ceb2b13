//! Reveal animators - progress from nothing to fully shown.
//!
//! Two shapes of the same contract (monotonic progress, cancellable timers):
//!
//! - [`PathReveal`] draws a line from its start point to its end point by
//!   advancing a 0..=100 progress value on a fixed tick.
//! - [`NodeReveal`] flips `visible` to true once, after a delay.
//!
//! [`ProgressAnimator`] is the generic engine under [`PathReveal`]; with a
//! different target and increment it also drives count-up meters.
//!
//! State changes go through pure transition functions
//! ([`progress_transition`], [`node_transition`]). The animator instances only
//! own the scheduler and fold due events through those functions.
//!
//! Every instance cancels all of its timers when torn down (explicitly or on
//! drop) and when its delay is reconfigured. A torn-down instance never
//! changes state again.

use std::time::Duration;

use tracing::trace;

use super::clock::ClockHandle;
use super::scheduler::Scheduler;
use crate::config::RevealTiming;
use crate::types::Point;

// =============================================================================
// PROGRESS STATE + TRANSITION
// =============================================================================

/// Snapshot of a progress animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressState {
    pub value: u16,
    pub target: u16,
    pub increment: u16,
}

impl ProgressState {
    pub fn new(target: u16, increment: u16) -> Self {
        Self {
            value: 0,
            target,
            increment: increment.max(1),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.value >= self.target
    }

    /// Progress as a fraction of the target, in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.target == 0 {
            return 1.0;
        }
        self.value as f32 / self.target as f32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    Tick,
}

/// Advance progress by one increment, saturating at the target.
pub fn progress_transition(state: ProgressState, event: ProgressEvent) -> ProgressState {
    match event {
        ProgressEvent::Tick => ProgressState {
            value: state.value.saturating_add(state.increment).min(state.target),
            ..state
        },
    }
}

// =============================================================================
// PROGRESS ANIMATOR
// =============================================================================

/// Timer-driven progress from 0 to `timing.target`.
///
/// Starts pacing as soon as it is created (creation is the mount point).
pub struct ProgressAnimator {
    state: ProgressState,
    timing: RevealTiming,
    clock: ClockHandle,
    scheduler: Scheduler<ProgressEvent>,
    torn_down: bool,
}

impl ProgressAnimator {
    pub fn new(timing: RevealTiming, clock: ClockHandle) -> Self {
        let mut animator = Self {
            state: ProgressState::new(timing.target, timing.increment),
            timing,
            clock,
            scheduler: Scheduler::new(),
            torn_down: false,
        };
        animator.start();
        animator
    }

    fn start(&mut self) {
        if self.torn_down || self.state.is_complete() {
            return;
        }
        let now = self.clock.now();
        self.scheduler
            .schedule_every(now, self.timing.delay, self.timing.tick, ProgressEvent::Tick);
    }

    /// Apply every tick that is due. Returns true if the value changed.
    pub fn update(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let now = self.clock.now();
        let mut changed = false;
        while let Some(fired) = self.scheduler.pop_due(now) {
            let next = progress_transition(self.state, fired.event);
            changed |= next != self.state;
            self.state = next;
            if self.state.is_complete() {
                self.scheduler.cancel_all();
                break;
            }
        }
        changed
    }

    /// Change the start delay. Pending timers are cancelled and pacing restarts
    /// from now; progress already made is kept.
    pub fn set_delay(&mut self, delay: Duration) {
        if self.torn_down || delay == self.timing.delay {
            return;
        }
        self.scheduler.cancel_all();
        self.timing.delay = delay;
        self.start();
    }

    /// Cancel all timers; the animator is inert afterwards.
    pub fn teardown(&mut self) {
        if !self.torn_down {
            trace!(value = self.state.value, "progress animator torn down");
        }
        self.scheduler.cancel_all();
        self.torn_down = true;
    }

    pub fn state(&self) -> ProgressState {
        self.state
    }

    pub fn value(&self) -> u16 {
        self.state.value
    }

    pub fn target(&self) -> u16 {
        self.state.target
    }

    pub fn fraction(&self) -> f32 {
        self.state.fraction()
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn timing(&self) -> RevealTiming {
        self.timing
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }
}

impl Drop for ProgressAnimator {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}

// =============================================================================
// PATH REVEAL
// =============================================================================

/// Line that grows from `from` to `to`.
///
/// Progress always targets 100; `timing.target` is ignored.
pub struct PathReveal {
    from: Point,
    to: Point,
    progress: ProgressAnimator,
}

impl PathReveal {
    pub fn new(from: Point, to: Point, timing: RevealTiming, clock: ClockHandle) -> Self {
        let timing = RevealTiming {
            target: 100,
            ..timing
        };
        Self {
            from,
            to,
            progress: ProgressAnimator::new(timing, clock),
        }
    }

    pub fn update(&mut self) -> bool {
        self.progress.update()
    }

    pub fn set_delay(&mut self, delay: Duration) {
        self.progress.set_delay(delay);
    }

    /// Move the endpoints. Geometry only; pacing is unaffected.
    pub fn set_endpoints(&mut self, from: Point, to: Point) {
        self.from = from;
        self.to = to;
    }

    pub fn teardown(&mut self) {
        self.progress.teardown();
    }

    pub fn from(&self) -> Point {
        self.from
    }

    pub fn to(&self) -> Point {
        self.to
    }

    /// Progress in percent, `0..=100`.
    pub fn progress(&self) -> u16 {
        self.progress.value()
    }

    /// Full Euclidean length of the path.
    pub fn length(&self) -> f32 {
        self.from.distance_to(self.to)
    }

    /// Length drawn so far: `length × progress / 100`.
    pub fn drawn_length(&self) -> f32 {
        self.length() * self.progress.fraction()
    }

    /// Length still hidden (the dash offset of a stroked line).
    pub fn dash_offset(&self) -> f32 {
        self.length() - self.drawn_length()
    }

    /// Where the growing end of the line currently is.
    pub fn tip(&self) -> Point {
        self.from.lerp(self.to, self.progress.fraction())
    }

    pub fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    pub fn is_torn_down(&self) -> bool {
        self.progress.is_torn_down()
    }

    pub fn pending_timers(&self) -> usize {
        self.progress.pending_timers()
    }
}

// =============================================================================
// NODE REVEAL
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeState {
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeEvent {
    Show,
}

pub fn node_transition(_state: NodeState, event: NodeEvent) -> NodeState {
    match event {
        NodeEvent::Show => NodeState { visible: true },
    }
}

/// Node that fades in once, `delay` after mounting.
pub struct NodeReveal {
    state: NodeState,
    delay: Duration,
    clock: ClockHandle,
    scheduler: Scheduler<NodeEvent>,
    torn_down: bool,
}

impl NodeReveal {
    pub fn new(delay: Duration, clock: ClockHandle) -> Self {
        let mut node = Self {
            state: NodeState::default(),
            delay,
            clock,
            scheduler: Scheduler::new(),
            torn_down: false,
        };
        node.start();
        node
    }

    fn start(&mut self) {
        if self.torn_down || self.state.visible {
            return;
        }
        let now = self.clock.now();
        self.scheduler.schedule_once(now, self.delay, NodeEvent::Show);
    }

    /// Returns true if the node became visible during this update.
    pub fn update(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let now = self.clock.now();
        let mut changed = false;
        while let Some(fired) = self.scheduler.pop_due(now) {
            let next = node_transition(self.state, fired.event);
            changed |= next != self.state;
            self.state = next;
        }
        changed
    }

    /// Change the delay. A pending reveal is rescheduled from now; a node that
    /// is already visible stays visible.
    pub fn set_delay(&mut self, delay: Duration) {
        if self.torn_down || delay == self.delay {
            return;
        }
        self.scheduler.cancel_all();
        self.delay = delay;
        self.start();
    }

    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.torn_down = true;
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }
}

impl Drop for NodeReveal {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}

// =============================================================================
// TESTS
// =============================================================================
