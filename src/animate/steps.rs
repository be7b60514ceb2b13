//! Step Animation Controller - play/pause/reset over a discrete step counter.
//!
//! Drives the multi-stage illustrations (a reasoning trace lighting up one
//! stage at a time). The controller is a small automaton:
//!
//! ```text
//! Idle ──play──▶ Playing ──pause──▶ Paused ──play──▶ Playing ─ … ─▶ Complete
//!   ▲                                                                 │
//!   └──────────────────────────── reset ─────────────────────────────┘
//! ```
//!
//! While playing, the step advances once per cadence. Reaching the last step
//! stops playback (`Complete`) unless the sequence loops, in which case it wraps
//! to the first step and keeps going.
//!
//! The cadence is a chain of one-shot timers, so at most one timer is pending
//! per controller. Each link is scheduled from the due time of the previous one,
//! which keeps the cadence exact even when `update` is called late.

use tracing::{debug, trace};

use super::clock::ClockHandle;
use super::scheduler::{Scheduler, TimerId};
use crate::config::StepTiming;

// =============================================================================
// STATE + TRANSITION
// =============================================================================

/// Playback mode of a step sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepMode {
    #[default]
    Idle,
    Playing,
    Paused,
    /// Stopped on the last step after playing through.
    Complete,
}

/// Step counter plus playback mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    pub step_count: usize,
    pub current_step: usize,
    pub mode: StepMode,
    pub looping: bool,
}

impl StepSequence {
    /// A sequence at step 0, idle. A zero step count is treated as one step.
    pub fn new(step_count: usize, looping: bool) -> Self {
        Self {
            step_count: step_count.max(1),
            current_step: 0,
            mode: StepMode::Idle,
            looping,
        }
    }

    pub fn last_step(&self) -> usize {
        self.step_count - 1
    }

    pub fn is_playing(&self) -> bool {
        self.mode == StepMode::Playing
    }

    fn at_last(&self) -> bool {
        self.current_step >= self.last_step()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    Play,
    Pause,
    Reset,
    JumpTo(usize),
    /// One cadence elapsed.
    Advance,
}

/// Pure transition function for step sequences.
pub fn step_transition(seq: StepSequence, event: StepEvent) -> StepSequence {
    match event {
        StepEvent::Play => match seq.mode {
            StepMode::Playing | StepMode::Complete => seq,
            StepMode::Idle | StepMode::Paused => {
                let mode = if seq.at_last() && !seq.looping {
                    StepMode::Complete
                } else {
                    StepMode::Playing
                };
                StepSequence { mode, ..seq }
            }
        },
        StepEvent::Pause => match seq.mode {
            StepMode::Playing => StepSequence {
                mode: StepMode::Paused,
                ..seq
            },
            _ => seq,
        },
        StepEvent::Reset => StepSequence {
            current_step: 0,
            mode: StepMode::Idle,
            ..seq
        },
        StepEvent::JumpTo(step) => {
            let current_step = step.min(seq.last_step());
            let mode = if seq.mode == StepMode::Complete && current_step < seq.last_step() {
                StepMode::Paused
            } else {
                seq.mode
            };
            StepSequence {
                current_step,
                mode,
                ..seq
            }
        }
        StepEvent::Advance => {
            if seq.mode != StepMode::Playing {
                return seq;
            }
            if seq.at_last() {
                return if seq.looping {
                    StepSequence {
                        current_step: 0,
                        ..seq
                    }
                } else {
                    StepSequence {
                        mode: StepMode::Complete,
                        ..seq
                    }
                };
            }
            let current_step = seq.current_step + 1;
            let mode = if current_step == seq.last_step() && !seq.looping {
                StepMode::Complete
            } else {
                StepMode::Playing
            };
            StepSequence {
                current_step,
                mode,
                ..seq
            }
        }
    }
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Timer-driven owner of a [`StepSequence`].
pub struct StepAnimationController {
    seq: StepSequence,
    timing: StepTiming,
    clock: ClockHandle,
    scheduler: Scheduler<StepEvent>,
    cadence_timer: Option<TimerId>,
    torn_down: bool,
}

impl StepAnimationController {
    /// Create a controller; starts playing right away if `timing.autoplay`.
    pub fn new(step_count: usize, timing: StepTiming, clock: ClockHandle) -> Self {
        let mut controller = Self {
            seq: StepSequence::new(step_count, timing.looping),
            timing,
            clock,
            scheduler: Scheduler::new(),
            cadence_timer: None,
            torn_down: false,
        };
        if timing.autoplay {
            controller.play();
        }
        controller
    }

    fn dispatch(&mut self, event: StepEvent) {
        if self.torn_down {
            return;
        }
        let before = self.seq;
        self.seq = step_transition(before, event);
        if before.mode != self.seq.mode {
            debug!(?event, from = ?before.mode, to = ?self.seq.mode, "step mode changed");
        }
        let now = self.clock.now();
        self.reconcile(now);
    }

    /// Keep exactly one cadence timer while playing and none otherwise.
    fn reconcile(&mut self, from: std::time::Duration) {
        if self.seq.is_playing() {
            if self.cadence_timer.is_none() {
                let id = self
                    .scheduler
                    .schedule_once(from, self.timing.cadence, StepEvent::Advance);
                self.cadence_timer = Some(id);
            }
        } else if let Some(id) = self.cadence_timer.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Start (or resume) playback. No-op while playing or complete.
    pub fn play(&mut self) {
        self.dispatch(StepEvent::Play);
    }

    /// Stop the cadence, keeping the current step.
    pub fn pause(&mut self) {
        self.dispatch(StepEvent::Pause);
    }

    /// Play/pause button behavior.
    pub fn toggle(&mut self) {
        if self.seq.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Back to step 0, idle.
    pub fn reset(&mut self) {
        self.dispatch(StepEvent::Reset);
    }

    /// Reset and play from the start.
    pub fn replay(&mut self) {
        self.reset();
        self.play();
    }

    /// Show a specific step (clamped). Playback is neither started nor stopped.
    pub fn jump_to(&mut self, step: usize) {
        self.dispatch(StepEvent::JumpTo(step));
    }

    /// Apply every cadence tick that is due. Returns true if the sequence changed.
    pub fn update(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let now = self.clock.now();
        let mut changed = false;
        while let Some(fired) = self.scheduler.pop_due(now) {
            if self.cadence_timer == Some(fired.id) {
                self.cadence_timer = None;
            }
            let before = self.seq;
            self.seq = step_transition(before, fired.event);
            changed |= before != self.seq;
            trace!(step = self.seq.current_step, "step advanced");
            self.reconcile(fired.at);
        }
        changed
    }

    /// Cancel all timers; the controller is inert afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.cadence_timer = None;
        self.torn_down = true;
    }

    pub fn sequence(&self) -> StepSequence {
        self.seq
    }

    pub fn current_step(&self) -> usize {
        self.seq.current_step
    }

    pub fn step_count(&self) -> usize {
        self.seq.step_count
    }

    pub fn mode(&self) -> StepMode {
        self.seq.mode
    }

    pub fn is_playing(&self) -> bool {
        self.seq.is_playing()
    }

    pub fn is_complete(&self) -> bool {
        self.seq.mode == StepMode::Complete
    }

    /// Whether stage `step` has been reached.
    pub fn reached(&self, step: usize) -> bool {
        self.seq.current_step >= step
    }

    pub fn timing(&self) -> StepTiming {
        self.timing
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

impl Drop for StepAnimationController {
    fn drop(&mut self) {
        self.scheduler.cancel_all();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animate::clock::VirtualClock;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn timing(cadence_ms: u64) -> StepTiming {
        StepTiming {
            cadence: ms(cadence_ms),
            ..Default::default()
        }
    }

    #[test]
    fn test_play_through_six_steps() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(6, timing(1500), clock.handle());

        steps.play();
        clock.advance(ms(9000));
        steps.update();

        assert_eq!(steps.current_step(), 5);
        assert!(!steps.is_playing());
        assert!(steps.is_complete());
        assert_eq!(steps.pending_timers(), 0);
    }

    #[test]
    fn test_completes_exactly_at_n_minus_one_cadences() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(5, timing(1200), clock.handle());
        steps.play();

        clock.advance(ms(1200 * 4 - 1));
        steps.update();
        assert_eq!(steps.current_step(), 3);
        assert!(steps.is_playing());

        clock.advance(ms(1));
        steps.update();
        assert_eq!(steps.current_step(), 4);
        assert!(steps.is_complete());
    }

    #[test]
    fn test_late_updates_do_not_stretch_cadence() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(10, timing(100), clock.handle());
        steps.play();

        clock.advance(ms(350));
        steps.update();
        assert_eq!(steps.current_step(), 3);

        clock.advance(ms(50));
        steps.update();
        assert_eq!(steps.current_step(), 4);
    }

    #[test]
    fn test_play_is_idempotent() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(6, timing(1000), clock.handle());
        steps.play();
        steps.play();
        steps.play();
        assert_eq!(steps.pending_timers(), 1);

        clock.advance(ms(1000));
        steps.update();
        assert_eq!(steps.current_step(), 1);
    }

    #[test]
    fn test_pause_preserves_step_and_stops_timer() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(6, timing(1000), clock.handle());
        steps.play();
        clock.advance(ms(2000));
        steps.update();
        assert_eq!(steps.current_step(), 2);

        steps.pause();
        assert_eq!(steps.mode(), StepMode::Paused);
        assert_eq!(steps.pending_timers(), 0);

        clock.advance(ms(10_000));
        steps.update();
        assert_eq!(steps.current_step(), 2);

        steps.play();
        clock.advance(ms(1000));
        steps.update();
        assert_eq!(steps.current_step(), 3);
    }

    #[test]
    fn test_toggle() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(4, timing(500), clock.handle());
        steps.toggle();
        assert!(steps.is_playing());
        steps.toggle();
        assert_eq!(steps.mode(), StepMode::Paused);
    }

    #[test]
    fn test_reset_returns_to_idle_zero() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(4, timing(500), clock.handle());
        steps.play();
        clock.advance(ms(1000));
        steps.update();

        steps.reset();
        assert_eq!(steps.current_step(), 0);
        assert_eq!(steps.mode(), StepMode::Idle);
        assert_eq!(steps.pending_timers(), 0);
    }

    #[test]
    fn test_jump_to_clamps_and_keeps_mode() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(5, timing(500), clock.handle());

        steps.jump_to(99);
        assert_eq!(steps.current_step(), 4);
        assert_eq!(steps.mode(), StepMode::Idle);
        assert_eq!(steps.pending_timers(), 0);

        steps.jump_to(1);
        steps.play();
        steps.jump_to(2);
        assert!(steps.is_playing());
        assert_eq!(steps.pending_timers(), 1);
    }

    #[test]
    fn test_jump_back_from_complete_stays_stopped() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(3, timing(100), clock.handle());
        steps.play();
        clock.advance(ms(500));
        steps.update();
        assert!(steps.is_complete());

        steps.jump_to(0);
        assert_eq!(steps.mode(), StepMode::Paused);
        assert_eq!(steps.pending_timers(), 0);
    }

    #[test]
    fn test_play_when_complete_is_noop_but_replay_restarts() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(3, timing(100), clock.handle());
        steps.play();
        clock.advance(ms(200));
        steps.update();
        assert!(steps.is_complete());

        steps.play();
        assert!(steps.is_complete());
        assert_eq!(steps.pending_timers(), 0);

        steps.replay();
        assert!(steps.is_playing());
        assert_eq!(steps.current_step(), 0);
    }

    #[test]
    fn test_looping_wraps_and_keeps_playing() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(
            3,
            StepTiming {
                cadence: ms(100),
                looping: true,
                ..Default::default()
            },
            clock.handle(),
        );
        steps.play();
        clock.advance(ms(300));
        steps.update();
        assert_eq!(steps.current_step(), 0);
        assert!(steps.is_playing());

        clock.advance(ms(100));
        steps.update();
        assert_eq!(steps.current_step(), 1);
    }

    #[test]
    fn test_autoplay_starts_on_creation() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(
            4,
            StepTiming {
                cadence: ms(800),
                autoplay: true,
                ..Default::default()
            },
            clock.handle(),
        );
        assert!(steps.is_playing());
        clock.advance(ms(800));
        steps.update();
        assert_eq!(steps.current_step(), 1);
    }

    #[test]
    fn test_teardown_blocks_further_changes() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(6, timing(100), clock.handle());
        steps.play();
        clock.advance(ms(150));
        steps.update();
        assert_eq!(steps.current_step(), 1);

        steps.teardown();
        assert_eq!(steps.pending_timers(), 0);

        clock.advance(ms(1000));
        assert!(!steps.update());
        steps.play();
        assert_eq!(steps.current_step(), 1);
        assert_eq!(steps.pending_timers(), 0);
    }

    #[test]
    fn test_zero_steps_normalized_to_one() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(0, timing(100), clock.handle());
        assert_eq!(steps.step_count(), 1);
        steps.play();
        assert!(steps.is_complete());
        assert_eq!(steps.pending_timers(), 0);
    }

    #[test]
    fn test_stale_advance_is_ignored_by_transition() {
        let seq = StepSequence {
            mode: StepMode::Paused,
            ..StepSequence::new(4, false)
        };
        assert_eq!(step_transition(seq, StepEvent::Advance), seq);
    }

    #[test]
    fn test_reached() {
        let clock = VirtualClock::new();
        let mut steps = StepAnimationController::new(5, timing(100), clock.handle());
        steps.jump_to(2);
        assert!(steps.reached(0));
        assert!(steps.reached(2));
        assert!(!steps.reached(3));
    }
}
