//! Animation primitives.
//!
//! - [`clock`] - injectable time sources (system and virtual)
//! - [`scheduler`] - per-instance timer queue with cancel-all
//! - [`reveal`] - progress reveals (line drawing, count-up) and node fade-in
//! - [`steps`] - play/pause/reset step sequences
//!
//! All animators follow the same shape: state + a pure transition function,
//! a scheduler they own, and an `update()` that folds due events into state.

pub mod clock;
pub mod reveal;
pub mod scheduler;
pub mod steps;

pub use clock::{Clock, ClockHandle, SystemClock, VirtualClock};
pub use reveal::{
    node_transition, progress_transition, NodeEvent, NodeReveal, NodeState, PathReveal,
    ProgressAnimator, ProgressEvent, ProgressState,
};
pub use scheduler::{Fired, Scheduler, TimerId};
pub use steps::{step_transition, StepAnimationController, StepEvent, StepMode, StepSequence};
