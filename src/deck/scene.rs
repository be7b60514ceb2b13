//! Scene - a mounted slide.
//!
//! Mounting a [`SlideScript`] instantiates its animators on the given clock:
//! one [`StepAnimationController`] if the slide has steps, a [`PathReveal`]
//! per diagram line, a [`NodeReveal`] per diagram node and a
//! [`ProgressAnimator`] per meter. Reveals start pacing at mount; the current
//! step only decides which parts are highlighted.
//!
//! Leaving a slide tears its scene down. Every animator cancels its timers, so
//! nothing scheduled by an old slide can touch the next one.

use tracing::debug;

use super::slide::{DiagramSpec, SlideDescriptor, SlideScript, StepsSpec};
use crate::animate::{ClockHandle, NodeReveal, PathReveal, ProgressAnimator, StepAnimationController, StepMode};
use crate::config::RevealTiming;
use crate::types::Point;

/// Animators of one diagram, index-aligned with its spec.
pub struct DiagramState {
    pub lines: Vec<PathReveal>,
    pub nodes: Vec<NodeReveal>,
}

impl DiagramState {
    fn mount(spec: &DiagramSpec, clock: &ClockHandle) -> Self {
        let lines = spec
            .lines
            .iter()
            .map(|line| {
                let from = Point::new(f32::from(line.from.0), f32::from(line.from.1));
                let to = Point::new(f32::from(line.to.0), f32::from(line.to.1));
                PathReveal::new(from, to, RevealTiming::default().delayed(line.delay), clock.clone())
            })
            .collect();
        let nodes = spec
            .nodes
            .iter()
            .map(|node| NodeReveal::new(node.delay, clock.clone()))
            .collect();
        Self { lines, nodes }
    }

    fn update(&mut self) -> bool {
        let mut changed = false;
        for line in &mut self.lines {
            changed |= line.update();
        }
        for node in &mut self.nodes {
            changed |= node.update();
        }
        changed
    }

    fn teardown(&mut self) {
        self.lines.iter_mut().for_each(PathReveal::teardown);
        self.nodes.iter_mut().for_each(NodeReveal::teardown);
    }

    fn pending_timers(&self) -> usize {
        self.lines.iter().map(PathReveal::pending_timers).sum::<usize>()
            + self.nodes.iter().map(NodeReveal::pending_timers).sum::<usize>()
    }
}

/// The live instance of a slide.
pub struct Scene {
    title: &'static str,
    script: SlideScript,
    stepper: Option<StepAnimationController>,
    diagrams: Vec<DiagramState>,
    meters: Vec<ProgressAnimator>,
    torn_down: bool,
}

impl Scene {
    /// Build the slide and start its animators.
    pub fn mount(slide: &SlideDescriptor, clock: ClockHandle) -> Self {
        let script = slide.script();
        let stepper = script
            .steps
            .as_ref()
            .map(|StepsSpec { count, timing, .. }| StepAnimationController::new(*count, *timing, clock.clone()));
        let diagrams = script.diagrams.iter().map(|d| DiagramState::mount(d, &clock)).collect();
        let meters = script
            .meters
            .iter()
            .map(|m| ProgressAnimator::new(m.timing, clock.clone()))
            .collect();

        debug!(
            slide = slide.title,
            blocks = script.blocks.len(),
            steps = script.steps.as_ref().map_or(0, |s| s.count),
            "scene mounted"
        );

        Self {
            title: slide.title,
            script,
            stepper,
            diagrams,
            meters,
            torn_down: false,
        }
    }

    /// Apply all due timers. Returns true if anything visible changed.
    pub fn update(&mut self) -> bool {
        if self.torn_down {
            return false;
        }
        let mut changed = false;
        if let Some(stepper) = &mut self.stepper {
            changed |= stepper.update();
        }
        for diagram in &mut self.diagrams {
            changed |= diagram.update();
        }
        for meter in &mut self.meters {
            changed |= meter.update();
        }
        changed
    }

    /// Cancel every timer. Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        if let Some(stepper) = &mut self.stepper {
            stepper.teardown();
        }
        self.diagrams.iter_mut().for_each(DiagramState::teardown);
        self.meters.iter_mut().for_each(ProgressAnimator::teardown);
        debug!(slide = self.title, "scene torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Timers still scheduled across all animators.
    pub fn pending_timers(&self) -> usize {
        self.stepper.as_ref().map_or(0, StepAnimationController::pending_timers)
            + self.diagrams.iter().map(DiagramState::pending_timers).sum::<usize>()
            + self.meters.iter().map(ProgressAnimator::pending_timers).sum::<usize>()
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn script(&self) -> &SlideScript {
        &self.script
    }

    pub fn diagram(&self, index: usize) -> Option<&DiagramState> {
        self.diagrams.get(index)
    }

    pub fn meter(&self, index: usize) -> Option<&ProgressAnimator> {
        self.meters.get(index)
    }

    // -------------------------------------------------------------------------
    // Steps
    // -------------------------------------------------------------------------

    pub fn has_steps(&self) -> bool {
        self.stepper.is_some()
    }

    pub fn stepper(&self) -> Option<&StepAnimationController> {
        self.stepper.as_ref()
    }

    /// Current step, 0 for slides without steps.
    pub fn current_step(&self) -> usize {
        self.stepper.as_ref().map_or(0, StepAnimationController::current_step)
    }

    pub fn step_mode(&self) -> Option<StepMode> {
        self.stepper.as_ref().map(StepAnimationController::mode)
    }

    pub fn step_labels(&self) -> &'static [&'static str] {
        self.script.steps.as_ref().map(|s| s.labels).unwrap_or_default()
    }

    fn with_stepper(&mut self, f: impl FnOnce(&mut StepAnimationController)) {
        if self.torn_down {
            return;
        }
        if let Some(stepper) = &mut self.stepper {
            f(stepper);
        }
    }

    pub fn play(&mut self) {
        self.with_stepper(StepAnimationController::play);
    }

    pub fn pause(&mut self) {
        self.with_stepper(StepAnimationController::pause);
    }

    /// Play/pause button: replays from the start once complete.
    pub fn toggle(&mut self) {
        self.with_stepper(|stepper| {
            if stepper.is_complete() {
                stepper.replay();
            } else {
                stepper.toggle();
            }
        });
    }

    pub fn reset(&mut self) {
        self.with_stepper(StepAnimationController::reset);
    }

    pub fn replay(&mut self) {
        self.with_stepper(StepAnimationController::replay);
    }

    pub fn jump_to(&mut self, step: usize) {
        self.with_stepper(|stepper| stepper.jump_to(step));
    }
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.teardown();
    }
}
