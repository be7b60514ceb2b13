//! Deck player - the headless playback engine.
//!
//! Owns the slide list, the [`SlideSequencer`], the mounted [`Scene`] and the
//! citation overlay. Key handlers move the sequencer; [`DeckPlayer::update`]
//! notices the index change, tears the old scene down and mounts the new one.
//! Nothing here touches the terminal, so a whole presentation can be driven
//! from tests with a virtual clock.

use tracing::{debug, info};

use super::scene::Scene;
use super::slide::SlideDescriptor;
use crate::animate::ClockHandle;
use crate::citations::CitationOverlay;
use crate::error::Result;
use crate::state::mouse::HoverChange;
use crate::state::navigation::SlideSequencer;

/// What a clickable region does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Prev,
    Next,
    GoTo(usize),
    StepToggle,
    StepReset,
    StepJump(usize),
    /// Index into the overlay's anchors.
    Citation(usize),
}

pub struct DeckPlayer {
    slides: Vec<SlideDescriptor>,
    nav: SlideSequencer,
    scene: Scene,
    mounted: usize,
    clock: ClockHandle,
    overlay: CitationOverlay,
    targets: Vec<HitTarget>,
}

impl DeckPlayer {
    /// Mount the first slide. Fails on an empty deck.
    pub fn new(slides: Vec<SlideDescriptor>, clock: ClockHandle) -> Result<Self> {
        let nav = SlideSequencer::with_len(slides.len())?;
        let first = &slides[nav.current_index()];
        let scene = Scene::mount(first, clock.clone());
        info!(slides = slides.len(), "deck loaded");
        Ok(Self {
            slides,
            nav,
            scene,
            mounted: 0,
            clock,
            overlay: CitationOverlay::new(),
            targets: Vec::new(),
        })
    }

    /// Shared handle to the navigation state.
    pub fn nav(&self) -> &SlideSequencer {
        &self.nav
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn slides(&self) -> &[SlideDescriptor] {
        &self.slides
    }

    pub fn current_slide(&self) -> &SlideDescriptor {
        &self.slides[self.mounted]
    }

    pub fn mounted_index(&self) -> usize {
        self.mounted
    }

    pub fn overlay(&self) -> &CitationOverlay {
        &self.overlay
    }

    pub fn overlay_mut(&mut self) -> &mut CitationOverlay {
        &mut self.overlay
    }

    /// Remount if the sequencer moved. Returns true on a slide change.
    pub fn sync(&mut self) -> bool {
        let index = self.nav.current_index();
        if index == self.mounted {
            return false;
        }
        self.scene.teardown();
        self.scene = Scene::mount(&self.slides[index], self.clock.clone());
        self.overlay.clear();
        self.targets.clear();
        debug!(from = self.mounted, to = index, "slide changed");
        self.mounted = index;
        true
    }

    /// Sync navigation, then apply due timers. Returns true if a redraw is needed.
    pub fn update(&mut self) -> bool {
        let changed = self.sync();
        self.scene.update() || changed
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    /// Targets of the last composed frame, indexed by hit-grid value.
    pub fn set_targets(&mut self, targets: Vec<HitTarget>) {
        self.targets = targets;
    }

    pub fn targets(&self) -> &[HitTarget] {
        &self.targets
    }

    /// Perform a target's action. Citation targets have no click action.
    pub fn activate(&mut self, target: HitTarget) -> bool {
        match target {
            HitTarget::Prev => self.nav.prev(),
            HitTarget::Next => self.nav.next(),
            HitTarget::GoTo(index) => self.nav.go_to(isize::try_from(index).unwrap_or(isize::MAX)),
            HitTarget::StepToggle => self.scene.toggle(),
            HitTarget::StepReset => self.scene.reset(),
            HitTarget::StepJump(step) => self.scene.jump_to(step),
            HitTarget::Citation(_) => return false,
        }
        self.sync();
        true
    }

    /// Click on the target with the given hit-grid index.
    pub fn click(&mut self, index: usize) -> bool {
        match self.targets.get(index).copied() {
            Some(target) => self.activate(target),
            None => false,
        }
    }

    /// Route a hover transition to the citation overlay.
    pub fn hover(&mut self, change: HoverChange) {
        if let Some(HitTarget::Citation(anchor)) = change.left.and_then(|i| self.targets.get(i).copied()) {
            self.overlay.pointer_leave(anchor);
        }
        if let Some(HitTarget::Citation(anchor)) = change.entered.and_then(|i| self.targets.get(i).copied()) {
            self.overlay.pointer_enter(anchor);
        }
    }
}

impl std::fmt::Debug for DeckPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckPlayer")
            .field("slides", &self.slides.len())
            .field("mounted", &self.mounted)
            .field("nav", &self.nav)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::animate::{StepMode, VirtualClock};
    use crate::citations::CitationAnchor;
    use crate::config::StepTiming;
    use crate::deck::slide::SceneBuilder;
    use crate::error::DeckError;

    fn text(s: &mut SceneBuilder) {
        s.title("Text");
    }

    fn stepped(s: &mut SceneBuilder) {
        s.title("Stepped");
        s.steps(
            3,
            StepTiming {
                cadence: Duration::from_millis(500),
                autoplay: true,
                looping: false,
            },
            &["a", "b", "c"],
        );
        s.controls();
    }

    fn deck() -> Vec<SlideDescriptor> {
        vec![
            SlideDescriptor {
                title: "Text",
                render: text,
                references: &[],
            },
            SlideDescriptor {
                title: "Stepped",
                render: stepped,
                references: &["alce"],
            },
            SlideDescriptor {
                title: "Text again",
                render: text,
                references: &[],
            },
        ]
    }

    #[test]
    fn test_empty_deck_rejected() {
        let clock = VirtualClock::new();
        let err = DeckPlayer::new(Vec::new(), clock.handle()).unwrap_err();
        assert!(matches!(err, DeckError::EmptyDeck));
    }

    #[test]
    fn test_update_remounts_on_navigation() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        assert!(!player.scene().has_steps());

        player.nav().next();
        assert!(player.update());
        assert_eq!(player.mounted_index(), 1);
        assert_eq!(player.current_slide().title, "Stepped");
        assert_eq!(player.scene().step_mode(), Some(StepMode::Playing));
    }

    #[test]
    fn test_leaving_slide_stops_its_timers() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player.nav().go_to(1);
        player.update();
        assert!(player.scene().pending_timers() > 0);

        player.nav().go_to(2);
        player.update();
        assert_eq!(player.scene().pending_timers(), 0);

        // Back again: a fresh scene starting from step 0.
        clock.advance(Duration::from_secs(5));
        player.nav().go_to(1);
        player.update();
        assert_eq!(player.scene().current_step(), 0);
    }

    #[test]
    fn test_activate_nav_targets() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player.activate(HitTarget::Next);
        assert_eq!(player.mounted_index(), 1);
        player.activate(HitTarget::GoTo(99));
        assert_eq!(player.mounted_index(), 2);
        player.activate(HitTarget::Prev);
        assert_eq!(player.mounted_index(), 1);
    }

    #[test]
    fn test_activate_step_targets() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player.activate(HitTarget::GoTo(1));

        player.activate(HitTarget::StepToggle);
        assert_eq!(player.scene().step_mode(), Some(StepMode::Paused));
        player.activate(HitTarget::StepJump(2));
        assert_eq!(player.scene().current_step(), 2);
        player.activate(HitTarget::StepReset);
        assert_eq!(player.scene().current_step(), 0);
        assert_eq!(player.scene().step_mode(), Some(StepMode::Idle));
    }

    #[test]
    fn test_click_uses_frame_targets() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player.set_targets(vec![HitTarget::Prev, HitTarget::Next]);
        assert!(player.click(1));
        assert_eq!(player.mounted_index(), 1);
        assert!(!player.click(7));
    }

    #[test]
    fn test_hover_drives_overlay() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player
            .overlay_mut()
            .set_anchors(vec![CitationAnchor::new("alce", 10, 5)]);
        player.set_targets(vec![HitTarget::Next, HitTarget::Citation(0)]);

        player.hover(HoverChange {
            left: None,
            entered: Some(1),
        });
        assert_eq!(player.overlay().hovered().map(|a| a.key), Some("alce"));

        player.hover(HoverChange {
            left: Some(1),
            entered: Some(0),
        });
        assert!(player.overlay().hovered().is_none());
    }

    #[test]
    fn test_slide_change_clears_overlay() {
        let clock = VirtualClock::new();
        let mut player = DeckPlayer::new(deck(), clock.handle()).unwrap();
        player
            .overlay_mut()
            .set_anchors(vec![CitationAnchor::new("alce", 10, 5)]);
        player.overlay_mut().pointer_enter(0);
        player.nav().next();
        player.update();
        assert!(player.overlay().anchors().is_empty());
        assert!(player.targets().is_empty());
    }
}
