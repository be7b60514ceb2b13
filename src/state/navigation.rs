//! Slide Sequencer - the deck's single piece of navigation state.
//!
//! Holds `total` (fixed, non-zero) and the current index as a signal, so every
//! clone of the sequencer (key handlers, click handlers, the player) observes
//! and mutates the same position.
//!
//! Out-of-range requests are clamped, never rejected.

use std::num::NonZeroUsize;

use spark_signals::{signal, Signal};
use tracing::debug;

use crate::error::{DeckError, Result};

#[derive(Clone)]
pub struct SlideSequencer {
    total: NonZeroUsize,
    current: Signal<usize>,
}

impl SlideSequencer {
    /// Sequencer over `total` slides, positioned at 0.
    pub fn new(total: NonZeroUsize) -> Self {
        Self {
            total,
            current: signal(0),
        }
    }

    /// Like [`SlideSequencer::new`] but from a plain count; zero is an error.
    pub fn with_len(total: usize) -> Result<Self> {
        NonZeroUsize::new(total)
            .map(Self::new)
            .ok_or(DeckError::EmptyDeck)
    }

    /// Set `current = clamp(index, 0, total - 1)`.
    pub fn go_to(&self, index: isize) {
        let last = self.total.get() - 1;
        let applied = usize::try_from(index).map_or(0, |i| i.min(last));
        debug!(
            requested = index,
            applied,
            clamped = applied as isize != index,
            "go_to"
        );
        if self.current.get() != applied {
            self.current.set(applied);
        }
    }

    pub fn next(&self) {
        self.go_to(self.current_isize().saturating_add(1));
    }

    pub fn prev(&self) {
        self.go_to(self.current_isize().saturating_sub(1));
    }

    pub fn first(&self) {
        self.go_to(0);
    }

    pub fn last(&self) {
        self.go_to(to_isize(self.total.get() - 1));
    }

    pub fn current_index(&self) -> usize {
        self.current.get()
    }

    pub fn total(&self) -> usize {
        self.total.get()
    }

    pub fn is_first(&self) -> bool {
        self.current_index() == 0
    }

    pub fn is_last(&self) -> bool {
        self.current_index() == self.total.get() - 1
    }

    /// `"3 / 16"` style indicator.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current_index() + 1, self.total)
    }

    /// The underlying index signal.
    pub fn signal(&self) -> Signal<usize> {
        self.current.clone()
    }

    fn current_isize(&self) -> isize {
        to_isize(self.current_index())
    }
}

fn to_isize(index: usize) -> isize {
    isize::try_from(index).unwrap_or(isize::MAX)
}

impl std::fmt::Debug for SlideSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlideSequencer")
            .field("current", &self.current_index())
            .field("total", &self.total)
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn deck(total: usize) -> SlideSequencer {
        SlideSequencer::with_len(total).unwrap()
    }

    #[test]
    fn test_starts_at_zero() {
        let nav = deck(16);
        assert_eq!(nav.current_index(), 0);
        assert_eq!(nav.total(), 16);
        assert!(nav.is_first());
        assert!(!nav.is_last());
        assert_eq!(nav.position_label(), "1 / 16");
    }

    #[test]
    fn test_next_saturates_at_last() {
        let nav = deck(16);
        for _ in 0..20 {
            nav.next();
        }
        assert_eq!(nav.current_index(), 15);
        assert!(nav.is_last());
        assert_eq!(nav.position_label(), "16 / 16");
    }

    #[test]
    fn test_prev_saturates_at_zero() {
        let nav = deck(5);
        nav.go_to(2);
        for _ in 0..10 {
            nav.prev();
        }
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_go_to_clamps() {
        let nav = deck(16);
        for (requested, expected) in [(-5, 0), (0, 0), (7, 7), (15, 15), (16, 15), (isize::MAX, 15), (isize::MIN, 0)] {
            nav.go_to(requested);
            assert_eq!(nav.current_index(), expected, "go_to({requested})");
        }
    }

    #[test]
    fn test_first_and_last() {
        let nav = deck(4);
        nav.last();
        assert_eq!(nav.current_index(), 3);
        nav.first();
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_single_slide_deck() {
        let nav = deck(1);
        nav.next();
        nav.prev();
        assert_eq!(nav.current_index(), 0);
        assert!(nav.is_first() && nav.is_last());
    }

    #[test]
    fn test_clones_share_position() {
        let nav = deck(8);
        let handle = nav.clone();
        handle.next();
        handle.next();
        assert_eq!(nav.current_index(), 2);
        assert_eq!(nav.signal().get(), 2);
    }

    #[test]
    fn test_empty_deck_is_an_error() {
        assert!(matches!(SlideSequencer::with_len(0), Err(DeckError::EmptyDeck)));
    }
}
