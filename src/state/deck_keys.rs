//! Deck Keys - the global key bindings that drive slide navigation.
//!
//! | Keys                              | Command        |
//! |-----------------------------------|----------------|
//! | `ArrowRight`, `ArrowDown`, `Space`| next slide     |
//! | `ArrowLeft`, `ArrowUp`            | previous slide |
//! | `Home` / `End`                    | first / last   |
//! | `Ctrl+C`                          | stop running   |
//!
//! Everything goes through ONE [`keyboard::on`] listener. Mapped keys are
//! consumed; anything else passes through untouched.
//!
//! Only one binding is live per thread. Registering again replaces the
//! previous listener, and cleaning up a handle that was already replaced does
//! nothing.
//!
//! # Example
//!
//! ```ignore
//! use spark_deck::state::{deck_keys, navigation::SlideSequencer};
//! use std::sync::{atomic::AtomicBool, Arc};
//!
//! let nav = SlideSequencer::with_len(16)?;
//! let running = Arc::new(AtomicBool::new(true));
//! let keys = deck_keys::setup_deck_keys(nav.clone(), running.clone());
//!
//! // on unmount
//! keys.cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use super::keyboard::{self, KeyboardEvent};
use super::navigation::SlideSequencer;

/// Navigation command a key maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckCommand {
    Next,
    Prev,
    First,
    Last,
}

/// Map a key event to a deck command by key name. Modifiers are ignored;
/// Ctrl+C is handled before mapping.
pub fn command_for(event: &KeyboardEvent) -> Option<DeckCommand> {
    match event.key.as_str() {
        "ArrowRight" | "ArrowDown" | "Space" => Some(DeckCommand::Next),
        "ArrowLeft" | "ArrowUp" => Some(DeckCommand::Prev),
        "Home" => Some(DeckCommand::First),
        "End" => Some(DeckCommand::Last),
        _ => None,
    }
}

impl DeckCommand {
    pub fn apply(self, nav: &SlideSequencer) {
        match self {
            DeckCommand::Next => nav.next(),
            DeckCommand::Prev => nav.prev(),
            DeckCommand::First => nav.first(),
            DeckCommand::Last => nav.last(),
        }
    }
}

// =============================================================================
// ACTIVE REGISTRATION
// =============================================================================

struct ActiveBinding {
    generation: u64,
    off: Box<dyn FnOnce()>,
}

thread_local! {
    static ACTIVE: RefCell<Option<ActiveBinding>> = const { RefCell::new(None) };
    static GENERATION: Cell<u64> = const { Cell::new(0) };
}

fn release(generation: u64) -> bool {
    let binding = ACTIVE.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.as_ref() {
            Some(active) if active.generation == generation => slot.take(),
            _ => None,
        }
    });
    match binding {
        Some(binding) => {
            (binding.off)();
            true
        }
        None => false,
    }
}

/// Whether a deck binding is currently registered on this thread.
pub fn is_active() -> bool {
    ACTIVE.with(|slot| slot.borrow().is_some())
}

// =============================================================================
// HANDLE
// =============================================================================

/// Cleanup handle for the deck key binding. Dropping it also cleans up.
pub struct DeckKeysHandle {
    generation: u64,
}

impl DeckKeysHandle {
    /// Remove the listener. No-op if a newer registration replaced it.
    pub fn cleanup(self) {
        drop(self);
    }
}

impl Drop for DeckKeysHandle {
    fn drop(&mut self) {
        if release(self.generation) {
            debug!(generation = self.generation, "deck keys released");
        }
    }
}

// =============================================================================
// SETUP
// =============================================================================

/// Bind navigation keys to `nav` and Ctrl+C to clearing `running`.
pub fn setup_deck_keys(nav: SlideSequencer, running: Arc<AtomicBool>) -> DeckKeysHandle {
    let generation = GENERATION.with(|g| {
        let next = g.get() + 1;
        g.set(next);
        next
    });

    // Replace, never stack.
    let previous = ACTIVE.with(|slot| slot.borrow_mut().take());
    if let Some(previous) = previous {
        debug!(generation = previous.generation, "replacing deck keys");
        (previous.off)();
    }

    let off = keyboard::on(move |event| {
        if event.is_interrupt() {
            info!("interrupt received, stopping");
            running.store(false, Ordering::SeqCst);
            return true;
        }
        match command_for(event) {
            Some(command) => {
                command.apply(&nav);
                true
            }
            None => false,
        }
    });

    ACTIVE.with(|slot| {
        *slot.borrow_mut() = Some(ActiveBinding {
            generation,
            off: Box::new(off),
        });
    });
    debug!(generation, "deck keys bound");

    DeckKeysHandle { generation }
}

/// Drop any active binding (for testing).
pub fn reset_deck_keys() {
    let binding = ACTIVE.with(|slot| slot.borrow_mut().take());
    if let Some(binding) = binding {
        (binding.off)();
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::keyboard::{dispatch, global_handler_count, reset_keyboard_state, Modifiers};

    fn setup() -> (SlideSequencer, Arc<AtomicBool>) {
        reset_deck_keys();
        reset_keyboard_state();
        (
            SlideSequencer::with_len(16).unwrap(),
            Arc::new(AtomicBool::new(true)),
        )
    }

    fn press(key: &str) -> bool {
        dispatch(KeyboardEvent::new(key))
    }

    #[test]
    fn test_key_mapping() {
        let (nav, running) = setup();
        let _keys = setup_deck_keys(nav.clone(), running);

        assert!(press("ArrowRight"));
        assert!(press("ArrowDown"));
        assert!(press("Space"));
        assert_eq!(nav.current_index(), 3);

        assert!(press("ArrowLeft"));
        assert!(press("ArrowUp"));
        assert_eq!(nav.current_index(), 1);

        assert!(press("End"));
        assert_eq!(nav.current_index(), 15);
        assert!(press("Home"));
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_unmapped_keys_pass_through() {
        let (nav, running) = setup();
        let _keys = setup_deck_keys(nav.clone(), running);

        assert!(!press("a"));
        assert!(!press("Enter"));
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_modified_keys_still_navigate() {
        let (nav, running) = setup();
        let _keys = setup_deck_keys(nav.clone(), running.clone());

        assert!(dispatch(KeyboardEvent::with_modifiers("ArrowRight", Modifiers::shift())));
        assert_eq!(nav.current_index(), 1);

        let alt = Modifiers { alt: true, ..Modifiers::none() };
        assert!(dispatch(KeyboardEvent::with_modifiers("End", alt)));
        assert_eq!(nav.current_index(), 15);
        assert!(running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_ctrl_c_stops_running() {
        let (nav, running) = setup();
        let _keys = setup_deck_keys(nav, running.clone());

        assert!(!press("c"));
        assert!(running.load(Ordering::SeqCst));

        assert!(dispatch(KeyboardEvent::with_modifiers("c", Modifiers::ctrl())));
        assert!(!running.load(Ordering::SeqCst));
    }

    #[test]
    fn test_cleanup_removes_listener_once() {
        let (nav, running) = setup();
        let keys = setup_deck_keys(nav.clone(), running);
        assert_eq!(global_handler_count(), 1);

        keys.cleanup();
        assert_eq!(global_handler_count(), 0);
        assert!(!is_active());

        assert!(!press("ArrowRight"));
        assert_eq!(nav.current_index(), 0);
    }

    #[test]
    fn test_reregistration_never_duplicates() {
        let (nav, running) = setup();
        let first = setup_deck_keys(nav.clone(), running.clone());
        let second = setup_deck_keys(nav.clone(), running);
        assert_eq!(global_handler_count(), 1);

        press("ArrowRight");
        assert_eq!(nav.current_index(), 1);

        // The superseded handle must not tear down the live binding.
        first.cleanup();
        assert_eq!(global_handler_count(), 1);
        press("ArrowRight");
        assert_eq!(nav.current_index(), 2);

        second.cleanup();
        assert_eq!(global_handler_count(), 0);
    }

    #[test]
    fn test_drop_cleans_up() {
        let (nav, running) = setup();
        {
            let _keys = setup_deck_keys(nav, running);
            assert!(is_active());
        }
        assert!(!is_active());
        assert_eq!(global_handler_count(), 0);
    }

    #[test]
    fn test_command_for() {
        assert_eq!(command_for(&KeyboardEvent::new("Space")), Some(DeckCommand::Next));
        assert_eq!(command_for(&KeyboardEvent::new("Home")), Some(DeckCommand::First));
        assert_eq!(command_for(&KeyboardEvent::new("x")), None);
        assert_eq!(
            command_for(&KeyboardEvent::with_modifiers("ArrowRight", Modifiers::shift())),
            Some(DeckCommand::Next)
        );
    }
}
