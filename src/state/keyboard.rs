//! Keyboard Module - key event types and handler registry.
//!
//! Owns neither stdin (see [`super::input`]) nor the deck bindings
//! (see [`super::deck_keys`]). This is only the registry both of them meet at.
//!
//! # API
//!
//! - `on(handler)` - every key press, returns a cleanup closure
//! - `dispatch(event)` - route an event, returns whether it was consumed
//!
//! # Example
//!
//! ```ignore
//! use spark_deck::state::keyboard;
//!
//! let off = keyboard::on(|event| {
//!     tracing::trace!(key = %event.key, "key");
//!     false
//! });
//!
//! off();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn ctrl() -> Self {
        Self { ctrl: true, ..Self::default() }
    }

    pub fn shift() -> Self {
        Self { shift: true, ..Self::default() }
    }

    /// True when no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Press,
    Repeat,
    Release,
}

/// A key event with a DOM-style key name ("a", "Space", "ArrowRight", "Home").
#[derive(Clone, Debug, PartialEq)]
pub struct KeyboardEvent {
    pub key: String,
    pub modifiers: Modifiers,
    pub state: KeyState,
}

impl KeyboardEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::default(),
            state: KeyState::Press,
        }
    }

    pub fn with_modifiers(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
            state: KeyState::Press,
        }
    }

    pub fn with_state(mut self, state: KeyState) -> Self {
        self.state = state;
        self
    }

    pub fn is_press(&self) -> bool {
        self.state == KeyState::Press
    }

    /// Ctrl+C, regardless of the reported letter case.
    pub fn is_interrupt(&self) -> bool {
        self.modifiers.ctrl && self.key.eq_ignore_ascii_case("c")
    }
}

/// Handler for every key event. Return true to consume the event.
pub type KeyHandler = Rc<dyn Fn(&KeyboardEvent) -> bool>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// Handler ids only ever grow, so a cleanup closure can never remove a
/// handler registered after it, even across [`reset_keyboard_state`].
#[derive(Default)]
struct HandlerRegistry {
    handlers: Vec<(u64, KeyHandler)>,
    next_id: u64,
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a keyboard event to the handlers in subscription order, stopping
/// at the first that consumes. Only presses reach handlers.
///
/// Handlers are snapshotted before being called, so a handler may subscribe or
/// unsubscribe without tripping the registry borrow.
pub fn dispatch(event: KeyboardEvent) -> bool {
    if !event.is_press() {
        return false;
    }

    let handlers: Vec<KeyHandler> =
        REGISTRY.with(|reg| reg.borrow().handlers.iter().map(|(_, h)| h.clone()).collect());

    handlers.iter().any(|handler| handler(&event))
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Subscribe to all key presses. Returns cleanup function.
pub fn on<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&KeyboardEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        reg.handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            reg.borrow_mut()
                .handlers
                .retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Number of live `on` subscriptions.
pub fn global_handler_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().handlers.len())
}

/// Drop every handler (for testing). Ids keep counting up.
pub fn reset_keyboard_state() {
    REGISTRY.with(|reg| reg.borrow_mut().handlers.clear());
}

// =============================================================================
// TESTS
// =============================================================================
