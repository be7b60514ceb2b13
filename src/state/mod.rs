//! State Module - runtime input and navigation state.
//!
//! - **Keyboard** - event types, dispatch, handler registry
//! - **Mouse** - hit grid, hover tracking, click detection
//! - **Input** - crossterm conversion and routing
//! - **Navigation** - the slide sequencer
//! - **Deck keys** - the global key binding onto the sequencer

pub mod deck_keys;
pub mod input;
pub mod keyboard;
pub mod mouse;
pub mod navigation;

pub use deck_keys::{setup_deck_keys, DeckCommand, DeckKeysHandle};
pub use keyboard::{KeyState, KeyboardEvent, Modifiers};
pub use mouse::{HitGrid, HoverChange, MouseAction, MouseButton, MouseEvent};
pub use navigation::SlideSequencer;
