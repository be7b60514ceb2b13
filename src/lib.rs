//! # spark-deck
//!
//! Keyboard-driven terminal slide deck with timer-driven reveal animations.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! shared navigation and terminal state.
//!
//! ## Architecture
//!
//! ```text
//! keys / mouse → SlideSequencer → DeckPlayer → Scene (animators) → compose → DiffRenderer
//! ```
//!
//! Every animator owns a [`animate::Scheduler`] over an injected
//! [`animate::Clock`], so a whole presentation can be played back in tests
//! with a [`animate::VirtualClock`] and no terminal.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Attr, Cell, ClipRect, Point)
//! - [`animate`] - Clocks, scheduler, reveal animators, step sequences
//! - [`state`] - Keyboard, mouse, input conversion, navigation, deck keys
//! - [`citations`] - Citation registry and hover tooltips
//! - [`deck`] - Slide descriptors, scenes, the slide list, the player
//! - [`layout`] - Text measurement and the Taffy page layout
//! - [`renderer`] - Frame buffer and differential terminal output
//! - [`pipeline`] - Frame composition, terminal size, mount and event loop

pub mod animate;
pub mod citations;
pub mod config;
pub mod deck;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod renderer;
pub mod state;
pub mod types;

pub use types::*;

pub use animate::{
    Clock, ClockHandle, NodeReveal, PathReveal, ProgressAnimator, Scheduler, StepAnimationController,
    StepMode, SystemClock, VirtualClock,
};

pub use citations::{CitationAnchor, CitationEntry, CitationOverlay, Tooltip};

pub use config::{DeckConfig, RenderMode, RevealTiming, StepTiming};

pub use deck::{slides, DeckPlayer, HitTarget, Scene, SceneBuilder, SlideDescriptor, Span};

pub use error::{DeckError, Result};

pub use layout::{page_layout, string_width, truncate_text, wrap_text};

pub use pipeline::{compose, mount, present, run, tick, Frame, FrameOptions, MountHandle};

pub use renderer::{DiffRenderer, FrameBuffer};

pub use state::{
    setup_deck_keys, DeckCommand, DeckKeysHandle, KeyState, KeyboardEvent, Modifiers, MouseAction,
    MouseButton, MouseEvent, SlideSequencer,
};
