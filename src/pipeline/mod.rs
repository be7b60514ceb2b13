//! Pipeline: from player state to terminal output.
//!
//! ```text
//! input events → keyboard / mouse dispatch → SlideSequencer / DeckPlayer
//!                                                    │
//!             terminal size ──► compose ◄────────────┘
//!                                 │
//!                     FrameBuffer + HitGrid → DiffRenderer
//! ```

pub mod frame;
pub mod mount;
pub mod session;
pub mod terminal;

pub use frame::{compose, Frame, FrameOptions};
pub use mount::{mount, present, run, tick, MountHandle};
pub use session::{TerminalModes, TerminalSession};
pub use terminal::{set_terminal_size, terminal_height, terminal_width};
