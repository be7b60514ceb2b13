//! Error type for the few operations that can actually fail.
//!
//! Navigation and citation lookup never fail (they clamp and fall back).
//! Terminal I/O, layout and building a deck with no slides are the only
//! error sources.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    /// Terminal I/O failed (raw mode, alternate screen, polling, output).
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Nav bar or page layout could not be computed.
    #[error("layout failed: {0}")]
    Layout(#[from] taffy::TaffyError),

    /// A deck needs at least one slide for `0 <= current < total` to hold.
    #[error("a deck needs at least one slide")]
    EmptyDeck,
}

pub type Result<T> = std::result::Result<T, DeckError>;
