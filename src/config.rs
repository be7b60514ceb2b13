//! Deck configuration.
//!
//! Plain structs with `Default`, meant to be filled with struct update syntax:
//!
//! ```ignore
//! let config = DeckConfig {
//!     start_slide: 3,
//!     mouse: false,
//!     ..Default::default()
//! };
//! ```
//!
//! Nothing is read from files or the environment; the binary maps its CLI
//! flags onto these structs.

use std::time::Duration;

// =============================================================================
// Render Mode
// =============================================================================

/// How the deck occupies the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Alternate screen buffer with differential rendering.
    #[default]
    Fullscreen,
    /// Normal screen buffer; the frame is redrawn in place.
    Inline,
}

// =============================================================================
// Animation Timing
// =============================================================================

/// Pacing for progress-style reveals (line drawing, count-up meters).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTiming {
    /// Delay before the first tick is scheduled.
    pub delay: Duration,
    /// Interval between ticks.
    pub tick: Duration,
    /// Progress added per tick.
    pub increment: u16,
    /// Value at which the reveal is complete.
    pub target: u16,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            delay: Duration::ZERO,
            tick: Duration::from_millis(20),
            increment: 5,
            target: 100,
        }
    }
}

impl RevealTiming {
    /// Same pacing, different start delay.
    pub fn delayed(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Number of ticks needed to go from 0 to `target`.
    pub fn ticks_to_complete(&self) -> u32 {
        let increment = self.increment.max(1) as u32;
        (self.target as u32).div_ceil(increment)
    }
}

/// Pacing for step sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    /// Time between two steps while playing.
    pub cadence: Duration,
    /// Start playing as soon as the owning slide mounts.
    pub autoplay: bool,
    /// Wrap from the last step back to the first instead of completing.
    pub looping: bool,
}

impl Default for StepTiming {
    fn default() -> Self {
        Self {
            cadence: Duration::from_millis(1200),
            autoplay: false,
            looping: false,
        }
    }
}

// =============================================================================
// Deck Configuration
// =============================================================================

/// Top-level configuration for mounting a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckConfig {
    /// Terminal usage.
    pub render_mode: RenderMode,
    /// Capture the mouse for nav controls and citation tooltips.
    pub mouse: bool,
    /// Zero-based slide to show first (clamped to the deck).
    pub start_slide: usize,
    /// Poll timeout per tick; also the animation frame interval.
    pub frame_interval: Duration,
    /// Show the "arrow keys to navigate" hint.
    pub show_hint: bool,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::Fullscreen,
            mouse: true,
            start_slide: 0,
            frame_interval: Duration::from_millis(16),
            show_hint: true,
        }
    }
}
