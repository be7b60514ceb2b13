//! Clocks - where animation time comes from.
//!
//! Every animator reads time through a [`ClockHandle`] instead of calling
//! `Instant::now()` itself. The running deck uses [`SystemClock`]; tests use
//! [`VirtualClock`] and advance it by hand, so timing contracts can be checked
//! without sleeping.
//!
//! # Example
//!
//! ```ignore
//! use spark_deck::animate::clock::VirtualClock;
//! use std::time::Duration;
//!
//! let clock = VirtualClock::new();
//! let handle = clock.handle();
//! clock.advance(Duration::from_millis(400));
//! assert_eq!(handle.now(), Duration::from_millis(400));
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Shared clock handle owned by animators.
pub type ClockHandle = Rc<dyn Clock>;

// =============================================================================
// SYSTEM CLOCK
// =============================================================================

/// Wall-clock time from `Instant`.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Convenience: a fresh system clock behind a handle.
    pub fn handle() -> ClockHandle {
        Rc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

// =============================================================================
// VIRTUAL CLOCK
// =============================================================================

/// Manually advanced clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct VirtualClock {
    now: Rc<Cell<Duration>>,
}

impl VirtualClock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute time. Going backwards is ignored; clocks are monotonic.
    pub fn set(&self, to: Duration) {
        if to > self.now.get() {
            self.now.set(to);
        }
    }

    /// A handle that observes this clock.
    pub fn handle(&self) -> ClockHandle {
        Rc::new(self.clone())
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================
