//! Terminal size signals.
//!
//! The root inputs of every frame: resize events write here, composition
//! reads from here.

use spark_signals::{signal, Signal};
use std::cell::RefCell;

use crate::types::ClipRect;

thread_local! {
    static TERMINAL_WIDTH: RefCell<Signal<u16>> = RefCell::new(signal(80));
    static TERMINAL_HEIGHT: RefCell<Signal<u16>> = RefCell::new(signal(24));
}

pub fn terminal_width() -> u16 {
    TERMINAL_WIDTH.with(|w| w.borrow().get())
}

pub fn terminal_height() -> u16 {
    TERMINAL_HEIGHT.with(|h| h.borrow().get())
}

/// Set the terminal size (called on resize events).
pub fn set_terminal_size(width: u16, height: u16) {
    TERMINAL_WIDTH.with(|w| w.borrow().set(width));
    TERMINAL_HEIGHT.with(|h| h.borrow().set(height));
}

pub fn terminal_width_signal() -> Signal<u16> {
    TERMINAL_WIDTH.with(|w| w.borrow().clone())
}

pub fn terminal_height_signal() -> Signal<u16> {
    TERMINAL_HEIGHT.with(|h| h.borrow().clone())
}

/// The whole terminal as a rectangle.
pub fn viewport() -> ClipRect {
    ClipRect::new(0, 0, terminal_width(), terminal_height())
}

/// Query crossterm for the real size and store it.
pub fn detect_terminal_size() {
    if let Ok((width, height)) = crossterm::terminal::size() {
        set_terminal_size(width, height);
    }
}
