//! Input Module - crossterm event conversion, polling and routing.
//!
//! Converts crossterm events into the deck's [`KeyboardEvent`] / [`MouseEvent`]
//! and routes them to [`super::keyboard`], [`super::mouse`] or the terminal
//! size signals.
//!
//! # Example
//!
//! ```ignore
//! use spark_deck::state::input::{poll_event, route_event};
//! use std::time::Duration;
//!
//! if let Some(event) = poll_event(Duration::from_millis(16))? {
//!     route_event(event);
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    poll, read, DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
};
use crossterm::execute;

use super::keyboard::{KeyState, KeyboardEvent, Modifiers};
use super::mouse::{MouseAction, MouseButton, MouseEvent};

/// Unified input event.
#[derive(Debug, Clone)]
pub enum InputEvent {
    Mouse(MouseEvent),
    Key(KeyboardEvent),
    Resize(u16, u16),
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

pub fn convert_mouse_event(event: CrosstermMouseEvent) -> MouseEvent {
    let (action, button) = match event.kind {
        MouseEventKind::Down(btn) => (MouseAction::Down, convert_mouse_button(btn)),
        MouseEventKind::Up(btn) => (MouseAction::Up, convert_mouse_button(btn)),
        MouseEventKind::Drag(btn) => (MouseAction::Drag, convert_mouse_button(btn)),
        MouseEventKind::Moved => (MouseAction::Move, MouseButton::None),
        MouseEventKind::ScrollUp
        | MouseEventKind::ScrollDown
        | MouseEventKind::ScrollLeft
        | MouseEventKind::ScrollRight => (MouseAction::Scroll, MouseButton::None),
    };

    MouseEvent {
        action,
        button,
        x: event.column,
        y: event.row,
        modifiers: convert_modifiers(event.modifiers),
        target: None,
    }
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> MouseButton {
    match btn {
        CrosstermMouseButton::Left => MouseButton::Left,
        CrosstermMouseButton::Right => MouseButton::Right,
        CrosstermMouseButton::Middle => MouseButton::Middle,
    }
}

/// Key names follow the DOM convention; the space bar is `"Space"`.
pub fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => String::new(),
    }
}

pub fn convert_key_event(event: CrosstermKeyEvent) -> KeyboardEvent {
    let state = match event.kind {
        KeyEventKind::Press => KeyState::Press,
        KeyEventKind::Repeat => KeyState::Repeat,
        KeyEventKind::Release => KeyState::Release,
    };

    KeyboardEvent {
        key: key_name(event.code),
        modifiers: convert_modifiers(event.modifiers),
        state,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: mods.contains(KeyModifiers::CONTROL),
        alt: mods.contains(KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
        meta: mods.contains(KeyModifiers::META) || mods.contains(KeyModifiers::SUPER),
    }
}

pub fn convert_event(event: CrosstermEvent) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => InputEvent::Mouse(convert_mouse_event(mouse)),
        CrosstermEvent::Key(key) => InputEvent::Key(convert_key_event(key)),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// POLLING + ROUTING
// =============================================================================

/// Wait up to `timeout` for an event.
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?)))
    } else {
        Ok(None)
    }
}

/// Route an event. Returns true if a handler consumed it.
pub fn route_event(event: InputEvent) -> bool {
    match event {
        InputEvent::Mouse(mouse) => super::mouse::dispatch(mouse),
        InputEvent::Key(key) => super::keyboard::dispatch(key),
        InputEvent::Resize(w, h) => {
            crate::pipeline::terminal::set_terminal_size(w, h);
            false
        }
        InputEvent::None => false,
    }
}

pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrosstermKeyEvent {
        CrosstermKeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> CrosstermMouseEvent {
        CrosstermMouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    #[test]
    fn test_space_is_normalized() {
        let event = convert_key_event(key(KeyCode::Char(' '), KeyModifiers::empty()));
        assert_eq!(event.key, "Space");
    }

    #[test]
    fn test_navigation_key_names() {
        let cases = [
            (KeyCode::Left, "ArrowLeft"),
            (KeyCode::Right, "ArrowRight"),
            (KeyCode::Up, "ArrowUp"),
            (KeyCode::Down, "ArrowDown"),
            (KeyCode::Home, "Home"),
            (KeyCode::End, "End"),
            (KeyCode::Esc, "Escape"),
            (KeyCode::F(5), "F5"),
        ];
        for (code, expected) in cases {
            assert_eq!(key_name(code), expected);
        }
    }

    #[test]
    fn test_ctrl_c_converts_to_interrupt() {
        let event = convert_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(event.key, "c");
        assert!(event.is_interrupt());
    }

    #[test]
    fn test_key_states() {
        for (kind, expected) in [
            (KeyEventKind::Press, KeyState::Press),
            (KeyEventKind::Repeat, KeyState::Repeat),
            (KeyEventKind::Release, KeyState::Release),
        ] {
            let event = convert_key_event(CrosstermKeyEvent {
                kind,
                ..key(KeyCode::Right, KeyModifiers::empty())
            });
            assert_eq!(event.state, expected);
        }
    }

    #[test]
    fn test_mouse_conversion() {
        let down = convert_mouse_event(mouse(MouseEventKind::Down(CrosstermMouseButton::Left), 10, 5));
        assert_eq!(down.action, MouseAction::Down);
        assert_eq!(down.button, MouseButton::Left);
        assert_eq!((down.x, down.y), (10, 5));
        assert_eq!(down.target, None);

        let moved = convert_mouse_event(mouse(MouseEventKind::Moved, 3, 4));
        assert_eq!(moved.action, MouseAction::Move);
        assert_eq!(moved.button, MouseButton::None);

        let scroll = convert_mouse_event(mouse(MouseEventKind::ScrollDown, 0, 0));
        assert_eq!(scroll.action, MouseAction::Scroll);
    }

    #[test]
    fn test_resize_and_other_events() {
        assert!(matches!(
            convert_event(CrosstermEvent::Resize(120, 40)),
            InputEvent::Resize(120, 40)
        ));
        assert!(matches!(convert_event(CrosstermEvent::FocusGained), InputEvent::None));
    }
}
