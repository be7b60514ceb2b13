//! Terminal session - the modes a mount switches on, and their restore.
//!
//! Every mode is recorded *before* it is switched on, so a failure halfway
//! through [`TerminalSession::open`] still undoes whatever did take effect:
//! the half-built session is dropped and [`Drop`] restores it.
//!
//! Restore runs every step in reverse order even when one fails, and reports
//! the first error.

use std::io;

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{debug, warn};

use crate::config::RenderMode;
use crate::error::Result;
use crate::renderer::DiffRenderer;
use crate::state::input;

/// Terminal mode switches used by a mount.
pub trait TerminalModes {
    fn enable_raw(&mut self) -> io::Result<()>;
    fn disable_raw(&mut self) -> io::Result<()>;
    fn enter_screen(&mut self, mode: RenderMode) -> io::Result<()>;
    fn leave_screen(&mut self, mode: RenderMode) -> io::Result<()>;
    fn enable_mouse(&mut self) -> io::Result<()>;
    fn disable_mouse(&mut self) -> io::Result<()>;
}

impl TerminalModes for DiffRenderer {
    fn enable_raw(&mut self) -> io::Result<()> {
        enable_raw_mode()
    }

    fn disable_raw(&mut self) -> io::Result<()> {
        disable_raw_mode()
    }

    fn enter_screen(&mut self, mode: RenderMode) -> io::Result<()> {
        match mode {
            RenderMode::Fullscreen => self.enter_fullscreen(),
            RenderMode::Inline => self.enter_inline(),
        }
    }

    fn leave_screen(&mut self, mode: RenderMode) -> io::Result<()> {
        match mode {
            RenderMode::Fullscreen => self.exit_fullscreen(),
            RenderMode::Inline => self.exit_inline(),
        }
    }

    fn enable_mouse(&mut self) -> io::Result<()> {
        input::enable_mouse()
    }

    fn disable_mouse(&mut self) -> io::Result<()> {
        input::disable_mouse()
    }
}

pub struct TerminalSession<T: TerminalModes> {
    terminal: T,
    raw: bool,
    screen: Option<RenderMode>,
    mouse: bool,
}

impl<T: TerminalModes> TerminalSession<T> {
    /// Raw mode, then the screen, then (optionally) mouse capture.
    pub fn open(terminal: T, mode: RenderMode, mouse: bool) -> Result<Self> {
        let mut session = Self {
            terminal,
            raw: false,
            screen: None,
            mouse: false,
        };
        session.terminal.enable_raw()?;
        session.raw = true;

        session.screen = Some(mode);
        session.terminal.enter_screen(mode)?;

        if mouse {
            session.mouse = true;
            session.terminal.enable_mouse()?;
        }
        debug!(?mode, mouse, "terminal session opened");
        Ok(session)
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Whether any mode is still switched on.
    pub fn is_open(&self) -> bool {
        self.raw || self.screen.is_some() || self.mouse
    }

    /// Undo every mode that was switched on. Idempotent.
    pub fn restore(&mut self) -> Result<()> {
        let mut first: Option<io::Error> = None;
        let mut record = |step: &'static str, outcome: io::Result<()>| {
            if let Err(err) = outcome {
                warn!(step, %err, "terminal restore step failed");
                first.get_or_insert(err);
            }
        };

        if std::mem::take(&mut self.mouse) {
            record("mouse", self.terminal.disable_mouse());
        }
        if let Some(mode) = self.screen.take() {
            record("screen", self.terminal.leave_screen(mode));
        }
        if std::mem::take(&mut self.raw) {
            record("raw mode", self.terminal.disable_raw());
        }

        match first {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

impl<T: TerminalModes> Drop for TerminalSession<T> {
    fn drop(&mut self) {
        // Errors were already logged per step.
        let _ = self.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeckError;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every switch and fails the one named in `fail_on`.
    #[derive(Clone, Default)]
    struct Recorder {
        log: Rc<RefCell<Vec<&'static str>>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn failing(step: &'static str) -> Self {
            Self {
                fail_on: Some(step),
                ..Self::default()
            }
        }

        fn step(&mut self, name: &'static str) -> io::Result<()> {
            self.log.borrow_mut().push(name);
            if self.fail_on == Some(name) {
                return Err(io::Error::other(name));
            }
            Ok(())
        }

        fn log(&self) -> Vec<&'static str> {
            self.log.borrow().clone()
        }
    }

    impl TerminalModes for Recorder {
        fn enable_raw(&mut self) -> io::Result<()> {
            self.step("enable_raw")
        }
        fn disable_raw(&mut self) -> io::Result<()> {
            self.step("disable_raw")
        }
        fn enter_screen(&mut self, _mode: RenderMode) -> io::Result<()> {
            self.step("enter_screen")
        }
        fn leave_screen(&mut self, _mode: RenderMode) -> io::Result<()> {
            self.step("leave_screen")
        }
        fn enable_mouse(&mut self) -> io::Result<()> {
            self.step("enable_mouse")
        }
        fn disable_mouse(&mut self) -> io::Result<()> {
            self.step("disable_mouse")
        }
    }

    #[test]
    fn test_open_and_restore_in_reverse() {
        let recorder = Recorder::default();
        let mut session = TerminalSession::open(recorder.clone(), RenderMode::Fullscreen, true).unwrap();
        assert!(session.is_open());

        session.restore().unwrap();
        assert!(!session.is_open());
        assert_eq!(
            recorder.log(),
            [
                "enable_raw",
                "enter_screen",
                "enable_mouse",
                "disable_mouse",
                "leave_screen",
                "disable_raw"
            ]
        );

        // Idempotent, including the drop that follows.
        session.restore().unwrap();
        drop(session);
        assert_eq!(recorder.log().len(), 6);
    }

    #[test]
    fn test_failed_mouse_enable_still_leaves_raw_mode() {
        let recorder = Recorder::failing("enable_mouse");
        let err = TerminalSession::open(recorder.clone(), RenderMode::Fullscreen, true)
            .err()
            .unwrap();
        assert!(matches!(err, DeckError::Io(_)));

        let log = recorder.log();
        assert_eq!(&log[log.len() - 2..], ["leave_screen", "disable_raw"]);
    }

    #[test]
    fn test_failed_screen_enter_still_leaves_raw_mode() {
        let recorder = Recorder::failing("enter_screen");
        assert!(TerminalSession::open(recorder.clone(), RenderMode::Inline, true).is_err());
        assert_eq!(
            recorder.log(),
            ["enable_raw", "enter_screen", "leave_screen", "disable_raw"]
        );
    }

    #[test]
    fn test_failed_raw_enable_touches_nothing_else() {
        let recorder = Recorder::failing("enable_raw");
        assert!(TerminalSession::open(recorder.clone(), RenderMode::Fullscreen, false).is_err());
        assert_eq!(recorder.log(), ["enable_raw"]);
    }

    #[test]
    fn test_restore_runs_every_step_past_a_failure() {
        let recorder = Recorder::failing("disable_mouse");
        let mut session = TerminalSession::open(recorder.clone(), RenderMode::Fullscreen, true).unwrap();

        assert!(session.restore().is_err());
        assert!(!session.is_open());
        assert!(recorder.log().ends_with(&["disable_mouse", "leave_screen", "disable_raw"]));
    }

    #[test]
    fn test_no_mouse_means_no_mouse_switches() {
        let recorder = Recorder::default();
        let session = TerminalSession::open(recorder.clone(), RenderMode::Inline, false).unwrap();
        drop(session);
        assert_eq!(
            recorder.log(),
            ["enable_raw", "enter_screen", "leave_screen", "disable_raw"]
        );
    }
}
