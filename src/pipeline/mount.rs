//! Mount API - terminal lifecycle and the event loop.
//!
//! ```ignore
//! use spark_deck::pipeline::mount;
//!
//! let mut handle = mount::mount(slides().to_vec(), DeckConfig::default())?;
//! mount::run(&mut handle)?;   // until Ctrl+C or handle.stop()
//! handle.unmount()?;
//! ```
//!
//! Each [`tick`] waits at most one frame interval for input, routes it, lets
//! the player apply due timers and redraws when anything changed.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::frame::{compose, FrameOptions};
use super::session::TerminalSession;
use super::terminal::{detect_terminal_size, terminal_height, terminal_width, viewport};
use crate::animate::SystemClock;
use crate::config::DeckConfig;
use crate::deck::{DeckPlayer, SlideDescriptor};
use crate::error::Result;
use crate::renderer::DiffRenderer;
use crate::state::deck_keys::{setup_deck_keys, DeckKeysHandle};
use crate::state::{input, mouse};

// =============================================================================
// POINTER WIRING
// =============================================================================

/// Route clicks and hover transitions to the player. Returns the cleanups.
pub fn wire_pointer(player: &Rc<RefCell<DeckPlayer>>) -> Vec<Box<dyn FnOnce()>> {
    let on_click = {
        let player = Rc::clone(player);
        mouse::on_click(move |event| match event.target {
            Some(target) => player.borrow_mut().click(target),
            None => false,
        })
    };
    let on_hover = {
        let player = Rc::clone(player);
        mouse::on_hover(move |change| player.borrow_mut().hover(change))
    };
    let offs: Vec<Box<dyn FnOnce()>> = vec![Box::new(on_click), Box::new(on_hover)];
    offs
}

// =============================================================================
// MOUNT HANDLE
// =============================================================================

/// A mounted deck. Restores the terminal on [`MountHandle::unmount`] or drop.
pub struct MountHandle {
    player: Rc<RefCell<DeckPlayer>>,
    running: Arc<AtomicBool>,
    session: TerminalSession<DiffRenderer>,
    deck_keys: Option<DeckKeysHandle>,
    pointer: Vec<Box<dyn FnOnce()>>,
    options: FrameOptions,
    frame_interval: Duration,
    last_size: (u16, u16),
    dirty: bool,
    active: bool,
}

impl MountHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request a graceful stop; the loop exits on its next tick.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn player(&self) -> Rc<RefCell<DeckPlayer>> {
        Rc::clone(&self.player)
    }

    /// Release handlers and restore the terminal.
    pub fn unmount(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.running.store(false, Ordering::SeqCst);

        if let Some(keys) = self.deck_keys.take() {
            keys.cleanup();
        }
        for off in self.pointer.drain(..) {
            off();
        }
        self.player.borrow_mut().scene_mut().teardown();

        self.session.restore()?;
        info!("deck unmounted");
        Ok(())
    }

    fn render(&mut self) -> Result<()> {
        let frame = {
            let mut player = self.player.borrow_mut();
            compose(&mut player, viewport(), self.options)?
        };
        mouse::install_hit_grid(frame.hits);
        self.session.terminal_mut().render(&frame.buffer)?;
        Ok(())
    }
}

impl Drop for MountHandle {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            warn!(%err, "terminal restore failed");
        }
    }
}

// =============================================================================
// MOUNT
// =============================================================================

/// Take over the terminal and show `slides`.
pub fn mount(slides: Vec<SlideDescriptor>, config: DeckConfig) -> Result<MountHandle> {
    detect_terminal_size();

    let player = DeckPlayer::new(slides, SystemClock::handle())?;
    player
        .nav()
        .go_to(isize::try_from(config.start_slide).unwrap_or(isize::MAX));
    let player = Rc::new(RefCell::new(player));
    player.borrow_mut().sync();

    // Dropping the session on any later error restores the terminal.
    let session = TerminalSession::open(DiffRenderer::new(), config.render_mode, config.mouse)?;

    let running = Arc::new(AtomicBool::new(true));
    let nav = player.borrow().nav().clone();
    let deck_keys = setup_deck_keys(nav, Arc::clone(&running));

    let pointer = if config.mouse {
        wire_pointer(&player)
    } else {
        Vec::new()
    };

    info!(
        mode = ?config.render_mode,
        mouse = config.mouse,
        start = config.start_slide,
        "deck mounted"
    );

    Ok(MountHandle {
        player,
        running,
        session,
        deck_keys: Some(deck_keys),
        pointer,
        options: FrameOptions {
            show_hint: config.show_hint,
        },
        frame_interval: config.frame_interval,
        last_size: (terminal_width(), terminal_height()),
        dirty: true,
        active: true,
    })
}

// =============================================================================
// EVENT LOOP
// =============================================================================

/// One loop iteration. Returns `Ok(false)` once a stop was requested.
pub fn tick(handle: &mut MountHandle) -> Result<bool> {
    if !handle.is_running() {
        return Ok(false);
    }

    if let Some(event) = input::poll_event(handle.frame_interval)? {
        input::route_event(event);
        handle.dirty = true;
    }

    let size = (terminal_width(), terminal_height());
    if size != handle.last_size {
        debug!(width = size.0, height = size.1, "terminal resized");
        handle.last_size = size;
        handle.session.terminal_mut().invalidate();
        handle.dirty = true;
    }

    let (changed, slide_changed) = {
        let mut player = handle.player.borrow_mut();
        let before = player.mounted_index();
        let changed = player.update();
        (changed, player.mounted_index() != before)
    };
    if slide_changed {
        mouse::clear_hover();
    }
    handle.dirty |= changed;

    if handle.dirty && handle.is_running() {
        handle.render()?;
        handle.dirty = false;
    }

    Ok(handle.is_running())
}

/// Tick until stopped.
pub fn run(handle: &mut MountHandle) -> Result<()> {
    while tick(handle)? {}
    Ok(())
}

/// Mount, run and unmount in one call.
pub fn present(slides: Vec<SlideDescriptor>, config: DeckConfig) -> Result<()> {
    let mut handle = mount(slides, config)?;
    let outcome = run(&mut handle);
    handle.unmount()?;
    outcome
}

// =============================================================================
// TESTS
// =============================================================================
