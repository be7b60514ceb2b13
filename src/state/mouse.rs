//! Mouse Module - hit grid, hover tracking and click handlers.
//!
//! Each frame paints its clickable and hoverable regions (nav controls, step
//! buttons, citation anchors) into a [`HitGrid`] as *target indices*. Pointer
//! events are resolved against that grid, hover changes fire leave/enter, and a
//! press + release on the same target is a click.
//!
//! # API
//!
//! - `install_hit_grid(grid)` / `hit_test(x, y)` - frame-to-pointer bridge
//! - `hovered_target()`, `mouse_x()`, `mouse_y()` - reactive pointer state
//! - `on_click(fn)` - clicks on any target
//! - `on_hover(fn)` - hover transitions (leave of the old, enter of the new)
//! - `dispatch(event)` - route a pointer event
//!
//! # Example
//!
//! ```ignore
//! use spark_deck::state::mouse;
//!
//! let off = mouse::on_click(|event| {
//!     let target = event.target.expect("clicks always carry a target");
//!     tracing::debug!(target, "clicked");
//!     true
//! });
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{signal, Signal};

use super::keyboard::Modifiers;
use crate::types::ClipRect;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    Down,
    Up,
    Move,
    Drag,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MouseEvent {
    pub action: MouseAction,
    pub button: MouseButton,
    /// Column (0-indexed)
    pub x: u16,
    /// Row (0-indexed)
    pub y: u16,
    pub modifiers: Modifiers,
    /// Hit target under the pointer (filled by dispatch)
    pub target: Option<usize>,
}

impl MouseEvent {
    pub fn new(action: MouseAction, button: MouseButton, x: u16, y: u16) -> Self {
        Self {
            action,
            button,
            x,
            y,
            modifiers: Modifiers::default(),
            target: None,
        }
    }

    pub fn down(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Down, button, x, y)
    }

    pub fn up(button: MouseButton, x: u16, y: u16) -> Self {
        Self::new(MouseAction::Up, button, x, y)
    }

    pub fn move_to(x: u16, y: u16) -> Self {
        Self::new(MouseAction::Move, MouseButton::None, x, y)
    }
}

/// A hover transition. Either side may be `None` (pointer over empty space).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChange {
    pub left: Option<usize>,
    pub entered: Option<usize>,
}

// =============================================================================
// HIT GRID
// =============================================================================

const EMPTY: usize = usize::MAX;

/// Cell-to-target lookup for the current frame.
#[derive(Debug, Clone)]
pub struct HitGrid {
    width: u16,
    height: u16,
    cells: Vec<usize>,
}

impl HitGrid {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn clear(&mut self) {
        self.cells.fill(EMPTY);
    }

    /// Claim a rectangle for `target`, clipped to the grid. Later fills win.
    pub fn fill(&mut self, rect: ClipRect, target: usize) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        for y in rect.y..y_end {
            let row = y as usize * self.width as usize;
            for x in rect.x..x_end {
                self.cells[row + x as usize] = target;
            }
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        match self.cells[y as usize * self.width as usize + x as usize] {
            EMPTY => None,
            target => Some(target),
        }
    }
}

thread_local! {
    static HIT_GRID: RefCell<HitGrid> = RefCell::new(HitGrid::new(0, 0));
}

/// Replace the active hit grid (done once per rendered frame).
pub fn install_hit_grid(grid: HitGrid) {
    HIT_GRID.with(|g| *g.borrow_mut() = grid);
}

pub fn hit_test(x: u16, y: u16) -> Option<usize> {
    HIT_GRID.with(|g| g.borrow().get(x, y))
}

// =============================================================================
// REACTIVE STATE
// =============================================================================

thread_local! {
    static MOUSE_X: Signal<u16> = signal(0);
    static MOUSE_Y: Signal<u16> = signal(0);
    static HOVERED_TARGET: Signal<Option<usize>> = signal(None);
    static PRESSED: RefCell<Option<(Option<usize>, MouseButton)>> = const { RefCell::new(None) };
}

pub fn mouse_x() -> u16 {
    MOUSE_X.with(|s| s.get())
}

pub fn mouse_y() -> u16 {
    MOUSE_Y.with(|s| s.get())
}

pub fn hovered_target() -> Option<usize> {
    HOVERED_TARGET.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

pub type ClickHandler = Rc<dyn Fn(&MouseEvent) -> bool>;
pub type HoverHandler = Rc<dyn Fn(HoverChange)>;

#[derive(Default)]
struct HandlerRegistry {
    click_handlers: Vec<(usize, ClickHandler)>,
    hover_handlers: Vec<(usize, HoverHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::default());
}

/// Subscribe to clicks. Return true to consume. Returns cleanup function.
pub fn on_click<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&MouseEvent) -> bool + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.click_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| reg.borrow_mut().click_handlers.retain(|(h, _)| *h != id));
    }
}

/// Subscribe to hover transitions. Returns cleanup function.
pub fn on_hover<F>(handler: F) -> impl FnOnce()
where
    F: Fn(HoverChange) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.hover_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| reg.borrow_mut().hover_handlers.retain(|(h, _)| *h != id));
    }
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Resolve, track hover, detect clicks. Returns true if a click was consumed.
pub fn dispatch(mut event: MouseEvent) -> bool {
    event.target = hit_test(event.x, event.y);
    MOUSE_X.with(|s| s.set(event.x));
    MOUSE_Y.with(|s| s.set(event.y));

    if event.action != MouseAction::Scroll {
        update_hover(event.target);
    }

    match event.action {
        MouseAction::Down => {
            PRESSED.with(|p| *p.borrow_mut() = Some((event.target, event.button)));
            false
        }
        MouseAction::Up => {
            let pressed = PRESSED.with(|p| p.borrow_mut().take());
            match pressed {
                Some((target, button))
                    if target.is_some() && target == event.target && button == event.button =>
                {
                    dispatch_click(&event)
                }
                _ => false,
            }
        }
        _ => false,
    }
}

fn update_hover(target: Option<usize>) {
    let previous = hovered_target();
    if previous == target {
        return;
    }
    HOVERED_TARGET.with(|s| s.set(target));

    let change = HoverChange {
        left: previous,
        entered: target,
    };
    let handlers: Vec<HoverHandler> = REGISTRY.with(|reg| {
        reg.borrow().hover_handlers.iter().map(|(_, h)| h.clone()).collect()
    });
    for handler in handlers {
        handler(change);
    }
}

fn dispatch_click(event: &MouseEvent) -> bool {
    let handlers: Vec<ClickHandler> = REGISTRY.with(|reg| {
        reg.borrow().click_handlers.iter().map(|(_, h)| h.clone()).collect()
    });
    handlers.iter().any(|handler| handler(event))
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Forget the hovered target without firing leave (used on slide change).
pub fn clear_hover() {
    HOVERED_TARGET.with(|s| s.set(None));
    PRESSED.with(|p| *p.borrow_mut() = None);
}

pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.click_handlers.clear();
        reg.hover_handlers.clear();
    });
    MOUSE_X.with(|s| s.set(0));
    MOUSE_Y.with(|s| s.set(0));
    clear_hover();
    HIT_GRID.with(|g| g.borrow_mut().clear());
}

/// Reset mouse state (for testing)
pub fn reset_mouse_state() {
    cleanup();
    REGISTRY.with(|reg| reg.borrow_mut().next_id = 0);
    HIT_GRID.with(|g| *g.borrow_mut() = HitGrid::new(0, 0));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() {
        reset_mouse_state();
    }

    fn grid_with(target: usize, rect: ClipRect) -> HitGrid {
        let mut grid = HitGrid::new(20, 10);
        grid.fill(rect, target);
        grid
    }

    #[test]
    fn test_hit_grid_fill_and_get() {
        let grid = grid_with(7, ClipRect::new(2, 2, 4, 3));
        assert_eq!(grid.get(2, 2), Some(7));
        assert_eq!(grid.get(5, 4), Some(7));
        assert_eq!(grid.get(6, 4), None);
        assert_eq!(grid.get(2, 5), None);
        assert_eq!(grid.get(1, 2), None);
    }

    #[test]
    fn test_hit_grid_clips_and_bounds() {
        let mut grid = HitGrid::new(10, 5);
        grid.fill(ClipRect::new(8, 3, 10, 10), 1);
        assert_eq!(grid.get(9, 4), Some(1));
        assert_eq!(grid.get(10, 4), None);
        assert_eq!(grid.get(100, 100), None);

        grid.clear();
        assert_eq!(grid.get(9, 4), None);
    }

    #[test]
    fn test_later_fill_wins() {
        let mut grid = grid_with(1, ClipRect::new(0, 0, 10, 1));
        grid.fill(ClipRect::new(4, 0, 2, 1), 2);
        assert_eq!(grid.get(3, 0), Some(1));
        assert_eq!(grid.get(4, 0), Some(2));
    }

    #[test]
    fn test_move_tracks_position_and_hover() {
        setup();
        install_hit_grid(grid_with(3, ClipRect::new(5, 5, 2, 1)));

        dispatch(MouseEvent::move_to(5, 5));
        assert_eq!((mouse_x(), mouse_y()), (5, 5));
        assert_eq!(hovered_target(), Some(3));

        dispatch(MouseEvent::move_to(0, 0));
        assert_eq!(hovered_target(), None);
    }

    #[test]
    fn test_hover_handlers_see_leave_and_enter() {
        setup();
        let mut grid = HitGrid::new(20, 10);
        grid.fill(ClipRect::new(0, 0, 2, 1), 1);
        grid.fill(ClipRect::new(5, 0, 2, 1), 2);
        install_hit_grid(grid);

        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let _off = on_hover(move |change| sink.borrow_mut().push(change));

        dispatch(MouseEvent::move_to(0, 0));
        dispatch(MouseEvent::move_to(1, 0));
        dispatch(MouseEvent::move_to(5, 0));
        dispatch(MouseEvent::move_to(10, 5));

        assert_eq!(
            *changes.borrow(),
            vec![
                HoverChange { left: None, entered: Some(1) },
                HoverChange { left: Some(1), entered: Some(2) },
                HoverChange { left: Some(2), entered: None },
            ]
        );
    }

    #[test]
    fn test_click_requires_same_target() {
        setup();
        install_hit_grid(grid_with(9, ClipRect::new(0, 0, 3, 1)));

        let clicks = Rc::new(Cell::new(0));
        let count = clicks.clone();
        let off = on_click(move |event| {
            assert_eq!(event.target, Some(9));
            count.set(count.get() + 1);
            true
        });

        dispatch(MouseEvent::down(MouseButton::Left, 1, 0));
        assert!(dispatch(MouseEvent::up(MouseButton::Left, 2, 0)));
        assert_eq!(clicks.get(), 1);

        dispatch(MouseEvent::down(MouseButton::Left, 1, 0));
        assert!(!dispatch(MouseEvent::up(MouseButton::Left, 10, 5)));
        assert_eq!(clicks.get(), 1);

        dispatch(MouseEvent::down(MouseButton::Left, 10, 5));
        assert!(!dispatch(MouseEvent::up(MouseButton::Left, 10, 5)));
        assert_eq!(clicks.get(), 1);

        off();
        dispatch(MouseEvent::down(MouseButton::Left, 1, 0));
        assert!(!dispatch(MouseEvent::up(MouseButton::Left, 1, 0)));
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_clear_hover_is_silent() {
        setup();
        install_hit_grid(grid_with(1, ClipRect::new(0, 0, 1, 1)));
        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();
        let _off = on_hover(move |_| count.set(count.get() + 1));

        dispatch(MouseEvent::move_to(0, 0));
        clear_hover();
        assert_eq!(hovered_target(), None);
        assert_eq!(fired.get(), 1);
    }
}
