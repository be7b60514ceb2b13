//! Core types shared by the animation engine, the frame composer and the renderer.
//!
//! - [`Rgba`] colors with a terminal-default sentinel
//! - [`Attr`] cell attribute flags
//! - [`Cell`] a single terminal cell
//! - [`ClipRect`] integer cell rectangles (hit regions, clipping)
//! - [`Point`] diagram-space coordinates for reveal animations

// =============================================================================
// Rgba
// =============================================================================

/// RGBA color. Components are `i16` so that `-1` can mean "terminal default".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    /// Create a new RGBA color.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Create an opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Terminal default color (let terminal decide).
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    // Deck palette
    pub const INDIGO: Self = Self::rgb(99, 102, 241);
    pub const INDIGO_DARK: Self = Self::rgb(79, 70, 229);
    pub const INDIGO_PALE: Self = Self::rgb(199, 210, 254);
    pub const GRAY: Self = Self::rgb(156, 163, 175);
    pub const GRAY_DARK: Self = Self::rgb(75, 85, 99);
    pub const TOOLTIP_BG: Self = Self::rgb(17, 24, 39);
    pub const RED: Self = Self::rgb(239, 68, 68);
    pub const EMERALD: Self = Self::rgb(16, 185, 129);
    pub const PURPLE: Self = Self::rgb(168, 85, 247);

    /// Whether this is the terminal default sentinel.
    #[inline]
    pub fn is_terminal_default(&self) -> bool {
        self.r < 0
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::TERMINAL_DEFAULT
    }
}

// =============================================================================
// Cell Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Text attributes as a bitfield for cheap comparison in the diff renderer.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::UNDERLINE`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const INVERSE = 1 << 4;
    }
}

// =============================================================================
// Cell
// =============================================================================

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

/// Foreground, background and attributes applied together when drawing text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Style {
    pub const fn fg(fg: Rgba) -> Self {
        Self {
            fg,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }

    pub const fn with_bg(mut self, bg: Rgba) -> Self {
        self.bg = bg;
        self
    }

    pub const fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }
}

// =============================================================================
// ClipRect
// =============================================================================

/// Integer rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x
            && (x as u32) < self.x as u32 + self.width as u32
            && y >= self.y
            && (y as u32) < self.y as u32 + self.height as u32
    }

    /// Horizontal center column.
    #[inline]
    pub fn center_x(&self) -> u16 {
        self.x + self.width / 2
    }

    #[inline]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

// =============================================================================
// Point
// =============================================================================

/// A point in diagram space (the coordinate system slide diagrams are authored in).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other`; `t` is clamped to `[0, 1]`.
    pub fn lerp(&self, other: Point, t: f32) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
