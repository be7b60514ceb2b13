//! FrameBuffer and drawing primitives.
//!
//! A flat, row-major grid of [`Cell`]s describing what the terminal should show.
//! Every drawing call clips to the buffer, so callers never bounds-check.
//!
//! Wide characters occupy two cells; the second holds [`CONTINUATION`] and is
//! skipped by the renderer.

use crate::layout::text_measure::char_width;
use crate::types::{Attr, Cell, ClipRect, Rgba, Style};

/// Placeholder for the right half of a wide character.
pub const CONTINUATION: char = '\0';

#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Text of row `y` with continuation cells dropped (handy in tests and logs).
    pub fn row_text(&self, y: u16) -> String {
        (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|cell| cell.ch)
            .filter(|&ch| ch != CONTINUATION)
            .collect()
    }

    /// Put one character. Background is kept when `style.bg` is the terminal default.
    pub fn set_char(&mut self, x: u16, y: u16, ch: char, style: Style) {
        if let Some(cell) = self.get_mut(x, y) {
            cell.ch = ch;
            cell.fg = style.fg;
            if !style.bg.is_terminal_default() {
                cell.bg = style.bg;
            }
            cell.attrs = style.attrs;
        }
    }

    /// Paint the background of `rect`, blanking its characters.
    pub fn fill_rect(&mut self, rect: ClipRect, bg: Rgba) {
        let x_end = rect.right().min(self.width);
        let y_end = rect.bottom().min(self.height);
        for y in rect.y..y_end {
            for x in rect.x..x_end {
                let idx = self.index(x, y);
                self.cells[idx] = Cell {
                    bg,
                    ..Cell::default()
                };
            }
        }
    }

    /// Draw `text` starting at (x, y), clipped to `clip` and the buffer.
    /// Returns the number of columns advanced.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, style: Style, clip: ClipRect) -> u16 {
        let limit = clip.right().min(self.width);
        if y < clip.y || y >= clip.bottom() {
            return 0;
        }
        let mut cx = x;
        for ch in text.chars() {
            let w = char_width(ch);
            if w == 0 {
                continue;
            }
            if cx.saturating_add(w) > limit {
                break;
            }
            if cx >= clip.x {
                self.set_char(cx, y, ch, style);
                if w == 2 {
                    self.set_char(cx + 1, y, CONTINUATION, style);
                }
            }
            cx += w;
        }
        cx - x
    }

    /// Rounded single-line border around `rect`.
    pub fn draw_border(&mut self, rect: ClipRect, style: Style) {
        if rect.width < 2 || rect.height < 2 {
            return;
        }
        let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);
        for x in rect.x + 1..right {
            self.set_char(x, rect.y, '─', style);
            self.set_char(x, bottom, '─', style);
        }
        for y in rect.y + 1..bottom {
            self.set_char(rect.x, y, '│', style);
            self.set_char(right, y, '│', style);
        }
        self.set_char(rect.x, rect.y, '╭', style);
        self.set_char(right, rect.y, '╮', style);
        self.set_char(rect.x, bottom, '╰', style);
        self.set_char(right, bottom, '╯', style);
    }

    /// Draw the first `fraction` (0..=1) of the segment from `from` to `to`.
    ///
    /// Points are sampled along the longer axis, one per cell.
    pub fn draw_segment(&mut self, from: (u16, u16), to: (u16, u16), fraction: f32, style: Style) {
        let (x0, y0) = (f32::from(from.0), f32::from(from.1));
        let (x1, y1) = (f32::from(to.0), f32::from(to.1));
        let (dx, dy) = (x1 - x0, y1 - y0);
        let steps = dx.abs().max(dy.abs()).round() as u32;
        let ch = segment_glyph(dx, dy);

        let drawn = (steps as f32 * fraction.clamp(0.0, 1.0)).round() as u32;
        if fraction <= 0.0 {
            return;
        }
        for i in 0..=drawn.min(steps) {
            let t = if steps == 0 { 0.0 } else { i as f32 / steps as f32 };
            let x = (x0 + dx * t).round();
            let y = (y0 + dy * t).round();
            if x >= 0.0 && y >= 0.0 {
                self.set_char(x as u16, y as u16, ch, style);
            }
        }
    }

    /// Iterate cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i % width) as u16, (i / width) as u16, cell))
    }
}

fn segment_glyph(dx: f32, dy: f32) -> char {
    // Cells are roughly twice as tall as wide.
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ay <= ax * 0.5 {
        '─'
    } else if ax <= ay * 0.5 {
        '│'
    } else if (dx > 0.0) == (dy > 0.0) {
        '╲'
    } else {
        '╱'
    }
}

/// Bold text in `fg`.
pub fn strong(fg: Rgba) -> Style {
    Style::fg(fg).with_attrs(Attr::BOLD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_blank() {
        let buf = FrameBuffer::new(4, 2);
        assert_eq!(buf.row_text(0), "    ");
        assert!(buf.get(4, 0).is_none());
        assert_eq!(buf.iter().count(), 8);
    }

    #[test]
    fn test_draw_text_clips() {
        let mut buf = FrameBuffer::new(10, 1);
        let advanced = buf.draw_text(6, 0, "hello", Style::default(), buf.bounds());
        assert_eq!(advanced, 4);
        assert_eq!(buf.row_text(0), "      hell");

        let mut buf = FrameBuffer::new(10, 2);
        let clip = ClipRect::new(0, 0, 3, 1);
        buf.draw_text(0, 0, "abcdef", Style::default(), clip);
        buf.draw_text(0, 1, "abcdef", Style::default(), clip);
        assert_eq!(buf.row_text(0), "abc       ");
        assert_eq!(buf.row_text(1), "          ");
    }

    #[test]
    fn test_wide_chars_take_two_cells() {
        let mut buf = FrameBuffer::new(6, 1);
        let advanced = buf.draw_text(0, 0, "日本x", Style::default(), buf.bounds());
        assert_eq!(advanced, 5);
        assert_eq!(buf.get(1, 0).map(|c| c.ch), Some(CONTINUATION));
        assert_eq!(buf.row_text(0), "日本x ");
    }

    #[test]
    fn test_set_char_keeps_background() {
        let mut buf = FrameBuffer::new(2, 1);
        buf.fill_rect(buf.bounds(), Rgba::TOOLTIP_BG);
        buf.set_char(0, 0, 'x', Style::fg(Rgba::WHITE));
        let cell = buf.get(0, 0).unwrap();
        assert_eq!(cell.bg, Rgba::TOOLTIP_BG);
        assert_eq!(cell.fg, Rgba::WHITE);
    }

    #[test]
    fn test_border() {
        let mut buf = FrameBuffer::new(4, 3);
        buf.draw_border(buf.bounds(), Style::default());
        assert_eq!(buf.row_text(0), "╭──╮");
        assert_eq!(buf.row_text(1), "│  │");
        assert_eq!(buf.row_text(2), "╰──╯");
    }

    #[test]
    fn test_segment_partial_and_full() {
        let mut buf = FrameBuffer::new(11, 1);
        buf.draw_segment((0, 0), (10, 0), 0.5, Style::default());
        assert_eq!(buf.row_text(0), "──────     ");

        buf.draw_segment((0, 0), (10, 0), 1.0, Style::default());
        assert_eq!(buf.row_text(0), "───────────");

        let mut empty = FrameBuffer::new(11, 1);
        empty.draw_segment((0, 0), (10, 0), 0.0, Style::default());
        assert_eq!(empty.row_text(0), "           ");
    }

    #[test]
    fn test_segment_glyphs() {
        assert_eq!(segment_glyph(10.0, 0.0), '─');
        assert_eq!(segment_glyph(0.0, 5.0), '│');
        assert_eq!(segment_glyph(4.0, 2.0), '╲');
        assert_eq!(segment_glyph(4.0, -2.0), '╱');
    }
}
