//! Differential renderer.
//!
//! Compares each frame with the previous one and writes only the cells that
//! changed, inside a synchronized-update block, through crossterm commands
//! queued into a byte buffer and flushed with a single write.
//!
//! Color and attribute state is tracked across cells so runs of identically
//! styled text emit one escape sequence, not one per cell.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    BeginSynchronizedUpdate, Clear, ClearType, EndSynchronizedUpdate, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::queue;

use super::buffer::{FrameBuffer, CONTINUATION};
use crate::types::{Attr, Cell, Rgba};

fn to_color(c: Rgba) -> Color {
    if c.is_terminal_default() {
        Color::Reset
    } else {
        Color::Rgb {
            r: c.r as u8,
            g: c.g as u8,
            b: c.b as u8,
        }
    }
}

/// Cursor and style the terminal is known to be in.
#[derive(Debug, Default)]
struct PenState {
    cursor: Option<(u16, u16)>,
    fg: Option<Rgba>,
    bg: Option<Rgba>,
    attrs: Option<Attr>,
}

impl PenState {
    fn put<W: Write>(&mut self, out: &mut W, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        if self.cursor != Some((x, y)) {
            queue!(out, MoveTo(x, y))?;
        }
        if self.attrs != Some(cell.attrs) {
            queue!(out, SetAttribute(Attribute::Reset))?;
            for (flag, attribute) in [
                (Attr::BOLD, Attribute::Bold),
                (Attr::DIM, Attribute::Dim),
                (Attr::ITALIC, Attribute::Italic),
                (Attr::UNDERLINE, Attribute::Underlined),
                (Attr::INVERSE, Attribute::Reverse),
            ] {
                if cell.attrs.contains(flag) {
                    queue!(out, SetAttribute(attribute))?;
                }
            }
            self.attrs = Some(cell.attrs);
            // Attribute::Reset also resets colors.
            self.fg = None;
            self.bg = None;
        }
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(to_color(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(to_color(cell.bg)))?;
            self.bg = Some(cell.bg);
        }
        queue!(out, Print(cell.ch))?;
        let advance = crate::layout::text_measure::char_width(cell.ch).max(1);
        self.cursor = Some((x.saturating_add(advance), y));
        Ok(())
    }
}

#[derive(Default)]
pub struct DiffRenderer {
    output: Vec<u8>,
    previous: Option<FrameBuffer>,
}

impl DiffRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the changed cells of `buffer` into `out`. Returns true if anything changed.
    pub fn render_to<W: Write>(&mut self, out: &mut W, buffer: &FrameBuffer) -> io::Result<bool> {
        let comparable = self
            .previous
            .as_ref()
            .filter(|prev| prev.width() == buffer.width() && prev.height() == buffer.height());

        let mut pen = PenState::default();
        let mut changed = false;
        queue!(out, BeginSynchronizedUpdate)?;
        for (x, y, cell) in buffer.iter() {
            if cell.ch == CONTINUATION {
                continue;
            }
            if comparable.and_then(|prev| prev.get(x, y)) == Some(cell) {
                continue;
            }
            changed = true;
            pen.put(out, x, y, cell)?;
        }
        queue!(out, SetAttribute(Attribute::Reset), EndSynchronizedUpdate)?;

        self.previous = Some(buffer.clone());
        Ok(changed)
    }

    /// Render to stdout with a single write.
    pub fn render(&mut self, buffer: &FrameBuffer) -> io::Result<bool> {
        let mut output = std::mem::take(&mut self.output);
        output.clear();
        let changed = self.render_to(&mut output, buffer)?;
        let mut stdout = io::stdout().lock();
        stdout.write_all(&output)?;
        stdout.flush()?;
        self.output = output;
        Ok(changed)
    }

    /// Forget the previous frame; the next render redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn enter_fullscreen(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        stdout.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit_fullscreen(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)?;
        stdout.flush()
    }

    /// Inline mode: clear the visible screen and hide the cursor.
    pub fn enter_inline(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, Hide, Clear(ClearType::All), MoveTo(0, 0))?;
        stdout.flush()?;
        self.invalidate();
        Ok(())
    }

    pub fn exit_inline(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        let rows = self.previous.as_ref().map_or(0, FrameBuffer::height);
        queue!(stdout, SetAttribute(Attribute::Reset), MoveTo(0, rows), Show, Print("\r\n"))?;
        stdout.flush()
    }
}
