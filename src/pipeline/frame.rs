//! Frame composition.
//!
//! Turns the player's current state into a [`FrameBuffer`] plus the hit grid
//! that maps cells back to [`HitTarget`]s. Composition only reads animator
//! state; the one write is handing the new citation anchors and targets back
//! to the player so pointer events resolve against what is on screen.
//!
//! ```text
//! ┌───────────────────────────── viewport ─────────────────────────────┐
//! │   title / blocks flowing top-down inside the content column        │
//! │   ...                                                              │
//! │   References: [4] [12]                                             │
//! │              ◀   ● ━━━ ○ ○ ○   ▶   2 / 16                          │
//! │        ←/→ navigate · Space next · Home/End · Ctrl+C quit          │
//! └────────────────────────────────────────────────────────────────────┘
//! ```

use crate::animate::StepMode;
use crate::citations::overlay::{LineKind, Tooltip};
use crate::citations::{registry, CitationAnchor};
use crate::deck::slide::{Block, Span, Spans};
use crate::deck::{DeckPlayer, HitTarget, Scene};
use crate::error::Result;
use crate::layout::nav::{page_layout, NavLayout};
use crate::layout::text_measure::{string_width, truncate_text, wrap_text};
use crate::renderer::buffer::strong;
use crate::renderer::FrameBuffer;
use crate::state::mouse::HitGrid;
use crate::state::navigation::SlideSequencer;
use crate::types::{Attr, ClipRect, Rgba, Style};

const HINT: &str = "←/→ navigate · Space next · Home/End · Ctrl+C quit";
const BAR_LABEL_WIDTH: u16 = 16;
const MAX_BAR_WIDTH: u16 = 32;

/// Composition switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameOptions {
    pub show_hint: bool,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self { show_hint: true }
    }
}

/// A composed frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub buffer: FrameBuffer,
    pub hits: HitGrid,
    /// Indexed by hit-grid value.
    pub targets: Vec<HitTarget>,
}

// =============================================================================
// INLINE FLOW
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    None,
    Cite(&'static str),
    Target(HitTarget),
}

#[derive(Debug, Clone)]
struct Token {
    text: String,
    style: Style,
    action: Action,
}

impl Token {
    fn plain(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
            action: Action::None,
        }
    }

    fn target(text: impl Into<String>, style: Style, target: HitTarget) -> Self {
        Self {
            text: text.into(),
            style,
            action: Action::Target(target),
        }
    }
}

/// A token placed at (`col`, `line`) relative to the flow origin.
struct Placed {
    col: u16,
    line: u16,
    token: Token,
}

fn tokenize(spans: &Spans, base: Style) -> Vec<Token> {
    let mut tokens = Vec::new();
    for span in &spans.0 {
        let (text, style) = match *span {
            Span::Text(text) => (text, base),
            Span::Strong(text) => (text, base.with_attrs(Attr::BOLD)),
            Span::Code(text) => (text, Style::fg(Rgba::PURPLE)),
            Span::Cite(key) => {
                tokens.push(Token {
                    text: registry::label(key),
                    style: Style::fg(Rgba::INDIGO),
                    action: Action::Cite(key),
                });
                continue;
            }
        };
        tokens.extend(text.split_whitespace().map(|word| Token::plain(word, style)));
    }
    tokens
}

/// Greedy word wrap of tokens into `width` columns. Tokens wider than a
/// line are truncated.
fn flow(tokens: Vec<Token>, width: u16) -> (Vec<Placed>, u16) {
    if width == 0 {
        return (Vec::new(), 0);
    }
    let mut placed = Vec::with_capacity(tokens.len());
    let (mut col, mut line, mut started) = (0u16, 0u16, false);
    for mut token in tokens {
        if string_width(&token.text) > width {
            token.text = truncate_text(&token.text, width);
        }
        let w = string_width(&token.text);
        if started && col + 1 + w > width {
            line += 1;
            col = 0;
            started = false;
        }
        if started {
            col += 1;
        }
        placed.push(Placed { col, line, token });
        col += w;
        started = true;
    }
    let lines = if started { line + 1 } else { 0 };
    (placed, lines)
}

// =============================================================================
// PAINTER
// =============================================================================

struct Painter<'a> {
    buf: &'a mut FrameBuffer,
    hits: &'a mut HitGrid,
    targets: Vec<HitTarget>,
    anchors: Vec<CitationAnchor>,
    area: ClipRect,
    y: u16,
}

impl Painter<'_> {
    fn target(&mut self, rect: ClipRect, target: HitTarget) {
        let index = self.targets.len();
        self.targets.push(target);
        self.hits.fill(rect, index);
    }

    fn full(&self) -> bool {
        self.y >= self.area.bottom()
    }

    fn draw_placed(&mut self, placed: Vec<Placed>, x: u16, y: u16) {
        for Placed { col, line, token } in placed {
            let (px, py) = (x + col, y + line);
            if py >= self.area.bottom() {
                break;
            }
            let w = self.buf.draw_text(px, py, &token.text, token.style, self.area);
            match token.action {
                Action::None => {}
                Action::Cite(key) => {
                    let anchor = CitationAnchor::new(key, px, py);
                    let index = self.anchors.len();
                    self.target(anchor.rect, HitTarget::Citation(index));
                    self.anchors.push(anchor);
                }
                Action::Target(target) => self.target(ClipRect::new(px, py, w, 1), target),
            }
        }
    }

    /// Flow tokens at the cursor, indented by `indent`.
    fn tokens(&mut self, tokens: Vec<Token>, indent: u16) {
        let width = self.area.width.saturating_sub(indent);
        let (placed, lines) = flow(tokens, width);
        self.draw_placed(placed, self.area.x + indent, self.y);
        self.y = self.y.saturating_add(lines);
    }

    fn wrapped(&mut self, text: &str, style: Style, centered: bool) {
        for line in wrap_text(text, self.area.width) {
            let x = if centered {
                self.area.x + self.area.width.saturating_sub(string_width(&line)) / 2
            } else {
                self.area.x
            };
            self.buf.draw_text(x, self.y, &line, style, self.area);
            self.y = self.y.saturating_add(1);
        }
    }

    fn gauge(&mut self, x: u16, width: u16, fraction: f32) -> u16 {
        let filled = (f32::from(width) * fraction.clamp(0.0, 1.0)).round() as u16;
        for i in 0..width {
            let (ch, style) = if i < filled {
                ('█', Style::fg(Rgba::EMERALD))
            } else {
                ('░', Style::fg(Rgba::GRAY_DARK))
            };
            if self.area.contains(x + i, self.y) {
                self.buf.set_char(x + i, self.y, ch, style);
            }
        }
        width
    }

    fn block(&mut self, block: &Block, scene: &Scene) {
        let step = scene.current_step();
        match block {
            Block::Title(text) => {
                self.wrapped(text, strong(Rgba::INDIGO), true);
                self.y = self.y.saturating_add(1);
            }
            Block::Heading(text) => {
                if self.y > self.area.y {
                    self.y = self.y.saturating_add(1);
                }
                self.wrapped(text, strong(Rgba::INDIGO_PALE), false);
            }
            Block::Subheading(text) => {
                self.wrapped(text, Style::fg(Rgba::GRAY).with_attrs(Attr::ITALIC), false);
            }
            Block::Paragraph(spans) => self.tokens(tokenize(spans, Style::default()), 0),
            Block::Bullet(spans) => {
                self.buf.draw_text(self.area.x, self.y, "•", Style::fg(Rgba::INDIGO), self.area);
                self.tokens(tokenize(spans, Style::default()), 2);
            }
            Block::Callout { label, body } => self.callout(label, body),
            Block::Tags(tags) => {
                let tokens = tags
                    .iter()
                    .map(|tag| Token::plain(format!("[{tag}]"), Style::fg(Rgba::PURPLE)))
                    .collect();
                self.tokens(tokens, 0);
            }
            Block::Bar { label, value, caption } => {
                let x = self.area.x;
                let label_text = truncate_text(label, BAR_LABEL_WIDTH - 1);
                self.buf.draw_text(x, self.y, &label_text, Style::fg(Rgba::GRAY), self.area);
                let room = self
                    .area
                    .width
                    .saturating_sub(BAR_LABEL_WIDTH + string_width(caption) + 1);
                let bar_x = x + BAR_LABEL_WIDTH;
                let width = self.gauge(bar_x, room.min(MAX_BAR_WIDTH), *value);
                self.buf
                    .draw_text(bar_x + width + 1, self.y, caption, strong(Rgba::EMERALD), self.area);
                self.y = self.y.saturating_add(1);
            }
            Block::Diagram(index) => self.diagram(*index, scene),
            Block::Meter(index) => {
                let (Some(spec), Some(meter)) = (scene.script().meters.get(*index), scene.meter(*index)) else {
                    return;
                };
                let x = self.area.x;
                let value = format!("{}{}", meter.value(), spec.suffix);
                let w = self.buf.draw_text(x, self.y, &value, strong(Rgba::EMERALD), self.area);
                let bar_x = x + w.max(4) + 1;
                let room = self
                    .area
                    .width
                    .saturating_sub(bar_x - x + string_width(spec.label) + 1);
                let width = self.gauge(bar_x, room.min(MAX_BAR_WIDTH), meter.fraction());
                self.buf
                    .draw_text(bar_x + width + 1, self.y, spec.label, Style::fg(Rgba::GRAY), self.area);
                self.y = self.y.saturating_add(1);
            }
            Block::StepList => {
                let mut tokens = Vec::new();
                for (i, label) in scene.step_labels().iter().enumerate() {
                    if i > 0 {
                        tokens.push(Token::plain("→", Style::fg(Rgba::GRAY_DARK)));
                    }
                    let style = if i == step {
                        strong(Rgba::EMERALD).with_attrs(Attr::BOLD | Attr::UNDERLINE)
                    } else if i < step {
                        Style::fg(Rgba::INDIGO)
                    } else {
                        Style::fg(Rgba::GRAY)
                    };
                    tokens.push(Token::target(*label, style, HitTarget::StepJump(i)));
                }
                self.tokens(tokens, 0);
            }
            Block::StepDetail(details) => {
                if let Some(detail) = details.get(step) {
                    self.buf.draw_text(self.area.x, self.y, "▸", Style::fg(Rgba::EMERALD), self.area);
                    self.tokens(tokenize(&Spans::from(*detail), Style::default()), 2);
                }
            }
            Block::Controls => self.controls(scene),
            Block::Spacer => self.y = self.y.saturating_add(1),
        }
    }

    fn callout(&mut self, label: &str, body: &Spans) {
        let width = self.area.width;
        if width < 6 {
            return;
        }
        let (placed, lines) = flow(tokenize(body, Style::default()), width - 4);
        let rect = ClipRect::new(self.area.x, self.y, width, lines + 2);
        self.buf.draw_border(rect, Style::fg(Rgba::GRAY_DARK));
        let title = truncate_text(&format!(" {label} "), width - 4);
        self.buf.draw_text(rect.x + 2, rect.y, &title, strong(Rgba::PURPLE), self.area);
        self.draw_placed(placed, rect.x + 2, rect.y + 1);
        self.y = self.y.saturating_add(lines + 2);
    }

    fn diagram(&mut self, index: usize, scene: &Scene) {
        let (Some(spec), Some(state)) = (scene.script().diagrams.get(index), scene.diagram(index)) else {
            return;
        };
        let step = scene.current_step();
        let ox = self.area.x + self.area.width.saturating_sub(spec.width) / 2;
        let oy = self.y;

        for (line, reveal) in spec.lines.iter().zip(&state.lines) {
            let style = if step >= line.active_from {
                Style::fg(Rgba::INDIGO)
            } else {
                Style::fg(Rgba::GRAY_DARK)
            };
            let fraction = f32::from(reveal.progress()) / 100.0;
            self.buf.draw_segment(
                (ox + line.from.0, oy + line.from.1),
                (ox + line.to.0, oy + line.to.1),
                fraction,
                style,
            );
        }
        for (node, reveal) in spec.nodes.iter().zip(&state.nodes) {
            if !reveal.is_visible() {
                continue;
            }
            let style = if step >= node.active_from {
                strong(Rgba::EMERALD)
            } else {
                Style::fg(Rgba::GRAY)
            };
            let (x, y) = (ox + node.at.0, oy + node.at.1);
            self.buf.draw_text(x, y, "●", style, self.area);
            self.buf.draw_text(x + 2, y, node.label, style, self.area);
        }
        self.y = self.y.saturating_add(spec.height + 1);
    }

    fn controls(&mut self, scene: &Scene) {
        let Some(stepper) = scene.stepper() else {
            return;
        };
        let button = Style::fg(Rgba::INDIGO).with_attrs(Attr::BOLD);
        let toggle = match stepper.mode() {
            StepMode::Playing => "[❚❚ Pause]",
            StepMode::Complete => "[↺ Replay]",
            StepMode::Idle | StepMode::Paused => "[▶ Play]",
        };
        let position = format!("step {} / {}", stepper.current_step() + 1, stepper.step_count());
        let tokens = vec![
            Token::target(toggle, button, HitTarget::StepToggle),
            Token::target("[↺ Reset]", button, HitTarget::StepReset),
            Token::plain(position, Style::fg(Rgba::GRAY)),
        ];
        self.tokens(tokens, 0);
    }

    fn references(&mut self, keys: &[&'static str]) {
        if keys.is_empty() {
            return;
        }
        let mut tokens = vec![Token::plain("References:", Style::fg(Rgba::GRAY))];
        tokens.extend(keys.iter().map(|&key| Token {
            text: registry::label(key),
            style: Style::fg(Rgba::INDIGO),
            action: Action::Cite(key),
        }));
        let (placed, lines) = flow(tokens, self.area.width);
        let y = self.area.bottom().saturating_sub(lines).max(self.y);
        self.draw_placed(placed, self.area.x, y);
    }
}

// =============================================================================
// NAV BAR + TOOLTIP
// =============================================================================

fn draw_nav(painter: &mut Painter<'_>, layout: &NavLayout, nav: &SlideSequencer) {
    let clip = painter.buf.bounds();
    let current = nav.current_index();
    let enabled = strong(Rgba::INDIGO);
    let disabled = Style::fg(Rgba::GRAY_DARK).with_attrs(Attr::DIM);

    let prev_style = if nav.is_first() { disabled } else { enabled };
    painter.buf.draw_text(layout.prev.x, layout.prev.y, "◀", prev_style, clip);
    painter.target(layout.prev, HitTarget::Prev);

    for (i, rect) in layout.dots.iter().enumerate() {
        let (glyph, style) = if i == current {
            ("━━━", enabled)
        } else if i < current {
            ("●", Style::fg(Rgba::INDIGO_PALE))
        } else {
            ("○", Style::fg(Rgba::GRAY))
        };
        painter.buf.draw_text(rect.x, rect.y, glyph, style, clip);
        painter.target(*rect, HitTarget::GoTo(i));
    }

    let next_style = if nav.is_last() { disabled } else { enabled };
    painter.buf.draw_text(layout.next.x, layout.next.y, "▶", next_style, clip);
    painter.target(layout.next, HitTarget::Next);

    painter
        .buf
        .draw_text(layout.label.x, layout.label.y, &nav.position_label(), Style::fg(Rgba::GRAY), clip);
}

fn draw_tooltip(buf: &mut FrameBuffer, tooltip: &Tooltip) {
    let rect = tooltip.rect;
    buf.fill_rect(rect, Rgba::TOOLTIP_BG);
    buf.draw_border(rect, Style::fg(Rgba::GRAY_DARK).with_bg(Rgba::TOOLTIP_BG));
    let inner = ClipRect::new(
        rect.x + 1,
        rect.y + 1,
        rect.width.saturating_sub(2),
        rect.height.saturating_sub(2),
    );
    for (i, line) in tooltip.lines.iter().enumerate() {
        let style = match line.kind {
            LineKind::Title => strong(Rgba::WHITE),
            LineKind::Authors => Style::fg(Rgba::GRAY),
            LineKind::Venue => Style::fg(Rgba::INDIGO_PALE),
            LineKind::Url => Style::fg(Rgba::INDIGO).with_attrs(Attr::UNDERLINE),
        };
        buf.draw_text(inner.x, inner.y + i as u16, &line.text, style, inner);
    }
}

// =============================================================================
// COMPOSE
// =============================================================================

/// Draw the player's current slide into a fresh frame.
pub fn compose(player: &mut DeckPlayer, viewport: ClipRect, options: FrameOptions) -> Result<Frame> {
    let mut buffer = FrameBuffer::new(viewport.width, viewport.height);
    let mut hits = HitGrid::new(viewport.width, viewport.height);
    if viewport.is_empty() {
        player.set_targets(Vec::new());
        return Ok(Frame {
            buffer,
            hits,
            targets: Vec::new(),
        });
    }

    let nav = player.nav().clone();
    let page = page_layout(viewport, nav.total(), nav.current_index(), &nav.position_label())?;
    let slide = *player.current_slide();

    let (targets, anchors) = {
        let scene = player.scene();
        let step = scene.current_step();
        let mut painter = Painter {
            buf: &mut buffer,
            hits: &mut hits,
            targets: Vec::new(),
            anchors: Vec::new(),
            area: page.content,
            y: page.content.y,
        };
        for gated in &scene.script().blocks {
            if painter.full() {
                break;
            }
            if gated.is_visible(step) {
                painter.block(&gated.block, scene);
            }
        }
        painter.references(slide.references);
        draw_nav(&mut painter, &page.nav, &nav);
        (painter.targets, painter.anchors)
    };

    if options.show_hint && viewport.height > 2 {
        let y = viewport.bottom() - 1;
        let hint = truncate_text(HINT, viewport.width);
        let x = viewport.x + viewport.width.saturating_sub(string_width(&hint)) / 2;
        buffer.draw_text(x, y, &hint, Style::fg(Rgba::GRAY).with_attrs(Attr::DIM), viewport);
    }

    let overlay = player.overlay_mut();
    overlay.set_anchors(anchors);
    if let Some(anchor) = overlay.hovered() {
        let style = Style::fg(Rgba::INDIGO).with_attrs(Attr::INVERSE);
        buffer.draw_text(anchor.rect.x, anchor.rect.y, &anchor.label, style, viewport);
    }
    if let Some(tooltip) = overlay.tooltip(viewport) {
        draw_tooltip(&mut buffer, &tooltip);
    }

    player.set_targets(targets.clone());
    Ok(Frame {
        buffer,
        hits,
        targets,
    })
}
