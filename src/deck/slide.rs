//! Slide descriptors and the scene builder.
//!
//! A slide is described by a plain `fn(&mut SceneBuilder)`. The function only
//! records blocks and animation specs; nothing is started until the resulting
//! [`SlideScript`] is mounted as a [`Scene`](super::scene::Scene).
//!
//! ```ignore
//! fn intro(s: &mut SceneBuilder) {
//!     s.title("Attribution in LLMs");
//!     s.paragraph([Span::Text("Where did this answer come from?"), Span::Cite("alce")]);
//!     s.steps(3, StepTiming::default(), &["Query", "Retrieve", "Cite"]);
//!     s.step_list();
//!     s.at_step(2, |s| s.callout("Result", "Grounded answer."));
//! }
//! ```

use std::time::Duration;

use crate::config::{RevealTiming, StepTiming};

// =============================================================================
// DESCRIPTOR
// =============================================================================

/// Immutable record for one slide: how to build it and what it cites.
#[derive(Debug, Clone, Copy)]
pub struct SlideDescriptor {
    pub title: &'static str,
    pub render: fn(&mut SceneBuilder),
    pub references: &'static [&'static str],
}

impl SlideDescriptor {
    /// Run the render function and collect its script.
    pub fn script(&self) -> SlideScript {
        let mut builder = SceneBuilder::new();
        (self.render)(&mut builder);
        builder.finish()
    }
}

// =============================================================================
// INLINE TEXT
// =============================================================================

/// A run of inline text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Text(&'static str),
    Strong(&'static str),
    Code(&'static str),
    /// Inline citation by registry key.
    Cite(&'static str),
}

/// A sequence of spans forming one paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spans(pub Vec<Span>);

impl Spans {
    /// Citation keys referenced inline, in order.
    pub fn citations(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().filter_map(|span| match span {
            Span::Cite(key) => Some(*key),
            _ => None,
        })
    }
}

impl From<&'static str> for Spans {
    fn from(text: &'static str) -> Self {
        Spans(vec![Span::Text(text)])
    }
}

impl From<Span> for Spans {
    fn from(span: Span) -> Self {
        Spans(vec![span])
    }
}

impl From<Vec<Span>> for Spans {
    fn from(spans: Vec<Span>) -> Self {
        Spans(spans)
    }
}

impl<const N: usize> From<[Span; N]> for Spans {
    fn from(spans: [Span; N]) -> Self {
        Spans(spans.to_vec())
    }
}

// =============================================================================
// ANIMATION SPECS
// =============================================================================

/// Step sequence attached to a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepsSpec {
    pub count: usize,
    pub timing: StepTiming,
    pub labels: &'static [&'static str],
}

/// A line in a diagram, in cells relative to the diagram origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpec {
    pub from: (u16, u16),
    pub to: (u16, u16),
    /// Step from which the line is highlighted.
    pub active_from: usize,
    pub delay: Duration,
}

/// A labelled node in a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeSpec {
    pub at: (u16, u16),
    pub label: &'static str,
    pub active_from: usize,
    pub delay: Duration,
}

/// Lines and nodes that reveal themselves after mount.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiagramSpec {
    pub width: u16,
    pub height: u16,
    pub lines: Vec<LineSpec>,
    pub nodes: Vec<NodeSpec>,
}

impl DiagramSpec {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn line(mut self, from: (u16, u16), to: (u16, u16), active_from: usize, delay_ms: u64) -> Self {
        self.lines.push(LineSpec {
            from,
            to,
            active_from,
            delay: Duration::from_millis(delay_ms),
        });
        self
    }

    pub fn node(mut self, at: (u16, u16), label: &'static str, active_from: usize, delay_ms: u64) -> Self {
        self.nodes.push(NodeSpec {
            at,
            label,
            active_from,
            delay: Duration::from_millis(delay_ms),
        });
        self
    }
}

/// A count-up gauge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeterSpec {
    pub label: &'static str,
    pub timing: RevealTiming,
    /// Printed after the value, e.g. `"%"`.
    pub suffix: &'static str,
}

// =============================================================================
// BLOCKS
// =============================================================================

/// One vertical block of slide content.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Title(&'static str),
    Heading(&'static str),
    Subheading(&'static str),
    Paragraph(Spans),
    Bullet(Spans),
    Callout { label: &'static str, body: Spans },
    Tags(&'static [&'static str]),
    /// Horizontal bar, `value` in 0..=1.
    Bar { label: &'static str, value: f32, caption: &'static str },
    /// Index into the script's diagrams.
    Diagram(usize),
    /// Index into the script's meters.
    Meter(usize),
    /// The step labels with the current one highlighted.
    StepList,
    /// One text per step; the current step's text is shown.
    StepDetail(&'static [&'static str]),
    /// Play/pause, reset and per-step buttons.
    Controls,
    Spacer,
}

/// A block that only shows from a given step on.
#[derive(Debug, Clone, PartialEq)]
pub struct Gated {
    pub block: Block,
    pub from_step: usize,
}

impl Gated {
    pub fn is_visible(&self, step: usize) -> bool {
        step >= self.from_step
    }
}

/// Everything a slide's render function recorded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SlideScript {
    pub blocks: Vec<Gated>,
    pub steps: Option<StepsSpec>,
    pub diagrams: Vec<DiagramSpec>,
    pub meters: Vec<MeterSpec>,
}

impl SlideScript {
    /// Inline citation keys across all blocks.
    pub fn inline_citations(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        for gated in &self.blocks {
            match &gated.block {
                Block::Paragraph(spans) | Block::Bullet(spans) | Block::Callout { body: spans, .. } => {
                    keys.extend(spans.citations());
                }
                _ => {}
            }
        }
        keys
    }
}

// =============================================================================
// BUILDER
// =============================================================================

#[derive(Debug, Default)]
pub struct SceneBuilder {
    script: SlideScript,
    gate: usize,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> SlideScript {
        self.script
    }

    fn push(&mut self, block: Block) -> &mut Self {
        self.script.blocks.push(Gated {
            block,
            from_step: self.gate,
        });
        self
    }

    /// Blocks added inside `f` only show from `step` on.
    pub fn at_step(&mut self, step: usize, f: impl FnOnce(&mut Self)) -> &mut Self {
        let saved = self.gate;
        self.gate = step.max(saved);
        f(self);
        self.gate = saved;
        self
    }

    pub fn title(&mut self, text: &'static str) -> &mut Self {
        self.push(Block::Title(text))
    }

    pub fn heading(&mut self, text: &'static str) -> &mut Self {
        self.push(Block::Heading(text))
    }

    pub fn subheading(&mut self, text: &'static str) -> &mut Self {
        self.push(Block::Subheading(text))
    }

    pub fn paragraph(&mut self, spans: impl Into<Spans>) -> &mut Self {
        self.push(Block::Paragraph(spans.into()))
    }

    pub fn bullet(&mut self, spans: impl Into<Spans>) -> &mut Self {
        self.push(Block::Bullet(spans.into()))
    }

    pub fn callout(&mut self, label: &'static str, body: impl Into<Spans>) -> &mut Self {
        self.push(Block::Callout {
            label,
            body: body.into(),
        })
    }

    pub fn tags(&mut self, tags: &'static [&'static str]) -> &mut Self {
        self.push(Block::Tags(tags))
    }

    pub fn bar(&mut self, label: &'static str, value: f32, caption: &'static str) -> &mut Self {
        self.push(Block::Bar {
            label,
            value: value.clamp(0.0, 1.0),
            caption,
        })
    }

    pub fn diagram(&mut self, spec: DiagramSpec) -> &mut Self {
        let index = self.script.diagrams.len();
        self.script.diagrams.push(spec);
        self.push(Block::Diagram(index))
    }

    pub fn meter(&mut self, label: &'static str, timing: RevealTiming, suffix: &'static str) -> &mut Self {
        let index = self.script.meters.len();
        self.script.meters.push(MeterSpec { label, timing, suffix });
        self.push(Block::Meter(index))
    }

    /// Attach a step sequence. A second call replaces the first.
    pub fn steps(&mut self, count: usize, timing: StepTiming, labels: &'static [&'static str]) -> &mut Self {
        self.script.steps = Some(StepsSpec { count, timing, labels });
        self
    }

    pub fn step_list(&mut self) -> &mut Self {
        self.push(Block::StepList)
    }

    pub fn step_detail(&mut self, details: &'static [&'static str]) -> &mut Self {
        self.push(Block::StepDetail(details))
    }

    pub fn controls(&mut self) -> &mut Self {
        self.push(Block::Controls)
    }

    pub fn spacer(&mut self) -> &mut Self {
        self.push(Block::Spacer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(s: &mut SceneBuilder) {
        s.title("Sample");
        s.paragraph([Span::Text("Grounded"), Span::Cite("alce")]);
        s.steps(3, StepTiming::default(), &["a", "b", "c"]);
        s.at_step(1, |s| {
            s.bullet("second");
            s.at_step(2, |s| {
                s.bullet("third");
            });
            s.bullet("still second");
        });
        s.spacer();
    }

    const SAMPLE: SlideDescriptor = SlideDescriptor {
        title: "Sample",
        render: sample,
        references: &["alce"],
    };

    #[test]
    fn test_script_records_blocks_in_order() {
        let script = SAMPLE.script();
        assert_eq!(script.blocks.len(), 6);
        assert_eq!(script.blocks[0].block, Block::Title("Sample"));
        assert_eq!(script.blocks[5].block, Block::Spacer);
    }

    #[test]
    fn test_at_step_gates_nested_blocks() {
        let gates: Vec<usize> = SAMPLE.script().blocks.iter().map(|g| g.from_step).collect();
        assert_eq!(gates, vec![0, 0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_inner_gate_never_lowers_outer() {
        let mut b = SceneBuilder::new();
        b.at_step(3, |s| {
            s.at_step(1, |s| {
                s.spacer();
            });
        });
        assert_eq!(b.finish().blocks[0].from_step, 3);
    }

    #[test]
    fn test_gated_visibility() {
        let gated = Gated {
            block: Block::Spacer,
            from_step: 2,
        };
        assert!(!gated.is_visible(1));
        assert!(gated.is_visible(2));
        assert!(gated.is_visible(5));
    }

    #[test]
    fn test_steps_spec_recorded() {
        let steps = SAMPLE.script().steps.unwrap();
        assert_eq!(steps.count, 3);
        assert_eq!(steps.labels, &["a", "b", "c"]);
    }

    #[test]
    fn test_diagram_and_meter_indices() {
        let mut b = SceneBuilder::new();
        b.diagram(DiagramSpec::new(10, 4).line((0, 0), (9, 3), 0, 0));
        b.meter("m", RevealTiming::default(), "%");
        b.diagram(DiagramSpec::new(4, 4).node((1, 1), "n", 1, 200));
        let script = b.finish();
        assert_eq!(script.blocks[0].block, Block::Diagram(0));
        assert_eq!(script.blocks[1].block, Block::Meter(0));
        assert_eq!(script.blocks[2].block, Block::Diagram(1));
        assert_eq!(script.diagrams[1].nodes[0].delay, Duration::from_millis(200));
    }

    #[test]
    fn test_inline_citations() {
        assert_eq!(SAMPLE.script().inline_citations(), vec!["alce"]);
    }

    #[test]
    fn test_bar_value_clamped() {
        let mut b = SceneBuilder::new();
        b.bar("x", 1.7, "");
        match &b.finish().blocks[0].block {
            Block::Bar { value, .. } => assert_eq!(*value, 1.0),
            other => panic!("unexpected block {other:?}"),
        }
    }
}
