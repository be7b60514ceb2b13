//! Citation Overlay - hover tooltips for inline citation anchors.
//!
//! Each anchor on the current slide carries only a `hovered` flag. Entering an
//! anchor looks its key up in the registry and produces a [`Tooltip`] (title,
//! authors, "venue year", url) centered above the anchor. Leaving hides it.
//!
//! Unknown keys are labelled `[?]` and never produce a tooltip.

use tracing::trace;

use super::registry::{self, CitationEntry};
use crate::layout::text_measure::{string_width, truncate_text, wrap_text};
use crate::types::ClipRect;

/// Preferred tooltip width in cells (borders included).
pub const TOOLTIP_WIDTH: u16 = 44;

// =============================================================================
// TOOLTIP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Above,
    Below,
}

/// Which role a tooltip line plays, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Title,
    Authors,
    Venue,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipLine {
    pub kind: LineKind,
    pub text: String,
}

/// A positioned tooltip. `rect` includes a one-cell border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    pub key: &'static str,
    pub rect: ClipRect,
    pub placement: Placement,
    pub lines: Vec<TooltipLine>,
}

fn tooltip_lines(entry: &CitationEntry, inner_width: u16) -> Vec<TooltipLine> {
    let mut lines: Vec<TooltipLine> = wrap_text(entry.title, inner_width)
        .into_iter()
        .map(|text| TooltipLine { kind: LineKind::Title, text })
        .collect();
    lines.extend(
        wrap_text(entry.authors, inner_width)
            .into_iter()
            .map(|text| TooltipLine { kind: LineKind::Authors, text }),
    );
    lines.push(TooltipLine {
        kind: LineKind::Venue,
        text: truncate_text(&entry.venue_line(), inner_width),
    });
    lines.push(TooltipLine {
        kind: LineKind::Url,
        text: truncate_text(entry.url, inner_width),
    });
    lines
}

/// Lay out the tooltip for `key` anchored at `anchor` inside `viewport`.
///
/// Centered horizontally on the anchor and clamped to the viewport. Placed
/// above the anchor when it fits there, otherwise below. Returns `None` for
/// unknown keys or a viewport too small to hold a border.
pub fn tooltip_for(key: &'static str, anchor: ClipRect, viewport: ClipRect) -> Option<Tooltip> {
    let entry = registry::lookup(key)?;
    if viewport.width < 3 || viewport.height < 3 {
        return None;
    }

    let width = TOOLTIP_WIDTH.min(viewport.width);
    let lines = tooltip_lines(entry, width - 2);
    let height = (lines.len() as u16 + 2).min(viewport.height);

    let centered = i32::from(anchor.center_x()) - i32::from(width / 2);
    let max_x = i32::from(viewport.right()) - i32::from(width);
    let x = centered.clamp(i32::from(viewport.x), max_x) as u16;

    let (y, placement) = if anchor.y >= viewport.y.saturating_add(height) {
        (anchor.y - height, Placement::Above)
    } else {
        let below = anchor.bottom().min(viewport.bottom().saturating_sub(height));
        (below.max(viewport.y), Placement::Below)
    };

    Some(Tooltip {
        key,
        rect: ClipRect::new(x, y, width, height),
        placement,
        lines,
    })
}

// =============================================================================
// OVERLAY
// =============================================================================

/// An inline citation on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationAnchor {
    pub key: &'static str,
    pub label: String,
    pub rect: ClipRect,
    pub hovered: bool,
}

impl CitationAnchor {
    pub fn new(key: &'static str, x: u16, y: u16) -> Self {
        let label = registry::label(key);
        let rect = ClipRect::new(x, y, string_width(&label), 1);
        Self {
            key,
            label,
            rect,
            hovered: false,
        }
    }

    pub fn is_known(&self) -> bool {
        registry::lookup(self.key).is_some()
    }
}

/// Hover state for the citation anchors of the current frame.
#[derive(Debug, Default)]
pub struct CitationOverlay {
    anchors: Vec<CitationAnchor>,
}

impl CitationOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the anchors, keeping hover on an anchor that stayed in place.
    pub fn set_anchors(&mut self, mut anchors: Vec<CitationAnchor>) {
        let hovered = self.hovered().map(|a| (a.key, a.rect));
        for anchor in &mut anchors {
            anchor.hovered = hovered == Some((anchor.key, anchor.rect));
        }
        self.anchors = anchors;
    }

    pub fn anchors(&self) -> &[CitationAnchor] {
        &self.anchors
    }

    pub fn pointer_enter(&mut self, index: usize) {
        for (i, anchor) in self.anchors.iter_mut().enumerate() {
            anchor.hovered = i == index;
        }
        if let Some(anchor) = self.anchors.get(index) {
            trace!(key = anchor.key, "citation hovered");
        }
    }

    pub fn pointer_leave(&mut self, index: usize) {
        if let Some(anchor) = self.anchors.get_mut(index) {
            anchor.hovered = false;
        }
    }

    /// Hide everything (slide change).
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    pub fn hovered(&self) -> Option<&CitationAnchor> {
        self.anchors.iter().find(|a| a.hovered)
    }

    /// The tooltip for the hovered anchor, if any.
    pub fn tooltip(&self, viewport: ClipRect) -> Option<Tooltip> {
        let anchor = self.hovered()?;
        tooltip_for(anchor.key, anchor.rect, viewport)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: ClipRect = ClipRect::new(0, 0, 100, 30);

    #[test]
    fn test_anchor_labels() {
        assert_eq!(CitationAnchor::new("alce", 0, 0).label, "[4]");
        assert_eq!(CitationAnchor::new("selfRag", 0, 0).rect.width, 3);
        let unknown = CitationAnchor::new("doesNotExist", 0, 0);
        assert_eq!(unknown.label, "[?]");
        assert!(!unknown.is_known());
    }

    #[test]
    fn test_tooltip_content() {
        let tip = tooltip_for("alce", ClipRect::new(50, 20, 3, 1), VIEWPORT).unwrap();
        let kinds: Vec<_> = tip.lines.iter().map(|l| l.kind).collect();
        assert_eq!(kinds.first(), Some(&LineKind::Title));
        assert_eq!(kinds.last(), Some(&LineKind::Url));
        assert!(tip.lines.iter().any(|l| l.text == "EMNLP 2023"));
        assert!(tip.lines.iter().any(|l| l.text == "Gao et al."));
        assert!(tip.lines.iter().all(|l| string_width(&l.text) <= TOOLTIP_WIDTH - 2));
    }

    #[test]
    fn test_tooltip_centered_above() {
        let anchor = ClipRect::new(50, 20, 3, 1);
        let tip = tooltip_for("alce", anchor, VIEWPORT).unwrap();
        assert_eq!(tip.placement, Placement::Above);
        assert_eq!(tip.rect.bottom(), anchor.y);
        assert_eq!(tip.rect.x, anchor.center_x() - TOOLTIP_WIDTH / 2);
    }

    #[test]
    fn test_tooltip_clamped_to_viewport() {
        let left = tooltip_for("alce", ClipRect::new(1, 20, 3, 1), VIEWPORT).unwrap();
        assert_eq!(left.rect.x, 0);

        let right = tooltip_for("alce", ClipRect::new(98, 20, 3, 1), VIEWPORT).unwrap();
        assert_eq!(right.rect.right(), VIEWPORT.right());
    }

    #[test]
    fn test_tooltip_flips_below_near_top() {
        let anchor = ClipRect::new(50, 1, 3, 1);
        let tip = tooltip_for("alce", anchor, VIEWPORT).unwrap();
        assert_eq!(tip.placement, Placement::Below);
        assert_eq!(tip.rect.y, anchor.bottom());
    }

    #[test]
    fn test_narrow_viewport_shrinks_tooltip() {
        let viewport = ClipRect::new(0, 0, 20, 30);
        let tip = tooltip_for("acmSurvey", ClipRect::new(10, 25, 4, 1), viewport).unwrap();
        assert_eq!(tip.rect.width, 20);
        assert_eq!(tip.rect.x, 0);
    }

    #[test]
    fn test_unknown_key_has_no_tooltip() {
        assert!(tooltip_for("doesNotExist", ClipRect::new(5, 5, 3, 1), VIEWPORT).is_none());

        let mut overlay = CitationOverlay::new();
        overlay.set_anchors(vec![CitationAnchor::new("doesNotExist", 5, 5)]);
        overlay.pointer_enter(0);
        assert!(overlay.hovered().is_some());
        assert!(overlay.tooltip(VIEWPORT).is_none());
    }

    #[test]
    fn test_enter_and_leave() {
        let mut overlay = CitationOverlay::new();
        overlay.set_anchors(vec![
            CitationAnchor::new("alce", 10, 20),
            CitationAnchor::new("selfRag", 20, 20),
        ]);
        assert!(overlay.tooltip(VIEWPORT).is_none());

        overlay.pointer_enter(1);
        assert_eq!(overlay.tooltip(VIEWPORT).map(|t| t.key), Some("selfRag"));

        overlay.pointer_enter(0);
        assert_eq!(overlay.hovered().map(|a| a.key), Some("alce"));

        overlay.pointer_leave(0);
        assert!(overlay.tooltip(VIEWPORT).is_none());
    }

    #[test]
    fn test_set_anchors_keeps_stable_hover() {
        let mut overlay = CitationOverlay::new();
        overlay.set_anchors(vec![CitationAnchor::new("alce", 10, 20)]);
        overlay.pointer_enter(0);

        overlay.set_anchors(vec![CitationAnchor::new("alce", 10, 20)]);
        assert!(overlay.hovered().is_some());

        overlay.set_anchors(vec![CitationAnchor::new("alce", 12, 20)]);
        assert!(overlay.hovered().is_none());
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut overlay = CitationOverlay::new();
        overlay.pointer_enter(3);
        overlay.pointer_leave(3);
        assert!(overlay.hovered().is_none());
    }
}
