//! Page and navigation-bar layout, computed with Taffy.
//!
//! ```text
//! ┌──────────────────────────────── viewport ────────────────────────────────┐
//! │            ┌──────────── content (max 96 wide, centered) ───────────┐     │
//! │            │                                                        │     │
//! │            └────────────────────────────────────────────────────────┘     │
//! │                    ◀   ● ━━━ ● ● ● ● ● ● ● ● ● ● ● ● ● ●   ▶   2 / 16        │
//! └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The bar sits one row above the bottom edge. The current slide's marker is
//! three cells wide; every other marker is one.

use taffy::prelude::*;

use crate::error::Result;
use crate::types::ClipRect;

/// Widest the content column gets.
pub const MAX_CONTENT_WIDTH: u16 = 96;

const BAR_GAP: f32 = 1.0;
const GROUP_GAP: f32 = 3.0;
const CURRENT_DOT_WIDTH: f32 = 3.0;

/// Rectangles of the navigation bar, in viewport coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLayout {
    pub bar: ClipRect,
    pub prev: ClipRect,
    pub dots: Vec<ClipRect>,
    pub next: ClipRect,
    pub label: ClipRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLayout {
    pub content: ClipRect,
    pub nav: NavLayout,
}

fn fixed(width: f32) -> Style {
    Style {
        size: Size {
            width: length(width),
            height: length(1.0),
        },
        flex_shrink: 0.0,
        ..Default::default()
    }
}

fn row(gap: f32) -> Style {
    Style {
        display: Display::Flex,
        flex_direction: FlexDirection::Row,
        align_items: Some(AlignItems::Center),
        gap: Size {
            width: length(gap),
            height: zero(),
        },
        ..Default::default()
    }
}

fn rect_of(tree: &TaffyTree<()>, node: NodeId, dx: f32, dy: f32) -> Result<ClipRect> {
    let layout = tree.layout(node)?;
    Ok(ClipRect::new(
        (layout.location.x + dx).round() as u16,
        (layout.location.y + dy).round() as u16,
        layout.size.width.round() as u16,
        layout.size.height.round() as u16,
    ))
}

/// Lay out the page for a deck of `total` slides showing `current`.
pub fn page_layout(viewport: ClipRect, total: usize, current: usize, label: &str) -> Result<PageLayout> {
    let mut tree: TaffyTree<()> = TaffyTree::new();

    // Bar: [◀] [dots] [▶] [label]
    let prev = tree.new_leaf(fixed(1.0))?;
    let dots: Vec<NodeId> = (0..total)
        .map(|i| {
            let width = if i == current { CURRENT_DOT_WIDTH } else { 1.0 };
            tree.new_leaf(fixed(width))
        })
        .collect::<std::result::Result<_, _>>()?;
    let dot_row = tree.new_with_children(row(BAR_GAP), &dots)?;
    let next = tree.new_leaf(fixed(1.0))?;
    let label_node = tree.new_leaf(fixed(crate::layout::text_measure::string_width(label) as f32))?;
    let bar = tree.new_with_children(
        Style {
            padding: Rect {
                left: length(2.0),
                right: length(2.0),
                top: zero(),
                bottom: zero(),
            },
            ..row(GROUP_GAP)
        },
        &[prev, dot_row, next, label_node],
    )?;

    // Page: content column above, bar at the bottom, both centered.
    let content = tree.new_leaf(Style {
        flex_grow: 1.0,
        size: Size {
            width: percent(1.0),
            height: auto(),
        },
        max_size: Size {
            width: length(MAX_CONTENT_WIDTH as f32),
            height: auto(),
        },
        ..Default::default()
    })?;
    let root = tree.new_with_children(
        Style {
            display: Display::Flex,
            flex_direction: FlexDirection::Column,
            align_items: Some(AlignItems::Center),
            size: Size {
                width: length(viewport.width as f32),
                height: length(viewport.height as f32),
            },
            padding: Rect {
                left: length(2.0),
                right: length(2.0),
                top: length(1.0),
                bottom: length(1.0),
            },
            gap: Size {
                width: zero(),
                height: length(1.0),
            },
            ..Default::default()
        },
        &[content, bar],
    )?;

    tree.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(viewport.width as f32),
            height: AvailableSpace::Definite(viewport.height as f32),
        },
    )?;

    let (ox, oy) = (viewport.x as f32, viewport.y as f32);
    let bar_rect = rect_of(&tree, bar, ox, oy)?;
    let (bx, by) = (bar_rect.x as f32, bar_rect.y as f32);
    let dot_row_rect = rect_of(&tree, dot_row, bx, by)?;
    let (rx, ry) = (dot_row_rect.x as f32, dot_row_rect.y as f32);

    Ok(PageLayout {
        content: rect_of(&tree, content, ox, oy)?,
        nav: NavLayout {
            prev: rect_of(&tree, prev, bx, by)?,
            dots: dots
                .iter()
                .map(|&dot| rect_of(&tree, dot, rx, ry))
                .collect::<Result<_>>()?,
            next: rect_of(&tree, next, bx, by)?,
            label: rect_of(&tree, label_node, bx, by)?,
            bar: bar_rect,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(width: u16, height: u16, total: usize, current: usize) -> PageLayout {
        let label = format!("{} / {}", current + 1, total);
        page_layout(ClipRect::new(0, 0, width, height), total, current, &label).unwrap()
    }

    #[test]
    fn test_bar_at_bottom_and_centered() {
        let page = layout(120, 40, 16, 0);
        let bar = page.nav.bar;
        assert_eq!(bar.bottom(), 39);
        let left_margin = bar.x;
        let right_margin = 120 - bar.right();
        assert!(left_margin.abs_diff(right_margin) <= 1);
    }

    #[test]
    fn test_controls_in_order() {
        let page = layout(120, 40, 16, 3);
        let nav = &page.nav;
        assert_eq!(nav.dots.len(), 16);
        assert!(nav.prev.right() <= nav.dots[0].x);
        assert!(nav.dots[15].right() <= nav.next.x);
        assert!(nav.next.right() <= nav.label.x);
        assert_eq!(nav.label.width, 6);
        for pair in nav.dots.windows(2) {
            assert!(pair[0].right() < pair[1].x);
        }
    }

    #[test]
    fn test_current_dot_is_wider() {
        let page = layout(120, 40, 5, 2);
        let widths: Vec<u16> = page.nav.dots.iter().map(|d| d.width).collect();
        assert_eq!(widths, vec![1, 1, 3, 1, 1]);
    }

    #[test]
    fn test_content_column_is_capped_and_above_bar() {
        let page = layout(200, 50, 4, 0);
        assert_eq!(page.content.width, MAX_CONTENT_WIDTH);
        assert!(page.content.bottom() < page.nav.bar.y);
        assert_eq!(page.content.center_x().abs_diff(100), 0);

        let narrow = layout(60, 30, 4, 0);
        assert_eq!(narrow.content.width, 56);
    }

    #[test]
    fn test_viewport_offset_is_applied() {
        let base = layout(100, 30, 3, 0);
        let shifted = page_layout(ClipRect::new(0, 5, 100, 30), 3, 0, "1 / 3").unwrap();
        assert_eq!(shifted.nav.bar.y, base.nav.bar.y + 5);
        assert_eq!(shifted.nav.prev.y, base.nav.prev.y + 5);
    }
}
