//! Overlay layer: the draw model for secondary carets, selection rectangles,
//! and plugin decorations.
//!
//! Present only in the framed variant. The host renders this model into an
//! absolutely-positioned, pointer-events-none container over the surface.
//! All geometry is content-space; the single `transform` (set to the negated
//! scroll offsets) moves everything with the content. Decorations must not
//! bake scroll offsets into their rects; the transform already accounts for
//! scroll, and doing both double-counts.

use crate::cursor::Cursor;
use crate::geometry::{self, CaretRect, RangeRect};
use crate::surface::SurfaceLayout;

/// A plugin-owned decoration rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationNode {
    /// Owning plugin, for scoped clearing. `None` is unowned.
    pub owner: Option<String>,
    /// Content-space rectangle.
    pub rect: RangeRect,
    /// Host-facing styling class (e.g. `"search-match"`).
    pub class: String,
    /// Optional payload (tooltip text, placeholder label).
    pub label: Option<String>,
}

/// The overlay draw model.
#[derive(Debug, Default)]
pub struct Overlay {
    transform: (f32, f32),
    carets: Vec<CaretRect>,
    selections: Vec<RangeRect>,
    decorations: Vec<DecorationNode>,
}

impl Overlay {
    /// Create an empty overlay. All layers exist from the start so plugins
    /// never have to null-check.
    pub fn new() -> Self {
        Self::default()
    }

    /// The CSS-transform translation `(x, y)` to apply to the whole overlay.
    pub fn transform(&self) -> (f32, f32) {
        self.transform
    }

    /// Follow the content under scroll: the transform becomes
    /// `(-scroll_left, -scroll_top)`.
    pub fn set_scroll(&mut self, scroll_left: f32, scroll_top: f32) {
        self.transform = (-scroll_left, -scroll_top);
    }

    /// Secondary caret rects, in content space.
    pub fn carets(&self) -> &[CaretRect] {
        &self.carets
    }

    /// Secondary selection rects, in content space.
    pub fn selections(&self) -> &[RangeRect] {
        &self.selections
    }

    /// All decoration nodes.
    pub fn decorations(&self) -> &[DecorationNode] {
        &self.decorations
    }

    /// Recompute the cursor layer from the current cursor set.
    ///
    /// The primary caret is drawn natively by the surface; only secondaries
    /// appear here. With no layout available the layer empties out.
    pub fn redraw_cursors(&mut self, text: &str, cursors: &[Cursor], layout: Option<&SurfaceLayout>) {
        self.carets.clear();
        self.selections.clear();

        for cursor in cursors.iter().filter(|c| !c.is_primary) {
            if let Some(rect) = geometry::position_for_offset(text, cursor.end, layout) {
                self.carets.push(rect);
            }
            if !cursor.is_collapsed() {
                self.selections.extend(geometry::rects_for_range(
                    text,
                    cursor.start,
                    cursor.end,
                    layout,
                ));
            }
        }
    }

    /// Add a decoration node.
    pub fn add_decoration(&mut self, node: DecorationNode) {
        self.decorations.push(node);
    }

    /// Remove decorations by owner.
    ///
    /// `Some(owner)` removes only that owner's nodes, so one plugin cannot
    /// wipe another's decorations by accident. `None` removes all.
    pub fn clear_decorations(&mut self, owner: Option<&str>) {
        match owner {
            Some(owner) => self
                .decorations
                .retain(|node| node.owner.as_deref() != Some(owner)),
            None => self.decorations.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{Cursor, CursorId};

    fn deco(owner: Option<&str>) -> DecorationNode {
        DecorationNode {
            owner: owner.map(str::to_string),
            rect: RangeRect {
                left: 0.0,
                top: 0.0,
                width: 2.0,
                height: 2.0,
            },
            class: "x".to_string(),
            label: None,
        }
    }

    #[test]
    fn scroll_sets_negated_transform() {
        let mut overlay = Overlay::new();
        overlay.set_scroll(10.0, 30.0);
        assert_eq!(overlay.transform(), (-10.0, -30.0));
    }

    #[test]
    fn clear_is_scoped_by_owner() {
        let mut overlay = Overlay::new();
        overlay.add_decoration(deco(Some("search")));
        overlay.add_decoration(deco(Some("fold")));
        overlay.add_decoration(deco(None));

        overlay.clear_decorations(Some("search"));
        assert_eq!(overlay.decorations().len(), 2);

        overlay.clear_decorations(None);
        assert!(overlay.decorations().is_empty());
    }

    #[test]
    fn cursor_layer_skips_primary() {
        let mut overlay = Overlay::new();
        let layout = SurfaceLayout::default();
        let cursors = vec![
            Cursor::range(CursorId::Primary, 0, 2),
            Cursor::range(CursorId::Secondary(0), 4, 6),
        ];
        overlay.redraw_cursors("abcdefgh", &cursors, Some(&layout));
        assert_eq!(overlay.carets().len(), 1);
        assert_eq!(overlay.selections().len(), 1);
    }

    #[test]
    fn cursor_layer_empties_without_layout() {
        let mut overlay = Overlay::new();
        let cursors = vec![Cursor::range(CursorId::Secondary(0), 1, 3)];
        overlay.redraw_cursors("abcdef", &cursors, None);
        assert!(overlay.carets().is_empty());
        assert!(overlay.selections().is_empty());
    }
}
