//! Geometry service: char offset ↔ surface-local pixel coordinates.
//!
//! Coordinates are computed against the surface's reported
//! [`SurfaceLayout`](crate::surface::SurfaceLayout) by reproducing the
//! surface's own wrapping: logical lines are wrapped greedily at the content
//! width, preferring to break after whitespace, with tabs advancing to the
//! next tab stop. Results are in **content space**: scroll offsets never
//! enter the computation; the overlay layer applies the single scroll
//! transform.
//!
//! All queries fail soft: a surface with no layout yields `None`/empty and
//! callers skip rendering.

use unicode_width::UnicodeWidthChar;

use crate::surface::{SurfaceLayout, WrapMode};
use crate::text::split_lines_keep_trailing;

/// Height used when the layout reports no usable line height.
pub const FALLBACK_LINE_HEIGHT: f32 = 16.0;

/// Minimum rect dimension so selection rects stay clickable and visible.
pub const MIN_RECT_PX: f32 = 2.0;

/// A caret position in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaretRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Caret height (one line).
    pub height: f32,
}

/// One selection rectangle in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRect {
    /// Left edge.
    pub left: f32,
    /// Top edge.
    pub top: f32,
    /// Width (min 2 px).
    pub width: f32,
    /// Height (min 2 px).
    pub height: f32,
}

/// A wrapped segment of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisualRow {
    /// Char offset of the row's first char.
    start: usize,
    /// Char offset one past the row's last char (excluding the newline).
    end: usize,
    /// Whether this row ends because the logical line ended (not a wrap).
    hard_end: bool,
}

fn line_height_of(layout: &SurfaceLayout) -> f32 {
    if layout.line_height > 0.0 {
        layout.line_height
    } else {
        FALLBACK_LINE_HEIGHT
    }
}

fn advance(ch: char, x: f32, layout: &SurfaceLayout) -> f32 {
    if ch == '\t' {
        let tab_px = layout.cell_width * layout.tab_size.max(1) as f32;
        let next_stop = ((x / tab_px).floor() + 1.0) * tab_px;
        next_stop - x
    } else {
        ch.width().unwrap_or(0) as f32 * layout.cell_width
    }
}

/// Wrap the document into visual rows per the surface's layout.
fn visual_rows(text: &str, layout: &SurfaceLayout) -> Vec<VisualRow> {
    let mut rows = Vec::new();
    let mut line_start = 0usize;

    for line in split_lines_keep_trailing(text) {
        let line_len = line.chars().count();

        if layout.wrap == WrapMode::None || layout.content_width <= 0.0 {
            rows.push(VisualRow {
                start: line_start,
                end: line_start + line_len,
                hard_end: true,
            });
            line_start += line_len + 1;
            continue;
        }

        let mut seg_start = line_start;
        let mut x = 0.0f32;
        // Break position after the most recent whitespace, if any.
        let mut break_at: Option<usize> = None;
        let mut offset = line_start;

        for ch in line.chars() {
            let adv = advance(ch, x, layout);
            if x + adv > layout.content_width && offset > seg_start {
                let split = break_at.filter(|b| *b > seg_start).unwrap_or(offset);
                rows.push(VisualRow {
                    start: seg_start,
                    end: split,
                    hard_end: false,
                });
                seg_start = split;
                break_at = None;
                // Re-measure from the split point up to the current char.
                x = 0.0;
                let skip = split - line_start;
                let taken = offset - line_start;
                for c in line.chars().skip(skip).take(taken - skip) {
                    x += advance(c, x, layout);
                }
                x += advance(ch, x, layout);
            } else {
                x += adv;
            }
            offset += 1;
            if ch == ' ' || ch == '\t' {
                break_at = Some(offset);
            }
        }

        rows.push(VisualRow {
            start: seg_start,
            end: line_start + line_len,
            hard_end: true,
        });
        line_start += line_len + 1;
    }

    rows
}

fn row_of_offset(rows: &[VisualRow], offset: usize) -> usize {
    for (index, row) in rows.iter().enumerate() {
        if offset < row.end {
            return index;
        }
        if offset == row.end {
            // At a soft-wrap boundary the caret belongs to the next row; at a
            // hard line end it stays on this row.
            if row.hard_end {
                return index;
            }
            return (index + 1).min(rows.len() - 1);
        }
    }
    rows.len().saturating_sub(1)
}

fn x_within_row(text: &str, row: &VisualRow, offset: usize, layout: &SurfaceLayout) -> f32 {
    let mut x = 0.0f32;
    for ch in text
        .chars()
        .skip(row.start)
        .take(offset.saturating_sub(row.start).min(row.end - row.start))
    {
        x += advance(ch, x, layout);
    }
    x
}

/// Map a char offset to its caret rect, or `None` while the surface has no
/// layout.
pub fn position_for_offset(
    text: &str,
    offset: usize,
    layout: Option<&SurfaceLayout>,
) -> Option<CaretRect> {
    let layout = layout?;
    let line_height = line_height_of(layout);
    let offset = offset.min(text.chars().count());

    let rows = visual_rows(text, layout);
    let row_index = row_of_offset(&rows, offset);
    let row = &rows[row_index];
    let x = x_within_row(text, row, offset, layout);

    Some(CaretRect {
        left: layout.content_left + x,
        top: layout.content_top + row_index as f32 * line_height,
        height: line_height,
    })
}

/// Map a char range to a minimal list of selection rectangles.
///
/// Same visual line (top delta under half a line height): one rect. Otherwise
/// a first-line rect to the right content edge, one full-width rect covering
/// any whole middle lines, and a last-line rect from the left content edge.
pub fn rects_for_range(
    text: &str,
    start: usize,
    end: usize,
    layout: Option<&SurfaceLayout>,
) -> Vec<RangeRect> {
    let Some(layout) = layout else {
        return Vec::new();
    };
    let (start, end) = if start <= end { (start, end) } else { (end, start) };

    let Some(start_pos) = position_for_offset(text, start, Some(layout)) else {
        return Vec::new();
    };
    let Some(end_pos) = position_for_offset(text, end, Some(layout)) else {
        return Vec::new();
    };

    let line_height = line_height_of(layout);
    let right_edge = layout.content_left + layout.content_width;

    let rect = |left: f32, top: f32, width: f32, height: f32| RangeRect {
        left,
        top,
        width: width.max(MIN_RECT_PX),
        height: height.max(MIN_RECT_PX),
    };

    if (end_pos.top - start_pos.top).abs() < line_height / 2.0 {
        return vec![rect(
            start_pos.left,
            start_pos.top,
            end_pos.left - start_pos.left,
            line_height,
        )];
    }

    let mut rects = Vec::with_capacity(3);
    rects.push(rect(
        start_pos.left,
        start_pos.top,
        right_edge - start_pos.left,
        line_height,
    ));

    let middle_top = start_pos.top + line_height;
    let middle_height = end_pos.top - middle_top;
    if middle_height >= line_height / 2.0 {
        rects.push(rect(
            layout.content_left,
            middle_top,
            layout.content_width,
            middle_height,
        ));
    }

    rects.push(rect(
        layout.content_left,
        end_pos.top,
        end_pos.left - layout.content_left,
        line_height,
    ));

    rects
}
