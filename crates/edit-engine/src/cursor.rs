//! Cursor set: an ordered, non-overlapping list of ranges with exactly one
//! primary caret.
//!
//! All offsets are char offsets into the current document text. Every mutation
//! funnels through [`CursorSet::normalize`], which restores the invariants:
//!
//! - exactly one primary;
//! - ranges sorted ascending by `start`;
//! - no overlaps: touching or intersecting ranges merge, and the primary
//!   flag is OR-ed across the merged inputs;
//! - `0 <= start <= end <= text length`.
//!
//! Merging uses the strict rule: `cur.start <= last.end` merges, adjacency at
//! `last.end + 1` does not.

use std::fmt;

use crate::text::splice_chars;

/// Identity of a caret within a cursor set.
///
/// The primary caret's id is fixed; secondary ids are unique within a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CursorId {
    /// The primary caret, mirrored to the surface's native selection.
    Primary,
    /// A secondary caret.
    Secondary(u64),
}

impl fmt::Display for CursorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorId::Primary => write!(f, "primary"),
            CursorId::Secondary(n) => write!(f, "c{n}"),
        }
    }
}

/// A single caret: a position (`start == end`) or a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Caret identity, unique within its set.
    pub id: CursorId,
    /// Inclusive start char offset.
    pub start: usize,
    /// Exclusive end char offset (`start <= end` after normalization).
    pub end: usize,
    /// Whether this caret is the primary.
    pub is_primary: bool,
}

impl Cursor {
    /// Create a collapsed caret at `offset`.
    pub fn caret(id: CursorId, offset: usize) -> Self {
        Self {
            id,
            start: offset,
            end: offset,
            is_primary: matches!(id, CursorId::Primary),
        }
    }

    /// Create a range caret.
    pub fn range(id: CursorId, start: usize, end: usize) -> Self {
        Self {
            id,
            start,
            end,
            is_primary: matches!(id, CursorId::Primary),
        }
    }

    /// Whether the caret is collapsed (no selection).
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// The ordered, normalized list of carets.
#[derive(Debug, Clone)]
pub struct CursorSet {
    cursors: Vec<Cursor>,
    next_secondary: u64,
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSet {
    /// Create a set with a single primary caret at offset 0.
    pub fn new() -> Self {
        Self {
            cursors: vec![Cursor::caret(CursorId::Primary, 0)],
            next_secondary: 0,
        }
    }

    /// All carets in ascending order.
    pub fn cursors(&self) -> &[Cursor] {
        &self.cursors
    }

    /// Number of carets.
    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    /// A cursor set is never empty; this mirrors the usual container API.
    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// The primary caret.
    pub fn primary(&self) -> &Cursor {
        self.cursors
            .iter()
            .find(|c| c.is_primary)
            .unwrap_or(&self.cursors[0])
    }

    /// Mutable access to the primary caret.
    pub fn primary_mut(&mut self) -> &mut Cursor {
        let index = self
            .cursors
            .iter()
            .position(|c| c.is_primary)
            .unwrap_or(0);
        &mut self.cursors[index]
    }

    /// Look up a caret by id.
    pub fn get(&self, id: CursorId) -> Option<&Cursor> {
        self.cursors.iter().find(|c| c.id == id)
    }

    /// Append a secondary caret and re-normalize.
    ///
    /// Returns the new caret's id. The caret may merge away immediately if it
    /// touches an existing range.
    pub fn add(&mut self, start: usize, end: usize, text_len: usize) -> CursorId {
        let id = CursorId::Secondary(self.next_secondary);
        self.next_secondary += 1;
        self.cursors.push(Cursor::range(id, start, end));
        self.normalize(text_len);
        id
    }

    /// Remove a caret by id.
    ///
    /// Refuses (returns `false`) when only one caret remains or when the
    /// target is the primary.
    pub fn remove(&mut self, id: CursorId) -> bool {
        if self.cursors.len() <= 1 {
            return false;
        }
        let Some(index) = self.cursors.iter().position(|c| c.id == id) else {
            return false;
        };
        if self.cursors[index].is_primary {
            return false;
        }
        self.cursors.remove(index);
        true
    }

    /// Drop every secondary caret, keeping the primary (or the first caret as
    /// a fallback).
    pub fn clear_secondary(&mut self) {
        let keep = self
            .cursors
            .iter()
            .position(|c| c.is_primary)
            .unwrap_or(0);
        let mut kept = self.cursors.swap_remove(keep);
        kept.is_primary = true;
        kept.id = CursorId::Primary;
        self.cursors.clear();
        self.cursors.push(kept);
    }

    /// Replace the whole set (deep copy semantics) and re-normalize.
    pub fn restore(&mut self, cursors: Vec<Cursor>, text_len: usize) {
        if cursors.is_empty() {
            self.cursors = vec![Cursor::caret(CursorId::Primary, 0)];
        } else {
            self.cursors = cursors;
        }
        self.normalize(text_len);
    }

    /// Restore the cursor-set invariants.
    ///
    /// Clamp bounds, swap reversed ranges, sort ascending by start, merge
    /// touching/intersecting ranges (strict `cur.start <= last.end`), OR the
    /// primary flag across merges, and re-assert exactly one primary.
    pub fn normalize(&mut self, text_len: usize) {
        for cursor in &mut self.cursors {
            cursor.start = cursor.start.min(text_len);
            cursor.end = cursor.end.min(text_len);
            if cursor.start > cursor.end {
                std::mem::swap(&mut cursor.start, &mut cursor.end);
            }
        }

        self.cursors
            .sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));

        let mut merged: Vec<Cursor> = Vec::with_capacity(self.cursors.len());
        for cursor in self.cursors.drain(..) {
            match merged.last_mut() {
                Some(last) if cursor.start <= last.end => {
                    last.end = last.end.max(cursor.end);
                    last.is_primary |= cursor.is_primary;
                    if cursor.is_primary {
                        last.id = CursorId::Primary;
                    }
                }
                _ => merged.push(cursor),
            }
        }
        self.cursors = merged;

        if self.cursors.is_empty() {
            self.cursors.push(Cursor::caret(CursorId::Primary, 0));
        }

        let primary_index = self
            .cursors
            .iter()
            .position(|c| c.is_primary)
            .unwrap_or(0);
        for (index, cursor) in self.cursors.iter_mut().enumerate() {
            cursor.is_primary = index == primary_index;
            if cursor.is_primary {
                cursor.id = CursorId::Primary;
            } else if cursor.id == CursorId::Primary {
                // A demoted duplicate primary gets a fresh secondary id.
                cursor.id = CursorId::Secondary(self.next_secondary);
                self.next_secondary += 1;
            }
        }
    }
}

/// Which neighbor a collapsed caret deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDirection {
    /// Backspace: the char before the caret.
    Backward,
    /// Delete: the char after the caret.
    Forward,
}

/// Insert `insertion` at every caret of a normalized set.
///
/// The text mutation is applied right-to-left so earlier offsets stay valid;
/// carets are then repositioned left-to-right with a running cumulative
/// offset. Every resulting caret is collapsed immediately after its
/// insertion.
pub fn insert_at_cursors(text: &str, cursors: &[Cursor], insertion: &str) -> (String, Vec<Cursor>) {
    let ins_len = insertion.chars().count() as isize;

    let mut new_text = text.to_string();
    for cursor in cursors.iter().rev() {
        new_text = splice_chars(&new_text, cursor.start, cursor.end, insertion);
    }

    let mut repositioned = Vec::with_capacity(cursors.len());
    let mut cumulative: isize = 0;
    for cursor in cursors {
        let position =
            (cursor.start as isize + cumulative + ins_len).max(0) as usize;
        let mut moved = cursor.clone();
        moved.start = position;
        moved.end = position;
        repositioned.push(moved);
        cumulative += ins_len - (cursor.end as isize - cursor.start as isize);
    }

    (new_text, repositioned)
}

/// Delete at every caret of a normalized set.
///
/// Range carets delete their selection; collapsed carets extend one char in
/// `direction`, except at a buffer boundary where the caret is left
/// unchanged.
pub fn delete_at_cursors(
    text: &str,
    cursors: &[Cursor],
    direction: DeleteDirection,
) -> (String, Vec<Cursor>) {
    let text_len = text.chars().count();

    struct Deletion {
        id: CursorId,
        is_primary: bool,
        at: usize,
        len: usize,
    }

    let mut deletions: Vec<Deletion> = Vec::with_capacity(cursors.len());
    for cursor in cursors {
        let (at, len) = if !cursor.is_collapsed() {
            (cursor.start, cursor.end - cursor.start)
        } else {
            match direction {
                DeleteDirection::Backward if cursor.start > 0 => (cursor.start - 1, 1),
                DeleteDirection::Forward if cursor.start < text_len => (cursor.start, 1),
                // Boundary caret: nothing to delete, position preserved.
                _ => (cursor.start, 0),
            }
        };
        deletions.push(Deletion {
            id: cursor.id,
            is_primary: cursor.is_primary,
            at,
            len,
        });
    }

    let mut new_text = text.to_string();
    for deletion in deletions.iter().rev() {
        if deletion.len > 0 {
            new_text = splice_chars(&new_text, deletion.at, deletion.at + deletion.len, "");
        }
    }

    let mut repositioned = Vec::with_capacity(deletions.len());
    let mut removed_before = 0usize;
    for deletion in &deletions {
        let position = deletion.at - removed_before;
        repositioned.push(Cursor {
            id: deletion.id,
            start: position,
            end: position,
            is_primary: deletion.is_primary,
        });
        removed_before += deletion.len;
    }

    (new_text, repositioned)
}

/// Delete only the selected ranges (cut semantics). Collapsed carets are
/// left where they are, shifted by the deletions before them.
pub fn delete_selections(text: &str, cursors: &[Cursor]) -> (String, Vec<Cursor>) {
    let mut new_text = text.to_string();
    for cursor in cursors.iter().rev() {
        if !cursor.is_collapsed() {
            new_text = splice_chars(&new_text, cursor.start, cursor.end, "");
        }
    }

    let mut repositioned = Vec::with_capacity(cursors.len());
    let mut removed_before = 0usize;
    for cursor in cursors {
        let position = cursor.start - removed_before;
        repositioned.push(Cursor {
            id: cursor.id,
            start: position,
            end: position,
            is_primary: cursor.is_primary,
        });
        removed_before += cursor.end - cursor.start;
    }

    (new_text, repositioned)
}
