//! The text-operation protocol shared between the engine and operation
//! modules.
//!
//! An operation is a list of per-caret edit descriptors. Operation modules
//! receive the list, fill in `cut_*`, `replacement`, and `new_sel_*`, and the
//! engine's executor applies the edits in descending offset order so earlier
//! indices stay valid, then repositions every caret by the summed deltas of
//! the edits before it.
//!
//! A descriptor with `replacement: None` is a no-op and is skipped by the
//! executor; that is how modules mark descriptors they cannot use.

use serde::Serialize;

use crate::cursor::{Cursor, CursorId};
use crate::store::ContentStore;
use crate::text::{char_len, slice_chars, splice_chars};

/// A per-caret edit descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOperation {
    /// Document text at the moment the operation list was created.
    pub text: String,
    /// Caret range start before editing.
    pub sel_start: usize,
    /// Caret range end before editing.
    pub sel_end: usize,
    /// `text[sel_start..sel_end)`.
    pub selection: String,
    /// Range to remove; defaults to the caret range.
    pub cut_start: Option<usize>,
    /// End of the range to remove; defaults to the caret range.
    pub cut_end: Option<usize>,
    /// Text to insert. `None` marks this descriptor a no-op.
    pub replacement: Option<String>,
    /// Caret start after the edit; defaults to `cut_start + |replacement|`.
    pub new_sel_start: Option<usize>,
    /// Caret end after the edit; defaults to `cut_start + |replacement|`.
    pub new_sel_end: Option<usize>,
    /// Identity of the owning caret.
    pub cursor_id: CursorId,
    /// Index of the owning caret in the sorted descriptor list.
    pub cursor_index: usize,
}

impl TextOperation {
    /// Whether the executor will apply this descriptor.
    pub fn is_active(&self) -> bool {
        self.replacement.is_some()
    }

    /// The cut range with defaults applied, clamped to `text_len`.
    pub fn effective_cut(&self, text_len: usize) -> (usize, usize) {
        let start = self.cut_start.unwrap_or(self.sel_start).min(text_len);
        let end = self.cut_end.unwrap_or(self.sel_end).min(text_len);
        if start <= end { (start, end) } else { (end, start) }
    }

    /// Mark this descriptor a no-op.
    pub fn skip(&mut self) {
        self.replacement = None;
    }
}

/// Input accepted by the executor.
///
/// The engine hands modules a list; legacy callers may hold a single
/// descriptor. Both shapes normalize to a list at the executor entrance.
#[derive(Debug, Clone)]
pub enum OperationInput {
    /// A single legacy descriptor.
    Single(TextOperation),
    /// One descriptor per caret.
    List(Vec<TextOperation>),
}

impl OperationInput {
    /// Normalize to a descriptor list.
    pub fn into_list(self) -> Vec<TextOperation> {
        match self {
            OperationInput::Single(op) => vec![op],
            OperationInput::List(ops) => ops,
        }
    }
}

impl From<Vec<TextOperation>> for OperationInput {
    fn from(ops: Vec<TextOperation>) -> Self {
        OperationInput::List(ops)
    }
}

/// Build one descriptor per caret, sorted ascending by `sel_start`, each
/// snapshotting the current document text.
pub fn build_operations(text: &str, cursors: &[Cursor]) -> Vec<TextOperation> {
    let mut sorted: Vec<&Cursor> = cursors.iter().collect();
    sorted.sort_by_key(|c| (c.start, c.end));

    sorted
        .into_iter()
        .enumerate()
        .map(|(index, cursor)| TextOperation {
            text: text.to_string(),
            sel_start: cursor.start,
            sel_end: cursor.end,
            selection: slice_chars(text, cursor.start, cursor.end).to_string(),
            cut_start: None,
            cut_end: None,
            replacement: None,
            new_sel_start: None,
            new_sel_end: None,
            cursor_id: cursor.id,
            cursor_index: index,
        })
        .collect()
}

/// Whitespace trimming applied to a selection before wrapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimMode {
    /// Keep the selection as-is.
    #[default]
    No,
    /// Trim leading whitespace.
    Start,
    /// Trim trailing whitespace.
    End,
    /// Trim both ends.
    Yes,
}

impl TrimMode {
    /// Parse a host parameter value; anything unrecognized is `No`.
    pub fn parse(value: &str) -> Self {
        match value {
            "start" => TrimMode::Start,
            "end" => TrimMode::End,
            "yes" | "true" => TrimMode::Yes,
            _ => TrimMode::No,
        }
    }
}

/// Where the caret lands after a whole-document replacement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectMode {
    /// Select the whole replacement.
    All,
    /// Collapse to the start.
    Start,
    /// Collapse to the end.
    #[default]
    End,
    /// Leave the caret where the executor's default puts it.
    None,
}

impl SelectMode {
    /// Parse a host parameter value; anything unrecognized is `End`.
    pub fn parse(value: &str) -> Self {
        match value {
            "all" => SelectMode::All,
            "start" => SelectMode::Start,
            "none" => SelectMode::None,
            _ => SelectMode::End,
        }
    }
}

/// Link syntax used when excising a selection into a new store item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStyle {
    /// `{{title}}`
    #[default]
    Transclude,
    /// `[[title]]`
    Link,
    /// `<<macro "title">>`
    Macro,
}

/// Parameters handed to an operation module.
///
/// Unknown or absent host parameters default to empty strings and the enum
/// defaults; modules clamp anything out of range.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OpParams {
    /// Text payload (insertions, replacements).
    pub text: String,
    /// Wrap/prefix text before the selection.
    pub prefix: String,
    /// Wrap text after the selection.
    pub suffix: String,
    /// Whitespace trimming for `wrap-selection`.
    pub trim: TrimMode,
    /// Caret placement for `replace-all`.
    pub select: SelectMode,
    /// Separator for `save-selection`.
    pub separator: String,
    /// Base title for excised content.
    pub base_title: String,
    /// Tag excised items with the source document.
    pub tag_with_source: bool,
    /// The source document title, when known.
    pub source_title: String,
    /// Link syntax for excised content.
    pub link_style: LinkStyle,
    /// Target item for `save-selection`.
    pub target_title: String,
    /// Target field for `save-selection` (`None` is the text body).
    pub target_field: Option<String>,
    /// Macro name for [`LinkStyle::Macro`] excision.
    pub macro_name: String,
}

/// A stateless, named operation module.
///
/// Modules mutate the descriptor list in place: fill `cut_*`/`replacement`/
/// `new_sel_*` on descriptors they can use, and [`TextOperation::skip`] the
/// rest. Store-backed modules (excise, save-selection) get the host's
/// content store.
pub trait OperationModule {
    /// The operation name the host addresses.
    fn name(&self) -> &'static str;

    /// Transform the descriptor list.
    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        store: &mut dyn ContentStore,
    );
}

/// Per-caret record of an applied edit, used to reposition cursors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorUpdate {
    /// The owning caret.
    pub cursor_id: CursorId,
    /// Where the edit cut, in pre-edit offsets.
    pub cut_start: usize,
    /// Caret start after the edit, before cross-edit adjustment.
    pub new_start: usize,
    /// Caret end after the edit, before cross-edit adjustment.
    pub new_end: usize,
    /// `|replacement| - (cut_end - cut_start)`.
    pub delta: isize,
}

/// Apply the active descriptors to `text`.
///
/// Edits apply in descending `cut_start` order so earlier offsets stay
/// valid; each cut range is clamped to the buffer. Returns the new text and
/// one [`CursorUpdate`] per applied descriptor.
pub fn apply_operations(text: &str, operations: &[TextOperation]) -> (String, Vec<CursorUpdate>) {
    let mut active: Vec<&TextOperation> =
        operations.iter().filter(|op| op.is_active()).collect();
    let text_len = char_len(text);
    active.sort_by(|a, b| {
        b.effective_cut(text_len)
            .0
            .cmp(&a.effective_cut(text_len).0)
    });

    let mut new_text = text.to_string();
    let mut updates: Vec<CursorUpdate> = Vec::with_capacity(active.len());

    for op in active {
        let replacement = op.replacement.as_deref().expect("filtered to active");
        let (cut_start, cut_end) = op.effective_cut(text_len);
        let replacement_len = char_len(replacement);

        new_text = splice_chars(&new_text, cut_start, cut_end, replacement);

        let default_caret = cut_start + replacement_len;
        updates.push(CursorUpdate {
            cursor_id: op.cursor_id,
            cut_start,
            new_start: op.new_sel_start.unwrap_or(default_caret),
            new_end: op.new_sel_end.unwrap_or(default_caret),
            delta: replacement_len as isize - (cut_end as isize - cut_start as isize),
        });
    }

    updates.sort_by_key(|u| u.cut_start);
    (new_text, updates)
}

/// Final caret range for `update`, shifted by the deltas of every edit that
/// cut before it.
pub fn adjusted_range(updates: &[CursorUpdate], update: &CursorUpdate) -> (usize, usize) {
    let shift: isize = updates
        .iter()
        .filter(|u| u.cut_start < update.cut_start)
        .map(|u| u.delta)
        .sum();
    let start = (update.new_start as isize + shift).max(0) as usize;
    let end = (update.new_end as isize + shift).max(0) as usize;
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caret_op(start: usize, end: usize, index: usize, text: &str) -> TextOperation {
        TextOperation {
            text: text.to_string(),
            sel_start: start,
            sel_end: end,
            selection: slice_chars(text, start, end).to_string(),
            cut_start: None,
            cut_end: None,
            replacement: None,
            new_sel_start: None,
            new_sel_end: None,
            cursor_id: if index == 0 {
                CursorId::Primary
            } else {
                CursorId::Secondary(index as u64)
            },
            cursor_index: index,
        }
    }

    #[test]
    fn build_sorts_by_sel_start() {
        let cursors = vec![
            Cursor::range(CursorId::Secondary(1), 5, 6),
            Cursor::range(CursorId::Primary, 1, 2),
        ];
        let ops = build_operations("abcdefg", &cursors);
        assert_eq!(ops[0].sel_start, 1);
        assert_eq!(ops[0].cursor_index, 0);
        assert_eq!(ops[1].sel_start, 5);
        assert_eq!(ops[1].selection, "f");
        assert!(ops.iter().all(|op| op.text == "abcdefg"));
    }

    #[test]
    fn inactive_descriptors_are_skipped() {
        let text = "hello";
        let mut op = caret_op(0, 5, 0, text);
        op.skip();
        let (new_text, updates) = apply_operations(text, &[op]);
        assert_eq!(new_text, "hello");
        assert!(updates.is_empty());
    }

    #[test]
    fn applies_descending_and_repositions_ascending() {
        let text = "abc\ndef";
        let mut first = caret_op(1, 1, 0, text);
        first.replacement = Some("X".to_string());
        let mut second = caret_op(5, 5, 1, text);
        second.replacement = Some("X".to_string());

        let (new_text, updates) = apply_operations(text, &[first, second]);
        assert_eq!(new_text, "aXbc\ndXef");

        let ranges: Vec<(usize, usize)> = updates
            .iter()
            .map(|u| adjusted_range(&updates, u))
            .collect();
        assert_eq!(ranges, vec![(2, 2), (7, 7)]);
    }

    #[test]
    fn cut_defaults_to_selection_and_clamps() {
        let text = "abc";
        let mut op = caret_op(1, 3, 0, text);
        op.cut_end = Some(99);
        op.replacement = Some("Z".to_string());
        let (new_text, updates) = apply_operations(text, &[op]);
        assert_eq!(new_text, "aZ");
        assert_eq!(updates[0].new_start, 2);
        assert_eq!(updates[0].delta, -1);
    }

    #[test]
    fn explicit_new_selection_wins() {
        let text = "abcdef";
        let mut op = caret_op(2, 4, 0, text);
        op.replacement = Some("XY".to_string());
        op.new_sel_start = Some(2);
        op.new_sel_end = Some(4);
        let (_, updates) = apply_operations(text, &[op]);
        assert_eq!((updates[0].new_start, updates[0].new_end), (2, 4));
    }

    #[test]
    fn single_input_normalizes_to_list() {
        let op = caret_op(0, 0, 0, "x");
        assert_eq!(OperationInput::Single(op.clone()).into_list(), vec![op]);
    }
}
