//! Wrapping operations: `wrap-selection` and `make-link`.

use edit_engine::operation::{OpParams, OperationModule, TextOperation, TrimMode};
use edit_engine::store::ContentStore;
use edit_engine::text::{char_len, slice_chars};

use crate::normalize_descriptor;

fn context_before(op: &TextOperation, len: usize) -> String {
    let start = op.sel_start.saturating_sub(len);
    slice_chars(&op.text, start, op.sel_start).to_string()
}

fn context_after(op: &TextOperation, len: usize) -> String {
    let total = char_len(&op.text);
    let end = (op.sel_end + len).min(total);
    slice_chars(&op.text, op.sel_end, end).to_string()
}

/// Split `selection` into (leading whitespace, core, trailing whitespace)
/// per the trim mode.
fn trim_selection(selection: &str, trim: TrimMode) -> (String, String, String) {
    let trim_start = matches!(trim, TrimMode::Start | TrimMode::Yes);
    let trim_end = matches!(trim, TrimMode::End | TrimMode::Yes);

    let core_start = if trim_start {
        selection.len() - selection.trim_start().len()
    } else {
        0
    };
    let core_end = if trim_end {
        selection.trim_end().len().max(core_start)
    } else {
        selection.len()
    };

    (
        selection[..core_start].to_string(),
        selection[core_start..core_end].to_string(),
        selection[core_end..].to_string(),
    )
}

/// `wrap-selection`: toggle a prefix/suffix pair around each caret.
///
/// Four cases per descriptor:
/// 1. collapsed caret: insert (or remove, when already surrounded) the pair
///    with the caret between;
/// 2. the selection itself starts/ends with the pair: strip it;
/// 3. the pair surrounds the selection outside: strip it;
/// 4. otherwise wrap, trimming selection whitespace out of the wrap per the
///    trim mode.
pub struct WrapSelectionOp;

impl OperationModule for WrapSelectionOp {
    fn name(&self) -> &'static str {
        "wrap-selection"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        let prefix = params.prefix.as_str();
        let suffix = params.suffix.as_str();
        if prefix.is_empty() && suffix.is_empty() {
            for op in operations.iter_mut() {
                op.skip();
            }
            return;
        }
        let prefix_len = char_len(prefix);
        let suffix_len = char_len(suffix);

        for op in operations.iter_mut() {
            normalize_descriptor(op);
            let before = context_before(op, prefix_len);
            let after = context_after(op, suffix_len);

            if op.sel_start == op.sel_end {
                if before == prefix && after == suffix {
                    // Caret between an empty pair: remove it.
                    op.cut_start = Some(op.sel_start - prefix_len);
                    op.cut_end = Some(op.sel_end + suffix_len);
                    op.replacement = Some(String::new());
                } else {
                    op.replacement = Some(format!("{prefix}{suffix}"));
                    let caret = op.sel_start + prefix_len;
                    op.new_sel_start = Some(caret);
                    op.new_sel_end = Some(caret);
                }
                continue;
            }

            let selection = op.selection.clone();
            let selection_len = char_len(&selection);

            if selection_len >= prefix_len + suffix_len
                && selection.starts_with(prefix)
                && selection.ends_with(suffix)
            {
                // Strip, selection-internal.
                let inner =
                    slice_chars(&selection, prefix_len, selection_len - suffix_len).to_string();
                op.new_sel_start = Some(op.sel_start);
                op.new_sel_end = Some(op.sel_start + char_len(&inner));
                op.replacement = Some(inner);
            } else if before == prefix && after == suffix {
                // Strip, pair outside the selection.
                op.cut_start = Some(op.sel_start - prefix_len);
                op.cut_end = Some(op.sel_end + suffix_len);
                op.new_sel_start = Some(op.sel_start - prefix_len);
                op.new_sel_end = Some(op.sel_start - prefix_len + selection_len);
                op.replacement = Some(selection);
            } else {
                // Add, keeping trimmed whitespace outside the wrap.
                let (lead, core, trail) = trim_selection(&selection, params.trim);
                let wrapped = format!("{lead}{prefix}{core}{suffix}{trail}");
                op.new_sel_start = Some(op.sel_start + char_len(&lead));
                op.new_sel_end =
                    Some(op.sel_start + char_len(&lead) + prefix_len + char_len(&core) + suffix_len);
                op.replacement = Some(wrapped);
            }
        }
    }
}

/// `make-link`: toggle `[[ ]]` around each caret's selection, recognizing
/// brackets both inside and around the selection.
pub struct MakeLinkOp;

impl OperationModule for MakeLinkOp {
    fn name(&self) -> &'static str {
        "make-link"
    }

    fn apply(
        &self,
        _params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        for op in operations.iter_mut() {
            normalize_descriptor(op);
            let before = context_before(op, 2);
            let after = context_after(op, 2);
            let selection = op.selection.clone();
            let selection_len = char_len(&selection);

            if before == "[[" && after == "]]" {
                op.cut_start = Some(op.sel_start - 2);
                op.cut_end = Some(op.sel_end + 2);
                op.new_sel_start = Some(op.sel_start - 2);
                op.new_sel_end = Some(op.sel_start - 2 + selection_len);
                op.replacement = Some(selection);
            } else if selection_len >= 4 && selection.starts_with("[[") && selection.ends_with("]]")
            {
                let inner = slice_chars(&selection, 2, selection_len - 2).to_string();
                op.new_sel_start = Some(op.sel_start);
                op.new_sel_end = Some(op.sel_start + char_len(&inner));
                op.replacement = Some(inner);
            } else {
                let wrapped = format!("[[{selection}]]");
                op.new_sel_start = Some(op.sel_start);
                op.new_sel_end = Some(op.sel_start + char_len(&wrapped));
                op.replacement = Some(wrapped);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::cursor::{Cursor, CursorId};
    use edit_engine::operation::{apply_operations, build_operations};
    use edit_engine::store::MemoryStore;

    fn single_op(text: &str, start: usize, end: usize) -> Vec<TextOperation> {
        build_operations(text, &[Cursor::range(CursorId::Primary, start, end)])
    }

    fn wrap_params(prefix: &str, suffix: &str, trim: TrimMode) -> OpParams {
        OpParams {
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            trim,
            ..OpParams::default()
        }
    }

    #[test]
    fn wrap_adds_with_trimming() {
        let text = "  hello  ";
        let mut ops = single_op(text, 0, 9);
        WrapSelectionOp.apply(
            &wrap_params("__", "__", TrimMode::Yes),
            &mut ops,
            &mut MemoryStore::new(),
        );
        let (new_text, updates) = apply_operations(text, &ops);
        assert_eq!(new_text, "  __hello__  ");
        // Selection covers the added prefix through suffix.
        assert_eq!((updates[0].new_start, updates[0].new_end), (2, 11));
    }

    #[test]
    fn wrap_strips_when_selection_carries_the_pair() {
        let text = "__hello__";
        let mut ops = single_op(text, 0, 9);
        WrapSelectionOp.apply(
            &wrap_params("__", "__", TrimMode::No),
            &mut ops,
            &mut MemoryStore::new(),
        );
        let (new_text, _) = apply_operations(text, &ops);
        assert_eq!(new_text, "hello");
    }

    #[test]
    fn wrap_strips_when_the_pair_surrounds_the_selection() {
        let text = "a __hello__ b";
        let mut ops = single_op(text, 4, 9);
        WrapSelectionOp.apply(
            &wrap_params("__", "__", TrimMode::No),
            &mut ops,
            &mut MemoryStore::new(),
        );
        let (new_text, updates) = apply_operations(text, &ops);
        assert_eq!(new_text, "a hello b");
        assert_eq!((updates[0].new_start, updates[0].new_end), (2, 7));
    }

    #[test]
    fn collapsed_caret_toggles_an_empty_pair() {
        let mut ops = single_op("ab", 1, 1);
        WrapSelectionOp.apply(
            &wrap_params("**", "**", TrimMode::No),
            &mut ops,
            &mut MemoryStore::new(),
        );
        let (new_text, updates) = apply_operations("ab", &ops);
        assert_eq!(new_text, "a****b");
        assert_eq!(updates[0].new_start, 3);

        let mut ops = single_op("a****b", 3, 3);
        WrapSelectionOp.apply(
            &wrap_params("**", "**", TrimMode::No),
            &mut ops,
            &mut MemoryStore::new(),
        );
        let (new_text, _) = apply_operations("a****b", &ops);
        assert_eq!(new_text, "ab");
    }

    #[test]
    fn make_link_round_trips() {
        let mut ops = single_op("see note here", 4, 8);
        MakeLinkOp.apply(&OpParams::default(), &mut ops, &mut MemoryStore::new());
        let (linked, _) = apply_operations("see note here", &ops);
        assert_eq!(linked, "see [[note]] here");

        let mut ops = single_op(&linked, 6, 10);
        MakeLinkOp.apply(&OpParams::default(), &mut ops, &mut MemoryStore::new());
        let (unlinked, _) = apply_operations(&linked, &ops);
        assert_eq!(unlinked, "see note here");
    }

    #[test]
    fn make_link_strips_brackets_inside_the_selection() {
        let mut ops = single_op("x [[note]] y", 2, 10);
        MakeLinkOp.apply(&OpParams::default(), &mut ops, &mut MemoryStore::new());
        let (text, _) = apply_operations("x [[note]] y", &ops);
        assert_eq!(text, "x note y");
    }
}
