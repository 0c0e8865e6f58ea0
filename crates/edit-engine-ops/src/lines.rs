//! Line-block operations: `prefix-lines` and `wrap-lines`.

use edit_engine::operation::{OpParams, OperationModule, TextOperation};
use edit_engine::store::ContentStore;
use edit_engine::text::{char_len, line_end_at, line_start_at, slice_chars};

use crate::normalize_descriptor;

/// Expand a descriptor's selection to whole-line boundaries.
fn line_block(op: &TextOperation) -> (usize, usize, String) {
    let start = line_start_at(&op.text, op.sel_start);
    let end = line_end_at(&op.text, op.sel_end);
    let block = slice_chars(&op.text, start, end).to_string();
    (start, end, block)
}

/// `prefix-lines`: toggle a prefix on every selected line.
///
/// If every line in the block already starts with the prefix it is stripped,
/// otherwise it is prepended to each line. The caret selects the whole
/// replaced block.
pub struct PrefixLinesOp;

impl OperationModule for PrefixLinesOp {
    fn name(&self) -> &'static str {
        "prefix-lines"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        let prefix = params.prefix.as_str();
        if prefix.is_empty() {
            for op in operations.iter_mut() {
                op.skip();
            }
            return;
        }

        for op in operations.iter_mut() {
            normalize_descriptor(op);
            let (start, end, block) = line_block(op);
            let lines: Vec<&str> = block.split('\n').collect();

            let replacement = if lines.iter().all(|line| line.starts_with(prefix)) {
                lines
                    .iter()
                    .map(|&line| line.strip_prefix(prefix).unwrap_or(line))
                    .collect::<Vec<_>>()
                    .join("\n")
            } else {
                lines
                    .iter()
                    .map(|line| format!("{prefix}{line}"))
                    .collect::<Vec<_>>()
                    .join("\n")
            };

            op.cut_start = Some(start);
            op.cut_end = Some(end);
            op.new_sel_start = Some(start);
            op.new_sel_end = Some(start + char_len(&replacement));
            op.replacement = Some(replacement);
        }
    }
}

/// `wrap-lines`: surround the selected lines with a prefix line and a suffix
/// line, or remove them when they are already there.
pub struct WrapLinesOp;

impl OperationModule for WrapLinesOp {
    fn name(&self) -> &'static str {
        "wrap-lines"
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

        for op in operations.iter_mut() {
            normalize_descriptor(op);
            let (start, end, block) = line_block(op);
            let total = char_len(&op.text);

            // The line immediately above and below the block.
            let prev_line = (start > 0).then(|| {
                let prev_start = line_start_at(&op.text, start - 1);
                (prev_start, slice_chars(&op.text, prev_start, start - 1).to_string())
            });
            let next_line = (end < total).then(|| {
                let next_end = line_end_at(&op.text, end + 1);
                (next_end, slice_chars(&op.text, end + 1, next_end).to_string())
            });

            let already_wrapped = matches!(&prev_line, Some((_, line)) if line == prefix)
                && matches!(&next_line, Some((_, line)) if line == suffix);

            if already_wrapped {
                let (prev_start, _) = prev_line.expect("checked");
                let (next_end, _) = next_line.expect("checked");
                op.cut_start = Some(prev_start);
                op.cut_end = Some(next_end);
                op.new_sel_start = Some(prev_start);
                op.new_sel_end = Some(prev_start + char_len(&block));
                op.replacement = Some(block);
            } else {
                let replacement = format!("{prefix}\n{block}\n{suffix}");
                op.cut_start = Some(start);
                op.cut_end = Some(end);
                op.new_sel_start = Some(start);
                op.new_sel_end = Some(start + char_len(&replacement));
                op.replacement = Some(replacement);
            }
        }
    }
}
