//! Plain insertion and replacement operations.

use edit_engine::operation::{OpParams, OperationModule, SelectMode, TextOperation};
use edit_engine::store::ContentStore;
use edit_engine::text::char_len;

use crate::normalize_descriptor;

/// `insert-text`: replace each caret's range with the parameter text and
/// collapse the caret after it.
pub struct InsertTextOp;

impl OperationModule for InsertTextOp {
    fn name(&self) -> &'static str {
        "insert-text"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        for op in operations.iter_mut() {
            normalize_descriptor(op);
            op.replacement = Some(params.text.clone());
        }
    }
}

/// `replace-selection`: like `insert-text`, but the caret selects the
/// inserted range afterwards.
pub struct ReplaceSelectionOp;

impl OperationModule for ReplaceSelectionOp {
    fn name(&self) -> &'static str {
        "replace-selection"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        let replacement_len = char_len(&params.text);
        for op in operations.iter_mut() {
            normalize_descriptor(op);
            op.replacement = Some(params.text.clone());
            op.new_sel_start = Some(op.sel_start);
            op.new_sel_end = Some(op.sel_start + replacement_len);
        }
    }
}

/// `replace-all`: replace the whole document. Acts only through the first
/// descriptor; the rest become no-ops.
pub struct ReplaceAllOp;

impl OperationModule for ReplaceAllOp {
    fn name(&self) -> &'static str {
        "replace-all"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        let mut first = true;
        for op in operations.iter_mut() {
            if !first {
                op.skip();
                continue;
            }
            first = false;

            normalize_descriptor(op);
            let old_len = char_len(&op.text);
            let new_len = char_len(&params.text);
            op.cut_start = Some(0);
            op.cut_end = Some(old_len);
            op.replacement = Some(params.text.clone());
            match params.select {
                SelectMode::All => {
                    op.new_sel_start = Some(0);
                    op.new_sel_end = Some(new_len);
                }
                SelectMode::Start => {
                    op.new_sel_start = Some(0);
                    op.new_sel_end = Some(0);
                }
                SelectMode::End => {
                    op.new_sel_start = Some(new_len);
                    op.new_sel_end = Some(new_len);
                }
                SelectMode::None => {}
            }
        }
    }
}
