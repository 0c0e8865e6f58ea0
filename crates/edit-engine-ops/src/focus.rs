//! `focus-editor`: a deliberate all-no-op pass.
//!
//! Every descriptor is marked no-op; the executor's empty pass then
//! re-focuses the surface.

use edit_engine::operation::{OpParams, OperationModule, TextOperation};
use edit_engine::store::ContentStore;

/// `focus-editor`.
pub struct FocusEditorOp;

impl OperationModule for FocusEditorOp {
    fn name(&self) -> &'static str {
        "focus-editor"
    }

    fn apply(
        &self,
        _params: &OpParams,
        operations: &mut Vec<TextOperation>,
        _store: &mut dyn ContentStore,
    ) {
        for op in operations.iter_mut() {
            op.skip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::cursor::{Cursor, CursorId};
    use edit_engine::operation::build_operations;
    use edit_engine::store::MemoryStore;

    #[test]
    fn everything_becomes_a_no_op() {
        let mut ops =
            build_operations("abc", &[Cursor::range(CursorId::Primary, 0, 2)]);
        ops[0].replacement = Some("x".to_string());
        FocusEditorOp.apply(&OpParams::default(), &mut ops, &mut MemoryStore::new());
        assert!(ops.iter().all(|op| !op.is_active()));
    }
}
