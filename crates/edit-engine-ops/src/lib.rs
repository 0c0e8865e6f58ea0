#![warn(missing_docs)]
//! Stateless text-operation modules for `edit-engine`.
//!
//! Each module implements [`OperationModule`]: it receives the engine's
//! per-caret descriptor list plus host parameters, and fills in the cut
//! range, replacement, and post-edit caret for every descriptor it can use.
//! Descriptors it cannot use are marked no-op and skipped by the executor.
//!
//! All modules are multi-caret aware unless the operation is inherently
//! whole-document (`replace-all`) or side-effect only (`save-selection`,
//! `focus-editor`).
//!
//! ```rust
//! use edit_engine::{Engine, EngineSetup, OpParams};
//! use edit_engine_ops::standard_operations;
//!
//! let mut setup = EngineSetup::framed("hello");
//! setup.operations = standard_operations();
//! let mut engine = Engine::new(setup);
//!
//! engine.set_primary_selection(0, 5);
//! let params = OpParams {
//!     prefix: "**".to_string(),
//!     suffix: "**".to_string(),
//!     ..OpParams::default()
//! };
//! engine.run_operation("wrap-selection", &params);
//! assert_eq!(engine.text(), "**hello**");
//! ```

use edit_engine::operation::{OperationModule, TextOperation};
use edit_engine::text::{char_len, slice_chars};

mod excise;
mod focus;
mod insert;
mod lines;
mod wrap;

pub use excise::{ExciseOp, SaveSelectionOp};
pub use focus::FocusEditorOp;
pub use insert::{InsertTextOp, ReplaceAllOp, ReplaceSelectionOp};
pub use lines::{PrefixLinesOp, WrapLinesOp};
pub use wrap::{MakeLinkOp, WrapSelectionOp};

/// Normalize a descriptor before a module reads it: clamp and order the
/// selection range against the descriptor's text snapshot, and default the
/// `selection` field to the snapshot substring.
pub(crate) fn normalize_descriptor(op: &mut TextOperation) {
    let len = char_len(&op.text);
    op.sel_start = op.sel_start.min(len);
    op.sel_end = op.sel_end.min(len);
    if op.sel_start > op.sel_end {
        std::mem::swap(&mut op.sel_start, &mut op.sel_end);
    }
    if op.selection.is_empty() {
        op.selection = slice_chars(&op.text, op.sel_start, op.sel_end).to_string();
    }
}

/// The standard operation set, ready for
/// [`EngineSetup::operations`](edit_engine::EngineSetup).
pub fn standard_operations() -> Vec<Box<dyn OperationModule>> {
    vec![
        Box::new(InsertTextOp),
        Box::new(ReplaceSelectionOp),
        Box::new(ReplaceAllOp),
        Box::new(MakeLinkOp),
        Box::new(WrapSelectionOp),
        Box::new(PrefixLinesOp),
        Box::new(WrapLinesOp),
        Box::new(ExciseOp),
        Box::new(SaveSelectionOp),
        Box::new(FocusEditorOp),
    ]
}
