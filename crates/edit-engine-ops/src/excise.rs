//! Store-backed operations: `excise` and `save-selection`.

use edit_engine::operation::{LinkStyle, OpParams, OperationModule, TextOperation};
use edit_engine::store::{ContentStore, StoreItem};

use crate::normalize_descriptor;

/// Title base used when the host supplies none.
const DEFAULT_EXCISE_TITLE: &str = "New Excision";

/// `excise`: move each non-empty selection into a new store item and replace
/// it with a reference in the requested link syntax.
///
/// Empty selections are skipped. Each excised item gets a unique title and,
/// when requested, a tag naming the source document.
pub struct ExciseOp;

impl OperationModule for ExciseOp {
    fn name(&self) -> &'static str {
        "excise"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        store: &mut dyn ContentStore,
    ) {
        let base = if params.base_title.is_empty() {
            DEFAULT_EXCISE_TITLE
        } else {
            params.base_title.as_str()
        };

        for op in operations.iter_mut() {
            normalize_descriptor(op);
            if op.sel_start == op.sel_end {
                op.skip();
                continue;
            }

            let title = store.unique_title(base);
            let mut item = StoreItem::new(&title, &op.selection);
            if params.tag_with_source && !params.source_title.is_empty() {
                item.tags.push(params.source_title.clone());
            }
            store.add_item(item);

            let reference = match params.link_style {
                LinkStyle::Transclude => format!("{{{{{title}}}}}"),
                LinkStyle::Link => format!("[[{title}]]"),
                LinkStyle::Macro => {
                    let macro_name = if params.macro_name.is_empty() {
                        "note"
                    } else {
                        params.macro_name.as_str()
                    };
                    format!("<<{macro_name} \"{title}\">>")
                }
            };
            op.replacement = Some(reference);
        }
    }
}

/// `save-selection`: concatenate every selection into a store item or field.
/// The buffer itself is untouched.
pub struct SaveSelectionOp;

impl OperationModule for SaveSelectionOp {
    fn name(&self) -> &'static str {
        "save-selection"
    }

    fn apply(
        &self,
        params: &OpParams,
        operations: &mut Vec<TextOperation>,
        store: &mut dyn ContentStore,
    ) {
        let mut selections: Vec<String> = Vec::new();
        for op in operations.iter_mut() {
            normalize_descriptor(op);
            if op.sel_start != op.sel_end {
                selections.push(op.selection.clone());
            }
            op.skip();
        }

        if params.target_title.is_empty() {
            log::debug!("save-selection without a target title; nothing stored");
            return;
        }
        let joined = selections.join(&params.separator);
        store.set_text(&params.target_title, params.target_field.as_deref(), &joined);
    }
}
