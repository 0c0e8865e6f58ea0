//! Line and block mutation: duplicate, delete, move, indent, outdent.
//!
//! Every operation is multi-caret: each descriptor expands to its caret's
//! whole-line block and mutates independently. Two carets in the same block
//! collapse to one edit.

use std::collections::BTreeMap;

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::operation::TextOperation;
use edit_engine::runtime::{CommandSpec, Plugin, PluginModule, VariantSupport};
use edit_engine::text::{char_len, line_end_at, line_start_at, slice_chars};

fn line_block(op: &TextOperation) -> (usize, usize, String) {
    let start = line_start_at(&op.text, op.sel_start);
    let end = line_end_at(&op.text, op.sel_end);
    (start, end, slice_chars(&op.text, start, end).to_string())
}

/// Which line mutation to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineEdit {
    Duplicate,
    Delete,
    MoveUp,
    MoveDown,
    Indent,
    Outdent,
}

/// The line-operations plugin.
pub struct LineOpsPlugin {
    indent_unit: String,
}

impl LineOpsPlugin {
    fn new() -> Self {
        Self {
            indent_unit: "\t".to_string(),
        }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "line-ops",
            description: "Duplicate, delete, move, and indent lines",
            category: "editing",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/line-ops"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(LineOpsPlugin::new()))),
        }
    }

    fn build(&self, edit: LineEdit, operations: &mut Vec<TextOperation>) {
        // Descriptors arrive sorted ascending; a cut overlapping the previous
        // descriptor's cut collapses into it (checked after each arm).
        let mut last_cut_end: Option<usize> = None;

        for op in operations.iter_mut() {
            let (start, end, block) = line_block(op);
            let total = char_len(&op.text);
            let block_len = char_len(&block);

            match edit {
                LineEdit::Duplicate => {
                    op.cut_start = Some(start);
                    op.cut_end = Some(end);
                    op.replacement = Some(format!("{block}\n{block}"));
                    // The caret follows the duplicate below.
                    op.new_sel_start = Some(op.sel_start + block_len + 1);
                    op.new_sel_end = Some(op.sel_end + block_len + 1);
                }
                LineEdit::Delete => {
                    let (cut_start, cut_end) = if end < total {
                        (start, end + 1)
                    } else if start > 0 {
                        (start - 1, end)
                    } else {
                        (start, end)
                    };
                    op.cut_start = Some(cut_start);
                    op.cut_end = Some(cut_end);
                    op.replacement = Some(String::new());
                    op.new_sel_start = Some(cut_start);
                    op.new_sel_end = Some(cut_start);
                }
                LineEdit::MoveUp => {
                    if start == 0 {
                        op.skip();
                        continue;
                    }
                    let prev_start = line_start_at(&op.text, start - 1);
                    let prev = slice_chars(&op.text, prev_start, start - 1).to_string();
                    let prev_len = char_len(&prev);
                    op.cut_start = Some(prev_start);
                    op.cut_end = Some(end);
                    op.replacement = Some(format!("{block}\n{prev}"));
                    op.new_sel_start = Some(op.sel_start - prev_len - 1);
                    op.new_sel_end = Some(op.sel_end - prev_len - 1);
                }
                LineEdit::MoveDown => {
                    if end >= total {
                        op.skip();
                        continue;
                    }
                    let next_end = line_end_at(&op.text, end + 1);
                    let next = slice_chars(&op.text, end + 1, next_end).to_string();
                    let next_len = char_len(&next);
                    op.cut_start = Some(start);
                    op.cut_end = Some(next_end);
                    op.replacement = Some(format!("{next}\n{block}"));
                    op.new_sel_start = Some(op.sel_start + next_len + 1);
                    op.new_sel_end = Some(op.sel_end + next_len + 1);
                }
                LineEdit::Indent => {
                    let unit = self.indent_unit.as_str();
                    let replacement = block
                        .split('\n')
                        .map(|line| format!("{unit}{line}"))
                        .collect::<Vec<_>>()
                        .join("\n");
                    op.cut_start = Some(start);
                    op.cut_end = Some(end);
                    op.new_sel_start = Some(start);
                    op.new_sel_end = Some(start + char_len(&replacement));
                    op.replacement = Some(replacement);
                }
                LineEdit::Outdent => {
                    let unit = self.indent_unit.as_str();
                    let replacement = block
                        .split('\n')
                        .map(|line| {
                            line.strip_prefix(unit)
                                .or_else(|| line.strip_prefix('\t'))
                                .or_else(|| line.strip_prefix("    "))
                                .or_else(|| line.strip_prefix(' '))
                                .unwrap_or(line)
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    if replacement == block {
                        op.skip();
                        continue;
                    }
                    op.cut_start = Some(start);
                    op.cut_end = Some(end);
                    op.new_sel_start = Some(start);
                    op.new_sel_end = Some(start + char_len(&replacement));
                    op.replacement = Some(replacement);
                }
            }

            if !op.is_active() {
                continue;
            }
            let cut_start = op.cut_start.unwrap_or(start);
            let cut_end = op.cut_end.unwrap_or(end);
            if last_cut_end.is_some_and(|prev_end| cut_start <= prev_end) {
                op.skip();
                continue;
            }
            last_cut_end = Some(cut_end);
        }
    }

    fn run(&self, edit: LineEdit, engine: &mut Engine) {
        let mut operations = engine.create_text_operation();
        self.build(edit, &mut operations);
        engine.execute_operations(operations);
    }
}

impl Plugin for LineOpsPlugin {
    fn name(&self) -> &str {
        "line-ops"
    }

    fn configure(&mut self, options: &BTreeMap<String, String>) {
        if let Some(unit) = options.get("indentUnit")
            && !unit.is_empty()
        {
            self.indent_unit = unit.clone();
        }
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        let edit = match message {
            EngineMessage::DuplicateLine => LineEdit::Duplicate,
            EngineMessage::DeleteLine => LineEdit::Delete,
            EngineMessage::MoveLineUp => LineEdit::MoveUp,
            EngineMessage::MoveLineDown => LineEdit::MoveDown,
            EngineMessage::Indent => LineEdit::Indent,
            EngineMessage::Outdent => LineEdit::Outdent,
            _ => return Ok(false),
        };
        self.run(edit, engine);
        Ok(true)
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec {
                id: "line-ops.duplicate".to_string(),
                name: "Duplicate Line".to_string(),
                category: "Line".to_string(),
                shortcut: Some("Ctrl+Shift+D".to_string()),
                description: None,
                message: EngineMessage::DuplicateLine,
            },
            CommandSpec {
                id: "line-ops.delete".to_string(),
                name: "Delete Line".to_string(),
                category: "Line".to_string(),
                shortcut: Some("Ctrl+Shift+K".to_string()),
                description: None,
                message: EngineMessage::DeleteLine,
            },
            CommandSpec {
                id: "line-ops.move-up".to_string(),
                name: "Move Line Up".to_string(),
                category: "Line".to_string(),
                shortcut: Some("Alt+Up".to_string()),
                description: None,
                message: EngineMessage::MoveLineUp,
            },
            CommandSpec {
                id: "line-ops.move-down".to_string(),
                name: "Move Line Down".to_string(),
                category: "Line".to_string(),
                shortcut: Some("Alt+Down".to_string()),
                description: None,
                message: EngineMessage::MoveLineDown,
            },
        ]
    }
}
