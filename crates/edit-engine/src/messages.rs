//! The host message surface.
//!
//! Hosts drive the engine with named messages. Engine-owned messages
//! (`undo`, `redo`, `edit-text-operation`, `toggle-*`) are handled directly;
//! everything else routes to the owning plugin's `on_message`. A message
//! whose plugin is absent is silently dropped (debug-logged), never an
//! error.

use serde::Serialize;

use crate::operation::OpParams;

/// A parsed host message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "message", rename_all = "kebab-case")]
pub enum EngineMessage {
    /// Run a named operation module over the current cursors.
    TextOperation {
        /// The operation module name.
        op: String,
        /// Operation parameters.
        params: OpParams,
    },
    /// Undo one step.
    Undo,
    /// Redo one step.
    Redo,
    /// Toggle a plugin on/off.
    TogglePlugin {
        /// The plugin name.
        plugin: String,
    },
    /// Start a search.
    Find {
        /// The search query.
        query: String,
    },
    /// Move to the next match.
    FindNext,
    /// Move to the previous match.
    FindPrevious,
    /// Replace the current match and find the next.
    FindReplace {
        /// The search query.
        query: String,
        /// The replacement text.
        replacement: String,
    },
    /// Fold the section at the primary caret.
    FoldSection,
    /// Unfold the section at the primary caret.
    UnfoldSection,
    /// Fold every section.
    FoldAll,
    /// Unfold every section.
    UnfoldAll,
    /// Duplicate the line(s) under each caret.
    DuplicateLine,
    /// Delete the line(s) under each caret.
    DeleteLine,
    /// Move the line(s) under each caret up.
    MoveLineUp,
    /// Move the line(s) under each caret down.
    MoveLineDown,
    /// Add a caret at the next occurrence of the primary selection.
    SelectNextOccurrence,
    /// Add carets at every occurrence of the primary selection.
    SelectAllOccurrences,
    /// Add a caret one visual line above the primary.
    AddCursorAbove,
    /// Add a caret one visual line below the primary.
    AddCursorBelow,
    /// Move the primary caret to a 1-based line number.
    GotoLine {
        /// 1-based target line.
        line: usize,
    },
    /// Jump to a named symbol (heading).
    GotoSymbol {
        /// The symbol text to match.
        symbol: String,
    },
    /// Jump between the bracket pair around the caret.
    JumpToBracket,
    /// List the named registers.
    OpenRegisters,
    /// Copy the selection(s) into a named register.
    CopyToRegister {
        /// Register name.
        register: String,
    },
    /// Paste a named register at every caret.
    PasteFromRegister {
        /// Register name.
        register: String,
    },
    /// Open the edit-history timeline.
    OpenHistory,
    /// Grow the selection structurally.
    ExpandSelection,
    /// Shrink the selection to the previous expansion.
    ShrinkSelection,
    /// Indent the selected lines.
    Indent,
    /// Outdent the selected lines.
    Outdent,
}

impl EngineMessage {
    /// Parse a `(name, param)` message pair from the host.
    ///
    /// Unknown names yield `None` and the caller drops the message. The
    /// `find-replace` param packs query and replacement as first and second
    /// line.
    pub fn parse(name: &str, param: &str) -> Option<Self> {
        let message = match name {
            "edit-text-operation" => EngineMessage::TextOperation {
                op: param.to_string(),
                params: OpParams::default(),
            },
            "undo" => EngineMessage::Undo,
            "redo" => EngineMessage::Redo,
            name if name.starts_with("toggle-") => EngineMessage::TogglePlugin {
                plugin: name["toggle-".len()..].to_string(),
            },
            "find" => EngineMessage::Find {
                query: param.to_string(),
            },
            "find-next" => EngineMessage::FindNext,
            "find-previous" => EngineMessage::FindPrevious,
            "find-replace" => {
                let mut lines = param.splitn(2, '\n');
                EngineMessage::FindReplace {
                    query: lines.next().unwrap_or_default().to_string(),
                    replacement: lines.next().unwrap_or_default().to_string(),
                }
            }
            "fold-section" => EngineMessage::FoldSection,
            "unfold-section" => EngineMessage::UnfoldSection,
            "fold-all" => EngineMessage::FoldAll,
            "unfold-all" => EngineMessage::UnfoldAll,
            "duplicate-line" => EngineMessage::DuplicateLine,
            "delete-line" => EngineMessage::DeleteLine,
            "move-line-up" => EngineMessage::MoveLineUp,
            "move-line-down" => EngineMessage::MoveLineDown,
            "select-next-occurrence" => EngineMessage::SelectNextOccurrence,
            "select-all-occurrences" => EngineMessage::SelectAllOccurrences,
            "add-cursor-above" => EngineMessage::AddCursorAbove,
            "add-cursor-below" => EngineMessage::AddCursorBelow,
            "goto-line" => EngineMessage::GotoLine {
                line: param.trim().parse().ok()?,
            },
            "goto-symbol" => EngineMessage::GotoSymbol {
                symbol: param.to_string(),
            },
            "jump-to-bracket" => EngineMessage::JumpToBracket,
            "open-registers" => EngineMessage::OpenRegisters,
            "copy-to-register" => EngineMessage::CopyToRegister {
                register: param.to_string(),
            },
            "paste-from-register" => EngineMessage::PasteFromRegister {
                register: param.to_string(),
            },
            "open-history" => EngineMessage::OpenHistory,
            "expand-selection" => EngineMessage::ExpandSelection,
            "shrink-selection" => EngineMessage::ShrinkSelection,
            "indent" => EngineMessage::Indent,
            "outdent" => EngineMessage::Outdent,
            _ => return None,
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert!(matches!(
            EngineMessage::parse("undo", ""),
            Some(EngineMessage::Undo)
        ));
        assert!(matches!(
            EngineMessage::parse("toggle-search", ""),
            Some(EngineMessage::TogglePlugin { plugin }) if plugin == "search"
        ));
        assert!(matches!(
            EngineMessage::parse("goto-line", "12"),
            Some(EngineMessage::GotoLine { line: 12 })
        ));
    }

    #[test]
    fn unknown_names_drop() {
        assert!(EngineMessage::parse("frobnicate", "").is_none());
        assert!(EngineMessage::parse("goto-line", "not a number").is_none());
    }

    #[test]
    fn find_replace_packs_two_lines() {
        let Some(EngineMessage::FindReplace { query, replacement }) =
            EngineMessage::parse("find-replace", "foo\nbar")
        else {
            panic!("expected find-replace");
        };
        assert_eq!(query, "foo");
        assert_eq!(replacement, "bar");
    }
}
