//! Multi-caret gestures: occurrence selection and caret stacking.
//!
//! Framed-only: the inline variant pins the cursor set to a single caret.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::runtime::{CommandSpec, Plugin, PluginModule, VariantSupport};
use edit_engine::text::{byte_of_char, char_of_byte};
use unicode_segmentation::UnicodeSegmentation;

use crate::search::{SearchOptions, find_all};

/// Expand a collapsed caret to the word around `offset`. Returns `None` when
/// the caret is not inside a word.
fn word_at(text: &str, offset: usize) -> Option<(usize, usize)> {
    let byte_offset = byte_of_char(text, offset);
    for (start_byte, word) in text.split_word_bound_indices() {
        let end_byte = start_byte + word.len();
        if start_byte <= byte_offset && byte_offset <= end_byte {
            if word.chars().any(|c| c.is_alphanumeric() || c == '_') {
                return Some((char_of_byte(text, start_byte), char_of_byte(text, end_byte)));
            }
            // A caret on whitespace/punctuation may still touch the word
            // that ends here; keep scanning.
            if byte_offset < end_byte {
                return None;
            }
        }
    }
    None
}

/// The multi-caret gesture plugin.
pub struct MultiCaretPlugin;

impl MultiCaretPlugin {
    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "multi-caret",
            description: "Occurrence selection and caret stacking",
            category: "editing",
            default_enabled: true,
            supports: VariantSupport::FRAMED_ONLY,
            config_key: Some("config/editor/multi-caret"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(MultiCaretPlugin))),
        }
    }

    /// The primary selection text, expanding a collapsed caret to its word.
    fn occurrence_query(&self, engine: &mut Engine) -> Option<(String, SearchOptions)> {
        let text = engine.text();
        let primary = engine.cursors().primary().clone();
        if primary.is_collapsed() {
            let (start, end) = word_at(&text, primary.start)?;
            engine.set_primary_selection(start, end);
            let query: String =
                text.chars().skip(start).take(end - start).collect();
            Some((
                query,
                SearchOptions {
                    case_sensitive: true,
                    whole_word: true,
                    regex: false,
                },
            ))
        } else {
            let query: String = text
                .chars()
                .skip(primary.start)
                .take(primary.end - primary.start)
                .collect();
            Some((
                query,
                SearchOptions {
                    case_sensitive: true,
                    whole_word: false,
                    regex: false,
                },
            ))
        }
    }

    fn select_next_occurrence(&self, engine: &mut Engine) {
        let Some((query, options)) = self.occurrence_query(engine) else {
            return;
        };
        let text = engine.text();
        let Ok(matches) = find_all(&text, &query, options) else {
            return;
        };

        let covered: Vec<(usize, usize)> = engine
            .cursors()
            .cursors()
            .iter()
            .map(|c| (c.start, c.end))
            .collect();
        let last_end = covered.iter().map(|&(_, end)| end).max().unwrap_or(0);

        let next = matches
            .iter()
            .find(|m| m.start >= last_end && !covered.contains(&(m.start, m.end)))
            .or_else(|| {
                matches
                    .iter()
                    .find(|m| !covered.contains(&(m.start, m.end)))
            });
        if let Some(m) = next {
            engine.add_cursor(m.start, m.end);
        }
    }

    fn select_all_occurrences(&self, engine: &mut Engine) {
        let Some((query, options)) = self.occurrence_query(engine) else {
            return;
        };
        let text = engine.text();
        let Ok(matches) = find_all(&text, &query, options) else {
            return;
        };
        let primary = (
            engine.cursors().primary().start,
            engine.cursors().primary().end,
        );
        for m in matches {
            if (m.start, m.end) != primary {
                engine.add_cursor(m.start, m.end);
            }
        }
    }

    fn add_cursor_vertically(&self, engine: &mut Engine, delta: isize) {
        let index = engine.line_index();
        let primary = engine.cursors().primary();
        let (line, column) = index.position_of(primary.end);
        let target = line as isize + delta;
        if target < 0 || target as usize >= index.line_count() {
            return;
        }
        let offset = index.offset_of(target as usize, column);
        engine.add_cursor(offset, offset);
    }
}

impl Plugin for MultiCaretPlugin {
    fn name(&self) -> &str {
        "multi-caret"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::SelectNextOccurrence => {
                self.select_next_occurrence(engine);
                Ok(true)
            }
            EngineMessage::SelectAllOccurrences => {
                self.select_all_occurrences(engine);
                Ok(true)
            }
            EngineMessage::AddCursorAbove => {
                self.add_cursor_vertically(engine, -1);
                Ok(true)
            }
            EngineMessage::AddCursorBelow => {
                self.add_cursor_vertically(engine, 1);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![CommandSpec {
            id: "multi-caret.select-next".to_string(),
            name: "Select Next Occurrence".to_string(),
            category: "Selection".to_string(),
            shortcut: Some("Ctrl+D".to_string()),
            description: None,
            message: EngineMessage::SelectNextOccurrence,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::engine::EngineSetup;

    fn engine_with(text: &str) -> Engine {
        let mut setup = EngineSetup::framed(text);
        setup.modules = vec![MultiCaretPlugin::module()];
        Engine::new(setup)
    }

    #[test]
    fn word_at_finds_boundaries() {
        assert_eq!(word_at("foo bar", 1), Some((0, 3)));
        assert_eq!(word_at("foo bar", 4), Some((4, 7)));
        assert_eq!(word_at("foo bar", 3), Some((0, 3)));
    }

    #[test]
    fn select_next_occurrence_expands_then_adds() {
        let mut engine = engine_with("cat dog cat dog cat");
        engine.set_primary_selection(1, 1);

        engine.handle_message(EngineMessage::SelectNextOccurrence);
        let primary = engine.cursors().primary().clone();
        assert_eq!((primary.start, primary.end), (0, 3));
        assert_eq!(engine.cursors().len(), 2);

        engine.handle_message(EngineMessage::SelectNextOccurrence);
        assert_eq!(engine.cursors().len(), 3);
        let ranges: Vec<(usize, usize)> = engine
            .cursors()
            .cursors()
            .iter()
            .map(|c| (c.start, c.end))
            .collect();
        assert_eq!(ranges, vec![(0, 3), (8, 11), (16, 19)]);
    }

    #[test]
    fn select_all_occurrences_covers_the_document() {
        let mut engine = engine_with("x y x y x");
        engine.set_primary_selection(0, 1);
        engine.handle_message(EngineMessage::SelectAllOccurrences);
        assert_eq!(engine.cursors().len(), 3);
    }

    #[test]
    fn add_cursor_below_preserves_the_column() {
        let mut engine = engine_with("abcdef\nabc\nabcdef");
        engine.set_primary_selection(4, 4);
        engine.handle_message(EngineMessage::AddCursorBelow);
        let ranges: Vec<usize> = engine
            .cursors()
            .cursors()
            .iter()
            .map(|c| c.start)
            .collect();
        // Column 4 clamps to the short line's end.
        assert_eq!(ranges, vec![4, 10]);
    }

    #[test]
    fn add_cursor_above_at_the_first_line_is_a_no_op() {
        let mut engine = engine_with("ab\ncd");
        engine.set_primary_selection(1, 1);
        engine.handle_message(EngineMessage::AddCursorAbove);
        assert_eq!(engine.cursors().len(), 1);
    }
}
