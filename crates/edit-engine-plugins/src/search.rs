//! Find / replace over the document, with match decorations.
//!
//! Matching is char-offset based and half-open. Queries compile to a regex
//! (literal queries are escaped first); whole-word filtering checks the
//! chars around a candidate match.

use edit_engine::cursor::CursorId;
use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::event::SurfaceEvent;
use edit_engine::hooks::{Hook, HookData, HookReply};
use edit_engine::messages::EngineMessage;
use edit_engine::overlay::DecorationNode;
use edit_engine::runtime::{CommandSpec, Plugin, PluginModule, VariantSupport};
use regex::RegexBuilder;
use thiserror::Error;

/// Decoration owner tag for search matches.
pub const SEARCH_OWNER: &str = "search";

/// Search options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Case-sensitive matching.
    pub case_sensitive: bool,
    /// Only whole-word matches.
    pub whole_word: bool,
    /// Treat the query as a regular expression.
    pub regex: bool,
}

/// Search failures.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query did not compile as a regular expression.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// A match, in half-open char offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start.
    pub start: usize,
    /// Exclusive end.
    pub end: usize,
}

impl SearchMatch {
    /// Whether the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Char/byte offset conversion over a fixed text.
struct CharIndex {
    byte_of_char: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut byte_of_char: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        byte_of_char.push(text.len());
        Self {
            byte_of_char,
            text_len: text.len(),
        }
    }

    fn char_count(&self) -> usize {
        self.byte_of_char.len() - 1
    }

    fn char_to_byte(&self, char_offset: usize) -> usize {
        self.byte_of_char
            .get(char_offset)
            .copied()
            .unwrap_or(self.text_len)
    }

    fn byte_to_char(&self, byte_offset: usize) -> usize {
        match self.byte_of_char.binary_search(&byte_offset) {
            Ok(index) => index,
            Err(index) => index.saturating_sub(1),
        }
    }
}

fn compile_search_regex(query: &str, options: SearchOptions) -> Result<regex::Regex, SearchError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };
    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()?)
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_whole_word(text: &str, index: &CharIndex, candidate: SearchMatch) -> bool {
    let before = candidate
        .start
        .checked_sub(1)
        .and_then(|at| text[index.char_to_byte(at)..].chars().next());
    let after = text[index.char_to_byte(candidate.end)..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Find all occurrences of `query` in `text`.
///
/// Empty queries and empty matches are dropped; ranges are char offsets.
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, SearchError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let re = compile_search_regex(query, options)?;
    let index = CharIndex::new(text);

    let mut matches = Vec::new();
    for m in re.find_iter(text) {
        let candidate = SearchMatch {
            start: index.byte_to_char(m.start()),
            end: index.byte_to_char(m.end()),
        };
        if candidate.is_empty() {
            continue;
        }
        if options.whole_word && !is_whole_word(text, &index, candidate) {
            continue;
        }
        matches.push(candidate);
    }
    Ok(matches)
}

/// Find the first occurrence at or after `from_char`, wrapping to the start.
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    let matches = find_all(text, query, options)?;
    Ok(matches
        .iter()
        .find(|m| m.start >= from_char)
        .or_else(|| matches.first())
        .copied())
}

/// Find the last occurrence strictly before `from_char`, wrapping to the end.
pub fn find_prev(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, SearchError> {
    let matches = find_all(text, query, options)?;
    Ok(matches
        .iter()
        .rev()
        .find(|m| m.start < from_char)
        .or_else(|| matches.last())
        .copied())
}

/// The search plugin: `find`, `find-next`, `find-previous`, `find-replace`.
pub struct SearchPlugin {
    query: String,
    options: SearchOptions,
    enabled: bool,
}

impl SearchPlugin {
    fn new() -> Self {
        Self {
            query: String::new(),
            options: SearchOptions::default(),
            enabled: false,
        }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "search",
            description: "Find and replace with match highlighting",
            category: "navigation",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/search"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(SearchPlugin::new()))),
        }
    }

    fn refresh_decorations(&self, engine: &mut Engine) {
        engine.clear_decorations(Some(SEARCH_OWNER));
        if !self.enabled || self.query.is_empty() {
            return;
        }
        let text = engine.text();
        let Ok(matches) = find_all(&text, &self.query, self.options) else {
            return;
        };
        for m in matches {
            for rect in engine.geometry_range(m.start, m.end) {
                engine.add_decoration(DecorationNode {
                    owner: Some(SEARCH_OWNER.to_string()),
                    rect,
                    class: "search-match".to_string(),
                    label: None,
                });
            }
        }
    }

    fn select_match(&self, engine: &mut Engine, m: SearchMatch) {
        engine.clear_secondary_cursors();
        engine.set_primary_selection(m.start, m.end);
    }

    fn find_from_caret(&self, engine: &mut Engine, forward: bool) -> Option<SearchMatch> {
        let text = engine.text();
        let caret = engine.cursors().primary().end;
        let result = if forward {
            find_next(&text, &self.query, self.options, caret)
        } else {
            find_prev(&text, &self.query, self.options, engine.cursors().primary().start)
        };
        match result {
            Ok(found) => found,
            Err(error) => {
                log::debug!("search failed: {error}");
                None
            }
        }
    }
}

impl Plugin for SearchPlugin {
    fn name(&self) -> &str {
        "search"
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::AfterInput, Hook::AfterOperation]
    }

    fn on_hook(
        &mut self,
        _hook: Hook,
        _event: &SurfaceEvent,
        _data: HookData,
        engine: &mut Engine,
    ) -> Result<HookReply, EngineError> {
        // Text changed; recompute match decorations.
        self.refresh_decorations(engine);
        Ok(HookReply::Continue)
    }

    fn enable(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        self.enabled = true;
        self.refresh_decorations(engine);
        Ok(())
    }

    fn disable(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        self.enabled = false;
        engine.clear_decorations(Some(SEARCH_OWNER));
        Ok(())
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::Find { query } => {
                self.query = query.clone();
                self.refresh_decorations(engine);
                if let Some(m) = self.find_from_caret(engine, true) {
                    self.select_match(engine, m);
                }
                Ok(true)
            }
            EngineMessage::FindNext => {
                if let Some(m) = self.find_from_caret(engine, true) {
                    self.select_match(engine, m);
                }
                Ok(true)
            }
            EngineMessage::FindPrevious => {
                if let Some(m) = self.find_from_caret(engine, false) {
                    self.select_match(engine, m);
                }
                Ok(true)
            }
            EngineMessage::FindReplace { query, replacement } => {
                self.query = query.clone();
                let text = engine.text();
                let primary = engine.cursors().primary();
                let current = SearchMatch {
                    start: primary.start,
                    end: primary.end,
                };

                // Replace only when the selection is exactly the current
                // match; otherwise just move to it.
                let selection_matches = !current.is_empty()
                    && find_next(&text, query, self.options, current.start)
                        .ok()
                        .flatten()
                        .is_some_and(|m| m == current);

                if selection_matches {
                    let mut operations = engine.create_text_operation();
                    for op in operations.iter_mut() {
                        if op.cursor_id == CursorId::Primary {
                            op.replacement = Some(replacement.clone());
                        } else {
                            op.skip();
                        }
                    }
                    engine.execute_operations(operations);
                }
                if let Some(m) = self.find_from_caret(engine, true) {
                    self.select_match(engine, m);
                }
                self.refresh_decorations(engine);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn commands(&self) -> Vec<CommandSpec> {
        vec![
            CommandSpec {
                id: "search.find-next".to_string(),
                name: "Find Next".to_string(),
                category: "Search".to_string(),
                shortcut: Some("F3".to_string()),
                description: None,
                message: EngineMessage::FindNext,
            },
            CommandSpec {
                id: "search.find-previous".to_string(),
                name: "Find Previous".to_string(),
                category: "Search".to_string(),
                shortcut: Some("Shift+F3".to_string()),
                description: None,
                message: EngineMessage::FindPrevious,
            },
        ]
    }

    fn destroy(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        engine.clear_decorations(Some(SEARCH_OWNER));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_all_is_char_offset_based() {
        let matches = find_all("héllo héllo", "héllo", SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[1].start, 6);
        assert_eq!(matches[1].end, 11);
    }

    #[test]
    fn whole_word_filters_substrings() {
        let options = SearchOptions {
            whole_word: true,
            ..SearchOptions::default()
        };
        let matches = find_all("cat catalog cat", "cat", options).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].start, 0);
        assert_eq!(matches[1].start, 12);
    }

    #[test]
    fn case_insensitive_by_default() {
        let matches = find_all("Foo foo FOO", "foo", SearchOptions::default()).unwrap();
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn invalid_regex_is_an_error() {
        let options = SearchOptions {
            regex: true,
            ..SearchOptions::default()
        };
        assert!(find_all("x", "(unclosed", options).is_err());
    }

    #[test]
    fn next_and_prev_wrap() {
        let text = "a b a b a";
        let options = SearchOptions::default();
        let next = find_next(text, "a", options, 9).unwrap().unwrap();
        assert_eq!(next.start, 0);
        let prev = find_prev(text, "a", options, 0).unwrap().unwrap();
        assert_eq!(prev.start, 8);
    }
}
