//! Navigation: goto-line, goto-symbol, jump-to-bracket.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};

use crate::fold::section_regions;

const OPEN_BRACKETS: [char; 3] = ['(', '[', '{'];
const CLOSE_BRACKETS: [char; 3] = [')', ']', '}'];

fn partner_of(bracket: char) -> Option<(char, bool)> {
    match bracket {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

/// Offset of the bracket matching the one at `offset`, balance-counted.
pub fn match_bracket(text: &str, offset: usize) -> Option<usize> {
    let chars: Vec<char> = text.chars().collect();
    let bracket = *chars.get(offset)?;
    let (partner, forward) = partner_of(bracket)?;

    let mut depth = 0usize;
    if forward {
        for (index, &ch) in chars.iter().enumerate().skip(offset) {
            if ch == bracket {
                depth += 1;
            } else if ch == partner {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
        }
    } else {
        for index in (0..=offset).rev() {
            let ch = chars[index];
            if ch == bracket {
                depth += 1;
            } else if ch == partner {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
        }
    }
    None
}

/// A document symbol (heading) for goto-symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSymbol {
    /// The heading text, markers stripped.
    pub name: String,
    /// The heading's logical line.
    pub line: usize,
}

/// All heading symbols of `text`, in document order.
pub fn document_symbols(text: &str) -> Vec<DocumentSymbol> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut symbols: Vec<DocumentSymbol> = section_regions(text)
        .iter()
        .map(|region| {
            let raw = lines.get(region.heading_line).copied().unwrap_or("");
            DocumentSymbol {
                name: raw
                    .trim_start()
                    .trim_start_matches(['!', '#'])
                    .trim()
                    .to_string(),
                line: region.heading_line,
            }
        })
        .collect();
    symbols.dedup();
    symbols
}

/// The navigation plugin.
pub struct NavigationPlugin;

impl NavigationPlugin {
    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "navigation",
            description: "Goto line/symbol and bracket jumping",
            category: "navigation",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/navigation"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(NavigationPlugin))),
        }
    }

    fn goto_line(&self, engine: &mut Engine, line_1based: usize) {
        let index = engine.line_index();
        let line = line_1based.saturating_sub(1).min(index.line_count().saturating_sub(1));
        let offset = index.line_start(line);
        engine.clear_secondary_cursors();
        engine.set_primary_selection(offset, offset);
    }

    fn goto_symbol(&self, engine: &mut Engine, symbol: &str) {
        let text = engine.text();
        let needle = symbol.trim().to_lowercase();
        let Some(found) = document_symbols(&text)
            .into_iter()
            .find(|s| s.name.to_lowercase().contains(&needle))
        else {
            return;
        };
        let index = engine.line_index();
        let offset = index.line_start(found.line);
        engine.clear_secondary_cursors();
        engine.set_primary_selection(offset, offset);
    }

    fn jump_to_bracket(&self, engine: &mut Engine) {
        let text = engine.text();
        let chars: Vec<char> = text.chars().collect();
        let caret = engine.cursors().primary().end;

        // Prefer the bracket under the caret, then the one just before it.
        let candidate = [caret, caret.saturating_sub(1)]
            .into_iter()
            .find(|&at| {
                chars
                    .get(at)
                    .is_some_and(|c| OPEN_BRACKETS.contains(c) || CLOSE_BRACKETS.contains(c))
            });
        let Some(at) = candidate else {
            return;
        };
        if let Some(target) = match_bracket(&text, at) {
            engine.set_primary_selection(target, target);
        }
    }
}

impl Plugin for NavigationPlugin {
    fn name(&self) -> &str {
        "navigation"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::GotoLine { line } => {
                self.goto_line(engine, *line);
                Ok(true)
            }
            EngineMessage::GotoSymbol { symbol } => {
                self.goto_symbol(engine, symbol);
                Ok(true)
            }
            EngineMessage::JumpToBracket => {
                self.jump_to_bracket(engine);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
