//! Bracket pairing: auto-close, wrap, and skip-over, driven from the
//! `beforeInput` hook.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::event::{InputType, SurfaceEvent};
use edit_engine::hooks::{Hook, HookData, HookReply};
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};
use edit_engine::text::char_len;

fn closing_for(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        '"' => Some('"'),
        _ => None,
    }
}

fn is_closing(ch: char) -> bool {
    matches!(ch, ')' | ']' | '}' | '"')
}

/// The bracket-pairing plugin.
pub struct BracketPairsPlugin {
    enabled: bool,
}

impl BracketPairsPlugin {
    fn new() -> Self {
        Self { enabled: false }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "bracket-pairs",
            description: "Auto-close, wrap, and skip matching brackets",
            category: "typing",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/bracket-pairs"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(BracketPairsPlugin::new()))),
        }
    }

    /// Auto-close or wrap at every caret; returns `true` when handled.
    fn pair_at_carets(&self, engine: &mut Engine, open: char, close: char) -> bool {
        let mut operations = engine.create_text_operation();
        for op in operations.iter_mut() {
            let inner = op.selection.clone();
            op.replacement = Some(format!("{open}{inner}{close}"));
            if inner.is_empty() {
                let caret = op.sel_start + 1;
                op.new_sel_start = Some(caret);
                op.new_sel_end = Some(caret);
            } else {
                op.new_sel_start = Some(op.sel_start + 1);
                op.new_sel_end = Some(op.sel_start + 1 + char_len(&inner));
            }
        }
        engine.execute_operations(operations);
        true
    }

    /// Typing a closing bracket right before the same char skips over it.
    fn skip_over(&self, engine: &mut Engine, close: char) -> bool {
        let primary = engine.cursors().primary();
        if !primary.is_collapsed() {
            return false;
        }
        let at = primary.start;
        let next = engine.text().chars().nth(at);
        if next == Some(close) {
            engine.set_primary_selection(at + 1, at + 1);
            return true;
        }
        false
    }
}

impl Plugin for BracketPairsPlugin {
    fn name(&self) -> &str {
        "bracket-pairs"
    }

    fn hooks(&self) -> &[Hook] {
        &[Hook::BeforeInput]
    }

    fn enable(&mut self, _engine: &mut Engine) -> Result<(), EngineError> {
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self, _engine: &mut Engine) -> Result<(), EngineError> {
        self.enabled = false;
        Ok(())
    }

    fn on_hook(
        &mut self,
        _hook: Hook,
        event: &SurfaceEvent,
        _data: HookData,
        engine: &mut Engine,
    ) -> Result<HookReply, EngineError> {
        if !self.enabled || engine.is_composing() {
            return Ok(HookReply::Continue);
        }
        let SurfaceEvent::BeforeInput(input) = event else {
            return Ok(HookReply::Continue);
        };
        if input.input_type != InputType::InsertText || input.is_composing {
            return Ok(HookReply::Continue);
        }
        let Some(data) = input.data.as_deref() else {
            return Ok(HookReply::Continue);
        };
        let mut chars = data.chars();
        let (Some(ch), None) = (chars.next(), chars.next()) else {
            return Ok(HookReply::Continue);
        };

        if let Some(close) = closing_for(ch) {
            // `"` both opens and closes; prefer skipping over an existing one.
            if is_closing(ch) && self.skip_over(engine, ch) {
                return Ok(HookReply::Prevent);
            }
            if self.pair_at_carets(engine, ch, close) {
                return Ok(HookReply::Prevent);
            }
        } else if is_closing(ch) && self.skip_over(engine, ch) {
            return Ok(HookReply::Prevent);
        }

        Ok(HookReply::Continue)
    }
}
