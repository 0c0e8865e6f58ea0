//! Smart indentation: newline keeps the current line's leading whitespace.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::event::{InputType, SurfaceEvent};
use edit_engine::hooks::{Hook, HookData, HookReply};
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};
use edit_engine::text::leading_whitespace_at;

/// The smart-indent plugin.
pub struct SmartIndentPlugin {
    enabled: bool,
}

impl SmartIndentPlugin {
    fn new() -> Self {
        Self { enabled: false }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "smart-indent",
            description: "Continue the current indentation on newline",
            category: "typing",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/smart-indent"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(SmartIndentPlugin::new()))),
        }
    }
}

impl Plugin for SmartIndentPlugin {
    fn name(&self) -> &str {
        "smart-indent"
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
        if input.is_composing
            || !matches!(
                input.input_type,
                InputType::InsertLineBreak | InputType::InsertParagraph
            )
        {
            return Ok(HookReply::Continue);
        }

        let text = engine.text();
        let indent = leading_whitespace_at(&text, engine.cursors().primary().start);
        if indent.is_empty() {
            return Ok(HookReply::Continue);
        }
        Ok(HookReply::Replace(HookData::Text(format!("\n{indent}"))))
    }
}
