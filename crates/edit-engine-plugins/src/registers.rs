//! Named-register clipboard.
//!
//! Registers persist in the content store as a JSON map so they survive the
//! engine. The `"+"` register stands for the system clipboard: writes are
//! forwarded to the host asynchronously, so a synchronous read can only
//! surface what was last written from this engine, never arbitrary OS state.

use std::collections::BTreeMap;

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};

/// Store item holding the serialized registers.
pub const REGISTERS_ITEM: &str = "editor/registers";

/// The clipboard register name.
pub const CLIPBOARD_REGISTER: &str = "+";

/// The registers plugin.
pub struct RegistersPlugin {
    clipboard_echo: Option<String>,
}

impl RegistersPlugin {
    fn new() -> Self {
        Self {
            clipboard_echo: None,
        }
    }

    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "registers",
            description: "Named register clipboard",
            category: "editing",
            default_enabled: true,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/registers"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(RegistersPlugin::new()))),
        }
    }

    fn load(&self, engine: &Engine) -> BTreeMap<String, String> {
        engine
            .store()
            .text(REGISTERS_ITEM)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    fn save(&self, engine: &mut Engine, registers: &BTreeMap<String, String>) {
        match serde_json::to_string(registers) {
            Ok(raw) => engine.store_mut().set_text(REGISTERS_ITEM, None, &raw),
            Err(error) => log::warn!("failed to serialize registers: {error}"),
        }
    }

    /// Read a register. The clipboard register echoes this engine's last
    /// write only.
    pub fn read(&self, engine: &Engine, register: &str) -> Option<String> {
        if register == CLIPBOARD_REGISTER {
            return self.clipboard_echo.clone();
        }
        self.load(engine).get(register).cloned()
    }

    /// The register names with content, for a host picker UI.
    pub fn list(&self, engine: &Engine) -> Vec<String> {
        let mut names: Vec<String> = self.load(engine).keys().cloned().collect();
        if self.clipboard_echo.is_some() {
            names.push(CLIPBOARD_REGISTER.to_string());
        }
        names
    }

    fn copy_to(&mut self, engine: &mut Engine, register: &str) {
        let text = engine.text();
        let selections: Vec<String> = engine
            .cursors()
            .cursors()
            .iter()
            .filter(|c| !c.is_collapsed())
            .map(|c| text.chars().skip(c.start).take(c.end - c.start).collect())
            .collect();
        if selections.is_empty() {
            return;
        }
        let joined = selections.join("\n");

        if register == CLIPBOARD_REGISTER {
            self.clipboard_echo = Some(joined);
            return;
        }
        let mut registers = self.load(engine);
        registers.insert(register.to_string(), joined);
        self.save(engine, &registers);
    }

    fn paste_from(&self, engine: &mut Engine, register: &str) {
        let Some(content) = self.read(engine, register) else {
            return;
        };
        engine.insert_at_all_cursors(&content);
    }
}

impl Plugin for RegistersPlugin {
    fn name(&self) -> &str {
        "registers"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            EngineMessage::CopyToRegister { register } => {
                self.copy_to(engine, register);
                Ok(true)
            }
            EngineMessage::PasteFromRegister { register } => {
                self.paste_from(engine, register);
                Ok(true)
            }
            EngineMessage::OpenRegisters => {
                // The picker UI is host-owned; listing is available through
                // `list`.
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::engine::EngineSetup;

    fn engine_with(text: &str) -> Engine {
        let mut setup = EngineSetup::framed(text);
        setup.modules = vec![RegistersPlugin::module()];
        Engine::new(setup)
    }

    #[test]
    fn copy_paste_round_trip_through_the_store() {
        let mut engine = engine_with("hello world");
        engine.set_primary_selection(0, 5);
        engine.handle_message(EngineMessage::CopyToRegister {
            register: "a".to_string(),
        });

        // The register survives in the store as JSON.
        let raw = engine.store().text(REGISTERS_ITEM).unwrap();
        assert!(raw.contains("hello"));

        engine.set_primary_selection(11, 11);
        engine.handle_message(EngineMessage::PasteFromRegister {
            register: "a".to_string(),
        });
        assert_eq!(engine.text(), "hello worldhello");
    }

    #[test]
    fn multi_caret_copy_joins_selections() {
        let mut engine = engine_with("aa bb");
        engine.set_primary_selection(0, 2);
        engine.add_cursor(3, 5);
        engine.handle_message(EngineMessage::CopyToRegister {
            register: "x".to_string(),
        });

        let plugin = RegistersPlugin::new();
        let value = plugin.load(&engine);
        assert_eq!(value.get("x").map(String::as_str), Some("aa\nbb"));
    }

    #[test]
    fn clipboard_register_echoes_only_our_writes() {
        let mut engine = engine_with("secret");
        let mut plugin = RegistersPlugin::new();
        assert_eq!(plugin.read(&engine, CLIPBOARD_REGISTER), None);

        engine.set_primary_selection(0, 6);
        plugin.copy_to(&mut engine, CLIPBOARD_REGISTER);
        assert_eq!(
            plugin.read(&engine, CLIPBOARD_REGISTER).as_deref(),
            Some("secret")
        );
        // Nothing was persisted for the clipboard register.
        assert!(engine.store().text(REGISTERS_ITEM).is_none());
    }
}
