//! Plugin runtime: discovery, capability gating, lifecycle, and hook
//! registration state.
//!
//! A plugin ships as a [`PluginModule`]: static metadata plus a constructor.
//! At boot the engine walks the registered modules, builds metadata for every
//! one of them (even those it skips), gates on the `supports` declaration
//! against the engine variant, and constructs the supported ones under
//! containment: a failing constructor is logged and the plugin simply never
//! registers.
//!
//! Hook dispatch and the lifecycle calls live on
//! [`Engine`](crate::engine::Engine), which owns both the runtime and the
//! state plugins act on; the runtime here is the bookkeeping.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::event::SurfaceEvent;
use crate::hooks::{Hook, HookData, HookReply};
use crate::messages::EngineMessage;

/// Which engine variants a plugin supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VariantSupport {
    /// Works in the inline (single-caret) variant.
    pub inline: bool,
    /// Works in the framed (multi-caret) variant.
    pub framed: bool,
}

impl Default for VariantSupport {
    fn default() -> Self {
        Self {
            inline: true,
            framed: true,
        }
    }
}

impl VariantSupport {
    /// Support in both variants.
    pub const BOTH: Self = Self {
        inline: true,
        framed: true,
    };
    /// Framed-only support.
    pub const FRAMED_ONLY: Self = Self {
        inline: false,
        framed: true,
    };
}

/// Why a plugin is in its current lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PluginReason {
    /// Module seen, nothing else happened yet.
    Loaded,
    /// Instance constructed and registered.
    Registered,
    /// Enabled.
    Enabled,
    /// Disabled.
    Disabled,
    /// The current engine variant is unsupported.
    Unsupported,
    /// Configuration referenced a module that never registered.
    NotRegistered,
    /// Indeterminate.
    Unknown,
}

/// Per-variant lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginStatus {
    /// Whether the current variant is supported.
    pub supported: bool,
    /// Whether the plugin is currently enabled.
    pub enabled: bool,
    /// Why the plugin is in this state.
    pub reason: PluginReason,
}

/// Metadata kept for every module, present even when the plugin was skipped.
#[derive(Debug, Clone, Serialize)]
pub struct PluginMetadata {
    /// The module title as registered.
    pub title: String,
    /// The plugin name (may be re-keyed to the instance's name).
    pub name: String,
    /// Store item whose text overrides `default_enabled`.
    pub config_key: Option<String>,
    /// Fallback configuration item.
    pub config_key_alt: Option<String>,
    /// Enabled when no configuration says otherwise.
    pub default_enabled: bool,
    /// Human description.
    pub description: String,
    /// Grouping category.
    pub category: String,
    /// Declared variant support.
    pub supports: VariantSupport,
    /// Status for the booted variant.
    pub status: PluginStatus,
}

/// A plugin instance.
///
/// Lifecycle and hook methods return `Result`; the engine logs failures and
/// continues; a plugin can never abort the pipeline.
pub trait Plugin {
    /// Stable plugin name.
    fn name(&self) -> &str;

    /// The hooks this plugin wants, bound in discovery order.
    fn hooks(&self) -> &[Hook] {
        &[]
    }

    /// Handle one hook dispatch.
    fn on_hook(
        &mut self,
        hook: Hook,
        event: &SurfaceEvent,
        data: HookData,
        engine: &mut Engine,
    ) -> Result<HookReply, EngineError> {
        let _ = (hook, event, data, engine);
        Ok(HookReply::Continue)
    }

    /// Called once after registration.
    fn on_register(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let _ = engine;
        Ok(())
    }

    /// Enable the plugin.
    fn enable(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let _ = engine;
        Ok(())
    }

    /// Disable the plugin.
    fn disable(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let _ = engine;
        Ok(())
    }

    /// Push host configuration options into the plugin.
    fn configure(&mut self, options: &BTreeMap<String, String>) {
        let _ = options;
    }

    /// Handle a host message routed to plugins. Return `Ok(true)` when this
    /// plugin owned the message.
    fn on_message(
        &mut self,
        message: &EngineMessage,
        engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        let _ = (message, engine);
        Ok(false)
    }

    /// Commands to surface in a host command palette.
    fn commands(&self) -> Vec<CommandSpec> {
        Vec::new()
    }

    /// Called at engine destruction.
    fn destroy(&mut self, engine: &mut Engine) -> Result<(), EngineError> {
        let _ = engine;
        Ok(())
    }
}

/// A palette-facing command descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct CommandSpec {
    /// Stable command id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Grouping category.
    pub category: String,
    /// Optional shortcut hint.
    pub shortcut: Option<String>,
    /// Optional description.
    pub description: Option<String>,
    /// The message the command sends when invoked.
    pub message: EngineMessage,
}

/// Constructor signature for plugin modules.
pub type PluginConstructor = Box<dyn Fn(&mut Engine) -> Result<Box<dyn Plugin>, EngineError>>;

/// A registered plugin module: static metadata plus a constructor.
pub struct PluginModule {
    /// Plugin name (the metadata key before any instance re-key).
    pub name: &'static str,
    /// Human description.
    pub description: &'static str,
    /// Grouping category.
    pub category: &'static str,
    /// Enabled when no configuration says otherwise.
    pub default_enabled: bool,
    /// Declared variant support.
    pub supports: VariantSupport,
    /// Store item whose text overrides `default_enabled`.
    pub config_key: Option<&'static str>,
    /// Fallback configuration item.
    pub config_key_alt: Option<&'static str>,
    /// Instance constructor.
    pub create: PluginConstructor,
}

pub(crate) struct PluginSlot {
    pub(crate) name: String,
    pub(crate) instance: Option<Box<dyn Plugin>>,
}

/// Runtime bookkeeping: slots, hook bindings, metadata.
#[derive(Default)]
pub struct PluginRuntime {
    pub(crate) slots: Vec<PluginSlot>,
    /// `(hook, slot index)` pairs in registration order.
    pub(crate) bindings: Vec<(Hook, usize)>,
    metadata: BTreeMap<String, PluginMetadata>,
}

impl PluginRuntime {
    /// Metadata for every module seen at boot, keyed by plugin name.
    pub fn metadata(&self) -> &BTreeMap<String, PluginMetadata> {
        &self.metadata
    }

    /// Metadata for one plugin.
    pub fn metadata_of(&self, name: &str) -> Option<&PluginMetadata> {
        self.metadata.get(name)
    }

    /// Names of the registered (constructed) plugins, in discovery order.
    pub fn registered(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.name.clone()).collect()
    }

    /// Whether `name` registered an instance.
    pub fn is_registered(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.name == name)
    }

    pub(crate) fn insert_metadata(&mut self, meta: PluginMetadata) {
        self.metadata.insert(meta.name.clone(), meta);
    }

    pub(crate) fn metadata_mut(&mut self, name: &str) -> Option<&mut PluginMetadata> {
        self.metadata.get_mut(name)
    }

    pub(crate) fn slot_index(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|slot| slot.name == name)
    }

    pub(crate) fn take_instance(&mut self, index: usize) -> Option<Box<dyn Plugin>> {
        self.slots.get_mut(index)?.instance.take()
    }

    pub(crate) fn put_instance(&mut self, index: usize, instance: Box<dyn Plugin>) {
        if let Some(slot) = self.slots.get_mut(index) {
            slot.instance = Some(instance);
        }
    }

    pub(crate) fn bindings_for(&self, hook: Hook) -> Vec<usize> {
        self.bindings
            .iter()
            .filter(|(bound, _)| *bound == hook)
            .map(|(_, index)| *index)
            .collect()
    }

    pub(crate) fn register(&mut self, name: String, instance: Box<dyn Plugin>) -> usize {
        let hooks: Vec<Hook> = instance.hooks().to_vec();
        let index = self.slots.len();
        self.slots.push(PluginSlot {
            name,
            instance: Some(instance),
        });
        for hook in hooks {
            self.bindings.push((hook, index));
        }
        index
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.bindings.clear();
    }
}
