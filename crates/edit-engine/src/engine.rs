//! The editor engine: variants, boot, state, operation execution, plugin
//! lifecycle, and destruction discipline.
//!
//! An [`Engine`] owns the surface, the cursor set, the undo log, the overlay
//! (framed variant), and its plugins. Hosts construct one via
//! [`EngineSetup`], feed it surface events through the pipeline entry points
//! (see the `pipeline` module), and drive features through
//! [`EngineMessage`]s.
//!
//! The engine never panics on host input and never propagates plugin
//! failures: every plugin call is contained and logged, and a destroyed
//! engine turns every entry point into a no-op.

use std::collections::BTreeMap;

use log::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::{EngineConfig, parse_flag};
use crate::cursor::{
    Cursor, CursorId, CursorSet, DeleteDirection, delete_at_cursors, delete_selections,
    insert_at_cursors,
};
use crate::event::{KeyEvent, SurfaceEvent};
use crate::frame::{FrameDocument, FramePalette};
use crate::geometry::{self, CaretRect, RangeRect};
use crate::history::{Snapshot, UndoLog};
use crate::hooks::{Hook, HookData, HookOutcome, HookReply};
use crate::line_index::LineIndex;
use crate::messages::EngineMessage;
use crate::operation::{
    self, OpParams, OperationInput, OperationModule, TextOperation, adjusted_range,
};
use crate::overlay::{DecorationNode, Overlay};
use crate::runtime::{
    CommandSpec, Plugin, PluginMetadata, PluginModule, PluginReason, PluginRuntime, PluginStatus,
};
use crate::store::{ContentStore, MemoryStore};
use crate::surface::{BufferSurface, ScrollOffsets, SelectionRange, Surface, SurfaceLayout};
use crate::text::char_len;

/// Host persistence callback.
pub type SaveChanges = Box<dyn FnMut(&str)>;

/// Host action-script callback: `(script, current_text)`.
pub type ActionInvoker = Box<dyn FnMut(&str, &str)>;

/// A key pre-handler (global keyboard manager or host widget). Returns `true`
/// when it consumed the key.
pub type KeyHandler = Box<dyn FnMut(&KeyEvent) -> bool>;

/// The engine capabilities tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineVariant {
    /// Mounted directly in the host document; single caret, no overlay.
    Inline,
    /// Isolated in a nested browsing context; multi-caret with overlay.
    Framed,
}

impl EngineVariant {
    /// Whether this variant supports more than one caret.
    pub fn multi_caret(&self) -> bool {
        matches!(self, EngineVariant::Framed)
    }

    /// Whether this variant draws an overlay.
    pub fn has_overlay(&self) -> bool {
        matches!(self, EngineVariant::Framed)
    }
}

/// Everything needed to boot an engine.
pub struct EngineSetup {
    /// Inline or framed.
    pub variant: EngineVariant,
    /// Parsed host attributes.
    pub config: EngineConfig,
    /// The editable surface.
    pub surface: Box<dyn Surface>,
    /// The host's content store.
    pub store: Box<dyn ContentStore>,
    /// Millisecond time source.
    pub clock: Box<dyn Clock>,
    /// Plugin modules to discover.
    pub modules: Vec<PluginModule>,
    /// Operation modules addressable by `edit-text-operation`.
    pub operations: Vec<Box<dyn OperationModule>>,
    /// Frame colors (framed variant).
    pub palette: FramePalette,
}

impl EngineSetup {
    /// A setup for the given variant with an in-memory surface holding
    /// `text` and otherwise default collaborators.
    pub fn headless(variant: EngineVariant, text: &str) -> Self {
        Self {
            variant,
            config: EngineConfig::default(),
            surface: Box::new(BufferSurface::new(text)),
            store: Box::new(MemoryStore::new()),
            clock: Box::new(SystemClock),
            modules: Vec::new(),
            operations: Vec::new(),
            palette: FramePalette::default(),
        }
    }

    /// An inline setup over an in-memory surface.
    pub fn inline(text: &str) -> Self {
        Self::headless(EngineVariant::Inline, text)
    }

    /// A framed setup over an in-memory surface.
    pub fn framed(text: &str) -> Self {
        Self::headless(EngineVariant::Framed, text)
    }
}

/// The editor engine.
pub struct Engine {
    variant: EngineVariant,
    config: EngineConfig,
    pub(crate) surface: Box<dyn Surface>,
    store: Box<dyn ContentStore>,
    clock: Box<dyn Clock>,
    pub(crate) cursors: CursorSet,
    pub(crate) history: UndoLog,
    overlay: Option<Overlay>,
    pub(crate) runtime: PluginRuntime,
    operations: Vec<Box<dyn OperationModule>>,
    frame: Option<FrameDocument>,
    saver: Option<SaveChanges>,
    action_invoker: Option<ActionInvoker>,
    keyboard_handler: Option<KeyHandler>,
    host_key_handler: Option<KeyHandler>,
    pub(crate) last_known_text: String,
    pub(crate) last_known_selection: SelectionRange,
    pub(crate) composing: bool,
    pub(crate) destroyed: bool,
}

impl Engine {
    /// Boot an engine: build the frame document (framed variant), seed the
    /// undo log, discover plugins, apply plugin configuration, and honor the
    /// focus-on-mount settings.
    pub fn new(setup: EngineSetup) -> Self {
        let EngineSetup {
            variant,
            config,
            surface,
            store,
            clock,
            modules,
            operations,
            palette,
        } = setup;

        let frame = variant
            .has_overlay()
            .then(|| FrameDocument::build(&config, &palette));
        let overlay = variant.has_overlay().then(Overlay::new);

        let initial_text = surface.value();
        let initial_selection = surface.selection();
        let initial = Snapshot {
            text: initial_text.clone(),
            cursors: vec![Cursor::caret(CursorId::Primary, 0)],
            selection_start: initial_selection.start,
            selection_end: initial_selection.end,
            timestamp_ms: clock.now_ms(),
        };

        let mut engine = Self {
            variant,
            config,
            surface,
            store,
            clock,
            cursors: CursorSet::new(),
            history: UndoLog::new(initial),
            overlay,
            runtime: PluginRuntime::default(),
            operations,
            frame,
            saver: None,
            action_invoker: None,
            keyboard_handler: None,
            host_key_handler: None,
            last_known_text: initial_text,
            last_known_selection: initial_selection,
            composing: false,
            destroyed: false,
        };

        engine.boot_plugins(modules);

        if engine.config.focus_on_mount {
            engine.surface.focus();
            if let Some((start, end)) = engine.config.focus_selection {
                engine.set_primary_selection(start, end);
            }
        }

        engine
    }

    // ---- accessors -------------------------------------------------------

    /// The booted variant.
    pub fn variant(&self) -> EngineVariant {
        self.variant
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The current document text (the surface's live value).
    pub fn text(&self) -> String {
        self.surface.value()
    }

    /// The surface's native selection.
    pub fn selection(&self) -> SelectionRange {
        self.surface.selection()
    }

    /// The surface's layout metrics, if laid out.
    pub fn layout(&self) -> Option<SurfaceLayout> {
        self.surface.layout()
    }

    /// The surface's scroll offsets.
    pub fn scroll(&self) -> ScrollOffsets {
        self.surface.scroll()
    }

    /// The cursor set.
    pub fn cursors(&self) -> &CursorSet {
        &self.cursors
    }

    /// The undo log.
    pub fn history(&self) -> &UndoLog {
        &self.history
    }

    /// The overlay draw model (framed variant only).
    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    pub(crate) fn overlay_mut(&mut self) -> Option<&mut Overlay> {
        self.overlay.as_mut()
    }

    /// The frame boot document (framed variant only).
    pub fn frame_document(&self) -> Option<&FrameDocument> {
        self.frame.as_ref()
    }

    /// The host content store.
    pub fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }

    /// Mutable access to the host content store.
    pub fn store_mut(&mut self) -> &mut dyn ContentStore {
        self.store.as_mut()
    }

    /// Whether the engine has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Whether an IME composition is in progress.
    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// A line index over the current text.
    pub fn line_index(&self) -> LineIndex {
        LineIndex::from_text(&self.text())
    }

    /// Current time from the injected clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Focus the surface.
    pub fn focus_surface(&mut self) {
        if self.destroyed {
            return;
        }
        self.surface.focus();
    }

    // ---- host callbacks --------------------------------------------------

    /// Install the persistence callback invoked on every committed mutation.
    pub fn set_save_changes(&mut self, saver: SaveChanges) {
        self.saver = Some(saver);
    }

    /// Install the action-script callback invoked after input events.
    pub fn set_action_invoker(&mut self, invoker: ActionInvoker) {
        self.action_invoker = Some(invoker);
    }

    /// Install the global keyboard manager's priority pass.
    pub fn set_keyboard_handler(&mut self, handler: KeyHandler) {
        self.keyboard_handler = Some(handler);
    }

    /// Install the host widget's own key handler.
    pub fn set_host_key_handler(&mut self, handler: KeyHandler) {
        self.host_key_handler = Some(handler);
    }

    pub(crate) fn emit_save(&mut self) {
        if self.destroyed {
            return;
        }
        let text = self.text();
        self.last_known_text = text.clone();
        if let Some(saver) = self.saver.as_mut() {
            saver(&text);
        }
    }

    pub(crate) fn emit_input_actions(&mut self) {
        let Some(script) = self.config.input_actions.clone() else {
            return;
        };
        let text = self.text();
        if let Some(invoker) = self.action_invoker.as_mut() {
            invoker(&script, &text);
        }
    }

    pub(crate) fn run_keyboard_handler(&mut self, key: &KeyEvent) -> bool {
        match self.keyboard_handler.as_mut() {
            Some(handler) => handler(key),
            None => false,
        }
    }

    pub(crate) fn run_host_key_handler(&mut self, key: &KeyEvent) -> bool {
        match self.host_key_handler.as_mut() {
            Some(handler) => handler(key),
            None => false,
        }
    }

    /// Refit the surface height (auto-height hosts).
    pub(crate) fn refit(&mut self) {
        if self.config.auto_height {
            self.surface.refit_height();
        }
    }

    // ---- snapshots & history --------------------------------------------

    fn snapshot(&self) -> Snapshot {
        let selection = self.surface.selection();
        Snapshot {
            text: self.text(),
            cursors: self.cursors.cursors().to_vec(),
            selection_start: selection.start,
            selection_end: selection.end,
            timestamp_ms: self.clock.now_ms(),
        }
    }

    /// Capture the pre-mutation state into the undo log's pending slot.
    pub fn capture_before(&mut self) {
        if self.destroyed {
            return;
        }
        let snapshot = self.snapshot();
        self.history.capture_before(snapshot);
    }

    /// Record the current state as an undo entry.
    pub fn record(&mut self, force_separate: bool) {
        if self.destroyed {
            return;
        }
        let snapshot = self.snapshot();
        self.last_known_text = snapshot.text.clone();
        self.history.record(snapshot, force_separate);
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.surface.set_value(&snapshot.text);
        let text_len = char_len(&snapshot.text);
        if snapshot.cursors.is_empty() {
            self.cursors.clear_secondary();
            let primary = self.cursors.primary_mut();
            primary.start = snapshot.selection_start.min(text_len);
            primary.end = snapshot.selection_end.min(text_len);
            self.cursors.normalize(text_len);
        } else {
            self.cursors.restore(snapshot.cursors.clone(), text_len);
        }
        self.sync_to_surface();
        self.last_known_text = snapshot.text.clone();
        self.last_known_selection = self.surface.selection();
        self.redraw_overlay();
        self.emit_save();
    }

    /// Undo one step. Returns whether anything was restored.
    pub fn undo(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.history.set_replaying(true);
        self.apply_snapshot(snapshot);
        self.history.set_replaying(false);
        true
    }

    /// Redo one step. Returns whether anything was restored.
    pub fn redo(&mut self) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.history.set_replaying(true);
        self.apply_snapshot(snapshot);
        self.history.set_replaying(false);
        true
    }

    // ---- cursors ---------------------------------------------------------

    /// Copy the surface's native selection into the primary caret.
    ///
    /// Surface failures are swallowed; the set keeps its last-known state.
    pub fn sync_from_surface(&mut self) {
        if self.destroyed {
            return;
        }
        let selection = self.surface.selection();
        let primary = self.cursors.primary_mut();
        primary.start = selection.start;
        primary.end = selection.end;
        let text_len = char_len(&self.text());
        self.cursors.normalize(text_len);
    }

    /// Push the primary caret to the surface's native selection.
    pub fn sync_to_surface(&mut self) {
        if self.destroyed {
            return;
        }
        let primary = self.cursors.primary();
        let range = SelectionRange::new(primary.start, primary.end);
        if !self.surface.set_selection(range) {
            debug!("surface rejected selection update; keeping last-known cursor state");
        }
        self.last_known_selection = self.surface.selection();
    }

    /// Direct access to the surface, for hosts that own richer widgets.
    pub fn surface_mut(&mut self) -> &mut dyn Surface {
        self.surface.as_mut()
    }

    /// Move the primary caret, collapsing nothing else.
    pub fn set_primary_selection(&mut self, start: usize, end: usize) {
        if self.destroyed {
            return;
        }
        let text_len = char_len(&self.text());
        let primary = self.cursors.primary_mut();
        primary.start = start;
        primary.end = end;
        self.cursors.normalize(text_len);
        self.sync_to_surface();
        self.redraw_overlay();
    }

    /// Add a secondary caret. No-op (returns `None`) in the inline variant.
    pub fn add_cursor(&mut self, start: usize, end: usize) -> Option<CursorId> {
        if self.destroyed || !self.variant.multi_caret() {
            return None;
        }
        let text_len = char_len(&self.text());
        let id = self.cursors.add(start, end, text_len);
        self.redraw_overlay();
        Some(id)
    }

    /// Remove a secondary caret by id.
    pub fn remove_cursor(&mut self, id: CursorId) -> bool {
        if self.destroyed {
            return false;
        }
        let removed = self.cursors.remove(id);
        if removed {
            self.redraw_overlay();
        }
        removed
    }

    /// Collapse to the primary caret only.
    pub fn clear_secondary_cursors(&mut self) {
        if self.destroyed {
            return;
        }
        self.cursors.clear_secondary();
        self.redraw_overlay();
    }

    /// Insert `text` at every caret, recording a separate undo entry.
    pub fn insert_at_all_cursors(&mut self, text: &str) {
        if self.destroyed {
            return;
        }
        self.capture_before();
        let buffer = self.text();
        let (new_text, new_cursors) = insert_at_cursors(&buffer, self.cursors.cursors(), text);
        self.commit_multi_caret_edit(new_text, new_cursors);
    }

    /// Delete at every caret (selection, or one char in `direction`),
    /// recording a separate undo entry.
    pub fn delete_at_all_cursors(&mut self, direction: DeleteDirection) {
        if self.destroyed {
            return;
        }
        self.capture_before();
        let buffer = self.text();
        let (new_text, new_cursors) =
            delete_at_cursors(&buffer, self.cursors.cursors(), direction);
        self.commit_multi_caret_edit(new_text, new_cursors);
    }

    /// Delete only the selected ranges (cut semantics); collapsed carets are
    /// untouched.
    pub fn delete_selections_at_all_cursors(&mut self) {
        if self.destroyed {
            return;
        }
        self.capture_before();
        let buffer = self.text();
        let (new_text, new_cursors) = delete_selections(&buffer, self.cursors.cursors());
        self.commit_multi_caret_edit(new_text, new_cursors);
    }

    fn commit_multi_caret_edit(&mut self, new_text: String, new_cursors: Vec<Cursor>) {
        let text_len = char_len(&new_text);
        self.surface.set_value(&new_text);
        self.cursors.restore(new_cursors, text_len);
        self.sync_to_surface();
        self.redraw_overlay();
        self.record(true);
        self.emit_save();
    }

    // ---- geometry & overlay ---------------------------------------------

    /// Caret rect for a char offset, or `None` without layout.
    pub fn geometry_position(&self, offset: usize) -> Option<CaretRect> {
        let layout = self.surface.layout()?;
        geometry::position_for_offset(&self.text(), offset, Some(&layout))
    }

    /// Selection rects for a char range; empty without layout.
    pub fn geometry_range(&self, start: usize, end: usize) -> Vec<RangeRect> {
        let Some(layout) = self.surface.layout() else {
            return Vec::new();
        };
        geometry::rects_for_range(&self.text(), start, end, Some(&layout))
    }

    /// Recompute the overlay's cursor layer (framed variant).
    pub fn redraw_overlay(&mut self) {
        if self.destroyed {
            return;
        }
        let text = self.surface.value();
        let layout = self.surface.layout();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.redraw_cursors(&text, self.cursors.cursors(), layout.as_ref());
        }
    }

    /// Dispatch the `render` hook, then redraw the overlay.
    pub fn render(&mut self) {
        if self.destroyed {
            return;
        }
        self.dispatch_hook(Hook::Render, &SurfaceEvent::None, HookData::None);
        self.redraw_overlay();
    }

    /// Add a plugin decoration to the overlay. No-op in the inline variant.
    pub fn add_decoration(&mut self, node: DecorationNode) {
        if self.destroyed {
            return;
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.add_decoration(node);
        }
    }

    /// Clear overlay decorations by owner (`None` clears all).
    pub fn clear_decorations(&mut self, owner: Option<&str>) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.clear_decorations(owner);
        }
    }

    // ---- operations ------------------------------------------------------

    /// Build one operation descriptor per caret, sorted by `sel_start`.
    pub fn create_text_operation(&self) -> Vec<TextOperation> {
        operation::build_operations(&self.text(), self.cursors.cursors())
    }

    /// Execute an operation list: filter, hook bracket, apply descending,
    /// reposition cursors, record a separate undo entry, persist, refit.
    pub fn execute_operations(&mut self, input: impl Into<OperationInput>) {
        if self.destroyed {
            return;
        }

        let operations = input.into().into_list();

        let outcome = self.dispatch_hook(
            Hook::BeforeOperation,
            &SurfaceEvent::None,
            HookData::Operations(operations.clone()),
        );
        if outcome.prevented {
            return;
        }
        let operations = outcome
            .data
            .into_operations()
            .unwrap_or(operations);

        let active_count = operations.iter().filter(|op| op.is_active()).count();

        self.capture_before();

        let buffer = self.text();
        let (new_text, updates) = operation::apply_operations(&buffer, &operations);
        let changed = new_text != buffer;

        if changed {
            let text_len = char_len(&new_text);
            self.surface.set_value(&new_text);

            let mut cursors = self.cursors.cursors().to_vec();
            for cursor in &mut cursors {
                if let Some(update) = updates.iter().find(|u| u.cursor_id == cursor.id) {
                    let (start, end) = adjusted_range(&updates, update);
                    cursor.start = start;
                    cursor.end = end;
                }
            }
            self.cursors.restore(cursors, text_len);
            self.sync_to_surface();
            self.redraw_overlay();
            self.record(true);
        } else {
            self.history.discard_pending();
        }

        self.dispatch_hook(
            Hook::AfterOperation,
            &SurfaceEvent::None,
            HookData::Operations(operations),
        );

        if changed {
            self.emit_save();
        } else if active_count == 0 {
            // An all-no-op pass (e.g. focus-editor) re-focuses the surface.
            self.surface.focus();
        }
        self.refit();
    }

    /// Run a named operation module over the current cursors.
    ///
    /// Unknown names execute nothing (the buffer is unchanged).
    pub fn run_operation(&mut self, name: &str, params: &OpParams) {
        if self.destroyed {
            return;
        }
        let modules = std::mem::take(&mut self.operations);
        let module = modules.iter().find(|module| module.name() == name);
        match module {
            Some(module) => {
                let mut operations = self.create_text_operation();
                module.apply(params, &mut operations, self.store.as_mut());
                self.execute_operations(operations);
                self.focus_surface();
            }
            None => {
                debug!("unknown text operation '{name}'; executing nothing");
            }
        }
        self.operations = modules;
    }

    // ---- plugins ---------------------------------------------------------

    fn boot_plugins(&mut self, modules: Vec<PluginModule>) {
        for module in modules {
            let supported = match self.variant {
                EngineVariant::Inline => module.supports.inline,
                EngineVariant::Framed => module.supports.framed,
            };

            let mut metadata = PluginMetadata {
                title: format!("plugins/{}", module.name),
                name: module.name.to_string(),
                config_key: module.config_key.map(str::to_string),
                config_key_alt: module.config_key_alt.map(str::to_string),
                default_enabled: module.default_enabled,
                description: module.description.to_string(),
                category: module.category.to_string(),
                supports: module.supports,
                status: PluginStatus {
                    supported,
                    enabled: false,
                    reason: if supported {
                        PluginReason::Loaded
                    } else {
                        PluginReason::Unsupported
                    },
                },
            };

            if !supported {
                self.runtime.insert_metadata(metadata);
                continue;
            }

            let instance = match (module.create)(self) {
                Ok(instance) => instance,
                Err(error) => {
                    warn!("plugin '{}' failed to construct: {error}", module.name);
                    self.runtime.insert_metadata(metadata);
                    continue;
                }
            };

            // Re-key when the instance disagrees with the module name so the
            // two never show up as duplicate entries.
            let instance_name = instance.name().to_string();
            if instance_name != metadata.name {
                metadata.name = instance_name.clone();
            }
            metadata.status.reason = PluginReason::Registered;
            self.runtime.insert_metadata(metadata);

            let index = self.runtime.register(instance_name.clone(), instance);
            if let Some(mut plugin) = self.runtime.take_instance(index) {
                if let Err(error) = plugin.on_register(self) {
                    warn!("plugin '{instance_name}' on_register failed: {error}");
                }
                self.runtime.put_instance(index, plugin);
            }

            if self.resolved_enabled(&instance_name) {
                self.enable_plugin(&instance_name);
            }
        }
    }

    /// Resolve whether a plugin starts enabled: host attribute override,
    /// then the config store item (and its alt), then `default_enabled`.
    fn resolved_enabled(&self, name: &str) -> bool {
        if let Some(enabled) = self.config.plugin_overrides.get(name) {
            return *enabled;
        }
        let meta = self.runtime.metadata_of(name);
        if let Some(meta) = meta {
            for key in [meta.config_key.as_deref(), meta.config_key_alt.as_deref()]
                .into_iter()
                .flatten()
            {
                if let Some(value) = self.store.text(key)
                    && let Some(enabled) = parse_flag(&value)
                {
                    return enabled;
                }
            }
            return meta.default_enabled;
        }
        false
    }

    /// Enable a plugin by name. Refuses unsupported variants.
    pub fn enable_plugin(&mut self, name: &str) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(index) = self.runtime.slot_index(name) else {
            if let Some(meta) = self.runtime.metadata_mut(name) {
                meta.status.reason = if meta.status.supported {
                    PluginReason::NotRegistered
                } else {
                    PluginReason::Unsupported
                };
            }
            return false;
        };

        let supported = self
            .runtime
            .metadata_of(name)
            .map(|meta| meta.status.supported)
            .unwrap_or(true);
        if !supported {
            if let Some(meta) = self.runtime.metadata_mut(name) {
                meta.status.reason = PluginReason::Unsupported;
            }
            return false;
        }

        if let Some(mut plugin) = self.runtime.take_instance(index) {
            if let Err(error) = plugin.enable(self) {
                warn!("plugin '{name}' enable failed: {error}");
            }
            self.runtime.put_instance(index, plugin);
        }
        if let Some(meta) = self.runtime.metadata_mut(name) {
            meta.status.enabled = true;
            meta.status.reason = PluginReason::Enabled;
        }
        true
    }

    /// Disable a plugin by name.
    pub fn disable_plugin(&mut self, name: &str) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(index) = self.runtime.slot_index(name) else {
            if let Some(meta) = self.runtime.metadata_mut(name) {
                meta.status.reason = if meta.status.supported {
                    PluginReason::NotRegistered
                } else {
                    PluginReason::Unsupported
                };
            }
            return false;
        };

        if let Some(mut plugin) = self.runtime.take_instance(index) {
            if let Err(error) = plugin.disable(self) {
                warn!("plugin '{name}' disable failed: {error}");
            }
            self.runtime.put_instance(index, plugin);
        }
        if let Some(meta) = self.runtime.metadata_mut(name) {
            meta.status.enabled = false;
            meta.status.reason = PluginReason::Disabled;
        }
        true
    }

    /// Push host configuration options into a registered plugin.
    pub fn configure_plugin(&mut self, name: &str, options: &BTreeMap<String, String>) {
        if self.destroyed {
            return;
        }
        let Some(index) = self.runtime.slot_index(name) else {
            debug!("configure for unregistered plugin '{name}' ignored");
            return;
        };
        if let Some(mut plugin) = self.runtime.take_instance(index) {
            plugin.configure(options);
            self.runtime.put_instance(index, plugin);
        }
    }

    /// Toggle a plugin's enabled state.
    pub fn toggle_plugin(&mut self, name: &str) {
        let enabled = self
            .runtime
            .metadata_of(name)
            .map(|meta| meta.status.enabled)
            .unwrap_or(false);
        if enabled {
            self.disable_plugin(name);
        } else {
            self.enable_plugin(name);
        }
    }

    /// Apply a bulk `{plugin name -> enabled}` configuration.
    ///
    /// Registered plugins are enabled/disabled; unknown names get a
    /// metadata-only update.
    pub fn apply_plugin_config(&mut self, config: &BTreeMap<String, bool>) {
        for (name, &enabled) in config {
            if self.runtime.is_registered(name) {
                if enabled {
                    self.enable_plugin(name);
                } else {
                    self.disable_plugin(name);
                }
            } else if let Some(meta) = self.runtime.metadata_mut(name) {
                meta.status.enabled = enabled;
                meta.status.reason = if meta.status.supported {
                    PluginReason::NotRegistered
                } else {
                    PluginReason::Unsupported
                };
            } else {
                debug!("plugin config for unknown module '{name}' ignored");
            }
        }
    }

    /// Metadata for every discovered module.
    pub fn plugin_metadata(&self) -> &BTreeMap<String, PluginMetadata> {
        self.runtime.metadata()
    }

    /// All palette commands exposed by registered plugins.
    pub fn plugin_commands(&self) -> Vec<CommandSpec> {
        self.runtime
            .slots
            .iter()
            .filter_map(|slot| slot.instance.as_ref())
            .flat_map(|plugin| plugin.commands())
            .collect()
    }

    /// Run a hook chain in registration order.
    ///
    /// Handlers run under containment: a failing handler is logged and the
    /// chain continues. `Prevent` halts the chain; `Replace` swaps the data
    /// for subsequent handlers. Re-entrant dispatch from inside a handler
    /// skips only the handler's own plugin.
    pub fn dispatch_hook(&mut self, hook: Hook, event: &SurfaceEvent, data: HookData) -> HookOutcome {
        if self.destroyed {
            return HookOutcome::pass(data);
        }

        let order = self.runtime.bindings_for(hook);
        let mut data = data;
        let mut prevented = false;

        for index in order {
            let Some(mut plugin) = self.runtime.take_instance(index) else {
                // The slot is empty while its plugin is already on the stack.
                continue;
            };
            let reply = plugin.on_hook(hook, event, data.clone(), self);
            let name = plugin.name().to_string();
            self.runtime.put_instance(index, plugin);

            match reply {
                Ok(HookReply::Continue) => {}
                Ok(HookReply::Prevent) => {
                    prevented = true;
                    break;
                }
                Ok(HookReply::Replace(new_data)) => data = new_data,
                Err(error) => {
                    warn!("hook {hook:?} handler in '{name}' failed: {error}");
                }
            }
        }

        HookOutcome { prevented, data }
    }

    fn route_to_plugins(&mut self, message: &EngineMessage) -> bool {
        for index in 0..self.runtime.slots.len() {
            let Some(mut plugin) = self.runtime.take_instance(index) else {
                continue;
            };
            let result = plugin.on_message(message, self);
            let name = plugin.name().to_string();
            self.runtime.put_instance(index, plugin);
            match result {
                Ok(true) => return true,
                Ok(false) => {}
                Err(error) => {
                    warn!("message handler in '{name}' failed: {error}");
                }
            }
        }
        false
    }

    /// Handle a host message.
    ///
    /// Engine-owned messages are handled here; the rest route to plugins. A
    /// message no plugin owns is silently dropped.
    pub fn handle_message(&mut self, message: EngineMessage) {
        if self.destroyed {
            return;
        }
        match message {
            EngineMessage::Undo => {
                self.undo();
            }
            EngineMessage::Redo => {
                self.redo();
            }
            EngineMessage::TextOperation { op, params } => {
                self.run_operation(&op, &params);
            }
            EngineMessage::TogglePlugin { plugin } => {
                self.toggle_plugin(&plugin);
            }
            other => {
                if !self.route_to_plugins(&other) {
                    debug!("message {other:?} has no owning plugin; dropped");
                }
            }
        }
    }

    // ---- destruction -----------------------------------------------------

    /// Destroy the engine.
    ///
    /// Terminal and idempotent: plugins are destroyed under containment, all
    /// state is dropped, and every entry point becomes a no-op.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;

        for index in 0..self.runtime.slots.len() {
            if let Some(mut plugin) = self.runtime.take_instance(index) {
                let name = plugin.name().to_string();
                if let Err(error) = plugin.destroy(self) {
                    warn!("plugin '{name}' destroy failed: {error}");
                }
            }
        }
        self.runtime.clear();

        self.cursors = CursorSet::new();
        self.history.clear();
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.clear_decorations(None);
        }
        self.saver = None;
        self.action_invoker = None;
        self.keyboard_handler = None;
        self.host_key_handler = None;
    }
}
