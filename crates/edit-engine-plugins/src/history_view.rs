//! Edit-history timeline: a read-only view over the undo log.
//!
//! The timeline UI itself is host-owned; this plugin answers the
//! `open-history` message and exposes the entry summaries the host renders.

use edit_engine::engine::Engine;
use edit_engine::error::EngineError;
use edit_engine::messages::EngineMessage;
use edit_engine::runtime::{Plugin, PluginModule, VariantSupport};
use serde::Serialize;

/// One undo entry, summarized for a timeline UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEntry {
    /// When the entry's after-state was captured.
    pub timestamp_ms: u64,
    /// Char count before the edit.
    pub chars_before: usize,
    /// Char count after the edit.
    pub chars_after: usize,
}

/// Summaries of the undo stack, oldest first.
pub fn timeline(engine: &Engine) -> Vec<TimelineEntry> {
    engine
        .history()
        .entries()
        .iter()
        .map(|entry| TimelineEntry {
            timestamp_ms: entry.after.timestamp_ms,
            chars_before: entry.before.text.chars().count(),
            chars_after: entry.after.text.chars().count(),
        })
        .collect()
}

/// The history-timeline plugin.
pub struct HistoryTimelinePlugin;

impl HistoryTimelinePlugin {
    /// The module descriptor for the runtime.
    pub fn module() -> PluginModule {
        PluginModule {
            name: "history-timeline",
            description: "Read-only timeline over the undo log",
            category: "view",
            default_enabled: false,
            supports: VariantSupport::BOTH,
            config_key: Some("config/editor/history-timeline"),
            config_key_alt: None,
            create: Box::new(|_engine| Ok(Box::new(HistoryTimelinePlugin))),
        }
    }
}

impl Plugin for HistoryTimelinePlugin {
    fn name(&self) -> &str {
        "history-timeline"
    }

    fn on_message(
        &mut self,
        message: &EngineMessage,
        _engine: &mut Engine,
    ) -> Result<bool, EngineError> {
        match message {
            // The timeline panel is host-owned; the data comes from
            // `timeline`.
            EngineMessage::OpenHistory => Ok(true),
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edit_engine::engine::EngineSetup;

    #[test]
    fn timeline_mirrors_the_undo_stack() {
        let mut engine = Engine::new(EngineSetup::framed("ab"));
        engine.set_primary_selection(2, 2);
        engine.insert_at_all_cursors("c");
        engine.insert_at_all_cursors("d");

        let entries = timeline(&engine);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].chars_before, 2);
        assert_eq!(entries[0].chars_after, 3);
        assert_eq!(entries[1].chars_after, 4);
    }
}
