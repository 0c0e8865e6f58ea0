//! Coalescing undo log.
//!
//! The log records before/after [`Snapshot`] pairs. A *pending* before-state
//! is captured ahead of a mutation; `record` pairs it with the post-edit
//! state. Records within the coalescing window (500 ms) overwrite the
//! previous entry's `after` instead of appending, so a typed burst undoes as
//! one step. Multi-caret edits and operation executions record with
//! `force_separate`, which also resets the window so the next record starts a
//! fresh entry regardless of timing.

use crate::cursor::Cursor;

/// Oldest entries are dropped past this depth.
pub const MAX_UNDO_ENTRIES: usize = 200;

/// Two records closer than this coalesce into one entry.
pub const COALESCE_WINDOW_MS: u64 = 500;

/// An immutable capture of buffer text, cursor set, and native selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Document text at capture time.
    pub text: String,
    /// Deep copy of the cursor set.
    pub cursors: Vec<Cursor>,
    /// Native selection start (char offset).
    pub selection_start: usize,
    /// Native selection end (char offset).
    pub selection_end: usize,
    /// Capture time in milliseconds.
    pub timestamp_ms: u64,
}

/// One undoable step.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    /// State before the edit.
    pub before: Snapshot,
    /// State after the edit.
    pub after: Snapshot,
}

/// The undo/redo stacks plus capture bookkeeping.
#[derive(Debug, Default)]
pub struct UndoLog {
    undo: Vec<UndoEntry>,
    redo: Vec<UndoEntry>,
    pending_before: Option<Snapshot>,
    last_saved: Option<Snapshot>,
    last_record_at: u64,
    replaying: bool,
}

impl UndoLog {
    /// Create an empty log seeded with the document's initial state.
    pub fn new(initial: Snapshot) -> Self {
        Self {
            last_saved: Some(initial),
            ..Self::default()
        }
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Undo stack depth.
    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    /// Redo stack depth.
    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Read-only view of the undo stack, oldest first.
    pub fn entries(&self) -> &[UndoEntry] {
        &self.undo
    }

    /// Whether the log is currently replaying a history state.
    ///
    /// While replaying, `capture_before` is ignored so events triggered by
    /// the restoration itself do not pollute the pending slot.
    pub fn is_replaying(&self) -> bool {
        self.replaying
    }

    /// Mark the start/end of a history replay.
    pub fn set_replaying(&mut self, replaying: bool) {
        self.replaying = replaying;
    }

    /// Record the pre-mutation state into the pending slot.
    ///
    /// No-op when a pending state already exists or during replay.
    pub fn capture_before(&mut self, snapshot: Snapshot) {
        if self.replaying || self.pending_before.is_some() {
            return;
        }
        self.pending_before = Some(snapshot);
    }

    /// Drop the pending before-state (a cancelled mutation).
    pub fn discard_pending(&mut self) {
        self.pending_before = None;
    }

    /// Pair the pending (or last-saved) before-state with `current`.
    ///
    /// Returns `true` when an entry was recorded or coalesced. Clears redo on
    /// every recording. `force_separate` appends unconditionally and resets
    /// the coalescing window so the next record opens a fresh entry.
    pub fn record(&mut self, current: Snapshot, force_separate: bool) -> bool {
        let Some(before) = self.pending_before.take().or_else(|| self.last_saved.clone()) else {
            return false;
        };

        if current.text == before.text {
            return false;
        }

        let now = current.timestamp_ms;
        let coalesce = !force_separate
            && self.last_record_at > 0
            && now.saturating_sub(self.last_record_at) < COALESCE_WINDOW_MS
            && !self.undo.is_empty();

        if coalesce {
            let last = self.undo.last_mut().expect("checked non-empty");
            last.after = current.clone();
        } else {
            self.undo.push(UndoEntry {
                before,
                after: current.clone(),
            });
            if self.undo.len() > MAX_UNDO_ENTRIES {
                self.undo.remove(0);
            }
        }

        self.redo.clear();
        self.last_saved = Some(current);
        self.last_record_at = if force_separate { 0 } else { now };
        true
    }

    /// Pop one undo step; returns the snapshot to restore.
    pub fn undo(&mut self) -> Option<Snapshot> {
        let entry = self.undo.pop()?;
        let restored = entry.before.clone();
        self.redo.push(entry);
        self.last_saved = Some(restored.clone());
        self.pending_before = None;
        self.last_record_at = 0;
        Some(restored)
    }

    /// Pop one redo step; returns the snapshot to restore.
    pub fn redo(&mut self) -> Option<Snapshot> {
        let entry = self.redo.pop()?;
        let restored = entry.after.clone();
        self.undo.push(entry);
        self.last_saved = Some(restored.clone());
        self.pending_before = None;
        self.last_record_at = 0;
        Some(restored)
    }

    /// Drop all history state (engine destruction).
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
        self.pending_before = None;
        self.last_saved = None;
        self.last_record_at = 0;
        self.replaying = false;
    }
}
