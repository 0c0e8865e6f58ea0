//! The input pipeline: deterministic routing of raw surface events through
//! hooks into the cursor set, undo log, and operation layer.
//!
//! Hosts forward each surface event to the matching entry point and honor
//! the returned [`EventDisposition`] (calling `preventDefault` when asked).
//! The host also polls [`Engine::poll_selection`] at
//! [`POLL_INTERVAL_MS`] to catch selection moves the surface never reported
//! as a `select` event.
//!
//! Ordering guarantees per event kind live on the individual methods; the
//! common rules: `before*` hooks run before any mutation and may cancel,
//! `after*` hooks run last, and a destroyed engine ignores everything.

use crate::cursor::DeleteDirection;
use crate::engine::Engine;
use crate::event::{EventDisposition, InputEvent, InputType, KeyEvent, SurfaceEvent};
use crate::hooks::{Hook, HookData};
use crate::surface::SelectionRange;
use crate::text::{char_len, splice_chars};

/// Cadence at which the host should call [`Engine::poll_selection`].
pub const POLL_INTERVAL_MS: u64 = 60;

fn is_undo_key(key: &KeyEvent) -> bool {
    key.modifiers.primary() && matches!(key.key.as_str(), "z" | "Z" | "y" | "Y")
}

fn captures_before(key: &KeyEvent) -> bool {
    matches!(key.key.as_str(), "Backspace" | "Delete")
        || (key.modifiers.primary() && matches!(key.key.as_str(), "x" | "X" | "v" | "V"))
}

/// Whether the multi-caret intercept handles this input type.
fn intercepts(event: &InputEvent) -> bool {
    match event.input_type {
        InputType::InsertText
        | InputType::InsertLineBreak
        | InputType::InsertParagraph
        | InputType::DeleteContentBackward
        | InputType::DeleteContentForward
        | InputType::DeleteByCut => true,
        InputType::InsertFromPaste => event.data.is_some(),
        _ => false,
    }
}

impl Engine {
    /// Handle a pointer click.
    ///
    /// `beforeClick` may cancel; otherwise the engine syncs the primary caret
    /// from the surface, refits height, and fires `afterClick`.
    pub fn handle_click(&mut self, offset: Option<usize>) -> EventDisposition {
        if self.destroyed {
            return EventDisposition::passed();
        }
        let event = SurfaceEvent::Click { offset };
        let outcome = self.dispatch_hook(Hook::BeforeClick, &event, HookData::None);
        if outcome.prevented {
            return EventDisposition::prevented();
        }
        self.sync_from_surface();
        self.redraw_overlay();
        self.refit();
        self.dispatch_hook(Hook::AfterClick, &event, HookData::None);
        EventDisposition::passed()
    }

    /// Handle a key-down event.
    ///
    /// Order: `beforeKeydown` hooks (cancellable), capture-before for
    /// undo-modifying keys, undo/redo interception, Escape clearing
    /// secondary carets, the global keyboard manager's priority pass, the
    /// host widget's key handler, `afterKeydown` hooks last.
    pub fn handle_keydown(&mut self, key: KeyEvent) -> EventDisposition {
        if self.destroyed {
            return EventDisposition::passed();
        }
        let event = SurfaceEvent::Keydown(key.clone());

        let outcome = self.dispatch_hook(Hook::BeforeKeydown, &event, HookData::None);
        if outcome.prevented {
            return EventDisposition::prevented();
        }

        if captures_before(&key) {
            self.capture_before();
        }

        if is_undo_key(&key) {
            let redo = matches!(key.key.as_str(), "y" | "Y") || key.modifiers.shift;
            if redo {
                self.redo();
            } else {
                self.undo();
            }
            self.dispatch_hook(Hook::AfterKeydown, &event, HookData::None);
            return EventDisposition::prevented();
        }

        if key.key == "Escape" && self.cursors().len() > 1 {
            self.clear_secondary_cursors();
            self.dispatch_hook(Hook::AfterKeydown, &event, HookData::None);
            return EventDisposition::prevented();
        }

        let mut disposition = EventDisposition::passed();
        if self.run_keyboard_handler(&key) {
            disposition = EventDisposition::prevented();
        } else if self.run_host_key_handler(&key) {
            disposition = EventDisposition::prevented();
        }

        self.dispatch_hook(Hook::AfterKeydown, &event, HookData::None);
        disposition
    }

    /// Handle a key-press event (hook dispatch only).
    pub fn handle_keypress(&mut self, key: KeyEvent) -> EventDisposition {
        if self.destroyed {
            return EventDisposition::passed();
        }
        let event = SurfaceEvent::Keypress(key);
        let outcome = self.dispatch_hook(Hook::BeforeKeypress, &event, HookData::None);
        if outcome.prevented {
            return EventDisposition::prevented();
        }
        self.dispatch_hook(Hook::AfterKeypress, &event, HookData::None);
        EventDisposition::passed()
    }

    /// Handle a cancellable pre-mutation input event.
    ///
    /// Hook cancellation prevents the default and clears the pending
    /// before-state. During IME composition the engine never rewrites
    /// events. Outside composition, with multiple carets active and an
    /// intercepted input type, the default is prevented and the engine
    /// performs the multi-caret edit itself.
    pub fn handle_before_input(&mut self, input: InputEvent) -> EventDisposition {
        if self.destroyed {
            return EventDisposition::passed();
        }
        let event = SurfaceEvent::BeforeInput(input.clone());
        let data = input
            .data
            .as_deref()
            .map(|text| HookData::Text(text.to_string()))
            .unwrap_or_default();

        let outcome = self.dispatch_hook(Hook::BeforeInput, &event, data);
        if outcome.prevented {
            self.history.discard_pending();
            return EventDisposition::prevented();
        }

        if self.composing || input.is_composing {
            return EventDisposition::passed();
        }

        self.capture_before();

        if self.cursors().len() > 1 && intercepts(&input) {
            // A hook may have replaced the pending insertion data.
            let data = outcome
                .data
                .as_text()
                .map(str::to_string)
                .or(input.data.clone());

            match input.input_type {
                InputType::InsertText | InputType::InsertFromPaste => {
                    let text = data.unwrap_or_default();
                    self.insert_at_all_cursors(&text);
                }
                InputType::InsertLineBreak | InputType::InsertParagraph => {
                    let text = data.unwrap_or_else(|| "\n".to_string());
                    self.insert_at_all_cursors(&text);
                }
                InputType::DeleteContentBackward => {
                    self.delete_at_all_cursors(DeleteDirection::Backward);
                }
                InputType::DeleteContentForward => {
                    self.delete_at_all_cursors(DeleteDirection::Forward);
                }
                InputType::DeleteByCut => {
                    self.delete_selections_at_all_cursors();
                }
                _ => {}
            }
            return EventDisposition::prevented();
        }

        // Single-caret typing aids: a hook-replaced insertion applies even
        // when the surface would otherwise handle the default.
        if let Some(replaced) = outcome.data.as_text()
            && input.data.as_deref() != Some(replaced)
            && matches!(
                input.input_type,
                InputType::InsertText | InputType::InsertLineBreak | InputType::InsertParagraph
            )
        {
            let replaced = replaced.to_string();
            self.insert_at_all_cursors(&replaced);
            return EventDisposition::prevented();
        }

        EventDisposition::passed()
    }

    /// Handle a post-mutation input event.
    ///
    /// Re-syncs the cursor set, records an undo entry (coalescing allowed),
    /// persists, refits height, and drops stray secondary carets that
    /// survived into a non-composition input the surface applied only to the
    /// primary.
    pub fn handle_input(&mut self, input: InputEvent) {
        if self.destroyed {
            return;
        }
        let event = SurfaceEvent::Input(input.clone());

        if !self.composing && !input.is_composing && self.cursors().len() > 1 {
            self.clear_secondary_cursors();
        }

        let text_changed = self.text() != self.last_known_text;
        self.sync_from_surface();
        self.dispatch_hook(Hook::AfterInput, &event, HookData::None);

        if !self.composing && !input.is_composing && text_changed {
            self.record(false);
            self.emit_save();
            self.refit();
        }
        self.emit_input_actions();
    }

    /// Handle IME composition start: collapse to a single caret and capture
    /// the before-state.
    pub fn handle_composition_start(&mut self) {
        if self.destroyed {
            return;
        }
        if self.cursors().len() > 1 {
            self.clear_secondary_cursors();
        }
        self.capture_before();
        self.composing = true;
    }

    /// Handle IME composition end: re-sync, record a separate undo entry,
    /// persist.
    pub fn handle_composition_end(&mut self, data: Option<String>) {
        if self.destroyed {
            return;
        }
        self.composing = false;
        let event = SurfaceEvent::CompositionEnd { data };
        self.sync_from_surface();
        self.record(true);
        self.emit_save();
        self.refit();
        self.dispatch_hook(Hook::AfterInput, &event, HookData::None);
    }

    /// Handle focus gained (hook dispatch).
    pub fn handle_focus(&mut self) {
        if self.destroyed {
            return;
        }
        self.dispatch_hook(Hook::Focus, &SurfaceEvent::Focus, HookData::None);
    }

    /// Handle focus lost (hook dispatch).
    pub fn handle_blur(&mut self) {
        if self.destroyed {
            return;
        }
        self.dispatch_hook(Hook::Blur, &SurfaceEvent::Blur, HookData::None);
    }

    /// Handle a native `select` event.
    pub fn handle_select(&mut self) {
        if self.destroyed {
            return;
        }
        self.sync_from_surface();
        self.last_known_selection = self.selection();
        self.redraw_overlay();
        self.dispatch_hook(Hook::SelectionChange, &SurfaceEvent::Select, HookData::None);
    }

    /// Handle a scroll event: the overlay transform follows the content.
    ///
    /// This is the only scroll compensation; decorations never add scroll
    /// offsets themselves.
    pub fn handle_scroll(&mut self) {
        if self.destroyed {
            return;
        }
        let scroll = self.scroll();
        if let Some(overlay) = self.overlay_mut() {
            overlay.set_scroll(scroll.left, scroll.top);
        }
        self.redraw_overlay();
        self.dispatch_hook(Hook::Render, &SurfaceEvent::Scroll, HookData::None);
    }

    /// Poll for selection moves the surface never reported.
    ///
    /// Hosts call this on a [`POLL_INTERVAL_MS`] cadence; it fires the
    /// `selectionChange` chain when the native selection drifted.
    pub fn poll_selection(&mut self) {
        if self.destroyed {
            return;
        }
        let current = self.selection();
        if current != self.last_known_selection {
            self.handle_select();
        }
    }

    /// Convenience for headless hosts and tests: run `beforeinput`, and when
    /// the default was not prevented, simulate the surface's default edit and
    /// run `input`. A prevented `beforeinput` suppresses the `input` event,
    /// exactly as an editable surface would.
    pub fn dispatch_input(&mut self, input: InputEvent) -> EventDisposition {
        let disposition = self.handle_before_input(input.clone());
        if !disposition.default_prevented {
            self.apply_default_edit(&input);
            self.handle_input(input);
        }
        disposition
    }

    /// Apply the surface's default single-caret edit for `input`.
    fn apply_default_edit(&mut self, input: &InputEvent) {
        if self.destroyed {
            return;
        }
        let text = self.text();
        let selection = self.selection();
        let (start, end) = if selection.start <= selection.end {
            (selection.start, selection.end)
        } else {
            (selection.end, selection.start)
        };

        let (new_text, caret) = match input.input_type {
            InputType::InsertText | InputType::InsertFromPaste | InputType::InsertCompositionText => {
                let data = input.data.clone().unwrap_or_default();
                let new_text = splice_chars(&text, start, end, &data);
                (new_text, start + char_len(&data))
            }
            InputType::InsertLineBreak | InputType::InsertParagraph => {
                (splice_chars(&text, start, end, "\n"), start + 1)
            }
            InputType::DeleteContentBackward => {
                if start == end {
                    if start == 0 {
                        return;
                    }
                    (splice_chars(&text, start - 1, start, ""), start - 1)
                } else {
                    (splice_chars(&text, start, end, ""), start)
                }
            }
            InputType::DeleteContentForward => {
                if start == end {
                    if start >= char_len(&text) {
                        return;
                    }
                    (splice_chars(&text, start, start + 1, ""), start)
                } else {
                    (splice_chars(&text, start, end, ""), start)
                }
            }
            InputType::DeleteByCut => {
                if start == end {
                    return;
                }
                (splice_chars(&text, start, end, ""), start)
            }
            InputType::Other => return,
        };

        self.surface.set_value(&new_text);
        self.surface.set_selection(SelectionRange::caret(caret));
    }
}
