//! Raw surface events delivered by the host.
//!
//! The host forwards its input events to the engine's pipeline entry points.
//! Event shapes follow the browser input-event vocabulary since that is what
//! editable surfaces emit, but nothing here depends on a browser: a terminal
//! or widget host synthesizes the same events.

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Control key.
    pub ctrl: bool,
    /// Platform command/meta key.
    pub meta: bool,
    /// Shift key.
    pub shift: bool,
    /// Alt/option key.
    pub alt: bool,
}

impl Modifiers {
    /// Whether the platform primary modifier (ctrl or meta) is down.
    pub fn primary(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key event (`keydown`/`keypress`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The logical key, in the host's key-name vocabulary
    /// (`"a"`, `"Enter"`, `"Escape"`, `"Backspace"`, ...).
    pub key: String,
    /// Modifier state.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Convenience constructor for an unmodified key.
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            modifiers: Modifiers::default(),
        }
    }

    /// Convenience constructor with modifiers.
    pub fn with_modifiers(key: &str, modifiers: Modifiers) -> Self {
        Self {
            key: key.to_string(),
            modifiers,
        }
    }
}

/// Semantic input types, per the input-events vocabulary the surface emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    /// Typed text.
    InsertText,
    /// Shift+Enter style line break.
    InsertLineBreak,
    /// Enter style paragraph break.
    InsertParagraph,
    /// Backspace.
    DeleteContentBackward,
    /// Delete key.
    DeleteContentForward,
    /// Cut.
    DeleteByCut,
    /// Paste.
    InsertFromPaste,
    /// IME composition update.
    InsertCompositionText,
    /// Anything else the surface reports.
    Other,
}

/// An input event (`beforeinput`/`input`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    /// What kind of mutation this is.
    pub input_type: InputType,
    /// The data to insert, when the type carries any.
    pub data: Option<String>,
    /// Whether an IME composition is in progress.
    pub is_composing: bool,
}

impl InputEvent {
    /// A plain text insertion.
    pub fn insert_text(data: &str) -> Self {
        Self {
            input_type: InputType::InsertText,
            data: Some(data.to_string()),
            is_composing: false,
        }
    }

    /// A deletion event of the given direction.
    pub fn delete(input_type: InputType) -> Self {
        Self {
            input_type,
            data: None,
            is_composing: false,
        }
    }
}

/// Any event the pipeline routes through hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer click, with the char offset under the pointer when known.
    Click {
        /// Offset under the pointer, if the host resolved one.
        offset: Option<usize>,
    },
    /// Key down.
    Keydown(KeyEvent),
    /// Key press.
    Keypress(KeyEvent),
    /// Cancellable pre-mutation input.
    BeforeInput(InputEvent),
    /// Post-mutation input.
    Input(InputEvent),
    /// IME composition started.
    CompositionStart,
    /// IME composition ended with the final composed text.
    CompositionEnd {
        /// The composed text, if the surface reported it.
        data: Option<String>,
    },
    /// Focus gained.
    Focus,
    /// Focus lost.
    Blur,
    /// Native selection changed via the surface.
    Select,
    /// The surface scrolled.
    Scroll,
    /// Synthetic event for hook dispatches with no originating input.
    None,
}

/// What the host should do with the originating event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventDisposition {
    /// When `true`, the host must call `preventDefault` (or skip its own
    /// default handling) for the originating event.
    pub default_prevented: bool,
}

impl EventDisposition {
    /// The default was allowed.
    pub fn passed() -> Self {
        Self {
            default_prevented: false,
        }
    }

    /// The default was suppressed.
    pub fn prevented() -> Self {
        Self {
            default_prevented: true,
        }
    }
}
