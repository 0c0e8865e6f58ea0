//! The ordered hook protocol plugins register into.
//!
//! Hooks fire in registration order. A handler can let the chain continue,
//! cancel it (`Prevent`: the engine then suppresses the default action and
//! skips the remaining handlers), or swap the accumulated data seen by the
//! handlers after it. Handler failures are contained: the chain continues
//! with the next handler.

use serde::Serialize;

use crate::operation::TextOperation;

/// The named lifecycle events plugins can hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Hook {
    /// Before an input mutation is applied.
    BeforeInput,
    /// After the surface applied an input mutation.
    AfterInput,
    /// Before key-down handling.
    BeforeKeydown,
    /// After key-down handling.
    AfterKeydown,
    /// Before key-press handling.
    BeforeKeypress,
    /// After key-press handling.
    AfterKeypress,
    /// Before an operation list executes; the data is the list itself.
    BeforeOperation,
    /// After an operation list executed.
    AfterOperation,
    /// Before click handling.
    BeforeClick,
    /// After click handling.
    AfterClick,
    /// The surface gained focus.
    Focus,
    /// The surface lost focus.
    Blur,
    /// The native selection moved.
    SelectionChange,
    /// An explicit overlay re-draw request.
    Render,
}

impl Hook {
    /// Every hook, in the engine's canonical order.
    pub const ALL: [Hook; 14] = [
        Hook::BeforeInput,
        Hook::AfterInput,
        Hook::BeforeKeydown,
        Hook::AfterKeydown,
        Hook::BeforeKeypress,
        Hook::AfterKeypress,
        Hook::BeforeOperation,
        Hook::AfterOperation,
        Hook::BeforeClick,
        Hook::AfterClick,
        Hook::Focus,
        Hook::Blur,
        Hook::SelectionChange,
        Hook::Render,
    ];
}

/// Data accumulated along a hook chain.
///
/// `BeforeInput` carries the pending insertion text; `BeforeOperation`
/// carries the descriptor list. A handler returning `Replace` swaps this for
/// the handlers after it and for the engine's default path.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum HookData {
    /// No payload.
    #[default]
    None,
    /// A text payload (pending insertion data).
    Text(String),
    /// An operation descriptor list.
    Operations(Vec<TextOperation>),
}

impl HookData {
    /// The text payload, if any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            HookData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The operation payload, if any.
    pub fn into_operations(self) -> Option<Vec<TextOperation>> {
        match self {
            HookData::Operations(ops) => Some(ops),
            _ => None,
        }
    }
}

/// A handler's verdict on its hook chain.
#[derive(Debug, Clone, PartialEq)]
pub enum HookReply {
    /// Keep going with the current data.
    Continue,
    /// Cancel the chain and the default action.
    Prevent,
    /// Keep going, but with this data.
    Replace(HookData),
}

/// Result of running a hook chain.
#[derive(Debug, Clone, PartialEq)]
pub struct HookOutcome {
    /// Whether a handler cancelled the chain.
    pub prevented: bool,
    /// The final accumulated data.
    pub data: HookData,
}

impl HookOutcome {
    /// An outcome for a chain nobody intercepted.
    pub fn pass(data: HookData) -> Self {
        Self {
            prevented: false,
            data,
        }
    }
}
