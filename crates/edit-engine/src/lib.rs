#![warn(missing_docs)]
//! Edit Engine - Embeddable Multi-Caret Text Editing Kernel
//!
//! # Overview
//!
//! `edit-engine` turns a plain editable surface (a single-line input or a
//! multi-line text area) into a programmable editor: multi-caret editing, a
//! coalescing undo/redo history, a uniform text-operation protocol, an
//! overlay draw model for secondary carets and plugin decorations, and a
//! pluggable extension runtime.
//!
//! The engine is headless. It does not render and does not own a widget;
//! hosts implement the [`Surface`] trait over their editable element, forward
//! raw input events into the pipeline, and render the overlay model. The
//! in-memory [`BufferSurface`] serves headless hosts and tests.
//!
//! # Core Features
//!
//! - **Cursor set**: ordered, non-overlapping carets with exactly one
//!   primary; multi-caret insert/delete primitives
//! - **Undo log**: coalesced before/after snapshots with a redo mirror
//! - **Operation protocol**: per-caret edit descriptors shared with
//!   stateless operation modules
//! - **Input pipeline**: deterministic hook routing with an IME-safe
//!   multi-caret intercept
//! - **Overlay**: content-space draw model with owner-scoped decorations
//! - **Plugin runtime**: discovery, capability gating, lifecycle, ordered
//!   hooks
//!
//! # Engine Variants
//!
//! The [`EngineVariant`] tag selects capabilities at boot:
//!
//! - **Inline** mounts directly in the host document: single caret, no
//!   overlay.
//! - **Framed** isolates the surface in a nested browsing context described
//!   by a [`FrameDocument`]: multi-caret with the full overlay stack.
//!
//! # Quick Start
//!
//! ```rust
//! use edit_engine::{Engine, EngineSetup};
//!
//! let mut engine = Engine::new(EngineSetup::framed("abc\ndef"));
//!
//! // Place carets and type at all of them.
//! engine.set_primary_selection(1, 1);
//! engine.add_cursor(5, 5);
//! engine.insert_at_all_cursors("X");
//!
//! assert_eq!(engine.text(), "aXbc\ndXef");
//! assert!(engine.undo());
//! assert_eq!(engine.text(), "abc\ndef");
//! ```
//!
//! # Module Description
//!
//! - [`engine`] - engine variants, boot, destruction, plugin lifecycle
//! - [`pipeline`] - surface-event entry points and ordering guarantees
//! - [`cursor`] - the cursor set and multi-caret transforms
//! - [`history`] - the coalescing undo log
//! - [`operation`] - the operation protocol and executor primitives
//! - [`hooks`] - the ordered hook protocol
//! - [`runtime`] - plugin modules, metadata, and runtime bookkeeping
//! - [`geometry`] - offset ↔ pixel mapping against surface metrics
//! - [`overlay`] - the framed variant's draw model
//! - [`surface`] - the editable-surface seam
//! - [`store`] - the host content-store seam
//! - [`messages`] - the host message surface
//! - [`config`] - host attribute parsing
//! - [`frame`] - the framed variant's boot document

pub mod clock;
pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod history;
pub mod hooks;
pub mod line_index;
pub mod messages;
pub mod operation;
pub mod overlay;
pub mod pipeline;
pub mod runtime;
pub mod store;
pub mod surface;
pub mod text;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use cursor::{Cursor, CursorId, CursorSet, DeleteDirection};
pub use engine::{Engine, EngineSetup, EngineVariant};
pub use error::EngineError;
pub use event::{EventDisposition, InputEvent, InputType, KeyEvent, Modifiers, SurfaceEvent};
pub use frame::{FrameDocument, FramePalette};
pub use geometry::{CaretRect, RangeRect};
pub use history::{Snapshot, UndoEntry, UndoLog};
pub use hooks::{Hook, HookData, HookOutcome, HookReply};
pub use line_index::LineIndex;
pub use messages::EngineMessage;
pub use operation::{
    LinkStyle, OpParams, OperationInput, OperationModule, SelectMode, TextOperation, TrimMode,
};
pub use overlay::{DecorationNode, Overlay};
pub use pipeline::POLL_INTERVAL_MS;
pub use runtime::{
    CommandSpec, Plugin, PluginMetadata, PluginModule, PluginReason, PluginStatus, VariantSupport,
};
pub use store::{ContentStore, MemoryStore, StoreItem};
pub use surface::{BufferSurface, ScrollOffsets, SelectionRange, Surface, SurfaceLayout, WrapMode};
