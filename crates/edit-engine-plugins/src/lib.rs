#![warn(missing_docs)]
//! The standard plugin set for `edit-engine`.
//!
//! Each plugin implements the engine's [`Plugin`](edit_engine::Plugin)
//! contract and ships a [`PluginModule`](edit_engine::PluginModule)
//! descriptor for the runtime. [`standard_modules`] bundles them all;
//! hosts can also pick individual modules.
//!
//! The plugins here cover the engine-model side of their features. Popup
//! and panel UIs (search box, register picker, history panel) are
//! host-owned; the plugins answer the corresponding messages and expose the
//! data those UIs render.
//!
//! ```rust
//! use edit_engine::{Engine, EngineMessage, EngineSetup};
//! use edit_engine_plugins::standard_modules;
//!
//! let mut setup = EngineSetup::framed("one\ntwo\none");
//! setup.modules = standard_modules();
//! setup.operations = edit_engine_ops::standard_operations();
//! let mut engine = Engine::new(setup);
//!
//! engine.set_primary_selection(0, 3);
//! engine.handle_message(EngineMessage::SelectAllOccurrences);
//! assert_eq!(engine.cursors().len(), 2);
//! ```

use edit_engine::runtime::PluginModule;

pub mod brackets;
pub mod fold;
pub mod history_view;
pub mod indent;
pub mod line_ops;
pub mod multicaret;
pub mod navigation;
pub mod registers;
pub mod search;
pub mod structure;

pub use brackets::BracketPairsPlugin;
pub use fold::{FOLD_OWNER, FoldPlugin, FoldRegion, section_regions};
pub use history_view::{HistoryTimelinePlugin, TimelineEntry, timeline};
pub use indent::SmartIndentPlugin;
pub use line_ops::LineOpsPlugin;
pub use multicaret::MultiCaretPlugin;
pub use navigation::{DocumentSymbol, NavigationPlugin, document_symbols, match_bracket};
pub use registers::{CLIPBOARD_REGISTER, REGISTERS_ITEM, RegistersPlugin};
pub use search::{
    SEARCH_OWNER, SearchError, SearchMatch, SearchOptions, SearchPlugin, find_all, find_next,
    find_prev,
};
pub use structure::StructurePlugin;

/// The full standard module set, in discovery order.
pub fn standard_modules() -> Vec<PluginModule> {
    vec![
        SearchPlugin::module(),
        LineOpsPlugin::module(),
        FoldPlugin::module(),
        MultiCaretPlugin::module(),
        NavigationPlugin::module(),
        RegistersPlugin::module(),
        HistoryTimelinePlugin::module(),
        StructurePlugin::module(),
        BracketPairsPlugin::module(),
        SmartIndentPlugin::module(),
    ]
}
