//! Engine error types.
//!
//! The engine's containment policy (never throw to the host) means most
//! failures are logged and absorbed at the nearest boundary. `EngineError`
//! covers the cases a host or plugin author can actually act on.

use thiserror::Error;

/// Errors surfaced by the engine's fallible entry points.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A plugin module's constructor failed.
    #[error("plugin '{name}' failed to construct: {message}")]
    PluginConstruction {
        /// The module name as registered.
        name: String,
        /// The constructor's failure message.
        message: String,
    },
    /// A plugin name was not found in the registered set.
    #[error("plugin '{0}' is not registered")]
    UnknownPlugin(String),
    /// A named operation module was not found.
    #[error("unknown text operation '{0}'")]
    UnknownOperation(String),
    /// A content-store access failed.
    #[error("content store error: {0}")]
    Store(String),
    /// The engine has been destroyed; the call was ignored.
    #[error("engine is destroyed")]
    Destroyed,
}
