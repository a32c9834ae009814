//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure that can stop startup or shutdown,
//! so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: clicker_core::config::ConfigError,
    },

    /// The configured upgrade catalog is invalid.
    #[error("catalog error: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: clicker_economy::CatalogError,
    },

    /// The session stopped before it could be shut down cleanly.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: clicker_core::session::SessionError,
    },

    /// The session task panicked or was cancelled.
    #[error("session task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
