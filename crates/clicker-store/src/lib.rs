//! Persistence layer for the cube clicker economy.
//!
//! The economy core only needs a load/save contract; this crate defines it
//! as the [`StateStore`] trait and ships two implementations.
//!
//! ```text
//! Session runner
//!     |
//!     +-- load() at startup ----------+
//!     +-- save() on debounce / exit --+--> StateStore
//!     +-- clear() on reset -----------+      |-- FileStore   (JSON file)
//!                                            +-- MemoryStore (in-process)
//! ```
//!
//! # Modules
//!
//! - [`codec`] -- Lenient JSON encoding of [`PersistedState`]
//! - [`file_store`] -- JSON file on disk, replaced atomically
//! - [`memory_store`] -- In-process store with failure injection
//! - [`error`] -- Shared error types
//!
//! [`PersistedState`]: clicker_types::PersistedState

pub mod codec;
pub mod error;
pub mod file_store;
pub mod memory_store;

use clicker_types::PersistedState;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

/// Load/save contract between the session and a storage medium.
///
/// Failures are reported, never fatal: the session keeps playing from
/// memory and retries on its next flush window.
pub trait StateStore: Send {
    /// Read the saved record.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet (first run).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the medium cannot be read or the
    /// record is not a JSON object.
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError>;

    /// Replace the saved record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the medium rejects the write.
    fn save(&mut self, record: &PersistedState) -> Result<(), StoreError>;

    /// Remove the saved record. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the medium rejects the removal.
    fn clear(&mut self) -> Result<(), StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for Box<S> {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        (**self).load()
    }

    fn save(&mut self, record: &PersistedState) -> Result<(), StoreError> {
        (**self).save(record)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        (**self).clear()
    }
}
