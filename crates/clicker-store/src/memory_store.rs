//! In-process persistence.
//!
//! [`MemoryStore`] keeps the record behind a shared handle, so a clone
//! held by a test still sees what the session wrote after the session has
//! taken ownership of its own copy. Saves and clears can be made to fail on
//! demand to exercise the unavailable-storage path.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use clicker_types::PersistedState;

use crate::error::StoreError;
use crate::StateStore;

#[derive(Debug, Default)]
struct Shared {
    record: Mutex<Option<PersistedState>>,
    fail_saves: AtomicBool,
    fail_clears: AtomicBool,
    saves: AtomicU64,
    clears: AtomicU64,
}

/// [`StateStore`] that keeps the record in memory. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `record`.
    pub fn with_record(record: PersistedState) -> Self {
        let store = Self::default();
        if let Ok(mut guard) = store.shared.record.lock() {
            *guard = Some(record);
        }
        store
    }

    /// The record currently held, if any.
    pub fn record(&self) -> Option<PersistedState> {
        self.shared
            .record
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }

    /// Make subsequent saves fail with [`StoreError::Unavailable`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.shared.fail_saves.store(fail, Ordering::Release);
    }

    /// Make subsequent clears fail with [`StoreError::Unavailable`].
    pub fn set_fail_clears(&self, fail: bool) {
        self.shared.fail_clears.store(fail, Ordering::Release);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> u64 {
        self.shared.saves.load(Ordering::Acquire)
    }

    /// Number of successful clears so far.
    pub fn clear_count(&self) -> u64 {
        self.shared.clears.load(Ordering::Acquire)
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<PersistedState>>, StoreError> {
        self.shared
            .record
            .lock()
            .map_err(|_poisoned| StoreError::Unavailable("memory store lock poisoned".to_owned()))
    }
}

impl StateStore for MemoryStore {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        Ok(self.slot()?.clone())
    }

    fn save(&mut self, record: &PersistedState) -> Result<(), StoreError> {
        if self.shared.fail_saves.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("save rejected".to_owned()));
        }
        *self.slot()? = Some(record.clone());
        self.shared.saves.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        if self.shared.fail_clears.load(Ordering::Acquire) {
            return Err(StoreError::Unavailable("clear rejected".to_owned()));
        }
        *self.slot()? = None;
        self.shared.clears.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_storage() {
        let observer = MemoryStore::new();
        let mut writer = observer.clone();
        writer
            .save(&PersistedState {
                balance: 9,
                ..PersistedState::default()
            })
            .unwrap();
        assert_eq!(observer.record().map(|r| r.balance), Some(9));
        assert_eq!(observer.save_count(), 1);
    }

    #[test]
    fn failing_saves_keep_previous_record() {
        let mut store = MemoryStore::with_record(PersistedState {
            balance: 3,
            ..PersistedState::default()
        });
        store.set_fail_saves(true);
        let result = store.save(&PersistedState::default());
        assert!(matches!(result, Err(StoreError::Unavailable(_))));
        assert_eq!(store.load().unwrap().map(|r| r.balance), Some(3));
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn clear_empties() {
        let mut store = MemoryStore::with_record(PersistedState::default());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        assert_eq!(store.clear_count(), 1);
    }

    #[test]
    fn failing_clears_keep_record() {
        let mut store = MemoryStore::with_record(PersistedState {
            balance: 7,
            ..PersistedState::default()
        });
        store.set_fail_clears(true);
        assert!(matches!(store.clear(), Err(StoreError::Unavailable(_))));
        assert_eq!(store.load().unwrap().map(|r| r.balance), Some(7));
        assert_eq!(store.clear_count(), 0);
    }
}
