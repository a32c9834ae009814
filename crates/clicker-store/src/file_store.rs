//! JSON file persistence.
//!
//! The record lives in a single file. Saves write a sibling temporary file
//! and rename it over the target, so a crash mid-write leaves the previous
//! save intact rather than a truncated one.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use clicker_types::PersistedState;

use crate::codec;
use crate::error::StoreError;
use crate::StateStore;

/// [`StateStore`] backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store for the file at `path`. Nothing is touched until the
    /// first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The save file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StateStore for FileStore {
    fn load(&mut self) -> Result<Option<PersistedState>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No save file found");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        let record = codec::decode(&bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            balance = record.balance,
            "Loaded save file"
        );
        Ok(Some(record))
    }

    fn save(&mut self, record: &PersistedState) -> Result<(), StoreError> {
        let bytes = codec::encode(record)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let temp = self.temp_path();
        std::fs::write(&temp, &bytes)?;
        std::fs::rename(&temp, &self.path)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Wrote save file");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Removed save file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
