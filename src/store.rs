// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Blackhole Project

//! Persisted credential storage.
//!
//! The bearer credential lives in a single fixed-name slot. The slot is
//! written at login, read before every request, and cleared the instant a
//! 401 response is observed. Absence is a valid state.
//!
//! [`FileTokenStore`] keeps the slot as one file under the data directory;
//! [`MemoryTokenStore`] backs tests and short-lived processes.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Fixed name of the credential slot (file name on disk).
pub const TOKEN_SLOT_KEY: &str = "jwt_token";

/// Error type for credential slot operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A single-slot credential store.
///
/// Reads may interleave freely across in-flight requests; a clear is
/// last-writer-wins with no transactional guarantee. A request that captured
/// the old value just before a clear completes with the stale credential,
/// which the server then rejects and classifies on its own.
pub trait TokenStore: Send + Sync {
    /// Read the slot. `Ok(None)` means no credential is persisted.
    fn load(&self) -> Result<Option<String>, StoreError>;

    /// Write the slot, replacing any previous value.
    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Empty the slot. Clearing an already-empty slot is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// File-backed credential slot: `{data_dir}/jwt_token`, raw token bytes.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    slot_path: PathBuf,
}

impl FileTokenStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            slot_path: data_dir.as_ref().join(TOKEN_SLOT_KEY),
        }
    }

    pub fn slot_path(&self) -> &Path {
        &self.slot_path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(&self.slot_path) {
            Ok(contents) => {
                let token = contents.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.slot_path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-write never leaves a torn slot.
        let tmp_path = self.slot_path.with_extension("tmp");
        fs::write(&tmp_path, token)?;
        fs::rename(&tmp_path, &self.slot_path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.slot_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory credential slot for tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().expect("token slot lock poisoned").clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *self.slot.lock().expect("token slot lock poisoned") = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock().expect("token slot lock poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_roundtrips_a_token() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.load().unwrap(), None);
        store.save("tok-abc").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok-abc".to_string()));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        store.clear().unwrap();
        store.clear().unwrap();
    }

    #[test]
    fn file_store_treats_whitespace_slot_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        fs::write(store.slot_path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_creates_missing_data_dir_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("deeper"));

        store.save("tok").unwrap();
        assert_eq!(store.load().unwrap(), Some("tok".to_string()));
    }

    #[test]
    fn memory_store_starts_with_preloaded_token() {
        let store = MemoryTokenStore::with_token("seed");
        assert_eq!(store.load().unwrap(), Some("seed".to_string()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
