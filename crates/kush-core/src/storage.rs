#![forbid(unsafe_code)]

//! String-keyed persistent storage.
//!
//! Mirrors the browser's `localStorage` contract: string keys, string values,
//! survives page loads. [`MemoryStorage`] backs tests and hosts without
//! persistence; [`FileStorage`] keeps a JSON object on disk for native
//! hosts. The wasm host implements [`StorageBackend`] over `localStorage`.

use std::collections::BTreeMap;

/// Errors from a storage backend.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying I/O failed.
    Io(std::io::Error),
    /// The backing file was not a JSON object of strings.
    Corrupt(String),
    /// The host refused the operation (quota, privacy mode, ...).
    Unavailable(String),
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "storage I/O error: {err}"),
            Self::Corrupt(msg) => write!(f, "storage file is corrupt: {msg}"),
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Corrupt(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A string key/value store.
pub trait StorageBackend {
    fn load(&self, key: &str) -> StorageResult<Option<String>>;
    fn store(&mut self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<S: StorageBackend + ?Sized> StorageBackend for Box<S> {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).load(key)
    }

    fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).store(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// In-process storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    entries: BTreeMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};

    use super::{StorageBackend, StorageError, StorageResult};

    /// Storage kept as one JSON object (`{"key": "value", ...}`) in a file.
    ///
    /// Writes go to a sibling temp file first and are renamed into place.
    #[derive(Debug, Clone)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
            match std::fs::read_to_string(&self.path) {
                Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(content) => serde_json::from_str(&content)
                    .map_err(|e| StorageError::Corrupt(e.to_string())),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(err) => Err(err.into()),
            }
        }

        fn write_all(&self, entries: &BTreeMap<String, String>) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(entries)
                .map_err(|e| StorageError::Corrupt(e.to_string()))?;
            let tmp = self.path.with_extension("tmp");
            std::fs::write(&tmp, json)?;
            std::fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn load(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read_all()?.remove(key))
        }

        fn store(&mut self, key: &str, value: &str) -> StorageResult<()> {
            let mut entries = self.read_all()?;
            entries.insert(key.to_string(), value.to_string());
            self.write_all(&entries)
        }

        fn remove(&mut self, key: &str) -> StorageResult<()> {
            let mut entries = self.read_all()?;
            if entries.remove(key).is_some() {
                self.write_all(&entries)?;
            }
            Ok(())
        }
    }
}
