//! Key-value blob persistence.
//!
//! Each store owns one key and keeps its whole state in a single JSON blob,
//! the way a browser keeps state in local storage. The stores only ever talk
//! to the [`BlobStorage`] trait, so the same code runs against files on disk
//! ([`FileStorage`]) or an in-process map ([`MemoryStorage`]).

use crate::constants::{BLOB_FILE_EXTENSION, LOCK_FILE_NAME};
use crate::errors::StorageError;
use fs2::FileExt;
use serde::Serialize;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A minimal key-value store of string blobs.
pub trait BlobStorage {
    /// Returns the blob stored under `key`, or `None` if nothing was stored.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Replaces the blob stored under `key`.
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;
    /// Deletes the blob stored under `key`. Missing keys are not an error.
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}

impl<S: BlobStorage + ?Sized> BlobStorage for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }
}

/// Blob storage backed by one JSON file per key inside a data directory.
///
/// Writes go through a temporary file in the same directory followed by an
/// atomic rename, while holding an exclusive lock on `<data_dir>/.lock`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    /// Creates a file storage rooted at `data_dir`. The directory is created lazily.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Directory holding the blobs.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the file backing `key`.
    pub fn blob_path(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .data_dir
            .join(format!("{}.{}", key, BLOB_FILE_EXTENSION)))
    }

    fn ensure_data_dir(&self) -> StorageResult<()> {
        if self.data_dir.exists() {
            return Ok(());
        }

        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        #[cfg(unix)]
        {
            let permissions =
                fs::Permissions::from_mode(crate::constants::DEFAULT_DIR_PERMISSIONS);
            fs::set_permissions(&self.data_dir, permissions).map_err(|source| {
                StorageError::Io {
                    path: self.data_dir.clone(),
                    source,
                }
            })?;
        }

        debug!("Created data directory {:?}", self.data_dir);
        Ok(())
    }

    /// Runs `f` while holding the exclusive write lock.
    fn with_write_lock<T>(&self, f: impl FnOnce() -> StorageResult<T>) -> StorageResult<T> {
        self.ensure_data_dir()?;
        let lock_path = self.data_dir.join(LOCK_FILE_NAME);
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|source| StorageError::Lock {
                path: lock_path.clone(),
                source,
            })?;

        lock_file
            .lock_exclusive()
            .map_err(|source| StorageError::Lock {
                path: lock_path.clone(),
                source,
            })?;

        let result = f();

        // Released on drop as well
        let _ = FileExt::unlock(&lock_file);
        result
    }
}

impl BlobStorage for FileStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.blob_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.blob_path(key)?;
        self.with_write_lock(|| {
            let io_err = |source| StorageError::Io {
                path: path.clone(),
                source,
            };

            let mut temp = NamedTempFile::new_in(&self.data_dir).map_err(io_err)?;
            temp.write_all(value.as_bytes()).map_err(io_err)?;
            temp.as_file().sync_all().map_err(io_err)?;

            #[cfg(unix)]
            {
                let permissions =
                    fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
                temp.as_file().set_permissions(permissions).map_err(io_err)?;
            }

            temp.persist(&path).map_err(|e| io_err(e.error))?;
            debug!("Wrote {} bytes to {:?}", value.len(), path);
            Ok(())
        })
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        let path = self.blob_path(key)?;
        if !self.data_dir.exists() {
            return Ok(());
        }
        self.with_write_lock(|| match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                path: path.clone(),
                source,
            }),
        })
    }
}

/// Blob storage held in memory. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl BlobStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        validate_key(key)?;
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

/// Serializes `value` as JSON and stores it under `key`.
pub fn set_json<S, T>(storage: &S, key: &str, value: &T) -> StorageResult<()>
where
    S: BlobStorage + ?Sized,
    T: Serialize + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|source| StorageError::Serialize {
        key: key.to_string(),
        source,
    })?;
    storage.set_item(key, &encoded)
}

/// Keys map directly to file names: ASCII letters, digits, `-` and `_` only.
fn validate_key(key: &str) -> StorageResult<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}
