//! File-based store for persistent storage.

use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A store that keeps the document in a single UTF-8 file.
///
/// Every [`replace`](DocumentStore::replace) writes the new text to a
/// temporary file next to the document and renames it over the document.
/// Readers see either the old or the new text, never a mix.
///
/// # Durability
///
/// - With `sync_on_write` (the default) the temporary file is synced before
///   the rename and the directory after it
/// - Without it, data is only pushed to the OS with `File::flush()`
///
/// # Thread Safety
///
/// The store holds no file handle and takes no lock. Each writer gets its
/// own temporary file, so concurrent replaces never interleave; the last
/// rename wins.
///
/// # Example
///
/// ```no_run
/// use scratchpad_store::{DocumentStore, FileStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("shared_scratchpad.txt")).unwrap();
/// store.replace("persistent notes").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    sync_on_write: bool,
}

impl FileStore {
    /// Opens the store at `path`, creating an empty document if absent.
    ///
    /// An existing file is left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            sync_on_write: true,
        })
    }

    /// Opens the store, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directories cannot be created or the file
    /// cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Self::open(path)
    }

    /// Refers to the document at `path` without touching the filesystem.
    ///
    /// Reads of a missing file fail with [`StoreError::NotFound`].
    #[must_use]
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            sync_on_write: true,
        }
    }

    /// Sets whether each write is followed by `sync_all`.
    #[must_use]
    pub fn with_sync_on_write(mut self, sync_on_write: bool) -> Self {
        self.sync_on_write = sync_on_write;
        self
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }
}

impl DocumentStore for FileStore {
    fn read(&self) -> StoreResult<String> {
        let bytes = fs::read(&self.path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound {
                path: self.path.clone(),
            },
            _ => StoreError::Io(err),
        })?;

        Ok(String::from_utf8(bytes)?)
    }

    fn replace(&self, content: &str) -> StoreResult<()> {
        let dir = self.dir();
        let mut temp = NamedTempFile::new_in(dir)?;

        // Keep the permissions of the document being replaced
        if let Ok(meta) = fs::metadata(&self.path) {
            temp.as_file().set_permissions(meta.permissions())?;
        }

        temp.write_all(content.as_bytes())?;
        temp.flush()?;
        if self.sync_on_write {
            temp.as_file().sync_all()?;
        }

        temp.persist(&self.path).map_err(|err| StoreError::Io(err.error))?;

        if self.sync_on_write {
            sync_directory(dir)?;
        }
        Ok(())
    }
}

/// Syncs directory entries so a rename survives a crash.
#[cfg(unix)]
fn sync_directory(dir: &Path) -> StoreResult<()> {
    fs::File::open(dir)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_directory(_dir: &Path) -> StoreResult<()> {
    Ok(())
}
