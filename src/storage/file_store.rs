//! Atomic single-file JSON storage.
//!
//! This module provides the low-level file store used for every document the
//! application persists. It implements atomic writes (write-to-temp + rename),
//! a rolling single-level backup taken before each overwrite, and read-time
//! recovery from a corrupted primary file.
//!
//! # Crash safety
//!
//! Within one `write`, the backup-then-tempwrite-then-rename sequence is the
//! unit of crash safety: a crash at any point before the rename leaves the
//! prior primary intact; a crash during or after the rename leaves either the
//! old or the new complete content, never a partial file, because rename is
//! atomic within a filesystem.
//!
//! # Performance Characteristics
//!
//! - **Read**: O(file size) - loads the entire document into memory
//! - **Write**: O(file size) - rewrites the entire document
//! - **Best for**: small per-user JSON documents, infrequent writes

use crate::domain::error::{Result, StorageError};
use crate::storage::backup;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of a successful [`FileStore::read`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadResult {
    /// The document content, validated to parse as JSON.
    pub data: String,

    /// `true` when the content came from the `.backup` file because the
    /// primary was missing or corrupt.
    pub recovered: bool,

    /// Human-readable explanation attached to recovered reads.
    pub message: Option<String>,
}

/// Validates a filename, rejecting path separators and parent segments.
///
/// This is the only input sanitization the store performs and it applies
/// identically to every operation, before any I/O occurs.
fn validate_filename(filename: &str) -> Result<()> {
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        return Err(StorageError::InvalidFilename(filename.to_string()));
    }
    Ok(())
}

/// Why a primary or backup file could not be loaded.
enum LoadFailure {
    /// The file does not exist.
    Missing,
    /// The file exists but could not be read or did not parse as JSON.
    Invalid,
}

/// Loads a file and validates that it parses as JSON.
fn load_valid_json(path: &Path) -> std::result::Result<String, LoadFailure> {
    let data = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            LoadFailure::Missing
        } else {
            LoadFailure::Invalid
        }
    })?;

    serde_json::from_str::<serde_json::Value>(&data).map_err(|_| LoadFailure::Invalid)?;
    Ok(data)
}

/// Filename-agnostic JSON file store over one storage directory.
///
/// Each named document gets a primary file, a rolling `<name>.backup`
/// sibling, and a transient `<name>.tmp` that never survives a returned
/// `write` call. The store holds no in-memory cache; every operation is a
/// sequence of blocking filesystem calls.
///
/// # Concurrency
///
/// No cross-call locking is implemented. Two concurrent read-modify-write
/// cycles against the same file are last-writer-wins at the granularity of
/// the temp-file rename; an accepted limitation for a single-user desktop
/// context.
///
/// # Examples
///
/// ```no_run
/// use context_forge_store::storage::FileStore;
/// use std::path::PathBuf;
///
/// let store = FileStore::new(PathBuf::from("/tmp/context-forge"));
/// store.write("state.json", r#"{"theme":"dark"}"#)?;
///
/// let result = store.read("state.json")?;
/// assert!(!result.recovered);
/// # Ok::<(), context_forge_store::StorageError>(())
/// ```
pub struct FileStore {
    /// Directory holding every managed document.
    storage_path: PathBuf,
}

impl FileStore {
    /// Creates a store rooted at the given directory.
    ///
    /// The directory itself is created lazily on first write.
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
        }
    }

    /// Returns the directory this store operates in.
    #[must_use]
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Reads a named document, recovering from the backup when needed.
    ///
    /// The primary file is tried first. When it is missing or does not parse
    /// as JSON, the `.backup` sibling is tried; if the backup parses, it is
    /// copied back over the primary (best effort, failure logged and
    /// swallowed) and returned with `recovered = true`.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidFilename`] before any I/O for bad names.
    /// - [`StorageError::NotFound`] when the primary is missing and no valid
    ///   backup exists ("no data yet").
    /// - [`StorageError::Corrupted`] when the primary exists but is
    ///   unreadable or unparsable and the backup cannot help ("data
    ///   destroyed").
    pub fn read(&self, filename: &str) -> Result<ReadResult> {
        validate_filename(filename)?;
        let _span = tracing::debug_span!("storage_read", filename = %filename).entered();

        let file_path = self.storage_path.join(filename);
        let backup_path = self.storage_path.join(format!("{filename}.backup"));

        let primary_failure = match load_valid_json(&file_path) {
            Ok(data) => {
                tracing::debug!(bytes = data.len(), "read primary file");
                return Ok(ReadResult {
                    data,
                    recovered: false,
                    message: None,
                });
            }
            Err(failure) => failure,
        };

        match load_valid_json(&backup_path) {
            Ok(backup_data) => {
                // Best-effort restoration of the primary; the read still
                // succeeds if this fails.
                if let Err(e) = fs::copy(&backup_path, &file_path) {
                    tracing::warn!(error = %e, filename, "failed to restore primary from backup");
                }

                tracing::warn!(filename, "primary missing or corrupt, recovered from backup");
                Ok(ReadResult {
                    data: backup_data,
                    recovered: true,
                    message: Some("Data recovered from backup file".to_string()),
                })
            }
            Err(_) => match primary_failure {
                LoadFailure::Missing => Err(StorageError::NotFound(filename.to_string())),
                LoadFailure::Invalid => Err(StorageError::Corrupted(filename.to_string())),
            },
        }
    }

    /// Writes a named document atomically.
    ///
    /// The sequence is: write guard check, ensure the storage directory
    /// exists, best-effort copy of the current primary to `.backup`, write
    /// the content to `<name>.tmp`, validate the content parses as JSON,
    /// atomically rename the temp file over the primary. A reader always
    /// sees either the old complete content or the new complete content.
    ///
    /// The temp file never survives this call: any failure after its
    /// creation removes it best-effort before the error returns.
    ///
    /// # Errors
    ///
    /// - [`StorageError::InvalidFilename`] before any I/O for bad names.
    /// - [`StorageError::GuardRejected`] when the write guard refuses a
    ///   suspicious destructive overwrite; no filesystem changes are made.
    /// - [`StorageError::InvalidContent`] when `data` is not valid JSON; the
    ///   primary is left untouched.
    /// - [`StorageError::Io`] for directory-creation, write, or rename
    ///   failures.
    pub fn write(&self, filename: &str, data: &str) -> Result<()> {
        validate_filename(filename)?;
        let _span = tracing::debug_span!("storage_write", filename = %filename).entered();

        if let Some(reason) = backup::check_write_guard(&self.storage_path, filename, data) {
            tracing::error!(filename, %reason, "write guard rejected write");
            return Err(StorageError::GuardRejected(reason));
        }

        if !self.storage_path.exists() {
            fs::create_dir_all(&self.storage_path)?;
        }

        let file_path = self.storage_path.join(filename);
        let tmp_path = self.storage_path.join(format!("{filename}.tmp"));
        let backup_path = self.storage_path.join(format!("{filename}.backup"));

        // Single-level backup, overwritten on every write that has a primary
        // to copy from. Failure here does not abort the write.
        if file_path.exists() {
            if let Err(e) = fs::copy(&file_path, &backup_path) {
                tracing::warn!(error = %e, filename, "failed to create backup before write");
            }
        }

        let result: Result<()> = (|| {
            fs::write(&tmp_path, data)?;

            if serde_json::from_str::<serde_json::Value>(data).is_err() {
                return Err(StorageError::InvalidContent(filename.to_string()));
            }

            fs::rename(&tmp_path, &file_path)?;
            Ok(())
        })();

        if result.is_err() && tmp_path.exists() {
            let _ = fs::remove_file(&tmp_path);
        }

        if result.is_ok() {
            tracing::debug!(bytes = data.len(), "wrote file atomically");
        }
        result
    }

    /// Copies the primary file to its `.backup` sibling.
    ///
    /// No-op (not an error) when the primary does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidFilename`] for bad names and
    /// [`StorageError::Io`] when the copy itself fails.
    pub fn create_backup(&self, filename: &str) -> Result<()> {
        validate_filename(filename)?;

        let file_path = self.storage_path.join(filename);
        if !file_path.exists() {
            return Ok(());
        }

        let backup_path = self.storage_path.join(format!("{filename}.backup"));
        fs::copy(&file_path, &backup_path)?;
        tracing::debug!(filename, "created single-level backup");
        Ok(())
    }

    /// Checks whether the primary file exists.
    ///
    /// The `.backup` sibling is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidFilename`] for bad names.
    pub fn exists(&self, filename: &str) -> Result<bool> {
        validate_filename(filename)?;
        Ok(self.storage_path.join(filename).exists())
    }
}
