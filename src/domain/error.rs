//! Error types for the storage subsystem.
//!
//! This module defines the centralized error type [`StorageError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! # Taxonomy
//!
//! The variants fall into three groups:
//!
//! - **Caller errors**, raised before any I/O happens:
//!   [`StorageError::InvalidFilename`] and [`StorageError::InvalidContent`].
//! - **Data-state errors**: [`StorageError::NotFound`] (no data yet),
//!   [`StorageError::Corrupted`] (data destroyed and unrecoverable),
//!   [`StorageError::ProjectNotFound`] (collection-level miss), and
//!   [`StorageError::GuardRejected`] (a suspicious destructive write was refused).
//! - **Ambient failures** wrapped from external crates: [`StorageError::Io`] and
//!   [`StorageError::Serialization`], plus [`StorageError::Config`] for
//!   unresolvable platform directories.

use thiserror::Error;

/// The main error type for storage operations.
///
/// Callers of the store see either a successful result or one of these typed
/// errors with enough context (filename, id, record counts) to construct an
/// actionable message.
///
/// # Examples
///
/// ```
/// use context_forge_store::{Result, StorageError};
///
/// fn reject_bad_name(name: &str) -> Result<()> {
///     Err(StorageError::InvalidFilename(name.to_string()))
/// }
///
/// assert!(matches!(
///     reject_bad_name("../etc/passwd"),
///     Err(StorageError::InvalidFilename(_))
/// ));
/// ```
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filename contains a path separator or parent-directory segment.
    ///
    /// Raised before any I/O occurs; this is the only input sanitization the
    /// file store performs, applied identically to every operation.
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    /// Primary file is absent and no valid backup exists.
    ///
    /// Distinct from [`StorageError::Corrupted`]: callers use this variant to
    /// tell "no data yet" (expected for a fresh install) apart from "data
    /// destroyed".
    #[error("File not found: {0}")]
    NotFound(String),

    /// Primary file is present but unreadable or unparsable, and no valid
    /// backup is available to recover from.
    #[error("File corrupted and no valid backup available: {0}")]
    Corrupted(String),

    /// Caller tried to write content that is not valid JSON.
    ///
    /// The primary file is left untouched when this is raised.
    #[error("Invalid JSON data for {0}")]
    InvalidContent(String),

    /// The write guard heuristic blocked a suspicious destructive write.
    ///
    /// The message carries the existing and incoming record counts.
    #[error("{0}")]
    GuardRejected(String),

    /// Update or delete target absent from the project collection.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Platform configuration directory could not be resolved.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized `Result` type for storage operations.
///
/// # Examples
///
/// ```
/// use context_forge_store::Result;
///
/// fn noop() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, StorageError>;
