//! Storage directory resolution.
//!
//! This module determines where the project collection lives on disk. The
//! resolution order is a single environment override followed by the
//! platform-conventional per-application configuration directory, plus one
//! fixed historical location consulted only by the one-time legacy import.

use crate::domain::error::{Result, StorageError};
use directories::{BaseDirs, ProjectDirs};
use std::env;
use std::path::PathBuf;

/// Environment variable overriding the storage directory.
///
/// Useful for tests and for users who keep their data on a synced drive.
pub const DATA_DIR_ENV: &str = "CONTEXT_FORGE_DATA_DIR";

/// Returns the canonical storage directory for application data.
///
/// Resolution order:
///
/// 1. The [`DATA_DIR_ENV`] environment variable, when set and non-empty.
/// 2. The platform config directory for `context-forge` (e.g.
///    `~/.config/context-forge` on Linux, `~/Library/Application Support`
///    on macOS, `%APPDATA%` on Windows).
///
/// The directory is not created here; it is created lazily on first write.
///
/// # Errors
///
/// Returns [`StorageError::Config`] if the platform provides no home
/// directory to resolve against and no override is set.
///
/// # Examples
///
/// ```no_run
/// use context_forge_store::infrastructure::storage_dir;
///
/// let dir = storage_dir()?;
/// println!("projects live in {}", dir.display());
/// # Ok::<(), context_forge_store::StorageError>(())
/// ```
pub fn storage_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os(DATA_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    ProjectDirs::from("com", "context-forge", "context-forge")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            StorageError::Config("could not determine platform config directory".to_string())
        })
}

/// Returns the legacy storage location used by old desktop builds, if any.
///
/// Earlier releases embedded the store in a desktop shell that kept its data
/// under the macOS application-support tree. That location is consulted
/// exactly once, for the one-time import on first access; on other platforms
/// the conventional directory already matches and there is nothing to
/// migrate.
#[must_use]
pub fn legacy_storage_dir() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        BaseDirs::new().map(|base| {
            base.home_dir()
                .join("Library")
                .join("Application Support")
                .join("context-forge")
                .join("context-forge")
        })
    } else {
        None
    }
}
