//! Versioned backup rotation and the destructive-write guard.
//!
//! Two independent responsibilities live here, sharing no state:
//!
//! - **Versioned snapshotting**: immutable, timestamp-named copies of a file
//!   (`<name>.<timestamp>.backup`), created explicitly by the application
//!   (typically on start and exit) and pruned to a fixed retention count.
//! - **Write guard**: a heuristic check run before every overwrite of the
//!   primary project collection, refusing writes that would shrink a
//!   multi-record collection to near-empty in one step.
//!
//! Snapshot timestamps are RFC 3339 instants with `:` and `.` replaced by
//! `-` to stay filesystem-safe. Lexicographic order of the embedded
//! timestamp equals chronological order, so pruning never parses dates.

use crate::domain::error::Result;
use crate::storage::PROJECTS_FILE;
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::Path;

/// Maximum number of versioned backups retained per base filename.
pub const MAX_VERSIONED_BACKUPS: usize = 10;

/// Guard threshold: the existing collection must hold more records than this
/// for the guard to consider rejecting.
///
/// The `> 2` / `<= 1` pair is a heuristic tuned for the project collection;
/// it catches the one observed failure mode (an empty in-memory collection
/// written back over real data) without modeling intent. Tunable, but the
/// values are load-bearing for behavioral compatibility.
pub const GUARD_EXISTING_THRESHOLD: usize = 2;

/// Guard threshold: the incoming collection must hold at most this many
/// records for the guard to consider rejecting.
pub const GUARD_INCOMING_THRESHOLD: usize = 1;

/// Creates a timestamped snapshot of a file, then prunes old snapshots.
///
/// No-op when the primary file does not exist. The snapshot is named
/// `<filename>.<timestamp>.backup` and is never touched again after
/// creation; rotation keeps the [`MAX_VERSIONED_BACKUPS`] most recent.
///
/// # Errors
///
/// Returns an error when the snapshot copy itself fails. Pruning failures
/// are logged and swallowed; rotation never blocks the caller.
///
/// # Examples
///
/// ```no_run
/// use context_forge_store::storage::create_versioned_backup;
/// use std::path::Path;
///
/// create_versioned_backup(Path::new("/tmp/context-forge"), "projects.json")?;
/// # Ok::<(), context_forge_store::StorageError>(())
/// ```
pub fn create_versioned_backup(storage_path: &Path, filename: &str) -> Result<()> {
    let file_path = storage_path.join(filename);
    if !file_path.exists() {
        return Ok(());
    }

    let timestamp = Utc::now()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    let versioned_name = format!("{filename}.{timestamp}.backup");
    fs::copy(&file_path, storage_path.join(&versioned_name))?;
    tracing::info!(snapshot = %versioned_name, "versioned backup created");

    prune_old_backups(storage_path, filename);
    Ok(())
}

/// Prunes versioned backups beyond the retention limit.
///
/// Selects directory entries named `<filename>.<anything>.backup`, excluding
/// the rolling `<filename>.backup`, sorts them newest-first by the embedded
/// timestamp, and deletes everything beyond the retention count. Any failure
/// while listing or deleting is logged, never propagated.
pub fn prune_old_backups(storage_path: &Path, filename: &str) {
    if let Err(e) = try_prune(storage_path, filename) {
        tracing::error!(error = %e, filename, "backup rotation failed");
    }
}

/// Fallible pruning body; the public wrapper discards the error by design.
fn try_prune(storage_path: &Path, filename: &str) -> Result<()> {
    let versioned_prefix = format!("{filename}.");
    let rolling_backup = format!("{filename}.backup");

    let mut versioned: Vec<String> = fs::read_dir(storage_path)?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| {
            name.starts_with(&versioned_prefix)
                && name.ends_with(".backup")
                && name != &rolling_backup
        })
        .collect();

    // Newest first: ISO timestamps sort lexicographically.
    versioned.sort();
    versioned.reverse();

    let mut pruned = 0usize;
    for old in versioned.iter().skip(MAX_VERSIONED_BACKUPS) {
        fs::remove_file(storage_path.join(old))?;
        pruned += 1;
    }

    if pruned > 0 {
        tracing::info!(pruned, filename, "pruned old versioned backups");
    }
    Ok(())
}

/// Checks whether a write would cause suspicious mass data loss.
///
/// Applies only to the primary project collection; every other filename
/// passes unconditionally. Returns `None` when the write is allowed, or a
/// rejection message carrying the existing and incoming record counts.
///
/// The guard fails open: when it cannot parse the existing file or the
/// incoming content, the write is allowed: corrupt existing state must not
/// permanently lock out all future writes.
#[must_use]
pub fn check_write_guard(storage_path: &Path, filename: &str, incoming: &str) -> Option<String> {
    if filename != PROJECTS_FILE {
        return None;
    }

    let file_path = storage_path.join(filename);
    if !file_path.exists() {
        return None;
    }

    match evaluate_guard(&file_path, incoming) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::warn!(error = %e, filename, "write guard check failed, allowing write");
            None
        }
    }
}

/// Fallible guard body; parse failures surface here and the caller treats
/// them as "allow".
fn evaluate_guard(file_path: &Path, incoming: &str) -> Result<Option<String>> {
    let existing = fs::read_to_string(file_path)?;
    let existing: serde_json::Value = serde_json::from_str(&existing)?;
    let incoming: serde_json::Value = serde_json::from_str(incoming)?;

    if let (serde_json::Value::Array(existing), serde_json::Value::Array(incoming)) =
        (existing, incoming)
    {
        if existing.len() > GUARD_EXISTING_THRESHOLD && incoming.len() <= GUARD_INCOMING_THRESHOLD {
            return Ok(Some(format!(
                "Write guard: significant data reduction detected ({} -> {})",
                existing.len(),
                incoming.len()
            )));
        }
    }

    Ok(None)
}
