//! Storage layer for durable project data.
//!
//! This module provides the persistence stack for the project collection:
//! a filename-agnostic atomic JSON file store, backup rotation with a
//! destructive-write guard, and the typed CRUD store layered on top.
//!
//! # Modules
//!
//! - `file_store`: atomic single-file JSON storage with backup recovery
//! - `backup`: versioned snapshot rotation and the write guard heuristic
//! - `project_store`: typed CRUD over the `projects.json` collection

pub mod backup;
pub mod file_store;
pub mod project_store;

/// Name of the managed project collection file.
///
/// The write guard applies to this file only; the file store itself is
/// filename-agnostic and is reused for other small JSON documents.
pub const PROJECTS_FILE: &str = "projects.json";

pub use backup::{
    check_write_guard, create_versioned_backup, prune_old_backups, MAX_VERSIONED_BACKUPS,
};
pub use file_store::{FileStore, ReadResult};
pub use project_store::ProjectStore;
