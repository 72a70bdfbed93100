//! Context Forge Store: durable single-file JSON storage for project
//! configuration records.
//!
//! This crate is the persistence core of Context Forge, a desktop tool that
//! assembles text prompts for an AI coding assistant from small
//! project-configuration records. It keeps those records durable across
//! process restarts, crashes, and corrupted-file scenarios on a single
//! user's machine:
//!
//! - Atomic writes (write-to-temp + rename) so a reader never observes a
//!   half-written file
//! - A rolling single-level `.backup` taken before every overwrite, used for
//!   read-time corruption recovery
//! - Timestamped versioned snapshots with bounded retention
//! - A heuristic write guard that refuses writes which would shrink a
//!   multi-record collection to near-empty in one step
//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Consumers (desktop UI via IPC, CLI/server,         │  ← Out of scope;
//! │  read-only template engine)                         │    call CRUD only
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  ProjectStore (storage/project_store)               │  ← Typed CRUD
//! │  - Id generation, timestamps                        │
//! │  - Field-default migration on read                  │
//! │  - One-time legacy import                           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌───────────────────────────┐   ┌─────────────────────┐
//! │ FileStore                 │   │ backup              │
//! │ (storage/file_store)      │──▶│ (storage/backup)    │
//! │ - Atomic read/write       │   │ - Versioned         │
//! │ - `.backup` recovery      │   │   snapshots + prune │
//! │ - Filename validation     │   │ - Write guard       │
//! └───────────────────────────┘   └─────────────────────┘
//!         │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Storage paths (infrastructure/)                  │
//! │  - Error taxonomy (domain/error)                    │
//! │  - Project record (domain/project)                  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`domain`]: Core domain types (Project, errors)
//! - [`infrastructure`]: Storage directory resolution
//! - [`storage`]: Atomic file store, backup rotation, project CRUD
//! - [`observability`]: Optional tracing subscriber bootstrap
//!
//! # Concurrency model
//!
//! Single-process and synchronous: every operation is a sequence of blocking
//! filesystem calls, no locks are held across calls, and concurrent
//! whole-collection mutations are last-writer-wins at the granularity of the
//! atomic rename. Interleaved writers can lose an update but can never
//! corrupt the file.
//!
//! # Examples
//!
//! ```no_run
//! use context_forge_store::{CreateProject, ProjectStore, UpdateProject};
//!
//! let store = ProjectStore::open()?;
//!
//! let project = store.create(CreateProject {
//!     name: "checkout-flow".to_string(),
//!     template: "default".to_string(),
//!     slice: "payments".to_string(),
//!     is_monorepo: false,
//!     ..Default::default()
//! })?;
//!
//! store.update(
//!     &project.id,
//!     UpdateProject {
//!         slice: Some("payments-v2".to_string()),
//!         ..Default::default()
//!     },
//! )?;
//!
//! for p in store.get_all()? {
//!     println!("{} ({})", p.name, p.id);
//! }
//! # Ok::<(), context_forge_store::StorageError>(())
//! ```

pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;

pub use domain::error::{Result, StorageError};
pub use domain::project::{CreateProject, CustomData, Project, UpdateProject, WorkType};
pub use storage::{FileStore, ProjectStore, ReadResult, MAX_VERSIONED_BACKUPS, PROJECTS_FILE};
