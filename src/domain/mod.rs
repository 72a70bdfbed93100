//! Domain layer for the storage subsystem.
//!
//! This module contains the core domain types for the project collection,
//! independent of filesystem or platform concerns. It keeps the record shape
//! and the error taxonomy isolated from the storage implementation.
//!
//! # Organization
//!
//! - [`error`]: Error types and result alias
//! - [`project`]: Project record, creation and partial-update payloads
//!
//! # Examples
//!
//! ```
//! use context_forge_store::domain::{CreateProject, Result};
//!
//! fn creation_payload() -> Result<CreateProject> {
//!     Ok(CreateProject {
//!         name: "my-project".to_string(),
//!         template: "default".to_string(),
//!         slice: "auth".to_string(),
//!         is_monorepo: false,
//!         ..Default::default()
//!     })
//! }
//! ```

pub mod error;
pub mod project;

pub use error::{Result, StorageError};
pub use project::{CreateProject, CustomData, Project, UpdateProject, WorkType};
