//! Project domain model and operations.
//!
//! This module defines the core [`Project`] record persisted in the
//! `projects.json` collection, along with the creation and partial-update
//! payloads used by the store. Records are serialized with camelCase field
//! names so files written by earlier releases of the application keep loading
//! unchanged.
//!
//! # Field-default migration
//!
//! Older records may predate some fields. Deserialization applies explicit
//! defaults in one place (the serde attributes on [`Project`]), uniformly on
//! every read, and never writes them back to disk on its own:
//!
//! | field         | default            |
//! |---------------|--------------------|
//! | `taskFile`    | `""`               |
//! | `instruction` | `"implementation"` |
//! | `isMonorepo`  | `false`            |
//! | `customData`  | `{}`               |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default value for the `instruction` field of records that predate it.
pub const DEFAULT_INSTRUCTION: &str = "implementation";

fn default_instruction() -> String {
    DEFAULT_INSTRUCTION.to_string()
}

/// Kind of work a project is configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    /// Starting a new piece of work.
    Start,
    /// Continuing previously started work.
    Continue,
}

/// Free-form per-project notes with a bounded set of known fields.
///
/// Absent fields are omitted from the serialized record, so an empty value
/// round-trips as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomData {
    /// Recent events worth surfacing in an assembled prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_events: Option<String>,

    /// Additional free-form notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,

    /// Note shown when the project is part of a monorepo.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monorepo_note: Option<String>,

    /// Tools available to the assistant for this project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_tools: Option<String>,
}

/// A project-configuration record.
///
/// The `id` is generated by the store at creation time and is immutable for
/// the record's lifetime; `created_at` is stamped once and `updated_at` is
/// refreshed by every partial update.
///
/// # Examples
///
/// ```
/// use context_forge_store::Project;
///
/// let raw = r#"{
///     "id": "project_123_abcdefghi",
///     "name": "legacy",
///     "template": "default",
///     "slice": "old",
///     "createdAt": "2025-01-01T00:00:00.000Z",
///     "updatedAt": "2025-01-01T00:00:00.000Z"
/// }"#;
///
/// // Records written before newer fields existed are migrated on read.
/// let project: Project = serde_json::from_str(raw)?;
/// assert_eq!(project.task_file, "");
/// assert_eq!(project.instruction, "implementation");
/// assert!(!project.is_monorepo);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier, `project_<unix-millis>_<random suffix>`.
    pub id: String,

    /// Display name of the project.
    pub name: String,

    /// Name of the prompt template the project uses.
    pub template: String,

    /// Vertical slice of the codebase the project targets.
    pub slice: String,

    /// Path to the task file fed into the prompt, empty when unset.
    #[serde(default)]
    pub task_file: String,

    /// Instruction mode for the assistant.
    #[serde(default = "default_instruction")]
    pub instruction: String,

    /// Development phase label, free-form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_phase: Option<String>,

    /// Whether the work starts fresh or continues.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,

    /// Date label attached to the project.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_date: Option<String>,

    /// Whether the project lives in a monorepo.
    #[serde(default)]
    pub is_monorepo: bool,

    /// Whether monorepo handling is enabled in the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_monorepo_enabled: Option<bool>,

    /// Absolute path to the project root (contains `project-documents/`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,

    /// Bounded free-form notes.
    #[serde(default)]
    pub custom_data: CustomData,

    /// Creation instant, stamped by the store.
    pub created_at: DateTime<Utc>,

    /// Last-modification instant, refreshed by every update.
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Merges a partial update over this record.
    ///
    /// Only fields present in the update (`Some`) are applied; everything
    /// else is left untouched. `updated_at` is refreshed, `id` and
    /// `created_at` never change.
    pub fn apply_update(&mut self, updates: UpdateProject) {
        if let Some(name) = updates.name {
            self.name = name;
        }
        if let Some(template) = updates.template {
            self.template = template;
        }
        if let Some(slice) = updates.slice {
            self.slice = slice;
        }
        if let Some(task_file) = updates.task_file {
            self.task_file = task_file;
        }
        if let Some(instruction) = updates.instruction {
            self.instruction = instruction;
        }
        if let Some(development_phase) = updates.development_phase {
            self.development_phase = Some(development_phase);
        }
        if let Some(work_type) = updates.work_type {
            self.work_type = Some(work_type);
        }
        if let Some(project_date) = updates.project_date {
            self.project_date = Some(project_date);
        }
        if let Some(is_monorepo) = updates.is_monorepo {
            self.is_monorepo = is_monorepo;
        }
        if let Some(is_monorepo_enabled) = updates.is_monorepo_enabled {
            self.is_monorepo_enabled = Some(is_monorepo_enabled);
        }
        if let Some(project_path) = updates.project_path {
            self.project_path = Some(project_path);
        }
        if let Some(custom_data) = updates.custom_data {
            self.custom_data = custom_data;
        }
        self.updated_at = Utc::now();
    }
}

/// Payload for creating a new project.
///
/// `id`, `created_at`, and `updated_at` are assigned by the store. Optional
/// fields that are omitted receive the documented defaults.
///
/// # Examples
///
/// ```
/// use context_forge_store::CreateProject;
///
/// let data = CreateProject {
///     name: "my-project".to_string(),
///     template: "default".to_string(),
///     slice: "auth".to_string(),
///     is_monorepo: false,
///     ..Default::default()
/// };
/// assert!(data.instruction.is_none()); // store fills in "implementation"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProject {
    pub name: String,
    pub template: String,
    pub slice: String,
    pub is_monorepo: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_monorepo_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}

/// Partial update for an existing project.
///
/// Every field is optional; `None` means "leave untouched". The record's
/// `id` and `created_at` are never updatable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProject {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_phase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_type: Option<WorkType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_monorepo: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_monorepo_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<CustomData>,
}
