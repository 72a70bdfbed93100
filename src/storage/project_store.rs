//! Filesystem-backed CRUD store for the project collection.
//!
//! This module layers the typed project API over the atomic [`FileStore`]:
//! id generation, timestamp stamping, field-default migration on read, and a
//! one-time import from the legacy storage location of earlier desktop
//! builds.
//!
//! # Consistency model
//!
//! Every mutation is a whole-collection read-modify-write. No cross-call
//! locking exists, so two concurrent mutations are last-writer-wins at the
//! granularity of the underlying atomic rename; interleaved writers can lose
//! one writer's change but can never corrupt the file. This is an accepted
//! limitation for a single-user desktop context; callers needing
//! serialization must provide it at a higher layer.

use crate::domain::error::{Result, StorageError};
use crate::domain::project::{CreateProject, Project, UpdateProject, DEFAULT_INSTRUCTION};
use crate::infrastructure::paths;
use crate::storage::file_store::FileStore;
use crate::storage::{backup, PROJECTS_FILE};
use chrono::Utc;
use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Length of the random suffix in generated project ids.
const ID_SUFFIX_LEN: usize = 9;

/// Generates a collection-unique project id with a recognizable prefix.
///
/// Ids look like `project_<unix-millis>_<random suffix>`; the prefix makes
/// them easy to spot in logs and bug reports. Uniqueness is checked against
/// the records present at call time.
fn generate_project_id(existing: &[Project]) -> String {
    loop {
        let suffix: String = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .take(ID_SUFFIX_LEN)
            .collect();
        let id = format!("project_{}_{}", Utc::now().timestamp_millis(), suffix);
        if !existing.iter().any(|p| p.id == id) {
            return id;
        }
    }
}

/// CRUD store over the `projects.json` collection.
///
/// The collection file is a JSON array of project records, written
/// pretty-printed through the atomic file store so every mutation inherits
/// its backup-before-overwrite and crash-safety guarantees, plus the
/// destructive-write guard.
///
/// # Lifecycle of a record
///
/// `nonexistent -> active` (create), `active -> active` (update),
/// `active -> gone` (delete, terminal). Update or delete against a missing
/// id always fails with [`StorageError::ProjectNotFound`].
///
/// # Examples
///
/// ```no_run
/// use context_forge_store::{CreateProject, ProjectStore};
///
/// let store = ProjectStore::open()?;
/// let project = store.create(CreateProject {
///     name: "my-project".to_string(),
///     template: "default".to_string(),
///     slice: "auth".to_string(),
///     is_monorepo: false,
///     ..Default::default()
/// })?;
///
/// assert!(project.id.starts_with("project_"));
/// # Ok::<(), context_forge_store::StorageError>(())
/// ```
pub struct ProjectStore {
    storage: FileStore,
    storage_path: PathBuf,
    legacy_path: Option<PathBuf>,

    /// Whether the one-time legacy import has been attempted by this
    /// instance. Instance-level (not process-global) so store instances in
    /// tests stay isolated; `Cell` keeps read operations on `&self`.
    migration_checked: Cell<bool>,
}

impl ProjectStore {
    /// Opens the store at the canonical storage location.
    ///
    /// Resolution follows [`paths::storage_dir`]: the `CONTEXT_FORGE_DATA_DIR`
    /// environment variable when set, otherwise the platform config
    /// directory. The legacy import source is the historical desktop
    /// location, when the platform defines one.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Config`] when no storage directory can be
    /// resolved.
    pub fn open() -> Result<Self> {
        let storage_path = paths::storage_dir()?;
        tracing::debug!(path = ?storage_path, "opening project store");
        Ok(Self::with_paths(storage_path, paths::legacy_storage_dir()))
    }

    /// Opens the store over an explicit directory, with no legacy import
    /// source.
    ///
    /// Mainly useful for tests and embedders that manage their own layout.
    pub fn with_storage_path(storage_path: impl Into<PathBuf>) -> Self {
        Self::with_paths(storage_path, None)
    }

    /// Opens the store over explicit current and legacy directories.
    pub fn with_paths(storage_path: impl Into<PathBuf>, legacy_path: Option<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        Self {
            storage: FileStore::new(&storage_path),
            storage_path,
            legacy_path,
            migration_checked: Cell::new(false),
        }
    }

    /// Returns the directory the collection lives in.
    #[must_use]
    pub fn storage_path(&self) -> &Path {
        &self.storage_path
    }

    /// Returns all projects, with field-default migration applied.
    ///
    /// A missing collection file yields an empty vector, the expected
    /// steady state for a fresh install. Recovered reads (backup fallback)
    /// are logged and otherwise transparent.
    ///
    /// # Errors
    ///
    /// Propagates [`StorageError::Corrupted`] when both the primary and its
    /// backup are unusable, and serialization errors for records that no
    /// longer fit the schema.
    pub fn get_all(&self) -> Result<Vec<Project>> {
        self.ensure_initialized();
        let _span = tracing::debug_span!("projects_get_all").entered();

        let result = match self.storage.read(PROJECTS_FILE) {
            Ok(result) => result,
            Err(StorageError::NotFound(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        if result.recovered {
            tracing::warn!(
                message = result.message.as_deref().unwrap_or(""),
                "project collection read recovered from backup"
            );
        }

        let parsed: serde_json::Value = serde_json::from_str(&result.data)?;
        let serde_json::Value::Array(items) = parsed else {
            tracing::warn!("project collection is not a JSON array, treating as empty");
            return Ok(Vec::new());
        };

        let projects = items
            .into_iter()
            .map(serde_json::from_value::<Project>)
            .collect::<std::result::Result<Vec<_>, _>>()?;

        tracing::debug!(count = projects.len(), "loaded projects");
        Ok(projects)
    }

    /// Returns the project with the given id, if present.
    ///
    /// # Errors
    ///
    /// Propagates the same errors as [`ProjectStore::get_all`].
    pub fn get_by_id(&self, id: &str) -> Result<Option<Project>> {
        let all = self.get_all()?;
        Ok(all.into_iter().find(|p| p.id == id))
    }

    /// Creates a project and persists the updated collection.
    ///
    /// The store assigns the id and stamps `created_at == updated_at` with
    /// the current instant. Omitted optional fields receive the documented
    /// defaults.
    ///
    /// # Errors
    ///
    /// Propagates read errors and write errors, including
    /// [`StorageError::GuardRejected`] from the write guard.
    pub fn create(&self, data: CreateProject) -> Result<Project> {
        self.ensure_initialized();
        let _span = tracing::debug_span!("projects_create", name = %data.name).entered();

        let mut all = self.get_all()?;
        let now = Utc::now();
        let project = Project {
            id: generate_project_id(&all),
            name: data.name,
            template: data.template,
            slice: data.slice,
            task_file: data.task_file.unwrap_or_default(),
            instruction: data
                .instruction
                .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string()),
            development_phase: data.development_phase,
            work_type: data.work_type,
            project_date: data.project_date,
            is_monorepo: data.is_monorepo,
            is_monorepo_enabled: data.is_monorepo_enabled,
            project_path: data.project_path,
            custom_data: data.custom_data.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        all.push(project.clone());
        self.write_collection(&all)?;

        tracing::debug!(id = %project.id, "project created");
        Ok(project)
    }

    /// Applies a partial update to the project with the given id.
    ///
    /// Fields absent from the update are left untouched; `updated_at` is
    /// refreshed and `created_at` preserved.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ProjectNotFound`] when the id is absent, and
    /// propagates read/write errors otherwise.
    pub fn update(&self, id: &str, updates: UpdateProject) -> Result<Project> {
        let _span = tracing::debug_span!("projects_update", id = %id).entered();

        let mut all = self.get_all()?;
        let project = all
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StorageError::ProjectNotFound(id.to_string()))?;

        project.apply_update(updates);
        let updated = project.clone();

        self.write_collection(&all)?;
        tracing::debug!(id = %id, "project updated");
        Ok(updated)
    }

    /// Removes the project with the given id from the collection.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ProjectNotFound`] when the id is absent, and
    /// propagates read/write errors otherwise, including a guard rejection
    /// when the delete would implausibly empty a multi-record collection.
    pub fn delete(&self, id: &str) -> Result<()> {
        let _span = tracing::debug_span!("projects_delete", id = %id).entered();

        let all = self.get_all()?;
        if !all.iter().any(|p| p.id == id) {
            return Err(StorageError::ProjectNotFound(id.to_string()));
        }

        let remaining: Vec<Project> = all.into_iter().filter(|p| p.id != id).collect();
        self.write_collection(&remaining)?;

        tracing::debug!(id = %id, "project deleted");
        Ok(())
    }

    /// Takes a timestamped snapshot of the collection file.
    ///
    /// Intended to be called by the application around lifecycle edges
    /// (start and exit). No-op when the collection does not exist yet.
    ///
    /// # Errors
    ///
    /// Propagates snapshot-copy failures; retention pruning is best-effort
    /// and never surfaces here.
    pub fn create_versioned_snapshot(&self) -> Result<()> {
        backup::create_versioned_backup(&self.storage_path, PROJECTS_FILE)
    }

    fn write_collection(&self, projects: &[Project]) -> Result<()> {
        let json = serde_json::to_string_pretty(projects)?;
        self.storage.write(PROJECTS_FILE, &json)
    }

    /// Runs the one-time legacy import, at most once per instance.
    ///
    /// Import failures are logged and swallowed: the store can always make
    /// forward progress as an empty collection, and the triggering read must
    /// not fail on behalf of a best-effort migration.
    fn ensure_initialized(&self) {
        if self.migration_checked.get() {
            return;
        }
        self.migration_checked.set(true);

        let has_data = matches!(self.storage.exists(PROJECTS_FILE), Ok(true));
        if has_data {
            return;
        }

        match self.migrate_from_legacy_location() {
            Ok(true) => {
                tracing::info!(legacy = ?self.legacy_path, "migrated projects from legacy location");
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(error = %e, "legacy migration failed, starting empty");
            }
        }
    }

    /// Copies `projects.json` (and its `.backup` sibling, when present) from
    /// the legacy location, never overwriting existing files.
    fn migrate_from_legacy_location(&self) -> Result<bool> {
        let Some(legacy_dir) = self.legacy_path.as_deref() else {
            return Ok(false);
        };

        let new_file = self.storage_path.join(PROJECTS_FILE);
        let legacy_file = legacy_dir.join(PROJECTS_FILE);

        if new_file.exists() || !legacy_file.exists() {
            return Ok(false);
        }

        fs::create_dir_all(&self.storage_path)?;
        fs::copy(&legacy_file, &new_file)?;

        let legacy_backup = legacy_dir.join(format!("{PROJECTS_FILE}.backup"));
        if legacy_backup.exists() {
            fs::copy(
                &legacy_backup,
                self.storage_path.join(format!("{PROJECTS_FILE}.backup")),
            )?;
        }

        Ok(true)
    }
}
