//! Per-workspace task collection.
//!
//! A `TaskStore` is a dumb container: it knows where `tasks.json` lives and
//! how to read or replace it. Id allocation and status rules live in
//! [`crate::ids`] and [`crate::cascade`].

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::Task;
use crate::storage::{self, LOCAL_DIR, TASKS_FILE};

/// Task storage rooted at one workspace directory
#[derive(Debug, Clone)]
pub struct TaskStore {
    workspace_root: PathBuf,
}

impl TaskStore {
    pub fn for_workspace(workspace_root: impl AsRef<Path>) -> Self {
        Self {
            workspace_root: workspace_root.as_ref().to_path_buf(),
        }
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    /// Path to the workspace-local `.tm/` directory
    pub fn local_dir(&self) -> PathBuf {
        self.workspace_root.join(LOCAL_DIR)
    }

    /// Path to the task collection
    pub fn tasks_file(&self) -> PathBuf {
        self.local_dir().join(TASKS_FILE)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Both `.tm/` and `tasks.json` exist
    pub fn is_initialized(&self) -> bool {
        self.local_dir().is_dir() && self.tasks_file().is_file()
    }

    /// Create `.tm/` and an empty collection if missing.
    ///
    /// Idempotent; returns whether anything was created.
    pub fn initialize(&self) -> Result<bool> {
        let mut created = false;

        let local = self.local_dir();
        if !local.exists() {
            fs::create_dir_all(&local)?;
            created = true;
        }

        let tasks_file = self.tasks_file();
        if !tasks_file.exists() {
            self.save(&[])?;
            created = true;
        }

        if created {
            tracing::info!(path = %self.workspace_root.display(), "initialized task storage");
        }
        Ok(created)
    }

    /// Remove the whole `.tm/` directory. Returns `false` if it was absent.
    pub fn destroy(&self) -> Result<bool> {
        let local = self.local_dir();
        if !local.exists() {
            return Ok(false);
        }
        fs::remove_dir_all(&local)?;
        tracing::info!(path = %local.display(), "removed task storage");
        Ok(true)
    }

    // =========================================================================
    // Collection I/O
    // =========================================================================

    /// All tasks in persisted order (empty if storage is absent)
    pub fn load(&self) -> Result<Vec<Task>> {
        storage::read_collection(&self.tasks_file())
    }

    /// Replace the whole collection
    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        storage::write_json(&self.tasks_file(), tasks)
    }

    /// Load, mutate and save in one step; nothing is written if `f` fails
    pub fn update<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<R>,
    {
        storage::with_collection(&self.tasks_file(), f)
    }
}
