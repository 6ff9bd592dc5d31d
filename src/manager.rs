//! Lifecycle and id policy over both stores.
//!
//! Every operation reads the whole collection it touches, mutates it in
//! memory through the pure helpers in [`crate::ids`], [`crate::cascade`] and
//! [`crate::search`], then writes it back. The current directory is injected
//! so the same code serves the CLI and tests.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cascade;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::ids::{self, CompactionSummary};
use crate::model::{Task, TaskStatus, Workspace, WorkspaceStatus};
use crate::registry::WorkspaceStore;
use crate::search::{self, SearchHit};
use crate::storage;
use crate::tasks::TaskStore;

/// Which workspaces an operation applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The workspace rooted at the current directory
    Current,
    /// A registered workspace by id
    Workspace(u32),
    /// Every registered workspace
    Global,
}

impl Scope {
    /// `-g` wins over `-p`, which wins over the current directory
    pub fn from_flags(project: Option<u32>, global: bool) -> Self {
        match (global, project) {
            (true, _) => Scope::Global,
            (false, Some(id)) => Scope::Workspace(id),
            (false, None) => Scope::Current,
        }
    }
}

/// A workspace directory, with its registry record when it has one
#[derive(Debug, Clone, Serialize)]
pub struct Target {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace: Option<Workspace>,
}

impl Target {
    fn store(&self) -> TaskStore {
        TaskStore::for_workspace(&self.path)
    }

    pub fn label(&self) -> String {
        match &self.workspace {
            Some(ws) => format!("{} (#{})", ws.name, ws.id),
            None => self.path.display().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub workspace: Workspace,
    pub created_storage: bool,
    pub registered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddReport {
    pub target: Target,
    pub task: Task,
    /// Set when the add reactivated an archived workspace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reactivated: Option<StatusChange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskListing {
    pub target: Target,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskChange {
    pub target: Target,
    pub task: Task,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompactReport {
    pub target: Target,
    pub summary: CompactionSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub workspace: Workspace,
    pub tasks_changed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceRemoval {
    pub workspace: Workspace,
    pub storage_removed: bool,
}

/// Coordinates the registry and per-workspace task stores
#[derive(Debug, Clone)]
pub struct Manager {
    registry: WorkspaceStore,
    config: Config,
    cwd: PathBuf,
}

impl Manager {
    /// Manager for `home`, reading `config.toml` from it
    pub fn new(home: &Path, cwd: &Path) -> Self {
        let config = Config::load_from_home(home);
        Self::with_config(WorkspaceStore::new(home), config, cwd)
    }

    pub fn with_config(registry: WorkspaceStore, config: Config, cwd: &Path) -> Self {
        Self {
            registry,
            config,
            cwd: storage::normalize_path(cwd),
        }
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// Resolve a single-workspace scope.
    ///
    /// The current directory must hold initialised storage; a registered id
    /// only needs to exist in the registry.
    pub fn resolve(&self, selector: Option<u32>) -> Result<Target> {
        match selector {
            Some(id) => {
                let workspace = self
                    .registry
                    .find(id)?
                    .ok_or(Error::WorkspaceNotFound(id))?;
                Ok(Target {
                    path: workspace.path.clone(),
                    workspace: Some(workspace),
                })
            }
            None => {
                if !TaskStore::for_workspace(&self.cwd).is_initialized() {
                    return Err(Error::NotInitialized(self.cwd.clone()));
                }
                Ok(Target {
                    path: self.cwd.clone(),
                    workspace: self.registry.find_by_path(&self.cwd)?,
                })
            }
        }
    }

    /// Resolve a scope that may span every registered workspace
    pub fn resolve_scope(&self, scope: Scope) -> Result<Vec<Target>> {
        match scope {
            Scope::Current => Ok(vec![self.resolve(None)?]),
            Scope::Workspace(id) => Ok(vec![self.resolve(Some(id))?]),
            Scope::Global => Ok(self
                .registry
                .load()?
                .into_iter()
                .map(|ws| Target {
                    path: ws.path.clone(),
                    workspace: Some(ws),
                })
                .collect()),
        }
    }

    /// Like [`Manager::resolve`], but the storage must exist for writing
    fn resolve_writable(&self, selector: Option<u32>) -> Result<Target> {
        let target = self.resolve(selector)?;
        if !target.store().is_initialized() {
            return Err(Error::NotInitialized(target.path));
        }
        Ok(target)
    }

    // =========================================================================
    // Workspace setup
    // =========================================================================

    /// Initialise storage in the current directory and register it.
    ///
    /// Either step is skipped when already done, so running it twice is a no-op.
    pub fn init(&self) -> Result<InitReport> {
        let store = TaskStore::for_workspace(&self.cwd);
        let created_storage = store.initialize()?;

        if let Some(workspace) = self.registry.find_by_path(&self.cwd)? {
            return Ok(InitReport {
                workspace,
                created_storage,
                registered: false,
            });
        }

        let cwd = self.cwd.clone();
        let workspace = self.registry.update_all(move |workspaces| {
            let id = ids::next_workspace_id(workspaces)?;
            let workspace = Workspace::for_path(id, &cwd);
            workspaces.push(workspace.clone());
            Ok(workspace)
        })?;
        tracing::info!(id = workspace.id, path = %workspace.path.display(), "workspace registered");

        Ok(InitReport {
            workspace,
            created_storage,
            registered: true,
        })
    }

    // =========================================================================
    // Task operations
    // =========================================================================

    /// Append a task. An archived workspace is reactivated first.
    pub fn add_task(&self, text: &str, selector: Option<u32>) -> Result<AddReport> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidArgument(
                "task text cannot be empty".to_string(),
            ));
        }

        let mut target = self.resolve_writable(selector)?;

        let archived_id = target
            .workspace
            .as_ref()
            .filter(|ws| ws.is_archived())
            .map(|ws| ws.id);

        let mut reactivated = None;
        if let Some(id) = archived_id {
            let change = self.set_workspace_status(id, WorkspaceStatus::Active)?;
            tracing::info!(
                id = change.workspace.id,
                revealed = change.tasks_changed,
                "archived workspace reactivated by add"
            );
            target.workspace = Some(change.workspace.clone());
            reactivated = Some(change);
        }

        let task = target.store().update(|tasks| {
            let task = Task::new(ids::next_task_id(tasks)?, text);
            tasks.push(task.clone());
            Ok(task)
        })?;
        tracing::debug!(id = task.id, path = %target.path.display(), "task added");

        Ok(AddReport {
            target,
            task,
            reactivated,
        })
    }

    /// Active tasks (or archived ones) per workspace in scope.
    ///
    /// The global scope covers active workspaces only.
    pub fn list_tasks(&self, scope: Scope, archived: bool) -> Result<Vec<TaskListing>> {
        let wanted = if archived {
            TaskStatus::Archived
        } else {
            TaskStatus::Active
        };

        let mut listings = Vec::new();
        for target in self.resolve_scope(scope)? {
            let skip = scope == Scope::Global
                && target.workspace.as_ref().is_some_and(Workspace::is_archived);
            if skip {
                continue;
            }
            let tasks = target
                .store()
                .load()?
                .into_iter()
                .filter(|task| task.status == wanted)
                .collect();
            listings.push(TaskListing { target, tasks });
        }
        Ok(listings)
    }

    pub fn remove_task(&self, id: u32, selector: Option<u32>) -> Result<TaskChange> {
        let target = self.resolve_writable(selector)?;
        let task = target.store().update(|tasks| {
            let index = tasks
                .iter()
                .position(|task| task.id == id)
                .ok_or(Error::TaskNotFound(id))?;
            Ok(tasks.remove(index))
        })?;
        tracing::debug!(id, path = %target.path.display(), "task removed");
        Ok(TaskChange { target, task })
    }

    pub fn archive_task(&self, id: u32, selector: Option<u32>) -> Result<TaskChange> {
        let target = self.resolve_writable(selector)?;
        let task = target
            .store()
            .update(|tasks| cascade::archive_task(tasks, id))?;
        tracing::debug!(id, path = %target.path.display(), "task archived");
        Ok(TaskChange { target, task })
    }

    pub fn compact_tasks(&self, selector: Option<u32>) -> Result<CompactReport> {
        let target = self.resolve_writable(selector)?;
        let archived_base = self.config.ids.archived_base;
        let summary = target
            .store()
            .update(|tasks| Ok(ids::compact_tasks(tasks, archived_base)))?;
        tracing::info!(
            path = %target.path.display(),
            renumbered = summary.renumbered,
            "tasks compacted"
        );
        Ok(CompactReport { target, summary })
    }

    /// Case-insensitive search over active tasks in scope
    pub fn find(&self, query: &str, scope: Scope) -> Result<Vec<SearchHit>> {
        search::validate_query(query)?;
        let context_chars = self.config.search.context_chars;

        let mut hits = Vec::new();
        for target in self.resolve_scope(scope)? {
            let store = target.store();
            if !store.is_initialized() {
                tracing::debug!(
                    path = %target.path.display(),
                    "skipping workspace without storage"
                );
                continue;
            }
            let tasks = store.load()?;
            for mut hit in search::search_tasks(&tasks, query, context_chars) {
                if let Some(ws) = &target.workspace {
                    hit.workspace_id = Some(ws.id);
                    hit.workspace_name = Some(ws.name.clone());
                }
                hits.push(hit);
            }
        }
        Ok(hits)
    }

    // =========================================================================
    // Workspace operations
    // =========================================================================

    pub fn list_workspaces(&self) -> Result<Vec<Workspace>> {
        self.registry.load()
    }

    /// Unregister a workspace, renumber the rest and delete its `.tm/`
    pub fn remove_workspace(&self, id: u32) -> Result<WorkspaceRemoval> {
        let workspace = self.registry.remove(id)?;
        let storage_removed = TaskStore::for_workspace(&workspace.path).destroy()?;
        if !storage_removed {
            tracing::warn!(
                path = %workspace.path.display(),
                "workspace had no local storage to remove"
            );
        }
        Ok(WorkspaceRemoval {
            workspace,
            storage_removed,
        })
    }

    pub fn archive_workspace(&self, id: u32) -> Result<StatusChange> {
        self.set_workspace_status(id, WorkspaceStatus::Archived)
    }

    pub fn reactivate_workspace(&self, id: u32) -> Result<StatusChange> {
        self.set_workspace_status(id, WorkspaceStatus::Active)
    }

    pub fn compact_workspaces(&self) -> Result<CompactionSummary> {
        let archived_base = self.config.ids.archived_base;
        let summary = self
            .registry
            .update_all(|workspaces| Ok(ids::compact_workspaces(workspaces, archived_base)))?;
        tracing::info!(renumbered = summary.renumbered, "workspaces compacted");
        Ok(summary)
    }

    /// Transition a workspace and cascade onto its tasks.
    ///
    /// Tasks are written inside the registry transaction, so a failed task
    /// write leaves the registry unchanged. Without local storage only the
    /// registry changes.
    fn set_workspace_status(&self, id: u32, target: WorkspaceStatus) -> Result<StatusChange> {
        self.registry.update_all(|workspaces| {
            let workspace = workspaces
                .iter_mut()
                .find(|ws| ws.id == id)
                .ok_or(Error::WorkspaceNotFound(id))?;

            let store = TaskStore::for_workspace(&workspace.path);
            let tasks_changed = if store.is_initialized() {
                store.update(|tasks| match target {
                    WorkspaceStatus::Archived => cascade::archive_workspace(workspace, tasks),
                    WorkspaceStatus::Active => cascade::reactivate_workspace(workspace, tasks),
                })?
            } else {
                cascade::transition(workspace, target)?;
                0
            };

            tracing::info!(id, status = %target, tasks_changed, "workspace status changed");
            Ok(StatusChange {
                workspace: workspace.clone(),
                tasks_changed,
            })
        })
    }
}
