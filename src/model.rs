//! Persisted records: tasks and workspaces.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Visibility state of a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Active,
    Archived,
    /// Set only by the workspace archive cascade
    Hidden,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Archived => "archived",
            TaskStatus::Hidden => "hidden",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle state of a workspace
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkspaceStatus {
    #[default]
    Active,
    Archived,
}

impl WorkspaceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkspaceStatus::Active => "active",
            WorkspaceStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for WorkspaceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A short text note owned by one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// New active task
    pub fn new(id: u32, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            status: TaskStatus::Active,
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status == TaskStatus::Archived
    }
}

/// A registered directory holding a task collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: u32,
    pub name: String,
    /// Absolute path to the workspace directory
    pub path: PathBuf,
    #[serde(default)]
    pub status: WorkspaceStatus,
}

impl Workspace {
    pub fn new(id: u32, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            name: name.into(),
            path: path.into(),
            status: WorkspaceStatus::Active,
        }
    }

    /// Workspace named after the final component of `path`
    pub fn for_path(id: u32, path: &Path) -> Self {
        Self::new(id, default_name(path), path)
    }

    pub fn with_status(mut self, status: WorkspaceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == WorkspaceStatus::Active
    }

    pub fn is_archived(&self) -> bool {
        self.status == WorkspaceStatus::Archived
    }
}

/// Display name for a directory (its last component, or the full path for roots)
pub fn default_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
