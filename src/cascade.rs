//! Status transitions and their cascade onto tasks
//!
//! A workspace's status and its tasks' visibility never diverge:
//!
//! - archiving a workspace hides every `active` task;
//! - reactivating it turns every `hidden` task back to `active`.
//!
//! Tasks the user archived explicitly are left alone in both directions, so
//! an archive/reactivate round trip restores exactly the previous state.

use crate::error::{Error, Result};
use crate::model::{Task, TaskStatus, Workspace, WorkspaceStatus};

/// Move a workspace to `target`, rejecting no-op transitions.
pub fn transition(workspace: &mut Workspace, target: WorkspaceStatus) -> Result<()> {
    if workspace.status == target {
        return Err(Error::InvalidTransition {
            id: workspace.id,
            status: target.to_string(),
        });
    }
    workspace.status = target;
    Ok(())
}

/// Apply the task side of a workspace transition. Returns the number of tasks changed.
pub fn cascade_tasks(target: WorkspaceStatus, tasks: &mut [Task]) -> usize {
    match target {
        WorkspaceStatus::Archived => hide_active(tasks),
        WorkspaceStatus::Active => reveal_hidden(tasks),
    }
}

/// Archive a workspace together with its tasks.
pub fn archive_workspace(workspace: &mut Workspace, tasks: &mut [Task]) -> Result<usize> {
    transition(workspace, WorkspaceStatus::Archived)?;
    Ok(cascade_tasks(WorkspaceStatus::Archived, tasks))
}

/// Reactivate a workspace together with its tasks.
pub fn reactivate_workspace(workspace: &mut Workspace, tasks: &mut [Task]) -> Result<usize> {
    transition(workspace, WorkspaceStatus::Active)?;
    Ok(cascade_tasks(WorkspaceStatus::Active, tasks))
}

/// `active` -> `hidden`
pub fn hide_active(tasks: &mut [Task]) -> usize {
    set_where(tasks, TaskStatus::Active, TaskStatus::Hidden)
}

/// `hidden` -> `active`
pub fn reveal_hidden(tasks: &mut [Task]) -> usize {
    set_where(tasks, TaskStatus::Hidden, TaskStatus::Active)
}

/// Archive one task (active or hidden). Returns the updated task.
pub fn archive_task(tasks: &mut [Task], id: u32) -> Result<Task> {
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(Error::TaskNotFound(id))?;
    if task.is_archived() {
        return Err(Error::TaskAlreadyArchived(id));
    }
    task.status = TaskStatus::Archived;
    Ok(task.clone())
}

fn set_where(tasks: &mut [Task], from: TaskStatus, to: TaskStatus) -> usize {
    let mut changed = 0;
    for task in tasks.iter_mut().filter(|task| task.status == from) {
        task.status = to;
        changed += 1;
    }
    changed
}
