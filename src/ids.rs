//! ID allocation and compaction
//!
//! Task ids are allocated from the highest non-archived id, so archiving a
//! task frees its slot for the active range without renumbering anything.
//! Workspace ids are allocated from the highest id overall: they are user
//! handles (`-p <id>`) and stay unique regardless of status.
//!
//! Compaction renumbers each status partition densely. Active records start
//! at 1, archived records start at the archived band (1000 by default).
//! Hidden tasks keep their own block right after the active one. When the
//! lower blocks reach the archived base, the archived band starts right
//! after them instead.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Task, TaskStatus, Workspace, WorkspaceStatus};

/// First id of the archived band after compaction
pub const ARCHIVED_ID_BASE: u32 = 1000;

/// Records that carry a renumberable id
pub trait Identified {
    fn id(&self) -> u32;
    fn set_id(&mut self, id: u32);
}

impl Identified for Task {
    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

impl Identified for Workspace {
    fn id(&self) -> u32 {
        self.id
    }

    fn set_id(&mut self, id: u32) {
        self.id = id;
    }
}

/// Counts reported by a compaction pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompactionSummary {
    pub active: usize,
    pub hidden: usize,
    pub archived: usize,
    /// Records whose id changed
    pub renumbered: usize,
}

/// Next id for a new task: `1 + max(id of non-archived tasks)`, or 1.
pub fn next_task_id(tasks: &[Task]) -> Result<u32> {
    let max = tasks
        .iter()
        .filter(|task| !task.is_archived())
        .map(|task| task.id)
        .max()
        .unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| Error::OperationFailed("task id space exhausted".to_string()))
}

/// Next id for a new workspace: `1 + max(id of all workspaces)`, or 1.
pub fn next_workspace_id(workspaces: &[Workspace]) -> Result<u32> {
    let max = workspaces.iter().map(|ws| ws.id).max().unwrap_or(0);
    max.checked_add(1)
        .ok_or_else(|| Error::OperationFailed("workspace id space exhausted".to_string()))
}

/// Renumber tasks per status partition and reorder them active, hidden, archived.
pub fn compact_tasks(tasks: &mut Vec<Task>, archived_base: u32) -> CompactionSummary {
    let mut active = Vec::new();
    let mut hidden = Vec::new();
    let mut archived = Vec::new();

    for task in tasks.drain(..) {
        match task.status {
            TaskStatus::Active => active.push(task),
            TaskStatus::Hidden => hidden.push(task),
            TaskStatus::Archived => archived.push(task),
        }
    }

    let mut summary = CompactionSummary {
        active: active.len(),
        hidden: hidden.len(),
        archived: archived.len(),
        renumbered: 0,
    };

    let hidden_start = band_start(1, active.len());
    let archived_start = band_start(hidden_start, hidden.len()).max(archived_base);
    summary.renumbered += assign_block(&mut active, 1);
    summary.renumbered += assign_block(&mut hidden, hidden_start);
    summary.renumbered += assign_block(&mut archived, archived_start);

    tasks.extend(active);
    tasks.extend(hidden);
    tasks.extend(archived);
    summary
}

/// Renumber workspaces per status partition and reorder them active, archived.
pub fn compact_workspaces(
    workspaces: &mut Vec<Workspace>,
    archived_base: u32,
) -> CompactionSummary {
    let (mut active, mut archived): (Vec<_>, Vec<_>) = workspaces
        .drain(..)
        .partition(|ws| ws.status == WorkspaceStatus::Active);

    let mut summary = CompactionSummary {
        active: active.len(),
        hidden: 0,
        archived: archived.len(),
        renumbered: 0,
    };

    let archived_start = band_start(1, active.len()).max(archived_base);
    summary.renumbered += assign_block(&mut active, 1);
    summary.renumbered += assign_block(&mut archived, archived_start);

    workspaces.extend(active);
    workspaces.extend(archived);
    summary
}

/// Renumber every record `1..=N` in its current list order.
///
/// Unlike compaction this ignores status and does not reorder.
/// Returns the number of records whose id changed.
pub fn renumber_sequential<T: Identified>(records: &mut [T]) -> usize {
    let mut changed = 0;
    for (offset, record) in records.iter_mut().enumerate() {
        let id = band_start(1, offset);
        if record.id() != id {
            record.set_id(id);
            changed += 1;
        }
    }
    changed
}

/// Sort a block by current id and assign consecutive ids from `start`.
fn assign_block<T: Identified>(block: &mut [T], start: u32) -> usize {
    block.sort_by_key(|record| record.id());
    let mut changed = 0;
    for (offset, record) in block.iter_mut().enumerate() {
        let id = band_start(start, offset);
        if record.id() != id {
            record.set_id(id);
            changed += 1;
        }
    }
    changed
}

fn band_start(start: u32, offset: usize) -> u32 {
    let offset = u32::try_from(offset).unwrap_or(u32::MAX);
    start.saturating_add(offset)
}
