//! tm workspace (`p*`) command implementations

use serde::Serialize;

use crate::error::Result;
use crate::ids::CompactionSummary;
use crate::manager::Manager;
use crate::model::Workspace;
use crate::output::{emit_success, HumanOutput, OutputOptions};

#[derive(Serialize)]
struct WorkspaceListOutput {
    total: usize,
    workspaces: Vec<Workspace>,
}

#[derive(Serialize)]
struct WorkspaceCompactOutput {
    summary: CompactionSummary,
    workspaces: Vec<Workspace>,
}

pub fn run_list(manager: &Manager, output: OutputOptions) -> Result<()> {
    let workspaces = manager.list_workspaces()?;

    let mut human = HumanOutput::new("Workspaces");
    human.push_summary("total", workspaces.len().to_string());
    for ws in &workspaces {
        human.push_detail(describe(ws));
    }
    if workspaces.is_empty() {
        human.push_detail("no workspaces registered");
        human.push_next_step("tm init");
    }

    let data = WorkspaceListOutput {
        total: workspaces.len(),
        workspaces,
    };
    emit_success(output, "plist", &data, Some(&human))
}

pub fn run_remove(manager: &Manager, id: u32, output: OutputOptions) -> Result<()> {
    let removal = manager.remove_workspace(id)?;

    let mut human = HumanOutput::new(format!("Workspace {id} removed; ids reassigned"));
    human.push_summary("name", removal.workspace.name.clone());
    human.push_summary("path", removal.workspace.path.display().to_string());
    if !removal.storage_removed {
        human.push_warning("no .tm directory found at the workspace path");
    }
    human.push_next_step("tm plist");

    emit_success(output, "premove", &removal, Some(&human))
}

pub fn run_archive(manager: &Manager, id: u32, output: OutputOptions) -> Result<()> {
    let change = manager.archive_workspace(id)?;

    let mut human = HumanOutput::new(format!("Workspace {id} archived"));
    human.push_summary("name", change.workspace.name.clone());
    human.push_summary("tasks hidden", change.tasks_changed.to_string());
    human.push_next_step(format!("tm preactivate {id}"));

    emit_success(output, "parchive", &change, Some(&human))
}

pub fn run_reactivate(manager: &Manager, id: u32, output: OutputOptions) -> Result<()> {
    let change = manager.reactivate_workspace(id)?;

    let mut human = HumanOutput::new(format!("Workspace {id} reactivated"));
    human.push_summary("name", change.workspace.name.clone());
    human.push_summary("tasks restored", change.tasks_changed.to_string());

    emit_success(output, "preactivate", &change, Some(&human))
}

pub fn run_compact(manager: &Manager, output: OutputOptions) -> Result<()> {
    let summary = manager.compact_workspaces()?;
    let workspaces = manager.list_workspaces()?;

    let mut human = HumanOutput::new("Workspace compaction complete");
    human.push_summary("active", summary.active.to_string());
    human.push_summary("archived", summary.archived.to_string());
    human.push_summary("renumbered", summary.renumbered.to_string());
    for ws in &workspaces {
        human.push_detail(describe(ws));
    }

    let data = WorkspaceCompactOutput {
        summary,
        workspaces,
    };
    emit_success(output, "pcompact", &data, Some(&human))
}

fn describe(ws: &Workspace) -> String {
    let mut line = format!("{}: {} ({})", ws.id, ws.name, ws.path.display());
    if ws.is_archived() {
        line.push_str(" [archived]");
    }
    line
}
