//! tm task command implementations

use serde::Serialize;

use crate::error::Result;
use crate::manager::{Manager, Scope, TaskListing};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::search::SearchHit;

pub struct AddOptions {
    pub text: String,
    pub project: Option<u32>,
    pub output: OutputOptions,
}

pub struct ListOptions {
    pub project: Option<u32>,
    pub global: bool,
    pub archived: bool,
    pub output: OutputOptions,
}

pub struct TaskIdOptions {
    pub id: u32,
    pub project: Option<u32>,
    pub output: OutputOptions,
}

pub struct CompactOptions {
    pub project: Option<u32>,
    pub output: OutputOptions,
}

pub struct FindOptions {
    pub text: String,
    pub project: Option<u32>,
    pub global: bool,
    pub output: OutputOptions,
}

#[derive(Serialize)]
struct TaskListOutput {
    total: usize,
    workspaces: Vec<TaskListing>,
}

#[derive(Serialize)]
struct FindOutput {
    query: String,
    total: usize,
    hits: Vec<SearchHit>,
}

pub fn run_add(manager: &Manager, options: AddOptions) -> Result<()> {
    let report = manager.add_task(&options.text, options.project)?;

    let mut human = HumanOutput::new(format!("Task added with id {}", report.task.id));
    human.push_summary("workspace", report.target.label());
    human.push_summary("text", report.task.text.clone());
    if let Some(change) = &report.reactivated {
        human.push_warning(format!(
            "workspace {} was archived and has been reactivated ({} task(s) restored)",
            change.workspace.id, change.tasks_changed
        ));
    }

    emit_success(options.output, "add", &report, Some(&human))
}

pub fn run_list(manager: &Manager, options: ListOptions) -> Result<()> {
    let scope = Scope::from_flags(options.project, options.global);
    let listings = manager.list_tasks(scope, options.archived)?;
    let total: usize = listings.iter().map(|listing| listing.tasks.len()).sum();

    let header = if options.archived {
        "Archived tasks"
    } else {
        "Tasks"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("total", total.to_string());
    if scope == Scope::Global {
        human.push_summary("workspaces", listings.len().to_string());
    } else if let Some(listing) = listings.first() {
        human.push_summary("workspace", listing.target.label());
    }

    for listing in &listings {
        for task in &listing.tasks {
            let line = match (scope, &listing.target.workspace) {
                (Scope::Global, Some(ws)) => format!("[{}] {}: {}", ws.name, task.id, task.text),
                _ => format!("{}: {}", task.id, task.text),
            };
            human.push_detail(line);
        }
    }
    if total == 0 {
        human.push_detail(if options.archived {
            "no archived tasks"
        } else {
            "no active tasks"
        });
    }

    let output = TaskListOutput {
        total,
        workspaces: listings,
    };
    emit_success(options.output, "list", &output, Some(&human))
}

pub fn run_remove(manager: &Manager, options: TaskIdOptions) -> Result<()> {
    let change = manager.remove_task(options.id, options.project)?;

    let mut human = HumanOutput::new(format!("Task {} removed", change.task.id));
    human.push_summary("workspace", change.target.label());
    human.push_summary("text", change.task.text.clone());

    emit_success(options.output, "remove", &change, Some(&human))
}

pub fn run_archive(manager: &Manager, options: TaskIdOptions) -> Result<()> {
    let change = manager.archive_task(options.id, options.project)?;

    let mut human = HumanOutput::new(format!("Task {} archived", change.task.id));
    human.push_summary("workspace", change.target.label());
    human.push_summary("text", change.task.text.clone());
    human.push_next_step("tm compact");

    emit_success(options.output, "archive", &change, Some(&human))
}

pub fn run_compact(manager: &Manager, options: CompactOptions) -> Result<()> {
    let report = manager.compact_tasks(options.project)?;
    let summary = &report.summary;

    let mut human = HumanOutput::new("Compaction complete");
    human.push_summary("workspace", report.target.label());
    human.push_summary("active", summary.active.to_string());
    if summary.hidden > 0 {
        human.push_summary("hidden", summary.hidden.to_string());
    }
    human.push_summary("archived", summary.archived.to_string());
    human.push_summary("renumbered", summary.renumbered.to_string());

    emit_success(options.output, "compact", &report, Some(&human))
}

pub fn run_find(manager: &Manager, options: FindOptions) -> Result<()> {
    let scope = Scope::from_flags(options.project, options.global);
    let hits = manager.find(&options.text, scope)?;

    let mut human = HumanOutput::new(format!("Search: {}", options.text));
    human.push_summary("matches", hits.len().to_string());
    for hit in &hits {
        let line = match (&hit.workspace_name, scope) {
            (Some(name), Scope::Global) => {
                format!("[{}] ID: {}, {}", name, hit.task_id, hit.context)
            }
            _ => format!("ID: {}, {}", hit.task_id, hit.context),
        };
        human.push_detail(line);
    }
    if hits.is_empty() {
        human.push_detail("no matches found");
    }

    let output = FindOutput {
        query: options.text,
        total: hits.len(),
        hits,
    };
    emit_success(options.output, "find", &output, Some(&human))
}
