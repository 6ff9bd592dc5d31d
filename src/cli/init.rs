//! tm init command implementation
//!
//! Creates `.tm/` in the current directory and registers it as a workspace.

use crate::error::Result;
use crate::manager::Manager;
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub fn run(manager: &Manager, output: OutputOptions) -> Result<()> {
    let report = manager.init()?;

    let header = match (report.created_storage, report.registered) {
        (false, false) => "tm init: nothing to do".to_string(),
        (_, true) => format!("tm init: workspace registered with id {}", report.workspace.id),
        (true, false) => "tm init: storage created".to_string(),
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("workspace", report.workspace.name.clone());
    human.push_summary("id", report.workspace.id.to_string());
    human.push_summary("path", report.workspace.path.display().to_string());
    if report.workspace.is_archived() {
        human.push_warning("workspace is archived; adding a task reactivates it");
    }
    if report.created_storage || report.registered {
        human.push_next_step("tm add <text>");
    }

    emit_success(output, "init", &report, Some(&human))
}
