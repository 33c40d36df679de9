//! rplan task command implementations.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Task, TaskStatus};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::NewTask;
use crate::store::RecordStore;

use super::load_context;

pub struct AddOptions {
    pub name: String,
    pub assignee: String,
    pub due: NaiveDate,
    pub progress: u8,
    pub status: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub assignee: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: u64,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let status = options
        .status
        .as_deref()
        .map(str::parse::<TaskStatus>)
        .transpose()?;
    let task = ctx.store.add_task(NewTask {
        name: options.name,
        assignee: options.assignee,
        due_date: options.due,
        progress: options.progress,
        status,
    })?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Name", task.name.clone());
    human.push_summary("Assignee", task.assignee.clone());
    human.push_summary("Due", task.due_date.to_string());
    human.push_summary("Status", format!("{} ({}%)", task.status, task.progress));
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task add",
        &task,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let mut tasks = ctx.store.list_tasks()?;
    if let Some(assignee) = options.assignee.as_deref() {
        tasks.retain(|task| task.assignee == assignee);
    }
    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", output.total.to_string());
    for task in &output.tasks {
        human.push_detail(format!(
            "{} {} [{}] due {} {} {}%",
            task.id, task.name, task.assignee, task.due_date, task.status, task.progress
        ));
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let task = ctx.store.remove_task(options.id)?;

    let mut human = HumanOutput::new("Task removed");
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Name", task.name.clone());
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &task,
        Some(&human),
    )
}
