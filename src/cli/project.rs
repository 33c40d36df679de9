//! rplan project command implementations.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Project, ProjectStatus};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::NewProject;
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
    pub name: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ProjectListOutput {
    total: usize,
    projects: Vec<Project>,
}

#[derive(serde::Serialize)]
struct ProjectRemoveOutput {
    name: String,
    removed: usize,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let status = options
        .status
        .as_deref()
        .map(str::parse::<ProjectStatus>)
        .transpose()?;
    let project = ctx.store.add_project(NewProject {
        name: options.name,
        assignee: options.assignee,
        due_date: options.due,
        progress: options.progress,
        status,
    })?;

    let mut human = HumanOutput::new("Project created");
    human.push_summary("Name", project.name.clone());
    human.push_summary("Assignee", project.assignee.clone());
    human.push_summary("Due", project.due_date.to_string());
    human.push_summary(
        "Status",
        format!("{} ({}%)", project.status, project.progress),
    );
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project add",
        &project,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let mut projects = ctx.store.list_projects()?;
    if let Some(assignee) = options.assignee.as_deref() {
        projects.retain(|project| project.assignee == assignee);
    }
    let output = ProjectListOutput {
        total: projects.len(),
        projects,
    };

    let mut human = HumanOutput::new("Projects");
    human.push_summary("Total", output.total.to_string());
    for project in &output.projects {
        human.push_detail(format!(
            "{} [{}] due {} {} {}%",
            project.name, project.assignee, project.due_date, project.status, project.progress
        ));
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project list",
        &output,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let removed = ctx.store.remove_project(&options.name)?;
    let output = ProjectRemoveOutput {
        name: options.name,
        removed: removed.len(),
    };

    let mut human = HumanOutput::new("Project removed");
    human.push_summary("Name", output.name.clone());
    if output.removed > 1 {
        human.push_warning(format!(
            "{} projects shared this name; all were removed",
            output.removed
        ));
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project rm",
        &output,
        Some(&human),
    )
}
