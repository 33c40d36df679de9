//! Command-line interface for rplan
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::model::RecordKind;
use crate::storage::JsonStore;

mod edit;
mod init;
mod member;
mod plan;
mod project;
mod task;

/// rplan - Resource Planner
///
/// Builds per-person schedule bars from tasks and projects, and writes
/// dragged bars back into their records with progress-driven status.
#[derive(Parser, Debug)]
#[command(name = "rplan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Planner directory (defaults to current directory)
    #[arg(long, global = true, env = "RPLAN_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a planner directory
    Init,

    /// Team member management
    #[command(subcommand)]
    Member(MemberCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Show the schedule bars of one assignee
    Bars {
        /// Assignee name (exact match)
        assignee: String,
    },

    /// Show every team member's schedule
    Plan {
        /// Hide members with nothing assigned
        #[arg(long)]
        busy_only: bool,
    },

    /// Apply a bar edit (date and/or progress drag) to its record
    Edit {
        /// Record kind: task or project
        #[arg(value_enum)]
        kind: RecordKind,

        /// Task id or project name
        reference: String,

        /// New end date of the bar (YYYY-MM-DD)
        #[arg(long)]
        end: Option<NaiveDate>,

        /// New progress in percent (clamped to 0-100, rounded)
        #[arg(long, allow_negative_numbers = true)]
        progress: Option<f64>,
    },
}

/// Team member subcommands
#[derive(Subcommand, Debug)]
pub enum MemberCommands {
    /// Add a team member
    Add {
        /// Member name, matched against record assignees
        name: String,

        #[arg(long, default_value = "")]
        department: String,

        #[arg(long, default_value = "")]
        role: String,
    },

    /// List team members
    List,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    Add {
        name: String,

        #[arg(long)]
        assignee: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,

        /// Progress in percent (0-100)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: u8,

        /// Status: scheduled, in_progress, done (derived from progress if omitted)
        #[arg(long)]
        status: Option<String>,
    },

    /// List tasks
    List {
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Delete a task
    Rm { id: u64 },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Add {
        /// Project name (unique)
        name: String,

        #[arg(long)]
        assignee: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,

        /// Progress in percent (0-100)
        #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: u8,

        /// Status: planned, in_progress, done (derived from progress if omitted)
        #[arg(long)]
        status: Option<String>,
    },

    /// List projects
    List {
        #[arg(long)]
        assignee: Option<String>,
    },

    /// Delete a project (every project with this name)
    Rm { name: String },
}

/// Loaded planner directory shared by command implementations
pub(crate) struct PlannerContext {
    pub dir: PathBuf,
    pub config: Config,
    pub store: JsonStore,
}

pub(crate) fn load_context(dir: Option<PathBuf>) -> Result<PlannerContext> {
    let dir = match dir {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    let config = Config::load_from_dir(&dir);
    let store = JsonStore::for_dir(&dir, &config);
    Ok(PlannerContext { dir, config, store })
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Init => init::run(init::InitOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Member(cmd) => match cmd {
                MemberCommands::Add {
                    name,
                    department,
                    role,
                } => member::run_add(member::AddOptions {
                    name,
                    department,
                    role,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                MemberCommands::List => member::run_list(member::ListOptions {
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    name,
                    assignee,
                    due,
                    progress,
                    status,
                } => task::run_add(task::AddOptions {
                    name,
                    assignee,
                    due,
                    progress,
                    status,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List { assignee } => task::run_list(task::ListOptions {
                    assignee,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions {
                    id,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Project(cmd) => match cmd {
                ProjectCommands::Add {
                    name,
                    assignee,
                    due,
                    progress,
                    status,
                } => project::run_add(project::AddOptions {
                    name,
                    assignee,
                    due,
                    progress,
                    status,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ProjectCommands::List { assignee } => project::run_list(project::ListOptions {
                    assignee,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ProjectCommands::Rm { name } => project::run_rm(project::RmOptions {
                    name,
                    dir: self.dir,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Bars { assignee } => plan::run_bars(plan::BarsOptions {
                assignee,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Plan { busy_only } => plan::run_plan(plan::PlanOptions {
                busy_only,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                kind,
                reference,
                end,
                progress,
            } => edit::run(edit::EditOptions {
                kind,
                reference,
                end,
                progress,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
