//! Record types for the planner.
//!
//! Tasks and projects are the two record kinds that become timeline bars.
//! Tasks carry a store-assigned numeric id; projects are keyed by name.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Upper bound for record progress, in percent.
pub const MAX_PROGRESS: u8 = 100;

/// The two kinds of record a bar can be built from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Task,
    Project,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Task => write!(f, "task"),
            RecordKind::Project => write!(f, "project"),
        }
    }
}

/// Identity of a record, carried by every bar so an edit can be traced back.
///
/// Serialized as `{"kind": "task", "ref": 1}` or
/// `{"kind": "project", "ref": "Alpha"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "ref", rename_all = "snake_case")]
pub enum RecordKey {
    Task(u64),
    Project(String),
}

impl RecordKey {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordKey::Task(_) => RecordKind::Task,
            RecordKey::Project(_) => RecordKind::Project,
        }
    }

    /// Build a key from a kind and a textual reference (CLI input).
    pub fn parse(kind: RecordKind, reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "{kind} reference cannot be empty"
            )));
        }
        match kind {
            RecordKind::Task => reference.parse::<u64>().map(RecordKey::Task).map_err(|_| {
                Error::InvalidArgument(format!("task id must be a number: {reference}"))
            }),
            RecordKind::Project => Ok(RecordKey::Project(reference.to_string())),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Task(id) => write!(f, "task {id}"),
            RecordKey::Project(name) => write!(f, "project '{name}'"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Scheduled,
    InProgress,
    Done,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Planned,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "scheduled",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planned => "planned",
            ProjectStatus::InProgress => "in_progress",
            ProjectStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match normalize_status(value).as_str() {
            "scheduled" => Ok(TaskStatus::Scheduled),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(Error::InvalidArgument(format!(
                "invalid task status '{other}' (expected scheduled|in_progress|done)"
            ))),
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match normalize_status(value).as_str() {
            "planned" => Ok(ProjectStatus::Planned),
            "in_progress" => Ok(ProjectStatus::InProgress),
            "done" => Ok(ProjectStatus::Done),
            other => Err(Error::InvalidArgument(format!(
                "invalid project status '{other}' (expected planned|in_progress|done)"
            ))),
        }
    }
}

fn normalize_status(value: &str) -> String {
    value.trim().to_ascii_lowercase().replace('-', "_")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u64,
    pub name: String,
    pub assignee: String,
    pub due_date: NaiveDate,
    pub status: TaskStatus,
    pub progress: u8,
}

impl Task {
    pub fn key(&self) -> RecordKey {
        RecordKey::Task(self.id)
    }

    pub fn validate(&self) -> Result<()> {
        validate_progress(self.progress, &self.key())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub assignee: String,
    pub due_date: NaiveDate,
    pub status: ProjectStatus,
    pub progress: u8,
}

impl Project {
    pub fn key(&self) -> RecordKey {
        RecordKey::Project(self.name.clone())
    }

    pub fn validate(&self) -> Result<()> {
        validate_progress(self.progress, &self.key())
    }
}

fn validate_progress(progress: u8, key: &RecordKey) -> Result<()> {
    if progress > MAX_PROGRESS {
        return Err(Error::InvalidRecord(format!(
            "{key}: progress {progress} exceeds {MAX_PROGRESS}"
        )));
    }
    Ok(())
}

/// A record handed back by the edit dispatcher.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "record", rename_all = "snake_case")]
pub enum Record {
    Task(Task),
    Project(Project),
}

impl Record {
    pub fn key(&self) -> RecordKey {
        match self {
            Record::Task(task) => task.key(),
            Record::Project(project) => project.key(),
        }
    }

    pub fn due_date(&self) -> NaiveDate {
        match self {
            Record::Task(task) => task.due_date,
            Record::Project(project) => project.due_date,
        }
    }

    pub fn progress(&self) -> u8 {
        match self {
            Record::Task(task) => task.progress,
            Record::Project(project) => project.progress,
        }
    }

    pub fn status_label(&self) -> &'static str {
        match self {
            Record::Task(task) => task.status.as_str(),
            Record::Project(project) => project.status.as_str(),
        }
    }
}
