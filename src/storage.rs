//! File-backed record store
//!
//! Team members, tasks and projects live in a single JSON snapshot
//! (`rplan.json` by default) inside the planner directory:
//!
//! ```text
//! <planner dir>/
//!   .rplan.toml          # Optional configuration
//!   rplan.json           # Record snapshot
//!   rplan.json.lock      # Writer lock (fs2/flock)
//! ```
//!
//! Every write takes the lock, re-reads the snapshot, applies one change
//! and atomically replaces the file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::lock::{lock_path_for, write_atomic, FileLock};
use crate::model::{Project, ProjectStatus, RecordKey, Task, TaskStatus, TeamMember};
use crate::status::opening_status;
use crate::store::{patch_project, patch_task, ProjectPatch, RecordStore, TaskPatch};

pub const RECORDS_SCHEMA_VERSION: &str = "rplan.records.v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub schema_version: String,
    #[serde(default)]
    pub team_members: Vec<TeamMember>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Next task id to hand out; ids are never reused
    #[serde(default)]
    pub next_task_id: u64,
}

impl RecordSnapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: RECORDS_SCHEMA_VERSION.to_string(),
            team_members: Vec::new(),
            tasks: Vec::new(),
            projects: Vec::new(),
            next_task_id: 1,
        }
    }

    fn allocate_task_id(&mut self) -> u64 {
        let highest = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let id = self.next_task_id.max(highest + 1);
        self.next_task_id = id + 1;
        id
    }

    fn validate(&self) -> Result<()> {
        if self.schema_version != RECORDS_SCHEMA_VERSION {
            return Err(Error::InvalidRecord(format!(
                "unsupported schema version '{}' (expected {RECORDS_SCHEMA_VERSION})",
                self.schema_version
            )));
        }
        for task in &self.tasks {
            task.validate()?;
        }
        for project in &self.projects {
            project.validate()?;
        }
        Ok(())
    }
}

/// Fields for a task about to be created; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub name: String,
    pub assignee: String,
    pub due_date: NaiveDate,
    pub progress: u8,
    /// Derived from `progress` when absent
    pub status: Option<TaskStatus>,
}

/// Fields for a project about to be created.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub assignee: String,
    pub due_date: NaiveDate,
    pub progress: u8,
    /// Derived from `progress` when absent
    pub status: Option<ProjectStatus>,
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl JsonStore {
    pub fn new(path: PathBuf, lock_timeout_ms: u64) -> Self {
        Self {
            path,
            lock_timeout_ms,
        }
    }

    /// Store for a planner directory, using its loaded config
    pub fn for_dir(dir: &Path, config: &Config) -> Self {
        Self::new(config.store_path(dir), config.locking.timeout_ms)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_initialized(&self) -> bool {
        self.path.is_file()
    }

    /// Create an empty snapshot; returns false if one already exists
    pub fn init(&self) -> Result<bool> {
        let _lock = FileLock::acquire(lock_path_for(&self.path), self.lock_timeout_ms)?;
        if self.is_initialized() {
            return Ok(false);
        }
        self.write(&RecordSnapshot::empty())?;
        info!(path = %self.path.display(), "initialized record store");
        Ok(true)
    }

    pub fn load(&self) -> Result<RecordSnapshot> {
        if !self.is_initialized() {
            return Err(Error::NotInitialized(self.path.clone()));
        }
        let content = fs::read_to_string(&self.path)?;
        let snapshot: RecordSnapshot = serde_json::from_str(&content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    fn write(&self, snapshot: &RecordSnapshot) -> Result<()> {
        let json = serde_json::to_string_pretty(snapshot)?;
        write_atomic(&self.path, json.as_bytes())
    }

    /// Apply one change to the snapshot under the writer lock
    fn mutate<T>(&self, change: impl FnOnce(&mut RecordSnapshot) -> Result<T>) -> Result<T> {
        let _lock = FileLock::acquire(lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut snapshot = self.load()?;
        let value = change(&mut snapshot)?;
        self.write(&snapshot)?;
        Ok(value)
    }

    pub fn add_member(&self, name: &str, department: &str, role: &str) -> Result<TeamMember> {
        let name = required("member name", name)?;
        self.mutate(|snapshot| {
            if snapshot.team_members.iter().any(|m| m.name == name) {
                return Err(Error::InvalidArgument(format!(
                    "team member already exists: {name}"
                )));
            }
            let member = TeamMember {
                id: snapshot.team_members.iter().map(|m| m.id).max().unwrap_or(0) + 1,
                name,
                department: department.trim().to_string(),
                role: role.trim().to_string(),
            };
            snapshot.team_members.push(member.clone());
            debug!(id = member.id, name = %member.name, "added team member");
            Ok(member)
        })
    }

    pub fn add_task(&self, new: NewTask) -> Result<Task> {
        let name = required("task name", &new.name)?;
        let assignee = required("assignee", &new.assignee)?;
        let status = opening_status(new.status, new.progress)?;
        self.mutate(|snapshot| {
            let task = Task {
                id: snapshot.allocate_task_id(),
                name,
                assignee,
                due_date: new.due_date,
                status,
                progress: new.progress,
            };
            task.validate()?;
            snapshot.tasks.push(task.clone());
            debug!(id = task.id, assignee = %task.assignee, "added task");
            Ok(task)
        })
    }

    pub fn add_project(&self, new: NewProject) -> Result<Project> {
        let name = required("project name", &new.name)?;
        let assignee = required("assignee", &new.assignee)?;
        let status = opening_status(new.status, new.progress)?;
        self.mutate(|snapshot| {
            if snapshot.projects.iter().any(|p| p.name == name) {
                return Err(Error::InvalidArgument(format!(
                    "project already exists: {name}"
                )));
            }
            let project = Project {
                name,
                assignee,
                due_date: new.due_date,
                status,
                progress: new.progress,
            };
            project.validate()?;
            snapshot.projects.push(project.clone());
            debug!(name = %project.name, assignee = %project.assignee, "added project");
            Ok(project)
        })
    }

    pub fn remove_task(&self, id: u64) -> Result<Task> {
        self.mutate(|snapshot| {
            let index = snapshot
                .tasks
                .iter()
                .position(|task| task.id == id)
                .ok_or(Error::NotFound(RecordKey::Task(id)))?;
            Ok(snapshot.tasks.remove(index))
        })
    }

    /// Removes every project with this name
    pub fn remove_project(&self, name: &str) -> Result<Vec<Project>> {
        self.mutate(|snapshot| {
            let (removed, kept): (Vec<_>, Vec<_>) = snapshot
                .projects
                .drain(..)
                .partition(|project| project.name == name);
            snapshot.projects = kept;
            if removed.is_empty() {
                return Err(Error::NotFound(RecordKey::Project(name.to_string())));
            }
            Ok(removed)
        })
    }
}

impl RecordStore for JsonStore {
    fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        Ok(self.load()?.team_members)
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.load()?.tasks)
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.load()?.projects)
    }

    fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task> {
        self.mutate(|snapshot| patch_task(&mut snapshot.tasks, id, &patch))
    }

    fn update_project(&mut self, name: &str, patch: ProjectPatch) -> Result<Project> {
        self.mutate(|snapshot| patch_project(&mut snapshot.projects, name, &patch))
    }
}

fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(format!("{field} cannot be empty")));
    }
    Ok(trimmed.to_string())
}
