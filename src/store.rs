//! Record store interface consumed by the planner core.
//!
//! The aggregator and edit dispatcher never reach for ambient state: every
//! read and write goes through a [`RecordStore`] passed in by the caller.
//! Records are addressed by their key (task id, project name), never by
//! their position in a listing.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{
    Project, ProjectStatus, RecordKey, Task, TaskStatus, TeamMember, MAX_PROGRESS,
};
use crate::status::{reconcile_status, Lifecycle};

/// Partial update for a record; `None` fields are left untouched.
///
/// A progress change without an explicit status reconciles the status the
/// record holds at the moment the patch is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPatch<S> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<S>,
}

pub type TaskPatch = RecordPatch<TaskStatus>;
pub type ProjectPatch = RecordPatch<ProjectStatus>;

impl<S> Default for RecordPatch<S> {
    fn default() -> Self {
        Self {
            due_date: None,
            progress: None,
            status: None,
        }
    }
}

impl<S: Lifecycle> RecordPatch<S> {
    fn validate(&self, key: &RecordKey) -> Result<()> {
        match self.progress {
            Some(progress) if progress > MAX_PROGRESS => Err(Error::InvalidArgument(format!(
                "{key}: progress {progress} exceeds {MAX_PROGRESS}"
            ))),
            _ => Ok(()),
        }
    }

    fn apply(&self, due_date: &mut NaiveDate, progress: &mut u8, status: &mut S) {
        if let Some(value) = self.due_date {
            *due_date = value;
        }
        if let Some(value) = self.progress {
            *progress = value;
        }
        *status = match (self.status, self.progress) {
            (Some(value), _) => value,
            (None, Some(value)) => reconcile_status(*status, value),
            (None, None) => *status,
        };
    }
}

/// Operations the planner needs from whatever holds the records.
pub trait RecordStore {
    fn list_team_members(&self) -> Result<Vec<TeamMember>>;

    fn list_tasks(&self) -> Result<Vec<Task>>;

    fn list_projects(&self) -> Result<Vec<Project>>;

    /// Fails with `NotFound` when no task has this id.
    fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task>;

    /// Fails with `NotFound` when no project has this name, and with
    /// `AmbiguousKey` when more than one does.
    fn update_project(&mut self, name: &str, patch: ProjectPatch) -> Result<Project>;
}

pub(crate) fn patch_task(tasks: &mut [Task], id: u64, patch: &TaskPatch) -> Result<Task> {
    let key = RecordKey::Task(id);
    patch.validate(&key)?;
    let task = tasks
        .iter_mut()
        .find(|task| task.id == id)
        .ok_or(Error::NotFound(key))?;
    patch.apply(&mut task.due_date, &mut task.progress, &mut task.status);
    Ok(task.clone())
}

pub(crate) fn patch_project(
    projects: &mut [Project],
    name: &str,
    patch: &ProjectPatch,
) -> Result<Project> {
    let key = RecordKey::Project(name.to_string());
    patch.validate(&key)?;
    let mut matches = projects.iter_mut().filter(|project| project.name == name);
    let project = match matches.next() {
        Some(project) => project,
        None => return Err(Error::NotFound(key)),
    };
    let others = matches.count();
    if others > 0 {
        return Err(Error::AmbiguousKey {
            key,
            matches: others + 1,
        });
    }
    patch.apply(
        &mut project.due_date,
        &mut project.progress,
        &mut project.status,
    );
    Ok(project.clone())
}

/// In-process store backed by plain vectors.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    members: Vec<TeamMember>,
    tasks: Vec<Task>,
    projects: Vec<Project>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_member(&mut self, name: &str, department: &str, role: &str) -> u64 {
        let id = self.members.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        self.members.push(TeamMember {
            id,
            name: name.to_string(),
            department: department.to_string(),
            role: role.to_string(),
        });
        id
    }

    pub fn push_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    pub fn push_project(&mut self, project: Project) {
        self.projects.push(project);
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }
}

impl RecordStore for MemoryStore {
    fn list_team_members(&self) -> Result<Vec<TeamMember>> {
        Ok(self.members.clone())
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.projects.clone())
    }

    fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task> {
        patch_task(&mut self.tasks, id, &patch)
    }

    fn update_project(&mut self, name: &str, patch: ProjectPatch) -> Result<Project> {
        patch_project(&mut self.projects, name, &patch)
    }
}
