//! Edit dispatch: pushes a dragged bar back into its record.
//!
//! An edit carries the bar's key, its new end date and its new progress.
//! The record's due date becomes the new end, its progress the clamped
//! value, and its status is reconciled from the progress. Records that
//! vanished or whose key matches several records are reported as outcomes
//! and leave the store untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Record, RecordKey, MAX_PROGRESS};
use crate::schedule::derive_start;
use crate::store::{ProjectPatch, RecordStore, TaskPatch};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EditOutcome {
    Applied { record: Record },
    NotFound { key: RecordKey },
    AmbiguousKey { key: RecordKey, matches: usize },
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }

    /// The stale-data error a caller should surface when nothing was applied.
    pub fn into_result(self) -> Result<Record> {
        match self {
            EditOutcome::Applied { record } => Ok(record),
            EditOutcome::NotFound { key } => Err(Error::NotFound(key)),
            EditOutcome::AmbiguousKey { key, matches } => {
                Err(Error::AmbiguousKey { key, matches })
            }
        }
    }
}

/// Change reported by the chart widget.
///
/// Date drags and progress drags arrive separately; the field a drag did
/// not touch is taken from the current record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditEvent {
    DateChanged {
        key: RecordKey,
        start: NaiveDate,
        end: NaiveDate,
    },
    ProgressChanged {
        key: RecordKey,
        progress: f64,
    },
}

impl EditEvent {
    pub fn key(&self) -> &RecordKey {
        match self {
            EditEvent::DateChanged { key, .. } | EditEvent::ProgressChanged { key, .. } => key,
        }
    }
}

/// Clamp a widget progress value to `0..=100` and round it.
pub fn normalize_progress(progress: f64) -> Result<u8> {
    if !progress.is_finite() {
        return Err(Error::InvalidArgument(format!(
            "progress must be a finite number, got {progress}"
        )));
    }
    Ok(progress.clamp(0.0, f64::from(MAX_PROGRESS)).round() as u8)
}

/// The current record behind `key`, or the outcome to report when there is
/// no single such record.
fn resolve<S: RecordStore + ?Sized>(
    store: &S,
    key: &RecordKey,
) -> Result<std::result::Result<Record, EditOutcome>> {
    let mut found: Vec<Record> = match key {
        RecordKey::Task(id) => store
            .list_tasks()?
            .into_iter()
            .filter(|task| task.id == *id)
            .map(Record::Task)
            .collect(),
        RecordKey::Project(name) => store
            .list_projects()?
            .into_iter()
            .filter(|project| &project.name == name)
            .map(Record::Project)
            .collect(),
    };

    match found.len() {
        1 => Ok(Ok(found.remove(0))),
        0 => {
            warn!(%key, "edit targets a record that no longer exists");
            Ok(Err(EditOutcome::NotFound { key: key.clone() }))
        }
        matches => {
            warn!(%key, matches, "edit targets an ambiguous key");
            Ok(Err(EditOutcome::AmbiguousKey {
                key: key.clone(),
                matches,
            }))
        }
    }
}

/// Apply an edited bar to its record.
///
/// Re-applying the same edit leaves the record unchanged.
pub fn apply_edit<S: RecordStore + ?Sized>(
    store: &mut S,
    key: &RecordKey,
    new_end: NaiveDate,
    new_progress: f64,
) -> Result<EditOutcome> {
    let progress = normalize_progress(new_progress)?;
    derive_start(new_end, key.kind())?;

    let current = match resolve(&*store, key)? {
        Ok(record) => record,
        Err(outcome) => return Ok(outcome),
    };
    let current_status = current.status_label();

    // The store reconciles status against the record it holds when the
    // patch lands.
    let updated = match current {
        Record::Task(task) => {
            let patch = TaskPatch {
                due_date: Some(new_end),
                progress: Some(progress),
                status: None,
            };
            store.update_task(task.id, patch).map(Record::Task)
        }
        Record::Project(project) => {
            let patch = ProjectPatch {
                due_date: Some(new_end),
                progress: Some(progress),
                status: None,
            };
            store
                .update_project(&project.name, patch)
                .map(Record::Project)
        }
    };

    match updated {
        Ok(record) => {
            debug!(%key, from = current_status, to = record.status_label(), "reconciled status");
            info!(%key, due = %record.due_date(), progress, status = record.status_label(), "edit applied");
            Ok(EditOutcome::Applied { record })
        }
        Err(Error::NotFound(key)) => Ok(EditOutcome::NotFound { key }),
        Err(Error::AmbiguousKey { key, matches }) => {
            Ok(EditOutcome::AmbiguousKey { key, matches })
        }
        Err(err) => Err(err),
    }
}

/// Route a widget event through [`apply_edit`].
///
/// The dragged start of a date change is not stored: bar length is fixed
/// by record kind, so only the end moves the due date.
pub fn dispatch<S: RecordStore + ?Sized>(store: &mut S, event: &EditEvent) -> Result<EditOutcome> {
    let key = event.key();
    let current = match resolve(&*store, key)? {
        Ok(record) => record,
        Err(outcome) => return Ok(outcome),
    };

    match event {
        EditEvent::DateChanged { start, end, .. } => {
            debug!(%key, %start, %end, "date change");
            apply_edit(store, key, *end, f64::from(current.progress()))
        }
        EditEvent::ProgressChanged { progress, .. } => {
            debug!(%key, progress, "progress change");
            apply_edit(store, key, current.due_date(), *progress)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, ProjectStatus, Task, TaskStatus, TeamMember};
    use crate::store::MemoryStore;

    /// Lists an older snapshot than the one its updates land in, like a
    /// reader racing another writer.
    struct LaggingStore {
        listed: MemoryStore,
        live: MemoryStore,
    }

    impl RecordStore for LaggingStore {
        fn list_team_members(&self) -> Result<Vec<TeamMember>> {
            self.listed.list_team_members()
        }

        fn list_tasks(&self) -> Result<Vec<Task>> {
            self.listed.list_tasks()
        }

        fn list_projects(&self) -> Result<Vec<Project>> {
            self.listed.list_projects()
        }

        fn update_task(&mut self, id: u64, patch: TaskPatch) -> Result<Task> {
            self.live.update_task(id, patch)
        }

        fn update_project(&mut self, name: &str, patch: ProjectPatch) -> Result<Project> {
            self.live.update_project(name, patch)
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn store_with_task(status: TaskStatus, progress: u8) -> MemoryStore {
        let mut store = MemoryStore::new();
        store.push_task(Task {
            id: 1,
            name: "Wire API".to_string(),
            assignee: "kim".to_string(),
            due_date: date(2024, 6, 30),
            status,
            progress,
        });
        store
    }

    #[test]
    fn normalize_progress_clamps_and_rounds() {
        assert_eq!(normalize_progress(-5.0).expect("low"), 0);
        assert_eq!(normalize_progress(39.6).expect("mid"), 40);
        assert_eq!(normalize_progress(40.4).expect("mid"), 40);
        assert_eq!(normalize_progress(99.5).expect("high"), 100);
        assert_eq!(normalize_progress(250.0).expect("over"), 100);
        assert!(normalize_progress(f64::NAN).is_err());
        assert!(normalize_progress(f64::INFINITY).is_err());
    }

    #[test]
    fn edit_moves_due_date_and_reconciles() {
        let mut store = store_with_task(TaskStatus::Scheduled, 0);
        let outcome = apply_edit(&mut store, &RecordKey::Task(1), date(2024, 7, 5), 12.2)
            .expect("edit");
        let record = outcome.into_result().expect("applied");
        let Record::Task(task) = record else {
            panic!("expected task");
        };
        assert_eq!(task.due_date, date(2024, 7, 5));
        assert_eq!(task.progress, 12);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn rapid_edits_reconcile_independently() {
        let mut store = store_with_task(TaskStatus::Scheduled, 0);
        let key = RecordKey::Task(1);
        let end = date(2024, 6, 30);
        apply_edit(&mut store, &key, end, 30.0).expect("first");
        apply_edit(&mut store, &key, end, 0.0).expect("second");
        assert_eq!(store.tasks()[0].status, TaskStatus::Scheduled);
        apply_edit(&mut store, &key, end, 100.0).expect("third");
        apply_edit(&mut store, &key, end, 0.0).expect("fourth");
        assert_eq!(store.tasks()[0].status, TaskStatus::Done);
        assert_eq!(store.tasks()[0].progress, 0);
    }

    #[test]
    fn invalid_end_is_rejected_before_lookup() {
        let mut store = store_with_task(TaskStatus::Scheduled, 0);
        let err = apply_edit(&mut store, &RecordKey::Task(1), NaiveDate::MIN, 50.0)
            .expect_err("range");
        assert!(matches!(err, Error::InvalidRange { .. }));
        assert_eq!(store.tasks()[0].progress, 0);
    }

    #[test]
    fn date_change_keeps_progress() {
        let mut store = store_with_task(TaskStatus::InProgress, 55);
        let event = EditEvent::DateChanged {
            key: RecordKey::Task(1),
            start: date(2024, 7, 1),
            end: date(2024, 7, 10),
        };
        let outcome = dispatch(&mut store, &event).expect("dispatch");
        assert!(outcome.is_applied());
        let task = &store.tasks()[0];
        assert_eq!(task.due_date, date(2024, 7, 10));
        assert_eq!(task.progress, 55);
        assert_eq!(task.status, TaskStatus::InProgress);
    }

    #[test]
    fn progress_change_keeps_due_date() {
        let mut store = MemoryStore::new();
        store.push_project(Project {
            name: "Alpha".to_string(),
            assignee: "kim".to_string(),
            due_date: date(2024, 8, 1),
            status: ProjectStatus::Planned,
            progress: 0,
        });
        let event = EditEvent::ProgressChanged {
            key: RecordKey::Project("Alpha".to_string()),
            progress: 100.0,
        };
        dispatch(&mut store, &event).expect("dispatch");
        let project = &store.projects()[0];
        assert_eq!(project.due_date, date(2024, 8, 1));
        assert_eq!(project.status, ProjectStatus::Done);
        assert_eq!(project.progress, 100);
    }

    #[test]
    fn dispatch_on_missing_record_reports_not_found() {
        let mut store = MemoryStore::new();
        let event = EditEvent::ProgressChanged {
            key: RecordKey::Task(3),
            progress: 10.0,
        };
        let outcome = dispatch(&mut store, &event).expect("dispatch");
        assert_eq!(
            outcome,
            EditOutcome::NotFound {
                key: RecordKey::Task(3)
            }
        );
    }

    #[test]
    fn edit_event_deserializes_from_widget_json() {
        let raw = r#"{"event":"progress_changed","key":{"kind":"task","ref":4},"progress":62.5}"#;
        let event: EditEvent = serde_json::from_str(raw).expect("event");
        assert_eq!(
            event,
            EditEvent::ProgressChanged {
                key: RecordKey::Task(4),
                progress: 62.5,
            }
        );
    }

    #[test]
    fn status_reconciles_against_the_record_being_written() {
        let mut store = LaggingStore {
            listed: store_with_task(TaskStatus::InProgress, 30),
            live: store_with_task(TaskStatus::Done, 100),
        };
        let outcome = apply_edit(&mut store, &RecordKey::Task(1), date(2024, 6, 30), 40.0)
            .expect("edit");
        assert!(outcome.is_applied());
        let task = &store.live.tasks()[0];
        assert_eq!(task.progress, 40);
        assert_eq!(task.status, TaskStatus::Done);
    }
}
