//! Timeline bars derived from tasks and projects.
//!
//! A bar ends on its record's due date and starts a fixed number of days
//! earlier, depending only on the record kind. Bars are rebuilt on every call
//! and never stored.

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Project, RecordKey, RecordKind, Task, TeamMember, MAX_PROGRESS};
use crate::store::RecordStore;

const TASK_DURATION_DAYS: u64 = 7;
const PROJECT_DURATION_DAYS: u64 = 30;

impl RecordKind {
    /// Length of a bar of this kind, in days.
    pub fn duration_days(&self) -> u64 {
        match self {
            RecordKind::Task => TASK_DURATION_DAYS,
            RecordKind::Project => PROJECT_DURATION_DAYS,
        }
    }
}

/// Start date of a bar of `kind` that ends on `end`.
pub fn derive_start(end: NaiveDate, kind: RecordKind) -> Result<NaiveDate> {
    let start = end
        .checked_sub_days(Days::new(kind.duration_days()))
        .ok_or(Error::InvalidRange { kind, end })?;
    if start >= end {
        return Err(Error::InvalidRange { kind, end });
    }
    Ok(start)
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssignmentBar {
    pub key: RecordKey,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: u8,
}

impl AssignmentBar {
    fn build(key: RecordKey, label: &str, end: NaiveDate, progress: u8) -> Result<Self> {
        if progress > MAX_PROGRESS {
            return Err(Error::InvalidRecord(format!(
                "{key}: progress {progress} exceeds {MAX_PROGRESS}"
            )));
        }
        let start = derive_start(end, key.kind())?;
        Ok(Self {
            key,
            label: label.to_string(),
            start,
            end,
            progress,
        })
    }

    pub fn from_task(task: &Task) -> Result<Self> {
        Self::build(task.key(), &task.name, task.due_date, task.progress)
    }

    pub fn from_project(project: &Project) -> Result<Self> {
        Self::build(
            project.key(),
            &project.name,
            project.due_date,
            project.progress,
        )
    }
}

/// Bars for one assignee: their tasks first, then their projects, each in
/// input order.
pub fn build_assignments(
    assignee: &str,
    tasks: &[Task],
    projects: &[Project],
) -> Result<Vec<AssignmentBar>> {
    let task_bars = tasks
        .iter()
        .filter(|task| task.assignee == assignee)
        .map(AssignmentBar::from_task);
    let project_bars = projects
        .iter()
        .filter(|project| project.assignee == assignee)
        .map(AssignmentBar::from_project);
    task_bars.chain(project_bars).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSchedule {
    pub member: TeamMember,
    pub bars: Vec<AssignmentBar>,
}

/// One schedule per team member, in store order.
///
/// Members without any bars are dropped unless `show_empty` is set.
pub fn plan_team<S: RecordStore + ?Sized>(
    store: &S,
    show_empty: bool,
) -> Result<Vec<MemberSchedule>> {
    let members = store.list_team_members()?;
    let tasks = store.list_tasks()?;
    let projects = store.list_projects()?;

    let mut schedules = Vec::with_capacity(members.len());
    for member in members {
        let bars = build_assignments(&member.name, &tasks, &projects)?;
        if bars.is_empty() && !show_empty {
            continue;
        }
        schedules.push(MemberSchedule { member, bars });
    }
    Ok(schedules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProjectStatus, TaskStatus};
    use crate::store::MemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn task(id: u64, assignee: &str, due: NaiveDate) -> Task {
        Task {
            id,
            name: format!("Task {id}"),
            assignee: assignee.to_string(),
            due_date: due,
            status: TaskStatus::Scheduled,
            progress: 0,
        }
    }

    fn project(name: &str, assignee: &str, due: NaiveDate) -> Project {
        Project {
            name: name.to_string(),
            assignee: assignee.to_string(),
            due_date: due,
            status: ProjectStatus::Planned,
            progress: 10,
        }
    }

    #[test]
    fn derive_start_round_trips_duration() {
        let ends = [
            date(2024, 6, 30),
            date(2024, 3, 1),
            date(2023, 1, 5),
            date(2000, 2, 29),
        ];
        for end in ends {
            for kind in [RecordKind::Task, RecordKind::Project] {
                let start = derive_start(end, kind).expect("start");
                assert!(start < end);
                assert_eq!(start + Days::new(kind.duration_days()), end);
            }
        }
    }

    #[test]
    fn derive_start_crosses_month_boundaries() {
        assert_eq!(
            derive_start(date(2024, 3, 3), RecordKind::Task).expect("task"),
            date(2024, 2, 25)
        );
        assert_eq!(
            derive_start(date(2024, 3, 15), RecordKind::Project).expect("project"),
            date(2024, 2, 14)
        );
    }

    #[test]
    fn derive_start_rejects_calendar_underflow() {
        let err = derive_start(NaiveDate::MIN, RecordKind::Project).expect_err("underflow");
        assert!(matches!(
            err,
            Error::InvalidRange {
                kind: RecordKind::Project,
                ..
            }
        ));
    }

    #[test]
    fn tasks_precede_projects_and_other_assignees_are_skipped() {
        let tasks = vec![
            task(1, "kim", date(2024, 6, 30)),
            task(2, "lee", date(2024, 7, 1)),
            task(3, "kim", date(2024, 5, 10)),
        ];
        let projects = vec![
            project("Alpha", "kim", date(2024, 8, 1)),
            project("Beta", "lee", date(2024, 9, 1)),
        ];

        let bars = build_assignments("kim", &tasks, &projects).expect("bars");
        let keys: Vec<_> = bars.iter().map(|bar| bar.key.clone()).collect();
        assert_eq!(
            keys,
            vec![
                RecordKey::Task(1),
                RecordKey::Task(3),
                RecordKey::Project("Alpha".to_string()),
            ]
        );
        assert_eq!(bars[2].start, date(2024, 7, 2));
        assert_eq!(bars[2].progress, 10);
        assert_eq!(bars[0].label, "Task 1");
    }

    #[test]
    fn unknown_assignee_yields_no_bars() {
        let tasks = vec![task(1, "kim", date(2024, 6, 30))];
        let bars = build_assignments("park", &tasks, &[]).expect("bars");
        assert!(bars.is_empty());
    }

    #[test]
    fn assignee_match_is_exact() {
        let tasks = vec![task(1, "Kim", date(2024, 6, 30))];
        assert!(build_assignments("kim", &tasks, &[])
            .expect("bars")
            .is_empty());
    }

    #[test]
    fn bar_progress_over_hundred_is_rejected() {
        let mut bad = task(9, "kim", date(2024, 6, 30));
        bad.progress = 120;
        let err = build_assignments("kim", &[bad], &[]).expect_err("invalid");
        assert!(matches!(err, Error::InvalidRecord(_)));
    }

    #[test]
    fn plan_team_follows_member_order() {
        let mut store = MemoryStore::new();
        store.push_member("lee", "Design", "Lead");
        store.push_member("kim", "Platform", "Engineer");
        store.push_member("park", "Platform", "Engineer");
        store.push_task(task(1, "kim", date(2024, 6, 30)));
        store.push_project(project("Beta", "lee", date(2024, 9, 1)));

        let plan = plan_team(&store, true).expect("plan");
        let names: Vec<_> = plan.iter().map(|s| s.member.name.as_str()).collect();
        assert_eq!(names, vec!["lee", "kim", "park"]);
        assert!(plan[2].bars.is_empty());

        let busy = plan_team(&store, false).expect("plan");
        assert_eq!(busy.len(), 2);
    }
}
