//! rplan - Resource Planner Library
//!
//! This library provides the core of the rplan CLI: per-person schedule
//! bars built from tasks and projects, and the path that writes an edited
//! bar back into its record.
//!
//! # Core Concepts
//!
//! - **Bars**: Derived, never-stored timeline spans ending on a record's due date
//! - **Duration**: Fixed per record kind (7 days for tasks, 30 for projects)
//! - **Reconciliation**: Status follows progress (start, complete, regress to zero)
//! - **Keys**: Tagged `{kind, ref}` identity tracing a bar to its record
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.rplan.toml`
//! - `edit`: Edit dispatch from bars back into records
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `model`: Task, project and team member records
//! - `output`: Human and JSON output envelopes
//! - `schedule`: Date derivation and bar aggregation
//! - `status`: Progress-driven status state machine
//! - `storage`: JSON file record store
//! - `store`: Record store interface and in-memory store

pub mod cli;
pub mod config;
pub mod edit;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod schedule;
pub mod status;
pub mod storage;
pub mod store;

pub use edit::{apply_edit, dispatch, EditEvent, EditOutcome};
pub use error::{Error, Result};
pub use model::{Project, ProjectStatus, RecordKey, RecordKind, Task, TaskStatus, TeamMember};
pub use schedule::{build_assignments, derive_start, plan_team, AssignmentBar, MemberSchedule};
pub use status::reconcile_status;
pub use store::{MemoryStore, RecordStore};
