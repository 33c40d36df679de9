//! Progress-driven status reconciliation.
//!
//! Both record kinds share one rule set over three states: an initial state
//! (`Scheduled` for tasks, `Planned` for projects), `InProgress`, and `Done`.
//!
//! | progress | current     | result      |
//! |----------|-------------|-------------|
//! | 100      | any         | Done        |
//! | 1..=99   | initial     | InProgress  |
//! | 0        | InProgress  | initial     |
//! | other    | any         | unchanged   |
//!
//! A record never leaves `Done` through reconciliation, and only a drag to
//! 100% moves it there without passing through `InProgress`.

use std::fmt::Display;

use crate::error::{Error, Result};
use crate::model::{ProjectStatus, TaskStatus, MAX_PROGRESS};

/// A status set driven by the progress rules above.
pub trait Lifecycle: Copy + Eq + std::fmt::Debug {
    const INITIAL: Self;
    const IN_PROGRESS: Self;
    const DONE: Self;

    /// Every state of the kind, initial first.
    fn states() -> [Self; 3] {
        [Self::INITIAL, Self::IN_PROGRESS, Self::DONE]
    }
}

impl Lifecycle for TaskStatus {
    const INITIAL: Self = TaskStatus::Scheduled;
    const IN_PROGRESS: Self = TaskStatus::InProgress;
    const DONE: Self = TaskStatus::Done;
}

impl Lifecycle for ProjectStatus {
    const INITIAL: Self = ProjectStatus::Planned;
    const IN_PROGRESS: Self = ProjectStatus::InProgress;
    const DONE: Self = ProjectStatus::Done;
}

/// Compute the status a record should carry after its progress changes.
pub fn reconcile_status<S: Lifecycle>(current: S, progress: u8) -> S {
    if progress >= MAX_PROGRESS {
        return S::DONE;
    }
    if progress == 0 {
        if current == S::IN_PROGRESS {
            return S::INITIAL;
        }
        return current;
    }
    if current == S::INITIAL {
        return S::IN_PROGRESS;
    }
    current
}

/// Status for a record created at `progress`.
///
/// Without a requested status the initial state is reconciled. A requested
/// status must already be a fixed point of [`reconcile_status`], so a new
/// record never carries a combination the progress rules could not reach.
pub fn opening_status<S: Lifecycle + Display>(requested: Option<S>, progress: u8) -> Result<S> {
    if progress > MAX_PROGRESS {
        return Err(Error::InvalidArgument(format!(
            "progress {progress} exceeds {MAX_PROGRESS}"
        )));
    }
    let Some(status) = requested else {
        return Ok(reconcile_status(S::INITIAL, progress));
    };
    if reconcile_status(status, progress) != status {
        return Err(Error::InvalidArgument(format!(
            "status {status} does not match progress {progress}%"
        )));
    }
    Ok(status)
}
