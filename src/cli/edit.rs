//! rplan edit command implementation.
//!
//! Mirrors what the chart widget sends: a date drag, a progress drag, or
//! both at once.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::edit::{apply_edit, dispatch, EditEvent};
use crate::error::{Error, Result};
use crate::model::{Record, RecordKey, RecordKind};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::schedule::derive_start;

use super::load_context;

pub struct EditOptions {
    pub kind: RecordKind,
    pub reference: String,
    pub end: Option<NaiveDate>,
    pub progress: Option<f64>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct EditOutput {
    key: RecordKey,
    record: Record,
}

pub fn run(options: EditOptions) -> Result<()> {
    let key = RecordKey::parse(options.kind, &options.reference)?;
    let mut ctx = load_context(options.dir)?;

    let outcome = match (options.end, options.progress) {
        (Some(end), Some(progress)) => apply_edit(&mut ctx.store, &key, end, progress)?,
        (Some(end), None) => {
            let event = EditEvent::DateChanged {
                start: derive_start(end, key.kind())?,
                key: key.clone(),
                end,
            };
            dispatch(&mut ctx.store, &event)?
        }
        (None, Some(progress)) => {
            let event = EditEvent::ProgressChanged {
                key: key.clone(),
                progress,
            };
            dispatch(&mut ctx.store, &event)?
        }
        (None, None) => {
            return Err(Error::InvalidArgument(
                "edit needs --end, --progress, or both".to_string(),
            ))
        }
    };

    // Stale bars surface as NotFound / AmbiguousKey errors (exit code 3).
    let record = outcome.into_result()?;
    let output = EditOutput { key, record };

    let mut human = HumanOutput::new(format!("Updated {}", output.key));
    human.push_summary("Due", output.record.due_date().to_string());
    human.push_summary("Progress", format!("{}%", output.record.progress()));
    human.push_summary("Status", output.record.status_label());
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &output,
        Some(&human),
    )
}
