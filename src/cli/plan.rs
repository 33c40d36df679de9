//! rplan bars / plan command implementations.

use std::path::PathBuf;

use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::schedule::{build_assignments, plan_team, AssignmentBar, MemberSchedule};
use crate::store::RecordStore;

use super::load_context;
use super::member::describe;

pub struct BarsOptions {
    pub assignee: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct PlanOptions {
    pub busy_only: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct BarsOutput {
    assignee: String,
    total: usize,
    bars: Vec<AssignmentBar>,
}

#[derive(serde::Serialize)]
struct PlanOutput {
    members: usize,
    schedules: Vec<MemberSchedule>,
}

fn bar_line(bar: &AssignmentBar) -> String {
    format!(
        "{} {} {} -> {} ({}%)",
        bar.key, bar.label, bar.start, bar.end, bar.progress
    )
}

pub fn run_bars(options: BarsOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let tasks = ctx.store.list_tasks()?;
    let projects = ctx.store.list_projects()?;
    let bars = build_assignments(&options.assignee, &tasks, &projects)?;
    let output = BarsOutput {
        assignee: options.assignee,
        total: bars.len(),
        bars,
    };

    let mut human = HumanOutput::new(format!("Bars for {}", output.assignee));
    human.push_summary("Total", output.total.to_string());
    for bar in &output.bars {
        human.push_detail(bar_line(bar));
    }
    if output.bars.is_empty() {
        human.push_warning("no tasks or projects assigned");
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "bars",
        &output,
        Some(&human),
    )
}

pub fn run_plan(options: PlanOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let show_empty = ctx.config.plan.show_empty_members && !options.busy_only;
    let schedules = plan_team(&ctx.store, show_empty)?;
    let output = PlanOutput {
        members: schedules.len(),
        schedules,
    };

    let mut human = HumanOutput::new("Team plan");
    human.push_summary("Members", output.members.to_string());
    for schedule in &output.schedules {
        human.push_detail(format!(
            "{} ({})",
            schedule.member.name,
            describe(&schedule.member)
        ));
        if schedule.bars.is_empty() {
            human.push_detail("  no tasks or projects assigned");
        }
        for bar in &schedule.bars {
            human.push_detail(format!("  {}", bar_line(bar)));
        }
    }
    if output.schedules.is_empty() {
        if ctx.store.list_team_members()?.is_empty() {
            human.push_warning("no team members registered");
            human.push_next_step("rplan member add <name>");
        } else {
            human.push_warning("no team member has tasks or projects assigned");
        }
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "plan",
        &output,
        Some(&human),
    )
}
