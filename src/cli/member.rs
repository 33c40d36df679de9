//! rplan member command implementations.

use std::path::PathBuf;

use crate::error::Result;
use crate::model::TeamMember;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::store::RecordStore;

use super::load_context;

pub struct AddOptions {
    pub name: String,
    pub department: String,
    pub role: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct MemberListOutput {
    total: usize,
    members: Vec<TeamMember>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let member = ctx
        .store
        .add_member(&options.name, &options.department, &options.role)?;

    let mut human = HumanOutput::new("Team member added");
    human.push_summary("ID", member.id.to_string());
    human.push_summary("Name", member.name.clone());
    human.push_summary("Team", describe(&member));
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "member add",
        &member,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let members = ctx.store.list_team_members()?;
    let output = MemberListOutput {
        total: members.len(),
        members,
    };

    let mut human = HumanOutput::new("Team members");
    human.push_summary("Total", output.total.to_string());
    for member in &output.members {
        human.push_detail(format!("{} {} ({})", member.id, member.name, describe(member)));
    }
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "member list",
        &output,
        Some(&human),
    )
}

/// `department - role`, tolerating either being blank
pub(crate) fn describe(member: &TeamMember) -> String {
    match (member.department.is_empty(), member.role.is_empty()) {
        (false, false) => format!("{} - {}", member.department, member.role),
        (false, true) => member.department.clone(),
        (true, false) => member.role.clone(),
        (true, true) => "-".to_string(),
    }
}
