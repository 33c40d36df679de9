//! Command output: a versioned JSON envelope or a short human report.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "rplan.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Details,
    Warnings,
    NextSteps,
}

impl Section {
    const ALL: [Section; 3] = [Section::Details, Section::Warnings, Section::NextSteps];

    fn title(self) -> &'static str {
        match self {
            Section::Details => "Details",
            Section::Warnings => "Warnings",
            Section::NextSteps => "Next steps",
        }
    }
}

/// Report printed when `--json` is off.
///
/// Warnings and next steps also travel in the JSON envelope.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    items: Vec<(Section, String)>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            items: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.items.push((Section::Details, value.into()));
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.items.push((Section::Warnings, value.into()));
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.items.push((Section::NextSteps, value.into()));
    }

    fn section(&self, section: Section) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter(move |(s, _)| *s == section)
            .map(|(_, item)| item.as_str())
    }
}

impl fmt::Display for HumanOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header)?;

        if !self.summary.is_empty() {
            f.write_str("\n\nSummary:")?;
            for (key, value) in &self.summary {
                if value.is_empty() {
                    write!(f, "\n- {key}")?;
                } else {
                    write!(f, "\n- {key}: {value}")?;
                }
            }
        }

        for section in Section::ALL {
            let mut items = self.section(section).peekable();
            if items.peek().is_none() {
                continue;
            }
            write!(f, "\n\n{}:", section.title())?;
            for item in items {
                write!(f, "\n- {item}")?;
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<&'a str>,
}

impl<T: Serialize> Envelope<'_, T> {
    fn print(&self) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(self)?);
        Ok(())
    }
}

fn section_items(human: Option<&HumanOutput>, section: Section) -> Vec<&str> {
    human
        .map(|h| h.section(section).collect())
        .unwrap_or_default()
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        return Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            warnings: section_items(human, Section::Warnings),
            next_steps: section_items(human, Section::NextSteps),
        }
        .print();
    }

    if let Some(human) = human.filter(|_| !options.quiet) {
        println!("{human}");
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let hint = err.hint();
    if json {
        return Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(JsonError::from(err)),
            warnings: Vec::new(),
            next_steps: hint.as_deref().into_iter().collect(),
        }
        .print();
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

/// Command name for the error envelope, read from raw arguments because
/// clap may have rejected them.
pub fn command_name_from_args(args: impl IntoIterator<Item = String>) -> String {
    let words: Vec<String> = args
        .into_iter()
        .skip(1)
        .filter(|arg| !arg.starts_with('-'))
        .take(2)
        .collect();

    match words.as_slice() {
        [] => "rplan".to_string(),
        [group, sub] if matches!(group.as_str(), "member" | "task" | "project") => {
            format!("{group} {sub}")
        }
        [command, ..] => command.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn human_output_skips_empty_sections() {
        let mut human = HumanOutput::new("Bars for kim");
        human.push_summary("Total", "1");
        human.push_detail("task 1 Wire API 2024-06-23 -> 2024-06-30 (0%)");
        let text = human.to_string();
        assert!(text.starts_with("Bars for kim"));
        assert!(text.contains("- Total: 1"));
        assert!(text.contains("Details:"));
        assert!(!text.contains("Warnings:"));
        assert!(!text.contains("Next steps:"));
    }

    #[test]
    fn sections_render_in_fixed_order() {
        let mut human = HumanOutput::new("Team plan");
        human.push_next_step("rplan member add <name>");
        human.push_warning("no team members registered");
        let text = human.to_string();
        let warnings = text.find("Warnings:").expect("warnings");
        let next = text.find("Next steps:").expect("next steps");
        assert!(warnings < next);
    }

    #[test]
    fn command_name_keeps_record_subcommands() {
        assert_eq!(command_name_from_args(args(&["rplan"])), "rplan");
        assert_eq!(
            command_name_from_args(args(&["rplan", "--json", "task", "add", "Draft"])),
            "task add"
        );
        assert_eq!(
            command_name_from_args(args(&["rplan", "edit", "task", "1"])),
            "edit"
        );
    }
}
