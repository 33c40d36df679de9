//! rplan init command implementation
//!
//! Writes a default `.rplan.toml` and an empty record file.

use std::path::PathBuf;

use crate::config::CONFIG_FILE;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};

use super::load_context;

pub struct InitOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    dir: PathBuf,
    store: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    store: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    std::fs::create_dir_all(&ctx.dir)?;

    let config_path = ctx.dir.join(CONFIG_FILE);
    let created_config = if config_path.exists() {
        false
    } else {
        ctx.config.save(&config_path)?;
        true
    };
    let created_store = ctx.store.init()?;

    let report = InitReport {
        dir: ctx.dir.clone(),
        store: ctx.store.path().to_path_buf(),
        created: InitCreated {
            config: created_config,
            store: created_store,
        },
    };

    let header = if created_config || created_store {
        "Planner initialized"
    } else {
        "Planner already initialized"
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("Directory", report.dir.display().to_string());
    human.push_summary("Store", report.store.display().to_string());
    human.push_next_step("rplan member add <name>");
    human.push_next_step("rplan task add <name> --assignee <name> --due <YYYY-MM-DD>");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &report,
        Some(&human),
    )
}
