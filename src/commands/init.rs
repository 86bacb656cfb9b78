// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Init command: seed the vramplan home with editable files

use std::path::{Path, PathBuf};

use crate::cli::args::InitArgs;
use crate::config::{planner_home, Settings};
use crate::error::Result;
use crate::hardware::HardwareCatalog;
use crate::models::ModelCatalog;

const SAMPLE_PLAN: &str = r#"# vramplan deployment plan
# Run with: vramplan plan --plan plan.toml

hardware = "rtx-pro-6000"
overhead_ratio = 0.2

[[models]]
id = "qwen3-32b"
kv_precision = "fp8"
kv_budget_gb = 16.0

[[models]]
id = "gpt-oss-20b"
target_tokens_per_sec = 50

[[models]]
id = "qwen3-embedding-0.6b"
"#;

/// What happened to one file during init
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

/// Write settings, sample catalogs and a sample plan under `home`.
/// Existing files are left alone unless `force` is set.
pub fn init_home(home: &Path, force: bool) -> Result<Vec<InitOutcome>> {
    std::fs::create_dir_all(home)?;

    let settings_path = home.join("settings.json");
    let mut outcomes = Vec::new();

    if force || !settings_path.exists() {
        Settings::default().save_to(&settings_path)?;
        outcomes.push(InitOutcome::Created(settings_path));
    } else {
        outcomes.push(InitOutcome::Skipped(settings_path));
    }

    let files = [
        ("models.toml", ModelCatalog::generate_sample_config()),
        ("hardware.toml", HardwareCatalog::generate_sample_config()),
        ("plan.toml", SAMPLE_PLAN.to_string()),
    ];
    for (name, content) in files {
        let path = home.join(name);
        if !force && path.exists() {
            outcomes.push(InitOutcome::Skipped(path));
            continue;
        }
        std::fs::write(&path, content)?;
        outcomes.push(InitOutcome::Created(path));
    }

    Ok(outcomes)
}

/// Execute the init command
pub fn execute(args: &InitArgs) -> Result<()> {
    let home = planner_home();
    let outcomes = init_home(&home, args.force)?;

    println!("Initialized vramplan in {}", home.display());
    for outcome in &outcomes {
        match outcome {
            InitOutcome::Created(path) => println!("  created {}", path.display()),
            InitOutcome::Skipped(path) => {
                println!("  exists  {} (use --force to overwrite)", path.display())
            }
        }
    }

    Ok(())
}
