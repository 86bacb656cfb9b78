// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

// Only one test lives here: it points VRAMPLAN_HOME at a temp dir for the
// whole process.

use clap::Parser;
use tempfile::TempDir;
use vramplan::cli::Cli;
use vramplan::commands;
use vramplan::config::Settings;

#[test]
fn test_init_force_replaces_broken_settings() {
    let temp_dir = TempDir::new().unwrap();
    std::env::set_var("VRAMPLAN_HOME", temp_dir.path());

    let settings_path = temp_dir.path().join("settings.json");
    std::fs::write(&settings_path, "{ not json").unwrap();
    assert!(Settings::load_from(&settings_path).is_err());

    // Other commands read settings first and fail on the broken file
    let models = Cli::try_parse_from(["vramplan", "models"]).unwrap();
    assert!(commands::run(&models).is_err());

    let init = Cli::try_parse_from(["vramplan", "init", "--force"]).unwrap();
    commands::run(&init).unwrap();

    let settings = Settings::load_from(&settings_path).unwrap();
    assert_eq!(settings, Settings::default());
    assert!(temp_dir.path().join("plan.toml").exists());
}
