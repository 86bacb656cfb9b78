// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Subcommand implementations
//!
//! Each module exposes an `execute` entry point, plus the pure rendering and
//! selection helpers it is built from. `run` dispatches a parsed command line.

pub mod hardware;
pub mod init;
pub mod models;
pub mod plan;

use crate::cli::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;

/// Dispatch a parsed command line.
///
/// `init` runs before settings are read so it can replace a broken
/// settings file.
pub fn run(cli: &Cli) -> Result<()> {
    if let Commands::Init(args) = &cli.command {
        return init::execute(args);
    }

    let settings = match &cli.config {
        Some(path) => Settings::load_from(path)?,
        None => Settings::load()?,
    };
    tracing::debug!(
        hardware = %settings.default_hardware,
        overhead_ratio = settings.overhead_ratio,
        "settings loaded"
    );

    match &cli.command {
        Commands::Plan(args) => plan::execute(args, &settings, &cli.format),
        Commands::Hardware(args) => hardware::execute(args, &cli.format),
        Commands::Models(args) => models::execute(args, &settings, &cli.format),
        Commands::Init(args) => init::execute(args),
    }
}
