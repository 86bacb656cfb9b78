// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! vramplan - capacity planning for GPU inference deployments
//!
//! Entry point for the vramplan CLI application.

use clap::Parser;

use vramplan::cli::Cli;
use vramplan::commands;
use vramplan::error::Result;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr so `--format json` stays clean.
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());

    if cli.verbose > 0 {
        let level = if cli.verbose > 1 { "trace" } else { "debug" };
        if let Ok(parsed) = format!("vramplan={}", level).parse() {
            env_filter = env_filter.add_directive(parsed);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    commands::run(&cli)
}
