// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for vramplan.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::ModelOverrides;
use crate::models::Precision;

/// vramplan - capacity planning for GPU inference deployments
#[derive(Parser, Debug)]
#[command(name = "vramplan")]
#[command(version, about = "Capacity planning for GPU inference deployments")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute memory and bandwidth utilization for a set of models
    Plan(PlanArgs),

    /// List known hardware profiles
    #[command(alias = "hw")]
    Hardware(HardwareArgs),

    /// List known model architectures
    Models(ModelsArgs),

    /// Write default settings and sample catalogs to the vramplan home
    Init(InitArgs),
}

/// Arguments for the plan subcommand
#[derive(clap::Args, Debug, Default)]
pub struct PlanArgs {
    /// Hardware profile id (overrides the plan file and settings)
    #[arg(long = "hardware", short = 'H')]
    pub hardware: Option<String>,

    /// Plan file (TOML)
    #[arg(long, short, value_name = "PATH")]
    pub plan: Option<PathBuf>,

    /// Model ids to add to the plan
    #[arg(short, long = "model", num_args = 1..)]
    pub models: Vec<String>,

    /// Model ids to exclude from aggregate utilization
    #[arg(long, num_args = 1..)]
    pub disable: Vec<String>,

    /// Runtime overhead ratio (default 0.2)
    #[arg(long)]
    pub overhead: Option<f64>,

    /// Weight precision for every model (fp32, bf16, fp16, fp8, int8, fp4, int4)
    #[arg(long)]
    pub weight_precision: Option<Precision>,

    /// KV-cache precision for every model
    #[arg(long)]
    pub kv_precision: Option<Precision>,

    /// KV-cache budget per model, in GB
    #[arg(long, value_name = "GB")]
    pub kv_budget: Option<f64>,

    /// Average context length per request, in tokens
    #[arg(long, value_name = "TOKENS")]
    pub avg_tokens: Option<f64>,

    /// Target decode throughput per model, in tokens/s
    #[arg(long, value_name = "TPS")]
    pub target_tps: Option<f64>,

    /// Exit with an error when the deployment does not fit
    #[arg(long)]
    pub strict: bool,
}

impl PlanArgs {
    /// Per-model overrides given on the command line
    pub fn overrides(&self) -> ModelOverrides {
        ModelOverrides {
            weight_precision: self.weight_precision,
            kv_precision: self.kv_precision,
            kv_budget_gb: self.kv_budget,
            avg_tokens_per_request: self.avg_tokens,
            target_tokens_per_sec: self.target_tps,
            enabled: None,
        }
    }
}

/// Arguments for the hardware subcommand
#[derive(clap::Args, Debug, Default)]
pub struct HardwareArgs {
    /// Only show hardware with at least this much memory, in GB
    #[arg(long, value_name = "GB")]
    pub min_vram: Option<f64>,
}

/// Arguments for the models subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ModelsArgs {
    /// Show architecture details and quantization quality loss
    #[arg(short, long)]
    pub detailed: bool,

    /// Only show models whose weights fit in this much memory, in GB
    #[arg(long, value_name = "GB")]
    pub fits: Option<f64>,
}

/// Arguments for the init subcommand
#[derive(clap::Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

/// Output format for reports
#[derive(ValueEnum, Clone, Debug, Default, PartialEq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// JSON output
    Json,
}
