// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! vramplan - capacity planning for GPU inference deployments.
//!
//! Given an accelerator (memory size, memory bandwidth) and a set of models
//! (architecture, numeric precision, KV-cache budget, throughput target),
//! vramplan computes per-model and aggregate memory and bandwidth figures and
//! decides whether the deployment fits.
//!
//! Architecture highlights:
//! - `metrics`: pure formulas, the aggregate capacity check and report building
//! - `models`, `hardware`: built-in catalogs merged with user TOML files
//! - `config`: JSON settings and TOML plan files
//! - `cli`, `commands`: the `vramplan` binary's argument parsing and output

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod hardware;
pub mod metrics;
pub mod models;

pub use error::{PlannerError, Result};
