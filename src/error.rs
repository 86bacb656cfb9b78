// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Error types for vramplan
//!
//! The metrics engine itself never fails; these errors belong to the layers
//! around it (catalog loading, settings, plan files and the CLI).

use thiserror::Error;

/// Main error type for vramplan operations
#[derive(Error, Debug)]
pub enum PlannerError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing errors
    #[error("TOML error: {0}")]
    Toml(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Hardware id not present in the catalog
    #[error("Unknown hardware: {0}")]
    UnknownHardware(String),

    /// Model id not present in the catalog
    #[error("Unknown model: {0}")]
    UnknownModel(String),

    /// Deployment needs more memory than the hardware provides
    #[error("Capacity exceeded: {required_gb:.1}GB required, {vram_gb:.1}GB available")]
    CapacityExceeded { required_gb: f64, vram_gb: f64 },
}

/// Result type alias for vramplan operations
pub type Result<T> = std::result::Result<T, PlannerError>;

impl From<toml::de::Error> for PlannerError {
    fn from(err: toml::de::Error) -> Self {
        PlannerError::Toml(err.to_string())
    }
}

impl From<toml::ser::Error> for PlannerError {
    fn from(err: toml::ser::Error) -> Self {
        PlannerError::Toml(err.to_string())
    }
}
