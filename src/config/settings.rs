// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Settings management for vramplan
//!
//! Handles loading and saving settings from ~/.vramplan/settings.json

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::metrics::{OverheadPolicy, DEFAULT_OVERHEAD_RATIO};
use crate::models::{DegradationTable, Precision};

/// Get the vramplan home directory (~/.vramplan or $VRAMPLAN_HOME).
pub fn planner_home() -> PathBuf {
    if let Ok(home) = std::env::var("VRAMPLAN_HOME") {
        return PathBuf::from(home);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vramplan")
}

/// Main settings structure, stored in ~/.vramplan/settings.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Hardware id used when neither the CLI nor the plan names one
    #[serde(default = "default_hardware")]
    pub default_hardware: String,

    /// Models planned when neither the CLI nor the plan selects any
    #[serde(default)]
    pub default_models: Vec<String>,

    /// Runtime overhead added on top of weights and KV budgets
    #[serde(default = "default_overhead_ratio")]
    pub overhead_ratio: f64,

    /// Overrides for the quantization degradation table
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub quantization_degradation: HashMap<Precision, f64>,
}

fn default_hardware() -> String {
    "rtx-pro-6000".to_string()
}

fn default_overhead_ratio() -> f64 {
    DEFAULT_OVERHEAD_RATIO
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_hardware: default_hardware(),
            default_models: Vec::new(),
            overhead_ratio: default_overhead_ratio(),
            quantization_degradation: HashMap::new(),
        }
    }
}

impl Settings {
    /// Get the default settings file path.
    pub fn default_path() -> PathBuf {
        planner_home().join("settings.json")
    }

    /// Load settings from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    /// Load settings from a specific path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the metrics engine must never see.
    pub fn validate(&self) -> Result<()> {
        validate_ratio(self.overhead_ratio)?;

        for (precision, loss) in &self.quantization_degradation {
            if !loss.is_finite() || *loss < 0.0 {
                return Err(PlannerError::Config(format!(
                    "quantization_degradation.{}: must be a non-negative number, got {}",
                    precision, loss
                )));
            }
        }

        Ok(())
    }

    /// Overhead policy from the configured ratio
    pub fn overhead_policy(&self) -> OverheadPolicy {
        OverheadPolicy::new(self.overhead_ratio)
    }

    /// Degradation table with the configured overrides applied
    pub fn degradation_table(&self) -> DegradationTable {
        DegradationTable::with_overrides(&self.quantization_degradation)
    }
}

/// Check an overhead ratio is finite and non-negative
pub fn validate_ratio(ratio: f64) -> Result<()> {
    if !ratio.is_finite() || ratio < 0.0 {
        return Err(PlannerError::Config(format!(
            "overhead_ratio must be a non-negative number, got {}",
            ratio
        )));
    }
    Ok(())
}
