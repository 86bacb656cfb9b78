// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Plan files
//!
//! A plan names a hardware target and a list of catalog models with
//! per-model overrides. Resolving a plan looks everything up, applies the
//! overrides and validates the result so the metrics engine only ever sees
//! finite, non-negative inputs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::hardware::{HardwareCatalog, HardwareProfile};
use crate::metrics::OverheadPolicy;
use crate::models::{ModelCatalog, ModelConfig, Precision};

use super::settings::{validate_ratio, Settings};

/// Field overrides applied to a catalog model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_precision: Option<Precision>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv_precision: Option<Precision>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv_budget_gb: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_tokens_per_request: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_tokens_per_sec: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl ModelOverrides {
    /// Whether no field is overridden
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Take every field `other` sets, keeping ours where it is silent
    pub fn merge_from(&mut self, other: &ModelOverrides) {
        self.weight_precision = other.weight_precision.or(self.weight_precision);
        self.kv_precision = other.kv_precision.or(self.kv_precision);
        self.kv_budget_gb = other.kv_budget_gb.or(self.kv_budget_gb);
        self.avg_tokens_per_request = other.avg_tokens_per_request.or(self.avg_tokens_per_request);
        self.target_tokens_per_sec = other.target_tokens_per_sec.or(self.target_tokens_per_sec);
        self.enabled = other.enabled.or(self.enabled);
    }

    /// Assign every set field onto the model
    pub fn apply(&self, model: &mut ModelConfig) {
        if let Some(precision) = self.weight_precision {
            model.weight_bytes_per_param = precision.bytes();
        }
        if let Some(precision) = self.kv_precision {
            model.kv_bytes_per_element = precision.bytes();
        }
        if let Some(gb) = self.kv_budget_gb {
            model.kv_budget_gb = gb;
        }
        if let Some(tokens) = self.avg_tokens_per_request {
            model.avg_tokens_per_request = tokens;
        }
        if let Some(tps) = self.target_tokens_per_sec {
            model.target_tokens_per_sec = tps;
        }
        if let Some(enabled) = self.enabled {
            model.enabled = enabled;
        }
    }
}

/// One catalog model chosen by a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSelection {
    pub id: String,

    #[serde(flatten)]
    pub overrides: ModelOverrides,
}

impl ModelSelection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            overrides: ModelOverrides::default(),
        }
    }
}

/// Plan file contents
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanFile {
    /// Catalog hardware id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardware: Option<String>,

    /// Inline hardware; takes precedence over `hardware`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_hardware: Option<HardwareProfile>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overhead_ratio: Option<f64>,

    #[serde(default)]
    pub models: Vec<ModelSelection>,
}

/// Hardware, models and overhead policy ready for the metrics engine
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlan {
    pub hardware: HardwareProfile,
    pub models: Vec<ModelConfig>,
    pub policy: OverheadPolicy,
}

impl PlanFile {
    /// Load a plan from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let plan: PlanFile = toml::from_str(&content)
            .map_err(|e| PlannerError::Config(format!("Invalid plan {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), models = plan.models.len(), "loaded plan");
        Ok(plan)
    }

    /// Look up hardware and models, apply overrides and validate.
    ///
    /// Falls back to the settings for the hardware id, the model list and
    /// the overhead ratio.
    pub fn resolve(
        &self,
        settings: &Settings,
        hardware_catalog: &HardwareCatalog,
        model_catalog: &ModelCatalog,
    ) -> Result<ResolvedPlan> {
        let hardware = match (&self.custom_hardware, &self.hardware) {
            (Some(custom), _) => custom.clone(),
            (None, Some(id)) => hardware_catalog.get(id)?,
            (None, None) => hardware_catalog.get(&settings.default_hardware)?,
        };
        hardware.validate().map_err(PlannerError::InvalidInput)?;

        let selections: Vec<ModelSelection> = if self.models.is_empty() {
            settings
                .default_models
                .iter()
                .map(ModelSelection::new)
                .collect()
        } else {
            self.models.clone()
        };

        if selections.is_empty() {
            return Err(PlannerError::InvalidInput(
                "no models selected; pass --model or list models in the plan".to_string(),
            ));
        }

        let mut models = Vec::with_capacity(selections.len());
        for selection in &selections {
            let mut model = model_catalog.get(&selection.id)?;
            selection.overrides.apply(&mut model);
            model.validate().map_err(PlannerError::InvalidInput)?;
            models.push(model);
        }

        let ratio = self.overhead_ratio.unwrap_or(settings.overhead_ratio);
        validate_ratio(ratio)?;

        tracing::debug!(
            hardware = %hardware.id,
            models = models.len(),
            overhead_ratio = ratio,
            "resolved plan"
        );

        Ok(ResolvedPlan {
            hardware,
            models,
            policy: OverheadPolicy::new(ratio),
        })
    }
}
