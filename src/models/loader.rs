// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog loader
//!
//! Loads model definitions from:
//! 1. Built-in defaults (always available)
//! 2. User catalog file (`~/.vramplan/models.toml`) for overrides/additions

use std::path::{Path, PathBuf};

use crate::config::planner_home;
use crate::error::{PlannerError, Result};

use super::schema::{ModelConfig, ModelsConfig, Precision};

/// Catalog of known model architectures
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    /// Models in catalog order
    models: Vec<ModelConfig>,
    /// Path to user catalog file (if loaded)
    config_path: Option<PathBuf>,
}

impl ModelCatalog {
    /// Create a new catalog with built-in defaults plus the user file
    pub fn new() -> Self {
        let mut catalog = Self::with_defaults_only();

        let config_path = Self::default_config_path();
        if config_path.exists() {
            if let Err(e) = catalog.load_from_file(&config_path) {
                tracing::warn!("Failed to load models.toml: {}", e);
            }
        }

        catalog
    }

    /// Create catalog with only built-in defaults (no user file)
    pub fn with_defaults_only() -> Self {
        let mut catalog = Self {
            models: Vec::new(),
            config_path: None,
        };
        catalog.load_defaults();
        catalog
    }

    /// Get the default user catalog path
    pub fn default_config_path() -> PathBuf {
        planner_home().join("models.toml")
    }

    /// Path of the user catalog, if one was merged
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Load built-in default models
    fn load_defaults(&mut self) {
        self.models = vec![
            // Dense decoders
            ModelConfig::new("llama-3.1-8b", 8.03e9, 32, 8, 128)
                .with_name("Llama 3.1 8B")
                .with_weight_precision(Precision::Bf16)
                .with_description("Meta's general-purpose 8B"),
            ModelConfig::new("qwen3-8b", 8.19e9, 36, 8, 128)
                .with_name("Qwen3 8B")
                .with_weight_precision(Precision::Bf16)
                .with_description("Dense 8B with hybrid thinking"),
            ModelConfig::new("qwen3-32b", 32.8e9, 64, 8, 128)
                .with_name("Qwen3 32B")
                .with_weight_precision(Precision::Fp8)
                .with_kv_budget(16.0)
                .with_description("Dense 32B, strongest Qwen3 dense"),
            ModelConfig::new("gemma-3-27b", 27.4e9, 62, 16, 128)
                .with_name("Gemma 3 27B")
                .with_weight_precision(Precision::Fp8)
                .with_kv_budget(16.0)
                .with_description("Google's multimodal 27B"),
            ModelConfig::new("llama-3.3-70b", 70.6e9, 80, 8, 128)
                .with_name("Llama 3.3 70B")
                .with_weight_precision(Precision::Fp8)
                .with_kv_budget(20.0)
                .with_target_tps(20.0)
                .with_description("Large dense model"),
            // Mixture-of-experts
            ModelConfig::new("qwen3-30b-a3b", 30.5e9, 48, 4, 128)
                .with_name("Qwen3 30B A3B")
                .with_active_params(3.3e9)
                .with_weight_precision(Precision::Fp8)
                .with_description("MoE, 3B active per token"),
            ModelConfig::new("gpt-oss-20b", 20.9e9, 24, 8, 64)
                .with_name("gpt-oss 20B")
                .with_active_params(3.6e9)
                .with_weight_precision(Precision::Fp4)
                .with_description("OpenAI open-weight MoE, MXFP4 experts"),
            ModelConfig::new("gpt-oss-120b", 116.8e9, 36, 8, 64)
                .with_name("gpt-oss 120B")
                .with_active_params(5.1e9)
                .with_weight_precision(Precision::Fp4)
                .with_kv_budget(16.0)
                .with_description("OpenAI open-weight MoE, single-GPU flagship"),
            // No KV cache
            ModelConfig::new("qwen3-embedding-0.6b", 0.6e9, 28, 0, 128)
                .with_name("Qwen3 Embedding 0.6B")
                .with_weight_precision(Precision::Bf16)
                .with_kv_budget(0.0)
                .with_target_tps(0.0)
                .with_description("Embedding model, no decode cache"),
            ModelConfig::new("bge-reranker-v2-m3", 0.568e9, 24, 0, 64)
                .with_name("BGE Reranker v2 M3")
                .with_weight_precision(Precision::Fp16)
                .with_kv_budget(0.0)
                .with_target_tps(0.0)
                .with_description("Cross-encoder reranker"),
        ];
    }

    /// Load models from a TOML catalog file
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let config: ModelsConfig = toml::from_str(&content)
            .map_err(|e| PlannerError::Config(format!("Invalid models.toml: {}", e)))?;

        for model in &config.models {
            model.validate().map_err(PlannerError::Config)?;
        }

        tracing::debug!(
            path = %path.display(),
            count = config.models.len(),
            "merging user model catalog"
        );

        self.config_path = Some(path.to_path_buf());
        self.merge_models(config.models);

        Ok(())
    }

    /// Merge models, with new models taking precedence
    fn merge_models(&mut self, user_models: Vec<ModelConfig>) {
        for user_model in user_models {
            if let Some(existing) = self.models.iter_mut().find(|m| m.id == user_model.id) {
                *existing = user_model;
            } else {
                self.models.push(user_model);
            }
        }
    }

    /// All models in catalog order
    pub fn all(&self) -> &[ModelConfig] {
        &self.models
    }

    /// Find a model by ID
    pub fn find(&self, id: &str) -> Option<&ModelConfig> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Find a model by ID, cloned for the caller to adjust
    pub fn get(&self, id: &str) -> Result<ModelConfig> {
        self.find(id)
            .cloned()
            .ok_or_else(|| PlannerError::UnknownModel(id.to_string()))
    }

    /// Models whose weights alone fit within `vram_gb`
    pub fn fitting_weights(&self, vram_gb: f64) -> Vec<&ModelConfig> {
        self.models
            .iter()
            .filter(|m| crate::metrics::weights_footprint_gb(m) <= vram_gb)
            .collect()
    }

    /// Generate a sample models.toml content
    pub fn generate_sample_config() -> String {
        r#"# vramplan model catalog
# Add or override models here. Entries replace built-ins with the same id.

[[models]]
id = "my-finetune-14b"
name = "My Finetune 14B"
base_params = 14.8e9
layers = 48
kv_heads = 8
head_dim = 128
weight_bytes_per_param = 1.0
kv_bytes_per_element = 2.0
kv_budget_gb = 12.0
avg_tokens_per_request = 8192
target_tokens_per_sec = 35
"#
        .to_string()
    }
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self::new()
    }
}
