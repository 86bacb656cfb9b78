// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model configuration schema
//!
//! Defines the architecture dimensions, precision selections and traffic
//! targets the metrics engine reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Storage precision for weights or cached key/value elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Fp32,
    Bf16,
    Fp16,
    Fp8,
    Int8,
    Fp4,
    Int4,
}

impl Precision {
    /// Every precision, widest first
    pub const ALL: [Precision; 7] = [
        Precision::Fp32,
        Precision::Bf16,
        Precision::Fp16,
        Precision::Fp8,
        Precision::Int8,
        Precision::Fp4,
        Precision::Int4,
    ];

    /// Bytes used to store one element at this precision
    pub fn bytes(&self) -> f64 {
        match self {
            Precision::Fp32 => 4.0,
            Precision::Bf16 | Precision::Fp16 => 2.0,
            Precision::Fp8 | Precision::Int8 => 1.0,
            Precision::Fp4 | Precision::Int4 => 0.5,
        }
    }

    /// Get display name for the precision
    pub fn display_name(&self) -> &'static str {
        match self {
            Precision::Fp32 => "FP32",
            Precision::Bf16 => "BF16",
            Precision::Fp16 => "FP16",
            Precision::Fp8 => "FP8",
            Precision::Int8 => "INT8",
            Precision::Fp4 => "FP4",
            Precision::Int4 => "INT4",
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Precision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fp32" | "f32" => Ok(Precision::Fp32),
            "bf16" => Ok(Precision::Bf16),
            "fp16" | "f16" => Ok(Precision::Fp16),
            "fp8" => Ok(Precision::Fp8),
            "int8" | "q8" => Ok(Precision::Int8),
            "fp4" | "nvfp4" | "mxfp4" => Ok(Precision::Fp4),
            "int4" | "q4" => Ok(Precision::Int4),
            _ => Err(format!("Unknown precision: {}", s)),
        }
    }
}

/// One deployable model: architecture, precision choices and traffic targets.
///
/// Derived metrics are never stored here. Callers assign fields directly and
/// ask the engine again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "qwen3-8b")
    pub id: String,

    /// Human-readable display name
    #[serde(default)]
    pub name: String,

    /// Total parameter count, inactive experts included
    pub base_params: f64,

    /// Parameters active per token for mixture-of-experts models
    #[serde(default)]
    pub active_params: Option<f64>,

    pub layers: u32,

    /// Key/value heads; zero means the architecture keeps no KV cache
    pub kv_heads: u32,

    pub head_dim: u32,

    #[serde(default = "default_bytes")]
    pub weight_bytes_per_param: f64,

    #[serde(default = "default_bytes")]
    pub kv_bytes_per_element: f64,

    /// Memory reserved for the KV cache, in GB
    #[serde(default = "default_kv_budget_gb")]
    pub kv_budget_gb: f64,

    /// Expected context length of one request, in tokens
    #[serde(default = "default_avg_tokens")]
    pub avg_tokens_per_request: f64,

    /// Desired decode throughput, in tokens per second
    #[serde(default = "default_target_tps")]
    pub target_tokens_per_sec: f64,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Short description of the model
    #[serde(default)]
    pub description: String,
}

fn default_bytes() -> f64 {
    2.0
}

fn default_kv_budget_gb() -> f64 {
    8.0
}

fn default_avg_tokens() -> f64 {
    4096.0
}

fn default_target_tps() -> f64 {
    30.0
}

fn default_true() -> bool {
    true
}

impl ModelConfig {
    /// Create a new model with the given architecture and default selections
    pub fn new(
        id: impl Into<String>,
        base_params: f64,
        layers: u32,
        kv_heads: u32,
        head_dim: u32,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            base_params,
            active_params: None,
            layers,
            kv_heads,
            head_dim,
            weight_bytes_per_param: default_bytes(),
            kv_bytes_per_element: default_bytes(),
            kv_budget_gb: default_kv_budget_gb(),
            avg_tokens_per_request: default_avg_tokens(),
            target_tokens_per_sec: default_target_tps(),
            enabled: true,
            description: String::new(),
        }
    }

    /// Builder: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set active parameters (mixture-of-experts)
    pub fn with_active_params(mut self, params: f64) -> Self {
        self.active_params = Some(params);
        self
    }

    /// Builder: set weight precision
    pub fn with_weight_precision(mut self, precision: Precision) -> Self {
        self.weight_bytes_per_param = precision.bytes();
        self
    }

    /// Builder: set KV-cache precision
    pub fn with_kv_precision(mut self, precision: Precision) -> Self {
        self.kv_bytes_per_element = precision.bytes();
        self
    }

    /// Builder: set KV-cache budget in GB
    pub fn with_kv_budget(mut self, gb: f64) -> Self {
        self.kv_budget_gb = gb;
        self
    }

    /// Builder: set average tokens per request
    pub fn with_avg_tokens(mut self, tokens: f64) -> Self {
        self.avg_tokens_per_request = tokens;
        self
    }

    /// Builder: set target decode throughput
    pub fn with_target_tps(mut self, tps: f64) -> Self {
        self.target_tokens_per_sec = tps;
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: exclude from aggregate utilization
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Get display name (falls back to id)
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Whether this is a mixture-of-experts model
    pub fn is_moe(&self) -> bool {
        self.active_params
            .map(|active| active < self.base_params)
            .unwrap_or(false)
    }

    /// Check that every numeric field is finite and non-negative.
    ///
    /// The engine does not validate; callers run this before handing a
    /// model over.
    pub fn validate(&self) -> Result<(), String> {
        let fields = [
            ("base_params", self.base_params),
            ("weight_bytes_per_param", self.weight_bytes_per_param),
            ("kv_bytes_per_element", self.kv_bytes_per_element),
            ("kv_budget_gb", self.kv_budget_gb),
            ("avg_tokens_per_request", self.avg_tokens_per_request),
            ("target_tokens_per_sec", self.target_tokens_per_sec),
        ];

        for (field, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{}: {} must be a non-negative number, got {}",
                    self.id, field, value
                ));
            }
        }

        if let Some(active) = self.active_params {
            if !active.is_finite() || active < 0.0 {
                return Err(format!(
                    "{}: active_params must be a non-negative number, got {}",
                    self.id, active
                ));
            }
        }

        Ok(())
    }
}

/// Root structure of a user `models.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelsConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}
