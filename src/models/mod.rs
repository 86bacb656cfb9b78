// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model catalog
//!
//! Provides the `ModelConfig` record the metrics engine reads, the
//! precision selector used to set its byte widths, and a catalog of known
//! architectures.
//!
//! ## Configuration
//!
//! Models are loaded from:
//! 1. Built-in defaults (always available)
//! 2. `~/.vramplan/models.toml` for user customization
//!
//! ## Example Configuration
//!
//! ```toml
//! [[models]]
//! id = "my-finetune-14b"
//! base_params = 14.8e9
//! layers = 48
//! kv_heads = 8
//! head_dim = 128
//! weight_bytes_per_param = 1.0
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use vramplan::models::{ModelCatalog, Precision};
//!
//! let catalog = ModelCatalog::new();
//! let model = catalog
//!     .get("qwen3-8b")?
//!     .with_kv_precision(Precision::Fp8)
//!     .with_kv_budget(12.0);
//! ```

pub mod loader;
pub mod quantization;
pub mod schema;

// Re-export commonly used types
pub use loader::ModelCatalog;
pub use quantization::DegradationTable;
pub use schema::{ModelConfig, ModelsConfig, Precision};
