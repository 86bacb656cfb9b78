// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Per-model derivations
//!
//! Every function here is a pure mapping from the current field values to a
//! number. Degenerate inputs (zero denominator, no KV cache, unknown
//! bandwidth) yield `0.0`; nothing here fails or validates.

use serde::Serialize;

use crate::hardware::HardwareProfile;
use crate::models::ModelConfig;

/// Bytes per GB as used throughout the planner (decimal units)
pub const BYTES_PER_GB: f64 = 1e9;

/// Memory needed to hold every weight resident, in GB.
///
/// Mixture-of-experts models count total parameters: all experts stay
/// resident regardless of routing.
pub fn weights_footprint_gb(model: &ModelConfig) -> f64 {
    model.base_params * model.weight_bytes_per_param / BYTES_PER_GB
}

/// KV-cache bytes consumed by one token across all layers.
///
/// Zero for architectures without a KV cache (`kv_heads == 0`). The factor
/// of two covers the key and the value tensor.
pub fn kv_bytes_per_token(model: &ModelConfig) -> f64 {
    if model.kv_heads == 0 {
        return 0.0;
    }
    f64::from(model.layers)
        * f64::from(model.kv_heads)
        * f64::from(model.head_dim)
        * 2.0
        * model.kv_bytes_per_element
}

/// Simultaneous requests the KV budget holds at the average context length.
///
/// Continuous estimate, not rounded. Zero when the model has no KV cache or
/// the average context length is zero.
pub fn max_concurrent_requests(model: &ModelConfig) -> f64 {
    let per_token = kv_bytes_per_token(model);
    if per_token == 0.0 || model.avg_tokens_per_request == 0.0 {
        return 0.0;
    }
    model.kv_budget_gb * BYTES_PER_GB / (per_token * model.avg_tokens_per_request)
}

/// Sustained bandwidth needed to decode at the target rate, in GB/s.
///
/// Each generated token reads the whole resident weight set once.
pub fn bandwidth_demand_gbs(model: &ModelConfig) -> f64 {
    weights_footprint_gb(model) * model.target_tokens_per_sec
}

/// Decode bandwidth demand as a percentage of the hardware's bandwidth.
///
/// Zero when the hardware bandwidth is unknown (`0`).
pub fn bandwidth_utilization_percent(model: &ModelConfig, hardware: &HardwareProfile) -> f64 {
    if hardware.bandwidth_gbs == 0.0 {
        return 0.0;
    }
    bandwidth_demand_gbs(model) / hardware.bandwidth_gbs * 100.0
}

/// KV-cache figures for a model that has one
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KvCacheProfile {
    pub bytes_per_token: f64,
    /// Tokens the configured budget can hold in total
    pub budget_tokens: f64,
    pub max_concurrent_requests: f64,
}

/// Optional form of the KV derivations.
///
/// `None` where the zero-sentinel functions would answer "not applicable":
/// no KV cache, or no context length to size requests by.
pub fn kv_cache_profile(model: &ModelConfig) -> Option<KvCacheProfile> {
    let bytes_per_token = kv_bytes_per_token(model);
    if bytes_per_token == 0.0 || model.avg_tokens_per_request == 0.0 {
        return None;
    }
    Some(KvCacheProfile {
        bytes_per_token,
        budget_tokens: model.kv_budget_gb * BYTES_PER_GB / bytes_per_token,
        max_concurrent_requests: max_concurrent_requests(model),
    })
}
