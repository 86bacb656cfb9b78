// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Snapshot of every derived figure for one hardware/model set

use serde::Serialize;

use crate::hardware::HardwareProfile;
use crate::models::ModelConfig;

use super::breakdown::{bandwidth_breakdown, memory_breakdown, Breakdown};
use super::capacity::{
    aggregate_bandwidth_utilization_percent, capacity_check, total_bandwidth_demand_gbs,
    CapacityReport, OverheadPolicy,
};
use super::engine::{
    bandwidth_demand_gbs, bandwidth_utilization_percent, kv_bytes_per_token, kv_cache_profile,
    weights_footprint_gb,
};

/// Derived figures for one model.
///
/// `None` marks figures that do not apply: no KV cache, no context length
/// to size requests by, or unknown hardware bandwidth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub id: String,
    pub name: String,
    pub enabled: bool,
    pub weights_gb: f64,
    pub kv_budget_gb: f64,
    pub kv_bytes_per_token: Option<f64>,
    pub max_concurrent_requests: Option<f64>,
    pub bandwidth_demand_gbs: f64,
    pub bandwidth_utilization_percent: Option<f64>,
}

impl ModelMetrics {
    pub fn compute(model: &ModelConfig, hardware: &HardwareProfile) -> Self {
        let kv = kv_cache_profile(model);
        let per_token = kv_bytes_per_token(model);
        Self {
            id: model.id.clone(),
            name: model.display_name().to_string(),
            enabled: model.enabled,
            weights_gb: weights_footprint_gb(model),
            kv_budget_gb: model.kv_budget_gb,
            kv_bytes_per_token: (per_token > 0.0).then_some(per_token),
            max_concurrent_requests: kv.map(|p| p.max_concurrent_requests),
            bandwidth_demand_gbs: bandwidth_demand_gbs(model),
            bandwidth_utilization_percent: hardware
                .has_known_bandwidth()
                .then(|| bandwidth_utilization_percent(model, hardware)),
        }
    }
}

/// Everything a renderer needs for one plan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlanReport {
    pub hardware: HardwareProfile,
    pub overhead_ratio: f64,
    pub models: Vec<ModelMetrics>,
    pub capacity: CapacityReport,
    pub total_bandwidth_demand_gbs: f64,
    /// `None` when the hardware bandwidth is unknown
    pub bandwidth_utilization_percent: Option<f64>,
    pub memory: Breakdown,
    pub bandwidth: Breakdown,
}

impl PlanReport {
    pub fn build(
        models: &[ModelConfig],
        hardware: &HardwareProfile,
        policy: &OverheadPolicy,
    ) -> Self {
        let capacity = capacity_check(models, hardware, policy);

        tracing::debug!(
            hardware = %hardware.id,
            models = models.len(),
            enabled = capacity.enabled_models,
            required_gb = capacity.required_gb,
            fits = capacity.fits,
            "built plan report"
        );

        Self {
            hardware: hardware.clone(),
            overhead_ratio: policy.ratio,
            models: models
                .iter()
                .map(|m| ModelMetrics::compute(m, hardware))
                .collect(),
            total_bandwidth_demand_gbs: total_bandwidth_demand_gbs(models),
            bandwidth_utilization_percent: hardware
                .has_known_bandwidth()
                .then(|| aggregate_bandwidth_utilization_percent(models, hardware)),
            memory: memory_breakdown(models, hardware, policy),
            bandwidth: bandwidth_breakdown(models, hardware),
            capacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Precision;

    fn models() -> Vec<ModelConfig> {
        vec![
            ModelConfig::new("qwen3-8b", 8e9, 36, 8, 128)
                .with_weight_precision(Precision::Bf16)
                .with_kv_budget(8.0)
                .with_avg_tokens(6000.0)
                .with_target_tps(40.0),
            ModelConfig::new("reranker", 0.5e9, 24, 0, 64)
                .with_kv_budget(0.0)
                .with_target_tps(0.0),
        ]
    }

    #[test]
    fn test_model_metrics() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let metrics = ModelMetrics::compute(&models()[0], &hw);

        assert_eq!(metrics.weights_gb, 16.0);
        assert_eq!(metrics.kv_bytes_per_token, Some(147456.0));
        assert!((metrics.max_concurrent_requests.unwrap() - 9.04).abs() < 0.01);
        assert!((metrics.bandwidth_utilization_percent.unwrap() - 35.56).abs() < 0.01);
    }

    #[test]
    fn test_model_metrics_not_applicable() {
        let hw = HardwareProfile::new("unknown", 96.0, 0.0);
        let metrics = ModelMetrics::compute(&models()[1], &hw);

        assert!(metrics.kv_bytes_per_token.is_none());
        assert!(metrics.max_concurrent_requests.is_none());
        assert!(metrics.bandwidth_utilization_percent.is_none());
    }

    #[test]
    fn test_model_metrics_zero_context_keeps_kv_bytes() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let model = ModelConfig::new("m", 8e9, 36, 8, 128).with_avg_tokens(0.0);
        let metrics = ModelMetrics::compute(&model, &hw);

        assert_eq!(metrics.kv_bytes_per_token, Some(147456.0));
        assert!(metrics.max_concurrent_requests.is_none());
    }

    #[test]
    fn test_plan_report() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let report = PlanReport::build(&models(), &hw, &OverheadPolicy::default());

        assert_eq!(report.models.len(), 2);
        assert_eq!(report.capacity.enabled_models, 2);
        assert!(report.capacity.fits);
        assert_eq!(report.overhead_ratio, 0.2);
        assert!((report.total_bandwidth_demand_gbs - 640.0).abs() < 1e-9);
        assert!(report.bandwidth_utilization_percent.is_some());
        assert!((report.memory.total_share() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_report_serializes() {
        let hw = HardwareProfile::new("gpu", 96.0, 0.0);
        let report = PlanReport::build(&models(), &hw, &OverheadPolicy::default());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["capacity"]["fits"], true);
        assert!(json["bandwidth_utilization_percent"].is_null());
        assert_eq!(json["memory"]["segments"][0]["kind"], "weights");
    }
}
