// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Aggregate capacity check across the enabled models

use serde::{Deserialize, Serialize};

use crate::hardware::HardwareProfile;
use crate::models::ModelConfig;

use super::engine::{bandwidth_demand_gbs, weights_footprint_gb};

/// Fraction of the used memory reserved on top for allocator fragmentation,
/// activations and runtime buffers.
pub const DEFAULT_OVERHEAD_RATIO: f64 = 0.2;

/// Runtime overhead policy applied to the summed weights and KV budgets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverheadPolicy {
    pub ratio: f64,
}

impl OverheadPolicy {
    pub fn new(ratio: f64) -> Self {
        Self { ratio }
    }

    /// Overhead for a given amount of used memory
    pub fn overhead_for(&self, used_gb: f64) -> f64 {
        used_gb * self.ratio
    }
}

impl Default for OverheadPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_OVERHEAD_RATIO)
    }
}

/// Outcome of the aggregate capacity check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacityReport {
    /// Number of enabled models counted
    pub enabled_models: usize,
    pub weights_gb: f64,
    pub kv_budget_gb: f64,
    /// Weights plus KV budgets
    pub total_used_gb: f64,
    pub overhead_gb: f64,
    /// Used plus overhead
    pub required_gb: f64,
    pub vram_gb: f64,
    /// `vram_gb - required_gb`; negative when the deployment does not fit
    pub remaining_gb: f64,
    pub fits: bool,
}

impl CapacityReport {
    /// Required memory as a percentage of VRAM, zero when VRAM is zero
    pub fn utilization_percent(&self) -> f64 {
        if self.vram_gb == 0.0 {
            return 0.0;
        }
        self.required_gb / self.vram_gb * 100.0
    }

    /// Memory missing for the deployment to fit, zero when it fits
    pub fn shortfall_gb(&self) -> f64 {
        (-self.remaining_gb).max(0.0)
    }
}

/// Sum weights and KV budgets of the enabled models, add the overhead and
/// compare against the hardware's memory.
pub fn capacity_check(
    models: &[ModelConfig],
    hardware: &HardwareProfile,
    policy: &OverheadPolicy,
) -> CapacityReport {
    let enabled: Vec<&ModelConfig> = models.iter().filter(|m| m.enabled).collect();

    let weights_gb: f64 = enabled.iter().map(|m| weights_footprint_gb(m)).sum();
    let kv_budget_gb: f64 = enabled.iter().map(|m| m.kv_budget_gb).sum();
    let total_used_gb = weights_gb + kv_budget_gb;
    let overhead_gb = policy.overhead_for(total_used_gb);
    let required_gb = total_used_gb + overhead_gb;
    let remaining_gb = hardware.vram_gb - required_gb;

    CapacityReport {
        enabled_models: enabled.len(),
        weights_gb,
        kv_budget_gb,
        total_used_gb,
        overhead_gb,
        required_gb,
        vram_gb: hardware.vram_gb,
        remaining_gb,
        fits: remaining_gb >= 0.0,
    }
}

/// Summed decode bandwidth demand of the enabled models, in GB/s
pub fn total_bandwidth_demand_gbs(models: &[ModelConfig]) -> f64 {
    models
        .iter()
        .filter(|m| m.enabled)
        .map(bandwidth_demand_gbs)
        .sum()
}

/// Summed demand of the enabled models as a percentage of the hardware's
/// bandwidth. Zero when the bandwidth is unknown.
pub fn aggregate_bandwidth_utilization_percent(
    models: &[ModelConfig],
    hardware: &HardwareProfile,
) -> f64 {
    if hardware.bandwidth_gbs == 0.0 {
        return 0.0;
    }
    total_bandwidth_demand_gbs(models) / hardware.bandwidth_gbs * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Precision;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    fn pair() -> Vec<ModelConfig> {
        vec![
            ModelConfig::new("a", 8e9, 36, 8, 128)
                .with_weight_precision(Precision::Bf16)
                .with_kv_budget(8.0),
            ModelConfig::new("b", 8e9, 32, 8, 128)
                .with_weight_precision(Precision::Fp8)
                .with_kv_budget(3.0),
        ]
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(OverheadPolicy::default().ratio, DEFAULT_OVERHEAD_RATIO);
        assert_close(OverheadPolicy::default().overhead_for(35.0), 7.0);
    }

    #[test]
    fn test_capacity_check_fits() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let report = capacity_check(&pair(), &hw, &OverheadPolicy::default());

        assert_eq!(report.enabled_models, 2);
        assert_close(report.weights_gb, 24.0);
        assert_close(report.kv_budget_gb, 11.0);
        assert_close(report.total_used_gb, 35.0);
        assert_close(report.overhead_gb, 7.0);
        assert_close(report.required_gb, 42.0);
        assert_close(report.remaining_gb, 54.0);
        assert!(report.fits);
        assert_eq!(report.shortfall_gb(), 0.0);
        assert_close(report.utilization_percent(), 42.0 / 96.0 * 100.0);
    }

    #[test]
    fn test_capacity_check_does_not_fit() {
        let hw = HardwareProfile::new("small", 24.0, 1008.0);
        let report = capacity_check(&pair(), &hw, &OverheadPolicy::default());

        assert!(!report.fits);
        assert_close(report.remaining_gb, -18.0);
        assert_close(report.shortfall_gb(), 18.0);
    }

    #[test]
    fn test_capacity_check_exact_fit() {
        let hw = HardwareProfile::new("exact", 42.0, 0.0);
        let report = capacity_check(&pair(), &hw, &OverheadPolicy::new(0.2));
        assert!(report.remaining_gb.abs() < 1e-9);
    }

    #[test]
    fn test_capacity_check_skips_disabled() {
        let mut models = pair();
        models[1].enabled = false;

        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let report = capacity_check(&models, &hw, &OverheadPolicy::default());

        assert_eq!(report.enabled_models, 1);
        assert_close(report.total_used_gb, 24.0);
    }

    #[test]
    fn test_capacity_check_custom_ratio() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let report = capacity_check(&pair(), &hw, &OverheadPolicy::new(0.0));
        assert_close(report.overhead_gb, 0.0);
        assert_close(report.required_gb, 35.0);
    }

    #[test]
    fn test_capacity_check_empty() {
        let hw = HardwareProfile::new("gpu", 96.0, 1800.0);
        let report = capacity_check(&[], &hw, &OverheadPolicy::default());
        assert_eq!(report.enabled_models, 0);
        assert_eq!(report.required_gb, 0.0);
        assert!(report.fits);
    }

    #[test]
    fn test_utilization_zero_vram() {
        let hw = HardwareProfile::new("none", 0.0, 0.0);
        let report = capacity_check(&pair(), &hw, &OverheadPolicy::default());
        assert_eq!(report.utilization_percent(), 0.0);
        assert!(!report.fits);
    }

    #[test]
    fn test_aggregate_bandwidth() {
        let models: Vec<ModelConfig> = pair()
            .into_iter()
            .map(|m| m.with_target_tps(10.0))
            .collect();
        let hw = HardwareProfile::new("gpu", 96.0, 1200.0);

        assert_close(total_bandwidth_demand_gbs(&models), 240.0);
        assert_close(aggregate_bandwidth_utilization_percent(&models, &hw), 20.0);
    }

    #[test]
    fn test_aggregate_bandwidth_unknown() {
        let hw = HardwareProfile::new("unknown", 96.0, 0.0);
        assert_eq!(aggregate_bandwidth_utilization_percent(&pair(), &hw), 0.0);
    }
}
