// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use proptest::prelude::*;

use vramplan::hardware::HardwareProfile;
use vramplan::metrics::{
    bandwidth_breakdown, bandwidth_demand_gbs, bandwidth_utilization_percent, capacity_check,
    kv_bytes_per_token, kv_cache_profile, max_concurrent_requests, memory_breakdown,
    weights_footprint_gb, OverheadPolicy, PlanReport,
};
use vramplan::models::{ModelConfig, Precision};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * b.abs().max(1.0)
}

fn eight_b() -> ModelConfig {
    ModelConfig::new("dense-8b", 8e9, 36, 8, 128).with_weight_precision(Precision::Bf16)
}

// ==================== Worked figures ====================

#[test]
fn test_weights_footprint() {
    assert_eq!(weights_footprint_gb(&eight_b()), 16.0);
}

#[test]
fn test_kv_bytes_per_token() {
    let model = eight_b().with_kv_precision(Precision::Fp16);
    assert_eq!(kv_bytes_per_token(&model), 147456.0);
}

#[test]
fn test_max_concurrent_requests() {
    let model = eight_b()
        .with_kv_precision(Precision::Fp16)
        .with_kv_budget(8.0)
        .with_avg_tokens(6000.0);
    let requests = max_concurrent_requests(&model);
    assert!(approx(requests, 8e9 / (147456.0 * 6000.0)));
    assert!((requests - 9.04).abs() < 0.01);
}

#[test]
fn test_bandwidth_demand_and_utilization() {
    let model = eight_b().with_target_tps(40.0);
    let hw = HardwareProfile::new("gpu", 96.0, 1800.0);

    assert_eq!(bandwidth_demand_gbs(&model), 640.0);
    assert!((bandwidth_utilization_percent(&model, &hw) - 35.56).abs() < 0.01);
}

#[test]
fn test_aggregate_capacity() {
    let a = ModelConfig::new("a", 8e9, 36, 8, 128).with_kv_budget(8.0);
    let b = ModelConfig::new("b", 8e9, 32, 8, 128)
        .with_weight_precision(Precision::Fp8)
        .with_kv_budget(3.0);
    let hw = HardwareProfile::new("gpu", 96.0, 1800.0);

    let report = capacity_check(&[a, b], &hw, &OverheadPolicy::default());
    assert!(approx(report.total_used_gb, 35.0));
    assert!(approx(report.overhead_gb, 7.0));
    assert!(approx(report.required_gb, 42.0));
    assert!(approx(report.remaining_gb, 54.0));
    assert!(report.fits);
}

// ==================== Not-applicable figures ====================

#[test]
fn test_cacheless_model() {
    let embedder = ModelConfig::new("embedder", 0.6e9, 28, 0, 128).with_kv_budget(0.0);

    assert_eq!(kv_bytes_per_token(&embedder), 0.0);
    assert_eq!(max_concurrent_requests(&embedder), 0.0);
    assert!(kv_cache_profile(&embedder).is_none());
}

#[test]
fn test_zero_context_length() {
    let model = eight_b().with_avg_tokens(0.0);
    assert_eq!(max_concurrent_requests(&model), 0.0);
    assert!(kv_cache_profile(&model).is_none());
}

#[test]
fn test_unknown_bandwidth() {
    let hw = HardwareProfile::new("mystery", 64.0, 0.0);
    let model = eight_b();
    assert_eq!(bandwidth_utilization_percent(&model, &hw), 0.0);

    let report = PlanReport::build(&[model], &hw, &OverheadPolicy::default());
    assert!(report.models[0].bandwidth_utilization_percent.is_none());
    assert!(report.bandwidth_utilization_percent.is_none());
}

#[test]
fn test_disabled_models_excluded_from_aggregate() {
    let hw = HardwareProfile::new("gpu", 23.0, 1000.0);
    let big = ModelConfig::new("big", 70e9, 80, 8, 128).disabled();
    let small = eight_b().with_kv_budget(4.0);

    let report = capacity_check(&[big, small], &hw, &OverheadPolicy::default());
    assert_eq!(report.enabled_models, 1);
    assert!(approx(report.total_used_gb, 20.0));
    assert!(!report.fits);
    assert!(approx(report.shortfall_gb(), 1.0));
}

#[test]
fn test_exact_fit_counts_as_fitting() {
    // 10 + 0 used, 2 overhead, 12 required
    let model = ModelConfig::new("m", 5e9, 1, 0, 1).with_kv_budget(0.0);
    let hw = HardwareProfile::new("gpu", 12.0, 100.0);
    let report = capacity_check(&[model], &hw, &OverheadPolicy::default());
    assert!(report.fits);
}

#[test]
fn test_custom_overhead_ratio() {
    let model = eight_b().with_kv_budget(4.0);
    let hw = HardwareProfile::new("gpu", 24.0, 1000.0);

    let report = capacity_check(&[model], &hw, &OverheadPolicy::new(0.0));
    assert_eq!(report.overhead_gb, 0.0);
    assert!(report.fits);
    assert!(approx(report.remaining_gb, 4.0));
}

// ==================== Properties ====================

fn arb_model() -> impl Strategy<Value = ModelConfig> {
    (
        0.0f64..200e9,
        0u32..128,
        0u32..64,
        1u32..256,
        0.0f64..4.0,
        0.0f64..4.0,
        0.0f64..64.0,
        0.0f64..32768.0,
        0.0f64..200.0,
        any::<bool>(),
    )
        .prop_map(
            |(params, layers, kv_heads, head_dim, wbytes, kvbytes, budget, tokens, tps, on)| {
                let mut model = ModelConfig::new("m", params, layers, kv_heads, head_dim)
                    .with_kv_budget(budget)
                    .with_avg_tokens(tokens)
                    .with_target_tps(tps);
                model.weight_bytes_per_param = wbytes;
                model.kv_bytes_per_element = kvbytes;
                model.enabled = on;
                model
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_weights_non_negative(model in arb_model()) {
        let weights = weights_footprint_gb(&model);
        prop_assert!(weights >= 0.0);
        let zero_input = model.base_params == 0.0 || model.weight_bytes_per_param == 0.0;
        prop_assert_eq!(weights == 0.0, zero_input);
    }

    #[test]
    fn prop_kv_bytes_formula(model in arb_model()) {
        let kv = kv_bytes_per_token(&model);
        if model.kv_heads == 0 {
            prop_assert_eq!(kv, 0.0);
        } else {
            let expected = f64::from(model.layers)
                * f64::from(model.kv_heads)
                * f64::from(model.head_dim)
                * 2.0
                * model.kv_bytes_per_element;
            prop_assert!(approx(kv, expected));
        }
    }

    #[test]
    fn prop_concurrency_monotonic(model in arb_model(), extra_budget in 0.0f64..64.0, extra_tokens in 0.0f64..32768.0) {
        let base = max_concurrent_requests(&model);
        prop_assert!(base >= 0.0);

        let bigger_budget = model.clone().with_kv_budget(model.kv_budget_gb + extra_budget);
        prop_assert!(max_concurrent_requests(&bigger_budget) >= base);

        if model.avg_tokens_per_request > 0.0 {
            let longer = model.clone().with_avg_tokens(model.avg_tokens_per_request + extra_tokens);
            prop_assert!(max_concurrent_requests(&longer) <= base);
        }
    }

    #[test]
    fn prop_zero_bandwidth_means_zero_utilization(model in arb_model()) {
        let hw = HardwareProfile::new("gpu", 80.0, 0.0);
        prop_assert_eq!(bandwidth_utilization_percent(&model, &hw), 0.0);
    }

    #[test]
    fn prop_capacity_ignores_disabled(models in prop::collection::vec(arb_model(), 0..6), vram in 1.0f64..1024.0) {
        let hw = HardwareProfile::new("gpu", vram, 1000.0);
        let policy = OverheadPolicy::default();
        let enabled: Vec<ModelConfig> = models.iter().filter(|m| m.enabled).cloned().collect();

        let all = capacity_check(&models, &hw, &policy);
        let only_enabled = capacity_check(&enabled, &hw, &policy);
        prop_assert!(approx(all.required_gb, only_enabled.required_gb));
        prop_assert_eq!(all.fits, all.remaining_gb >= 0.0);
    }

    #[test]
    fn prop_breakdown_shares_sum_to_one(models in prop::collection::vec(arb_model(), 1..6), vram in 1.0f64..1024.0, bw in 1.0f64..8000.0) {
        let hw = HardwareProfile::new("gpu", vram, bw);

        let memory = memory_breakdown(&models, &hw, &OverheadPolicy::default());
        prop_assert!((memory.total_share() - 1.0).abs() < 1e-9);

        let bandwidth = bandwidth_breakdown(&models, &hw);
        prop_assert!((bandwidth.total_share() - 1.0).abs() < 1e-9);
    }
}
