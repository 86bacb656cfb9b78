// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Metrics engine
//!
//! Stateless derivations of memory footprint, bandwidth demand and
//! concurrency capacity from a [`ModelConfig`](crate::models::ModelConfig)
//! and a [`HardwareProfile`](crate::hardware::HardwareProfile).
//!
//! - `engine`: the per-model formulas
//! - `capacity`: aggregate capacity check over the enabled models
//! - `breakdown`: proportional segments for memory and bandwidth charts
//! - `report`: one serializable snapshot of all of the above
//!
//! Nothing here holds state or fails. Degenerate inputs produce `0.0` in the
//! scalar functions and `None` in the optional variants; callers validate
//! inputs before calling.

pub mod breakdown;
pub mod capacity;
pub mod engine;
pub mod report;

pub use breakdown::{bandwidth_breakdown, memory_breakdown, Breakdown, Segment, SegmentKind};
pub use capacity::{
    aggregate_bandwidth_utilization_percent, capacity_check, total_bandwidth_demand_gbs,
    CapacityReport, OverheadPolicy, DEFAULT_OVERHEAD_RATIO,
};
pub use engine::{
    bandwidth_demand_gbs, bandwidth_utilization_percent, kv_bytes_per_token, kv_cache_profile,
    max_concurrent_requests, weights_footprint_gb, KvCacheProfile, BYTES_PER_GB,
};
pub use report::{ModelMetrics, PlanReport};
