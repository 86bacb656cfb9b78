// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Proportional breakdowns for memory and bandwidth charts
//!
//! A breakdown is a flat list of segments with shares of a common scale.
//! Renderers draw them as stacked bars or pies; nothing here draws.

use serde::Serialize;

use crate::hardware::HardwareProfile;
use crate::models::ModelConfig;

use super::capacity::{capacity_check, total_bandwidth_demand_gbs, OverheadPolicy};
use super::engine::{bandwidth_demand_gbs, weights_footprint_gb};

/// Segments smaller than this fraction of the scale are rounding residue
const MIN_SHARE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Weights,
    KvCache,
    Overhead,
    Free,
    Demand,
    Headroom,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Weights => "weights",
            SegmentKind::KvCache => "kv cache",
            SegmentKind::Overhead => "overhead",
            SegmentKind::Free => "free",
            SegmentKind::Demand => "decode",
            SegmentKind::Headroom => "headroom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    /// Model the segment belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    pub label: String,
    /// GB for memory breakdowns, GB/s for bandwidth breakdowns
    pub value: f64,
    /// Fraction of `Breakdown::scale`
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdown {
    /// Denominator of every share: the larger of capacity and total load
    pub scale: f64,
    pub segments: Vec<Segment>,
}

impl Breakdown {
    fn from_parts(scale: f64, parts: Vec<(SegmentKind, Option<&ModelConfig>, f64)>) -> Self {
        let segments = parts
            .into_iter()
            .filter(|(_, _, value)| *value > 0.0 && *value > scale * MIN_SHARE)
            .map(|(kind, model, value)| Segment {
                kind,
                model_id: model.map(|m| m.id.clone()),
                label: match model {
                    Some(m) => format!("{} {}", m.display_name(), kind.label()),
                    None => kind.label().to_string(),
                },
                value,
                share: if scale > 0.0 { value / scale } else { 0.0 },
            })
            .collect();

        Self { scale, segments }
    }

    /// Sum of all shares
    pub fn total_share(&self) -> f64 {
        self.segments.iter().map(|s| s.share).sum()
    }

    /// Segments of one kind
    pub fn segments_of(&self, kind: SegmentKind) -> impl Iterator<Item = &Segment> {
        self.segments.iter().filter(move |s| s.kind == kind)
    }
}

/// VRAM breakdown: weights and KV budget per enabled model, the overhead,
/// and the free remainder when the deployment fits.
///
/// Shares are relative to the larger of VRAM and required memory, so an
/// over-committed deployment still sums to one.
pub fn memory_breakdown(
    models: &[ModelConfig],
    hardware: &HardwareProfile,
    policy: &OverheadPolicy,
) -> Breakdown {
    let report = capacity_check(models, hardware, policy);
    let scale = hardware.vram_gb.max(report.required_gb);

    let mut parts = Vec::new();
    for model in models.iter().filter(|m| m.enabled) {
        parts.push((SegmentKind::Weights, Some(model), weights_footprint_gb(model)));
        parts.push((SegmentKind::KvCache, Some(model), model.kv_budget_gb));
    }
    parts.push((SegmentKind::Overhead, None, report.overhead_gb));
    parts.push((SegmentKind::Free, None, report.remaining_gb));

    Breakdown::from_parts(scale, parts)
}

/// Bandwidth breakdown: decode demand per enabled model and the unused
/// headroom. Shares are relative to the larger of hardware bandwidth and
/// total demand; with unknown bandwidth they split the demand alone.
pub fn bandwidth_breakdown(models: &[ModelConfig], hardware: &HardwareProfile) -> Breakdown {
    let total_demand = total_bandwidth_demand_gbs(models);
    let scale = hardware.bandwidth_gbs.max(total_demand);

    let mut parts: Vec<_> = models
        .iter()
        .filter(|m| m.enabled)
        .map(|m| (SegmentKind::Demand, Some(m), bandwidth_demand_gbs(m)))
        .collect();
    parts.push((
        SegmentKind::Headroom,
        None,
        hardware.bandwidth_gbs - total_demand,
    ));

    Breakdown::from_parts(scale, parts)
}
