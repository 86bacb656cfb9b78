// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Quantization quality degradation table
//!
//! Approximate quality loss per weight precision. These are policy constants
//! for display; nothing in the metrics engine reads them.

use std::collections::HashMap;

use super::schema::Precision;

/// Approximate quality loss (percent) relative to full precision
#[derive(Debug, Clone, PartialEq)]
pub struct DegradationTable {
    losses: HashMap<Precision, f64>,
}

impl DegradationTable {
    /// Built-in loss for a precision
    pub fn default_loss(precision: Precision) -> f64 {
        match precision {
            Precision::Fp32 | Precision::Bf16 | Precision::Fp16 => 0.0,
            Precision::Fp8 => 1.0,
            Precision::Int8 => 1.5,
            Precision::Fp4 => 3.0,
            Precision::Int4 => 4.0,
        }
    }

    /// Built-in table with user overrides applied on top
    pub fn with_overrides(overrides: &HashMap<Precision, f64>) -> Self {
        let mut table = Self::default();
        for (precision, loss) in overrides {
            table.losses.insert(*precision, *loss);
        }
        table
    }

    /// Quality loss for a precision
    pub fn loss_percent(&self, precision: Precision) -> f64 {
        self.losses
            .get(&precision)
            .copied()
            .unwrap_or_else(|| Self::default_loss(precision))
    }

    /// Quality loss for a raw byte width. When two precisions share a width
    /// the integer format wins. Returns `None` for widths no precision uses.
    pub fn loss_for_bytes(&self, bytes_per_element: f64) -> Option<f64> {
        Precision::ALL
            .iter()
            .rev()
            .find(|p| p.bytes() == bytes_per_element)
            .map(|p| self.loss_percent(*p))
    }
}

impl Default for DegradationTable {
    fn default() -> Self {
        Self {
            losses: Precision::ALL
                .iter()
                .map(|p| (*p, Self::default_loss(*p)))
                .collect(),
        }
    }
}
