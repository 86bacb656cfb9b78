// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Accelerator memory profile

use serde::{Deserialize, Serialize};

/// Memory vendor family, for grouping in listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Nvidia,
    Amd,
    Apple,
    #[default]
    Other,
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Vendor::Nvidia => write!(f, "NVIDIA"),
            Vendor::Amd => write!(f, "AMD"),
            Vendor::Apple => write!(f, "Apple"),
            Vendor::Other => write!(f, "Other"),
        }
    }
}

/// Capacity and bandwidth of one deployment target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareProfile {
    /// Hardware identifier (e.g., "h100-sxm")
    pub id: String,

    /// Human-readable display name
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub vendor: Vendor,

    /// Total addressable memory, in GB
    pub vram_gb: f64,

    /// Sustained memory bandwidth, in GB/s. Zero means unknown.
    #[serde(default)]
    pub bandwidth_gbs: f64,
}

impl HardwareProfile {
    /// Create a new profile
    pub fn new(id: impl Into<String>, vram_gb: f64, bandwidth_gbs: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            vendor: Vendor::Other,
            vram_gb,
            bandwidth_gbs,
        }
    }

    /// Builder: set display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: set vendor
    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = vendor;
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

    /// Whether the bandwidth figure is known
    pub fn has_known_bandwidth(&self) -> bool {
        self.bandwidth_gbs > 0.0
    }

    /// Check that capacity and bandwidth are finite and non-negative
    pub fn validate(&self) -> Result<(), String> {
        for (field, value) in [
            ("vram_gb", self.vram_gb),
            ("bandwidth_gbs", self.bandwidth_gbs),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "{}: {} must be a non-negative number, got {}",
                    self.id, field, value
                ));
            }
        }
        Ok(())
    }
}
