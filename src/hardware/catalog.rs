// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware catalog
//!
//! Built-in accelerator specs plus `~/.vramplan/hardware.toml` additions.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::planner_home;
use crate::error::{PlannerError, Result};

use super::profile::{HardwareProfile, Vendor};

/// Root structure of a user `hardware.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HardwareConfig {
    #[serde(default)]
    pub hardware: Vec<HardwareProfile>,
}

/// Catalog of known deployment targets
#[derive(Debug, Clone)]
pub struct HardwareCatalog {
    profiles: Vec<HardwareProfile>,
    config_path: Option<PathBuf>,
}

impl HardwareCatalog {
    /// Create a new catalog with built-in defaults plus the user file
    pub fn new() -> Self {
        let mut catalog = Self::with_defaults_only();

        let config_path = Self::default_config_path();
        if config_path.exists() {
            if let Err(e) = catalog.load_from_file(&config_path) {
                tracing::warn!("Failed to load hardware.toml: {}", e);
            }
        }

        catalog
    }

    /// Create catalog with only built-in defaults (no user file)
    pub fn with_defaults_only() -> Self {
        let mut catalog = Self {
            profiles: Vec::new(),
            config_path: None,
        };
        catalog.load_defaults();
        catalog
    }

    /// Get the default user catalog path
    pub fn default_config_path() -> PathBuf {
        planner_home().join("hardware.toml")
    }

    /// Path of the user catalog, if one was merged
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    fn load_defaults(&mut self) {
        let nvidia = |id: &str, name: &str, vram: f64, bw: f64| {
            HardwareProfile::new(id, vram, bw)
                .with_name(name)
                .with_vendor(Vendor::Nvidia)
        };

        self.profiles = vec![
            // Datacenter
            nvidia("b200", "NVIDIA B200", 180.0, 7700.0),
            nvidia("h200", "NVIDIA H200", 141.0, 4800.0),
            nvidia("h100-sxm", "NVIDIA H100 SXM", 80.0, 3350.0),
            nvidia("h100-pcie", "NVIDIA H100 PCIe", 80.0, 2000.0),
            nvidia("a100-80gb", "NVIDIA A100 80GB", 80.0, 2039.0),
            nvidia("l40s", "NVIDIA L40S", 48.0, 864.0),
            // Workstation / desktop
            nvidia("rtx-pro-6000", "NVIDIA RTX PRO 6000 Blackwell", 96.0, 1792.0),
            nvidia("rtx-5090", "NVIDIA GeForce RTX 5090", 32.0, 1792.0),
            nvidia("rtx-4090", "NVIDIA GeForce RTX 4090", 24.0, 1008.0),
            nvidia("dgx-spark", "NVIDIA DGX Spark", 128.0, 273.0),
            HardwareProfile::new("mi300x", 192.0, 5300.0)
                .with_name("AMD Instinct MI300X")
                .with_vendor(Vendor::Amd),
            HardwareProfile::new("mac-studio-m3-ultra", 512.0, 819.0)
                .with_name("Mac Studio M3 Ultra 512GB")
                .with_vendor(Vendor::Apple),
        ];
    }

    /// Load profiles from a TOML catalog file
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let config: HardwareConfig = toml::from_str(&content)
            .map_err(|e| PlannerError::Config(format!("Invalid hardware.toml: {}", e)))?;

        for profile in &config.hardware {
            profile.validate().map_err(PlannerError::Config)?;
        }

        tracing::debug!(
            path = %path.display(),
            count = config.hardware.len(),
            "merging user hardware catalog"
        );

        self.config_path = Some(path.to_path_buf());
        for profile in config.hardware {
            if let Some(existing) = self.profiles.iter_mut().find(|p| p.id == profile.id) {
                *existing = profile;
            } else {
                self.profiles.push(profile);
            }
        }

        Ok(())
    }

    /// All profiles in catalog order
    pub fn all(&self) -> &[HardwareProfile] {
        &self.profiles
    }

    /// Find a profile by ID
    pub fn find(&self, id: &str) -> Option<&HardwareProfile> {
        self.profiles.iter().find(|p| p.id == id)
    }

    /// Find a profile by ID, cloned
    pub fn get(&self, id: &str) -> Result<HardwareProfile> {
        self.find(id)
            .cloned()
            .ok_or_else(|| PlannerError::UnknownHardware(id.to_string()))
    }

    /// Profiles with at least `min_vram_gb` of memory
    pub fn with_min_vram(&self, min_vram_gb: f64) -> Vec<&HardwareProfile> {
        self.profiles
            .iter()
            .filter(|p| p.vram_gb >= min_vram_gb)
            .collect()
    }

    /// Generate a sample hardware.toml content
    pub fn generate_sample_config() -> String {
        r#"# vramplan hardware catalog
# Entries replace built-ins with the same id. bandwidth_gbs = 0 means unknown.

[[hardware]]
id = "lab-node"
name = "Lab node (2x L40S)"
vendor = "nvidia"
vram_gb = 96.0
bandwidth_gbs = 1728.0
"#
        .to_string()
    }
}

impl Default for HardwareCatalog {
    fn default() -> Self {
        Self::new()
    }
}
