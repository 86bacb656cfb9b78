// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Hardware listing command

use std::fmt::Write as _;

use crate::cli::args::{HardwareArgs, OutputFormat};
use crate::error::Result;
use crate::hardware::{HardwareCatalog, HardwareProfile};

/// Profiles selected by the command's filters
pub fn select<'a>(catalog: &'a HardwareCatalog, args: &HardwareArgs) -> Vec<&'a HardwareProfile> {
    match args.min_vram {
        Some(min) => catalog.with_min_vram(min),
        None => catalog.all().iter().collect(),
    }
}

/// Execute the hardware command
pub fn execute(args: &HardwareArgs, format: &OutputFormat) -> Result<()> {
    let catalog = HardwareCatalog::new();
    let profiles = select(&catalog, args);

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    print!("{}", render_text(&profiles));
    if let Some(path) = catalog.config_path() {
        println!("User catalog: {}", path.display());
    } else {
        println!(
            "Add your own in {}",
            HardwareCatalog::default_config_path().display()
        );
    }
    println!();

    Ok(())
}

pub fn render_text(profiles: &[&HardwareProfile]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Hardware ===\n");
    let _ = writeln!(
        out,
        "{:<22} {:<32} {:<7} {:>8} {:>11}",
        "ID", "Name", "Vendor", "Memory", "Bandwidth"
    );
    for hw in profiles {
        let bandwidth = if hw.has_known_bandwidth() {
            format!("{:.0} GB/s", hw.bandwidth_gbs)
        } else {
            "unknown".to_string()
        };
        let _ = writeln!(
            out,
            "{:<22} {:<32} {:<7} {:>8} {:>11}",
            hw.id,
            hw.display_name(),
            hw.vendor.to_string(),
            format!("{:.0} GB", hw.vram_gb),
            bandwidth
        );
    }
    if profiles.is_empty() {
        let _ = writeln!(out, "  (no hardware matches)");
    }
    out.push('\n');
    out
}
