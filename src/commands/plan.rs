// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Plan command: capacity report for one hardware target and a model set

use std::fmt::Write as _;
use std::io;

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use crate::cli::args::{OutputFormat, PlanArgs};
use crate::config::{ModelSelection, PlanFile, ResolvedPlan, Settings};
use crate::error::{PlannerError, Result};
use crate::hardware::HardwareCatalog;
use crate::metrics::{Breakdown, PlanReport};
use crate::models::ModelCatalog;

/// Merge the plan file, the command line and the settings into a resolved
/// plan. Command-line values win over the plan file, which wins over the
/// settings.
pub fn build_plan(
    args: &PlanArgs,
    settings: &Settings,
    hardware_catalog: &HardwareCatalog,
    model_catalog: &ModelCatalog,
) -> Result<ResolvedPlan> {
    let mut plan = match &args.plan {
        Some(path) => PlanFile::load_from(path)?,
        None => PlanFile::default(),
    };

    if let Some(id) = &args.hardware {
        plan.hardware = Some(id.clone());
        plan.custom_hardware = None;
    }
    if let Some(ratio) = args.overhead {
        plan.overhead_ratio = Some(ratio);
    }

    if plan.models.is_empty() && args.models.is_empty() {
        plan.models = settings
            .default_models
            .iter()
            .map(ModelSelection::new)
            .collect();
    }
    plan.models
        .extend(args.models.iter().map(ModelSelection::new));

    let overrides = args.overrides();
    for selection in &mut plan.models {
        selection.overrides.merge_from(&overrides);
    }

    for id in &args.disable {
        let mut matched = false;
        for selection in plan.models.iter_mut().filter(|s| &s.id == id) {
            selection.overrides.enabled = Some(false);
            matched = true;
        }
        if !matched {
            tracing::warn!("--disable {}: model is not part of the plan", id);
        }
    }

    plan.resolve(settings, hardware_catalog, model_catalog)
}

/// Execute the plan command
pub fn execute(args: &PlanArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let resolved = build_plan(
        args,
        settings,
        &HardwareCatalog::new(),
        &ModelCatalog::new(),
    )?;
    let report = PlanReport::build(&resolved.models, &resolved.hardware, &resolved.policy);

    if matches!(format, OutputFormat::Json) {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
        print_verdict(&report)?;
    }

    if args.strict && !report.capacity.fits {
        return Err(PlannerError::CapacityExceeded {
            required_gb: report.capacity.required_gb,
            vram_gb: report.capacity.vram_gb,
        });
    }

    Ok(())
}

fn print_verdict(report: &PlanReport) -> Result<()> {
    let mut stdout = io::stdout();
    let capacity = &report.capacity;

    if capacity.fits {
        stdout.execute(SetForegroundColor(Color::Green))?;
        println!("✓ Fits: {:.1} GB remaining", capacity.remaining_gb);
    } else {
        stdout.execute(SetForegroundColor(Color::Red))?;
        println!("✗ Does not fit: short by {:.1} GB", capacity.shortfall_gb());
    }
    stdout.execute(ResetColor)?;
    println!();

    Ok(())
}

fn or_na(value: Option<f64>, render: impl Fn(f64) -> String) -> String {
    value.map(render).unwrap_or_else(|| "n/a".to_string())
}

/// Plain-text report, without the coloured verdict line
pub fn render_text(report: &PlanReport) -> String {
    let mut out = String::new();
    let hw = &report.hardware;

    let bandwidth = if hw.has_known_bandwidth() {
        format!("{:.0} GB/s", hw.bandwidth_gbs)
    } else {
        "bandwidth unknown".to_string()
    };
    let _ = writeln!(
        out,
        "\n=== {} ({:.0} GB, {}) ===\n",
        hw.display_name(),
        hw.vram_gb,
        bandwidth
    );

    let _ = writeln!(
        out,
        "{:<26} {:>9} {:>9} {:>11} {:>9} {:>11} {:>8}",
        "Model", "Weights", "KV", "KV/token", "Max reqs", "Decode BW", "BW util"
    );
    for m in &report.models {
        let name = if m.enabled {
            m.name.clone()
        } else {
            format!("{} (off)", m.name)
        };
        let _ = writeln!(
            out,
            "{:<26} {:>9} {:>9} {:>11} {:>9} {:>11} {:>8}",
            name,
            format!("{:.1} GB", m.weights_gb),
            format!("{:.1} GB", m.kv_budget_gb),
            or_na(m.kv_bytes_per_token, |b| format!("{:.0} KiB", b / 1024.0)),
            or_na(m.max_concurrent_requests, |r| format!("{:.1}", r)),
            format!("{:.0} GB/s", m.bandwidth_demand_gbs),
            or_na(m.bandwidth_utilization_percent, |p| format!("{:.1}%", p)),
        );
    }

    let c = &report.capacity;
    let _ = writeln!(out, "\n=== Memory ===");
    let _ = writeln!(out, "Models counted: {}", c.enabled_models);
    let _ = writeln!(out, "Weights:   {:>8.1} GB", c.weights_gb);
    let _ = writeln!(out, "KV cache:  {:>8.1} GB", c.kv_budget_gb);
    let _ = writeln!(
        out,
        "Overhead:  {:>8.1} GB ({:.0}%)",
        c.overhead_gb,
        report.overhead_ratio * 100.0
    );
    let _ = writeln!(
        out,
        "Required:  {:>8.1} GB of {:.1} GB ({:.1}%)",
        c.required_gb,
        c.vram_gb,
        c.utilization_percent()
    );
    render_breakdown(&mut out, &report.memory, "GB");

    let _ = writeln!(out, "\n=== Bandwidth ===");
    let _ = writeln!(
        out,
        "Decode demand: {:.0} GB/s",
        report.total_bandwidth_demand_gbs
    );
    let _ = writeln!(
        out,
        "Utilization:   {}",
        or_na(report.bandwidth_utilization_percent, |p| format!("{:.1}%", p))
    );
    render_breakdown(&mut out, &report.bandwidth, "GB/s");
    out.push('\n');

    out
}

const BAR_WIDTH: usize = 30;

fn render_breakdown(out: &mut String, breakdown: &Breakdown, unit: &str) {
    for segment in &breakdown.segments {
        let filled = ((segment.share * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
        let _ = writeln!(
            out,
            "  {:<30} [{}{}] {:>8.1} {} {:>5.1}%",
            segment.label,
            "#".repeat(filled),
            " ".repeat(BAR_WIDTH - filled),
            segment.value,
            unit,
            segment.share * 100.0
        );
    }
}
