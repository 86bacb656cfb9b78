// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Model listing command

use std::fmt::Write as _;

use serde::Serialize;

use crate::cli::args::{ModelsArgs, OutputFormat};
use crate::config::Settings;
use crate::error::Result;
use crate::metrics::{kv_bytes_per_token, weights_footprint_gb};
use crate::models::{DegradationTable, ModelCatalog, ModelConfig};

#[derive(Serialize)]
struct ModelEntry<'a> {
    #[serde(flatten)]
    model: &'a ModelConfig,
    weights_gb: f64,
    kv_bytes_per_token: f64,
    quality_loss_percent: Option<f64>,
}

/// Models selected by the command's filters
pub fn select<'a>(catalog: &'a ModelCatalog, args: &ModelsArgs) -> Vec<&'a ModelConfig> {
    match args.fits {
        Some(vram_gb) => catalog.fitting_weights(vram_gb),
        None => catalog.all().iter().collect(),
    }
}

/// Execute the models command
pub fn execute(args: &ModelsArgs, settings: &Settings, format: &OutputFormat) -> Result<()> {
    let catalog = ModelCatalog::new();
    let models = select(&catalog, args);
    let table = settings.degradation_table();

    if matches!(format, OutputFormat::Json) {
        let entries: Vec<ModelEntry> = models
            .iter()
            .map(|m| ModelEntry {
                model: m,
                weights_gb: weights_footprint_gb(m),
                kv_bytes_per_token: kv_bytes_per_token(m),
                quality_loss_percent: table.loss_for_bytes(m.weight_bytes_per_param),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    print!("{}", render_text(&models, args.detailed, &table));
    Ok(())
}

pub fn render_text(models: &[&ModelConfig], detailed: bool, table: &DegradationTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Models ===\n");

    for m in models {
        let params = match m.active_params {
            Some(active) if m.is_moe() => {
                format!("{:.1}B ({:.1}B active)", m.base_params / 1e9, active / 1e9)
            }
            _ => format!("{:.1}B", m.base_params / 1e9),
        };
        let _ = writeln!(
            out,
            "  {:<22} {:<24} {:>22}  weights {:.1} GB",
            m.id,
            m.display_name(),
            params,
            weights_footprint_gb(m)
        );

        if detailed {
            let kv = kv_bytes_per_token(m);
            let kv_line = if kv == 0.0 {
                "no KV cache".to_string()
            } else {
                format!("{:.0} KiB KV/token", kv / 1024.0)
            };
            let loss = table
                .loss_for_bytes(m.weight_bytes_per_param)
                .map(|l| format!("~{:.1}% quality loss", l))
                .unwrap_or_else(|| "quality loss unknown".to_string());
            let _ = writeln!(
                out,
                "      {} layers, {} KV heads x {} dim, {}",
                m.layers, m.kv_heads, m.head_dim, kv_line
            );
            let _ = writeln!(
                out,
                "      weights {} B/param ({}), KV {} B/element",
                m.weight_bytes_per_param, loss, m.kv_bytes_per_element
            );
            if !m.description.is_empty() {
                let _ = writeln!(out, "      {}", m.description);
            }
        }
    }

    if models.is_empty() {
        let _ = writeln!(out, "  (no models match)");
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Precision;

    #[test]
    fn test_select_fits() {
        let catalog = ModelCatalog::with_defaults_only();
        let args = ModelsArgs {
            fits: Some(24.0),
            ..Default::default()
        };
        let selected = select(&catalog, &args);
        assert!(!selected.is_empty());
        assert!(selected.iter().all(|m| weights_footprint_gb(m) <= 24.0));
    }

    #[test]
    fn test_render_text_moe() {
        let moe = ModelConfig::new("moe", 30e9, 48, 4, 128)
            .with_name("Test MoE")
            .with_active_params(3e9)
            .with_weight_precision(Precision::Fp8);
        let text = render_text(&[&moe], false, &DegradationTable::default());

        assert!(text.contains("Test MoE"));
        assert!(text.contains("30.0B (3.0B active)"));
        assert!(text.contains("weights 30.0 GB"));
    }

    #[test]
    fn test_render_text_detailed() {
        let reranker = ModelConfig::new("reranker", 0.5e9, 24, 0, 64)
            .with_weight_precision(Precision::Int4)
            .with_description("Cross-encoder");
        let text = render_text(&[&reranker], true, &DegradationTable::default());

        assert!(text.contains("no KV cache"));
        assert!(text.contains("~4.0% quality loss"));
        assert!(text.contains("Cross-encoder"));
    }

    #[test]
    fn test_model_entry_json() {
        let model = ModelConfig::new("qwen3-8b", 8e9, 36, 8, 128);
        let entry = ModelEntry {
            model: &model,
            weights_gb: weights_footprint_gb(&model),
            kv_bytes_per_token: kv_bytes_per_token(&model),
            quality_loss_percent: Some(0.0),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["id"], "qwen3-8b");
        assert_eq!(json["weights_gb"], 16.0);
        assert_eq!(json["kv_bytes_per_token"], 147456.0);
        assert_eq!(json["quality_loss_percent"], 0.0);
        assert_eq!(json["kv_budget_gb"], 8.0);
        assert!(json.get("weightsGb").is_none());
    }
}
