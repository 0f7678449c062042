//! CLI command handler for `filter`.
//!
//! Loads the dataset, applies the configured filters and writes the filtered
//! series as JSON for the chart.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::schema::{TestSeries, Unit};
use crate::filter::{FilterConfig, FilterOptions, apply_filters, load_config_file};
use crate::report::DurationThreshold;
use crate::storage::load_dataset;
use crate::{TrendError, TrendResult};

/// Filtered dataset handed to the chart.
#[derive(Debug, Clone, Serialize)]
pub struct FilteredOutput {
    /// RFC 3339 timestamp of the render cycle
    pub generated_at: String,
    pub unit: Unit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_to_build: Option<String>,
    pub series: Vec<TestSeries>,
}

/// Result of one render cycle together with the settings that produced it.
#[derive(Debug, Clone)]
pub struct RenderCycle {
    pub options: FilterOptions,
    pub config: FilterConfig,
    pub thresholds: BTreeMap<String, DurationThreshold>,
    pub series: Vec<TestSeries>,
}

/// Load the dataset and config, then run the filters.
///
/// Options from `config_path` are overlaid with `overrides`.
pub fn render_cycle(
    input: &Path,
    config_path: Option<&Path>,
    overrides: FilterOptions,
) -> TrendResult<RenderCycle> {
    let file = match config_path {
        Some(path) => load_config_file(path)?,
        None => Default::default(),
    };
    let options = file.filter.merge(overrides);
    let config = FilterConfig::from_options(&options)?;

    let dataset = load_dataset(input)?;
    info!(input = %input.display(), series = dataset.len(), "loaded build history");

    let series = apply_filters(&dataset, &config)?;
    Ok(RenderCycle {
        options,
        config,
        thresholds: file.thresholds,
        series,
    })
}

/// Run the `filter` command.
///
/// Writes the JSON output to `json_out` when given, otherwise to stdout.
pub fn run(
    input: PathBuf,
    config_path: Option<PathBuf>,
    overrides: FilterOptions,
    json_out: Option<PathBuf>,
) -> TrendResult<FilteredOutput> {
    let cycle = render_cycle(&input, config_path.as_deref(), overrides)?;

    let generated_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default();
    let output = FilteredOutput {
        generated_at,
        unit: cycle.config.unit(),
        relative_to_build: cycle.options.relative_to_build.filter(|s| !s.is_empty()),
        series: cycle.series,
    };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| TrendError::Message(format!("failed to serialize output: {e}")))?;
    match json_out {
        Some(path) => {
            std::fs::write(&path, json).map_err(|e| {
                TrendError::Message(format!("failed to write {}: {e}", path.display()))
            })?;
            eprintln!("Wrote filtered series to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(output)
}
