//! CLI command handler for `table`.
//!
//! Runs the same render cycle as `filter` and prints the companion table.

use std::path::PathBuf;

use crate::filter::FilterOptions;
use crate::filter_cmd::render_cycle;
use crate::report::{TableOptions, TrendTable, build_table, render_markdown, render_text};
use crate::storage::CsvExporter;
use crate::{TrendError, TrendResult};

/// Run the `table` command.
///
/// `format` is one of `text`, `markdown`/`md`, `csv` or `json`; unknown
/// values fall back to text. `hidden` lists series toggled off in the legend.
pub fn run(
    input: PathBuf,
    config_path: Option<PathBuf>,
    overrides: FilterOptions,
    hidden: Vec<String>,
    format: String,
    csv_out: Option<PathBuf>,
) -> TrendResult<TrendTable> {
    let cycle = render_cycle(&input, config_path.as_deref(), overrides)?;

    let table = build_table(
        &cycle.series,
        &TableOptions {
            unit: cycle.config.unit(),
            baseline: cycle.config.baseline(),
            thresholds: &cycle.thresholds,
            hidden: &hidden,
        },
    );
    tracing::debug!(
        rows = table.rows.len(),
        columns = table.columns.len(),
        "built trend table"
    );

    if let Some(ref path) = csv_out {
        CsvExporter::new().export(&table, path)?;
        eprintln!("Wrote table CSV to {}", path.display());
    }

    match format.as_str() {
        "markdown" | "md" => print!("{}", render_markdown(&table)),
        "csv" => CsvExporter::new().export_to_stdout(&table)?,
        "json" => {
            let json = serde_json::to_string_pretty(&table)
                .map_err(|e| TrendError::Message(format!("failed to serialize table: {e}")))?;
            println!("{json}");
        }
        _ => print!("{}", render_text(&table)),
    }

    Ok(table)
}
