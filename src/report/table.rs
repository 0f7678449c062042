//! Companion table for the trend chart.
//!
//! The table shows one row per visible series and one column per build of the
//! first series. Each cell carries its formatted text and, when the value can
//! be judged, a pass/fail class: against zero when values are relative to a
//! baseline, otherwise against per-test duration thresholds.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::core::schema::{TestSeries, Unit};
use crate::filter::BaselineSpec;

/// Threshold key applied to tests without their own entry.
pub const FALLBACK_THRESHOLD_KEY: &str = "*";

/// Duration limits for one test, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DurationThreshold {
    /// At or below this a duration passes
    pub passed_time: f64,
    /// At or above this a duration fails
    pub failed_time: f64,
}

impl DurationThreshold {
    pub fn classify(&self, value: f64) -> CellClass {
        if value <= self.passed_time {
            CellClass::Passed
        } else if value >= self.failed_time {
            CellClass::Failed
        } else {
            CellClass::Inconclusive
        }
    }
}

/// Verdict attached to a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Passed,
    Inconclusive,
    Failed,
}

impl CellClass {
    /// Get emoji representation for markdown.
    pub fn emoji(&self) -> &'static str {
        match self {
            CellClass::Passed => "🟢",
            CellClass::Inconclusive => "🟡",
            CellClass::Failed => "🔴",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    /// Header text, `#<build label>`
    pub title: String,
    pub x_label: String,
    /// Column of the fixed baseline build
    pub is_baseline: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableCell {
    pub value: Option<f64>,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<CellClass>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    /// 1-based row number among visible series
    pub no: usize,
    pub test_name: String,
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendTable {
    pub unit: Unit,
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

/// Inputs that shape the table besides the series themselves.
#[derive(Debug, Clone, Copy)]
pub struct TableOptions<'a> {
    pub unit: Unit,
    pub baseline: Option<&'a BaselineSpec>,
    pub thresholds: &'a BTreeMap<String, DurationThreshold>,
    /// Series toggled off in the chart legend
    pub hidden: &'a [String],
}

/// Build the table model from the filtered series.
///
/// Columns come from the first series even when it is hidden; cells map to
/// columns by position.
pub fn build_table(series: &[TestSeries], options: &TableOptions<'_>) -> TrendTable {
    let fixed_label = options.baseline.and_then(BaselineSpec::fixed_label);
    let columns: Vec<TableColumn> = series
        .first()
        .map(|s| {
            s.data
                .iter()
                .map(|p| TableColumn {
                    title: format!("#{}", p.x_label),
                    x_label: p.x_label.clone(),
                    is_baseline: fixed_label == Some(p.x_label.as_str()),
                })
                .collect()
        })
        .unwrap_or_default();

    let rows = series
        .iter()
        .filter(|s| !options.hidden.contains(&s.name))
        .enumerate()
        .map(|(i, s)| TableRow {
            no: i + 1,
            test_name: s.name.clone(),
            cells: s
                .data
                .iter()
                .enumerate()
                .map(|(col, p)| TableCell {
                    value: p.y,
                    text: cell_text(p.y, options.unit),
                    class: p
                        .y
                        .and_then(|v| classify(&s.name, v, columns.get(col), options)),
                })
                .collect(),
        })
        .collect();

    TrendTable {
        unit: options.unit,
        columns,
        rows,
    }
}

fn classify(
    test_name: &str,
    value: f64,
    column: Option<&TableColumn>,
    options: &TableOptions<'_>,
) -> Option<CellClass> {
    if options.baseline.is_some() {
        if column.is_some_and(|c| c.is_baseline) {
            return None;
        }
        return Some(if value <= 0.0 {
            CellClass::Passed
        } else {
            CellClass::Failed
        });
    }
    options
        .thresholds
        .get(test_name)
        .or_else(|| options.thresholds.get(FALLBACK_THRESHOLD_KEY))
        .map(|t| t.classify(value))
}

/// Format a metric value the way the chart labels it.
///
/// Integral values print without a fractional part; non-finite values print
/// as `Infinity`, `-Infinity` or `NaN`.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        (if value > 0.0 { "Infinity" } else { "-Infinity" }).to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn cell_text(value: Option<f64>, unit: Unit) -> String {
    match value {
        None => String::new(),
        Some(v) if unit == Unit::Percent && v.is_finite() => format!("{}%", format_value(v)),
        Some(v) => format_value(v),
    }
}

/// Render the table as aligned plain text.
pub fn render_text(table: &TrendTable) -> String {
    let header: Vec<String> = ["No", "Test name"]
        .iter()
        .map(|s| s.to_string())
        .chain(table.columns.iter().map(|c| c.title.clone()))
        .collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|r| {
            [r.no.to_string(), r.test_name.clone()]
                .into_iter()
                .chain(r.cells.iter().map(|c| c.text.clone()))
                .collect()
        })
        .collect();

    let width = body.iter().map(Vec::len).chain([header.len()]).max().unwrap_or(0);
    let mut widths = vec![0usize; width];
    for line in std::iter::once(&header).chain(&body) {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for line in std::iter::once(&header).chain(&body) {
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                if i == 1 {
                    format!("{:<w$}", cell, w = widths[i])
                } else {
                    format!("{:>w$}", cell, w = widths[i])
                }
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join("  ").trim_end());
    }
    out
}

/// Render the table as Markdown, marking classified cells with an emoji.
pub fn render_markdown(table: &TrendTable) -> String {
    let mut out = String::new();

    out.push_str("## Test Trend\n\n");
    let _ = writeln!(out, "Unit: `{}`\n", table.unit);

    if table.rows.is_empty() {
        out.push_str("_No visible tests._\n");
        return out;
    }

    out.push_str("| No | Test name |");
    for col in &table.columns {
        if col.is_baseline {
            let _ = write!(out, " **{}** |", col.title);
        } else {
            let _ = write!(out, " {} |", col.title);
        }
    }
    out.push('\n');
    out.push_str("|---:|-----------|");
    for _ in &table.columns {
        out.push_str("---:|");
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "| {} | `{}` |", row.no, row.test_name);
        for cell in &row.cells {
            match cell.class {
                Some(class) => {
                    let _ = write!(out, " {} {} |", class.emoji(), cell.text);
                }
                None => {
                    let _ = write!(out, " {} |", cell.text);
                }
            }
        }
        out.push('\n');
    }
    out
}
