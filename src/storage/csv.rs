//! CSV export for the trend table.

use std::io::Write;
use std::path::Path;

use crate::TrendError;
use crate::report::table::TrendTable;

/// Leading columns before the per-build columns.
pub const CSV_HEADERS: &[&str] = &["no", "test_name"];

/// CSV exporter for trend tables.
///
/// Writes one row per visible test with the formatted cell text, so percent
/// values keep their `%` suffix and missing values stay empty.
#[derive(Debug, Clone, Default)]
pub struct CsvExporter;

impl CsvExporter {
    pub fn new() -> Self {
        CsvExporter
    }

    /// Export a table to a CSV file.
    ///
    /// # Errors
    /// Returns an error if file operations or CSV writing fails.
    pub fn export(&self, table: &TrendTable, output: &Path) -> Result<(), TrendError> {
        // Ensure parent directory exists
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| TrendError::Message(format!("failed to create directory: {e}")))?;
            }
        }

        let file = std::fs::File::create(output)
            .map_err(|e| TrendError::Message(format!("failed to create file: {e}")))?;

        self.export_to_writer(table, file)
    }

    /// Export a table to stdout.
    pub fn export_to_stdout(&self, table: &TrendTable) -> Result<(), TrendError> {
        let stdout = std::io::stdout();
        let handle = stdout.lock();
        self.export_to_writer(table, handle)
    }

    /// Export a table to any writer implementing Write.
    pub fn export_to_writer<W: Write>(&self, table: &TrendTable, writer: W) -> Result<(), TrendError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let headers: Vec<&str> = CSV_HEADERS
            .iter()
            .copied()
            .chain(table.columns.iter().map(|c| c.title.as_str()))
            .collect();
        csv_writer
            .write_record(&headers)
            .map_err(|e| TrendError::Message(format!("failed to write CSV headers: {e}")))?;

        for row in &table.rows {
            let record: Vec<String> = [row.no.to_string(), row.test_name.clone()]
                .into_iter()
                .chain(row.cells.iter().map(|c| c.text.clone()))
                .collect();
            csv_writer
                .write_record(&record)
                .map_err(|e| TrendError::Message(format!("failed to write CSV row: {e}")))?;
        }

        csv_writer
            .flush()
            .map_err(|e| TrendError::Message(format!("failed to flush CSV writer: {e}")))?;

        Ok(())
    }
}
