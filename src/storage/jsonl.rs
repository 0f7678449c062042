//! Dataset loading.
//!
//! Build history arrives either as a JSON array of series or as JSON Lines
//! with one series per line.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::TrendError;
use crate::core::schema::{Dataset, TestSeries};

/// JSONL reader for test series.
#[derive(Debug, Clone)]
pub struct JsonlReader {
    path: PathBuf,
}

impl JsonlReader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonlReader {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read all series from the JSONL file.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file doesn't exist
    /// - File operations fail
    /// - JSON deserialization fails for any line
    pub fn read_all(&self) -> Result<Vec<TestSeries>, TrendError> {
        if !self.path.exists() {
            return Err(TrendError::Message(format!(
                "file not found: {}",
                self.path.display()
            )));
        }

        let file = File::open(&self.path)
            .map_err(|e| TrendError::Message(format!("failed to open file: {e}")))?;

        let reader = BufReader::new(file);
        let mut series = Vec::new();

        for (line_num, line_result) in reader.lines().enumerate() {
            let line = line_result.map_err(|e| {
                TrendError::Message(format!("failed to read line {}: {e}", line_num + 1))
            })?;

            // Skip empty lines
            if line.trim().is_empty() {
                continue;
            }

            let s: TestSeries = serde_json::from_str(&line).map_err(|e| {
                TrendError::Message(format!("failed to parse line {}: {e}", line_num + 1))
            })?;
            series.push(s);
        }

        Ok(series)
    }
}

/// Load and validate a dataset.
///
/// Files ending in `.jsonl` are read line by line; anything else must hold a
/// JSON array of series.
pub fn load_dataset(path: &Path) -> Result<Dataset, TrendError> {
    let is_jsonl = path.extension().and_then(|e| e.to_str()) == Some("jsonl");
    let series = if is_jsonl {
        JsonlReader::new(path).read_all()?
    } else {
        let s = std::fs::read_to_string(path).map_err(|e| {
            TrendError::Message(format!("failed to read {}: {e}", path.display()))
        })?;
        serde_json::from_str::<Vec<TestSeries>>(&s).map_err(|e| {
            TrendError::Message(format!("failed to parse {}: {e}", path.display()))
        })?
    };
    debug!(path = %path.display(), series = series.len(), "loaded dataset");
    Dataset::new(series)
}
