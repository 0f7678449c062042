//! Storage layer for build history.
//!
//! Reads the original dataset exported by a build-history provider and writes
//! table exports. Nothing here fetches or persists history on its own.

pub mod csv;
pub mod jsonl;

// Re-export key types
pub use self::csv::{CSV_HEADERS, CsvExporter};
pub use self::jsonl::{JsonlReader, load_dataset};
