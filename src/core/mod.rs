//! Core types for test-trend.
//!
//! This module contains the build history records every pipeline stage reads
//! and produces.

pub mod schema;

// Re-export key types for convenience
pub use schema::{BuildPoint, Dataset, TestSeries, Unit};
