pub mod core;
pub mod filter;
pub mod report;
pub mod storage;

pub mod filter_cmd;
pub mod table_cmd;

use thiserror::Error;

// Re-export commonly used types
pub use crate::core::schema::{BuildPoint, Dataset, TestSeries, Unit};
pub use crate::filter::{FilterConfig, FilterOptions, apply_filters};
pub use crate::storage::JsonlReader;

#[derive(Debug, Error)]
pub enum TrendError {
    #[error("{0}")]
    Message(String),
    /// Fixed baseline build that does not exist in the first series.
    #[error(
        "invalid relative build: {0}; enter either an existing build label or a negative offset"
    )]
    InvalidRelativeBuild(String),
    #[error("no tests matching specified criteria")]
    NoMatchingTests,
    #[error("invalid test name pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl TrendError {
    /// Process exit code for the binary.
    ///
    /// The two user-facing render failures get their own codes so scripts can
    /// tell them apart from I/O or parse errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            TrendError::InvalidRelativeBuild(_) => 2,
            TrendError::NoMatchingTests => 3,
            _ => 1,
        }
    }
}

pub type TrendResult<T> = Result<T, TrendError>;
