//! Filtering and re-baselining of build history.
//!
//! One render cycle takes the untouched original dataset and a
//! `FilterConfig`, and produces the series handed to the chart and table:
//!
//! 1. validate a fixed baseline against the first series
//! 2. filter and re-baseline every series (`pipeline`)
//! 3. reorder survivors into include-list order (`reorder`)

pub mod config;
pub mod pipeline;
pub mod range;
pub mod relative;
pub mod reorder;

use tracing::{debug, info};

use crate::core::schema::{Dataset, TestSeries};
use crate::{TrendError, TrendResult};

pub use config::{FilterConfig, FilterOptions, TrendConfigFile, load_config_file};
pub use pipeline::filter_series;
pub use range::{BuildList, parse_build_list};
pub use relative::{BaselineSpec, relative_value};
pub use reorder::reorder;

/// Check that a fixed baseline build exists in the first series.
///
/// Sliding baselines, an empty dataset and a missing baseline always pass.
pub fn validate_baseline(dataset: &Dataset, config: &FilterConfig) -> TrendResult<()> {
    let (Some(first), Some(label)) = (
        dataset.first(),
        config.baseline().and_then(BaselineSpec::fixed_label),
    ) else {
        return Ok(());
    };
    if first.point(label).is_some() {
        Ok(())
    } else {
        Err(TrendError::InvalidRelativeBuild(label.to_string()))
    }
}

/// Run one render cycle over `dataset`.
///
/// # Errors
/// - `TrendError::InvalidRelativeBuild` if a fixed baseline build is unknown;
///   no series is filtered in that case
/// - `TrendError::NoMatchingTests` if every series was filtered out
pub fn apply_filters(dataset: &Dataset, config: &FilterConfig) -> TrendResult<Vec<TestSeries>> {
    validate_baseline(dataset, config)?;

    let mut out = Vec::with_capacity(dataset.len());
    for series in dataset.series() {
        match filter_series(series, config) {
            Some(mut filtered) => {
                filtered.data = reorder(filtered.data, config.include_builds());
                out.push(filtered);
            }
            None => debug!(series = %series.name, "series filtered out"),
        }
    }

    info!(
        kept = out.len(),
        total = dataset.len(),
        unit = %config.unit(),
        "filtered test series"
    );

    if out.is_empty() {
        return Err(TrendError::NoMatchingTests);
    }
    Ok(out)
}
