//! Per-series filter pipeline.
//!
//! Every series goes through the same stages: name gate, point selection,
//! baseline rewrite, re-sequencing and the plottable check. When no point
//! filter is configured the selection stage keeps everything without
//! evaluating predicates.

use tracing::trace;

use crate::core::schema::{BuildPoint, TestSeries};

use super::config::FilterConfig;
use super::relative::{BaselineSpec, BaselineStrategy, FixedBaseline, NoBaseline, SlidingBaseline};

/// Filter one series.
///
/// Returns `None` when the series name fails the name pattern, or when no
/// point with a value survives filtering. The input series is not modified.
pub fn filter_series(series: &TestSeries, config: &FilterConfig) -> Option<TestSeries> {
    if !config.matches_test_name(&series.name) {
        trace!(series = %series.name, "name does not match pattern");
        return None;
    }

    let retained = select_points(&series.data, config);
    let strategy = baseline_strategy(&series.data, config);
    let mut data = strategy.rebase(retained, config.unit());
    resequence(&mut data);

    let filtered = TestSeries {
        name: series.name.clone(),
        color: series.color.clone(),
        data,
    };
    if !filtered.is_plottable() {
        trace!(series = %series.name, "no values left after filtering");
        return None;
    }
    Some(filtered)
}

fn select_points(original: &[BuildPoint], config: &FilterConfig) -> Vec<BuildPoint> {
    if !config.is_any_filter_set() {
        return original.to_vec();
    }
    let len = original.len();
    original
        .iter()
        .enumerate()
        .filter(|(i, p)| config.keeps_build(*i, len, &p.x_label, p.success))
        .map(|(_, p)| p.clone())
        .collect()
}

fn baseline_strategy(original: &[BuildPoint], config: &FilterConfig) -> Box<dyn BaselineStrategy> {
    match config.baseline() {
        None => Box::new(NoBaseline),
        Some(BaselineSpec::Fixed(label)) => Box::new(FixedBaseline::resolve(original, label)),
        Some(BaselineSpec::Sliding(offset)) => Box::new(SlidingBaseline::new(*offset)),
    }
}

/// Assign `x = 1..=len` in current order.
pub(crate) fn resequence(points: &mut [BuildPoint]) {
    for (i, point) in points.iter_mut().enumerate() {
        point.x = i + 1;
    }
}
