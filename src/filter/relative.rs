//! Relative values against a baseline build.
//!
//! A baseline is either a fixed build, looked up by label in the unfiltered
//! series, or a sliding offset into the filtered sequence (`-1` compares each
//! build with the previous retained one).

use crate::core::schema::{BuildPoint, Unit};

/// Parsed `relative_to_build` specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaselineSpec {
    /// Compare against the build with this label.
    Fixed(String),
    /// Compare against the point this many positions earlier after filtering.
    Sliding(usize),
}

impl BaselineSpec {
    /// Parse a specifier. Empty input means no baseline.
    ///
    /// Only a whole-string negative integer selects sliding mode; anything
    /// else, numeric or not, names a fixed build.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match raw.parse::<i64>() {
            Ok(k) if k < 0 => Some(BaselineSpec::Sliding(k.unsigned_abs() as usize)),
            _ => Some(BaselineSpec::Fixed(raw.to_string())),
        }
    }

    /// Label of the fixed baseline build, if any.
    pub fn fixed_label(&self) -> Option<&str> {
        match self {
            BaselineSpec::Fixed(label) => Some(label),
            BaselineSpec::Sliding(_) => None,
        }
    }
}

/// Value of `value` relative to `baseline`.
///
/// `None` on either side gives `None`. In percent mode the delta is divided
/// by the baseline and rounded half up; a zero baseline yields an infinity or
/// NaN, which is returned as is.
pub fn relative_value(baseline: Option<f64>, value: Option<f64>, unit: Unit) -> Option<f64> {
    let (baseline, value) = (baseline?, value?);
    let delta = value - baseline;
    match unit {
        Unit::Milliseconds => Some(delta),
        Unit::Percent => Some(round_half_up(delta / baseline * 100.0)),
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Rewrites the retained points of one series against a baseline.
///
/// Implementations receive points in filtered order and return the points
/// that survive; positions are reassigned by the caller.
pub trait BaselineStrategy {
    fn rebase(&self, retained: Vec<BuildPoint>, unit: Unit) -> Vec<BuildPoint>;
}

/// Leaves values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBaseline;

impl BaselineStrategy for NoBaseline {
    fn rebase(&self, retained: Vec<BuildPoint>, _unit: Unit) -> Vec<BuildPoint> {
        retained
    }
}

/// Compares every point with one value taken from the unfiltered series.
#[derive(Debug, Clone, Copy)]
pub struct FixedBaseline {
    value: Option<f64>,
}

impl FixedBaseline {
    /// Resolve the baseline from the unfiltered points of a series.
    ///
    /// A series without the build, or with no value for it, gets a `None`
    /// baseline and therefore only `None` relative values.
    pub fn resolve(original: &[BuildPoint], label: &str) -> Self {
        let value = original
            .iter()
            .find(|p| p.x_label == label)
            .and_then(|p| p.y);
        FixedBaseline { value }
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }
}

impl BaselineStrategy for FixedBaseline {
    fn rebase(&self, mut retained: Vec<BuildPoint>, unit: Unit) -> Vec<BuildPoint> {
        for point in &mut retained {
            if point.y.is_some() {
                point.y = relative_value(self.value, point.y, unit);
            }
        }
        retained
    }
}

/// Compares every point with the point `offset` positions earlier.
///
/// The first `offset` points have no predecessor and are dropped.
#[derive(Debug, Clone, Copy)]
pub struct SlidingBaseline {
    offset: usize,
}

impl SlidingBaseline {
    pub fn new(offset: usize) -> Self {
        SlidingBaseline { offset }
    }
}

impl BaselineStrategy for SlidingBaseline {
    fn rebase(&self, retained: Vec<BuildPoint>, unit: Unit) -> Vec<BuildPoint> {
        let values: Vec<Option<f64>> = retained.iter().map(|p| p.y).collect();
        retained
            .into_iter()
            .enumerate()
            .skip(self.offset)
            .map(|(idx, mut point)| {
                point.y = relative_value(values[idx - self.offset], values[idx], unit);
                point
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[Option<f64>]) -> Vec<BuildPoint> {
        values
            .iter()
            .enumerate()
            .map(|(i, y)| BuildPoint::new(i + 1, *y, (i + 1).to_string(), true))
            .collect()
    }

    fn ys(points: &[BuildPoint]) -> Vec<Option<f64>> {
        points.iter().map(|p| p.y).collect()
    }

    #[test]
    fn test_parse_baseline_spec() {
        assert_eq!(BaselineSpec::parse(""), None);
        assert_eq!(BaselineSpec::parse("-1"), Some(BaselineSpec::Sliding(1)));
        assert_eq!(BaselineSpec::parse("-3"), Some(BaselineSpec::Sliding(3)));
        assert_eq!(
            BaselineSpec::parse("120"),
            Some(BaselineSpec::Fixed("120".to_string()))
        );
        assert_eq!(
            BaselineSpec::parse("-0"),
            Some(BaselineSpec::Fixed("-0".to_string()))
        );
        assert_eq!(
            BaselineSpec::parse("-2abc"),
            Some(BaselineSpec::Fixed("-2abc".to_string()))
        );
        assert_eq!(
            BaselineSpec::parse("release-1"),
            Some(BaselineSpec::Fixed("release-1".to_string()))
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(BaselineSpec::parse("   "), None);
        assert_eq!(
            BaselineSpec::parse(" 12 "),
            Some(BaselineSpec::Fixed("12".to_string()))
        );
        assert_eq!(BaselineSpec::parse(" -2"), Some(BaselineSpec::Sliding(2)));
    }

    #[test]
    fn test_relative_null_propagates() {
        assert_eq!(relative_value(None, Some(5.0), Unit::Milliseconds), None);
        assert_eq!(relative_value(Some(5.0), None, Unit::Percent), None);
    }

    #[test]
    fn test_relative_absolute_delta() {
        assert_eq!(
            relative_value(Some(10.0), Some(15.0), Unit::Milliseconds),
            Some(5.0)
        );
        assert_eq!(
            relative_value(Some(15.0), Some(10.0), Unit::Milliseconds),
            Some(-5.0)
        );
    }

    #[test]
    fn test_relative_percent() {
        assert_eq!(relative_value(Some(10.0), Some(15.0), Unit::Percent), Some(50.0));
        assert_eq!(relative_value(Some(3.0), Some(4.0), Unit::Percent), Some(33.0));
    }

    #[test]
    fn test_percent_rounds_half_up() {
        // -2.5% rounds toward positive infinity
        assert_eq!(relative_value(Some(200.0), Some(195.0), Unit::Percent), Some(-2.0));
        assert_eq!(relative_value(Some(200.0), Some(205.0), Unit::Percent), Some(3.0));
    }

    #[test]
    fn test_zero_baseline_keeps_non_finite() {
        assert_eq!(
            relative_value(Some(0.0), Some(5.0), Unit::Percent),
            Some(f64::INFINITY)
        );
        assert_eq!(
            relative_value(Some(0.0), Some(-5.0), Unit::Percent),
            Some(f64::NEG_INFINITY)
        );
        assert!(
            relative_value(Some(0.0), Some(0.0), Unit::Percent).is_some_and(f64::is_nan)
        );
    }

    #[test]
    fn test_fixed_baseline_resolution() {
        let original = points(&[Some(10.0), None, Some(30.0)]);
        assert_eq!(FixedBaseline::resolve(&original, "1").value(), Some(10.0));
        assert_eq!(FixedBaseline::resolve(&original, "2").value(), None);
        assert_eq!(FixedBaseline::resolve(&original, "99").value(), None);
    }

    #[test]
    fn test_fixed_baseline_rebase() {
        let original = points(&[Some(10.0), None, Some(30.0)]);
        let strategy = FixedBaseline::resolve(&original, "1");
        let rebased = strategy.rebase(original.clone(), Unit::Milliseconds);
        assert_eq!(ys(&rebased), vec![Some(0.0), None, Some(20.0)]);
    }

    #[test]
    fn test_fixed_baseline_without_value_nulls_everything() {
        let original = points(&[Some(10.0), Some(20.0)]);
        let strategy = FixedBaseline::resolve(&original, "missing");
        let rebased = strategy.rebase(original, Unit::Milliseconds);
        assert_eq!(ys(&rebased), vec![None, None]);
    }

    #[test]
    fn test_sliding_previous_build() {
        let retained = points(&[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let rebased = SlidingBaseline::new(1).rebase(retained, Unit::Milliseconds);
        assert_eq!(ys(&rebased), vec![Some(1.0), Some(1.0), Some(1.0)]);
        let labels: Vec<&str> = rebased.iter().map(|p| p.x_label.as_str()).collect();
        assert_eq!(labels, vec!["2", "3", "4"]);
    }

    #[test]
    fn test_sliding_offset_two_with_nulls() {
        let retained = points(&[Some(1.0), None, Some(4.0), Some(8.0)]);
        let rebased = SlidingBaseline::new(2).rebase(retained, Unit::Milliseconds);
        assert_eq!(ys(&rebased), vec![Some(3.0), None]);
    }

    #[test]
    fn test_sliding_offset_longer_than_series() {
        let retained = points(&[Some(1.0), Some(2.0)]);
        let rebased = SlidingBaseline::new(5).rebase(retained, Unit::Milliseconds);
        assert!(rebased.is_empty());
    }

    #[test]
    fn test_no_baseline_is_identity() {
        let retained = points(&[Some(1.0), None]);
        assert_eq!(NoBaseline.rebase(retained.clone(), Unit::Percent), retained);
    }
}
