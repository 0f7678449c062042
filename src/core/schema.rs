//! Build history records consumed and produced by the filter pipeline.
//!
//! The shapes mirror what the chart and table collaborators exchange: a
//! dataset is a list of named test series, each holding one point per build
//! in chronological order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{TrendError, TrendResult};

/// Unit of the plotted values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// Raw durations, or absolute deltas when re-baselined.
    #[default]
    #[serde(alias = "ms")]
    Milliseconds,
    /// Rounded percentage change against a baseline.
    #[serde(alias = "%")]
    Percent,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Milliseconds => "milliseconds",
            Unit::Percent => "percent",
        }
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One build's sample within a test series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildPoint {
    /// 1-based position within the (processed) series
    #[serde(default)]
    pub x: usize,

    /// Measured value; `None` means the build has no data for this test
    #[serde(default, with = "metric_value")]
    pub y: Option<f64>,

    /// Display identifier of the build (usually the build number)
    pub x_label: String,

    /// Whether the build passed
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

impl BuildPoint {
    pub fn new(x: usize, y: Option<f64>, x_label: impl Into<String>, success: bool) -> Self {
        BuildPoint {
            x,
            y,
            x_label: x_label.into(),
            success,
        }
    }
}

/// Chronologically ordered samples for one named test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSeries {
    pub name: String,

    /// Opaque color hint for the chart, passed through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    pub data: Vec<BuildPoint>,
}

impl TestSeries {
    pub fn new(name: impl Into<String>, data: Vec<BuildPoint>) -> Self {
        TestSeries {
            name: name.into(),
            color: None,
            data,
        }
    }

    /// True when the series has at least one point carrying a value.
    pub fn is_plottable(&self) -> bool {
        self.data.iter().any(|p| p.y.is_some())
    }

    /// Look up a point by its build label.
    pub fn point(&self, x_label: &str) -> Option<&BuildPoint> {
        self.data.iter().find(|p| p.x_label == x_label)
    }

    fn check_unique_labels(&self) -> TrendResult<()> {
        let mut seen = HashSet::with_capacity(self.data.len());
        for point in &self.data {
            if !seen.insert(point.x_label.as_str()) {
                return Err(TrendError::InvalidDataset(format!(
                    "series '{}' contains build '{}' more than once",
                    self.name, point.x_label
                )));
            }
        }
        Ok(())
    }
}

/// The original, unfiltered series supplied for one render cycle.
///
/// Construction enforces unique series names and unique build labels per
/// series. The dataset is never mutated; filtering always derives new series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    series: Vec<TestSeries>,
}

impl Dataset {
    pub fn new(series: Vec<TestSeries>) -> TrendResult<Self> {
        let mut names = HashSet::with_capacity(series.len());
        for s in &series {
            if !names.insert(s.name.as_str()) {
                return Err(TrendError::InvalidDataset(format!(
                    "duplicate series name '{}'",
                    s.name
                )));
            }
            s.check_unique_labels()?;
        }
        Ok(Dataset { series })
    }

    pub fn series(&self) -> &[TestSeries] {
        &self.series
    }

    pub fn first(&self) -> Option<&TestSeries> {
        self.series.first()
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Serde adapter for metric values.
///
/// JSON has no representation for non-finite numbers, so `NaN` and the
/// infinities produced by a zero baseline travel as strings.
mod metric_value {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            None => s.serialize_none(),
            Some(v) if v.is_nan() => s.serialize_str("NaN"),
            Some(v) if v.is_infinite() && *v > 0.0 => s.serialize_str("Infinity"),
            Some(v) if v.is_infinite() => s.serialize_str("-Infinity"),
            Some(v) => s.serialize_f64(*v),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Option::<Raw>::deserialize(d)? {
            None => Ok(None),
            Some(Raw::Number(v)) => Ok(Some(v)),
            Some(Raw::Text(s)) => match s.as_str() {
                "NaN" => Ok(Some(f64::NAN)),
                "Infinity" => Ok(Some(f64::INFINITY)),
                "-Infinity" => Ok(Some(f64::NEG_INFINITY)),
                other => Err(D::Error::custom(format!("invalid metric value '{other}'"))),
            },
        }
    }
}
