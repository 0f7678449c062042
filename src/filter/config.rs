//! Filter configuration.
//!
//! `FilterOptions` is the raw, all-optional form read from config files and
//! command line flags. `FilterConfig` is the validated, immutable snapshot
//! threaded through one render cycle.

use std::collections::BTreeMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::schema::Unit;
use crate::report::table::DurationThreshold;
use crate::{TrendError, TrendResult};

use super::range::{BuildList, parse_build_list};
use super::relative::BaselineSpec;

/// Raw filter options. Missing fields mean "unrestricted" or "disabled".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Keep only the most recent N builds (0 = all)
    pub num_last_builds: Option<usize>,
    /// Case-insensitive pattern test names must match
    pub test_name_regex: Option<String>,
    /// Range spec of builds to keep, e.g. "100-110,115"
    pub include_builds: Option<String>,
    /// Range spec of builds to drop
    pub exclude_builds: Option<String>,
    /// Keep points from failed builds
    pub show_failed_builds: Option<bool>,
    /// Baseline build label, or a negative offset for a sliding baseline
    pub relative_to_build: Option<String>,
    /// Unit of relative values
    pub unit: Option<Unit>,
}

impl FilterOptions {
    /// Overlay `other` on top of `self`; fields set in `other` win.
    pub fn merge(self, other: FilterOptions) -> FilterOptions {
        FilterOptions {
            num_last_builds: other.num_last_builds.or(self.num_last_builds),
            test_name_regex: other.test_name_regex.or(self.test_name_regex),
            include_builds: other.include_builds.or(self.include_builds),
            exclude_builds: other.exclude_builds.or(self.exclude_builds),
            show_failed_builds: other.show_failed_builds.or(self.show_failed_builds),
            relative_to_build: other.relative_to_build.or(self.relative_to_build),
            unit: other.unit.or(self.unit),
        }
    }
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrendConfigFile {
    pub filter: FilterOptions,
    /// Duration thresholds keyed by test name, `"*"` for the fallback
    pub thresholds: BTreeMap<String, DurationThreshold>,
}

/// Load a configuration file. `.yaml`/`.yml` files are read as YAML, anything
/// else as TOML.
pub fn load_config_file(path: &Path) -> TrendResult<TrendConfigFile> {
    let s = std::fs::read_to_string(path).map_err(|e| {
        TrendError::Message(format!("failed to read config {}: {e}", path.display()))
    })?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let cfg = if is_yaml {
        serde_yaml::from_str(&s).map_err(|e| TrendError::Message(e.to_string()))?
    } else {
        toml::from_str(&s).map_err(|e| TrendError::Message(e.to_string()))?
    };
    debug!(path = %path.display(), yaml = is_yaml, "loaded config file");
    Ok(cfg)
}

/// Validated filter parameters for one render cycle.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    num_last_builds: usize,
    test_name: Option<Regex>,
    include_builds: Option<BuildList>,
    exclude_builds: Option<BuildList>,
    show_failed_builds: bool,
    baseline: Option<BaselineSpec>,
    unit: Unit,
}

impl FilterConfig {
    /// Build a config from raw options.
    ///
    /// # Errors
    /// Returns `TrendError::InvalidPattern` if the test name pattern does not
    /// compile.
    pub fn from_options(options: &FilterOptions) -> TrendResult<Self> {
        let test_name = match non_empty(options.test_name_regex.as_deref()) {
            Some(pattern) => Some(RegexBuilder::new(pattern).case_insensitive(true).build()?),
            None => None,
        };
        let baseline = options
            .relative_to_build
            .as_deref()
            .and_then(BaselineSpec::parse);
        // Percent only makes sense against a baseline
        let unit = match (&baseline, options.unit.unwrap_or_default()) {
            (Some(_), Unit::Percent) => Unit::Percent,
            _ => Unit::Milliseconds,
        };

        Ok(FilterConfig {
            num_last_builds: options.num_last_builds.unwrap_or(0),
            test_name,
            include_builds: parse_build_list(options.include_builds.as_deref()),
            exclude_builds: parse_build_list(options.exclude_builds.as_deref()),
            show_failed_builds: options.show_failed_builds.unwrap_or(false),
            baseline,
            unit,
        })
    }

    /// True when any point-level filter or a baseline is configured.
    pub fn is_any_filter_set(&self) -> bool {
        self.num_last_builds > 0
            || self.include_builds.is_some()
            || self.exclude_builds.is_some()
            || !self.show_failed_builds
            || self.baseline.is_some()
    }

    pub fn matches_test_name(&self, name: &str) -> bool {
        self.test_name.as_ref().is_none_or(|re| re.is_match(name))
    }

    /// Whether the point at `index` of `len` passes every point predicate.
    pub fn keeps_build(&self, index: usize, len: usize, x_label: &str, success: bool) -> bool {
        self.within_recent(index, len)
            && self.include_builds.as_ref().is_none_or(|l| l.contains(x_label))
            && self.exclude_builds.as_ref().is_none_or(|l| !l.contains(x_label))
            && (success || self.show_failed_builds)
    }

    fn within_recent(&self, index: usize, len: usize) -> bool {
        self.num_last_builds == 0 || index >= len.saturating_sub(self.num_last_builds)
    }

    pub fn num_last_builds(&self) -> usize {
        self.num_last_builds
    }

    pub fn include_builds(&self) -> Option<&BuildList> {
        self.include_builds.as_ref()
    }

    pub fn show_failed_builds(&self) -> bool {
        self.show_failed_builds
    }

    pub fn baseline(&self) -> Option<&BaselineSpec> {
        self.baseline.as_ref()
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
