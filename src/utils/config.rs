//! Configuration and constants for the analyzer.

use crate::aggregator::units::ClockModel;
use crate::utils::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current output schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

/// CSV header the firmware prints at the start of every profiled run
pub const CANONICAL_HEADER: &str = r#""Event","Tag","Ticks""#;

// Hardware documentation: 1 tick = 1024 cycles
pub const DEFAULT_CYCLES_PER_TICK: u64 = 1024;

// Assumed soft-CPU clock. Known simplification, the real board clock may differ.
pub const DEFAULT_CPU_FREQ_HZ: u64 = 50_000_000;

// Markers emitted around the golden tests
pub const LIFTOFF_MARKER: &str = "Liftoff!";
pub const GOLDEN_PASSED_MARKER: &str = "Golden tests passed";
pub const GOLDEN_FAILED_MARKER: &str = "Golden tests failed";
pub const END_TO_END_MARKER: &str = "cycles total";

/// Share of total ticks the Pareto chart marks
pub const PARETO_THRESHOLD_PERCENT: f64 = 80.0;

// Smallest chart that still fits both panels and the time box
pub const MIN_CHART_WIDTH: usize = 800;
pub const MIN_CHART_HEIGHT: usize = 400;

/// How event lines that appear before the first header are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
    /// Only a header opens a run. Event lines before the first header are
    /// ignored and a document without any header yields no runs.
    #[default]
    Required,

    /// A run is open from the start of the document, so leading event lines
    /// form a run and a header-less document becomes a single run.
    ImplicitLeadingRun,
}

/// Complete analysis configuration
///
/// Loaded from TOML; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tick/cycle/time conversion constants
    pub clock: ClockModel,

    /// Treatment of event lines outside any header
    pub header_policy: HeaderPolicy,

    /// Fail when any layer position is dropped during aggregation
    pub strict: bool,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(mut self, clock: ClockModel) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_header_policy(mut self, policy: HeaderPolicy) -> Self {
        self.header_policy = policy;
        self
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reject values that would make unit conversion meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.cycles_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "clock.cycles_per_tick must be greater than 0".to_string(),
            ));
        }
        if self.clock.cpu_freq_hz == 0 {
            return Err(ConfigError::Invalid(
                "clock.cpu_freq_hz must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load analysis configuration from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::ParseFailed` - If TOML is invalid
/// * `ConfigError::Invalid` - If a clock value is zero
///
/// # Example
/// ```ignore
/// let config = load_config("profiling.toml")?;
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AnalysisConfig, ConfigError> {
    let path = path.as_ref();
    debug!("Loading analysis config from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(contents: &str) -> Result<AnalysisConfig, ConfigError> {
    let config: AnalysisConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}
