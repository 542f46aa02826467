//! Output JSON schema definitions for layer profiles.
//!
//! This module defines the structure of JSON files we write to disk.
//! Schema is versioned to allow future evolution.

use crate::aggregator::{
    summarize_operations, AggregatedLayer, ClockModel, Dataset, DroppedLayer, EndToEndStats,
    OperationSummary,
};
use crate::parser::{CaptureMetadata, GoldenStatus};
use crate::utils::config::SCHEMA_VERSION;
use serde::{Deserialize, Serialize};

/// Top-level profile report written to JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    /// Schema version for compatibility checking
    pub version: String,

    /// Capture the report was built from
    pub source: String,

    /// Model under test, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Golden test verdict found in the capture
    pub golden: GoldenStatus,

    /// Conversion constants behind every derived value
    pub clock: ClockModel,

    pub run_count: usize,

    /// Length of the first run
    pub expected_layers: usize,

    /// Averaged layers in position order
    pub layers: Vec<AggregatedLayer>,

    /// Positions left out of `layers`
    #[serde(default)]
    pub dropped_layers: Vec<DroppedLayer>,

    pub end_to_end: EndToEndStats,

    /// Per-operation totals, largest first
    pub operations: Vec<OperationSummary>,

    /// Timestamp when report was generated
    pub generated_at: String,
}

/// Convert a dataset to the output report format
///
/// **Public** - used by commands to create final output
pub fn to_report(dataset: &Dataset, source: impl Into<String>, metadata: &CaptureMetadata) -> ProfileReport {
    use chrono::Utc;

    ProfileReport {
        version: SCHEMA_VERSION.to_string(),
        source: source.into(),
        model: metadata.model.clone(),
        golden: metadata.golden,
        clock: dataset.clock,
        run_count: dataset.run_count,
        expected_layers: dataset.expected_layers,
        layers: dataset.layers.clone(),
        dropped_layers: dataset.dropped.clone(),
        end_to_end: dataset.end_to_end.clone(),
        operations: summarize_operations(&dataset.layers),
        generated_at: Utc::now().to_rfc3339(),
    }
}
