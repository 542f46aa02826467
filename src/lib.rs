//! CFU Layer Profiler
//!
//! Per-layer profiling analysis for CFU Playground golden test captures.
//!
//! A capture holds several runs of the same model, each introduced by a
//! `"Event","Tag","Ticks"` header and followed by `event,TAG,ticks` lines,
//! mixed with build and console noise. This crate extracts the runs,
//! averages them position by position and derives cycle/time figures,
//! rankings and report files.
//!
//! ## Getting Started
//!
//! ```bash
//! cfu-profile analyze profiling/archive/abc123/profile_pdti8.txt --all-outputs
//! ```
//!
//! As a library:
//!
//! ```ignore
//! use cfu_layer_profiler::{analyze_text, AnalysisConfig};
//!
//! let dataset = analyze_text(&text, &AnalysisConfig::default());
//! for layer in &dataset.layers {
//!     println!("{} {} {:.3} ms", layer.id, layer.operation, layer.mean_ms);
//! }
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;

pub use aggregator::{AggregatedLayer, ClockModel, Dataset};
pub use parser::{EventRecord, Extraction, Run};
pub use utils::config::{AnalysisConfig, HeaderPolicy};

/// Run the full pipeline on capture text
///
/// Extraction and aggregation never fail; an empty dataset means the text
/// held no usable runs. The strict check is left to the caller
/// (`Dataset::ensure_consistent`).
pub fn analyze_text(text: &str, config: &AnalysisConfig) -> Dataset {
    let extraction = parser::extract_runs(text, config.header_policy);
    aggregator::aggregate(&extraction, &config.clock)
}
