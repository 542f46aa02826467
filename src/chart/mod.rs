//! Chart and terminal summary rendering.
//!
//! Turns a dataset into an SVG profiling chart and a text summary.
//! Both are views over the same rankings from `aggregator::metrics`.

pub mod generator;

// Re-export main types
pub use generator::{generate_chart, generate_text_summary, group_thousands, ChartConfig};
