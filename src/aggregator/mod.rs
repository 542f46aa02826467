//! Aggregation of extracted runs into layer statistics and rankings.
//!
//! This module transforms per-run event tables into:
//! - An averaged layer table with dropped-position diagnostics
//! - End-to-end cycle and time statistics
//! - Bottleneck and per-operation rankings

pub mod layers;
pub mod metrics;
pub mod stats;
pub mod units;

// Re-export main types and functions
pub use layers::{
    aggregate, aggregate_runs, AggregatedLayer, Dataset, DropReason, DroppedLayer, EndToEndStats,
};
pub use metrics::{
    calculate_tick_distribution, operation_time_share, pareto_cutoff, rank_bottlenecks,
    summarize_operations, Bottleneck, OperationSummary, TickDistribution,
};
pub use units::ClockModel;
