//! Rankings and summaries derived from the layer table.
//!
//! Bottlenecks are the layers that consume the most ticks.
//! These are the primary targets for acceleration.

use super::layers::AggregatedLayer;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A layer ranked by its share of the layer-summed ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bottleneck {
    pub id: u64,
    pub operation: String,
    pub mean_ticks: f64,

    /// Percentage of the layer-summed ticks
    pub percentage: f64,

    /// Running percentage including every higher-ranked layer
    pub cumulative_percentage: f64,
}

/// Per-operation totals over all layers with that tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationSummary {
    pub operation: String,
    pub total_ticks: f64,
    pub count: usize,
    pub mean_ticks: f64,
}

/// Rank layers by mean ticks, largest first
///
/// **Public** - main entry point for bottleneck ranking
///
/// Ties keep position order.
pub fn rank_bottlenecks(layers: &[AggregatedLayer]) -> Vec<Bottleneck> {
    let total: f64 = layers.iter().map(|l| l.mean_ticks).sum();

    let mut sorted: Vec<&AggregatedLayer> = layers.iter().collect();
    sorted.sort_by(|a, b| b.mean_ticks.total_cmp(&a.mean_ticks));

    let mut cumulative = 0.0;
    sorted
        .into_iter()
        .map(|layer| {
            cumulative += layer.mean_ticks;
            create_bottleneck(layer, cumulative, total)
        })
        .collect()
}

/// Create a Bottleneck from a layer and the running tick sum
///
/// **Private** - internal conversion
fn create_bottleneck(layer: &AggregatedLayer, cumulative_ticks: f64, total_ticks: f64) -> Bottleneck {
    Bottleneck {
        id: layer.id,
        operation: layer.operation.clone(),
        mean_ticks: layer.mean_ticks,
        percentage: percent_of(layer.mean_ticks, total_ticks),
        cumulative_percentage: percent_of(cumulative_ticks, total_ticks),
    }
}

/// Group layers by operation, largest total first (ties by name)
pub fn summarize_operations(layers: &[AggregatedLayer]) -> Vec<OperationSummary> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for layer in layers {
        let entry = groups.entry(layer.operation.as_str()).or_insert((0.0, 0));
        entry.0 += layer.mean_ticks;
        entry.1 += 1;
    }

    let mut summaries: Vec<OperationSummary> = groups
        .into_iter()
        .map(|(operation, (total_ticks, count))| OperationSummary {
            operation: operation.to_string(),
            total_ticks,
            count,
            mean_ticks: total_ticks / count as f64,
        })
        .collect();

    // BTreeMap order makes the stable sort break ties by name
    summaries.sort_by(|a, b| b.total_ticks.total_cmp(&a.total_ticks));

    debug!("Summarized {} operations", summaries.len());
    summaries
}

/// Split the end-to-end time across operations by tick share
///
/// Returns `(operation, ms)` pairs in summary order, or nothing when there is
/// no end-to-end time to split.
pub fn operation_time_share(summaries: &[OperationSummary], end_to_end_ms: f64) -> Vec<(String, f64)> {
    let total: f64 = summaries.iter().map(|s| s.total_ticks).sum();
    if end_to_end_ms <= 0.0 || total <= 0.0 {
        return Vec::new();
    }

    summaries
        .iter()
        .map(|s| (s.operation.clone(), s.total_ticks / total * end_to_end_ms))
        .collect()
}

/// Number of leading operations needed to reach `percent` of all ticks
pub fn pareto_cutoff(summaries: &[OperationSummary], percent: f64) -> usize {
    let total: f64 = summaries.iter().map(|s| s.total_ticks).sum();
    if total <= 0.0 {
        return 0;
    }

    let mut cumulative = 0.0;
    for (index, summary) in summaries.iter().enumerate() {
        cumulative += summary.total_ticks;
        if percent_of(cumulative, total) >= percent {
            return index + 1;
        }
    }
    summaries.len()
}

/// Calculate tick distribution statistics
///
/// **Public** - provides summary statistics for logging
pub fn calculate_tick_distribution(layers: &[AggregatedLayer]) -> TickDistribution {
    if layers.is_empty() {
        return TickDistribution::default();
    }

    let total_ticks: f64 = layers.iter().map(|l| l.mean_ticks).sum();
    let total_cycles: f64 = layers.iter().map(|l| l.mean_cycles).sum();
    let max_ticks = layers.iter().map(|l| l.mean_ticks).fold(0.0, f64::max);

    TickDistribution {
        total_ticks,
        total_cycles,
        layer_count: layers.len(),
        mean_ticks_per_layer: total_ticks / layers.len() as f64,
        top_layer_percentage: percent_of(max_ticks, total_ticks),
    }
}

/// Tick distribution statistics
///
/// **Public** - returned from calculate_tick_distribution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickDistribution {
    /// Layer-summed mean ticks
    pub total_ticks: f64,

    /// Layer-summed mean cycles
    pub total_cycles: f64,

    pub layer_count: usize,

    pub mean_ticks_per_layer: f64,

    /// Share of the single most expensive layer
    pub top_layer_percentage: f64,
}

impl TickDistribution {
    /// Get human-readable summary
    ///
    /// **Public** - for logging and debugging
    pub fn summary(&self) -> String {
        format!(
            "Total: {:.0} ticks ({:.0} cycles) | Layers: {} | Mean: {:.1} | Top layer: {:.1}%",
            self.total_ticks,
            self.total_cycles,
            self.layer_count,
            self.mean_ticks_per_layer,
            self.top_layer_percentage
        )
    }
}

fn percent_of(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}
