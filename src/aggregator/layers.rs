//! Cross-run aggregation of per-event timings into layer statistics.
//!
//! Runs are aligned by position. A position becomes a layer only when every
//! run has an event there and all runs agree on its id and operation.
//! Anything else is dropped from the table and reported in `dropped`;
//! aggregation itself never fails.

use super::stats::{mean, population_std};
use super::units::ClockModel;
use crate::parser::schema::{Extraction, Run};
use crate::utils::error::ConsistencyError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Averaged timing of one sequence position across all runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedLayer {
    /// Event id shared by every run at this position
    pub id: u64,

    /// Operation tag shared by every run at this position
    pub operation: String,

    pub mean_ticks: f64,

    /// Population standard deviation of ticks
    pub std_ticks: f64,

    pub mean_cycles: f64,

    pub mean_ms: f64,

    /// Per-run tick values, in run order
    pub ticks: Vec<u64>,
}

/// Why a position did not make it into the layer table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DropReason {
    /// Some runs are shorter than the first run
    MissingInRuns { runs: Vec<usize> },

    /// Runs disagree on the event id
    IdMismatch { ids: Vec<u64> },

    /// Runs disagree on the operation tag
    OperationMismatch { operations: Vec<String> },
}

impl std::fmt::Display for DropReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropReason::MissingInRuns { runs } => {
                let runs: Vec<String> = runs.iter().map(|r| (r + 1).to_string()).collect();
                write!(f, "missing in run(s) {}", runs.join(", "))
            }
            DropReason::IdMismatch { ids } => {
                let ids: Vec<String> = ids.iter().map(|i| i.to_string()).collect();
                write!(f, "event ids differ ({})", ids.join(", "))
            }
            DropReason::OperationMismatch { operations } => {
                write!(f, "operations differ ({})", operations.join(", "))
            }
        }
    }
}

/// A position left out of the layer table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DroppedLayer {
    /// Zero-based position in the first run
    pub position: usize,
    pub reason: DropReason,
}

/// Whole-execution cycle counts and their average
///
/// All scalars are zero when the capture had no end-to-end lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndToEndStats {
    /// Raw samples in text order
    pub samples: Vec<u64>,

    pub mean_cycles: f64,

    pub mean_ms: f64,

    /// Each sample converted to milliseconds
    pub samples_ms: Vec<f64>,
}

impl EndToEndStats {
    /// Compute statistics from raw cycle samples
    pub fn from_samples(samples: &[u64], clock: &ClockModel) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mean_cycles = mean(samples);
        Self {
            samples: samples.to_vec(),
            mean_cycles,
            mean_ms: clock.cycles_to_ms(mean_cycles),
            samples_ms: samples
                .iter()
                .map(|&c| clock.cycles_to_ms(c as f64))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Result of one analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Number of runs that were aligned
    pub run_count: usize,

    /// Length of the first run
    pub expected_layers: usize,

    /// Layers in position order
    pub layers: Vec<AggregatedLayer>,

    /// Positions that were left out, in position order
    pub dropped: Vec<DroppedLayer>,

    pub end_to_end: EndToEndStats,

    /// Clock model the derived values were computed with
    pub clock: ClockModel,
}

impl Dataset {
    /// True when there is no layer data to report
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Sum of mean ticks across layers
    pub fn total_ticks(&self) -> f64 {
        self.layers.iter().map(|l| l.mean_ticks).sum()
    }

    /// Sum of mean cycles across layers
    pub fn total_cycles(&self) -> f64 {
        self.layers.iter().map(|l| l.mean_cycles).sum()
    }

    /// Strict check: fail if any position was dropped
    ///
    /// **Public** - opt-in; the default pipeline tolerates drops
    pub fn ensure_consistent(&self) -> Result<(), ConsistencyError> {
        if self.dropped.is_empty() {
            return Ok(());
        }

        let details: Vec<String> = self
            .dropped
            .iter()
            .map(|d| format!("position {}: {}", d.position, d.reason))
            .collect();

        Err(ConsistencyError::LayersDropped {
            dropped: self.dropped.len(),
            expected: self.expected_layers,
            runs: self.run_count,
            details: details.join("; "),
        })
    }
}

/// Aggregate runs and end-to-end samples into a dataset
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `runs` - Runs in capture order
/// * `end_to_end_samples` - Whole-execution cycle counts
/// * `clock` - Conversion constants
///
/// # Returns
/// The layer table plus diagnostics. Zero runs give an empty table.
pub fn aggregate_runs(runs: &[Run], end_to_end_samples: &[u64], clock: &ClockModel) -> Dataset {
    let end_to_end = EndToEndStats::from_samples(end_to_end_samples, clock);

    let Some(first) = runs.first() else {
        debug!("No runs to aggregate");
        return Dataset {
            end_to_end,
            clock: *clock,
            ..Default::default()
        };
    };

    let expected_layers = first.len();
    let mut layers = Vec::with_capacity(expected_layers);
    let mut dropped = Vec::new();

    for position in 0..expected_layers {
        match aggregate_position(runs, position, clock) {
            Ok(layer) => layers.push(layer),
            Err(reason) => {
                debug!("Dropping layer position {}: {}", position, reason);
                dropped.push(DroppedLayer { position, reason });
            }
        }
    }

    debug!(
        "Aggregated {} of {} positions across {} runs",
        layers.len(),
        expected_layers,
        runs.len()
    );

    Dataset {
        run_count: runs.len(),
        expected_layers,
        layers,
        dropped,
        end_to_end,
        clock: *clock,
    }
}

/// Aggregate an extractor result
pub fn aggregate(extraction: &Extraction, clock: &ClockModel) -> Dataset {
    aggregate_runs(&extraction.runs, &extraction.end_to_end_samples, clock)
}

/// Average one position, or explain why it cannot be averaged
///
/// **Private** - internal helper for aggregate_runs
fn aggregate_position(
    runs: &[Run],
    position: usize,
    clock: &ClockModel,
) -> Result<AggregatedLayer, DropReason> {
    let missing: Vec<usize> = runs
        .iter()
        .enumerate()
        .filter(|(_, run)| run.get(position).is_none())
        .map(|(index, _)| index)
        .collect();
    if !missing.is_empty() {
        return Err(DropReason::MissingInRuns { runs: missing });
    }

    let events: Vec<_> = runs.iter().filter_map(|run| run.get(position)).collect();
    let reference = events[0];

    if events.iter().any(|e| e.event_id != reference.event_id) {
        return Err(DropReason::IdMismatch {
            ids: events.iter().map(|e| e.event_id).collect(),
        });
    }

    if events.iter().any(|e| e.operation != reference.operation) {
        return Err(DropReason::OperationMismatch {
            operations: events.iter().map(|e| e.operation.clone()).collect(),
        });
    }

    let ticks: Vec<u64> = events.iter().map(|e| e.ticks).collect();
    let mean_ticks = mean(&ticks);
    let mean_cycles = clock.ticks_to_cycles(mean_ticks);

    Ok(AggregatedLayer {
        id: reference.event_id,
        operation: reference.operation.clone(),
        mean_ticks,
        std_ticks: population_std(&ticks),
        mean_cycles,
        mean_ms: clock.cycles_to_ms(mean_cycles),
        ticks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::EventRecord;
    use pretty_assertions::assert_eq;

    fn run(events: &[(u64, &str, u64)]) -> Run {
        Run::new(
            events
                .iter()
                .map(|&(id, op, ticks)| EventRecord::new(id, op, ticks))
                .collect(),
        )
    }

    #[test]
    fn test_three_run_statistics() {
        let runs = vec![
            run(&[(0, "CONV_2D", 10)]),
            run(&[(0, "CONV_2D", 20)]),
            run(&[(0, "CONV_2D", 30)]),
        ];

        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        assert_eq!(dataset.layers.len(), 1);
        let layer = &dataset.layers[0];
        assert_eq!(layer.mean_ticks, 20.0);
        assert!((layer.std_ticks - 8.1650).abs() < 1e-4);
        assert_eq!(layer.mean_cycles, 20480.0);
        assert!((layer.mean_ms - 0.4096).abs() < 1e-9);
        assert_eq!(layer.ticks, vec![10, 20, 30]);
    }

    #[test]
    fn test_operation_mismatch_drops_position() {
        let runs = vec![
            run(&[(0, "CONV_2D", 10), (1, "ADD", 4), (2, "MUL", 7), (3, "SOFTMAX", 1)]),
            run(&[(0, "CONV_2D", 12), (1, "ADD", 6), (2, "ADD", 7), (3, "SOFTMAX", 3)]),
        ];

        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        let ops: Vec<&str> = dataset.layers.iter().map(|l| l.operation.as_str()).collect();
        assert_eq!(ops, vec!["CONV_2D", "ADD", "SOFTMAX"]);
        assert_eq!(
            dataset.dropped,
            vec![DroppedLayer {
                position: 2,
                reason: DropReason::OperationMismatch {
                    operations: vec!["MUL".to_string(), "ADD".to_string()],
                },
            }]
        );
    }

    #[test]
    fn test_id_mismatch_drops_position() {
        let runs = vec![run(&[(0, "ADD", 1), (1, "ADD", 1)]), run(&[(0, "ADD", 1), (5, "ADD", 1)])];

        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        assert_eq!(dataset.layers.len(), 1);
        assert_eq!(
            dataset.dropped[0].reason,
            DropReason::IdMismatch { ids: vec![1, 5] }
        );
    }

    #[test]
    fn test_short_run_drops_trailing_positions() {
        let runs = vec![
            run(&[(0, "ADD", 1), (1, "MUL", 2), (2, "ADD", 3)]),
            run(&[(0, "ADD", 1)]),
        ];

        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        assert_eq!(dataset.expected_layers, 3);
        assert_eq!(dataset.layers.len(), 1);
        assert_eq!(dataset.dropped.len(), 2);
        assert_eq!(
            dataset.dropped[0].reason,
            DropReason::MissingInRuns { runs: vec![1] }
        );
    }

    #[test]
    fn test_longer_later_runs_are_truncated_to_first() {
        let runs = vec![run(&[(0, "ADD", 2)]), run(&[(0, "ADD", 4), (1, "MUL", 9)])];

        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        assert_eq!(dataset.layers.len(), 1);
        assert!(dataset.dropped.is_empty());
        assert_eq!(dataset.layers[0].mean_ticks, 3.0);
    }

    #[test]
    fn test_no_runs_is_empty_not_error() {
        let dataset = aggregate_runs(&[], &[], &ClockModel::default());

        assert!(dataset.is_empty());
        assert_eq!(dataset.run_count, 0);
        assert!(dataset.end_to_end.is_empty());
        assert_eq!(dataset.end_to_end.mean_cycles, 0.0);
        assert!(dataset.ensure_consistent().is_ok());
    }

    #[test]
    fn test_end_to_end_statistics() {
        let dataset = aggregate_runs(&[], &[1_000_000, 3_000_000], &ClockModel::default());

        assert_eq!(dataset.end_to_end.mean_cycles, 2_000_000.0);
        assert!((dataset.end_to_end.mean_ms - 40.0).abs() < 1e-9);
        assert_eq!(dataset.end_to_end.samples_ms.len(), 2);
        assert!((dataset.end_to_end.samples_ms[0] - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_ensure_consistent_reports_drops() {
        let runs = vec![run(&[(0, "ADD", 1)]), run(&[(0, "MUL", 1)])];
        let dataset = aggregate_runs(&runs, &[], &ClockModel::default());

        let err = dataset.ensure_consistent().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("1 of 1 layer positions"));
        assert!(message.contains("operations differ (ADD, MUL)"));
    }
}
