//! Raw records recovered from capture text.
//!
//! These are the extractor's output and the aggregator's input.
//! All of them are plain owned data.

use serde::{Deserialize, Serialize};

/// One `event,TAG,ticks` line of one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event number printed by the firmware (unique within a run only)
    pub event_id: u64,

    /// Operation tag, e.g. `CONV_2D`
    pub operation: String,

    /// Hardware tick count for the event
    pub ticks: u64,
}

impl EventRecord {
    pub fn new(event_id: u64, operation: impl Into<String>, ticks: u64) -> Self {
        Self {
            event_id,
            operation: operation.into(),
            ticks,
        }
    }
}

/// One captured execution: events in the order they were printed.
///
/// Position in `events` is the alignment key across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub events: Vec<EventRecord>,
}

impl Run {
    pub fn new(events: Vec<EventRecord>) -> Self {
        Self { events }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Event at a sequence position, if this run is long enough
    pub fn get(&self, position: usize) -> Option<&EventRecord> {
        self.events.get(position)
    }
}

/// Everything the extractor recovered from one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extraction {
    /// Completed, non-empty runs in text order
    pub runs: Vec<Run>,

    /// End-to-end cycle counts in text order
    pub end_to_end_samples: Vec<u64>,
}

impl Extraction {
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty() && self.end_to_end_samples.is_empty()
    }
}
