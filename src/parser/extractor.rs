//! Run extractor for golden test capture text.
//!
//! Scans the whole document line by line. Header lines seal runs, strict
//! `event,TAG,ticks` lines feed the open run and `( N ) cycles total` lines
//! produce end-to-end samples. Everything else (build output, menu text,
//! blank lines) is skipped without complaint.

use super::schema::{EventRecord, Extraction, Run};
use crate::utils::config::{HeaderPolicy, CANONICAL_HEADER, END_TO_END_MARKER};
use log::debug;
use regex::Regex;
use std::sync::OnceLock;

const EVENT_LINE_RE: &str = r"^(\d+),([A-Z_0-9]+),(\d+)$";
const END_TO_END_RE: &str = r"\(\s*(\d+)\s*\)\s+cycles total";

fn event_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EVENT_LINE_RE).expect("event line pattern is valid"))
}

fn end_to_end_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(END_TO_END_RE).expect("end-to-end pattern is valid"))
}

/// Classification of a single trimmed line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Header,
    Event(EventRecord),
    EndToEnd(u64),
    Noise,
}

/// Classify one line of capture text
///
/// **Public** - exposed for tooling that wants to inspect single lines
///
/// The line is trimmed first. Header takes precedence over event lines,
/// which take precedence over end-to-end markers.
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();

    if line == CANONICAL_HEADER {
        return LineKind::Header;
    }

    if let Some(event) = parse_event_line(line) {
        return LineKind::Event(event);
    }

    if line.contains(END_TO_END_MARKER) {
        if let Some(cycles) = parse_end_to_end(line) {
            return LineKind::EndToEnd(cycles);
        }
        debug!("Ignoring malformed end-to-end marker: {:?}", line);
    }

    LineKind::Noise
}

/// Parse a strict `event,TAG,ticks` line
///
/// Returns `None` for anything that is not exactly that shape, including
/// integers that overflow `u64`.
pub fn parse_event_line(line: &str) -> Option<EventRecord> {
    let caps = event_line_re().captures(line)?;

    let event_id = caps[1].parse::<u64>().ok()?;
    let ticks = caps[3].parse::<u64>().ok()?;

    Some(EventRecord::new(event_id, &caps[2], ticks))
}

/// Parse the cycle count out of a `... ( N ) cycles total` line
pub fn parse_end_to_end(line: &str) -> Option<u64> {
    let caps = end_to_end_re().captures(line)?;
    caps[1].parse::<u64>().ok()
}

/// Extract runs and end-to-end samples from a capture
///
/// **Public** - main entry point for extraction
///
/// # Arguments
/// * `text` - Full capture text
/// * `policy` - How event lines outside any header are treated
///
/// # Returns
/// Completed non-empty runs and all end-to-end samples, both in text order.
/// Never fails: unrecognised lines are skipped.
pub fn extract_runs(text: &str, policy: HeaderPolicy) -> Extraction {
    let mut extraction = Extraction::default();

    // `None` means no run is open yet and event lines are dropped
    let mut current: Option<Vec<EventRecord>> = match policy {
        HeaderPolicy::Required => None,
        HeaderPolicy::ImplicitLeadingRun => Some(Vec::new()),
    };
    let mut skipped_events = 0usize;

    for line in text.lines() {
        match classify_line(line) {
            LineKind::Header => {
                if let Some(events) = current.take() {
                    seal_run(&mut extraction.runs, events);
                }
                current = Some(Vec::new());
            }
            LineKind::Event(event) => match current.as_mut() {
                Some(events) => events.push(event),
                None => skipped_events += 1,
            },
            LineKind::EndToEnd(cycles) => extraction.end_to_end_samples.push(cycles),
            LineKind::Noise => {}
        }
    }

    if let Some(events) = current.take() {
        seal_run(&mut extraction.runs, events);
    }

    if skipped_events > 0 {
        debug!(
            "Skipped {} event lines outside any run (no preceding header)",
            skipped_events
        );
    }

    debug!(
        "Extracted {} runs and {} end-to-end samples",
        extraction.runs.len(),
        extraction.end_to_end_samples.len()
    );

    extraction
}

/// Push the accumulated events as a run unless there are none
fn seal_run(runs: &mut Vec<Run>, events: Vec<EventRecord>) {
    if events.is_empty() {
        return;
    }
    debug!("Sealed run {} with {} events", runs.len() + 1, events.len());
    runs.push(Run::new(events));
}
