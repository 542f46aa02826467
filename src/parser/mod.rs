//! Capture parsing.
//!
//! This module handles:
//! - Reading capture files (lossy UTF-8)
//! - Trimming to the last boot and reading capture metadata
//! - Extracting per-run event tables and end-to-end cycle counts

pub mod capture;
pub mod extractor;
pub mod schema;

// Re-export main types
pub use capture::{
    detect_golden_status, extract_model_name, inspect_capture, model_name_from_path,
    read_capture, trim_to_liftoff, CaptureMetadata, GoldenStatus,
};
pub use extractor::{classify_line, extract_runs, parse_end_to_end, parse_event_line, LineKind};
pub use schema::{EventRecord, Extraction, Run};
