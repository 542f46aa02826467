//! Capture file reading and pre-processing.
//!
//! Captures are raw serial console output from `make load`. They may contain
//! invalid UTF-8 (terminal escapes cut mid-sequence), menu output before the
//! board boots, and the golden test verdict at the end.

use crate::utils::config::{GOLDEN_FAILED_MARKER, GOLDEN_PASSED_MARKER, LIFTOFF_MARKER};
use crate::utils::error::CaptureError;
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

const MODEL_NAME_RE: &str = r"Tests for (\w+) model";

/// Outcome of the golden tests as reported in the capture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoldenStatus {
    Passed,
    Failed,
    #[default]
    Unknown,
}

impl std::fmt::Display for GoldenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoldenStatus::Passed => write!(f, "passed"),
            GoldenStatus::Failed => write!(f, "failed"),
            GoldenStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Descriptive facts about a capture that sit outside the timing data
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureMetadata {
    /// Model name announced by the test menu, if any
    pub model: Option<String>,

    /// Golden test verdict
    pub golden: GoldenStatus,
}

/// Read a capture file, dropping undecodable byte sequences
///
/// **Public** - the only I/O on the input side
///
/// # Errors
/// * `CaptureError::IsDirectory` - Path points at a directory
/// * `CaptureError::ReadFailed` - File missing or unreadable
pub fn read_capture(path: impl AsRef<Path>) -> Result<String, CaptureError> {
    let path = path.as_ref();

    if path.is_dir() {
        return Err(CaptureError::IsDirectory(path.display().to_string()));
    }

    let bytes = std::fs::read(path).map_err(|source| CaptureError::ReadFailed {
        path: path.display().to_string(),
        source,
    })?;

    info!("Read capture {} ({} bytes)", path.display(), bytes.len());

    Ok(decode_lossy(&bytes))
}

/// Decode bytes as UTF-8, silently skipping invalid sequences
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// Keep only the text from the line holding the last `Liftoff!` marker
///
/// The board prints `Liftoff!` on every boot; earlier boots in the same
/// capture are stale. Returns the input unchanged when there is no marker.
pub fn trim_to_liftoff(text: &str) -> &str {
    match text.rfind(LIFTOFF_MARKER) {
        Some(idx) => {
            let line_start = text[..idx].rfind('\n').map(|nl| nl + 1).unwrap_or(0);
            debug!("Trimming capture to last liftoff at byte {}", line_start);
            &text[line_start..]
        }
        None => text,
    }
}

/// Model name from a `Tests for <model> model` line
pub fn extract_model_name(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(MODEL_NAME_RE).expect("model name pattern is valid"));

    re.captures(text).map(|caps| caps[1].to_string())
}

/// Model name derived from a capture file name (`profile_pdti8.txt` -> `pdti8`)
pub fn model_name_from_path(path: impl AsRef<Path>) -> Option<String> {
    let stem = path.as_ref().file_stem()?.to_str()?;
    let name = stem.strip_prefix("profile_").unwrap_or(stem);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Golden test verdict; a failure anywhere wins over a pass
pub fn detect_golden_status(text: &str) -> GoldenStatus {
    if text.contains(GOLDEN_FAILED_MARKER) {
        GoldenStatus::Failed
    } else if text.contains(GOLDEN_PASSED_MARKER) {
        GoldenStatus::Passed
    } else {
        GoldenStatus::Unknown
    }
}

/// Collect capture metadata in one pass over the text
pub fn inspect_capture(text: &str) -> CaptureMetadata {
    CaptureMetadata {
        model: extract_model_name(text),
        golden: detect_golden_status(text),
    }
}
