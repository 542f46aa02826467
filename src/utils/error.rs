//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Nothing in the extraction or aggregation core returns an error: noisy
//! capture text degrades silently. These types cover the I/O boundary,
//! configuration and the opt-in strict check.

use thiserror::Error;

/// Errors that can occur while reading a capture file
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Failed to read capture {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Capture path is a directory: {0}")]
    IsDirectory(String),
}

/// Errors that can occur while loading or validating analysis configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Raised by the strict check when positions were dropped during aggregation
#[derive(Error, Debug)]
pub enum ConsistencyError {
    #[error("{dropped} of {expected} layer positions disagree across {runs} runs: {details}")]
    LayersDropped {
        dropped: usize,
        expected: usize,
        runs: usize,
        details: String,
    },
}

/// Errors that can occur during chart generation
#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No layer data to chart")]
    EmptyData,

    #[error("Chart size {width}x{height} is below the minimum {min_width}x{min_height}")]
    TooSmall {
        width: usize,
        height: usize,
        min_width: usize,
        min_height: usize,
    },
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("No layer data to export")]
    NoData,
}
