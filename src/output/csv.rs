//! CSV export of the layer table.
//!
//! One row per layer, followed by a `TOTAL_LAYERS` row and an `END_TO_END`
//! row that share the same columns. Cells that do not apply are left blank.

use super::prepare_output_path;
use crate::aggregator::{AggregatedLayer, Dataset};
use crate::utils::error::OutputError;
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const COLUMNS: [&str; 8] = [
    "id",
    "operation",
    "ticks",
    "cycles",
    "std",
    "ticks_list",
    "end_to_end_cycles",
    "end_to_end_ms",
];

/// Render the dataset as CSV text
///
/// # Errors
/// * `OutputError::NoData` - The dataset has no layers
pub fn render_csv(dataset: &Dataset) -> Result<String, OutputError> {
    let mut buffer = Vec::new();
    write_rows(dataset, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the dataset as CSV to a file
///
/// **Public** - main entry point for CSV output
///
/// # Errors
/// * `OutputError::NoData` - The dataset has no layers
/// * `OutputError::InvalidPath` / `OutputError::WriteFailed` - I/O problems
/// * `OutputError::CsvFailed` - Record could not be written
pub fn write_csv(dataset: &Dataset, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    if dataset.is_empty() {
        return Err(OutputError::NoData);
    }

    info!("Writing CSV to: {}", output_path.display());
    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    write_rows(dataset, BufWriter::new(file))
}

/// Header, one row per layer, then the two summary rows
fn write_rows<W: Write>(dataset: &Dataset, sink: W) -> Result<(), OutputError> {
    if dataset.is_empty() {
        return Err(OutputError::NoData);
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(COLUMNS)?;

    // Summed as f64 so huge tick counts cannot overflow
    let mut total_cycles = 0.0;
    for layer in &dataset.layers {
        let cycles = layer.mean_cycles.round_ties_even();
        total_cycles += cycles;
        writer.write_record(layer_cells(layer, cycles))?;
    }

    writer.write_record(summary_cells(
        "TOTAL_LAYERS",
        Some(format_count(total_cycles)),
        None,
        None,
    ))?;

    let (e2e_cycles, e2e_ms) = if dataset.end_to_end.is_empty() {
        (None, None)
    } else {
        (
            Some(format_count(dataset.end_to_end.mean_cycles)),
            Some(format_float(dataset.end_to_end.mean_ms)),
        )
    };
    writer.write_record(summary_cells("END_TO_END", None, e2e_cycles, e2e_ms))?;

    writer
        .into_inner()
        .map_err(|e| OutputError::WriteFailed(e.into_error()))?
        .flush()?;

    Ok(())
}

fn layer_cells(layer: &AggregatedLayer, cycles: f64) -> [String; 8] {
    let ticks_list: Vec<String> = layer.ticks.iter().map(|t| t.to_string()).collect();
    [
        layer.id.to_string(),
        layer.operation.clone(),
        format_count(layer.mean_ticks),
        format_count(cycles),
        format!("{:.2}", layer.std_ticks),
        format!("[{}]", ticks_list.join(", ")),
        String::new(),
        String::new(),
    ]
}

fn summary_cells(
    label: &str,
    cycles: Option<String>,
    e2e_cycles: Option<String>,
    e2e_ms: Option<String>,
) -> [String; 8] {
    [
        String::new(),
        label.to_string(),
        String::new(),
        cycles.unwrap_or_default(),
        String::new(),
        String::new(),
        e2e_cycles.unwrap_or_default(),
        e2e_ms.unwrap_or_default(),
    ]
}

/// Integer cell, rounded half to even; exact for values past `u64::MAX`
fn format_count(value: f64) -> String {
    let rounded = value.round_ties_even();
    if rounded > 0.0 {
        format!("{:.0}", rounded)
    } else {
        "0".to_string()
    }
}

/// Float cell that always carries a decimal point (`20.0`, `0.4096`)
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
