use crate::output::read_report;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Validate a report JSON file
pub fn validate_report_file(file_path: PathBuf) -> Result<()> {
    println!("Validating report: {}", file_path.display());

    let report = read_report(&file_path)
        .with_context(|| format!("Invalid report {}", file_path.display()))?;

    if report.version != SCHEMA_VERSION {
        log::warn!(
            "Report schema v{} differs from current v{}",
            report.version,
            SCHEMA_VERSION
        );
    }

    println!("✓ Valid report JSON");
    println!("  Version: {}", report.version);
    println!("  Source: {}", report.source);
    println!("  Model: {}", report.model.as_deref().unwrap_or("unknown"));
    println!("  Golden tests: {}", report.golden);
    println!("  Runs: {}", report.run_count);
    println!(
        "  Layers: {} of {} positions",
        report.layers.len(),
        report.expected_layers
    );
    println!("  End-to-end samples: {}", report.end_to_end.samples.len());

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("CFU Layer Profiler Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  source: string             - Capture file analyzed");
        println!("  model: string?             - Model under test");
        println!("  golden: string             - passed | failed | unknown");
        println!("  clock: object              - cycles_per_tick, cpu_freq_hz");
        println!("  run_count: number          - Runs aligned");
        println!("  expected_layers: number    - Length of the first run");
        println!("  layers: array              - Averaged layers in position order");
        println!("    id: number               - Event id");
        println!("    operation: string        - Operation tag");
        println!("    mean_ticks: number       - Mean ticks across runs");
        println!("    std_ticks: number        - Population std of ticks");
        println!("    mean_cycles: number      - mean_ticks x cycles_per_tick");
        println!("    mean_ms: number          - mean_cycles / cpu_freq_hz x 1000");
        println!("    ticks: array             - Per-run ticks");
        println!("  dropped_layers: array      - Positions where runs disagree");
        println!("  end_to_end: object         - samples, mean_cycles, mean_ms, samples_ms");
        println!("  operations: array          - Per-operation totals");
        println!("  generated_at: string       - ISO 8601 timestamp");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("CFU Layer Profiler v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Per-layer profiling analysis for CFU Playground golden test captures.");
}
