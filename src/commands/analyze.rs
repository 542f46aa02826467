//! Analyze command implementation.
//!
//! The analyze command:
//! 1. Reads the capture (lossy UTF-8)
//! 2. Extracts runs and end-to-end samples
//! 3. Aggregates runs into the layer table
//! 4. Ranks layers and prints the summary
//! 5. Writes output files

use super::models::AnalyzeArgs;
use crate::aggregator::{aggregate, calculate_tick_distribution, Dataset};
use crate::chart::{generate_chart, generate_text_summary};
use crate::output::{to_report, write_csv, write_report, write_svg};
use crate::parser::{
    extract_runs, inspect_capture, model_name_from_path, read_capture, trim_to_liftoff,
};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::time::Instant;

/// Execute the analyze command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// The dataset that was reported on
///
/// # Errors
/// * Capture file unreadable
/// * Strict mode enabled and some layer positions were dropped
/// * File write errors
pub fn execute_analyze(args: AnalyzeArgs) -> Result<Dataset> {
    let start_time = Instant::now();

    info!("Analyzing capture: {}", args.input.display());

    // Step 1: Read capture
    info!("Step 1/5: Reading capture...");
    let raw = read_capture(&args.input).context("Failed to read capture")?;
    let text: &str = if args.from_liftoff {
        trim_to_liftoff(&raw)
    } else {
        &raw
    };

    let mut metadata = inspect_capture(text);
    if metadata.model.is_none() {
        metadata.model = model_name_from_path(&args.input);
    }
    debug!(
        "Model: {}, golden tests: {}",
        metadata.model.as_deref().unwrap_or("unknown"),
        metadata.golden
    );

    // Step 2: Extract runs
    info!("Step 2/5: Extracting runs...");
    let extraction = extract_runs(text, args.config.header_policy);
    if extraction.run_count() > 1 {
        info!("Averaging {} golden test runs...", extraction.run_count());
    }

    // Step 3: Aggregate
    info!("Step 3/5: Aggregating layers...");
    let dataset = aggregate(&extraction, &args.config.clock);

    if !dataset.dropped.is_empty() {
        if args.config.strict {
            dataset
                .ensure_consistent()
                .context("Runs are not structurally identical")?;
        }
        warn!(
            "Dropped {} of {} layer positions where runs disagree",
            dataset.dropped.len(),
            dataset.expected_layers
        );
    }

    if dataset.is_empty() {
        warn!("No layer data found in {}", args.input.display());
    } else {
        info!("Averaged {} layers", dataset.layers.len());
        info!(
            "Tick distribution: {}",
            calculate_tick_distribution(&dataset.layers).summary()
        );
    }

    // Step 4: Summary
    if args.print_summary {
        info!("Step 4/5: Ranking layers...");
        println!(
            "\n{}",
            generate_text_summary(&dataset, args.summary_rows, args.color)
        );
    } else {
        info!("Step 4/5: Skipping text summary (not requested)");
    }

    // Step 5: Write outputs
    info!("Step 5/5: Writing output files...");

    if let Some(json_path) = &args.output_json {
        let report = to_report(&dataset, args.input.display().to_string(), &metadata);
        write_report(&report, json_path).context("Failed to write JSON report")?;
        info!("✓ Report written to: {}", json_path.display());
    }

    if dataset.is_empty() {
        if args.output_csv.is_some() || args.output_chart.is_some() {
            warn!("No data to export, skipping CSV and chart");
        }
    } else {
        if let Some(csv_path) = &args.output_csv {
            write_csv(&dataset, csv_path).context("Failed to write CSV")?;
            info!("✓ CSV written to: {}", csv_path.display());
        }

        if let Some(chart_path) = &args.output_chart {
            let config = args.chart_config.clone().with_model(metadata.model.clone());
            let svg = generate_chart(&dataset, Some(&config)).context("Failed to generate chart")?;
            write_svg(&svg, chart_path).context("Failed to write chart SVG")?;
            info!("✓ Chart written to: {}", chart_path.display());
        }
    }

    let elapsed = start_time.elapsed();
    info!("Analysis completed in {:.2}s", elapsed.as_secs_f64());

    Ok(dataset)
}

/// Validate analyze arguments
///
/// **Public** - can be called before execute_analyze for early validation
pub fn validate_args(args: &AnalyzeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input capture path cannot be empty");
    }

    if !args.input.is_file() {
        anyhow::bail!("Capture not found: {}", args.input.display());
    }

    if args.outputs().any(|p| p == &args.input) {
        anyhow::bail!("An output path would overwrite the input capture");
    }

    if args.summary_rows == 0 {
        anyhow::bail!("summary_rows must be greater than 0");
    }

    if args.summary_rows > 1000 {
        anyhow::bail!("summary_rows is too large (max 1000)");
    }

    args.config
        .validate()
        .context("Invalid analysis configuration")?;

    if args.output_chart.is_some() {
        args.chart_config
            .validate()
            .context("Invalid chart configuration")?;
    }

    Ok(())
}
