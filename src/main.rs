//! CFU Layer Profiler CLI
//!
//! Analyzes golden test captures from CFU Playground boards.
//! Produces per-layer timing tables, rankings, CSV/JSON reports and charts.

use anyhow::{Context, Result};
use cfu_layer_profiler::chart::ChartConfig;
use cfu_layer_profiler::commands::{
    display_schema, display_version, execute_analyze, validate_args, validate_report_file,
    AnalyzeArgs,
};
use cfu_layer_profiler::utils::config::{load_config, AnalysisConfig, HeaderPolicy};
use cfu_layer_profiler::ClockModel;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

/// CFU Layer Profiler - per-layer profiling for CFU Playground
#[derive(Parser, Debug)]
#[command(name = "cfu-profile")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a captured golden test output
    Analyze {
        /// Capture text file (e.g. profiling/archive/<commit>/profile_pdti8.txt)
        input: PathBuf,

        /// Output path for JSON report
        #[arg(long)]
        json: Option<PathBuf>,

        /// Output path for CSV layer table
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Output path for SVG chart
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Write <stem>.json, <stem>.csv and <stem>.svg next to the input
        #[arg(long)]
        all_outputs: bool,

        /// Chart title
        #[arg(long)]
        title: Option<String>,

        /// Chart width in pixels
        #[arg(long, default_value = "1600")]
        width: usize,

        /// Analysis config file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// CPU cycles per profiling tick (overrides config)
        #[arg(long)]
        cycles_per_tick: Option<u64>,

        /// Assumed CPU clock in Hz (overrides config)
        #[arg(long)]
        cpu_freq_hz: Option<u64>,

        /// Treat event lines before the first header as a run
        #[arg(long)]
        implicit_run: bool,

        /// Fail if runs disagree at any layer position
        #[arg(long)]
        strict: bool,

        /// Ignore everything before the last "Liftoff!" line
        #[arg(long)]
        from_liftoff: bool,

        /// Do not print the text summary
        #[arg(short, long)]
        quiet: bool,

        /// Rows in the bottleneck table
        #[arg(long, default_value = "50")]
        rows: usize,

        /// Colour operation names in the text summary
        #[arg(long)]
        color: bool,
    },

    /// Validate a report JSON file
    Validate {
        /// Path to report JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display schema information
    Schema {
        /// Show full schema details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            input,
            json,
            csv,
            chart,
            all_outputs,
            title,
            width,
            config,
            cycles_per_tick,
            cpu_freq_hz,
            implicit_run,
            strict,
            from_liftoff,
            quiet,
            rows,
            color,
        } => {
            // Config file first, then flag overrides
            let mut analysis = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => AnalysisConfig::default(),
            };

            if cycles_per_tick.is_some() || cpu_freq_hz.is_some() {
                analysis.clock = ClockModel::new(
                    cycles_per_tick.unwrap_or(analysis.clock.cycles_per_tick),
                    cpu_freq_hz.unwrap_or(analysis.clock.cpu_freq_hz),
                )?;
            }
            if implicit_run {
                analysis.header_policy = HeaderPolicy::ImplicitLeadingRun;
            }
            if strict {
                analysis.strict = true;
            }

            let mut chart_config = ChartConfig::new();
            if let Some(title_str) = title {
                chart_config = chart_config.with_title(title_str);
            }
            chart_config.width = width;

            let mut args = AnalyzeArgs {
                input,
                output_json: json,
                output_csv: csv,
                output_chart: chart,
                chart_config,
                config: analysis,
                from_liftoff,
                print_summary: !quiet,
                summary_rows: rows,
                color,
            };
            if all_outputs {
                args = args.with_all_outputs();
            }

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_report_file(file)?;
        }

        Commands::Schema { show } => {
            display_schema(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
