use crate::chart::ChartConfig;
use crate::utils::config::AnalysisConfig;
use std::path::{Path, PathBuf};

/// Arguments for the analyze command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    /// Capture text file to analyze
    pub input: PathBuf,

    /// Output path for JSON report (optional)
    pub output_json: Option<PathBuf>,

    /// Output path for CSV layer table (optional)
    pub output_csv: Option<PathBuf>,

    /// Output path for SVG chart (optional)
    pub output_chart: Option<PathBuf>,

    /// Chart configuration
    pub chart_config: ChartConfig,

    /// Clock model, header policy and strictness
    pub config: AnalysisConfig,

    /// Drop everything before the last `Liftoff!` line
    pub from_liftoff: bool,

    /// Print text summary to stdout
    pub print_summary: bool,

    /// Rows of the bottleneck table in the text summary
    pub summary_rows: usize,

    /// Colour operation names in the text summary
    pub color: bool,
}

impl Default for AnalyzeArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output_json: None,
            output_csv: None,
            output_chart: None,
            chart_config: ChartConfig::default(),
            config: AnalysisConfig::default(),
            from_liftoff: false,
            print_summary: true,
            summary_rows: 50,
            color: false,
        }
    }
}

impl AnalyzeArgs {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            ..Default::default()
        }
    }

    /// Write JSON, CSV and SVG next to the input, named after its stem
    ///
    /// Paths that were already set are kept.
    pub fn with_all_outputs(mut self) -> Self {
        let (json, csv, svg) = default_output_paths(&self.input);
        self.output_json.get_or_insert(json);
        self.output_csv.get_or_insert(csv);
        self.output_chart.get_or_insert(svg);
        self
    }

    /// All requested output paths
    pub fn outputs(&self) -> impl Iterator<Item = &PathBuf> {
        [&self.output_json, &self.output_csv, &self.output_chart]
            .into_iter()
            .flatten()
    }
}

/// `dir/profile_x.txt` -> `dir/profile_x.{json,csv,svg}`
pub fn default_output_paths(input: &Path) -> (PathBuf, PathBuf, PathBuf) {
    (
        input.with_extension("json"),
        input.with_extension("csv"),
        input.with_extension("svg"),
    )
}
