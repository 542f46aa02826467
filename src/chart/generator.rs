//! SVG profiling chart and terminal summary generation.
//!
//! The chart is rendered by hand rather than through a plotting crate:
//! - Left panel: total ticks per operation (bars)
//! - Right panel: Pareto line of cumulative tick share with the 80% mark
//! - Text box with end-to-end time split across operations

use crate::aggregator::{
    operation_time_share, pareto_cutoff, rank_bottlenecks, summarize_operations, Dataset,
    OperationSummary,
};
use crate::utils::config::{MIN_CHART_HEIGHT, MIN_CHART_WIDTH, PARETO_THRESHOLD_PERCENT};
use crate::utils::error::ChartError;
use log::info;

/// Chart configuration
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,

    /// Appended to the title in parentheses
    pub model: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: "CFU Playground - Profiling Summary".to_string(),
            width: 1600,
            height: 600,
            model: None,
        }
    }
}

impl ChartConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Reject sizes too small to lay out the panels
    pub fn validate(&self) -> Result<(), ChartError> {
        if self.width < MIN_CHART_WIDTH || self.height < MIN_CHART_HEIGHT {
            return Err(ChartError::TooSmall {
                width: self.width,
                height: self.height,
                min_width: MIN_CHART_WIDTH,
                min_height: MIN_CHART_HEIGHT,
            });
        }
        Ok(())
    }

    /// Title including the model name, if any
    pub fn full_title(&self) -> String {
        match &self.model {
            Some(model) => format!("{} ({})", self.title, model),
            None => self.title.clone(),
        }
    }
}

/// Plot area of one panel
struct Panel {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Panel {
    fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Centre x of the i-th of n equal slots
    fn slot_center(&self, index: usize, slots: usize) -> f64 {
        let slot = self.width / slots as f64;
        self.left + slot * (index as f64 + 0.5)
    }
}

/// Generate the SVG chart for a dataset
///
/// # Errors
/// * `ChartError::EmptyData` - The dataset has no layers
/// * `ChartError::TooSmall` - Width or height below the layout minimum
pub fn generate_chart(dataset: &Dataset, config: Option<&ChartConfig>) -> Result<String, ChartError> {
    if dataset.is_empty() {
        return Err(ChartError::EmptyData);
    }

    let config = config.cloned().unwrap_or_default();
    config.validate()?;
    let summaries = summarize_operations(&dataset.layers);
    info!("Generating chart for {} operations", summaries.len());

    let width = config.width as f64;
    let height = config.height as f64;
    let label_space = 110.0;
    let left = Panel {
        left: 80.0,
        top: 70.0,
        width: width / 2.0 - 130.0,
        height: height - 70.0 - label_space,
    };
    let right = Panel {
        left: width / 2.0 + 70.0,
        top: 70.0,
        width: width / 2.0 - 110.0,
        height: height - 70.0 - label_space,
    };

    let mut svg = String::new();

    // Header
    svg.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
        config.width, config.height, config.width, config.height
    ));
    svg.push_str(
        r#"<style>.bar:hover { stroke: black; stroke-width: 1; opacity: 0.9; } text { font-family: sans-serif; }</style>"#,
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{}" height="{}" fill="white"/>"#,
        config.width, config.height
    ));

    // Title
    svg.push_str(&format!(
        r#"<text x="{}" y="32" font-size="20" text-anchor="middle" font-weight="bold">{}</text>"#,
        width / 2.0,
        escape_xml(&config.full_title())
    ));

    render_bars(&mut svg, &summaries, &left);
    render_pareto(&mut svg, &summaries, &right);
    render_time_box(&mut svg, dataset, &summaries, &right);

    svg.push_str("</svg>");

    info!("Chart generated successfully ({} bytes)", svg.len());
    Ok(svg)
}

/// Bar panel: absolute ticks per operation
fn render_bars(out: &mut String, summaries: &[OperationSummary], panel: &Panel) {
    let max_ticks = summaries
        .iter()
        .map(|s| s.total_ticks)
        .fold(0.0, f64::max)
        .max(1.0);
    let slot = panel.width / summaries.len() as f64;
    let bar_width = slot * 0.7;

    render_panel_frame(out, panel, "Total ticks by operation (abs)", "Ticks");

    for (i, summary) in summaries.iter().enumerate() {
        let bar_height = summary.total_ticks / max_ticks * panel.height;
        let center = panel.slot_center(i, summaries.len());
        let x = center - bar_width / 2.0;
        let y = panel.bottom() - bar_height;

        out.push_str(&format!(
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}" class="bar"><title>{} ({:.0} ticks, {} layers)</title></rect>"#,
            x,
            y,
            bar_width,
            bar_height,
            get_operation_color(&summary.operation),
            escape_xml(&summary.operation),
            summary.total_ticks,
            summary.count
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="10" text-anchor="middle">{}</text>"#,
            center,
            y - 4.0,
            group_thousands(summary.total_ticks.round() as u64)
        ));
        render_category_label(out, center, panel.bottom(), &summary.operation);
    }
}

/// Pareto panel: cumulative share of ticks, largest operation first
fn render_pareto(out: &mut String, summaries: &[OperationSummary], panel: &Panel) {
    let total: f64 = summaries.iter().map(|s| s.total_ticks).sum();
    let y_max = 105.0;
    let to_y = |pct: f64| panel.bottom() - pct / y_max * panel.height;

    render_panel_frame(
        out,
        panel,
        "Pareto: where time is spent",
        "Cumulative % of total ticks",
    );

    // Horizontal grid with percentage labels
    for pct in (0..=100).step_by(20) {
        let y = to_y(pct as f64);
        out.push_str(&format!(
            r##"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="#dddddd"/>"##,
            panel.left,
            y,
            panel.left + panel.width,
            y
        ));
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="10" text-anchor="end">{}</text>"#,
            panel.left - 6.0,
            y + 3.0,
            pct
        ));
    }

    let threshold_y = to_y(PARETO_THRESHOLD_PERCENT);
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="red" stroke-dasharray="6,4"/>"#,
        panel.left,
        threshold_y,
        panel.left + panel.width,
        threshold_y
    ));
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="11" fill="red" text-anchor="end">{:.0}% threshold</text>"#,
        panel.left + panel.width - 4.0,
        threshold_y - 4.0,
        PARETO_THRESHOLD_PERCENT
    ));

    let mut cumulative = 0.0;
    let mut points = Vec::with_capacity(summaries.len());
    for (i, summary) in summaries.iter().enumerate() {
        cumulative += summary.total_ticks;
        let pct = if total > 0.0 { cumulative / total * 100.0 } else { 0.0 };
        points.push((panel.slot_center(i, summaries.len()), to_y(pct)));
    }

    let polyline: Vec<String> = points
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", x, y))
        .collect();
    out.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="rgb(31, 119, 180)" stroke-width="2"/>"#,
        polyline.join(" ")
    ));
    for (x, y) in &points {
        out.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="4" fill="rgb(31, 119, 180)"/>"#,
            x, y
        ));
    }

    for (i, summary) in summaries.iter().enumerate() {
        render_category_label(out, panel.slot_center(i, summaries.len()), panel.bottom(), &summary.operation);
    }
}

/// Text box with end-to-end time and its split across operations
fn render_time_box(out: &mut String, dataset: &Dataset, summaries: &[OperationSummary], panel: &Panel) {
    let mut lines = Vec::new();
    if dataset.end_to_end.is_empty() {
        lines.push("End-to-end avg: n/a".to_string());
    } else {
        lines.push(format!("End-to-end avg: {:.2} ms", dataset.end_to_end.mean_ms));
    }
    lines.push("By operation (total):".to_string());
    for (operation, ms) in operation_time_share(summaries, dataset.end_to_end.mean_ms) {
        lines.push(format!("  • {}: {:.2} ms", operation, ms));
    }

    let line_height = 14.0;
    let box_width = 230.0;
    let box_height = lines.len() as f64 * line_height + 10.0;
    let x = panel.left + panel.width - box_width - 6.0;
    let y = panel.bottom() - box_height - 6.0;

    out.push_str(&format!(
        r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="white" fill-opacity="0.8"/>"#,
        x, y, box_width, box_height
    ));
    for (i, line) in lines.iter().enumerate() {
        out.push_str(&format!(
            r#"<text x="{:.2}" y="{:.2}" font-size="11" xml:space="preserve">{}</text>"#,
            x + 6.0,
            y + line_height * (i as f64 + 1.0),
            escape_xml(line)
        ));
    }
}

fn render_panel_frame(out: &mut String, panel: &Panel, title: &str, y_label: &str) {
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="14" text-anchor="middle" font-weight="bold">{}</text>"#,
        panel.left + panel.width / 2.0,
        panel.top - 12.0,
        escape_xml(title)
    ));
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black"/>"#,
        panel.left,
        panel.top,
        panel.left,
        panel.bottom()
    ));
    out.push_str(&format!(
        r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="black"/>"#,
        panel.left,
        panel.bottom(),
        panel.left + panel.width,
        panel.bottom()
    ));

    let label_x = panel.left - 50.0;
    let label_y = panel.top + panel.height / 2.0;
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="12" text-anchor="middle" transform="rotate(-90 {:.2} {:.2})">{}</text>"#,
        label_x,
        label_y,
        label_x,
        label_y,
        escape_xml(y_label)
    ));
}

/// Operation name under the x axis, slanted
fn render_category_label(out: &mut String, x: f64, axis_y: f64, name: &str) {
    let y = axis_y + 14.0;
    out.push_str(&format!(
        r#"<text x="{:.2}" y="{:.2}" font-size="10" text-anchor="end" transform="rotate(-20 {:.2} {:.2})">{}</text>"#,
        x,
        y,
        x,
        y,
        escape_xml(name)
    ));
}

fn get_operation_color(name: &str) -> &'static str {
    if name.contains("DEPTHWISE") {
        "rgb(255, 140, 0)" // Dark Orange
    } else if name.contains("CONV") {
        "rgb(220, 20, 60)" // Crimson (usually the bulk)
    } else if name.contains("FULLY_CONNECTED") {
        "rgb(138, 43, 226)" // Blue Violet
    } else if name == "ADD" || name == "MUL" || name.contains("QUANTIZE") {
        "rgb(34, 139, 34)" // Forest Green
    } else if name.contains("POOL") || name.contains("PAD") {
        "rgb(70, 130, 180)" // Steel Blue
    } else if name.contains("SOFTMAX") || name.contains("RESHAPE") {
        "rgb(100, 149, 237)" // Cornflower Blue
    } else {
        "rgb(169, 169, 169)" // Gray (Generic)
    }
}

fn get_ansi_color(name: &str) -> &'static str {
    if name.contains("DEPTHWISE") {
        "\x1b[33m" // Yellow/Orange
    } else if name.contains("CONV") {
        "\x1b[31;1m" // Red/Crimson
    } else if name.contains("FULLY_CONNECTED") {
        "\x1b[35m" // Magenta/Violet
    } else if name == "ADD" || name == "MUL" || name.contains("QUANTIZE") {
        "\x1b[32m" // Green
    } else if name.contains("POOL") || name.contains("PAD") {
        "\x1b[34m" // Blue
    } else if name.contains("SOFTMAX") || name.contains("RESHAPE") {
        "\x1b[36m" // Cyan
    } else {
        "\x1b[90m" // Gray
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `1234567` -> `1,234,567`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Create the terminal summary: totals, per-run timings and rankings
///
/// `max_rows` caps the bottleneck table; the operation table is always full.
pub fn generate_text_summary(dataset: &Dataset, max_rows: usize, color: bool) -> String {
    if dataset.is_empty() {
        return "No layer data found!".to_string();
    }

    let rule = "=".repeat(70);
    let thin = "-".repeat(70);
    let paint = |name: &str| -> (&'static str, &'static str) {
        if color {
            (get_ansi_color(name), "\x1b[0m")
        } else {
            ("", "")
        }
    };

    let total_ticks = dataset.total_ticks();
    let mut lines = Vec::new();

    lines.push(rule.clone());
    lines.push("LAYER PROFILING SUMMARY".to_string());
    lines.push(rule.clone());
    lines.push(String::new());
    lines.push(format!(
        "Layers: {} (from {} runs)",
        dataset.layers.len(),
        dataset.run_count
    ));
    lines.push(format!(
        "Total ticks (layer-summed): {}",
        group_thousands(total_ticks.round() as u64)
    ));
    lines.push(format!(
        "Total cycles (layer-summed): {}",
        group_thousands(dataset.total_cycles().round() as u64)
    ));

    if dataset.end_to_end.is_empty() {
        lines.push("End-to-end cycles (avg over runs): n/a".to_string());
    } else {
        lines.push(format!(
            "End-to-end cycles (avg over runs): {}",
            group_thousands(dataset.end_to_end.mean_cycles.round() as u64)
        ));
        lines.push(format!(
            "End-to-end time (avg): {:.3} ms @ {} MHz",
            dataset.end_to_end.mean_ms,
            dataset.clock.cpu_freq_mhz()
        ));
        lines.push("Runs (cycles/ms):".to_string());
        for (i, (cycles, ms)) in dataset
            .end_to_end
            .samples
            .iter()
            .zip(&dataset.end_to_end.samples_ms)
            .enumerate()
        {
            lines.push(format!(
                "  Run {}: {} cycles  |  {:.3} ms",
                i + 1,
                group_thousands(*cycles),
                ms
            ));
        }
    }

    if !dataset.dropped.is_empty() {
        lines.push(format!(
            "Dropped positions (runs disagree): {} of {}",
            dataset.dropped.len(),
            dataset.expected_layers
        ));
    }

    lines.push(String::new());
    lines.push("Top bottlenecks (by ticks):".to_string());
    lines.push(thin.clone());
    lines.push(format!(
        "{:>3} {:<20} {:>12} {:>8} {:>8}",
        "ID", "Operation", "Ticks", "%", "Cumsum"
    ));
    lines.push(thin.clone());

    let bottlenecks = rank_bottlenecks(&dataset.layers);
    for b in bottlenecks.iter().take(max_rows) {
        let (start, reset) = paint(&b.operation);
        lines.push(format!(
            "{:>3} {}{:<20}{} {:>12} {:>7.1}% {:>7.1}%",
            b.id,
            start,
            b.operation,
            reset,
            group_thousands(b.mean_ticks.round() as u64),
            b.percentage,
            b.cumulative_percentage
        ));
    }
    if bottlenecks.len() > max_rows {
        lines.push(format!(
            "   (Showing top {} of {} layers)",
            max_rows,
            bottlenecks.len()
        ));
    }

    lines.push(String::new());
    lines.push(rule.clone());
    lines.push(String::new());
    lines.push("Operation summary:".to_string());
    lines.push(thin.clone());
    lines.push(format!(
        "{:<20} {:>12} {:>8} {:>12}",
        "Operation", "Total", "Count", "Average"
    ));
    lines.push(thin.clone());

    let summaries = summarize_operations(&dataset.layers);
    for s in &summaries {
        let (start, reset) = paint(&s.operation);
        lines.push(format!(
            "{}{:<20}{} {:>12} {:>8} {:>12}",
            start,
            s.operation,
            reset,
            group_thousands(s.total_ticks.round() as u64),
            s.count,
            group_thousands(s.mean_ticks.round() as u64)
        ));
    }

    lines.push(thin);
    lines.push(format!(
        "{} of {} operations cover {:.0}% of layer ticks",
        pareto_cutoff(&summaries, PARETO_THRESHOLD_PERCENT),
        summaries.len(),
        PARETO_THRESHOLD_PERCENT
    ));

    lines.push(String::new());
    lines.push(rule);

    lines.join("\n")
}
