//! Chart rendering.
//!
//! This module renders a [`ChartSeries`] as a terminal bar chart, a
//! Markdown report, or a JSON document. The renderer only consumes the
//! series; it never recomputes counts or shares.

use crate::models::{ChartSeries, Report, ReportMetadata};
use anyhow::Result;
use std::io::Write;
use std::path::Path;

/// Width of the widest bar in rendered charts.
const BAR_WIDTH: usize = 40;

/// Render the chart series for the terminal.
pub fn generate_terminal_chart(report: &Report) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "📊 Aspect Distribution ({} labels, {} aspects)\n\n",
        report.metadata.total_labels, report.metadata.distinct_labels
    ));

    if report.series.is_empty() {
        output.push_str("   No labels to chart.\n");
        return output;
    }

    output.push_str(&render_bars(&report.series, "   "));
    output
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Aspect Distribution Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_distribution_section(&report.series));
    output.push_str(&generate_chart_section(&report.series));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input));
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    if let Some(ref endpoint) = metadata.endpoint {
        section.push_str(&format!("- **Classifier:** {}\n", endpoint));
    }
    section.push_str(&format!(
        "- **Date:** {}\n",
        metadata.date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Total Labels:** {}\n", metadata.total_labels));
    section.push_str(&format!(
        "- **Distinct Aspects:** {}\n",
        metadata.distinct_labels
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the distribution table, in legend (first-seen) order.
fn generate_distribution_section(series: &ChartSeries) -> String {
    let mut section = String::new();

    section.push_str("## Distribution\n\n");

    if series.is_empty() {
        section.push_str("The classifier returned no labels.\n\n");
        return section;
    }

    section.push_str("| Aspect | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for slice in series.slices() {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            slice.label, slice.count, slice.share
        ));
    }
    section.push_str(&format!("| **Total** | **{}** | |\n\n", series.total()));

    section
}

/// Generate the chart block.
fn generate_chart_section(series: &ChartSeries) -> String {
    if series.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Chart\n\n");
    section.push_str("```text\n");
    section.push_str(&render_bars(series, ""));
    section.push_str("```\n\n");

    section
}

/// Render proportional bars with aligned labels, counts, and shares.
fn render_bars(series: &ChartSeries, indent: &str) -> String {
    let mut output = String::new();

    let label_width = series
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let max_count = series.counts.iter().copied().max().unwrap_or(0);

    for slice in series.slices() {
        let bar_len = if max_count > 0 {
            ((slice.count as f64 / max_count as f64) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        // Every present label has at least one occurrence
        let bar: String = "█".repeat(bar_len.max(1));

        output.push_str(&format!(
            "{}{:<label_width$}  {:<BAR_WIDTH$}  {:>5}  {:>5.1}%\n",
            indent, slice.label, bar, slice.count, slice.share
        ));
    }

    output
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by AspectLens*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write report content to a file, replacing any previous report at
/// the same path.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
