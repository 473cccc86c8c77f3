//! CLI output formatting.
//!
//! Each command has a `format_*` function that returns lines (pure, no I/O,
//! easy to test) and a `print_*` wrapper that writes them to stdout.
//! Diagnostics raised while building go through `log` instead; this module
//! only prints the summary at the end of a command.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! 001 index → index.html
//! 002 about → about.html
//!
//! Skipped
//!     contacts (not defined)
//!
//! Cache: 5 templates read, 5 served from cache
//! Generated 2 pages in dist, 1 skipped
//! ```
//!
//! ## Check
//!
//! ```text
//! Templates
//!     head.html
//!     body.html
//!
//! Warnings
//!     page 'contacts' is listed in pagesToBuild but not defined
//!
//! Config is valid (1 warning)
//! ```

use crate::generate::{CheckReport, GenerateReport};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

/// Path of a written page relative to the output directory, for display.
fn display_path(path: &Path, output_dir: &Path) -> String {
    path.strip_prefix(output_dir)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Build output
// ============================================================================

/// Format the summary of a build run.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (i, page) in report.written.iter().enumerate() {
        lines.push(format!(
            "{} {} → {}",
            format_index(i + 1),
            page.id,
            display_path(&page.path, &report.output_dir)
        ));
    }

    if !report.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for id in &report.skipped {
            lines.push(format!("    {id} (not defined)"));
        }
    }

    lines.push(String::new());
    lines.push(format!("Cache: {}", report.cache));

    let mut summary = format!(
        "Generated {} in {}",
        plural(report.written.len(), "page", "pages"),
        report.output_dir.display()
    );
    if !report.skipped.is_empty() {
        summary.push_str(&format!(", {} skipped", report.skipped.len()));
    }
    lines.push(summary);
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the result of a dry run.
pub fn format_check_output(report: &CheckReport) -> Vec<String> {
    let mut lines = vec!["Templates".to_string()];
    if report.templates.is_empty() {
        lines.push("    (none)".to_string());
    }
    for file in &report.templates {
        lines.push(format!("    {file}"));
    }

    if !report.diagnostics.is_empty() {
        lines.push(String::new());
        lines.push("Warnings".to_string());
        for diagnostic in &report.diagnostics {
            lines.push(format!("    {diagnostic}"));
        }
    }

    lines.push(String::new());
    let status = if report.is_buildable() {
        "Config is valid"
    } else {
        "Config cannot be built"
    };
    if report.diagnostics.is_empty() {
        lines.push(status.to_string());
    } else {
        lines.push(format!(
            "{status} ({})",
            plural(report.diagnostics.len(), "warning", "warnings")
        ));
    }
    lines
}

pub fn print_check_output(report: &CheckReport) {
    for line in format_check_output(report) {
        println!("{}", line);
    }
}
