//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable) with specialized
//! support for validation errors, check reports and progress indicators.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use contentkit_schemas::check::{CheckReport, CollectionSummary, EntryFailure, FailureKind};
use contentkit_schemas::validation::{ValidationError, ValidationErrors};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::{debug, trace};

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format validation errors with detailed violation reporting
    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String>;

    /// Format one failed entry
    fn format_entry_failure(&self, failure: &EntryFailure) -> Result<String>;

    /// Format the outcome of a whole check
    fn format_check_report(&self, report: &CheckReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            OutputFormat::Human => {
                // For human format, use pretty JSON as fallback
                Ok(serde_json::to_string_pretty(value)?)
            }
        }
    }

    fn format_validation_errors(&self, errors: &ValidationErrors) -> Result<String> {
        match self {
            OutputFormat::Human => format_validation_errors_human(errors),
            _ => self.format(errors),
        }
    }

    fn format_entry_failure(&self, failure: &EntryFailure) -> Result<String> {
        match self {
            OutputFormat::Human => format_entry_failure_human(failure),
            _ => self.format(failure),
        }
    }

    fn format_check_report(&self, report: &CheckReport) -> Result<String> {
        match self {
            OutputFormat::Human => format_check_report_human(report),
            _ => self.format(&ReportSummary::from(report)),
        }
    }
}

/// Machine-readable summary of a check
#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub success: bool,
    pub total: usize,
    pub valid: usize,
    pub failed: usize,
    pub collections: BTreeMap<String, CollectionSummary>,
    pub entries: Vec<EntryRef<'a>>,
    pub failures: &'a [EntryFailure],
}

/// Identity of a validated entry
#[derive(Debug, Serialize)]
pub struct EntryRef<'a> {
    pub collection: &'a str,
    pub id: &'a str,
    pub slug: &'a str,
    pub path: &'a PathBuf,
}

impl<'a> From<&'a CheckReport> for ReportSummary<'a> {
    fn from(report: &'a CheckReport) -> Self {
        Self {
            success: report.is_success(),
            total: report.total(),
            valid: report.entries.len(),
            failed: report.failures.len(),
            collections: report.summary(),
            entries: report
                .entries
                .iter()
                .map(|e| EntryRef {
                    collection: &e.collection,
                    id: &e.id,
                    slug: &e.slug,
                    path: &e.path,
                })
                .collect(),
            failures: &report.failures,
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write + Send>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && format == OutputFormat::Human && io::stderr().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Whether human-oriented messages are written
    pub fn is_human(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write a section header
    pub fn section(&mut self, title: &str) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        self.writeln("")?;
        if self.use_color {
            self.writeln(&format!("═══ {} ═══", title).bright_blue().to_string())
        } else {
            self.writeln(&format!("=== {} ===", title))
        }
    }

    /// Write debug information if verbose mode is enabled
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose > 0 && self.is_human() {
            if self.use_color {
                self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
            } else {
                self.writeln(&format!("DEBUG: {}", message))
            }
        } else {
            Ok(())
        }
    }

    /// Write data in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        trace!(bytes = formatted.len(), "Outputting data");

        if self.format == OutputFormat::Yaml {
            // serde_yaml already ends documents with a newline
            self.write(&formatted)
        } else {
            self.writeln(&formatted)
        }
    }

    /// Write validation errors with specialized formatting
    pub fn validation_errors(&mut self, errors: &ValidationErrors) -> Result<()> {
        let formatted = self.format.format_validation_errors(errors)?;
        self.writeln(formatted.trim_end())
    }

    /// Write one failed entry (human output only; machine formats get the
    /// failure inside the report)
    ///
    /// With `-v` the violations of each error are listed as well.
    pub fn entry_failure(&mut self, failure: &EntryFailure) -> Result<()> {
        if !self.is_human() {
            return Ok(());
        }
        let formatted = self.format.format_entry_failure(failure)?;
        let formatted = if self.use_color {
            colorize_failure(&formatted)
        } else {
            formatted
        };
        self.writeln(formatted.trim_end())?;

        if self.verbose > 0 {
            self.validation_errors(&failure.errors)?;
        }
        Ok(())
    }

    /// Write the outcome of a check
    pub fn check_report(&mut self, report: &CheckReport) -> Result<()> {
        if self.quiet && self.is_human() && report.is_success() {
            return Ok(());
        }
        let formatted = self.format.format_check_report(report)?;
        if self.is_human() && self.use_color {
            let line = if report.is_success() {
                formatted.green().to_string()
            } else {
                formatted.red().bold().to_string()
            };
            self.writeln(line.trim_end())
        } else {
            self.writeln(formatted.trim_end())
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }

    /// Write a table (for human format)
    pub fn table(&mut self, headers: &[&str], rows: Vec<Vec<String>>) -> Result<()> {
        if self.quiet || !self.is_human() {
            return Ok(());
        }

        // Calculate column widths
        let mut widths = headers.iter().map(|h| h.chars().count()).collect::<Vec<_>>();
        for row in &rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.chars().count());
                }
            }
        }

        let header_row = headers
            .iter()
            .enumerate()
            .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
            .collect::<Vec<_>>()
            .join(" │ ");

        let header_row = header_row.trim_end();
        if self.use_color {
            self.writeln(&header_row.bold().to_string())?;
        } else {
            self.writeln(header_row)?;
        }

        let separator = widths
            .iter()
            .map(|w| "─".repeat(*w))
            .collect::<Vec<_>>()
            .join("─┼─");
        self.writeln(&separator)?;

        for row in rows {
            let row_str = row
                .iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i < widths.len() {
                        format!("{:width$}", cell, width = widths[i])
                    } else {
                        cell.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join(" │ ");
            self.writeln(row_str.trim_end())?;
        }

        Ok(())
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

fn colorize_failure(formatted: &str) -> String {
    let mut lines = formatted.lines();
    let mut output = String::new();
    if let Some(header) = lines.next() {
        output.push_str(&header.red().bold().to_string());
        output.push('\n');
    }
    for line in lines {
        output.push_str(line);
        output.push('\n');
    }
    output
}

fn failure_label(kind: FailureKind) -> &'static str {
    match kind {
        FailureKind::Parse => "parse error",
        FailureKind::Schema => "schema mismatch",
        FailureKind::DuplicateSlug => "duplicate slug",
        FailureKind::UnknownCollection => "unknown collection",
    }
}

/// Format validation errors for human reading
fn format_validation_errors_human(errors: &ValidationErrors) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("❌ Validation Failed - {} Error(s)\n\n", errors.len()));

    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, format_validation_error_human(error)?));
    }

    Ok(output)
}

/// Format a single validation error for human reading
fn format_validation_error_human(error: &ValidationError) -> Result<String> {
    let mut output = String::new();

    output.push_str(&format!("📍 Path: {}\n", error.path));
    output.push_str(&format!("💬 Message: {}\n", error.message));

    if !error.schema_violations.is_empty() {
        output.push_str("🔍 Schema Violations:\n");

        for violation in &error.schema_violations {
            output.push_str(&format!("  • Rule: {}\n", violation.rule));
            output.push_str(&format!("    Expected: {}\n", violation.expected));
            output.push_str(&format!("    Actual: {}\n", violation.actual));
        }
    }

    Ok(output)
}

/// Format a failed entry as a header line plus one line per error
fn format_entry_failure_human(failure: &EntryFailure) -> Result<String> {
    let mut output = format!(
        "✗ {}/{} ({}): {}\n",
        failure.collection,
        failure.id,
        failure.path.display(),
        failure_label(failure.kind)
    );

    for error in failure.errors.iter() {
        output.push_str(&format!("  📍 {}: {}\n", error.path, error.message));
    }

    Ok(output)
}

/// Format the one-line check verdict
fn format_check_report_human(report: &CheckReport) -> Result<String> {
    let summary = report
        .summary()
        .iter()
        .map(|(name, counts)| format!("{} {}/{}", name, counts.valid, counts.valid + counts.failed))
        .collect::<Vec<_>>()
        .join(", ");

    let verdict = if report.is_success() {
        format!("✓ All {} entries are valid", report.total())
    } else {
        format!(
            "✗ {} of {} entries failed validation",
            report.failures.len(),
            report.total()
        )
    };

    if summary.is_empty() {
        Ok(verdict)
    } else {
        Ok(format!("{} ({})", verdict, summary))
    }
}

#[cfg(test)]
mod tests {
    include!("output/tests.rs");
}
