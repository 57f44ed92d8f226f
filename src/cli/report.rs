//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format; module results in the format
//! selected with `--format`. Every function takes the writer it prints to.

use std::io::{self, Write};
use std::time::Duration;

use colored::Colorize;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use super::args::OutputFormat;
use super::run::RunReport;
use crate::config::CONFIG_FILE_NAME;
use crate::core::{FileModule, ModuleStatus, SegmentKind};
use crate::issues::{Issue, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Set to any value to leave elapsed times out of the output.
pub const DISABLE_TIMING_ENV: &str = "MODSPLIT_DISABLE_TIMING";

fn timing_enabled() -> bool {
    std::env::var_os(DISABLE_TIMING_ENV).is_none()
}

/// Print issues in cargo-style format.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = sorted
        .iter()
        .map(|i| i.context().line())
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }
}

/// Print the outcome of a run and return the matching exit status.
pub fn print_run(report: &RunReport, format: OutputFormat, verbose: bool) -> super::ExitStatus {
    let stdout = &mut io::stdout().lock();
    match format {
        OutputFormat::Text => {
            print_modules_to(&report.modules, verbose, stdout);
            report_to(&report.issues, stdout);
            print_summary_to(report, stdout);
        }
        OutputFormat::Json => print_json_to(report, stdout),
        OutputFormat::Es6 | OutputFormat::Cjs => {
            print_imports_to(&report.modules, format, stdout);
            report_to(&report.issues, &mut io::stderr().lock());
        }
    }

    match &report.error {
        Some(err) => {
            print_failure_to(err, stdout);
            super::ExitStatus::Failure
        }
        None => super::ExitStatus::Success,
    }
}

/// Print a fatal error and its causes to stdout.
pub fn print_failure(err: &anyhow::Error) {
    print_failure_to(err, &mut io::stdout().lock());
}

pub fn print_failure_to<W: Write>(err: &anyhow::Error, writer: &mut W) {
    let _ = writeln!(writer, "{} {}", "FAIL:".bold().red(), err);
    for cause in err.chain().skip(1) {
        let _ = writeln!(writer, "  {} {}", "caused by:".dimmed(), cause);
    }
}

pub fn print_init() {
    println!(
        "{} Created {}",
        SUCCESS_MARK.green(),
        CONFIG_FILE_NAME.cyan()
    );
}

// ============================================================
// Text format
// ============================================================

pub fn print_modules_to<W: Write>(modules: &[FileModule], verbose: bool, writer: &mut W) {
    for module in modules {
        let status = match module.status {
            ModuleStatus::Done => "done".green(),
            ModuleStatus::Failed => "failed".red(),
            ModuleStatus::Pending => "pending".dimmed(),
            ModuleStatus::InProgress => "in progress".yellow(),
        };
        let _ = writeln!(
            writer,
            "{} {}  {}, {}, {}",
            module.path_str().bold(),
            status,
            plural(module.imports.len(), "import"),
            plural(module.exports.len(), "export"),
            plural(module.segments.len(), "segment"),
        );

        if verbose {
            print_module_details(module, writer);
        }
    }
}

fn print_module_details<W: Write>(module: &FileModule, writer: &mut W) {
    for import in &module.imports {
        let _ = writeln!(
            writer,
            "  {} {:<8} {:<10} {} {}",
            "import".cyan(),
            import.loc.to_string(),
            import.bindings.kind_name(),
            import.specifier,
            format!("[{}]", import.bindings.locals().join(", ")).dimmed()
        );
    }
    for export in &module.exports {
        let _ = writeln!(
            writer,
            "  {} {:<8} {:<10} {}",
            "export".cyan(),
            export.loc.to_string(),
            export.kind.to_string(),
            export.exported
        );
    }
    for segment in &module.segments {
        let kind = match segment.kind {
            SegmentKind::Import => "import",
            SegmentKind::Text => "text",
        };
        let _ = writeln!(
            writer,
            "  {} {:<6} {:>6}..{:<6} {:>6} bytes",
            "segment".blue(),
            kind,
            segment.range.start,
            segment.range.end,
            segment.len()
        );
    }
    if timing_enabled() && module.status != ModuleStatus::Pending {
        let _ = writeln!(writer, "  {} {}", "took".dimmed(), format_duration(module.elapsed));
    }
}

fn print_summary_to<W: Write>(report: &RunReport, writer: &mut W) {
    let processed = report
        .modules
        .iter()
        .filter(|m| matches!(m.status, ModuleStatus::Done | ModuleStatus::Failed))
        .count();
    let errors = report
        .issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let warnings = report.issues.len() - errors;
    let timing = if timing_enabled() {
        format!(" in {}", format_duration(report.elapsed))
    } else {
        String::new()
    };

    if report.issues.is_empty() {
        if report.error.is_some() {
            return;
        }
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Processed {}{} - no issues found",
                plural(processed, "file"),
                timing
            )
            .green()
        );
    } else {
        let _ = writeln!(
            writer,
            "{} Processed {}{}: {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            plural(processed, "file"),
            timing,
            errors + warnings,
            errors,
            if errors == 1 { "error" } else { "errors" }.red(),
            warnings,
            if warnings == 1 { "warning" } else { "warnings" }.yellow()
        );
    }
}

// ============================================================
// ES6 / CommonJS formats
// ============================================================

pub fn print_imports_to<W: Write>(modules: &[FileModule], format: OutputFormat, writer: &mut W) {
    for module in modules.iter().filter(|m| m.status == ModuleStatus::Done) {
        let _ = writeln!(writer, "// {}", module.path_str());
        for import in &module.imports {
            let line = match format {
                OutputFormat::Cjs => import.to_cjs(),
                _ => import.to_es6(),
            };
            let _ = writeln!(writer, "{}", line);
        }
    }
}

// ============================================================
// JSON format
// ============================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    modules: Vec<JsonModule<'a>>,
    issues: Vec<JsonIssue>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonModule<'a> {
    #[serde(flatten)]
    module: &'a FileModule,
    offsets: Vec<usize>,
    lengths: Vec<usize>,
}

#[derive(Serialize)]
struct JsonIssue {
    severity: Severity,
    rule: String,
    file: String,
    line: usize,
    col: usize,
    message: String,
}

pub fn print_json_to<W: Write>(report: &RunReport, writer: &mut W) {
    let mut issues = report.issues.clone();
    issues.sort();
    let json = JsonReport {
        modules: report
            .modules
            .iter()
            .map(|module| JsonModule {
                module,
                offsets: module.segment_offsets(),
                lengths: module.segment_lengths(),
            })
            .collect(),
        issues: issues
            .iter()
            .map(|issue| JsonIssue {
                severity: issue.report_severity(),
                rule: issue.report_rule().to_string(),
                file: issue.context().file_path().to_string(),
                line: issue.context().line(),
                col: issue.context().col(),
                message: issue.message(),
            })
            .collect(),
    };
    match serde_json::to_string_pretty(&json) {
        Ok(text) => {
            let _ = writeln!(writer, "{}", text);
        }
        Err(err) => {
            let _ = writeln!(writer, "{} failed to serialize report: {}", "error:".red(), err);
        }
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let ctx = issue.context();
    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        ctx.file_path(),
        ctx.line(),
        ctx.col()
    );

    let caret_char = match severity {
        Severity::Error => "^".red(),
        Severity::Warning => "^".yellow(),
    };
    let _ = writeln!(writer, "{:>width$} {}", "", "|".blue(), width = max_line_width);
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        ctx.line().to_string().blue(),
        "|".blue(),
        ctx.source_line,
        width = max_line_width
    );

    // Caret under the column (1-based); the prefix may hold wide characters.
    let prefix: String = ctx
        .source_line
        .chars()
        .take(ctx.col().saturating_sub(1))
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        caret_char,
        width = max_line_width,
        padding = caret_padding
    );

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }
    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer);
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn format_duration(elapsed: Duration) -> String {
    let millis = elapsed.as_secs_f64() * 1000.0;
    if millis < 1.0 {
        format!("{:.0}\u{b5}s", elapsed.as_secs_f64() * 1_000_000.0)
    } else {
        format!("{:.1}ms", millis)
    }
}
