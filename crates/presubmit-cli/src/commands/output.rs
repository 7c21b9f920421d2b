//! Shared output formatting for presubmit results.

use anyhow::Result;
use presubmit_core::{CheckResult, Diagnostic, DiagnosticReport};

use crate::OutputFormat;

/// Print check results in the specified format.
pub fn print(result: &CheckResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result),
    }
    Ok(())
}

fn print_text(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        println!("{}", diagnostic.format());
    }
    print_summary(result);
}

fn print_summary(result: &CheckResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );
}

fn print_json(result: &CheckResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        println!("{}", compact_line(diagnostic));
    }
}

/// One line per diagnostic; multi-line messages keep only their first line.
fn compact_line(d: &Diagnostic) -> String {
    let location = if d.files.is_empty() {
        "<change>".to_string()
    } else {
        d.files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join(",")
    };
    let first_line = d.message.lines().next().unwrap_or_default();
    format!("{location}: {} [{}] {first_line}", d.severity, d.code)
}

fn print_pretty(result: &CheckResult) {
    for diagnostic in &result.diagnostics {
        let report = miette::Report::new(DiagnosticReport::from(diagnostic));
        eprintln!("{report:?}");
    }
    print_summary(result);
}

#[cfg(test)]
mod tests {
    use super::*;
    use presubmit_core::Severity;

    #[test]
    fn compact_line_for_file_diagnostic() {
        let d = Diagnostic::new(
            "PS002",
            "proto-trailing-newline",
            Severity::Error,
            "File a.proto must end with exactly one newline.",
        )
        .with_file("a.proto");
        assert_eq!(
            compact_line(&d),
            "a.proto: error [PS002] File a.proto must end with exactly one newline."
        );
    }

    #[test]
    fn compact_line_for_change_level_multiline_diagnostic() {
        let d = Diagnostic::new(
            "PS001",
            "bug-entry-syntax",
            Severity::Warning,
            "first\nsecond",
        );
        assert_eq!(compact_line(&d), "<change>: warning [PS001] first");
    }
}
