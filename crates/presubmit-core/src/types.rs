//! Core types for presubmit diagnostics and results.

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for presubmit diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not block the change.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that blocks the change.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity: {other}")),
        }
    }
}

/// A single finding produced by a check.
///
/// Unlike per-line lint findings, a presubmit diagnostic may cover several
/// files at once (the source-mixing check reports a whole changeset in one
/// diagnostic) or none at all (the bug entry check looks at change metadata).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Check code (e.g., "PS003").
    pub code: String,
    /// Check name (e.g., "gn-no-mixing-sources").
    pub check: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Human-readable message, rendered verbatim.
    pub message: String,
    /// Files this diagnostic is about, in report order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,
    /// Optional hint for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic that is not tied to any file.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        check: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            check: check.into(),
            severity,
            message: message.into(),
            files: Vec::new(),
            help: None,
        }
    }

    /// Attaches a file to this diagnostic.
    #[must_use]
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.files.push(file.into());
        self
    }

    /// Attaches several files to this diagnostic.
    #[must_use]
    pub fn with_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(files.into_iter().map(Into::into));
        self
    }

    /// Adds a fix hint to this diagnostic.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Formats the diagnostic for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!("{} {}", self.code, self.check);
        if !self.files.is_empty() {
            let files: Vec<String> = self
                .files
                .iter()
                .map(|f| f.display().to_string())
                .collect();
            let _ = write!(output, " in {}", files.join(", "));
        }
        output.push('\n');
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(help) = &self.help {
            let _ = writeln!(output, "  = help: {help}");
        }
        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Converts a [`Diagnostic`] to a miette report for rich terminal display.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("[{code}] {message}")]
pub struct DiagnosticReport {
    message: String,
    code: String,
    #[help]
    help: Option<String>,
}

impl From<&Diagnostic> for DiagnosticReport {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: d.message.clone(),
            code: format!("{} {}", d.code, d.check),
            help: d.help.clone(),
        }
    }
}

/// Result of running presubmit checks over a changeset.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CheckResult {
    /// All diagnostics produced.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of changed files inspected.
    pub files_checked: usize,
}

impl CheckResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Returns diagnostics produced by the named check.
    #[must_use]
    pub fn by_check(&self, check: &str) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.check == check || d.code == check)
            .collect()
    }

    /// Counts diagnostics by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity: Severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Sorts diagnostics by code, then by first file, then by message.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by(|a, b| {
            a.code
                .cmp(&b.code)
                .then_with(|| a.files.first().cmp(&b.files.first()))
                .then_with(|| a.message.cmp(&b.message))
        });
    }

    /// Adds diagnostics from another result.
    pub fn extend(&mut self, other: Self) {
        self.diagnostics.extend(other.diagnostics);
        self.files_checked += other.files_checked;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_diagnostic(code: &str, severity: Severity) -> Diagnostic {
        Diagnostic::new(code, "proto-trailing-newline", severity, "bad ending")
    }

    #[test]
    fn severity_parses_aliases() {
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("ERROR".parse::<Severity>(), Ok(Severity::Error));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn display_is_the_bare_message() {
        let d = make_diagnostic("PS002", Severity::Error);
        assert_eq!(d.to_string(), "bad ending");
    }

    #[test]
    fn format_lists_files_and_help() {
        let d = make_diagnostic("PS002", Severity::Error)
            .with_file("a.proto")
            .with_help("add a newline");
        let formatted = d.format();
        assert!(formatted.starts_with("PS002 proto-trailing-newline in a.proto\n"));
        assert!(formatted.contains("  error: bad ending"));
        assert!(formatted.contains("= help: add a newline"));
    }

    #[test]
    fn format_omits_help_when_none() {
        let formatted = make_diagnostic("PS002", Severity::Error).format();
        assert!(!formatted.contains("help:"));
    }

    #[test]
    fn has_diagnostics_at_threshold() {
        let mut result = CheckResult::new();
        result
            .diagnostics
            .push(make_diagnostic("PS002", Severity::Warning));
        assert!(!result.has_errors());
        assert!(!result.has_diagnostics_at(Severity::Error));
        assert!(result.has_diagnostics_at(Severity::Warning));
    }

    #[test]
    fn sort_orders_by_code_then_file() {
        let mut result = CheckResult::new();
        result
            .diagnostics
            .push(make_diagnostic("PS002", Severity::Error).with_file("b.proto"));
        result
            .diagnostics
            .push(make_diagnostic("PS002", Severity::Error).with_file("a.proto"));
        result
            .diagnostics
            .push(make_diagnostic("PS001", Severity::Error));
        result.sort();
        let order: Vec<(&str, Option<&PathBuf>)> = result
            .diagnostics
            .iter()
            .map(|d| (d.code.as_str(), d.files.first()))
            .collect();
        assert_eq!(order[0].0, "PS001");
        assert_eq!(order[1].1, Some(&PathBuf::from("a.proto")));
        assert_eq!(order[2].1, Some(&PathBuf::from("b.proto")));
    }

    #[test]
    fn count_by_severity_buckets() {
        let mut result = CheckResult::new();
        result
            .diagnostics
            .push(make_diagnostic("PS001", Severity::Error));
        result
            .diagnostics
            .push(make_diagnostic("PS002", Severity::Info));
        assert_eq!(result.count_by_severity(), (1, 0, 1));
        assert_eq!(result.by_check("PS001").len(), 1);
    }
}
