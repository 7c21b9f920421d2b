//! Check that `.proto` files end with exactly one newline.
//!
//! # Configuration
//!
//! - `patterns`: Globs selecting schema files (default: `["*.proto"]`)

use presubmit_core::{Check, CheckConfig, CheckError, Changeset, Diagnostic, Severity};
use tracing::debug;

/// Check code for proto-trailing-newline.
pub const CODE: &str = "PS002";

/// Check name for proto-trailing-newline.
pub const NAME: &str = "proto-trailing-newline";

const DEFAULT_PATTERNS: &[&str] = &["*.proto"];

/// Requires exactly one trailing line break in schema files.
#[derive(Debug, Clone)]
pub struct ProtoTrailingNewline {
    patterns: Vec<glob::Pattern>,
}

impl Default for ProtoTrailingNewline {
    fn default() -> Self {
        Self::new()
    }
}

impl ProtoTrailingNewline {
    /// Creates the check for `*.proto` files.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: crate::default_patterns(DEFAULT_PATTERNS),
        }
    }

    /// Creates the check from its `[checks.proto-trailing-newline]` section.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidOption`] for a malformed glob.
    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckError> {
        let patterns = crate::patterns_from_config(config, NAME, DEFAULT_PATTERNS)?;
        Ok(Self { patterns })
    }
}

/// Returns true if `content` is empty or ends in exactly one line break.
#[must_use]
pub fn ends_with_single_newline(content: &str) -> bool {
    if content.is_empty() {
        return true;
    }
    let Some(rest) = content
        .strip_suffix("\r\n")
        .or_else(|| content.strip_suffix('\n'))
    else {
        return false;
    };
    !rest.ends_with(['\n', '\r'])
}

impl Check for ProtoTrailingNewline {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires .proto files to end with exactly one newline"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
        let mut diagnostics = Vec::new();
        for file in changeset.files_matching(&self.patterns) {
            let ok = ends_with_single_newline(file.text(NAME)?);
            debug!("{}: trailing newline ok = {ok}", file.local_path());
            if ok {
                continue;
            }
            let path = file.local_path();
            diagnostics.push(
                Diagnostic::new(
                    CODE,
                    NAME,
                    self.default_severity(),
                    format!("File {path} must end with exactly one newline."),
                )
                .with_file(&file.relative_path),
            );
        }
        Ok(diagnostics)
    }
}
