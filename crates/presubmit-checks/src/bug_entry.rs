//! Check that the change's BUG field references issues with a tracker prefix.
//!
//! # Rationale
//!
//! Bare issue numbers are ambiguous across trackers. Every entry must name
//! its tracker, as in `webrtc:1234` or `chromium:567890`.
//!
//! # Configuration
//!
//! - `require`: Fail when the change has no BUG field at all (default: false)
//! - `chromium_threshold`: Bare numbers above this are guessed to be
//!   chromium issues in the suggestion (default: 100000)
//! - `pattern`: Regex a valid entry must fully match (default: `\w+:\d+`)

use presubmit_core::{Check, CheckConfig, CheckError, Changeset, Diagnostic};
use regex::Regex;
use tracing::debug;

/// Check code for bug-entry-syntax.
pub const CODE: &str = "PS001";

/// Check name for bug-entry-syntax.
pub const NAME: &str = "bug-entry-syntax";

const DEFAULT_PATTERN: &str = r"\w+:\d+";
const DEFAULT_CHROMIUM_THRESHOLD: u64 = 100_000;

const EXAMPLE: &str = "Please specify the issue tracker prefix and the issue number, \
                       separated by a colon, e.g. webrtc:123 or chromium:12345.";

/// Validates the syntax of every entry in the BUG field.
#[derive(Debug, Clone)]
pub struct BugEntrySyntax {
    /// Fail when the BUG field is missing.
    pub require: bool,
    /// Bare numbers above this are suggested as `chromium:<n>`.
    pub chromium_threshold: u64,
    pattern: String,
}

impl Default for BugEntrySyntax {
    fn default() -> Self {
        Self::new()
    }
}

impl BugEntrySyntax {
    /// Creates the check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            require: false,
            chromium_threshold: DEFAULT_CHROMIUM_THRESHOLD,
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }

    /// Sets whether a missing BUG field is an error.
    #[must_use]
    pub fn require(mut self, require: bool) -> Self {
        self.require = require;
        self
    }

    /// Sets the chromium guess threshold.
    #[must_use]
    pub fn chromium_threshold(mut self, threshold: u64) -> Self {
        self.chromium_threshold = threshold;
        self
    }

    /// Creates the check from its `[checks.bug-entry-syntax]` section.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidOption`] for a negative threshold or a
    /// pattern that does not compile.
    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckError> {
        let threshold = config.get_int(
            "chromium_threshold",
            i64::try_from(DEFAULT_CHROMIUM_THRESHOLD).unwrap_or(i64::MAX),
        );
        let threshold = u64::try_from(threshold).map_err(|_| CheckError::InvalidOption {
            check: NAME,
            option: "chromium_threshold".to_string(),
            message: format!("must not be negative, got {threshold}"),
        })?;

        let mut check = Self::new()
            .require(config.get_bool("require", false))
            .chromium_threshold(threshold);
        if let Some(pattern) = config.options.get("pattern").and_then(|v| v.as_str()) {
            check.pattern = pattern.to_string();
        }
        check.compile()?;
        Ok(check)
    }

    fn compile(&self) -> Result<Regex, CheckError> {
        Regex::new(&format!("^(?:{})$", self.pattern)).map_err(|e| CheckError::InvalidOption {
            check: NAME,
            option: "pattern".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates a BUG field and returns one message per bad entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured pattern does not compile.
    pub fn validate(&self, field: &str) -> Result<Vec<String>, CheckError> {
        let pattern = self.compile()?;
        let mut problems = Vec::new();

        for entry in field.split(',').map(str::trim) {
            if entry.is_empty() || entry.eq_ignore_ascii_case("none") {
                continue;
            }
            if !entry.contains(':') && entry.bytes().all(|b| b.is_ascii_digit()) {
                problems.push(format!(
                    "BUG entry requires issue tracker prefix, e.g. {}:{entry}",
                    self.guess_tracker(entry)
                ));
            } else if !pattern.is_match(entry) {
                problems.push(format!("Bogus BUG entry: {entry}. {EXAMPLE}"));
            } else {
                debug!("BUG entry {entry} ok");
            }
        }

        Ok(problems)
    }

    fn guess_tracker(&self, number: &str) -> &'static str {
        // Numbers too large for u64 are certainly above the threshold.
        let above = number
            .parse::<u64>()
            .map_or(true, |n| n > self.chromium_threshold);
        if above {
            "chromium"
        } else {
            "webrtc"
        }
    }

    fn diagnostic(&self, message: impl Into<String>) -> Diagnostic {
        Diagnostic::new(CODE, NAME, self.default_severity(), message)
            .with_help("Use `Bug: <tracker>:<number>`, e.g. `Bug: webrtc:123`")
    }
}

impl Check for BugEntrySyntax {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires BUG entries of the form <tracker>:<number>"
    }

    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
        let Some(field) = changeset.bug.as_deref() else {
            if self.require {
                return Ok(vec![self.diagnostic(format!("Missing BUG entry. {EXAMPLE}"))]);
            }
            return Ok(Vec::new());
        };

        Ok(self
            .validate(field)?
            .into_iter()
            .map(|message| self.diagnostic(message))
            .collect())
    }
}
