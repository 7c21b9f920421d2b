//! Check that GN targets do not mix C, C++ and Objective-C sources.
//!
//! # Rationale
//!
//! A single GN target compiles all of its sources with one set of flags.
//! Mixing `.c`, `.cc` and `.m`/`.mm` files in one target leads to subtle
//! toolchain breakage, so each language family gets its own target.
//! Objective-C and Objective-C++ may share a target.
//!
//! # Configuration
//!
//! - `patterns`: Globs selecting GN files (default: `["*.gn", "*.gni"]`)
//!
//! # Output
//!
//! Every violation in the changeset is folded into one error diagnostic
//! whose message carries a sorted JSON dump of offending targets.

mod classifier;
mod family;
mod reporter;
mod scanner;

pub use classifier::{classify, ViolationRecord};
pub use family::{CompatibilityClass, SourceFamily};
pub use reporter::{MixingReport, PREAMBLE};
pub use scanner::{scan_targets, TargetDeclaration};

use presubmit_core::{ChangedFile, Check, CheckConfig, CheckError, Changeset, Diagnostic, Severity};
use tracing::{debug, warn};

/// Check code for gn-no-mixing-sources.
pub const CODE: &str = "PS003";

/// Check name for gn-no-mixing-sources.
pub const NAME: &str = "gn-no-mixing-sources";

const DEFAULT_PATTERNS: &[&str] = &["*.gn", "*.gni"];

/// Forbids GN targets whose sources span more than one compatibility class.
#[derive(Debug, Clone)]
pub struct NoMixingSources {
    patterns: Vec<glob::Pattern>,
}

impl Default for NoMixingSources {
    fn default() -> Self {
        Self::new()
    }
}

impl NoMixingSources {
    /// Creates the check with the default GN file patterns.
    #[must_use]
    pub fn new() -> Self {
        Self {
            patterns: crate::default_patterns(DEFAULT_PATTERNS),
        }
    }

    /// Creates the check from its `[checks.gn-no-mixing-sources]` section.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::InvalidOption`] for a malformed glob.
    pub fn from_config(config: &CheckConfig) -> Result<Self, CheckError> {
        let patterns = crate::patterns_from_config(config, NAME, DEFAULT_PATTERNS)?;
        Ok(Self { patterns })
    }

    /// Returns true if the file is a GN file this check inspects.
    #[must_use]
    pub fn is_gn_file(&self, file: &ChangedFile) -> bool {
        file.matches_any(&self.patterns)
    }

    /// Classifies the given files and folds their violations into a report.
    ///
    /// Files outside the GN patterns are never decoded.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Decode`] if a GN file is not valid UTF-8.
    pub fn collect<'a, I>(&self, files: I) -> Result<MixingReport, CheckError>
    where
        I: IntoIterator<Item = &'a ChangedFile>,
    {
        let mut report = MixingReport::new();
        for file in files.into_iter().filter(|f| self.is_gn_file(f)) {
            let path = file.local_path();
            let records = classify(&path, file.text(NAME)?);
            debug!("{path}: {} mixing target(s)", records.len());
            report.extend(records);
        }
        Ok(report)
    }

    /// Produces the aggregated diagnostic, or `None` when nothing mixes.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Decode`] for a GN file that is not UTF-8, or
    /// [`CheckError::Render`] if the report cannot be serialized.
    pub fn report<'a, I>(&self, files: I) -> Result<Option<Diagnostic>, CheckError>
    where
        I: IntoIterator<Item = &'a ChangedFile>,
    {
        let report = self.collect(files)?;
        if report.is_empty() {
            return Ok(None);
        }

        let message = report.render().map_err(|e| CheckError::Render {
            check: NAME,
            source: Box::new(e),
        })?;
        warn!(
            "{} GN target(s) mix incompatible sources",
            report.target_count()
        );

        let diagnostic = Diagnostic::new(CODE, NAME, self.default_severity(), message)
            .with_files(report.violating_files())
            .with_help("Split the sources into one target per language family");
        Ok(Some(diagnostic))
    }
}

impl Check for NoMixingSources {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids GN targets that mix .c, .cc and .m/.mm sources"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
        Ok(self.report(&changeset.files)?.into_iter().collect())
    }
}
