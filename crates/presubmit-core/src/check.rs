//! Check trait for defining presubmit checks.

use crate::context::Changeset;
use crate::types::{Diagnostic, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Errors a check can raise while producing its diagnostics.
///
/// Anything the check can interpret locally (odd syntax in a build file, an
/// unknown extension) is skipped instead; these are genuine failures.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Serializing a structured report failed.
    #[error("failed to render report for {check}: {source}")]
    Render {
        /// Name of the check that failed.
        check: &'static str,
        /// Underlying serialization error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A file selected by the check is not valid UTF-8.
    #[error("{check} cannot read {path}: not valid UTF-8 ({source})")]
    Decode {
        /// Name of the check that selected the file.
        check: &'static str,
        /// Offending file.
        path: PathBuf,
        /// Position of the first invalid byte.
        source: std::str::Utf8Error,
    },

    /// A check option had an unusable value.
    #[error("invalid option `{option}` for {check}: {message}")]
    InvalidOption {
        /// Name of the check.
        check: &'static str,
        /// Option key.
        option: String,
        /// What was wrong with it.
        message: String,
    },
}

/// A changeset-wide presubmit check.
///
/// Checks receive the whole [`Changeset`] rather than one file at a time so
/// they can aggregate findings across files into a single diagnostic.
///
/// # Example
///
/// ```ignore
/// use presubmit_core::{Check, CheckError, Changeset, Diagnostic, Severity};
///
/// pub struct NoEmptyFiles;
///
/// impl Check for NoEmptyFiles {
///     fn name(&self) -> &'static str { "no-empty-files" }
///     fn code(&self) -> &'static str { "PS100" }
///
///     fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
///         Ok(changeset
///             .files
///             .iter()
///             .filter(|f| f.bytes.is_empty())
///             .map(|f| {
///                 Diagnostic::new(self.code(), self.name(), Severity::Warning, "empty file")
///                     .with_file(&f.relative_path)
///             })
///             .collect())
///     }
/// }
/// ```
pub trait Check: Send + Sync {
    /// Returns the kebab-case name of this check (e.g., "proto-trailing-newline").
    fn name(&self) -> &'static str;

    /// Returns the check code (e.g., "PS002").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this check enforces.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for diagnostics from this check.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Checks the changeset and returns any diagnostics found.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures the check cannot recover from.
    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError>;
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ChangedFile;
    use std::path::Path;

    struct NoEmptyFiles;

    impl Check for NoEmptyFiles {
        fn name(&self) -> &'static str {
            "no-empty-files"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test check"
        }

        fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
            Ok(changeset
                .files
                .iter()
                .filter(|f| f.bytes.is_empty())
                .map(|f| {
                    Diagnostic::new(self.code(), self.name(), self.default_severity(), "empty")
                        .with_file(&f.relative_path)
                })
                .collect())
        }
    }

    #[test]
    fn test_check_trait() {
        let check = NoEmptyFiles;
        assert_eq!(check.name(), "no-empty-files");
        assert_eq!(check.code(), "TEST001");
        assert_eq!(check.default_severity(), Severity::Error);

        let root = Path::new("/repo");
        let changeset = Changeset::new(root).with_files(vec![
            ChangedFile::new("/repo/a.txt", "", root),
            ChangedFile::new("/repo/b.txt", "x\n", root),
        ]);
        let found = check.check(&changeset).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].files, vec![std::path::PathBuf::from("a.txt")]);
    }
}
