//! Context types for check execution.

use crate::check::CheckError;
use std::path::{Path, PathBuf};

/// A file touched by the change under review.
///
/// Bytes are loaded eagerly by the [`ChangeProvider`](crate::ChangeProvider)
/// so checks never perform I/O themselves. Decoding is left to the checks
/// that select the file, so binary files in a change are harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    /// Path as supplied by the provider (absolute or relative to the cwd).
    pub path: PathBuf,
    /// Path relative to the changeset root, used in diagnostics.
    pub relative_path: PathBuf,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl ChangedFile {
    /// Creates a changed file, computing its root-relative path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>, root: &Path) -> Self {
        let path = path.into();
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.clone(), Path::to_path_buf);
        Self {
            path,
            relative_path,
            bytes: bytes.into(),
        }
    }

    /// Returns the content as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Decode`] naming `check` when the file is not
    /// valid UTF-8.
    pub fn text(&self, check: &'static str) -> Result<&str, CheckError> {
        std::str::from_utf8(&self.bytes).map_err(|source| CheckError::Decode {
            check,
            path: self.path.clone(),
            source,
        })
    }

    /// Returns the root-relative path with `/` separators.
    #[must_use]
    pub fn local_path(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }

    /// Returns the file name component, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.relative_path.file_name().and_then(|n| n.to_str())
    }

    /// Checks whether the file name or local path matches any of the globs.
    ///
    /// Patterns without a `/` are matched against the file name only, so
    /// `*.gn` matches `BUILD.gn` at any depth.
    #[must_use]
    pub fn matches_any(&self, patterns: &[glob::Pattern]) -> bool {
        let local = self.local_path();
        let name = self.file_name().unwrap_or_default();
        patterns.iter().any(|p| {
            if p.as_str().contains('/') {
                p.matches(&local)
            } else {
                p.matches(name)
            }
        })
    }
}

/// Everything a check may look at: the changed files plus change metadata.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    /// Root directory of the repository.
    pub root: PathBuf,
    /// Files touched by the change.
    pub files: Vec<ChangedFile>,
    /// Issue-tracker reference field (e.g., `webrtc:1234,chromium:5678`).
    pub bug: Option<String>,
}

impl Changeset {
    /// Creates a new changeset rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: Vec::new(),
            bug: None,
        }
    }

    /// Sets the changed files.
    #[must_use]
    pub fn with_files(mut self, files: Vec<ChangedFile>) -> Self {
        self.files = files;
        self
    }

    /// Sets the bug field.
    #[must_use]
    pub fn with_bug(mut self, bug: impl Into<String>) -> Self {
        self.bug = Some(bug.into());
        self
    }

    /// Iterates over changed files matching any of the given globs.
    pub fn files_matching<'a>(
        &'a self,
        patterns: &'a [glob::Pattern],
    ) -> impl Iterator<Item = &'a ChangedFile> + 'a {
        self.files.iter().filter(move |f| f.matches_any(patterns))
    }
}

/// Extracts the bug field from a commit message.
///
/// Recognises `Bug: ...` footers and legacy `BUG=...` lines. Multiple lines
/// are joined with `,` in the order they appear. Returns `None` when the
/// message carries no bug line.
#[must_use]
pub fn bug_from_description(description: &str) -> Option<String> {
    let entries: Vec<&str> = description
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            line.strip_prefix("Bug:")
                .or_else(|| line.strip_prefix("BUG="))
                .map(str::trim)
        })
        .filter(|value| !value.is_empty())
        .collect();

    if entries.is_empty() {
        None
    } else {
        Some(entries.join(","))
    }
}
