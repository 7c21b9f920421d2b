//! Change providers: where the list of changed files comes from.
//!
//! A review tool normally knows which files a change touches and hands them
//! over as a path list ([`PathListProvider`]). For local runs without such a
//! list, [`WorkspaceProvider`] walks the whole tree instead.

use crate::context::ChangedFile;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while collecting changed files.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// A changed file could not be read. Never retried or skipped.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Walking the tree failed.
    #[error("Failed to walk {root}: {source}")]
    Walk {
        /// Root being walked.
        root: PathBuf,
        /// Underlying walk error.
        source: ignore::Error,
    },

    /// An exclude pattern is not a valid glob.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Supplies the files touched by a change, with their raw content.
pub trait ChangeProvider: Send + Sync {
    /// Returns the changed files.
    ///
    /// # Errors
    ///
    /// Returns an error if any changed file cannot be read.
    fn changed_files(&self) -> Result<Vec<ChangedFile>, ProviderError>;
}

/// Type alias for boxed `ChangeProvider` trait objects.
pub type ProviderBox = Box<dyn ChangeProvider>;

/// Reads an explicit list of paths.
#[derive(Debug, Clone)]
pub struct PathListProvider {
    root: PathBuf,
    paths: Vec<PathBuf>,
}

impl PathListProvider {
    /// Creates a provider for `paths`, reported relative to `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, paths: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths,
        }
    }
}

impl ChangeProvider for PathListProvider {
    fn changed_files(&self) -> Result<Vec<ChangedFile>, ProviderError> {
        self.paths
            .iter()
            .map(|path| {
                let path = if path.is_absolute() || path.exists() {
                    path.clone()
                } else {
                    self.root.join(path)
                };
                read_changed_file(&path, &self.root)
            })
            .collect()
    }
}

/// Walks a directory tree and treats every file as changed.
#[derive(Debug, Clone)]
pub struct WorkspaceProvider {
    root: PathBuf,
    exclude: Vec<String>,
    respect_gitignore: bool,
}

impl WorkspaceProvider {
    /// Creates a provider walking `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: Vec::new(),
            respect_gitignore: true,
        }
    }

    /// Adds exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether `.gitignore` files are honoured.
    #[must_use]
    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Checks if a root-relative path should be excluded.
    fn should_exclude(patterns: &[glob::Pattern], relative: &Path) -> bool {
        let path_str = relative.to_string_lossy().replace('\\', "/");
        patterns.iter().any(|p| {
            if p.matches(&path_str) {
                return true;
            }
            // "**/out/**" should also catch "out/..." at the root
            let trimmed = p.as_str().trim_start_matches("**/");
            trimmed != p.as_str()
                && glob::Pattern::new(trimmed).is_ok_and(|t| t.matches(&path_str))
        })
    }
}

impl ChangeProvider for WorkspaceProvider {
    fn changed_files(&self) -> Result<Vec<ChangedFile>, ProviderError> {
        let patterns = self
            .exclude
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|source| ProviderError::Walk {
                root: self.root.clone(),
                source,
            })?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(&self.root).unwrap_or(path);
            if Self::should_exclude(&patterns, relative) {
                debug!("Excluding: {}", relative.display());
                continue;
            }
            files.push(read_changed_file(path, &self.root)?);
        }

        Ok(files)
    }
}

fn read_changed_file(path: &Path, root: &Path) -> Result<ChangedFile, ProviderError> {
    debug!("Reading: {}", path.display());
    let bytes = std::fs::read(path).map_err(|source| ProviderError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(ChangedFile::new(path, bytes, root))
}
