//! Runner for orchestrating presubmit checks over a changeset.

use crate::check::{Check, CheckBox, CheckError};
use crate::config::{CheckConfig, Config};
use crate::context::Changeset;
use crate::provider::{ChangeProvider, ProviderBox, ProviderError, WorkspaceProvider};
use crate::types::{CheckResult, Diagnostic};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while running checks.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// IO error resolving the root directory.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Collecting changed files failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// A check failed outright.
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring a [`Runner`].
#[derive(Default)]
pub struct RunnerBuilder {
    root: Option<PathBuf>,
    checks: Vec<CheckBox>,
    provider: Option<ProviderBox>,
    bug: Option<String>,
    config: Option<Config>,
}

impl RunnerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the repository root.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a check to the runner.
    #[must_use]
    pub fn check<C: Check + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Adds a boxed check to the runner.
    #[must_use]
    pub fn check_box(mut self, check: CheckBox) -> Self {
        self.checks.push(check);
        self
    }

    /// Sets where changed files come from.
    ///
    /// Defaults to walking the root with [`WorkspaceProvider`].
    #[must_use]
    pub fn provider<P: ChangeProvider + 'static>(mut self, provider: P) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    /// Sets the bug field of the change.
    #[must_use]
    pub fn bug(mut self, bug: impl Into<String>) -> Self {
        self.bug = Some(bug.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the runner.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn build(self) -> Result<Runner, RunnerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.files.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let provider: ProviderBox = match self.provider {
            Some(provider) => provider,
            None => Box::new(
                WorkspaceProvider::new(&root)
                    .excludes(config.files.exclude.clone())
                    .respect_gitignore(config.files.respect_gitignore),
            ),
        };

        Ok(Runner {
            root,
            checks: self.checks,
            provider,
            bug: self.bug,
            config,
        })
    }
}

/// The main runner that orchestrates check execution.
///
/// Use [`Runner::builder()`] to construct an instance.
pub struct Runner {
    root: PathBuf,
    checks: Vec<CheckBox>,
    provider: ProviderBox,
    bug: Option<String>,
    config: Config,
}

impl Runner {
    /// Creates a new builder for configuring a runner.
    #[must_use]
    pub fn builder() -> RunnerBuilder {
        RunnerBuilder::new()
    }

    /// Returns the repository root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered checks.
    #[must_use]
    pub fn check_count(&self) -> usize {
        self.checks.len()
    }

    /// Collects the changeset and runs every enabled check over it.
    ///
    /// # Errors
    ///
    /// Returns an error if a changed file cannot be read or a check fails.
    pub fn run(&self) -> Result<CheckResult, RunnerError> {
        info!("Starting presubmit at {:?}", self.root);

        let files = self.provider.changed_files()?;
        info!("Found {} changed files", files.len());

        let mut changeset = Changeset::new(&self.root).with_files(files);
        changeset.bug.clone_from(&self.bug);

        let mut result = self.run_on(&changeset)?;
        result.files_checked = changeset.files.len();
        Ok(result)
    }

    /// Runs every enabled check over an already collected changeset.
    ///
    /// # Errors
    ///
    /// Returns an error if a check fails.
    pub fn run_on(&self, changeset: &Changeset) -> Result<CheckResult, RunnerError> {
        let mut result = CheckResult::new();
        result.files_checked = changeset.files.len();

        for check in &self.checks {
            if !self.config.is_check_enabled(check.name()) {
                debug!("Skipping disabled check: {}", check.name());
                continue;
            }

            let diagnostics = check.check(changeset)?;
            debug!("{} produced {} diagnostic(s)", check.name(), diagnostics.len());
            result
                .diagnostics
                .extend(self.apply_severity_override(check.name(), diagnostics));
        }

        result.sort();

        info!(
            "Presubmit complete: {} diagnostics over {} files",
            result.diagnostics.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        check_name: &str,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Vec<Diagnostic> {
        if let Some(severity) = self.config.check_severity(check_name) {
            for d in &mut diagnostics {
                d.severity = severity;
            }
        }
        diagnostics
    }

    /// Gets the configuration for a specific check.
    #[must_use]
    pub fn check_config(&self, check_name: &str) -> Option<&CheckConfig> {
        self.config.check_config(check_name)
    }
}
