//! # presubmit-core
//!
//! Core framework for source-tree hygiene checks run before a change lands.
//!
//! This crate provides the foundational traits and types for building
//! presubmit checks. It includes:
//!
//! - [`Check`] trait for changeset-wide checks
//! - [`ChangeProvider`] trait for supplying the files a change touches
//! - [`Runner`] for orchestrating check execution
//! - [`Diagnostic`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use presubmit_core::{PathListProvider, Runner};
//!
//! let runner = Runner::builder()
//!     .root(".")
//!     .provider(PathListProvider::new(".", vec!["api/BUILD.gn".into()]))
//!     .check(MyCheck::new())
//!     .build()?;
//!
//! let result = runner.run()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod check;
mod config;
mod context;
mod provider;
mod runner;
mod types;

pub use check::{Check, CheckBox, CheckError};
pub use config::{CheckConfig, Config, ConfigError, FilesConfig};
pub use context::{bug_from_description, ChangedFile, Changeset};
pub use provider::{
    ChangeProvider, PathListProvider, ProviderBox, ProviderError, WorkspaceProvider,
};
pub use runner::{Runner, RunnerBuilder, RunnerError};
pub use types::{CheckResult, Diagnostic, DiagnosticReport, Severity};
