//! # presubmit-checks
//!
//! Built-in presubmit checks.
//!
//! ## Available Checks
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | PS001 | `bug-entry-syntax` | Requires BUG entries of the form `<tracker>:<number>` |
//! | PS002 | `proto-trailing-newline` | Requires `.proto` files to end with exactly one newline |
//! | PS003 | `gn-no-mixing-sources` | Forbids GN targets that mix `.c`, `.cc` and `.m`/`.mm` sources |
//!
//! ## Usage
//!
//! ```ignore
//! use presubmit_core::Runner;
//! use presubmit_checks::{BugEntrySyntax, NoMixingSources};
//!
//! let runner = Runner::builder()
//!     .root(".")
//!     .bug("webrtc:1234")
//!     .check(BugEntrySyntax::new())
//!     .check(NoMixingSources::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod bug_entry;
pub mod gn;
mod presets;
mod proto_newline;

pub use bug_entry::BugEntrySyntax;
pub use gn::NoMixingSources;
pub use presets::{all_checks, check_by_name, checks_from_config, Preset};
pub use proto_newline::{ends_with_single_newline, ProtoTrailingNewline};

/// Re-export core types for convenience.
pub use presubmit_core::{Check, Diagnostic, Severity};

use presubmit_core::{CheckConfig, CheckError};

fn default_patterns(globs: &[&str]) -> Vec<glob::Pattern> {
    globs
        .iter()
        .filter_map(|g| glob::Pattern::new(g).ok())
        .collect()
}

/// Reads the `patterns` option, falling back to `defaults` when absent.
fn patterns_from_config(
    config: &CheckConfig,
    check: &'static str,
    defaults: &[&str],
) -> Result<Vec<glob::Pattern>, CheckError> {
    let Some(globs) = config.get_str_array("patterns") else {
        return Ok(default_patterns(defaults));
    };
    globs
        .iter()
        .map(|g| {
            glob::Pattern::new(g).map_err(|e| CheckError::InvalidOption {
                check,
                option: "patterns".to_string(),
                message: format!("{g}: {e}"),
            })
        })
        .collect()
}
