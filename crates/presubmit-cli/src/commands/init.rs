//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# presubmit configuration

# Check preset: "recommended", "strict" or "minimal"
preset = "recommended"

# Lowest severity that fails the run
fail_on = "error"

[files]
# Root directory to walk when no paths are given (default: current directory)
# root = "."

# Glob patterns to skip during the walk
exclude = [
    "**/out/**",
    "**/third_party/**",
]

# Respect .gitignore files
respect_gitignore = true

# Check configurations
# Each check can be enabled/disabled and have its severity overridden

[checks.bug-entry-syntax]
enabled = true
# require = true
# chromium_threshold = 100000

[checks.proto-trailing-newline]
enabled = true
# severity = "warning"

[checks.gn-no-mixing-sources]
enabled = true
# patterns = ["*.gn", "*.gni"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("presubmit.toml"), force)?;

    println!("Created presubmit.toml");
    println!("\nNext steps:");
    println!("  1. Edit presubmit.toml to configure checks");
    println!("  2. Run: presubmit check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }
    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use presubmit_core::{Config, Severity};
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.preset.as_deref(), Some("recommended"));
        assert_eq!(config.fail_on().unwrap(), Severity::Error);
        assert!(config.is_check_enabled("gn-no-mixing-sources"));
        assert!(presubmit_checks::checks_from_config(&config).is_ok());
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("presubmit.toml");
        std::fs::write(&path, "# mine\n").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine\n");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
