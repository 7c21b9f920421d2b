//! Check command implementation.

use anyhow::{Context, Result};
use presubmit_checks::{check_by_name, checks_from_config};
use presubmit_core::{bug_from_description, CheckBox, Config, PathListProvider, Runner};
use std::path::{Path, PathBuf};

use crate::OutputFormat;

/// Config file names looked up in each directory, in order.
const CONFIG_NAMES: &[&str] = &["presubmit.toml", ".presubmit.toml"];

/// Arguments of `presubmit check`.
pub struct CheckArgs {
    /// Repository root.
    pub root: PathBuf,
    /// Explicit `--config` path.
    pub config: Option<PathBuf>,
    /// Explicit changed files; empty means walk the root.
    pub paths: Vec<PathBuf>,
    /// BUG field given on the command line.
    pub bug: Option<String>,
    /// Commit message to read the BUG field from.
    pub commit_message: Option<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated check filter.
    pub checks: Option<String>,
    /// Extra exclude globs for the tree walk.
    pub exclude: Vec<String>,
}

/// Runs the check command.
pub fn run(args: CheckArgs) -> Result<()> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let root = cwd.join(&args.root);

    let mut config = load_config(&root, args.config.as_deref(), user_config_dir())?;
    config.files.exclude.extend(args.exclude);
    let fail_on = config.fail_on().context("Invalid fail_on in config")?;

    let bug = match (args.bug, &args.commit_message) {
        (Some(bug), _) => Some(bug),
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read commit message: {}", path.display()))?;
            bug_from_description(&text)
        }
        (None, None) => None,
    };

    let checks = match args.checks.as_deref() {
        Some(filter) => filter_checks(filter, &config)?,
        None => checks_from_config(&config).context("Invalid check configuration")?,
    };

    let mut builder = Runner::builder().root(&root).config(config);
    if !args.paths.is_empty() {
        let paths = args
            .paths
            .into_iter()
            .map(|p| absolutize(&cwd, p))
            .collect();
        builder = builder.provider(PathListProvider::new(&root, paths));
    }
    if let Some(bug) = bug {
        builder = builder.bug(bug);
    }
    for check in checks {
        builder = builder.check_box(check);
    }

    let runner = builder.build().context("Failed to build runner")?;

    tracing::info!(
        "Checking {} with {} checks",
        runner.root().display(),
        runner.check_count()
    );

    let result = runner.run().context("Presubmit failed")?;

    super::output::print(&result, args.format)?;

    if result.has_diagnostics_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Loads the configuration for a run rooted at `root`.
///
/// `--config` wins. Otherwise the nearest config file between `root` and the
/// top of its checkout applies, then `config.toml` in the user directory,
/// then the built-in defaults.
fn load_config(
    root: &Path,
    explicit: Option<&Path>,
    user_dir: Option<PathBuf>,
) -> Result<Config> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(root).or_else(|| {
            user_dir
                .map(|dir| dir.join("config.toml"))
                .filter(|p| p.is_file())
        }),
    };
    let Some(path) = path else {
        tracing::debug!("No config under {}, using defaults", root.display());
        return Ok(Config::default());
    };
    tracing::info!("Using config: {}", path.display());
    Config::from_file(&path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Walks up from `root`, stopping after the directory that holds `.git`,
/// so a run over a subdirectory still picks up the checkout's config.
fn find_config(root: &Path) -> Option<PathBuf> {
    for dir in root.ancestors() {
        let found = CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(".git").exists() {
            break;
        }
    }
    None
}

/// `$PRESUBMIT_CONFIG_DIR`, else `~/.presubmit`.
fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os("PRESUBMIT_CONFIG_DIR") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => home::home_dir().map(|h| h.join(".presubmit")),
    }
}

/// Paths that exist relative to the cwd are made absolute; the rest are
/// left for the provider to resolve against the root.
fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() && path.exists() {
        cwd.join(path)
    } else {
        path
    }
}

fn filter_checks(filter: &str, config: &Config) -> Result<Vec<CheckBox>> {
    let mut checks = Vec::new();

    for name in filter.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        // Resolve codes to names first so the right config section applies.
        let Some(known) = check_by_name(name, None)? else {
            tracing::warn!("Unknown check: {}", name);
            continue;
        };
        let canonical = known.name();
        if let Some(check) = check_by_name(canonical, config.check_config(canonical))
            .with_context(|| format!("Invalid configuration for {canonical}"))?
        {
            checks.push(check);
        }
    }

    Ok(checks)
}
