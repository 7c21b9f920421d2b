//! Check presets for common configurations.

use crate::{bug_entry, gn, proto_newline, BugEntrySyntax, NoMixingSources, ProtoTrailingNewline};
use presubmit_core::{CheckBox, CheckConfig, CheckError, Config};
use std::str::FromStr;

/// Preset configurations for presubmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every check with its defaults.
    Recommended,
    /// Every check, and a BUG field is mandatory.
    Strict,
    /// Only the GN source-mixing check.
    Minimal,
}

impl Preset {
    /// Returns the checks for this preset, with default options.
    #[must_use]
    pub fn checks(self) -> Vec<CheckBox> {
        match self {
            Self::Recommended => all_checks(),
            Self::Strict => vec![
                Box::new(BugEntrySyntax::new().require(true)),
                Box::new(ProtoTrailingNewline::new()),
                Box::new(NoMixingSources::new()),
            ],
            Self::Minimal => vec![Box::new(NoMixingSources::new())],
        }
    }

    fn names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended | Self::Strict => {
                &[bug_entry::NAME, proto_newline::NAME, gn::NAME]
            }
            Self::Minimal => &[gn::NAME],
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "recommended" | "default" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            other => Err(format!("unknown preset: {other}")),
        }
    }
}

/// Returns all available checks with default options.
#[must_use]
pub fn all_checks() -> Vec<CheckBox> {
    vec![
        Box::new(BugEntrySyntax::new()),
        Box::new(ProtoTrailingNewline::new()),
        Box::new(NoMixingSources::new()),
    ]
}

/// Builds one check by name or code, applying its config section if given.
///
/// Returns `Ok(None)` for an unknown name.
///
/// # Errors
///
/// Returns an error if the check's options are invalid.
pub fn check_by_name(
    name: &str,
    config: Option<&CheckConfig>,
) -> Result<Option<CheckBox>, CheckError> {
    let default = CheckConfig::default();
    let config = config.unwrap_or(&default);
    let check: CheckBox = match name {
        bug_entry::NAME | bug_entry::CODE => Box::new(BugEntrySyntax::from_config(config)?),
        proto_newline::NAME | proto_newline::CODE => {
            Box::new(ProtoTrailingNewline::from_config(config)?)
        }
        gn::NAME | gn::CODE => Box::new(NoMixingSources::from_config(config)?),
        _ => return Ok(None),
    };
    Ok(Some(check))
}

/// Builds the checks selected by a config file.
///
/// The `preset` key picks the base set (recommended when absent or
/// unknown); each check then reads its own `[checks.<name>]` options. A
/// check explicitly enabled in the config is added even if the preset
/// leaves it out.
///
/// # Errors
///
/// Returns an error if any check's options are invalid.
pub fn checks_from_config(config: &Config) -> Result<Vec<CheckBox>, CheckError> {
    let preset = config
        .preset
        .as_deref()
        .and_then(|p| p.parse().ok())
        .unwrap_or(Preset::Recommended);

    let mut checks = Vec::new();
    for name in [bug_entry::NAME, proto_newline::NAME, gn::NAME] {
        let section = config.check_config(name);
        let explicitly_enabled = section.and_then(|c| c.enabled) == Some(true);
        if !preset.names().contains(&name) && !explicitly_enabled {
            continue;
        }

        let mut merged = section.cloned().unwrap_or_default();
        if preset == Preset::Strict && name == bug_entry::NAME {
            merged
                .options
                .entry("require".to_string())
                .or_insert(toml::Value::Boolean(true));
        }
        if let Some(check) = check_by_name(name, Some(&merged))? {
            checks.push(check);
        }
    }
    Ok(checks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(checks: &[CheckBox]) -> Vec<&'static str> {
        checks.iter().map(|c| c.name()).collect()
    }

    #[test]
    fn test_preset_checks() {
        assert_eq!(Preset::Recommended.checks().len(), 3);
        assert_eq!(Preset::Strict.checks().len(), 3);
        assert_eq!(
            names(&Preset::Minimal.checks()),
            vec!["gn-no-mixing-sources"]
        );
    }

    #[test]
    fn preset_from_str() {
        assert_eq!("strict".parse::<Preset>(), Ok(Preset::Strict));
        assert_eq!("Minimal".parse::<Preset>(), Ok(Preset::Minimal));
        assert!("bogus".parse::<Preset>().is_err());
    }

    #[test]
    fn lookup_by_name_or_code() {
        assert_eq!(
            check_by_name("PS002", None).unwrap().unwrap().name(),
            "proto-trailing-newline"
        );
        assert_eq!(
            check_by_name("bug-entry-syntax", None).unwrap().unwrap().code(),
            "PS001"
        );
        assert!(check_by_name("no-such-check", None).unwrap().is_none());
    }

    #[test]
    fn config_selects_preset_and_extra_checks() {
        let config = Config::parse(
            r#"
preset = "minimal"

[checks.proto-trailing-newline]
enabled = true
"#,
        )
        .unwrap();
        let checks = checks_from_config(&config).unwrap();
        assert_eq!(
            names(&checks),
            vec!["proto-trailing-newline", "gn-no-mixing-sources"]
        );
    }

    #[test]
    fn default_config_gets_every_check() {
        let checks = checks_from_config(&Config::default()).unwrap();
        assert_eq!(checks.len(), 3);
    }

    #[test]
    fn invalid_options_surface() {
        let config = Config::parse(
            r#"
[checks.gn-no-mixing-sources]
patterns = ["["]
"#,
        )
        .unwrap();
        assert!(checks_from_config(&config).is_err());
    }
}
