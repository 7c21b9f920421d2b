//! Integration test: provider → changeset → checks → result via Runner.

use presubmit_core::{
    Changeset, Check, CheckError, Config, Diagnostic, PathListProvider, ProviderError, Runner,
    RunnerError, Severity,
};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Flags every changed `.txt` file whose text contains "TODO".
struct NoTodo;

impl Check for NoTodo {
    fn name(&self) -> &'static str {
        "no-todo"
    }

    fn code(&self) -> &'static str {
        "IT001"
    }

    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
        let patterns = [glob::Pattern::new("*.txt").unwrap()];
        let mut found = Vec::new();
        for file in changeset.files_matching(&patterns) {
            if file.text(self.name())?.contains("TODO") {
                found.push(
                    Diagnostic::new(self.code(), self.name(), Severity::Warning, "TODO left")
                        .with_file(&file.relative_path),
                );
            }
        }
        Ok(found)
    }
}

/// Reports the bug field back so the test can see it arrived.
struct EchoBug;

impl Check for EchoBug {
    fn name(&self) -> &'static str {
        "echo-bug"
    }

    fn code(&self) -> &'static str {
        "IT002"
    }

    fn check(&self, changeset: &Changeset) -> Result<Vec<Diagnostic>, CheckError> {
        Ok(changeset
            .bug
            .iter()
            .map(|bug| Diagnostic::new(self.code(), self.name(), Severity::Info, bug.clone()))
            .collect())
    }
}

fn write_tree(tmp: &TempDir) {
    fs::write(tmp.path().join("b.txt"), "TODO: later\n").unwrap();
    fs::write(tmp.path().join("a.txt"), "TODO: now\n").unwrap();
    fs::write(tmp.path().join("c.txt"), "done\n").unwrap();
}

#[test]
fn explicit_paths_are_checked_and_sorted() {
    let tmp = TempDir::new().unwrap();
    write_tree(&tmp);

    let runner = Runner::builder()
        .root(tmp.path())
        .provider(PathListProvider::new(
            tmp.path(),
            vec!["b.txt".into(), "a.txt".into(), "c.txt".into()],
        ))
        .check(NoTodo)
        .check(EchoBug)
        .bug("webrtc:1")
        .build()
        .expect("runner should build");

    let result = runner.run().expect("run should succeed");

    assert_eq!(result.files_checked, 3);
    let summary: Vec<(&str, Option<&PathBuf>)> = result
        .diagnostics
        .iter()
        .map(|d| (d.code.as_str(), d.files.first()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("IT001", Some(&PathBuf::from("a.txt"))),
            ("IT001", Some(&PathBuf::from("b.txt"))),
            ("IT002", None),
        ]
    );
    assert_eq!(result.diagnostics[2].message, "webrtc:1");
    assert!(!result.has_errors());
}

#[test]
fn default_provider_walks_the_root() {
    let tmp = TempDir::new().unwrap();
    write_tree(&tmp);

    let runner = Runner::builder()
        .root(tmp.path())
        .check(NoTodo)
        .build()
        .unwrap();

    let result = runner.run().unwrap();
    assert_eq!(result.files_checked, 3);
    assert_eq!(result.by_check("no-todo").len(), 2);
}

#[test]
fn unreadable_file_fails_the_run() {
    let tmp = TempDir::new().unwrap();

    let runner = Runner::builder()
        .root(tmp.path())
        .provider(PathListProvider::new(tmp.path(), vec!["gone.txt".into()]))
        .check(NoTodo)
        .build()
        .unwrap();

    let err = runner.run().unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Provider(ProviderError::Read { .. })
    ));
}

#[test]
fn unselected_binary_file_is_ignored() {
    let tmp = TempDir::new().unwrap();
    write_tree(&tmp);
    fs::write(tmp.path().join("logo.png"), [0x89, 0x50, 0x4e, 0x47, 0xff, 0xfe]).unwrap();

    let runner = Runner::builder()
        .root(tmp.path())
        .check(NoTodo)
        .build()
        .unwrap();

    let result = runner.run().unwrap();
    assert_eq!(result.files_checked, 4);
    assert_eq!(result.by_check("no-todo").len(), 2);
}

#[test]
fn selected_file_that_is_not_utf8_fails_the_run() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("notes.txt"), [b'T', b'O', 0xff, 0xfe]).unwrap();

    let runner = Runner::builder()
        .root(tmp.path())
        .provider(PathListProvider::new(tmp.path(), vec!["notes.txt".into()]))
        .check(NoTodo)
        .build()
        .unwrap();

    let err = runner.run().unwrap_err();
    assert!(matches!(
        err,
        RunnerError::Check(CheckError::Decode { check: "no-todo", .. })
    ));
}

#[test]
fn config_overrides_apply_end_to_end() {
    let tmp = TempDir::new().unwrap();
    write_tree(&tmp);

    let config = Config::parse(
        r#"
[checks.no-todo]
severity = "error"

[checks.echo-bug]
enabled = false
"#,
    )
    .unwrap();

    let runner = Runner::builder()
        .root(tmp.path())
        .config(config)
        .check(NoTodo)
        .check(EchoBug)
        .bug("webrtc:1")
        .build()
        .unwrap();

    let result = runner.run().unwrap();
    assert!(result.has_errors());
    assert!(result.by_check("echo-bug").is_empty());
}
