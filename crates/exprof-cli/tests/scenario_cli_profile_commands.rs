use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

const WORKSPACE: &str = r#"
editor.tabSize: 4
extension-profiles:
  activeProfiles: ["Docs"]
  profiles:
    Work:
      extensions: ["ext.a", "ext.b"]
      settings:
        editor.tabSize: 2
        files.trimTrailingWhitespace: true
    Docs:
      extensions: ["yzhang.markdown-all-in-one"]
      disabledExtensions: ["ext.a"]
"#;

fn exprof(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("exprof").expect("binary builds");
    cmd.current_dir(dir)
        .env_remove("EXPROF_USER_SETTINGS")
        .env_remove("EXPROF_WORKSPACE_SETTINGS")
        .env_remove("EXPROF_ENABLED_EXTENSIONS")
        .arg("--workspace-settings")
        .arg(dir.join("workspace.yaml"))
        .arg("--enabled-extensions")
        .arg(dir.join("enabled.txt"));
    cmd
}

fn setup() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("workspace.yaml"), WORKSPACE).unwrap();
    fs::write(dir.path().join("enabled.txt"), "ext.a\n").unwrap();
    dir
}

#[test]
fn list_puts_active_profiles_first() {
    let dir = setup();
    exprof(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout("(Active) Docs\nWork\n");
}

#[test]
fn activate_writes_workspace_and_opens_search() {
    let dir = setup();
    exprof(dir.path())
        .args(["activate", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[warn] Profile 'Work': extensions need to be enabled",
        ))
        .stdout(predicate::str::contains("[search] ext.b"))
        .stdout(predicate::str::contains("files.trimTrailingWhitespace = true"))
        .stdout(predicate::str::contains("editor.tabSize").not());

    let written = fs::read_to_string(dir.path().join("workspace.yaml")).unwrap();
    assert!(written.contains("Work"));
    assert!(written.contains("editor.tabSize"));

    exprof(dir.path())
        .args(["activate", "Work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'Work' is already active"));
}

#[test]
fn startup_scan_flags_enabled_extension_that_should_be_off() {
    let dir = setup();
    exprof(dir.path())
        .args(["startup", "--force", "--delay-ms", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[warn] Profile 'Docs': extensions need to be DISABLED",
        ))
        .stdout(predicate::str::contains("-> Show Extensions to Disable"));
}

#[test]
fn startup_without_check_enabled_is_silent() {
    let dir = setup();
    exprof(dir.path())
        .args(["startup", "--delay-ms", "0"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn choices_for_inactive_profile() {
    let dir = setup();
    exprof(dir.path())
        .args(["choices", "Work"])
        .assert()
        .success()
        .stdout("Activate Work profile\nView extensions in Work profile\n");
}

#[test]
fn strict_lint_fails_on_misspelled_key() {
    let dir = setup();
    fs::write(
        dir.path().join("workspace.yaml"),
        "extension-profiles:\n  profiles:\n    Work:\n      extension: [\"a.b\"]\n",
    )
    .unwrap();

    exprof(dir.path())
        .args(["config", "lint", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CONFIG_UNUSED_KEYS"));
}

#[test]
fn empty_workspace_reports_no_profiles() {
    let dir = tempfile::tempdir().unwrap();
    exprof(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[error] No profiles defined!"))
        .stdout(predicate::str::contains("-> Define profiles now"));
}
