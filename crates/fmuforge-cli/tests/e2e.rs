//! End-to-end tests for the fmuforge CLI.
//!
//! These tests exercise the pre-flight error paths, which need no real
//! simulation toolkit, and verify the documented exit codes.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fmuforge() -> Command {
    Command::cargo_bin("fmuforge").expect("binary not built")
}

#[test]
fn missing_script_exits_with_code_4() {
    let temp = TempDir::new().unwrap();

    fmuforge()
        .current_dir(temp.path())
        .args(["create", "-m", "Net1", "-s", "no-such-script.cc"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("[ERROR]"))
        .stderr(predicate::str::contains("invalid simulation script"));
}

#[test]
fn invalid_extra_argument_exits_with_code_7() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("sim.cc");
    fs::write(&script, "// sim").unwrap();

    fmuforge()
        .current_dir(temp.path())
        .args(["create", "-m", "Net1", "-s"])
        .arg(&script)
        .arg("neither-a-file-nor-a-pair")
        .assert()
        .code(7)
        .stderr(predicate::str::contains("invalid input argument"));
}

#[test]
fn missing_config_exits_with_code_5() {
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("sim.cc");
    fs::write(&script, "// sim").unwrap();

    // An empty export root has no configuration record.
    let export_root = TempDir::new().unwrap();

    fmuforge()
        .current_dir(temp.path())
        .env("FMUFORGE_ROOT", export_root.path())
        .args(["create", "-m", "Net1", "-s"])
        .arg(&script)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("configuration file not found"));
}

#[test]
fn rejects_unknown_fmi_version() {
    fmuforge()
        .args(["create", "-m", "Net1", "-s", "sim.cc", "-f", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn help_lists_create_subcommand() {
    fmuforge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"));
}
