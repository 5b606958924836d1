//! CLI integration tests for the `precifix` binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn precifix() -> Command {
    cargo_bin_cmd!("precifix")
}

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

#[test]
fn help_lists_the_subcommands() {
    precifix()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("precifix"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn version_prints_the_crate_name() {
    precifix()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("precifix"));
}

#[test]
fn a_fully_resolved_batch_exits_zero() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_file(dir.path(), "base.csv", "ticker,qty\nAAA3,1000.00\n");
    let target = write_file(dir.path(), "fund.csv", "ticker,qty\nAAA3,1000.01\n");
    let output = dir.path().join("report.csv");

    precifix()
        .args(["run", "--scale", "2"])
        .arg("--base")
        .arg(&base)
        .arg("--target")
        .arg(&target)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary"))
        .stdout(predicate::str::contains("all rows resolved"));

    let report = fs::read_to_string(&output).expect("report written");
    assert!(report.contains("fund,AAA3,1000.00,primary,1000.01,0.00001"));
}

#[test]
fn unresolved_breaks_exit_one() {
    let dir = tempfile::tempdir().expect("temp dir");
    let base = write_file(dir.path(), "base.csv", "ticker,qty\nAAA3,100\n");
    // GHOST has no base position, so it stays an unresolved break.
    let target = write_file(dir.path(), "fund.csv", "ticker,qty\nAAA3,101\nGHOST,5\n");
    let output = dir.path().join("report.csv");

    precifix()
        .arg("run")
        .arg("--base")
        .arg(&base)
        .arg("--target")
        .arg(&target)
        .arg("--output")
        .arg(&output)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unresolved"));

    let report = fs::read_to_string(&output).expect("report written");
    assert!(report.contains("missing base"));
}

#[test]
fn an_unreadable_base_file_exits_two() {
    let dir = tempfile::tempdir().expect("temp dir");
    let target = write_file(dir.path(), "fund.csv", "ticker,qty\nAAA3,1\n");

    precifix()
        .arg("run")
        .arg("--base")
        .arg(dir.path().join("absent.csv"))
        .arg("--target")
        .arg(&target)
        .arg("--output")
        .arg(dir.path().join("report.csv"))
        .assert()
        .code(2);
}

#[test]
fn check_config_accepts_a_valid_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(
        dir.path(),
        "precifix.toml",
        "[solver]\nscale = 2\nprecision_digits = 60\n",
    );

    precifix()
        .args(["check", "config", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"));
}

#[test]
fn check_config_rejects_a_precision_below_the_floor() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(
        dir.path(),
        "precifix.toml",
        "[solver]\nprecision_digits = 28\n",
    );

    precifix()
        .args(["check", "config", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("precision_digits"));
}

#[test]
fn an_invalid_config_fails_the_run_before_solving() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = write_file(dir.path(), "bad.toml", "[solver]\nstep_margin = 0\n");
    let base = write_file(dir.path(), "base.csv", "ticker,qty\nAAA3,1\n");
    let target = write_file(dir.path(), "fund.csv", "ticker,qty\nAAA3,1\n");

    precifix()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--base")
        .arg(&base)
        .arg("--target")
        .arg(&target)
        .arg("--output")
        .arg(dir.path().join("report.csv"))
        .assert()
        .code(2);
}
