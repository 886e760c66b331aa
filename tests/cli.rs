use assert_cmd::prelude::*;
use std::process::Command;

#[test]
fn cli_auto_mode_runs_to_completion() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let mut cmd = Command::cargo_bin("poker-drills").expect("binary exists");
    cmd.arg("--rounds")
        .arg("2")
        .arg("--seed")
        .arg("17")
        .arg("--no-color")
        .arg("--auto")
        .arg("--preflop-csv")
        .arg(dir.path().join("missing-preflop.csv"))
        .arg("--postflop-csv")
        .arg(dir.path().join("missing-postflop.csv"));

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Summary: correct=2, total=2"));
}

#[test]
fn cli_replay_prints_decision() {
    let dir = tempfile::TempDir::new().expect("tempdir");
    let mut cmd = Command::cargo_bin("poker-drills").expect("binary exists");
    cmd.arg("--no-color")
        .arg("--postflop-csv")
        .arg(dir.path().join("missing.csv"))
        .arg("replay")
        .arg("--seed")
        .arg("3");

    cmd.assert()
        .success()
        .stdout(predicates::str::contains("Decision:"))
        .stdout(predicates::str::contains("-- Flop"));
}
