//! Tests for the `gramtool` binary.
#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("data")
}

#[allow(deprecated)]
fn gramtool() -> Command {
    let mut cmd = Command::cargo_bin("gramtool").unwrap();
    cmd.arg("-d").arg(data_dir()).arg("-l").arg("lt");
    cmd
}

#[test]
fn test_prints_analyses() {
    gramtool()
        .arg("Vilniaus")
        .assert()
        .success()
        .stdout("Vilniaus [nmSg] -> Vilnius\n");
}

#[test]
fn test_prints_paradigms() {
    gramtool()
        .args(["šunį", "-f"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "šunį [nmsa] -> šuo\n\nšuo\n  [nmsn] šuo\n  [nmsg] šuns\n",
        ));
}

#[test]
fn test_lemma_of_phrase() {
    gramtool()
        .args(["Šiaulių banko", "--lemma"])
        .assert()
        .success()
        .stdout("Šiaulių bankas\n");
}

#[test]
fn test_change_form() {
    gramtool()
        .args(["medis", "--case", "accusative", "--number", "plural"])
        .assert()
        .success()
        .stdout("medžius\n");
}

#[test]
fn test_unknown_word_prints_nothing() {
    gramtool().arg("žmogus").assert().success().stdout("");
}

#[test]
fn test_invalid_value_fails() {
    gramtool()
        .args(["medis", "--case", "ablative"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ablative"));
}

#[test]
fn test_rules_dump() {
    gramtool()
        .args(["x", "--rules"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("@rule bankas\nnmsn (stem)-as\n"))
        .stdout(predicate::str::contains("@rule šuo\nnmsn šuo\n"));
}

#[test]
fn test_missing_data_is_setup_failure() {
    let dir = tempfile::tempdir().unwrap();
    #[allow(deprecated)]
    Command::cargo_bin("gramtool")
        .unwrap()
        .args(["medis", "-d"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("setup failed"));
}

#[test]
fn test_syntax_error_report() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(data_dir().join("symbols.json"), dir.path().join("symbols.json")).unwrap();
    std::fs::create_dir(dir.path().join("lt")).unwrap();
    std::fs::write(dir.path().join("lt").join("grammar"), "@rule a\nnmsx . as\n").unwrap();
    std::fs::write(dir.path().join("lt").join("words.dic"), "").unwrap();
    #[allow(deprecated)]
    Command::cargo_bin("gramtool")
        .unwrap()
        .args(["medis", "-d"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::starts_with("Error detected in this grammar file:"));
}
