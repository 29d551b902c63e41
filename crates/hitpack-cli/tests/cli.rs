// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! End-to-end tests of the `hitpack` binary.

#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

use assert_cmd::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const EVENTS_DOC: &str = r#"{
  "hits": {
    "events": [{"_index": "logs", "_id": "1", "_score": 0.5}],
    "total": {"value": 500, "relation": "eq"}
  },
  "took": 42,
  "timed_out": false
}"#;

/// `hitpack` isolated from the user's config dir and log settings.
fn hitpack(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("hitpack");
    cmd.env("HOME", home.path());
    cmd.env("XDG_CONFIG_HOME", home.path().join(".config"));
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    hitpack(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("sample"));
}

#[test]
fn sample_is_reproducible() {
    let home = TempDir::new().unwrap();
    let first = hitpack(&home)
        .args(["sample", "--seed", "9"])
        .output()
        .unwrap();
    let second = hitpack(&home)
        .args(["sample", "--seed", "9"])
        .output()
        .unwrap();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
    hitpack_codec::document::from_slice(&first.stdout).unwrap();
}

#[test]
fn binary_json_binary_reproduces_bytes() {
    let home = TempDir::new().unwrap();
    let bin = home.path().join("sample.bin");
    let json = home.path().join("sample.json");
    let back = home.path().join("back.bin");
    for seed in ["1", "2", "3"] {
        hitpack(&home)
            .args(["sample", "--format", "binary", "--seed", seed, "-o"])
            .arg(&bin)
            .assert()
            .success();
        hitpack(&home)
            .args(["convert", "--from", "binary", "--to", "json", "--pretty"])
            .arg(&bin)
            .arg("-o")
            .arg(&json)
            .assert()
            .success();
        hitpack(&home)
            .args(["convert", "--from", "json", "--to", "binary", "--strict"])
            .arg(&json)
            .arg("-o")
            .arg(&back)
            .assert()
            .success();
        assert_eq!(fs::read(&bin).unwrap(), fs::read(&back).unwrap(), "seed {seed}");
    }
}

#[test]
fn convert_reads_stdin() {
    let home = TempDir::new().unwrap();
    let out = hitpack(&home)
        .args(["convert", "--from", "json", "--to", "binary", "-"])
        .write_stdin(EVENTS_DOC)
        .output()
        .unwrap();
    assert!(out.status.success());
    let response = hitpack_codec::binary::decode(&out.stdout).unwrap();
    assert_eq!(response.took(), 42);
    assert_eq!(response.hits().map(|h| h.len()), Some(1));
}

#[test]
fn strict_flag_rejects_unknown_fields() {
    let home = TempDir::new().unwrap();
    hitpack(&home)
        .args(["convert", "--from", "json", "--to", "binary", "--strict", "-"])
        .write_stdin(EVENTS_DOC)
        .assert()
        .failure()
        .stderr(predicate::str::contains("hits.events[0]._score: unknown field"));
}

#[test]
fn conflicting_variants_fail() {
    let home = TempDir::new().unwrap();
    hitpack(&home)
        .args(["convert", "--from", "json", "--to", "json", "-"])
        .write_stdin(r#"{"hits": {"events": [], "sequences": []}, "took": 1, "timed_out": false}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("conflicting hits variants"));
}

#[test]
fn truncated_binary_fails() {
    let home = TempDir::new().unwrap();
    hitpack(&home)
        .args(["inspect", "--format", "binary", "-"])
        .write_stdin(vec![1u8, 1, 5])
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode binary input"));
}

#[test]
fn inspect_detects_json_and_summarizes() {
    let home = TempDir::new().unwrap();
    let doc = home.path().join("events.json");
    fs::write(&doc, EVENTS_DOC).unwrap();
    hitpack(&home)
        .arg("inspect")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("events"))
        .stdout(predicate::str::contains("500 (eq)"))
        .stdout(predicate::str::contains("42 ms"));
}

#[test]
fn config_file_sets_strict_mode_and_limits() {
    let home = TempDir::new().unwrap();
    let strict = home.path().join("strict.json");
    fs::write(&strict, r#"{"document_mode": "strict"}"#).unwrap();
    hitpack(&home)
        .args(["convert", "--from", "json", "--to", "binary", "--config"])
        .arg(&strict)
        .arg("-")
        .write_stdin(EVENTS_DOC)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown field"));

    let tight = home.path().join("tight.json");
    fs::write(&tight, r#"{"limits": {"max_string_bytes": 2}}"#).unwrap();
    hitpack(&home)
        .args(["convert", "--from", "json", "--to", "binary", "--config"])
        .arg(&tight)
        .arg("-")
        .write_stdin(EVENTS_DOC)
        .assert()
        .failure()
        .stderr(predicate::str::contains("string too long"));
}

#[test]
fn missing_config_file_is_an_error() {
    let home = TempDir::new().unwrap();
    hitpack(&home)
        .args(["sample", "--config"])
        .arg(home.path().join("absent.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
#[cfg(target_os = "linux")]
fn user_config_dir_is_honored() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config/hitpack");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("cli.json"), r#"{"pretty": true}"#).unwrap();
    hitpack(&home)
        .args(["sample", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"took\""));
}
