//! CLI contract: exit codes and machine-readable output.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn promo_judge() -> Command {
    let mut cmd = Command::cargo_bin("promo-judge").unwrap();
    cmd.env_remove("PROMO_JUDGE_RESEARCH_LEVEL")
        .env_remove("PROMO_JUDGE_LLM_MODEL")
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn passing_bundle_exits_zero_with_text_report() {
    promo_judge()
        .args(["judge", "--bundle"])
        .arg(fixture("pass_bundle.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("✅ PASS  score 100/100"));
}

#[test]
fn failing_bundle_exits_one_and_writes_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("verdict.json");
    let output = promo_judge()
        .args(["judge", "--format", "json", "--bundle"])
        .arg(fixture("no_go_bundle.json"))
        .arg("--out")
        .arg(&out)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let stdout: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stdout["pass"], false);
    assert_eq!(stdout["context"]["researchLevel"], "DEEP");
    let codes: Vec<&str> = stdout["issues"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|i| i["code"].as_str())
        .collect();
    assert!(codes.contains(&"OFFER_INADEQUATE"));
    assert!(codes.contains(&"WINNERS_NOT_SURFACED"));
    assert!(codes.contains(&"RESEARCH_MISSING"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written, stdout);
}

#[test]
fn loose_context_fields_are_judged_not_rejected() {
    let output = promo_judge()
        .args(["judge", "--format", "json", "--bundle", "-"])
        .write_stdin(r#"{"context": {"id": 42, "brief": null}}"#)
        .output()
        .unwrap();
    assert_ne!(output.status.code(), Some(2));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["context"]["campaignId"], "42");
}

#[test]
fn fake_llm_provider_records_meta() {
    let output = promo_judge()
        .args(["judge", "--llm", "--llm-provider", "fake", "--format", "json", "--bundle"])
        .arg(fixture("pass_bundle.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["meta"]["usedLLM"], true);
    assert_eq!(v["meta"]["model"], "gpt-4o-mini");
}

#[test]
fn bad_bundle_and_bad_config_exit_two() {
    let dir = tempfile::tempdir().unwrap();
    let bundle = dir.path().join("bundle.json");
    std::fs::write(&bundle, "{ not json").unwrap();
    promo_judge()
        .args(["judge", "--bundle"])
        .arg(&bundle)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid bundle"));

    let config = dir.path().join("judge.yaml");
    std::fs::write(&config, "version: 9\n").unwrap();
    promo_judge()
        .args(["judge", "--bundle"])
        .arg(fixture("pass_bundle.json"))
        .arg("--config")
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unsupported config version 9"));
}

#[test]
fn signals_reads_stdin() {
    let output = promo_judge()
        .args(["signals", "-"])
        .write_stdin("Mail-in entry with a limited edition tee. #share")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["majorFriction"], true);
    assert_eq!(v["badgeValue"], true);
    assert_eq!(v["ugc"], true);
}

#[test]
fn version_prints_package_version() {
    promo_judge()
        .arg("version")
        .assert()
        .code(0)
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
