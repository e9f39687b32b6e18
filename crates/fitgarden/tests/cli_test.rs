//! Integration tests for the `fitgarden` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `fitgarden` binary with env isolation.
///
/// Clears all `FITGARDEN_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn fitgarden_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("fitgarden");
    cmd.env("HOME", "/tmp/fitgarden-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/fitgarden-cli-test-nonexistent")
        .env_remove("FITGARDEN_PROFILE")
        .env_remove("FITGARDEN_BACKEND")
        .env_remove("FITGARDEN_TOKEN")
        .env_remove("FITGARDEN_OUTPUT")
        .env_remove("FITGARDEN_INSECURE")
        .env_remove("FITGARDEN_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = fitgarden_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    fitgarden_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("FitGarden")
            .and(predicate::str::contains("agenda"))
            .and(predicate::str::contains("customers"))
            .and(predicate::str::contains("menu")),
    );
}

#[test]
fn test_version_flag() {
    fitgarden_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("fitgarden"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    fitgarden_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    fitgarden_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = fitgarden_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_agenda_list_no_backend() {
    fitgarden_cmd()
        .args(["agenda", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("backend"))
                .or(predicate::str::contains("profile")),
        );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    fitgarden_cmd().args(["config", "show"]).assert().success();
}

#[test]
fn test_invalid_output_format() {
    let output = fitgarden_cmd()
        .args(["--output", "invalid", "agenda", "list"])
        .output()
        .unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid output format"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid")
            || text.contains("possible values")
            || text.contains("valid value"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_invalid_item_spec_fails_before_connecting() {
    // Item parsing is validated before any network access; with a backend
    // URL pointing nowhere, a malformed spec must still be the error.
    let output = fitgarden_cmd()
        .args([
            "--backend",
            "http://127.0.0.1:9",
            "agenda",
            "create",
            "--customer",
            "41",
            "--item",
            "garbage",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing backend config, not about argument parsing.
    fitgarden_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "agenda",
            "list",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("backend"))
                .or(predicate::str::contains("profile")),
        );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_agenda_subcommands_exist() {
    fitgarden_cmd()
        .args(["agenda", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("production"))
                .and(predicate::str::contains("route"))
                .and(predicate::str::contains("whatsapp")),
        );
}

#[test]
fn test_create_flags_exist() {
    fitgarden_cmd()
        .args(["agenda", "create", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--customer")
                .and(predicate::str::contains("--item"))
                .and(predicate::str::contains("--payment"))
                .and(predicate::str::contains("--voucher")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    fitgarden_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("set-token")),
        );
}
