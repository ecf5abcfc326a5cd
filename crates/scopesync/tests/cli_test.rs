//! Integration tests for the `scopesync` CLI binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling — all without requiring a live controller.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `scopesync` binary with env isolation.
///
/// Clears all `SCOPESYNC_*` env vars (plus the legacy token names) and
/// points config directories at a nonexistent path so tests never touch
/// the user's real configuration.
fn scopesync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("scopesync");
    cmd.env("HOME", "/tmp/scopesync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/scopesync-cli-test-nonexistent")
        .env_remove("SCOPESYNC_PROFILE")
        .env_remove("SCOPESYNC_CONTROLLER")
        .env_remove("SCOPESYNC_AUTH_TOKEN")
        .env_remove("SCOPESYNC_OUTPUT")
        .env_remove("SCOPESYNC_INSECURE")
        .env_remove("SCOPESYNC_TIMEOUT")
        .env_remove("SCOPESYNC_PASSWORD")
        .env_remove("X_AUTH_TOKEN")
        .env_remove("AUTH_TOKEN");
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
    let output = scopesync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    scopesync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("DHCP scope")
            .and(predicate::str::contains("clone"))
            .and(predicate::str::contains("sites"))
            .and(predicate::str::contains("scopes")),
    );
}

#[test]
fn test_version_flag() {
    scopesync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("scopesync"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    scopesync_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    scopesync_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = scopesync_cmd().arg("foobar").output().unwrap();
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
fn test_clone_requires_source_and_destination() {
    let output = scopesync_cmd().arg("clone").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("--source") && text.contains("--destination"),
        "Expected missing-argument error:\n{text}"
    );
}

#[test]
fn test_clone_no_controller_configured() {
    scopesync_cmd()
        .args(["clone", "--source", "Branch-East", "--destination", "Branch-West"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("controller"))
                .or(predicate::str::contains("credentials")),
        );
}

#[test]
fn test_sites_list_no_controller() {
    scopesync_cmd()
        .args(["sites", "list"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("controller"))
                .or(predicate::str::contains("credentials")),
        );
}

#[test]
fn test_missing_credentials_with_controller_flag() {
    // A controller URL alone is not enough; the credential chain comes up
    // empty and the error should point at config init / the token env var.
    scopesync_cmd()
        .args([
            "--controller",
            "https://api.sdwan.example.com",
            "sites",
            "list",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials").or(predicate::str::contains("config")));
}

#[test]
fn test_invalid_output_format() {
    let output = scopesync_cmd()
        .args(["--output", "invalid", "sites", "list"])
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
fn test_global_flags_parsing() {
    // All flags should parse correctly — the failure should be about
    // missing controller config, not about argument parsing.
    scopesync_cmd()
        .args([
            "--output",
            "json",
            "--verbose",
            "--insecure",
            "--timeout",
            "60",
            "clone",
            "--source",
            "A",
            "--destination",
            "B",
        ])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("config")
                .or(predicate::str::contains("Configuration"))
                .or(predicate::str::contains("controller"))
                .or(predicate::str::contains("credentials")),
        );
}

#[test]
fn test_config_show_no_config() {
    // `config show` uses load_config_or_default() so it succeeds even
    // when no config file exists — it just renders the default config.
    scopesync_cmd().args(["config", "show"]).assert().success();
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_clone_help() {
    scopesync_cmd()
        .args(["clone", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--source")
                .and(predicate::str::contains("--destination"))
                .and(predicate::str::contains("missing")),
        );
}

#[test]
fn test_config_subcommands_exist() {
    scopesync_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("profiles"))
                .and(predicate::str::contains("set-token")),
        );
}
