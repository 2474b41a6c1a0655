//! Integration tests for the `tailgraph` CLI binary.
//!
//! These tests validate argument parsing, help output, shell completions,
//! and error handling — all without requiring a tailnet.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `tailgraph` binary with env isolation.
///
/// Clears all relevant env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn tailgraph_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("tailgraph");
    cmd.env("HOME", "/tmp/tailgraph-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/tailgraph-test-nonexistent")
        .env_remove("TAILGRAPH_CONFIG")
        .env_remove("TAILGRAPH_OUTPUT")
        .env_remove("TAILGRAPH_TIMEOUT")
        .env_remove("TAILGRAPH_TAILNET")
        .env_remove("TAILGRAPH_SOURCE")
        .env_remove("TAILSCALE_TAILNET")
        .env_remove("TAILSCALE_API_KEY");
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
    let output = tailgraph_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    tailgraph_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("tailnet")
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("hosts"))
            .and(predicate::str::contains("groups")),
    );
}

#[test]
fn test_version_flag() {
    tailgraph_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tailgraph"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    tailgraph_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    tailgraph_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = tailgraph_cmd().arg("foobar").output().unwrap();
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
fn test_list_without_tailnet_fails_usage() {
    // The api source needs a tailnet; without one the command must fail
    // before any network traffic.
    let output = tailgraph_cmd().arg("list").output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected usage exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("tailnet"),
        "Expected error about the missing tailnet:\n{text}"
    );
}

#[test]
fn test_list_without_api_key_fails_auth() {
    let output = tailgraph_cmd()
        .args(["--tailnet", "example.com", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("API key") || text.contains("credentials"),
        "Expected error about missing credentials:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = tailgraph_cmd()
        .args(["--output", "invalid", "hosts"])
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

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    tailgraph_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_redacts_api_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "tailnet = \"example.com\"\napi_key = \"tskey-secret-value\"\n",
    )
    .unwrap();

    tailgraph_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "show"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("example.com")
                .and(predicate::str::contains("tskey-secret-value").not()),
        );
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "tailnet = \"example.com\"\n").unwrap();

    tailgraph_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_init_writes_starter_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh").join("config.toml");

    tailgraph_cmd()
        .args(["--config", path.to_str().unwrap(), "config", "init"])
        .assert()
        .success();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("source"), "starter config has a source:\n{contents}");
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_config_subcommands_exist() {
    tailgraph_cmd()
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("init")
                .and(predicate::str::contains("show"))
                .and(predicate::str::contains("path")),
        );
}

#[test]
fn test_hosts_accepts_group_filter() {
    tailgraph_cmd()
        .args(["hosts", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--group"));
}
