//! End-to-end checks of the `ga4-mcp` binary's argument handling and
//! configuration failures. None of these reach a network service.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

const FIXTURE_KEY: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/service-account.json");

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("ga4-mcp").unwrap();
    cmd.env_clear().timeout(Duration::from_secs(30));
    cmd
}

#[test]
fn test_help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("agent"));
}

#[test]
fn test_version() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(format!("ga4-mcp {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_serve_without_property_id() {
    cmd()
        .args(["serve", "stdio", "--credentials", FIXTURE_KEY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("property id is required"));
}

#[test]
fn test_serve_without_credentials() {
    cmd()
        .args(["serve", "stdio", "--property-id", "123456789"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials are required"));
}

#[test]
fn test_serve_unknown_dimension_source() {
    cmd()
        .args(["serve", "sse", "--property-id", "123456789"])
        .args(["--credentials", FIXTURE_KEY, "--dimension-source", "guess"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dimension source 'guess'"));
}

#[test]
fn test_property_id_from_env() {
    cmd()
        .env("GA4_PROPERTY_ID", "123456789")
        .args(["serve", "stdio"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("credentials are required"));
}

#[test]
fn test_agent_ask_without_api_key() {
    cmd()
        .args(["agent", "ask", "How many active users yesterday?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key is required"));
}

#[test]
fn test_agent_unsupported_provider() {
    cmd()
        .env("GA4_AGENT_API_KEY", "test")
        .env("GA4_AGENT_PROVIDER", "anthropic")
        .args(["agent", "ask", "How many active users yesterday?"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported LLM provider: anthropic"));
}

#[test]
fn test_agent_tools_unreachable_gateway() {
    cmd()
        .args(["agent", "tools", "--url", "http://127.0.0.1:9/mcp"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tool discovery from http://127.0.0.1:9/mcp failed"));
}
