//! Integration tests for the `netsketch` CLI binary.
//!
//! Each test works on a project file in its own temp directory, with
//! config and credential lookups pointed away from the user's machine.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `netsketch` binary with env isolation.
///
/// Clears all `NETSKETCH_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn netsketch_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("netsketch");
    cmd.env("HOME", "/tmp/netsketch-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/netsketch-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("NETSKETCH_PROJECT")
        .env_remove("NETSKETCH_OUTPUT")
        .env_remove("NETSKETCH_API_KEY")
        .env_remove("NETSKETCH_ANALYSIS__API_KEY");
    cmd
}

/// A command bound to `project` with `--yes`.
fn on(project: &Path) -> assert_cmd::Command {
    let mut cmd = netsketch_cmd();
    cmd.arg("-y").arg("-f").arg(project);
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Fresh project with a router and a switch named `r1` / `s1`.
fn two_node_project() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.json");
    on(&path).arg("new").assert().success();
    on(&path)
        .args(["nodes", "add", "router", "--name", "r1"])
        .assert()
        .success();
    on(&path)
        .args(["nodes", "add", "switch", "--name", "s1"])
        .assert()
        .success();
    (dir, path)
}

fn read_document(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = netsketch_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_commands() {
    netsketch_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("nodes")
            .and(predicate::str::contains("links"))
            .and(predicate::str::contains("analyze")),
    );
}

#[test]
fn test_completions_bash() {
    netsketch_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Project lifecycle ───────────────────────────────────────────────

#[test]
fn test_new_writes_empty_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.json");
    on(&path).arg("new").assert().success();

    let doc = read_document(&path);
    assert_eq!(doc["version"], "1.0");
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 0);
    assert_eq!(doc["links"].as_array().unwrap().len(), 0);
}

#[test]
fn test_new_refuses_to_overwrite() {
    let (_dir, path) = two_node_project();
    on(&path).arg("new").assert().failure();
    on(&path).args(["new", "--force"]).assert().success();
    assert_eq!(read_document(&path)["nodes"].as_array().unwrap().len(), 0);
}

#[test]
fn test_missing_project_exits_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let output = on(&dir.path().join("absent.json"))
        .args(["nodes", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("not found"));
}

#[test]
fn test_malformed_project_is_left_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, r#"{"nodes": 3, "links": []}"#).unwrap();

    let output = on(&path)
        .args(["nodes", "add", "pc"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"nodes": 3, "links": []}"#
    );
}

#[test]
fn test_export_writes_dated_copy() {
    let (_dir, path) = two_node_project();
    let out_dir = tempfile::tempdir().unwrap();

    let output = on(&path)
        .args(["export", "--dir"])
        .arg(out_dir.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let entries: Vec<_> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].starts_with("network-project-"), "{entries:?}");
    assert!(entries[0].ends_with(".json"));
}

// ── Nodes ───────────────────────────────────────────────────────────

#[test]
fn test_nodes_add_and_list() {
    let (_dir, path) = two_node_project();

    on(&path)
        .args(["nodes", "list", "-o", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());

    let output = on(&path).args(["nodes", "list", "-o", "json"]).output().unwrap();
    let nodes: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = nodes
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["config"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["r1", "s1"]);
}

#[test]
fn test_nodes_add_rejects_unknown_kind() {
    let (_dir, path) = two_node_project();
    let output = on(&path).args(["nodes", "add", "toaster"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("ROUTER"));
}

#[test]
fn test_nodes_add_at_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.json");
    on(&path).arg("new").assert().success();
    on(&path)
        .args(["nodes", "add", "pc", "--x", "12.5", "--y", "-40"])
        .assert()
        .success();

    let doc = read_document(&path);
    assert_eq!(doc["nodes"][0]["x"], 12.5);
    assert_eq!(doc["nodes"][0]["y"], -40.0);
}

#[test]
fn test_move_refuses_non_finite_coordinates() {
    let (_dir, path) = two_node_project();
    let before = std::fs::read_to_string(&path).unwrap();

    for (x, y) in [("inf", "0"), ("0", "NaN"), ("1e400", "3")] {
        let output = on(&path)
            .args(["nodes", "move", "r1", x, y])
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(2), "{x} {y}");
        assert!(combined_output(&output).contains("not a finite number"));
    }
    let output = on(&path)
        .args(["nodes", "add", "pc", "--x", "nan", "--y", "0"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    on(&path).args(["nodes", "move", "r1", "-5", "7.25"]).assert().success();
    on(&path).args(["nodes", "list"]).assert().success();
    assert_eq!(read_document(&path)["nodes"][0]["x"], -5.0);
}

#[test]
fn test_server_os_change_drops_services() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.json");
    on(&path).arg("new").assert().success();
    on(&path)
        .args(["nodes", "add", "server", "--name", "web"])
        .assert()
        .success();
    on(&path)
        .args(["nodes", "service", "web", "apache"])
        .assert()
        .success();

    on(&path)
        .args(["nodes", "set", "web", "--os", "windows-server"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Web (Apache)"));

    let doc = read_document(&path);
    assert_eq!(doc["nodes"][0]["config"]["os"], "Windows Server");
    assert_eq!(doc["nodes"][0]["config"]["services"], serde_json::json!([]));
}

#[test]
fn test_service_not_allowed_on_os() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lab.json");
    on(&path).arg("new").assert().success();
    on(&path)
        .args(["nodes", "add", "server", "--name", "dc"])
        .assert()
        .success();

    let output = on(&path)
        .args(["nodes", "service", "dc", "ad"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("not available on Linux"));
}

#[test]
fn test_delete_node_removes_its_links() {
    let (_dir, path) = two_node_project();
    on(&path).args(["links", "add", "r1", "s1"]).assert().success();
    on(&path).args(["nodes", "delete", "r1"]).assert().success();

    let doc = read_document(&path);
    assert_eq!(doc["nodes"].as_array().unwrap().len(), 1);
    assert_eq!(doc["links"].as_array().unwrap().len(), 0);
}

#[test]
fn test_delete_without_yes_requires_terminal() {
    let (_dir, path) = two_node_project();
    let mut cmd = netsketch_cmd();
    let output = cmd
        .arg("-f")
        .arg(&path)
        .args(["nodes", "delete", "r1"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(read_document(&path)["nodes"].as_array().unwrap().len(), 2);
}

// ── Links ───────────────────────────────────────────────────────────

#[test]
fn test_link_uses_default_ports() {
    let (_dir, path) = two_node_project();
    on(&path).args(["links", "add", "r1", "s1"]).assert().success();

    let doc = read_document(&path);
    let link = &doc["links"][0];
    assert_eq!(link["sourcePort"], "Gi0/0");
    assert_eq!(link["targetPort"], "Fa0/1");
}

#[test]
fn test_duplicate_link_is_a_conflict() {
    let (_dir, path) = two_node_project();
    on(&path)
        .args(["links", "add", "r1", "s1", "--source-port", "Gi0/1"])
        .assert()
        .success();

    let output = on(&path).args(["links", "add", "s1", "r1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(6));
    assert!(combined_output(&output).contains("'s1' and 'r1' are already connected"));
    assert_eq!(read_document(&path)["links"].as_array().unwrap().len(), 1);
}

#[test]
fn test_self_link_is_rejected() {
    let (_dir, path) = two_node_project();
    let output = on(&path).args(["links", "add", "r1", "r1"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("cannot link r1 to itself"));
    assert_eq!(read_document(&path)["links"].as_array().unwrap().len(), 0);
}

// ── Analysis ────────────────────────────────────────────────────────

#[test]
fn test_describe_lists_devices_and_connections() {
    let (_dir, path) = two_node_project();
    on(&path).args(["links", "add", "r1", "s1"]).assert().success();

    on(&path).arg("describe").assert().success().stdout(
        predicate::str::contains("r1 (ROUTER)")
            .and(predicate::str::contains("  - IP: 192.168.1.1/255.255.255.0"))
            .and(predicate::str::contains("r1 <---> s1")),
    );
}

#[test]
fn test_analyze_without_key_reports_missing_credentials() {
    let (_dir, path) = two_node_project();
    on(&path)
        .arg("analyze")
        .assert()
        .success()
        .stdout(predicate::str::contains("no API key is configured"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_uses_defaults() {
    netsketch_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[analysis]").and(predicate::str::contains("spawn_x")));
}
