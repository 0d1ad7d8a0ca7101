//! Command-line tests over JSON token trees.

#![cfg(feature = "cli")]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

const BIN: &str = env!("CARGO_BIN_EXE_mmd-html");

const GREETING: &str = r#"{
    "source": "Hello *you*",
    "root": {"kind": "doc_start", "children": [
        {"kind": "paragraph", "children": [
            {"kind": "text_plain", "start": 0, "len": 6},
            {"kind": "emph_start", "start": 6, "len": 1, "id": "e1", "mate": "e2"},
            {"kind": "text_plain", "start": 7, "len": 3},
            {"kind": "emph_stop", "start": 10, "len": 1, "id": "e2"}
        ]}
    ]},
    "metadata": [["Title", "Greeting"]]
}"#;

fn write_tree(dir: &TempDir, json: &str) -> PathBuf {
    let path = dir.path().join("tree.json");
    fs::write(&path, json).expect("Failed to write tree");
    path
}

#[test]
fn test_render_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = write_tree(&dir, GREETING);

    let output = Command::new(BIN).arg(&input).output().unwrap();

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "<p>Hello <em>you</em></p>\n"
    );
}

#[test]
fn test_render_complete_to_file() {
    let dir = TempDir::new().unwrap();
    let input = write_tree(&dir, GREETING);
    let out = dir.path().join("out.html");

    let status = Command::new(BIN)
        .arg("--complete")
        .arg(&input)
        .arg(&out)
        .status()
        .unwrap();

    assert!(status.success());
    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>\n"));
    assert!(html.contains("\t<title>Greeting</title>\n"));
    assert!(html.contains("<p>Hello <em>you</em></p>"));
    assert!(html.ends_with("</html>\n"));
}

#[test]
fn test_invalid_tree_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_tree(&dir, r#"{"source": "", "root": {"kind": "paragraph"}}"#);

    let output = Command::new(BIN).arg(&input).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error: Invalid tree"));
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let output = Command::new(BIN)
        .arg(dir.path().join("absent.json"))
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8(output.stderr).unwrap().contains("error: I/O error"));
}

#[test]
fn test_unknown_quote_language_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_tree(&dir, GREETING);

    let output = Command::new(BIN)
        .args(["--quotes", "klingon"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(!output.status.success());
}
