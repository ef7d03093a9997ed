//! Run the `catner` binary end to end.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn catner(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_catner"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to run catner")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is not UTF-8")
}

#[test]
fn test_demo_to_stdout() {
    let output = catner(&["demo"]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
    assert!(stdout.contains("<SUPPLIER_AID>SRTS63</SUPPLIER_AID>"));
    assert_eq!(stdout.matches("<ARTICLE>").count(), 2);
}

#[test]
fn test_edit_then_inspect_json() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("catalog.xml");
    let file = path_str(&file);

    assert!(catner(&["demo", "--output", file]).status.success());
    assert!(catner(&["add-article", file, "NEW1", "--title", "Neu"]).status.success());
    assert!(catner(&["add-unit", file, "NEW1", "MTR", "--factor", "2"]).status.success());
    assert!(
        catner(&["add-feature", file, "NEW1", "f_len", "--name", "Length", "--value", "3"])
            .status
            .success()
    );
    assert!(catner(&["delete-article", file, "SRTS62"]).status.success());

    let output = catner(&["inspect", file, "--json"]);
    assert!(output.status.success());
    let summary: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let aids: Vec<&str> = summary["articles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["aid"].as_str().unwrap())
        .collect();
    assert_eq!(aids, ["SRTS63", "NEW1"]);
    assert_eq!(summary["articles"][1]["main_unit"], "MTR");
    assert_eq!(summary["articles"][1]["features"][0]["value"], "3");
}

#[test]
fn test_failed_edit_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("catalog.xml");
    let file = path_str(&file);
    assert!(catner(&["demo", "-o", file]).status.success());

    let output = catner(&["add-article", file, "SRTS62"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("already exists"), "stderr: {stderr}");
}

#[test]
fn test_amend_with_output() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("bare.xml");
    let output = temp.path().join("fixed.xml");
    fs::write(&input, "<BMECAT><T_NEW_CATALOG/></BMECAT>").unwrap();

    assert!(!catner(&["inspect", path_str(&input)]).status.success());
    assert!(
        catner(&["amend", path_str(&input), "--output", path_str(&output)])
            .status
            .success()
    );
    assert!(catner(&["inspect", path_str(&output)]).status.success());
    assert_eq!(fs::read_to_string(&input).unwrap(), "<BMECAT><T_NEW_CATALOG/></BMECAT>");
}

#[test]
fn test_config_changes_indent() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("catner.toml");
    fs::write(&config, "indent = 1\n").unwrap();

    let output = catner(&["--config", path_str(&config), "demo"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("\n <HEADER>"));
}
