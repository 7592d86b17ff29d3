//! End-to-end tests that run the `fy` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::Value;

fn fy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fy"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run fy")
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON ({err}): {}",
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

fn golden(case: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("golden")
        .join(format!("{case}.md"))
        .display()
        .to_string()
}

#[test]
fn extract_json_lists_blocks() {
    let output = fy(&["extract", &golden("multiple_blocks"), "--json"]);
    assert!(output.status.success());
    let blocks = stdout_json(&output);
    let blocks = blocks.as_array().expect("array");
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0]["id"], "diagram-0");
    assert_eq!(blocks[1]["sidecar"]["content"], "Plain note without a header.");
}

#[test]
fn extract_text_output_names_blocks() {
    let output = fy(&["extract", &golden("single_with_sidecar")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("diagram-0"));
    assert!(stdout.contains("Name: Login Flow (sequenceDiagram)"));
}

#[test]
fn validate_accepts_inline_diagram() {
    let output = fy(&["validate", "graph TD\nA-->B", "--json"]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["valid"], true);
    assert_eq!(result["diagramType"], "flowchart");
}

#[test]
fn validate_rejects_unknown_header_with_exit_code() {
    let output = fy(&["validate", "hello world", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let result = stdout_json(&output);
    assert_eq!(result["valid"], false);
    assert_eq!(result["error"]["line"], 1);
    assert!(
        result["error"]["message"]
            .as_str()
            .is_some_and(|m| m.starts_with("Invalid diagram type. Expected one of: classDiagram"))
    );
}

#[test]
fn validate_blocks_checks_each_block() {
    let output = fy(&["validate", "--blocks", &golden("multiple_blocks"), "--json"]);
    assert!(output.status.success());
    let results = stdout_json(&output);
    let results = results.as_array().expect("array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[1]["id"], "diagram-1");
    assert_eq!(results[1]["diagramType"], "stateDiagram");
}

#[test]
fn classify_reports_keyword() {
    let output = fy(&["classify", "flowchart graph", "--json"]);
    assert!(output.status.success());
    let result = stdout_json(&output);
    assert_eq!(result["diagramType"], "flowchart");
    assert_eq!(result["keyword"], "flowchart");
}

#[test]
fn template_prints_blank_skeleton() {
    let output = fy(&["template", "sequence", "--blank"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "sequenceDiagram\n    participant A\n"
    );
}

#[test]
fn template_output_adds_diagram_extension() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bare = dir.path().join("orders");
    let output = fy(&["template", "er", "--blank", "-o", &bare.display().to_string()]);
    assert!(output.status.success());
    assert!(!bare.exists());
    assert_eq!(
        fs::read_to_string(dir.path().join("orders.mmd")).expect("read orders.mmd"),
        "erDiagram\n    ENTITY\n"
    );

    let explicit = dir.path().join("flow.txt");
    let output = fy(&[
        "template",
        "--starter",
        "flowchart-basic",
        "-o",
        &explicit.display().to_string(),
    ]);
    assert!(output.status.success());
    let written = fs::read_to_string(&explicit).expect("read flow.txt");
    assert!(written.starts_with("flowchart"));
}

#[test]
fn template_rejects_unknown_type() {
    let output = fy(&["template", "quadrantChart"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown diagram type"));
}

#[test]
fn suggest_extracts_first_diagram() {
    let output = fy(&["suggest", &golden("single_with_sidecar"), "--json"]);
    assert!(output.status.success());
    let suggestion = stdout_json(&output);
    assert_eq!(suggestion["type"], "replace");
    assert!(
        suggestion["content"]
            .as_str()
            .is_some_and(|c| c.starts_with("sequenceDiagram"))
    );
}

#[test]
fn replace_rewrites_one_block() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = dir.path().join("updated.md");
    let output = fy(&[
        "replace",
        &golden("single_with_sidecar"),
        "--id",
        "diagram-0",
        "--with",
        "sequenceDiagram\n    U->>A: retry",
        "--output",
        &out.display().to_string(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let updated = fs::read_to_string(&out).expect("read output");
    assert!(updated.starts_with("Sure! Here is the login flow you asked for:\n\n```mermaid\nsequenceDiagram\n    U->>A: retry\n```"));
    assert!(updated.contains("Diagram: Login Flow (sequenceDiagram)"));
    assert!(updated.ends_with("Let me know if you want error handling added.\n"));
}

#[test]
fn replace_unknown_id_fails() {
    let output = fy(&[
        "replace",
        &golden("no_blocks"),
        "--id",
        "diagram-3",
        "--with",
        "pie",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No block 'diagram-3'"));
}

#[test]
fn context_local_respects_config_limits() {
    let dir = tempfile::tempdir().expect("tempdir");
    let src = dir.path().join("src");
    fs::create_dir(&src).expect("mkdir");
    fs::write(src.join("a.rs"), "fn a() {}").expect("write");
    fs::write(src.join("b.rs"), "fn b() {}").expect("write");
    let config = dir.path().join("flowify.toml");
    fs::write(&config, "[fetch]\nmaxFiles = 1\n").expect("write config");

    let output = fy(&[
        "--config",
        &config.display().to_string(),
        "context",
        "local",
        &src.display().to_string(),
        "--json",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let files = stdout_json(&output);
    let files = files.as_array().expect("array");
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["path"], "a.rs");
    assert_eq!(files[0]["language"], "rust");
    assert_eq!(files[0]["source"], "local");
}

#[test]
fn invalid_config_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("flowify.json");
    fs::write(&config, r#"{ "editor": { "tabSize": "wide" } }"#).expect("write config");

    let output = fy(&["--config", &config.display().to_string(), "classify", "pie"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("editor.tabSize"));
}
