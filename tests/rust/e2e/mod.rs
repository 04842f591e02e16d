//! End-to-end tests - the feelscope binary against real model files
//!
//! Each test writes a model (and sometimes a manifest) into a temp directory,
//! runs the compiled binary, and checks stdout or the rewritten document.

use std::path::Path;
use std::process::{Command, Output};

const MODEL_JSON: &str = r#"{
  "id": "_DEFS",
  "name": "loan",
  "namespace": "https://example.com/loan",
  "drgElement": [
    { "element": "inputData", "id": "_AGE", "name": "Age",
      "variable": { "id": "_AGE-vi", "name": "Age", "typeRef": "number" } },
    { "element": "decision", "id": "_CHECK", "name": "Check",
      "variable": { "id": "_CHECK-vi", "name": "Check" },
      "expression": { "element": "literalExpression", "id": "_T1", "text": "Age > 18" } }
  ]
}"#;

const TAX_JSON: &str = r#"{
  "id": "_TAXDEFS",
  "name": "tax",
  "namespace": "https://example.com/tax",
  "drgElement": [
    { "element": "inputData", "id": "_RATE", "name": "Rate",
      "variable": { "id": "_RATE-vi", "name": "Rate", "typeRef": "number" } }
  ]
}"#;

const IMPORTING_JSON: &str = r#"{
  "id": "_DEFS",
  "name": "invoice",
  "namespace": "https://example.com/invoice",
  "import": [ { "id": "_IMP1", "name": "tax", "namespace": "https://example.com/tax" } ],
  "drgElement": [
    { "element": "inputData", "id": "_AMT", "name": "Amount",
      "variable": { "id": "_AMT-vi", "name": "Amount", "typeRef": "number" } }
  ]
}"#;

const MANIFEST_YAML: &str = "model: invoice.json\nimports:\n  - file: tax.json\n";

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap_or_else(|e| panic!("writing {name}: {e}"));
    path.to_string_lossy().into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_feelscope"))
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("spawning the binary: {e}"))
}

fn stdout_of(output: &Output) -> String {
    assert!(
        output.status.success(),
        "binary failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_variables_prints_the_scope_tree() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);

    let output = run(&["--model", &model, "variables"]);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("_DEFS"), "missing root scope: {stdout}");
    assert!(stdout.contains("Age : number [_AGE]"), "missing input: {stdout}");
    assert!(stdout.contains("Check : <Undefined> [_CHECK]"), "missing decision: {stdout}");
}

#[test]
fn test_scan_reports_resolved_references() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);

    let output = run(&["--model", &model, "scan", "Age > 18 and Age < 65"]);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("2 reference(s)"), "unexpected count: {stdout}");
    assert!(stdout.contains("0..3"), "missing span: {stdout}");
    assert!(stdout.contains("-> _AGE"), "missing source: {stdout}");
}

#[test]
fn test_scan_marks_unresolved_references() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);

    let output = run(&["--model", &model, "scan", "Mystery + 1"]);
    let stdout = stdout_of(&output);
    assert!(stdout.contains("<unresolved>"), "missing marker: {stdout}");
}

#[test]
fn test_rename_rewrites_document_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);
    let out = dir.path().join("out.json");

    let output = run(&[
        "--model",
        &model,
        "rename",
        "_AGE=Years",
        "--out",
        &out.to_string_lossy(),
    ]);
    stdout_of(&output);

    let rewritten: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rewritten["drgElement"][0]["name"], "Years");
    assert_eq!(rewritten["drgElement"][0]["variable"]["name"], "Years");
    assert_eq!(rewritten["drgElement"][1]["expression"]["text"], "Years > 18");
}

#[test]
fn test_rename_without_out_prints_document() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);

    let output = run(&["--model", &model, "rename", "_AGE=Years"]);
    let stdout = stdout_of(&output);

    let rewritten: serde_json::Value = serde_json::from_str(&stdout)
        .unwrap_or_else(|e| panic!("stdout is not a document: {e}\n{stdout}"));
    assert_eq!(rewritten["drgElement"][1]["expression"]["text"], "Years > 18");
}

#[test]
fn test_set_type_updates_the_variable() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);
    let out = dir.path().join("out.json");

    let output = run(&[
        "--model",
        &model,
        "set-type",
        "_AGE",
        "--type-ref",
        "string",
        "--out",
        &out.to_string_lossy(),
    ]);
    stdout_of(&output);

    let rewritten: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(rewritten["drgElement"][0]["variable"]["typeRef"], "string");
}

#[test]
fn test_manifest_loads_imported_models() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "invoice.json", IMPORTING_JSON);
    write(dir.path(), "tax.json", TAX_JSON);
    let manifest = write(dir.path(), "workspace.yaml", MANIFEST_YAML);

    let output = run(&["--manifest", &manifest, "scan", "Amount * tax.Rate"]);
    let stdout = stdout_of(&output);

    assert!(stdout.contains("2 reference(s)"), "unexpected count: {stdout}");
    assert!(
        stdout.contains("-> https://example.com/tax#_RATE"),
        "import did not resolve: {stdout}"
    );
}

#[test]
fn test_missing_model_fails_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");

    let output = run(&["--model", &missing.to_string_lossy(), "variables"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"), "unexpected stderr: {stderr}");
}

#[test]
fn test_malformed_rename_pair_fails() {
    let dir = tempfile::tempdir().unwrap();
    let model = write(dir.path(), "model.json", MODEL_JSON);

    let output = run(&["--model", &model, "rename", "_AGE"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("elementId=NewName"),
        "unexpected stderr: {stderr}"
    );
}
