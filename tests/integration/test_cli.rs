use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn atlas(workspace: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("atlas"));
    cmd.current_dir(workspace)
        .arg("--workspace")
        .arg(workspace)
        .env_remove("RUST_LOG")
        .env_remove("ATLAS_LOG_DIR")
        .env_remove("ATLAS_CORPUS_ROOT")
        .env_remove("ATLAS_MANIFEST_OUTPUT")
        .env_remove("ATLAS_CLUSTERS_FILE")
        .env_remove("ATLAS_MAX_ERRORS_DISPLAYED")
        .env_remove("ATLAS_PROGRESS_INTERVAL")
        .env_remove("ATLAS_GENERATOR_MAX_DOCUMENTS");
    cmd
}

fn write_workflow(workspace: &Path, relative: &str, node_count: usize) {
    let path = workspace.join("workflows").join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let nodes: Vec<Value> = (0..node_count)
        .map(|i| json!({"name": format!("n{}", i), "type": "n8n-nodes-base.slack"}))
        .collect();
    fs::write(path, json!({"name": relative, "nodes": nodes}).to_string()).unwrap();
}

#[test]
fn test_help_lists_every_command() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("CORPUS COMMANDS"))
        .stdout(predicate::str::contains("label"))
        .stdout(predicate::str::contains("clean"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("manifest"))
        .stdout(predicate::str::contains("search-text"));
}

#[test]
fn test_long_help_documents_environment_overrides() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ENVIRONMENT:"))
        .stdout(predicate::str::contains("ATLAS_CORPUS_ROOT"))
        .stdout(predicate::str::contains("ATLAS_LOG_DIR"));
}

#[test]
fn test_relative_workspace_is_resolved_against_current_dir() {
    let dir = TempDir::new().unwrap();
    let workspace = dir.path().join("site");
    fs::create_dir_all(&workspace).unwrap();
    write_workflow(&workspace, "crm/a.json", 2);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("atlas"));
    cmd.current_dir(dir.path())
        .env_remove("RUST_LOG")
        .env_remove("ATLAS_LOG_DIR")
        .env_remove("ATLAS_CORPUS_ROOT")
        .env_remove("ATLAS_PROGRESS_INTERVAL")
        .args(["--workspace", "site", "label", "complexity"])
        .assert()
        .success();

    let labeled: Value = serde_json::from_slice(
        &fs::read(workspace.join("workflows/crm/a.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(labeled["meta"]["complexity"], "basic");
}

#[test]
fn test_label_complexity_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_workflow(dir.path(), "crm/a.json", 2);
    write_workflow(dir.path(), "crm/b.json", 20);

    atlas(dir.path())
        .args(["label", "complexity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== COMPLEXITY LABELS COMPLETE ==="))
        .stdout(predicate::str::contains("Processed: 2"))
        .stdout(predicate::str::contains("Updated:   2"));

    let labeled: Value =
        serde_json::from_slice(&fs::read(dir.path().join("workflows/crm/b.json")).unwrap()).unwrap();
    assert_eq!(labeled["meta"]["complexity"], "advanced");

    atlas(dir.path())
        .args(["label", "complexity"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:   0"))
        .stdout(predicate::str::contains("Skipped:   2 (already labeled)"));
}

#[test]
fn test_missing_corpus_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .args(["label", "complexity", "--corpus", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read corpus root"));
}

#[test]
fn test_unreadable_cluster_file_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    write_workflow(dir.path(), "crm/a.json", 1);
    atlas(dir.path())
        .args(["label", "semantic", "--clusters", "absent.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cluster assignment file"));
}

#[test]
fn test_semantic_labels_from_config_paths() {
    let dir = TempDir::new().unwrap();
    write_workflow(dir.path(), "crm/a.json", 1);
    write_workflow(dir.path(), "crm/b.json", 1);
    fs::write(
        dir.path().join("workflow_clusters.json"),
        json!({"assignments": {"A": {"label": "Alerts", "cluster": 1}}}).to_string(),
    )
    .unwrap();

    atlas(dir.path())
        .args(["label", "semantic"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== SEMANTIC LABELS APPLIED ==="))
        .stdout(predicate::str::contains("Updated:   1"))
        .stdout(predicate::str::contains("Not found: 1"));

    atlas(dir.path())
        .args(["label", "semantic", "--case-sensitive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated:   0"))
        .stdout(predicate::str::contains("Not found: 2"));
}

#[test]
fn test_generate_respects_ceiling_and_filter() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .args([
            "generate",
            "--archetype",
            "support_triage",
            "--max-documents",
            "7",
            "--output",
            "out/synthetic.jsonl",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written:   7"));

    let text = fs::read_to_string(dir.path().join("out/synthetic.jsonl")).unwrap();
    let records: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(records.len(), 7);
    assert!(records
        .iter()
        .all(|r| r["meta"]["archetype"] == "support_triage"));
}

#[test]
fn test_generate_rejects_unknown_archetype() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .args(["generate", "--archetype", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown archetype 'nope'"));
}

#[test]
fn test_manifest_end_to_end() {
    let dir = TempDir::new().unwrap();
    write_workflow(dir.path(), "crm/a.json", 1);
    write_workflow(dir.path(), "ops/b.json", 8);

    atlas(dir.path())
        .arg("manifest")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workflows:  2"))
        .stdout(predicate::str::contains("Categories: 2"));

    let manifest: Value = serde_json::from_slice(
        &fs::read(dir.path().join("web/public/workflows.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["totalWorkflows"], 2);
    assert_eq!(
        manifest["categories"][1]["workflows"][0]["relativePath"],
        "workflows/ops/b.json"
    );
}

#[test]
fn test_clean_then_search_text_pipeline() {
    let dir = TempDir::new().unwrap();
    let workflow = json!({"name": "Mailer", "nodes": [{"type": "n8n-nodes-base.gmail"}]});
    let lines = [
        json!({"key": "Send a mail", "value": workflow.to_string()}).to_string(),
        "garbage".to_string(),
    ];
    fs::write(dir.path().join("external.jsonl"), lines.join("\n")).unwrap();

    atlas(dir.path())
        .args(["clean", "--input", "external.jsonl", "--output", "clean.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written:    1"))
        .stdout(predicate::str::contains("Failed:     1"));

    atlas(dir.path())
        .args(["search-text", "--input", "clean.jsonl", "--output", "final.jsonl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Written:   1"));

    let text = fs::read_to_string(dir.path().join("final.jsonl")).unwrap();
    let record: Value = serde_json::from_str(text.trim_end()).unwrap();
    assert_eq!(
        record["search_text"],
        "Name: Mailer | Instruction: Send a mail | Tools: gmail"
    );
}

#[test]
fn test_clean_missing_input_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    atlas(dir.path())
        .args(["clean", "--input", "absent.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to open input"));
}

#[test]
fn test_invalid_config_exits_non_zero() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("atlas.toml"), "[reporting]\nprogress_interval = 0\n").unwrap();
    write_workflow(dir.path(), "crm/a.json", 1);
    atlas(dir.path())
        .args(["label", "complexity"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("progress_interval"));
}
