use atlas::core::manifest::{write_manifest, Manifest, ManifestBuilder};
use atlas::core::{AtlasConfig, NodeClassifier};
use chrono::{TimeZone, Utc};
use regex::Regex;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, document: Value) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(&document).unwrap()).unwrap();
}

fn corpus(root: &Path) {
    let many: Vec<Value> = (0..9)
        .map(|i| json!({"type": if i % 2 == 0 { "n8n-nodes-base.set" } else { "n8n-nodes-base.googleSheets" }}))
        .collect();
    write(root, "ai/agent.json", json!({"nodes": [{"type": "@n8n/n8n-nodes-langchain.agent"}, {"type": "n8n-nodes-base.openAi"}]}));
    write(root, "ecommerce/orders.json", json!({"nodes": many}));
    write(root, "ecommerce/archive/old.json", json!({"nodes": []}));
    write(root, "custom/thing.json", json!({"nodes": [{"type": "n8n-nodes-base.httpRequest"}]}));
    fs::write(root.join("custom/readme.md"), "# not a workflow").unwrap();
    fs::write(root.join("top-level.json"), "{}").unwrap();
}

fn builder(root: &Path) -> ManifestBuilder {
    let config = AtlasConfig::default();
    ManifestBuilder::new(
        root,
        config.corpus.extension.clone(),
        NodeClassifier::from_config(&config.derivation),
    )
    .with_categories(
        config.manifest.categories.clone(),
        config.manifest.default_description.clone(),
    )
}

#[tokio::test]
async fn test_totals_match_category_contents() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("workflows");
    corpus(&root);

    let (manifest, stats) = builder(&root).build().await.unwrap();
    assert!(manifest.is_consistent());
    assert_eq!(manifest.total_workflows, 4);
    assert_eq!(manifest.category_count, 3);
    assert_eq!(stats.decode_failures, 0);
    assert_eq!(stats.unreadable, 0);

    let shape = Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$").unwrap();
    assert!(shape.is_match(&manifest.generated_at));
}

#[tokio::test]
async fn test_fixed_clock_builds_are_identical() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("workflows");
    corpus(&root);
    let now = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    let (first, _) = builder(&root).build_at(now).await.unwrap();
    let (second, _) = builder(&root).build_at(now).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[tokio::test]
async fn test_entries_carry_derived_metadata() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("workflows");
    corpus(&root);

    let (manifest, _) = builder(&root).build().await.unwrap();
    let ecommerce = manifest
        .categories
        .iter()
        .find(|c| c.id == "ecommerce")
        .unwrap();
    let orders = ecommerce
        .workflows
        .iter()
        .find(|w| w.name == "orders")
        .unwrap();
    assert_eq!(orders.node_count, 9);
    assert_eq!(orders.complexity.as_str(), "intermediate");
    assert_eq!(orders.integrations, vec!["googleSheets"]);
    assert_eq!(orders.relative_path, "workflows/ecommerce/orders.json");
    assert_eq!(
        orders.size_bytes,
        fs::metadata(root.join("ecommerce/orders.json")).unwrap().len()
    );

    let custom = manifest.categories.iter().find(|c| c.id == "custom").unwrap();
    assert_eq!(custom.label, "custom");
    assert_eq!(custom.description, "Community-contributed workflows.");
}

#[tokio::test]
async fn test_relative_to_override() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("workflows");
    corpus(&root);

    let (manifest, _) = builder(&root).with_relative_to(&root).build().await.unwrap();
    let paths: Vec<&str> = manifest
        .categories
        .iter()
        .flat_map(|c| c.workflows.iter().map(|w| w.relative_path.as_str()))
        .collect();
    assert!(paths.contains(&"ecommerce/archive/old.json"));
    assert!(paths.iter().all(|p| !p.starts_with("workflows/")));
}

#[tokio::test]
async fn test_written_manifest_reads_back() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("workflows");
    corpus(&root);

    let (manifest, _) = builder(&root).build().await.unwrap();
    let out = dir.path().join("web/public/workflows.json");
    write_manifest(&out, &manifest).unwrap();

    let back: Manifest = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert_eq!(back, manifest);
    let raw: Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
    assert!(raw["categories"][0]["workflows"][0]["fileName"].is_string());
}
