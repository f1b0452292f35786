use atlas::core::assignments::{
    AssignmentIndex, ClusterAssignment, ClusterId, DocumentIdentity, IdentityKind,
};
use atlas::core::document::decode;
use atlas::core::ErrorCategory;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn assignment(label: &str, cluster: i64) -> ClusterAssignment {
    ClusterAssignment {
        label: label.to_string(),
        cluster: ClusterId::Number(cluster),
    }
}

fn index(entries: &[(&str, &str, i64)], case_insensitive: bool) -> AssignmentIndex {
    let map: IndexMap<String, ClusterAssignment> = entries
        .iter()
        .map(|(key, label, cluster)| (key.to_string(), assignment(label, *cluster)))
        .collect();
    AssignmentIndex::new(map, case_insensitive)
}

#[test]
fn test_id_wins_over_stem_and_name() {
    let index = index(
        &[("wf-1", "by-id", 1), ("lead_sync", "by-stem", 2), ("Lead Sync", "by-name", 3)],
        true,
    );
    let document = decode(br#"{"id": "wf-1", "name": "Lead Sync"}"#).unwrap();
    let identity = DocumentIdentity::of(&document, Path::new("crm/lead_sync.json"), ".json");

    let resolved = index.resolve(&identity).unwrap();
    assert_eq!(resolved.assignment.label, "by-id");
    assert_eq!(resolved.matched, IdentityKind::Id);
}

#[test]
fn test_stem_is_used_when_id_is_unknown() {
    let index = index(&[("lead_sync", "by-stem", 2), ("Lead Sync", "by-name", 3)], true);
    let document = decode(br#"{"id": 99, "name": "Lead Sync"}"#).unwrap();
    let identity = DocumentIdentity::of(&document, Path::new("crm/lead_sync.json"), ".json");

    let resolved = index.resolve(&identity).unwrap();
    assert_eq!(resolved.assignment.label, "by-stem");
    assert_eq!(resolved.matched, IdentityKind::FileStem);
}

#[test]
fn test_name_is_the_last_resort() {
    let index = index(&[("Lead Sync", "by-name", 3)], true);
    let document = decode(br#"{"name": "Lead Sync"}"#).unwrap();
    let identity = DocumentIdentity::of(&document, Path::new("crm/other.json"), ".json");

    let resolved = index.resolve(&identity).unwrap();
    assert_eq!(resolved.matched, IdentityKind::Name);
}

#[test]
fn test_case_folding_can_be_disabled() {
    let document = decode(br#"{"name": "LEAD SYNC"}"#).unwrap();
    let identity = DocumentIdentity::of(&document, Path::new("x.json"), ".json");

    assert!(index(&[("Lead Sync", "l", 1)], true).resolve(&identity).is_some());
    assert!(index(&[("Lead Sync", "l", 1)], false).resolve(&identity).is_none());
}

#[test]
fn test_exact_match_beats_folded_match() {
    let index = index(&[("lead sync", "lower", 1), ("Lead Sync", "exact", 2)], true);
    assert_eq!(index.get("Lead Sync").unwrap().label, "exact");
    assert_eq!(index.get("LEAD SYNC").unwrap().label, "lower");
}

#[test]
fn test_load_reads_string_and_numeric_clusters() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clusters.json");
    fs::write(
        &path,
        r#"{
            "assignments": {
                "a": {"label": "Sales", "cluster": 4},
                "b": {"label": "Ops", "cluster": "c-9"}
            },
            "cluster_info": {"4": {"size": 10}}
        }"#,
    )
    .unwrap();

    let index = AssignmentIndex::load(&path, true).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.get("a").unwrap().cluster, ClusterId::Number(4));
    assert_eq!(
        index.get("b").unwrap().cluster,
        ClusterId::Text("c-9".to_string())
    );
}

#[test]
fn test_load_failures_are_fatal_categories() {
    let dir = TempDir::new().unwrap();
    let missing = AssignmentIndex::load(&dir.path().join("nope.json"), true).unwrap_err();
    assert_eq!(missing.category, ErrorCategory::IoError);

    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{").unwrap();
    let invalid = AssignmentIndex::load(&broken, true).unwrap_err();
    assert_eq!(invalid.category, ErrorCategory::SerializationError);
}
