use atlas::core::cleaner::{structural_signature, CleanOptions, CleanStats, CorpusCleaner};
use atlas::core::document::decode;
use atlas::core::{CappedErrorReporter, NodeClassifier};
use atlas::utils::IdMinter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use regex::Regex;
use serde_json::{json, Value};

fn record(key: &str, workflow: Value) -> String {
    json!({"key": key, "value": workflow.to_string()}).to_string()
}

fn clean(input: &str, options: CleanOptions) -> (CleanStats, Vec<Value>) {
    let reporter = CappedErrorReporter::new(0);
    let mut cleaner = CorpusCleaner::new(
        NodeClassifier::without_allowlist("n8n-nodes-base."),
        options,
        IdMinter::new(StdRng::seed_from_u64(11)),
        &reporter,
    );
    let mut out = Vec::new();
    let stats = cleaner.clean(input.as_bytes(), &mut out).unwrap();
    let records = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    (stats, records)
}

#[test]
fn test_record_without_nodes_is_skipped() {
    let input = [
        record("Post to slack", json!({"name": "Slack poster", "nodes": [{"type": "n8n-nodes-base.slack"}]})),
        record("No nodes here", json!({"name": "Broken"})),
    ]
    .join("\n");

    let (stats, records) = clean(&input, CleanOptions::default());
    assert_eq!(stats.read, 2);
    assert_eq!(stats.written, 1);
    assert_eq!(stats.failed, 1);
    assert_eq!(records[0]["name"], "Slack poster");
}

#[test]
fn test_output_shape() {
    let workflow = json!({
        "id": "keep-me",
        "name": "Mailer",
        "nodes": [
            {"type": "n8n-nodes-base.gmail", "credentials": {"gmailOAuth2": {"id": "1"}}},
            {"type": "n8n-nodes-base.set"}
        ],
        "connections": {}
    });
    let (_, records) = clean(&record("Send mail", workflow.clone()), CleanOptions::default());
    let out = &records[0];

    assert_eq!(out["id"], "keep-me");
    assert_eq!(out["node_count"], 2);
    assert_eq!(out["integrations"], json!(["gmail", "set"]));
    assert_eq!(out["credentials"], json!(["gmailOAuth2"]));
    assert_eq!(out["content"], workflow);
    assert_eq!(out["meta"]["source"], "external_community");
    assert_eq!(out["meta"]["instruction"], "Send mail");
}

#[test]
fn test_missing_id_and_name_are_filled_in() {
    let options = CleanOptions {
        name_fallback_chars: 5,
        ..CleanOptions::default()
    };
    let (_, records) = clean(&record("Ünïcode instruction", json!({"nodes": []})), options);
    let shape = Regex::new(r"^[0-9a-f]{16}$").unwrap();

    assert!(shape.is_match(records[0]["id"].as_str().unwrap()));
    assert_eq!(records[0]["name"], "Ünïco");
}

#[test]
fn test_malformed_lines_are_counted_and_blank_lines_ignored() {
    let input = format!(
        "not json\n\n{}\r\n{}\n   \n{}\n",
        json!({"key": 5, "value": "{}"}),
        json!({"key": "x", "value": 3}),
        record("ok", json!({"nodes": []})),
    );
    let (stats, records) = clean(&input, CleanOptions::default());
    assert_eq!(stats.read, 4);
    assert_eq!(stats.failed, 3);
    assert_eq!(stats.written, 1);
    assert_eq!(records.len(), 1);
}

#[test]
fn test_value_may_be_an_inline_object() {
    let line = json!({"key": "inline", "value": {"nodes": [], "name": "Inline"}}).to_string();
    let (stats, records) = clean(&line, CleanOptions::default());
    assert_eq!(stats.written, 1);
    assert_eq!(records[0]["name"], "Inline");
}

#[test]
fn test_structural_duplicates_are_dropped_when_enabled() {
    let a = json!({"name": "A", "nodes": [{"type": "t.b"}, {"type": "t.a"}], "connections": {"x": {}}});
    let b = json!({"name": "B", "nodes": [{"type": "t.a"}, {"type": "t.b"}], "connections": {"y": {}}});
    let c = json!({"name": "C", "nodes": [{"type": "t.a"}], "connections": {}});
    let input = [record("1", a), record("2", b), record("3", c)].join("\n");

    let (stats, _) = clean(&input, CleanOptions::default());
    assert_eq!(stats.written, 3);

    let options = CleanOptions {
        dedupe: true,
        ..CleanOptions::default()
    };
    let (stats, records) = clean(&input, options);
    assert_eq!(stats.written, 2);
    assert_eq!(stats.duplicates, 1);
    assert_eq!(records[1]["name"], "C");
}

#[test]
fn test_structural_signature_format() {
    let document =
        decode(br#"{"nodes": [{"type": "b"}, {"type": "a"}, {}], "connections": {"a": {}}}"#)
            .unwrap();
    assert_eq!(structural_signature(&document), "-a-b:1");
}
