use atlas::core::generator::{
    combinations, expand, resolve_archetypes, ArchetypeTemplate, NodeCatalog, SyntheticGenerator,
};
use atlas::utils::IdMinter;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Deserialize)]
struct Fixture {
    catalog: NodeCatalog,
    archetypes: Vec<ArchetypeTemplate>,
}

const FIXTURE: &str = r#"
[catalog]
triggers = ["ns.webhook", "ns.formTrigger", "ns.scheduleTrigger"]
sinks = ["ns.slack", "ns.discord", "ns.telegram", "ns.gmail"]
pm = ["ns.jira", "ns.asana", "ns.trello"]

[[archetypes]]
id = "notify"
name = "Notify"
dimensions = [
    { name = "trigger", groups = ["triggers"] },
    { name = "sink", groups = ["sinks"] },
]
nodes = [
    { name = "Start", type = "{trigger}", position = [0, 0] },
    { name = "Send", type = "{sink}", position = [250, 0] },
]
edges = [{ from = "Start", to = "Send" }]

[[archetypes]]
id = "sync"
name = "PM Sync"
distinct = [["src", "dest"]]
dimensions = [
    { name = "src", groups = ["pm"] },
    { name = "dest", groups = ["pm"] },
]
nodes = [
    { name = "Read", type = "{src}", position = [0, 0] },
    { name = "Write", type = "{dest}", position = [250, 0] },
]
edges = [{ from = "Read", to = "Write" }]
"#;

fn fixture() -> Fixture {
    toml::from_str(FIXTURE).unwrap()
}

fn run(only: &[&str], cap: usize) -> Vec<Value> {
    let fixture = fixture();
    let only: Vec<String> = only.iter().map(|s| s.to_string()).collect();
    let archetypes = resolve_archetypes(&fixture.archetypes, &fixture.catalog, &only).unwrap();
    let mut generator = SyntheticGenerator::new(archetypes, cap, "ns.", IdMinter::from_entropy());
    let mut out = Vec::new();
    generator.generate(&mut out).unwrap();
    String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[test]
fn test_three_by_four_yields_twelve_distinct_records() {
    let records = run(&["notify"], 1000);
    assert_eq!(records.len(), 12);

    let ids: HashSet<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 12);

    let pairs: HashSet<(String, String)> = records
        .iter()
        .map(|r| {
            let nodes = &r["content"]["nodes"];
            (
                nodes[0]["type"].as_str().unwrap().to_string(),
                nodes[1]["type"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    assert_eq!(pairs.len(), 12);
}

#[test]
fn test_last_dimension_varies_fastest() {
    let records = run(&["notify"], 1000);
    let sinks: Vec<&str> = records[..4]
        .iter()
        .map(|r| r["content"]["nodes"][1]["type"].as_str().unwrap())
        .collect();
    assert_eq!(sinks, vec!["ns.slack", "ns.discord", "ns.telegram", "ns.gmail"]);
    assert_eq!(records[0]["content"]["nodes"][0]["type"], "ns.webhook");
    assert_eq!(records[4]["content"]["nodes"][0]["type"], "ns.formTrigger");
}

#[test]
fn test_distinct_pairs_are_skipped() {
    let records = run(&["sync"], 1000);
    assert_eq!(records.len(), 6);
    for record in &records {
        let nodes = &record["content"]["nodes"];
        assert_ne!(nodes[0]["type"], nodes[1]["type"]);
    }
}

#[test]
fn test_triggers_are_left_out_of_integrations() {
    let records = run(&["notify"], 1000);
    let form = records
        .iter()
        .find(|r| r["content"]["nodes"][0]["type"] == "ns.formTrigger")
        .unwrap();
    assert_eq!(form["integrations"].as_array().unwrap().len(), 1);
}

#[test]
fn test_cap_counts_across_archetypes() {
    let records = run(&[], 14);
    assert_eq!(records.len(), 14);
    assert_eq!(records[11]["meta"]["archetype"], "notify");
    assert_eq!(records[12]["meta"]["archetype"], "sync");
    assert_eq!(records[13]["name"], "PM Sync (Variant 13)");
}

#[test]
fn test_expand_matches_combinations_prefix() {
    let fixture = fixture();
    let archetypes = resolve_archetypes(&fixture.archetypes, &fixture.catalog, &[]).unwrap();
    assert_eq!(combinations(&archetypes).count(), 18);
    assert_eq!(expand(&archetypes, 5).count(), 5);
    assert_eq!(expand(&archetypes, 100).count(), 18);
}

#[test]
fn test_default_templates_lint_clean() {
    let config = atlas::core::AtlasConfig::default();
    for template in &config.generator.archetypes {
        assert!(template.lint().is_empty(), "{:?}", template.lint());
    }
    let archetypes =
        resolve_archetypes(&config.generator.archetypes, &config.generator.catalog, &[]).unwrap();
    assert_eq!(archetypes.len(), 5);
}
