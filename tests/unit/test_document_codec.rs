use atlas::core::document::{decode, encode, DecodeError};
use serde_json::{json, Value};

#[test]
fn test_unknown_fields_survive_a_round_trip() {
    let source = json!({
        "id": 42,
        "name": "Lead Sync",
        "active": false,
        "settings": {"executionOrder": "v1"},
        "nodes": [
            {
                "name": "Hook",
                "type": "n8n-nodes-base.webhook",
                "typeVersion": 2,
                "position": [0, 0],
                "webhookId": "abc"
            }
        ],
        "connections": {},
        "meta": {"instanceId": "xyz"}
    });
    let bytes = serde_json::to_vec(&source).unwrap();

    let mut document = decode(&bytes).unwrap();
    document.meta_mut().insert("complexity".into(), json!("basic"));
    let written: Value = serde_json::from_slice(&encode(&document).unwrap()).unwrap();

    assert_eq!(written["active"], false);
    assert_eq!(written["settings"]["executionOrder"], "v1");
    assert_eq!(written["nodes"][0]["typeVersion"], 2);
    assert_eq!(written["nodes"][0]["webhookId"], "abc");
    assert_eq!(written["meta"]["instanceId"], "xyz");
    assert_eq!(written["meta"]["complexity"], "basic");
    assert_eq!(written["id"], 42);
}

#[test]
fn test_encoding_uses_two_space_indent() {
    let document = decode(br#"{"name":"x","nodes":[]}"#).unwrap();
    let text = String::from_utf8(encode(&document).unwrap()).unwrap();
    assert_eq!(text, "{\n  \"name\": \"x\",\n  \"nodes\": []\n}");
}

#[test]
fn test_missing_nodes_decode_as_empty() {
    let document = decode(br#"{"name": "empty"}"#).unwrap();
    assert_eq!(document.node_count(), 0);
}

#[test]
fn test_malformed_bytes_are_syntax_errors() {
    assert!(matches!(decode(b"{ nope"), Err(DecodeError::Syntax(_))));
    assert!(matches!(decode(b""), Err(DecodeError::Syntax(_))));
}

#[test]
fn test_wrong_shapes_are_schema_errors() {
    assert!(matches!(decode(b"[1, 2]"), Err(DecodeError::Schema(_))));
    assert!(matches!(
        decode(br#"{"nodes": {"a": 1}}"#),
        Err(DecodeError::Schema(_))
    ));
}

#[test]
fn test_id_text_accepts_strings_and_numbers() {
    assert_eq!(decode(br#"{"id": "abc"}"#).unwrap().id_text().as_deref(), Some("abc"));
    assert_eq!(decode(br#"{"id": 7}"#).unwrap().id_text().as_deref(), Some("7"));
    assert_eq!(decode(br#"{"id": ""}"#).unwrap().id_text(), None);
    assert_eq!(decode(br#"{"id": null}"#).unwrap().id_text(), None);
}

#[test]
fn test_unexpected_field_types_still_decode() {
    let document = decode(
        br#"{
            "name": 42,
            "connections": [],
            "meta": "legacy",
            "nodes": [
                {"name": 1, "type": "n8n-nodes-base.slack", "credentials": []},
                {"type": {"nested": true}, "parameters": "raw"},
                "loose"
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(document.node_count(), 3);
    assert_eq!(document.name_str(), None);
    assert!(document.connections().is_none());
    assert!(document.meta().is_none());
    assert_eq!(document.nodes[0].type_str(), Some("n8n-nodes-base.slack"));
    assert_eq!(document.nodes[0].name_str(), None);
    assert_eq!(document.nodes[0].credential_keys().count(), 0);
    assert_eq!(document.nodes[1].type_str(), None);

    let written: Value = serde_json::from_slice(&encode(&document).unwrap()).unwrap();
    assert_eq!(written["name"], 42);
    assert_eq!(written["connections"], json!([]));
    assert_eq!(written["nodes"][1]["parameters"], "raw");
    assert_eq!(written["nodes"][2], "loose");
}

#[test]
fn test_null_values_survive_a_round_trip() {
    let mut document = decode(
        br#"{"id": null, "name": null, "nodes": [{"type": "x", "parameters": null, "credentials": null}]}"#,
    )
    .unwrap();
    document.meta_mut().insert("complexity".into(), json!("basic"));
    let written: Value = serde_json::from_slice(&encode(&document).unwrap()).unwrap();

    assert_eq!(
        written,
        json!({
            "id": null,
            "name": null,
            "nodes": [{"type": "x", "parameters": null, "credentials": null}],
            "meta": {"complexity": "basic"}
        })
    );
    let object = written.as_object().unwrap();
    assert!(object.contains_key("name"));
    assert!(object["nodes"][0].as_object().unwrap().contains_key("parameters"));
}

#[test]
fn test_null_nodes_is_a_schema_error() {
    assert!(matches!(
        decode(br#"{"nodes": null}"#),
        Err(DecodeError::Schema(_))
    ));
}
