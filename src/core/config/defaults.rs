//! Built-in values for the list-shaped configuration sections.

use super::CategoryMeta;
use crate::core::generator::{
    ArchetypeTemplate, Dimension, EdgeTemplate, NodeCatalog, NodeTemplate,
};
use indexmap::IndexMap;
use serde_json::{json, Value};

const CORE_NODES: &[&str] = &[
    "manualTrigger",
    "start",
    "set",
    "splitInBatches",
    "stickyNote",
    "merge",
    "if",
    "switch",
    "noOp",
    "wait",
    "executeWorkflow",
    "code",
    "function",
    "functionItem",
    "itemLists",
    "moveBinaryData",
    "writeBinaryFile",
    "readBinaryFile",
    "spreadsheetFile",
    "dateTime",
    "scheduleTrigger",
    "webhook",
    "httpRequest",
    "cron",
    "interval",
];

const CATEGORIES: &[(&str, &str, &str)] = &[
    (
        "community-mega-pack",
        "Community Mega Pack",
        "General-purpose automations covering marketing, ops, CRM, enrichment, and more.",
    ),
    (
        "ai-automation-lab",
        "AI Automation Lab",
        "AI-first agents, copilots, enrichment flows, and RAG building blocks.",
    ),
    (
        "pinecone-rag-kits",
        "Pinecone RAG Kits",
        "Retrieval-augmented generation starters powered by Pinecone indexes.",
    ),
    (
        "box-mcp-demos",
        "Box MCP Demos",
        "Sample Box MCP workflows for DocGen, metadata, and insurance use cases.",
    ),
    (
        "synapse-pro-ops",
        "Synapse Pro Ops",
        "Production-grade automations shared by ProfSynapse.",
    ),
    (
        "self-hosted-ai-starter",
        "Self-Hosted AI Starter",
        "n8n self-hosted AI starter kit demo workflows.",
    ),
];

const CATALOG: &[(&str, &[&str])] = &[
    (
        "triggers.form",
        &["typeformTrigger", "googleFormsTrigger", "jotFormTrigger", "surveyMonkeyTrigger"],
    ),
    (
        "triggers.devops",
        &["githubTrigger", "gitlabTrigger", "bitbucketTrigger", "netlifyTrigger"],
    ),
    (
        "triggers.ecommerce",
        &["shopifyTrigger", "woocommerceTrigger", "stripeTrigger", "gumroadTrigger"],
    ),
    (
        "triggers.drive",
        &["googleDriveTrigger", "dropboxTrigger", "boxTrigger"],
    ),
    (
        "triggers.mail",
        &["gmailTrigger", "microsoftOutlookTrigger", "mailchimpTrigger"],
    ),
    (
        "triggers.chat",
        &["telegramTrigger", "slackTrigger", "whatsAppTrigger"],
    ),
    (
        "triggers.calendar",
        &["googleCalendarTrigger", "calendlyTrigger"],
    ),
    (
        "triggers.app",
        &[
            "airtableTrigger",
            "notionTrigger",
            "clickUpTrigger",
            "hubspotTrigger",
            "jiraTrigger",
            "pipedriveTrigger",
        ],
    ),
    (
        "actions.database",
        &[
            "postgres",
            "mySql",
            "supabase",
            "mariaDb",
            "snowflake",
            "clickhouse",
            "mongoDb",
            "redis",
            "dynamoDb",
        ],
    ),
    (
        "actions.spreadsheet",
        &["googleSheets", "airtable", "nocoDb", "baserow"],
    ),
    (
        "actions.messaging",
        &["slack", "discord", "telegram", "mattermost", "microsoftTeams"],
    ),
    (
        "actions.mail",
        &["gmail", "emailSend", "microsoftOutlook", "mailgun", "sendGrid"],
    ),
    (
        "actions.ai_model",
        &[
            "@n8n/n8n-nodes-langchain.lmChatOpenAi",
            "@n8n/n8n-nodes-langchain.lmChatAnthropic",
            "@n8n/n8n-nodes-langchain.lmChatGoogleGemini",
            "@n8n/n8n-nodes-langchain.lmChatOllama",
        ],
    ),
    (
        "actions.pm",
        &["trello", "asana", "clickUp", "notion", "mondayCom"],
    ),
    ("actions.crm", &["hubspot", "pipedrive", "salesforce"]),
];

const ALL_TRIGGERS: &[&str] = &[
    "triggers.form",
    "triggers.devops",
    "triggers.ecommerce",
    "triggers.drive",
    "triggers.mail",
    "triggers.chat",
    "triggers.calendar",
    "triggers.app",
];

const AGENT: &str = "@n8n/n8n-nodes-langchain.agent";

pub(super) fn core_nodes() -> Vec<String> {
    CORE_NODES.iter().map(|s| s.to_string()).collect()
}

pub(super) fn categories() -> IndexMap<String, CategoryMeta> {
    CATEGORIES
        .iter()
        .map(|(id, label, description)| {
            (
                id.to_string(),
                CategoryMeta {
                    label: label.to_string(),
                    description: description.to_string(),
                },
            )
        })
        .collect()
}

pub(super) fn catalog() -> NodeCatalog {
    CATALOG
        .iter()
        .map(|(group, members)| {
            (
                group.to_string(),
                members.iter().map(|m| m.to_string()).collect(),
            )
        })
        .collect()
}

fn dimension(name: &str, groups: &[&str]) -> Dimension {
    Dimension {
        name: name.to_string(),
        groups: groups.iter().map(|g| g.to_string()).collect(),
    }
}

fn node(name: &str, node_type: &str, position: [i64; 2], parameters: Option<Value>) -> NodeTemplate {
    NodeTemplate {
        name: name.to_string(),
        node_type: node_type.to_string(),
        position,
        parameters: parameters.and_then(|p| p.as_object().cloned()),
    }
}

fn edge(from: &str, to: &str) -> EdgeTemplate {
    port_edge(from, to, "main")
}

fn port_edge(from: &str, to: &str, port: &str) -> EdgeTemplate {
    EdgeTemplate {
        from: from.to_string(),
        to: to.to_string(),
        port: port.to_string(),
    }
}

pub(super) fn archetypes() -> Vec<ArchetypeTemplate> {
    vec![
        ArchetypeTemplate {
            id: "super_ai_pipeline".into(),
            name: "AI-Enhanced Data Pipeline".into(),
            description:
                "Trigger -> AI Analysis -> Database Storage -> Multi-Channel Notification".into(),
            dimensions: vec![
                dimension("trigger", ALL_TRIGGERS),
                dimension("ai", &["actions.ai_model"]),
                dimension("db", &["actions.database", "actions.spreadsheet"]),
                dimension("msg", &["actions.messaging"]),
            ],
            nodes: vec![
                node("Trigger", "n8n-nodes-base.{trigger}", [0, 0], None),
                node(
                    "AI Agent",
                    AGENT,
                    [200, 0],
                    Some(json!({"prompt": "Process this input"})),
                ),
                node("AI Model", "{ai}", [200, 200], None),
                node(
                    "Database",
                    "n8n-nodes-base.{db}",
                    [400, 0],
                    Some(json!({"operation": "insert"})),
                ),
                node("Notify", "n8n-nodes-base.{msg}", [600, 0], None),
            ],
            edges: vec![
                edge("Trigger", "AI Agent"),
                port_edge("AI Model", "AI Agent", "ai_languageModel"),
                edge("AI Agent", "Database"),
                edge("Database", "Notify"),
            ],
            distinct: Vec::new(),
        },
        ArchetypeTemplate {
            id: "cross_pm_sync".into(),
            name: "Cross-Platform Task Sync".into(),
            description: "Syncs tasks between two different project management tools.".into(),
            dimensions: vec![
                dimension("src", &["actions.pm"]),
                dimension("dest", &["actions.pm"]),
            ],
            nodes: vec![
                node("Schedule", "n8n-nodes-base.scheduleTrigger", [0, 0], None),
                node(
                    "Source",
                    "n8n-nodes-base.{src}",
                    [200, 0],
                    Some(json!({"operation": "getAll"})),
                ),
                node(
                    "Destination",
                    "n8n-nodes-base.{dest}",
                    [400, 0],
                    Some(json!({"operation": "create"})),
                ),
            ],
            edges: vec![edge("Schedule", "Source"), edge("Source", "Destination")],
            distinct: vec![["src".into(), "dest".into()]],
        },
        ArchetypeTemplate {
            id: "multi_dest_backup".into(),
            name: "Redundant Data Backup".into(),
            description: "Trigger -> Store in SQL -> Store in NoSQL (Redundant)".into(),
            dimensions: vec![
                dimension("trigger", ALL_TRIGGERS),
                dimension("primary", &["actions.database"]),
                dimension("secondary", &["actions.spreadsheet"]),
            ],
            nodes: vec![
                node("Trigger", "n8n-nodes-base.{trigger}", [0, 0], None),
                node(
                    "Primary DB",
                    "n8n-nodes-base.{primary}",
                    [200, 0],
                    Some(json!({"operation": "insert"})),
                ),
                node(
                    "Secondary DB",
                    "n8n-nodes-base.{secondary}",
                    [400, 0],
                    Some(json!({"operation": "append"})),
                ),
            ],
            edges: vec![
                edge("Trigger", "Primary DB"),
                edge("Primary DB", "Secondary DB"),
            ],
            distinct: Vec::new(),
        },
        ArchetypeTemplate {
            id: "support_triage".into(),
            name: "Customer Support Triage".into(),
            description: "Form -> AI Analysis -> Support Ticket -> Team Notification".into(),
            dimensions: vec![
                dimension("form", &["triggers.form"]),
                dimension("ai", &["actions.ai_model"]),
                dimension("msg", &["actions.messaging"]),
            ],
            nodes: vec![
                node("Form", "n8n-nodes-base.{form}", [0, 0], None),
                node("AI Analyzer", AGENT, [200, 0], None),
                node("AI Model", "{ai}", [200, 200], None),
                node(
                    "Ticket",
                    "n8n-nodes-base.jira",
                    [400, 0],
                    Some(json!({"operation": "create"})),
                ),
                node("Notify", "n8n-nodes-base.{msg}", [600, 0], None),
            ],
            edges: vec![
                edge("Form", "AI Analyzer"),
                port_edge("AI Model", "AI Analyzer", "ai_languageModel"),
                edge("AI Analyzer", "Ticket"),
                edge("Ticket", "Notify"),
            ],
            distinct: Vec::new(),
        },
        ArchetypeTemplate {
            id: "ecommerce_flow".into(),
            name: "E-commerce Order Pipeline".into(),
            description:
                "Store Trigger -> CRM Update -> Email Receipt -> Shipping Label (Mock)".into(),
            dimensions: vec![
                dimension("store", &["triggers.ecommerce"]),
                dimension("crm", &["actions.crm"]),
                dimension("email", &["actions.mail"]),
            ],
            nodes: vec![
                node("Order", "n8n-nodes-base.{store}", [0, 0], None),
                node(
                    "CRM",
                    "n8n-nodes-base.{crm}",
                    [200, 0],
                    Some(json!({"operation": "upsert"})),
                ),
                node("Email", "n8n-nodes-base.{email}", [400, 0], None),
            ],
            edges: vec![edge("Order", "CRM"), edge("CRM", "Email")],
            distinct: Vec::new(),
        },
    ]
}
