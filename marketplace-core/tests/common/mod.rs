//! Shared fixtures for marketplace-core integration tests

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A descriptor that passes validation in the pinned deployment
pub fn pinned_descriptor(id: &str, name: &str, date_added: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} for local LLMs"),
        "category": ["chat"],
        "links": {"app": format!("https://example.com/{id}"), "docs": "https://example.com/docs"},
        "date_added": date_added
    })
}

/// A descriptor that passes validation in the rank deployment
pub fn ranked_descriptor(id: &str, name: &str, rank: Option<i64>) -> Value {
    let mut value = json!({
        "id": id,
        "name": name,
        "description": format!("{name} for local LLMs"),
        "category": ["code", "end-user"],
        "links": {"app": format!("https://example.com/{id}")}
    });
    if let Some(rank) = rank {
        value["rank"] = json!(rank);
    }
    value
}

/// Write `apps/<slug>/app.json` under `root`
pub fn write_app(root: &Path, slug: &str, descriptor: &Value) {
    let dir = root.join("apps").join(slug);
    fs::create_dir_all(&dir).unwrap();
    fs::write(
        dir.join("app.json"),
        serde_json::to_string_pretty(descriptor).unwrap(),
    )
    .unwrap();
}

pub fn write_pinned(root: &Path, content: &str) {
    fs::write(root.join("pinned.json"), content).unwrap();
}

/// Parse the generated apps.json
pub fn read_catalog(root: &Path) -> Value {
    let content = fs::read_to_string(root.join("apps.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

/// Ids of the apps array, in order
pub fn app_ids(catalog: &Value) -> Vec<String> {
    catalog["apps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap().to_string())
        .collect()
}
