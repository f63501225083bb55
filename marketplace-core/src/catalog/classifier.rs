//! Pinned / featured classification
//!
//! A deployment uses exactly one rule. The rule is picked when the assembler
//! is built, never per entry.

use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{info, warn};

use super::descriptor::Descriptor;
use crate::config::{ClassificationMode, MarketplaceConfig};

/// Decides the derived boolean flag of a catalog entry
pub trait Classifier {
    /// Mode this classifier implements
    fn mode(&self) -> ClassificationMode;

    /// Whether the descriptor gets the elevated flag
    fn classify(&self, descriptor: &Descriptor) -> bool;
}

/// On-disk shape of pinned.json
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PinnedListFile {
    #[serde(default)]
    pub pinned: Vec<String>,
}

/// Pinned when the app id appears in pinned.json
#[derive(Debug, Clone, Default)]
pub struct PinnedList {
    ids: BTreeSet<String>,
}

impl PinnedList {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Load from a pinned.json file; see [`load_pinned_ids`]
    pub fn load(path: &Path) -> Self {
        Self {
            ids: load_pinned_ids(path),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

impl Classifier for PinnedList {
    fn mode(&self) -> ClassificationMode {
        ClassificationMode::Pinned
    }

    fn classify(&self, descriptor: &Descriptor) -> bool {
        descriptor.id().is_some_and(|id| self.contains(id))
    }
}

/// Featured when a rank is present. Range is enforced by the validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RankThreshold;

impl Classifier for RankThreshold {
    fn mode(&self) -> ClassificationMode {
        ClassificationMode::Rank
    }

    fn classify(&self, descriptor: &Descriptor) -> bool {
        descriptor.rank().is_some()
    }
}

/// Read the pinned id set. Never fails: a missing or malformed file yields
/// an empty set and a warning.
pub fn load_pinned_ids(path: &Path) -> BTreeSet<String> {
    if !path.exists() {
        warn!("No pinned.json found at {}", path.display());
        return BTreeSet::new();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Error reading pinned.json: {e}");
            return BTreeSet::new();
        }
    };

    match serde_json::from_str::<PinnedListFile>(&content) {
        Ok(file) => file.pinned.into_iter().collect(),
        Err(e) => {
            warn!("Error reading pinned.json: {e}");
            BTreeSet::new()
        }
    }
}

/// Classifier for the configured mode. Pinned deployments read
/// `config.pinned_file` under `root`.
pub fn classifier_for(config: &MarketplaceConfig, root: &Path) -> Box<dyn Classifier> {
    match config.classification {
        ClassificationMode::Pinned => {
            let pinned = PinnedList::load(&root.join(&config.pinned_file));
            info!("Loaded {} pinned apps", pinned.len());
            Box::new(pinned)
        }
        ClassificationMode::Rank => Box::new(RankThreshold),
    }
}

#[cfg(test)]
mod classifier_tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn app(value: serde_json::Value) -> Descriptor {
        Descriptor::from_value(value).unwrap()
    }

    #[test]
    fn test_pinned_membership() {
        let pinned = PinnedList::new(["n8n", "gaia"]);
        assert!(pinned.classify(&app(json!({"id": "gaia"}))));
        assert!(!pinned.classify(&app(json!({"id": "dify"}))));
        assert!(!pinned.classify(&app(json!({}))));
    }

    #[test]
    fn test_featured_follows_rank_presence() {
        assert!(RankThreshold.classify(&app(json!({"id": "a", "rank": 1}))));
        assert!(!RankThreshold.classify(&app(json!({"id": "b"}))));
    }

    #[test]
    fn test_missing_pinned_file_is_empty() {
        let dir = TempDir::new().unwrap();
        assert!(load_pinned_ids(&dir.path().join("pinned.json")).is_empty());
    }

    #[test]
    fn test_malformed_pinned_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinned.json");

        for content in ["{not json", r#"{"pinned": "n8n"}"#, r#"["n8n"]"#, r#"{"pinned": [1, 2]}"#] {
            std::fs::write(&path, content).unwrap();
            assert!(load_pinned_ids(&path).is_empty(), "content: {content}");
        }
    }

    #[test]
    fn test_pinned_file_without_key_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinned.json");
        std::fs::write(&path, r#"{"featured": ["n8n"]}"#).unwrap();
        assert!(load_pinned_ids(&path).is_empty());
    }

    #[test]
    fn test_pinned_file_loads_ids() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pinned.json");
        std::fs::write(&path, r#"{"pinned": ["n8n", "gaia", "n8n"]}"#).unwrap();

        let ids = load_pinned_ids(&path);
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("gaia"));
    }

    #[test]
    fn test_classifier_for_mode() {
        let dir = TempDir::new().unwrap();
        let classifier = classifier_for(&MarketplaceConfig::ranked(), dir.path());
        assert_eq!(classifier.mode(), ClassificationMode::Rank);

        let classifier = classifier_for(&MarketplaceConfig::pinned(), dir.path());
        assert_eq!(classifier.mode(), ClassificationMode::Pinned);
    }
}
