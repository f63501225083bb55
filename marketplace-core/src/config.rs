//! Marketplace configuration (marketplace.yaml)
//!
//! Every constant the build consults lives here and is handed to the
//! assembler once, at construction. The file is optional; without it the
//! pinned-list preset is used.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name, looked up at the marketplace root
pub const CONFIG_FILE: &str = "marketplace.yaml";

/// Repository base URL for logo assets
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/lemonade-sdk/marketplace/main";

/// Ranks above this are rejected; featured apps carry a rank at or below it
pub const DEFAULT_FEATURED_THRESHOLD: i64 = 10;

/// Schema version written into apps.json
pub const CATALOG_VERSION: &str = "1.0";

/// Side length of normalized logos, in pixels
pub const DEFAULT_LOGO_SIZE: u32 = 128;

const PINNED_REQUIRED_FIELDS: &[&str] =
    &["id", "name", "description", "category", "links", "date_added"];

const RANK_REQUIRED_FIELDS: &[&str] = &["id", "name", "description", "category", "links"];

/// Which rule decides an app's elevated status. One per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationMode {
    /// `pinned` flag from membership in pinned.json; apps carry `date_added`
    #[default]
    Pinned,
    /// `featured` flag from the presence of `rank`
    Rank,
}

impl ClassificationMode {
    /// Fields every descriptor must carry in this mode, in reporting order.
    /// `rank` is optional: its absence marks an app as not featured.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            ClassificationMode::Pinned => PINNED_REQUIRED_FIELDS,
            ClassificationMode::Rank => RANK_REQUIRED_FIELDS,
        }
    }

    /// Derived boolean written into every catalog entry
    pub fn flag_field(&self) -> &'static str {
        match self {
            ClassificationMode::Pinned => "pinned",
            ClassificationMode::Rank => "featured",
        }
    }

    /// Category list published with this mode
    pub fn default_categories(&self) -> Vec<Category> {
        let last = match self {
            ClassificationMode::Pinned => Category::new("app", "Apps"),
            ClassificationMode::Rank => Category::new("end-user", "End User"),
        };

        vec![
            Category::new("chat", "Chat"),
            Category::new("code", "Code"),
            Category::new("creative", "Creative"),
            Category::new("automation", "Automation"),
            last,
        ]
    }
}

impl std::fmt::Display for ClassificationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationMode::Pinned => write!(f, "pinned"),
            ClassificationMode::Rank => write!(f, "rank"),
        }
    }
}

/// A published category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
}

impl Category {
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

/// Settings for the logo normalizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoConfig {
    /// Width and height of every generated logo.png
    #[serde(default = "default_logo_size")]
    pub target_size: u32,

    /// App id to source image, relative to the assets root
    #[serde(default)]
    pub sources: BTreeMap<String, PathBuf>,
}

fn default_logo_size() -> u32 {
    DEFAULT_LOGO_SIZE
}

impl Default for LogoConfig {
    fn default() -> Self {
        let marketplace = Path::new("app").join("marketplace");
        let partner = PathBuf::from("partner_logos");

        let sources = [
            ("open-webui", partner.join("openwebui.jpg")),
            ("n8n", marketplace.join("n8n.png")),
            ("gaia", marketplace.join("gaia.png")),
            ("infinity-arcade", marketplace.join("infinity_arcade.png")),
            ("continue", marketplace.join("continue.png")),
            ("github-copilot", marketplace.join("github_copilot.png")),
            ("openhands", marketplace.join("openhands.png")),
            ("dify", marketplace.join("dify.png")),
            ("deep-tutor", marketplace.join("deep_tutor.png")),
            ("iterate-ai", marketplace.join("iterate_ai.png")),
            ("perplexica", marketplace.join("perplexica.png")),
            ("hugging-face", marketplace.join("hugging_face.png")),
            ("ai-toolkit", partner.join("ai_toolkit.png")),
            ("ai-dev-gallery", partner.join("ai_dev_gallery.webp")),
            ("anythingllm", partner.join("anything_llm.png")),
            ("codegpt", partner.join("codegpt.jpg")),
        ]
        .into_iter()
        .map(|(id, path)| (id.to_string(), path))
        .collect();

        Self {
            target_size: DEFAULT_LOGO_SIZE,
            sources,
        }
    }
}

/// Immutable build configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketplaceConfig {
    pub classification: ClassificationMode,
    pub base_url: String,
    /// Descriptor root, relative to the marketplace root
    pub apps_dir: PathBuf,
    /// Catalog document path, relative to the marketplace root
    pub output: PathBuf,
    /// Pinned id list, relative to the marketplace root
    pub pinned_file: PathBuf,
    /// Descriptor file name inside each app directory
    pub descriptor_file: String,
    pub featured_threshold: i64,
    /// Reject descriptors whose `id` differs from their directory name
    pub require_id_matches_slug: bool,
    pub categories: Vec<Category>,
    pub logos: LogoConfig,
}

/// On-disk shape of marketplace.yaml; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ConfigFile {
    classification: Option<ClassificationMode>,
    base_url: Option<String>,
    apps_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    pinned_file: Option<PathBuf>,
    descriptor_file: Option<String>,
    featured_threshold: Option<i64>,
    require_id_matches_slug: Option<bool>,
    categories: Option<Vec<Category>>,
    logos: Option<LogoConfig>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self::pinned()
    }
}

impl MarketplaceConfig {
    /// Preset for the pinned-list deployment
    pub fn pinned() -> Self {
        Self::for_mode(ClassificationMode::Pinned)
    }

    /// Preset for the rank-threshold deployment
    pub fn ranked() -> Self {
        Self::for_mode(ClassificationMode::Rank)
    }

    pub fn for_mode(mode: ClassificationMode) -> Self {
        Self {
            classification: mode,
            base_url: DEFAULT_BASE_URL.to_string(),
            apps_dir: PathBuf::from("apps"),
            output: PathBuf::from("apps.json"),
            pinned_file: PathBuf::from("pinned.json"),
            descriptor_file: "app.json".to_string(),
            featured_threshold: DEFAULT_FEATURED_THRESHOLD,
            require_id_matches_slug: true,
            categories: mode.default_categories(),
            logos: LogoConfig::default(),
        }
    }

    /// Load marketplace.yaml from `root`, or the pinned preset if absent
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            debug!("No {} at {}, using defaults", CONFIG_FILE, root.display());
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Parse config YAML, filling gaps from the preset of the chosen mode
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: serde_yaml_ng::Value =
            serde_yaml_ng::from_str(content).context("Invalid marketplace config YAML")?;

        // Empty or comment-only files parse to null
        let file: ConfigFile = if value.is_null() {
            ConfigFile::default()
        } else {
            serde_yaml_ng::from_value(value).context("Invalid marketplace config")?
        };

        let mut config = Self::for_mode(file.classification.unwrap_or_default());

        if let Some(base_url) = file.base_url {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(apps_dir) = file.apps_dir {
            config.apps_dir = apps_dir;
        }
        if let Some(output) = file.output {
            config.output = output;
        }
        if let Some(pinned_file) = file.pinned_file {
            config.pinned_file = pinned_file;
        }
        if let Some(descriptor_file) = file.descriptor_file {
            config.descriptor_file = descriptor_file;
        }
        if let Some(threshold) = file.featured_threshold {
            config.featured_threshold = threshold;
        }
        if let Some(require) = file.require_id_matches_slug {
            config.require_id_matches_slug = require;
        }
        if let Some(categories) = file.categories {
            config.categories = categories;
        }
        if let Some(logos) = file.logos {
            if logos.target_size == 0 {
                bail!("logos.targetSize must be at least 1 pixel");
            }
            config.logos = logos;
        }

        Ok(config)
    }

    /// Switch mode. The category list follows the new mode unless it was
    /// customized.
    pub fn with_classification(mut self, mode: ClassificationMode) -> Self {
        if self.classification != mode {
            if self.categories == self.classification.default_categories() {
                self.categories = mode.default_categories();
            }
            self.classification = mode;
        }
        self
    }

    /// Fields every descriptor must carry, in reporting order
    pub fn required_fields(&self) -> &'static [&'static str] {
        self.classification.required_fields()
    }

    pub fn logo_url(&self, slug: &str, file_name: &str) -> String {
        format!("{}/apps/{}/{}", self.base_url, slug, file_name)
    }

    pub fn placeholder_logo_url(&self) -> String {
        format!("{}/assets/placeholder.png", self.base_url)
    }
}

#[cfg(test)]
mod config_tests {
    use super::*;

    #[test]
    fn test_presets_differ_in_required_field_and_categories() {
        let pinned = MarketplaceConfig::pinned();
        assert_eq!(
            pinned.required_fields(),
            ["id", "name", "description", "category", "links", "date_added"]
        );
        assert_eq!(pinned.categories.last().unwrap().id, "app");

        let ranked = MarketplaceConfig::ranked();
        assert_eq!(
            ranked.required_fields(),
            ["id", "name", "description", "category", "links"]
        );
        assert_eq!(ranked.categories.last().unwrap().id, "end-user");
        assert_eq!(ranked.featured_threshold, 10);
    }

    #[test]
    fn test_empty_yaml_is_pinned_preset() {
        let config = MarketplaceConfig::from_yaml("").unwrap();
        assert_eq!(config, MarketplaceConfig::pinned());

        let config = MarketplaceConfig::from_yaml("# nothing configured yet\n").unwrap();
        assert_eq!(config, MarketplaceConfig::pinned());
    }

    #[test]
    fn test_yaml_overrides() {
        let yaml = r#"
classification: rank
baseUrl: https://example.com/market/
featuredThreshold: 5
requireIdMatchesSlug: false
logos:
  targetSize: 64
  sources:
    n8n: n8n.png
"#;

        let config = MarketplaceConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.classification, ClassificationMode::Rank);
        assert_eq!(config.base_url, "https://example.com/market");
        assert_eq!(config.featured_threshold, 5);
        assert!(!config.require_id_matches_slug);
        assert_eq!(config.categories, ClassificationMode::Rank.default_categories());
        assert_eq!(config.logos.target_size, 64);
        assert_eq!(config.logos.sources.len(), 1);
        assert_eq!(
            config.logo_url("n8n", "logo.png"),
            "https://example.com/market/apps/n8n/logo.png"
        );
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = MarketplaceConfig::from_yaml("classificaton: rank\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_logo_size_is_rejected() {
        let err = MarketplaceConfig::from_yaml("logos:\n  targetSize: 0\n").unwrap_err();
        assert!(err.to_string().contains("targetSize"), "{err}");
    }

    #[test]
    fn test_with_classification_swaps_categories() {
        let config = MarketplaceConfig::pinned().with_classification(ClassificationMode::Rank);
        assert_eq!(config.classification, ClassificationMode::Rank);
        assert_eq!(config.categories, ClassificationMode::Rank.default_categories());
    }

    #[test]
    fn test_with_classification_keeps_custom_categories() {
        let yaml = "categories:\n  - id: games\n    label: Games\n";
        let config = MarketplaceConfig::from_yaml(yaml)
            .unwrap()
            .with_classification(ClassificationMode::Rank);

        assert_eq!(config.classification, ClassificationMode::Rank);
        assert_eq!(config.categories, vec![Category::new("games", "Games")]);
    }

    #[test]
    fn test_default_logo_sources() {
        let logos = LogoConfig::default();
        assert_eq!(logos.target_size, 128);
        assert_eq!(logos.sources.len(), 16);
        assert_eq!(
            logos.sources.get("codegpt"),
            Some(&PathBuf::from("partner_logos").join("codegpt.jpg"))
        );
    }

    #[test]
    fn test_placeholder_url() {
        let config = MarketplaceConfig::pinned();
        assert_eq!(
            config.placeholder_logo_url(),
            "https://raw.githubusercontent.com/lemonade-sdk/marketplace/main/assets/placeholder.png"
        );
    }
}
