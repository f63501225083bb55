//! Catalog assembly
//!
//! Walks the apps directory, validates and enriches each descriptor, and
//! writes apps.json only when every descriptor is valid.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::classifier::{classifier_for, Classifier};
use super::descriptor::Descriptor;
use super::document::{CatalogDocument, CatalogEntry};
use super::logo::resolve_logo_url;
use super::validator::validate_descriptor;
use crate::config::{ClassificationMode, MarketplaceConfig};
use crate::error::BuildError;

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    /// Where apps.json was written
    pub output: PathBuf,
    pub app_count: usize,
    /// Pinned or featured entries, depending on `mode`
    pub flagged_count: usize,
    pub mode: ClassificationMode,
}

/// What happened to one app directory
enum AppOutcome {
    /// No descriptor file; not an error
    Skipped,
    Rejected(Vec<String>),
    Accepted(Box<CatalogEntry>),
}

/// Drives validation, enrichment and ordering for one build
pub struct Assembler {
    config: MarketplaceConfig,
    classifier: Box<dyn Classifier>,
}

impl Assembler {
    pub fn new(config: MarketplaceConfig, classifier: Box<dyn Classifier>) -> Self {
        debug_assert_eq!(config.classification, classifier.mode());
        Self { config, classifier }
    }

    /// Assembler for the configured mode, loading pinned ids from `root`
    pub fn for_root(config: MarketplaceConfig, root: &Path) -> Self {
        let classifier = classifier_for(&config, root);
        Self::new(config, classifier)
    }

    /// Build the catalog document without writing it.
    ///
    /// Fails with [`BuildError::Validation`] carrying every error from every
    /// app if any descriptor is invalid.
    pub fn assemble(&self, apps_dir: &Path) -> Result<CatalogDocument, BuildError> {
        let app_dirs = list_app_dirs(apps_dir)?;
        self.assemble_dirs(app_dirs)
    }

    /// Assemble from app directories already listed by [`list_app_dirs`]
    fn assemble_dirs(&self, app_dirs: Vec<PathBuf>) -> Result<CatalogDocument, BuildError> {
        let mut apps = Vec::new();
        let mut errors = Vec::new();

        for app_dir in app_dirs {
            let slug = app_dir
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.process_app(&app_dir, &slug) {
                AppOutcome::Skipped => {}
                AppOutcome::Rejected(app_errors) => {
                    errors.extend(app_errors.into_iter().map(|e| format!("{slug}: {e}")));
                }
                AppOutcome::Accepted(entry) => apps.push(*entry),
            }
        }

        if !errors.is_empty() {
            return Err(BuildError::Validation { errors });
        }

        Ok(CatalogDocument::new(
            apps,
            self.config.categories.clone(),
            self.config.classification,
        ))
    }

    /// Assemble and write the document to `output`
    pub fn build(&self, apps_dir: &Path, output: &Path) -> Result<BuildSummary, BuildError> {
        let document = self.assemble(apps_dir)?;
        self.publish(&document, output)
    }

    fn publish(&self, document: &CatalogDocument, output: &Path) -> Result<BuildSummary, BuildError> {
        write_document(document, output)?;

        Ok(BuildSummary {
            output: output.to_path_buf(),
            app_count: document.apps.len(),
            flagged_count: document.flagged_count(),
            mode: self.config.classification,
        })
    }

    fn process_app(&self, app_dir: &Path, slug: &str) -> AppOutcome {
        let descriptor_path = app_dir.join(&self.config.descriptor_file);
        if !descriptor_path.is_file() {
            warn!("No {} found in {slug}", self.config.descriptor_file);
            return AppOutcome::Skipped;
        }

        let content = match std::fs::read_to_string(&descriptor_path) {
            Ok(content) => content,
            Err(e) => {
                return AppOutcome::Rejected(vec![format!(
                    "Failed to read {} - {e}",
                    self.config.descriptor_file
                )])
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => return AppOutcome::Rejected(vec![format!("Invalid JSON - {e}")]),
        };

        let Some(descriptor) = Descriptor::from_value(value) else {
            return AppOutcome::Rejected(vec!["descriptor must be a JSON object".to_string()]);
        };

        let errors = validate_descriptor(&descriptor, slug, &self.config);
        if !errors.is_empty() {
            return AppOutcome::Rejected(errors);
        }

        let logo = resolve_logo_url(app_dir, slug, &self.config);
        let flagged = self.classifier.classify(&descriptor);
        debug!(slug, flagged, "Accepted app");

        AppOutcome::Accepted(Box::new(CatalogEntry::new(
            slug,
            descriptor,
            logo,
            self.config.classification,
            flagged,
        )))
    }
}

/// Immediate subdirectories of `apps_dir`, in file name order.
///
/// Fails with [`BuildError::AppsDirNotFound`] when `apps_dir` is not a directory.
pub fn list_app_dirs(apps_dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    if !apps_dir.is_dir() {
        return Err(BuildError::AppsDirNotFound {
            path: apps_dir.to_path_buf(),
        });
    }

    let mut dirs = Vec::new();

    for entry in WalkDir::new(apps_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|source| BuildError::Walk {
            path: apps_dir.to_path_buf(),
            source,
        })?;

        if entry.path().is_dir() {
            dirs.push(entry.into_path());
        }
    }

    Ok(dirs)
}

fn write_document(document: &CatalogDocument, output: &Path) -> Result<(), BuildError> {
    let json = document
        .to_json()
        .map_err(|source| BuildError::Serialize { source })?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| BuildError::Write {
            path: output.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(output, json).map_err(|source| BuildError::Write {
        path: output.to_path_buf(),
        source,
    })
}

/// Build apps.json for the marketplace rooted at `root`
pub fn build_catalog(root: &Path, config: &MarketplaceConfig) -> Result<BuildSummary, BuildError> {
    let apps_dir = root.join(&config.apps_dir);
    let app_dirs = list_app_dirs(&apps_dir)?;

    info!(
        tag = "BUILD",
        "Building {} from {}",
        config.output.display(),
        apps_dir.display()
    );

    let assembler = Assembler::for_root(config.clone(), root);
    let document = assembler.assemble_dirs(app_dirs)?;
    assembler.publish(&document, &root.join(&config.output))
}

/// Run the full pipeline without writing anything. Returns the document
/// that would have been published.
pub fn check_catalog(
    root: &Path,
    config: &MarketplaceConfig,
) -> Result<CatalogDocument, BuildError> {
    let apps_dir = root.join(&config.apps_dir);
    let app_dirs = list_app_dirs(&apps_dir)?;

    info!(tag = "BUILD", "Validating apps in {}", apps_dir.display());

    Assembler::for_root(config.clone(), root).assemble_dirs(app_dirs)
}
