//! Logo lookup for app directories

use std::path::Path;
use tracing::warn;

use crate::config::MarketplaceConfig;

/// Logo file extensions, in order of preference
pub const LOGO_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "svg", "webp"];

/// Find `logo.<ext>` in an app directory. Returns the file name.
pub fn find_logo(app_dir: &Path) -> Option<String> {
    LOGO_EXTENSIONS
        .iter()
        .map(|ext| format!("logo.{ext}"))
        .find(|name| app_dir.join(name).is_file())
}

/// Absolute logo URL for an app, falling back to the placeholder
pub fn resolve_logo_url(app_dir: &Path, slug: &str, config: &MarketplaceConfig) -> String {
    match find_logo(app_dir) {
        Some(file_name) => config.logo_url(slug, &file_name),
        None => {
            warn!("No logo found for {slug}");
            config.placeholder_logo_url()
        }
    }
}
