//! Catalog document (apps.json) and its entries

use chrono::{NaiveDate, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::cmp::Reverse;

use super::descriptor::Descriptor;
use crate::config::{Category, ClassificationMode, CATALOG_VERSION};

/// An accepted descriptor with its derived fields applied
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    slug: String,
    flagged: bool,
    descriptor: Descriptor,
}

impl CatalogEntry {
    /// Attach `logo` and the mode's flag field to a validated descriptor
    pub fn new(
        slug: &str,
        mut descriptor: Descriptor,
        logo_url: String,
        mode: ClassificationMode,
        flagged: bool,
    ) -> Self {
        descriptor.insert("logo", Value::String(logo_url));
        descriptor.insert(mode.flag_field(), Value::Bool(flagged));

        Self {
            slug: slug.to_string(),
            flagged,
            descriptor,
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Pinned or featured, depending on the deployment
    pub fn is_flagged(&self) -> bool {
        self.flagged
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn logo(&self) -> Option<&str> {
        self.descriptor.get("logo").and_then(Value::as_str)
    }

    fn name_key(&self) -> String {
        self.descriptor.name().unwrap_or_default().to_lowercase()
    }

    /// Flagged first, then the mode's primary key, then lowercase name
    fn sort_key(&self, mode: ClassificationMode) -> (bool, SortPrimary, String) {
        let primary = match mode {
            ClassificationMode::Pinned => {
                // NaiveDate defaults to 1970-01-01
                let date = self.descriptor.date_added().unwrap_or_default();
                SortPrimary::Newest(Reverse(date))
            }
            ClassificationMode::Rank => {
                SortPrimary::Rank(self.descriptor.rank().unwrap_or(i64::MAX))
            }
        };

        (!self.flagged, primary, self.name_key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SortPrimary {
    Newest(Reverse<NaiveDate>),
    Rank(i64),
}

impl Serialize for CatalogEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.descriptor.serialize(serializer)
    }
}

/// The published catalog
#[derive(Debug, Clone, Serialize)]
pub struct CatalogDocument {
    pub version: String,
    pub generated: String,
    pub apps: Vec<CatalogEntry>,
    pub categories: Vec<Category>,
}

impl CatalogDocument {
    /// Sort entries and stamp the document with the current UTC time
    pub fn new(
        mut apps: Vec<CatalogEntry>,
        categories: Vec<Category>,
        mode: ClassificationMode,
    ) -> Self {
        sort_entries(&mut apps, mode);

        Self {
            version: CATALOG_VERSION.to_string(),
            generated: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false),
            apps,
            categories,
        }
    }

    /// Number of pinned or featured entries
    pub fn flagged_count(&self) -> usize {
        self.apps.iter().filter(|a| a.is_flagged()).count()
    }

    /// Pretty JSON, two-space indent, non-ASCII kept literal
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Stable sort by the mode's composite key
pub fn sort_entries(apps: &mut [CatalogEntry], mode: ClassificationMode) {
    apps.sort_by_cached_key(|entry| entry.sort_key(mode));
}
