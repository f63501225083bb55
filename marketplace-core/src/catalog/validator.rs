//! Descriptor validation
//!
//! Every check runs regardless of earlier failures so one build reports all
//! problems with a descriptor at once.

use chrono::NaiveDate;
use serde_json::Value;

use super::descriptor::{Descriptor, DATE_FORMAT};
use crate::config::{ClassificationMode, MarketplaceConfig};

/// Validate one descriptor. An empty result means the descriptor is valid.
///
/// `slug` is the name of the directory the descriptor was read from.
pub fn validate_descriptor(
    descriptor: &Descriptor,
    slug: &str,
    config: &MarketplaceConfig,
) -> Vec<String> {
    let mut errors = Vec::new();

    for field in config.required_fields() {
        if !descriptor.contains(field) {
            errors.push(format!("Missing required field: {field}"));
        }
    }

    if let Some(category) = descriptor.get("category") {
        if !category.is_array() {
            errors.push("'category' must be a list".to_string());
        }
    }

    match config.classification {
        ClassificationMode::Pinned => check_date_added(descriptor, &mut errors),
        ClassificationMode::Rank => {
            check_rank(descriptor, config.featured_threshold, &mut errors)
        }
    }

    if let Some(links) = descriptor.get("links") {
        match links.as_object() {
            None => errors.push("'links' must be an object".to_string()),
            Some(links) if !links.contains_key("app") => {
                errors.push("'links.app' is required".to_string())
            }
            Some(_) => {}
        }
    }

    if config.require_id_matches_slug {
        if let Some(id) = descriptor.get("id") {
            if id.as_str() != Some(slug) {
                errors.push(format!("'id' must match directory name '{slug}'"));
            }
        }
    }

    errors
}

fn check_date_added(descriptor: &Descriptor, errors: &mut Vec<String>) {
    let Some(date) = descriptor.get("date_added") else {
        return;
    };

    let well_formed = date
        .as_str()
        .is_some_and(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).is_ok());

    if !well_formed {
        errors.push("'date_added' must be in YYYY-MM-DD format".to_string());
    }
}

fn check_rank(descriptor: &Descriptor, threshold: i64, errors: &mut Vec<String>) {
    let Some(rank) = descriptor.get("rank") else {
        return;
    };

    let within = match rank {
        Value::Number(n) if n.is_i64() => n.as_i64().is_some_and(|r| r <= threshold),
        // Too large for i64
        Value::Number(n) if n.is_u64() => false,
        _ => {
            errors.push("'rank' must be an integer".to_string());
            return;
        }
    };

    if !within {
        errors.push(format!(
            "'rank' must be <= {threshold}, omit rank for non-featured apps"
        ));
    }
}
