//! Error types for catalog builds and logo normalization

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a catalog build
#[derive(Error, Debug)]
pub enum BuildError {
    /// The descriptor root does not exist
    #[error("Apps directory not found at {}", .path.display())]
    AppsDirNotFound { path: PathBuf },

    /// One or more descriptors failed validation. Carries every collected message.
    #[error("Validation errors found:\n{}", format_errors(.errors))]
    Validation { errors: Vec<String> },

    /// Failed to walk the descriptor tree
    #[error("Failed to list apps directory {}", .path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Failed to write the catalog document
    #[error("Failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize the catalog document
    #[error("Failed to serialize catalog document")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },
}

impl BuildError {
    /// Collected validation messages, empty for any other failure
    pub fn validation_errors(&self) -> &[String] {
        match self {
            BuildError::Validation { errors } => errors,
            _ => &[],
        }
    }
}

fn format_errors(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("   - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Failure to normalize a single logo
#[derive(Error, Debug)]
pub enum LogoError {
    #[error("Failed to decode {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to save {}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
