//! Marketplace Catalog - builds apps.json from per-app descriptors
//!
//! # Overview
//!
//! Each app lives in its own directory under `apps/`. The directory name is
//! the app's slug. The build:
//! - Validates every `app.json` and collects all errors before deciding
//! - Resolves a logo URL (local `logo.*` or the placeholder)
//! - Classifies the app as pinned or featured, depending on the deployment
//! - Sorts the accepted apps and writes a single catalog document
//!
//! Any validation error anywhere aborts the build and nothing is written.
//!
//! # Layout
//!
//! ```text
//! marketplace/
//!     ├── marketplace.yaml     ← Optional build configuration
//!     ├── pinned.json          ← Pinned ids (pinned deployments only)
//!     ├── apps/
//!     │   └── <slug>/
//!     │       ├── app.json     ← Descriptor
//!     │       └── logo.png     ← Optional logo
//!     └── apps.json            ← Generated catalog
//! ```

mod assembler;
mod classifier;
mod descriptor;
mod document;
mod logo;
mod validator;

pub use assembler::{build_catalog, check_catalog, list_app_dirs, Assembler, BuildSummary};
pub use classifier::{
    classifier_for, load_pinned_ids, Classifier, PinnedList, PinnedListFile, RankThreshold,
};
pub use descriptor::Descriptor;
pub use document::{CatalogDocument, CatalogEntry};
pub use logo::{find_logo, resolve_logo_url, LOGO_EXTENSIONS};
pub use validator::validate_descriptor;
