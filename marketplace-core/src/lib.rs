//! Lemonade Marketplace catalog builder
//!
//! Turns a directory of per-app `app.json` descriptors into the published
//! `apps.json` catalog, and normalizes partner logos into per-app assets.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logos;

pub use config::{Category, ClassificationMode, LogoConfig, MarketplaceConfig};
pub use error::{BuildError, LogoError};
