//! Logo normalization
//!
//! Copies source artwork into `apps/<id>/logo.png`, scaled down to fit a
//! square and centered on a transparent canvas of exactly that size. Each
//! app is handled on its own; a bad source never stops the rest.

use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::config::LogoConfig;
use crate::error::LogoError;

/// File name written into each app directory
pub const LOGO_FILE: &str = "logo.png";

/// What happened to one mapped app
#[derive(Debug)]
pub enum LogoOutcome {
    Written { destination: PathBuf },
    MissingSource { source: PathBuf },
    MissingAppDir { app_dir: PathBuf },
    Failed(LogoError),
}

impl LogoOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, LogoOutcome::Written { .. })
    }
}

/// Per-app results of a normalizer run, keyed by app id
#[derive(Debug, Default)]
pub struct LogoReport {
    pub outcomes: BTreeMap<String, LogoOutcome>,
}

impl LogoReport {
    pub fn written(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_written()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, LogoOutcome::Failed(_)))
            .count()
    }
}

/// Normalizes every mapped source into its app directory
#[derive(Debug, Clone)]
pub struct LogoNormalizer {
    assets_root: PathBuf,
    apps_dir: PathBuf,
    config: LogoConfig,
}

impl LogoNormalizer {
    /// `assets_root` anchors relative source paths; `apps_dir` holds one
    /// directory per app id
    pub fn new(assets_root: &Path, apps_dir: &Path, config: LogoConfig) -> Self {
        Self {
            assets_root: assets_root.to_path_buf(),
            apps_dir: apps_dir.to_path_buf(),
            config,
        }
    }

    pub fn run(&self) -> LogoReport {
        let mut report = LogoReport::default();

        for (app_id, source) in &self.config.sources {
            let outcome = self.normalize_app(app_id, &self.assets_root.join(source));
            report.outcomes.insert(app_id.clone(), outcome);
        }

        info!(
            "Normalized {} of {} logos",
            report.written(),
            report.outcomes.len()
        );
        report
    }

    fn normalize_app(&self, app_id: &str, source: &Path) -> LogoOutcome {
        let app_dir = self.apps_dir.join(app_id);
        let destination = app_dir.join(LOGO_FILE);

        if !source.is_file() {
            warn!("Source not found: {}", source.display());
            return LogoOutcome::MissingSource {
                source: source.to_path_buf(),
            };
        }

        if !app_dir.is_dir() {
            warn!("App dir not found: {}", app_dir.display());
            return LogoOutcome::MissingAppDir { app_dir };
        }

        match normalize_logo(source, &destination, self.config.target_size) {
            Ok(()) => {
                let source_name = source
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                info!(tag = "OK", "{app_id}: {source_name} -> {LOGO_FILE}");
                LogoOutcome::Written { destination }
            }
            Err(e) => {
                error!("{app_id}: {e}");
                LogoOutcome::Failed(e)
            }
        }
    }
}

/// Write `source` to `destination` as a `size`x`size` PNG
pub fn normalize_logo(source: &Path, destination: &Path, size: u32) -> Result<(), LogoError> {
    let image = image::open(source).map_err(|e| LogoError::Decode {
        path: source.to_path_buf(),
        source: e,
    })?;

    let canvas = fit_to_canvas(image.into_rgba8(), size);

    canvas
        .save_with_format(destination, ImageFormat::Png)
        .map_err(|e| LogoError::Encode {
            path: destination.to_path_buf(),
            source: e,
        })
}

/// Downscale to fit within `size` and center on a transparent square
pub fn fit_to_canvas(image: RgbaImage, size: u32) -> RgbaImage {
    let size = size.max(1);
    let (width, height) = fit_within(image.width(), image.height(), size);

    let scaled = if (width, height) == image.dimensions() {
        image
    } else {
        imageops::resize(&image, width, height, FilterType::Lanczos3)
    };

    let mut canvas = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    let x = (size - width) / 2;
    let y = (size - height) / 2;
    imageops::replace(&mut canvas, &scaled, i64::from(x), i64::from(y));

    canvas
}

/// Largest aspect-preserving size within `size`x`size`. Never upscales.
fn fit_within(width: u32, height: u32, size: u32) -> (u32, u32) {
    if width <= size && height <= size {
        return (width, height);
    }

    let scale = f64::from(size) / f64::from(width.max(height));
    let fit = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, size);

    (fit(width), fit(height))
}
