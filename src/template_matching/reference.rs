//! Reference icon storage

use crate::error::{LocatorError, LocatorResult};
use image::GrayImage;
use std::path::{Path, PathBuf};

/// The single reference icon, in the grayscale form used for matching.
///
/// Immutable after load; each detector owns its own copy.
#[derive(Debug, Clone)]
pub struct ReferenceTemplate {
    pixels: GrayImage,
    source: Option<PathBuf>,
}

impl ReferenceTemplate {
    /// Load the reference bitmap at `path`.
    ///
    /// A missing file is not an error: it returns `Ok(None)` and the detector
    /// runs OCR-only. A file that exists but fails to decode is a setup
    /// defect and returns [`LocatorError::TemplateLoad`].
    pub fn load(path: impl AsRef<Path>) -> LocatorResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("⚠️ Template not found at {}", path.display());
            return Ok(None);
        }

        let image = image::open(path).map_err(|source| LocatorError::TemplateLoad {
            path: path.to_path_buf(),
            source,
        })?;
        let pixels = image.to_luma8();
        log::info!(
            "✅ Template loaded from {} ({}x{})",
            path.display(),
            pixels.width(),
            pixels.height()
        );

        Ok(Some(Self {
            pixels,
            source: Some(path.to_path_buf()),
        }))
    }

    /// Wrap an in-memory grayscale image
    pub fn from_gray(pixels: GrayImage) -> Self {
        Self {
            pixels,
            source: None,
        }
    }

    pub fn pixels(&self) -> &GrayImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }
}
