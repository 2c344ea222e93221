//! Screen capture providers
//!
//! Capturing the live desktop is an OS concern outside this crate; detection
//! only needs something that hands back a fresh RGB frame per attempt.

use crate::error::{LocatorError, LocatorResult};
use image::RgbImage;
use std::path::{Path, PathBuf};

/// Supplies one frame per detection attempt.
pub trait ScreenCapture {
    fn capture_frame(&self) -> LocatorResult<RgbImage>;
}

impl<F> ScreenCapture for F
where
    F: Fn() -> LocatorResult<RgbImage>,
{
    fn capture_frame(&self) -> LocatorResult<RgbImage> {
        self()
    }
}

/// Reads the frame from an image file on every call, so an external
/// screenshot tool can keep overwriting the same path between attempts.
#[derive(Debug, Clone)]
pub struct ImageFileCapture {
    path: PathBuf,
}

impl ImageFileCapture {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScreenCapture for ImageFileCapture {
    fn capture_frame(&self) -> LocatorResult<RgbImage> {
        let frame = image::open(&self.path).map_err(|e| LocatorError::CaptureFailed {
            description: format!("Failed to load screenshot {}: {e}", self.path.display()),
        })?;
        log::debug!(
            "📸 Captured {}x{} frame from {}",
            frame.width(),
            frame.height(),
            self.path.display()
        );
        Ok(frame.to_rgb8())
    }
}
