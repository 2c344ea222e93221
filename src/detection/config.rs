//! Configuration for icon detection

use crate::error::{LocatorError, LocatorResult};
use crate::ocr::PageSegMode;
use crate::template_matching::{DEFAULT_SCALE_FACTORS, WIDE_SCALE_FACTORS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Confidence threshold for template matches and final validation (0.0 to 1.0)
    pub confidence_threshold: f32,
    /// Scale factors tried by the template matcher, in order
    pub scale_factors: Vec<f32>,
    /// Detection attempts made by `locate`
    pub max_attempts: u32,
    /// Pause between attempts
    pub retry_delay_ms: u64,
    /// Accepted coordinate range is 0..=screen_width, 0..=screen_height
    pub screen_width: u32,
    pub screen_height: u32,
    /// Fall back to OCR when the template is missing or below threshold
    pub use_ocr_fallback: bool,
    /// Tesseract page segmentation mode for caption text
    pub page_seg_mode: PageSegMode,
    /// Reference icon bitmap; missing file means OCR-only
    pub template_path: PathBuf,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            scale_factors: DEFAULT_SCALE_FACTORS.to_vec(),
            max_attempts: 3,
            retry_delay_ms: 1000,
            screen_width: 1920,
            screen_height: 1080,
            use_ocr_fallback: true,
            page_seg_mode: PageSegMode::SingleBlock,
            template_path: PathBuf::from("assets/notepad_icon.png"),
        }
    }
}

impl DetectorConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Load a JSON config file; absent fields take their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> LocatorResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| LocatorError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&raw).map_err(|source| LocatorError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> LocatorResult<()> {
        let invalid = |description: String| Err(LocatorError::InvalidConfig { description });

        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return invalid(format!(
                "confidence_threshold {} is outside 0.0..=1.0",
                self.confidence_threshold
            ));
        }
        if self.scale_factors.is_empty() {
            return invalid("scale_factors is empty".to_string());
        }
        if let Some(bad) = self.scale_factors.iter().find(|s| !(s.is_finite() && **s > 0.0)) {
            return invalid(format!("scale factor {bad} must be positive"));
        }
        if self.max_attempts == 0 {
            return invalid("max_attempts must be at least 1".to_string());
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return invalid(format!(
                "screen bounds {}x{} must be non-zero",
                self.screen_width, self.screen_height
            ));
        }
        Ok(())
    }
}

/// Twelve-step sweep from 0.5x to 2.5x for unusual icon sizes
pub fn create_wide_scale_config() -> DetectorConfig {
    DetectorConfig {
        scale_factors: WIDE_SCALE_FACTORS.to_vec(),
        ..DetectorConfig::default()
    }
}

/// Template matching only; a miss is final for the attempt
pub fn create_template_only_config() -> DetectorConfig {
    DetectorConfig {
        use_ocr_fallback: false,
        ..DetectorConfig::default()
    }
}
