//! Icon detection orchestrator

use super::{
    config::DetectorConfig,
    retry::{Sleeper, ThreadSleeper, retry_detection},
    similarity::TARGET_LABEL,
    strategy::{DetectionStrategy, OcrStrategy, TemplateStrategy},
    types::{Detection, IconLocation},
};
use crate::capture::ScreenCapture;
use crate::error::LocatorResult;
use crate::ocr::{TesseractCli, TextExtractor};
use crate::template_matching::{ReferenceTemplate, TemplateMatcher};
use image::RgbImage;
use std::time::Duration;

/// Finds the target icon on screen: template matching first, OCR caption
/// fallback second, wrapped in bounded retry and a validation gate.
pub struct IconDetector {
    config: DetectorConfig,
    strategies: Vec<Box<dyn DetectionStrategy>>,
    capture: Box<dyn ScreenCapture>,
    sleeper: Box<dyn Sleeper>,
}

impl IconDetector {
    /// Build a detector with the Tesseract CLI as OCR engine.
    ///
    /// Fails only on setup defects: an invalid config or a reference file
    /// that exists but cannot be decoded.
    pub fn new(config: DetectorConfig, capture: Box<dyn ScreenCapture>) -> LocatorResult<Self> {
        config.validate()?;
        let template = ReferenceTemplate::load(&config.template_path)?;
        let extractor = TextExtractor::new(Box::new(TesseractCli::default()), config.page_seg_mode);
        Ok(Self::from_parts(config, template, extractor, capture))
    }

    /// Assemble a detector from already-loaded parts
    pub fn from_parts(
        config: DetectorConfig,
        template: Option<ReferenceTemplate>,
        extractor: TextExtractor,
        capture: Box<dyn ScreenCapture>,
    ) -> Self {
        let mut strategies: Vec<Box<dyn DetectionStrategy>> = Vec::new();
        match template {
            Some(template) => {
                let matcher =
                    TemplateMatcher::new(config.confidence_threshold, config.scale_factors.clone());
                strategies.push(Box::new(TemplateStrategy::new(template, matcher)));
            }
            None => log::info!("No template available. Template matching disabled, OCR only."),
        }
        strategies.push(Box::new(OcrStrategy::new(extractor, TARGET_LABEL)));

        Self {
            config,
            strategies,
            capture,
            sleeper: Box::new(ThreadSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Box<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn has_template(&self) -> bool {
        self.strategies.iter().any(|s| !s.is_fallback())
    }

    /// One full detection pass over `frame`, or over a freshly captured
    /// frame when none is given.
    ///
    /// Strategies run in order and the first acceptance wins. A miss reports
    /// the best confidence any strategy saw; a capture failure reports 0.
    pub fn detect_icon_position(&self, frame: Option<&RgbImage>, use_ocr_fallback: bool) -> Detection {
        let captured;
        let frame = match frame {
            Some(frame) => frame,
            None => match self.capture.capture_frame() {
                Ok(frame) => {
                    captured = frame;
                    &captured
                }
                Err(e) => {
                    log::warn!("⚠️ {}", e);
                    return Detection::not_found(0.0);
                }
            },
        };

        let mut best_confidence = 0.0f32;
        for strategy in &self.strategies {
            if strategy.is_fallback() && !use_ocr_fallback {
                log::warn!("⚠️ {} fallback is disabled, skipping", strategy.method());
                continue;
            }

            let detection = strategy.detect(frame);
            if detection.is_found() {
                return detection;
            }
            best_confidence = best_confidence.max(detection.confidence);
        }

        log::warn!("⚠️ Icon not detected (best confidence {:.2})", best_confidence);
        Detection::not_found(best_confidence)
    }

    /// Repeat full capture-and-detect cycles until one finds the icon
    pub fn detect_with_retry(&self, max_attempts: u32, retry_delay: Duration) -> Detection {
        retry_detection(max_attempts, retry_delay, self.sleeper.as_ref(), |_| {
            self.detect_icon_position(None, self.config.use_ocr_fallback)
        })
    }

    /// Accept only present coordinates inside the screen bounds with
    /// confidence at or above the threshold
    pub fn validate_icon_detection(&self, x: Option<i32>, y: Option<i32>, confidence: f32) -> bool {
        let (Some(x), Some(y)) = (x, y) else {
            return false;
        };

        if confidence.is_nan() || confidence < self.config.confidence_threshold {
            log::debug!(
                "Detection confidence {:.2} below threshold {:.2}",
                confidence,
                self.config.confidence_threshold
            );
            return false;
        }

        let in_bounds = (0..=self.config.screen_width as i64).contains(&(x as i64))
            && (0..=self.config.screen_height as i64).contains(&(y as i64));
        if !in_bounds {
            log::warn!(
                "⚠️ Detected coordinates ({}, {}) are out of bounds {}x{}",
                x,
                y,
                self.config.screen_width,
                self.config.screen_height
            );
        }
        in_bounds
    }

    /// Retry with the configured attempts and delay, then validate
    pub fn locate(&self) -> Option<IconLocation> {
        let detection = self.detect_with_retry(self.config.max_attempts, self.config.retry_delay());
        if !self.validate_icon_detection(detection.x, detection.y, detection.confidence) {
            return None;
        }

        let (x, y) = detection.position()?;
        let method = detection.method?;
        Some(IconLocation {
            x,
            y,
            confidence: detection.confidence,
            method,
            matched_size: detection.matched_size,
        })
    }
}
