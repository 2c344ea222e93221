//! Detection strategies, tried in order until one accepts

use super::ranker::{collect_candidates, select_best};
use super::types::{Detection, DetectionMethod};
use crate::ocr::TextExtractor;
use crate::template_matching::{ReferenceTemplate, TemplateMatcher};
use image::{RgbImage, imageops};

/// One way of finding the icon in a frame.
///
/// `detect` returns a found [`Detection`] only when the strategy accepts its
/// own result; a miss still carries its best confidence for diagnostics.
pub trait DetectionStrategy {
    fn method(&self) -> DetectionMethod;

    /// Fallback strategies are skipped when the caller disables fallback
    fn is_fallback(&self) -> bool {
        false
    }

    fn detect(&self, frame: &RgbImage) -> Detection;
}

/// Scale-sweep match of the reference icon; accepts at the matcher threshold
pub struct TemplateStrategy {
    template: ReferenceTemplate,
    matcher: TemplateMatcher,
}

impl TemplateStrategy {
    pub fn new(template: ReferenceTemplate, matcher: TemplateMatcher) -> Self {
        Self { template, matcher }
    }
}

impl DetectionStrategy for TemplateStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::TemplateMatch
    }

    fn detect(&self, frame: &RgbImage) -> Detection {
        log::info!(
            "Attempting template matching detection over {} scales...",
            self.matcher.scale_factors().len()
        );
        let gray = imageops::grayscale(frame);
        let result = self.matcher.find(&gray, &self.template);
        log::debug!("Template sweep result: {}", result);

        match result.anchor {
            Some((x, y)) => {
                log::info!(
                    "✅ Icon detected via template matching at ({}, {}) with confidence {:.2} (scale {:.2})",
                    x,
                    y,
                    result.confidence,
                    result.scale
                );
                let (width, height) = result.matched_size;
                Detection::found(x, y, result.confidence, DetectionMethod::TemplateMatch)
                    .with_matched_size(width, height)
            }
            None => {
                log::warn!(
                    "⚠️ Template matching failed. Confidence: {:.2} < threshold: {:.2}",
                    result.confidence,
                    self.matcher.threshold()
                );
                Detection::not_found(result.confidence)
            }
        }
    }
}

/// Caption OCR; accepts whenever any token mentions the target label
pub struct OcrStrategy {
    extractor: TextExtractor,
    target: String,
}

impl OcrStrategy {
    pub fn new(extractor: TextExtractor, target: impl Into<String>) -> Self {
        Self {
            extractor,
            target: target.into(),
        }
    }
}

impl DetectionStrategy for OcrStrategy {
    fn method(&self) -> DetectionMethod {
        DetectionMethod::Ocr
    }

    fn is_fallback(&self) -> bool {
        true
    }

    fn detect(&self, frame: &RgbImage) -> Detection {
        let tokens = match self.extractor.extract(frame) {
            Ok(tokens) => tokens,
            Err(e) if e.is_engine_unavailable() => {
                log::error!("❌ OCR engine {} not available: {}", self.extractor.engine_name(), e);
                return Detection::not_found(0.0);
            }
            Err(e) => {
                log::error!("❌ OCR detection failed: {}", e);
                return Detection::not_found(0.0);
            }
        };

        let candidates = collect_candidates(&tokens, &self.target);
        let Some(best) = select_best(&candidates) else {
            log::warn!(
                "⚠️ OCR did not find any text containing '{}' ({} tokens read)",
                self.target,
                tokens.len()
            );
            return Detection::not_found(0.0);
        };

        let confidence = best.reported_confidence();
        log::info!(
            "✅ Icon detected via OCR: '{}' at ({}, {}) - similarity: {:.2}, OCR conf: {:.2}, score: {:.2}",
            best.source_text,
            best.anchor_x,
            best.anchor_y,
            best.similarity,
            best.ocr_confidence,
            confidence
        );
        Detection::found(best.anchor_x, best.anchor_y, confidence, DetectionMethod::Ocr)
    }
}
