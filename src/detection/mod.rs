//! Icon detection module
//!
//! Ties the template matcher and the OCR caption reader into one pipeline:
//! ordered strategies, bounded retry and a final validation gate.

pub mod config;
pub mod detector;
pub mod ranker;
pub mod retry;
pub mod similarity;
pub mod strategy;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main types and functions
pub use config::{DetectorConfig, create_template_only_config, create_wide_scale_config};
pub use detector::IconDetector;
pub use ranker::{Candidate, OCR_CONFIDENCE_CAP, collect_candidates, select_best};
pub use retry::{Sleeper, ThreadSleeper, retry_detection};
pub use similarity::{TARGET_LABEL, similarity};
pub use strategy::{DetectionStrategy, OcrStrategy, TemplateStrategy};
pub use types::{Detection, DetectionMethod, IconLocation};
