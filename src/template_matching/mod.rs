/// Template matching module for locating the reference icon in screenshots
///
/// This module provides:
/// - Loading of the single reference icon (missing file => OCR-only mode)
/// - Scale-sweep zero-mean normalized cross-correlation
/// - Threshold-gated anchors with sub-threshold diagnostics
pub mod matcher;
pub mod reference;
pub mod types;

pub use matcher::{DEFAULT_SCALE_FACTORS, TemplateMatcher, WIDE_SCALE_FACTORS, correlation_surface};
pub use reference::ReferenceTemplate;
pub use types::MatchResult;
