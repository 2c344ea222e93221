pub mod annotate;
pub mod capture;
pub mod detection;
pub mod error;
pub mod ocr;
pub mod template_matching;

#[cfg(test)]
mod test_support;

pub use capture::{ImageFileCapture, ScreenCapture};
pub use detection::{Detection, DetectionMethod, DetectorConfig, IconDetector, IconLocation};
pub use error::{LocatorError, LocatorResult};
