//! Text candidate extraction
//!
//! Preprocesses the frame for caption-sized text and hands it to an OCR
//! engine, yielding words with bounding boxes and confidences.

pub mod engine;
pub mod error;
pub mod preprocess;
pub mod types;

pub use engine::{OcrEngine, TesseractCli, parse_tsv};
pub use error::OcrError;
pub use preprocess::{adaptive_equalize, binarize_otsu, prepare_for_ocr};
pub use types::{BoundingBox, OcrToken, PageSegMode};

use image::RgbImage;

/// Frame → preprocessed image → OCR words
pub struct TextExtractor {
    engine: Box<dyn OcrEngine>,
    mode: PageSegMode,
}

impl TextExtractor {
    pub fn new(engine: Box<dyn OcrEngine>, mode: PageSegMode) -> Self {
        Self { engine, mode }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    pub fn extract(&self, frame: &RgbImage) -> Result<Vec<OcrToken>, OcrError> {
        let prepared = prepare_for_ocr(frame);
        let tokens = self.engine.recognize(&prepared, self.mode)?;
        log::debug!(
            "🔤 {} returned {} tokens for {}x{} frame",
            self.engine.name(),
            tokens.len(),
            frame.width(),
            frame.height()
        );
        Ok(tokens)
    }
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self::new(Box::new(TesseractCli::default()), PageSegMode::default())
    }
}
