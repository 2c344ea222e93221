use serde::{Deserialize, Serialize};

/// Pixel rectangle of a recognized word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BoundingBox {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

/// One word reported by the OCR engine
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OcrToken {
    pub text: String,
    pub bounding_box: BoundingBox,
    /// Engine confidence, 0.0-100.0
    pub raw_confidence: f32,
}

impl OcrToken {
    pub fn new(text: impl Into<String>, bounding_box: BoundingBox, raw_confidence: f32) -> Self {
        Self {
            text: text.into(),
            bounding_box,
            raw_confidence,
        }
    }
}

/// Tesseract page segmentation modes used for desktop captions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegMode {
    /// Fully automatic layout analysis (PSM 3)
    Auto,
    /// One uniform block of text (PSM 6)
    #[default]
    SingleBlock,
    /// As much text as possible in no particular order (PSM 11)
    SparseText,
}

impl PageSegMode {
    pub fn as_arg(self) -> &'static str {
        match self {
            PageSegMode::Auto => "3",
            PageSegMode::SingleBlock => "6",
            PageSegMode::SparseText => "11",
        }
    }
}
