use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    TemplateMatch,
    Ocr,
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetectionMethod::TemplateMatch => write!(f, "template matching"),
            DetectionMethod::Ocr => write!(f, "OCR"),
        }
    }
}

/// Outcome of one detection pass: `(x, y, confidence)` where the
/// coordinates are absent on a miss and the confidence is then diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub confidence: f32,
    pub method: Option<DetectionMethod>,
    /// On-screen size of the matched icon, known only for template matches
    pub matched_size: Option<(u32, u32)>,
}

impl Detection {
    pub fn found(x: i32, y: i32, confidence: f32, method: DetectionMethod) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            confidence,
            method: Some(method),
            matched_size: None,
        }
    }

    pub fn with_matched_size(mut self, width: u32, height: u32) -> Self {
        self.matched_size = Some((width, height));
        self
    }

    pub fn not_found(confidence: f32) -> Self {
        Self {
            x: None,
            y: None,
            confidence,
            method: None,
            matched_size: None,
        }
    }

    pub fn position(&self) -> Option<(i32, i32)> {
        self.x.zip(self.y)
    }

    pub fn is_found(&self) -> bool {
        self.position().is_some()
    }
}

/// A detection that passed the validation gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconLocation {
    pub x: i32,
    pub y: i32,
    pub confidence: f32,
    pub method: DetectionMethod,
    pub matched_size: Option<(u32, u32)>,
}
