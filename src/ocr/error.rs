use std::path::PathBuf;
use thiserror::Error;

/// Failures of the text extraction path.
///
/// None of these abort detection: the orchestrator logs them and treats the
/// attempt as having zero OCR candidates.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine {program:?} could not be started: {source}")]
    EngineUnavailable {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("OCR engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("OCR engine produced unreadable output: {description}")]
    MalformedOutput { description: String },

    #[error("OCR temp file I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to encode image for OCR: {source}")]
    ImageEncode {
        #[from]
        source: image::ImageError,
    },
}

impl OcrError {
    /// The backend is missing entirely, as opposed to a failed run
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, OcrError::EngineUnavailable { .. })
    }
}
