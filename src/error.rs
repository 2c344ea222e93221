use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for icon localization.
pub type LocatorResult<T> = Result<T, LocatorError>;

/// The error type for setup and I/O failures around detection.
///
/// Detection misses are not errors: a sub-threshold or out-of-bounds result
/// comes back as an empty [`crate::detection::Detection`].
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("Reference template at {path:?} exists but could not be decoded: {source}")]
    TemplateLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to read config file {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid detector configuration: {description}")]
    InvalidConfig { description: String },

    #[error("Screen capture failed: {description}")]
    CaptureFailed { description: String },

    #[error("Failed to write image {path:?}: {source}")]
    ImageWrite {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error(
        "Region [{x},{y},{width},{height}] is outside the {frame_width}x{frame_height} frame"
    )]
    RegionOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    },
}

impl LocatorError {
    /// Setup defects abort construction; everything else is absorbed per attempt.
    pub fn is_setup_defect(&self) -> bool {
        matches!(
            self,
            LocatorError::TemplateLoad { .. }
                | LocatorError::ConfigRead { .. }
                | LocatorError::ConfigParse { .. }
                | LocatorError::InvalidConfig { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_defect_classification() {
        let err = LocatorError::InvalidConfig {
            description: "threshold".to_string(),
        };
        assert!(err.is_setup_defect());

        let err = LocatorError::CaptureFailed {
            description: "display gone".to_string(),
        };
        assert!(!err.is_setup_defect());
    }

    #[test]
    fn test_region_error_message() {
        let err = LocatorError::RegionOutOfBounds {
            x: 10,
            y: 20,
            width: 50,
            height: 60,
            frame_width: 40,
            frame_height: 40,
        };
        assert_eq!(
            err.to_string(),
            "Region [10,20,50,60] is outside the 40x40 frame"
        );
    }
}
