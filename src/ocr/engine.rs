use super::error::OcrError;
use super::types::{BoundingBox, OcrToken, PageSegMode};
use image::{GrayImage, ImageFormat};
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

/// Every OCR backend implements this.
///
/// An engine that cannot be started must return
/// [`OcrError::EngineUnavailable`]; `Ok(vec![])` means it ran and read nothing.
pub trait OcrEngine {
    fn name(&self) -> &str;
    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> Result<Vec<OcrToken>, OcrError>;
}

/// Runs the `tesseract` executable and reads its TSV word table
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: String,
}

impl TesseractCli {
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage, mode: PageSegMode) -> Result<Vec<OcrToken>, OcrError> {
        let input = NamedTempFile::with_suffix(".png")?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let output = Command::new(&self.program)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .arg("--psm")
            .arg(mode.as_arg())
            .arg("tsv")
            .output()
            .map_err(|source| OcrError::EngineUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let tokens = parse_tsv(&String::from_utf8_lossy(&output.stdout))?;
        log::debug!("📝 Tesseract read {} words (psm {})", tokens.len(), mode.as_arg());
        Ok(tokens)
    }
}

/// Parses Tesseract TSV output into word tokens.
///
/// TSV fields: level, page_num, block_num, par_num, line_num, word_num,
/// left, top, width, height, conf, text. Only level 5 (word) rows with
/// non-empty text are kept; confidences are clamped to 0-100.
pub fn parse_tsv(tsv: &str) -> Result<Vec<OcrToken>, OcrError> {
    let mut lines = tsv.lines();
    match lines.next() {
        None => return Ok(Vec::new()),
        Some(header) if header.starts_with("level") => {}
        Some(header) => {
            return Err(OcrError::MalformedOutput {
                description: format!("unexpected TSV header: {header:?}"),
            });
        }
    }

    let mut tokens = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 12 {
            continue;
        }

        let level: i32 = fields[0].parse().unwrap_or(-1);
        if level != 5 {
            continue;
        }

        let text = fields[11].trim();
        if text.is_empty() {
            continue;
        }

        let (Ok(left), Ok(top), Ok(width), Ok(height)) = (
            fields[6].parse::<i32>(),
            fields[7].parse::<i32>(),
            fields[8].parse::<i32>(),
            fields[9].parse::<i32>(),
        ) else {
            log::debug!("Skipping TSV row with bad geometry: {line:?}");
            continue;
        };
        let confidence: f32 = fields[10].parse().unwrap_or(0.0);

        tokens.push(OcrToken::new(
            text,
            BoundingBox {
                left,
                top,
                width,
                height,
            },
            confidence.clamp(0.0, 100.0),
        ));
    }

    Ok(tokens)
}
