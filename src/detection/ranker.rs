//! OCR candidate scoring and selection

use super::similarity::similarity;
use crate::ocr::OcrToken;

/// Similarity dominates: OCR confidence is unreliable on small UI fonts
const SIMILARITY_WEIGHT: f32 = 0.7;
const OCR_CONFIDENCE_WEIGHT: f32 = 0.3;
/// The OCR path never claims full certainty
pub const OCR_CONFIDENCE_CAP: f32 = 0.9;
/// Icons render above their captions, roughly this much taller than the text
const ICON_HEIGHT_FACTOR: f64 = 1.5;
const MIN_ICON_HEIGHT: f64 = 40.0;

/// A caption token that could be the icon label
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub anchor_x: i32,
    pub anchor_y: i32,
    pub similarity: f32,
    pub ocr_confidence: f32,
    pub combined_score: f32,
    pub source_text: String,
}

impl Candidate {
    /// Score a token against `target`; `None` when the token is blank or does
    /// not mention the target at all.
    pub fn from_token(token: &OcrToken, target: &str) -> Option<Self> {
        let text = token.text.trim();
        if text.is_empty() {
            return None;
        }

        let similarity = similarity(text, target);
        if similarity <= 0.0 {
            return None;
        }

        let bbox = &token.bounding_box;
        let anchor_x = bbox.left + bbox.width / 2;
        let icon_height = (bbox.height as f64 * ICON_HEIGHT_FACTOR).max(MIN_ICON_HEIGHT);
        let anchor_y = (bbox.top as f64 - icon_height / 2.0) as i32;

        let ocr_confidence = token.raw_confidence.clamp(0.0, 100.0) / 100.0;
        let combined_score =
            similarity * SIMILARITY_WEIGHT + ocr_confidence * OCR_CONFIDENCE_WEIGHT;

        Some(Self {
            anchor_x,
            anchor_y,
            similarity,
            ocr_confidence,
            combined_score,
            source_text: text.to_string(),
        })
    }

    /// Combined score capped for reporting
    pub fn reported_confidence(&self) -> f32 {
        self.combined_score.min(OCR_CONFIDENCE_CAP)
    }
}

/// All qualifying candidates, in token order
pub fn collect_candidates(tokens: &[OcrToken], target: &str) -> Vec<Candidate> {
    tokens
        .iter()
        .filter_map(|token| Candidate::from_token(token, target))
        .inspect(|c| {
            log::debug!(
                "Found candidate '{}' at ({}, {}) - similarity: {:.2}, OCR conf: {:.2}",
                c.source_text,
                c.anchor_x,
                c.anchor_y,
                c.similarity,
                c.ocr_confidence
            )
        })
        .collect()
}

/// Highest combined score; ties go to the first encountered
pub fn select_best(candidates: &[Candidate]) -> Option<&Candidate> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        if best.is_none_or(|b| candidate.combined_score > b.combined_score) {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::similarity::TARGET_LABEL;
    use crate::ocr::BoundingBox;

    fn token(text: &str, left: i32, top: i32, width: i32, height: i32, conf: f32) -> OcrToken {
        OcrToken::new(
            text,
            BoundingBox {
                left,
                top,
                width,
                height,
            },
            conf,
        )
    }

    fn scored(text: &str, combined: f32) -> Candidate {
        Candidate {
            anchor_x: 0,
            anchor_y: 0,
            similarity: 1.0,
            ocr_confidence: 0.0,
            combined_score: combined,
            source_text: text.to_string(),
        }
    }

    #[test]
    fn test_anchor_sits_above_caption() {
        // Short text: icon height floors at 40px
        let c = Candidate::from_token(&token("Notepad", 100, 300, 61, 14, 90.0), TARGET_LABEL)
            .unwrap();
        assert_eq!(c.anchor_x, 130);
        assert_eq!(c.anchor_y, 280);

        // Tall text: 1.5x height wins (30 * 1.5 = 45, half is 22.5)
        let c = Candidate::from_token(&token("Notepad", 100, 300, 60, 30, 90.0), TARGET_LABEL)
            .unwrap();
        assert_eq!(c.anchor_y, 277);
    }

    #[test]
    fn test_combined_score_weights() {
        let c = Candidate::from_token(&token("Notepad", 0, 100, 10, 10, 50.0), TARGET_LABEL)
            .unwrap();
        assert!((c.combined_score - 0.85).abs() < 1e-6);
        assert!((c.reported_confidence() - 0.85).abs() < 1e-6);

        let c = Candidate::from_token(&token("Notepad", 0, 100, 10, 10, 100.0), TARGET_LABEL)
            .unwrap();
        assert!((c.combined_score - 1.0).abs() < 1e-6);
        assert_eq!(c.reported_confidence(), OCR_CONFIDENCE_CAP);
    }

    #[test]
    fn test_confidence_clamped_into_range() {
        let c = Candidate::from_token(&token("Notepad", 0, 100, 10, 10, -1.0), TARGET_LABEL)
            .unwrap();
        assert_eq!(c.ocr_confidence, 0.0);
        assert!((c.combined_score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_unrelated_and_blank_tokens_excluded() {
        let tokens = vec![
            token("Calculator", 0, 100, 10, 10, 99.0),
            token("   ", 0, 100, 10, 10, 99.0),
            token("Notepad++", 50, 100, 10, 10, 80.0),
        ];
        let candidates = collect_candidates(&tokens, TARGET_LABEL);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source_text, "Notepad++");
    }

    #[test]
    fn test_exact_beats_extended_name() {
        let tokens = vec![
            token("Notepad++", 0, 100, 10, 10, 80.0),
            token("Notepad", 200, 100, 10, 10, 80.0),
        ];
        let candidates = collect_candidates(&tokens, TARGET_LABEL);
        let best = select_best(&candidates).unwrap();
        assert_eq!(best.source_text, "Notepad");
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let candidates = vec![scored("A", 0.81), scored("B", 0.81)];
        assert_eq!(select_best(&candidates).unwrap().source_text, "A");
    }

    #[test]
    fn test_no_candidates() {
        assert!(select_best(&[]).is_none());
    }
}
