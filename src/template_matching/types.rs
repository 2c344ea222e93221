/// Template matching data types
/// Best location found by a scale sweep
#[derive(Clone, Debug, PartialEq)]
pub struct MatchResult {
    /// Icon center in frame coordinates, present only when the threshold was met
    pub anchor: Option<(i32, i32)>,
    /// Best correlation across all scales (0.0-1.0), 0.0 when nothing was tried
    pub confidence: f32,
    /// Scale factor that produced the best correlation
    pub scale: f32,
    /// Top-left corner of the best window
    pub location: Option<(u32, u32)>,
    /// Size of the resized reference at the best scale
    pub matched_size: (u32, u32),
}

impl MatchResult {
    /// No scale fit the frame, or no window correlated positively
    pub fn none() -> Self {
        Self {
            anchor: None,
            confidence: 0.0,
            scale: 1.0,
            location: None,
            matched_size: (0, 0),
        }
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let confidence_pct = (self.confidence * 100.0) as u32;
        match self.anchor {
            Some((x, y)) => write!(
                f,
                "icon at ({},{}) - {}% (scale {:.2}, {}x{})",
                x, y, confidence_pct, self.scale, self.matched_size.0, self.matched_size.1
            ),
            None => write!(f, "no icon - best {}%", confidence_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_has_zero_confidence() {
        let result = MatchResult::none();
        assert!(result.anchor.is_none());
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.to_string(), "no icon - best 0%");
    }

    #[test]
    fn test_display_with_anchor() {
        let result = MatchResult {
            anchor: Some((125, 175)),
            confidence: 0.95,
            scale: 1.0,
            location: Some((100, 150)),
            matched_size: (50, 50),
        };
        assert_eq!(
            result.to_string(),
            "icon at (125,175) - 95% (scale 1.00, 50x50)"
        );
    }
}
