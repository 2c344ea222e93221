//! Tiered fuzzy match between an OCR token and the icon caption

/// Caption under the icon we are looking for
pub const TARGET_LABEL: &str = "notepad";

const EXACT_SCORE: f32 = 1.0;
const PREFIX_BASE: f32 = 0.8;
const WORD_BASE: f32 = 0.6;
const SUBSTRING_BASE: f32 = 0.4;
/// Width of each partial-match tier; scaled by target/token length
const TIER_SPAN: f32 = 0.2;

/// Score how closely `text` reads as `target`, case-insensitively.
///
/// Tiers, first hit wins:
/// - exact match: 1.0
/// - starts with the target but longer ("Notepad++"): [0.8, 1.0)
/// - target as a separate word ("Open Notepad"): [0.6, 0.8)
/// - target buried in another word ("MyNotepadTool"): [0.4, 0.6)
/// - no occurrence: 0.0
///
/// Partial tiers scale by `len(target) / len(token)`, so longer extras score
/// lower inside their tier.
pub fn similarity(text: &str, target: &str) -> f32 {
    let token = text.trim().to_lowercase();
    let target = target.trim().to_lowercase();
    if token.is_empty() || target.is_empty() {
        return 0.0;
    }

    if token == target {
        return EXACT_SCORE;
    }

    let ratio = target.chars().count() as f32 / token.chars().count() as f32;

    if token.starts_with(&target) {
        return PREFIX_BASE + TIER_SPAN * ratio;
    }

    let mut found = false;
    for (idx, _) in token.match_indices(&target) {
        found = true;
        if is_separate_word(&token, idx, target.len()) {
            return WORD_BASE + TIER_SPAN * ratio;
        }
    }

    if found {
        SUBSTRING_BASE + TIER_SPAN * ratio
    } else {
        0.0
    }
}

/// Both neighbours of the byte range are non-alphanumeric or string edges
fn is_separate_word(token: &str, start: usize, len: usize) -> bool {
    let before = token[..start].chars().next_back();
    let after = token[start + len..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}
