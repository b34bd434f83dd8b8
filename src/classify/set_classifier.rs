//! Set detection heuristics
//!
//! Classification is pure text heuristics pinned by tests: the "set"
//! substring check and the explicit piece-count patterns are approximate by
//! design, not semantic guarantees. Keeping them behind one small struct
//! makes the strategy swappable without touching the pipeline.

use crate::catalog::CatalogEntry;
use regex::Regex;

/// Piece count assumed when no explicit cardinal pattern is present
const DEFAULT_PIECE_COUNT: u32 = 2;

/// Decides whether an entry is a multi-piece set and how many pieces it has.
///
/// Deterministic for identical input text; no side effects.
pub struct SetClassifier {
    piece_pattern: Regex,
}

impl SetClassifier {
    pub fn new() -> Self {
        // "two piece", "3-piece", "four-piece" and friends
        let piece_pattern = Regex::new(r"(?i)\b(two|three|four|2|3|4)[\s-]?piece")
            .unwrap_or_else(|e| panic!("invalid piece-count pattern: {e}"));
        Self { piece_pattern }
    }

    /// True if the title contains the case-insensitive substring "set".
    pub fn is_set(&self, entry: &CatalogEntry) -> bool {
        entry.title.to_lowercase().contains("set")
    }

    /// Extracts an explicit piece count from title and description,
    /// defaulting to 2 when no cardinal pattern matches.
    pub fn piece_count(&self, entry: &CatalogEntry) -> u32 {
        let text = format!("{} {}", entry.title, entry.description);
        self.piece_pattern
            .captures(&text)
            .and_then(|caps| caps.get(1))
            .map(|m| match m.as_str().to_lowercase().as_str() {
                "two" | "2" => 2,
                "three" | "3" => 3,
                "four" | "4" => 4,
                _ => DEFAULT_PIECE_COUNT,
            })
            .unwrap_or(DEFAULT_PIECE_COUNT)
    }
}

impl Default for SetClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use rust_decimal_macros::dec;
    use yare::parameterized;

    fn entry(title: &str, description: &str) -> CatalogEntry {
        let mut e = MockCatalogClient::entry_with_sizes("e1", title, dec!(100), &["S"]);
        e.description = description.to_string();
        e
    }

    #[parameterized(
        plain_set = { "Embroidered Set", true },
        uppercase = { "FESTIVE SET OF TWO", true },
        embedded = { "Twinset Cardigan", true },
        not_a_set = { "Embroidered Kurta", false },
    )]
    fn test_is_set(title: &str, expected: bool) {
        let classifier = SetClassifier::new();
        assert_eq!(classifier.is_set(&entry(title, "")), expected);
    }

    #[parameterized(
        spelled_three = { "Three Piece Lehenga Set - dupatta included", "", 3 },
        digit_hyphen = { "2-Piece Linen Set", "", 2 },
        digit_space = { "Cotton Set", "comes as a 4 piece ensemble", 4 },
        from_description = { "Festive Set", "classic three-piece look", 3 },
        no_pattern = { "Embroidered Set", "soft cotton", 2 },
    )]
    fn test_piece_count(title: &str, description: &str, expected: u32) {
        let classifier = SetClassifier::new();
        assert_eq!(classifier.piece_count(&entry(title, description)), expected);
    }

    #[test]
    fn test_deterministic_for_identical_text() {
        let classifier = SetClassifier::new();
        let e = entry("Three Piece Set", "with dupatta");
        assert_eq!(classifier.piece_count(&e), classifier.piece_count(&e));
    }
}
