//! Component name resolution
//!
//! Assigns a semantic label to each piece of a set from a fixed keyword
//! dictionary. Matches are collected in dictionary order, not text order,
//! so identical input text always yields the identical ordered list.

use regex::Regex;

/// Category dictionary in priority order; first match wins a slot.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Top", &["top", "kurta", "kurti", "shirt", "blouse", "choli", "kameez"]),
    (
        "Bottom",
        &["bottom", "pant", "trouser", "palazzo", "salwar", "churidar", "sharara", "legging"],
    ),
    ("Jacket", &["jacket", "shrug", "koti", "cape", "blazer"]),
    ("Dupatta", &["dupatta", "chunni", "odhani", "stole", "scarf"]),
    ("Accessory", &["accessory", "belt", "potli", "clutch"]),
    ("Skirt", &["skirt", "lehenga", "ghagra"]),
    ("Dress", &["dress", "gown", "anarkali"]),
];

/// Resolves component labels for a set from its title and description.
pub struct ComponentNameResolver {
    markup_pattern: Regex,
}

impl ComponentNameResolver {
    pub fn new() -> Self {
        let markup_pattern =
            Regex::new(r"<[^>]+>").unwrap_or_else(|e| panic!("invalid markup pattern: {e}"));
        Self { markup_pattern }
    }

    /// Default labels when keyword matches do not cover every piece.
    fn default_names(piece_count: u32) -> &'static [&'static str] {
        match piece_count {
            0..=2 => &["Top", "Bottom"],
            3 => &["Top", "Bottom", "Dupatta"],
            _ => &["Top", "Bottom", "Dupatta", "Accessory"],
        }
    }

    /// Returns exactly `piece_count` capitalized, deduplicated labels.
    ///
    /// Keyword matches come first (dictionary order), then defaults for the
    /// piece count that are not already present, then numbered fallbacks for
    /// counts beyond the dictionary's coverage.
    pub fn resolve(&self, title: &str, description: &str, piece_count: u32) -> Vec<String> {
        let text = self
            .markup_pattern
            .replace_all(&format!("{} {}", title, description), " ")
            .to_lowercase();

        let mut names: Vec<String> = Vec::new();
        for (category, keywords) in CATEGORY_KEYWORDS {
            if keywords.iter().any(|k| text.contains(k)) {
                names.push((*category).to_string());
            }
        }

        let target = piece_count as usize;
        if names.len() >= target {
            names.truncate(target);
            return names;
        }

        for default in Self::default_names(piece_count) {
            if names.len() == target {
                break;
            }
            if !names.iter().any(|n| n == default) {
                names.push((*default).to_string());
            }
        }

        while names.len() < target {
            names.push(format!("Piece {}", names.len() + 1));
        }

        names
    }
}

impl Default for ComponentNameResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_matches_yields_defaults() {
        let resolver = ComponentNameResolver::new();
        assert_eq!(resolver.resolve("Embroidered Set", "", 2), vec!["Top", "Bottom"]);
        assert_eq!(
            resolver.resolve("Embroidered Set", "", 3),
            vec!["Top", "Bottom", "Dupatta"]
        );
    }

    #[test]
    fn test_matches_collected_in_dictionary_order() {
        let resolver = ComponentNameResolver::new();
        // "lehenga" (Skirt) appears before "dupatta" in the text but Dupatta
        // precedes Skirt in the dictionary.
        let names = resolver.resolve("Lehenga with dupatta and matching blouse", "", 3);
        assert_eq!(names, vec!["Top", "Dupatta", "Skirt"]);
    }

    #[test]
    fn test_partial_matches_padded_with_defaults() {
        let resolver = ComponentNameResolver::new();
        let names = resolver.resolve("Three Piece Lehenga Set - dupatta included", "", 3);
        assert_eq!(names, vec!["Dupatta", "Skirt", "Top"]);
    }

    #[test]
    fn test_excess_matches_truncated_to_piece_count() {
        let resolver = ComponentNameResolver::new();
        let names = resolver.resolve("Kurta with palazzo, jacket and dupatta", "", 2);
        assert_eq!(names, vec!["Top", "Bottom"]);
    }

    #[test]
    fn test_markup_is_stripped() {
        let resolver = ComponentNameResolver::new();
        let names = resolver.resolve("Festive Set", "<p>kurta</p><br/>with <b>palazzo</b>", 2);
        assert_eq!(names, vec!["Top", "Bottom"]);
    }

    #[test]
    fn test_deterministic() {
        let resolver = ComponentNameResolver::new();
        let a = resolver.resolve("Lehenga choli set", "with dupatta", 3);
        let b = resolver.resolve("Lehenga choli set", "with dupatta", 3);
        assert_eq!(a, b);
    }

    #[test]
    fn test_length_always_exact() {
        let resolver = ComponentNameResolver::new();
        for count in 2..=4 {
            let names = resolver.resolve("Plain Set", "", count);
            assert_eq!(names.len(), count as usize);
            let mut deduped = names.clone();
            deduped.dedup();
            assert_eq!(deduped, names);
        }
    }
}
