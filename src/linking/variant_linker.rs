//! Variant-to-variant size matching
//!
//! Maps every size on the main entry to the matching variant on each
//! component. Exact option-value equality is always tried first; the fuzzy
//! fallback normalizes to lowercase and consults a fixed table of size
//! abbreviation equivalence classes, then substring containment. A
//! component's first variant is the last resort so every size resolves to
//! something purchasable.

use crate::catalog::{CatalogEntry, Variant};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size abbreviation equivalence classes consulted by the fuzzy fallback
const SIZE_CLASSES: &[&[&str]] = &[
    &["xs", "x-small", "xsmall", "extra small", "extra-small"],
    &["s", "sm", "small"],
    &["m", "md", "med", "medium"],
    &["l", "lg", "large"],
    &["xl", "x-large", "xlarge", "extra large", "extra-large"],
    &["xxl", "2xl", "2x", "double extra large"],
    &["xxxl", "3xl", "3x", "triple extra large"],
];

/// How a component variant was resolved for a given main variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Fuzzy,
    Fallback,
}

/// One resolved component variant inside the sync map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantRef {
    pub variant_id: String,
    pub product_id: String,
    pub price: Decimal,
    pub available: bool,
}

/// All component variants resolved for one size on the main entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SizeSync {
    /// component type -> matched variant
    pub components: BTreeMap<String, VariantRef>,
    /// false if any required component's matched variant is unavailable
    pub available: bool,
}

/// Nested mapping `size -> component type -> variant`, keyed by the
/// lowercase-normalized size value of the main entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantSyncMap {
    pub sizes: BTreeMap<String, SizeSync>,
}

/// Builds the variant sync map between a main entry and its components.
#[derive(Debug, Clone, Default)]
pub struct VariantLinker;

impl VariantLinker {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the matching component variant for `main_variant`, trying
    /// exact equality, then fuzzy normalization, then the first variant.
    /// Returns `None` only when the component has no variants at all.
    pub fn match_variant<'a>(
        &self,
        main_variant: &Variant,
        component: &'a CatalogEntry,
    ) -> Option<(&'a Variant, MatchKind)> {
        if let Some(exact) = component
            .variants
            .iter()
            .find(|c| c.option_values == main_variant.option_values)
        {
            return Some((exact, MatchKind::Exact));
        }

        // equivalence classes are checked across all variants before any
        // containment match is considered, so "M" resolves to "Medium" even
        // when an earlier variant would substring-match
        if let Some(class_match) = component.variants.iter().find(|c| {
            fuzzy_values_match(&main_variant.option_values, &c.option_values, values_same_class)
        }) {
            return Some((class_match, MatchKind::Fuzzy));
        }

        if let Some(containment) = component.variants.iter().find(|c| {
            fuzzy_values_match(&main_variant.option_values, &c.option_values, values_contain)
        }) {
            return Some((containment, MatchKind::Fuzzy));
        }

        component
            .variants
            .first()
            .map(|first| (first, MatchKind::Fallback))
    }

    /// Builds the full sync map for `main` against `components`
    /// (component type, entry) pairs.
    pub fn link(&self, main: &CatalogEntry, components: &[(String, CatalogEntry)]) -> VariantSyncMap {
        let mut sizes = BTreeMap::new();

        for main_variant in &main.variants {
            let size_key = size_value(main, main_variant).to_lowercase();
            if sizes.contains_key(&size_key) {
                continue;
            }

            let mut refs = BTreeMap::new();
            let mut available = true;
            for (component_type, component) in components {
                match self.match_variant(main_variant, component) {
                    Some((matched, _)) => {
                        available &= matched.available;
                        refs.insert(
                            component_type.clone(),
                            VariantRef {
                                variant_id: matched.id.clone(),
                                product_id: component.id.clone(),
                                price: matched.price,
                                available: matched.available,
                            },
                        );
                    }
                    None => available = false,
                }
            }

            sizes.insert(size_key, SizeSync { components: refs, available });
        }

        VariantSyncMap { sizes }
    }
}

/// The size value of a variant: the value under an option axis named
/// "size" when one exists, otherwise the first option value.
fn size_value<'a>(entry: &CatalogEntry, variant: &'a Variant) -> &'a str {
    let size_index = entry
        .options
        .iter()
        .position(|o| o.name.eq_ignore_ascii_case("size"))
        .unwrap_or(0);
    variant
        .option_values
        .get(size_index)
        .or_else(|| variant.option_values.first())
        .map(String::as_str)
        .unwrap_or("default")
}

fn fuzzy_values_match(
    main_values: &[String],
    component_values: &[String],
    values_match: fn(&str, &str) -> bool,
) -> bool {
    if main_values.is_empty() || component_values.is_empty() {
        return false;
    }
    if main_values.len() == component_values.len() {
        main_values
            .iter()
            .zip(component_values)
            .all(|(a, b)| values_match(a, b))
    } else {
        // option arity differs; the leading axis carries the size on both sides
        values_match(&main_values[0], &component_values[0])
    }
}

fn values_same_class(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    a == b
        || SIZE_CLASSES
            .iter()
            .any(|class| class.contains(&a.as_str()) && class.contains(&b.as_str()))
}

fn values_contain(a: &str, b: &str) -> bool {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    // single-character needles would match nearly any size label
    if a.len() < 2 || b.len() < 2 {
        return false;
    }
    a.contains(&b) || b.contains(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use rust_decimal_macros::dec;
    use yare::parameterized;

    fn entry(id: &str, sizes: &[&str]) -> CatalogEntry {
        MockCatalogClient::entry_with_sizes(id, "Entry", dec!(100), sizes)
    }

    #[parameterized(
        abbreviation = { "S", "Small" },
        reverse = { "Medium", "M" },
        two_letter = { "sm", "small" },
        exact_after_trim = { " XL ", "xl" },
    )]
    fn test_values_same_class(a: &str, b: &str) {
        assert!(values_same_class(a, b));
    }

    #[test]
    fn test_distinct_sizes_are_not_equivalent() {
        assert!(!values_same_class("S", "L"));
        assert!(!values_same_class("Small", "Large"));
    }

    #[parameterized(
        waist = { "32", "32 Waist", true },
        reverse = { "Large Tall", "large", true },
        single_letter_needle = { "M", "Small", false },
        unrelated = { "Petite", "Regular", false },
    )]
    fn test_values_contain(a: &str, b: &str, expected: bool) {
        assert_eq!(values_contain(a, b), expected);
    }

    #[test]
    fn test_exact_match_wins_over_fuzzy() {
        let linker = VariantLinker::new();
        let main = entry("main", &["S", "M", "L"]);
        let component = entry("comp", &["S", "M", "L"]);

        for main_variant in &main.variants {
            let (matched, kind) = linker.match_variant(main_variant, &component).unwrap();
            assert_eq!(kind, MatchKind::Exact);
            assert_eq!(matched.option_values, main_variant.option_values);
        }
    }

    #[test]
    fn test_fuzzy_maps_abbreviations_to_full_names() {
        let linker = VariantLinker::new();
        let main = entry("main", &["S", "M", "L"]);
        let component = entry("comp", &["Small", "Medium", "Large"]);

        let expected = ["Small", "Medium", "Large"];
        for (main_variant, want) in main.variants.iter().zip(expected) {
            let (matched, kind) = linker.match_variant(main_variant, &component).unwrap();
            assert_eq!(kind, MatchKind::Fuzzy);
            assert_eq!(matched.option_values, vec![want.to_string()]);
        }
    }

    #[test]
    fn test_class_match_beats_earlier_containment_candidate() {
        let linker = VariantLinker::new();
        let main = entry("main", &["M"]);
        // "Small" precedes "Medium" and would containment-match "m"
        let component = entry("comp", &["Small", "Medium", "Large"]);

        let (matched, kind) = linker
            .match_variant(&main.variants[0], &component)
            .unwrap();
        assert_eq!(kind, MatchKind::Fuzzy);
        assert_eq!(matched.option_values, vec!["Medium".to_string()]);
    }

    #[test]
    fn test_unmatched_size_falls_back_to_first_variant() {
        let linker = VariantLinker::new();
        let main = entry("main", &["Free Size"]);
        let component = entry("comp", &["S", "M"]);

        let (matched, kind) = linker
            .match_variant(&main.variants[0], &component)
            .unwrap();
        assert_eq!(kind, MatchKind::Fallback);
        assert_eq!(matched.option_values, vec!["S".to_string()]);
    }

    #[test]
    fn test_link_builds_size_keyed_map() {
        let linker = VariantLinker::new();
        let main = entry("main", &["S", "M"]);
        let components = vec![
            ("Top".to_string(), entry("c1", &["Small", "Medium"])),
            ("Bottom".to_string(), entry("c2", &["S", "M"])),
        ];

        let map = linker.link(&main, &components);
        assert_eq!(map.sizes.len(), 2);

        let small = &map.sizes["s"];
        assert!(small.available);
        assert_eq!(small.components["Top"].product_id, "c1");
        assert_eq!(small.components["Bottom"].variant_id, "c2-v1");
    }

    #[test]
    fn test_unavailable_component_poisons_size() {
        let linker = VariantLinker::new();
        let main = entry("main", &["S"]);
        let mut top = entry("c1", &["S"]);
        top.variants[0].available = false;
        let components = vec![
            ("Top".to_string(), top),
            ("Bottom".to_string(), entry("c2", &["S"])),
        ];

        let map = linker.link(&main, &components);
        assert!(!map.sizes["s"].available);
        assert!(map.sizes["s"].components["Bottom"].available);
    }

    #[test]
    fn test_component_without_variants_marks_size_unavailable() {
        let linker = VariantLinker::new();
        let main = entry("main", &["S"]);
        let mut empty = entry("c1", &["S"]);
        empty.variants.clear();
        let components = vec![("Top".to_string(), empty)];

        let map = linker.link(&main, &components);
        assert!(!map.sizes["s"].available);
        assert!(map.sizes["s"].components.is_empty());
    }
}
