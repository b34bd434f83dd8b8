//! Duplicate-processing protection
//!
//! Two layers: the provenance marker check plus a heuristic catalog scan,
//! and an in-process single-flight lock keyed by entry id that closes the
//! check-then-act window between concurrent runs. Cross-process
//! serialization is still the job runner's responsibility.

use crate::catalog::CatalogEntry;
use crate::provenance::ProvenanceTagger;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// How much of the base title the secondary heuristic compares
const TITLE_PREFIX_LEN: usize = 12;

/// In-process single-flight lock keyed by entry id.
///
/// Held from before classification until the run completes or fails; the
/// guard releases on drop.
#[derive(Debug, Clone, Default)]
pub struct EntryLock {
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl EntryLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `entry_id`, or returns `None` if a run for the
    /// same entry is already in flight.
    pub fn try_acquire(&self, entry_id: &str) -> Option<EntryLockGuard> {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        if !inflight.insert(entry_id.to_string()) {
            return None;
        }
        Some(EntryLockGuard {
            entry_id: entry_id.to_string(),
            inflight: Arc::clone(&self.inflight),
        })
    }
}

pub struct EntryLockGuard {
    entry_id: String,
    inflight: Arc<Mutex<HashSet<String>>>,
}

impl Drop for EntryLockGuard {
    fn drop(&mut self) {
        let mut inflight = self.inflight.lock().unwrap_or_else(|e| e.into_inner());
        inflight.remove(&self.entry_id);
    }
}

/// Prevents a set entry from being decomposed twice.
#[derive(Debug, Clone, Default)]
pub struct IdempotencyGuard {
    tagger: ProvenanceTagger,
}

impl IdempotencyGuard {
    pub fn new(tagger: ProvenanceTagger) -> Self {
        Self { tagger }
    }

    /// Primary check: the "already generated" provenance marker.
    pub fn is_marked(&self, entry: &CatalogEntry) -> bool {
        self.tagger.is_marked_processed(entry)
    }

    /// Secondary, approximate check: some other catalog entry looks like a
    /// component generated from this one. Its title must contain both a
    /// resolved component name and a prefix of the candidate's base title.
    /// May false-positive on generic titles; pinned by tests as heuristic.
    pub fn matches_generated_component(
        &self,
        candidate: &CatalogEntry,
        all_entries: &[CatalogEntry],
        component_names: &[String],
    ) -> bool {
        let prefix = base_title_prefix(&candidate.title);
        if prefix.is_empty() {
            return false;
        }
        let names: Vec<String> = component_names.iter().map(|n| n.to_lowercase()).collect();

        all_entries.iter().any(|other| {
            if other.id == candidate.id {
                return false;
            }
            let title = other.title.to_lowercase();
            let looks_generated =
                title.contains(&prefix) && names.iter().any(|n| title.contains(n.as_str()));
            if looks_generated {
                debug!(
                    "Entry {} looks like a component of {} ('{}')",
                    other.id, candidate.id, other.title
                );
            }
            looks_generated
        })
    }
}

fn base_title_prefix(title: &str) -> String {
    let without_set: String = title
        .split_whitespace()
        .filter(|w| !w.eq_ignore_ascii_case("set"))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    without_set.chars().take(TITLE_PREFIX_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use crate::provenance::PROCESSED_TAG;
    use rust_decimal_macros::dec;

    fn entry(id: &str, title: &str) -> CatalogEntry {
        MockCatalogClient::entry_with_sizes(id, title, dec!(100), &["S"])
    }

    #[test]
    fn test_lock_is_exclusive_per_entry() {
        let locks = EntryLock::new();
        let guard = locks.try_acquire("e1");
        assert!(guard.is_some());
        assert!(locks.try_acquire("e1").is_none());
        // a different entry is unaffected
        assert!(locks.try_acquire("e2").is_some());
    }

    #[test]
    fn test_lock_releases_on_drop() {
        let locks = EntryLock::new();
        drop(locks.try_acquire("e1"));
        assert!(locks.try_acquire("e1").is_some());
    }

    #[test]
    fn test_marker_check() {
        let guard = IdempotencyGuard::default();
        let mut e = entry("e1", "Linen Set");
        assert!(!guard.is_marked(&e));
        e.tags.push(PROCESSED_TAG.to_string());
        assert!(guard.is_marked(&e));
    }

    #[test]
    fn test_secondary_heuristic_finds_lookalike_component() {
        let guard = IdempotencyGuard::default();
        let candidate = entry("e1", "Embroidered Lehenga Set");
        let all = vec![
            candidate.clone(),
            entry("gen-100", "Embroidered Lehenga - Top"),
        ];

        let names = vec!["Top".to_string(), "Bottom".to_string()];
        assert!(guard.matches_generated_component(&candidate, &all, &names));
    }

    #[test]
    fn test_secondary_heuristic_ignores_unrelated_entries() {
        let guard = IdempotencyGuard::default();
        let candidate = entry("e1", "Embroidered Lehenga Set");
        let all = vec![
            candidate.clone(),
            entry("e2", "Silk Saree"),
            // contains a component name but not the title prefix
            entry("e3", "Classic Cotton Top"),
        ];

        let names = vec!["Top".to_string(), "Bottom".to_string()];
        assert!(!guard.matches_generated_component(&candidate, &all, &names));
    }

    #[test]
    fn test_secondary_heuristic_skips_self() {
        let guard = IdempotencyGuard::default();
        // the candidate's own title contains "Top"
        let candidate = entry("e1", "Embroidered Top Set");
        let all = vec![candidate.clone()];

        let names = vec!["Top".to_string()];
        assert!(!guard.matches_generated_component(&candidate, &all, &names));
    }
}
