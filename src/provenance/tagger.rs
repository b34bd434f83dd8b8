//! Provenance markers for pipeline-owned catalog entries
//!
//! The tagger owns the fixed marker vocabulary and the attribute namespace
//! that distinguish entries created (or finalized) by the pipeline from
//! ordinary merchant entries. Tagging is split into a pure decision step
//! ([`ProvenanceTagger::safe_tag`]) and a separate apply step, so operators
//! get a dry-run preview with zero side effects.

use crate::catalog::{CatalogClient, CatalogEntry, CatalogError, EntryPatch};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Attribute namespace owned by the pipeline
pub const NAMESPACE: &str = "setforge";

/// Tag stamped on an original entry once its bundle has been generated
pub const PROCESSED_TAG: &str = "setforge-split-done";

/// Attribute keys persisted under [`NAMESPACE`]
pub const ATTR_PARENT_ID: &str = "parent_id";
pub const ATTR_COMPONENT_INDEX: &str = "component_index";
pub const ATTR_COMPONENT_TYPE: &str = "component_type";
pub const ATTR_BUNDLE_CONFIG: &str = "bundle_config";
pub const ATTR_COMPONENT_LIST: &str = "components";
pub const ATTR_SYNC_MAP: &str = "variant_sync";
pub const ATTR_SUMMARY: &str = "dynamic_config";
pub const ATTR_INCOMPLETE: &str = "incomplete_run";

/// Any of these marks an entry as pipeline-owned
const CORE_MARKERS: &[&str] = &["setforge", "setforge-generated"];

/// Weak structural hints, only meaningful together with a marker tag
const STRUCTURAL_KEYWORDS: &[&str] = &["component", "piece", "bundle"];

const ORIGINAL_TAGS: &[&str] = &["setforge", "setforge-original", PROCESSED_TAG];
const COMPONENT_TAGS: &[&str] = &["setforge", "setforge-generated", "setforge-component"];
const BUNDLE_TAGS: &[&str] = &["setforge", "setforge-bundle"];

/// The role an entry plays in a generated bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagRole {
    Original,
    Component,
    Bundle,
}

impl TagRole {
    pub fn tags(&self) -> &'static [&'static str] {
        match self {
            TagRole::Original => ORIGINAL_TAGS,
            TagRole::Component => COMPONENT_TAGS,
            TagRole::Bundle => BUNDLE_TAGS,
        }
    }
}

/// Outcome of a tagging decision; nothing has been mutated yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagDecision {
    pub entry_id: String,
    pub role: TagRole,
    pub should_tag: bool,
    pub changed: bool,
    pub current_tags: Vec<String>,
    pub new_tags: Vec<String>,
    pub reason: String,
}

/// Stamps and recognizes pipeline-created artifacts.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceTagger;

impl ProvenanceTagger {
    pub fn new() -> Self {
        Self
    }

    /// True if the entry was created or finalized by the pipeline: a core
    /// marker tag, a namespaced attribute, or (weakly) structural title
    /// keywords alongside at least one marker tag.
    pub fn is_created_by_pipeline(&self, entry: &CatalogEntry) -> bool {
        let has_marker = CORE_MARKERS.iter().any(|m| entry.has_tag(m));
        if has_marker {
            return true;
        }
        if entry.attributes.iter().any(|a| a.namespace == NAMESPACE) {
            return true;
        }
        let title = entry.title.to_lowercase();
        STRUCTURAL_KEYWORDS.iter().any(|k| title.contains(k))
            && entry.tags.iter().any(|t| t.starts_with("setforge"))
    }

    /// True if the entry already carries the "already generated" marker.
    pub fn is_marked_processed(&self, entry: &CatalogEntry) -> bool {
        entry.has_tag(PROCESSED_TAG) || entry.attribute(NAMESPACE, ATTR_BUNDLE_CONFIG).is_some()
    }

    /// Decides whether `entry` may receive the tags for `role`, without
    /// mutating anything. `should_tag` is false for any entry the pipeline
    /// does not own, regardless of caller intent.
    pub fn safe_tag(&self, entry: &CatalogEntry, role: TagRole) -> TagDecision {
        let current_tags = entry.tags.clone();

        if !self.is_created_by_pipeline(entry) {
            return TagDecision {
                entry_id: entry.id.clone(),
                role,
                should_tag: false,
                changed: false,
                new_tags: current_tags.clone(),
                current_tags,
                reason: "entry is not pipeline-owned".to_string(),
            };
        }

        let mut new_tags = current_tags.clone();
        for tag in role.tags() {
            if !entry.has_tag(tag) {
                new_tags.push((*tag).to_string());
            }
        }
        let changed = new_tags.len() != current_tags.len();

        TagDecision {
            entry_id: entry.id.clone(),
            role,
            should_tag: true,
            changed,
            current_tags,
            new_tags,
            reason: if changed {
                "pipeline-owned entry, role tags missing".to_string()
            } else {
                "pipeline-owned entry, already fully tagged".to_string()
            },
        }
    }

    /// Commits a positive decision via the catalog client. Returns whether
    /// an update was actually sent.
    pub async fn apply(
        &self,
        client: &dyn CatalogClient,
        decision: &TagDecision,
    ) -> Result<bool, CatalogError> {
        if !decision.should_tag || !decision.changed {
            debug!(
                "Skipping tag update for {}: {}",
                decision.entry_id, decision.reason
            );
            return Ok(false);
        }

        let patch = EntryPatch {
            tags: Some(decision.new_tags.clone()),
            ..EntryPatch::default()
        };
        client.update_entry(&decision.entry_id, patch).await?;
        debug!(
            "Applied {:?} tags to {}: {:?}",
            decision.role, decision.entry_id, decision.new_tags
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Attribute, MockCatalogClient};
    use rust_decimal_macros::dec;

    fn merchant_entry() -> CatalogEntry {
        MockCatalogClient::entry_with_sizes("e1", "Embroidered Set", dec!(1200), &["S"])
    }

    #[test]
    fn test_core_marker_is_recognized() {
        let tagger = ProvenanceTagger::new();
        let mut entry = merchant_entry();
        assert!(!tagger.is_created_by_pipeline(&entry));

        entry.tags.push("setforge-generated".to_string());
        assert!(tagger.is_created_by_pipeline(&entry));
    }

    #[test]
    fn test_namespace_attribute_is_recognized() {
        let tagger = ProvenanceTagger::new();
        let mut entry = merchant_entry();
        entry.attributes.push(Attribute {
            namespace: NAMESPACE.to_string(),
            key: ATTR_PARENT_ID.to_string(),
            value: "e9".to_string(),
        });
        assert!(tagger.is_created_by_pipeline(&entry));
    }

    #[test]
    fn test_structural_keywords_alone_are_not_enough() {
        let tagger = ProvenanceTagger::new();
        let mut entry = merchant_entry();
        entry.title = "Bundle of three pieces".to_string();
        assert!(!tagger.is_created_by_pipeline(&entry));
    }

    #[test]
    fn test_safe_tag_refuses_merchant_entries() {
        let tagger = ProvenanceTagger::new();
        let entry = merchant_entry();

        for role in [TagRole::Original, TagRole::Component, TagRole::Bundle] {
            let decision = tagger.safe_tag(&entry, role);
            assert!(!decision.should_tag);
            assert!(!decision.changed);
            assert_eq!(decision.new_tags, decision.current_tags);
        }
    }

    #[test]
    fn test_safe_tag_proposes_missing_role_tags() {
        let tagger = ProvenanceTagger::new();
        let mut entry = merchant_entry();
        entry.tags.push("setforge".to_string());

        let decision = tagger.safe_tag(&entry, TagRole::Component);
        assert!(decision.should_tag);
        assert!(decision.changed);
        assert!(decision.new_tags.contains(&"setforge-component".to_string()));
        // already-present tags are not duplicated
        assert_eq!(
            decision
                .new_tags
                .iter()
                .filter(|t| *t == "setforge")
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_apply_skips_negative_decisions() {
        let tagger = ProvenanceTagger::new();
        let client = MockCatalogClient::new();
        client.push_entry(merchant_entry());

        let decision = tagger.safe_tag(&client.get_entry("e1").await.unwrap(), TagRole::Original);
        let applied = tagger.apply(&client, &decision).await.unwrap();

        assert!(!applied);
        // no update_entry call was made
        assert_eq!(client.calls(), vec!["get_entry"]);
    }

    #[tokio::test]
    async fn test_apply_commits_positive_decisions() {
        let tagger = ProvenanceTagger::new();
        let client = MockCatalogClient::new();
        let mut entry = merchant_entry();
        entry.tags.push("setforge".to_string());
        client.push_entry(entry);

        let decision = tagger.safe_tag(&client.get_entry("e1").await.unwrap(), TagRole::Bundle);
        let applied = tagger.apply(&client, &decision).await.unwrap();

        assert!(applied);
        let updated = client.get_entry("e1").await.unwrap();
        assert!(updated.has_tag("setforge-bundle"));
    }

    #[test]
    fn test_processed_marker() {
        let tagger = ProvenanceTagger::new();
        let mut entry = merchant_entry();
        assert!(!tagger.is_marked_processed(&entry));

        entry.tags.push(PROCESSED_TAG.to_string());
        assert!(tagger.is_marked_processed(&entry));
    }
}
