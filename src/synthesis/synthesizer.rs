//! Hidden component entry synthesis
//!
//! Builds one draft entry per resolved component name and creates them
//! through the catalog client, one at a time with a short pause between
//! calls as upstream rate-limit courtesy. The first failed creation aborts
//! the loop; components already created are left in place and reported in
//! the error so a reconciliation pass can find them.

use crate::catalog::{Attribute, CatalogClient, CatalogEntry, EntryDraft, VariantDraft, Visibility};
use crate::config::PipelineConfig;
use crate::pipeline::PipelineError;
use crate::provenance::{
    tagger::{ATTR_COMPONENT_INDEX, ATTR_COMPONENT_TYPE, ATTR_PARENT_ID},
    TagRole, NAMESPACE,
};
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{info, warn};

/// Creates hidden draft entries for each piece of a set.
pub struct ComponentSynthesizer<'a> {
    client: &'a dyn CatalogClient,
    config: &'a PipelineConfig,
    set_word: Regex,
}

impl<'a> ComponentSynthesizer<'a> {
    pub fn new(client: &'a dyn CatalogClient, config: &'a PipelineConfig) -> Self {
        let set_word =
            Regex::new(r"(?i)\s*\bset\b").unwrap_or_else(|e| panic!("invalid set pattern: {e}"));
        Self {
            client,
            config,
            set_word,
        }
    }

    /// Parent title with the word "set" removed and whitespace collapsed.
    fn base_title(&self, parent: &CatalogEntry) -> String {
        let stripped = self.set_word.replace_all(&parent.title, "");
        let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
        let trimmed = collapsed.trim_matches(|c: char| c == '-' || c.is_whitespace());
        if trimmed.is_empty() {
            parent.title.clone()
        } else {
            trimmed.to_string()
        }
    }

    /// Builds the draft for component `index` of `piece_count`, priced at
    /// `price`. Images and option definitions are copied verbatim; variants
    /// are cloned with the allocated price, a suffixed SKU and the weight
    /// split across pieces. Visibility is always hidden.
    pub fn build_draft(
        &self,
        parent: &CatalogEntry,
        component_type: &str,
        index: usize,
        piece_count: u32,
        price: Decimal,
    ) -> EntryDraft {
        let sku_suffix = format!("{}-{}", component_type.to_uppercase(), index + 1);
        let variants = parent
            .variants
            .iter()
            .map(|v| VariantDraft {
                sku: format!("{}-{}", v.sku, sku_suffix),
                option_values: v.option_values.clone(),
                price,
                available: v.available,
                inventory_count: v.inventory_count,
                weight_grams: v.weight_grams.map(|w| w / piece_count.max(1)),
            })
            .collect();

        let attributes = vec![
            Attribute {
                namespace: NAMESPACE.to_string(),
                key: ATTR_PARENT_ID.to_string(),
                value: parent.id.clone(),
            },
            Attribute {
                namespace: NAMESPACE.to_string(),
                key: ATTR_COMPONENT_INDEX.to_string(),
                value: index.to_string(),
            },
            Attribute {
                namespace: NAMESPACE.to_string(),
                key: ATTR_COMPONENT_TYPE.to_string(),
                value: component_type.to_string(),
            },
        ];

        EntryDraft {
            title: format!("{} - {}", self.base_title(parent), component_type),
            description: format!(
                "{} piece of the '{}' set. Sold as part of the bundle.",
                component_type, parent.title
            ),
            tags: TagRole::Component
                .tags()
                .iter()
                .map(|t| t.to_string())
                .collect(),
            images: parent.images.clone(),
            options: parent.options.clone(),
            variants,
            visibility: Visibility::Hidden,
            attributes,
        }
    }

    /// Creates one component per resolved name, sequentially, pausing
    /// between calls. Aborts on the first failure.
    pub async fn create_components(
        &self,
        parent: &CatalogEntry,
        names: &[String],
        price_split: &[Decimal],
    ) -> Result<Vec<CatalogEntry>, PipelineError> {
        debug_assert_eq!(names.len(), price_split.len());
        let piece_count = names.len() as u32;
        let mut created = Vec::with_capacity(names.len());

        for (index, (name, price)) in names.iter().zip(price_split).enumerate() {
            if index > 0 && !self.config.create_delay.is_zero() {
                tokio::time::sleep(self.config.create_delay).await;
            }

            let draft = self.build_draft(parent, name, index, piece_count, *price);
            match self.client.create_entry(draft).await {
                Ok(entry) => {
                    info!(
                        "Created component {}/{} for {}: {} ('{}')",
                        index + 1,
                        names.len(),
                        parent.id,
                        entry.id,
                        entry.title
                    );
                    created.push(entry);
                }
                Err(source) => {
                    warn!(
                        "Component creation failed at {}/{} for {}: {}",
                        index + 1,
                        names.len(),
                        parent.id,
                        source
                    );
                    return Err(PipelineError::PartialCreation {
                        created: created.into_iter().map(|e: CatalogEntry| e.id).collect(),
                        expected: names.len(),
                        source,
                    });
                }
            }
        }

        Ok(created)
    }
}
