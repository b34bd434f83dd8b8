//! Bundle assembly and persistence
//!
//! The builder is the single place where bundle behavior becomes externally
//! visible: it persists the configuration attributes on the main entry,
//! reprices its variants to the aggregate price with a struck-through
//! comparison price, and flips its display mode to bundle.

use super::config::{BundleConfiguration, BundlePiece};
use crate::catalog::{CatalogClient, CatalogEntry, DisplayMode, EntryPatch, VariantPatch};
use crate::config::PipelineConfig;
use crate::linking::VariantSyncMap;
use crate::pipeline::PipelineError;
use crate::provenance::{
    tagger::{ATTR_BUNDLE_CONFIG, ATTR_COMPONENT_LIST, ATTR_INCOMPLETE, ATTR_SUMMARY, ATTR_SYNC_MAP},
    ProvenanceTagger, TagRole, NAMESPACE,
};
use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;
use uuid::Uuid;

pub struct BundleConfigBuilder<'a> {
    client: &'a dyn CatalogClient,
    config: &'a PipelineConfig,
    tagger: &'a ProvenanceTagger,
}

impl<'a> BundleConfigBuilder<'a> {
    pub fn new(
        client: &'a dyn CatalogClient,
        config: &'a PipelineConfig,
        tagger: &'a ProvenanceTagger,
    ) -> Self {
        Self {
            client,
            config,
            tagger,
        }
    }

    /// Assembles the typed bundle record from the created components and the
    /// variant sync map. Pure; nothing is persisted.
    pub fn assemble(
        &self,
        parent: &CatalogEntry,
        components: &[(String, CatalogEntry)],
        sync: VariantSyncMap,
        run_id: Uuid,
    ) -> BundleConfiguration {
        let pieces: Vec<BundlePiece> = components
            .iter()
            .map(|(component_type, entry)| BundlePiece {
                entry_id: entry.id.clone(),
                component_type: component_type.clone(),
                price: entry.price.unwrap_or(Decimal::ZERO),
                variant_ids: entry.variants.iter().map(|v| v.id.clone()).collect(),
            })
            .collect();

        let aggregate_price: Decimal = pieces.iter().map(|p| p.price).sum();
        let markup = Decimal::from(100 + self.config.markup_percent) / Decimal::from(100);
        let compare_at_price = (aggregate_price * markup)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

        BundleConfiguration {
            parent_id: parent.id.clone(),
            run_id,
            pieces,
            aggregate_price,
            compare_at_price,
            display_bundle: true,
            sync,
            generated_at: Utc::now(),
        }
    }

    /// Persists the configuration on the main entry and flips it to bundle
    /// display. Attribute writes come first so the entry is pipeline-owned
    /// before any tag decision is taken; the incomplete run marker is
    /// cleared last.
    pub async fn persist(
        &self,
        parent: &CatalogEntry,
        bundle: &BundleConfiguration,
    ) -> Result<CatalogEntry, PipelineError> {
        let full = serialize(bundle)?;
        let components = serialize(&bundle.compact_components())?;
        let sync = serialize(&bundle.sync)?;
        let summary = serialize(&bundle.summary())?;

        self.client
            .set_attribute(&parent.id, NAMESPACE, ATTR_BUNDLE_CONFIG, &full)
            .await?;
        self.client
            .set_attribute(&parent.id, NAMESPACE, ATTR_COMPONENT_LIST, &components)
            .await?;
        self.client
            .set_attribute(&parent.id, NAMESPACE, ATTR_SYNC_MAP, &sync)
            .await?;
        self.client
            .set_attribute(&parent.id, NAMESPACE, ATTR_SUMMARY, &summary)
            .await?;

        let variant_patches = parent
            .variants
            .iter()
            .map(|v| VariantPatch {
                id: v.id.clone(),
                price: Some(bundle.aggregate_price),
                compare_at_price: Some(bundle.compare_at_price),
            })
            .collect();
        let updated = self
            .client
            .update_entry(
                &parent.id,
                EntryPatch {
                    display_mode: Some(DisplayMode::Bundle),
                    variants: Some(variant_patches),
                    ..EntryPatch::default()
                },
            )
            .await?;

        let decision = self.tagger.safe_tag(&updated, TagRole::Original);
        self.tagger.apply(self.client, &decision).await?;

        self.client
            .delete_attribute(&parent.id, NAMESPACE, ATTR_INCOMPLETE)
            .await?;

        let finalized = self.client.get_entry(&parent.id).await?;
        info!(
            "Bundle active on {}: {} pieces, aggregate {}",
            finalized.id,
            bundle.pieces.len(),
            bundle.aggregate_price
        );
        Ok(finalized)
    }
}

fn serialize<T: serde::Serialize>(value: &T) -> Result<String, PipelineError> {
    serde_json::to_string(value)
        .map_err(|e| PipelineError::ConfigurationInvalid(format!("serialize bundle record: {e}")))
}
