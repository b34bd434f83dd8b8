//! Typed bundle configuration records
//!
//! These are the canonical in-memory shapes; they are serialized to JSON
//! only at the catalog attribute boundary, under fixed keys owned by the
//! provenance namespace.

use crate::linking::VariantSyncMap;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One piece of a generated bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundlePiece {
    pub entry_id: String,
    pub component_type: String,
    pub price: Decimal,
    pub variant_ids: Vec<String>,
}

/// The full persisted bundle record, one-to-one with a processed entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleConfiguration {
    pub parent_id: String,
    pub run_id: Uuid,
    pub pieces: Vec<BundlePiece>,
    /// Sum of the final component prices
    pub aggregate_price: Decimal,
    /// Aggregate price with the configured markup, shown struck through
    pub compare_at_price: Decimal,
    pub display_bundle: bool,
    pub sync: VariantSyncMap,
    pub generated_at: DateTime<Utc>,
}

impl BundleConfiguration {
    /// The compact component list persisted alongside the full record.
    pub fn compact_components(&self) -> Vec<CompactPiece> {
        self.pieces
            .iter()
            .map(|p| CompactPiece {
                id: p.entry_id.clone(),
                component_type: p.component_type.clone(),
                price: p.price,
            })
            .collect()
    }

    /// The small summary record used by storefront dynamic configuration.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            parent_id: self.parent_id.clone(),
            run_id: self.run_id,
            piece_count: self.pieces.len() as u32,
            aggregate_price: self.aggregate_price,
            generated_at: self.generated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactPiece {
    pub id: String,
    pub component_type: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub parent_id: String,
    pub run_id: Uuid,
    pub piece_count: u32,
    pub aggregate_price: Decimal,
    pub generated_at: DateTime<Utc>,
}
