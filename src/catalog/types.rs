//! Catalog domain types shared across the pipeline and client implementations
//!
//! Money is `rust_decimal::Decimal` everywhere internal and serialized as a
//! decimal string at the collaborator boundary.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Storefront visibility of an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Visible,
    Hidden,
}

/// How an entry renders on the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    Standard,
    Bundle,
}

/// One purchasable option combination of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub sku: String,
    /// Values aligned positionally with the owning entry's option definitions
    pub option_values: Vec<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
    pub available: bool,
    pub inventory_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<u32>,
}

/// An option axis (e.g. Size, Color) and its declared values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionDef {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A namespaced key/value attribute persisted on an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub namespace: String,
    pub key: String,
    pub value: String,
}

/// A merchant catalog entry, either the original set or a generated component
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub options: Vec<OptionDef>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    pub visibility: Visibility,
    pub display_mode: DisplayMode,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl CatalogEntry {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn attribute(&self, namespace: &str, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace == namespace && a.key == key)
            .map(|a| a.value.as_str())
    }
}

/// A variant to be created as part of an entry draft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDraft {
    pub sku: String,
    pub option_values: Vec<String>,
    pub price: Decimal,
    pub available: bool,
    pub inventory_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<u32>,
}

/// A new entry to be created via the catalog client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub images: Vec<Image>,
    pub options: Vec<OptionDef>,
    pub variants: Vec<VariantDraft>,
    pub visibility: Visibility,
    pub attributes: Vec<Attribute>,
}

/// Price fields to change on one existing variant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantPatch {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<Decimal>,
}

/// A partial update for an existing entry; unset fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variants: Option<Vec<VariantPatch>>,
}
