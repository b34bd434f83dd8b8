pub mod client;
pub mod error;
pub mod mock;
pub mod rest;
pub mod types;

pub use client::CatalogClient;
pub use error::CatalogError;
pub use mock::MockCatalogClient;
pub use rest::RestCatalogClient;
pub use types::{
    Attribute, CatalogEntry, DisplayMode, EntryDraft, EntryPatch, Image, OptionDef, Variant,
    VariantDraft, VariantPatch, Visibility,
};
