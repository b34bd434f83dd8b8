//! setforge - set-to-bundle transformation pipeline for merchant catalogs
//!
//! This library decomposes multi-piece "set" catalog entries into hidden
//! per-piece component entries, allocates price across pieces under a
//! configurable ceiling, links variants size-by-size, and persists a bundle
//! configuration that flips the original entry into bundle display mode.
//!
//! # Core Concepts
//!
//! - **Set entry**: a merchant catalog item representing a multi-piece outfit
//!   (detected by text heuristics on title and description)
//! - **Component entry**: a generated, hidden catalog item representing one
//!   piece of a set, stamped with provenance markers
//! - **Bundle configuration**: the typed record persisted on the main entry
//!   holding the piece list, aggregate price and variant sync map
//!
//! # Example Usage
//!
//! ```ignore
//! use setforge::catalog::MockCatalogClient;
//! use setforge::config::PipelineConfig;
//! use setforge::pipeline::{ProcessOutcome, SetPipeline};
//! use std::sync::Arc;
//!
//! async fn run(entry_id: &str) -> anyhow::Result<()> {
//!     let client = Arc::new(MockCatalogClient::new());
//!     let pipeline = SetPipeline::new(client, PipelineConfig::default());
//!
//!     match pipeline.process_entry(entry_id).await? {
//!         ProcessOutcome::Completed(report) => {
//!             println!("created {} components", report.component_entries.len());
//!         }
//!         ProcessOutcome::Skipped(reason) => println!("skipped: {}", reason),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`catalog`]: catalog client trait, REST and mock implementations
//! - [`classify`]: set detection and component name resolution heuristics
//! - [`pricing`]: ceiling-constrained price allocation
//! - [`synthesis`]: hidden component entry creation
//! - [`linking`]: variant-to-variant size matching
//! - [`provenance`]: pipeline ownership markers and safe tagging
//! - [`bundle`]: bundle configuration assembly and persistence
//! - [`pipeline`]: orchestration, idempotency and outcome types

// Public modules
pub mod bundle;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod linking;
pub mod pipeline;
pub mod pricing;
pub mod provenance;
pub mod synthesis;

// Re-export key types for convenient access
pub use catalog::{CatalogClient, CatalogEntry, CatalogError, MockCatalogClient, RestCatalogClient};
pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{PipelineError, ProcessOutcome, ProcessReport, SetPipeline, SkipReason};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_setforge() {
        assert_eq!(NAME, "setforge");
    }
}
