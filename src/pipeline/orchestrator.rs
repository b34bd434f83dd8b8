//! Pipeline orchestration
//!
//! Drives the stages in a fixed order for one entry per invocation:
//! single-flight lock, idempotency, classification, name resolution, price
//! allocation, component synthesis, variant linking, bundle build. The run
//! is strictly sequential; the only suspension point is the pacing delay
//! between component create calls.

use super::error::PipelineError;
use super::guard::{EntryLock, IdempotencyGuard};
use super::outcome::{CheckReport, ProcessOutcome, ProcessReport, RunState, SkipReason};
use crate::bundle::BundleConfigBuilder;
use crate::catalog::{CatalogClient, CatalogEntry};
use crate::classify::{ComponentNameResolver, SetClassifier};
use crate::config::PipelineConfig;
use crate::linking::VariantLinker;
use crate::pricing::PriceAllocator;
use crate::provenance::{tagger::ATTR_INCOMPLETE, ProvenanceTagger, TagRole, NAMESPACE};
use crate::synthesis::ComponentSynthesizer;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Orchestrates set-to-bundle runs against one catalog client.
///
/// All dependencies are injected and scoped to this instance; nothing is
/// cached at module level, so tenants get isolated pipelines.
pub struct SetPipeline {
    client: Arc<dyn CatalogClient>,
    config: PipelineConfig,
    classifier: SetClassifier,
    resolver: ComponentNameResolver,
    linker: VariantLinker,
    tagger: ProvenanceTagger,
    guard: IdempotencyGuard,
    locks: EntryLock,
}

impl SetPipeline {
    pub fn new(client: Arc<dyn CatalogClient>, config: PipelineConfig) -> Self {
        let tagger = ProvenanceTagger::new();
        Self {
            client,
            config,
            classifier: SetClassifier::new(),
            resolver: ComponentNameResolver::new(),
            linker: VariantLinker::new(),
            guard: IdempotencyGuard::new(tagger.clone()),
            tagger,
            locks: EntryLock::new(),
        }
    }

    /// Processes one entry end to end. Skips are reported as outcomes, not
    /// errors; any upstream failure aborts the remaining steps.
    pub async fn process_entry(&self, entry_id: &str) -> Result<ProcessOutcome, PipelineError> {
        let _lock = match self.locks.try_acquire(entry_id) {
            Some(guard) => guard,
            None => {
                info!("Skipping {}: run already in flight", entry_id);
                return Ok(ProcessOutcome::Skipped(SkipReason::AlreadyRunning));
            }
        };

        let start = Instant::now();
        let mut state = RunState::Unprocessed;
        let result = self.run_locked(entry_id, &mut state).await;
        match &result {
            Ok(ProcessOutcome::Completed(report)) => info!(
                "Entry {} bundled into {} components in {:?}",
                entry_id,
                report.component_entries.len(),
                start.elapsed()
            ),
            Ok(ProcessOutcome::Skipped(reason)) => {
                info!("Skipped {}: {}", entry_id, reason);
            }
            Err(e) => {
                warn!("Run failed for {} after {:?}: {}", entry_id, state, e);
                self.advance(&mut state, RunState::Failed, entry_id);
            }
        }
        result
    }

    async fn run_locked(
        &self,
        entry_id: &str,
        state: &mut RunState,
    ) -> Result<ProcessOutcome, PipelineError> {
        let entry = self.client.get_entry(entry_id).await?;
        self.advance(state, RunState::Processing, entry_id);

        if self.guard.is_marked(&entry) {
            return Ok(ProcessOutcome::Skipped(SkipReason::AlreadyProcessed));
        }
        if self.tagger.is_created_by_pipeline(&entry) {
            return Ok(ProcessOutcome::Skipped(SkipReason::PipelineOwned));
        }
        if !self.classifier.is_set(&entry) {
            return Ok(ProcessOutcome::Skipped(SkipReason::NotASet));
        }

        let piece_count = self.classifier.piece_count(&entry);
        let (names, split) = self.plan(&entry, piece_count)?;

        let all_entries = self.client.list_entries().await?;
        if self
            .guard
            .matches_generated_component(&entry, &all_entries, &names)
        {
            return Ok(ProcessOutcome::Skipped(SkipReason::AlreadyProcessed));
        }

        if self.config.dry_run {
            info!(
                "Dry run for {}: would create {:?} priced {:?}",
                entry_id, names, split
            );
            return Ok(ProcessOutcome::Skipped(SkipReason::DryRun));
        }

        let run_id = Uuid::new_v4();
        self.client
            .set_attribute(entry_id, NAMESPACE, ATTR_INCOMPLETE, &run_id.to_string())
            .await?;

        let synthesizer = ComponentSynthesizer::new(self.client.as_ref(), &self.config);
        let created = synthesizer.create_components(&entry, &names, &split).await?;

        let components: Vec<(String, CatalogEntry)> = names.iter().cloned().zip(created).collect();
        let sync = self.linker.link(&entry, &components);
        self.advance(state, RunState::Linked, entry_id);

        let builder = BundleConfigBuilder::new(self.client.as_ref(), &self.config, &self.tagger);
        let bundle = builder.assemble(&entry, &components, sync, run_id);
        let finalized = builder.persist(&entry, &bundle).await?;
        self.advance(state, RunState::BundleActive, entry_id);

        Ok(ProcessOutcome::Completed(Box::new(ProcessReport {
            original_entry: finalized,
            component_entries: components.into_iter().map(|(_, e)| e).collect(),
            piece_count,
            price_split: split,
            bundle_config: bundle,
        })))
    }

    /// Classification and proposed split for an entry; never mutates.
    pub async fn check_entry(&self, entry_id: &str) -> Result<CheckReport, PipelineError> {
        let entry = self.client.get_entry(entry_id).await?;
        let is_set = self.classifier.is_set(&entry);
        let piece_count = self.classifier.piece_count(&entry);
        let names = self
            .resolver
            .resolve(&entry.title, &entry.description, piece_count);

        let mut already_processed = self.guard.is_marked(&entry);
        if !already_processed && is_set {
            let all_entries = self.client.list_entries().await?;
            already_processed = self
                .guard
                .matches_generated_component(&entry, &all_entries, &names);
        }

        let price_split = match entry.price {
            Some(total) if total > Decimal::ZERO => {
                PriceAllocator::new(self.config.price_ceiling)
                    .allocate(total, piece_count)
                    .unwrap_or_default()
            }
            _ => Vec::new(),
        };

        Ok(CheckReport {
            entry_id: entry.id.clone(),
            title: entry.title.clone(),
            is_set,
            already_processed,
            pipeline_owned: self.tagger.is_created_by_pipeline(&entry),
            piece_count,
            component_names: names,
            price_split,
            tag_preview: self.tagger.safe_tag(&entry, TagRole::Original),
        })
    }

    /// Lists every catalog entry that looks like an unprocessed set.
    pub async fn find_unprocessed_sets(&self) -> Result<Vec<CatalogEntry>, PipelineError> {
        let all_entries = self.client.list_entries().await?;
        let candidates = all_entries
            .iter()
            .filter(|entry| {
                self.classifier.is_set(entry)
                    && !self.guard.is_marked(entry)
                    && !self.tagger.is_created_by_pipeline(entry)
            })
            .filter(|entry| {
                let piece_count = self.classifier.piece_count(entry);
                let names = self
                    .resolver
                    .resolve(&entry.title, &entry.description, piece_count);
                !self
                    .guard
                    .matches_generated_component(entry, &all_entries, &names)
            })
            .cloned()
            .collect::<Vec<_>>();

        debug!(
            "Found {} unprocessed set(s) among {} entries",
            candidates.len(),
            all_entries.len()
        );
        Ok(candidates)
    }

    /// Validates the entry and computes names and prices for its pieces.
    fn plan(
        &self,
        entry: &CatalogEntry,
        piece_count: u32,
    ) -> Result<(Vec<String>, Vec<Decimal>), PipelineError> {
        let total = entry.price.ok_or_else(|| {
            PipelineError::ConfigurationInvalid(format!("entry {} has no price", entry.id))
        })?;
        if entry.variants.is_empty() {
            return Err(PipelineError::ConfigurationInvalid(format!(
                "entry {} has no variants",
                entry.id
            )));
        }

        let names = self
            .resolver
            .resolve(&entry.title, &entry.description, piece_count);
        let split = PriceAllocator::new(self.config.price_ceiling)
            .allocate(total, piece_count)
            .map_err(|e| PipelineError::ConfigurationInvalid(e.to_string()))?;
        Ok((names, split))
    }

    fn advance(&self, state: &mut RunState, to: RunState, entry_id: &str) {
        debug_assert!(state.can_advance_to(to), "{state:?} -> {to:?}");
        debug!("Entry {}: {:?} -> {:?}", entry_id, state, to);
        *state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MockCatalogClient;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn pipeline_with(client: Arc<MockCatalogClient>) -> SetPipeline {
        let config = PipelineConfig::new()
            .with_price_ceiling(dec!(1500))
            .with_create_delay(Duration::ZERO);
        SetPipeline::new(client, config)
    }

    #[tokio::test]
    async fn test_non_set_is_skipped() {
        let client = Arc::new(MockCatalogClient::new());
        client.push_entry(MockCatalogClient::entry_with_sizes(
            "e1",
            "Silk Saree",
            dec!(900),
            &["S"],
        ));
        let pipeline = pipeline_with(client);

        let outcome = pipeline.process_entry("e1").await.unwrap();
        assert!(matches!(
            outcome,
            ProcessOutcome::Skipped(SkipReason::NotASet)
        ));
    }

    #[tokio::test]
    async fn test_missing_price_is_configuration_invalid() {
        let client = Arc::new(MockCatalogClient::new());
        let mut entry = MockCatalogClient::entry_with_sizes("e1", "Linen Set", dec!(900), &["S"]);
        entry.price = None;
        client.push_entry(entry);
        let pipeline = pipeline_with(client);

        assert!(matches!(
            pipeline.process_entry("e1").await,
            Err(PipelineError::ConfigurationInvalid(_))
        ));
    }

    #[tokio::test]
    async fn test_check_entry_does_not_mutate() {
        let client = Arc::new(MockCatalogClient::new());
        client.push_entry(MockCatalogClient::entry_with_sizes(
            "e1",
            "Embroidered Set",
            dec!(1200),
            &["S", "M"],
        ));
        let pipeline = pipeline_with(Arc::clone(&client));

        let report = pipeline.check_entry("e1").await.unwrap();
        assert!(report.is_set);
        assert_eq!(report.piece_count, 2);
        assert_eq!(report.component_names, vec!["Top", "Bottom"]);
        assert_eq!(report.price_split, vec![dec!(600.00), dec!(600.00)]);
        assert!(!report.tag_preview.should_tag);

        // only reads were issued
        for call in client.calls() {
            assert!(call == "get_entry" || call == "list_entries");
        }
    }

    #[tokio::test]
    async fn test_dry_run_stops_before_mutation() {
        let client = Arc::new(MockCatalogClient::new());
        client.push_entry(MockCatalogClient::entry_with_sizes(
            "e1",
            "Embroidered Set",
            dec!(1200),
            &["S"],
        ));
        let config = PipelineConfig::new()
            .with_create_delay(Duration::ZERO)
            .with_dry_run(true);
        let pipeline = SetPipeline::new(Arc::clone(&client) as Arc<dyn CatalogClient>, config);

        let outcome = pipeline.process_entry("e1").await.unwrap();
        assert!(matches!(
            outcome,
            ProcessOutcome::Skipped(SkipReason::DryRun)
        ));
        assert!(client.created_entries().is_empty());
    }
}
