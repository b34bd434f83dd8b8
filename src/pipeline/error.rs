use crate::catalog::CatalogError;
use thiserror::Error;

/// Failures that abort a pipeline run.
///
/// Classification skips are not failures; they are reported through
/// [`super::ProcessOutcome::Skipped`]. The pipeline performs no internal
/// retries; retry policy belongs to the job runner.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A catalog client call failed; remaining steps are aborted
    #[error("Catalog request failed: {0}")]
    Upstream(#[from] CatalogError),

    /// The entry cannot be processed as configured (missing price, zero
    /// variants, unresolvable piece count)
    #[error("Invalid entry configuration: {0}")]
    ConfigurationInvalid(String),

    /// One of the component creation calls failed mid-loop. Components
    /// already created are left in place; the parent keeps its incomplete
    /// marker for external reconciliation.
    #[error("Component creation aborted after {}/{expected} pieces: {source}", created.len())]
    PartialCreation {
        created: Vec<String>,
        expected: usize,
        source: CatalogError,
    },
}
