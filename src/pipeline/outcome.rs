//! Structured run outcomes
//!
//! A skip is a normal outcome, not an error: the entry was fetched and
//! examined but no mutation was warranted.

use crate::bundle::BundleConfiguration;
use crate::catalog::CatalogEntry;
use crate::provenance::TagDecision;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Why a run declined to process an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotASet,
    AlreadyProcessed,
    PipelineOwned,
    AlreadyRunning,
    DryRun,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::NotASet => "not a set",
            SkipReason::AlreadyProcessed => "already processed",
            SkipReason::PipelineOwned => "pipeline-owned entry",
            SkipReason::AlreadyRunning => "run already in flight for this entry",
            SkipReason::DryRun => "dry run",
        };
        f.write_str(text)
    }
}

/// Per-entry run state. A run either reaches `BundleActive` or terminates
/// in `Failed`; there is no automated way back to `Unprocessed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Unprocessed,
    Processing,
    Linked,
    BundleActive,
    Failed,
}

impl RunState {
    /// Valid forward transitions. `Failed` is reachable from any state that
    /// has not yet reached a terminal; neither terminal advances further.
    pub fn can_advance_to(self, next: RunState) -> bool {
        use RunState::*;
        matches!(
            (self, next),
            (Unprocessed, Processing) | (Processing, Linked) | (Linked, BundleActive)
        ) || (next == Failed && !matches!(self, BundleActive | Failed))
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::BundleActive | RunState::Failed)
    }
}

/// Everything a completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct ProcessReport {
    pub original_entry: CatalogEntry,
    pub component_entries: Vec<CatalogEntry>,
    pub piece_count: u32,
    pub price_split: Vec<Decimal>,
    pub bundle_config: BundleConfiguration,
}

/// Result of a processing run
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum ProcessOutcome {
    Completed(Box<ProcessReport>),
    Skipped(SkipReason),
}

/// Classification and proposed split for an entry, with zero mutation.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub entry_id: String,
    pub title: String,
    pub is_set: bool,
    pub already_processed: bool,
    pub pipeline_owned: bool,
    pub piece_count: u32,
    pub component_names: Vec<String>,
    /// Empty when the entry has no usable price
    pub price_split: Vec<Decimal>,
    /// Preview of the tag decision the pipeline would take, never applied
    pub tag_preview: TagDecision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::AlreadyProcessed.to_string(), "already processed");
        assert_eq!(SkipReason::NotASet.to_string(), "not a set");
    }

    #[test]
    fn test_skip_reason_serializes_snake_case() {
        let json = serde_json::to_string(&SkipReason::PipelineOwned).unwrap();
        assert_eq!(json, "\"pipeline_owned\"");
    }

    #[test]
    fn test_run_advances_along_the_happy_path() {
        assert!(RunState::Unprocessed.can_advance_to(RunState::Processing));
        assert!(RunState::Processing.can_advance_to(RunState::Linked));
        assert!(RunState::Linked.can_advance_to(RunState::BundleActive));
        assert!(!RunState::Unprocessed.can_advance_to(RunState::Linked));
    }

    #[test]
    fn test_failed_is_reachable_from_every_live_state() {
        for state in [RunState::Unprocessed, RunState::Processing, RunState::Linked] {
            assert!(state.can_advance_to(RunState::Failed));
        }
    }

    #[test]
    fn test_terminals_do_not_advance() {
        for terminal in [RunState::BundleActive, RunState::Failed] {
            assert!(terminal.is_terminal());
            for next in [
                RunState::Unprocessed,
                RunState::Processing,
                RunState::Linked,
                RunState::BundleActive,
                RunState::Failed,
            ] {
                assert!(!terminal.can_advance_to(next));
            }
        }
    }
}
