pub mod error;
pub mod guard;
pub mod orchestrator;
pub mod outcome;

pub use error::PipelineError;
pub use guard::{EntryLock, IdempotencyGuard};
pub use orchestrator::SetPipeline;
pub use outcome::{CheckReport, ProcessOutcome, ProcessReport, RunState, SkipReason};
