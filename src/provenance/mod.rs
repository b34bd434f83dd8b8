pub mod tagger;

pub use tagger::{ProvenanceTagger, TagDecision, TagRole, NAMESPACE, PROCESSED_TAG};
