pub mod variant_linker;

pub use variant_linker::{MatchKind, SizeSync, VariantLinker, VariantRef, VariantSyncMap};
