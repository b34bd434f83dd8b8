pub mod builder;
pub mod config;

pub use builder::BundleConfigBuilder;
pub use config::{BundleConfiguration, BundlePiece, CompactPiece, ConfigSummary};
