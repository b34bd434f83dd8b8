pub mod name_resolver;
pub mod set_classifier;

pub use name_resolver::ComponentNameResolver;
pub use set_classifier::SetClassifier;
