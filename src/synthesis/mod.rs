pub mod synthesizer;

pub use synthesizer::ComponentSynthesizer;
