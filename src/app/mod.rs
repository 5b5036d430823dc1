pub mod evolution;

pub use evolution::{Evolution, GenerationReport};
