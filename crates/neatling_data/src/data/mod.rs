//! Core data structures for neatling genomes.

pub mod genome;
