//! # Neatling Core
//!
//! The evolutionary algorithms of NeuroEvolution of Augmenting Topologies.
//!
//! This crate contains:
//! - Genome construction and the structural mutation operators
//! - Innovation numbering shared across a generation
//! - Crossover aligned by innovation number and the genetic distance metric
//! - Speciation, stagnation pruning, fitness sharing and offspring quotas
//! - The feed-forward network compiler
//!
//! Genomes themselves live in `neatling_data`; the operators are provided by the
//! [`GenomeLogic`] trait.
//!
//! ## Example
//!
//! ```
//! use neatling_core::config::GenomeConfig;
//! use neatling_core::innovation::InnovationTracker;
//! use neatling_core::network::FeedForwardNetwork;
//! use neatling_core::GenomeLogic;
//! use neatling_data::Genome;
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//! let mut tracker = InnovationTracker::default();
//! let config = GenomeConfig::with_counts(2, 1);
//!
//! let genome = Genome::new_with_rng(0, &config, &mut tracker, &mut rng).unwrap();
//! let network = FeedForwardNetwork::create(&genome, &config).unwrap();
//! let outputs = network.activate(&[0.0, 1.0]).unwrap();
//! assert_eq!(outputs.len(), 1);
//! ```

/// Configuration for genome shape, mutation, speciation and evolution runs
pub mod config;
/// Error types
pub mod error;
/// Genome operators: mutation, crossover, distance
pub mod genome;
/// Innovation number assignment
pub mod innovation;
/// Structured logging setup
pub mod logging;
/// Genome to network compilation and evaluation
pub mod network;
/// Speciation and offspring allocation
pub mod species;

pub use config::NeatConfig;
pub use error::{NeatError, Result};
pub use genome::{GenomeLogic, MutationKind};
pub use innovation::{InnovationMode, InnovationTracker};
pub use logging::init_logging;
pub use network::FeedForwardNetwork;
pub use neatling_data::{ConnectionGene, Genome, NodeGene, NodeType};
pub use species::Species;
