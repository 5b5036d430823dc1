//! Plain data types for NEAT genomes.
//!
//! Nothing in here draws random numbers or runs an evolutionary operator; the
//! logic lives in `neatling_core`. Types are serde-serializable so genomes can
//! be handed to renderers and persistence layers outside the core.

pub mod data;

pub use data::genome::{
    Activation, Aggregation, ConnectionGene, Genome, NodeGene, NodeType, ParseFunctionError,
};
