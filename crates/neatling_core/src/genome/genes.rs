use crate::error::Result;
use neatling_data::{Activation, Aggregation, ConnectionGene, NodeGene, NodeType};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draws a name uniformly from `names`.
fn choose_name<R: Rng>(names: &'static [&'static str], rng: &mut R) -> &'static str {
    names.choose(rng).copied().unwrap_or_default()
}

pub(crate) fn random_activation<R: Rng>(rng: &mut R) -> Result<Activation> {
    Ok(choose_name(&Activation::NAMES, rng).parse()?)
}

pub(crate) fn random_aggregation<R: Rng>(rng: &mut R) -> Result<Aggregation> {
    Ok(choose_name(&Aggregation::NAMES, rng).parse()?)
}

/// Creates a node with a uniform bias in `[-1, 1]`.
///
/// Hidden and output nodes also draw an activation and an aggregation; input
/// nodes carry neither.
pub fn new_node_with_rng<R: Rng>(id: i64, node_type: NodeType, rng: &mut R) -> Result<NodeGene> {
    let bias = rng.gen_range(-1.0..=1.0);
    let (activation, aggregation) = match node_type {
        NodeType::Input => (None, None),
        NodeType::Hidden | NodeType::Output => {
            let activation = random_activation(rng)?;
            let aggregation = random_aggregation(rng)?;
            (Some(activation), Some(aggregation))
        }
    };

    Ok(NodeGene {
        id,
        node_type,
        bias,
        response: 1.0,
        activation,
        aggregation,
    })
}

/// Creates a node with explicit function names, rejecting names outside the vocabulary.
pub fn node_with_functions(
    id: i64,
    node_type: NodeType,
    bias: f64,
    activation: &str,
    aggregation: &str,
) -> Result<NodeGene> {
    let (activation, aggregation) = match node_type {
        NodeType::Input => (None, None),
        NodeType::Hidden | NodeType::Output => (
            Some(activation.parse::<Activation>()?),
            Some(aggregation.parse::<Aggregation>()?),
        ),
    };

    Ok(NodeGene {
        id,
        node_type,
        bias,
        response: 1.0,
        activation,
        aggregation,
    })
}

/// Creates an enabled connection with a uniform weight in `[-1, 1]`.
pub fn new_connection_with_rng<R: Rng>(
    innovation: u64,
    source: i64,
    target: i64,
    rng: &mut R,
) -> ConnectionGene {
    ConnectionGene {
        innovation,
        source,
        target,
        weight: rng.gen_range(-1.0..=1.0),
        enabled: true,
    }
}
