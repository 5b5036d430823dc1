use super::genes::{new_connection_with_rng, new_node_with_rng, random_activation, random_aggregation};
use super::topology;
use crate::config::MutationConfig;
use crate::error::Result;
use crate::innovation::InnovationTracker;
use neatling_data::{Genome, NodeType};
use rand::seq::SliceRandom;
use rand::Rng;

/// Which branch of [`mutate`] fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    WeightAndBias,
    AddNode,
    AddConnection,
    /// No structural or weight branch was selected.
    None,
}

/// Nudges a value by up to `power`, in either direction with equal chance.
/// Draw order: replace-or-keep, sign, magnitude.
fn perturb<R: Rng>(value: &mut f64, power: f64, rng: &mut R) {
    if !rng.gen_bool(0.5) {
        return;
    }
    let add = rng.gen_bool(0.5);
    let delta = rng.gen_range(0.0..=power);
    if add {
        *value += delta;
    } else {
        *value -= delta;
    }
}

pub fn mutate_weight_and_bias<R: Rng>(genome: &mut Genome, config: &MutationConfig, rng: &mut R) {
    let power = config.perturbation_power;
    for node in &mut genome.nodes {
        perturb(&mut node.bias, power, rng);
    }
    for conn in &mut genome.connections {
        perturb(&mut conn.weight, power, rng);
    }
}

/// Splits a random enabled connection with a new hidden node.
///
/// Returns the new node id, or `None` when no connection is enabled.
pub fn mutate_add_node<R: Rng>(
    genome: &mut Genome,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Result<Option<i64>> {
    let enabled: Vec<usize> = genome
        .connections
        .iter()
        .enumerate()
        .filter(|(_, c)| c.enabled)
        .map(|(idx, _)| idx)
        .collect();

    let Some(&idx) = enabled.choose(rng) else {
        return Ok(None);
    };

    genome.connections[idx].disable();
    let source = genome.connections[idx].source;
    let target = genome.connections[idx].target;
    let weight = genome.connections[idx].weight;

    let new_id = genome.next_node_id();
    genome
        .nodes
        .push(new_node_with_rng(new_id, NodeType::Hidden, rng)?);

    let innovation = tracker.next(genome, source, new_id);
    let mut incoming = new_connection_with_rng(innovation, source, new_id, rng);
    incoming.weight = weight;
    genome.connections.push(incoming);

    let innovation = tracker.next(genome, new_id, target);
    let mut outgoing = new_connection_with_rng(innovation, new_id, target, rng);
    outgoing.weight = 1.0;
    genome.connections.push(outgoing);

    tracing::debug!(
        genome = genome.id,
        node = new_id,
        split_from = source,
        split_to = target,
        "Added hidden node"
    );
    Ok(Some(new_id))
}

/// Every `(source, target)` pair a new connection could join.
pub fn connection_candidates(genome: &Genome) -> Vec<(i64, i64)> {
    let mut candidates = Vec::new();
    for source in genome.nodes.iter().filter(|n| n.node_type != NodeType::Output) {
        for target in genome
            .nodes
            .iter()
            .filter(|n| n.id != source.id && n.node_type != NodeType::Input)
        {
            if genome.connection_between(source.id, target.id).is_none() {
                candidates.push((source.id, target.id));
            }
        }
    }
    candidates
}

/// Adds one random new connection unless it would close a cycle.
///
/// Returns the new innovation number, or `None` when no candidate exists or the
/// drawn candidate was rejected.
pub fn mutate_add_connection<R: Rng>(
    genome: &mut Genome,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Option<u64> {
    let candidates = connection_candidates(genome);
    let &(source, target) = candidates.choose(rng)?;

    if topology::creates_cycle(genome, source, target) {
        tracing::debug!(genome = genome.id, source, target, "Rejected cyclic connection");
        return None;
    }

    let innovation = tracker.next(genome, source, target);
    genome
        .connections
        .push(new_connection_with_rng(innovation, source, target, rng));
    tracing::debug!(genome = genome.id, source, target, innovation, "Added connection");
    Some(innovation)
}

/// Redraws activation and aggregation of hidden nodes only.
pub fn mutate_change_activation_aggregation<R: Rng>(
    genome: &mut Genome,
    config: &MutationConfig,
    rng: &mut R,
) -> Result<()> {
    for node in genome
        .nodes
        .iter_mut()
        .filter(|n| n.node_type == NodeType::Hidden)
    {
        if rng.gen::<f64>() < config.activation_mutation_rate {
            node.activation = Some(random_activation(rng)?);
        }
        if rng.gen::<f64>() < config.aggregation_mutation_rate {
            node.aggregation = Some(random_aggregation(rng)?);
        }
    }
    Ok(())
}

/// Per-generation mutation.
///
/// At most one of weight/bias, add-node or add-connection fires, each tried only
/// when the previous draw missed. Activation/aggregation mutation always runs last.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    config: &MutationConfig,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Result<MutationKind> {
    let kind = if rng.gen::<f64>() < config.weight_mutation_prob {
        mutate_weight_and_bias(genome, config, rng);
        MutationKind::WeightAndBias
    } else if rng.gen::<f64>() < config.add_node_prob {
        mutate_add_node(genome, tracker, rng)?;
        MutationKind::AddNode
    } else if rng.gen::<f64>() < config.add_connection_prob {
        mutate_add_connection(genome, tracker, rng);
        MutationKind::AddConnection
    } else {
        MutationKind::None
    };

    mutate_change_activation_aggregation(genome, config, rng)?;
    Ok(kind)
}
