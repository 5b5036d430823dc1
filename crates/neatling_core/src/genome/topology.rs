use super::genes::{new_connection_with_rng, new_node_with_rng};
use crate::config::GenomeConfig;
use crate::error::Result;
use crate::innovation::InnovationTracker;
use neatling_data::{Genome, NodeType};
use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use rand::Rng;

/// Builds a genome with every configured input wired to every output.
///
/// Nodes are created first (inputs, then outputs), then connections in
/// input-major order, so a seeded generator always yields the same genome.
pub fn create_genome_with_rng<R: Rng>(
    id: u64,
    config: &GenomeConfig,
    tracker: &mut InnovationTracker,
    rng: &mut R,
) -> Result<Genome> {
    let mut genome = Genome::empty(id);

    for &key in &config.input_keys {
        genome.nodes.push(new_node_with_rng(key, NodeType::Input, rng)?);
    }
    for &key in &config.output_keys {
        genome.nodes.push(new_node_with_rng(key, NodeType::Output, rng)?);
    }

    for &input in &config.input_keys {
        for &output in &config.output_keys {
            let innovation = tracker.next(&mut genome, input, output);
            genome
                .connections
                .push(new_connection_with_rng(innovation, input, output, rng));
        }
    }

    Ok(genome)
}

/// Directed graph over the enabled connections, keyed by node id.
pub fn enabled_graph(genome: &Genome) -> DiGraphMap<i64, ()> {
    let mut graph = DiGraphMap::new();
    for node in &genome.nodes {
        graph.add_node(node.id);
    }
    for conn in genome.enabled_connections() {
        graph.add_edge(conn.source, conn.target, ());
    }
    graph
}

/// Whether adding `source -> target` to the enabled subgraph closes a cycle anywhere.
pub fn creates_cycle(genome: &Genome, source: i64, target: i64) -> bool {
    if source == target {
        return true;
    }
    let mut graph = enabled_graph(genome);
    graph.add_edge(source, target, ());
    is_cyclic_directed(&graph)
}

pub fn is_acyclic(genome: &Genome) -> bool {
    !is_cyclic_directed(&enabled_graph(genome))
}
