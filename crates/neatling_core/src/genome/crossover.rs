use super::topology;
use neatling_data::{Genome, NodeType};
use rand::Rng;

/// Rebuilds `child` from two parents, aligning genes by endpoints and node id.
///
/// The parent with the higher fitness (ties favour `parent1`) contributes every
/// gene; matching genes are taken from either parent with equal chance. A
/// disabled inherited connection is switched back on when the re-enable draw
/// succeeds or the fitter parent has it enabled, unless that would close a
/// cycle in the child. The same cycle check applies to a matching gene taken
/// enabled from the weaker parent while the fitter parent has it disabled.
/// Input nodes of both parents always reach the child.
pub fn crossover_with_rng<R: Rng>(
    child: &mut Genome,
    parent1: &Genome,
    parent2: &Genome,
    reenable_connection_gene_rate: f64,
    rng: &mut R,
) {
    child.clear();

    let (best, other) = if parent1.fitness >= parent2.fitness {
        (parent1, parent2)
    } else {
        (parent2, parent1)
    };

    let mut reenabled = Vec::new();
    for gene in &best.connections {
        let mut child_gene = match other.connection_between(gene.source, gene.target) {
            Some(matching) => {
                if rng.gen::<f64>() < 0.5 {
                    gene.clone()
                } else {
                    matching.clone()
                }
            }
            None => gene.clone(),
        };

        if !child_gene.enabled {
            let is_reenabled = rng.gen::<f64>() <= reenable_connection_gene_rate;
            if is_reenabled || gene.enabled {
                child_gene.enable();
                reenabled.push(child.connections.len());
            }
        } else if !gene.enabled {
            // Enabled only in the weaker parent.
            reenabled.push(child.connections.len());
        }

        child.connections.push(child_gene);
    }

    for node in &best.nodes {
        let child_node = match other.node(node.id) {
            Some(matching) => {
                if rng.gen::<f64>() < 0.5 {
                    node.clone()
                } else {
                    matching.clone()
                }
            }
            None => node.clone(),
        };
        child.nodes.push(child_node);
    }

    for node in other.nodes_of_type(NodeType::Input) {
        if !child.has_node(node.id) {
            child.nodes.push(node.clone());
        }
    }

    for idx in reenabled {
        child.connections[idx].disable();
        let (source, target) = (child.connections[idx].source, child.connections[idx].target);
        if topology::creates_cycle(child, source, target) {
            tracing::debug!(genome = child.id, source, target, "Kept cyclic gene disabled");
        } else {
            child.connections[idx].enable();
        }
    }

    child.sync_innovation_counter();
}
