pub mod crossover;
pub mod distance;
pub mod genes;
pub mod mutation;
pub mod topology;

use crate::config::{DistanceCoefficients, GenomeConfig, MutationConfig};
use crate::error::{NeatError, Result};
use crate::innovation::InnovationTracker;
pub use genes::{new_connection_with_rng, new_node_with_rng, node_with_functions};
pub use mutation::MutationKind;
pub use neatling_data::{ConnectionGene, Genome, NodeGene, NodeType};
use rand::Rng;

/// Evolutionary operators on a [`Genome`].
pub trait GenomeLogic {
    fn new_with_rng<R: Rng>(
        id: u64,
        config: &GenomeConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Self>
    where
        Self: Sized;

    fn mutate<R: Rng>(
        &mut self,
        config: &MutationConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<MutationKind>;

    fn mutate_weight_and_bias<R: Rng>(&mut self, config: &MutationConfig, rng: &mut R);

    fn mutate_add_node<R: Rng>(
        &mut self,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Option<i64>>;

    fn mutate_add_connection<R: Rng>(
        &mut self,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Option<u64>;

    fn mutate_change_activation_aggregation<R: Rng>(
        &mut self,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<()>;

    #[must_use]
    fn creates_cycle(&self, source: i64, target: i64) -> bool;

    fn crossover_with_rng<R: Rng>(
        &mut self,
        parent1: &Genome,
        parent2: &Genome,
        reenable_connection_gene_rate: f64,
        rng: &mut R,
    );

    #[must_use]
    fn distance(&self, other: &Genome, coefficients: &DistanceCoefficients) -> f64;

    fn require_node(&self, id: i64) -> Result<&NodeGene>;
    fn require_connection(&self, source: i64, target: i64) -> Result<&ConnectionGene>;
}

impl GenomeLogic for Genome {
    fn new_with_rng<R: Rng>(
        id: u64,
        config: &GenomeConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Self> {
        topology::create_genome_with_rng(id, config, tracker, rng)
    }

    fn mutate<R: Rng>(
        &mut self,
        config: &MutationConfig,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<MutationKind> {
        mutation::mutate(self, config, tracker, rng)
    }

    fn mutate_weight_and_bias<R: Rng>(&mut self, config: &MutationConfig, rng: &mut R) {
        mutation::mutate_weight_and_bias(self, config, rng)
    }

    fn mutate_add_node<R: Rng>(
        &mut self,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Result<Option<i64>> {
        mutation::mutate_add_node(self, tracker, rng)
    }

    fn mutate_add_connection<R: Rng>(
        &mut self,
        tracker: &mut InnovationTracker,
        rng: &mut R,
    ) -> Option<u64> {
        mutation::mutate_add_connection(self, tracker, rng)
    }

    fn mutate_change_activation_aggregation<R: Rng>(
        &mut self,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Result<()> {
        mutation::mutate_change_activation_aggregation(self, config, rng)
    }

    fn creates_cycle(&self, source: i64, target: i64) -> bool {
        topology::creates_cycle(self, source, target)
    }

    fn crossover_with_rng<R: Rng>(
        &mut self,
        parent1: &Genome,
        parent2: &Genome,
        reenable_connection_gene_rate: f64,
        rng: &mut R,
    ) {
        crossover::crossover_with_rng(self, parent1, parent2, reenable_connection_gene_rate, rng)
    }

    fn distance(&self, other: &Genome, coefficients: &DistanceCoefficients) -> f64 {
        distance::distance(self, other, coefficients)
    }

    fn require_node(&self, id: i64) -> Result<&NodeGene> {
        self.node(id).ok_or(NeatError::NodeNotFound(id))
    }

    fn require_connection(&self, source: i64, target: i64) -> Result<&ConnectionGene> {
        self.connection_between(source, target)
            .ok_or(NeatError::ConnectionNotFound {
                from: source,
                to: target,
            })
    }
}
