pub mod macros;

use neatling_lib::model::config::GenomeConfig;
use neatling_lib::model::genome::{node_with_functions, ConnectionGene, Genome, NodeType};

/// Hand-assembled genomes for scenario tests.
#[allow(dead_code)]
pub struct GenomeBuilder {
    id: u64,
    inputs: Vec<i64>,
    outputs: Vec<i64>,
    genome: Genome,
    fitness: f64,
}

#[allow(dead_code)]
impl GenomeBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            inputs: Vec::new(),
            outputs: Vec::new(),
            genome: Genome::empty(id),
            fitness: 0.0,
        }
    }

    pub fn input(mut self, id: i64) -> Self {
        let node = node_with_functions(id, NodeType::Input, 0.0, "", "").expect("input node");
        self.genome.nodes.push(node);
        self.inputs.push(id);
        self
    }

    pub fn output(mut self, id: i64, bias: f64, activation: &str, aggregation: &str) -> Self {
        let node = node_with_functions(id, NodeType::Output, bias, activation, aggregation)
            .expect("output node");
        self.genome.nodes.push(node);
        self.outputs.push(id);
        self
    }

    pub fn hidden(mut self, id: i64, bias: f64, activation: &str, aggregation: &str) -> Self {
        let node = node_with_functions(id, NodeType::Hidden, bias, activation, aggregation)
            .expect("hidden node");
        self.genome.nodes.push(node);
        self
    }

    pub fn connection(self, innovation: u64, source: i64, target: i64, weight: f64) -> Self {
        self.gene(innovation, source, target, weight, true)
    }

    pub fn disabled(self, innovation: u64, source: i64, target: i64, weight: f64) -> Self {
        self.gene(innovation, source, target, weight, false)
    }

    fn gene(mut self, innovation: u64, source: i64, target: i64, weight: f64, enabled: bool) -> Self {
        self.genome.connections.push(ConnectionGene {
            innovation,
            source,
            target,
            weight,
            enabled,
        });
        self
    }

    pub fn fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn config(&self) -> GenomeConfig {
        GenomeConfig {
            input_keys: self.inputs.clone(),
            output_keys: self.outputs.clone(),
        }
    }

    pub fn build(self) -> Genome {
        let mut genome = Genome::from_parts(self.id, self.genome.nodes, self.genome.connections);
        genome.fitness = self.fitness;
        genome
    }

    pub fn build_with_config(self) -> (Genome, GenomeConfig) {
        let config = self.config();
        (self.build(), config)
    }
}

/// Connection-only genome with the given `(innovation, weight)` genes.
#[allow(dead_code)]
pub fn genes(id: u64, genes: &[(u64, f64)]) -> Genome {
    let connections = genes
        .iter()
        .enumerate()
        .map(|(i, &(innovation, weight))| ConnectionGene {
            innovation,
            source: -(i as i64) - 1,
            target: 0,
            weight,
            enabled: true,
        })
        .collect();
    Genome::from_parts(id, Vec::new(), connections)
}
