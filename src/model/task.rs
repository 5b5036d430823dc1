//! Fitness tasks that score compiled networks.

use anyhow::Result;
use neatling_core::config::NeatConfig;
use neatling_core::network::FeedForwardNetwork;

/// Assigns a raw fitness to a compiled network. Higher is better.
pub trait FitnessTask {
    fn evaluate(&self, network: &FeedForwardNetwork) -> Result<f64>;
}

/// Truth table of two-input exclusive or.
pub const XOR_CASES: [([f64; 2], f64); 4] = [
    ([0.0, 0.0], 0.0),
    ([0.0, 1.0], 1.0),
    ([1.0, 0.0], 1.0),
    ([1.0, 1.0], 0.0),
];

/// Highest fitness an [`XorTask`] can award.
pub const XOR_MAX_FITNESS: f64 = 4.0;

/// Scores a two-input, one-output network on [`XOR_CASES`].
///
/// Fitness is `4 - sum((output - expected)^2)`, floored at 0 since `tanh`
/// outputs can miss a case by up to 2.
#[derive(Clone, Copy, Debug, Default)]
pub struct XorTask;

impl XorTask {
    /// Configuration suited to XOR: two inputs, one output, stop at fitness 3.9.
    #[must_use]
    pub fn config() -> NeatConfig {
        let mut config = NeatConfig::default();
        config.evolution.fitness_threshold = Some(3.9);
        config
    }
}

impl FitnessTask for XorTask {
    fn evaluate(&self, network: &FeedForwardNetwork) -> Result<f64> {
        let mut fitness = XOR_MAX_FITNESS;
        for (inputs, expected) in XOR_CASES {
            let outputs = network.activate(&inputs)?;
            let output = outputs.first().copied().unwrap_or(0.0);
            fitness -= (output - expected).powi(2);
        }
        Ok(fitness.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neatling_core::config::GenomeConfig;
    use neatling_core::genome::node_with_functions;
    use neatling_data::{ConnectionGene, Genome, NodeType};

    fn xor_network(weights: [f64; 2], bias: f64) -> FeedForwardNetwork {
        let genome = Genome::from_parts(
            0,
            vec![
                node_with_functions(-1, NodeType::Input, 0.0, "", "").expect("node"),
                node_with_functions(-2, NodeType::Input, 0.0, "", "").expect("node"),
                node_with_functions(0, NodeType::Output, bias, "sigmoid", "sum").expect("node"),
            ],
            vec![
                ConnectionGene {
                    innovation: 1,
                    source: -1,
                    target: 0,
                    weight: weights[0],
                    enabled: true,
                },
                ConnectionGene {
                    innovation: 2,
                    source: -2,
                    target: 0,
                    weight: weights[1],
                    enabled: true,
                },
            ],
        );
        FeedForwardNetwork::create(&genome, &GenomeConfig::default()).expect("compile")
    }

    #[test]
    fn test_constant_half_output_scores_three() {
        // sigmoid(0) = 0.5 on every case: 4 - 4 * 0.25
        let network = xor_network([0.0, 0.0], 0.0);
        let fitness = XorTask.evaluate(&network).expect("evaluate");
        assert!((fitness - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_fitness_bounded() {
        let network = xor_network([5.0, -3.0], 1.0);
        let fitness = XorTask.evaluate(&network).expect("evaluate");
        assert!(fitness > 0.0 && fitness <= XOR_MAX_FITNESS);
    }

    #[test]
    fn test_wrong_input_count_is_an_error() {
        let network =
            FeedForwardNetwork::create(&Genome::empty(0), &GenomeConfig::with_counts(3, 1))
                .expect("compile");
        assert!(XorTask.evaluate(&network).is_err());
    }

    #[test]
    fn test_xor_config_validates() {
        let config = XorTask::config();
        assert!(config.validate().is_ok());
        assert_eq!(config.genome.input_keys.len(), 2);
        assert_eq!(config.genome.output_keys.len(), 1);
    }
}
