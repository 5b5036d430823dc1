use super::functions::{ActivationFn, AggregationFn, FunctionRegistry};
use super::layers::feed_forward_layers;
use crate::config::GenomeConfig;
use crate::error::{NeatError, Result};
use crate::genome::GenomeLogic;
use neatling_data::Genome;
use std::collections::HashMap;
use std::fmt;

/// Evaluation step for one node.
#[derive(Clone)]
pub struct NodeEval {
    pub node: i64,
    pub activation: ActivationFn,
    pub aggregation: AggregationFn,
    pub bias: f64,
    pub response: f64,
    /// Incoming `(source, weight)` pairs.
    pub links: Vec<(i64, f64)>,
}

impl fmt::Debug for NodeEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeEval")
            .field("node", &self.node)
            .field("bias", &self.bias)
            .field("response", &self.response)
            .field("links", &self.links)
            .finish_non_exhaustive()
    }
}

/// A genome compiled into a fixed evaluation plan.
///
/// The plan is a snapshot: recompile after the genome's connections or enabled
/// flags change.
#[derive(Clone, Debug)]
pub struct FeedForwardNetwork {
    input_nodes: Vec<i64>,
    output_nodes: Vec<i64>,
    node_evals: Vec<NodeEval>,
    layers: Vec<Vec<i64>>,
}

impl FeedForwardNetwork {
    /// Compiles `genome` with the built-in activation and aggregation functions.
    pub fn create(genome: &Genome, config: &GenomeConfig) -> Result<Self> {
        Self::create_with_registry(genome, config, &FunctionRegistry::default())
    }

    pub fn create_with_registry(
        genome: &Genome,
        config: &GenomeConfig,
        registry: &FunctionRegistry,
    ) -> Result<Self> {
        let connections: Vec<(i64, i64, f64)> = genome
            .enabled_connections()
            .map(|c| (c.source, c.target, c.weight))
            .collect();
        let edges: Vec<(i64, i64)> = connections.iter().map(|&(a, b, _)| (a, b)).collect();

        let layers = feed_forward_layers(&config.input_keys, &config.output_keys, &edges);

        let mut node_evals = Vec::new();
        for &node_id in layers.iter().flatten() {
            let node = genome.require_node(node_id)?;
            let activation = node.activation.ok_or_else(|| {
                NeatError::invalid_configuration(format!("node {node_id} has no activation"))
            })?;
            let aggregation = node.aggregation.ok_or_else(|| {
                NeatError::invalid_configuration(format!("node {node_id} has no aggregation"))
            })?;

            let links = connections
                .iter()
                .filter(|&&(_, target, _)| target == node_id)
                .map(|&(source, _, weight)| (source, weight))
                .collect();

            node_evals.push(NodeEval {
                node: node_id,
                activation: registry.activation(activation)?,
                aggregation: registry.aggregation(aggregation)?,
                bias: node.bias,
                response: node.response,
                links,
            });
        }

        Ok(Self {
            input_nodes: config.input_keys.clone(),
            output_nodes: config.output_keys.clone(),
            node_evals,
            layers,
        })
    }

    /// Runs one forward pass and returns the outputs in configured order.
    pub fn activate(&self, inputs: &[f64]) -> Result<Vec<f64>> {
        if inputs.len() != self.input_nodes.len() {
            return Err(NeatError::InputLengthMismatch {
                expected: self.input_nodes.len(),
                got: inputs.len(),
            });
        }

        let mut values: HashMap<i64, f64> = self
            .output_nodes
            .iter()
            .map(|&k| (k, 0.0))
            .chain(self.input_nodes.iter().copied().zip(inputs.iter().copied()))
            .collect();

        let mut weighted = Vec::new();
        for eval in &self.node_evals {
            weighted.clear();
            weighted.extend(
                eval.links
                    .iter()
                    .map(|&(source, weight)| values.get(&source).copied().unwrap_or(0.0) * weight),
            );
            let aggregate = (eval.aggregation)(&weighted);
            let value = (eval.activation)(eval.bias + eval.response * aggregate);
            values.insert(eval.node, value);
        }

        Ok(self
            .output_nodes
            .iter()
            .map(|k| values.get(k).copied().unwrap_or(0.0))
            .collect())
    }

    /// Node ids grouped by evaluation layer.
    #[must_use]
    pub fn layers(&self) -> &[Vec<i64>] {
        &self.layers
    }

    #[must_use]
    pub fn node_evals(&self) -> &[NodeEval] {
        &self.node_evals
    }

    #[must_use]
    pub fn input_nodes(&self) -> &[i64] {
        &self.input_nodes
    }

    #[must_use]
    pub fn output_nodes(&self) -> &[i64] {
        &self.output_nodes
    }
}
