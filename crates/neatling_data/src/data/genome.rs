use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raised when an activation or aggregation name is outside the fixed vocabulary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} function: {name}")]
pub struct ParseFunctionError {
    pub kind: &'static str,
    pub name: String,
}

/// Role of a node within the network.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Receives one entry of the caller's input vector.
    Input,
    /// Inserted by structural mutation.
    Hidden,
    /// Produces one entry of the network's output vector.
    Output,
}

/// Unary activation applied after aggregation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    Sigmoid,
    Tanh,
}

impl Activation {
    pub const NAMES: [&'static str; 2] = ["sigmoid", "tanh"];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sigmoid => "sigmoid",
            Self::Tanh => "tanh",
        }
    }
}

impl FromStr for Activation {
    type Err = ParseFunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sigmoid" => Ok(Self::Sigmoid),
            "tanh" => Ok(Self::Tanh),
            other => Err(ParseFunctionError {
                kind: "activation",
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reduction over the weighted inputs of a node.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Max,
}

impl Aggregation {
    pub const NAMES: [&'static str; 2] = ["sum", "max"];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Max => "max",
        }
    }
}

impl FromStr for Aggregation {
    type Err = ParseFunctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Self::Sum),
            "max" => Ok(Self::Max),
            other => Err(ParseFunctionError {
                kind: "aggregation",
                name: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single neuron.
///
/// Ids follow a fixed convention: negative for inputs, small non-negative for
/// outputs, larger positive for hidden nodes in creation order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct NodeGene {
    /// Node identifier.
    pub id: i64,
    /// Role of the node.
    pub node_type: NodeType,
    /// Additive bias.
    pub bias: f64,
    /// Gain applied to the aggregated input.
    pub response: f64,
    /// Activation function; `None` for input nodes.
    pub activation: Option<Activation>,
    /// Aggregation function; `None` for input nodes.
    pub aggregation: Option<Aggregation>,
}

/// A weighted edge tagged with its historical marker.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionGene {
    /// Innovation number.
    pub innovation: u64,
    /// Source node id.
    pub source: i64,
    /// Target node id.
    pub target: i64,
    /// Edge weight.
    pub weight: f64,
    /// Whether the edge takes part in evaluation.
    pub enabled: bool,
}

impl ConnectionGene {
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// True when this gene joins exactly `source -> target`.
    #[must_use]
    pub fn is_valid(&self, source: i64, target: i64) -> bool {
        self.source == source && self.target == target
    }
}

/// A variable-topology feed-forward network encoding.
///
/// `fitness` and `adjusted_fitness` are written by callers; the core never
/// computes fitness itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Genome {
    /// Genome identifier.
    pub id: u64,
    /// All node genes.
    pub nodes: Vec<NodeGene>,
    /// All connection genes.
    pub connections: Vec<ConnectionGene>,
    /// Raw fitness assigned by the evaluator.
    pub fitness: f64,
    /// Fitness after sharing within the species.
    pub adjusted_fitness: f64,
    /// Species this genome was last assigned to.
    pub species_id: Option<usize>,
    innovation_counter: u64,
}

impl Genome {
    /// A genome with no genes.
    #[must_use]
    pub fn empty(id: u64) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            connections: Vec::new(),
            fitness: 0.0,
            adjusted_fitness: 0.0,
            species_id: None,
            innovation_counter: 0,
        }
    }

    /// Assembles a genome from existing genes. The local innovation counter
    /// starts at the highest marker present.
    #[must_use]
    pub fn from_parts(id: u64, nodes: Vec<NodeGene>, connections: Vec<ConnectionGene>) -> Self {
        let mut genome = Self::empty(id);
        genome.nodes = nodes;
        genome.connections = connections;
        genome.innovation_counter = genome.max_innovation().unwrap_or(0);
        genome
    }

    /// Drops every gene and resets the local innovation counter.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.connections.clear();
        self.innovation_counter = 0;
    }

    #[must_use]
    pub fn innovation_counter(&self) -> u64 {
        self.innovation_counter
    }

    /// Raises the local counter to at least the highest marker present.
    pub fn sync_innovation_counter(&mut self) {
        let max = self.max_innovation().unwrap_or(0);
        self.innovation_counter = self.innovation_counter.max(max);
    }

    /// Bumps the genome-local counter and returns the new marker.
    pub fn next_local_innovation(&mut self) -> u64 {
        self.innovation_counter += 1;
        self.innovation_counter
    }

    #[must_use]
    pub fn node(&self, id: i64) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: i64) -> Option<&mut NodeGene> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    #[must_use]
    pub fn has_node(&self, id: i64) -> bool {
        self.node(id).is_some()
    }

    #[must_use]
    pub fn connection_between(&self, source: i64, target: i64) -> Option<&ConnectionGene> {
        self.connections.iter().find(|c| c.is_valid(source, target))
    }

    pub fn connection_between_mut(
        &mut self,
        source: i64,
        target: i64,
    ) -> Option<&mut ConnectionGene> {
        self.connections.iter_mut().find(|c| c.is_valid(source, target))
    }

    #[must_use]
    pub fn connection_by_innovation(&self, innovation: u64) -> Option<&ConnectionGene> {
        self.connections.iter().find(|c| c.innovation == innovation)
    }

    #[must_use]
    pub fn max_innovation(&self) -> Option<u64> {
        self.connections.iter().map(|c| c.innovation).max()
    }

    pub fn enabled_connections(&self) -> impl Iterator<Item = &ConnectionGene> {
        self.connections.iter().filter(|c| c.enabled)
    }

    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &NodeGene> {
        self.nodes.iter().filter(move |n| n.node_type == node_type)
    }

    /// Identifier for the next hidden node: one past every id in use.
    #[must_use]
    pub fn next_node_id(&self) -> i64 {
        self.nodes.iter().map(|n| n.id).max().unwrap_or(-1).max(0) + 1
    }

    /// Serializes the genome to a hex-encoded JSON string.
    pub fn to_hex(&self) -> anyhow::Result<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| anyhow::anyhow!("Failed to serialize genome: {}", e))?;
        Ok(hex::encode(bytes))
    }

    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes =
            hex::decode(hex_str).map_err(|e| anyhow::anyhow!("Invalid hex encoding: {}", e))?;

        if bytes.is_empty() {
            return Err(anyhow::anyhow!("Empty hex string"));
        }

        let genome = serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize genome: {}", e))?;
        Ok(genome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, node_type: NodeType) -> NodeGene {
        NodeGene {
            id,
            node_type,
            bias: 0.0,
            response: 1.0,
            activation: None,
            aggregation: None,
        }
    }

    fn conn(innovation: u64, source: i64, target: i64) -> ConnectionGene {
        ConnectionGene {
            innovation,
            source,
            target,
            weight: 0.5,
            enabled: true,
        }
    }

    #[test]
    fn test_function_names_parse() {
        for name in Activation::NAMES {
            let parsed: Activation = name.parse().expect("vocabulary name should parse");
            assert_eq!(parsed.name(), name);
        }
        for name in Aggregation::NAMES {
            let parsed: Aggregation = name.parse().expect("vocabulary name should parse");
            assert_eq!(parsed.name(), name);
        }
        let err = "relu".parse::<Activation>().unwrap_err();
        assert_eq!(err.kind, "activation");
        assert!("mean".parse::<Aggregation>().is_err());
    }

    #[test]
    fn test_connection_toggle_and_match() {
        let mut c = conn(1, -1, 0);
        c.disable();
        assert!(!c.enabled);
        c.enable();
        assert!(c.enabled);
        assert!(c.is_valid(-1, 0));
        assert!(!c.is_valid(0, -1));
    }

    #[test]
    fn test_lookups_report_absence() {
        let genome = Genome::from_parts(
            7,
            vec![node(-1, NodeType::Input), node(0, NodeType::Output)],
            vec![conn(3, -1, 0)],
        );
        assert!(genome.node(-1).is_some());
        assert!(genome.node(42).is_none());
        assert!(genome.connection_between(-1, 0).is_some());
        assert!(genome.connection_between(0, -1).is_none());
        assert_eq!(genome.innovation_counter(), 3);
        assert_eq!(genome.next_node_id(), 1);
    }

    #[test]
    fn test_next_node_id_skips_hidden() {
        let genome = Genome::from_parts(
            1,
            vec![
                node(-2, NodeType::Input),
                node(-1, NodeType::Input),
                node(0, NodeType::Output),
                node(5, NodeType::Hidden),
            ],
            Vec::new(),
        );
        assert_eq!(genome.next_node_id(), 6);
        assert_eq!(genome.max_innovation(), None);
    }

    #[test]
    fn test_genome_hex_roundtrip() {
        let genome = Genome::from_parts(
            9,
            vec![node(-1, NodeType::Input), node(0, NodeType::Output)],
            vec![conn(1, -1, 0)],
        );
        let hex = genome.to_hex().expect("serialize");
        let restored = Genome::from_hex(&hex).expect("Should deserialize successfully");
        assert_eq!(genome, restored);
        assert!(Genome::from_hex("").is_err());
        assert!(Genome::from_hex("zz").is_err());
    }
}
