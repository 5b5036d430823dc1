//! Configuration for genome shape, mutation, speciation and the generational run.
//!
//! All structures map onto a `neatling.toml` file. Every field has a default,
//! so an empty file behaves like no file.
//!
//! ## Example `neatling.toml`
//!
//! ```toml
//! [genome]
//! input_keys = [-1, -2]
//! output_keys = [0]
//!
//! [mutation]
//! weight_mutation_prob = 0.3
//! innovation_mode = "global"
//!
//! [speciation]
//! compatibility_threshold = 3.0
//!
//! [evolution]
//! population_size = 150
//! seed = 42
//! ```

use crate::error::{NeatError, Result};
use crate::innovation::InnovationMode;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Input and output node ids.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GenomeConfig {
    pub input_keys: Vec<i64>,
    pub output_keys: Vec<i64>,
}

impl Default for GenomeConfig {
    fn default() -> Self {
        Self {
            input_keys: vec![-1, -2],
            output_keys: vec![0],
        }
    }
}

impl GenomeConfig {
    /// Conventional ids for `inputs` inputs and `outputs` outputs:
    /// `-1..=-inputs` and `0..outputs`.
    #[must_use]
    pub fn with_counts(inputs: usize, outputs: usize) -> Self {
        Self {
            input_keys: (1..=inputs as i64).map(|i| -i).collect(),
            output_keys: (0..outputs as i64).collect(),
        }
    }
}

/// Probabilities driving the mutation operators.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct MutationConfig {
    /// Chance the weight/bias branch fires.
    pub weight_mutation_prob: f64,
    /// Chance the add-node branch fires once weight mutation was skipped.
    pub add_node_prob: f64,
    /// Chance the add-connection branch fires once add-node was skipped.
    pub add_connection_prob: f64,
    /// Per hidden node chance of redrawing the activation.
    pub activation_mutation_rate: f64,
    /// Per hidden node chance of redrawing the aggregation.
    pub aggregation_mutation_rate: f64,
    /// Upper bound of the uniform perturbation added to or subtracted from weights and biases.
    pub perturbation_power: f64,
    /// Chance a disabled gene is re-enabled in a child.
    pub reenable_connection_gene_rate: f64,
    pub innovation_mode: InnovationMode,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            weight_mutation_prob: 0.3,
            add_node_prob: 0.2,
            add_connection_prob: 0.1,
            activation_mutation_rate: 0.1,
            aggregation_mutation_rate: 0.1,
            perturbation_power: 0.5,
            reenable_connection_gene_rate: 0.25,
            innovation_mode: InnovationMode::Global,
        }
    }
}

/// Genetic distance coefficients.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct DistanceCoefficients {
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
}

impl Default for DistanceCoefficients {
    fn default() -> Self {
        Self {
            c1: 1.0,
            c2: 1.0,
            c3: 0.4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SpeciationConfig {
    pub compatibility_threshold: f64,
    pub coefficients: DistanceCoefficients,
    /// Generations without improvement before a species is dropped.
    pub stagnation_threshold: u32,
}

impl Default for SpeciationConfig {
    fn default() -> Self {
        Self {
            compatibility_threshold: 3.0,
            coefficients: DistanceCoefficients::default(),
            stagnation_threshold: 15,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: u32,
    pub seed: Option<u64>,
    /// Stop once any genome reaches this fitness.
    pub fitness_threshold: Option<f64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 150,
            generations: 100,
            seed: None,
            fitness_threshold: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct NeatConfig {
    pub genome: GenomeConfig,
    pub mutation: MutationConfig,
    pub speciation: SpeciationConfig,
    pub evolution: EvolutionConfig,
}

fn ensure(condition: bool, msg: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(NeatError::invalid_configuration(msg))
    }
}

fn is_probability(p: f64) -> bool {
    (0.0..=1.0).contains(&p)
}

impl NeatConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns the first violated rule as [`NeatError::InvalidConfiguration`].
    pub fn validate(&self) -> Result<()> {
        let genome = &self.genome;
        ensure(!genome.input_keys.is_empty(), "At least one input key is required")?;
        ensure(!genome.output_keys.is_empty(), "At least one output key is required")?;
        ensure(
            genome.input_keys.iter().all(|&k| k < 0),
            "Input keys must be negative",
        )?;
        ensure(
            genome.output_keys.iter().all(|&k| k >= 0),
            "Output keys must be non-negative",
        )?;
        let unique: HashSet<i64> = genome
            .input_keys
            .iter()
            .chain(genome.output_keys.iter())
            .copied()
            .collect();
        ensure(
            unique.len() == genome.input_keys.len() + genome.output_keys.len(),
            "Node keys must be unique",
        )?;

        let m = &self.mutation;
        for (p, name) in [
            (m.weight_mutation_prob, "weight_mutation_prob"),
            (m.add_node_prob, "add_node_prob"),
            (m.add_connection_prob, "add_connection_prob"),
            (m.activation_mutation_rate, "activation_mutation_rate"),
            (m.aggregation_mutation_rate, "aggregation_mutation_rate"),
            (m.reenable_connection_gene_rate, "reenable_connection_gene_rate"),
        ] {
            if !is_probability(p) {
                return Err(NeatError::invalid_configuration(format!(
                    "{name} must be in [0.0, 1.0]"
                )));
            }
        }
        ensure(
            m.perturbation_power >= 0.0,
            "Perturbation power must be non-negative",
        )?;

        let s = &self.speciation;
        ensure(
            s.compatibility_threshold > 0.0,
            "Compatibility threshold must be positive",
        )?;
        ensure(
            s.coefficients.c1 >= 0.0 && s.coefficients.c2 >= 0.0 && s.coefficients.c3 >= 0.0,
            "Distance coefficients must be non-negative",
        )?;
        ensure(
            s.stagnation_threshold > 0,
            "Stagnation threshold must be positive",
        )?;

        ensure(
            self.evolution.population_size > 0,
            "Population size must be positive",
        )?;
        Ok(())
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields the defaults, which are written back to `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            return Self::from_toml(&content)
                .map_err(|e| e.with_context(format!("loading {}", path.display())));
        }

        let default = Self::default();
        match toml::to_string(&default) {
            Ok(toml_str) => {
                if let Err(e) = std::fs::write(path, toml_str) {
                    tracing::warn!(path = %path.display(), error = %e, "Could not write default config");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Could not serialize default config"),
        }
        Ok(default)
    }

    /// Seeded generator when `evolution.seed` is set, entropy otherwise.
    #[must_use]
    pub fn rng(&self) -> ChaCha8Rng {
        match self.evolution.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = NeatConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_positive_input_key_rejected() {
        let config = NeatConfig {
            genome: GenomeConfig {
                input_keys: vec![1],
                output_keys: vec![0],
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_output_key_rejected() {
        let config = NeatConfig {
            genome: GenomeConfig {
                input_keys: vec![-1],
                output_keys: vec![0, 0],
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_probability_rejected() {
        let config = NeatConfig {
            mutation: MutationConfig {
                add_node_prob: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("add_node_prob"));
    }

    #[test]
    fn test_from_toml_partial_overrides() {
        let config = NeatConfig::from_toml(
            r#"
            [genome]
            input_keys = [-1, -2, -3]
            output_keys = [0, 1]

            [mutation]
            innovation_mode = "per_genome"

            [evolution]
            seed = 7
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.genome.input_keys, vec![-1, -2, -3]);
        assert_eq!(config.mutation.innovation_mode, InnovationMode::PerGenome);
        assert_eq!(config.mutation.weight_mutation_prob, 0.3);
        assert_eq!(config.evolution.seed, Some(7));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(NeatConfig::from_toml("genome = 3").is_err());
    }

    #[test]
    fn test_with_counts() {
        let g = GenomeConfig::with_counts(3, 2);
        assert_eq!(g.input_keys, vec![-1, -2, -3]);
        assert_eq!(g.output_keys, vec![0, 1]);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let config = NeatConfig {
            evolution: EvolutionConfig {
                seed: Some(99),
                ..Default::default()
            },
            ..Default::default()
        };
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
