//! Activation and aggregation functions, resolved by name.
//!
//! Genes carry a closed [`Activation`]/[`Aggregation`] tag. The registry maps each
//! tag's name to a plain function pointer once per compile, and callers may
//! register replacements or additional names.

use crate::error::{NeatError, Result};
use neatling_data::{Activation, Aggregation};
use std::collections::HashMap;
use std::fmt;

pub type ActivationFn = fn(f64) -> f64;
pub type AggregationFn = fn(&[f64]) -> f64;

pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn tanh(x: f64) -> f64 {
    x.tanh()
}

pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Largest value, or 0 for no values.
pub fn max(values: &[f64]) -> f64 {
    values.iter().copied().reduce(f64::max).unwrap_or(0.0)
}

#[derive(Clone)]
pub struct FunctionRegistry {
    activations: HashMap<String, ActivationFn>,
    aggregations: HashMap<String, AggregationFn>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("activations", &self.activations.keys().collect::<Vec<_>>())
            .field("aggregations", &self.aggregations.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_activation(Activation::Sigmoid.name(), sigmoid);
        registry.register_activation(Activation::Tanh.name(), tanh);
        registry.register_aggregation(Aggregation::Sum.name(), sum);
        registry.register_aggregation(Aggregation::Max.name(), max);
        registry
    }
}

impl FunctionRegistry {
    /// A registry with nothing registered.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            activations: HashMap::new(),
            aggregations: HashMap::new(),
        }
    }

    pub fn register_activation<S: Into<String>>(&mut self, name: S, f: ActivationFn) {
        self.activations.insert(name.into(), f);
    }

    pub fn register_aggregation<S: Into<String>>(&mut self, name: S, f: AggregationFn) {
        self.aggregations.insert(name.into(), f);
    }

    pub fn activation(&self, activation: Activation) -> Result<ActivationFn> {
        self.activations
            .get(activation.name())
            .copied()
            .ok_or_else(|| NeatError::unknown_function(activation.name()))
    }

    pub fn aggregation(&self, aggregation: Aggregation) -> Result<AggregationFn> {
        self.aggregations
            .get(aggregation.name())
            .copied()
            .ok_or_else(|| NeatError::unknown_function(aggregation.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_functions() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
        assert!((tanh(0.5) - 0.462_117_157_260_009_8).abs() < 1e-12);
        assert_eq!(sum(&[1.0, 2.0, -0.5]), 2.5);
        assert_eq!(max(&[1.0, 2.0, -0.5]), 2.0);
        assert_eq!(max(&[]), 0.0);
        assert_eq!(sum(&[]), 0.0);
    }

    #[test]
    fn test_default_registry_covers_vocabulary() {
        let registry = FunctionRegistry::default();
        for name in Activation::NAMES {
            let activation: Activation = name.parse().expect("known name");
            assert!(registry.activation(activation).is_ok());
        }
        for name in Aggregation::NAMES {
            let aggregation: Aggregation = name.parse().expect("known name");
            assert!(registry.aggregation(aggregation).is_ok());
        }
    }

    #[test]
    fn test_missing_registration_is_reported() {
        let registry = FunctionRegistry::empty();
        let err = registry.activation(Activation::Tanh).unwrap_err();
        assert!(matches!(err, NeatError::UnknownFunction(name) if name == "tanh"));
    }

    #[test]
    fn test_registration_overrides() {
        fn identity(x: f64) -> f64 {
            x
        }
        let mut registry = FunctionRegistry::default();
        registry.register_activation("tanh", identity);
        let f = registry.activation(Activation::Tanh).expect("registered");
        assert_eq!(f(3.0), 3.0);
    }
}
