use crate::config::DistanceCoefficients;
use neatling_data::{ConnectionGene, Genome};
use std::collections::HashMap;

fn weights_by_innovation(genes: &[ConnectionGene]) -> HashMap<u64, f64> {
    let mut map = HashMap::with_capacity(genes.len());
    for gene in genes {
        map.entry(gene.innovation).or_insert(gene.weight);
    }
    map
}

/// Genetic distance between two genomes, aligned by innovation number.
///
/// A gene missing from the other genome only counts when its marker does not
/// exceed the other genome's highest marker. That single combined count feeds
/// both the `c1` and the `c2` term:
///
/// `c1 * d / N + c2 * d / N + c3 * mean|w1 - w2|`
///
/// where `N` is the larger connection count (at least 1) and the mean weight
/// difference is 0 when no genes match.
pub fn distance(genome1: &Genome, genome2: &Genome, coefficients: &DistanceCoefficients) -> f64 {
    let genes1 = &genome1.connections;
    let genes2 = &genome2.connections;
    let weights1 = weights_by_innovation(genes1);
    let weights2 = weights_by_innovation(genes2);
    let max_innov1 = genome1.max_innovation();
    let max_innov2 = genome2.max_innovation();

    let mut matching = 0usize;
    let mut weight_diff_sum = 0.0;
    let mut excess_disjoint = 0usize;

    for gene in genes1 {
        match weights2.get(&gene.innovation) {
            Some(&w2) => {
                matching += 1;
                weight_diff_sum += (gene.weight - w2).abs();
            }
            None => {
                if max_innov2.is_some_and(|max| gene.innovation <= max) {
                    excess_disjoint += 1;
                }
            }
        }
    }

    for gene in genes2 {
        if !weights1.contains_key(&gene.innovation)
            && max_innov1.is_some_and(|max| gene.innovation <= max)
        {
            excess_disjoint += 1;
        }
    }

    let average_weight_diff = if matching > 0 {
        weight_diff_sum / matching as f64
    } else {
        0.0
    };

    let n = genes1.len().max(genes2.len()).max(1) as f64;
    let d = excess_disjoint as f64;
    coefficients.c1 * d / n + coefficients.c2 * d / n + coefficients.c3 * average_weight_diff
}
