//! Speciation, stagnation tracking, fitness sharing and offspring allocation.
//!
//! Species refer to their members by index into the population slice the
//! caller owns; the representative is a private copy used only for distance
//! comparisons.

use crate::config::DistanceCoefficients;
use crate::error::{NeatError, Result};
use crate::genome::distance::distance;
use neatling_data::Genome;
use rand::distributions::WeightedIndex;
use rand::prelude::Distribution;
use rand::Rng;

#[derive(Clone, Debug)]
pub struct Species {
    pub id: usize,
    /// Fixed at creation; only used for distance comparisons.
    pub representative: Genome,
    /// Indices of the population members in this species.
    pub members: Vec<usize>,
    pub best_fitness: f64,
    /// Generations since `best_fitness` last improved.
    pub generations_since_improvement: u32,
    representative_index: usize,
}

impl Species {
    /// A species seeded by the genome at `index`, which becomes its first member.
    #[must_use]
    pub fn new(id: usize, index: usize, representative: &Genome) -> Self {
        Self {
            id,
            representative: representative.clone(),
            members: vec![index],
            best_fitness: 0.0,
            generations_since_improvement: 0,
            representative_index: index,
        }
    }

    pub fn add_member(&mut self, index: usize) {
        self.members.push(index);
    }

    /// Drops all members except the representative.
    pub fn clear_members(&mut self) {
        self.members.clear();
        self.members.push(self.representative_index);
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Population index of the genome this species was seeded from.
    #[must_use]
    pub fn representative_index(&self) -> usize {
        self.representative_index
    }

    #[must_use]
    pub fn adjusted_fitness_sum(&self, population: &[Genome]) -> f64 {
        self.members
            .iter()
            .filter_map(|&i| population.get(i))
            .map(|g| g.adjusted_fitness)
            .sum()
    }

    /// Records this generation's best member fitness and updates the stagnation counter.
    pub fn update_stagnation(&mut self, population: &[Genome]) {
        let current_best = self
            .members
            .iter()
            .filter_map(|&i| population.get(i))
            .map(|g| g.fitness)
            .fold(f64::NEG_INFINITY, f64::max);

        if current_best > self.best_fitness {
            self.best_fitness = current_best;
            self.generations_since_improvement = 0;
        } else {
            self.generations_since_improvement += 1;
        }
    }
}

/// Clusters `population` into species, first match wins.
///
/// Each genome is compared, in population order, with the representative of
/// every species created so far and joins the first one closer than
/// `threshold`. Otherwise it founds a new species. Every genome's `species_id`
/// is updated.
pub fn speciate(
    population: &mut [Genome],
    threshold: f64,
    coefficients: &DistanceCoefficients,
) -> Vec<Species> {
    let mut species_list: Vec<Species> = Vec::new();
    let mut next_species_id = 0;

    for (index, genome) in population.iter_mut().enumerate() {
        let found = species_list
            .iter_mut()
            .find(|s| distance(genome, &s.representative, coefficients) < threshold);

        match found {
            Some(species) => {
                species.add_member(index);
                genome.species_id = Some(species.id);
            }
            None => {
                species_list.push(Species::new(next_species_id, index, genome));
                genome.species_id = Some(next_species_id);
                next_species_id += 1;
            }
        }
    }

    tracing::debug!(
        genomes = population.len(),
        species = species_list.len(),
        "Speciated population"
    );
    species_list
}

pub fn update_stagnation(species: &mut Species, population: &[Genome]) {
    species.update_stagnation(population);
}

/// Drops species stagnant for `stagnation_threshold` generations or more.
///
/// When that would remove every species, the one with the highest best fitness
/// survives instead.
pub fn prune_species(species_list: Vec<Species>, stagnation_threshold: u32) -> Vec<Species> {
    let (kept, dropped): (Vec<Species>, Vec<Species>) = species_list
        .into_iter()
        .partition(|s| s.generations_since_improvement < stagnation_threshold);

    if !kept.is_empty() || dropped.is_empty() {
        return kept;
    }

    let best = dropped.into_iter().reduce(|best, s| {
        if s.best_fitness > best.best_fitness {
            s
        } else {
            best
        }
    });
    tracing::debug!("All species stagnant, keeping the fittest");
    best.into_iter().collect()
}

/// Explicit fitness sharing: divides each member's fitness by its species size.
pub fn calculate_adjusted_fitness(species_list: &[Species], population: &mut [Genome]) {
    for species in species_list {
        let size = species.size() as f64;
        for &index in &species.members {
            if let Some(genome) = population.get_mut(index) {
                genome.adjusted_fitness = genome.fitness / size;
            }
        }
    }
}

/// Offspring quota per species, in list order.
///
/// Quotas are proportional to each species' adjusted fitness sum and rounded
/// down, so they may sum to less than `total_offspring`. With zero total
/// adjusted fitness the offspring are split evenly and the remainder goes to
/// the first species.
pub fn allocate_offspring(
    species_list: &[Species],
    population: &[Genome],
    total_offspring: usize,
) -> Vec<usize> {
    if species_list.is_empty() {
        return Vec::new();
    }

    let sums: Vec<f64> = species_list
        .iter()
        .map(|s| s.adjusted_fitness_sum(population))
        .collect();
    let total_adjusted_fitness: f64 = sums.iter().sum();

    if total_adjusted_fitness == 0.0 {
        let n = species_list.len();
        let mut counts = vec![total_offspring / n; n];
        for count in counts.iter_mut().take(total_offspring % n) {
            *count += 1;
        }
        return counts;
    }

    sums.iter()
        .map(|&sum| {
            let share = (sum / total_adjusted_fitness) * total_offspring as f64;
            share.max(0.0).floor() as usize
        })
        .collect()
}

/// Draws `offspring_count` parent pairs with replacement, weighted by raw fitness.
///
/// Negative fitness counts as zero weight. If every weight is zero the draw is
/// uniform.
pub fn select_parents<R: Rng>(
    species: &Species,
    population: &[Genome],
    offspring_count: usize,
    rng: &mut R,
) -> Result<Vec<(usize, usize)>> {
    if offspring_count == 0 {
        return Ok(Vec::new());
    }
    if species.members.is_empty() {
        return Err(NeatError::EmptySpecies(species.id));
    }

    let weights: Vec<f64> = species
        .members
        .iter()
        .map(|&i| population.get(i).map_or(0.0, |g| g.fitness.max(0.0)))
        .collect();

    let dist = WeightedIndex::new(&weights).ok();
    if dist.is_none() {
        tracing::warn!(
            species = species.id,
            "No positive fitness in species, selecting parents uniformly"
        );
    }

    let members = &species.members;
    let pick = |rng: &mut R| match &dist {
        Some(dist) => members[dist.sample(rng)],
        None => members[rng.gen_range(0..members.len())],
    };

    Ok((0..offspring_count)
        .map(|_| {
            let first = pick(rng);
            (first, pick(rng))
        })
        .collect())
}
