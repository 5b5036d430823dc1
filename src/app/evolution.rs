use anyhow::{Context, Result};
use neatling_core::config::{DistanceCoefficients, NeatConfig};
use neatling_core::genome::distance::distance;
use neatling_core::innovation::InnovationTracker;
use neatling_core::network::FeedForwardNetwork;
use neatling_core::species::{
    allocate_offspring, calculate_adjusted_fitness, prune_species, select_parents, speciate,
    update_stagnation, Species,
};
use neatling_core::GenomeLogic;
use neatling_data::Genome;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::model::task::FitnessTask;

/// Summary of one evaluated generation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub best_fitness: f64,
    pub mean_fitness: f64,
    /// Species that bred this generation; carried over when the run stopped here.
    pub species: usize,
    pub champion_id: u64,
    /// The fitness threshold was reached, so no offspring were produced.
    pub solved: bool,
}

/// Generational loop around the core operators.
///
/// Each [`step`](Self::step) evaluates the current population, then speciates,
/// prunes stagnant species, shares fitness and breeds the next population. One
/// champion per surviving species is copied over unchanged.
pub struct Evolution {
    pub config: NeatConfig,
    pub population: Vec<Genome>,
    pub generation: u32,
    species: Vec<Species>,
    tracker: InnovationTracker,
    rng: ChaCha8Rng,
    next_genome_id: u64,
    champion: Option<Genome>,
}

impl Evolution {
    /// Builds the initial population, seeded from `config.evolution.seed` when set.
    pub fn new(config: NeatConfig) -> Result<Self> {
        let rng = config.rng();
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: NeatConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate().context("invalid evolution config")?;

        let mut tracker = InnovationTracker::new(config.mutation.innovation_mode);
        let size = config.evolution.population_size;
        let mut population = Vec::with_capacity(size);
        for id in 0..size as u64 {
            let genome = Genome::new_with_rng(id, &config.genome, &mut tracker, &mut rng)?;
            tracker.observe(&genome);
            population.push(genome);
        }

        tracing::info!(
            population = size,
            inputs = config.genome.input_keys.len(),
            outputs = config.genome.output_keys.len(),
            "Initial population created"
        );

        Ok(Self {
            config,
            population,
            generation: 0,
            species: Vec::new(),
            tracker,
            rng,
            next_genome_id: size as u64,
            champion: None,
        })
    }

    /// Fittest genome evaluated so far.
    #[must_use]
    pub fn champion(&self) -> Option<&Genome> {
        self.champion.as_ref()
    }

    /// Species formed in the most recent reproduction. Member indices refer to
    /// the population that was bred from.
    #[must_use]
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Compiles and scores every genome, then records the champion.
    pub fn evaluate<T: FitnessTask + ?Sized>(&mut self, task: &T) -> Result<()> {
        for genome in &mut self.population {
            let network = FeedForwardNetwork::create(genome, &self.config.genome)
                .with_context(|| format!("compiling genome {}", genome.id))?;
            genome.fitness = task.evaluate(&network)?;
        }

        let best = self
            .population
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
        if let Some(best) = best {
            let improved = self
                .champion
                .as_ref()
                .map_or(true, |c| best.fitness > c.fitness);
            if improved {
                self.champion = Some(best.clone());
            }
        }
        Ok(())
    }

    /// Evaluates the current population and, unless it reached the fitness
    /// threshold, replaces it with the next generation.
    pub fn step<T: FitnessTask + ?Sized>(&mut self, task: &T) -> Result<GenerationReport> {
        self.evaluate(task)?;

        let (best_fitness, champion_id) = self
            .population
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
            .map_or((0.0, 0), |g| (g.fitness, g.id));
        let mean_fitness = if self.population.is_empty() {
            0.0
        } else {
            self.population.iter().map(|g| g.fitness).sum::<f64>() / self.population.len() as f64
        };
        let solved = self
            .config
            .evolution
            .fitness_threshold
            .is_some_and(|t| best_fitness >= t);

        if !solved {
            self.reproduce()?;
        }

        let report = GenerationReport {
            generation: self.generation,
            best_fitness,
            mean_fitness,
            species: self.species.len(),
            champion_id,
            solved,
        };
        tracing::info!(
            generation = report.generation,
            best = report.best_fitness,
            mean = report.mean_fitness,
            species = report.species,
            "Generation complete"
        );

        if !solved {
            self.generation += 1;
        }
        Ok(report)
    }

    /// Steps until the fitness threshold is met or `evolution.generations` have run.
    pub fn run<T: FitnessTask + ?Sized>(&mut self, task: &T) -> Result<Vec<GenerationReport>> {
        let mut reports = Vec::new();
        for _ in 0..self.config.evolution.generations {
            let report = self.step(task)?;
            let solved = report.solved;
            reports.push(report);
            if solved {
                tracing::info!(generation = self.generation, "Fitness threshold reached");
                break;
            }
        }
        Ok(reports)
    }

    fn reproduce(&mut self) -> Result<()> {
        let threshold = self.config.speciation.compatibility_threshold;
        let coefficients = self.config.speciation.coefficients;

        let mut species = speciate(&mut self.population, threshold, &coefficients);
        inherit_stagnation(&self.species, &mut species, threshold, &coefficients);
        for s in &mut species {
            update_stagnation(s, &self.population);
        }
        let species = prune_species(species, self.config.speciation.stagnation_threshold);
        calculate_adjusted_fitness(&species, &mut self.population);

        let target = self.config.evolution.population_size;
        let elites = species.len().min(target);
        let offspring = target - elites;
        let mut quotas = allocate_offspring(&species, &self.population, offspring);

        // Quotas are rounded down; the fittest species breeds the shortfall.
        let shortfall = offspring.saturating_sub(quotas.iter().sum());
        let fittest = species
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.best_fitness.total_cmp(&b.best_fitness))
            .map(|(i, _)| i);
        if let Some(i) = fittest {
            quotas[i] += shortfall;
        }

        self.tracker.reset_generation();
        let rate = self.config.mutation.reenable_connection_gene_rate;
        let mut next = Vec::with_capacity(target);

        for s in species.iter().take(elites) {
            let champion = s
                .members
                .iter()
                .filter_map(|&i| self.population.get(i))
                .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
            if let Some(champion) = champion {
                next.push(champion.clone());
            }
        }

        for (s, &quota) in species.iter().zip(&quotas) {
            let parents = select_parents(s, &self.population, quota, &mut self.rng)?;
            for (a, b) in parents {
                let mut child = Genome::empty(self.next_genome_id);
                self.next_genome_id += 1;
                child.crossover_with_rng(
                    &self.population[a],
                    &self.population[b],
                    rate,
                    &mut self.rng,
                );
                child.mutate(&self.config.mutation, &mut self.tracker, &mut self.rng)?;
                next.push(child);
            }
        }

        // Negative fitness can push proportional quotas past the target.
        next.truncate(target);
        for genome in &mut next {
            genome.fitness = 0.0;
            genome.adjusted_fitness = 0.0;
            genome.species_id = None;
        }

        self.population = next;
        self.species = species;
        Ok(())
    }
}

/// Carries best fitness and stagnation over from last generation's species.
///
/// Species are rebuilt every generation, so each new species takes the history
/// of the closest unclaimed previous species whose representative lies within
/// `threshold` of its own.
fn inherit_stagnation(
    previous: &[Species],
    current: &mut [Species],
    threshold: f64,
    coefficients: &DistanceCoefficients,
) {
    let mut claimed = vec![false; previous.len()];
    for species in current.iter_mut() {
        let ancestor = previous
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed[*i])
            .map(|(i, p)| {
                let d = distance(&species.representative, &p.representative, coefficients);
                (i, d)
            })
            .filter(|&(_, d)| d < threshold)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((i, _)) = ancestor {
            claimed[i] = true;
            species.best_fitness = previous[i].best_fitness;
            species.generations_since_improvement = previous[i].generations_since_improvement;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::XorTask;
    use rand::SeedableRng;

    fn small_config(seed: u64) -> NeatConfig {
        let mut config = XorTask::config();
        config.evolution.population_size = 30;
        config.evolution.generations = 5;
        config.evolution.seed = Some(seed);
        config.evolution.fitness_threshold = None;
        config
    }

    #[test]
    fn test_population_size_is_kept() {
        let mut evolution = Evolution::new(small_config(42)).expect("evolution");
        for _ in 0..4 {
            evolution.step(&XorTask).expect("step");
            assert_eq!(evolution.population.len(), 30);
        }
        assert_eq!(evolution.generation, 4);
    }

    #[test]
    fn test_run_is_deterministic_for_seed() {
        let mut a = Evolution::new(small_config(7)).expect("evolution");
        let mut b = Evolution::new(small_config(7)).expect("evolution");
        let ra = a.run(&XorTask).expect("run");
        let rb = b.run(&XorTask).expect("run");
        assert_eq!(ra, rb);
        assert_eq!(ra.len(), 5);
    }

    #[test]
    fn test_champion_never_regresses() {
        let mut evolution = Evolution::new(small_config(3)).expect("evolution");
        let mut last = f64::NEG_INFINITY;
        for _ in 0..5 {
            evolution.step(&XorTask).expect("step");
            let champion = evolution.champion().expect("champion").fitness;
            assert!(champion >= last);
            assert!(champion <= 4.0);
            last = champion;
        }
    }

    #[test]
    fn test_threshold_stops_run() {
        let mut config = small_config(1);
        config.evolution.fitness_threshold = Some(-100.0);
        let mut evolution = Evolution::new(config).expect("evolution");
        let reports = evolution.run(&XorTask).expect("run");
        assert_eq!(reports.len(), 1);
        assert!(reports[0].solved);
        assert_eq!(evolution.generation, 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config(1);
        config.evolution.population_size = 0;
        assert!(Evolution::with_rng(config, ChaCha8Rng::seed_from_u64(1)).is_err());
    }

    #[test]
    fn test_inherit_stagnation_matches_close_species() {
        let genome = Genome::empty(0);
        let mut old = Species::new(0, 0, &genome);
        old.best_fitness = 2.5;
        old.generations_since_improvement = 4;
        let mut current = vec![Species::new(0, 0, &genome), Species::new(1, 1, &genome)];

        inherit_stagnation(&[old], &mut current, 3.0, &DistanceCoefficients::default());
        assert_eq!(current[0].best_fitness, 2.5);
        assert_eq!(current[0].generations_since_improvement, 4);
        assert_eq!(current[1].generations_since_improvement, 0);
    }
}
