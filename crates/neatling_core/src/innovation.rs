//! Innovation numbering for new connection genes.
//!
//! Two policies are supported. `Global` hands out markers from one counter shared
//! by the whole population and reuses the marker when the same `(source, target)`
//! edge is created again within a generation, so crossover and distance can align
//! genes from different genomes. `PerGenome` numbers from each genome's private
//! counter, which lets unrelated genomes mint identical markers.

use neatling_data::Genome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum InnovationMode {
    #[default]
    Global,
    PerGenome,
}

#[derive(Clone, Debug)]
pub struct InnovationTracker {
    mode: InnovationMode,
    counter: u64,
    generation_events: HashMap<(i64, i64), u64>,
}

impl InnovationTracker {
    #[must_use]
    pub fn new(mode: InnovationMode) -> Self {
        Self {
            mode,
            counter: 0,
            generation_events: HashMap::new(),
        }
    }

    #[must_use]
    pub fn mode(&self) -> InnovationMode {
        self.mode
    }

    /// Highest marker handed out by the shared counter.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.counter
    }

    /// Marker for a new `source -> target` connection in `genome`.
    pub fn next(&mut self, genome: &mut Genome, source: i64, target: i64) -> u64 {
        match self.mode {
            InnovationMode::PerGenome => genome.next_local_innovation(),
            InnovationMode::Global => {
                if let Some(&innovation) = self.generation_events.get(&(source, target)) {
                    return innovation;
                }
                self.counter += 1;
                self.generation_events.insert((source, target), self.counter);
                self.counter
            }
        }
    }

    /// Forgets which edges were created this generation. Markers keep increasing.
    pub fn reset_generation(&mut self) {
        self.generation_events.clear();
    }

    /// Lifts the shared counter past every marker already present in `genome`.
    pub fn observe(&mut self, genome: &Genome) {
        if let Some(max) = genome.max_innovation() {
            self.counter = self.counter.max(max);
        }
    }
}

impl Default for InnovationTracker {
    fn default() -> Self {
        Self::new(InnovationMode::Global)
    }
}
