use std::sync::Arc;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::dataset::{Dataset, DatasetAnalysis, DatasetStats};
use crate::game::ParsedHand;
use crate::scenario::{Scenario, ScenarioFilter, ScenarioKind};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TrainerError {
    #[error("No scenarios available for the selected type. Check data files.")]
    NoScenariosAvailable,
}

/// Read-only scenario pools shared by every request.
#[derive(Debug, Clone)]
pub struct TrainerState {
    dataset: Arc<Dataset>,
}

impl TrainerState {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn stats(&self) -> DatasetStats {
        self.dataset.stats()
    }

    pub fn analysis(&self) -> DatasetAnalysis {
        self.dataset.analysis()
    }

    /// Picks one scenario uniformly across the pools selected by `filter`.
    pub fn draw<R: Rng>(
        &self,
        filter: ScenarioFilter,
        rng: &mut R,
    ) -> Result<&Scenario, TrainerError> {
        let preflop: &[Scenario] = if filter.includes(ScenarioKind::Preflop) {
            &self.dataset.preflop
        } else {
            &[]
        };
        let postflop: &[Scenario] = if filter.includes(ScenarioKind::Postflop) {
            &self.dataset.postflop
        } else {
            &[]
        };

        let total = preflop.len() + postflop.len();
        if total == 0 {
            return Err(TrainerError::NoScenariosAvailable);
        }
        let index = rng.gen_range(0..total);
        Ok(preflop
            .get(index)
            .unwrap_or_else(|| &postflop[index - preflop.len()]))
    }

    /// Picks one of the replays parsed at load time.
    pub fn draw_hand<R: Rng>(&self, rng: &mut R) -> Result<ParsedHand, TrainerError> {
        self.dataset
            .hands
            .choose(rng)
            .cloned()
            .ok_or(TrainerError::NoScenariosAvailable)
    }
}
