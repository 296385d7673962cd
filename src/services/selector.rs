//! Random reviewer selection.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::models::User;

/// Picks up to N distinct reviewers uniformly at random from a candidate pool.
///
/// The random source is injected so tests can seed it. Candidates are sorted by id
/// before shuffling, which makes a seeded selector independent of the order the store
/// returned them in.
#[derive(Debug)]
pub struct CandidateSelector {
    rng: Mutex<StdRng>,
}

impl CandidateSelector {
    /// Selector seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic selector.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// Returns `min(count, eligible)` distinct ids from `candidates`, skipping every id
    /// in `exclude`. Each subset of that size is equally likely.
    pub fn select(&self, candidates: Vec<User>, exclude: &HashSet<Uuid>, count: usize) -> Vec<Uuid> {
        let mut pool: Vec<Uuid> = candidates
            .into_iter()
            .map(|u| u.id)
            .filter(|id| !exclude.contains(id))
            .collect();
        pool.sort_unstable();
        pool.dedup();

        if pool.is_empty() || count == 0 {
            return Vec::new();
        }

        {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            pool.shuffle(&mut *rng);
        }
        pool.truncate(count);
        pool
    }
}
