//! Synthetic task stream generation
//!
//! Tasks are drawn uniformly: `resource_width` in `[1, n]` and `duration` in
//! `[1, MAX_DURATION]`. A seed makes the stream reproducible for a fixed
//! `(count, universe, seed)` triple.

use crate::task::{Task, MAX_DURATION};
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration of a synthetic task stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskGenerator {
    count: usize,
    universe: u32,
    seed: Option<u64>,
}

impl TaskGenerator {
    /// Create a generator for `count` tasks over a resource universe of size `universe`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `universe` is zero.
    pub fn new(count: usize, universe: u32) -> Result<Self> {
        if universe == 0 {
            return Err(Error::InvalidInput(
                "resource universe size must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            count,
            universe,
            seed: None,
        })
    }

    /// Fix the seed so the stream is reproducible.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of tasks the stream yields.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Resource universe size (`n`).
    #[must_use]
    pub const fn universe(&self) -> u32 {
        self.universe
    }

    /// Seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Start a fresh stream. Seeded generators restart from the same state.
    #[must_use]
    pub fn stream(&self) -> TaskStream {
        let rng = self
            .seed
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        TaskStream {
            rng,
            remaining: self.count,
            universe: self.universe,
        }
    }
}

impl IntoIterator for TaskGenerator {
    type Item = Task;
    type IntoIter = TaskStream;

    fn into_iter(self) -> Self::IntoIter {
        self.stream()
    }
}

/// Lazy finite stream of uniformly drawn tasks.
#[derive(Debug)]
pub struct TaskStream {
    rng: StdRng,
    remaining: usize,
    universe: u32,
}

impl Iterator for TaskStream {
    type Item = Task;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let resource_width = self.rng.gen_range(1..=self.universe);
        let duration = self.rng.gen_range(1..=MAX_DURATION);
        Some(Task::from_parts(resource_width, duration))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for TaskStream {}
