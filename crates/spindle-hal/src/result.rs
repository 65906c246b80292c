//! Execution results.

use num_complex::Complex64;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::packer::calc_counts;

/// Draw attempts made by [`ExecutionResult::get_random_reading`].
pub const READING_ATTEMPTS: usize = 1024;

/// The outcome of executing a circuit graph.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Keyed outcome probabilities.
    pub probabilities: BTreeMap<String, f64>,
    /// Number of shots the counts are apportioned over.
    pub shots: u32,
    /// Final statevector, present only when a single branch survived.
    pub states: Option<Vec<Complex64>>,
    /// Wall-clock execution time in milliseconds.
    pub execution_time_ms: Option<u64>,
    counts: OnceLock<BTreeMap<String, u32>>,
}

impl ExecutionResult {
    /// Create a result from keyed probabilities.
    pub fn new(probabilities: BTreeMap<String, f64>, shots: u32) -> Self {
        Self {
            probabilities,
            shots,
            states: None,
            execution_time_ms: None,
            counts: OnceLock::new(),
        }
    }

    /// Attach the final statevector.
    #[must_use]
    pub fn with_states(mut self, states: Option<Vec<Complex64>>) -> Self {
        self.states = states;
        self
    }

    /// Set execution time.
    #[must_use]
    pub fn with_execution_time(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    /// Shot counts, computed on first access and cached.
    pub fn counts(&self) -> &BTreeMap<String, u32> {
        self.counts
            .get_or_init(|| calc_counts(&self.probabilities, self.shots))
    }

    /// The most frequent outcome.
    pub fn most_frequent(&self) -> Option<(&String, u32)> {
        self.counts()
            .iter()
            .max_by_key(|(_, c)| **c)
            .map(|(k, c)| (k, *c))
    }

    /// One outcome sampled with the thread-local generator.
    pub fn get_random_reading(&self) -> Option<String> {
        self.random_reading_with(&mut rand::thread_rng())
    }

    /// One outcome sampled by rejection.
    ///
    /// Each attempt draws a key uniformly over all `2^k` bitstrings of the
    /// key length and accepts it with its probability. After
    /// [`READING_ATTEMPTS`] rejections the first key is returned.
    pub fn random_reading_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<String> {
        let first = self.probabilities.keys().next()?;
        let width = first.len();
        if width < 64 {
            let space = 1u64 << width;
            for _ in 0..READING_ATTEMPTS {
                let index = rng.gen_range(0..space);
                let key: String = (0..width)
                    .map(|j| if (index >> (width - 1 - j)) & 1 == 1 { '1' } else { '0' })
                    .collect();
                let bound = self.probabilities.get(&key).copied().unwrap_or(0.0);
                if rng.r#gen::<f64>() <= bound {
                    return Some(key);
                }
            }
        }
        Some(first.clone())
    }
}
