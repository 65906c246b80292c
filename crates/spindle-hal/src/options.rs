//! Execution options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default number of shots.
pub const DEFAULT_SHOTS: u32 = 1024;

fn default_shots() -> u32 {
    DEFAULT_SHOTS
}

/// Options for one execution of a circuit graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteOptions {
    /// Number of shots to apportion.
    #[serde(default = "default_shots")]
    pub shots: u32,
    /// Qubit positions kept in result keys; empty keeps all.
    #[serde(default)]
    pub mqubits: BTreeSet<usize>,
    /// Log the compiled circuit as JSON.
    #[serde(default)]
    pub print_circuit: bool,
    /// Record per-branch amplitude history.
    #[serde(default)]
    pub verbose: bool,
    /// Simulate components concurrently.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            mqubits: BTreeSet::new(),
            print_circuit: false,
            verbose: false,
            parallel: false,
        }
    }
}

impl ExecuteOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of shots.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Keep only these qubit positions in result keys.
    #[must_use]
    pub fn with_mqubits(mut self, mqubits: impl IntoIterator<Item = usize>) -> Self {
        self.mqubits = mqubits.into_iter().collect();
        self
    }

    /// Log the compiled circuit.
    #[must_use]
    pub fn with_print_circuit(mut self, print_circuit: bool) -> Self {
        self.print_circuit = print_circuit;
        self
    }

    /// Record amplitude history.
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Simulate components concurrently.
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}
