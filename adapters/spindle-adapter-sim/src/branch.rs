//! A single decohered outcome path.

use ndarray::Array2;
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use tracing::debug;

use spindle_hal::EPSILON;
use spindle_ir::{ClbitId, QubitId};

use crate::gates::apply_matrix;

/// Index of a branch in the manager's arena.
pub type BranchId = usize;

/// Children lighter than this are numerically zero and are pruned.
///
/// Shares the packer's [`EPSILON`] (`1e-10`), so a pruned branch could
/// never have produced a reported probability.
pub const PRUNE_WEIGHT: f64 = EPSILON;

/// One branch of the simulation.
///
/// A branch owns its amplitude vector exclusively. Measurement never
/// mutates a branch; it produces up to two children.
#[derive(Debug, Clone)]
pub struct QuantumBranch {
    /// Amplitudes over `2^n` basis states.
    pub amplitudes: Vec<Complex64>,
    /// Probability mass carried by this branch.
    pub weight: f64,
    /// Classical register values.
    pub clbits: Vec<bool>,
    /// Which qubit each classical bit was last measured from.
    pub provenance: FxHashMap<ClbitId, QubitId>,
    /// Amplitudes after every completed slice, when recording.
    pub history: Option<Vec<Vec<Complex64>>>,
    num_qubits: usize,
}

impl QuantumBranch {
    /// The `|0...0⟩` branch with full weight and cleared classical bits.
    pub fn new(num_qubits: usize, num_clbits: usize, record_history: bool) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            weight: 1.0,
            clbits: vec![false; num_clbits],
            provenance: FxHashMap::default(),
            history: record_history.then(Vec::new),
            num_qubits,
        }
    }

    /// Number of simulated qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Apply a unitary to `targets`.
    pub fn apply(&mut self, targets: &[usize], matrix: &Array2<Complex64>) {
        apply_matrix(&mut self.amplitudes, self.num_qubits, targets, matrix);
    }

    /// Probability of reading `qubit` as 0.
    pub fn probability_of_zero(&self, qubit: usize) -> f64 {
        let mask = 1usize << (self.num_qubits - 1 - qubit);
        self.amplitudes
            .iter()
            .enumerate()
            .filter(|(i, _)| i & mask == 0)
            .map(|(_, a)| a.norm_sqr())
            .sum()
    }

    /// Split on a measurement of `qubit` into `clbit`.
    ///
    /// Returns the surviving children for outcomes 0 and 1, in that order.
    /// A child whose weight falls below [`PRUNE_WEIGHT`] is pruned.
    pub fn measure(&self, qubit: usize, clbit: usize) -> Vec<QuantumBranch> {
        let mask = 1usize << (self.num_qubits - 1 - qubit);
        let p0 = self.probability_of_zero(qubit).clamp(0.0, 1.0);
        let mut children = Vec::with_capacity(2);

        for (outcome, p) in [(false, p0), (true, 1.0 - p0)] {
            let weight = self.weight * p;
            if weight < PRUNE_WEIGHT {
                debug!(
                    "Pruned branch: q{qubit} -> c{clbit} = {} (weight {weight:e})",
                    u8::from(outcome)
                );
                continue;
            }
            let scale = 1.0 / p.sqrt();
            let amplitudes = self
                .amplitudes
                .iter()
                .enumerate()
                .map(|(i, a)| {
                    if (i & mask != 0) == outcome {
                        *a * scale
                    } else {
                        Complex64::new(0.0, 0.0)
                    }
                })
                .collect();

            let mut clbits = self.clbits.clone();
            clbits[clbit] = outcome;
            let mut provenance = self.provenance.clone();
            provenance.insert(ClbitId(clbit as u32), QubitId(qubit as u32));

            children.push(QuantumBranch {
                amplitudes,
                weight,
                clbits,
                provenance,
                history: self.history.clone(),
                num_qubits: self.num_qubits,
            });
        }
        children
    }

    /// Append the current amplitudes to the history, when recording.
    pub fn record_slice(&mut self) {
        if let Some(history) = self.history.as_mut() {
            history.push(self.amplitudes.clone());
        }
    }

    /// Weighted basis-state probabilities `w·|a_i|²`.
    pub fn weighted_probabilities(&self) -> impl Iterator<Item = f64> + '_ {
        self.amplitudes.iter().map(|a| self.weight * a.norm_sqr())
    }
}
