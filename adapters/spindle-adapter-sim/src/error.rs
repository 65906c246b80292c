//! Error types for the simulator.

use spindle_hal::HalError;
use thiserror::Error;

/// Errors raised while simulating a compiled circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The gate has no matrix in this engine.
    #[error("Unsupported gate '{gate}' on qubit {qubit}")]
    UnsupportedGate { gate: String, qubit: usize },

    /// An angle-carrying gate arrived without its angle.
    #[error("Gate '{gate}' requires an angle")]
    MissingAngle { gate: String },

    /// The gate was applied to the wrong number of qubits.
    #[error("Gate '{gate}' acts on {expected} qubit(s), got {got}")]
    ArityMismatch {
        gate: String,
        expected: usize,
        got: usize,
    },

    /// A gate operand lies outside the simulated register.
    #[error("Qubit {qubit} out of range for {num_qubits} qubit(s)")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// A gate touches the same qubit twice.
    #[error("Gate '{gate}' repeats qubit {qubit}")]
    DuplicateQubit { gate: String, qubit: usize },

    /// A measurement targets a classical bit outside the register.
    #[error("Classical bit {clbit} out of range for {num_clbits} bit(s)")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    /// Every branch fell below the pruning threshold.
    #[error("All branches were pruned")]
    AllBranchesPruned,
}

/// Result type for simulator operations.
pub type SimResult<T> = Result<T, SimError>;

impl From<SimError> for HalError {
    fn from(err: SimError) -> Self {
        match err {
            SimError::UnsupportedGate { .. } => HalError::UnsupportedGate(err.to_string()),
            other => HalError::Simulation(other.to_string()),
        }
    }
}
