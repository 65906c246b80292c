//! Error types for the compilation crate.

use thiserror::Error;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// The graph could not be read.
    #[error("Graph access error: {0}")]
    Graph(#[from] spindle_ir::IrError),

    /// A macro call could not be expanded.
    #[error("Cannot expand '{name}' at vertex {vertex}: {reason}")]
    MacroResolution {
        /// Vertex of the failing call site.
        vertex: usize,
        /// Macro or callee name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// A gate was scheduled on a qubit after its measurement.
    #[error("Qubit {qubit} has been measured; found '{gate}' at slot {slot}")]
    SchedulingInvariant {
        /// The measured qubit.
        qubit: usize,
        /// Time slot of the offending cell.
        slot: usize,
        /// Name of the offending gate.
        gate: String,
    },

    /// The scheduler only places gates on one to three qubits.
    #[error("Gate '{gate}' acts on {got} qubits; expected 1 to 3")]
    UnsupportedArity {
        /// Gate name.
        gate: String,
        /// Number of operands supplied.
        got: usize,
    },

    /// A scheduled operand lies outside the time list.
    #[error("Qubit {qubit} is outside the {num_qubits} scheduled qubits")]
    QubitOutOfRange {
        /// Dense qubit index.
        qubit: usize,
        /// Rows in the time list.
        num_qubits: usize,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
