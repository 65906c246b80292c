//! Error types for the IR crate.

use thiserror::Error;

/// Errors raised while reading or building a circuit graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A vertex or one of its attributes could not be read.
    #[error("Graph access failed at vertex {vertex}: {reason}")]
    GraphAccess {
        /// Vertex being read.
        vertex: usize,
        /// What went wrong.
        reason: String,
    },

    /// Vertex id outside the graph.
    #[error("Vertex {0} does not exist")]
    InvalidVertex(usize),

    /// A register name that does not follow `q{start}_{len}` / `c{start}_{len}`.
    #[error("Malformed register name '{0}'")]
    MalformedRegister(String),

    /// The graph contains a cycle.
    #[error("Circuit graph is not acyclic")]
    Cyclic,

    /// A parameter expression could not be parsed.
    #[error("Invalid parameter expression '{expr}': {reason}")]
    InvalidExpression {
        /// The offending source text.
        expr: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Callee parameters could not be computed from the caller's.
    #[error("Cannot resolve parameters of '{name}': {reason}")]
    ParameterResolution {
        /// Callee name.
        name: String,
        /// What went wrong.
        reason: String,
    },

    /// Unknown comparison operator.
    #[error("Unknown comparator '{0}'")]
    UnknownComparator(String),

    /// A builder call referenced a bit that no register declares.
    #[error("Unknown {kind} {index}{}", format_gate_context(.gate_name))]
    UnknownBit {
        /// "qubit" or "clbit".
        kind: &'static str,
        /// Global bit index.
        index: u32,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A graph document failed to deserialize.
    #[error("Invalid graph document: {0}")]
    Document(#[from] serde_json::Error),
}

impl IrError {
    /// Shorthand for [`IrError::GraphAccess`].
    pub fn access(vertex: usize, reason: impl Into<String>) -> Self {
        IrError::GraphAccess {
            vertex,
            reason: reason.into(),
        }
    }
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
