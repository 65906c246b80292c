//! Error types for the HAL crate.

use spindle_compile::CompileError;
use spindle_ir::IrError;
use thiserror::Error;

/// Errors that can occur while executing a circuit graph.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit graph could not be read.
    #[error("Graph access error: {0}")]
    GraphAccess(#[source] IrError),

    /// The graph could not be compiled.
    #[error("Compilation failed: {0}")]
    Compile(#[source] CompileError),

    /// The engine met a gate it cannot apply.
    #[error("Unsupported gate: {0}")]
    UnsupportedGate(String),

    /// Simulation failed.
    #[error("Simulation failed: {0}")]
    Simulation(String),

    /// Invalid execution options.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<IrError> for HalError {
    fn from(err: IrError) -> Self {
        HalError::GraphAccess(err)
    }
}

impl From<CompileError> for HalError {
    fn from(err: CompileError) -> Self {
        match err {
            CompileError::Graph(e) => HalError::GraphAccess(e),
            other => HalError::Compile(other),
        }
    }
}

/// Result type for HAL operations.
pub type HalResult<T> = Result<T, HalError>;
