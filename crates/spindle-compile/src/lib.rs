//! Spindle Circuit Compiler
//!
//! This crate turns a circuit graph into time-scheduled [`Circuit`]s.
//!
//! # Pipeline
//!
//! ```text
//! CircuitGraph
//!       │
//!       ▼
//!  decompose ──► components (register-disjoint vertex lists)
//!       │
//!       ▼
//!  Translator
//!       ├── RegisterMap   (sparse global bits → dense indices)
//!       ├── TimeList      (per-qubit list scheduling)
//!       └── expand_caller (macro inlining, recursive)
//!       │
//!       ▼
//!  TimeList::flatten ──► Circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use spindle_compile::Compiler;
//! use spindle_ir::{BitKind, GraphDag};
//!
//! let mut dag = GraphDag::new();
//! dag.add_register(BitKind::Qubit, 0, 2);
//! dag.add_op("H", &[], vec![0], &[]).unwrap();
//! dag.add_op("CNOT", &[], vec![0, 1], &[]).unwrap();
//!
//! let circuit = Compiler::new(&dag).compile().unwrap();
//! assert_eq!(circuit.num_qubits, 2);
//! assert_eq!(circuit.depth(), 2);
//! ```

pub mod decompose;
pub mod error;
pub mod expand;
pub mod register;
pub mod scheduler;
pub mod translate;

pub use decompose::{Component, decompose};
pub use error::{CompileError, CompileResult};
pub use expand::CallContext;
pub use register::{RegisterDecl, RegisterMap};
pub use scheduler::{Cell, TimeList};
pub use translate::{Translator, radians_to_degrees};

use spindle_ir::{Circuit, CircuitGraph, VertexId};
use tracing::{debug, info, instrument};

/// Compiles a circuit graph, whole or one component at a time.
pub struct Compiler<'g, G: CircuitGraph + ?Sized> {
    graph: &'g G,
}

impl<'g, G: CircuitGraph + ?Sized> Compiler<'g, G> {
    /// Create a compiler over `graph`.
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }

    /// Register-disjoint components of the graph.
    #[instrument(skip(self))]
    pub fn components(&self) -> CompileResult<Vec<Component>> {
        let order = self.graph.topological_order()?;
        decompose(self.graph, &order)
    }

    /// Compile an arbitrary vertex list into one circuit.
    pub fn compile_vertices(&self, vertices: &[VertexId]) -> CompileResult<Circuit> {
        let translator = Translator::new(self.graph, vertices)?;
        let num_clbits = translator.num_clbits();
        let timelist = translator.run(vertices)?;
        let circuit = timelist.flatten(num_clbits)?;
        debug!(
            "Compiled {} vertices: {} qubits, {} clbits, depth {}",
            vertices.len(),
            circuit.num_qubits,
            circuit.num_clbits,
            circuit.depth()
        );
        Ok(circuit)
    }

    /// Compile one component.
    pub fn compile_component(&self, component: &Component) -> CompileResult<Circuit> {
        self.compile_vertices(&component.vertices)
    }

    /// Compile the whole graph as one circuit.
    ///
    /// Component vertex lists are concatenated in component order, so each
    /// component occupies a contiguous block of dense qubits.
    #[instrument(skip(self))]
    pub fn compile(&self) -> CompileResult<Circuit> {
        let components = self.components()?;
        let vertices: Vec<VertexId> = components
            .iter()
            .flat_map(|c| c.vertices.iter().copied())
            .collect();
        let circuit = self.compile_vertices(&vertices)?;
        info!(
            "Compiled {} component(s) into {} slices over {} qubits",
            components.len(),
            circuit.depth(),
            circuit.num_qubits
        );
        Ok(circuit)
    }
}
