//! Spindle Circuit Intermediate Representation
//!
//! This crate holds the two data models shared by the rest of the stack:
//! the circuit **graph** the compiler reads, and the time-scheduled
//! **circuit** the execution engine runs.
//!
//! # Core Components
//!
//! - **Bits**: [`QubitId`], [`ClbitId`] dense bit indices, [`BitKind`]
//! - **Gates**: [`StandardGate`] for built-in gates and [`GateKind`] for
//!   names the compiler passes through untouched
//! - **Conditions**: [`Condition`] and [`Relation`] guarding gates on
//!   classical bits
//! - **Parameters**: [`ParameterExpression`] computing callee parameters
//!   inside macro bodies
//! - **Graph**: the [`CircuitGraph`] read interface, the petgraph-backed
//!   [`GraphDag`] and its JSON form [`GraphDocument`]
//! - **Schedule**: [`GateUnit`], [`CircuitUnit`], [`Circuit`]
//!
//! # Example: Building a Graph
//!
//! ```rust
//! use spindle_ir::{BitKind, CircuitGraph, GraphDag, Relation};
//!
//! let mut dag = GraphDag::new();
//! dag.add_register(BitKind::Qubit, 0, 2);
//! dag.add_register(BitKind::Clbit, 0, 1);
//! dag.add_op("H", &[], vec![0], &[]).unwrap();
//! dag.add_op("MEASURE", &[], vec![0], &[0]).unwrap();
//! let x = dag.add_op("X", &[], vec![1], &[]).unwrap();
//! dag.add_condition(x, &[0], Relation::Eq, 1).unwrap();
//!
//! assert_eq!(dag.num_qubits(), 2);
//! assert!(dag.topological_order().is_ok());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `I`, `H` | 1 | Identity, Hadamard |
//! | `X`, `Y`, `Z` | 1 | Pauli gates |
//! | `X90`, `Y90`, `Z90` | 1 | Quarter-turn rotations |
//! | `S`, `Sd`, `T`, `Td` | 1 | Phase gates and their adjoints |
//! | `Rx`, `Ry`, `Rz`, `P` | 1 | Angle-carrying rotations |
//! | `CNOT`, `YCON`, `ZCON` | 2 | Controlled X/Y/Z (`CX`, `CY`, `CZ` accepted) |
//! | `CCX` | 3 | Toffoli |
//! | `MEASURE` | 1 | Computational-basis measurement |

pub mod condition;
pub mod dag;
pub mod document;
pub mod error;
pub mod gate;
pub mod graph;
pub mod instruction;
pub mod parameter;
pub mod qubit;

pub use condition::{Condition, Relation};
pub use dag::{GraphDag, GraphEdge, GraphNode, NodeIndex};
pub use document::{GraphDocument, Statement};
pub use error::{IrError, IrResult};
pub use gate::{GateKind, StandardGate};
pub use graph::{CircuitGraph, Operation, Vertex, VertexId, Wire};
pub use instruction::{Circuit, CircuitUnit, GateUnit};
pub use parameter::ParameterExpression;
pub use qubit::{BitKind, ClbitId, QubitId};
