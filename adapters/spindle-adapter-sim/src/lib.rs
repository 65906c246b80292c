//! Spindle Branching Statevector Simulator
//!
//! This crate executes compiled circuits exactly. Instead of sampling a
//! measurement outcome, every measurement splits the current branch into
//! weighted children, so the final distribution carries no sampling
//! noise. Shot counts are apportioned from it by `spindle-hal`.
//!
//! # Features
//!
//! - **Exact mid-circuit measurement**: one branch per decohered outcome
//! - **Classical control**: conditional gates and measurements, with a
//!   cached condition index that is selectively invalidated
//! - **Component parallelism**: independent register groups simulated
//!   concurrently with `rayon` and combined by tensor product
//!
//! # Memory
//!
//! | Qubits | Per branch |
//! |--------|------------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! Each live branch holds its own amplitude vector.
//!
//! # Example
//!
//! ```rust
//! use spindle_adapter_sim::SimulatorBackend;
//! use spindle_hal::{Backend, ExecuteOptions};
//! use spindle_ir::{BitKind, GraphDag};
//!
//! let mut dag = GraphDag::new();
//! dag.add_register(BitKind::Qubit, 0, 2);
//! dag.add_op("X", &[], vec![0], &[]).unwrap();
//! dag.add_op("CNOT", &[], vec![0, 1], &[]).unwrap();
//!
//! let backend = SimulatorBackend::new();
//! let result = backend.execute(&dag, &ExecuteOptions::default()).unwrap();
//! assert_eq!(result.counts()["11"], 1024);
//! ```

pub mod branch;
pub mod error;
pub mod gates;
pub mod manager;
pub mod simulator;

pub use branch::{BranchId, PRUNE_WEIGHT, QuantumBranch};
pub use error::{SimError, SimResult};
pub use manager::BranchManager;
pub use simulator::{Outcome, SimulatorBackend};
