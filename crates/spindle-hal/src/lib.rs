//! Spindle Execution Interface
//!
//! This crate defines what callers hand to a backend and what they get
//! back:
//!
//! - [`ExecuteOptions`]: shots, measured-qubit selection, logging and
//!   parallelism switches
//! - [`ExecutionResult`]: keyed probabilities, lazily apportioned shot
//!   counts, the optional final statevector, random readings
//! - [`pack_probabilities`] and [`calc_counts`]: the result packer
//! - [`Backend`]: the execution seam implemented by `spindle-adapter-sim`
//!
//! # Example
//!
//! ```rust
//! use spindle_hal::{ExecutionResult, pack_probabilities};
//! use std::collections::BTreeSet;
//!
//! let probabilities = pack_probabilities(&[0.5, 0.0, 0.0, 0.5], &BTreeSet::new());
//! let result = ExecutionResult::new(probabilities, 1000);
//! assert_eq!(result.counts()["00"], 500);
//! assert_eq!(result.counts()["11"], 500);
//! ```

pub mod backend;
pub mod error;
pub mod options;
pub mod packer;
pub mod result;

pub use backend::Backend;
pub use error::{HalError, HalResult};
pub use options::{DEFAULT_SHOTS, ExecuteOptions};
pub use packer::{EPSILON, basis_key, calc_counts, pack_probabilities};
pub use result::ExecutionResult;
