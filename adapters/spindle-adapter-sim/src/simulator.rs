//! Simulator backend implementation.

use num_complex::Complex64;
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, instrument};

use spindle_compile::Compiler;
use spindle_hal::{
    Backend, ExecuteOptions, ExecutionResult, HalError, HalResult, pack_probabilities,
};
use spindle_ir::{Circuit, CircuitGraph};

use crate::manager::BranchManager;

/// Distribution and optional statevector of one simulated circuit.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Probability of every basis index.
    pub probabilities: Vec<f64>,
    /// Final amplitudes, when a single branch survived.
    pub states: Option<Vec<Complex64>>,
}

impl Outcome {
    /// Tensor product `self ⊗ other`, with `self` as the high-order block.
    pub fn tensor(&self, other: &Outcome) -> Outcome {
        let probabilities = kron(&self.probabilities, &other.probabilities);
        let states = match (&self.states, &other.states) {
            (Some(a), Some(b)) => Some(kron(a, b)),
            _ => None,
        };
        Outcome {
            probabilities,
            states,
        }
    }
}

fn kron<T>(a: &[T], b: &[T]) -> Vec<T>
where
    T: Copy + std::ops::Mul<Output = T>,
{
    a.iter()
        .flat_map(|&x| b.iter().map(move |&y| x * y))
        .collect()
}

/// Local branching statevector simulator.
///
/// Measurements split the state into weighted branches instead of
/// sampling, so the returned probabilities are exact; counts are
/// apportioned from them afterwards.
pub struct SimulatorBackend {
    name: String,
}

impl SimulatorBackend {
    /// Create a new simulator backend.
    pub fn new() -> Self {
        Self {
            name: "simulator".into(),
        }
    }

    /// Simulate one compiled circuit.
    #[instrument(skip(self, circuit))]
    pub fn simulate(&self, circuit: &Circuit, verbose: bool) -> HalResult<Outcome> {
        let manager = BranchManager::simulate(circuit, verbose)?;
        if verbose {
            for (i, branch) in manager.branches().enumerate() {
                debug!(
                    "Branch {i}: weight {:.6}, {} recorded slice(s)",
                    branch.weight,
                    branch.history.as_ref().map_or(0, Vec::len)
                );
            }
        }
        Ok(Outcome {
            probabilities: manager.probabilities(),
            states: manager.final_state(),
        })
    }

    fn log_circuit(circuit: &Circuit) -> HalResult<()> {
        info!("Compiled circuit:\n{}", circuit.to_json()?);
        Ok(())
    }

    fn run_sequential<G>(&self, graph: &G, options: &ExecuteOptions) -> HalResult<Outcome>
    where
        G: CircuitGraph + ?Sized,
    {
        let circuit = Compiler::new(graph).compile()?;
        if options.print_circuit {
            Self::log_circuit(&circuit)?;
        }
        self.simulate(&circuit, options.verbose)
    }

    fn run_parallel<G>(&self, graph: &G, options: &ExecuteOptions) -> HalResult<Outcome>
    where
        G: CircuitGraph + Sync + ?Sized,
    {
        let compiler = Compiler::new(graph);
        let components = compiler.components()?;
        debug!("Simulating {} component(s) in parallel", components.len());

        let outcomes = components
            .par_iter()
            .map(|component| -> HalResult<Option<Outcome>> {
                let circuit = compiler.compile_component(component)?;
                if circuit.num_qubits == 0 {
                    return Ok(None);
                }
                if options.print_circuit {
                    Self::log_circuit(&circuit)?;
                }
                self.simulate(&circuit, options.verbose).map(Some)
            })
            .collect::<HalResult<Vec<_>>>()?;

        let identity = Outcome {
            probabilities: vec![1.0],
            states: Some(vec![Complex64::new(1.0, 0.0)]),
        };
        Ok(outcomes
            .iter()
            .flatten()
            .fold(identity, |acc, outcome| acc.tensor(outcome)))
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, graph))]
    fn execute(
        &self,
        graph: &(dyn CircuitGraph + Sync),
        options: &ExecuteOptions,
    ) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        debug!(
            "Executing graph: {} vertices, {} shots",
            graph.vertex_count(),
            options.shots
        );

        let outcome = if options.parallel {
            self.run_parallel(graph, options)?
        } else {
            self.run_sequential(graph, options)?
        };
        let num_qubits = outcome.probabilities.len().ilog2() as usize;
        if let Some(&q) = options.mqubits.iter().find(|&&q| q >= num_qubits) {
            return Err(HalError::InvalidOptions(format!(
                "measured qubit {q} is outside the {num_qubits} compiled qubit(s)"
            )));
        }
        let probabilities = pack_probabilities(&outcome.probabilities, &options.mqubits);

        let elapsed = start.elapsed();
        debug!("Execution completed in {:?}", elapsed);

        Ok(ExecutionResult::new(probabilities, options.shots)
            .with_states(outcome.states)
            .with_execution_time(elapsed.as_millis() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kron_blocks() {
        let a = Outcome {
            probabilities: vec![0.25, 0.75],
            states: None,
        };
        let b = Outcome {
            probabilities: vec![0.0, 1.0],
            states: None,
        };
        let ab = a.tensor(&b);
        assert_eq!(ab.probabilities, vec![0.0, 0.25, 0.0, 0.75]);
        assert!(ab.states.is_none());
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(SimulatorBackend::new().name(), "simulator");
    }
}
