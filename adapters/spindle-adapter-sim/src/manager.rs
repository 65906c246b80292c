//! The branch set and its condition index.

use num_complex::Complex64;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, instrument};

use spindle_ir::{Circuit, ClbitId, Condition, GateUnit};

use crate::branch::{BranchId, QuantumBranch};
use crate::error::{SimError, SimResult};
use crate::gates::{gate_matrix, targets};

/// Owns every branch of one simulation.
///
/// Branches live in an arena indexed by [`BranchId`]; a measured parent's
/// slot is emptied and its children are appended. The live list keeps
/// children where their parent stood, so iteration order is stable.
///
/// Conditional gates look up the live branches satisfying their condition
/// in a cache. After a measurement of clbit `c`, cached entries reading
/// `c` are dropped; every other entry swaps the parent for its children,
/// since the children share the parent's remaining classical bits.
#[derive(Debug)]
pub struct BranchManager {
    arena: Vec<Option<QuantumBranch>>,
    live: Vec<BranchId>,
    condition_index: FxHashMap<Condition, FxHashSet<BranchId>>,
    dependents: FxHashMap<ClbitId, FxHashSet<Condition>>,
    num_qubits: usize,
    num_clbits: usize,
}

impl BranchManager {
    /// A manager holding the single `|0...0⟩` branch.
    pub fn new(num_qubits: usize, num_clbits: usize, record_history: bool) -> Self {
        Self {
            arena: vec![Some(QuantumBranch::new(
                num_qubits,
                num_clbits,
                record_history,
            ))],
            live: vec![0],
            condition_index: FxHashMap::default(),
            dependents: FxHashMap::default(),
            num_qubits,
            num_clbits,
        }
    }

    /// Simulate `circuit` from `|0...0⟩`.
    #[instrument(skip(circuit), fields(qubits = circuit.num_qubits, depth = circuit.depth()))]
    pub fn simulate(circuit: &Circuit, record_history: bool) -> SimResult<Self> {
        let mut manager = Self::new(circuit.num_qubits, circuit.num_clbits, record_history);
        manager.run(circuit)?;
        debug!("Simulation finished with {} branch(es)", manager.live.len());
        Ok(manager)
    }

    /// Run every slice of `circuit`.
    pub fn run(&mut self, circuit: &Circuit) -> SimResult<()> {
        for unit in &circuit.units {
            for gate in unit.iter() {
                if gate.is_identity() {
                    continue;
                }
                self.apply_gate(gate)?;
            }
            self.end_slice();
        }
        if self.live.is_empty() {
            return Err(SimError::AllBranchesPruned);
        }
        Ok(())
    }

    /// Apply one gate to every live branch it targets.
    pub fn apply_gate(&mut self, gate: &GateUnit) -> SimResult<()> {
        let targeted = self.targeted(gate.condition.as_ref());
        if gate.is_measure() {
            return self.measure(gate, &targeted);
        }
        let matrix = gate_matrix(gate)?;
        let operands = targets(gate, self.num_qubits)?;
        for id in targeted {
            if let Some(branch) = self.arena[id].as_mut() {
                branch.apply(&operands, &matrix);
            }
        }
        Ok(())
    }

    /// Live branches in live order, filtered by `condition`.
    fn targeted(&mut self, condition: Option<&Condition>) -> Vec<BranchId> {
        let Some(condition) = condition else {
            return self.live.clone();
        };
        if !self.condition_index.contains_key(condition) {
            let satisfying: FxHashSet<BranchId> = self
                .live
                .iter()
                .copied()
                .filter(|&id| {
                    self.arena[id]
                        .as_ref()
                        .is_some_and(|b| condition.evaluate(&b.clbits))
                })
                .collect();
            for &clbit in &condition.clbits {
                self.dependents
                    .entry(clbit)
                    .or_default()
                    .insert(condition.clone());
            }
            self.condition_index.insert(condition.clone(), satisfying);
        }
        let satisfying = &self.condition_index[condition];
        self.live
            .iter()
            .copied()
            .filter(|id| satisfying.contains(id))
            .collect()
    }

    fn measure(&mut self, gate: &GateUnit, targeted: &[BranchId]) -> SimResult<()> {
        let qubit = targets(gate, self.num_qubits)?
            .first()
            .copied()
            .ok_or_else(|| SimError::ArityMismatch {
                gate: gate.name().to_string(),
                expected: 1,
                got: 0,
            })?;
        let clbit = gate.clbit.unwrap_or(ClbitId(qubit as u32));
        if clbit.index() >= self.num_clbits {
            return Err(SimError::ClbitOutOfRange {
                clbit: clbit.index(),
                num_clbits: self.num_clbits,
            });
        }

        let mut replaced: FxHashMap<BranchId, Vec<BranchId>> = FxHashMap::default();
        for &parent in targeted {
            let Some(branch) = self.arena[parent].take() else {
                continue;
            };
            let mut ids = Vec::with_capacity(2);
            for child in branch.measure(qubit, clbit.index()) {
                ids.push(self.arena.len());
                self.arena.push(Some(child));
            }
            replaced.insert(parent, ids);
        }

        self.live = self
            .live
            .iter()
            .flat_map(|id| match replaced.get(id) {
                Some(children) => children.clone(),
                None => vec![*id],
            })
            .collect();
        self.invalidate(clbit, &replaced);
        Ok(())
    }

    fn invalidate(&mut self, clbit: ClbitId, replaced: &FxHashMap<BranchId, Vec<BranchId>>) {
        if let Some(stale) = self.dependents.remove(&clbit) {
            for condition in &stale {
                self.condition_index.remove(condition);
            }
        }
        for satisfying in self.condition_index.values_mut() {
            for (parent, children) in replaced {
                if satisfying.remove(parent) {
                    satisfying.extend(children.iter().copied());
                }
            }
        }
    }

    fn end_slice(&mut self) {
        for &id in &self.live {
            if let Some(branch) = self.arena[id].as_mut() {
                branch.record_slice();
            }
        }
    }

    /// Number of live branches.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Live branches in live order.
    pub fn branches(&self) -> impl Iterator<Item = &QuantumBranch> {
        self.live.iter().filter_map(|&id| self.arena[id].as_ref())
    }

    /// `Σ_b w_b |a_b[i]|²` over live branches.
    pub fn probabilities(&self) -> Vec<f64> {
        let mut out = vec![0.0; 1 << self.num_qubits];
        for branch in self.branches() {
            for (p, q) in out.iter_mut().zip(branch.weighted_probabilities()) {
                *p += q;
            }
        }
        out
    }

    /// The statevector, when exactly one branch survived.
    pub fn final_state(&self) -> Option<Vec<Complex64>> {
        match self.live.as_slice() {
            [id] => self.arena[*id].as_ref().map(|b| b.amplitudes.clone()),
            _ => None,
        }
    }

    #[cfg(test)]
    fn cached(&self, condition: &Condition) -> Option<&FxHashSet<BranchId>> {
        self.condition_index.get(condition)
    }
}
