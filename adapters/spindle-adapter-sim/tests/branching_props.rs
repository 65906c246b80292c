//! Property tests for the branching engine.

use proptest::prelude::*;

use spindle_adapter_sim::BranchManager;
use spindle_ir::{Circuit, CircuitUnit, ClbitId, GateUnit, QubitId, StandardGate};

const NUM_QUBITS: u32 = 3;

#[derive(Debug, Clone)]
enum Step {
    Rotate(StandardGate, u32, f64),
    Cnot(u32, u32),
    Measure(u32),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (
            prop::sample::select(vec![StandardGate::Rx, StandardGate::Ry, StandardGate::Rz]),
            0..NUM_QUBITS,
            -360.0f64..360.0,
        )
            .prop_map(|(g, q, a)| Step::Rotate(g, q, a)),
        (0..NUM_QUBITS, 1..NUM_QUBITS).prop_map(|(c, d)| Step::Cnot(c, (c + d) % NUM_QUBITS)),
        (0..NUM_QUBITS).prop_map(Step::Measure),
    ]
}

/// One gate per slice; measured qubits take no further gates.
fn circuit(steps: &[Step]) -> Circuit {
    let mut circuit = Circuit::new(NUM_QUBITS as usize, NUM_QUBITS as usize);
    let mut measured = [false; NUM_QUBITS as usize];
    for s in steps {
        let gate = match *s {
            Step::Rotate(g, q, a) if !measured[q as usize] => {
                GateUnit::new(g, [QubitId(q)]).with_angle(a)
            }
            Step::Cnot(c, t) if !measured[c as usize] && !measured[t as usize] => {
                GateUnit::new(StandardGate::CNOT, [QubitId(c), QubitId(t)])
            }
            Step::Measure(q) if !measured[q as usize] => {
                measured[q as usize] = true;
                GateUnit::measure(QubitId(q), ClbitId(q))
            }
            _ => continue,
        };
        circuit.push_unit(CircuitUnit { gates: vec![gate] });
    }
    circuit
}

proptest! {
    #[test]
    fn prop_total_probability_is_one(steps in prop::collection::vec(step(), 0..24)) {
        let manager = BranchManager::simulate(&circuit(&steps), false).unwrap();
        let total: f64 = manager.probabilities().iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn prop_branch_weights_sum_to_one(steps in prop::collection::vec(step(), 0..24)) {
        let manager = BranchManager::simulate(&circuit(&steps), false).unwrap();
        let weights: f64 = manager.branches().map(|b| b.weight).sum();
        prop_assert!((weights - 1.0).abs() < 1e-9);
        prop_assert!(manager.live_count() <= 1 << NUM_QUBITS);
    }
}
