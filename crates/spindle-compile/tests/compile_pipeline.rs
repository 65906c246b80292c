//! Integration tests for the graph-to-circuit pipeline.
//!
//! These tests build graphs through the `GraphDag` builder and check the
//! scheduled circuits: slot assignment, register packing, measurement
//! barriers, and macro expansion.

use std::f64::consts::PI;

use proptest::prelude::*;
use spindle_compile::{CompileError, Compiler};
use spindle_ir::{
    BitKind, Circuit, ClbitId, GateUnit, GraphDag, IrError, ParameterExpression, QubitId,
    Relation,
};

/// Helper: names of the non-identity gates of each slice.
fn slice_names(circuit: &Circuit) -> Vec<Vec<String>> {
    circuit
        .units
        .iter()
        .map(|u| {
            u.iter()
                .filter(|g| !g.is_identity())
                .map(|g| g.name().to_string())
                .collect()
        })
        .collect()
}

/// Helper: every non-identity gate in execution order.
fn gates(circuit: &Circuit) -> Vec<&GateUnit> {
    circuit.gates().filter(|g| !g.is_identity()).collect()
}

fn qubits(n: u32) -> GraphDag {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 0, n);
    g
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn test_bell_schedule() {
    let mut g = qubits(2);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("CNOT", &[], vec![0, 1], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.num_qubits, 2);
    assert_eq!(slice_names(&circuit), vec![vec!["H"], vec!["CNOT"]]);
    // q1 is idle in the first slice
    assert!(circuit.units[0].gates[1].is_identity());
    // the CNOT covers both qubits with one unit
    assert_eq!(circuit.units[1].len(), 1);
}

#[test]
fn test_parallel_gates_share_slice() {
    let mut g = qubits(3);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("X", &[], vec![1], &[]).unwrap();
    g.add_op("Y", &[], vec![2], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.depth(), 1);
    assert_eq!(circuit.units[0].len(), 3);
}

#[test]
fn test_angle_converted_to_degrees() {
    let mut g = qubits(1);
    g.add_op("Rx", &[PI / 2.0], vec![0], &[]).unwrap();
    g.add_op("P", &[-PI], vec![0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let angles: Vec<f64> = gates(&circuit).iter().filter_map(|g| g.angle).collect();
    assert_eq!(angles.len(), 2);
    assert!((angles[0] - 90.0).abs() < 1e-9);
    assert!((angles[1] + 180.0).abs() < 1e-9);
}

#[test]
fn test_sparse_register_ids_are_packed() {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 10, 2);
    g.add_op("X", &[], vec![11], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.num_qubits, 2);
    assert_eq!(gates(&circuit)[0].qubits, vec![QubitId(1)]);
}

#[test]
fn test_unknown_gate_passes_through() {
    let mut g = qubits(2);
    g.add_op("SWAP", &[], vec![0, 1], &[]).unwrap();
    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(slice_names(&circuit), vec![vec!["SWAP"]]);
}

// ============================================================================
// Measurement
// ============================================================================

#[test]
fn test_measurement_is_a_barrier() {
    let mut g = qubits(2);
    g.add_register(BitKind::Clbit, 0, 1);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("MEASURE", &[], vec![0], &[0]).unwrap();
    g.add_op("X", &[], vec![1], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.num_clbits, 1);
    // The X on the untouched qubit still waits for the measurement slot.
    assert_eq!(
        slice_names(&circuit),
        vec![vec!["H"], vec!["MEASURE"], vec!["X"]]
    );
    let m = gates(&circuit)[1];
    assert_eq!(m.clbit, Some(ClbitId(0)));
}

#[test]
fn test_conditioned_gate_after_measurement() {
    let mut g = qubits(2);
    g.add_register(BitKind::Clbit, 0, 1);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("MEASURE", &[], vec![0], &[0]).unwrap();
    let x = g.add_op("X", &[], vec![1], &[]).unwrap();
    g.add_condition(x, &[0], Relation::Eq, 1).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let x = gates(&circuit)[2];
    let cond = x.condition.as_ref().unwrap();
    assert_eq!(cond.clbits, vec![ClbitId(0)]);
    assert_eq!(cond.relation, Relation::Eq);
    assert_eq!(cond.constant, 1);
}

#[test]
fn test_gate_on_measured_qubit_fails() {
    let mut g = qubits(1);
    g.add_register(BitKind::Clbit, 0, 1);
    g.add_op("MEASURE", &[], vec![0], &[0]).unwrap();
    g.add_op("H", &[], vec![0], &[]).unwrap();

    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::SchedulingInvariant { qubit: 0, ref gate, .. } if gate == "H"
    ));
}

#[test]
fn test_gate_reaching_measured_qubit_through_marker_fails() {
    let mut g = qubits(2);
    g.add_register(BitKind::Clbit, 0, 1);
    g.add_op("MEASURE", &[], vec![0], &[0]).unwrap();
    g.add_op("H", &[], vec![1], &[]).unwrap();
    // q1 reaches the CNOT's slot first, so q0 only carries the marker
    g.add_op("CNOT", &[], vec![1, 0], &[]).unwrap();

    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::SchedulingInvariant { qubit: 0, slot: 2, ref gate } if gate == "CNOT"
    ));
}

#[test]
fn test_measure_without_clbit_is_graph_error() {
    let mut g = qubits(1);
    g.add_op("MEASURE", &[], vec![0], &[]).unwrap();
    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::Graph(IrError::GraphAccess { .. })
    ));
}

// ============================================================================
// Macro expansion
// ============================================================================

#[test]
fn test_macro_remaps_local_qubits() {
    let mut g = GraphDag::new();
    g.add_def("bell", 0, 2, 0);
    g.add_callee("H", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_callee("CNOT", vec![], vec![0, 1], &[], vec![], false)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 3);
    g.add_caller("bell", &[], vec![2, 0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let gs = gates(&circuit);
    assert_eq!(gs[0].name(), "H");
    assert_eq!(gs[0].qubits, vec![QubitId(2)]);
    assert_eq!(gs[1].qubits, vec![QubitId(2), QubitId(0)]);
}

#[test]
fn test_macro_parameter_indirection() {
    let mut g = GraphDag::new();
    g.add_def("rot", 2, 1, 0);
    // Rx(p1 / 2) with p1 picked from the caller's second parameter
    let half = ParameterExpression::arg(0) / ParameterExpression::constant(2.0);
    g.add_callee("Rx", vec![half], vec![0], &[], vec![1], false)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_caller("rot", &[0.0, PI], vec![0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let angle = gates(&circuit)[0].angle.unwrap();
    assert!((angle - 90.0).abs() < 1e-9);
}

#[test]
fn test_nested_macro_expansion() {
    let mut g = GraphDag::new();
    g.add_def("flip", 0, 1, 0);
    g.add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_def("flip_both", 0, 2, 0);
    g.add_callee("flip", vec![], vec![0], &[], vec![], true)
        .unwrap();
    g.add_callee("flip", vec![], vec![1], &[], vec![], true)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 2);
    g.add_caller("flip_both", &[], vec![1, 0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.depth(), 1);
    let mut targets: Vec<QubitId> = gates(&circuit).iter().map(|g| g.qubits[0]).collect();
    targets.sort();
    assert_eq!(targets, vec![QubitId(0), QubitId(1)]);
}

#[test]
fn test_call_site_condition_overrides_body() {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_register(BitKind::Clbit, 0, 2);
    g.add_def("guarded", 0, 1, 0);
    let inner = g
        .add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_condition(inner, &[1], Relation::Eq, 0).unwrap();
    let call = g.add_caller("guarded", &[], vec![0], &[]).unwrap();
    g.add_condition(call, &[0], Relation::Ne, 0).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let cond = gates(&circuit)[0].condition.clone().unwrap();
    assert_eq!(cond.clbits, vec![ClbitId(0)]);
    assert_eq!(cond.relation, Relation::Ne);
}

#[test]
fn test_body_condition_applies_without_call_site_condition() {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_register(BitKind::Clbit, 0, 2);
    g.add_def("guarded", 0, 1, 0);
    let inner = g
        .add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_condition(inner, &[1], Relation::Eq, 0).unwrap();
    g.add_caller("guarded", &[], vec![0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let cond = gates(&circuit)[0].condition.clone().unwrap();
    assert_eq!(cond.clbits, vec![ClbitId(1)]);
}

#[test]
fn test_body_conditions_stay_with_their_macro() {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_register(BitKind::Clbit, 0, 1);
    g.add_def("a", 0, 1, 0);
    let xa = g
        .add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_condition(xa, &[0], Relation::Eq, 1).unwrap();
    g.add_def("b", 0, 1, 0);
    let xb = g
        .add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_condition(xb, &[0], Relation::Eq, 0).unwrap();
    g.add_caller("a", &[], vec![0], &[]).unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    assert_eq!(circuit.num_clbits, 1);
    let emitted = gates(&circuit);
    assert_eq!(emitted.len(), 1);
    let cond = emitted[0].condition.clone().unwrap();
    assert_eq!(cond.clbits, vec![ClbitId(0)]);
    assert_eq!(cond.relation, Relation::Eq);
    assert_eq!(cond.constant, 1);
}

#[test]
fn test_body_condition_register_declared_after_call() {
    let mut g = qubits(1);
    g.add_def("guarded", 0, 1, 0);
    let inner = g
        .add_callee("X", vec![], vec![0], &[], vec![], false)
        .unwrap();
    g.add_condition(inner, &[0], Relation::Ne, 0).unwrap();
    g.add_caller("guarded", &[], vec![0], &[]).unwrap();
    g.add_register(BitKind::Clbit, 0, 1);

    let compiler = Compiler::new(&g);
    assert_eq!(compiler.components().unwrap().len(), 1);
    let circuit = compiler.compile().unwrap();
    let cond = gates(&circuit)[0].condition.clone().unwrap();
    assert_eq!(cond.clbits, vec![ClbitId(0)]);
}

#[test]
fn test_whole_list_parameters_in_body() {
    let mut g = GraphDag::new();
    g.add_def("swap_angles", 2, 1, 0);
    g.add_callee(
        "Rz",
        vec![ParameterExpression::arg(1)],
        vec![0],
        &[],
        vec![-1],
        false,
    )
    .unwrap();
    g.add_callee(
        "Rx",
        vec![ParameterExpression::arg(0)],
        vec![0],
        &[],
        vec![-1],
        false,
    )
    .unwrap();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_caller("swap_angles", &[PI, PI / 2.0], vec![0], &[])
        .unwrap();

    let circuit = Compiler::new(&g).compile().unwrap();
    let angles: Vec<f64> = gates(&circuit).iter().filter_map(|g| g.angle).collect();
    assert_eq!(angles.len(), 2);
    assert!((angles[0] - 90.0).abs() < 1e-9);
    assert!((angles[1] - 180.0).abs() < 1e-9);
}

#[test]
fn test_missing_definition() {
    let mut g = qubits(1);
    g.add_caller("ghost", &[], vec![0], &[]).unwrap();
    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(
        err,
        CompileError::MacroResolution { ref name, .. } if name == "ghost"
    ));
}

#[test]
fn test_exhausted_parameter_indices() {
    let mut g = GraphDag::new();
    g.add_def("rot", 1, 1, 0);
    let sum = ParameterExpression::arg(0) + ParameterExpression::arg(1);
    g.add_callee("Rz", vec![sum], vec![0], &[], vec![0], false)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_caller("rot", &[1.0], vec![0], &[]).unwrap();

    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(err, CompileError::MacroResolution { .. }));
}

#[test]
fn test_local_slot_out_of_range() {
    let mut g = GraphDag::new();
    g.add_def("wide", 0, 2, 0);
    g.add_callee("CNOT", vec![], vec![0, 1], &[], vec![], false)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_caller("wide", &[], vec![0], &[]).unwrap();

    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(err, CompileError::MacroResolution { .. }));
}

#[test]
fn test_recursive_macro_rejected() {
    let mut g = GraphDag::new();
    g.add_def("loop", 0, 1, 0);
    g.add_callee("loop", vec![], vec![0], &[], vec![], true)
        .unwrap();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_caller("loop", &[], vec![0], &[]).unwrap();

    let err = Compiler::new(&g).compile().unwrap_err();
    assert!(matches!(err, CompileError::MacroResolution { .. }));
}

// ============================================================================
// Determinism and components
// ============================================================================

#[test]
fn test_compile_is_idempotent() {
    let mut g = qubits(3);
    g.add_register(BitKind::Clbit, 0, 3);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("CNOT", &[], vec![0, 1], &[]).unwrap();
    g.add_op("Ry", &[0.3], vec![2], &[]).unwrap();
    g.add_op("MEASURE", &[], vec![0, 1, 2], &[0, 1, 2]).unwrap();

    let compiler = Compiler::new(&g);
    let first = compiler.compile().unwrap();
    let second = compiler.compile().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_components_compile_independently() {
    let mut g = GraphDag::new();
    g.add_register(BitKind::Qubit, 0, 1);
    g.add_register(BitKind::Qubit, 1, 1);
    g.add_op("H", &[], vec![0], &[]).unwrap();
    g.add_op("X", &[], vec![1], &[]).unwrap();
    g.add_op("X", &[], vec![1], &[]).unwrap();

    let compiler = Compiler::new(&g);
    let comps = compiler.components().unwrap();
    assert_eq!(comps.len(), 2);
    let second = compiler.compile_component(&comps[1]).unwrap();
    assert_eq!(second.num_qubits, 1);
    assert_eq!(second.depth(), 2);

    // The whole graph packs component 1 after component 0.
    let whole = compiler.compile().unwrap();
    assert_eq!(whole.num_qubits, 2);
    assert!(
        gates(&whole)
            .iter()
            .filter(|g| g.name() == "X")
            .all(|g| g.qubits == vec![QubitId(1)])
    );
}

// ============================================================================
// Properties
// ============================================================================

fn gate_strategy(n: u32) -> impl Strategy<Value = (bool, u32, u32)> {
    (any::<bool>(), 0..n, 0..n)
}

proptest! {
    #[test]
    fn prop_every_slice_covers_each_qubit_once(
        ops in prop::collection::vec(gate_strategy(4), 0..40)
    ) {
        let mut g = qubits(4);
        let mut expected = 0usize;
        for (two, a, b) in ops {
            if two && a != b {
                g.add_op("CNOT", &[], vec![a, b], &[]).unwrap();
            } else {
                g.add_op("H", &[], vec![a], &[]).unwrap();
            }
            expected += 1;
        }

        let circuit = Compiler::new(&g).compile().unwrap();
        for unit in &circuit.units {
            let mut seen = [0usize; 4];
            for gate in unit.iter() {
                for q in &gate.qubits {
                    seen[q.index()] += 1;
                }
            }
            prop_assert_eq!(seen, [1, 1, 1, 1]);
        }
        prop_assert_eq!(circuit.gate_count(), expected);
    }
}
