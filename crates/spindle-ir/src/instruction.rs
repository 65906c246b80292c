//! The scheduled program: gate units grouped into time slices.

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::IrResult;
use crate::gate::{GateKind, StandardGate};
use crate::qubit::{ClbitId, QubitId};

/// One scheduled gate with its operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateUnit {
    /// The gate.
    pub kind: GateKind,
    /// Target qubits, controls first for controlled gates.
    pub qubits: Vec<QubitId>,
    /// Rotation angle in degrees, for angle-carrying gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Classical target, for measurements only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clbit: Option<ClbitId>,
    /// Guard on classical bits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Condition>,
}

impl GateUnit {
    /// Create an unconditioned gate unit.
    pub fn new(kind: impl Into<GateKind>, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self {
            kind: kind.into(),
            qubits: qubits.into_iter().collect(),
            angle: None,
            clbit: None,
            condition: None,
        }
    }

    /// Identity on one qubit.
    pub fn identity(qubit: QubitId) -> Self {
        Self::new(StandardGate::I, [qubit])
    }

    /// Measurement of `qubit` into `clbit`.
    pub fn measure(qubit: QubitId, clbit: ClbitId) -> Self {
        Self {
            clbit: Some(clbit),
            ..Self::new(StandardGate::Measure, [qubit])
        }
    }

    /// Attach a rotation angle in degrees.
    #[must_use]
    pub fn with_angle(mut self, degrees: f64) -> Self {
        self.angle = Some(degrees);
        self
    }

    /// Attach a condition.
    #[must_use]
    pub fn with_condition(mut self, condition: Option<Condition>) -> Self {
        self.condition = condition;
        self
    }

    /// Whether this is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.kind.is_identity()
    }

    /// Whether this is a measurement.
    #[inline]
    pub fn is_measure(&self) -> bool {
        self.kind.is_measure()
    }

    /// Name of the gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }
}

/// One time slice of a [`Circuit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CircuitUnit {
    /// Gates in this slice, in qubit order.
    pub gates: Vec<GateUnit>,
}

impl CircuitUnit {
    /// Append a gate to the slice.
    pub fn push(&mut self, gate: GateUnit) {
        self.gates.push(gate);
    }

    /// Iterate over the gates.
    pub fn iter(&self) -> impl Iterator<Item = &GateUnit> {
        self.gates.iter()
    }

    /// Number of gates in the slice.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the slice holds no gate.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// A compiled, time-scheduled circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Time slices in execution order.
    pub units: Vec<CircuitUnit>,
    /// Number of simulated qubits.
    pub num_qubits: usize,
    /// Number of classical bits.
    pub num_clbits: usize,
}

impl Circuit {
    /// Create an empty circuit over the given bit counts.
    pub fn new(num_qubits: usize, num_clbits: usize) -> Self {
        Self {
            units: Vec::new(),
            num_qubits,
            num_clbits,
        }
    }

    /// Append a time slice.
    pub fn push_unit(&mut self, unit: CircuitUnit) {
        self.units.push(unit);
    }

    /// Number of time slices.
    pub fn depth(&self) -> usize {
        self.units.len()
    }

    /// Number of non-identity gates.
    pub fn gate_count(&self) -> usize {
        self.units
            .iter()
            .flat_map(CircuitUnit::iter)
            .filter(|g| !g.is_identity())
            .count()
    }

    /// Iterate over all gates in execution order.
    pub fn gates(&self) -> impl Iterator<Item = &GateUnit> {
        self.units.iter().flat_map(CircuitUnit::iter)
    }

    /// Pretty-printed JSON dump.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Relation;

    #[test]
    fn test_measure_unit() {
        let m = GateUnit::measure(QubitId(1), ClbitId(0));
        assert!(m.is_measure());
        assert_eq!(m.clbit, Some(ClbitId(0)));
        assert_eq!(m.qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_gate_count_skips_identity() {
        let mut unit = CircuitUnit::default();
        unit.push(GateUnit::new(StandardGate::H, [QubitId(0)]));
        unit.push(GateUnit::identity(QubitId(1)));
        let mut circuit = Circuit::new(2, 0);
        circuit.push_unit(unit);
        assert_eq!(circuit.depth(), 1);
        assert_eq!(circuit.gate_count(), 1);
    }

    #[test]
    fn test_json_shape() {
        let cond = Condition::new(vec![ClbitId(0)], Relation::Eq, 1);
        let gate = GateUnit::new(StandardGate::Rx, [QubitId(0)])
            .with_angle(90.0)
            .with_condition(Some(cond));
        let mut circuit = Circuit::new(1, 1);
        circuit.push_unit(CircuitUnit { gates: vec![gate] });

        let json = circuit.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["units"][0][0];
        assert_eq!(first["kind"], "Rx");
        assert_eq!(first["angle"], 90.0);
        assert!(first.get("clbit").is_none());

        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
