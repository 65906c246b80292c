//! Gate kinds understood by the compiler and the execution engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gates with built-in semantics.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Fixed single-qubit gates
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Rotation by 90 degrees around X.
    X90,
    /// Rotation by 90 degrees around Y.
    Y90,
    /// Rotation by 90 degrees around Z.
    Z90,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sd,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Td,

    // Angle-carrying single-qubit gates
    /// Rotation around X.
    Rx,
    /// Rotation around Y.
    Ry,
    /// Rotation around Z.
    Rz,
    /// Phase gate.
    P,

    // Controlled gates, controls first
    /// Controlled-X.
    CNOT,
    /// Controlled-Y.
    YCON,
    /// Controlled-Z.
    ZCON,
    /// Toffoli.
    CCX,

    /// Computational-basis measurement.
    Measure,
}

impl StandardGate {
    /// Canonical name of this gate.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            StandardGate::I => "I",
            StandardGate::H => "H",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::X90 => "X90",
            StandardGate::Y90 => "Y90",
            StandardGate::Z90 => "Z90",
            StandardGate::S => "S",
            StandardGate::Sd => "Sd",
            StandardGate::T => "T",
            StandardGate::Td => "Td",
            StandardGate::Rx => "Rx",
            StandardGate::Ry => "Ry",
            StandardGate::Rz => "Rz",
            StandardGate::P => "P",
            StandardGate::CNOT => "CNOT",
            StandardGate::YCON => "YCON",
            StandardGate::ZCON => "ZCON",
            StandardGate::CCX => "CCX",
            StandardGate::Measure => "MEASURE",
        }
    }

    /// Look a gate up by name. `CX`, `CY` and `CZ` are accepted as aliases.
    pub fn from_name(name: &str) -> Option<Self> {
        let gate = match name {
            "I" | "ID" => StandardGate::I,
            "H" => StandardGate::H,
            "X" => StandardGate::X,
            "Y" => StandardGate::Y,
            "Z" => StandardGate::Z,
            "X90" => StandardGate::X90,
            "Y90" => StandardGate::Y90,
            "Z90" => StandardGate::Z90,
            "S" => StandardGate::S,
            "Sd" => StandardGate::Sd,
            "T" => StandardGate::T,
            "Td" => StandardGate::Td,
            "Rx" => StandardGate::Rx,
            "Ry" => StandardGate::Ry,
            "Rz" => StandardGate::Rz,
            "P" => StandardGate::P,
            "CNOT" | "CX" => StandardGate::CNOT,
            "YCON" | "CY" => StandardGate::YCON,
            "ZCON" | "CZ" => StandardGate::ZCON,
            "CCX" => StandardGate::CCX,
            "MEASURE" => StandardGate::Measure,
            _ => return None,
        };
        Some(gate)
    }

    /// Number of qubits this gate acts on.
    #[inline]
    pub fn num_qubits(self) -> usize {
        match self {
            StandardGate::CNOT | StandardGate::YCON | StandardGate::ZCON => 2,
            StandardGate::CCX => 3,
            _ => 1,
        }
    }

    /// Whether the gate takes a rotation angle.
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(
            self,
            StandardGate::Rx | StandardGate::Ry | StandardGate::Rz | StandardGate::P
        )
    }
}

/// The kind of a scheduled gate.
///
/// Names that are not built in are kept as [`GateKind::Custom`]; the
/// compiler schedules them like any other gate and the engine rejects them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GateKind {
    /// A built-in gate.
    Standard(StandardGate),
    /// Any other name.
    Custom(String),
}

impl GateKind {
    /// Resolve a gate name.
    pub fn from_name(name: &str) -> Self {
        StandardGate::from_name(name)
            .map_or_else(|| GateKind::Custom(name.to_string()), GateKind::Standard)
    }

    /// Name of the gate.
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(name) => name,
        }
    }

    /// The built-in gate, if this is one.
    #[inline]
    pub fn standard(&self) -> Option<StandardGate> {
        match self {
            GateKind::Standard(g) => Some(*g),
            GateKind::Custom(_) => None,
        }
    }

    /// Whether this is the identity.
    #[inline]
    pub fn is_identity(&self) -> bool {
        matches!(self, GateKind::Standard(StandardGate::I))
    }

    /// Whether this is a measurement.
    #[inline]
    pub fn is_measure(&self) -> bool {
        matches!(self, GateKind::Standard(StandardGate::Measure))
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl From<String> for GateKind {
    fn from(name: String) -> Self {
        match StandardGate::from_name(&name) {
            Some(g) => GateKind::Standard(g),
            None => GateKind::Custom(name),
        }
    }
}

impl From<GateKind> for String {
    fn from(kind: GateKind) -> Self {
        match kind {
            GateKind::Standard(g) => g.name().to_string(),
            GateKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
