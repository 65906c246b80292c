//! Gate matrices and their application to amplitude vectors.
//!
//! Qubit `q` of an `n`-qubit register is amplitude bit `n - 1 - q`, so
//! qubit 0 is the most significant bit of a basis index. A `k`-qubit
//! matrix is indexed the same way: its first operand is the most
//! significant local bit.

use ndarray::{Array1, Array2, array, s};
use num_complex::Complex64;
use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4, PI};

use spindle_ir::{GateUnit, StandardGate};

use crate::error::{SimError, SimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const IMAG: Complex64 = Complex64::new(0.0, 1.0);

/// Convert a stored angle back to radians.
#[inline]
pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees / 180.0 * PI
}

fn diagonal(a: Complex64, b: Complex64) -> Array2<Complex64> {
    array![[a, ZERO], [ZERO, b]]
}

fn pauli_x() -> Array2<Complex64> {
    array![[ZERO, ONE], [ONE, ZERO]]
}

fn pauli_y() -> Array2<Complex64> {
    array![[ZERO, -IMAG], [IMAG, ZERO]]
}

fn pauli_z() -> Array2<Complex64> {
    diagonal(ONE, -ONE)
}

/// Rotation around X by `theta` radians.
pub fn rx(theta: f64) -> Array2<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [Complex64::new(c, 0.0), Complex64::new(0.0, -s)],
        [Complex64::new(0.0, -s), Complex64::new(c, 0.0)]
    ]
}

/// Rotation around Y by `theta` radians.
pub fn ry(theta: f64) -> Array2<Complex64> {
    let (s, c) = (theta / 2.0).sin_cos();
    array![
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)]
    ]
}

/// Rotation around Z by `theta` radians.
pub fn rz(theta: f64) -> Array2<Complex64> {
    diagonal(
        Complex64::from_polar(1.0, -theta / 2.0),
        Complex64::from_polar(1.0, theta / 2.0),
    )
}

/// Phase gate `diag(1, e^{i theta})`.
pub fn phase(theta: f64) -> Array2<Complex64> {
    diagonal(ONE, Complex64::from_polar(1.0, theta))
}

/// `u` controlled on `controls` leading qubits.
pub fn controlled(u: &Array2<Complex64>, controls: usize) -> Array2<Complex64> {
    let dim = u.nrows() << controls;
    let offset = dim - u.nrows();
    let mut m = Array2::<Complex64>::eye(dim);
    m.slice_mut(s![offset.., offset..]).assign(u);
    m
}

/// The unitary of a scheduled gate.
pub fn gate_matrix(gate: &GateUnit) -> SimResult<Array2<Complex64>> {
    let first = gate.qubits.first().map_or(0, |q| q.index());
    let unsupported = || SimError::UnsupportedGate {
        gate: gate.name().to_string(),
        qubit: first,
    };
    let standard = gate.kind.standard().ok_or_else(unsupported)?;
    let angle = || {
        gate.angle
            .map(degrees_to_radians)
            .ok_or_else(|| SimError::MissingAngle {
                gate: gate.name().to_string(),
            })
    };

    let matrix = match standard {
        StandardGate::I => Array2::eye(2),
        StandardGate::H => {
            let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
            array![[h, h], [h, -h]]
        }
        StandardGate::X => pauli_x(),
        StandardGate::Y => pauli_y(),
        StandardGate::Z => pauli_z(),
        StandardGate::X90 => rx(FRAC_PI_2),
        StandardGate::Y90 => ry(FRAC_PI_2),
        StandardGate::Z90 => rz(FRAC_PI_2),
        StandardGate::S => diagonal(ONE, IMAG),
        StandardGate::Sd => diagonal(ONE, -IMAG),
        StandardGate::T => phase(FRAC_PI_4),
        StandardGate::Td => phase(-FRAC_PI_4),
        StandardGate::Rx => rx(angle()?),
        StandardGate::Ry => ry(angle()?),
        StandardGate::Rz => rz(angle()?),
        StandardGate::P => phase(angle()?),
        StandardGate::CNOT => controlled(&pauli_x(), 1),
        StandardGate::YCON => controlled(&pauli_y(), 1),
        StandardGate::ZCON => controlled(&pauli_z(), 1),
        StandardGate::CCX => controlled(&pauli_x(), 2),
        StandardGate::Measure => return Err(unsupported()),
    };

    let expected = standard.num_qubits();
    if gate.qubits.len() != expected {
        return Err(SimError::ArityMismatch {
            gate: gate.name().to_string(),
            expected,
            got: gate.qubits.len(),
        });
    }
    Ok(matrix)
}

/// Dense operand indices of `gate`, checked against the register.
pub fn targets(gate: &GateUnit, num_qubits: usize) -> SimResult<Vec<usize>> {
    let mut out: Vec<usize> = Vec::with_capacity(gate.qubits.len());
    for q in &gate.qubits {
        let qubit = q.index();
        if qubit >= num_qubits {
            return Err(SimError::QubitOutOfRange { qubit, num_qubits });
        }
        if out.contains(&qubit) {
            return Err(SimError::DuplicateQubit {
                gate: gate.name().to_string(),
                qubit,
            });
        }
        out.push(qubit);
    }
    Ok(out)
}

/// Apply `matrix` to `targets` of an `n`-qubit amplitude vector.
///
/// Amplitudes are visited in groups of `2^k` that differ only in the
/// target bits; each group is multiplied by the matrix in place.
pub fn apply_matrix(
    amplitudes: &mut [Complex64],
    num_qubits: usize,
    targets: &[usize],
    matrix: &Array2<Complex64>,
) {
    let k = targets.len();
    let dim = 1usize << k;
    debug_assert_eq!(matrix.nrows(), dim);

    let masks: Vec<usize> = targets
        .iter()
        .map(|&q| 1usize << (num_qubits - 1 - q))
        .collect();
    let all = masks.iter().fold(0, |acc, m| acc | m);
    let offsets: Vec<usize> = (0..dim)
        .map(|local| {
            masks
                .iter()
                .enumerate()
                .filter(|(j, _)| (local >> (k - 1 - j)) & 1 == 1)
                .fold(0, |acc, (_, m)| acc | m)
        })
        .collect();

    let mut group = Array1::<Complex64>::zeros(dim);
    for base in 0..amplitudes.len() {
        if base & all != 0 {
            continue;
        }
        for (slot, &off) in offsets.iter().enumerate() {
            group[slot] = amplitudes[base | off];
        }
        let out = matrix.dot(&group);
        for (slot, &off) in offsets.iter().enumerate() {
            amplitudes[base | off] = out[slot];
        }
    }
}
