//! List scheduling of gates into per-qubit time rows.
//!
//! Every qubit owns a row; the row length is the qubit's next free slot.
//! A gate lands in the earliest slot free on all of its qubits. It is
//! stored once, in the row of its first operand reaching that slot; the
//! other operands get a [`Cell::Reserved`] marker there. A measurement is
//! a barrier: afterwards every row is at least one past the measurement
//! slot.

use spindle_ir::{Circuit, CircuitUnit, ClbitId, Condition, GateUnit, QubitId};

use crate::error::{CompileError, CompileResult};

/// One cell of a time row.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// A gate stored in this row.
    Gate(GateUnit),
    /// Occupied by a multi-qubit gate stored in another row.
    Reserved,
}

/// Per-qubit time rows under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeList {
    rows: Vec<Vec<Cell>>,
}

impl TimeList {
    /// Create empty rows for `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            rows: vec![Vec::new(); num_qubits],
        }
    }

    /// Number of rows.
    pub fn num_qubits(&self) -> usize {
        self.rows.len()
    }

    /// Next free slot of a qubit.
    pub fn next_free(&self, qubit: QubitId) -> Option<usize> {
        self.rows.get(qubit.index()).map(Vec::len)
    }

    /// Cells of one row.
    pub fn row(&self, qubit: QubitId) -> Option<&[Cell]> {
        self.rows.get(qubit.index()).map(Vec::as_slice)
    }

    /// Highest occupied slot over all rows.
    pub fn max_slot(&self) -> Option<usize> {
        self.rows.iter().map(Vec::len).max().filter(|&l| l > 0).map(|l| l - 1)
    }

    fn check(&self, qubit: QubitId) -> CompileResult<()> {
        if qubit.index() < self.rows.len() {
            Ok(())
        } else {
            Err(CompileError::QubitOutOfRange {
                qubit: qubit.index(),
                num_qubits: self.rows.len(),
            })
        }
    }

    fn pad(&mut self, qubit: QubitId, slot: usize) {
        let row = &mut self.rows[qubit.index()];
        while row.len() < slot {
            row.push(Cell::Gate(GateUnit::identity(qubit)));
        }
    }

    /// Place a unitary on 1 to 3 qubits and return its slot.
    pub fn append_unitary(&mut self, gate: GateUnit) -> CompileResult<usize> {
        if gate.qubits.is_empty() || gate.qubits.len() > 3 {
            return Err(CompileError::UnsupportedArity {
                gate: gate.name().to_string(),
                got: gate.qubits.len(),
            });
        }
        for &q in &gate.qubits {
            self.check(q)?;
        }

        let slot = gate
            .qubits
            .iter()
            .map(|q| self.rows[q.index()].len())
            .max()
            .unwrap_or(0);
        let owner = gate
            .qubits
            .iter()
            .position(|q| self.rows[q.index()].len() == slot)
            .unwrap_or(0);

        let owner_row = gate.qubits[owner].index();
        for (i, &q) in gate.qubits.iter().enumerate() {
            self.pad(q, slot);
            if i != owner {
                self.rows[q.index()].push(Cell::Reserved);
            }
        }
        self.rows[owner_row].push(Cell::Gate(gate));
        Ok(slot)
    }

    /// Place parallel measurements and return their common slot.
    ///
    /// Every row is then padded with identity up to `slot + 1`.
    pub fn append_measurement(
        &mut self,
        targets: &[(QubitId, ClbitId)],
        condition: Option<&Condition>,
    ) -> CompileResult<usize> {
        for &(q, _) in targets {
            self.check(q)?;
        }
        let slot = targets
            .iter()
            .map(|(q, _)| self.rows[q.index()].len())
            .max()
            .unwrap_or(0);

        for &(q, c) in targets {
            self.pad(q, slot);
            let unit = GateUnit::measure(q, c).with_condition(condition.cloned());
            self.rows[q.index()].push(Cell::Gate(unit));
        }
        for q in 0..self.rows.len() {
            self.pad(QubitId(q as u32), slot + 1);
        }
        Ok(slot)
    }

    /// Flatten the rows into time slices.
    ///
    /// Slots a row never reached become identity. Once a qubit has been
    /// measured, its row may only hold identity cells, and no gate stored
    /// in another row may name it as an operand.
    pub fn flatten(self, num_clbits: usize) -> CompileResult<Circuit> {
        let num_qubits = self.rows.len();
        let mut circuit = Circuit::new(num_qubits, num_clbits);
        let Some(max_slot) = self.max_slot() else {
            return Ok(circuit);
        };

        let mut measured = vec![false; num_qubits];
        for t in 0..=max_slot {
            let mut unit = CircuitUnit::default();
            let mut newly_measured = Vec::new();
            for (q, row) in self.rows.iter().enumerate() {
                let cell = row.get(t);
                if measured[q] {
                    if let Some(Cell::Gate(g)) = cell {
                        if !g.is_identity() {
                            return Err(CompileError::SchedulingInvariant {
                                qubit: q,
                                slot: t,
                                gate: g.name().to_string(),
                            });
                        }
                    }
                    continue;
                }
                match cell {
                    Some(Cell::Reserved) => {}
                    Some(Cell::Gate(g)) => {
                        if let Some(&hit) = g.qubits.iter().find(|o| measured[o.index()]) {
                            return Err(CompileError::SchedulingInvariant {
                                qubit: hit.index(),
                                slot: t,
                                gate: g.name().to_string(),
                            });
                        }
                        if g.is_measure() {
                            newly_measured.push(q);
                        }
                        unit.push(g.clone());
                    }
                    None => unit.push(GateUnit::identity(QubitId(q as u32))),
                }
            }
            for q in newly_measured {
                measured[q] = true;
            }
            circuit.push_unit(unit);
        }
        Ok(circuit)
    }
}
