//! Materializing a component's vertices into scheduled gate units.

use std::f64::consts::PI;

use spindle_ir::{
    BitKind, CircuitGraph, ClbitId, Condition, GateKind, GateUnit, IrError, Operation, QubitId,
    Vertex, VertexId, Wire,
};
use tracing::debug;

use crate::error::CompileResult;
use crate::expand::CallContext;
use crate::register::{RegisterDecl, RegisterMap};
use crate::scheduler::TimeList;

/// Convert radians to the degree convention of scheduled angles.
///
/// The angle is reduced modulo 4π, keeping the sign of the input.
#[inline]
pub fn radians_to_degrees(radians: f64) -> f64 {
    (radians % (4.0 * PI)) / PI * 180.0
}

/// Walks one vertex list and schedules its gates.
pub struct Translator<'g, G: CircuitGraph + ?Sized> {
    pub(crate) graph: &'g G,
    pub(crate) qubits: RegisterMap,
    pub(crate) clbits: RegisterMap,
    pub(crate) timelist: TimeList,
    pub(crate) call_stack: Vec<String>,
    num_qubits: usize,
    num_clbits: usize,
}

impl<'g, G: CircuitGraph + ?Sized> Translator<'g, G> {
    /// Prepare a translator for `vertices`.
    ///
    /// The live bit counts are the numbers of init vertices in the list.
    /// Every register in the list is declared up front, in list order, so
    /// a macro body may read clbits whose register comes after the call.
    pub fn new(graph: &'g G, vertices: &[VertexId]) -> CompileResult<Self> {
        let mut num_qubits = 0;
        let mut num_clbits = 0;
        let mut qubits = RegisterMap::new();
        let mut clbits = RegisterMap::new();
        for &v in vertices {
            match graph.vertex(v)? {
                Vertex::Register(name) => {
                    let decl = RegisterDecl::parse(name)?;
                    match decl.kind {
                        BitKind::Qubit => qubits.declare(&decl),
                        BitKind::Clbit => clbits.declare(&decl),
                    }
                }
                Vertex::InitQubit => num_qubits += 1,
                Vertex::InitClbit => num_clbits += 1,
                _ => {}
            }
        }
        Ok(Self {
            graph,
            qubits,
            clbits,
            timelist: TimeList::new(num_qubits),
            call_stack: Vec::new(),
            num_qubits,
            num_clbits,
        })
    }

    /// Live qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Live classical bits.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Translate every vertex of the list, in order, into the time list.
    pub fn run(mut self, vertices: &[VertexId]) -> CompileResult<TimeList> {
        for &v in vertices {
            self.translate_vertex(v)?;
        }
        Ok(self.timelist)
    }

    fn translate_vertex(&mut self, v: VertexId) -> CompileResult<()> {
        let graph = self.graph;
        match graph.vertex(v)? {
            Vertex::Op(op) => {
                let condition = self.condition_of(v, op)?;
                let qubits = self.map_qubits(v, &op.qubits)?;
                if GateKind::from_name(&op.name).is_measure() {
                    self.schedule_measurement(v, op, &qubits, condition.as_ref())?;
                } else {
                    let params = op.resolve_params(&[])?;
                    self.schedule_gate(&op.name, qubits, &params, condition)?;
                }
            }
            Vertex::Caller(op) => {
                let condition = self.condition_of(v, op)?;
                let params = op.resolve_params(&[])?;
                let context = CallContext {
                    qubits: op.qubits.clone(),
                    params,
                    condition,
                };
                let slot = self.expand_caller(v, &op.name, context)?;
                debug!("Expanded '{}' up to slot {}", op.name, slot);
            }
            Vertex::Register(_)
            | Vertex::Def(_)
            | Vertex::Callee(_)
            | Vertex::InitQubit
            | Vertex::InitClbit => {}
        }
        Ok(())
    }

    /// The condition declared on `v`, remapped to dense clbits.
    pub(crate) fn condition_of(
        &self,
        v: VertexId,
        op: &Operation,
    ) -> CompileResult<Option<Condition>> {
        let Some((relation, constant)) = op.comparison else {
            return Ok(None);
        };
        let bits = self
            .graph
            .incident_bits(v, Wire::Conbit)?
            .into_iter()
            .map(|c| self.map_clbit(v, c))
            .collect::<CompileResult<Vec<_>>>()?;
        Ok(Some(Condition::new(bits, relation, constant)))
    }

    pub(crate) fn map_qubit(&self, v: VertexId, bit: u32) -> CompileResult<QubitId> {
        let dense = self
            .qubits
            .get(bit)
            .ok_or_else(|| IrError::access(v, format!("qubit {bit} is not declared")))?;
        if dense as usize >= self.num_qubits {
            return Err(IrError::access(
                v,
                format!(
                    "qubit {bit} maps to index {dense} beyond the {} live qubits",
                    self.num_qubits
                ),
            )
            .into());
        }
        Ok(QubitId(dense))
    }

    pub(crate) fn map_clbit(&self, v: VertexId, bit: u32) -> CompileResult<ClbitId> {
        let dense = self
            .clbits
            .get(bit)
            .ok_or_else(|| IrError::access(v, format!("clbit {bit} is not declared")))?;
        if dense as usize >= self.num_clbits {
            return Err(IrError::access(
                v,
                format!(
                    "clbit {bit} maps to index {dense} beyond the {} live clbits",
                    self.num_clbits
                ),
            )
            .into());
        }
        Ok(ClbitId(dense))
    }

    pub(crate) fn map_qubits(&self, v: VertexId, bits: &[u32]) -> CompileResult<Vec<QubitId>> {
        bits.iter().map(|&b| self.map_qubit(v, b)).collect()
    }

    /// Schedule a unitary. A single-qubit gate takes its first parameter,
    /// if any, as its angle.
    pub(crate) fn schedule_gate(
        &mut self,
        name: &str,
        qubits: Vec<QubitId>,
        params: &[f64],
        condition: Option<Condition>,
    ) -> CompileResult<usize> {
        let single = qubits.len() == 1;
        let mut unit = GateUnit::new(GateKind::from_name(name), qubits).with_condition(condition);
        if single {
            if let Some(&radians) = params.first() {
                unit = unit.with_angle(radians_to_degrees(radians));
            }
        }
        self.timelist.append_unitary(unit)
    }

    fn schedule_measurement(
        &mut self,
        v: VertexId,
        op: &Operation,
        qubits: &[QubitId],
        condition: Option<&Condition>,
    ) -> CompileResult<usize> {
        let clbits = self.graph.incident_bits(v, Wire::Clbit)?;
        if clbits.len() != qubits.len() {
            return Err(IrError::access(
                v,
                format!(
                    "'{}' measures {} qubit(s) into {} clbit(s)",
                    op.name,
                    qubits.len(),
                    clbits.len()
                ),
            )
            .into());
        }
        let targets = qubits
            .iter()
            .zip(clbits)
            .map(|(&q, c)| Ok((q, self.map_clbit(v, c)?)))
            .collect::<CompileResult<Vec<_>>>()?;
        self.timelist.append_measurement(&targets, condition)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degrees() {
        assert!((radians_to_degrees(PI / 2.0) - 90.0).abs() < 1e-9);
        assert!((radians_to_degrees(PI) - 180.0).abs() < 1e-9);
        // reduced modulo 4π
        assert!((radians_to_degrees(5.0 * PI) - 180.0).abs() < 1e-9);
        // sign of the input is kept
        assert!((radians_to_degrees(-PI / 2.0) + 90.0).abs() < 1e-9);
    }
}
