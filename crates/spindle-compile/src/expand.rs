//! Inline expansion of macro calls.

use rustc_hash::FxHashSet;
use spindle_ir::{CircuitGraph, Condition, GateKind, Operation, Vertex, VertexId, Wire};
use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::translate::Translator;

/// What a call site hands to the macro body it expands.
#[derive(Debug, Clone, PartialEq)]
pub struct CallContext {
    /// Global qubit ids the body's local slots refer to.
    pub qubits: Vec<u32>,
    /// Evaluated parameters of the call.
    pub params: Vec<f64>,
    /// Call-site condition; overrides the conditions inside the body.
    pub condition: Option<Condition>,
}

/// Body vertices of the macro rooted at `root`, in execution order.
///
/// Depth-first from the root along successors; the reverse of the
/// finishing order, root excluded. Only call sites are entered, so the
/// walk never leaves the body.
pub fn body_order<G>(graph: &G, root: VertexId) -> CompileResult<Vec<VertexId>>
where
    G: CircuitGraph + ?Sized,
{
    let mut finished = Vec::new();
    let mut visited = FxHashSet::default();
    let mut stack = vec![(root, graph.successors(root)?, 0usize)];
    visited.insert(root);

    while let Some((v, children, next)) = stack.last_mut() {
        if let Some(&child) = children.get(*next) {
            *next += 1;
            let in_body = matches!(
                graph.vertex(child)?,
                Vertex::Callee(_) | Vertex::Caller(_)
            );
            if in_body && visited.insert(child) {
                let grandchildren = graph.successors(child)?;
                stack.push((child, grandchildren, 0));
            }
        } else {
            finished.push(*v);
            stack.pop();
        }
    }

    finished.pop();
    finished.reverse();
    Ok(finished)
}

/// Global clbits read by conditions anywhere in the body of macro `name`,
/// nested calls included. Unknown and recursive macros contribute nothing
/// here; expansion reports them.
pub fn body_conbits<G>(graph: &G, name: &str) -> CompileResult<Vec<u32>>
where
    G: CircuitGraph + ?Sized,
{
    let mut bits = Vec::new();
    let mut seen = FxHashSet::default();
    collect_conbits(graph, name, &mut seen, &mut bits)?;
    Ok(bits)
}

fn collect_conbits<G>(
    graph: &G,
    name: &str,
    seen: &mut FxHashSet<String>,
    bits: &mut Vec<u32>,
) -> CompileResult<()>
where
    G: CircuitGraph + ?Sized,
{
    if !seen.insert(name.to_string()) {
        return Ok(());
    }
    let Some(root) = graph.find_definition(name)? else {
        return Ok(());
    };
    for v in body_order(graph, root)? {
        bits.extend(graph.incident_bits(v, Wire::Conbit)?);
        if let Vertex::Caller(op) = graph.vertex(v)? {
            collect_conbits(graph, &op.name, seen, bits)?;
        }
    }
    Ok(())
}

impl<G: CircuitGraph + ?Sized> Translator<'_, G> {
    /// Expand the macro `name` called at `site` and return the highest slot
    /// any of its gates landed in.
    pub fn expand_caller(
        &mut self,
        site: VertexId,
        name: &str,
        context: CallContext,
    ) -> CompileResult<usize> {
        let graph = self.graph;
        let root = graph
            .find_definition(name)?
            .ok_or_else(|| macro_error(site, name, "no definition with this name"))?;
        if self.call_stack.iter().any(|n| n == name) {
            return Err(macro_error(site, name, "macro calls itself"));
        }

        self.call_stack.push(name.to_string());
        let result = self.expand_body(root, &context);
        self.call_stack.pop();
        let slot = result?;
        debug!("Macro '{}' at vertex {} reaches slot {}", name, site, slot);
        Ok(slot)
    }

    fn expand_body(&mut self, root: VertexId, context: &CallContext) -> CompileResult<usize> {
        let graph = self.graph;
        let mut max_slot = 0;
        for v in body_order(graph, root)? {
            let (op, nested) = match graph.vertex(v)? {
                Vertex::Callee(op) => (op, false),
                Vertex::Caller(op) => (op, true),
                _ => continue,
            };
            let qubits = self.remap_slots(v, op, context)?;
            let params = op
                .resolve_params(&context.params)
                .map_err(|e| macro_error(v, &op.name, e.to_string()))?;
            let condition = match &context.condition {
                Some(cond) => Some(cond.clone()),
                None => self.condition_of(v, op)?,
            };

            let slot = if nested {
                let inner = CallContext {
                    qubits,
                    params,
                    condition,
                };
                self.expand_caller(v, &op.name, inner)?
            } else if GateKind::from_name(&op.name).is_measure() {
                return Err(macro_error(
                    v,
                    &op.name,
                    "measurement is not allowed inside a macro body",
                ));
            } else {
                let dense = self.map_qubits(v, &qubits)?;
                self.schedule_gate(&op.name, dense, &params, condition)?
            };
            max_slot = max_slot.max(slot);
        }
        Ok(max_slot)
    }

    fn remap_slots(
        &self,
        v: VertexId,
        op: &Operation,
        context: &CallContext,
    ) -> CompileResult<Vec<u32>> {
        op.qubits
            .iter()
            .map(|&local| {
                context.qubits.get(local as usize).copied().ok_or_else(|| {
                    macro_error(
                        v,
                        &op.name,
                        format!(
                            "local qubit {local} is outside the {} qubit(s) of the call",
                            context.qubits.len()
                        ),
                    )
                })
            })
            .collect()
    }
}

fn macro_error(vertex: VertexId, name: &str, reason: impl Into<String>) -> CompileError {
    CompileError::MacroResolution {
        vertex,
        name: name.to_string(),
        reason: reason.into(),
    }
}
