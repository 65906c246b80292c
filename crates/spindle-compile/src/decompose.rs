//! Splitting a circuit graph into register-disjoint components.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use spindle_ir::{BitKind, CircuitGraph, Vertex, VertexId};
use tracing::debug;

use crate::error::CompileResult;
use crate::expand::body_conbits;
use crate::register::RegisterDecl;

/// Vertices reachable from one or more registers, in topological order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    /// Member vertices, topologically ordered.
    pub vertices: Vec<VertexId>,
}

impl Component {
    /// Number of member vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the component has no vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Partition the graph into components.
///
/// A breadth-first walk, ignoring edge direction, is seeded from every
/// register vertex not yet reached, in vertex-id order. Vertices no
/// register reaches (macro bodies) belong to no component. A macro call
/// is also joined to the classical registers its body conditions read.
/// Each component lists its vertices in the order they appear in `order`.
pub fn decompose<G>(graph: &G, order: &[VertexId]) -> CompileResult<Vec<Component>>
where
    G: CircuitGraph + ?Sized,
{
    let n = graph.vertex_count();
    let extra = body_condition_links(graph)?;
    let mut owner: Vec<Option<usize>> = vec![None; n];
    let mut count = 0usize;

    for seed in 0..n {
        if owner[seed].is_some() || !matches!(graph.vertex(seed)?, Vertex::Register(_)) {
            continue;
        }
        let id = count;
        count += 1;
        owner[seed] = Some(id);
        let mut queue = VecDeque::from([seed]);
        while let Some(v) = queue.pop_front() {
            let linked = extra.get(&v).into_iter().flatten().copied();
            for u in graph.neighbors(v)?.into_iter().chain(linked) {
                if let Some(slot) = owner.get_mut(u) {
                    if slot.is_none() {
                        *slot = Some(id);
                        queue.push_back(u);
                    }
                }
            }
        }
    }

    let mut components = vec![Component::default(); count];
    for &v in order {
        if let Some(Some(id)) = owner.get(v) {
            components[*id].vertices.push(v);
        }
    }
    debug!("Decomposed {} vertices into {} components", n, count);
    Ok(components)
}

/// Undirected links between each call and the clbit registers read by
/// conditions inside the called body.
fn body_condition_links<G>(graph: &G) -> CompileResult<FxHashMap<VertexId, Vec<VertexId>>>
where
    G: CircuitGraph + ?Sized,
{
    let mut clbit_registers = Vec::new();
    let mut callers = Vec::new();
    for v in 0..graph.vertex_count() {
        match graph.vertex(v)? {
            Vertex::Register(name) => {
                let decl = RegisterDecl::parse(name)?;
                if decl.kind == BitKind::Clbit {
                    clbit_registers.push((v, decl));
                }
            }
            Vertex::Caller(op) => callers.push((v, op.name.as_str())),
            _ => {}
        }
    }

    let mut links: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
    if clbit_registers.is_empty() {
        return Ok(links);
    }
    for (caller, name) in callers {
        for bit in body_conbits(graph, name)? {
            let Some(&(reg, _)) = clbit_registers
                .iter()
                .find(|(_, decl)| decl.bits().any(|b| b == bit))
            else {
                continue;
            };
            links.entry(caller).or_default().push(reg);
            links.entry(reg).or_default().push(caller);
        }
    }
    Ok(links)
}
