//! In-memory circuit graph backed by petgraph.

use petgraph::Direction;
use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::condition::Relation;
use crate::error::{IrError, IrResult};
use crate::graph::{CircuitGraph, Operation, Vertex, VertexId, Wire};
use crate::parameter::ParameterExpression;
use crate::qubit::BitKind;

/// Node index type for the graph.
pub type NodeIndex = PetNodeIndex<u32>;

/// Payload of a graph vertex.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNode {
    /// Register declaration named `q{start}_{len}` or `c{start}_{len}`.
    Register(String),
    /// Gate invocation.
    Op(Operation),
    /// Macro invocation.
    Caller(Operation),
    /// Macro body root.
    Def {
        /// Macro name.
        name: String,
        /// Declared parameter count.
        num_params: usize,
        /// Declared qubit count.
        num_qubits: usize,
        /// Declared classical bit count.
        num_clbits: usize,
    },
    /// Call site inside a macro body.
    Callee(Operation),
    /// Initial qubit.
    InitQubit,
    /// Initial classical bit.
    InitClbit,
}

impl GraphNode {
    fn view(&self) -> Vertex<'_> {
        match self {
            GraphNode::Register(name) => Vertex::Register(name),
            GraphNode::Op(op) => Vertex::Op(op),
            GraphNode::Caller(op) => Vertex::Caller(op),
            GraphNode::Def { name, .. } => Vertex::Def(name),
            GraphNode::Callee(op) => Vertex::Callee(op),
            GraphNode::InitQubit => Vertex::InitQubit,
            GraphNode::InitClbit => Vertex::InitClbit,
        }
    }

    fn operation_mut(&mut self) -> Option<&mut Operation> {
        match self {
            GraphNode::Op(op) | GraphNode::Caller(op) | GraphNode::Callee(op) => Some(op),
            _ => None,
        }
    }
}

/// An edge, optionally carrying one bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphEdge {
    /// The bit carried and its role. Register-to-init edges carry none.
    pub bit: Option<(Wire, u32)>,
}

/// Key of the per-bit frontier used while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Leaf {
    Qubit(u32),
    Clbit(u32),
    LocalQubit(u32),
    LocalClbit(u32),
}

impl Leaf {
    fn describe(self) -> (&'static str, u32) {
        match self {
            Leaf::Qubit(i) => ("qubit", i),
            Leaf::Clbit(i) => ("clbit", i),
            Leaf::LocalQubit(i) => ("local qubit", i),
            Leaf::LocalClbit(i) => ("local clbit", i),
        }
    }
}

/// A circuit graph assembled through builder calls.
///
/// Every builder call appends one vertex and connects it to the current
/// frontier (leaf) of each bit it touches, so edges always point from
/// earlier to later vertices. Bits declared by registers use global ids;
/// bits inside a macro body use local slots that [`GraphDag::add_def`]
/// resets to the new definition root. A macro body never links to a
/// global bit, so each body stays reachable only from its own root.
#[derive(Debug, Clone, Default)]
pub struct GraphDag {
    graph: DiGraph<GraphNode, GraphEdge, u32>,
    leaves: FxHashMap<Leaf, NodeIndex>,
    /// Definition root of every macro-body vertex.
    body_roots: FxHashMap<NodeIndex, NodeIndex>,
    current_def: Option<NodeIndex>,
    num_qubits: usize,
    num_clbits: usize,
}

impl GraphDag {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total qubits declared by registers.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Total classical bits declared by registers.
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Raw payload of a vertex.
    pub fn node(&self, id: VertexId) -> IrResult<&GraphNode> {
        self.graph
            .node_weight(NodeIndex::new(id))
            .ok_or(IrError::InvalidVertex(id))
    }

    /// Declare `count` bits starting at global id `start`.
    ///
    /// Adds the register vertex plus one init vertex per bit.
    pub fn add_register(&mut self, kind: BitKind, start: u32, count: u32) -> VertexId {
        let name = format!("{}{start}_{count}", kind.prefix());
        let reg = self.graph.add_node(GraphNode::Register(name));
        for i in 0..count {
            let (node, leaf) = match kind {
                BitKind::Qubit => (GraphNode::InitQubit, Leaf::Qubit(start + i)),
                BitKind::Clbit => (GraphNode::InitClbit, Leaf::Clbit(start + i)),
            };
            let init = self.graph.add_node(node);
            self.graph.add_edge(reg, init, GraphEdge { bit: None });
            self.leaves.insert(leaf, init);
        }
        match kind {
            BitKind::Qubit => self.num_qubits += count as usize,
            BitKind::Clbit => self.num_clbits += count as usize,
        }
        reg.index()
    }

    /// Append a gate invocation on global bits.
    pub fn add_op(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: Vec<u32>,
        clbits: &[u32],
    ) -> IrResult<VertexId> {
        let op = Operation::with_values(name, qubits, params);
        self.attach(op, GraphNode::Op, false, clbits)
    }

    /// Append a macro invocation on global bits.
    pub fn add_caller(
        &mut self,
        name: &str,
        params: &[f64],
        qubits: Vec<u32>,
        clbits: &[u32],
    ) -> IrResult<VertexId> {
        let op = Operation::with_values(name, qubits, params);
        self.attach(op, GraphNode::Caller, false, clbits)
    }

    /// Start a macro body.
    ///
    /// Subsequent [`GraphDag::add_callee`] calls hang off this root.
    pub fn add_def(
        &mut self,
        name: &str,
        num_params: usize,
        num_qubits: usize,
        num_clbits: usize,
    ) -> VertexId {
        let root = self.graph.add_node(GraphNode::Def {
            name: name.to_string(),
            num_params,
            num_qubits,
            num_clbits,
        });
        for i in 0..num_qubits {
            self.leaves.insert(Leaf::LocalQubit(i as u32), root);
        }
        for j in 0..num_clbits {
            self.leaves.insert(Leaf::LocalClbit(j as u32), root);
        }
        self.current_def = Some(root);
        root.index()
    }

    /// Append a call site to the current macro body.
    ///
    /// `qubits` are local slots; `pindex` selects the enclosing call's
    /// parameters for each expression in `params`. With `is_caller` the
    /// call site invokes another macro.
    pub fn add_callee(
        &mut self,
        name: &str,
        params: Vec<ParameterExpression>,
        qubits: Vec<u32>,
        clbits: &[u32],
        pindex: Vec<i64>,
        is_caller: bool,
    ) -> IrResult<VertexId> {
        let op = Operation {
            params,
            pindex,
            ..Operation::new(name, qubits)
        };
        let wrap: fn(Operation) -> GraphNode = if is_caller {
            GraphNode::Caller
        } else {
            GraphNode::Callee
        };
        self.attach(op, wrap, true, clbits)
    }

    /// Guard `node` with `clbits <relation> constant`.
    ///
    /// The condition bits become incoming `Conbit` edges in the given order.
    /// `clbits` are global ids. Inside a macro body the edges start at the
    /// definition root instead of the global clbit wires; the bits are
    /// resolved when the body is expanded.
    pub fn add_condition(
        &mut self,
        node: VertexId,
        clbits: &[u32],
        relation: Relation,
        constant: i64,
    ) -> IrResult<()> {
        let index = self.index(node)?;
        if self.graph[index].operation_mut().is_none() {
            return Err(IrError::access(
                node,
                "only gates and calls can carry a condition",
            ));
        }
        if let Some(&root) = self.body_roots.get(&index) {
            for &c in clbits {
                self.graph.add_edge(
                    root,
                    index,
                    GraphEdge {
                        bit: Some((Wire::Conbit, c)),
                    },
                );
            }
        } else {
            for &c in clbits {
                self.link(Leaf::Clbit(c), index, Wire::Conbit, c, None)?;
            }
        }
        if let Some(op) = self.graph[index].operation_mut() {
            op.comparison = Some((relation, constant));
        }
        Ok(())
    }

    fn attach(
        &mut self,
        op: Operation,
        wrap: fn(Operation) -> GraphNode,
        local: bool,
        clbits: &[u32],
    ) -> IrResult<VertexId> {
        let name = op.name.clone();
        let qubits = op.qubits.clone();
        // Resolve every leaf before mutating so a bad operand leaves the graph untouched.
        let qleaf = |q: u32| {
            if local {
                Leaf::LocalQubit(q)
            } else {
                Leaf::Qubit(q)
            }
        };
        let cleaf = |c: u32| {
            if local {
                Leaf::LocalClbit(c)
            } else {
                Leaf::Clbit(c)
            }
        };
        for leaf in qubits
            .iter()
            .map(|&q| qleaf(q))
            .chain(clbits.iter().map(|&c| cleaf(c)))
        {
            if !self.leaves.contains_key(&leaf) {
                let (kind, index) = leaf.describe();
                return Err(IrError::UnknownBit {
                    kind,
                    index,
                    gate_name: Some(name),
                });
            }
        }

        let index = self.graph.add_node(wrap(op));
        if local {
            if let Some(root) = self.current_def {
                self.body_roots.insert(index, root);
            }
        }
        for &q in &qubits {
            self.link(qleaf(q), index, Wire::Qubit, q, Some(name.as_str()))?;
        }
        for &c in clbits {
            self.link(cleaf(c), index, Wire::Clbit, c, Some(name.as_str()))?;
        }
        Ok(index.index())
    }

    fn link(
        &mut self,
        leaf: Leaf,
        target: NodeIndex,
        wire: Wire,
        bit: u32,
        gate_name: Option<&str>,
    ) -> IrResult<()> {
        let source = *self.leaves.get(&leaf).ok_or_else(|| {
            let (kind, index) = leaf.describe();
            IrError::UnknownBit {
                kind,
                index,
                gate_name: gate_name.map(str::to_string),
            }
        })?;
        self.graph.add_edge(
            source,
            target,
            GraphEdge {
                bit: Some((wire, bit)),
            },
        );
        self.leaves.insert(leaf, target);
        Ok(())
    }

    fn index(&self, id: VertexId) -> IrResult<NodeIndex> {
        let index = NodeIndex::new(id);
        if self.graph.node_weight(index).is_some() {
            Ok(index)
        } else {
            Err(IrError::InvalidVertex(id))
        }
    }

    fn sorted_edges(
        &self,
        id: VertexId,
        dir: Direction,
    ) -> IrResult<Vec<(EdgeIndex<u32>, NodeIndex, GraphEdge)>> {
        let index = self.index(id)?;
        let mut edges: Vec<_> = self
            .graph
            .edges_directed(index, dir)
            .map(|e| {
                let other = match dir {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                (e.id(), other, *e.weight())
            })
            .collect();
        edges.sort_by_key(|(e, _, _)| *e);
        Ok(edges)
    }
}

impl CircuitGraph for GraphDag {
    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn vertex(&self, id: VertexId) -> IrResult<Vertex<'_>> {
        self.node(id).map(GraphNode::view)
    }

    /// Kahn's algorithm, always releasing the lowest ready vertex id, so
    /// the order follows insertion order wherever dependencies allow.
    fn topological_order(&self) -> IrResult<Vec<VertexId>> {
        let n = self.graph.node_count();
        let mut in_degree: Vec<usize> = self
            .graph
            .node_indices()
            .map(|i| self.graph.edges_directed(i, Direction::Incoming).count())
            .collect();
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, d)| **d == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(n);
        while let Some(Reverse(v)) = ready.pop() {
            order.push(v);
            for e in self.graph.edges_directed(NodeIndex::new(v), Direction::Outgoing) {
                let t = e.target().index();
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    ready.push(Reverse(t));
                }
            }
        }
        if order.len() != n {
            return Err(IrError::Cyclic);
        }
        Ok(order)
    }

    fn successors(&self, id: VertexId) -> IrResult<Vec<VertexId>> {
        Ok(self
            .sorted_edges(id, Direction::Outgoing)?
            .into_iter()
            .map(|(_, n, _)| n.index())
            .collect())
    }

    fn predecessors(&self, id: VertexId) -> IrResult<Vec<VertexId>> {
        Ok(self
            .sorted_edges(id, Direction::Incoming)?
            .into_iter()
            .map(|(_, n, _)| n.index())
            .collect())
    }

    fn incident_bits(&self, id: VertexId, wire: Wire) -> IrResult<Vec<u32>> {
        Ok(self
            .sorted_edges(id, Direction::Incoming)?
            .into_iter()
            .filter_map(|(_, _, edge)| match edge.bit {
                Some((w, bit)) if w == wire => Some(bit),
                _ => None,
            })
            .collect())
    }

    fn find_definition(&self, name: &str) -> IrResult<Option<VertexId>> {
        Ok(self.graph.node_indices().find_map(|i| match &self.graph[i] {
            GraphNode::Def { name: n, .. } if n == name => Some(i.index()),
            _ => None,
        }))
    }
}
