//! The circuit graph consumed by the compiler.
//!
//! The compiler reads a graph only through [`CircuitGraph`]. Vertices are
//! exposed as the closed [`Vertex`] view; bit operands that travel along
//! edges (measurement targets, condition bits) are read with
//! [`CircuitGraph::incident_bits`].

use serde::{Deserialize, Serialize};

use crate::condition::Relation;
use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Index of a vertex in a circuit graph.
pub type VertexId = usize;

/// The role an edge plays for the bit it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Wire {
    /// Quantum operand.
    Qubit,
    /// Classical operand (measurement target).
    Clbit,
    /// Classical bit read by a condition.
    Conbit,
}

/// A gate invocation, macro call, or macro-body call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Gate or macro name.
    pub name: String,
    /// Bit operands. Global qubit ids for top-level vertices, local slots
    /// into the enclosing call's qubit list inside a macro body.
    pub qubits: Vec<u32>,
    /// Parameters. Constants at top level; expressions over the caller's
    /// parameters inside a macro body.
    #[serde(default)]
    pub params: Vec<ParameterExpression>,
    /// Index indirection selecting caller parameters for each expression.
    #[serde(default)]
    pub pindex: Vec<i64>,
    /// Relation and constant of an attached condition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<(Relation, i64)>,
}

impl Operation {
    /// Create an operation with no parameters.
    pub fn new(name: impl Into<String>, qubits: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            qubits,
            params: Vec::new(),
            pindex: Vec::new(),
            comparison: None,
        }
    }

    /// Create an operation with literal parameters.
    pub fn with_values(name: impl Into<String>, qubits: Vec<u32>, values: &[f64]) -> Self {
        Self {
            params: values.iter().copied().map(ParameterExpression::Constant).collect(),
            ..Self::new(name, qubits)
        }
    }

    /// Evaluate the parameters against the parameters of the enclosing call.
    ///
    /// An expression of arity zero is evaluated without arguments. Any
    /// other expression reads the next `pindex` entry: `-1` passes the
    /// whole caller list and consumes that one entry, otherwise `arity`
    /// consecutive entries each select one caller parameter.
    pub fn resolve_params(&self, caller_params: &[f64]) -> IrResult<Vec<f64>> {
        let mut values = Vec::with_capacity(self.params.len());
        let mut cursor = 0usize;
        for (i, expr) in self.params.iter().enumerate() {
            let arity = expr.arity();
            let value = if arity == 0 {
                expr.evaluate(&[])
            } else if self.pindex.get(cursor) == Some(&-1) {
                cursor += 1;
                expr.evaluate(caller_params)
            } else {
                let mut args = Vec::with_capacity(arity);
                for k in 0..arity {
                    let idx = self.pindex.get(cursor + k).copied().ok_or_else(|| {
                        self.param_error(format!(
                            "parameter {i} needs {arity} argument(s) but the index list is exhausted"
                        ))
                    })?;
                    let arg = usize::try_from(idx)
                        .ok()
                        .and_then(|idx| caller_params.get(idx))
                        .ok_or_else(|| {
                            self.param_error(format!(
                                "index {idx} is outside the {} caller parameter(s)",
                                caller_params.len()
                            ))
                        })?;
                    args.push(*arg);
                }
                cursor += arity;
                expr.evaluate(&args)
            };
            values.push(value.ok_or_else(|| {
                self.param_error(format!("parameter {i} ({expr}) could not be evaluated"))
            })?);
        }
        Ok(values)
    }

    fn param_error(&self, reason: String) -> IrError {
        IrError::ParameterResolution {
            name: self.name.clone(),
            reason,
        }
    }
}

/// A borrowed, typed view of one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Vertex<'a> {
    /// Register declaration; the name encodes kind, offset and length.
    Register(&'a str),
    /// Gate invocation.
    Op(&'a Operation),
    /// Macro invocation.
    Caller(&'a Operation),
    /// Root of a macro body.
    Def(&'a str),
    /// Gate call site inside a macro body.
    Callee(&'a Operation),
    /// Initial state of one qubit.
    InitQubit,
    /// Initial state of one classical bit.
    InitClbit,
}

impl Vertex<'_> {
    /// Short kind label for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Vertex::Register(_) => "register",
            Vertex::Op(_) => "op",
            Vertex::Caller(_) => "caller",
            Vertex::Def(_) => "def",
            Vertex::Callee(_) => "callee",
            Vertex::InitQubit => "init_qubit",
            Vertex::InitClbit => "init_clbit",
        }
    }
}

/// Read access to a circuit dependency graph.
pub trait CircuitGraph {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Typed view of a vertex.
    fn vertex(&self, id: VertexId) -> IrResult<Vertex<'_>>;

    /// All vertices in a dependency-respecting order.
    fn topological_order(&self) -> IrResult<Vec<VertexId>>;

    /// Direct successors, in edge order.
    fn successors(&self, id: VertexId) -> IrResult<Vec<VertexId>>;

    /// Direct predecessors, in edge order.
    fn predecessors(&self, id: VertexId) -> IrResult<Vec<VertexId>>;

    /// Bits carried by the incoming edges of `id` on `wire`, in ascending
    /// edge order.
    fn incident_bits(&self, id: VertexId, wire: Wire) -> IrResult<Vec<u32>>;

    /// The `Def` vertex rooting the macro called `name`.
    fn find_definition(&self, name: &str) -> IrResult<Option<VertexId>>;

    /// Successors followed by predecessors.
    fn neighbors(&self, id: VertexId) -> IrResult<Vec<VertexId>> {
        let mut out = self.successors(id)?;
        out.extend(self.predecessors(id)?);
        Ok(out)
    }
}
