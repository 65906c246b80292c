//! JSON form of a circuit graph.
//!
//! A document is a list of statements replayed, in order, as
//! [`GraphDag`] builder calls:
//!
//! ```json
//! { "statements": [
//!     { "register": { "kind": "qubit", "start": 0, "count": 2 } },
//!     { "register": { "kind": "clbit", "start": 0, "count": 1 } },
//!     { "op": { "name": "H", "qubits": [0] } },
//!     { "op": { "name": "MEASURE", "qubits": [0], "clbits": [0] } },
//!     { "op": { "name": "X", "qubits": [1],
//!               "condition": { "clbits": [0], "cmp": "==", "value": 1 } } }
//! ] }
//! ```

use serde::{Deserialize, Serialize};

use crate::condition::Relation;
use crate::dag::GraphDag;
use crate::error::IrResult;
use crate::parameter::ParameterExpression;
use crate::qubit::BitKind;

/// A serialized circuit graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Builder statements in order.
    pub statements: Vec<Statement>,
}

/// One builder call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Statement {
    /// [`GraphDag::add_register`].
    Register(RegisterStatement),
    /// [`GraphDag::add_op`].
    Op(CallStatement),
    /// [`GraphDag::add_caller`].
    Caller(CallStatement),
    /// [`GraphDag::add_def`].
    Def(DefStatement),
    /// [`GraphDag::add_callee`].
    Callee(CalleeStatement),
}

/// Register declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterStatement {
    pub kind: BitKind,
    pub start: u32,
    pub count: u32,
}

/// Gate or macro invocation on global bits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallStatement {
    pub name: String,
    #[serde(default)]
    pub params: Vec<f64>,
    pub qubits: Vec<u32>,
    #[serde(default)]
    pub clbits: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionStatement>,
}

/// Macro body root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefStatement {
    pub name: String,
    #[serde(default)]
    pub params: usize,
    pub qubits: usize,
    #[serde(default)]
    pub clbits: usize,
}

/// Call site inside the current macro body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalleeStatement {
    pub name: String,
    /// Expressions such as `"p0 / 2"`.
    #[serde(default)]
    pub params: Vec<String>,
    pub qubits: Vec<u32>,
    #[serde(default)]
    pub clbits: Vec<u32>,
    #[serde(default)]
    pub pindex: Vec<i64>,
    /// Whether the call site invokes another macro.
    #[serde(default)]
    pub caller: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionStatement>,
}

/// Condition attached to a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionStatement {
    pub clbits: Vec<u32>,
    pub cmp: String,
    pub value: i64,
}

impl GraphDocument {
    /// Parse a JSON document.
    pub fn from_json(source: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Replay the statements into a new graph.
    pub fn build(&self) -> IrResult<GraphDag> {
        let mut dag = GraphDag::new();
        for statement in &self.statements {
            match statement {
                Statement::Register(r) => {
                    dag.add_register(r.kind, r.start, r.count);
                }
                Statement::Op(c) => {
                    let v = dag.add_op(&c.name, &c.params, c.qubits.clone(), &c.clbits)?;
                    apply_condition(&mut dag, v, c.condition.as_ref())?;
                }
                Statement::Caller(c) => {
                    let v = dag.add_caller(&c.name, &c.params, c.qubits.clone(), &c.clbits)?;
                    apply_condition(&mut dag, v, c.condition.as_ref())?;
                }
                Statement::Def(d) => {
                    dag.add_def(&d.name, d.params, d.qubits, d.clbits);
                }
                Statement::Callee(c) => {
                    let params = c
                        .params
                        .iter()
                        .map(|p| ParameterExpression::parse(p))
                        .collect::<IrResult<Vec<_>>>()?;
                    let v = dag.add_callee(
                        &c.name,
                        params,
                        c.qubits.clone(),
                        &c.clbits,
                        c.pindex.clone(),
                        c.caller,
                    )?;
                    apply_condition(&mut dag, v, c.condition.as_ref())?;
                }
            }
        }
        Ok(dag)
    }
}

fn apply_condition(
    dag: &mut GraphDag,
    vertex: usize,
    condition: Option<&ConditionStatement>,
) -> IrResult<()> {
    if let Some(cond) = condition {
        let relation = Relation::from_symbol(&cond.cmp)?;
        dag.add_condition(vertex, &cond.clbits, relation, cond.value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;
    use crate::graph::{CircuitGraph, Vertex, Wire};

    const CONDITIONAL_X: &str = r#"{ "statements": [
        { "register": { "kind": "qubit", "start": 0, "count": 2 } },
        { "register": { "kind": "clbit", "start": 0, "count": 1 } },
        { "op": { "name": "H", "qubits": [0] } },
        { "op": { "name": "MEASURE", "qubits": [0], "clbits": [0] } },
        { "op": { "name": "X", "qubits": [1],
                  "condition": { "clbits": [0], "cmp": "==", "value": 1 } } }
    ] }"#;

    #[test]
    fn test_build_conditional_program() {
        let dag = GraphDocument::from_json(CONDITIONAL_X)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(dag.num_qubits(), 2);
        assert_eq!(dag.num_clbits(), 1);

        let x = dag.vertex_count() - 1;
        match dag.vertex(x).unwrap() {
            Vertex::Op(op) => {
                assert_eq!(op.name, "X");
                assert_eq!(op.comparison, Some((Relation::Eq, 1)));
            }
            other => panic!("unexpected vertex {other:?}"),
        }
        assert_eq!(dag.incident_bits(x, Wire::Conbit).unwrap(), vec![0]);
    }

    #[test]
    fn test_callee_expressions_are_parsed() {
        let json = r#"{ "statements": [
            { "def": { "name": "half", "params": 1, "qubits": 1 } },
            { "callee": { "name": "Rx", "qubits": [0], "params": ["p0 / 2"], "pindex": [0] } }
        ] }"#;
        let dag = GraphDocument::from_json(json).unwrap().build().unwrap();
        match dag.vertex(1).unwrap() {
            Vertex::Callee(op) => assert_eq!(op.resolve_params(&[3.0]).unwrap(), vec![1.5]),
            other => panic!("unexpected vertex {other:?}"),
        }
    }

    #[test]
    fn test_bad_comparator() {
        let json = CONDITIONAL_X.replace("\"==\"", "\"=~\"");
        let err = GraphDocument::from_json(&json)
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, IrError::UnknownComparator(_)));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            GraphDocument::from_json("{ \"statements\": 3 }"),
            Err(IrError::Document(_))
        ));
    }
}
