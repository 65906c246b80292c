//! Classical-bit conditions guarding gate execution.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::ClbitId;

/// Relational operator of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relation {
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `<=`
    Le,
    /// `>=`
    Ge,
}

impl Relation {
    /// Decode the integer encoding used by graph attributes (0..=5).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Relation::Eq),
            1 => Some(Relation::Ne),
            2 => Some(Relation::Lt),
            3 => Some(Relation::Gt),
            4 => Some(Relation::Le),
            5 => Some(Relation::Ge),
            _ => None,
        }
    }

    /// Integer encoding of this relation.
    pub fn code(self) -> i64 {
        match self {
            Relation::Eq => 0,
            Relation::Ne => 1,
            Relation::Lt => 2,
            Relation::Gt => 3,
            Relation::Le => 4,
            Relation::Ge => 5,
        }
    }

    /// Parse a comparator symbol such as `"=="` or `">="`.
    pub fn from_symbol(symbol: &str) -> IrResult<Self> {
        match symbol.trim() {
            "==" => Ok(Relation::Eq),
            "!=" => Ok(Relation::Ne),
            "<" => Ok(Relation::Lt),
            ">" => Ok(Relation::Gt),
            "<=" => Ok(Relation::Le),
            ">=" => Ok(Relation::Ge),
            other => Err(IrError::UnknownComparator(other.to_string())),
        }
    }

    /// The comparator symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            Relation::Eq => "==",
            Relation::Ne => "!=",
            Relation::Lt => "<",
            Relation::Gt => ">",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        }
    }

    /// Evaluate `lhs <relation> rhs`.
    #[inline]
    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Relation::Eq => lhs == rhs,
            Relation::Ne => lhs != rhs,
            Relation::Lt => lhs < rhs,
            Relation::Gt => lhs > rhs,
            Relation::Le => lhs <= rhs,
            Relation::Ge => lhs >= rhs,
        }
    }
}

/// A guard comparing the integer formed by some classical bits against a
/// constant.
///
/// Bits are read in declared order, first bit most significant. Two
/// conditions are equal only if their bit sequences, relation and constant
/// all match, so the type can key a branch index directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Condition {
    /// Classical bits, most significant first.
    pub clbits: Vec<ClbitId>,
    /// Comparison operator.
    pub relation: Relation,
    /// Right-hand side of the comparison.
    pub constant: i64,
}

impl Condition {
    /// Create a new condition.
    pub fn new(clbits: Vec<ClbitId>, relation: Relation, constant: i64) -> Self {
        Self {
            clbits,
            relation,
            constant,
        }
    }

    /// The composite value of the condition bits in `state`.
    ///
    /// Bits missing from `state` read as zero.
    pub fn value(&self, state: &[bool]) -> i64 {
        self.clbits.iter().fold(0i64, |acc, c| {
            let bit = state.get(c.index()).copied().unwrap_or(false);
            (acc << 1) | i64::from(bit)
        })
    }

    /// Whether the condition holds for the classical state.
    pub fn evaluate(&self, state: &[bool]) -> bool {
        self.relation.holds(self.value(state), self.constant)
    }

    /// Whether the condition reads `clbit`.
    pub fn depends_on(&self, clbit: ClbitId) -> bool {
        self.clbits.contains(&clbit)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.clbits.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "] {} {}", self.relation.symbol(), self.constant)
    }
}
