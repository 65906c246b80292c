//! Register declarations and the sparse-to-dense bit mapping.

use rustc_hash::FxHashMap;
use spindle_ir::{BitKind, IrError, IrResult};

/// A parsed register declaration: `kind`, first global bit, length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterDecl {
    /// Quantum or classical.
    pub kind: BitKind,
    /// First global bit id.
    pub start: u32,
    /// Number of bits.
    pub len: u32,
}

impl RegisterDecl {
    /// Parse a register name of the form `q{start}_{len}` or `c{start}_{len}`.
    pub fn parse(name: &str) -> IrResult<Self> {
        let malformed = || IrError::MalformedRegister(name.to_string());
        let mut chars = name.chars();
        let kind = match chars.next() {
            Some('q') => BitKind::Qubit,
            Some('c') => BitKind::Clbit,
            _ => return Err(malformed()),
        };
        let (start, len) = chars.as_str().split_once('_').ok_or_else(malformed)?;
        Ok(Self {
            kind,
            start: start.parse().map_err(|_| malformed())?,
            len: len.parse().map_err(|_| malformed())?,
        })
    }

    /// Global bit ids covered by the declaration.
    pub fn bits(&self) -> impl Iterator<Item = u32> {
        self.start..self.start.saturating_add(self.len)
    }
}

/// Maps declared global bit ids to dense indices in encounter order.
#[derive(Debug, Clone, Default)]
pub struct RegisterMap {
    map: FxHashMap<u32, u32>,
    next: u32,
}

impl RegisterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the next dense indices to every bit of `decl`.
    pub fn declare(&mut self, decl: &RegisterDecl) {
        for bit in decl.bits() {
            self.map.insert(bit, self.next);
            self.next += 1;
        }
    }

    /// Dense index of a global bit.
    #[inline]
    pub fn get(&self, bit: u32) -> Option<u32> {
        self.map.get(&bit).copied()
    }

    /// Number of dense indices handed out.
    pub fn len(&self) -> usize {
        self.next as usize
    }

    /// Whether nothing has been declared.
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}
