//! Newtype wrappers for automaton nodes and alphabet symbols.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::automaton::Automaton;

/// An alphabet symbol, stored as an integer code and displayed as a letter
/// (`0` is `A`, `1` is `B`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Symbol(usize);

impl Symbol {
    /// Create a new symbol, validating it against the alphabet size.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::SymbolOutOfRange`] if `code >= alphabet_size`.
    pub fn new(code: usize, alphabet_size: usize) -> Result<Self, crate::Error> {
        if code < alphabet_size {
            Ok(Symbol(code))
        } else {
            Err(crate::Error::SymbolOutOfRange {
                symbol: code,
                alphabet_size,
            })
        }
    }

    /// Create a symbol from a raw code without validation.
    ///
    /// Only use with known-good constant values (the automaton's output
    /// tables are validated against the alphabet at construction).
    pub const fn from_raw(code: usize) -> Self {
        Symbol(code)
    }

    /// Get the inner code.
    pub fn code(&self) -> usize {
        self.0
    }

    /// Letter representation used in trace strings (`A` for code 0).
    pub fn letter(&self) -> char {
        char::from(b'A' + self.0 as u8)
    }
}

impl From<Symbol> for usize {
    fn from(sym: Symbol) -> Self {
        sym.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One of the automaton's discrete nodes (0..=8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a new node id, validating it's within the automaton.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NodeOutOfRange`] if `index >= Automaton::NUM_NODES`.
    pub fn new(index: usize) -> Result<Self, crate::Error> {
        if index < Automaton::NUM_NODES {
            Ok(NodeId(index))
        } else {
            Err(crate::Error::NodeOutOfRange {
                node: index,
                num_nodes: Automaton::NUM_NODES,
            })
        }
    }

    /// Create a node id without validation. Only for known-good constants.
    pub(crate) const fn from_raw(index: usize) -> Self {
        NodeId(index)
    }

    /// Get the inner index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl From<NodeId> for usize {
    fn from(node: NodeId) -> Self {
        node.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
