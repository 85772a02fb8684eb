//! Error types for the fsagen crate

use thiserror::Error;

/// Main error type for the fsagen crate
///
/// Every variant is a fatal construction-time condition. Stepping and
/// scoring a well-formed generator never fails.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid alphabet size: {size} (must be at least 1)")]
    InvalidAlphabetSize { size: usize },

    #[error("symbol {symbol} out of range for alphabet of size {alphabet_size}")]
    SymbolOutOfRange { symbol: usize, alphabet_size: usize },

    #[error("node {node} out of range (automaton has {num_nodes} nodes)")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    #[error("invalid edge probability {value} (must be within [0, 1])")]
    InvalidProbability { value: f64 },

    #[error("transition row for node {node} sums to {sum} (expected 1.0)")]
    MalformedRow { node: usize, sum: f64 },

    #[error("one-hot buffer has length {got}, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },
}

/// Result type alias for the fsagen crate
pub type Result<T> = std::result::Result<T, Error>;
