//! Stochastic finite-state sequence generator
//!
//! This crate walks a small hand-specified probabilistic automaton to
//! produce training stimuli and target labels for a sequence-prediction
//! learner. It provides:
//! - A validated 9-node automaton with Easy/Hard output variants and a
//!   tunable repeat probability
//! - A generation-stream environment with look-ahead-by-one walk state
//! - One-hot encoding of symbols into observable buffers
//! - Exact-match reward scoring and a valid-continuation query for soft
//!   plausibility scoring
//! - A prediction-statistics accumulator for callers

pub mod automaton;
pub mod encoding;
pub mod env;
pub mod error;
pub mod stats;
pub mod types;

pub use automaton::{Automaton, Variant};
pub use env::{EnvConfig, FsaEnv};
pub use error::{Error, Result};
pub use stats::PredictionStats;
pub use types::{NodeId, Symbol};
