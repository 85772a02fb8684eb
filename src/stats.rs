//! Running valid/invalid prediction counts.
//!
//! The environment only answers plausibility queries; accumulation
//! belongs to the caller. This collaborator keeps the running counts
//! and the derived valid-fraction for reporting.

use serde::{Deserialize, Serialize};

use crate::types::Symbol;

/// Accumulated plausibility statistics for one run of predictions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PredictionStats {
    valid: u64,
    invalid: u64,
    last_predicted: Option<Symbol>,
}

impl PredictionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one prediction and whether the environment judged it a
    /// valid continuation.
    pub fn record(&mut self, predicted: Symbol, is_valid: bool) {
        if is_valid {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        self.last_predicted = Some(predicted);
    }

    pub fn valid(&self) -> u64 {
        self.valid
    }

    pub fn invalid(&self) -> u64 {
        self.invalid
    }

    pub fn total(&self) -> u64 {
        self.valid + self.invalid
    }

    /// Fraction of recorded predictions that were valid continuations;
    /// 0.0 before anything is recorded.
    pub fn valid_fraction(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.valid as f64 / total as f64
        }
    }

    /// The most recently recorded prediction, if any.
    pub fn last_predicted(&self) -> Option<Symbol> {
        self.last_predicted
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
