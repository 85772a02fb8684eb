//! Probabilistic automaton over a fixed 9-node topology.
//!
//! The automaton is built from a declarative edge list plus a per-node
//! output-symbol map and validated at construction, so that malformed
//! distributions surface as errors instead of silent misbehavior at
//! sampling time. The topology itself is a fixed contract: only the
//! repeat probability and the output variant are tunable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    types::{NodeId, Symbol},
};

/// Tolerance for the row-sum validation check.
const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Named output-symbol configurations.
///
/// The two variants share seven of the nine node outputs and differ only
/// at nodes 5 and 6: `Easy` gives them distinct symbols (D, E), `Hard`
/// collapses both onto the same symbol (C), which makes the following
/// symbol harder to predict from the current one alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Easy,
    Hard,
}

impl Variant {
    /// Output symbol codes per node, in node order 0..=8.
    fn output_codes(&self) -> [usize; Automaton::NUM_NODES] {
        match self {
            // F A B G G D E H I
            Variant::Easy => [5, 0, 1, 6, 6, 3, 4, 7, 8],
            // F A B G G C C H I
            Variant::Hard => [5, 0, 1, 6, 6, 2, 2, 7, 8],
        }
    }
}

/// A single directed edge of the transition graph.
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: usize,
    to: usize,
    probability: f64,
}

/// Immutable probabilistic automaton: transition table plus output map.
///
/// Construction validates that every edge probability lies in [0, 1],
/// that every populated transition row is a discrete probability
/// distribution, and that every output symbol fits the alphabet. After
/// construction the automaton never changes, so it may be shared
/// read-only across any number of generation streams.
#[derive(Debug, Clone)]
pub struct Automaton {
    transitions: [[f64; Self::NUM_NODES]; Self::NUM_NODES],
    outputs: [Symbol; Self::NUM_NODES],
    variant: Variant,
    repeat_prob: f64,
    alphabet_size: usize,
}

impl Automaton {
    /// Number of nodes in the fixed topology.
    pub const NUM_NODES: usize = 9;

    /// The pre-roll node generation streams are reset to.
    pub const RESET_NODE: NodeId = NodeId::from_raw(7);

    /// The node that deterministically follows the reset node.
    pub const START_NODE: NodeId = NodeId::from_raw(0);

    /// Build the automaton for the given variant and repeat probability.
    ///
    /// Topology (p = `repeat_prob`):
    /// - node 0 branches 50/50 to nodes 1 and 2
    /// - nodes 1 and 2 repeat into nodes 3 and 4 with probability p,
    ///   or advance to nodes 5 and 6 with probability 1 - p
    /// - nodes 3 and 4 self-loop with probability p, advancing to
    ///   nodes 5 and 6 with probability 1 - p
    /// - nodes 5 and 6 advance deterministically to nodes 7 and 8
    /// - nodes 7 and 8 loop back to node 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProbability`] if `repeat_prob` is outside
    /// [0, 1], [`Error::InvalidAlphabetSize`] if the alphabet is empty,
    /// [`Error::SymbolOutOfRange`] if the alphabet cannot hold the
    /// variant's output symbols, or [`Error::MalformedRow`] if a
    /// transition row fails the distribution check.
    pub fn new(variant: Variant, repeat_prob: f64, alphabet_size: usize) -> Result<Self> {
        if alphabet_size == 0 {
            return Err(Error::InvalidAlphabetSize { size: 0 });
        }
        if !(0.0..=1.0).contains(&repeat_prob) || !repeat_prob.is_finite() {
            return Err(Error::InvalidProbability { value: repeat_prob });
        }

        let p = repeat_prob;
        let edges = [
            Edge { from: 0, to: 1, probability: 0.5 },
            Edge { from: 0, to: 2, probability: 0.5 },
            Edge { from: 1, to: 3, probability: p },
            Edge { from: 1, to: 5, probability: 1.0 - p },
            Edge { from: 2, to: 4, probability: p },
            Edge { from: 2, to: 6, probability: 1.0 - p },
            Edge { from: 3, to: 3, probability: p },
            Edge { from: 3, to: 5, probability: 1.0 - p },
            Edge { from: 4, to: 4, probability: p },
            Edge { from: 4, to: 6, probability: 1.0 - p },
            Edge { from: 5, to: 7, probability: 1.0 },
            Edge { from: 6, to: 8, probability: 1.0 },
            Edge { from: 7, to: 0, probability: 1.0 },
            Edge { from: 8, to: 0, probability: 1.0 },
        ];

        let mut transitions = [[0.0; Self::NUM_NODES]; Self::NUM_NODES];
        for edge in edges {
            if !(0.0..=1.0).contains(&edge.probability) {
                return Err(Error::InvalidProbability {
                    value: edge.probability,
                });
            }
            transitions[edge.from][edge.to] += edge.probability;
        }

        for (node, row) in transitions.iter().enumerate() {
            let sum: f64 = row.iter().sum();
            // Rows without edges would be terminal; this topology has none.
            if (sum - 1.0).abs() > ROW_SUM_TOLERANCE {
                return Err(Error::MalformedRow { node, sum });
            }
        }

        let mut outputs = [Symbol::from_raw(0); Self::NUM_NODES];
        for (node, &code) in variant.output_codes().iter().enumerate() {
            outputs[node] = Symbol::new(code, alphabet_size)?;
        }

        Ok(Self {
            transitions,
            outputs,
            variant,
            repeat_prob,
            alphabet_size,
        })
    }

    /// The transition-probability row for `node`.
    pub fn transition_row(&self, node: NodeId) -> &[f64; Self::NUM_NODES] {
        &self.transitions[node.index()]
    }

    /// The symbol emitted when the automaton is in `node`.
    pub fn output(&self, node: NodeId) -> Symbol {
        self.outputs[node.index()]
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn repeat_prob(&self) -> f64 {
        self.repeat_prob
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    /// Sample the successor of `node` for a uniform draw in [0, 1).
    ///
    /// Walks the transition row left to right accumulating probability
    /// mass and selects the first column whose cumulative mass exceeds
    /// the draw. If floating-point rounding leaves the row's total mass
    /// fractionally below the draw, the result clamps to the last node,
    /// so a successor is always assigned.
    pub fn transition_from(&self, node: NodeId, draw: f64) -> NodeId {
        let row = &self.transitions[node.index()];
        let mut cumulative = 0.0;
        for (target, &probability) in row.iter().enumerate() {
            cumulative += probability;
            if draw < cumulative {
                return NodeId::from_raw(target);
            }
        }
        NodeId::from_raw(Self::NUM_NODES - 1)
    }

    /// All symbols reachable from `node` via an edge with strictly
    /// positive probability.
    ///
    /// Because the automaton is stochastic, several symbols can be
    /// equally valid continuations from the same state; this set backs
    /// the soft "plausibility" scoring of a predictor's choice.
    pub fn valid_continuations(&self, node: NodeId) -> BTreeSet<Symbol> {
        let row = &self.transitions[node.index()];
        row.iter()
            .enumerate()
            .filter(|&(_, &probability)| probability > 0.0)
            .map(|(target, _)| self.outputs[target])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn easy(repeat_prob: f64) -> Automaton {
        Automaton::new(Variant::Easy, repeat_prob, 13).expect("automaton construction")
    }

    #[test]
    fn rows_sum_to_one_across_repeat_prob_grid() {
        for i in 0..=10 {
            let p = f64::from(i) / 10.0;
            let automaton = easy(p);
            for node in 0..Automaton::NUM_NODES {
                let row = automaton.transition_row(NodeId::new(node).unwrap());
                let sum: f64 = row.iter().sum();
                assert!(
                    (sum - 1.0).abs() < 1e-6,
                    "row {node} sums to {sum} for p = {p}"
                );
            }
        }
    }

    #[test]
    fn variants_differ_only_at_nodes_five_and_six() {
        let easy = easy(0.5);
        let hard = Automaton::new(Variant::Hard, 0.5, 13).unwrap();
        for node in 0..Automaton::NUM_NODES {
            let id = NodeId::new(node).unwrap();
            if node == 5 || node == 6 {
                assert_ne!(easy.output(id), hard.output(id));
            } else {
                assert_eq!(easy.output(id), hard.output(id));
            }
        }
        assert_eq!(hard.output(NodeId::new(5).unwrap()).letter(), 'C');
        assert_eq!(hard.output(NodeId::new(6).unwrap()).letter(), 'C');
        assert_eq!(easy.output(NodeId::new(5).unwrap()).letter(), 'D');
        assert_eq!(easy.output(NodeId::new(6).unwrap()).letter(), 'E');
    }

    #[test]
    fn rejects_repeat_prob_outside_unit_interval() {
        assert!(matches!(
            Automaton::new(Variant::Easy, 1.5, 13),
            Err(Error::InvalidProbability { .. })
        ));
        assert!(matches!(
            Automaton::new(Variant::Easy, -0.1, 13),
            Err(Error::InvalidProbability { .. })
        ));
        assert!(matches!(
            Automaton::new(Variant::Easy, f64::NAN, 13),
            Err(Error::InvalidProbability { .. })
        ));
    }

    #[test]
    fn rejects_alphabet_too_small_for_outputs() {
        // Largest output code is 8 ("I"), so the alphabet needs 9 entries.
        assert!(matches!(
            Automaton::new(Variant::Easy, 0.5, 8),
            Err(Error::SymbolOutOfRange { .. })
        ));
        assert!(Automaton::new(Variant::Easy, 0.5, 9).is_ok());
        assert!(matches!(
            Automaton::new(Variant::Easy, 0.5, 0),
            Err(Error::InvalidAlphabetSize { size: 0 })
        ));
    }

    #[test]
    fn transition_from_respects_cumulative_boundaries() {
        let automaton = easy(0.5);
        let node0 = NodeId::new(0).unwrap();
        assert_eq!(automaton.transition_from(node0, 0.0).index(), 1);
        assert_eq!(automaton.transition_from(node0, 0.49).index(), 1);
        // Boundary draw falls into the second branch: 0.5 is not < 0.5.
        assert_eq!(automaton.transition_from(node0, 0.5).index(), 2);
        assert_eq!(automaton.transition_from(node0, 0.999).index(), 2);
    }

    #[test]
    fn transition_from_clamps_when_draw_exceeds_row_mass() {
        let automaton = easy(0.5);
        // A draw of exactly 1.0 cannot occur from a [0, 1) source but
        // models the rounding case where cumulative mass < draw.
        let clamped = automaton.transition_from(NodeId::new(7).unwrap(), 1.0);
        assert_eq!(clamped.index(), Automaton::NUM_NODES - 1);
    }

    #[test]
    fn valid_continuations_from_start_are_a_and_b() {
        for variant in [Variant::Easy, Variant::Hard] {
            let automaton = Automaton::new(variant, 0.5, 13).unwrap();
            let symbols: Vec<char> = automaton
                .valid_continuations(Automaton::START_NODE)
                .iter()
                .map(Symbol::letter)
                .collect();
            assert_eq!(symbols, vec!['A', 'B']);
        }
    }

    #[test]
    fn valid_continuations_collapse_on_shared_symbols() {
        // Hard variant: nodes 5 and 6 both emit C, and with p = 0 node 1
        // goes to node 5 with probability 1, so only C remains.
        let automaton = Automaton::new(Variant::Hard, 0.0, 13).unwrap();
        let from_node1 = automaton.valid_continuations(NodeId::new(1).unwrap());
        let letters: Vec<char> = from_node1.iter().map(Symbol::letter).collect();
        assert_eq!(letters, vec!['C']);
    }

    #[test]
    fn deterministic_rows_ignore_the_draw() {
        let automaton = easy(0.25);
        let node5 = NodeId::new(5).unwrap();
        for draw in [0.0, 0.3, 0.7, 0.999_999] {
            assert_eq!(automaton.transition_from(node5, draw).index(), 7);
        }
    }
}
