//! Generation-stream environment: walk state, stepping, and scoring.
//!
//! An [`FsaEnv`] owns one stream's mutable position in the automaton and
//! its observable buffers. The caller drives it in strict alternation:
//! read observables, obtain a prediction externally, score it, then
//! `step()`. The target symbol is computed one step ahead of the input
//! symbol so that supervised training knows the correct answer before
//! the predictor is asked for one; `next` becomes `current` atomically
//! at the start of each step.

use std::{collections::BTreeSet, fmt, sync::Arc};

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    automaton::{Automaton, Variant},
    encoding,
    error::{Error, Result},
    types::{NodeId, Symbol},
};

/// Configuration for one generation stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Alphabet size; the observable buffers take this length.
    pub alphabet_size: usize,
    /// Output-symbol variant.
    pub variant: Variant,
    /// Repeat-branch probability for the automaton's tunable edges.
    pub repeat_prob: f64,
    /// Reward written when a prediction matches the target exactly.
    pub reward: f64,
    /// Reward written on a mismatch.
    pub no_reward: f64,
    /// Seed for the stream's RNG; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            alphabet_size: 9,
            variant: Variant::Easy,
            repeat_prob: 0.5,
            reward: 1.0,
            no_reward: 0.0,
            rng_seed: None,
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Mutable position of a single generation stream.
#[derive(Debug, Clone, Copy)]
struct WalkState {
    current_node: NodeId,
    next_node: NodeId,
    current_symbol: Symbol,
    next_symbol: Symbol,
    /// Completed transitions in the current run; -1 until the first step.
    trial: i64,
}

impl WalkState {
    fn reset(automaton: &Automaton) -> Self {
        let current_node = Automaton::RESET_NODE;
        let next_node = Automaton::START_NODE;
        Self {
            current_node,
            next_node,
            current_symbol: automaton.output(current_node),
            next_symbol: automaton.output(next_node),
            trial: -1,
        }
    }
}

/// A single stochastic generation stream over the automaton.
///
/// Holds the walk state and the observable buffers (`input`, `target`,
/// `reward`). The automaton itself is immutable and shareable; walk
/// state and buffers belong exclusively to this stream.
#[derive(Debug, Clone)]
pub struct FsaEnv {
    automaton: Arc<Automaton>,
    reward_value: f64,
    no_reward_value: f64,
    walk: WalkState,
    input: Vec<f64>,
    target: Vec<f64>,
    reward: f64,
    run: u32,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl FsaEnv {
    /// Create a stream with its own automaton built from `config`.
    ///
    /// # Errors
    ///
    /// Propagates automaton validation failures; see [`Automaton::new`].
    pub fn new(config: EnvConfig) -> Result<Self> {
        let automaton = Arc::new(Automaton::new(
            config.variant,
            config.repeat_prob,
            config.alphabet_size,
        )?);
        Self::with_automaton(automaton, config)
    }

    /// Create a stream sharing an already-validated automaton.
    ///
    /// Lets a batch of parallel streams share one read-only transition
    /// table while keeping walk state and buffers per stream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAlphabetSize`] for an empty alphabet and
    /// [`Error::BufferSizeMismatch`] when the configured alphabet size
    /// disagrees with the automaton's.
    pub fn with_automaton(automaton: Arc<Automaton>, config: EnvConfig) -> Result<Self> {
        if config.alphabet_size == 0 {
            return Err(Error::InvalidAlphabetSize { size: 0 });
        }
        if config.alphabet_size != automaton.alphabet_size() {
            return Err(Error::BufferSizeMismatch {
                expected: automaton.alphabet_size(),
                got: config.alphabet_size,
            });
        }

        let walk = WalkState::reset(&automaton);
        Ok(Self {
            automaton,
            reward_value: config.reward,
            no_reward_value: config.no_reward,
            walk,
            input: vec![0.0; config.alphabet_size],
            target: vec![0.0; config.alphabet_size],
            reward: 0.0,
            run: 0,
            rng: build_rng(config.rng_seed),
            rng_seed: config.rng_seed,
        })
    }

    /// Replace the stream's RNG with one seeded from `seed`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    /// Reset walk state to the canonical start for a new run.
    ///
    /// Current node becomes the pre-roll node 7 ("H"), next node the
    /// start node 0 ("F"), and the trial counter the -1 sentinel so the
    /// first `step()` reads trial 0. A configured seed re-seeds the RNG,
    /// making runs repeatable.
    pub fn init(&mut self, run: u32) {
        self.run = run;
        self.walk = WalkState::reset(&self.automaton);
        self.input.fill(0.0);
        self.target.fill(0.0);
        self.reward = 0.0;
        if let Some(seed) = self.rng_seed {
            self.rng = StdRng::seed_from_u64(seed);
        }
    }

    /// Advance the stream by one transition.
    ///
    /// Promotes the previously computed next node/symbol into the
    /// current slot, samples the successor from the current node's
    /// transition row, increments the trial counter, and rebuilds the
    /// one-hot input and target buffers. Never fails.
    pub fn step(&mut self) {
        let draw = self.rng.random::<f64>();
        self.step_with_draw(draw);
    }

    fn step_with_draw(&mut self, draw: f64) {
        self.walk.current_node = self.walk.next_node;
        self.walk.current_symbol = self.walk.next_symbol;
        self.walk.next_node = self.automaton.transition_from(self.walk.current_node, draw);
        self.walk.next_symbol = self.automaton.output(self.walk.next_node);
        self.walk.trial += 1;
        self.set_observables();
    }

    fn set_observables(&mut self) {
        debug_assert_eq!(
            self.input.len(),
            self.automaton.alphabet_size(),
            "with_automaton keeps buffer length equal to the automaton's alphabet"
        );
        encoding::encode_one_hot(self.walk.current_symbol, &mut self.input)
            .expect("construction validates every output symbol against the alphabet");
        encoding::encode_one_hot(self.walk.next_symbol, &mut self.target)
            .expect("construction validates every output symbol against the alphabet");
    }

    /// Score a predicted symbol against the true target.
    ///
    /// Writes the configured reward (exact match) or no-reward value
    /// into the reward scalar and returns whether the match was exact.
    pub fn evaluate_reward(&mut self, predicted: Symbol) -> bool {
        let correct = predicted == self.walk.next_symbol;
        self.reward = if correct {
            self.reward_value
        } else {
            self.no_reward_value
        };
        correct
    }

    /// Whether `predicted` is a plausible continuation from the current
    /// node, i.e. reachable via an edge with nonzero probability.
    pub fn is_valid(&self, predicted: Symbol) -> bool {
        self.automaton
            .valid_continuations(self.walk.current_node)
            .contains(&predicted)
    }

    /// All plausible continuations from the current node.
    pub fn valid_continuations(&self) -> BTreeSet<Symbol> {
        self.automaton.valid_continuations(self.walk.current_node)
    }

    /// One-hot encoding of the current symbol (the predictor's input).
    pub fn input(&self) -> &[f64] {
        &self.input
    }

    /// One-hot encoding of the next symbol (the training target).
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// Reward written by the last [`evaluate_reward`](Self::evaluate_reward).
    pub fn reward(&self) -> f64 {
        self.reward
    }

    pub fn automaton(&self) -> &Arc<Automaton> {
        &self.automaton
    }

    pub fn current_node(&self) -> NodeId {
        self.walk.current_node
    }

    pub fn next_node(&self) -> NodeId {
        self.walk.next_node
    }

    pub fn current_symbol(&self) -> Symbol {
        self.walk.current_symbol
    }

    pub fn next_symbol(&self) -> Symbol {
        self.walk.next_symbol
    }

    /// Trial index within the current run (-1 before the first step).
    pub fn trial(&self) -> i64 {
        self.walk.trial
    }

    pub fn run(&self) -> u32 {
        self.run
    }
}

impl fmt::Display for FsaEnv {
    /// Trace format: `<sym>_<nextSym>_S<node>_rew_<value>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_S{}_rew_{}",
            self.walk.current_symbol, self.walk.next_symbol, self.walk.current_node, self.reward
        )
    }
}
