//! fsagen CLI - drive the sequence generator with a toy predictor
//!
//! Runs the strict read-predict-score-step loop for a number of trials,
//! standing a simple bigram frequency table in for the out-of-scope
//! neural predictor, and reports exact-match and valid-fraction rates.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use fsagen::{EnvConfig, FsaEnv, PredictionStats, Symbol, Variant, encoding};

#[derive(Parser)]
#[command(name = "fsagen")]
#[command(version, about = "Stochastic finite-state sequence generator", long_about = None)]
struct Cli {
    /// Number of trials (transitions) to run
    #[arg(long, default_value_t = 10_000)]
    trials: u64,

    /// RNG seed for a reproducible walk
    #[arg(long)]
    seed: Option<u64>,

    /// Output-symbol variant
    #[arg(long, value_enum, default_value = "easy")]
    variant: VariantArg,

    /// Repeat-branch probability
    #[arg(long, default_value_t = 0.5)]
    repeat_prob: f64,

    /// Alphabet size (observable buffer length)
    #[arg(long, default_value_t = 9)]
    alphabet_size: usize,

    /// Print the trace string for each trial
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Nodes 5 and 6 emit distinct symbols (D, E)
    Easy,
    /// Nodes 5 and 6 both emit C
    Hard,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Easy => Variant::Easy,
            VariantArg::Hard => Variant::Hard,
        }
    }
}

/// Bigram frequency predictor: counts observed (current, next) pairs and
/// predicts the most frequent successor of the current symbol.
struct BigramPredictor {
    counts: Vec<Vec<u64>>,
}

impl BigramPredictor {
    fn new(alphabet_size: usize) -> Self {
        Self {
            counts: vec![vec![0; alphabet_size]; alphabet_size],
        }
    }

    fn predict(&self, input: &[f64]) -> Symbol {
        let current = encoding::arg_max(input).unwrap_or(0);
        let row = &self.counts[current];
        let predicted = encoding::arg_max(&row.iter().map(|&c| c as f64).collect::<Vec<_>>())
            .unwrap_or(current);
        Symbol::from_raw(predicted)
    }

    fn learn(&mut self, current: Symbol, next: Symbol) {
        self.counts[current.code()][next.code()] += 1;
    }
}

#[derive(Serialize)]
struct RunSummary {
    trials: u64,
    exact_matches: u64,
    exact_match_rate: f64,
    valid_predictions: u64,
    valid_fraction: f64,
    final_state: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = EnvConfig {
        alphabet_size: cli.alphabet_size,
        variant: cli.variant.into(),
        repeat_prob: cli.repeat_prob,
        rng_seed: cli.seed,
        ..EnvConfig::default()
    };
    let mut env = FsaEnv::new(config)?;
    let mut predictor = BigramPredictor::new(cli.alphabet_size);
    let mut stats = PredictionStats::new();
    let mut exact_matches = 0u64;

    let progress = ProgressBar::new(cli.trials);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials")?
            .progress_chars("=>-"),
    );

    env.init(0);
    env.step();
    for _ in 0..cli.trials {
        let predicted = predictor.predict(env.input());
        if env.evaluate_reward(predicted) {
            exact_matches += 1;
        }
        stats.record(predicted, env.is_valid(predicted));
        predictor.learn(env.current_symbol(), env.next_symbol());

        if cli.trace {
            progress.println(env.to_string());
        }
        env.step();
        progress.inc(1);
    }
    progress.finish_and_clear();

    let summary = RunSummary {
        trials: cli.trials,
        exact_matches,
        exact_match_rate: exact_matches as f64 / cli.trials.max(1) as f64,
        valid_predictions: stats.valid(),
        valid_fraction: stats.valid_fraction(),
        final_state: env.to_string(),
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
