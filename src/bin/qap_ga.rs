//! Command-line front end: runs the GA over a set of QAP instance files.
//!
//! ```text
//! qap-ga data/had12.dat data/had14.dat --runs 10 --generations 100 \
//!     --selection tournament --tournament-size 5 --seed 42
//! ```

use anyhow::Context;
use clap::Parser;
use qap_ga::driver::{run_batch, BatchConfig};
use qap_ga::ga::{GaConfig, SelectionMethod};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "qap-ga", version, about = "Genetic algorithm for the Quadratic Assignment Problem")]
struct Cli {
    /// Instance files (QAPLIB-style: n, flow matrix, distance matrix).
    #[arg(required = true)]
    instances: Vec<PathBuf>,

    /// Specimens per generation.
    #[arg(long, default_value_t = 100)]
    population: usize,

    /// Generations per run, including the initial population.
    #[arg(long, default_value_t = 100)]
    generations: usize,

    /// Crossover probability (Px).
    #[arg(long, default_value_t = 0.7)]
    crossover: f64,

    /// Per-gene mutation probability (Pm).
    #[arg(long, default_value_t = 0.01)]
    mutation: f64,

    /// Tournament size, used with `--selection tournament`.
    #[arg(long, default_value_t = 5)]
    tournament_size: usize,

    /// Selection method: `tournament` or `roulette`.
    #[arg(long, default_value = "roulette")]
    selection: SelectionMethod,

    /// Independent runs per instance.
    #[arg(long, default_value_t = 10)]
    runs: usize,

    /// Base random seed; run `i` uses `seed + i`.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for the per-instance CSV logs.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Evaluate specimens on a single thread.
    #[arg(long)]
    sequential: bool,
}

impl Cli {
    fn batch(&self) -> BatchConfig {
        let mut ga = GaConfig::default()
            .with_population_size(self.population)
            .with_crossover_probability(self.crossover)
            .with_mutation_probability(self.mutation)
            .with_tournament_size(self.tournament_size)
            .with_selection(self.selection)
            .with_parallel(!self.sequential);
        if let Some(seed) = self.seed {
            ga = ga.with_seed(seed);
        }
        BatchConfig {
            instances: self.instances.clone(),
            runs_per_instance: self.runs,
            generations: self.generations,
            ga,
            output_dir: self.out_dir.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let outcomes = run_batch(&cli.batch()).context("GA batch failed")?;

    for outcome in &outcomes {
        if let Some(best) = outcome.best() {
            println!(
                "{} best result: {} {:?} (mean over {} runs: {:.1}, log: {})",
                outcome.instance,
                best.best_fitness,
                best.best.genes(),
                outcome.runs.len(),
                outcome.mean_best().unwrap_or(f64::NAN),
                outcome.log_path.display()
            );
        }
    }
    Ok(())
}
