//! GA configuration.
//!
//! [`GaConfig`] holds every parameter of the evolutionary loop except the
//! generation budget, which is passed to
//! [`GeneticAlgorithm::run`](super::GeneticAlgorithm::run).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Which selection operator refills the population each generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SelectionMethod {
    /// Best of `tournament_size` distinct random competitors.
    Tournament,
    /// Fitness-proportionate sampling on inverted cost, via an alias table.
    #[default]
    Roulette,
}

impl FromStr for SelectionMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tournament" => Ok(Self::Tournament),
            "roulette" => Ok(Self::Roulette),
            _ => Err(ConfigError::UnknownSelection(s.to_string())),
        }
    }
}

impl fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tournament => f.write_str("tournament"),
            Self::Roulette => f.write_str("roulette"),
        }
    }
}

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// ```
/// use qap_ga::ga::{GaConfig, SelectionMethod};
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.tournament_size, 5);
/// assert_eq!(config.selection, SelectionMethod::Roulette);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use qap_ga::ga::{GaConfig, SelectionMethod};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(SelectionMethod::Tournament)
///     .with_tournament_size(8)
///     .with_mutation_probability(0.02)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of specimens per generation. Constant for the whole run.
    pub population_size: usize,

    /// Per-gene probability of a swap mutation (0.0–1.0).
    ///
    /// Each gene is tested independently, so a specimen of `n` genes
    /// receives `n · mutation_probability` swaps on average.
    pub mutation_probability: f64,

    /// Probability that a parent pair is recombined (0.0–1.0).
    ///
    /// Otherwise both parents pass to the next generation unchanged.
    pub crossover_probability: f64,

    /// Competitors per tournament. Only used by tournament selection.
    pub tournament_size: usize,

    /// Selection operator.
    pub selection: SelectionMethod,

    /// Whether to evaluate specimens in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            mutation_probability: 0.01,
            crossover_probability: 0.7,
            tournament_size: 5,
            selection: SelectionMethod::default(),
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the per-gene mutation probability.
    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.mutation_probability = p;
        self
    }

    /// Sets the crossover probability.
    pub fn with_crossover_probability(mut self, p: f64) -> Self {
        self.crossover_probability = p;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the selection method.
    pub fn with_selection(mut self, selection: SelectionMethod) -> Self {
        self.selection = selection;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Probabilities are not clamped; anything outside `[0, 1]` (or NaN)
    /// is rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::PopulationTooSmall(self.population_size));
        }
        check_probability("mutation_probability", self.mutation_probability)?;
        check_probability("crossover_probability", self.crossover_probability)?;
        if self.selection == SelectionMethod::Tournament
            && (self.tournament_size == 0 || self.tournament_size > self.population_size)
        {
            return Err(ConfigError::TournamentSizeOutOfRange {
                size: self.tournament_size,
                population: self.population_size,
            });
        }
        Ok(())
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}
