//! Genetic Algorithm for the Quadratic Assignment Problem.
//!
//! A generational GA over permutation specimens. Each generation is
//! selected from the previous one, recombined by cut-point crossover with
//! duplicate repair, mutated by gene swaps and re-evaluated. The best
//! specimen ever seen is returned.
//!
//! # Key Types
//!
//! - [`GaConfig`]: Algorithm parameters (population size, probabilities, selection)
//! - [`GeneticAlgorithm`]: Executes the evolutionary loop for one instance
//! - [`GaResult`]: Best specimen plus per-generation statistics
//! - [`SelectionStrategy`]: Tournament or alias-table roulette selection
//!
//! # Submodules
//!
//! - [`operators`]: Repair, cut-point crossover and swap mutation
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Burkard, Karisch & Rendl (1997), "QAPLIB - A Quadratic Assignment Problem Library"

mod config;
mod engine;
pub mod operators;
mod selection;
mod types;

pub use config::{GaConfig, SelectionMethod};
pub use engine::{GaResult, GenerationStats, GeneticAlgorithm};
pub use selection::{
    inverted_weights, strategy_for, RouletteSelection, SelectionStrategy, TournamentSelection,
};
pub use types::{is_permutation, Cost, FitnessEvaluator, Population, Specimen};
