//! Selection strategies for the GA.
//!
//! A strategy builds the next generation's mating pool: `population.len()`
//! picks from the current population, biased toward low cost. The engine
//! chooses the strategy once at construction and keeps it behind a
//! [`SelectionStrategy`] trait object.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Vose (1991), "A Linear Algorithm for Generating Random Numbers with a
//!   Given Distribution"

use super::config::{GaConfig, SelectionMethod};
use super::types::{Cost, Population, Specimen};
use rand::seq::index;
use rand::RngCore;
use rand_distr::weighted::WeightedAliasIndex;
use rand_distr::Distribution;
use std::fmt;

/// Produces a same-sized mating pool from a scored population.
///
/// All strategies assume **minimization** (lower cost = better).
pub trait SelectionStrategy: Send + Sync + fmt::Debug {
    /// Picks `population.len()` indices into `population`.
    ///
    /// # Panics
    /// Panics if `population` is empty.
    fn select_indices(&self, population: &Population, rng: &mut dyn RngCore) -> Vec<usize>;

    /// Picks `population.len()` specimens, cloning each pick.
    fn select(&self, population: &Population, rng: &mut dyn RngCore) -> Vec<Specimen> {
        self.select_indices(population, rng)
            .into_iter()
            .map(|i| population.specimens()[i].clone())
            .collect()
    }
}

/// Builds the strategy named by `config.selection`.
pub fn strategy_for(config: &GaConfig) -> Box<dyn SelectionStrategy> {
    match config.selection {
        SelectionMethod::Tournament => Box::new(TournamentSelection::new(config.tournament_size)),
        SelectionMethod::Roulette => Box::new(RouletteSelection),
    }
}

/// Tournament selection: draw `size` distinct competitors, keep the cheapest.
///
/// Higher `size` = stronger selection pressure. `size = 1` is uniform
/// random selection; `size = population.len()` always returns the best.
///
/// # Complexity
/// O(size) per pick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    size: usize,
}

impl TournamentSelection {
    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select_indices(&self, population: &Population, rng: &mut dyn RngCore) -> Vec<usize> {
        let n = population.len();
        assert!(n > 0, "cannot select from empty population");
        assert!(
            self.size >= 1 && self.size <= n,
            "tournament size {} out of range for population of {n}",
            self.size
        );

        let fitness = population.fitness();
        (0..n)
            .map(|_| {
                index::sample(&mut *rng, n, self.size)
                    .into_iter()
                    .min_by_key(|&i| fitness[i])
                    .expect("tournament has at least one competitor")
            })
            .collect()
    }
}

/// Fitness-proportionate (roulette wheel) selection.
///
/// Cost is inverted to a weight, `weight_i = (worst + 1) - cost_i`, so the
/// worst specimen keeps weight 1 and equal costs give uniform sampling.
/// Picks are drawn with replacement from an alias table.
///
/// # Complexity
/// O(n) setup per generation, O(1) per pick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouletteSelection;

impl SelectionStrategy for RouletteSelection {
    fn select_indices(&self, population: &Population, rng: &mut dyn RngCore) -> Vec<usize> {
        let n = population.len();
        assert!(n > 0, "cannot select from empty population");

        let weights = inverted_weights(population.fitness());
        let table = WeightedAliasIndex::new(weights)
            .expect("inverted weights are positive and finite");
        (0..n).map(|_| table.sample(&mut *rng)).collect()
    }
}

/// Turns costs into selection weights, cheapest specimen heaviest.
///
/// Every weight is at least 1. Computed in `i128`, so any pair of costs
/// is safe.
pub fn inverted_weights(fitness: &[Cost]) -> Vec<f64> {
    let Some(&worst) = fitness.iter().max() else {
        return Vec::new();
    };
    let top = i128::from(worst) + 1;
    fitness
        .iter()
        .map(|&f| (top - i128::from(f)) as f64)
        .collect()
}
