//! Core GA types.
//!
//! A [`Specimen`] is a permutation of the locations `1..=n`; a
//! [`Population`] pairs specimens with their costs index by index. The
//! [`FitnessEvaluator`] trait is the seam between the engine and the
//! objective function.

use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;

/// QAP objective value. Lower is better.
pub type Cost = i64;

/// Scores a specimen. Lower cost is better (minimization).
///
/// # Thread Safety
///
/// `FitnessEvaluator` must be `Sync` because the engine may score
/// specimens in parallel using rayon.
pub trait FitnessEvaluator: Sync {
    /// Returns the cost of assigning facility `i` to location `specimen[i]`.
    ///
    /// Must be deterministic: identical input gives identical output.
    fn evaluate(&self, specimen: &[usize]) -> Cost;
}

/// A candidate assignment: `genes[i]` is the 1-based location of facility `i`.
///
/// Valid specimens contain each of `1..=n` exactly once. Crossover restores
/// this through repair; mutation only transposes genes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Specimen {
    genes: Vec<usize>,
}

impl Specimen {
    /// Wraps a gene vector without checking it.
    pub fn new(genes: Vec<usize>) -> Self {
        Self { genes }
    }

    /// The identity assignment `1, 2, ..., n`.
    pub fn identity(n: usize) -> Self {
        Self::new((1..=n).collect())
    }

    /// A uniformly random permutation of `1..=n`.
    pub fn random<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut genes: Vec<usize> = (1..=n).collect();
        genes.shuffle(rng);
        Self::new(genes)
    }

    /// Number of genes.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether the specimen has no genes.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn genes(&self) -> &[usize] {
        &self.genes
    }

    pub fn genes_mut(&mut self) -> &mut [usize] {
        &mut self.genes
    }

    pub fn into_genes(self) -> Vec<usize> {
        self.genes
    }

    /// Whether the genes are a permutation of `1..=len`.
    pub fn is_valid_permutation(&self) -> bool {
        is_permutation(&self.genes)
    }
}

impl From<Vec<usize>> for Specimen {
    fn from(genes: Vec<usize>) -> Self {
        Self::new(genes)
    }
}

/// Whether `genes` contains each of `1..=genes.len()` exactly once.
pub fn is_permutation(genes: &[usize]) -> bool {
    let n = genes.len();
    let mut seen = vec![false; n + 1];
    for &g in genes {
        if g == 0 || g > n || seen[g] {
            return false;
        }
        seen[g] = true;
    }
    true
}

/// A scored generation: `fitness[i]` is the cost of `specimens[i]`.
#[derive(Debug, Clone)]
pub struct Population {
    specimens: Vec<Specimen>,
    fitness: Vec<Cost>,
}

impl Population {
    /// Scores every specimen, optionally in parallel.
    ///
    /// Results stay index-aligned with the input regardless of `parallel`.
    pub fn evaluate<E: FitnessEvaluator + ?Sized>(
        specimens: Vec<Specimen>,
        evaluator: &E,
        parallel: bool,
    ) -> Self {
        let fitness = if parallel {
            specimens
                .par_iter()
                .map(|s| evaluator.evaluate(s.genes()))
                .collect()
        } else {
            specimens
                .iter()
                .map(|s| evaluator.evaluate(s.genes()))
                .collect()
        };
        Self { specimens, fitness }
    }

    /// Builds a population from already-known costs.
    ///
    /// # Panics
    /// Panics if the lengths differ.
    pub fn from_parts(specimens: Vec<Specimen>, fitness: Vec<Cost>) -> Self {
        assert_eq!(
            specimens.len(),
            fitness.len(),
            "every specimen needs exactly one fitness value"
        );
        Self { specimens, fitness }
    }

    pub fn len(&self) -> usize {
        self.specimens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specimens.is_empty()
    }

    pub fn specimens(&self) -> &[Specimen] {
        &self.specimens
    }

    pub fn fitness(&self) -> &[Cost] {
        &self.fitness
    }

    /// Index of the lowest-cost specimen (first one on ties).
    ///
    /// # Panics
    /// Panics if the population is empty.
    pub fn best_index(&self) -> usize {
        self.fitness
            .iter()
            .enumerate()
            .min_by_key(|&(i, &f)| (f, i))
            .map(|(i, _)| i)
            .expect("population must not be empty")
    }

    /// Lowest cost in the population.
    pub fn best_fitness(&self) -> Cost {
        self.fitness[self.best_index()]
    }

    /// Highest cost in the population.
    pub fn worst_fitness(&self) -> Cost {
        *self
            .fitness
            .iter()
            .max()
            .expect("population must not be empty")
    }

    /// Mean cost.
    pub fn average_fitness(&self) -> f64 {
        assert!(!self.is_empty(), "population must not be empty");
        self.fitness.iter().map(|&f| f as f64).sum::<f64>() / self.len() as f64
    }
}
