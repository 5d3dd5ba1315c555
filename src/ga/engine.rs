//! GA evolutionary loop execution.
//!
//! [`GeneticAlgorithm`] drives one run:
//! initialization → evaluation → (selection → crossover → mutation →
//! evaluation)* → best-ever specimen.
//!
//! Generation 1 is the random initial population. Every further generation
//! is one full cycle, so `run(g)` evaluates `g` populations and writes `g`
//! log records.

use super::config::GaConfig;
use super::operators::{breed, mutate_all};
use super::selection::{strategy_for, SelectionStrategy};
use super::types::{Cost, Population, Specimen};
use crate::error::{ConfigError, GaError};
use crate::logger::GenerationLogger;
use crate::qap::QapInstance;
use crate::random::rng_from_option;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Summary of one evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// 1-based generation index.
    pub generation: usize,
    /// Lowest cost in this generation.
    pub best: Cost,
    /// Mean cost of this generation.
    pub average: f64,
    /// Highest cost in this generation.
    pub worst: Cost,
    /// Lowest cost seen in any generation up to and including this one.
    pub best_so_far: Cost,
}

impl GenerationStats {
    fn of(generation: usize, population: &Population, best_so_far: Cost) -> Self {
        Self {
            generation,
            best: population.best_fitness(),
            average: population.average_fitness(),
            worst: population.worst_fitness(),
            best_so_far,
        }
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaResult {
    /// Best specimen seen in any generation.
    pub best: Specimen,

    /// Cost of `best`.
    pub best_fitness: Cost,

    /// Number of generations evaluated, including the initial one.
    pub generations: usize,

    /// Whether the run stopped early on the cancellation flag.
    pub cancelled: bool,

    /// Per-generation statistics, one entry per evaluated generation.
    pub history: Vec<GenerationStats>,
}

/// Genetic algorithm for one QAP instance.
///
/// The selection strategy is fixed at construction; invalid configurations
/// are rejected there and never reach [`run`](Self::run).
///
/// # Usage
///
/// ```
/// use qap_ga::ga::{GaConfig, GeneticAlgorithm};
/// use qap_ga::logger::MemoryLogger;
/// use qap_ga::qap::QapInstance;
///
/// let instance = QapInstance::parse("tiny", "3\n0 2 0\n2 0 3\n0 3 0\n0 1 5\n1 0 4\n5 4 0\n").unwrap();
/// let mut logger = MemoryLogger::new();
/// let config = GaConfig::default()
///     .with_population_size(20)
///     .with_mutation_probability(0.2)
///     .with_seed(1);
///
/// let mut ga = GeneticAlgorithm::new(&instance, config, &mut logger).unwrap();
/// let result = ga.run(20).unwrap();
/// assert_eq!(result.best_fitness, 22);
/// assert_eq!(logger.records.len(), 20);
/// ```
pub struct GeneticAlgorithm<'a> {
    instance: &'a QapInstance,
    config: GaConfig,
    selection: Box<dyn SelectionStrategy>,
    logger: &'a mut dyn GenerationLogger,
}

impl<'a> GeneticAlgorithm<'a> {
    /// Validates `config` and fixes the selection strategy.
    pub fn new(
        instance: &'a QapInstance,
        config: GaConfig,
        logger: &'a mut dyn GenerationLogger,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if instance.size() == 0 {
            return Err(ConfigError::EmptyInstance);
        }
        let selection = strategy_for(&config);
        Ok(Self {
            instance,
            config,
            selection,
            logger,
        })
    }

    pub fn config(&self) -> &GaConfig {
        &self.config
    }

    /// Runs for exactly `generations` generations.
    pub fn run(&mut self, generations: usize) -> Result<GaResult, GaError> {
        self.run_with_cancel(generations, None)
    }

    /// Runs with an optional cancellation flag.
    ///
    /// The flag is checked at the top of each generation cycle. When set,
    /// the run stops and returns the best specimen found so far with
    /// `cancelled = true`.
    pub fn run_with_cancel(
        &mut self,
        generations: usize,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<GaResult, GaError> {
        if generations == 0 {
            return Err(ConfigError::NoGenerations.into());
        }

        let n = self.instance.size();
        let pop_size = self.config.population_size;
        let parallel = self.config.parallel;
        let mut rng = rng_from_option(self.config.seed);

        tracing::info!(
            instance = self.instance.name(),
            n,
            population = pop_size,
            selection = %self.config.selection,
            generations,
            "starting GA run"
        );

        // 1. Initialize population
        let specimens: Vec<Specimen> = (0..pop_size)
            .map(|_| Specimen::random(n, &mut rng))
            .collect();

        // 2. Evaluate initial population
        let mut population = Population::evaluate(specimens, self.instance, parallel);

        // 3. Track best
        let first = population.best_index();
        let mut best = population.specimens()[first].clone();
        let mut best_fitness = population.fitness()[first];

        let mut history = Vec::with_capacity(generations);
        let mut generation = 1;
        self.record(generation, &population, best_fitness, &mut history)?;

        let mut cancelled = false;

        // 4. Evolutionary loop
        while generation < generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    tracing::warn!(generation, "GA run cancelled");
                    break;
                }
            }

            let pool = self.selection.select(&population, &mut rng);
            let mut children = breed(&pool, self.config.crossover_probability, &mut rng);
            mutate_all(&mut children, self.config.mutation_probability, &mut rng);
            population = Population::evaluate(children, self.instance, parallel);

            let gen_best = population.best_index();
            if population.fitness()[gen_best] < best_fitness {
                best = population.specimens()[gen_best].clone();
                best_fitness = population.fitness()[gen_best];
            }

            generation += 1;
            self.record(generation, &population, best_fitness, &mut history)?;
        }

        tracing::info!(
            instance = self.instance.name(),
            best_fitness,
            generations = generation,
            "GA run finished"
        );

        Ok(GaResult {
            best,
            best_fitness,
            generations: generation,
            cancelled,
            history,
        })
    }

    fn record(
        &mut self,
        generation: usize,
        population: &Population,
        best_so_far: Cost,
        history: &mut Vec<GenerationStats>,
    ) -> Result<(), GaError> {
        let stats = GenerationStats::of(generation, population, best_so_far);
        tracing::debug!(
            generation,
            best = stats.best,
            average = stats.average,
            worst = stats.worst,
            best_so_far = stats.best_so_far,
            "generation evaluated"
        );
        self.logger.write_log(&stats)?;
        history.push(stats);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::{FitnessEvaluator, SelectionMethod};
    use crate::logger::MemoryLogger;
    use crate::qap::fixtures::had12;
    use std::io;

    fn config(selection: SelectionMethod) -> GaConfig {
        GaConfig::default()
            .with_population_size(60)
            .with_selection(selection)
            .with_tournament_size(5)
            .with_crossover_probability(0.7)
            .with_mutation_probability(0.01)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_result_is_consistent() {
        let inst = had12();
        for selection in [SelectionMethod::Tournament, SelectionMethod::Roulette] {
            let mut logger = MemoryLogger::new();
            let mut ga = GeneticAlgorithm::new(&inst, config(selection), &mut logger).unwrap();
            let result = ga.run(30).unwrap();

            assert!(result.best.is_valid_permutation());
            assert_eq!(result.best.len(), 12);
            assert_eq!(inst.evaluate(result.best.genes()), result.best_fitness);
            assert!(result.best_fitness >= 1652, "below the known optimum");
            assert!(!result.cancelled);
            assert_eq!(result.generations, 30);
        }
    }

    #[test]
    fn test_one_log_record_per_generation() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let result = GeneticAlgorithm::new(&inst, config(SelectionMethod::Roulette), &mut logger)
            .unwrap()
            .run(25)
            .unwrap();

        assert_eq!(logger.records.len(), 25);
        assert_eq!(logger.records, result.history);
        for (i, stats) in logger.records.iter().enumerate() {
            assert_eq!(stats.generation, i + 1);
            assert!(stats.best as f64 <= stats.average);
            assert!(stats.average <= stats.worst as f64);
        }
    }

    #[test]
    fn test_single_generation_only_evaluates() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let result = GeneticAlgorithm::new(&inst, config(SelectionMethod::Tournament), &mut logger)
            .unwrap()
            .run(1)
            .unwrap();
        assert_eq!(result.generations, 1);
        assert_eq!(logger.records.len(), 1);
        assert_eq!(logger.records[0].best, result.best_fitness);
    }

    #[test]
    fn test_global_best_never_rises() {
        let inst = had12();
        for selection in [SelectionMethod::Tournament, SelectionMethod::Roulette] {
            for seed in [1, 2, 3] {
                let mut logger = MemoryLogger::new();
                let result =
                    GeneticAlgorithm::new(&inst, config(selection).with_seed(seed), &mut logger)
                        .unwrap()
                        .run(60)
                        .unwrap();

                let mut running = Cost::MAX;
                for stats in &result.history {
                    running = running.min(stats.best);
                    assert_eq!(stats.best_so_far, running, "generation {}", stats.generation);
                }
                for pair in result.history.windows(2) {
                    assert!(pair[1].best_so_far <= pair[0].best_so_far);
                }
                assert_eq!(result.history[0].best_so_far, result.history[0].best);
                assert_eq!(result.history.last().unwrap().best_so_far, result.best_fitness);
            }
        }
    }

    #[test]
    fn test_single_specimen_population() {
        let inst = had12();
        for selection in [SelectionMethod::Tournament, SelectionMethod::Roulette] {
            let mut logger = MemoryLogger::new();
            let config = config(selection)
                .with_population_size(1)
                .with_tournament_size(1)
                .with_mutation_probability(0.2);
            let result = GeneticAlgorithm::new(&inst, config, &mut logger)
                .unwrap()
                .run(20)
                .unwrap();

            assert_eq!(result.history.len(), 20);
            assert!(result.best.is_valid_permutation());
            assert_eq!(inst.evaluate(result.best.genes()), result.best_fitness);
            // with one specimen, best, average and worst coincide
            for stats in &result.history {
                assert_eq!(stats.best, stats.worst);
                assert_eq!(stats.best as f64, stats.average);
            }
        }
    }

    #[test]
    fn test_tournament_improves_on_initial_population() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let result = GeneticAlgorithm::new(
            &inst,
            config(SelectionMethod::Tournament).with_population_size(100),
            &mut logger,
        )
        .unwrap()
        .run(100)
        .unwrap();

        let initial = result.history[0];
        let last = result.history[result.history.len() - 1];
        assert!(
            last.average < initial.average,
            "average cost should drop under selection pressure: {} -> {}",
            initial.average,
            last.average
        );
        assert!(result.best_fitness < initial.best);
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let inst = had12();
        for selection in [SelectionMethod::Tournament, SelectionMethod::Roulette] {
            let mut first = MemoryLogger::new();
            let a = GeneticAlgorithm::new(&inst, config(selection), &mut first)
                .unwrap()
                .run(40)
                .unwrap();

            // parallel evaluation must not change anything
            let mut second = MemoryLogger::new();
            let b = GeneticAlgorithm::new(&inst, config(selection).with_parallel(true), &mut second)
                .unwrap()
                .run(40)
                .unwrap();

            assert_eq!(first.records, second.records);
            assert_eq!(a.best, b.best);
            assert_eq!(a.best_fitness, b.best_fitness);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let inst = had12();
        let mut first = MemoryLogger::new();
        let mut second = MemoryLogger::new();
        GeneticAlgorithm::new(&inst, config(SelectionMethod::Roulette), &mut first)
            .unwrap()
            .run(10)
            .unwrap();
        GeneticAlgorithm::new(
            &inst,
            config(SelectionMethod::Roulette).with_seed(43),
            &mut second,
        )
        .unwrap()
        .run(10)
        .unwrap();
        assert_ne!(first.records, second.records);
    }

    #[test]
    fn test_odd_population_size() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let result = GeneticAlgorithm::new(
            &inst,
            config(SelectionMethod::Tournament).with_population_size(7),
            &mut logger,
        )
        .unwrap()
        .run(15)
        .unwrap();
        assert_eq!(result.history.len(), 15);
        assert!(result.best.is_valid_permutation());
    }

    #[test]
    fn test_zero_generations_rejected() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let mut ga = GeneticAlgorithm::new(&inst, config(SelectionMethod::Roulette), &mut logger)
            .unwrap();
        assert!(matches!(
            ga.run(0),
            Err(GaError::Config(ConfigError::NoGenerations))
        ));
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let bad = config(SelectionMethod::Tournament).with_tournament_size(61);
        assert!(matches!(
            GeneticAlgorithm::new(&inst, bad, &mut logger),
            Err(ConfigError::TournamentSizeOutOfRange {
                size: 61,
                population: 60
            })
        ));
    }

    #[test]
    fn test_cancellation_before_first_cycle() {
        let inst = had12();
        let mut logger = MemoryLogger::new();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = GeneticAlgorithm::new(&inst, config(SelectionMethod::Roulette), &mut logger)
            .unwrap()
            .run_with_cancel(1000, Some(cancel))
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.generations, 1);
        assert_eq!(logger.records.len(), 1);
        assert!(result.best.is_valid_permutation());
    }

    struct FailingLogger {
        accepted: usize,
    }

    impl GenerationLogger for FailingLogger {
        fn write_header(&mut self, _: &str, _: &GaConfig, _: usize) -> io::Result<()> {
            Ok(())
        }

        fn write_log(&mut self, _: &GenerationStats) -> io::Result<()> {
            if self.accepted == 0 {
                return Err(io::Error::other("disk full"));
            }
            self.accepted -= 1;
            Ok(())
        }

        fn write_line_separator(&mut self, _: usize) -> io::Result<()> {
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_logger_failure_aborts_run() {
        let inst = had12();
        let mut logger = FailingLogger { accepted: 3 };
        let err = GeneticAlgorithm::new(&inst, config(SelectionMethod::Roulette), &mut logger)
            .unwrap()
            .run(10)
            .unwrap_err();
        assert!(matches!(err, GaError::Log(_)));
        assert_eq!(logger.accepted, 0);
    }
}
