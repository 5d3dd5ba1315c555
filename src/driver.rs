//! Batch execution over instance files.
//!
//! For every instance file: load it, open `ga_result_<name>.csv` in the
//! output directory, write the header, run the GA `runs_per_instance` times
//! (runs separated by an empty line) and close the log.

use crate::error::{BatchError, ConfigError};
use crate::ga::{Cost, GaConfig, GaResult, GeneticAlgorithm};
use crate::logger::{CsvLogger, GenerationLogger};
use crate::qap::QapInstance;
use std::path::{Path, PathBuf};

/// Parameters of a batch.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Instance files, processed in order.
    pub instances: Vec<PathBuf>,

    /// Independent runs per instance.
    pub runs_per_instance: usize,

    /// Generations per run.
    pub generations: usize,

    /// GA parameters shared by every run.
    ///
    /// With a seed, run `i` uses `seed + i`, so runs differ but the whole
    /// batch is reproducible.
    pub ga: GaConfig,

    /// Directory receiving one CSV log per instance.
    pub output_dir: PathBuf,
}

/// Results for one instance.
#[derive(Debug, Clone)]
pub struct InstanceOutcome {
    pub instance: String,
    pub log_path: PathBuf,
    pub runs: Vec<GaResult>,
}

impl InstanceOutcome {
    /// The run with the lowest best cost.
    pub fn best(&self) -> Option<&GaResult> {
        self.runs.iter().min_by_key(|r| r.best_fitness)
    }

    /// Mean of the per-run best costs.
    pub fn mean_best(&self) -> Option<f64> {
        if self.runs.is_empty() {
            return None;
        }
        let total: Cost = self.runs.iter().map(|r| r.best_fitness).sum();
        Some(total as f64 / self.runs.len() as f64)
    }
}

/// Runs the whole batch, stopping at the first error.
pub fn run_batch(batch: &BatchConfig) -> Result<Vec<InstanceOutcome>, BatchError> {
    batch.ga.validate()?;
    if batch.generations == 0 {
        return Err(ConfigError::NoGenerations.into());
    }

    batch
        .instances
        .iter()
        .map(|path| run_instance(batch, path))
        .collect()
}

fn run_instance(batch: &BatchConfig, path: &Path) -> Result<InstanceOutcome, BatchError> {
    let instance = QapInstance::from_path(path).map_err(|source| BatchError::Instance {
        path: path.to_path_buf(),
        source,
    })?;

    let log_path = batch
        .output_dir
        .join(format!("ga_result_{}.csv", instance.name()));
    let log_err = |source| BatchError::Log {
        path: log_path.clone(),
        source,
    };

    let mut logger = CsvLogger::create(&log_path).map_err(log_err)?;
    logger
        .write_header(instance.name(), &batch.ga, batch.generations)
        .map_err(log_err)?;

    let mut runs = Vec::with_capacity(batch.runs_per_instance);
    for run in 0..batch.runs_per_instance {
        if run > 0 {
            logger.write_line_separator(1).map_err(log_err)?;
        }
        let config = match batch.ga.seed {
            Some(seed) => batch.ga.clone().with_seed(seed.wrapping_add(run as u64)),
            None => batch.ga.clone(),
        };
        let result = GeneticAlgorithm::new(&instance, config, &mut logger)?.run(batch.generations)?;
        tracing::info!(
            instance = instance.name(),
            run = run + 1,
            best_fitness = result.best_fitness,
            "run complete"
        );
        runs.push(result);
    }
    logger.close().map_err(log_err)?;

    let outcome = InstanceOutcome {
        instance: instance.name().to_string(),
        log_path,
        runs,
    };
    if let Some(best) = outcome.best() {
        tracing::info!(
            instance = %outcome.instance,
            best_fitness = best.best_fitness,
            best = ?best.best.genes(),
            "instance complete"
        );
    }
    Ok(outcome)
}
