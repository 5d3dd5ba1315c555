//! Genetic algorithm for the Quadratic Assignment Problem (QAP).
//!
//! Given `n` facilities, `n` locations, a flow matrix and a distance matrix,
//! searches for the assignment of facilities to locations that minimizes
//! total flow × distance.
//!
//! - [`qap`]: Problem instances, the instance file reader and the objective
//! - [`ga`]: Specimens, selection, crossover with repair, mutation and the
//!   generational engine
//! - [`logger`]: Per-generation metric sinks (CSV file, in-memory)
//! - [`driver`]: Batch runs over several instance files
//!
//! # Example
//!
//! ```no_run
//! use qap_ga::ga::{GaConfig, GeneticAlgorithm, SelectionMethod};
//! use qap_ga::logger::CsvLogger;
//! use qap_ga::qap::QapInstance;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let instance = QapInstance::from_path("data/had12.dat")?;
//! let mut logger = CsvLogger::create("out/ga_result_had12.csv")?;
//! let config = GaConfig::default()
//!     .with_selection(SelectionMethod::Tournament)
//!     .with_seed(42);
//!
//! let result = GeneticAlgorithm::new(&instance, config, &mut logger)?.run(100)?;
//! println!("best {} = {:?}", result.best_fitness, result.best.genes());
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod error;
pub mod ga;
pub mod logger;
pub mod qap;
pub mod random;

pub use error::{BatchError, ConfigError, GaError, InstanceError};
