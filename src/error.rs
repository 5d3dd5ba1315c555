//! Error types.
//!
//! Configuration problems are reported at construction time, instance
//! problems at load time, and logging failures abort a run. Broken
//! permutation invariants are bugs and panic instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid engine configuration. Raised before any generation runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("population_size must be at least 1, got {0}")]
    PopulationTooSmall(usize),

    #[error("{name} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { name: &'static str, value: f64 },

    #[error("tournament_size must be within [1, {population}], got {size}")]
    TournamentSizeOutOfRange { size: usize, population: usize },

    #[error("unknown selection method `{0}` (expected `tournament` or `roulette`)")]
    UnknownSelection(String),

    #[error("generation count must be at least 1")]
    NoGenerations,

    #[error("instance has no locations")]
    EmptyInstance,
}

/// Failure while reading a problem instance.
#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance: {0}")]
    Io(#[from] io::Error),

    #[error("invalid integer `{token}` at token {position}")]
    InvalidToken { token: String, position: usize },

    #[error("instance truncated: expected {expected} matrix entries, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error("instance has {extra} trailing values after both matrices")]
    TrailingData { extra: usize },

    #[error("matrix dimensions disagree: flow is {flow}x{flow}, distance is {distance}x{distance}")]
    DimensionMismatch { flow: usize, distance: usize },

    #[error("matrix with {len} entries is not {n}x{n}")]
    NotSquare { n: usize, len: usize },

    #[error("instance size must be at least 1")]
    Empty,

    #[error(
        "entries too large: {n}x{n} instance with |flow| <= {max_flow} and \
         |distance| <= {max_distance} can overflow the cost"
    )]
    CostOverflow {
        n: usize,
        max_flow: u64,
        max_distance: u64,
    },
}

/// Failure during a GA run.
#[derive(Debug, Error)]
pub enum GaError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("generation logger failed: {0}")]
    Log(#[from] io::Error),
}

/// Failure in a batch of runs.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("instance {}: {source}", .path.display())]
    Instance {
        path: PathBuf,
        #[source]
        source: InstanceError,
    },

    #[error(transparent)]
    Run(#[from] GaError),

    #[error("generation log {}: {source}", .path.display())]
    Log {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
