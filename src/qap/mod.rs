//! Quadratic Assignment Problem model.
//!
//! - [`Matrix`]: dense integer flow/distance matrix
//! - [`QapInstance`]: a problem instance plus the instance file reader
//! - [`evaluate`]: the QAP objective (also available as
//!   [`FitnessEvaluator`](crate::ga::FitnessEvaluator) on [`QapInstance`])

mod evaluator;
mod instance;
mod matrix;

pub use evaluator::evaluate;
pub use instance::QapInstance;
pub use matrix::Matrix;
