//! QAP objective function.
//!
//! `cost(p) = Σ_{i≠j} flow[i][j] · distance[p[i]-1][p[j]-1]`
//!
//! Specimens hold 1-based location numbers, matrices are 0-indexed.
//! Evaluation is O(n²) and pure, so populations can be scored in parallel.

use super::instance::QapInstance;
use super::matrix::Matrix;
use crate::ga::{Cost, FitnessEvaluator};

/// Computes the QAP cost of assigning facility `i` to location
/// `specimen[i]` for every `i`.
///
/// Cannot overflow for matrices accepted by [`QapInstance::new`], which
/// bounds the worst-case cost.
///
/// # Panics
/// Panics if `specimen.len()` differs from the matrix size or a location
/// is outside `1..=n`.
pub fn evaluate(specimen: &[usize], flow: &Matrix, distance: &Matrix) -> Cost {
    let n = flow.size();
    assert_eq!(specimen.len(), n, "specimen length must equal instance size");
    assert_eq!(distance.size(), n, "flow and distance must have equal size");

    let mut total: Cost = 0;
    for (i, &loc_i) in specimen.iter().enumerate() {
        let flows = flow.row(i);
        let distances = distance.row(loc_i - 1);
        for (j, &loc_j) in specimen.iter().enumerate() {
            if i != j {
                total += flows[j] * distances[loc_j - 1];
            }
        }
    }
    total
}

impl FitnessEvaluator for QapInstance {
    fn evaluate(&self, specimen: &[usize]) -> Cost {
        evaluate(specimen, self.flow(), self.distance())
    }
}
