//! QAP problem instances and the instance file reader.
//!
//! # File format
//!
//! ```text
//! n
//!
//! n lines of n integers   (flow matrix)
//!
//! n lines of n integers   (distance matrix)
//! ```
//!
//! Blank separator lines are optional; the reader consumes whitespace
//! separated integers and only checks that exactly `2 * n * n` values
//! follow the size.

use super::matrix::Matrix;
use crate::error::InstanceError;
use crate::ga::Cost;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// A Quadratic Assignment Problem instance: `n` facilities, `n` locations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QapInstance {
    name: String,
    flow: Matrix,
    distance: Matrix,
}

impl QapInstance {
    /// Creates an instance from its flow and distance matrices.
    pub fn new(
        name: impl Into<String>,
        flow: Matrix,
        distance: Matrix,
    ) -> Result<Self, InstanceError> {
        if flow.size() != distance.size() {
            return Err(InstanceError::DimensionMismatch {
                flow: flow.size(),
                distance: distance.size(),
            });
        }
        if flow.size() == 0 {
            return Err(InstanceError::Empty);
        }
        check_cost_range(flow.size(), &flow, &distance)?;
        Ok(Self {
            name: name.into(),
            flow,
            distance,
        })
    }

    /// Parses an instance from text.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, InstanceError> {
        let mut tokens = text.split_whitespace().enumerate();

        let n = match tokens.next() {
            Some((position, token)) => {
                token
                    .parse::<usize>()
                    .map_err(|_| InstanceError::InvalidToken {
                        token: token.to_string(),
                        position,
                    })?
            }
            None => return Err(InstanceError::Empty),
        };
        if n == 0 {
            return Err(InstanceError::Empty);
        }

        let expected = 2 * n * n;
        let mut values = Vec::with_capacity(expected);
        for (position, token) in tokens {
            let v = token
                .parse::<i64>()
                .map_err(|_| InstanceError::InvalidToken {
                    token: token.to_string(),
                    position,
                })?;
            values.push(v);
        }

        if values.len() < expected {
            return Err(InstanceError::Truncated {
                expected,
                found: values.len(),
            });
        }
        if values.len() > expected {
            return Err(InstanceError::TrailingData {
                extra: values.len() - expected,
            });
        }

        let distance = values.split_off(n * n);
        let flow = Matrix::from_row_major(n, values)?;
        let distance = Matrix::from_row_major(n, distance)?;
        Self::new(name, flow, distance)
    }

    /// Reads an instance from any reader.
    pub fn from_reader<R: Read>(
        name: impl Into<String>,
        mut reader: R,
    ) -> Result<Self, InstanceError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::parse(name, &text)
    }

    /// Reads an instance file. The instance is named after the file stem.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, InstanceError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let file = File::open(path)?;
        let instance = Self::from_reader(name, file)?;
        tracing::debug!(
            instance = %instance.name,
            n = instance.size(),
            "loaded QAP instance"
        );
        Ok(instance)
    }

    /// Instance name (file stem when loaded from disk).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of facilities (and locations).
    pub fn size(&self) -> usize {
        self.flow.size()
    }

    /// Facility-to-facility flow.
    pub fn flow(&self) -> &Matrix {
        &self.flow
    }

    /// Location-to-location distance.
    pub fn distance(&self) -> &Matrix {
        &self.distance
    }
}

/// Largest admissible `|cost|`. Half of `Cost::MAX` leaves room for
/// differences of two costs, as used by roulette weights.
const COST_LIMIT: u128 = (Cost::MAX / 2) as u128;

/// Rejects matrices whose worst-case cost `n(n-1) · max|flow| · max|distance|`
/// exceeds [`COST_LIMIT`], so evaluation never overflows.
fn check_cost_range(n: usize, flow: &Matrix, distance: &Matrix) -> Result<(), InstanceError> {
    let max_flow = flow.max_abs();
    let max_distance = distance.max_abs();
    let pairs = (n as u128) * (n as u128 - 1);
    let bound = pairs
        .checked_mul(u128::from(max_flow))
        .and_then(|b| b.checked_mul(u128::from(max_distance)));
    match bound {
        Some(b) if b <= COST_LIMIT => Ok(()),
        _ => Err(InstanceError::CostOverflow {
            n,
            max_flow,
            max_distance,
        }),
    }
}
