//! Dense square integer matrix.

use crate::error::InstanceError;

/// Row-major `n x n` matrix of integer weights.
///
/// Used for both the flow and the distance matrix of a QAP instance.
/// Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    n: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Builds a matrix from row-major data.
    ///
    /// Fails if `data.len() != n * n`.
    pub fn from_row_major(n: usize, data: Vec<i64>) -> Result<Self, InstanceError> {
        if data.len() != n * n {
            return Err(InstanceError::NotSquare { n, len: data.len() });
        }
        Ok(Self { n, data })
    }

    /// Builds a matrix from nested rows.
    pub fn from_rows(rows: &[Vec<i64>]) -> Result<Self, InstanceError> {
        let n = rows.len();
        let data: Vec<i64> = rows.iter().flatten().copied().collect();
        if rows.iter().any(|r| r.len() != n) {
            return Err(InstanceError::NotSquare { n, len: data.len() });
        }
        Self::from_row_major(n, data)
    }

    /// Side length.
    pub fn size(&self) -> usize {
        self.n
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[i64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Entry at `(i, j)`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i64 {
        self.data[i * self.n + j]
    }

    /// Largest absolute entry.
    pub fn max_abs(&self) -> u64 {
        self.data.iter().map(|v| v.unsigned_abs()).max().unwrap_or(0)
    }

    /// Whether `m[i][j] == m[j][i]` for all pairs.
    pub fn is_symmetric(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }
}
