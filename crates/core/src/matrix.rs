//! Row-major `n_paths × n_steps` matrix of per-path observations.
//!
//! Rows are independent sample paths, columns are time steps. The shape is
//! fixed when the matrix is built; only cell values may change afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{MartingaleError, Result};

/// Dense matrix of path observations stored row by row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix<T> {
    n_paths: usize,
    n_steps: usize,
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    /// Creates a matrix filled with `T::default()`.
    #[must_use]
    pub fn zeros(n_paths: usize, n_steps: usize) -> Self {
        Self {
            n_paths,
            n_steps,
            data: vec![T::default(); n_paths * n_steps],
        }
    }
}

impl<T: Copy> Matrix<T> {
    /// Builds a matrix from one vector per path.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n_paths = rows.len();
        let n_steps = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_paths * n_steps);

        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_steps {
                return Err(MartingaleError::InvalidArgument(format!(
                    "path {i} has {} steps, expected {n_steps}",
                    row.len()
                )));
            }
            data.extend(row);
        }

        Ok(Self {
            n_paths,
            n_steps,
            data,
        })
    }

    /// Builds a matrix by evaluating `f(path, step)` for every cell.
    pub fn from_fn(n_paths: usize, n_steps: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(n_paths * n_steps);
        for i in 0..n_paths {
            for t in 0..n_steps {
                data.push(f(i, t));
            }
        }
        Self {
            n_paths,
            n_steps,
            data,
        }
    }

    /// Number of paths (rows).
    #[must_use]
    pub fn n_paths(&self) -> usize {
        self.n_paths
    }

    /// Number of time steps (columns).
    #[must_use]
    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// `(n_paths, n_steps)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_paths, self.n_steps)
    }

    /// Returns the value of path `i` at step `t`, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, i: usize, t: usize) -> Option<T> {
        if i < self.n_paths && t < self.n_steps {
            Some(self.data[i * self.n_steps + t])
        } else {
            None
        }
    }

    /// Overwrites the value of path `i` at step `t`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, t)` is outside the matrix.
    pub fn set(&mut self, i: usize, t: usize, value: T) {
        assert!(
            i < self.n_paths && t < self.n_steps,
            "index ({i}, {t}) out of bounds for shape ({}, {})",
            self.n_paths,
            self.n_steps
        );
        self.data[i * self.n_steps + t] = value;
    }

    /// Full time series of path `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_paths`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.n_steps;
        &self.data[start..start + self.n_steps]
    }

    /// Mutable time series of path `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= n_paths`.
    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let start = i * self.n_steps;
        &mut self.data[start..start + self.n_steps]
    }

    /// Iterates over paths in index order.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.n_paths).map(move |i| self.row(i))
    }

    /// Cross-section of every path at step `t`.
    ///
    /// # Panics
    ///
    /// Panics if `t >= n_steps`.
    #[must_use]
    pub fn column(&self, t: usize) -> Vec<T> {
        assert!(t < self.n_steps, "step {t} out of bounds for {} steps", self.n_steps);
        self.rows().map(|row| row[t]).collect()
    }

    /// Applies `f` to every cell, preserving shape.
    #[must_use]
    pub fn map<U>(&self, f: impl FnMut(T) -> U) -> Matrix<U> {
        Matrix {
            n_paths: self.n_paths,
            n_steps: self.n_steps,
            data: self.data.iter().copied().map(f).collect(),
        }
    }

    /// Copies the matrix out as one vector per path.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.rows().map(<[T]>::to_vec).collect()
    }
}
