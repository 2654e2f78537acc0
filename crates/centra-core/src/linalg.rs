//! Dense vector/matrix helpers and power iteration over `nalgebra`.
//!
//! # Overview
//!
//! The centrality engine needs a handful of primitives: dot products,
//! row/column extraction, matrix construction from an entry function,
//! Euclidean magnitude and distance, and matrix multiplication. `nalgebra`
//! does the arithmetic; this module adds the shape checks so a mismatch
//! surfaces as [`LinalgError::Shape`] instead of a panic.
//!
//! # Power iteration
//!
//! [`find_dominant_eigenvector`] starts from the all-ones vector and
//! repeatedly applies `A`, rescaling the result to unit length:
//!
//! ```text
//! r      = A · guess
//! λ      = ‖r‖
//! next   = r / λ
//! stop when ‖guess − next‖ < tolerance
//! ```
//!
//! There is no iteration cap unless one is requested through
//! [`PowerIteration::max_iter`]. Adjacency matrices of bipartite graphs can
//! make the iterate oscillate between two vectors forever, so callers that
//! accept arbitrary input should set a cap.

#![allow(clippy::module_name_repetitions)]

use nalgebra::{DMatrix, DVector};
use tracing::{debug, instrument, trace, warn};

use crate::error::ErrorCode;

/// Dense `f64` matrix.
pub type Matrix = DMatrix<f64>;
/// Dense `f64` column vector.
pub type Vector = DVector<f64>;

/// Default convergence threshold for power iteration.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// Linear-algebra failure.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinalgError {
    #[error("incompatible shapes for {op}: {left:?} and {right:?}")]
    Shape {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("power iteration did not converge within {iterations} iterations (last step {last_step:.3e})")]
    NotConverged { iterations: usize, last_step: f64 },

    #[error("power iteration collapsed to a zero vector at iteration {iterations}")]
    Degenerate { iterations: usize },
}

impl LinalgError {
    /// Stable error code for this failure.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Shape { .. } => ErrorCode::ShapeMismatch,
            Self::NotConverged { .. } => ErrorCode::NotConverged,
            Self::Degenerate { .. } => ErrorCode::DegenerateIteration,
        }
    }
}

// ---------------------------------------------------------------------------
// Vector primitives
// ---------------------------------------------------------------------------

/// Sum of component-wise products.
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] when the lengths differ.
pub fn dot(a: &Vector, b: &Vector) -> Result<f64, LinalgError> {
    same_length("dot", a, b)?;
    Ok(a.dot(b))
}

/// Multiply every component by `c`.
#[must_use]
pub fn scalar_multiply(c: f64, v: &Vector) -> Vector {
    v * c
}

/// Euclidean length.
#[must_use]
pub fn magnitude(v: &Vector) -> f64 {
    v.norm()
}

/// Euclidean distance between two vectors.
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] when the lengths differ.
pub fn distance(a: &Vector, b: &Vector) -> Result<f64, LinalgError> {
    same_length("distance", a, b)?;
    Ok((a - b).norm())
}

fn same_length(op: &'static str, a: &Vector, b: &Vector) -> Result<(), LinalgError> {
    if a.len() == b.len() {
        Ok(())
    } else {
        Err(LinalgError::Shape {
            op,
            left: a.shape(),
            right: b.shape(),
        })
    }
}

// ---------------------------------------------------------------------------
// Matrix primitives
// ---------------------------------------------------------------------------

/// Build a `rows × cols` matrix whose `(i, j)` entry is `entry_fn(i, j)`.
pub fn make_matrix(rows: usize, cols: usize, entry_fn: impl FnMut(usize, usize) -> f64) -> Matrix {
    Matrix::from_fn(rows, cols, entry_fn)
}

/// `(rows, cols)`.
#[must_use]
pub fn shape(m: &Matrix) -> (usize, usize) {
    m.shape()
}

/// Row `i` as a column vector, or `None` when out of range.
#[must_use]
pub fn get_row(m: &Matrix, i: usize) -> Option<Vector> {
    (i < m.nrows()).then(|| m.row(i).transpose())
}

/// Column `j`, or `None` when out of range.
#[must_use]
pub fn get_column(m: &Matrix, j: usize) -> Option<Vector> {
    (j < m.ncols()).then(|| m.column(j).into_owned())
}

/// Standard matrix product `A · B`.
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] when `A`'s column count differs from
/// `B`'s row count.
pub fn matrix_multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, LinalgError> {
    if a.ncols() != b.nrows() {
        return Err(LinalgError::Shape {
            op: "matrix multiply",
            left: a.shape(),
            right: b.shape(),
        });
    }
    Ok(a * b)
}

/// View `v` as an `n × 1` matrix.
#[must_use]
pub fn vector_as_matrix(v: &Vector) -> Matrix {
    Matrix::from_column_slice(v.len(), 1, v.as_slice())
}

/// Collapse an `n × 1` matrix into a vector.
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] unless the matrix has exactly one column.
pub fn vector_from_matrix(m: &Matrix) -> Result<Vector, LinalgError> {
    if m.ncols() != 1 {
        return Err(LinalgError::Shape {
            op: "vector from matrix",
            left: m.shape(),
            right: (m.nrows(), 1),
        });
    }
    Ok(m.column(0).into_owned())
}

/// Apply `A` to `v` (`A · v` via the `n × 1` matrix form).
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] when `A`'s column count differs from `v`'s
/// length.
pub fn matrix_operate(a: &Matrix, v: &Vector) -> Result<Vector, LinalgError> {
    let product = matrix_multiply(a, &vector_as_matrix(v))?;
    vector_from_matrix(&product)
}

// ---------------------------------------------------------------------------
// Power iteration
// ---------------------------------------------------------------------------

/// Iteration count at which an uncapped run logs a warning.
pub const UNCAPPED_WARN_AFTER: usize = 100_000;

/// Power-iteration settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerIteration {
    /// Stop when successive normalised vectors are closer than this.
    pub tolerance: f64,
    /// Optional iteration cap. `None` iterates until the tolerance test passes.
    pub max_iter: Option<usize>,
}

impl Default for PowerIteration {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iter: None,
        }
    }
}

impl PowerIteration {
    /// True exactly once per uncapped run, at [`UNCAPPED_WARN_AFTER`].
    const fn warns_at(&self, iterations: usize) -> bool {
        self.max_iter.is_none() && iterations == UNCAPPED_WARN_AFTER
    }
}

/// Converged power-iteration result.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenpair {
    /// Unit-length dominant eigenvector estimate.
    pub vector: Vector,
    /// Magnitude of `A · guess` at the final step (eigenvalue estimate).
    pub eigenvalue: f64,
    /// Number of matrix applications performed.
    pub iterations: usize,
}

/// Dominant eigenvector of `a` by uncapped power iteration.
///
/// # Errors
///
/// Returns [`LinalgError::Shape`] for a non-square matrix and
/// [`LinalgError::Degenerate`] when an iterate has zero length.
pub fn find_dominant_eigenvector(a: &Matrix, tolerance: f64) -> Result<Eigenpair, LinalgError> {
    find_dominant_eigenvector_with(
        a,
        &PowerIteration {
            tolerance,
            max_iter: None,
        },
    )
}

/// Dominant eigenvector of `a` with explicit settings.
///
/// # Errors
///
/// As [`find_dominant_eigenvector`], plus [`LinalgError::NotConverged`] when
/// `settings.max_iter` is reached first.
#[instrument(skip(a), fields(n = a.nrows()))]
pub fn find_dominant_eigenvector_with(
    a: &Matrix,
    settings: &PowerIteration,
) -> Result<Eigenpair, LinalgError> {
    if !a.is_square() {
        return Err(LinalgError::Shape {
            op: "power iteration",
            left: a.shape(),
            right: (a.ncols(), 1),
        });
    }

    let n = a.nrows();
    if n == 0 {
        return Ok(Eigenpair {
            vector: Vector::zeros(0),
            eigenvalue: 0.0,
            iterations: 0,
        });
    }

    let mut guess = Vector::from_element(n, 1.0);
    let mut iterations = 0;

    loop {
        iterations += 1;

        let result = matrix_operate(a, &guess)?;
        let length = magnitude(&result);
        if length == 0.0 || !length.is_finite() {
            return Err(LinalgError::Degenerate { iterations });
        }

        let next = scalar_multiply(1.0 / length, &result);
        let step = distance(&guess, &next)?;
        trace!(iterations, length, step, "power iteration step");

        if step < settings.tolerance {
            debug!(iterations, eigenvalue = length, "power iteration converged");
            return Ok(Eigenpair {
                vector: next,
                eigenvalue: length,
                iterations,
            });
        }

        if settings.warns_at(iterations) {
            warn!(
                iterations,
                last_step = step,
                "power iteration still running without a cap; set --max-iter or eigenvector.max_iter to bound it"
            );
        }

        if settings.max_iter.is_some_and(|cap| iterations >= cap) {
            return Err(LinalgError::NotConverged {
                iterations,
                last_step: step,
            });
        }

        guess = next;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
