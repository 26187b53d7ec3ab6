//! Typed transformation matrices
//!
//! Runtime-sized matrices that map vectors from one space into another, with
//! the source and target spaces encoded as marker types.

use ::core::marker::PhantomData;
use nalgebra::{DMatrix, RealField, Scalar};

use super::spaces::{InputSpace, NoiseSpace, StateCovariance, StateSpace, Vector};
use crate::{Result, TrackError};

/// Fails with [`TrackError::DimensionMismatch`] unless `actual == expected`.
#[inline]
pub(crate) fn ensure_dim(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(TrackError::DimensionMismatch {
            what,
            expected,
            actual,
        })
    }
}

// ============================================================================
// Transform Matrix
// ============================================================================

/// A matrix that maps vectors from the `From` space into the `To` space.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Transform<T: Scalar, To, From> {
    inner: DMatrix<T>,
    _marker: PhantomData<(To, From)>,
}

impl<T: Scalar, To, From> Transform<T, To, From> {
    /// Creates a transform from a raw matrix.
    #[inline]
    pub fn from_matrix(inner: DMatrix<T>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying matrix.
    #[inline]
    pub fn as_matrix(&self) -> &DMatrix<T> {
        &self.inner
    }

    /// Consumes self and returns the underlying matrix.
    #[inline]
    pub fn into_matrix(self) -> DMatrix<T> {
        self.inner
    }

    /// `(rows, columns)` of the underlying matrix.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.inner.shape()
    }
}

impl<T: RealField + Copy, To, From> Transform<T, To, From> {
    /// Creates an all-zero transform.
    #[inline]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self::from_matrix(DMatrix::zeros(rows, cols))
    }

    /// Returns the transpose of this transform, mapping `To` back to `From`.
    #[inline]
    pub fn transpose(&self) -> Transform<T, From, To> {
        Transform::from_matrix(self.inner.transpose())
    }

    /// Applies the transform to a vector of the source space.
    ///
    /// Fails if the vector length differs from the number of columns.
    pub fn apply(&self, v: &Vector<T, From>, what: &'static str) -> Result<Vector<T, To>> {
        ensure_dim(what, self.inner.ncols(), v.len())?;
        Ok(Vector::from_dvector(&self.inner * v.as_dvector()))
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// Dynamics matrix A: StateSpace -> StateSpace
pub type DynamicsMatrix<T> = Transform<T, StateSpace, StateSpace>;

/// Process noise matrix B: NoiseSpace -> StateSpace
pub type NoiseMatrix<T> = Transform<T, StateSpace, NoiseSpace>;

/// Control input matrix C: InputSpace -> StateSpace
pub type InputMatrix<T> = Transform<T, StateSpace, InputSpace>;

// ============================================================================
// Specific Transform Applications
// ============================================================================

impl<T: RealField + Copy> DynamicsMatrix<T> {
    /// Creates an identity dynamics matrix.
    #[inline]
    pub fn identity(dim: usize) -> Self {
        Self::from_matrix(DMatrix::identity(dim, dim))
    }

    /// Propagates a covariance matrix: A * P * A^T
    pub fn propagate_covariance(&self, cov: &StateCovariance<T>) -> Result<StateCovariance<T>> {
        ensure_dim("state covariance", self.inner.ncols(), cov.dim())?;
        Ok(StateCovariance::from_matrix(
            &self.inner * cov.as_matrix() * self.inner.transpose(),
        ))
    }
}

impl<T: RealField + Copy> NoiseMatrix<T> {
    /// Covariance injected by a unit-variance noise sample: B * B^T
    #[inline]
    pub fn covariance(&self) -> StateCovariance<T> {
        StateCovariance::from_matrix(&self.inner * self.inner.transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::{NoiseVector, StateVector};

    #[test]
    fn test_dynamics_matrix_apply() {
        let a = DynamicsMatrix::<f64>::from_matrix(DMatrix::from_row_slice(
            2,
            2,
            &[1.0, 0.5, 0.0, 0.5],
        ));
        let state = StateVector::from_slice(&[2.0, 4.0]);
        let next = a.apply(&state, "state vector").unwrap();

        assert!((next.index(0) - 4.0).abs() < 1e-10);
        assert!((next.index(1) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_apply_rejects_wrong_length() {
        let b = NoiseMatrix::<f64>::zeros(4, 2);
        let noise = NoiseVector::zeros(3);
        let err = b.apply(&noise, "noise vector").unwrap_err();

        assert_eq!(
            err,
            TrackError::DimensionMismatch {
                what: "noise vector",
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_noise_covariance() {
        let b = NoiseMatrix::<f64>::from_matrix(DMatrix::from_row_slice(2, 1, &[2.0, 2.0]));
        let q = b.covariance();

        assert_eq!(q.dim(), 2);
        assert!((q.as_matrix()[(0, 0)] - 4.0).abs() < 1e-10);
        assert!((q.as_matrix()[(0, 1)] - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_propagate_covariance() {
        let a = DynamicsMatrix::<f64>::identity(3).transpose();
        let p = StateCovariance::identity(3).scale(2.0);
        let propagated = a.propagate_covariance(&p).unwrap();
        assert!((propagated.trace() - 6.0).abs() < 1e-10);

        let wrong = StateCovariance::identity(2);
        assert!(a.propagate_covariance(&wrong).is_err());
    }

    #[test]
    fn test_shape() {
        let c = InputMatrix::<f64>::zeros(12, 1);
        assert_eq!(c.shape(), (12, 1));
        assert_eq!(c.transpose().shape(), (1, 12));
    }
}
