//! Vector space markers and typed vectors
//!
//! Runtime-sized vectors tagged with the space they live in, so that a noise
//! sample can never be passed where a state is expected.

use alloc::vec::Vec;
use ::core::marker::PhantomData;
use ::core::ops::{Add, Mul, Neg, Sub};
use nalgebra::{DMatrix, DVector, RealField, Scalar};

// ============================================================================
// Vector Space Markers
// ============================================================================

/// Marker type for state space vectors (pose and velocity of every body)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace;

/// Marker type for process noise samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseSpace;

/// Marker type for control inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpace;

// ============================================================================
// Typed Vector
// ============================================================================

/// A runtime-sized vector bound to a mathematical space.
///
/// # Type Parameters
///
/// - `T`: The scalar type (typically `f64`)
/// - `Space`: A marker type indicating which space this vector belongs to
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Scalar, Space> {
    inner: DVector<T>,
    _marker: PhantomData<Space>,
}

impl<T: Scalar, Space> Vector<T, Space> {
    /// Creates a vector that takes ownership of `data`.
    #[inline]
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            inner: DVector::from_vec(data),
            _marker: PhantomData,
        }
    }

    /// Creates a vector by copying a slice.
    #[inline]
    pub fn from_slice(data: &[T]) -> Self {
        Self {
            inner: DVector::from_vec(data.to_vec()),
            _marker: PhantomData,
        }
    }

    /// Creates a new vector from an nalgebra DVector.
    #[inline]
    pub fn from_dvector(inner: DVector<T>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying nalgebra vector.
    #[inline]
    pub fn as_dvector(&self) -> &DVector<T> {
        &self.inner
    }

    /// Consumes self and returns the underlying nalgebra vector.
    #[inline]
    pub fn into_dvector(self) -> DVector<T> {
        self.inner
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Access element at index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.inner.get(index)
    }

    /// Access element at index (unchecked).
    ///
    /// # Panics
    /// Panics if index is out of bounds.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, index: usize) -> &T {
        &self.inner[index]
    }
}

impl<T: RealField + Copy, Space> Vector<T, Space> {
    /// Creates a zero vector of length `len`.
    #[inline]
    pub fn zeros(len: usize) -> Self {
        Self {
            inner: DVector::zeros(len),
            _marker: PhantomData,
        }
    }

    /// Computes the Euclidean norm.
    #[inline]
    pub fn norm(&self) -> T {
        self.inner.norm()
    }

    /// Scales the vector by a scalar.
    #[inline]
    pub fn scale(&self, s: T) -> Self {
        Self {
            inner: self.inner.scale(s),
            _marker: PhantomData,
        }
    }
}

// ============================================================================
// Type Aliases
// ============================================================================

/// A state vector: 12 entries per tracked body.
pub type StateVector<T> = Vector<T, StateSpace>;

/// A process noise sample: 6 entries per tracked body.
pub type NoiseVector<T> = Vector<T, NoiseSpace>;

/// A control input vector.
pub type InputVector<T> = Vector<T, InputSpace>;

// ============================================================================
// Operations: Same-Space Arithmetic
// ============================================================================
//
// Lengths are only known at runtime; mismatched operands panic inside nalgebra.

impl<T: RealField + Copy, Space> Add for Vector<T, Space> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner + rhs.inner,
            _marker: PhantomData,
        }
    }
}

impl<T: RealField + Copy, Space> Sub for Vector<T, Space> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            inner: self.inner - rhs.inner,
            _marker: PhantomData,
        }
    }
}

impl<T: RealField + Copy, Space> Neg for Vector<T, Space> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self {
            inner: -self.inner,
            _marker: PhantomData,
        }
    }
}

impl<T: RealField + Copy, Space> Mul<T> for Vector<T, Space> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: T) -> Self::Output {
        Self {
            inner: self.inner * rhs,
            _marker: PhantomData,
        }
    }
}

// ============================================================================
// Covariance Matrix
// ============================================================================

/// A square covariance matrix bound to a specific vector space.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance<T: Scalar, Space> {
    inner: DMatrix<T>,
    _marker: PhantomData<Space>,
}

impl<T: Scalar, Space> Covariance<T, Space> {
    /// Creates a covariance matrix from a raw matrix.
    ///
    /// # Safety (logical)
    /// The caller should ensure the matrix is square, symmetric and positive semi-definite.
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

    /// Number of rows (and columns).
    #[inline]
    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }
}

impl<T: RealField + Copy, Space> Covariance<T, Space> {
    /// Creates a zero covariance matrix.
    #[inline]
    pub fn zeros(dim: usize) -> Self {
        Self::from_matrix(DMatrix::zeros(dim, dim))
    }

    /// Creates an identity covariance matrix.
    #[inline]
    pub fn identity(dim: usize) -> Self {
        Self::from_matrix(DMatrix::identity(dim, dim))
    }

    /// Creates a diagonal covariance matrix.
    #[inline]
    pub fn from_diagonal(diag: &DVector<T>) -> Self {
        Self::from_matrix(DMatrix::from_diagonal(diag))
    }

    /// Scales the covariance matrix.
    #[inline]
    pub fn scale(&self, s: T) -> Self {
        Self::from_matrix(self.inner.scale(s))
    }

    /// Computes the trace of the covariance matrix.
    #[inline]
    pub fn trace(&self) -> T {
        self.inner.trace()
    }

    /// Computes the Cholesky decomposition (lower triangular).
    ///
    /// Returns `None` if the matrix is not positive definite.
    #[inline]
    pub fn cholesky(&self) -> Option<DMatrix<T>> {
        nalgebra::Cholesky::new(self.inner.clone()).map(|c| c.l())
    }
}

/// Covariance matrix in state space.
pub type StateCovariance<T> = Covariance<T, StateSpace>;
