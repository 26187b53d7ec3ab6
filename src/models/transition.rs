//! Linear state transition models
//!
//! Describes how the tracked state evolves between two predict steps:
//! x_{k+1} = A * x_k + B * w_k + C * u_k
//!
//! where:
//! - A is the dynamics matrix
//! - B maps a process noise sample w_k into state space
//! - C maps a control input u_k into state space

use alloc::sync::Arc;

use nalgebra::{DMatrix, RealField};

use crate::types::spaces::{InputVector, NoiseVector, StateCovariance, StateVector};
use crate::types::transforms::{ensure_dim, DynamicsMatrix, InputMatrix, NoiseMatrix};
use crate::Result;

/// Capability consumed by a filter's predict step.
///
/// Implementations are immutable once built and can be evaluated concurrently.
pub trait StateTransitionFunction<T: RealField>: Send + Sync {
    /// Dimension of the state vector.
    fn state_dim(&self) -> usize;

    /// Dimension of a process noise sample.
    fn noise_dim(&self) -> usize;

    /// Dimension of the control input.
    fn input_dim(&self) -> usize;

    /// Advances `state` by one step given a noise sample and a control input.
    ///
    /// Fails with [`crate::TrackError::DimensionMismatch`] if any operand has
    /// the wrong length.
    fn apply(
        &self,
        state: &StateVector<T>,
        noise: &NoiseVector<T>,
        input: &InputVector<T>,
    ) -> Result<StateVector<T>>;
}

/// Shared, read-only handle to a transition function.
pub type TransitionFunctionHandle<T> = Arc<dyn StateTransitionFunction<T>>;

/// Something that produces a transition function for the predict step.
pub trait TransitionFunctionBuilder<T: RealField> {
    /// Builds a new transition function.
    fn build(&self) -> TransitionFunctionHandle<T>;
}

// ============================================================================
// Linear Model
// ============================================================================

/// A linear-Gaussian transition model holding the matrices A, B and C.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearStateTransitionModel<T: RealField> {
    dynamics: DynamicsMatrix<T>,
    noise: NoiseMatrix<T>,
    input: InputMatrix<T>,
}

impl<T: RealField + Copy> LinearStateTransitionModel<T> {
    /// Creates a model of the given dimensions with all three matrices zero.
    pub fn new(state_dim: usize, noise_dim: usize, input_dim: usize) -> Self {
        Self {
            dynamics: DynamicsMatrix::zeros(state_dim, state_dim),
            noise: NoiseMatrix::zeros(state_dim, noise_dim),
            input: InputMatrix::zeros(state_dim, input_dim),
        }
    }

    /// Creates a model from raw matrices.
    ///
    /// Fails if A is not square, or B and C do not have as many rows as A.
    pub fn from_matrices(a: DMatrix<T>, b: DMatrix<T>, c: DMatrix<T>) -> Result<Self> {
        ensure_dim("dynamics matrix columns", a.nrows(), a.ncols())?;
        let mut model = Self::new(a.nrows(), b.ncols(), c.ncols());
        model.set_dynamics_matrix(a)?;
        model.set_noise_matrix(b)?;
        model.set_input_matrix(c)?;
        Ok(model)
    }

    /// Injects matrices whose shapes the caller has already derived from the
    /// model dimensions.
    pub(crate) fn with_matrices(
        dynamics: DynamicsMatrix<T>,
        noise: NoiseMatrix<T>,
        input: InputMatrix<T>,
    ) -> Self {
        debug_assert_eq!(dynamics.shape().0, dynamics.shape().1);
        debug_assert_eq!(noise.shape().0, dynamics.shape().0);
        debug_assert_eq!(input.shape().0, dynamics.shape().0);
        Self {
            dynamics,
            noise,
            input,
        }
    }

    #[inline]
    pub fn state_dim(&self) -> usize {
        self.dynamics.shape().0
    }

    #[inline]
    pub fn noise_dim(&self) -> usize {
        self.noise.shape().1
    }

    #[inline]
    pub fn input_dim(&self) -> usize {
        self.input.shape().1
    }

    /// Zero matrix shaped like A.
    pub fn create_dynamics_matrix(&self) -> DMatrix<T> {
        DMatrix::zeros(self.state_dim(), self.state_dim())
    }

    /// Zero matrix shaped like B.
    pub fn create_noise_matrix(&self) -> DMatrix<T> {
        DMatrix::zeros(self.state_dim(), self.noise_dim())
    }

    /// Zero matrix shaped like C.
    pub fn create_input_matrix(&self) -> DMatrix<T> {
        DMatrix::zeros(self.state_dim(), self.input_dim())
    }

    #[inline]
    pub fn dynamics_matrix(&self) -> &DynamicsMatrix<T> {
        &self.dynamics
    }

    #[inline]
    pub fn noise_matrix(&self) -> &NoiseMatrix<T> {
        &self.noise
    }

    #[inline]
    pub fn input_matrix(&self) -> &InputMatrix<T> {
        &self.input
    }

    /// Replaces A. Its shape must be `state_dim x state_dim`.
    pub fn set_dynamics_matrix(&mut self, a: DMatrix<T>) -> Result<()> {
        ensure_dim("dynamics matrix rows", self.state_dim(), a.nrows())?;
        ensure_dim("dynamics matrix columns", self.state_dim(), a.ncols())?;
        self.dynamics = DynamicsMatrix::from_matrix(a);
        Ok(())
    }

    /// Replaces B. Its shape must be `state_dim x noise_dim`.
    pub fn set_noise_matrix(&mut self, b: DMatrix<T>) -> Result<()> {
        ensure_dim("noise matrix rows", self.state_dim(), b.nrows())?;
        ensure_dim("noise matrix columns", self.noise_dim(), b.ncols())?;
        self.noise = NoiseMatrix::from_matrix(b);
        Ok(())
    }

    /// Replaces C. Its shape must be `state_dim x input_dim`.
    pub fn set_input_matrix(&mut self, c: DMatrix<T>) -> Result<()> {
        ensure_dim("input matrix rows", self.state_dim(), c.nrows())?;
        ensure_dim("input matrix columns", self.input_dim(), c.ncols())?;
        self.input = InputMatrix::from_matrix(c);
        Ok(())
    }

    /// Noise-free next state: A * x + C * u
    pub fn expected_state(
        &self,
        state: &StateVector<T>,
        input: &InputVector<T>,
    ) -> Result<StateVector<T>> {
        let propagated = self.dynamics.apply(state, "state vector")?;
        let control = self.input.apply(input, "input vector")?;
        Ok(propagated + control)
    }

    /// Process noise covariance for a unit-variance noise sample: B * B^T
    #[inline]
    pub fn noise_covariance(&self) -> StateCovariance<T> {
        self.noise.covariance()
    }

    /// Propagates a state covariance: A * P * A^T + B * B^T
    pub fn propagate_covariance(&self, cov: &StateCovariance<T>) -> Result<StateCovariance<T>> {
        let propagated = self.dynamics.propagate_covariance(cov)?;
        Ok(StateCovariance::from_matrix(
            propagated.into_matrix() + self.noise_covariance().into_matrix(),
        ))
    }
}

impl<T: RealField + Copy> StateTransitionFunction<T> for LinearStateTransitionModel<T> {
    fn state_dim(&self) -> usize {
        LinearStateTransitionModel::state_dim(self)
    }

    fn noise_dim(&self) -> usize {
        LinearStateTransitionModel::noise_dim(self)
    }

    fn input_dim(&self) -> usize {
        LinearStateTransitionModel::input_dim(self)
    }

    fn apply(
        &self,
        state: &StateVector<T>,
        noise: &NoiseVector<T>,
        input: &InputVector<T>,
    ) -> Result<StateVector<T>> {
        let expected = self.expected_state(state, input)?;
        let perturbation = self.noise.apply(noise, "noise vector")?;
        Ok(expected + perturbation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrackError;

    fn damped_model() -> LinearStateTransitionModel<f64> {
        // [p, v] with p' = p + 0.5 v, v' = 0.5 v
        LinearStateTransitionModel::from_matrices(
            DMatrix::from_row_slice(2, 2, &[1.0, 0.5, 0.0, 0.5]),
            DMatrix::from_row_slice(2, 1, &[0.1, 0.1]),
            DMatrix::zeros(2, 1),
        )
        .unwrap()
    }

    #[test]
    fn test_new_model_is_zero() {
        let model = LinearStateTransitionModel::<f64>::new(4, 2, 1);
        assert_eq!(model.state_dim(), 4);
        assert_eq!(model.noise_dim(), 2);
        assert_eq!(model.input_dim(), 1);
        assert!(model.dynamics_matrix().as_matrix().iter().all(|v| *v == 0.0));
        assert_eq!(model.create_noise_matrix().shape(), (4, 2));
    }

    #[test]
    fn test_apply_linear_model() {
        let model = damped_model();
        let state = StateVector::from_slice(&[1.0, 2.0]);
        let noise = NoiseVector::from_slice(&[1.0]);
        let input = InputVector::from_slice(&[5.0]);

        let next = model.apply(&state, &noise, &input).unwrap();
        assert!((next.index(0) - 2.1).abs() < 1e-10);
        assert!((next.index(1) - 1.1).abs() < 1e-10);
    }

    #[test]
    fn test_expected_state_ignores_noise() {
        let model = damped_model();
        let state = StateVector::from_slice(&[1.0, 2.0]);
        let input = InputVector::zeros(1);

        let mean = model.expected_state(&state, &input).unwrap();
        assert!((mean.index(0) - 2.0).abs() < 1e-10);
        assert!((mean.index(1) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_apply_rejects_mismatched_operands() {
        let model = damped_model();
        let state = StateVector::from_slice(&[1.0, 2.0, 3.0]);
        let noise = NoiseVector::zeros(1);
        let input = InputVector::zeros(1);

        let err = model.apply(&state, &noise, &input).unwrap_err();
        assert!(matches!(
            err,
            TrackError::DimensionMismatch {
                expected: 2,
                actual: 3,
                ..
            }
        ));

        let state = StateVector::zeros(2);
        let noise = NoiseVector::zeros(2);
        assert!(model.apply(&state, &noise, &input).is_err());
    }

    #[test]
    fn test_setters_check_shape() {
        let mut model = LinearStateTransitionModel::<f64>::new(4, 2, 1);
        assert!(model.set_dynamics_matrix(DMatrix::identity(3, 3)).is_err());
        assert!(model.set_noise_matrix(DMatrix::zeros(4, 3)).is_err());
        assert!(model.set_input_matrix(DMatrix::zeros(4, 2)).is_err());
        assert!(model.set_dynamics_matrix(DMatrix::identity(4, 4)).is_ok());
    }

    #[test]
    fn test_from_matrices_rejects_non_square_dynamics() {
        let result = LinearStateTransitionModel::<f64>::from_matrices(
            DMatrix::zeros(2, 3),
            DMatrix::zeros(2, 1),
            DMatrix::zeros(2, 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_propagate_covariance_adds_process_noise() {
        let model = damped_model();
        let p = StateCovariance::identity(2);
        let predicted = model.propagate_covariance(&p).unwrap();

        // A A^T = [[1.25, 0.25], [0.25, 0.25]], B B^T = 0.01 everywhere
        let m = predicted.as_matrix();
        assert!((m[(0, 0)] - 1.26).abs() < 1e-10);
        assert!((m[(0, 1)] - 0.26).abs() < 1e-10);
        assert!((m[(1, 1)] - 0.26).abs() < 1e-10);
    }

    #[test]
    fn test_handle_through_trait_object() {
        let handle: TransitionFunctionHandle<f64> = Arc::new(damped_model());
        assert_eq!(handle.state_dim(), 2);
        assert_eq!(handle.noise_dim(), 1);
        assert_eq!(handle.input_dim(), 1);
    }
}
