//! Gaussian predict step for linear transition models
//!
//! Propagates a mean and covariance through a [`LinearStateTransitionModel`]:
//! - x_pred = A * x + C * u
//! - P_pred = A * P * A^T + B * B^T
//!
//! The update step belongs to the observation model and is not part of this
//! crate.
//!
//! # Example
//!
//! ```
//! use rigidtrack::prelude::*;
//!
//! let params = ObjectTransitionParams::new(0.1, 0.2, 0.9, 1);
//! let model = ObjectTransitionModelBuilder::new(params).unwrap().build_model();
//!
//! let mean = StateVector::zeros(12);
//! let belief = GaussianBelief::with_identity_covariance(mean);
//! let input = InputVector::zeros(model.input_dim());
//!
//! let predicted = predict(&model, &belief, &input).unwrap();
//! assert_eq!(predicted.dim(), 12);
//! ```

use nalgebra::{DVector, RealField};

use crate::models::LinearStateTransitionModel;
use crate::types::layout::StateLayout;
use crate::types::spaces::{InputVector, StateCovariance, StateVector};
use crate::types::transforms::ensure_dim;
use crate::Result;

// ============================================================================
// Belief
// ============================================================================

/// Gaussian belief over the joint state of all tracked bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianBelief<T: RealField> {
    /// State estimate mean
    pub mean: StateVector<T>,
    /// State estimate covariance
    pub covariance: StateCovariance<T>,
}

impl<T: RealField + Copy> GaussianBelief<T> {
    /// Creates a belief, checking that the covariance matches the mean.
    pub fn new(mean: StateVector<T>, covariance: StateCovariance<T>) -> Result<Self> {
        ensure_dim("state covariance", mean.len(), covariance.dim())?;
        ensure_dim(
            "state covariance columns",
            mean.len(),
            covariance.as_matrix().ncols(),
        )?;
        Ok(Self { mean, covariance })
    }

    /// Creates a belief with identity covariance.
    pub fn with_identity_covariance(mean: StateVector<T>) -> Self {
        let covariance = StateCovariance::identity(mean.len());
        Self { mean, covariance }
    }

    /// Creates a belief with diagonal covariance.
    pub fn with_diagonal_covariance(mean: StateVector<T>, diagonal: &DVector<T>) -> Result<Self> {
        ensure_dim("covariance diagonal", mean.len(), diagonal.len())?;
        let covariance = StateCovariance::from_diagonal(diagonal);
        Ok(Self { mean, covariance })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Returns the trace of the covariance matrix (sum of variances).
    #[inline]
    pub fn uncertainty(&self) -> T {
        self.covariance.trace()
    }

    /// Pose of body `part`: translation then orientation.
    ///
    /// # Panics
    /// Panics if `part` is not in `layout` or the layout does not fit the belief.
    pub fn pose(&self, layout: &StateLayout, part: usize) -> [T; 6] {
        let mut pose = [T::zero(); 6];
        for (p, i) in pose.iter_mut().zip(layout.pose_range(part)) {
            *p = *self.mean.index(i);
        }
        pose
    }

    /// Velocity of body `part`: linear then angular.
    ///
    /// # Panics
    /// Panics if `part` is not in `layout` or the layout does not fit the belief.
    pub fn velocity(&self, layout: &StateLayout, part: usize) -> [T; 6] {
        let mut velocity = [T::zero(); 6];
        for (v, i) in velocity.iter_mut().zip(layout.velocity_range(part)) {
            *v = *self.mean.index(i);
        }
        velocity
    }
}

// ============================================================================
// Predict
// ============================================================================

/// Performs the prediction step.
///
/// Fails if the belief or `input` do not match the model dimensions.
pub fn predict<T: RealField + Copy>(
    model: &LinearStateTransitionModel<T>,
    belief: &GaussianBelief<T>,
    input: &InputVector<T>,
) -> Result<GaussianBelief<T>> {
    let mean = model.expected_state(&belief.mean, input)?;
    let covariance = model.propagate_covariance(&belief.covariance)?;
    Ok(GaussianBelief { mean, covariance })
}
