//! Damped constant-velocity process model for free-floating rigid bodies
//!
//! Each body is tracked by 12 state entries, pose then velocity:
//!
//! ```text
//! [tx, ty, tz, rx, ry, rz, vx, vy, vz, wx, wy, wz]
//! ```
//!
//! One step of the per-body model is
//!
//! ```text
//! pose'     = pose + f * velocity + n
//! velocity' =        f * velocity + n
//! ```
//!
//! where `f` is the velocity factor and `n` is the same 6-dimensional noise
//! sample, scaled by the linear and angular sigmas, in both rows. There is no
//! time step in the matrices; the filter runs one step per frame.
//!
//! Bodies are independent: the full matrices are block diagonal with one
//! block per body, in insertion order.

use alloc::sync::Arc;

use nalgebra::{DMatrix, Matrix3, RealField, SMatrix};
use num_traits::Float;

use super::transition::{
    LinearStateTransitionModel, TransitionFunctionBuilder, TransitionFunctionHandle,
};
use crate::types::layout::{StateLayout, PART_NOISE_DIM, PART_STATE_DIM, POSE_DIM};
use crate::types::transforms::{DynamicsMatrix, InputMatrix, NoiseMatrix};
use crate::{Result, TrackError};

/// Width of the control input. C is always zero.
pub const INPUT_DIM: usize = 1;

/// Per-body dynamics block.
pub type PartDynamics<T> = SMatrix<T, PART_STATE_DIM, PART_STATE_DIM>;

/// Per-body noise block.
pub type PartNoise<T> = SMatrix<T, PART_STATE_DIM, PART_NOISE_DIM>;

// ============================================================================
// Parameters
// ============================================================================

/// Configuration of the rigid body process model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectTransitionParams<T> {
    /// Standard deviation of the linear acceleration noise
    pub linear_sigma: T,
    /// Standard deviation of the angular acceleration noise
    pub angular_sigma: T,
    /// Per-step velocity damping, in [0, 1]
    pub velocity_factor: T,
    /// Number of independently tracked bodies
    pub part_count: usize,
}

impl<T: RealField + Float + Copy> Default for ObjectTransitionParams<T> {
    fn default() -> Self {
        Self {
            linear_sigma: nalgebra::convert::<f64, T>(1e-2),
            angular_sigma: nalgebra::convert::<f64, T>(1e-1),
            velocity_factor: nalgebra::convert::<f64, T>(0.8),
            part_count: 1,
        }
    }
}

impl<T: RealField + Float + Copy> ObjectTransitionParams<T> {
    /// Creates a new parameter set. Nothing is checked until [`Self::validate`].
    pub fn new(linear_sigma: T, angular_sigma: T, velocity_factor: T, part_count: usize) -> Self {
        Self {
            linear_sigma,
            angular_sigma,
            velocity_factor,
            part_count,
        }
    }

    pub fn with_linear_sigma(mut self, linear_sigma: T) -> Self {
        self.linear_sigma = linear_sigma;
        self
    }

    pub fn with_angular_sigma(mut self, angular_sigma: T) -> Self {
        self.angular_sigma = angular_sigma;
        self
    }

    pub fn with_velocity_factor(mut self, velocity_factor: T) -> Self {
        self.velocity_factor = velocity_factor;
        self
    }

    pub fn with_part_count(mut self, part_count: usize) -> Self {
        self.part_count = part_count;
        self
    }

    /// State layout described by these parameters.
    #[inline]
    pub fn layout(&self) -> StateLayout {
        StateLayout::new(self.part_count)
    }

    /// Checks every field and reports the first one out of range.
    ///
    /// - `part_count` must be at least 1
    /// - both sigmas must be finite and non-negative
    /// - `velocity_factor` must be finite and within [0, 1]
    pub fn validate(&self) -> Result<()> {
        if self.part_count == 0 {
            return Err(TrackError::invalid("part_count", "must be at least 1"));
        }
        check_sigma("linear_sigma", self.linear_sigma)?;
        check_sigma("angular_sigma", self.angular_sigma)?;

        let f = self.velocity_factor;
        if !Float::is_finite(f) || f < T::zero() || f > T::one() {
            return Err(TrackError::invalid(
                "velocity_factor",
                "must be finite and within [0, 1]",
            ));
        }
        Ok(())
    }
}

fn check_sigma<T: RealField + Float + Copy>(field: &'static str, sigma: T) -> Result<()> {
    if !Float::is_finite(sigma) || sigma < T::zero() {
        return Err(TrackError::invalid(field, "must be finite and non-negative"));
    }
    Ok(())
}

// ============================================================================
// Per-Body Blocks
// ============================================================================

/// Builds the 12x12 dynamics block of a single body.
///
/// 1. start from identity
/// 2. set the pose <- velocity corner (top right 6x6) to identity
/// 3. scale the rightmost 6 columns by `velocity_factor`
///
/// Step 3 damps both the pose <- velocity corner and the velocity diagonal.
pub fn part_dynamics_block<T: RealField + Copy>(velocity_factor: T) -> PartDynamics<T> {
    let mut block = PartDynamics::<T>::identity();
    block
        .fixed_view_mut::<POSE_DIM, POSE_DIM>(0, POSE_DIM)
        .fill_with_identity();
    let mut velocity_columns = block.fixed_columns_mut::<POSE_DIM>(POSE_DIM);
    velocity_columns *= velocity_factor;
    block
}

/// Builds the 12x6 noise block of a single body.
///
/// 1. start from zero
/// 2. rows 0-2, columns 0-2: identity scaled by `linear_sigma`
/// 3. rows 3-5, columns 3-5: identity scaled by `angular_sigma`
/// 4. copy rows 0-5 into rows 6-11
///
/// Pose and velocity therefore receive the same realized noise sample.
pub fn part_noise_block<T: RealField + Copy>(linear_sigma: T, angular_sigma: T) -> PartNoise<T> {
    let mut block = PartNoise::<T>::zeros();
    block
        .fixed_view_mut::<3, 3>(0, 0)
        .copy_from(&Matrix3::<T>::identity().scale(linear_sigma));
    block
        .fixed_view_mut::<3, 3>(3, 3)
        .copy_from(&Matrix3::<T>::identity().scale(angular_sigma));

    let pose_rows = block.fixed_rows::<POSE_DIM>(0).into_owned();
    block.fixed_rows_mut::<POSE_DIM>(POSE_DIM).copy_from(&pose_rows);
    block
}

// ============================================================================
// Builder
// ============================================================================

/// Builds the block-diagonal process model for `part_count` rigid bodies.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectTransitionModelBuilder<T> {
    params: ObjectTransitionParams<T>,
}

impl<T: RealField + Float + Copy> ObjectTransitionModelBuilder<T> {
    /// Creates a builder after validating `params`.
    pub fn new(params: ObjectTransitionParams<T>) -> Result<Self> {
        if let Err(err) = params.validate() {
            log::debug!("rejecting object transition parameters: {}", err);
            return Err(err);
        }
        Ok(Self { params })
    }

    #[inline]
    pub fn params(&self) -> &ObjectTransitionParams<T> {
        &self.params
    }

    #[inline]
    pub fn layout(&self) -> StateLayout {
        self.params.layout()
    }

    /// Assembles A, B and C and injects them into a linear model.
    ///
    /// A has one [`part_dynamics_block`] per body at `(12i, 12i)`, B one
    /// [`part_noise_block`] per body at `(12i, 6i)`. C is zero.
    pub fn build_model(&self) -> LinearStateTransitionModel<T> {
        let layout = self.layout();
        let state_dim = layout.state_dim();
        let noise_dim = layout.noise_dim();

        log::debug!(
            "building object transition model: parts={} state_dim={} noise_dim={} \
             linear_sigma={} angular_sigma={} velocity_factor={}",
            layout.part_count(),
            state_dim,
            noise_dim,
            self.params.linear_sigma,
            self.params.angular_sigma,
            self.params.velocity_factor
        );

        let mut a = DMatrix::<T>::zeros(state_dim, state_dim);
        let mut b = DMatrix::<T>::zeros(state_dim, noise_dim);
        let c = DMatrix::<T>::zeros(state_dim, INPUT_DIM);

        let part_a = part_dynamics_block(self.params.velocity_factor);
        let part_b = part_noise_block(self.params.linear_sigma, self.params.angular_sigma);

        for part in 0..layout.part_count() {
            let row = layout.part_range(part).start;
            let noise_col = layout.noise_range(part).start;

            a.fixed_view_mut::<PART_STATE_DIM, PART_STATE_DIM>(row, row)
                .copy_from(&part_a);
            b.fixed_view_mut::<PART_STATE_DIM, PART_NOISE_DIM>(row, noise_col)
                .copy_from(&part_b);
        }

        LinearStateTransitionModel::with_matrices(
            DynamicsMatrix::from_matrix(a),
            NoiseMatrix::from_matrix(b),
            InputMatrix::from_matrix(c),
        )
    }
}

impl<T: RealField + Float + Copy> TransitionFunctionBuilder<T>
    for ObjectTransitionModelBuilder<T>
{
    fn build(&self) -> TransitionFunctionHandle<T> {
        Arc::new(self.build_model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StateTransitionFunction;

    fn reference_params() -> ObjectTransitionParams<f64> {
        ObjectTransitionParams::new(0.1, 0.2, 0.9, 1)
    }

    #[test]
    fn test_part_dynamics_block_structure() {
        let block = part_dynamics_block(0.9_f64);

        for r in 0..12 {
            for c in 0..12 {
                let expected = if r == c && r < 6 {
                    1.0
                } else if c == r + 6 || (r == c && r >= 6) {
                    0.9
                } else {
                    0.0
                };
                assert_eq!(block[(r, c)], expected, "entry ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_part_noise_block_structure() {
        let block = part_noise_block(0.1_f64, 0.2);

        for r in 0..12 {
            for c in 0..6 {
                let expected = match (r % 6, c) {
                    (i, j) if i == j && i < 3 => 0.1,
                    (i, j) if i == j => 0.2,
                    _ => 0.0,
                };
                assert_eq!(block[(r, c)], expected, "entry ({}, {})", r, c);
            }
        }
    }

    #[test]
    fn test_velocity_rows_share_pose_noise() {
        let block = part_noise_block(0.3_f64, 0.7);
        assert_eq!(block.fixed_rows::<6>(0), block.fixed_rows::<6>(6));
    }

    #[test]
    fn test_zero_velocity_factor_drops_velocity() {
        let block = part_dynamics_block(0.0_f64);
        assert!(block.fixed_columns::<6>(6).iter().all(|v| *v == 0.0));
        assert_eq!(
            block.fixed_view::<6, 6>(0, 0).into_owned(),
            SMatrix::<f64, 6, 6>::identity()
        );
    }

    #[test]
    fn test_build_model_single_part() {
        let builder = ObjectTransitionModelBuilder::new(reference_params()).unwrap();
        let model = builder.build_model();

        assert_eq!(model.state_dim(), 12);
        assert_eq!(model.noise_dim(), 6);
        assert_eq!(model.input_dim(), 1);
        assert_eq!(
            model.dynamics_matrix().as_matrix().fixed_view::<12, 12>(0, 0),
            part_dynamics_block(0.9)
        );
        assert_eq!(
            model.noise_matrix().as_matrix().fixed_view::<12, 6>(0, 0),
            part_noise_block(0.1, 0.2)
        );
        assert!(model.input_matrix().as_matrix().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_build_returns_shared_handle() {
        let builder = ObjectTransitionModelBuilder::new(reference_params().with_part_count(2))
            .unwrap();
        let handle = builder.build();
        drop(builder);

        assert_eq!(handle.state_dim(), 24);
        assert_eq!(handle.noise_dim(), 12);
        assert_eq!(handle.input_dim(), INPUT_DIM);
    }

    #[test]
    fn test_default_params_are_valid() {
        let params = ObjectTransitionParams::<f64>::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.part_count, 1);
        assert!((params.velocity_factor - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_validation_names_offending_field() {
        let cases = [
            (reference_params().with_part_count(0), "part_count"),
            (reference_params().with_linear_sigma(-0.1), "linear_sigma"),
            (reference_params().with_angular_sigma(f64::NAN), "angular_sigma"),
            (reference_params().with_velocity_factor(1.5), "velocity_factor"),
            (reference_params().with_velocity_factor(-0.1), "velocity_factor"),
            (
                reference_params().with_velocity_factor(f64::INFINITY),
                "velocity_factor",
            ),
        ];

        for (params, expected_field) in cases {
            match ObjectTransitionModelBuilder::new(params) {
                Err(TrackError::InvalidParameter { field, .. }) => {
                    assert_eq!(field, expected_field)
                }
                other => panic!("expected {} to be rejected, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn test_boundary_values_are_accepted() {
        let params = ObjectTransitionParams::new(0.0_f64, 0.0, 1.0, 1);
        assert!(params.validate().is_ok());
        assert!(params.with_velocity_factor(0.0).validate().is_ok());
    }
}
