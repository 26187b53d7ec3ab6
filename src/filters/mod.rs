//! Predict-step consumers of the transition model
//!
//! - [`gaussian`]: mean/covariance propagation for Kalman-type filters
//! - [`particle`]: sampled propagation for particle filters (requires `std`)

pub mod gaussian;
#[cfg(feature = "std")]
pub mod particle;
