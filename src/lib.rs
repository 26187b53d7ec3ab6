//! rigidtrack: process models for tracking free-floating rigid bodies
//!
//! Builds the linear-Gaussian state transition used by the predict step of a
//! Bayesian pose tracker (UKF, particle filter) for any number of independently
//! moving rigid bodies.
//!
//! Each body contributes 12 state entries (6 pose, 6 velocity) and 6 noise
//! entries. The per-body blocks are tiled along the diagonal so that bodies
//! never influence each other:
//!
//! ```text
//! x_{k+1} = A * x_k + B * w_k + C * u_k
//! ```
//!
//! # Features
//!
//! - **Typed spaces**: state, noise and input vectors cannot be mixed up
//! - **Shared handles**: built models are immutable and `Send + Sync`
//! - **no_std Support**: only `alloc` is required for the model itself
//!
//! # Example
//!
//! ```
//! use rigidtrack::prelude::*;
//!
//! let params = ObjectTransitionParams::new(0.1, 0.2, 0.9, 2);
//! let builder = ObjectTransitionModelBuilder::new(params).unwrap();
//! let transition = builder.build();
//!
//! assert_eq!(transition.state_dim(), 24);
//! assert_eq!(transition.noise_dim(), 12);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod types;
pub mod models;
pub mod filters;

pub mod prelude {
    pub use crate::types::layout::*;
    pub use crate::types::spaces::*;
    pub use crate::types::transforms::*;
    pub use crate::models::*;
    pub use crate::filters::gaussian::*;
    pub use crate::{Result, TrackError};
}

/// Error types for the library
#[derive(Debug, Clone, PartialEq)]
pub enum TrackError {
    /// A configuration value is outside its admissible range
    InvalidParameter {
        /// Name of the offending configuration field
        field: &'static str,
        /// What the field must satisfy
        reason: &'static str,
    },
    /// An operand does not have the dimension the model was built for
    DimensionMismatch {
        /// Which operand was checked
        what: &'static str,
        /// Dimension required by the model
        expected: usize,
        /// Dimension that was supplied
        actual: usize,
    },
}

impl TrackError {
    /// Shorthand for [`TrackError::InvalidParameter`].
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        TrackError::InvalidParameter { field, reason }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TrackError {}

impl ::core::fmt::Display for TrackError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            TrackError::InvalidParameter { field, reason } => {
                write!(f, "Invalid parameter `{}`: {}", field, reason)
            }
            TrackError::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(
                f,
                "Dimension mismatch for {}: expected {}, got {}",
                what, expected, actual
            ),
        }
    }
}

pub type Result<T> = ::core::result::Result<T, TrackError>;
