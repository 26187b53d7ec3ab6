//! Process models
//!
//! The generic linear transition capability consumed by a filter's predict
//! step, and the rigid body model that implements it.

mod object;
mod transition;

pub use object::*;
pub use transition::*;
