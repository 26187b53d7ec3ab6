//! Core types: state layout, typed vector spaces and transformations

pub mod layout;
pub mod spaces;
pub mod transforms;
