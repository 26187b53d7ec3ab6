//! Common test helpers for transition model integration tests

#![allow(dead_code)]

use nalgebra::DMatrix;
use rigidtrack::models::{
    LinearStateTransitionModel, ObjectTransitionModelBuilder, ObjectTransitionParams,
};
use rigidtrack::types::spaces::StateVector;

/// Routes the crate's `log` output to the test harness
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Trace)
        .try_init();
}

/// Parameters used throughout the reference scenarios
pub fn make_params(part_count: usize) -> ObjectTransitionParams<f64> {
    ObjectTransitionParams::new(0.1, 0.2, 0.9, part_count)
}

/// Builds the concrete model for the given parameters
pub fn build_model(params: ObjectTransitionParams<f64>) -> LinearStateTransitionModel<f64> {
    ObjectTransitionModelBuilder::new(params)
        .expect("test parameters are valid")
        .build_model()
}

/// Copies the `rows x cols` block at `(row, col)`
pub fn block(m: &DMatrix<f64>, row: usize, col: usize, rows: usize, cols: usize) -> DMatrix<f64> {
    m.view((row, col), (rows, cols)).into_owned()
}

/// `n x n` identity scaled by `s`
pub fn scaled_identity(n: usize, s: f64) -> DMatrix<f64> {
    DMatrix::identity(n, n) * s
}

/// Checks that the block at `(row, col)` is all zero
pub fn is_zero_block(m: &DMatrix<f64>, row: usize, col: usize, rows: usize, cols: usize) -> bool {
    block(m, row, col, rows, cols).iter().all(|v| *v == 0.0)
}

/// State for `part_count` bodies with pose `i` and velocity `0.1 * i` on every entry of body `i`
pub fn make_state(part_count: usize) -> StateVector<f64> {
    let mut data = Vec::with_capacity(12 * part_count);
    for part in 0..part_count {
        let p = part as f64 + 1.0;
        data.extend(std::iter::repeat(p).take(6));
        data.extend(std::iter::repeat(0.1 * p).take(6));
    }
    StateVector::from_vec(data)
}
