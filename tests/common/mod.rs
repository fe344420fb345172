// Shared helpers for the integration suites.
#![allow(dead_code)]

use burn::prelude::*;

pub type TB  = burn::backend::NdArray;
pub type TAB = burn::backend::Autodiff<TB>;

/// Route `tracing` output through the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn values<B: Backend, const D: usize>(t: Tensor<B, D>) -> Vec<f32> {
    t.into_data().to_vec::<f32>().unwrap()
}

pub fn assert_close(got: &[f32], expected: &[f32], tol: f32) {
    assert_eq!(got.len(), expected.len(), "length mismatch");
    for (i, (g, e)) in got.iter().zip(expected).enumerate() {
        assert!((g - e).abs() <= tol, "index {i}: got {g}, expected {e}");
    }
}
