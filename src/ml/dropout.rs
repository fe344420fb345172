// ============================================================
// Layer 2 — Dropout Stage
// ============================================================
// Inverted dropout gated by an explicit ExecutionMode:
//
//   Training:   keep each element with probability 1 - rate,
//               scale survivors by 1 / (1 - rate)
//   Inference:  identity
//
// burn::nn::Dropout decides "training" by asking whether the
// backend records gradients. Here the caller states the mode,
// so a training pass on a plain (non-autodiff) backend still
// drops, and an inference pass on an autodiff backend never does.
// The masking itself is the same Bernoulli trick burn uses.
//
// Reference: Srivastava et al. (2014) Dropout
//            Burn Book §3 (Building Blocks)

use burn::{prelude::*, tensor::Distribution};

use crate::domain::mode::ExecutionMode;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropoutStage {
    rate: f64,
}

impl DropoutStage {
    /// `rate` must already be validated to lie in (0, 1).
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    pub fn forward<B: Backend, const D: usize>(
        &self,
        x:    Tensor<B, D>,
        mode: ExecutionMode,
    ) -> Tensor<B, D> {
        if !mode.is_training() {
            return x;
        }
        let keep = 1.0 - self.rate;
        let mask = x.random_like(Distribution::Bernoulli(keep));
        x.mul(mask).div_scalar(keep)
    }
}
