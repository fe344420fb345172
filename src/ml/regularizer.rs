// ============================================================
// Layer 2 — Weight Regularizers
// ============================================================
// A regularizer turns a parameter tensor into a scalar penalty
// that the training loop adds to its loss:
//
//   l1     →  l1 · Σ|w|
//   l2     →  l2 · Σw²
//   l1_l2  →  both
//
// Layers only compute the penalty; whether and how it enters
// the loss is the training procedure's call.

use burn::prelude::*;
use serde::{Deserialize, Serialize};

/// Default coefficient for both penalties.
pub const DEFAULT_FACTOR: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class_name", rename_all = "snake_case")]
pub enum Regularizer {
    L1 {
        #[serde(default = "default_factor")]
        l1: f64,
    },
    L2 {
        #[serde(default = "default_factor")]
        l2: f64,
    },
    L1L2 {
        #[serde(default = "default_factor")]
        l1: f64,
        #[serde(default = "default_factor")]
        l2: f64,
    },
}

fn default_factor() -> f64 {
    DEFAULT_FACTOR
}

impl Regularizer {
    fn factors(&self) -> (f64, f64) {
        match *self {
            Regularizer::L1 { l1 }       => (l1, 0.0),
            Regularizer::L2 { l2 }       => (0.0, l2),
            Regularizer::L1L2 { l1, l2 } => (l1, l2),
        }
    }

    /// Scalar penalty for one parameter tensor, shape `[1]`.
    pub fn penalty<B: Backend, const D: usize>(&self, w: Tensor<B, D>) -> Tensor<B, 1> {
        let (l1, l2) = self.factors();
        let device = w.device();
        let mut total = Tensor::<B, 1>::zeros([1], &device);
        if l1 != 0.0 {
            total = total + w.clone().abs().sum().mul_scalar(l1);
        }
        if l2 != 0.0 {
            total = total + w.powf_scalar(2.0).sum().mul_scalar(l2);
        }
        total
    }
}
