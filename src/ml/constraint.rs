// ============================================================
// Layer 2 — Weight Constraints
// ============================================================
// A constraint projects a parameter back onto an allowed set
// after the optimiser has moved it:
//
//   non_neg       w ← max(w, 0)
//   max_norm      rescale slices whose L2 norm exceeds max_value
//   unit_norm     rescale every slice to norm 1
//   min_max_norm  pull slice norms into [min_value, max_value],
//                 blending old and clipped norm by `rate`
//
// Norms are taken along `axis`. For a (in, out) kernel the
// default axis 0 means "one norm per output unit". An axis
// past the tensor's rank falls back to the last axis, so the
// same constraint works on a kernel and on its bias.
//
// Constraints are never applied during forward; the training
// procedure calls them after its update step.

use burn::prelude::*;
use serde::{Deserialize, Serialize};

const EPSILON: f64 = 1e-7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class_name", rename_all = "snake_case")]
pub enum Constraint {
    NonNeg,
    MaxNorm {
        max_value: f64,
        #[serde(default)]
        axis: usize,
    },
    UnitNorm {
        #[serde(default)]
        axis: usize,
    },
    MinMaxNorm {
        min_value: f64,
        max_value: f64,
        rate: f64,
        #[serde(default)]
        axis: usize,
    },
}

impl Constraint {
    pub fn apply<B: Backend, const D: usize>(&self, w: Tensor<B, D>) -> Tensor<B, D> {
        match *self {
            Constraint::NonNeg => w.clamp_min(0.0),
            Constraint::MaxNorm { max_value, axis } => {
                let norms = slice_norms(w.clone(), axis);
                let desired = norms.clone().clamp(0.0, max_value);
                rescale(w, desired, norms)
            }
            Constraint::UnitNorm { axis } => {
                let norms = slice_norms(w.clone(), axis);
                let desired = norms.ones_like();
                rescale(w, desired, norms)
            }
            Constraint::MinMaxNorm { min_value, max_value, rate, axis } => {
                let norms = slice_norms(w.clone(), axis);
                let desired = norms
                    .clone()
                    .clamp(min_value, max_value)
                    .mul_scalar(rate)
                    .add(norms.clone().mul_scalar(1.0 - rate));
                rescale(w, desired, norms)
            }
        }
    }
}

/// L2 norm of every slice along `axis`, keeping that axis as size 1.
fn slice_norms<B: Backend, const D: usize>(w: Tensor<B, D>, axis: usize) -> Tensor<B, D> {
    let axis = axis.min(D - 1);
    w.powf_scalar(2.0).sum_dim(axis).sqrt()
}

fn rescale<B: Backend, const D: usize>(
    w:       Tensor<B, D>,
    desired: Tensor<B, D>,
    norms:   Tensor<B, D>,
) -> Tensor<B, D> {
    let factor = desired.div(norms.add_scalar(EPSILON)).expand(w.dims());
    w.mul(factor)
}
