// ============================================================
// Layer 2 — Activations
// ============================================================
// Activation functions resolvable by name. The serde name is
// the canonical identifier that ends up in an exported config
// (`"relu"`, `"gelu_tanh"`, ...).
//
// Most variants delegate to burn::tensor::activation. The one
// exception is `gelu_tanh`, the tanh approximation of GELU
// used by GPT/BERT style models:
//
//   GELU(x) ≈ 0.5·x·(1 + tanh(√(2/π)·(x + 0.044715·x³)))
//
// burn's own `gelu` is the exact erf form.
//
// Reference: Hendrycks & Gimpel (2016) GELUs, arXiv:1606.08415
//            Burn Book §3 (Building Blocks)

use std::f64::consts::PI;

use burn::{prelude::*, tensor::activation};
use serde::{Deserialize, Serialize};

use crate::domain::error::{LayerError, LayerResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Gelu,
    GeluTanh,
    Tanh,
    Sigmoid,
    #[serde(alias = "swish")]
    Silu,
    /// Softmax over the trailing axis
    Softmax,
    /// Identity
    Linear,
}

impl Activation {
    /// Look an activation up by its serialized name.
    pub fn from_name(name: &str) -> LayerResult<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map_err(|_| LayerError::InvalidConfig(format!("unknown activation `{name}`")))
    }

    pub fn apply<B: Backend, const D: usize>(&self, x: Tensor<B, D>) -> Tensor<B, D> {
        match self {
            Activation::Relu     => activation::relu(x),
            Activation::Gelu     => activation::gelu(x),
            Activation::GeluTanh => gelu_tanh(x),
            Activation::Tanh     => x.tanh(),
            Activation::Sigmoid  => activation::sigmoid(x),
            Activation::Silu     => activation::silu(x),
            Activation::Softmax  => activation::softmax(x, D - 1),
            Activation::Linear   => x,
        }
    }
}

/// Tanh approximation of GELU.
pub fn gelu_tanh<B: Backend, const D: usize>(x: Tensor<B, D>) -> Tensor<B, D> {
    let inner = x
        .clone()
        .powf_scalar(3.0)
        .mul_scalar(0.044715)
        .add(x.clone())
        .mul_scalar((2.0 / PI).sqrt());
    x.mul(inner.tanh().add_scalar(1.0)).mul_scalar(0.5)
}
