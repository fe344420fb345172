// ============================================================
// Layer 2 — Forward Evaluation Contract
// ============================================================
// `domain::traits::Layer` covers everything that can be said
// about a layer without tensors. `Forward` adds evaluation,
// once per input tensor type a layer accepts. A position
// embedding, for instance, takes integer positions in
// `expand` mode and float features in `add`/`concat` mode;
// each is its own `Forward` impl, picked by the compiler from
// the argument type.
//
// Masks ride alongside the tensor. Every layer in this crate
// passes them through unchanged.

use burn::prelude::*;

use crate::domain::{error::LayerResult, mode::ExecutionMode, traits::Layer};

/// Padding / attention mask over (batch, seq_len).
pub type Mask<B> = Tensor<B, 2, Bool>;

/// Result of one forward pass.
#[derive(Debug, Clone)]
pub struct LayerOutput<B: Backend, T> {
    pub tensor: T,
    pub mask:   Option<Mask<B>>,
}

pub trait Forward<B: Backend, I>: Layer {
    type Output;

    /// Evaluate the layer. May bind parameters on first use, hence `&mut self`.
    fn forward(
        &mut self,
        input: I,
        mask:  Option<Mask<B>>,
        mode:  ExecutionMode,
    ) -> LayerResult<LayerOutput<B, Self::Output>>;

    /// Maskless inference pass.
    fn call(&mut self, input: I) -> LayerResult<Self::Output> {
        Ok(self.forward(input, None, ExecutionMode::Inference)?.tensor)
    }
}
