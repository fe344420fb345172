// ============================================================
// seq-blocks — transformer building blocks for burn
// ============================================================
// Two independent layers for assembling transformer-style
// sequence models:
//
//   FeedForward                  — position-wise W2·act(W1·x)
//   SineCosinePositionEmbedding  — fixed sinusoidal positions,
//                                  expand / add / concat
//
// burn supplies tensors, parameters, initializers, autodiff
// and backends. This crate supplies the layer math and a small
// layer lifecycle on top.
//
// Crate layout:
//   domain/  — burn-free types: errors, modes, shape inference,
//              the Layer trait
//   ml/      — burn layer implementations
//   infra/   — persistence of configs and parameter records
//
// Quick start:
//
//   let device = Default::default();
//   let mut ffn = FeedForwardConfig::new(256).init::<B>(&device)?;
//   let mut pos = SineCosinePositionEmbeddingConfig::add().init()?;
//   let x = pos.call(x)?;          // (batch, seq, 64)
//   let y = ffn.call(x)?;          // (batch, seq, 64)
//
// Reference: Vaswani et al. (2017) Attention Is All You Need

pub mod domain;
pub mod infra;
pub mod ml;

pub use domain::{
    error::{LayerError, LayerResult},
    mode::{ExecutionMode, PositionMode},
    traits::{ConfigMap, Layer, LayerConfig},
};
pub use ml::{
    activation::Activation,
    constraint::Constraint,
    feed_forward::{FeedForward, FeedForwardConfig, FeedForwardParams, ParamInfo},
    layer::{Forward, LayerOutput, Mask},
    position::{SineCosinePositionEmbedding, SineCosinePositionEmbeddingConfig},
    registry::{custom_objects, AnyLayer, LayerSpec},
    regularizer::Regularizer,
};
