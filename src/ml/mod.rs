// ============================================================
// Layer 2 — ML / Layer Implementations (Burn)
// ============================================================
// All burn-specific code lives here. The domain layer knows
// nothing about tensors; this layer turns its types into
// working layers.
//
//   layer.rs        — Forward trait, masks, LayerOutput
//   feed_forward.rs — position-wise feed-forward sublayer
//   position.rs     — sine/cosine position embedding
//   activation.rs   — activations resolved by name
//   dropout.rs      — mode-gated inverted dropout
//   regularizer.rs  — l1 / l2 weight penalties
//   constraint.rs   — post-update weight projections
//   registry.rs     — class-name envelope for configs
//
// Reference: Burn Book §3 (Building Blocks)
//            Vaswani et al. (2017) Attention Is All You Need

/// Forward contract shared by every layer
pub mod layer;

/// W2 · dropout(act(W1 · x + b1)) + b2
pub mod feed_forward;

/// Fixed sinusoidal position signal (expand / add / concat)
pub mod position;

pub mod activation;

pub mod dropout;

pub mod regularizer;

pub mod constraint;

/// Rebuild layers from `{class_name, config}` envelopes
pub mod registry;
