// ============================================================
// Layer 1 — Layer Errors
// ============================================================
// Every failure this crate can report, in one enum.
//
// Two families:
//   1. Configuration errors — raised at construction time,
//      before any tensor is touched. Nothing is half-built:
//      the constructor returns Err and no layer exists.
//   2. Shape errors — raised when an input cannot be bound
//      or evaluated. Anything deeper (e.g. a matmul on
//      mismatched inner dims) stays with burn itself.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use thiserror::Error;

/// Convenience alias used by every fallible layer operation.
pub type LayerResult<T> = Result<T, LayerError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayerError {
    // ─── Configuration ───────────────────────────────────────────────────────
    /// The mode string is not one of `expand`, `add`, `concat`.
    #[error("not support mode `{0}`, options: expand | add | concat")]
    UnsupportedMode(String),

    /// `expand` and `concat` need an explicit output width.
    #[error("`output_dim` is required in `{mode}` mode")]
    MissingOutputDim { mode: String },

    /// Sine and cosine channels come in pairs.
    #[error("not support an odd output dimension: {0}")]
    OddOutputDim(usize),

    #[error("output dimension must be positive")]
    ZeroOutputDim,

    #[error("hidden width `units` must be positive")]
    ZeroUnits,

    /// Dropout probability must lie in [0, 1).
    #[error("dropout rate must be in [0, 1), got {0}")]
    InvalidDropoutRate(f64),

    /// Unknown class name while rebuilding a layer from its spec.
    #[error("unknown layer class `{0}`")]
    UnknownLayer(String),

    /// A config mapping could not be decoded back into a config.
    #[error("invalid layer config: {0}")]
    InvalidConfig(String),

    // ─── Shapes ──────────────────────────────────────────────────────────────
    /// Parameters are locked to the first feature dimension seen.
    #[error("layer `{layer}` is bound to feature dim {bound}, got {got}")]
    ShapeLocked {
        layer: String,
        bound: usize,
        got:   usize,
    },

    /// Input has fewer axes than the layer needs.
    #[error("expected an input of rank {expected}, got shape {shape:?}")]
    RankMismatch { expected: usize, shape: Vec<usize> },

    /// `add` mode derives the encoding width from the input, so it must be even.
    #[error("`add` mode needs an even feature dimension, got {0}")]
    OddFeatureDim(usize),

    /// The input tensor kind does not fit the configured mode,
    /// e.g. a (batch, seq, feature) tensor handed to an `expand` encoder.
    #[error("mode `{mode}` expects {expected}")]
    ModeInputMismatch { mode: String, expected: String },
}
