// ============================================================
// Layer 1 — Modes
// ============================================================
// Two small enums that steer how layers evaluate:
//
//   ExecutionMode — training vs inference. Only dropout
//                   looks at it; everything else is the
//                   same computation in both modes.
//
//   PositionMode  — how the sine/cosine signal is combined
//                   with the input. The output width lives
//                   inside the variants that need it, so an
//                   `expand` or `concat` mode without a width
//                   cannot be represented at all.
//
//   expand  (batch, seq)          → (batch, seq, output_dim)
//   add     (batch, seq, feature) → (batch, seq, feature)
//   concat  (batch, seq, feature) → (batch, seq, feature + output_dim)
//
// Reference: Vaswani et al. (2017) Attention Is All You Need §3.5
//            Rust Book §6 (Enums and Pattern Matching)

use std::fmt;

use crate::domain::error::{LayerError, LayerResult};

// ─── ExecutionMode ────────────────────────────────────────────────────────────
/// Whether a forward pass is part of training or inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// Stochastic stages (dropout) are active
    Training,
    /// Deterministic evaluation
    #[default]
    Inference,
}

impl ExecutionMode {
    pub fn is_training(self) -> bool {
        matches!(self, ExecutionMode::Training)
    }
}

// ─── PositionMode ─────────────────────────────────────────────────────────────
/// Composition mode of a sine/cosine position embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionMode {
    /// Integer positions in, embeddings out
    Expand { output_dim: usize },
    /// Encoding as wide as the input, summed with it
    Add,
    /// Encoding appended on the feature axis
    Concat { output_dim: usize },
}

impl PositionMode {
    pub const EXPAND: &'static str = "expand";
    pub const ADD:    &'static str = "add";
    pub const CONCAT: &'static str = "concat";

    /// Resolve a mode name plus an optional width into a valid mode.
    ///
    /// `add` accepts any `output_dim` (including none) because its width
    /// always comes from the input at call time.
    pub fn parse(mode: &str, output_dim: Option<usize>) -> LayerResult<Self> {
        match mode {
            Self::ADD => Ok(PositionMode::Add),
            Self::EXPAND | Self::CONCAT => {
                let dim = output_dim.ok_or_else(|| LayerError::MissingOutputDim {
                    mode: mode.to_string(),
                })?;
                if dim == 0 {
                    return Err(LayerError::ZeroOutputDim);
                }
                if dim % 2 != 0 {
                    return Err(LayerError::OddOutputDim(dim));
                }
                Ok(if mode == Self::EXPAND {
                    PositionMode::Expand { output_dim: dim }
                } else {
                    PositionMode::Concat { output_dim: dim }
                })
            }
            other => Err(LayerError::UnsupportedMode(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PositionMode::Expand { .. } => Self::EXPAND,
            PositionMode::Add           => Self::ADD,
            PositionMode::Concat { .. } => Self::CONCAT,
        }
    }

    /// The configured width, if this mode carries one.
    pub fn output_dim(&self) -> Option<usize> {
        match self {
            PositionMode::Expand { output_dim } | PositionMode::Concat { output_dim } => {
                Some(*output_dim)
            }
            PositionMode::Add => None,
        }
    }

    /// Rank of the tensor this mode consumes.
    pub fn input_rank(&self) -> usize {
        match self {
            PositionMode::Expand { .. } => 2,
            _ => 3,
        }
    }
}

impl fmt::Display for PositionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
