// ============================================================
// Layer 1 — Static Shape Inference
// ============================================================
// Output shapes worked out from input shapes alone, with no
// tensor values. Pure functions over &[usize] so model code
// can plan a stack of layers before any data exists.
//
//   feed-forward          (..., f)   → (..., f)
//   position / expand     (b, s)     → (b, s, d)
//   position / add        (b, s, f)  → (b, s, f)
//   position / concat     (b, s, f)  → (b, s, f + d)

use crate::domain::error::{LayerError, LayerResult};
use crate::domain::mode::PositionMode;

/// Trailing (feature) axis of a shape.
pub fn feature_dim(shape: &[usize]) -> LayerResult<usize> {
    shape.last().copied().ok_or_else(|| LayerError::RankMismatch {
        expected: 1,
        shape:    shape.to_vec(),
    })
}

/// A position-wise projection that maps features back to their own width
/// leaves the shape untouched.
pub fn feed_forward_output_shape(shape: &[usize]) -> LayerResult<Vec<usize>> {
    feature_dim(shape)?;
    Ok(shape.to_vec())
}

pub fn position_output_shape(mode: PositionMode, shape: &[usize]) -> LayerResult<Vec<usize>> {
    ensure_rank(shape, mode.input_rank())?;
    let mut out = shape.to_vec();
    match mode {
        PositionMode::Expand { output_dim } => out.push(output_dim),
        PositionMode::Concat { output_dim } => out[2] += output_dim,
        PositionMode::Add => {}
    }
    Ok(out)
}

/// Width of the sine/cosine block a mode produces for a given input.
pub fn encoding_width(mode: PositionMode, shape: &[usize]) -> LayerResult<usize> {
    ensure_rank(shape, mode.input_rank())?;
    match mode {
        PositionMode::Expand { output_dim } | PositionMode::Concat { output_dim } => Ok(output_dim),
        PositionMode::Add => {
            let width = shape[2];
            if width % 2 != 0 {
                return Err(LayerError::OddFeatureDim(width));
            }
            Ok(width)
        }
    }
}

fn ensure_rank(shape: &[usize], expected: usize) -> LayerResult<()> {
    if shape.len() != expected {
        return Err(LayerError::RankMismatch { expected, shape: shape.to_vec() });
    }
    Ok(())
}
