// ============================================================
// Layer 2 — Sine/Cosine Position Embedding
// ============================================================
// Fixed (non-learned) position signal from the original
// transformer paper. For position p and pair index i in
// [0, d/2):
//
//   PE(p, 2i)     = sin(p / 10000^(2i/d))
//   PE(p, 2i + 1) = cos(p / 10000^(2i/d))
//
// Sine and cosine channels are interleaved, so channel 2i is
// always the sine and 2i+1 its cosine partner.
//
// Three ways to combine it with the input (see PositionMode):
//
//   expand  positions (batch, seq) → PE, (batch, seq, d)
//   add     x (batch, seq, f)      → x + PE with d = f
//   concat  x (batch, seq, f)      → [x ‖ PE], (batch, seq, f + d)
//
// In add/concat mode the positions are 0..seq_len, the same
// for every batch row. In expand mode they are whatever the
// input tensor holds.
//
// `add` takes its width from the input, so a configured
// output_dim is ignored there (it is still kept in the
// exported config).
//
// Reference: Vaswani et al. (2017) Attention Is All You Need §3.5

use burn::prelude::*;

use crate::domain::{
    error::{LayerError, LayerResult},
    mode::{ExecutionMode, PositionMode},
    naming::unique_name,
    shape,
    traits::{ConfigMap, Layer, LayerConfig},
};
use crate::ml::layer::{Forward, LayerOutput, Mask};

/// Frequency base of the encoding.
pub const FREQUENCY_BASE: f64 = 10000.0;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Config, Debug)]
pub struct SineCosinePositionEmbeddingConfig {
    /// One of `expand`, `add`, `concat`
    #[config(default = "String::from(\"add\")")]
    pub mode: String,

    /// Encoding width; required (and even) for `expand` and `concat`
    pub output_dim: Option<usize>,

    pub name: Option<String>,
}

impl LayerConfig for SineCosinePositionEmbeddingConfig {
    const CLASS_NAME: &'static str = "SineCosinePositionEmbedding";
}

impl SineCosinePositionEmbeddingConfig {
    pub fn expand(output_dim: usize) -> Self {
        Self::new()
            .with_mode(PositionMode::EXPAND.to_string())
            .with_output_dim(Some(output_dim))
    }

    pub fn add() -> Self {
        Self::new().with_mode(PositionMode::ADD.to_string())
    }

    pub fn concat(output_dim: usize) -> Self {
        Self::new()
            .with_mode(PositionMode::CONCAT.to_string())
            .with_output_dim(Some(output_dim))
    }

    /// Validate the mode and width. Fails before any tensor work.
    pub fn init(&self) -> LayerResult<SineCosinePositionEmbedding> {
        let mode = PositionMode::parse(&self.mode, self.output_dim)?;

        if let (PositionMode::Add, Some(dim)) = (mode, self.output_dim) {
            tracing::warn!("output_dim={} is ignored in `add` mode; the input width is used", dim);
        }

        let mut config = self.clone();
        if config.name.is_none() {
            config.name = Some(unique_name("sine_cosine_position_embedding"));
        }

        Ok(SineCosinePositionEmbedding { config, mode })
    }
}

// ─── Layer ────────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SineCosinePositionEmbedding {
    config: SineCosinePositionEmbeddingConfig,
    mode:   PositionMode,
}

impl SineCosinePositionEmbedding {
    pub fn from_config(map: ConfigMap) -> LayerResult<Self> {
        SineCosinePositionEmbeddingConfig::from_map(map)?.init()
    }

    pub fn mode(&self) -> PositionMode {
        self.mode
    }

    fn expand_positions<B: Backend>(&self, positions: Tensor<B, 2>) -> LayerResult<Tensor<B, 3>> {
        match self.mode {
            PositionMode::Expand { output_dim } => Ok(sinusoid_encoding(positions, output_dim)),
            other => Err(LayerError::ModeInputMismatch {
                mode:     other.name().to_string(),
                expected: "a (batch, seq_len, feature_dim) tensor".to_string(),
            }),
        }
    }
}

impl Layer for SineCosinePositionEmbedding {
    type Config = SineCosinePositionEmbeddingConfig;

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("sine_cosine_position_embedding")
    }

    fn config(&self) -> &SineCosinePositionEmbeddingConfig {
        &self.config
    }

    fn compute_output_shape(&self, input_shape: &[usize]) -> LayerResult<Vec<usize>> {
        shape::position_output_shape(self.mode, input_shape)
    }
}

/// `expand` mode over integer positions.
impl<B: Backend> Forward<B, Tensor<B, 2, Int>> for SineCosinePositionEmbedding {
    type Output = Tensor<B, 3>;

    fn forward(
        &mut self,
        input: Tensor<B, 2, Int>,
        mask:  Option<Mask<B>>,
        _mode: ExecutionMode,
    ) -> LayerResult<LayerOutput<B, Tensor<B, 3>>> {
        let tensor = self.expand_positions(input.float())?;
        Ok(LayerOutput { tensor, mask: self.compute_mask(mask) })
    }
}

/// `expand` mode over positions already stored as floats.
impl<B: Backend> Forward<B, Tensor<B, 2>> for SineCosinePositionEmbedding {
    type Output = Tensor<B, 3>;

    fn forward(
        &mut self,
        input: Tensor<B, 2>,
        mask:  Option<Mask<B>>,
        _mode: ExecutionMode,
    ) -> LayerResult<LayerOutput<B, Tensor<B, 3>>> {
        let tensor = self.expand_positions(input)?;
        Ok(LayerOutput { tensor, mask: self.compute_mask(mask) })
    }
}

/// `add` / `concat` mode over (batch, seq_len, feature_dim) features.
impl<B: Backend> Forward<B, Tensor<B, 3>> for SineCosinePositionEmbedding {
    type Output = Tensor<B, 3>;

    fn forward(
        &mut self,
        input: Tensor<B, 3>,
        mask:  Option<Mask<B>>,
        _mode: ExecutionMode,
    ) -> LayerResult<LayerOutput<B, Tensor<B, 3>>> {
        if let PositionMode::Expand { .. } = self.mode {
            return Err(LayerError::ModeInputMismatch {
                mode:     PositionMode::EXPAND.to_string(),
                expected: "a (batch, seq_len) tensor of positions".to_string(),
            });
        }

        let dims  = input.dims();
        let width = shape::encoding_width(self.mode, &dims)?;
        let [batch, seq_len, features] = dims;
        let concat = matches!(self.mode, PositionMode::Concat { .. });

        // Empty batch or sequence: nothing to encode, only the shape changes
        let tensor = if width == 0 || batch == 0 || seq_len == 0 {
            if concat && width > 0 {
                Tensor::zeros([batch, seq_len, features + width], &input.device())
            } else {
                input
            }
        } else {
            let positions = sequence_positions::<B>(batch, seq_len, &input.device());
            let encoding  = sinusoid_encoding(positions, width);
            if concat {
                Tensor::cat(vec![input, encoding], 2)
            } else {
                input + encoding
            }
        };

        Ok(LayerOutput { tensor, mask: self.compute_mask(mask) })
    }
}

// ─── Encoding ─────────────────────────────────────────────────────────────────
/// `0, 1, …, seq_len - 1` repeated for every batch row.
pub fn sequence_positions<B: Backend>(
    batch:   usize,
    seq_len: usize,
    device:  &B::Device,
) -> Tensor<B, 2> {
    Tensor::<B, 1, Int>::arange(0..seq_len as i64, device)
        .float()
        .unsqueeze::<2>()
        .expand([batch, seq_len])
}

/// `1 / 10000^(2i/d)` for i in [0, d/2), shape `[d/2]`.
pub fn inverse_frequencies<B: Backend>(output_dim: usize, device: &B::Device) -> Tensor<B, 1> {
    let half = output_dim / 2;
    // 10000^(-2i/d) = exp(-ln(10000) · 2i/d)
    Tensor::<B, 1, Int>::arange(0..half as i64, device)
        .float()
        .mul_scalar(2.0 / output_dim as f64)
        .mul_scalar(-FREQUENCY_BASE.ln())
        .exp()
}

/// Interleaved sine/cosine encoding of a (batch, seq_len) position tensor.
/// `output_dim` must be even.
pub fn sinusoid_encoding<B: Backend>(positions: Tensor<B, 2>, output_dim: usize) -> Tensor<B, 3> {
    let [batch, seq_len] = positions.dims();
    let half = output_dim / 2;
    if batch == 0 || seq_len == 0 || half == 0 {
        return Tensor::zeros([batch, seq_len, output_dim], &positions.device());
    }

    let freqs = inverse_frequencies::<B>(output_dim, &positions.device())
        .reshape([1, 1, half])
        .expand([batch, seq_len, half]);
    let angles = positions
        .unsqueeze_dim::<3>(2)
        .expand([batch, seq_len, half])
        .mul(freqs);

    // (b, s, d/2, 2) → (b, s, d): sin/cos pairs land side by side
    Tensor::stack::<4>(vec![angles.clone().sin(), angles.cos()], 3)
        .reshape([batch, seq_len, output_dim])
}
