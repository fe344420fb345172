// ============================================================
// Layer 2 — Feed-Forward Sublayer
// ============================================================
// The position-wise feed-forward network of a transformer
// block:
//
//   FFN(x) = W2 · dropout(act(W1 · x + b1)) + b2
//
//   x  : (..., f)      W1 : (f, units)     b1 : (units)
//   out: (..., f)      W2 : (units, f)     b2 : (f)
//
// Every position is transformed independently with the same
// weights, and the output keeps the input's feature width so
// the sublayer can sit inside a residual connection.
//
// Lifecycle:
//   1. FeedForwardConfig::init → unbound layer (config only)
//   2. first forward / build   → parameters allocated from
//                                the trailing input dimension
//   After step 2 the layer is locked to that feature width;
//   a different width is rejected, the same width is a no-op.
//
// Optional stages, all independent:
//   - bias          (use_bias)
//   - activation    (Activation::Linear skips it)
//   - dropout       (dropout_rate > 0, training mode only)
//
// Reference: Vaswani et al. (2017) Attention Is All You Need §3.3
//            Burn Book §3 (Building Blocks — Linear)

use burn::{module::Param, nn::Initializer, prelude::*};

use crate::domain::{
    error::{LayerError, LayerResult},
    mode::ExecutionMode,
    naming::{param_name, unique_name},
    shape,
    traits::{ConfigMap, Layer, LayerConfig},
};
use crate::ml::{
    activation::Activation,
    constraint::Constraint,
    dropout::DropoutStage,
    layer::{Forward, LayerOutput, Mask},
    regularizer::Regularizer,
};

// ─── Configuration ────────────────────────────────────────────────────────────
// #[derive(Config)] generates `new(units)`, one `with_*` builder
// per defaulted field, Clone, and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    /// Hidden width of the inner projection
    pub units: usize,

    #[config(default = "Activation::Relu")]
    pub activation: Activation,

    #[config(default = "Initializer::XavierNormal { gain: 1.0 }")]
    pub kernel_initializer: Initializer,

    pub kernel_regularizer: Option<Regularizer>,

    pub kernel_constraint: Option<Constraint>,

    #[config(default = "Initializer::Zeros")]
    pub bias_initializer: Initializer,

    pub bias_regularizer: Option<Regularizer>,

    pub bias_constraint: Option<Constraint>,

    #[config(default = true)]
    pub use_bias: bool,

    /// Probability of dropping a hidden activation while training.
    /// 0.0 means no dropout stage exists at all.
    #[config(default = 0.0)]
    pub dropout_rate: f64,

    /// Layer name; generated when left empty
    pub name: Option<String>,
}

impl LayerConfig for FeedForwardConfig {
    const CLASS_NAME: &'static str = "FeedForward";
}

impl FeedForwardConfig {
    /// Create an unbound layer. Parameters are allocated on first use.
    pub fn init<B: Backend>(&self, device: &B::Device) -> LayerResult<FeedForward<B>> {
        if self.units == 0 {
            return Err(LayerError::ZeroUnits);
        }
        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(LayerError::InvalidDropoutRate(self.dropout_rate));
        }

        let mut config = self.clone();
        if config.name.is_none() {
            config.name = Some(unique_name("feed_forward"));
        }

        Ok(FeedForward {
            config,
            device:  device.clone(),
            params:  None,
            dropout: None,
        })
    }
}

// ─── Parameters ───────────────────────────────────────────────────────────────
/// The learned tensors of a bound layer. Deriving Module makes the set
/// visible to burn optimisers and recorders.
#[derive(Module, Debug)]
pub struct FeedForwardParams<B: Backend> {
    pub w1: Param<Tensor<B, 2>>,
    pub w2: Param<Tensor<B, 2>>,
    pub b1: Option<Param<Tensor<B, 1>>>,
    pub b2: Option<Param<Tensor<B, 1>>>,
}

impl<B: Backend> FeedForwardParams<B> {
    /// Feature width the parameters were allocated for.
    pub fn feature_dim(&self) -> usize {
        self.w1.dims()[0]
    }
}

/// Name and shape of one parameter tensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamInfo {
    pub name:  String,
    pub shape: Vec<usize>,
}

// ─── Layer ────────────────────────────────────────────────────────────────────
#[derive(Debug)]
pub struct FeedForward<B: Backend> {
    config:  FeedForwardConfig,
    device:  B::Device,
    params:  Option<FeedForwardParams<B>>,
    dropout: Option<DropoutStage>,
}

impl<B: Backend> FeedForward<B> {
    /// Rebuild an equivalently configured, freshly initialised layer.
    pub fn from_config(map: ConfigMap, device: &B::Device) -> LayerResult<Self> {
        FeedForwardConfig::from_map(map)?.init(device)
    }

    pub fn params(&self) -> Option<&FeedForwardParams<B>> {
        self.params.as_ref()
    }

    pub fn feature_dim(&self) -> Option<usize> {
        self.params.as_ref().map(FeedForwardParams::feature_dim)
    }

    /// Replace the parameter set, e.g. with one restored from a record.
    /// Bias presence must match `use_bias`, and a bound layer keeps its width.
    pub fn load_params(&mut self, params: FeedForwardParams<B>) -> LayerResult<()> {
        let width = params.feature_dim();
        if let Some(bound) = self.feature_dim() {
            if bound != width {
                return Err(self.shape_locked(bound, width));
            }
        }
        let has_bias = params.b1.is_some() && params.b2.is_some();
        if has_bias != self.config.use_bias {
            return Err(LayerError::InvalidConfig(format!(
                "parameter set bias={has_bias} does not match use_bias={}",
                self.config.use_bias
            )));
        }
        self.params = Some(params);
        self.dropout = self.dropout_stage();
        Ok(())
    }

    /// Names and shapes of the allocated parameters, in creation order.
    /// Empty while the layer is unbound.
    pub fn weights(&self) -> Vec<ParamInfo> {
        let Some(p) = &self.params else {
            return Vec::new();
        };
        let name = self.name();
        let mut out = vec![
            ParamInfo { name: param_name(name, "W1"), shape: p.w1.dims().to_vec() },
            ParamInfo { name: param_name(name, "W2"), shape: p.w2.dims().to_vec() },
        ];
        if let (Some(b1), Some(b2)) = (&p.b1, &p.b2) {
            out.push(ParamInfo { name: param_name(name, "b1"), shape: b1.dims().to_vec() });
            out.push(ParamInfo { name: param_name(name, "b2"), shape: b2.dims().to_vec() });
        }
        out
    }

    /// Sum of the configured regularizer penalties over all parameters.
    /// `None` when unbound or when no regularizer is configured.
    pub fn regularization_loss(&self) -> Option<Tensor<B, 1>> {
        let p = self.params.as_ref()?;
        let mut terms = Vec::new();

        if let Some(reg) = &self.config.kernel_regularizer {
            terms.push(reg.penalty(p.w1.val()));
            terms.push(reg.penalty(p.w2.val()));
        }
        if let Some(reg) = &self.config.bias_regularizer {
            for b in [&p.b1, &p.b2].into_iter().flatten() {
                terms.push(reg.penalty(b.val()));
            }
        }

        terms.into_iter().reduce(|acc, t| acc + t)
    }

    /// Project every parameter onto its configured constraint.
    /// Meant to run right after an optimiser step; forward never calls it.
    pub fn apply_constraints(mut self) -> Self {
        let kernel = self.config.kernel_constraint;
        let bias   = self.config.bias_constraint;

        self.params = self.params.take().map(|mut p| {
            if let Some(c) = kernel {
                p.w1 = p.w1.map(|t| project(&c, t));
                p.w2 = p.w2.map(|t| project(&c, t));
            }
            if let Some(c) = bias {
                p.b1 = p.b1.map(|b| b.map(|t| project(&c, t)));
                p.b2 = p.b2.map(|b| b.map(|t| project(&c, t)));
            }
            p
        });
        self
    }

    /// Forward pass over any input of rank ≥ 2.
    pub fn forward_nd<const D: usize>(
        &mut self,
        x:    Tensor<B, D>,
        mode: ExecutionMode,
    ) -> LayerResult<Tensor<B, D>> {
        let dims = x.dims();
        if D < 2 {
            return Err(LayerError::RankMismatch { expected: 2, shape: dims.to_vec() });
        }
        self.build(&dims)?;

        let params = self.bound()?;
        let mut hidden = linear(x, &params.w1, params.b1.as_ref());
        if self.config.activation != Activation::Linear {
            hidden = self.config.activation.apply(hidden);
        }
        if let Some(dropout) = &self.dropout {
            hidden = dropout.forward(hidden, mode);
        }
        Ok(linear(hidden, &params.w2, params.b2.as_ref()))
    }

    fn bound(&self) -> LayerResult<&FeedForwardParams<B>> {
        self.params.as_ref().ok_or_else(|| {
            LayerError::InvalidConfig(format!("layer `{}` has no parameters", self.name()))
        })
    }

    fn dropout_stage(&self) -> Option<DropoutStage> {
        (self.config.dropout_rate > 0.0).then(|| DropoutStage::new(self.config.dropout_rate))
    }

    fn shape_locked(&self, bound: usize, got: usize) -> LayerError {
        LayerError::ShapeLocked { layer: self.name().to_string(), bound, got }
    }
}

/// Constrain a parameter value outside the autodiff graph, keeping it
/// trainable if it was before.
fn project<B: Backend, const D: usize>(c: &Constraint, t: Tensor<B, D>) -> Tensor<B, D> {
    let require_grad = t.is_require_grad();
    c.apply(t.detach()).set_require_grad(require_grad)
}

/// `x · W (+ b)` over the trailing axis of `x`.
fn linear<B: Backend, const D: usize>(
    x: Tensor<B, D>,
    w: &Param<Tensor<B, 2>>,
    b: Option<&Param<Tensor<B, 1>>>,
) -> Tensor<B, D> {
    let out = x.matmul(w.val().unsqueeze());
    match b {
        Some(b) => out + b.val().unsqueeze(),
        None    => out,
    }
}

impl<B: Backend> Layer for FeedForward<B> {
    type Config = FeedForwardConfig;

    fn name(&self) -> &str {
        self.config.name.as_deref().unwrap_or("feed_forward")
    }

    fn config(&self) -> &FeedForwardConfig {
        &self.config
    }

    /// Allocate W1/W2 (and b1/b2) for the trailing dimension of
    /// `input_shape`. Runs once; later calls only check the width.
    fn build(&mut self, input_shape: &[usize]) -> LayerResult<()> {
        let feature_dim = shape::feature_dim(input_shape)?;
        if let Some(bound) = self.feature_dim() {
            if bound == feature_dim {
                return Ok(());
            }
            return Err(self.shape_locked(bound, feature_dim));
        }

        let units  = self.config.units;
        let device = &self.device;
        let kernel = &self.config.kernel_initializer;
        let bias   = &self.config.bias_initializer;

        let w1 = kernel.init_with([feature_dim, units], Some(feature_dim), Some(units), device);
        let w2 = kernel.init_with([units, feature_dim], Some(units), Some(feature_dim), device);
        let (b1, b2) = if self.config.use_bias {
            (
                Some(bias.init_with([units], Some(feature_dim), Some(units), device)),
                Some(bias.init_with([feature_dim], Some(units), Some(feature_dim), device)),
            )
        } else {
            (None, None)
        };

        self.params  = Some(FeedForwardParams { w1, w2, b1, b2 });
        self.dropout = self.dropout_stage();

        tracing::debug!(
            "Built `{}`: feature_dim={} units={} bias={} dropout={}",
            self.name(), feature_dim, units, self.config.use_bias, self.config.dropout_rate,
        );
        Ok(())
    }

    fn is_built(&self) -> bool {
        self.params.is_some()
    }

    fn compute_output_shape(&self, input_shape: &[usize]) -> LayerResult<Vec<usize>> {
        shape::feed_forward_output_shape(input_shape)
    }
}

impl<B: Backend, const D: usize> Forward<B, Tensor<B, D>> for FeedForward<B> {
    type Output = Tensor<B, D>;

    fn forward(
        &mut self,
        input: Tensor<B, D>,
        mask:  Option<Mask<B>>,
        mode:  ExecutionMode,
    ) -> LayerResult<LayerOutput<B, Tensor<B, D>>> {
        let tensor = self.forward_nd(input, mode)?;
        Ok(LayerOutput { tensor, mask: self.compute_mask(mask) })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray;

    #[test]
    fn test_defaults_follow_the_transformer_paper() {
        let cfg = FeedForwardConfig::new(64);
        assert_eq!(cfg.activation, Activation::Relu);
        assert!(cfg.use_bias);
        assert_eq!(cfg.dropout_rate, 0.0);
        assert!(cfg.kernel_regularizer.is_none());
        assert!(cfg.bias_constraint.is_none());
    }

    #[test]
    fn test_unbound_until_first_shape() {
        let device = Default::default();
        let mut ff = FeedForwardConfig::new(8).init::<TB>(&device).unwrap();
        assert!(!ff.is_built());
        assert!(ff.weights().is_empty());

        ff.build(&[2, 3, 5]).unwrap();
        assert!(ff.is_built());
        assert_eq!(ff.feature_dim(), Some(5));
    }

    #[test]
    fn test_rebinding_same_width_is_a_no_op() {
        let device = Default::default();
        let mut ff = FeedForwardConfig::new(8).init::<TB>(&device).unwrap();
        ff.build(&[2, 3, 5]).unwrap();
        let before = ff.params().unwrap().w1.val().into_data().to_vec::<f32>().unwrap();

        ff.build(&[7, 5]).unwrap();
        let after = ff.params().unwrap().w1.val().into_data().to_vec::<f32>().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_rebinding_other_width_is_rejected() {
        let device = Default::default();
        let mut ff = FeedForwardConfig::new(8)
            .with_name(Some("ffn".into()))
            .init::<TB>(&device)
            .unwrap();
        ff.build(&[2, 3, 5]).unwrap();
        assert_eq!(
            ff.build(&[2, 3, 6]),
            Err(LayerError::ShapeLocked { layer: "ffn".into(), bound: 5, got: 6 })
        );
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let device = Default::default();
        assert_eq!(
            FeedForwardConfig::new(0).init::<TB>(&device).unwrap_err(),
            LayerError::ZeroUnits
        );
        assert_eq!(
            FeedForwardConfig::new(4).with_dropout_rate(1.0).init::<TB>(&device).unwrap_err(),
            LayerError::InvalidDropoutRate(1.0)
        );
    }

    #[test]
    fn test_weight_names_and_shapes() {
        let device = Default::default();
        let mut ff = FeedForwardConfig::new(16)
            .with_name(Some("ffn".into()))
            .init::<TB>(&device)
            .unwrap();
        ff.build(&[1, 4]).unwrap();

        let w = ff.weights();
        assert_eq!(w[0], ParamInfo { name: "ffn_W1".into(), shape: vec![4, 16] });
        assert_eq!(w[1], ParamInfo { name: "ffn_W2".into(), shape: vec![16, 4] });
        assert_eq!(w[2], ParamInfo { name: "ffn_b1".into(), shape: vec![16] });
        assert_eq!(w[3], ParamInfo { name: "ffn_b2".into(), shape: vec![4] });
    }

    #[test]
    fn test_rank_one_input_is_rejected() {
        let device = Default::default();
        let mut ff = FeedForwardConfig::new(4).init::<TB>(&device).unwrap();
        let x = Tensor::<TB, 1>::ones([3], &device);
        assert!(matches!(
            ff.forward_nd(x, ExecutionMode::Inference),
            Err(LayerError::RankMismatch { .. })
        ));
        assert!(!ff.is_built());
    }
}
