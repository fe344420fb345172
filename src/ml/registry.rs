// ============================================================
// Layer 2 — Layer Registry
// ============================================================
// Maps class names to layer configs so a layer can be stored
// as a self-describing envelope and rebuilt without knowing
// its type up front:
//
//   {
//     "class_name": "FeedForward",
//     "config":     { "units": 64, "activation": "relu", ... }
//   }
//
// `config` is exactly the flat mapping returned by
// `Layer::get_config`, so a rebuilt layer has the same
// configuration (and fresh parameters).

use burn::prelude::*;
use serde_json::{json, Value};

use crate::domain::{
    error::{LayerError, LayerResult},
    traits::{ConfigMap, Layer, LayerConfig},
};
use crate::ml::{
    feed_forward::{FeedForward, FeedForwardConfig},
    position::{SineCosinePositionEmbedding, SineCosinePositionEmbeddingConfig},
};

/// Class names this crate can rebuild.
pub fn custom_objects() -> [&'static str; 2] {
    [
        FeedForwardConfig::CLASS_NAME,
        SineCosinePositionEmbeddingConfig::CLASS_NAME,
    ]
}

// ─── LayerSpec ────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub enum LayerSpec {
    FeedForward(FeedForwardConfig),
    SineCosinePositionEmbedding(SineCosinePositionEmbeddingConfig),
}

impl LayerSpec {
    pub fn class_name(&self) -> &'static str {
        match self {
            LayerSpec::FeedForward(_)                 => FeedForwardConfig::CLASS_NAME,
            LayerSpec::SineCosinePositionEmbedding(_) => SineCosinePositionEmbeddingConfig::CLASS_NAME,
        }
    }

    /// Rebuild a spec from a class name and a flat config mapping.
    pub fn from_parts(class_name: &str, config: ConfigMap) -> LayerResult<Self> {
        if class_name == FeedForwardConfig::CLASS_NAME {
            Ok(LayerSpec::FeedForward(FeedForwardConfig::from_map(config)?))
        } else if class_name == SineCosinePositionEmbeddingConfig::CLASS_NAME {
            Ok(LayerSpec::SineCosinePositionEmbedding(
                SineCosinePositionEmbeddingConfig::from_map(config)?,
            ))
        } else {
            Err(LayerError::UnknownLayer(class_name.to_string()))
        }
    }

    pub fn config_map(&self) -> LayerResult<ConfigMap> {
        match self {
            LayerSpec::FeedForward(c)                 => c.to_map(),
            LayerSpec::SineCosinePositionEmbedding(c) => c.to_map(),
        }
    }

    /// `{"class_name": ..., "config": {...}}`
    pub fn to_value(&self) -> LayerResult<Value> {
        Ok(json!({
            "class_name": self.class_name(),
            "config":     Value::Object(self.config_map()?),
        }))
    }

    pub fn from_value(value: Value) -> LayerResult<Self> {
        let class_name = value
            .get("class_name")
            .and_then(Value::as_str)
            .ok_or_else(|| LayerError::InvalidConfig("missing `class_name`".into()))?
            .to_string();
        let config = match value.get("config") {
            Some(Value::Object(map)) => map.clone(),
            _ => return Err(LayerError::InvalidConfig("missing `config` object".into())),
        };
        Self::from_parts(&class_name, config)
    }

    /// Instantiate the layer this spec describes, unbound.
    pub fn build<B: Backend>(&self, device: &B::Device) -> LayerResult<AnyLayer<B>> {
        Ok(match self {
            LayerSpec::FeedForward(c)                 => AnyLayer::FeedForward(c.init(device)?),
            LayerSpec::SineCosinePositionEmbedding(c) => AnyLayer::SineCosinePositionEmbedding(c.init()?),
        })
    }
}

impl<B: Backend> From<&FeedForward<B>> for LayerSpec {
    fn from(layer: &FeedForward<B>) -> Self {
        LayerSpec::FeedForward(layer.config().clone())
    }
}

impl From<&SineCosinePositionEmbedding> for LayerSpec {
    fn from(layer: &SineCosinePositionEmbedding) -> Self {
        LayerSpec::SineCosinePositionEmbedding(layer.config().clone())
    }
}

// ─── AnyLayer ─────────────────────────────────────────────────────────────────
/// A layer rebuilt from a spec whose type was only known at runtime.
#[derive(Debug)]
pub enum AnyLayer<B: Backend> {
    FeedForward(FeedForward<B>),
    SineCosinePositionEmbedding(SineCosinePositionEmbedding),
}

impl<B: Backend> AnyLayer<B> {
    pub fn name(&self) -> &str {
        match self {
            AnyLayer::FeedForward(l)                 => l.name(),
            AnyLayer::SineCosinePositionEmbedding(l) => l.name(),
        }
    }

    pub fn get_config(&self) -> LayerResult<ConfigMap> {
        match self {
            AnyLayer::FeedForward(l)                 => l.get_config(),
            AnyLayer::SineCosinePositionEmbedding(l) => l.get_config(),
        }
    }

    pub fn compute_output_shape(&self, input_shape: &[usize]) -> LayerResult<Vec<usize>> {
        match self {
            AnyLayer::FeedForward(l)                 => l.compute_output_shape(input_shape),
            AnyLayer::SineCosinePositionEmbedding(l) => l.compute_output_shape(input_shape),
        }
    }

    pub fn spec(&self) -> LayerSpec {
        match self {
            AnyLayer::FeedForward(l)                 => LayerSpec::from(l),
            AnyLayer::SineCosinePositionEmbedding(l) => LayerSpec::from(l),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TB = NdArray;

    #[test]
    fn test_registered_names() {
        assert_eq!(custom_objects(), ["FeedForward", "SineCosinePositionEmbedding"]);
    }

    #[test]
    fn test_envelope_shape() {
        let spec = LayerSpec::SineCosinePositionEmbedding(SineCosinePositionEmbeddingConfig::concat(8));
        let v = spec.to_value().unwrap();
        assert_eq!(v["class_name"], "SineCosinePositionEmbedding");
        assert_eq!(v["config"]["mode"], "concat");
        assert_eq!(v["config"]["output_dim"], 8);
    }

    #[test]
    fn test_unknown_class_is_rejected() {
        let err = LayerSpec::from_parts("MultiHeadAttention", ConfigMap::new()).unwrap_err();
        assert_eq!(err, LayerError::UnknownLayer("MultiHeadAttention".into()));
    }

    #[test]
    fn test_build_from_envelope() {
        let device = Default::default();
        let v = json!({
            "class_name": "SineCosinePositionEmbedding",
            "config": { "mode": "expand", "output_dim": 8, "name": "pos" }
        });
        let layer = LayerSpec::from_value(v).unwrap().build::<TB>(&device).unwrap();
        assert_eq!(layer.name(), "pos");
        assert_eq!(layer.compute_output_shape(&[2, 5]).unwrap(), vec![2, 5, 8]);
    }

    #[test]
    fn test_invalid_mode_fails_on_build_not_parse() {
        let device = Default::default();
        let v = json!({
            "class_name": "SineCosinePositionEmbedding",
            "config": { "mode": "stack", "output_dim": null, "name": null }
        });
        let spec = LayerSpec::from_value(v).unwrap();
        assert!(matches!(spec.build::<TB>(&device), Err(LayerError::UnsupportedMode(_))));
    }
}
