// ============================================================
// Layer 1 — Core Traits (Abstractions)
// ============================================================
// The narrow contract every layer in this crate satisfies:
//
//   construct       → a `*Config` value plus `init`
//   build           → bind to an input shape (one-way)
//   output shape    → static inference from the input shape
//   mask            → what happens to a padding mask
//   export config   → a flat name → value mapping
//
// Evaluation itself needs tensors, so it lives next to the
// burn code in `ml::layer::Forward`. Everything here is plain
// Rust and serde.
//
// There is no base class to inherit from: a layer is any type
// that implements `Layer`, and gets `Forward` for each input
// tensor type it accepts.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::domain::error::{LayerError, LayerResult};

/// Flat mapping of constructor argument name → serialized value.
pub type ConfigMap = Map<String, Value>;

// ─── LayerConfig ──────────────────────────────────────────────────────────────
/// A layer configuration that can be flattened to a [`ConfigMap`] and
/// rebuilt from one.
pub trait LayerConfig: Serialize + DeserializeOwned + Clone {
    /// Class name used when registering the layer by name.
    const CLASS_NAME: &'static str;

    fn to_map(&self) -> LayerResult<ConfigMap> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(LayerError::InvalidConfig(format!(
                "{} config serialized to a non-object: {other}",
                Self::CLASS_NAME
            ))),
            Err(e) => Err(LayerError::InvalidConfig(e.to_string())),
        }
    }

    fn from_map(map: ConfigMap) -> LayerResult<Self> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| LayerError::InvalidConfig(format!("{}: {e}", Self::CLASS_NAME)))
    }
}

// ─── Layer ────────────────────────────────────────────────────────────────────
/// Shape- and config-level behaviour shared by all layers.
pub trait Layer {
    type Config: LayerConfig;

    fn name(&self) -> &str;

    /// Configuration with every field resolved (including the name).
    fn config(&self) -> &Self::Config;

    /// Bind the layer to an input shape. Layers without parameters have
    /// nothing to bind.
    fn build(&mut self, input_shape: &[usize]) -> LayerResult<()> {
        let _ = input_shape;
        Ok(())
    }

    fn is_built(&self) -> bool {
        true
    }

    fn compute_output_shape(&self, input_shape: &[usize]) -> LayerResult<Vec<usize>>;

    fn supports_masking(&self) -> bool {
        true
    }

    /// Masks pass through unchanged unless a layer says otherwise.
    fn compute_mask<M>(&self, mask: Option<M>) -> Option<M> {
        mask
    }

    fn get_config(&self) -> LayerResult<ConfigMap> {
        self.config().to_map()
    }
}
