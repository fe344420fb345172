// ============================================================
// Layer 3 — Layer Store
// ============================================================
// Persists layer configurations (and, for feed-forward layers,
// their learned parameters) in a directory.
//
// What gets written per layer `name`:
//   1. {name}.json              — {class_name, config} envelope
//   2. {name}_binding.json      — feature width the layer was
//                                 bound to (bound layers only)
//   3. {name}_params.mpk        — parameter record, written by
//                                 burn's CompactRecorder
//
// Why keep the binding separately?
//   A record can only be loaded into a module of the right
//   shape. The config alone does not say which feature width
//   W1/W2 were allocated for, so the store rebuilds the layer,
//   binds it to the saved width, then loads the weights.
//
// Reference: Burn Book §5 (Records and Checkpointing)
//            Rust Book §9 (Error Handling)

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::domain::traits::Layer;
use crate::ml::{
    feed_forward::FeedForward,
    registry::LayerSpec,
};

/// Directory-backed store for layer configs and parameter records.
pub struct LayerStore {
    dir: PathBuf,
}

impl LayerStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create layer store at '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Write the `{class_name, config}` envelope for a layer.
    pub fn save_spec(&self, name: &str, spec: &LayerSpec) -> Result<PathBuf> {
        let path = self.spec_path(name);
        let json = serde_json::to_string_pretty(&spec.to_value()?)?;

        fs::write(&path, json)
            .with_context(|| format!("Cannot write layer config to '{}'", path.display()))?;

        tracing::info!("Saved {} config `{}` to '{}'", spec.class_name(), name, path.display());
        Ok(path)
    }

    pub fn load_spec(&self, name: &str) -> Result<LayerSpec> {
        let path = self.spec_path(name);
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read layer config from '{}'", path.display()))?;

        let spec = LayerSpec::from_value(serde_json::from_str(&json)?)
            .with_context(|| format!("Invalid layer config in '{}'", path.display()))?;

        tracing::info!("Loaded {} config `{}`", spec.class_name(), name);
        Ok(spec)
    }

    /// Save a feed-forward layer: config always, parameters if bound.
    pub fn save_feed_forward<B: Backend>(&self, layer: &FeedForward<B>) -> Result<()> {
        let name = layer.name();
        self.save_spec(name, &LayerSpec::from(layer))?;

        let Some(params) = layer.params() else {
            tracing::debug!("`{}` is unbound; no parameters to record", name);
            return Ok(());
        };

        let binding = self.binding_path(name);
        fs::write(&binding, serde_json::to_string(&params.feature_dim())?)
            .with_context(|| format!("Cannot write '{}'", binding.display()))?;

        let path = self.params_path(name);
        CompactRecorder::new()
            .record(params.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save parameters to '{}'", path.display()))?;

        tracing::debug!("Saved parameters of `{}`", name);
        Ok(())
    }

    /// Rebuild a feed-forward layer, restoring its parameters when a
    /// record was saved.
    pub fn load_feed_forward<B: Backend>(
        &self,
        name:   &str,
        device: &B::Device,
    ) -> Result<FeedForward<B>> {
        let config = match self.load_spec(name)? {
            LayerSpec::FeedForward(config) => config,
            other => bail!("`{}` is a {}, not a FeedForward layer", name, other.class_name()),
        };
        let mut layer = config.init::<B>(device)?;

        let binding = self.binding_path(name);
        if !binding.exists() {
            return Ok(layer);
        }
        let feature_dim: usize = serde_json::from_str(
            &fs::read_to_string(&binding)
                .with_context(|| format!("Cannot read '{}'", binding.display()))?,
        )?;
        layer.build(&[feature_dim])?;

        let path   = self.params_path(name);
        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| format!("Cannot load parameters from '{}'", path.display()))?;

        let params = layer
            .params()
            .context("layer has no parameters after build")?
            .clone()
            .load_record(record);
        layer.load_params(params)?;

        tracing::info!("Restored `{}` (feature_dim={})", name, feature_dim);
        Ok(layer)
    }

    fn spec_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn binding_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}_binding.json"))
    }

    /// Without extension; the recorder adds its own.
    fn params_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}_params"))
    }
}
