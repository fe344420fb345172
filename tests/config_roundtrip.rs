mod common;

use burn::{nn::Initializer, prelude::*};
use seq_blocks::{
    infra::layer_store::LayerStore, Activation, AnyLayer, Constraint, FeedForward,
    FeedForwardConfig, Layer, LayerConfig, LayerSpec, Regularizer, SineCosinePositionEmbedding,
    SineCosinePositionEmbeddingConfig,
};
use serde_json::json;
use tempfile::tempdir;

use common::{assert_close, init_tracing, values, TB};

fn custom_ffn_config() -> FeedForwardConfig {
    FeedForwardConfig::new(32)
        .with_activation(Activation::GeluTanh)
        .with_kernel_initializer(Initializer::Uniform { min: -1.0, max: 1.0 })
        .with_kernel_regularizer(Some(Regularizer::L2 { l2: 0.125 }))
        .with_kernel_constraint(Some(Constraint::MaxNorm { max_value: 2.0, axis: 0 }))
        .with_bias_constraint(Some(Constraint::NonNeg))
        .with_use_bias(false)
        .with_dropout_rate(0.25)
        .with_name(Some("ffn_custom".into()))
}

#[test]
fn test_feed_forward_config_is_flat_and_complete() {
    let device = Default::default();
    let ffn = custom_ffn_config().init::<TB>(&device).unwrap();
    let map = ffn.get_config().unwrap();

    for key in [
        "units",
        "activation",
        "kernel_initializer",
        "kernel_regularizer",
        "kernel_constraint",
        "bias_initializer",
        "bias_regularizer",
        "bias_constraint",
        "use_bias",
        "dropout_rate",
        "name",
    ] {
        assert!(map.contains_key(key), "missing `{key}`");
    }
    assert_eq!(map["units"], 32);
    assert_eq!(map["activation"], "gelu_tanh");
    assert_eq!(map["use_bias"], false);
    assert_eq!(map["dropout_rate"], 0.25);
    assert_eq!(map["kernel_constraint"], json!({"class_name": "max_norm", "max_value": 2.0, "axis": 0}));
    assert_eq!(map["name"], "ffn_custom");
}

#[test]
fn test_feed_forward_round_trip() {
    let device = Default::default();
    let original = custom_ffn_config().init::<TB>(&device).unwrap();
    let map = original.get_config().unwrap();

    let rebuilt = FeedForward::<TB>::from_config(map.clone(), &device).unwrap();
    assert_eq!(rebuilt.get_config().unwrap(), map);
    assert_eq!(rebuilt.name(), "ffn_custom");
    assert!(!rebuilt.is_built());
}

#[test]
fn test_unnamed_layers_export_their_generated_name() {
    let device = Default::default();
    let a = FeedForwardConfig::new(4).init::<TB>(&device).unwrap();
    let b = FeedForwardConfig::new(4).init::<TB>(&device).unwrap();
    assert_ne!(a.name(), b.name());

    let map = a.get_config().unwrap();
    assert_eq!(map["name"], a.name());
    let rebuilt = FeedForward::<TB>::from_config(map, &device).unwrap();
    assert_eq!(rebuilt.name(), a.name());
}

#[test]
fn test_position_round_trip_every_mode() {
    for cfg in [
        SineCosinePositionEmbeddingConfig::expand(8),
        SineCosinePositionEmbeddingConfig::add().with_output_dim(Some(5)),
        SineCosinePositionEmbeddingConfig::concat(4),
    ] {
        let original = cfg.init().unwrap();
        let map = original.get_config().unwrap();
        assert_eq!(map["mode"], original.mode().to_string());

        let rebuilt = SineCosinePositionEmbedding::from_config(map.clone()).unwrap();
        assert_eq!(rebuilt.get_config().unwrap(), map);
        assert_eq!(rebuilt.mode(), original.mode());
    }
}

#[test]
fn test_add_mode_keeps_ignored_output_dim_in_config() {
    let enc = SineCosinePositionEmbeddingConfig::add()
        .with_output_dim(Some(5))
        .init()
        .unwrap();
    assert_eq!(enc.get_config().unwrap()["output_dim"], 5);
}

#[test]
fn test_invalid_map_is_rejected() {
    let mut map = SineCosinePositionEmbeddingConfig::expand(8).to_map().unwrap();
    map.insert("output_dim".into(), json!("eight"));
    assert!(SineCosinePositionEmbedding::from_config(map).is_err());
}

#[test]
fn test_layer_spec_envelope_round_trip() {
    let device = Default::default();
    let ffn = custom_ffn_config().init::<TB>(&device).unwrap();

    let value = LayerSpec::from(&ffn).to_value().unwrap();
    assert_eq!(value["class_name"], "FeedForward");

    let layer = LayerSpec::from_value(value).unwrap().build::<TB>(&device).unwrap();
    match &layer {
        AnyLayer::FeedForward(rebuilt) => {
            assert_eq!(rebuilt.get_config().unwrap(), ffn.get_config().unwrap())
        }
        other => panic!("expected a FeedForward, got {}", other.name()),
    }
    assert_eq!(layer.spec().class_name(), "FeedForward");
}

#[test]
fn test_burn_config_file_round_trip() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("ffn.json");

    let cfg = custom_ffn_config();
    cfg.save(&path).unwrap();
    let loaded = FeedForwardConfig::load(&path).unwrap();
    assert_eq!(loaded.to_map().unwrap(), cfg.to_map().unwrap());
}

#[test]
fn test_store_restores_config_and_parameters() {
    init_tracing();
    let device = Default::default();
    let tmp = tempdir().unwrap();
    let store = LayerStore::new(tmp.path().join("layers")).unwrap();

    let mut ffn = FeedForwardConfig::new(6)
        .with_kernel_initializer(Initializer::Uniform { min: -1.0, max: 1.0 })
        .with_bias_initializer(Initializer::Uniform { min: -1.0, max: 1.0 })
        .with_name(Some("ffn_stored".into()))
        .init::<TB>(&device)
        .unwrap();
    ffn.build(&[2, 4]).unwrap();
    store.save_feed_forward(&ffn).unwrap();

    let restored = store.load_feed_forward::<TB>("ffn_stored", &device).unwrap();
    assert_eq!(restored.get_config().unwrap(), ffn.get_config().unwrap());
    assert_eq!(restored.feature_dim(), Some(4));

    // CompactRecorder stores half precision
    let (a, b) = (ffn.params().unwrap(), restored.params().unwrap());
    assert_close(&values(b.w1.val()), &values(a.w1.val()), 1e-2);
    assert_close(&values(b.w2.val()), &values(a.w2.val()), 1e-2);
    assert_close(
        &values(b.b1.as_ref().unwrap().val()),
        &values(a.b1.as_ref().unwrap().val()),
        1e-2,
    );
}

#[test]
fn test_store_keeps_unbound_layers_unbound() {
    let device = Default::default();
    let tmp = tempdir().unwrap();
    let store = LayerStore::new(tmp.path()).unwrap();

    let ffn = FeedForwardConfig::new(3)
        .with_name(Some("ffn_unbound".into()))
        .init::<TB>(&device)
        .unwrap();
    store.save_feed_forward(&ffn).unwrap();

    let restored = store.load_feed_forward::<TB>("ffn_unbound", &device).unwrap();
    assert!(!restored.is_built());
}

#[test]
fn test_store_refuses_wrong_class() {
    let device = Default::default();
    let tmp = tempdir().unwrap();
    let store = LayerStore::new(tmp.path()).unwrap();

    let enc = SineCosinePositionEmbeddingConfig::concat(4)
        .with_name(Some("pos".into()))
        .init()
        .unwrap();
    store.save_spec(enc.name(), &LayerSpec::from(&enc)).unwrap();

    assert!(matches!(
        store.load_spec("pos").unwrap(),
        LayerSpec::SineCosinePositionEmbedding(_)
    ));
    assert!(store.load_feed_forward::<TB>("pos", &device).is_err());
}
