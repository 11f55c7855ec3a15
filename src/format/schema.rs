//! Serde schema for TensorFlow.js layers-model artifacts
//!
//! Mirrors the `model.json` documents produced by the Keras converter. The
//! format drifted over converter versions, so the schema is deliberately
//! lenient: unknown fields are ignored, variant spellings are folded together
//! with untagged enums, and per-layer settings all default. Field-level
//! validation happens in [`super::decode`], not here.

use serde::{Deserialize, Serialize};

/// A complete `model.json` document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelArtifact {
    /// The layer graph, possibly wrapped in converter metadata
    pub model_topology: ModelTopology,

    /// Where the weight shards live and what each shard holds
    #[serde(default)]
    pub weights_manifest: Vec<WeightsGroup>,

    /// Artifact format tag, e.g. `layers-model`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_by: Option<String>,
}

/// Keras-converted artifacts nest the graph under `model_config` next to
/// converter metadata; hand-written ones store it directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelTopology {
    Wrapped {
        model_config: ModelConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        keras_version: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        backend: Option<String>,
    },
    Direct(ModelConfig),
}

impl ModelTopology {
    /// The layer graph, whichever way it was stored
    #[must_use]
    pub fn model_config(&self) -> &ModelConfig {
        match self {
            Self::Wrapped { model_config, .. } => model_config,
            Self::Direct(config) => config,
        }
    }
}

/// The serialized model: `Model` (functional) or `Sequential`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub class_name: String,
    pub config: GraphConfig,
}

/// Model body. Functional models and recent Sequential models use the named
/// form; Keras <= 2.2 serialized Sequential bodies as a bare layer list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphConfig {
    Named {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default)]
        layers: Vec<LayerSpec>,
    },
    Layers(Vec<LayerSpec>),
}

impl GraphConfig {
    /// Layers in declaration order
    #[must_use]
    pub fn layers(&self) -> &[LayerSpec] {
        match self {
            Self::Named { layers, .. } => layers,
            Self::Layers(layers) => layers,
        }
    }

    /// The serialized model name, when one was stored
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Named { name, .. } => name.as_deref(),
            Self::Layers(_) => None,
        }
    }
}

/// One serialized layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    pub class_name: String,

    /// Functional models repeat the layer name at this level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub config: LayerConfig,
}

impl LayerSpec {
    /// The layer's name, preferring the one inside `config`
    #[must_use]
    pub fn layer_name(&self) -> Option<&str> {
        self.config.name.as_deref().or(self.name.as_deref())
    }
}

/// Union of the per-class `config` fields this crate understands. Every field
/// defaults so one struct can read any supported class; which fields are
/// required for which class is decided during decoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Input declaration, batch dimension first and usually `null`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_input_shape: Option<Vec<Option<usize>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trainable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_size: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pool_size: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strides: Option<Vec<usize>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_format: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_bias: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kernel_initializer: Option<InitializerSpec>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth_multiplier: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsilon: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub momentum: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_shape: Option<Vec<usize>>,
}

/// Initializers appear both as bare names and as full class records
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InitializerSpec {
    Name(String),
    Class {
        class_name: String,
        #[serde(default)]
        config: serde_json::Value,
    },
}

impl InitializerSpec {
    /// The initializer's class name, whichever way it was spelled
    #[must_use]
    pub fn class_name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Class { class_name, .. } => class_name,
        }
    }
}

/// One entry of `weightsManifest`: shard files plus the weights they carry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightsGroup {
    /// Shard file names, relative to the `model.json` URL
    pub paths: Vec<String>,

    #[serde(default)]
    pub weights: Vec<WeightSpec>,
}

/// One named weight tensor inside a shard group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightSpec {
    pub name: String,
    pub shape: Vec<usize>,
    #[serde(default = "default_dtype")]
    pub dtype: String,
}

fn default_dtype() -> String {
    "float32".to_string()
}
