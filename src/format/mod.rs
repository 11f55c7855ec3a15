//! TensorFlow.js layers-model artifact format
//!
//! A layers model ships as a `model.json` document (layer graph plus a
//! weights manifest) next to binary shard files. This module parses the
//! document and decodes its graph into a [`crate::network::Network`].

mod decode;
mod schema;

pub use decode::decode_network;
pub use schema::{
    GraphConfig, InitializerSpec, LayerConfig, LayerSpec, ModelArtifact, ModelConfig,
    ModelTopology, WeightSpec, WeightsGroup,
};

use crate::error::Result;

/// Parse a `model.json` document.
///
/// # Errors
///
/// `Json` when the document is not valid JSON or does not match the
/// layers-model schema.
pub fn parse_artifact(json: &str) -> Result<ModelArtifact> {
    Ok(serde_json::from_str(json)?)
}
