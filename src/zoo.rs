//! Catalog of hosted backbones suitable for transfer learning
//!
//! Each entry records where a converted layers model lives and which of its
//! layers marks the feature-extraction cut point.

use serde::{Deserialize, Serialize};

/// A hosted backbone: artifact location plus the facts needed to graft a
/// classifier head onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackboneSpec {
    /// Short identifier, e.g. `mobilenet_v1_0.25_224`
    pub name: String,
    /// Absolute URL of the hosted `model.json`
    pub url: String,
    /// Name of the layer whose output serves as the extracted features
    pub feature_layer: String,
    /// Per-sample input shape the backbone was trained for, `[h, w, c]`
    pub input_shape: Vec<usize>,
}

impl BackboneSpec {
    /// MobileNet v1, width multiplier 0.25, 224x224 RGB input.
    ///
    /// Small enough to retrain interactively; the feature cut after the last
    /// pointwise convolution's activation yields a `[7, 7, 256]` map.
    #[must_use]
    pub fn mobilenet_v1_025_224() -> Self {
        Self {
            name: "mobilenet_v1_0.25_224".to_string(),
            url: "https://storage.googleapis.com/tfjs-models/tfjs/mobilenet_v1_0.25_224/model.json"
                .to_string(),
            feature_layer: "conv_pw_13_relu".to_string(),
            input_shape: vec![224, 224, 3],
        }
    }
}
