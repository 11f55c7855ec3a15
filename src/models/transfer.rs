//! Transfer-learning classifier over a pretrained backbone

use crate::error::Result;
use crate::fetch::LayersClient;
use crate::format::decode_network;
use crate::layers::{Activation, Initializer, LayerKind, Padding};
use crate::network::Network;
use crate::zoo::BackboneSpec;

/// Assemble a `num_classes` classifier on top of the hosted MobileNet v1
/// 0.25 backbone: fetch, truncate at its feature layer, optionally freeze
/// everything pretrained, and graft a fresh classification head.
///
/// # Errors
///
/// `Http`/`Status` when the hosted artifact cannot be fetched;
/// `LayerNotFound` when the feature layer is missing from what the host
/// served (the hosted schema changed); decode errors when the artifact no
/// longer parses. Nothing is retried here.
pub fn mobilenet_classifier(num_classes: usize, freeze: bool) -> Result<Network> {
    let client = LayersClient::new()?;
    mobilenet_classifier_with(
        &client,
        &BackboneSpec::mobilenet_v1_025_224(),
        num_classes,
        freeze,
    )
}

/// [`mobilenet_classifier`] with an explicit client and backbone, for
/// callers that manage their own cache location or pin a different hosted
/// model.
///
/// # Errors
///
/// Same as [`mobilenet_classifier`].
pub fn mobilenet_classifier_with(
    client: &LayersClient,
    backbone: &BackboneSpec,
    num_classes: usize,
    freeze: bool,
) -> Result<Network> {
    let artifact = client.fetch_artifact(&backbone.url)?;
    let mut net = decode_network(&artifact)?;

    net.truncate_at(&backbone.feature_layer)?;
    if freeze {
        net.set_trainable(false);
    }

    graft_classifier_head(net, num_classes)
}

/// Append the classification head to a truncated backbone: global average
/// pooling, reshape to a `1x1xC` map, a light dropout, a `1x1` convolution
/// projecting to `num_classes` channels, reshape to a flat vector, then a
/// softmax activation. Head layers are always trainable, whatever the
/// backbone's flags say.
///
/// # Errors
///
/// Shape errors when the backbone's output is not a `[h, w, c]` feature map.
pub fn graft_classifier_head(mut backbone: Network, num_classes: usize) -> Result<Network> {
    // Channel count at the feature cut; the pooled vector is reshaped back
    // into a degenerate feature map so a 1x1 convolution can project it
    let channels = backbone.output_shape().last().copied().unwrap_or(0);

    backbone.push(LayerKind::GlobalAvgPool2d)?;
    backbone.push(LayerKind::Reshape {
        target: vec![1, 1, channels],
    })?;
    backbone.push(LayerKind::Dropout { rate: 0.001 })?;
    backbone.push(LayerKind::Conv2d {
        filters: num_classes,
        kernel: (1, 1),
        strides: (1, 1),
        padding: Padding::Valid,
        activation: Activation::Linear,
        use_bias: true,
        kernel_initializer: Initializer::GlorotUniform,
    })?;
    backbone.push(LayerKind::Reshape {
        target: vec![num_classes],
    })?;
    backbone.push(LayerKind::Activation {
        activation: Activation::Softmax,
    })?;

    Ok(backbone)
}
