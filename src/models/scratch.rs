//! Small convolutional classifier trained from scratch

use crate::error::Result;
use crate::layers::{Activation, Initializer, LayerKind, Padding};
use crate::network::Network;

/// Assemble the fixed 9-layer convolutional classifier for `num_classes`
/// outputs over 224x224 RGB input.
///
/// The topology is reproduced layer for layer from the application this
/// crate serves, quirks included: every hidden layer uses a constant `ones`
/// kernel initializer, and the layer before the softmax output is a second
/// `num_classes`-sized dense layer with relu activation. Downstream training
/// data depends on the exact layer count and ordering, so neither is
/// corrected here.
///
/// # Errors
///
/// Shape errors from assembly; with a positive `num_classes` the fixed
/// topology always fits together.
pub fn scratch_classifier(num_classes: usize) -> Result<Network> {
    let mut net = Network::new("scratch_classifier", vec![224, 224, 3]);

    net.push(conv_ones(16))?;
    net.push(pool2())?;
    net.push(conv_ones(32))?;
    net.push(pool2())?;
    net.push(conv_ones(32))?;
    net.push(LayerKind::Flatten)?;
    net.push(dense_ones(32, Activation::Relu))?;
    net.push(dense_ones(num_classes, Activation::Relu))?;
    net.push(LayerKind::Dense {
        units: num_classes,
        activation: Activation::Softmax,
        use_bias: true,
        kernel_initializer: Initializer::GlorotUniform,
    })?;

    Ok(net)
}

fn conv_ones(filters: usize) -> LayerKind {
    LayerKind::Conv2d {
        filters,
        kernel: (3, 3),
        strides: (1, 1),
        padding: Padding::Valid,
        activation: Activation::Relu,
        use_bias: true,
        kernel_initializer: Initializer::Ones,
    }
}

fn pool2() -> LayerKind {
    LayerKind::MaxPool2d {
        pool: (2, 2),
        strides: (2, 2),
        padding: Padding::Valid,
    }
}

fn dense_ones(units: usize, activation: Activation) -> LayerKind {
    LayerKind::Dense {
        units,
        activation,
        use_bias: true,
        kernel_initializer: Initializer::Ones,
    }
}
