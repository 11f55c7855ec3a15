//! Declarative layer catalog
//!
//! Layers here are descriptions, not kernels: each kind knows its Keras class
//! name, how its output shape follows from an input shape, and how many
//! parameters it would own. That is everything topology assembly, truncation,
//! and summaries need; numeric execution stays with the consuming framework.
//!
//! Shapes are per-sample (no batch dimension), `channels_last`: a feature map
//! is `[height, width, channels]`, a flat vector is `[length]`.

mod activation;
mod init;

pub use activation::{softmax, Activation};
pub use init::Initializer;

use crate::error::{Error, Result};
use std::fmt;

/// Spatial padding policy for convolution and pooling windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Padding {
    /// No padding; the window must fit inside the input
    #[default]
    Valid,
    /// Zero-pad so the output spatial size is `ceil(input / stride)`
    Same,
}

impl Padding {
    /// Parse the Keras serialized padding name
    #[must_use]
    pub fn from_keras_name(name: &str) -> Option<Self> {
        match name {
            "valid" => Some(Self::Valid),
            "same" => Some(Self::Same),
            _ => None,
        }
    }

    /// The Keras serialized name
    #[must_use]
    pub fn keras_name(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Same => "same",
        }
    }

    /// Output extent of a window sweep along one spatial dimension
    fn sweep(&self, input: usize, window: usize, stride: usize) -> Option<usize> {
        match self {
            Self::Valid => {
                if input < window {
                    None
                } else {
                    Some((input - window) / stride + 1)
                }
            }
            Self::Same => Some(input.div_ceil(stride)),
        }
    }
}

impl fmt::Display for Padding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keras_name())
    }
}

/// One declarative tensor transformation
#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    /// 2D convolution over `[h, w, c]`
    Conv2d {
        filters: usize,
        kernel: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
        activation: Activation,
        use_bias: bool,
        kernel_initializer: Initializer,
    },
    /// Per-channel 2D convolution (MobileNet's separable building block)
    DepthwiseConv2d {
        depth_multiplier: usize,
        kernel: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
        use_bias: bool,
    },
    /// Channel-wise normalization; carries scale/offset plus moving statistics
    BatchNorm { epsilon: f32, momentum: f32 },
    /// Standalone activation layer
    Activation { activation: Activation },
    /// 2D max pooling
    MaxPool2d {
        pool: (usize, usize),
        strides: (usize, usize),
        padding: Padding,
    },
    /// Average over the spatial dimensions: `[h, w, c]` -> `[c]`
    GlobalAvgPool2d,
    /// Collapse to a flat vector
    Flatten,
    /// Fully connected projection over a flat vector
    Dense {
        units: usize,
        activation: Activation,
        use_bias: bool,
        kernel_initializer: Initializer,
    },
    /// Randomly zero a fraction of values during training; identity for shapes
    Dropout { rate: f32 },
    /// Rearrange into a target shape with the same element count
    Reshape { target: Vec<usize> },
}

impl LayerKind {
    /// Keras class name of this layer kind
    #[must_use]
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Conv2d { .. } => "Conv2D",
            Self::DepthwiseConv2d { .. } => "DepthwiseConv2D",
            Self::BatchNorm { .. } => "BatchNormalization",
            Self::Activation { .. } => "Activation",
            Self::MaxPool2d { .. } => "MaxPooling2D",
            Self::GlobalAvgPool2d => "GlobalAveragePooling2D",
            Self::Flatten => "Flatten",
            Self::Dense { .. } => "Dense",
            Self::Dropout { .. } => "Dropout",
            Self::Reshape { .. } => "Reshape",
        }
    }

    /// Stem used when auto-generating layer names, Keras style
    /// (`conv2d`, `conv2d_1`, ...)
    #[must_use]
    pub fn name_stem(&self) -> &'static str {
        match self {
            Self::Conv2d { .. } => "conv2d",
            Self::DepthwiseConv2d { .. } => "depthwise_conv2d",
            Self::BatchNorm { .. } => "batch_normalization",
            Self::Activation { .. } => "activation",
            Self::MaxPool2d { .. } => "max_pooling2d",
            Self::GlobalAvgPool2d => "global_average_pooling2d",
            Self::Flatten => "flatten",
            Self::Dense { .. } => "dense",
            Self::Dropout { .. } => "dropout",
            Self::Reshape { .. } => "reshape",
        }
    }

    /// The activation this layer applies to its output, if any
    #[must_use]
    pub fn activation(&self) -> Option<Activation> {
        match self {
            Self::Conv2d { activation, .. }
            | Self::Dense { activation, .. }
            | Self::Activation { activation } => Some(*activation),
            _ => None,
        }
    }

    /// Output shape for a given input shape.
    ///
    /// `layer` is the owning layer's name, used only for error context.
    ///
    /// # Errors
    ///
    /// `RankMismatch` when the kind needs a feature map (or flat vector) and
    /// the input is not one; `ShapeMismatch` when a window does not fit under
    /// valid padding or a reshape changes the element count;
    /// `InvalidParameter` for zero-sized windows or strides.
    pub fn output_shape(&self, layer: &str, input: &[usize]) -> Result<Vec<usize>> {
        match self {
            Self::Conv2d {
                filters,
                kernel,
                strides,
                padding,
                ..
            } => {
                let (h, w, _c) = feature_map(layer, input)?;
                let (oh, ow) = swept(layer, (h, w), *kernel, *strides, *padding)?;
                Ok(vec![oh, ow, *filters])
            }
            Self::DepthwiseConv2d {
                depth_multiplier,
                kernel,
                strides,
                padding,
                ..
            } => {
                let (h, w, c) = feature_map(layer, input)?;
                let (oh, ow) = swept(layer, (h, w), *kernel, *strides, *padding)?;
                Ok(vec![oh, ow, c * depth_multiplier])
            }
            Self::MaxPool2d {
                pool,
                strides,
                padding,
            } => {
                let (h, w, c) = feature_map(layer, input)?;
                let (oh, ow) = swept(layer, (h, w), *pool, *strides, *padding)?;
                Ok(vec![oh, ow, c])
            }
            Self::GlobalAvgPool2d => {
                let (_h, _w, c) = feature_map(layer, input)?;
                Ok(vec![c])
            }
            Self::Flatten => Ok(vec![input.iter().product()]),
            Self::Dense { units, .. } => {
                if input.len() != 1 {
                    return Err(Error::RankMismatch {
                        layer: layer.to_string(),
                        expected: 1,
                        actual: input.to_vec(),
                    });
                }
                Ok(vec![*units])
            }
            Self::Reshape { target } => {
                let have: usize = input.iter().product();
                let want: usize = target.iter().product();
                if have != want {
                    return Err(Error::ShapeMismatch {
                        layer: layer.to_string(),
                        expected: target.clone(),
                        actual: input.to_vec(),
                    });
                }
                Ok(target.clone())
            }
            Self::BatchNorm { .. } | Self::Activation { .. } | Self::Dropout { .. } => {
                Ok(input.to_vec())
            }
        }
    }

    /// Total number of parameters this layer owns for a given input shape,
    /// including never-trainable ones (BatchNorm's moving statistics).
    pub fn param_count(&self, layer: &str, input: &[usize]) -> Result<usize> {
        match self {
            Self::Conv2d {
                filters,
                kernel,
                use_bias,
                ..
            } => {
                let (_h, _w, c) = feature_map(layer, input)?;
                let bias = if *use_bias { *filters } else { 0 };
                Ok(kernel.0 * kernel.1 * c * filters + bias)
            }
            Self::DepthwiseConv2d {
                depth_multiplier,
                kernel,
                use_bias,
                ..
            } => {
                let (_h, _w, c) = feature_map(layer, input)?;
                let out_channels = c * depth_multiplier;
                let bias = if *use_bias { out_channels } else { 0 };
                Ok(kernel.0 * kernel.1 * out_channels + bias)
            }
            // gamma, beta, moving mean, moving variance: one each per channel
            Self::BatchNorm { .. } => {
                let c = input.last().copied().unwrap_or(0);
                Ok(4 * c)
            }
            Self::Dense { units, use_bias, .. } => {
                if input.len() != 1 {
                    return Err(Error::RankMismatch {
                        layer: layer.to_string(),
                        expected: 1,
                        actual: input.to_vec(),
                    });
                }
                let bias = if *use_bias { *units } else { 0 };
                Ok(input[0] * units + bias)
            }
            _ => Ok(0),
        }
    }

    /// Parameters that are never updated by training even on a trainable
    /// layer. Only BatchNorm has these (its moving statistics).
    pub fn fixed_param_count(&self, input: &[usize]) -> usize {
        match self {
            Self::BatchNorm { .. } => 2 * input.last().copied().unwrap_or(0),
            _ => 0,
        }
    }
}

/// A named layer within a network
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Unique name within the owning network
    pub name: String,
    /// What the layer does
    pub kind: LayerKind,
    /// Whether training may update this layer's parameters
    pub trainable: bool,
}

impl Layer {
    /// Create a trainable layer
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            kind,
            trainable: true,
        }
    }

    /// Output shape for a given input shape
    pub fn output_shape(&self, input: &[usize]) -> Result<Vec<usize>> {
        self.kind.output_shape(&self.name, input)
    }

    /// Total parameter count for a given input shape
    pub fn param_count(&self, input: &[usize]) -> Result<usize> {
        self.kind.param_count(&self.name, input)
    }

    /// Parameters training may update: zero when frozen, and BatchNorm's
    /// moving statistics never count.
    pub fn trainable_param_count(&self, input: &[usize]) -> Result<usize> {
        if !self.trainable {
            return Ok(0);
        }
        Ok(self.param_count(input)? - self.kind.fixed_param_count(input))
    }
}

/// Interpret a shape as a `[h, w, c]` feature map
fn feature_map(layer: &str, input: &[usize]) -> Result<(usize, usize, usize)> {
    match input {
        [h, w, c] => Ok((*h, *w, *c)),
        _ => Err(Error::RankMismatch {
            layer: layer.to_string(),
            expected: 3,
            actual: input.to_vec(),
        }),
    }
}

/// Sweep a window over both spatial dimensions
fn swept(
    layer: &str,
    (h, w): (usize, usize),
    (kh, kw): (usize, usize),
    (sh, sw): (usize, usize),
    padding: Padding,
) -> Result<(usize, usize)> {
    if kh == 0 || kw == 0 || sh == 0 || sw == 0 {
        return Err(Error::InvalidParameter {
            layer: layer.to_string(),
            message: format!("window {kh}x{kw} with stride {sh}x{sw} must be non-zero"),
        });
    }
    let oh = padding.sweep(h, kh, sh);
    let ow = padding.sweep(w, kw, sw);
    match (oh, ow) {
        (Some(oh), Some(ow)) => Ok((oh, ow)),
        _ => Err(Error::ShapeMismatch {
            layer: layer.to_string(),
            expected: vec![kh, kw],
            actual: vec![h, w],
        }),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Same padding never yields a larger output than the input
        #[test]
        fn same_padding_never_grows(
            h in 1usize..512,
            w in 1usize..512,
            k in 1usize..8,
            s in 1usize..4,
        ) {
            let kind = LayerKind::MaxPool2d {
                pool: (k, k),
                strides: (s, s),
                padding: Padding::Same,
            };
            let out = kind.output_shape("p", &[h, w, 3]).unwrap();
            prop_assert!(out[0] <= h && out[1] <= w);
            prop_assert_eq!(out[2], 3);
        }

        /// Flatten always preserves the element count
        #[test]
        fn flatten_preserves_elements(
            h in 1usize..64,
            w in 1usize..64,
            c in 1usize..16,
        ) {
            let out = LayerKind::Flatten.output_shape("f", &[h, w, c]).unwrap();
            prop_assert_eq!(out, vec![h * w * c]);
        }

        /// Valid and same padding agree when stride is 1 and the window is 1x1
        #[test]
        fn unit_window_is_identity(
            h in 1usize..128,
            w in 1usize..128,
        ) {
            for padding in [Padding::Valid, Padding::Same] {
                let kind = LayerKind::MaxPool2d {
                    pool: (1, 1),
                    strides: (1, 1),
                    padding,
                };
                prop_assert_eq!(kind.output_shape("p", &[h, w, 2]).unwrap(), vec![h, w, 2]);
            }
        }
    }
}
