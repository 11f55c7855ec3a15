//! Activation functions attached to layers
//!
//! Activations are carried as part of the layer description and can also be
//! applied numerically to a probability/logit vector. The numeric path exists
//! so the softmax contract (non-negative entries summing to 1) is checkable
//! without a tensor engine.

use std::fmt;

/// Activation function of a layer output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activation {
    /// Identity (no activation)
    #[default]
    Linear,
    /// Rectified linear unit: `max(x, 0)`
    Relu,
    /// Rectified linear capped at 6: `min(max(x, 0), 6)` (MobileNet's choice)
    Relu6,
    /// Normalized probabilities: entries in [0, 1] summing to 1
    Softmax,
}

impl Activation {
    /// Parse the Keras serialized activation name
    #[must_use]
    pub fn from_keras_name(name: &str) -> Option<Self> {
        match name {
            "linear" => Some(Self::Linear),
            "relu" => Some(Self::Relu),
            "relu6" => Some(Self::Relu6),
            "softmax" => Some(Self::Softmax),
            _ => None,
        }
    }

    /// The Keras serialized name
    #[must_use]
    pub fn keras_name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Relu => "relu",
            Self::Relu6 => "relu6",
            Self::Softmax => "softmax",
        }
    }

    /// Apply the activation in place to a flat vector of values
    pub fn apply(&self, values: &mut [f32]) {
        match self {
            Self::Linear => {}
            Self::Relu => {
                for v in values.iter_mut() {
                    *v = v.max(0.0);
                }
            }
            Self::Relu6 => {
                for v in values.iter_mut() {
                    *v = v.clamp(0.0, 6.0);
                }
            }
            Self::Softmax => softmax(values),
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keras_name())
    }
}

/// Numerically stable softmax over a flat slice, in place.
///
/// The maximum is subtracted before exponentiation; for a non-empty slice the
/// denominator is therefore at least 1 and the result is a valid probability
/// distribution. An empty slice is left untouched.
pub fn softmax(values: &mut [f32]) {
    if values.is_empty() {
        return;
    }
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    let mut sum = 0.0f32;
    for v in values.iter_mut() {
        *v = (*v - max).exp();
        sum += *v;
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
}
