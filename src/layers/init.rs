//! Kernel weight initializers
//!
//! Initializers matter only for freshly assembled layers; a fetched backbone
//! arrives with pretrained weights, so unrecognized initializer classes from
//! the hosted topology collapse to the Keras default (glorot uniform).

use std::fmt;

/// Weight initialization scheme for a kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initializer {
    /// Every weight set to 1
    Ones,
    /// Every weight set to 0
    Zeros,
    /// Glorot/Xavier uniform (the Keras default, serialized as VarianceScaling)
    #[default]
    GlorotUniform,
}

impl Initializer {
    /// Map a Keras initializer class name onto the catalog, defaulting to
    /// glorot uniform for anything unrecognized.
    #[must_use]
    pub fn from_keras_class(class_name: &str) -> Self {
        match class_name {
            "Ones" => Self::Ones,
            "Zeros" => Self::Zeros,
            _ => Self::GlorotUniform,
        }
    }

    /// The Keras serialized class name
    #[must_use]
    pub fn keras_class(&self) -> &'static str {
        match self {
            Self::Ones => "Ones",
            Self::Zeros => "Zeros",
            Self::GlorotUniform => "GlorotUniform",
        }
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keras_class())
    }
}
