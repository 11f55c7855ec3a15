//! Network assembly and interrogation
//!
//! A [`Network`] is an ordered stack of layers behind a fixed input shape.
//! Every mutation that could break the shape chain is validated when it
//! happens: `push` computes the new layer's output shape (and parameter
//! count) before storing anything, so a stored network is always internally
//! consistent and the read-side accessors are infallible.

mod summary;

use crate::error::{Error, Result};
use crate::layers::{Layer, LayerKind};

/// An ordered layer stack with a fixed per-sample input shape.
///
/// Shapes are `channels_last` and carry no batch dimension: an RGB image is
/// `[224, 224, 3]`, a flat vector is `[1000]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    name: String,
    input_shape: Vec<usize>,
    layers: Vec<Layer>,
    /// Output shape of each layer, parallel to `layers`
    shapes: Vec<Vec<usize>>,
    /// Total parameter count of each layer, parallel to `layers`
    params: Vec<usize>,
}

impl Network {
    /// Create an empty network over the given input shape
    pub fn new(name: impl Into<String>, input_shape: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            input_shape,
            layers: Vec::new(),
            shapes: Vec::new(),
            params: Vec::new(),
        }
    }

    /// The network's name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Per-sample input shape
    #[must_use]
    pub fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    /// Output shape of the last layer, or the input shape when empty
    #[must_use]
    pub fn output_shape(&self) -> &[usize] {
        self.shapes.last().map_or(&self.input_shape, Vec::as_slice)
    }

    /// Output shapes of every layer, in order
    #[must_use]
    pub fn output_shapes(&self) -> &[Vec<usize>] {
        &self.shapes
    }

    /// Number of layers
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the network has no layers yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// All layers, in order
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Look up a layer by name
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Append a layer under an automatically generated Keras-style name
    /// (`conv2d`, `conv2d_1`, ...).
    ///
    /// # Errors
    ///
    /// Fails when the layer cannot follow the current output shape; the
    /// network is left unchanged in that case.
    pub fn push(&mut self, kind: LayerKind) -> Result<&Layer> {
        let name = self.next_name(kind.name_stem());
        self.push_named(name, kind)
    }

    /// Append a layer under an explicit name.
    ///
    /// # Errors
    ///
    /// `DuplicateLayer` when the name is already taken, or a shape error when
    /// the layer cannot follow the current output shape. The network is left
    /// unchanged on error.
    pub fn push_named(&mut self, name: impl Into<String>, kind: LayerKind) -> Result<&Layer> {
        let name = name.into();
        if self.layer(&name).is_some() {
            return Err(Error::DuplicateLayer { layer: name });
        }

        let layer = Layer::new(name, kind);
        let input = self.output_shape().to_vec();
        let shape = layer.output_shape(&input)?;
        let params = layer.param_count(&input)?;

        let idx = self.layers.len();
        self.layers.push(layer);
        self.shapes.push(shape);
        self.params.push(params);
        Ok(&self.layers[idx])
    }

    /// First free name for a stem: the bare stem, then `stem_1`, `stem_2`, ...
    fn next_name(&self, stem: &str) -> String {
        let mut candidate = stem.to_string();
        let mut n = 1;
        while self.layer(&candidate).is_some() {
            candidate = format!("{stem}_{n}");
            n += 1;
        }
        candidate
    }

    /// Drop every layer after the named one, keeping it as the new output.
    ///
    /// # Errors
    ///
    /// `LayerNotFound` when no layer has that name.
    pub fn truncate_at(&mut self, name: &str) -> Result<()> {
        let pos = self
            .layers
            .iter()
            .position(|l| l.name == name)
            .ok_or_else(|| Error::LayerNotFound {
                model: self.name.clone(),
                layer: name.to_string(),
            })?;
        self.layers.truncate(pos + 1);
        self.shapes.truncate(pos + 1);
        self.params.truncate(pos + 1);
        Ok(())
    }

    /// Mark every current layer trainable or frozen. Layers pushed later are
    /// not affected and start out trainable.
    pub fn set_trainable(&mut self, trainable: bool) {
        for layer in &mut self.layers {
            layer.trainable = trainable;
        }
    }

    /// Mark a single layer trainable or frozen.
    ///
    /// # Errors
    ///
    /// `LayerNotFound` when no layer has that name.
    pub fn set_layer_trainable(&mut self, name: &str, trainable: bool) -> Result<()> {
        let layer = self
            .layers
            .iter_mut()
            .find(|l| l.name == name)
            .ok_or_else(|| Error::LayerNotFound {
                model: self.name.clone(),
                layer: name.to_string(),
            })?;
        layer.trainable = trainable;
        Ok(())
    }

    /// Total parameter count across all layers
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.params.iter().sum()
    }

    /// Parameters training may update: frozen layers contribute nothing, and
    /// BatchNorm's moving statistics never count even when trainable.
    #[must_use]
    pub fn trainable_param_count(&self) -> usize {
        self.layers
            .iter()
            .zip(self.input_shapes())
            .zip(&self.params)
            .map(|((layer, input), total)| {
                if layer.trainable {
                    total - layer.kind.fixed_param_count(input)
                } else {
                    0
                }
            })
            .sum()
    }

    /// Shape flowing into each layer: the input shape, then each stored
    /// output shape except the last.
    fn input_shapes(&self) -> impl Iterator<Item = &[usize]> {
        std::iter::once(self.input_shape.as_slice())
            .chain(self.shapes.iter().map(Vec::as_slice))
            .take(self.layers.len())
    }
}
