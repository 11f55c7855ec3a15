//! Turn a parsed artifact back into a [`Network`]
//!
//! Layers are read in declaration order as a linear chain; the converted
//! image classifiers this crate targets are all straight pipelines, so
//! `inbound_nodes` wiring is not interpreted. `InputLayer` is consumed into
//! the network's input shape rather than stored as a layer.

use super::schema::{LayerSpec, ModelArtifact};
use crate::error::{Error, Result};
use crate::layers::{Activation, Initializer, LayerKind, Padding};
use crate::network::Network;

/// Decode an artifact's layer graph into a shape-checked [`Network`].
///
/// # Errors
///
/// `UnsupportedLayer` for classes outside the catalog, `TopologyParse` for
/// missing or malformed fields, and the usual shape errors when consecutive
/// layers do not fit together.
pub fn decode_network(artifact: &ModelArtifact) -> Result<Network> {
    let config = artifact.model_topology.model_config();
    let layers = config.config.layers();

    let first = layers.first().ok_or_else(|| Error::TopologyParse {
        message: "model has no layers".to_string(),
    })?;
    let input_shape = input_shape_of(first)?;

    let name = config.config.name().unwrap_or("model");
    let mut net = Network::new(name, input_shape);

    for spec in layers {
        // Already folded into the input shape
        if spec.class_name == "InputLayer" {
            continue;
        }

        let kind = layer_kind(spec)?;
        let frozen = spec.config.trainable == Some(false);
        let layer_name = match spec.layer_name() {
            Some(explicit) => net.push_named(explicit, kind)?.name.clone(),
            None => net.push(kind)?.name.clone(),
        };
        if frozen {
            net.set_layer_trainable(&layer_name, false)?;
        }
    }

    Ok(net)
}

/// Per-sample input shape from the leading layer's `batch_input_shape`
fn input_shape_of(first: &LayerSpec) -> Result<Vec<usize>> {
    let name = context_name(first);
    let declared = first
        .config
        .batch_input_shape
        .as_deref()
        .ok_or_else(|| Error::TopologyParse {
            message: format!("layer {name}: first layer declares no batch_input_shape"),
        })?;

    if declared.len() < 2 {
        return Err(Error::TopologyParse {
            message: format!("layer {name}: batch_input_shape has no sample dimensions"),
        });
    }

    // Drop the batch dimension; the rest must be concrete
    declared[1..]
        .iter()
        .map(|dim| {
            dim.ok_or_else(|| Error::TopologyParse {
                message: format!("layer {name}: dynamic sample dimensions are not supported"),
            })
        })
        .collect()
}

fn layer_kind(spec: &LayerSpec) -> Result<LayerKind> {
    let name = context_name(spec);
    let config = &spec.config;

    if let Some(format) = config.data_format.as_deref() {
        if format != "channels_last" {
            return Err(Error::TopologyParse {
                message: format!("layer {name}: data_format '{format}' is not supported"),
            });
        }
    }

    match spec.class_name.as_str() {
        "Conv2D" => {
            let kernel_field = required(config.kernel_size.as_deref(), name, "kernel_size")?;
            Ok(LayerKind::Conv2d {
                filters: required(config.filters, name, "filters")?,
                kernel: pair(name, "kernel_size", kernel_field)?,
                strides: strides_or(config.strides.as_deref(), (1, 1), name)?,
                padding: padding(name, config.padding.as_deref())?,
                activation: activation(name, config.activation.as_deref())?,
                use_bias: config.use_bias.unwrap_or(true),
                kernel_initializer: initializer(config.kernel_initializer.as_ref()),
            })
        }
        "DepthwiseConv2D" => {
            let kernel_field = required(config.kernel_size.as_deref(), name, "kernel_size")?;
            Ok(LayerKind::DepthwiseConv2d {
                depth_multiplier: config.depth_multiplier.unwrap_or(1),
                kernel: pair(name, "kernel_size", kernel_field)?,
                strides: strides_or(config.strides.as_deref(), (1, 1), name)?,
                padding: padding(name, config.padding.as_deref())?,
                use_bias: config.use_bias.unwrap_or(true),
            })
        }
        "BatchNormalization" => Ok(LayerKind::BatchNorm {
            epsilon: config.epsilon.unwrap_or(1e-3),
            momentum: config.momentum.unwrap_or(0.99),
        }),
        "Activation" => {
            let declared = required(config.activation.as_deref(), name, "activation")?;
            Ok(LayerKind::Activation {
                activation: activation(name, Some(declared))?,
            })
        }
        "MaxPooling2D" => {
            let pool = match config.pool_size.as_deref() {
                Some(values) => pair(name, "pool_size", values)?,
                None => (2, 2),
            };
            Ok(LayerKind::MaxPool2d {
                pool,
                // Keras defaults strides to the pool size
                strides: strides_or(config.strides.as_deref(), pool, name)?,
                padding: padding(name, config.padding.as_deref())?,
            })
        }
        "GlobalAveragePooling2D" => Ok(LayerKind::GlobalAvgPool2d),
        "Flatten" => Ok(LayerKind::Flatten),
        "Dense" => Ok(LayerKind::Dense {
            units: required(config.units, name, "units")?,
            activation: activation(name, config.activation.as_deref())?,
            use_bias: config.use_bias.unwrap_or(true),
            kernel_initializer: initializer(config.kernel_initializer.as_ref()),
        }),
        "Dropout" => Ok(LayerKind::Dropout {
            rate: required(config.rate, name, "rate")?,
        }),
        "Reshape" => Ok(LayerKind::Reshape {
            target: required(config.target_shape.clone(), name, "target_shape")?,
        }),
        other => Err(Error::UnsupportedLayer {
            class_name: other.to_string(),
        }),
    }
}

/// Best available name for error messages
fn context_name(spec: &LayerSpec) -> &str {
    spec.layer_name().unwrap_or(&spec.class_name)
}

fn required<T>(value: Option<T>, layer: &str, field: &str) -> Result<T> {
    value.ok_or_else(|| Error::TopologyParse {
        message: format!("layer {layer}: missing {field}"),
    })
}

/// Read `[n]` or `[h, w]` as a spatial pair
fn pair(layer: &str, field: &str, values: &[usize]) -> Result<(usize, usize)> {
    match values {
        [square] => Ok((*square, *square)),
        [h, w] => Ok((*h, *w)),
        _ => Err(Error::TopologyParse {
            message: format!("layer {layer}: {field} must have one or two entries, got {values:?}"),
        }),
    }
}

fn strides_or(
    declared: Option<&[usize]>,
    default: (usize, usize),
    layer: &str,
) -> Result<(usize, usize)> {
    match declared {
        Some(values) => pair(layer, "strides", values),
        None => Ok(default),
    }
}

fn padding(layer: &str, declared: Option<&str>) -> Result<Padding> {
    match declared {
        None => Ok(Padding::Valid),
        Some(value) => Padding::from_keras_name(value).ok_or_else(|| Error::TopologyParse {
            message: format!("layer {layer}: unknown padding '{value}'"),
        }),
    }
}

fn activation(layer: &str, declared: Option<&str>) -> Result<Activation> {
    match declared {
        None => Ok(Activation::Linear),
        Some(value) => Activation::from_keras_name(value).ok_or_else(|| Error::TopologyParse {
            message: format!("layer {layer}: unknown activation '{value}'"),
        }),
    }
}

fn initializer(declared: Option<&super::schema::InitializerSpec>) -> Initializer {
    declared.map_or(Initializer::GlorotUniform, |spec| {
        Initializer::from_keras_class(spec.class_name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(doc: serde_json::Value) -> ModelArtifact {
        serde_json::from_value(doc).unwrap()
    }

    /// A minimal functional artifact in the converted-MobileNet shape
    fn mini_backbone() -> serde_json::Value {
        json!({
            "modelTopology": {
                "keras_version": "2.1.4",
                "backend": "tensorflow",
                "model_config": {
                    "class_name": "Model",
                    "config": {
                        "name": "mini",
                        "layers": [
                            {
                                "name": "input_1",
                                "class_name": "InputLayer",
                                "config": {
                                    "name": "input_1",
                                    "batch_input_shape": [null, 32, 32, 3],
                                    "dtype": "float32"
                                }
                            },
                            {
                                "name": "conv1",
                                "class_name": "Conv2D",
                                "config": {
                                    "name": "conv1",
                                    "filters": 8,
                                    "kernel_size": [3, 3],
                                    "strides": [2, 2],
                                    "padding": "same",
                                    "data_format": "channels_last",
                                    "activation": "linear",
                                    "use_bias": false
                                }
                            },
                            {
                                "name": "conv1_bn",
                                "class_name": "BatchNormalization",
                                "config": {"name": "conv1_bn", "epsilon": 0.001, "momentum": 0.99}
                            },
                            {
                                "name": "conv1_relu",
                                "class_name": "Activation",
                                "config": {"name": "conv1_relu", "activation": "relu6"}
                            }
                        ]
                    }
                }
            },
            "weightsManifest": [
                {
                    "paths": ["group1-shard1of1"],
                    "weights": [{"name": "conv1/kernel", "shape": [3, 3, 3, 8], "dtype": "float32"}]
                }
            ]
        })
    }

    #[test]
    fn test_decode_functional_backbone() {
        let net = decode_network(&artifact(mini_backbone())).unwrap();

        assert_eq!(net.name(), "mini");
        assert_eq!(net.input_shape(), &[32, 32, 3]);
        // InputLayer is consumed, not stored
        assert_eq!(net.len(), 3);
        assert_eq!(net.layers()[0].name, "conv1");
        // 32/2 rounded up under same padding
        assert_eq!(net.output_shapes()[0], [16, 16, 8]);
        assert_eq!(net.output_shape(), &[16, 16, 8]);
    }

    #[test]
    fn test_decode_keeps_layer_order_and_kinds() {
        let net = decode_network(&artifact(mini_backbone())).unwrap();
        let classes: Vec<&str> = net
            .layers()
            .iter()
            .map(|l| l.kind.class_name())
            .collect();
        assert_eq!(classes, ["Conv2D", "BatchNormalization", "Activation"]);
        assert_eq!(
            net.layers()[2].kind.activation(),
            Some(Activation::Relu6)
        );
    }

    #[test]
    fn test_decode_sequential_without_input_layer() {
        let net = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "name": "seq",
                    "layers": [
                        {
                            "class_name": "Flatten",
                            "config": {"name": "flatten", "batch_input_shape": [null, 4, 4, 2]}
                        },
                        {
                            "class_name": "Dense",
                            "config": {"name": "dense", "units": 5, "activation": "softmax"}
                        }
                    ]
                }
            }
        })))
        .unwrap();

        assert_eq!(net.input_shape(), &[4, 4, 2]);
        assert_eq!(net.len(), 2);
        assert_eq!(net.output_shape(), &[5]);
    }

    #[test]
    fn test_unsupported_class_is_reported() {
        let err = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "LSTM",
                            "config": {"name": "lstm", "batch_input_shape": [null, 10, 4]}
                        }
                    ]
                }
            }
        })))
        .unwrap_err();

        assert!(matches!(err, Error::UnsupportedLayer { class_name } if class_name == "LSTM"));
    }

    #[test]
    fn test_channels_first_is_rejected() {
        let err = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "Conv2D",
                            "config": {
                                "name": "conv",
                                "batch_input_shape": [null, 3, 8, 8],
                                "filters": 4,
                                "kernel_size": [3, 3],
                                "data_format": "channels_first"
                            }
                        }
                    ]
                }
            }
        })))
        .unwrap_err();

        assert!(matches!(err, Error::TopologyParse { message } if message.contains("channels_first")));
    }

    #[test]
    fn test_dynamic_sample_dimension_is_rejected() {
        let err = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "Flatten",
                            "config": {"name": "flatten", "batch_input_shape": [null, null, 3]}
                        }
                    ]
                }
            }
        })))
        .unwrap_err();

        assert!(matches!(err, Error::TopologyParse { message } if message.contains("dynamic")));
    }

    #[test]
    fn test_missing_required_field() {
        let err = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "Conv2D",
                            "config": {
                                "name": "conv",
                                "batch_input_shape": [null, 8, 8, 3],
                                "kernel_size": [3, 3]
                            }
                        }
                    ]
                }
            }
        })))
        .unwrap_err();

        assert!(matches!(err, Error::TopologyParse { message } if message.contains("missing filters")));
    }

    #[test]
    fn test_no_layers_is_rejected() {
        let err = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {"layers": []}
            }
        })))
        .unwrap_err();

        assert!(matches!(err, Error::TopologyParse { message } if message.contains("no layers")));
    }

    #[test]
    fn test_trainable_flag_is_honored() {
        let net = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "Dense",
                            "config": {
                                "name": "frozen_dense",
                                "batch_input_shape": [null, 4],
                                "units": 2,
                                "trainable": false
                            }
                        }
                    ]
                }
            }
        })))
        .unwrap();

        assert!(!net.layers()[0].trainable);
        assert_eq!(net.trainable_param_count(), 0);
    }

    #[test]
    fn test_maxpool_strides_default_to_pool_size() {
        let net = decode_network(&artifact(json!({
            "modelTopology": {
                "class_name": "Sequential",
                "config": {
                    "layers": [
                        {
                            "class_name": "MaxPooling2D",
                            "config": {
                                "name": "pool",
                                "batch_input_shape": [null, 8, 8, 3],
                                "pool_size": [2, 2]
                            }
                        }
                    ]
                }
            }
        })))
        .unwrap();

        assert_eq!(net.output_shape(), &[4, 4, 3]);
    }
}
