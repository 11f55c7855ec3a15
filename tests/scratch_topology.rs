//! Integration tests for the scratch classifier topology
//!
//! The layer count, ordering, and per-layer parameters are load-bearing:
//! weights trained against this topology are addressed by layer position
//! and shape, so any drift breaks previously saved models.

use armar::layers::{softmax, Activation, Initializer, LayerKind, Padding};
use armar::scratch_classifier;
use proptest::prelude::*;

#[test]
fn test_nine_layers_in_documented_order() {
    let net = scratch_classifier(6).expect("assembly should succeed");
    assert_eq!(net.len(), 9);

    let classes: Vec<&str> = net.layers().iter().map(|l| l.kind.class_name()).collect();
    assert_eq!(
        classes,
        [
            "Conv2D",
            "MaxPooling2D",
            "Conv2D",
            "MaxPooling2D",
            "Conv2D",
            "Flatten",
            "Dense",
            "Dense",
            "Dense",
        ]
    );
}

#[test]
fn test_per_layer_parameters() {
    let net = scratch_classifier(6).expect("assembly should succeed");
    let layers = net.layers();

    match &layers[0].kind {
        LayerKind::Conv2d {
            filters,
            kernel,
            strides,
            padding,
            activation,
            kernel_initializer,
            ..
        } => {
            assert_eq!(*filters, 16);
            assert_eq!(*kernel, (3, 3));
            assert_eq!(*strides, (1, 1));
            assert_eq!(*padding, Padding::Valid);
            assert_eq!(*activation, Activation::Relu);
            assert_eq!(*kernel_initializer, Initializer::Ones);
        }
        other => panic!("layer 1 should be a convolution, got {other:?}"),
    }

    for index in [1, 3] {
        match &layers[index].kind {
            LayerKind::MaxPool2d { pool, strides, .. } => {
                assert_eq!(*pool, (2, 2));
                assert_eq!(*strides, (2, 2));
            }
            other => panic!("layer {} should be a pooling, got {other:?}", index + 1),
        }
    }

    for index in [2, 4] {
        match &layers[index].kind {
            LayerKind::Conv2d {
                filters,
                kernel,
                kernel_initializer,
                ..
            } => {
                assert_eq!(*filters, 32);
                assert_eq!(*kernel, (3, 3));
                assert_eq!(*kernel_initializer, Initializer::Ones);
            }
            other => panic!("layer {} should be a convolution, got {other:?}", index + 1),
        }
    }

    let dense_expectations = [
        (6, 32, Activation::Relu, Initializer::Ones),
        (7, 6, Activation::Relu, Initializer::Ones),
        (8, 6, Activation::Softmax, Initializer::GlorotUniform),
    ];
    for (index, expected_units, expected_activation, expected_init) in dense_expectations {
        match &layers[index].kind {
            LayerKind::Dense {
                units,
                activation,
                kernel_initializer,
                ..
            } => {
                assert_eq!(*units, expected_units, "layer {}", index + 1);
                assert_eq!(*activation, expected_activation, "layer {}", index + 1);
                assert_eq!(*kernel_initializer, expected_init, "layer {}", index + 1);
            }
            other => panic!("layer {} should be dense, got {other:?}", index + 1),
        }
    }
}

#[test]
fn test_shape_chain_from_input_to_classes() {
    let net = scratch_classifier(10).expect("assembly should succeed");
    assert_eq!(net.input_shape(), &[224, 224, 3]);

    let expected: [&[usize]; 9] = [
        &[222, 222, 16],
        &[111, 111, 16],
        &[109, 109, 32],
        &[54, 54, 32],
        &[52, 52, 32],
        &[86_528],
        &[32],
        &[10],
        &[10],
    ];
    for (shape, want) in net.output_shapes().iter().zip(expected) {
        assert_eq!(shape.as_slice(), want);
    }
}

#[test]
fn test_final_activation_normalizes_to_distribution() {
    let net = scratch_classifier(4).expect("assembly should succeed");
    let last = net.layers().last().expect("nine layers");
    assert_eq!(last.kind.activation(), Some(Activation::Softmax));

    // Any logits vector of the output length becomes a distribution
    let mut logits = vec![2.0_f32, -1.0, 0.5, 3.0];
    softmax(&mut logits);
    let sum: f32 = logits.iter().sum();
    assert!((sum - 1.0).abs() < 1e-6);
    assert!(logits.iter().all(|p| (0.0..=1.0).contains(p)));
}

proptest! {
    #[test]
    fn prop_scratch_network_shape_contract(n in 1usize..1000) {
        let net = scratch_classifier(n).expect("assembly should succeed");

        prop_assert_eq!(net.len(), 9);
        prop_assert_eq!(net.output_shape(), &[n][..]);

        let last = net.layers().last().expect("nine layers");
        prop_assert_eq!(last.kind.activation(), Some(Activation::Softmax));

        // The pre-softmax duplicate is also sized to the class count
        prop_assert_eq!(net.output_shapes()[7].as_slice(), &[n][..]);
    }
}
