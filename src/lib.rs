//! armar: assemble image-classifier topologies for TensorFlow.js layers models
//!
//! This crate builds the network *descriptions* an image-classification
//! trainer consumes: a small convolutional classifier assembled from scratch,
//! and a transfer-learning classifier grafted onto the hosted MobileNet v1
//! backbone. Networks here are declarative (ordered layers with validated
//! shapes, parameter counts, and trainable flags) and carry no weights or
//! kernels; numeric execution stays with the consuming framework.
//!
//! What it does:
//! - assemble the fixed scratch topology ([`scratch_classifier`])
//! - fetch a hosted layers-model artifact, truncate it at its feature layer,
//!   optionally freeze it, and graft a classification head
//!   ([`mobilenet_classifier`])
//! - describe a training run with lifecycle hooks ([`fit_args`])
//!
//! # Quick start
//!
//! ```
//! use armar::scratch_classifier;
//!
//! let net = scratch_classifier(3)?;
//! assert_eq!(net.output_shape(), &[3]);
//! println!("{}", net.summary());
//! # Ok::<(), armar::Error>(())
//! ```
//!
//! Transfer learning fetches the backbone over HTTPS (cached after the
//! first call):
//!
//! ```no_run
//! use armar::{fit_args, mobilenet_classifier};
//!
//! let net = mobilenet_classifier(2, true)?;
//! let args = fit_args(32, 5);
//! println!("{} trainable parameters over {} epochs", net.trainable_param_count(), args.epochs);
//! # Ok::<(), armar::Error>(())
//! ```

pub mod error;
pub mod fetch;
pub mod format;
pub mod layers;
pub mod models;
pub mod network;
pub mod train;
pub mod zoo;

pub use error::{Error, Result};
pub use fetch::LayersClient;
pub use models::{
    graft_classifier_head, mobilenet_classifier, mobilenet_classifier_with, scratch_classifier,
};
pub use network::Network;
pub use train::{fit_args, FitArgs, Logs, StdoutHooks, TrainingHooks};
pub use zoo::BackboneSpec;
