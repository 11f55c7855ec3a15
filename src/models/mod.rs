//! Ready-made classifier topologies
//!
//! Two builders cover the two training regimes the consuming application
//! offers: [`scratch_classifier`] assembles a small convolutional network
//! trained from nothing, [`mobilenet_classifier`] adapts a hosted pretrained
//! backbone by truncation and a grafted head.

mod scratch;
mod transfer;

pub use scratch::scratch_classifier;
pub use transfer::{graft_classifier_head, mobilenet_classifier, mobilenet_classifier_with};
