//! Error types for topology assembly and backbone fetching
//!
//! One crate-wide enum covering the two failure families callers need to
//! tell apart: network/availability (the hosted model could not be fetched)
//! and configuration/compatibility (the hosted model no longer matches what
//! the builders expect). Nothing is retried internally; retry policy belongs
//! to the caller.

use thiserror::Error;

/// Result type for armar operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching or assembling a network
#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client itself could not be constructed
    #[error("Failed to create HTTP client: {message}")]
    Client { message: String },

    /// HTTP transport failed before a response arrived
    #[error("HTTP request to {url} failed: {message}")]
    Http { url: String, message: String },

    /// The server answered with a non-success status
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The fetched model.json does not match the layers-model schema
    #[error("Failed to parse model topology: {message}")]
    TopologyParse { message: String },

    /// The topology contains a layer class this crate does not model
    #[error("Unsupported layer class: {class_name}")]
    UnsupportedLayer { class_name: String },

    /// A layer with the requested name does not exist in the network
    #[error("Layer not found in {model}: {layer}")]
    LayerNotFound { model: String, layer: String },

    /// A layer with this name is already present in the network
    #[error("Duplicate layer name: {layer}")]
    DuplicateLayer { layer: String },

    /// A layer expects an input of different rank than the running shape
    #[error("Layer {layer} expects rank-{expected} input, got shape {actual:?}")]
    RankMismatch {
        layer: String,
        expected: usize,
        actual: Vec<usize>,
    },

    /// Incompatible shapes at network assembly
    #[error("Shape mismatch at layer {layer}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        layer: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A layer parameter is structurally invalid (zero-sized window or stride)
    #[error("Invalid parameter for layer {layer}: {message}")]
    InvalidParameter { layer: String, message: String },

    /// IO error (cache reads and writes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Check whether this is a network/availability failure (as opposed to a
    /// configuration/compatibility one). Callers that retry should retry only
    /// these; a schema mismatch will not heal on its own.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Status { .. })
    }
}
