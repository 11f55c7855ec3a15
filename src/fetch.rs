//! HTTP client for hosted layers-model artifacts
//!
//! Downloads `model.json` documents and their weight shards with a local
//! write-through cache, so repeated builds of the same transfer network hit
//! the network once. Cache entries are keyed by URL; a cached `model.json`
//! that no longer parses is treated as absent and refetched.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::format::{parse_artifact, ModelArtifact};

const USER_AGENT: &str = concat!("armar/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP client with a URL-keyed download cache
#[derive(Debug)]
pub struct LayersClient {
    client: reqwest::blocking::Client,
    cache_dir: PathBuf,
}

impl LayersClient {
    /// Create a client caching under the platform cache directory
    ///
    /// # Errors
    ///
    /// `Client` when the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            cache_dir: default_cache_dir(),
        })
    }

    /// Override the cache directory
    #[must_use]
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Fetch and parse a `model.json` document, cache-first.
    ///
    /// # Errors
    ///
    /// `Http`/`Status` on transport failures, `Json` when the body is not a
    /// layers-model document, `Io` when the cache cannot be written.
    pub fn fetch_artifact(&self, url: &str) -> Result<ModelArtifact> {
        let cache = self.cache_path(url);
        if let Ok(body) = std::fs::read_to_string(&cache) {
            if let Ok(artifact) = parse_artifact(&body) {
                return Ok(artifact);
            }
            // stale or truncated entry: refetch and overwrite
        }

        let body = self.get_text(url)?;
        let artifact = parse_artifact(&body)?;
        store(&cache, body.as_bytes())?;
        Ok(artifact)
    }

    /// Download one weight shard into the cache and return its local path.
    /// Shard paths from the manifest are resolved relative to the
    /// `model.json` URL.
    ///
    /// # Errors
    ///
    /// `Http`/`Status` on transport failures, `Io` when the cache cannot be
    /// written.
    pub fn fetch_shard(&self, model_url: &str, shard: &str) -> Result<PathBuf> {
        let url = resolve_relative(model_url, shard);
        let cache = self.cache_path(&url);
        if cache.exists() {
            return Ok(cache);
        }

        let bytes = self.get_bytes(&url)?;
        store(&cache, &bytes)?;
        Ok(cache)
    }

    /// Download every shard named in the artifact's weights manifest,
    /// returning the local paths in manifest order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::fetch_shard`]; stops at the first failing shard.
    pub fn download_weights(
        &self,
        model_url: &str,
        artifact: &ModelArtifact,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for group in &artifact.weights_manifest {
            for shard in &group.paths {
                paths.push(self.fetch_shard(model_url, shard)?);
            }
        }
        Ok(paths)
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(cache_key(url))
    }

    fn get_text(&self, url: &str) -> Result<String> {
        let response = self.send(url)?;
        response.text().map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    fn get_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.send(url)?;
        let bytes = response.bytes().map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(bytes.to_vec())
    }

    fn send(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.client.get(url).send().map_err(|e| Error::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

/// Platform cache directory for downloaded artifacts
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("armar")
        .join("models")
}

/// Flatten a URL into a single cache file name
fn cache_key(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    trimmed.replace(['/', ':', '?', '#', '&'], "--")
}

/// Resolve a manifest path against the `model.json` URL it came from
fn resolve_relative(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    match base.rfind('/') {
        Some(pos) => format!("{}/{}", &base[..pos], path),
        None => path.to_string(),
    }
}

fn store(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)?;
    Ok(())
}
