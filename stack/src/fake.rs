//! In-memory registry client for tests and offline use.
//!
//! [`FakeRegistryClient`] serves pre-registered [`FetchedImage`] values by
//! reference; [`FakeImage`] builds those fixtures with deterministic
//! digest identifiers so repeated runs produce identical results.

use std::collections::HashMap;

use async_trait::async_trait;
use packstone_core::error::{Result, StackError};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::image::FetchedImage;
use crate::registry::{RegistryAuth, RegistryClient};

/// Registry client backed by an in-memory map of references to images.
///
/// Fetching an unregistered reference fails with `RegistryFetch`, the same
/// error kind a real client reports for an unreachable image.
#[derive(Debug, Default)]
pub struct FakeRegistryClient {
    images: HashMap<String, FetchedImage>,
}

impl FakeRegistryClient {
    /// Create an empty fake client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image under its reference.
    pub fn with_image(mut self, image: FetchedImage) -> Self {
        self.images.insert(image.reference().to_string(), image);
        self
    }
}

#[async_trait]
impl RegistryClient for FakeRegistryClient {
    async fn fetch(&self, _auth: &RegistryAuth, reference: &str) -> Result<FetchedImage> {
        self.images
            .get(reference)
            .cloned()
            .ok_or_else(|| StackError::RegistryFetch {
                reference: reference.to_string(),
                message: "image not registered with fake client".to_string(),
            })
    }
}

/// Builder for fake image fixtures.
#[derive(Debug, Clone)]
pub struct FakeImage {
    reference: String,
    labels: HashMap<String, String>,
    env: HashMap<String, String>,
}

impl FakeImage {
    /// Start a fixture for the given reference.
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            labels: HashMap::new(),
            env: HashMap::new(),
        }
    }

    /// Set a plain string label.
    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    /// Set a structured label, stored as its JSON text.
    pub fn with_json_label<T: Serialize>(mut self, key: impl Into<String>, value: &T) -> Self {
        let raw = serde_json::to_string(value).unwrap_or_default();
        self.labels.insert(key.into(), raw);
        self
    }

    /// Set a config environment variable.
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }

    /// Build the fetched image, deriving a digest identifier from the
    /// reference and registered content.
    pub fn build(self) -> FetchedImage {
        let identifier = format!(
            "{}@sha256:{}",
            repository(&self.reference),
            content_digest(&self.reference, &self.labels, &self.env)
        );

        FetchedImage::new(self.reference, identifier, self.labels, self.env)
    }
}

/// Strip the tag or digest from a reference, keeping registry/repository.
fn repository(reference: &str) -> &str {
    let base = reference.split('@').next().unwrap_or(reference);
    match base.rsplit_once(':') {
        // A ':' before the last path segment is a registry port, not a tag
        Some((repo, tag)) if !tag.contains('/') => repo,
        _ => base,
    }
}

/// Hash the fixture's reference, labels, and env into a stable hex digest.
fn content_digest(
    reference: &str,
    labels: &HashMap<String, String>,
    env: &HashMap<String, String>,
) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reference.as_bytes());

    let mut label_entries: Vec<String> =
        labels.iter().map(|(k, v)| format!("{k}={v}")).collect();
    label_entries.sort();
    for entry in &label_entries {
        hasher.update(entry.as_bytes());
    }

    let mut env_entries: Vec<String> = env.iter().map(|(k, v)| format!("{k}={v}")).collect();
    env_entries.sort();
    for entry in &env_entries {
        hasher.update(entry.as_bytes());
    }

    hex::encode(hasher.finalize())
}
