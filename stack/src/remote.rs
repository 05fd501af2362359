//! Remote registry client.
//!
//! Uses the `oci-distribution` crate to fetch image metadata from
//! container registries (Docker Hub, GCR, GHCR, etc.). Only the manifest
//! and config blob are ever retrieved; layers are never pulled and nothing
//! is cached on disk.

use async_trait::async_trait;
use oci_distribution::client::{ClientConfig, ClientProtocol};
use oci_distribution::manifest::ImageIndexEntry;
use oci_distribution::{Client, Reference};
use oci_spec::image::ImageConfiguration;
use packstone_core::error::{Result, StackError};

use crate::image::FetchedImage;
use crate::registry::{RegistryAuth, RegistryClient};

/// Target platform for resolving multi-arch image indexes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteClientConfig {
    /// Operating system (e.g. "linux")
    pub os: String,

    /// CPU architecture in registry naming (e.g. "amd64", "arm64")
    pub architecture: String,
}

impl Default for RemoteClientConfig {
    /// Stack images target Linux; the architecture follows the host.
    fn default() -> Self {
        let architecture = match std::env::consts::ARCH {
            "x86_64" => "amd64",
            "aarch64" => "arm64",
            other => other,
        };

        Self {
            os: "linux".to_string(),
            architecture: architecture.to_string(),
        }
    }
}

impl RemoteClientConfig {
    /// Parse a platform string like "linux/amd64" or "linux/arm64".
    pub fn parse(platform: &str) -> std::result::Result<Self, String> {
        match platform.split_once('/') {
            Some((os, architecture)) if !os.is_empty() && !architecture.is_empty() => Ok(Self {
                os: os.to_string(),
                architecture: architecture.to_string(),
            }),
            _ => Err(format!("invalid platform (expected os/arch): {platform}")),
        }
    }
}

/// Fetches image metadata from container registries.
pub struct RemoteRegistryClient {
    client: Client,
}

impl RemoteRegistryClient {
    /// Create a client resolving indexes for the default platform.
    pub fn new() -> Self {
        Self::with_config(RemoteClientConfig::default())
    }

    /// Create a client resolving indexes for the given platform.
    pub fn with_config(config: RemoteClientConfig) -> Self {
        let RemoteClientConfig { os, architecture } = config;

        let client_config = ClientConfig {
            protocol: ClientProtocol::Https,
            platform_resolver: Some(Box::new(move |manifests: &[ImageIndexEntry]| {
                manifests
                    .iter()
                    .find(|entry| {
                        entry
                            .platform
                            .as_ref()
                            .map_or(false, |p| p.os == os && p.architecture == architecture)
                    })
                    .map(|entry| entry.digest.clone())
            })),
            ..Default::default()
        };

        Self {
            client: Client::new(client_config),
        }
    }
}

#[async_trait]
impl RegistryClient for RemoteRegistryClient {
    async fn fetch(&self, auth: &RegistryAuth, reference: &str) -> Result<FetchedImage> {
        let oci_ref: Reference =
            reference.parse().map_err(|e| StackError::RegistryFetch {
                reference: reference.to_string(),
                message: format!("invalid reference: {e}"),
            })?;

        tracing::debug!(reference = %reference, "Fetching image metadata");

        // Pull manifest (resolves multi-arch image indexes to the target platform)
        let oci_auth = auth.to_oci_auth();
        let (manifest, digest) = self
            .client
            .pull_image_manifest(&oci_ref, &oci_auth)
            .await
            .map_err(|e| StackError::RegistryFetch {
                reference: reference.to_string(),
                message: format!("failed to pull manifest: {e}"),
            })?;

        // Pull config blob (streams to a Vec<u8>)
        let mut config_data: Vec<u8> = Vec::new();
        self.client
            .pull_blob(&oci_ref, &manifest.config, &mut config_data)
            .await
            .map_err(|e| StackError::RegistryFetch {
                reference: reference.to_string(),
                message: format!("failed to pull config blob: {e}"),
            })?;

        let oci_config: ImageConfiguration =
            serde_json::from_slice(&config_data).map_err(|e| StackError::RegistryFetch {
                reference: reference.to_string(),
                message: format!("failed to parse image config: {e}"),
            })?;

        let identifier = format!(
            "{}/{}@{}",
            oci_ref.registry(),
            oci_ref.repository(),
            digest
        );

        tracing::debug!(
            reference = %reference,
            digest = %digest,
            "Image metadata fetched"
        );

        Ok(FetchedImage::from_config(reference, identifier, &oci_config))
    }
}
