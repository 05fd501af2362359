//! Registry client abstraction and authentication.
//!
//! The resolver never talks to a registry directly; it goes through the
//! [`RegistryClient`] trait so it can run against the remote client or an
//! in-memory fake.

use async_trait::async_trait;
use oci_distribution::secrets::RegistryAuth as OciRegistryAuth;
use packstone_core::error::Result;

use crate::image::FetchedImage;

/// Authentication credentials for a container registry.
#[derive(Debug, Clone)]
pub struct RegistryAuth {
    username: Option<String>,
    password: Option<String>,
}

impl RegistryAuth {
    /// Create anonymous authentication (no credentials).
    pub fn anonymous() -> Self {
        Self {
            username: None,
            password: None,
        }
    }

    /// Create basic authentication with username and password.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Create authentication from environment variables.
    ///
    /// Reads `REGISTRY_USERNAME` and `REGISTRY_PASSWORD`.
    /// Falls back to anonymous if not set.
    pub fn from_env() -> Self {
        let username = std::env::var("REGISTRY_USERNAME").ok();
        let password = std::env::var("REGISTRY_PASSWORD").ok();

        if username.is_some() && password.is_some() {
            Self { username, password }
        } else {
            Self::anonymous()
        }
    }

    /// Convert to oci-distribution auth type.
    pub(crate) fn to_oci_auth(&self) -> OciRegistryAuth {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) => OciRegistryAuth::Basic(u.clone(), p.clone()),
            _ => OciRegistryAuth::Anonymous,
        }
    }
}

/// Trait for registry client implementations.
///
/// A fetch retrieves just enough of an image to read its metadata: the
/// config labels, the config env, and a digest-pinned identifier for the
/// exact bytes the registry served.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Fetch an image's metadata by reference.
    async fn fetch(&self, auth: &RegistryAuth, reference: &str) -> Result<FetchedImage>;
}
