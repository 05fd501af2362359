//! Fetched image metadata.
//!
//! A [`FetchedImage`] is the engine's view of one retrieved image: the
//! reference it was fetched by, the digest-pinned identifier of the exact
//! bytes served, and the config labels and environment. Registry clients
//! build these; the resolver only reads through them.

use std::collections::HashMap;

use oci_spec::image::ImageConfiguration;
use packstone_core::error::{Result, StackError};
use serde::de::DeserializeOwned;

/// Metadata of one fetched image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Reference the image was fetched by
    reference: String,

    /// Digest-pinned identifier of the fetched bytes
    /// (e.g. `gcr.io/stacks/build@sha256:...`)
    identifier: String,

    /// Config labels
    labels: HashMap<String, String>,

    /// Config environment variables
    env: HashMap<String, String>,
}

impl FetchedImage {
    /// Create a fetched image from already-parsed metadata.
    pub fn new(
        reference: impl Into<String>,
        identifier: impl Into<String>,
        labels: HashMap<String, String>,
        env: HashMap<String, String>,
    ) -> Self {
        Self {
            reference: reference.into(),
            identifier: identifier.into(),
            labels,
            env,
        }
    }

    /// Create a fetched image from an OCI image configuration.
    pub fn from_config(
        reference: impl Into<String>,
        identifier: impl Into<String>,
        oci_config: &ImageConfiguration,
    ) -> Self {
        let config = oci_config.config();

        let labels = config
            .as_ref()
            .and_then(|c| c.labels().clone())
            .unwrap_or_default();

        let env = config
            .as_ref()
            .and_then(|c| c.env().as_ref())
            .map(|env_list| {
                env_list
                    .iter()
                    .filter_map(|e| {
                        let parts: Vec<&str> = e.splitn(2, '=').collect();
                        if parts.len() == 2 {
                            Some((parts[0].to_string(), parts[1].to_string()))
                        } else {
                            None
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            reference: reference.into(),
            identifier: identifier.into(),
            labels,
            env,
        }
    }

    /// Get the reference this image was fetched by.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Get the digest-pinned identifier of the fetched bytes.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Check whether a label is present.
    pub fn has_label(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Get a label value as a plain string.
    pub fn string_label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(|s| s.as_str())
    }

    /// Decode a label value from its JSON representation.
    ///
    /// Structured labels (e.g. the mixins list) are stored as JSON text in
    /// the label value. Fails with `LabelRead` if the label is absent or
    /// does not decode to the requested shape.
    pub fn label<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let raw = self.labels.get(key).ok_or_else(|| StackError::LabelRead {
            reference: self.reference.clone(),
            label: key.to_string(),
            message: "label not present".to_string(),
        })?;

        serde_json::from_str(raw).map_err(|e| StackError::LabelRead {
            reference: self.reference.clone(),
            label: key.to_string(),
            message: e.to_string(),
        })
    }

    /// Get a config environment variable value.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.env.get(name).map(|s| s.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> ImageConfiguration {
        let config_content = r#"{
            "architecture": "amd64",
            "os": "linux",
            "config": {
                "Env": [
                    "PATH=/usr/local/bin:/usr/bin:/bin",
                    "CNB_USER_ID=1000",
                    "CNB_GROUP_ID=1000",
                    "MALFORMED"
                ],
                "Labels": {
                    "io.buildpacks.stack.id": "io.buildpacks.stacks.focal",
                    "io.buildpacks.stack.mixins": "[\"ca-certs\", \"build:git\"]",
                    "not.json": "{{"
                }
            },
            "rootfs": {
                "type": "layers",
                "diff_ids": ["sha256:layer1hash"]
            },
            "history": []
        }"#;
        serde_json::from_str(config_content).unwrap()
    }

    fn sample_image() -> FetchedImage {
        FetchedImage::from_config(
            "gcr.io/stacks/build:focal",
            "gcr.io/stacks/build@sha256:abc123",
            &sample_config(),
        )
    }

    #[test]
    fn test_from_config_parses_labels() {
        let image = sample_image();

        assert!(image.has_label("io.buildpacks.stack.id"));
        assert_eq!(
            image.string_label("io.buildpacks.stack.id"),
            Some("io.buildpacks.stacks.focal")
        );
        assert_eq!(image.string_label("missing"), None);
    }

    #[test]
    fn test_from_config_parses_env() {
        let image = sample_image();

        assert_eq!(
            image.env("PATH"),
            Some("/usr/local/bin:/usr/bin:/bin")
        );
        assert_eq!(image.env("CNB_USER_ID"), Some("1000"));
        // Entries without '=' are skipped
        assert_eq!(image.env("MALFORMED"), None);
    }

    #[test]
    fn test_reference_and_identifier() {
        let image = sample_image();
        assert_eq!(image.reference(), "gcr.io/stacks/build:focal");
        assert_eq!(image.identifier(), "gcr.io/stacks/build@sha256:abc123");
    }

    #[test]
    fn test_structured_label_decodes() {
        let image = sample_image();
        let mixins: Vec<String> = image.label("io.buildpacks.stack.mixins").unwrap();
        assert_eq!(
            mixins,
            vec!["ca-certs".to_string(), "build:git".to_string()]
        );
    }

    #[test]
    fn test_structured_label_malformed() {
        let image = sample_image();
        let result: Result<Vec<String>> = image.label("not.json");

        let err = result.unwrap_err();
        assert!(matches!(err, StackError::LabelRead { .. }));
        assert!(err.to_string().contains("not.json"));
        assert!(err.to_string().contains("gcr.io/stacks/build:focal"));
    }

    #[test]
    fn test_structured_label_absent() {
        let image = sample_image();
        let result: Result<Vec<String>> = image.label("absent.label");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("label not present"));
    }

    #[test]
    fn test_from_config_without_config_section() {
        let config: ImageConfiguration = serde_json::from_str(
            r#"{
                "architecture": "amd64",
                "os": "linux",
                "rootfs": {"type": "layers", "diff_ids": []},
                "history": []
            }"#,
        )
        .unwrap();

        let image = FetchedImage::from_config("img:latest", "img@sha256:000", &config);
        assert!(!image.has_label("io.buildpacks.stack.id"));
        assert_eq!(image.env("CNB_USER_ID"), None);
    }

    #[test]
    fn test_env_value_containing_equals() {
        let mut env = HashMap::new();
        env.insert("OPTS".to_string(), "a=1,b=2".to_string());
        let image = FetchedImage::new("img:latest", "img@sha256:000", HashMap::new(), env);

        assert_eq!(image.env("OPTS"), Some("a=1,b=2"));
    }
}
