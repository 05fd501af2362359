use thiserror::Error;

use crate::stack::StackStage;

/// Packstone error types.
///
/// Every failure mode of a stack resolution maps to exactly one variant;
/// there is no catch-all. All variants are fatal to the resolution attempt
/// that produced them and none are retried internally.
#[derive(Error, Debug)]
pub enum StackError {
    /// Fetching an image's metadata from the registry failed
    #[error("failed to fetch image {reference}: {message}")]
    RegistryFetch { reference: String, message: String },

    /// One or both images do not declare the expected stack id
    #[error(
        "invalid stack images. expected stack: {expected}, build image stack: {}, run image stack: {}",
        .build.as_deref().unwrap_or("(unset)"),
        .run.as_deref().unwrap_or("(unset)")
    )]
    StackIdMismatch {
        expected: String,
        build: Option<String>,
        run: Option<String>,
    },

    /// A label exists but cannot be decoded to its expected shape
    #[error("failed to read label {label} from {reference}: {message}")]
    LabelRead {
        reference: String,
        label: String,
        message: String,
    },

    /// A mixin scoped to the opposite stage was found on an image
    #[error(
        "{found_on} image contains {scoped_to}-only mixin(s): {}",
        .mixins.join(", ")
    )]
    InvalidMixinPrefix {
        found_on: StackStage,
        scoped_to: StackStage,
        mixins: Vec<String>,
    },

    /// A common mixin on the build image is absent from the run image
    #[error("runImage missing required mixin(s): {}", .mixins.join(", "))]
    MissingCommonMixins { mixins: Vec<String> },

    /// The user/group id environment value is missing or non-numeric
    #[error("validating build image: env {variable}: {message}")]
    InvalidIdentityValue { variable: String, message: String },
}

/// Result type alias for Packstone operations
pub type Result<T> = std::result::Result<T, StackError>;
