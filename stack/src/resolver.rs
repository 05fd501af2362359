//! Stack resolution.
//!
//! [`StackResolver`] turns a [`StackSpec`] into a [`ResolvedStack`]: it
//! fetches the build/run image pair, validates that both declare the
//! expected stack id, extracts the CNB user/group ids from the build
//! image, reconciles the two mixin lists, and assembles the result. The
//! first failing stage aborts the call; nothing is retried and no partial
//! result is produced.

use std::sync::Arc;

use packstone_core::error::{Result, StackError};
use packstone_core::stack::{ResolvedStack, StackImage, StackSpec};

use crate::image::FetchedImage;
use crate::metadata::{CNB_GROUP_ID, CNB_USER_ID, STACK_ID_LABEL, STACK_MIXINS_LABEL};
use crate::mixins::merge;
use crate::registry::{RegistryAuth, RegistryClient};

/// Resolves stack specs against a registry.
///
/// Holds no mutable state; concurrent `resolve` calls do not interact.
pub struct StackResolver {
    client: Arc<dyn RegistryClient>,
    auth: RegistryAuth,
}

impl StackResolver {
    /// Create a resolver with anonymous registry authentication.
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self::with_auth(client, RegistryAuth::anonymous())
    }

    /// Create a resolver with the given registry authentication.
    pub fn with_auth(client: Arc<dyn RegistryClient>, auth: RegistryAuth) -> Self {
        Self { client, auth }
    }

    /// Resolve a stack spec into an immutable descriptor.
    ///
    /// The two image fetches run concurrently; both must complete before
    /// validation starts, and a failure in either aborts the call with the
    /// first error. The later stages run sequentially: identity check,
    /// user/group id extraction from the build image, mixin read and merge.
    pub async fn resolve(&self, spec: &StackSpec) -> Result<ResolvedStack> {
        tracing::info!(
            stack = %spec.id,
            build = %spec.build_image,
            run = %spec.run_image,
            "Resolving stack"
        );

        let (build_image, run_image) = tokio::try_join!(
            self.client.fetch(&self.auth, &spec.build_image),
            self.client.fetch(&self.auth, &spec.run_image),
        )?;

        validate_stack_id(&spec.id, &build_image, &run_image)?;

        let user_id = extract_id(&build_image, CNB_USER_ID)?;
        let group_id = extract_id(&build_image, CNB_GROUP_ID)?;

        let build_mixins = read_mixins(&build_image)?;
        let run_mixins = read_mixins(&run_image)?;

        let mixins = merge(&build_mixins, &run_mixins)?;

        tracing::info!(
            stack = %spec.id,
            build_image = %build_image.identifier(),
            run_image = %run_image.identifier(),
            mixins = mixins.len(),
            "Stack resolved"
        );

        Ok(ResolvedStack {
            id: spec.id.clone(),
            build_image: StackImage {
                image: spec.build_image.clone(),
                latest_image: build_image.identifier().to_string(),
            },
            run_image: StackImage {
                image: spec.run_image.clone(),
                latest_image: run_image.identifier().to_string(),
            },
            mixins,
            user_id,
            group_id,
        })
    }
}

/// Check that both images declare the expected stack id.
///
/// An unreadable label counts as a mismatch; the error reports both
/// observed values so either side's deviation is visible.
pub fn validate_stack_id(
    expected: &str,
    build_image: &FetchedImage,
    run_image: &FetchedImage,
) -> Result<()> {
    let build_stack = build_image.string_label(STACK_ID_LABEL);
    let run_stack = run_image.string_label(STACK_ID_LABEL);

    if build_stack != Some(expected) || run_stack != Some(expected) {
        return Err(StackError::StackIdMismatch {
            expected: expected.to_string(),
            build: build_stack.map(|s| s.to_string()),
            run: run_stack.map(|s| s.to_string()),
        });
    }

    Ok(())
}

/// Parse a numeric id from an image's config environment.
pub fn extract_id(image: &FetchedImage, variable: &str) -> Result<i64> {
    let value = image
        .env(variable)
        .ok_or_else(|| StackError::InvalidIdentityValue {
            variable: variable.to_string(),
            message: "variable is not set".to_string(),
        })?;

    value
        .parse::<i64>()
        .map_err(|e| StackError::InvalidIdentityValue {
            variable: variable.to_string(),
            message: e.to_string(),
        })
}

/// Read an image's mixin list.
///
/// An absent mixins label is not an error: a stack with zero mixins is
/// valid. A present but malformed label fails with `LabelRead`.
pub fn read_mixins(image: &FetchedImage) -> Result<Vec<String>> {
    if !image.has_label(STACK_MIXINS_LABEL) {
        return Ok(Vec::new());
    }

    image.label(STACK_MIXINS_LABEL)
}
