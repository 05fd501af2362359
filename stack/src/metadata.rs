//! CNB label and environment schema.
//!
//! Stack and builder images carry their metadata in well-known OCI config
//! labels and environment variables. The names must match bit-for-bit;
//! they are part of the Cloud Native Buildpacks contract, not ours.
//!
//! # Label Schema
//!
//! ## Stack images (build and run)
//! - `io.buildpacks.stack.id` - stack identifier, plain string
//! - `io.buildpacks.stack.mixins` - capability tokens, JSON string array
//!
//! ## Build image environment
//! - `CNB_USER_ID` - numeric build-time user id
//! - `CNB_GROUP_ID` - numeric build-time group id
//!
//! ## Builder images
//! - `io.buildpacks.builder.metadata` - builder description, stack
//!   run-image, lifecycle versions, creator, buildpack listing (JSON)

use packstone_core::error::Result;
use serde::{Deserialize, Serialize};

use crate::image::FetchedImage;

/// Label carrying the stack identifier.
pub const STACK_ID_LABEL: &str = "io.buildpacks.stack.id";

/// Label carrying the mixin token list.
pub const STACK_MIXINS_LABEL: &str = "io.buildpacks.stack.mixins";

/// Label carrying builder image metadata.
pub const BUILDER_METADATA_LABEL: &str = "io.buildpacks.builder.metadata";

/// Environment variable carrying the build-time user id.
pub const CNB_USER_ID: &str = "CNB_USER_ID";

/// Environment variable carrying the build-time group id.
pub const CNB_GROUP_ID: &str = "CNB_GROUP_ID";

/// Metadata a builder image declares about itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderImageMetadata {
    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub stack: BuilderStackMetadata,

    #[serde(default)]
    pub lifecycle: LifecycleMetadata,

    #[serde(default)]
    pub created_by: CreatorMetadata,

    #[serde(default)]
    pub buildpacks: Vec<BuildpackInfo>,
}

/// The stack a builder targets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuilderStackMetadata {
    #[serde(default)]
    pub run_image: RunImageMetadata,
}

/// Run image a builder pairs with, plus its mirrors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunImageMetadata {
    #[serde(default)]
    pub image: String,

    /// Serialized as null by some producers when empty
    #[serde(default)]
    pub mirrors: Option<Vec<String>>,
}

/// Lifecycle version and API levels baked into a builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleMetadata {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub api: LifecycleApi,
}

/// Lifecycle API levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifecycleApi {
    #[serde(default)]
    pub buildpack: String,

    #[serde(default)]
    pub platform: String,
}

/// Tool that created a builder image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorMetadata {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,
}

/// One buildpack in a builder's listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildpackInfo {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub homepage: String,
}

/// Read and decode a builder image's metadata label.
///
/// Fails with `LabelRead` if the label is absent or malformed; check
/// `image.has_label(BUILDER_METADATA_LABEL)` first for non-builder images.
pub fn read_builder_metadata(image: &FetchedImage) -> Result<BuilderImageMetadata> {
    image.label(BUILDER_METADATA_LABEL)
}
