//! Packstone Stack - stack resolution engine.
//!
//! This module implements stack resolution for Cloud Native Buildpacks
//! stacks: fetching build/run image metadata from a registry, validating
//! stack identity, reconciling mixin labels across the image pair, and
//! extracting the CNB user/group ids.

pub mod fake;
pub mod image;
pub mod metadata;
pub mod mixins;
pub mod registry;
pub mod remote;
pub mod resolver;

// Re-export common types
pub use fake::{FakeImage, FakeRegistryClient};
pub use image::FetchedImage;
pub use metadata::{
    read_builder_metadata, BuilderImageMetadata, BuilderStackMetadata, BuildpackInfo,
    CreatorMetadata, LifecycleApi, LifecycleMetadata, RunImageMetadata,
};
pub use mixins::{classify, merge, MixinPartition};
pub use registry::{RegistryAuth, RegistryClient};
pub use remote::{RemoteClientConfig, RemoteRegistryClient};
pub use resolver::{extract_id, read_mixins, validate_stack_id, StackResolver};

/// Packstone Stack version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
