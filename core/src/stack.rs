//! Stack data model.
//!
//! A stack is a paired build/run container image combination sharing a
//! declared identifier and a compatible set of OS-level capability tokens
//! (mixins). The types here are plain immutable values: a `StackSpec` is
//! what the caller declares, a `ResolvedStack` is what resolution produces.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared input for a stack resolution.
///
/// Supplied by the caller and never mutated; loadable from JSON or YAML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSpec {
    /// Stack identifier both images must declare (e.g. "io.buildpacks.stacks.focal")
    pub id: String,

    /// Build image reference
    pub build_image: String,

    /// Run image reference
    pub run_image: String,
}

/// One side of a resolved stack: the reference the caller declared and the
/// digest-pinned identifier of the exact bytes that were fetched.
///
/// Field names are fixed by downstream consumers of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackImage {
    #[serde(rename = "Image")]
    pub image: String,

    #[serde(rename = "LatestImage")]
    pub latest_image: String,
}

/// The validated, merged stack descriptor.
///
/// Produced once per resolution call and never mutated afterwards. The
/// serialized field names (`Id`, `BuildImage`, `RunImage`, `Mixins`,
/// `UserID`, `GroupID`) are fixed by downstream consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedStack {
    #[serde(rename = "Id")]
    pub id: String,

    #[serde(rename = "BuildImage")]
    pub build_image: StackImage,

    #[serde(rename = "RunImage")]
    pub run_image: StackImage,

    /// Merged mixins: build-image common tokens, then build-scoped tokens,
    /// then run-scoped tokens, each bucket in extraction order
    #[serde(rename = "Mixins")]
    pub mixins: Vec<String>,

    #[serde(rename = "UserID")]
    pub user_id: i64,

    #[serde(rename = "GroupID")]
    pub group_id: i64,
}

/// The role an image plays in a stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackStage {
    /// The image buildpacks run against at build time
    Build,
    /// The image the built application runs on
    Run,
}

impl StackStage {
    /// The mixin prefix that scopes a token to this stage.
    pub fn prefix(&self) -> &'static str {
        match self {
            StackStage::Build => "build:",
            StackStage::Run => "run:",
        }
    }

    /// The opposite stage.
    pub fn other(&self) -> StackStage {
        match self {
            StackStage::Build => StackStage::Run,
            StackStage::Run => StackStage::Build,
        }
    }
}

impl fmt::Display for StackStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackStage::Build => write!(f, "build"),
            StackStage::Run => write!(f, "run"),
        }
    }
}
