//! Mixin classification and merge.
//!
//! Mixins are opaque capability tokens attached to stack images via the
//! `io.buildpacks.stack.mixins` label. A token may carry a stage prefix
//! (`build:` or `run:`) restricting it to one image role; an unprefixed
//! token is common and must exist on both images.
//!
//! Everything in this module is pure: no I/O, no shared state, stable
//! output order for a given input.

use std::collections::HashSet;

use packstone_core::error::{Result, StackError};
use packstone_core::stack::StackStage;

/// Result of partitioning one image's mixin list.
///
/// The three buckets cover the input exactly, each preserving the input
/// order of its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixinPartition {
    /// Tokens carrying the valid prefix for the image's stage
    pub valid: Vec<String>,

    /// Tokens carrying the opposite stage's prefix
    pub invalid: Vec<String>,

    /// Unprefixed tokens
    pub common: Vec<String>,
}

/// Partition a mixin list by stage prefix.
///
/// Single pass: a token with `valid_prefix` goes to `valid`, a token with
/// `invalid_prefix` goes to `invalid`, everything else is `common`.
pub fn classify(mixins: &[String], valid_prefix: &str, invalid_prefix: &str) -> MixinPartition {
    let mut partition = MixinPartition {
        valid: Vec::new(),
        invalid: Vec::new(),
        common: Vec::new(),
    };

    for m in mixins {
        if m.starts_with(valid_prefix) {
            partition.valid.push(m.clone());
        } else if m.starts_with(invalid_prefix) {
            partition.invalid.push(m.clone());
        } else {
            partition.common.push(m.clone());
        }
    }

    partition
}

/// Merge the build and run images' mixin lists into the resolved sequence.
///
/// Both lists are classified against their own stage, then cross-validated:
/// a stage-prefixed token on the wrong image fails with
/// `InvalidMixinPrefix`, and a common token on the build image that the run
/// image lacks fails with `MissingCommonMixins`. The run image may carry
/// extra common tokens the build image lacks.
///
/// The merged order is the build image's common tokens, then its
/// build-scoped tokens, then the run image's run-scoped tokens, each in
/// extraction order. No deduplication is performed; duplicate tokens pass
/// through verbatim.
pub fn merge(build: &[String], run: &[String]) -> Result<Vec<String>> {
    let build_part = classify(build, StackStage::Build.prefix(), StackStage::Run.prefix());
    if !build_part.invalid.is_empty() {
        return Err(StackError::InvalidMixinPrefix {
            found_on: StackStage::Build,
            scoped_to: StackStage::Run,
            mixins: build_part.invalid,
        });
    }

    let run_part = classify(run, StackStage::Run.prefix(), StackStage::Build.prefix());
    if !run_part.invalid.is_empty() {
        return Err(StackError::InvalidMixinPrefix {
            found_on: StackStage::Run,
            scoped_to: StackStage::Build,
            mixins: run_part.invalid,
        });
    }

    let missing = missing_common_run_mixins(&build_part.common, &run_part.common);
    if !missing.is_empty() {
        return Err(StackError::MissingCommonMixins { mixins: missing });
    }

    let mut merged = build_part.common;
    merged.extend(build_part.valid);
    merged.extend(run_part.valid);
    Ok(merged)
}

/// Common mixins of the build image that the run image does not carry,
/// in build-image order.
fn missing_common_run_mixins(build_common: &[String], run_common: &[String]) -> Vec<String> {
    let run_set: HashSet<&str> = run_common.iter().map(|s| s.as_str()).collect();

    build_common
        .iter()
        .filter(|m| !run_set.contains(m.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_partitions_by_prefix() {
        let partition = classify(&strings(&["common1", "build:a", "run:x"]), "build:", "run:");

        assert_eq!(partition.valid, strings(&["build:a"]));
        assert_eq!(partition.invalid, strings(&["run:x"]));
        assert_eq!(partition.common, strings(&["common1"]));
    }

    #[test]
    fn test_classify_covers_input_with_order_preserved() {
        let input = strings(&[
            "zlib", "build:gcc", "run:curl", "ca-certs", "build:make", "run:tar",
        ]);
        let partition = classify(&input, "build:", "run:");

        assert_eq!(
            partition.valid.len() + partition.invalid.len() + partition.common.len(),
            input.len()
        );
        assert_eq!(partition.valid, strings(&["build:gcc", "build:make"]));
        assert_eq!(partition.invalid, strings(&["run:curl", "run:tar"]));
        assert_eq!(partition.common, strings(&["zlib", "ca-certs"]));
    }

    #[test]
    fn test_classify_empty_input() {
        let partition = classify(&[], "build:", "run:");

        assert!(partition.valid.is_empty());
        assert!(partition.invalid.is_empty());
        assert!(partition.common.is_empty());
    }

    #[test]
    fn test_classify_keeps_duplicates() {
        let partition = classify(&strings(&["libssl", "libssl", "build:git"]), "build:", "run:");

        assert_eq!(partition.common, strings(&["libssl", "libssl"]));
    }

    #[test]
    fn test_merge_concatenates_common_build_run() {
        let merged = merge(
            &strings(&["build:a", "common1"]),
            &strings(&["run:x", "common1"]),
        )
        .unwrap();

        assert_eq!(merged, strings(&["common1", "build:a", "run:x"]));
    }

    #[test]
    fn test_merge_order_within_buckets() {
        let merged = merge(
            &strings(&["zlib", "build:gcc", "ca-certs", "build:make"]),
            &strings(&["ca-certs", "run:curl", "zlib", "run:tar"]),
        )
        .unwrap();

        assert_eq!(
            merged,
            strings(&[
                "zlib", "ca-certs", "build:gcc", "build:make", "run:curl", "run:tar",
            ])
        );
    }

    #[test]
    fn test_merge_run_only_mixin_on_build_image() {
        let err = merge(&strings(&["run:x"]), &[]).unwrap_err();

        assert!(matches!(
            err,
            StackError::InvalidMixinPrefix {
                found_on: StackStage::Build,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "build image contains run-only mixin(s): run:x"
        );
    }

    #[test]
    fn test_merge_build_only_mixin_on_run_image() {
        let err = merge(&[], &strings(&["build:gcc", "build:make"])).unwrap_err();

        assert!(matches!(
            err,
            StackError::InvalidMixinPrefix {
                found_on: StackStage::Run,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "run image contains build-only mixin(s): build:gcc, build:make"
        );
    }

    #[test]
    fn test_merge_missing_common_mixin() {
        let err = merge(&strings(&["shared"]), &[]).unwrap_err();

        assert!(matches!(err, StackError::MissingCommonMixins { .. }));
        assert_eq!(err.to_string(), "runImage missing required mixin(s): shared");
    }

    #[test]
    fn test_merge_missing_common_mixins_listed_in_build_order() {
        let err = merge(
            &strings(&["libssl", "ca-certs", "zlib"]),
            &strings(&["ca-certs"]),
        )
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "runImage missing required mixin(s): libssl, zlib"
        );
    }

    #[test]
    fn test_merge_build_side_error_reported_first() {
        // Both images are invalid; the build image's invalid tokens win.
        let err = merge(&strings(&["run:x"]), &strings(&["build:y"])).unwrap_err();

        assert_eq!(
            err.to_string(),
            "build image contains run-only mixin(s): run:x"
        );
    }

    #[test]
    fn test_merge_run_image_may_have_extra_common_mixins() {
        let merged = merge(
            &strings(&["ca-certs"]),
            &strings(&["ca-certs", "libfreetype", "fonts"]),
        )
        .unwrap();

        // Run-side extras are not re-emitted.
        assert_eq!(merged, strings(&["ca-certs"]));
    }

    #[test]
    fn test_merge_empty_inputs() {
        let merged = merge(&[], &[]).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    fn test_merge_does_not_deduplicate() {
        let merged = merge(
            &strings(&["libssl", "libssl", "build:git", "build:git"]),
            &strings(&["libssl", "run:git"]),
        )
        .unwrap();

        assert_eq!(
            merged,
            strings(&["libssl", "libssl", "build:git", "build:git", "run:git"])
        );
    }

    #[test]
    fn test_merge_is_deterministic() {
        let build = strings(&["b", "a", "build:z", "build:a"]);
        let run = strings(&["a", "b", "run:m"]);

        let first = merge(&build, &run).unwrap();
        let second = merge(&build, &run).unwrap();
        assert_eq!(first, second);
    }
}
