//! Packstone CLI - Cloud Native Buildpacks stack resolution.

pub mod commands;
pub mod output;
