//! Packstone Core - Foundational Types and Abstractions
//!
//! This module provides the stack data model and error types
//! used across the Packstone ecosystem.

pub mod error;
pub mod stack;

// Re-export commonly used types
pub use error::{Result, StackError};
pub use stack::{ResolvedStack, StackImage, StackSpec, StackStage};

/// Packstone version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
