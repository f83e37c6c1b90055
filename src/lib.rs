//! skiff - a build driver for the legacy Go toolchain
//!
//! This crate provides the core library functionality for skiff: source
//! discovery, the package registry, target selection and dependency-ordered
//! invocation of the architecture-specific compiler, linker and archiver.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities and fakes for skiff unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording process runner and source tree
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use builder::BuildError;
pub use core::{Package, PackageId, PackageRegistry, SourceUnit};
pub use util::context::GlobalContext;
