//! Core data structures for skiff.
//!
//! This module contains the foundational types used throughout skiff:
//! - Source units produced by the parser
//! - Packages and the registry that owns them
//! - Build units chosen by target selection

pub mod build_unit;
pub mod package;
pub mod registry;
pub mod source_unit;

pub use build_unit::{BuildUnit, ExecutableUnit};
pub use package::{Package, PackageId, ENTRY_PACKAGE};
pub use registry::PackageRegistry;
pub use source_unit::SourceUnit;
