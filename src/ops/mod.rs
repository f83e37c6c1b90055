//! High-level operations.
//!
//! This module contains the implementation of skiff commands.

pub mod select;
pub mod skiff_build;
pub mod skiff_clean;

pub use select::{select_executables, select_libraries, Grouping, Selection};
pub use skiff_build::{build, plan, BuildMode, BuildOptions};
pub use skiff_clean::clean;
