//! Source discovery.
//!
//! Walks the build root, scans every source file and registers it into a
//! [`PackageRegistry`].

pub mod parser;
pub mod walker;

use anyhow::Result;

use crate::core::PackageRegistry;

pub use parser::{parse_source, parse_str, ParseError};
pub use walker::SourceWalker;

/// Walk, parse and register every source file found by `walker`.
///
/// The first unreadable or malformed file aborts discovery.
pub fn discover(walker: &SourceWalker) -> Result<PackageRegistry> {
    let mut registry = PackageRegistry::new();

    for path in walker.walk()? {
        let unit = parse_source(walker.root(), &path)?;
        registry.register(unit);
    }

    tracing::debug!("discovered {} package(s)", registry.len());
    Ok(registry)
}
