//! Package - a named collection of source files.
//!
//! Packages are created lazily by the registry the first time their name is
//! referenced, either by a file's own package clause or by another file's
//! import. A package that is only ever imported has no files.

use std::fmt;

use crate::core::SourceUnit;

/// Name of the package that holds program entry points.
pub const ENTRY_PACKAGE: &str = "main";

/// Index of a package in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackageId(usize);

impl PackageId {
    pub(crate) fn new(index: usize) -> Self {
        PackageId(index)
    }

    /// Arena index of this package.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A package with its files in discovery order.
///
/// Dependency edges are owned by the registry graph; build state is owned by
/// the build session.
#[derive(Debug, Clone)]
pub struct Package {
    id: PackageId,
    name: String,
    files: Vec<SourceUnit>,
}

impl Package {
    pub(crate) fn new(id: PackageId, name: impl Into<String>) -> Self {
        Package {
            id,
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub(crate) fn push_file(&mut self, unit: SourceUnit) {
        self.files.push(unit);
    }

    /// Arena id.
    pub fn id(&self) -> PackageId {
        self.id
    }

    /// Package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source files in discovery order.
    pub fn files(&self) -> &[SourceUnit] {
        &self.files
    }

    /// True if the package was referenced but never populated.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// True for the entry point package.
    pub fn is_entry_package(&self) -> bool {
        self.name == ENTRY_PACKAGE
    }

    /// Base name of the artifacts produced for this package.
    pub fn output_name(&self) -> &str {
        &self.name
    }

    /// Files that define an entry point.
    pub fn entry_points(&self) -> impl Iterator<Item = &SourceUnit> {
        self.files.iter().filter(|f| f.is_entry_point())
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_package_is_empty() {
        let pkg = Package::new(PackageId::new(0), "util");
        assert!(pkg.is_empty());
        assert!(!pkg.is_entry_package());
        assert_eq!(pkg.output_name(), "util");
    }

    #[test]
    fn test_entry_points() {
        let mut pkg = Package::new(PackageId::new(0), ENTRY_PACKAGE);
        pkg.push_file(SourceUnit::new("a.go", "main").with_entry_point(true));
        pkg.push_file(SourceUnit::new("shared.go", "main"));
        pkg.push_file(SourceUnit::new("b.go", "main").with_entry_point(true));

        let entries: Vec<_> = pkg.entry_points().map(|f| f.stem()).collect();
        assert_eq!(entries, vec!["a", "b"]);
        assert!(pkg.is_entry_package());
    }
}
