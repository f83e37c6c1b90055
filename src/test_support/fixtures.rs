//! Source tree fixtures.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::PackageRegistry;
use crate::sources::parse_str;

/// An in-memory source tree.
///
/// Files can be parsed straight into a registry or written to disk for
/// tests that walk a real directory.
#[derive(Debug, Clone, Default)]
pub struct TreeFixture {
    /// Source files (path relative to the root -> content), in path order.
    pub files: BTreeMap<PathBuf, String>,
}

impl TreeFixture {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with literal content.
    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    /// Add a library file declaring `package` and importing `imports`.
    pub fn with_library(self, path: &str, package: &str, imports: &[&str]) -> Self {
        self.with_file(path, sources::library(package, imports))
    }

    /// Add an entry file in package `main` importing `imports`.
    pub fn with_entry(self, path: &str, imports: &[&str]) -> Self {
        self.with_file(path, sources::entry(imports))
    }

    /// Parse every file and register it, in path order.
    pub fn registry(&self) -> PackageRegistry {
        let mut registry = PackageRegistry::new();
        for (path, content) in &self.files {
            let unit = parse_str(path.clone(), content).unwrap();
            registry.register(unit);
        }
        registry
    }

    /// Write this fixture below `root`.
    pub fn write_to(&self, root: &Path) -> std::io::Result<()> {
        for (rel_path, content) in &self.files {
            let full_path = root.join(rel_path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full_path, content)?;
        }
        Ok(())
    }
}

/// Source templates.
pub mod sources {
    fn import_block(imports: &[&str]) -> String {
        if imports.is_empty() {
            return String::new();
        }
        let mut block = String::from("import (\n");
        for import in imports {
            block.push_str(&format!("    \"./{}\"\n", import));
        }
        block.push_str(")\n\n");
        block
    }

    /// A library file.
    pub fn library(package: &str, imports: &[&str]) -> String {
        format!(
            "package {}\n\n{}func Run() {{\n}}\n",
            package,
            import_block(imports)
        )
    }

    /// A file in package `main` defining `func main()`.
    pub fn entry(imports: &[&str]) -> String {
        format!(
            "package main\n\n{}func main() {{\n}}\n",
            import_block(imports)
        )
    }

    /// A file in package `main` without an entry point.
    pub fn shared(imports: &[&str]) -> String {
        format!(
            "package main\n\n{}func helper() {{\n}}\n",
            import_block(imports)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_registry() {
        let registry = TreeFixture::new()
            .with_entry("main.go", &["util"])
            .with_library("util/util.go", "util", &[])
            .registry();

        assert_eq!(registry.entry_point_count(), 1);
        assert_eq!(registry.get("util").unwrap().files().len(), 1);
    }
}
