//! PackageRegistry - owns every package discovered in a run.
//!
//! Packages live in an index-addressed arena; dependency edges are kept in a
//! graph whose node indices mirror the arena, so traversals can use plain
//! index-based bitsets.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::core::package::ENTRY_PACKAGE;
use crate::core::{Package, PackageId, SourceUnit};

/// All packages of a build root, indexed by name.
#[derive(Debug, Default)]
pub struct PackageRegistry {
    packages: Vec<Package>,
    by_name: HashMap<String, PackageId>,
    graph: DiGraph<PackageId, ()>,
}

impl PackageRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parsed file.
    ///
    /// Creates the owning package if needed, appends the file, creates any
    /// imported package that does not exist yet and records the dependency
    /// edges. Duplicate edges collapse.
    pub fn register(&mut self, unit: SourceUnit) {
        let owner = self.get_or_create(unit.package());

        for import in unit.imports() {
            let dep = self.get_or_create(import);
            if dep == owner {
                tracing::warn!(
                    "ignoring import of package `{}` from its own file {}",
                    import,
                    unit.path().display()
                );
                continue;
            }
            self.graph
                .update_edge(NodeIndex::new(owner.index()), NodeIndex::new(dep.index()), ());
        }

        tracing::trace!("registered {} in package `{}`", unit.path().display(), unit.package());
        self.packages[owner.index()].push_file(unit);
    }

    fn get_or_create(&mut self, name: &str) -> PackageId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = PackageId::new(self.packages.len());
        let node = self.graph.add_node(id);
        debug_assert_eq!(node.index(), id.index());

        self.packages.push(Package::new(id, name));
        self.by_name.insert(name.to_string(), id);
        id
    }

    /// Look up a package by name.
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.by_name.get(name).map(|&id| &self.packages[id.index()])
    }

    /// Get a package by id.
    pub fn package(&self, id: PackageId) -> &Package {
        &self.packages[id.index()]
    }

    /// The entry point package, if any file declared or imported it.
    pub fn entry_package(&self) -> Option<&Package> {
        self.get(ENTRY_PACKAGE)
    }

    /// Direct dependencies of a package, ordered by package name.
    pub fn dependencies(&self, id: PackageId) -> Vec<PackageId> {
        let mut deps: Vec<PackageId> = self
            .graph
            .neighbors(NodeIndex::new(id.index()))
            .map(|n| self.graph[n])
            .collect();
        deps.sort_by(|a, b| self.package(*a).name().cmp(self.package(*b).name()));
        deps
    }

    /// Every package ordered so that dependencies precede their importers.
    ///
    /// Returns `None` if the import graph has a cycle.
    pub fn dependency_order(&self) -> Option<Vec<PackageId>> {
        let sorted = toposort(&self.graph, None).ok()?;
        Some(sorted.into_iter().rev().map(|n| self.graph[n]).collect())
    }

    /// Number of files that define an entry point, across all packages.
    pub fn entry_point_count(&self) -> usize {
        self.entry_point_units().len()
    }

    /// All files that define an entry point, in discovery order per package.
    pub fn entry_point_units(&self) -> Vec<&SourceUnit> {
        self.packages
            .iter()
            .flat_map(|p| p.entry_points())
            .collect()
    }

    /// Every package name except the entry point package.
    pub fn library_names(&self) -> BTreeSet<&str> {
        self.packages
            .iter()
            .filter(|p| !p.is_entry_package())
            .map(|p| p.name())
            .collect()
    }

    /// Number of packages, including file-less ones.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True if no package has been registered.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
