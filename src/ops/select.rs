//! Target selection.
//!
//! Turns the registry and the requested targets into concrete build units.
//! All requested names are validated before any unit is returned, so an
//! unknown target fails the run before the toolchain is invoked.

use std::collections::{BTreeMap, BTreeSet};

use crate::builder::errors::BuildError;
use crate::core::{BuildUnit, ExecutableUnit, Package, PackageId, PackageRegistry, SourceUnit, ENTRY_PACKAGE};

/// Which files of the entry package go into each executable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Grouping {
    /// Entry file plus every entry package file that defines no entry point
    #[default]
    Grouped,
    /// Entry file only
    Isolated,
}

/// What to select in executable mode.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Entry files requested by path (empty = decided by `build_all`)
    pub targets: &'a [String],
    /// Build every entry file
    pub build_all: bool,
    pub grouping: Grouping,
    /// Explicit executable name from `-o`
    pub output_name: Option<&'a str>,
}

/// Select the executables to build.
pub fn select_executables(
    registry: &PackageRegistry,
    selection: &Selection<'_>,
) -> Result<Vec<BuildUnit>, BuildError> {
    let Some(entry_package) = registry.entry_package() else {
        return Err(BuildError::NoEntryPoint);
    };
    let entries: Vec<&SourceUnit> = entry_package.entry_points().collect();
    if entries.is_empty() {
        return Err(BuildError::NoEntryPoint);
    }

    let selected: Vec<&SourceUnit> = if !selection.targets.is_empty() {
        let mut selected: Vec<&SourceUnit> = Vec::new();
        for name in selection.targets {
            let Some(unit) = entries.iter().copied().find(|u| u.matches_target(name)) else {
                return Err(BuildError::UnknownTarget {
                    name: name.clone(),
                    available: entries.iter().map(|u| u.display_path()).collect(),
                });
            };
            if !selected.iter().any(|s| s.path() == unit.path()) {
                selected.push(unit);
            }
        }
        selected
    } else if entries.len() > 1 && !selection.build_all {
        return Err(BuildError::AmbiguousEntryPoint {
            candidates: entries.iter().map(|u| u.display_path()).collect(),
        });
    } else {
        entries
    };

    if let Some(name) = selection.output_name {
        if selected.len() > 1 {
            return Err(BuildError::OutputNameConflict {
                name: name.to_string(),
                count: selected.len(),
            });
        }
    }

    let units: Vec<ExecutableUnit> = selected
        .into_iter()
        .map(|entry| {
            executable_unit(
                registry,
                entry_package,
                entry,
                selection.grouping,
                selection.output_name,
            )
        })
        .collect();

    check_output_names(registry, &units)?;
    Ok(units.into_iter().map(BuildUnit::Executable).collect())
}

/// Reject executables whose object file or binary would overwrite the
/// artifacts of another executable or of a library package.
fn check_output_names(registry: &PackageRegistry, units: &[ExecutableUnit]) -> Result<(), BuildError> {
    let mut seen: BTreeMap<&str, &SourceUnit> = BTreeMap::new();
    for unit in units {
        let name = unit.output_name.as_str();

        if let Some(package) = registry.get(name) {
            if package.name() != ENTRY_PACKAGE && !package.is_empty() {
                return Err(BuildError::OutputCollision {
                    name: name.to_string(),
                    sources: vec![unit.entry.display_path(), format!("package `{}`", package.name())],
                });
            }
        }

        if let Some(first) = seen.insert(name, &unit.entry) {
            return Err(BuildError::OutputCollision {
                name: name.to_string(),
                sources: vec![first.display_path(), unit.entry.display_path()],
            });
        }
    }
    Ok(())
}

fn executable_unit(
    registry: &PackageRegistry,
    package: &Package,
    entry: &SourceUnit,
    grouping: Grouping,
    output_name: Option<&str>,
) -> ExecutableUnit {
    let files: Vec<SourceUnit> = package
        .files()
        .iter()
        .filter(|f| match grouping {
            Grouping::Grouped => !f.is_entry_point() || f.path() == entry.path(),
            Grouping::Isolated => f.path() == entry.path(),
        })
        .cloned()
        .collect();

    let imports: BTreeSet<&str> = files
        .iter()
        .flat_map(|f| f.imports().iter().map(String::as_str))
        .collect();
    let dependencies: Vec<PackageId> = imports
        .into_iter()
        .filter_map(|name| registry.get(name))
        .map(Package::id)
        .filter(|id| *id != package.id())
        .collect();

    ExecutableUnit {
        entry: entry.clone(),
        files,
        output_name: output_name.map(str::to_string).unwrap_or_else(|| entry.stem()),
        package: package.id(),
        dependencies,
    }
}

/// Select the libraries to build.
///
/// With no names, every package except the entry package is selected. The
/// result is ordered so that dependencies come before their importers,
/// falling back to name order when the imports form a cycle (the scheduler
/// reports it). File-less packages are left out.
pub fn select_libraries(
    registry: &PackageRegistry,
    targets: &[String],
) -> Result<Vec<BuildUnit>, BuildError> {
    let names: BTreeSet<&str> = if targets.is_empty() {
        registry.library_names()
    } else {
        let mut names = BTreeSet::new();
        for name in targets {
            if name == ENTRY_PACKAGE {
                tracing::debug!("skipping package `{}`, not a library", name);
                continue;
            }
            if registry.get(name).is_none() {
                return Err(BuildError::UnknownTarget {
                    name: name.clone(),
                    available: registry
                        .library_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                });
            }
            names.insert(name.as_str());
        }
        names
    };

    let mut selected: Vec<&Package> = Vec::new();
    for name in names {
        let Some(package) = registry.get(name) else {
            continue;
        };
        if package.is_empty() {
            tracing::debug!("skipping package `{}`, no files to compile", name);
            continue;
        }
        selected.push(package);
    }

    if let Some(order) = registry.dependency_order() {
        let rank: Vec<usize> = {
            let mut rank = vec![0; registry.len()];
            for (pos, id) in order.iter().enumerate() {
                rank[id.index()] = pos;
            }
            rank
        };
        selected.sort_by_key(|p| rank[p.id().index()]);
    }

    Ok(selected
        .into_iter()
        .map(|p| BuildUnit::Library(p.id()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sources, TreeFixture};

    fn selection(targets: &[String]) -> Selection<'_> {
        Selection {
            targets,
            build_all: false,
            grouping: Grouping::Grouped,
            output_name: None,
        }
    }

    fn executables(units: Vec<BuildUnit>) -> Vec<ExecutableUnit> {
        units
            .into_iter()
            .map(|u| match u {
                BuildUnit::Executable(exe) => exe,
                BuildUnit::Library(_) => panic!("expected an executable"),
            })
            .collect()
    }

    fn file_names(unit: &ExecutableUnit) -> Vec<String> {
        unit.files.iter().map(|f| f.display_path()).collect()
    }

    fn library_names(registry: &PackageRegistry, units: Vec<BuildUnit>) -> Vec<String> {
        units
            .into_iter()
            .map(|u| match u {
                BuildUnit::Library(id) => registry.package(id).name().to_string(),
                BuildUnit::Executable(_) => panic!("expected a library"),
            })
            .collect()
    }

    fn two_entries() -> PackageRegistry {
        TreeFixture::new()
            .with_entry("client.go", &["net"])
            .with_entry("server.go", &["util"])
            .with_file("shared.go", sources::shared(&["log"]))
            .with_library("net/net.go", "net", &[])
            .with_library("util/util.go", "util", &[])
            .with_library("log/log.go", "log", &[])
            .registry()
    }

    #[test]
    fn test_single_entry_selected_by_default() {
        let registry = TreeFixture::new()
            .with_entry("cmd/tool.go", &["util"])
            .with_library("util/util.go", "util", &[])
            .registry();

        let units = executables(select_executables(&registry, &selection(&[])).unwrap());
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].output_name, "tool");
        assert_eq!(units[0].dependencies, vec![registry.get("util").unwrap().id()]);
    }

    #[test]
    fn test_no_entry_point() {
        let registry = TreeFixture::new()
            .with_library("util/util.go", "util", &[])
            .registry();
        let err = select_executables(&registry, &selection(&[])).unwrap_err();
        assert!(matches!(err, BuildError::NoEntryPoint));

        let registry = TreeFixture::new()
            .with_file("shared.go", sources::shared(&[]))
            .registry();
        let err = select_executables(&registry, &selection(&[])).unwrap_err();
        assert!(matches!(err, BuildError::NoEntryPoint));
    }

    #[test]
    fn test_ambiguous_entry_lists_every_candidate() {
        let registry = two_entries();
        let err = select_executables(&registry, &selection(&[])).unwrap_err();
        match err {
            BuildError::AmbiguousEntryPoint { candidates } => {
                assert_eq!(candidates, vec!["client.go", "server.go"])
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_build_all_groups_shared_files() {
        let registry = two_entries();
        let mut sel = selection(&[]);
        sel.build_all = true;

        let units = executables(select_executables(&registry, &sel).unwrap());
        assert_eq!(units.len(), 2);
        assert_eq!(file_names(&units[0]), vec!["client.go", "shared.go"]);
        assert_eq!(file_names(&units[1]), vec!["server.go", "shared.go"]);

        let deps: Vec<_> = units[1]
            .dependencies
            .iter()
            .map(|id| registry.package(*id).name())
            .collect();
        assert_eq!(deps, vec!["log", "util"]);
        assert_eq!(units[1].shared_files().count(), 1);
    }

    #[test]
    fn test_isolated_grouping() {
        let registry = two_entries();
        let mut sel = selection(&[]);
        sel.build_all = true;
        sel.grouping = Grouping::Isolated;

        let units = executables(select_executables(&registry, &sel).unwrap());
        assert_eq!(file_names(&units[0]), vec!["client.go"]);
        assert_eq!(units[0].dependencies.len(), 1);
    }

    #[test]
    fn test_explicit_targets() {
        let registry = two_entries();
        let targets = vec!["server".to_string(), "./server.go".to_string()];
        let units = executables(select_executables(&registry, &selection(&targets)).unwrap());
        assert_eq!(units.len(), 1);
        assert_eq!(units[0].output_name, "server");
    }

    #[test]
    fn test_unknown_target_fails() {
        let registry = two_entries();
        let targets = vec!["server".to_string(), "nope".to_string()];
        let err = select_executables(&registry, &selection(&targets)).unwrap_err();
        match err {
            BuildError::UnknownTarget { name, available } => {
                assert_eq!(name, "nope");
                assert_eq!(available, vec!["client.go", "server.go"]);
            }
            other => panic!("expected unknown target, got {:?}", other),
        }
    }

    #[test]
    fn test_output_name() {
        let registry = two_entries();
        let targets = vec!["client".to_string()];
        let mut sel = selection(&targets);
        sel.output_name = Some("bin/app");
        let units = executables(select_executables(&registry, &sel).unwrap());
        assert_eq!(units[0].output_name, "bin/app");

        let mut sel = selection(&[]);
        sel.build_all = true;
        sel.output_name = Some("app");
        let err = select_executables(&registry, &sel).unwrap_err();
        assert!(matches!(err, BuildError::OutputNameConflict { count: 2, .. }));
    }

    #[test]
    fn test_same_stem_in_two_directories_is_rejected() {
        let registry = TreeFixture::new()
            .with_entry("cmd/a/server.go", &[])
            .with_entry("cmd/b/server.go", &[])
            .registry();
        let mut sel = selection(&[]);
        sel.build_all = true;

        match select_executables(&registry, &sel).unwrap_err() {
            BuildError::OutputCollision { name, sources } => {
                assert_eq!(name, "server");
                assert_eq!(sources, vec!["cmd/a/server.go", "cmd/b/server.go"]);
            }
            other => panic!("expected an output collision, got {:?}", other),
        }

        let targets = vec!["cmd/b/server".to_string()];
        let units = executables(select_executables(&registry, &selection(&targets)).unwrap());
        assert_eq!(file_names(&units[0]), vec!["cmd/b/server.go"]);
    }

    #[test]
    fn test_entry_named_after_library_is_rejected() {
        let registry = TreeFixture::new()
            .with_entry("util.go", &["util"])
            .with_library("util/util.go", "util", &[])
            .registry();

        match select_executables(&registry, &selection(&[])).unwrap_err() {
            BuildError::OutputCollision { name, sources } => {
                assert_eq!(name, "util");
                assert_eq!(sources, vec!["util.go", "package `util`"]);
            }
            other => panic!("expected an output collision, got {:?}", other),
        }

        let mut sel = selection(&[]);
        sel.output_name = Some("tool");
        let units = executables(select_executables(&registry, &sel).unwrap());
        assert_eq!(units[0].output_name, "tool");
    }

    #[test]
    fn test_entry_named_main_is_accepted() {
        let registry = TreeFixture::new()
            .with_entry("main.go", &[])
            .registry();
        let units = executables(select_executables(&registry, &selection(&[])).unwrap());
        assert_eq!(units[0].output_name, "main");
    }

    #[test]
    fn test_libraries_default_to_all_but_entry_package() {
        let registry = TreeFixture::new()
            .with_entry("main.go", &["app"])
            .with_library("app/app.go", "app", &["util"])
            .with_library("util/util.go", "util", &["ghost"])
            .registry();

        let units = select_libraries(&registry, &[]).unwrap();
        assert_eq!(library_names(&registry, units), vec!["util", "app"]);
    }

    #[test]
    fn test_libraries_by_name() {
        let registry = TreeFixture::new()
            .with_library("app/app.go", "app", &[])
            .with_library("util/util.go", "util", &[])
            .with_entry("main.go", &[])
            .registry();

        let names = vec!["util".to_string(), "main".to_string()];
        let units = select_libraries(&registry, &names).unwrap();
        assert_eq!(library_names(&registry, units), vec!["util"]);

        let names = vec!["util".to_string(), "nope".to_string()];
        let err = select_libraries(&registry, &names).unwrap_err();
        assert!(matches!(err, BuildError::UnknownTarget { ref name, .. } if name == "nope"));
    }

    #[test]
    fn test_no_libraries() {
        let registry = PackageRegistry::new();
        assert!(select_libraries(&registry, &[]).unwrap().is_empty());
    }
}
