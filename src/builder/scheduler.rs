//! Build scheduler - dependency-ordered compilation with cycle detection.
//!
//! Every unit is handled in two phases. Planning walks the import graph
//! depth first and produces the dependency closure in post-order, failing on
//! a cycle or a file-less package before any process is started. Execution
//! then compiles the planned packages in order and finishes the unit with a
//! link (executables) or an archive (libraries).
//!
//! Compile errors are not fatal: dependents are still compiled, so a single
//! run reports as many errors as possible. Once any compile error has been
//! seen, every later link in the session is skipped.

use std::path::PathBuf;

use crate::builder::errors::BuildError;
use crate::builder::invoker::ToolchainInvoker;
use crate::core::{BuildUnit, ExecutableUnit, PackageId, PackageRegistry};
use crate::util::shell::{Shell, Status};

/// Per-package build state, owned by the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageState {
    /// A compile was attempted, successful or not
    pub compiled: bool,
    /// The compile reported errors
    pub has_errors: bool,
}

/// What a session did.
#[derive(Debug, Clone, Default)]
pub struct BuildResult {
    /// Sticky flag: set by the first compile error, never cleared
    pub any_compile_error: bool,
    /// Packages and executables compiled without errors, in order
    pub compiled: Vec<String>,
    /// Packages and executables whose compile reported errors, in order
    pub failed: Vec<String>,
    /// Linked executables
    pub executables: Vec<PathBuf>,
    /// Created archives
    pub archives: Vec<PathBuf>,
    /// Executables not linked because of earlier compile errors
    pub skipped_links: Vec<String>,
    /// Libraries not archived because their own compile failed
    pub skipped_archives: Vec<String>,
}

impl BuildResult {
    /// True if no compile error occurred.
    pub fn is_success(&self) -> bool {
        !self.any_compile_error
    }

    /// Turn accumulated compile errors into a final error.
    pub fn into_error(self) -> Result<BuildResult, BuildError> {
        if self.any_compile_error {
            Err(BuildError::CompileFailed {
                packages: self.failed,
            })
        } else {
            Ok(self)
        }
    }
}

struct Frame {
    id: PackageId,
    deps: Vec<PackageId>,
    next: usize,
}

/// One build run over a registry.
pub struct BuildSession<'a> {
    registry: &'a PackageRegistry,
    invoker: ToolchainInvoker<'a>,
    shell: &'a Shell,
    states: Vec<PackageState>,
    result: BuildResult,
}

impl<'a> BuildSession<'a> {
    pub fn new(registry: &'a PackageRegistry, invoker: ToolchainInvoker<'a>, shell: &'a Shell) -> Self {
        BuildSession {
            registry,
            invoker,
            shell,
            states: vec![PackageState::default(); registry.len()],
            result: BuildResult::default(),
        }
    }

    /// Build state of a package.
    pub fn state(&self, id: PackageId) -> PackageState {
        self.states[id.index()]
    }

    /// Results so far.
    pub fn result(&self) -> &BuildResult {
        &self.result
    }

    /// Finish the session.
    pub fn into_result(self) -> BuildResult {
        self.result
    }

    /// Build one unit.
    pub fn build(&mut self, unit: &BuildUnit) -> Result<(), BuildError> {
        match unit {
            BuildUnit::Executable(exe) => self.build_executable(exe),
            BuildUnit::Library(id) => self.build_library(*id),
        }
    }

    /// Compile the dependencies of an executable, then the executable's own
    /// files, then link it.
    ///
    /// The link is skipped with an error message if any compile error has
    /// occurred in this session, including in units built earlier.
    pub fn build_executable(&mut self, unit: &ExecutableUnit) -> Result<(), BuildError> {
        let order = self.plan(unit.package, unit.dependencies.clone())?;
        for id in order {
            self.compile_package(id)?;
        }

        self.shell.status(
            Status::Compiling,
            format!("{} ({})", unit.output_name, unit.entry.display_path()),
        );
        let ok = self.invoker.compile(&unit.output_name, &unit.files)?;
        self.record_compile(&unit.output_name, ok);

        if self.result.any_compile_error {
            self.shell.error(format!(
                "not linking `{}` because of previous compile errors",
                unit.output_name
            ));
            self.result.skipped_links.push(unit.output_name.clone());
            return Ok(());
        }

        let executable = self.invoker.context().executable_path(&unit.output_name);
        self.invoker.link(&unit.output_name, &executable)?;
        self.result.executables.push(executable);
        Ok(())
    }

    /// Compile a package with its dependencies and archive it.
    ///
    /// File-less and already compiled packages are skipped. The archive is
    /// skipped if the package's own compile reported errors.
    pub fn build_library(&mut self, id: PackageId) -> Result<(), BuildError> {
        let registry = self.registry;
        let package = registry.package(id);
        if package.is_empty() {
            tracing::debug!("skipping package `{}`, no files to compile", package.name());
            return Ok(());
        }
        if self.state(id).compiled {
            tracing::debug!("skipping package `{}`, already compiled", package.name());
            return Ok(());
        }

        self.compile(id)?;

        if self.state(id).has_errors {
            self.shell.status(
                Status::Skipped,
                format!("archive of `{}` because of compile errors", package.name()),
            );
            self.result.skipped_archives.push(package.name().to_string());
            return Ok(());
        }

        let archive = self.invoker.archive(package.output_name())?;
        self.result.archives.push(archive);
        Ok(())
    }

    /// Compile a package after everything it depends on.
    ///
    /// Does nothing if the package was already compiled in this session.
    pub fn compile(&mut self, id: PackageId) -> Result<(), BuildError> {
        if self.state(id).compiled {
            return Ok(());
        }

        let order = self.plan(id, self.registry.dependencies(id))?;
        for dep in order {
            self.compile_package(dep)?;
        }
        self.compile_package(id)
    }

    /// Dependency closure of `root`, dependencies first, `root` excluded.
    ///
    /// Packages compiled earlier in the session are pruned along with
    /// everything below them. `root` counts as in progress for the whole
    /// walk, so an import that leads back to it is a cycle.
    pub fn plan(&self, root: PackageId, root_deps: Vec<PackageId>) -> Result<Vec<PackageId>, BuildError> {
        let n = self.registry.len();
        let mut visited = vec![false; n];
        let mut active = vec![false; n];
        let mut order = Vec::new();

        active[root.index()] = true;
        let mut stack = vec![Frame {
            id: root,
            deps: root_deps,
            next: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&dep) = frame.deps.get(frame.next) {
                frame.next += 1;

                if active[dep.index()] {
                    return Err(self.cycle_error(&stack, dep));
                }
                if visited[dep.index()] || self.state(dep).compiled {
                    continue;
                }

                active[dep.index()] = true;
                stack.push(Frame {
                    id: dep,
                    deps: self.registry.dependencies(dep),
                    next: 0,
                });
                continue;
            }

            let id = frame.id;
            stack.pop();
            active[id.index()] = false;
            visited[id.index()] = true;

            if id == root {
                break;
            }

            let package = self.registry.package(id);
            if package.is_empty() {
                return Err(BuildError::empty_package(package.name()));
            }
            order.push(id);
        }

        tracing::trace!(
            "plan for `{}`: {:?}",
            self.registry.package(root).name(),
            order
                .iter()
                .map(|id| self.registry.package(*id).name())
                .collect::<Vec<_>>()
        );
        Ok(order)
    }

    fn cycle_error(&self, stack: &[Frame], repeated: PackageId) -> BuildError {
        let start = stack
            .iter()
            .position(|f| f.id == repeated)
            .unwrap_or_default();

        let mut cycle: Vec<String> = stack[start..]
            .iter()
            .map(|f| self.registry.package(f.id).name().to_string())
            .collect();
        cycle.push(self.registry.package(repeated).name().to_string());
        BuildError::Cycle { cycle }
    }

    fn compile_package(&mut self, id: PackageId) -> Result<(), BuildError> {
        let registry = self.registry;
        let package = registry.package(id);
        self.shell.status(Status::Compiling, package.name());

        let ok = self.invoker.compile(package.output_name(), package.files())?;
        self.states[id.index()] = PackageState {
            compiled: true,
            has_errors: !ok,
        };
        self.record_compile(package.name(), ok);
        Ok(())
    }

    fn record_compile(&mut self, name: &str, ok: bool) {
        if ok {
            self.result.compiled.push(name.to_string());
        } else {
            self.shell.error(format!("could not compile `{}`", name));
            self.result.any_compile_error = true;
            self.result.failed.push(name.to_string());
        }
    }
}
