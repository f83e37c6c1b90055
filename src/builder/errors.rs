//! Build error types and diagnostics.

use std::path::PathBuf;

use thiserror::Error;

use crate::util::diagnostic::{suggestions, Diagnostic};

/// A fatal build error.
///
/// Every variant aborts the run; accumulated compile errors surface as
/// [`BuildError::CompileFailed`] once all targets were attempted.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("circular package dependency: {}", cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    #[error("no source files found for package `{package}`")]
    EmptyPackage { package: String },

    #[error("local import `./{import}` names a package with no source files")]
    NestedImport { import: String, declared: String },

    #[error("no program entry point found")]
    NoEntryPoint,

    #[error("multiple files define a program entry point")]
    AmbiguousEntryPoint { candidates: Vec<String> },

    #[error("unknown target `{name}`")]
    UnknownTarget { name: String, available: Vec<String> },

    #[error("unsupported architecture `{arch}`")]
    UnknownArch { arch: String },

    #[error("no target architecture selected")]
    MissingArch,

    #[error("could not find {role} `{program}`")]
    ToolNotFound { role: &'static str, program: String },

    #[error("cannot name the output `{name}` when building {count} executables")]
    OutputNameConflict { name: String, count: usize },

    #[error("more than one target would be built as `{name}`")]
    OutputCollision { name: String, sources: Vec<String> },

    #[error("{step} `{program}` failed: {message}")]
    ProcessFailed {
        step: &'static str,
        program: PathBuf,
        message: String,
    },

    #[error("could not build due to compile errors in {}", packages.join(", "))]
    CompileFailed { packages: Vec<String> },
}

impl BuildError {
    /// Error for a file-less package that a build depends on.
    ///
    /// Local imports name packages by their full path, so `./lib/util`
    /// never matches files that declare `package util`.
    pub fn empty_package(name: &str) -> BuildError {
        match name.rsplit_once('/') {
            Some((_, last)) if !last.is_empty() => BuildError::NestedImport {
                import: name.to_string(),
                declared: last.to_string(),
            },
            _ => BuildError::EmptyPackage {
                package: name.to_string(),
            },
        }
    }

    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            BuildError::Cycle { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Break the cycle by moving shared code into a new package"),

            BuildError::EmptyPackage { package } => Diagnostic::error(self.to_string())
                .with_context(format!("`{}` is imported as `./{}`", package, package))
                .with_suggestion(format!(
                    "Add a source file declaring `package {}` or fix the import path",
                    package
                )),

            BuildError::NestedImport { import, declared } => Diagnostic::error(self.to_string())
                .with_context(format!(
                    "local imports name packages by their full path, so `./{}` is package `{}`",
                    import, import
                ))
                .with_context(format!(
                    "files declaring `package {}` belong to package `{}`",
                    declared, declared
                ))
                .with_suggestion(format!("Import the package as `./{}`", declared)),

            BuildError::NoEntryPoint => Diagnostic::error(self.to_string())
                .with_context("no file in package `main` defines `func main()`")
                .with_suggestion(suggestions::NO_ENTRY),

            BuildError::AmbiguousEntryPoint { candidates } => {
                let mut diag = Diagnostic::error(self.to_string())
                    .with_context("available entry files:");
                for candidate in candidates {
                    diag = diag.with_context(format!("    {}", candidate));
                }
                diag.with_suggestion(suggestions::AMBIGUOUS_ENTRY)
            }

            BuildError::UnknownTarget { available, .. } => {
                let available = if available.is_empty() {
                    "(none)".to_string()
                } else {
                    available.join(", ")
                };
                Diagnostic::error(self.to_string())
                    .with_context(format!("available targets: {}", available))
            }

            BuildError::UnknownArch { .. } | BuildError::MissingArch => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::UNKNOWN_ARCH)
            }

            BuildError::ToolNotFound { role, .. } => Diagnostic::error(self.to_string())
                .with_suggestion(format!(
                    "Add the {} to PATH or set it in `.skiff/config.toml`",
                    role
                )),

            BuildError::OutputNameConflict { .. } => Diagnostic::error(self.to_string())
                .with_suggestion("Pass a directory to `-o` (ending in `/`) instead"),

            BuildError::OutputCollision { sources, .. } => {
                let mut diag = Diagnostic::error(self.to_string());
                for source in sources {
                    diag = diag.with_context(format!("    {}", source));
                }
                diag.with_suggestion(
                    "Rename one of the entry files, or build it alone and name it with `-o`",
                )
            }

            BuildError::CompileFailed { .. } => {
                Diagnostic::error(self.to_string()).with_suggestion(suggestions::BUILD_FAILED)
            }

            BuildError::ProcessFailed { .. } => Diagnostic::error(self.to_string()),
        }
    }
}
