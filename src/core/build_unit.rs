//! Build units - resolved, concrete build targets.

use crate::core::{PackageId, SourceUnit};

/// A resolved build target.
#[derive(Debug, Clone)]
pub enum BuildUnit {
    /// An executable built from one entry file
    Executable(ExecutableUnit),
    /// A static library built from one package
    Library(PackageId),
}

/// An executable request.
///
/// The unit is compiled as a virtual node rooted at its entry package: its
/// dependencies are scheduled first and the entry package is treated as
/// in progress while they are.
#[derive(Debug, Clone)]
pub struct ExecutableUnit {
    /// The entry-defining file
    pub entry: SourceUnit,
    /// Every file compiled into the executable, entry included, in discovery order
    pub files: Vec<SourceUnit>,
    /// Artifact name (without object suffix)
    pub output_name: String,
    /// Package owning the entry file
    pub package: PackageId,
    /// Packages imported by `files`, ordered by name
    pub dependencies: Vec<PackageId>,
}

impl ExecutableUnit {
    /// Files other than the entry file.
    pub fn shared_files(&self) -> impl Iterator<Item = &SourceUnit> {
        self.files.iter().filter(move |f| f.path() != self.entry.path())
    }
}
