//! Toolchain selection and command-line construction.
//!
//! The architecture picks the compiler, linker and object suffix; the
//! archiver is shared. Binary locations can be overridden by configuration
//! and are resolved on `PATH` before a real build starts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Serialize;

use crate::builder::errors::BuildError;
use crate::util::config::ToolchainSettings;
use crate::util::process::find_executable;

/// Archiver used for every architecture.
pub const ARCHIVER: &str = "gopack";

/// Shell used to run the clean step.
pub const CLEAN_SHELL: &str = "bash";

/// Supported target architectures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arch {
    Amd64,
    X86,
    Arm,
}

impl Arch {
    /// Pick the architecture: command line (or `GOARCH`) first, then config.
    pub fn resolve(cli: Option<&str>, config: Option<&str>) -> Result<Arch, BuildError> {
        match cli.or(config) {
            Some(arch) if !arch.is_empty() => arch.parse(),
            _ => Err(BuildError::MissingArch),
        }
    }

    /// Compiler binary name.
    pub fn compiler(self) -> &'static str {
        match self {
            Arch::Amd64 => "6g",
            Arch::X86 => "8g",
            Arch::Arm => "5g",
        }
    }

    /// Linker binary name.
    pub fn linker(self) -> &'static str {
        match self {
            Arch::Amd64 => "6l",
            Arch::X86 => "8l",
            Arch::Arm => "5l",
        }
    }

    /// Suffix of compiled object files.
    pub fn object_suffix(self) -> &'static str {
        match self {
            Arch::Amd64 => ".6",
            Arch::X86 => ".8",
            Arch::Arm => ".5",
        }
    }
}

impl FromStr for Arch {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "amd64" => Ok(Arch::Amd64),
            "386" => Ok(Arch::X86),
            "arm" => Ok(Arch::Arm),
            _ => Err(BuildError::UnknownArch {
                arch: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::Amd64 => "amd64",
            Arch::X86 => "386",
            Arch::Arm => "arm",
        };
        write!(f, "{}", name)
    }
}

/// Kind of toolchain step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Compile,
    Link,
    Archive,
    Clean,
}

impl StepKind {
    /// Human-readable step name.
    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::Compile => "compiler",
            StepKind::Link => "linker",
            StepKind::Archive => "archiver",
            StepKind::Clean => "clean",
        }
    }
}

/// A command to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSpec {
    /// Which step this command performs
    pub kind: StepKind,
    /// The program to run (e.g. "6g")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(kind: StepKind, program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            kind,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Full command line for logs.
    pub fn display_command(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// The compiler, linker and archiver for one architecture.
#[derive(Debug, Clone)]
pub struct Toolchain {
    arch: Arch,
    compiler: PathBuf,
    linker: PathBuf,
    archiver: PathBuf,
}

impl Toolchain {
    /// Toolchain with the default binary names for `arch`.
    pub fn new(arch: Arch) -> Self {
        Toolchain {
            arch,
            compiler: PathBuf::from(arch.compiler()),
            linker: PathBuf::from(arch.linker()),
            archiver: PathBuf::from(ARCHIVER),
        }
    }

    /// Apply binary overrides from configuration.
    pub fn with_settings(mut self, settings: &ToolchainSettings) -> Self {
        if let Some(ref compiler) = settings.compiler {
            self.compiler = compiler.clone();
        }
        if let Some(ref linker) = settings.linker {
            self.linker = linker.clone();
        }
        if let Some(ref archiver) = settings.archiver {
            self.archiver = archiver.clone();
        }
        self
    }

    /// Resolve every binary to a full path.
    pub fn locate(self) -> Result<Self, BuildError> {
        let compiler = locate("compiler", &self.compiler)?;
        let linker = locate("linker", &self.linker)?;
        let archiver = locate("archiver", &self.archiver)?;
        tracing::debug!(
            "toolchain for {}: {}, {}, {}",
            self.arch,
            compiler.display(),
            linker.display(),
            archiver.display()
        );

        Ok(Toolchain {
            arch: self.arch,
            compiler,
            linker,
            archiver,
        })
    }

    /// Target architecture.
    pub fn arch(&self) -> Arch {
        self.arch
    }

    /// Suffix of compiled object files.
    pub fn object_suffix(&self) -> &'static str {
        self.arch.object_suffix()
    }

    /// `<compiler> -o <object> [-I <path>]... <files>...`
    pub fn compile_command(
        &self,
        object: &Path,
        include_paths: &[PathBuf],
        files: &[String],
    ) -> CommandSpec {
        let mut cmd = CommandSpec::new(StepKind::Compile, &self.compiler)
            .arg("-o")
            .arg(object.to_string_lossy());
        for path in include_paths {
            cmd = cmd.arg("-I").arg(path.to_string_lossy());
        }
        cmd.args(files.iter().cloned())
    }

    /// `<linker> -o <output> [-L <path>]... <object>`
    pub fn link_command(&self, output: &Path, lib_paths: &[PathBuf], object: &Path) -> CommandSpec {
        let mut cmd = CommandSpec::new(StepKind::Link, &self.linker)
            .arg("-o")
            .arg(output.to_string_lossy());
        for path in lib_paths {
            cmd = cmd.arg("-L").arg(path.to_string_lossy());
        }
        cmd.arg(object.to_string_lossy())
    }

    /// `<archiver> grc <archive> <object>`
    pub fn archive_command(&self, archive: &Path, object: &Path) -> CommandSpec {
        CommandSpec::new(StepKind::Archive, &self.archiver)
            .arg("grc")
            .arg(archive.to_string_lossy())
            .arg(object.to_string_lossy())
    }
}

/// `<shell> -c "rm -rf *.[568]"`, listing removed files when verbose.
pub fn clean_command(shell: &Path, verbose: bool) -> CommandSpec {
    let script = if verbose {
        "rm -rfv *.[568]"
    } else {
        "rm -rf *.[568]"
    };
    CommandSpec::new(StepKind::Clean, shell).arg("-c").arg(script)
}

fn locate(role: &'static str, program: &Path) -> Result<PathBuf, BuildError> {
    find_executable(program).ok_or_else(|| BuildError::ToolNotFound {
        role,
        program: program.display().to_string(),
    })
}
