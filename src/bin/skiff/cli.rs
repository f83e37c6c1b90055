//! CLI definitions using clap.

use std::path::PathBuf;

use clap::Parser;

use skiff::util::shell::{ColorChoice, Verbosity};

/// skiff - build Go packages and programs with the 6g/8g/5g toolchain
#[derive(Parser)]
#[command(name = "skiff")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Entry files to build (package names with --lib)
    pub targets: Vec<String>,

    /// Build every file that defines an entry point
    #[arg(short, long)]
    pub all: bool,

    /// Include `_test.go` files
    #[arg(short, long)]
    pub tests: bool,

    /// Build static libraries instead of executables
    #[arg(long)]
    pub lib: bool,

    /// Build each executable from its entry file only
    #[arg(long)]
    pub single_main: bool,

    /// Also search hidden directories for sources
    #[arg(long)]
    pub include_hidden: bool,

    /// Output directory (ending in `/`) or executable name
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<String>,

    /// Only print warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Only print errors
    #[arg(long, visible_alias = "qq")]
    pub quieter: bool,

    /// Print every toolchain command
    #[arg(short, long)]
    pub verbose: bool,

    /// Additional include and library search path
    #[arg(short = 'I', long = "include", value_name = "DIR")]
    pub include_paths: Vec<PathBuf>,

    /// Remove object files from the current directory
    #[arg(long)]
    pub clean: bool,

    /// Target architecture (amd64, 386, arm)
    #[arg(long, env = "GOARCH")]
    pub arch: Option<String>,

    /// Print the toolchain commands as JSON instead of running them
    #[arg(long)]
    pub plan: bool,

    /// Coloring: auto, always, never
    #[arg(long, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,
}

impl Cli {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quieter, self.quiet, self.verbose)
    }
}
