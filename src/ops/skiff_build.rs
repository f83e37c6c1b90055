//! Implementation of a skiff build.
//!
//! Configuration and the toolchain are settled first, then the tree is
//! discovered, targets are selected and the scheduler runs every unit in
//! order. Fatal errors stop the run immediately; compile errors are
//! collected and reported once every unit was attempted.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::{
    Arch, BuildContext, BuildPlan, BuildResult, BuildSession, OutputLayout, PlanRunner,
    ProcessRunner, SystemRunner, Toolchain, ToolchainInvoker,
};
use crate::core::BuildUnit;
use crate::ops::select::{select_executables, select_libraries, Grouping, Selection};
use crate::sources::{discover, SourceWalker};
use crate::util::config::Config;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// What kind of artifacts to produce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BuildMode {
    /// Link executables from entry files
    #[default]
    Executables,
    /// Archive every (or every named) non-entry package
    Libraries,
}

/// Options for a build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub mode: BuildMode,

    /// Entry files (executables) or package names (libraries); empty = default selection
    pub targets: Vec<String>,

    /// Build every entry file
    pub build_all: bool,

    /// Include `_test.go` files
    pub include_tests: bool,

    /// Build each executable from its entry file alone
    pub single_main: bool,

    /// Walk hidden files and directories
    pub include_hidden: bool,

    /// Output directory (ending in `/`) or executable name
    pub output: Option<String>,

    /// Additional include and library search paths
    pub include_paths: Vec<PathBuf>,

    /// Target architecture (from `--arch` or GOARCH)
    pub arch: Option<String>,
}

impl BuildOptions {
    fn grouping(&self, config: &Config) -> Grouping {
        if self.single_main || config.build.single_main {
            Grouping::Isolated
        } else {
            Grouping::Grouped
        }
    }
}

/// Build with the real toolchain.
///
/// Returns an error if any compile failed, after every unit was attempted.
pub fn build(gctx: &GlobalContext, opts: &BuildOptions, shell: &Shell) -> Result<BuildResult> {
    let config = gctx.load_config();
    let mut ctx = build_context(gctx, opts, &config, true)?;
    ctx.toolchain = ctx.toolchain.locate()?;

    let runner = SystemRunner::new(gctx.cwd());
    let result = execute(gctx, opts, &config, &ctx, &runner, shell)?;

    if result.is_success() {
        shell.status(
            Status::Finished,
            format!(
                "{} executable(s), {} archive(s) for {}",
                result.executables.len(),
                result.archives.len(),
                ctx.toolchain.arch()
            ),
        );
    }
    Ok(result.into_error()?)
}

/// Record the commands a build would run, without running them.
///
/// The toolchain is not looked up on PATH and no directories are created.
pub fn plan(gctx: &GlobalContext, opts: &BuildOptions, shell: &Shell) -> Result<BuildPlan> {
    let config = gctx.load_config();
    let ctx = build_context(gctx, opts, &config, false)?;

    let runner = PlanRunner::new();
    execute(gctx, opts, &config, &ctx, &runner, shell)?;
    Ok(runner.into_plan(ctx.toolchain.arch()))
}

/// Resolve architecture, toolchain overrides, output layout and include paths.
///
/// Command-line values win over configuration.
pub fn build_context(
    gctx: &GlobalContext,
    opts: &BuildOptions,
    config: &Config,
    create_dirs: bool,
) -> Result<BuildContext> {
    let arch = Arch::resolve(opts.arch.as_deref(), config.build.arch.as_deref())?;
    let toolchain = Toolchain::new(arch).with_settings(&config.toolchain);

    let output = opts.output.as_deref().or(config.build.output.as_deref());
    let layout = OutputLayout::parse(gctx.cwd(), output, create_dirs)?;

    let include_paths = if opts.include_paths.is_empty() {
        config.build.include_paths.clone()
    } else {
        opts.include_paths.clone()
    };

    Ok(BuildContext::new(toolchain, layout, gctx.cwd()).with_include_paths(include_paths))
}

/// Discover, select and schedule with the given runner.
///
/// Compile errors are reported through the returned [`BuildResult`].
pub fn execute(
    gctx: &GlobalContext,
    opts: &BuildOptions,
    config: &Config,
    ctx: &BuildContext,
    runner: &dyn ProcessRunner,
    shell: &Shell,
) -> Result<BuildResult> {
    let walker = SourceWalker::new(gctx.cwd())
        .include_hidden(opts.include_hidden)
        .include_tests(opts.include_tests);

    shell.status(Status::Parsing, gctx.cwd().display());
    let registry = discover(&walker)?;

    let units: Vec<BuildUnit> = match opts.mode {
        BuildMode::Executables => {
            let selection = Selection {
                targets: &opts.targets,
                build_all: opts.build_all,
                grouping: opts.grouping(config),
                output_name: ctx.layout.executable.as_deref(),
            };
            select_executables(&registry, &selection)?
        }
        BuildMode::Libraries => {
            let units = select_libraries(&registry, &opts.targets)?;
            if units.is_empty() {
                shell.warn("no packages found");
            }
            units
        }
    };

    tracing::debug!("{} unit(s) selected", units.len());

    let invoker = ToolchainInvoker::new(ctx, runner, shell);
    let mut session = BuildSession::new(&registry, invoker, shell);
    for unit in &units {
        session.build(unit)?;
    }

    Ok(session.into_result())
}
