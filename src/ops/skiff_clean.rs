//! Implementation of `skiff --clean`.
//!
//! Removes object files of every architecture from the build root by
//! running a shell glob, without looking at the sources.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::errors::BuildError;
use crate::builder::invoker::{check_status, run_step, ProcessRunner, SystemRunner};
use crate::builder::toolchain::{clean_command, CLEAN_SHELL};
use crate::util::config::Config;
use crate::util::process::find_executable;
use crate::util::shell::{Shell, Status};
use crate::util::GlobalContext;

/// Clean the build root.
pub fn clean(gctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let config = gctx.load_config();
    let program = locate_shell(&config)?;
    let runner = SystemRunner::new(gctx.cwd());
    clean_with(&runner, program, shell)?;
    Ok(())
}

/// Resolve the shell used for cleaning: configured, else `bash` on PATH.
pub fn locate_shell(config: &Config) -> Result<PathBuf, BuildError> {
    let program = config
        .toolchain
        .shell
        .clone()
        .unwrap_or_else(|| PathBuf::from(CLEAN_SHELL));

    find_executable(&program).ok_or_else(|| BuildError::ToolNotFound {
        role: "shell",
        program: program.display().to_string(),
    })
}

/// Run the clean command through `runner`.
///
/// Removed files are listed in verbose mode.
pub fn clean_with(
    runner: &dyn ProcessRunner,
    program: PathBuf,
    shell: &Shell,
) -> Result<(), BuildError> {
    let cmd = clean_command(&program, shell.is_verbose());
    shell.status(Status::Cleaning, "object files");
    shell.detail(cmd.display_command());

    let status = run_step(runner, &cmd)?;
    check_status(&cmd, status)?;

    shell.status(Status::Removed, "object files");
    Ok(())
}
