//! Toolchain invoker - runs compile, link and archive steps.
//!
//! Command execution goes through [`ProcessRunner`] so a build can be
//! recorded instead of executed (`--plan`) and driven by fakes in tests.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::Result;

use crate::builder::context::BuildContext;
use crate::builder::errors::BuildError;
use crate::builder::toolchain::{CommandSpec, StepKind};
use crate::core::SourceUnit;
use crate::util::process::ProcessBuilder;
use crate::util::shell::{Shell, Status};

/// How a finished process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStatus {
    code: Option<i32>,
}

impl ProcessStatus {
    /// Exited with `code`.
    pub fn from_code(code: i32) -> Self {
        ProcessStatus { code: Some(code) }
    }

    /// Exited successfully.
    pub fn ok() -> Self {
        Self::from_code(0)
    }

    /// Terminated without an exit code (e.g. killed by a signal).
    pub fn terminated() -> Self {
        ProcessStatus { code: None }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    fn describe(&self) -> String {
        match self.code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

impl From<ExitStatus> for ProcessStatus {
    fn from(status: ExitStatus) -> Self {
        ProcessStatus {
            code: status.code(),
        }
    }
}

/// Runs a toolchain command to completion.
///
/// `Err` means the process could not be started or waited on.
pub trait ProcessRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessStatus>;
}

/// Runs commands as child processes in a fixed working directory.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    cwd: PathBuf,
}

impl SystemRunner {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        SystemRunner { cwd: cwd.into() }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessStatus> {
        tracing::debug!("running `{}`", cmd.display_command());
        let status = ProcessBuilder::new(&cmd.program)
            .args(&cmd.args)
            .cwd(&self.cwd)
            .status()?;
        Ok(status.into())
    }
}

/// Issues toolchain commands for the scheduler.
pub struct ToolchainInvoker<'a> {
    ctx: &'a BuildContext,
    runner: &'a dyn ProcessRunner,
    shell: &'a Shell,
}

impl<'a> ToolchainInvoker<'a> {
    pub fn new(ctx: &'a BuildContext, runner: &'a dyn ProcessRunner, shell: &'a Shell) -> Self {
        ToolchainInvoker { ctx, runner, shell }
    }

    pub fn context(&self) -> &BuildContext {
        self.ctx
    }

    /// Compile `files` into `<output_name><suffix>`.
    ///
    /// Returns `Ok(false)` when the compiler reports errors; only a failure
    /// to run the compiler at all is fatal.
    pub fn compile<'u>(
        &self,
        output_name: &str,
        files: impl IntoIterator<Item = &'u SourceUnit>,
    ) -> Result<bool, BuildError> {
        let files: Vec<String> = files.into_iter().map(SourceUnit::display_path).collect();
        let object = self.ctx.object_path(output_name);
        let cmd = self
            .ctx
            .toolchain
            .compile_command(&object, &self.ctx.include_paths, &files);

        self.shell.detail(cmd.display_command());
        let status = self.execute(&cmd)?;
        if !status.success() {
            tracing::debug!("compiling `{}` {}", output_name, status.describe());
        }
        Ok(status.success())
    }

    /// Link the object for `output_name` into an executable.
    pub fn link(&self, output_name: &str, executable: &Path) -> Result<(), BuildError> {
        let object = self.ctx.object_path(output_name);
        let cmd = self
            .ctx
            .toolchain
            .link_command(executable, &self.ctx.include_paths, &object);

        self.shell.status(Status::Linking, executable.display());
        self.shell.detail(cmd.display_command());
        self.expect_success(&cmd)
    }

    /// Archive the object for `output_name` into `<output_name>.a`.
    pub fn archive(&self, output_name: &str) -> Result<PathBuf, BuildError> {
        let object = self.ctx.object_path(output_name);
        let archive = self.ctx.archive_path(output_name);
        let cmd = self.ctx.toolchain.archive_command(&archive, &object);

        self.shell.status(Status::Archiving, archive.display());
        self.shell.detail(cmd.display_command());
        self.expect_success(&cmd)?;
        Ok(archive)
    }

    fn execute(&self, cmd: &CommandSpec) -> Result<ProcessStatus, BuildError> {
        run_step(self.runner, cmd)
    }

    fn expect_success(&self, cmd: &CommandSpec) -> Result<(), BuildError> {
        let status = self.execute(cmd)?;
        check_status(cmd, status)
    }
}

/// Run one command, mapping a start or wait failure to a fatal error.
pub fn run_step(runner: &dyn ProcessRunner, cmd: &CommandSpec) -> Result<ProcessStatus, BuildError> {
    runner.run(cmd).map_err(|e| BuildError::ProcessFailed {
        step: cmd.kind.as_str(),
        program: cmd.program.clone(),
        message: format!("{:#}", e),
    })
}

/// Turn a nonzero exit of a link, archive or clean step into a fatal error.
pub fn check_status(cmd: &CommandSpec, status: ProcessStatus) -> Result<(), BuildError> {
    if status.success() {
        return Ok(());
    }
    debug_assert!(cmd.kind != StepKind::Compile);
    Err(BuildError::ProcessFailed {
        step: cmd.kind.as_str(),
        program: cmd.program.clone(),
        message: status.describe(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::context::OutputLayout;
    use crate::builder::toolchain::{Arch, Toolchain};
    use crate::test_support::RecordingRunner;
    use crate::util::shell::{ColorChoice, Verbosity};

    fn context() -> BuildContext {
        BuildContext::new(Toolchain::new(Arch::Amd64), OutputLayout::default(), "/src")
            .with_include_paths(vec![PathBuf::from("inc")])
    }

    fn shell() -> Shell {
        Shell::new(Verbosity::Quieter, ColorChoice::Never)
    }

    #[test]
    fn test_compile_success_and_failure() {
        let ctx = context();
        let shell = shell();
        let runner = RecordingRunner::new().fail_on("bad.go", 2);
        let invoker = ToolchainInvoker::new(&ctx, &runner, &shell);

        let good = SourceUnit::new("util/good.go", "util");
        let bad = SourceUnit::new("bad/bad.go", "bad");
        assert!(invoker.compile("util", [&good]).unwrap());
        assert!(!invoker.compile("bad", [&bad]).unwrap());

        assert_eq!(
            runner.commands(),
            vec![
                "6g -o util.6 -I inc util/good.go",
                "6g -o bad.6 -I inc bad/bad.go"
            ]
        );
    }

    #[test]
    fn test_compile_spawn_failure_is_fatal() {
        let ctx = context();
        let shell = shell();
        let runner = RecordingRunner::new().unavailable(StepKind::Compile);
        let invoker = ToolchainInvoker::new(&ctx, &runner, &shell);

        let unit = SourceUnit::new("a.go", "main");
        let err = invoker.compile("a", [&unit]).unwrap_err();
        assert!(matches!(err, BuildError::ProcessFailed { step: "compiler", .. }));
    }

    #[test]
    fn test_link_uses_library_paths() {
        let ctx = context();
        let shell = shell();
        let runner = RecordingRunner::new();
        let invoker = ToolchainInvoker::new(&ctx, &runner, &shell);

        invoker.link("server", Path::new("server")).unwrap();
        assert_eq!(runner.commands(), vec!["6l -o server -L inc server.6"]);
    }

    #[test]
    fn test_link_failure_is_fatal() {
        let ctx = context();
        let shell = shell();
        let runner = RecordingRunner::new().fail_on("server.6", 1);
        let invoker = ToolchainInvoker::new(&ctx, &runner, &shell);

        let err = invoker.link("server", Path::new("server")).unwrap_err();
        assert!(err.to_string().contains("exited with status 1"));
    }

    #[test]
    fn test_archive() {
        let ctx = context();
        let shell = shell();
        let runner = RecordingRunner::new();
        let invoker = ToolchainInvoker::new(&ctx, &runner, &shell);

        let archive = invoker.archive("util").unwrap();
        assert_eq!(archive, PathBuf::from("util.a"));
        assert_eq!(runner.commands(), vec!["gopack grc util.a util.6"]);
    }

    #[test]
    fn test_terminated_status() {
        let status = ProcessStatus::terminated();
        assert!(!status.success());
        assert_eq!(status.code(), None);
        assert!(ProcessStatus::ok().success());
    }
}
