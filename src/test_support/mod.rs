//! Test utilities and fakes for skiff unit tests.
//!
//! [`RecordingRunner`] stands in for real toolchain processes: it records
//! every command and answers with a configurable status.
//!
//! # Example
//!
//! ```rust,ignore
//! use skiff::test_support::{RecordingRunner, TreeFixture};
//!
//! #[test]
//! fn test_example() {
//!     let runner = RecordingRunner::new().fail_on("broken.go", 1);
//!     let registry = TreeFixture::new().with_file("main.go", "package main").registry();
//!     // Drive a build session with `runner`...
//! }
//! ```

pub mod fixtures;

use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::builder::invoker::{ProcessRunner, ProcessStatus};
use crate::builder::toolchain::{CommandSpec, StepKind};

pub use fixtures::*;

/// Pattern for matching recorded commands.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Match if any argument (or the program) contains the substring.
    Contains(String),
    /// Match every command of a step kind.
    Kind(StepKind),
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &CommandSpec) -> bool {
        match self {
            CommandPattern::Contains(s) => {
                cmd.program.to_string_lossy().contains(s.as_str())
                    || cmd.args.iter().any(|a| a.contains(s.as_str()))
            }
            CommandPattern::Kind(kind) => cmd.kind == *kind,
        }
    }
}

#[derive(Debug, Clone)]
enum Response {
    Exit(ProcessStatus),
    Unavailable,
}

/// Fake process runner that records commands.
///
/// Commands succeed unless a registered pattern matches; the first matching
/// pattern decides the outcome.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    responses: Vec<(CommandPattern, Response)>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl RecordingRunner {
    /// Create a runner where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Exit with `code` for commands mentioning `needle`.
    pub fn fail_on(mut self, needle: &str, code: i32) -> Self {
        self.responses.push((
            CommandPattern::Contains(needle.to_string()),
            Response::Exit(ProcessStatus::from_code(code)),
        ));
        self
    }

    /// Exit with `code` for every command of `kind`.
    pub fn fail_step(mut self, kind: StepKind, code: i32) -> Self {
        self.responses.push((
            CommandPattern::Kind(kind),
            Response::Exit(ProcessStatus::from_code(code)),
        ));
        self
    }

    /// Terminate without an exit code for commands mentioning `needle`.
    pub fn kill_on(mut self, needle: &str) -> Self {
        self.responses.push((
            CommandPattern::Contains(needle.to_string()),
            Response::Exit(ProcessStatus::terminated()),
        ));
        self
    }

    /// Fail to start every command of `kind`.
    pub fn unavailable(mut self, kind: StepKind) -> Self {
        self.responses
            .push((CommandPattern::Kind(kind), Response::Unavailable));
        self
    }

    /// Every command run so far.
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().unwrap().clone()
    }

    /// Every command run so far, as display strings.
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(CommandSpec::display_command).collect()
    }

    /// Commands of one step kind, as display strings.
    pub fn commands_of(&self, kind: StepKind) -> Vec<String> {
        self.calls()
            .iter()
            .filter(|c| c.kind == kind)
            .map(CommandSpec::display_command)
            .collect()
    }

    /// Number of commands run.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Assert that a command containing `needle` was run.
    pub fn assert_called(&self, needle: &str) {
        let commands = self.commands();
        assert!(
            commands.iter().any(|c| c.contains(needle)),
            "expected a command containing {:?}, got {:?}",
            needle,
            commands
        );
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessStatus> {
        self.calls.lock().unwrap().push(cmd.clone());

        let response = self
            .responses
            .iter()
            .find(|(pattern, _)| pattern.matches(cmd))
            .map(|(_, response)| response.clone());

        match response {
            Some(Response::Unavailable) => bail!("No such file or directory (os error 2)"),
            Some(Response::Exit(status)) => Ok(status),
            None => Ok(ProcessStatus::ok()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_runner_defaults_to_success() {
        let runner = RecordingRunner::new();
        let cmd = CommandSpec::new(StepKind::Compile, "6g").arg("a.go");
        assert!(runner.run(&cmd).unwrap().success());
        assert_eq!(runner.commands(), vec!["6g a.go"]);
    }

    #[test]
    fn test_recording_runner_failures() {
        let runner = RecordingRunner::new()
            .fail_on("bad.go", 2)
            .unavailable(StepKind::Link);

        let bad = CommandSpec::new(StepKind::Compile, "6g").arg("bad.go");
        assert_eq!(runner.run(&bad).unwrap().code(), Some(2));

        let link = CommandSpec::new(StepKind::Link, "6l");
        assert!(runner.run(&link).is_err());
        assert_eq!(runner.call_count(), 2);
    }
}
