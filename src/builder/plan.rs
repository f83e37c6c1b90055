//! Build plan recording.
//!
//! With `--plan` the scheduler runs against a [`PlanRunner`], which records
//! every toolchain command instead of executing it. Every recorded command
//! reports success, so the plan shows the full build as it would run on a
//! clean tree.

use std::cell::RefCell;

use anyhow::Result;
use serde::Serialize;

use crate::builder::invoker::{ProcessRunner, ProcessStatus};
use crate::builder::toolchain::{Arch, CommandSpec, StepKind};

/// Records commands without running them.
#[derive(Debug, Default)]
pub struct PlanRunner {
    steps: RefCell<Vec<CommandSpec>>,
}

impl PlanRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the runner into a plan.
    pub fn into_plan(self, arch: Arch) -> BuildPlan {
        BuildPlan {
            arch: arch.to_string(),
            steps: self.steps.into_inner(),
        }
    }
}

impl ProcessRunner for PlanRunner {
    fn run(&self, cmd: &CommandSpec) -> Result<ProcessStatus> {
        self.steps.borrow_mut().push(cmd.clone());
        Ok(ProcessStatus::ok())
    }
}

/// The toolchain commands of a build, in execution order.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Target architecture
    pub arch: String,

    /// Commands in execution order
    pub steps: Vec<CommandSpec>,
}

impl BuildPlan {
    /// Number of steps of one kind.
    pub fn count(&self, kind: StepKind) -> usize {
        self.steps.iter().filter(|s| s.kind == kind).count()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
