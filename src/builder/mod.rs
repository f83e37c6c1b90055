//! Build driver for the legacy toolchain.
//!
//! This module turns build units into compile, link and archive commands
//! and runs them in dependency order.

pub mod context;
pub mod errors;
pub mod invoker;
pub mod plan;
pub mod scheduler;
pub mod toolchain;

pub use context::{BuildContext, OutputLayout};
pub use errors::BuildError;
pub use invoker::{ProcessRunner, ProcessStatus, SystemRunner, ToolchainInvoker};
pub use plan::{BuildPlan, PlanRunner};
pub use scheduler::{BuildResult, BuildSession, PackageState};
pub use toolchain::{Arch, CommandSpec, StepKind, Toolchain};
