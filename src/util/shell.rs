//! Centralized shell output.
//!
//! All user-facing status lines go through the Shell so verbosity filtering
//! and formatting stay in one place. Status lines are written to stderr as
//! `{status:>12} {message}`.
//!
//! Verbosity levels, from least to most output:
//! - Quieter: errors only
//! - Quiet: warnings and errors
//! - Normal: progress statuses as well
//! - Verbose: debug detail such as per-package file lists

use std::fmt::Display;
use std::io::{self, IsTerminal};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// --quieter: errors only
    Quieter,
    /// --quiet: warnings and errors
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus debug detail
    Verbose,
}

impl Verbosity {
    /// Pick the verbosity from CLI flags; the quietest flag wins.
    pub fn from_flags(quieter: bool, quiet: bool, verbose: bool) -> Self {
        if quieter {
            Verbosity::Quieter
        } else if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        }
    }

    /// Matching `tracing` filter directive.
    pub fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quieter => "skiff=error",
            Verbosity::Quiet => "skiff=warn",
            Verbosity::Normal => "skiff=info",
            Verbosity::Verbose => "skiff=debug",
        }
    }
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Always use ANSI colors.
    Always,
    /// Never use ANSI colors.
    Never,
}

impl std::str::FromStr for ColorChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ColorChoice::Auto),
            "always" => Ok(ColorChoice::Always),
            "never" => Ok(ColorChoice::Never),
            _ => Err(format!(
                "invalid color choice '{}'; expected 'auto', 'always', or 'never'",
                s
            )),
        }
    }
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success statuses (green)
    Finished,
    Removed,

    // In-progress statuses (cyan)
    Parsing,
    Compiling,
    Linking,
    Archiving,
    Cleaning,

    // Warning statuses (yellow)
    Skipped,
    Warning,

    // Error status (red)
    Error,
}

impl Status {
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Removed => "Removed",
            Status::Parsing => "Parsing",
            Status::Compiling => "Compiling",
            Status::Linking => "Linking",
            Status::Archiving => "Archiving",
            Status::Cleaning => "Cleaning",
            Status::Skipped => "Skipped",
            Status::Warning => "warning",
            Status::Error => "error",
        }
    }

    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Removed => "\x1b[1;32m",
            Status::Parsing
            | Status::Compiling
            | Status::Linking
            | Status::Archiving
            | Status::Cleaning => "\x1b[1;36m",
            Status::Skipped | Status::Warning => "\x1b[1;33m",
            Status::Error => "\x1b[1;31m",
        }
    }

    /// Minimum verbosity at which this status is printed.
    fn min_verbosity(&self) -> Verbosity {
        match self {
            Status::Error => Verbosity::Quieter,
            Status::Warning | Status::Skipped => Verbosity::Quiet,
            _ => Verbosity::Normal,
        }
    }
}

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Get the verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Check if colors are enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Whether a status line would be printed at the current verbosity.
    pub fn should_print(&self, status: Status) -> bool {
        self.verbosity >= status.min_verbosity()
    }

    /// Print a status message.
    pub fn status(&self, status: Status, msg: impl Display) {
        if !self.should_print(status) {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print an indented detail line, only in verbose mode.
    pub fn detail(&self, msg: impl Display) {
        if self.is_verbose() {
            eprintln!("{:>12} {}", "", msg);
        }
    }

    /// Print a warning message.
    pub fn warn(&self, msg: impl Display) {
        self.status(Status::Warning, msg);
    }

    /// Print an error message. Never filtered.
    pub fn error(&self, msg: impl Display) {
        self.status(Status::Error, msg);
    }

    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!("{}{:>12}\x1b[0m", status.color_code(), text)
        } else {
            format!("{:>12}", text)
        }
    }
}

impl Default for Shell {
    fn default() -> Self {
        Shell::new(Verbosity::Normal, ColorChoice::Auto)
    }
}
