//! User-friendly diagnostic messages.
//!
//! Every fatal error carries its root cause, context lines (such as the list
//! of candidate entry files) and suggested fixes.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when several entry files are found.
    pub const AMBIGUOUS_ENTRY: &str =
        "Pass one or more entry files as arguments, or run with `--all`";

    /// Suggestion when no entry file exists.
    pub const NO_ENTRY: &str = "Build the packages as libraries with `--lib`";

    /// Suggestion when an unknown architecture is selected.
    pub const UNKNOWN_ARCH: &str = "Set GOARCH or pass `--arch` (amd64, 386 or arm)";

    /// Suggestion when a compile step failed.
    pub const BUILD_FAILED: &str = "Run with `--verbose` to see the files passed to the compiler";
}

/// An error message with context lines and suggestions.
///
/// Warnings go through `tracing` and the shell; only fatal errors are
/// rendered as diagnostics.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let severity_str = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        output.push_str(&format!("{}: {}\n", severity_str, self.message));

        for ctx in &self.context {
            output.push_str(&format!("  {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            for suggestion in &self.suggestions {
                output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
