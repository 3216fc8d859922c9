//! Public error types for the gamexpr API.
//!
//! Internal errors (`ParseError`, `EvalError`, `BuildError`) are converted
//! to these types at API boundaries. Each variant keeps the expression
//! source so the error can be rendered on its own.

use core::fmt;

use crate::evaluator::EvalError;
use crate::parser::{ParseError, Span};

/// Public error type for compile and evaluate calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The expression failed to tokenize or parse.
    Compilation {
        diagnostics: Vec<Diagnostic>,
        source: String,
    },

    /// Evaluation failed (unknown name, bad arguments, division by zero,
    /// depth limit).
    Runtime {
        diagnostic: Diagnostic,
        source: String,
    },
}

impl Error {
    pub fn runtime(err: &EvalError, source: impl Into<String>) -> Self {
        Error::Runtime {
            diagnostic: err.to_diagnostic(),
            source: source.into(),
        }
    }

    /// Source text of the expression that failed.
    pub fn source_text(&self) -> &str {
        match self {
            Error::Compilation { source, .. } | Error::Runtime { source, .. } => source,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics,
            Error::Runtime { diagnostic, .. } => core::slice::from_ref(diagnostic),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compilation { diagnostics, .. } => match diagnostics.as_slice() {
                [only] => write!(f, "Compilation failed: {}", only.message),
                _ => {
                    let error_count = diagnostics
                        .iter()
                        .filter(|d| d.severity == Severity::Error)
                        .count();
                    write!(f, "Compilation failed with {} error(s)", error_count)
                }
            },
            Error::Runtime { diagnostic, .. } => write!(f, "Runtime error: {}", diagnostic.message),
        }
    }
}

impl std::error::Error for Error {}

/// A diagnostic message (error, warning, or info) with source location.
///
/// Maps cleanly to LSP diagnostics for editor integration.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Source location of the primary issue.
    pub span: Span,
    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,
    /// Error code (`P0xx` syntax, `R0xx` runtime, `V0xx` validation).
    pub code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

// ============================================================================
// Conversion from internal errors
// ============================================================================

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Compilation {
            diagnostics: vec![err.to_diagnostic()],
            source: err.source,
        }
    }
}
