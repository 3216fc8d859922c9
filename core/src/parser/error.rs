use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::lexer::{LexError, LexErrorKind};
use crate::parser::Span;

/// Parser error with the location of the offending token.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub source: String,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// The tokenizer rejected the input.
    #[error("{0}")]
    Lex(LexErrorKind),
    #[error("Expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },
    #[error("Invalid number literal '{text}'")]
    InvalidNumber { text: String },
    #[error("Expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, source: &str, span: Span) -> Self {
        let (line, column) = crate::parser::line_col(source, span.start());
        Self {
            kind,
            source: source.to_string(),
            span,
            line,
            column,
        }
    }

    pub fn from_lex(err: LexError, source: &str) -> Self {
        Self {
            kind: ParseErrorKind::Lex(err.kind),
            source: source.to_string(),
            span: err.span,
            line: err.line,
            column: err.column,
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::Lex(LexErrorKind::NewlineInString) => (
                "P002",
                Some("Use `\\n` for a line break inside a string"),
            ),
            ParseErrorKind::Lex(_) => ("P002", None),
            ParseErrorKind::InvalidNumber { .. } => ("P003", Some("Check the number format")),
            ParseErrorKind::MaxDepthExceeded { .. } => (
                "P004",
                Some("Reduce nesting or simplify the expression"),
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} at line {}, column {}",
            self.kind, self.line, self.column
        )
    }
}

impl std::error::Error for ParseError {}
