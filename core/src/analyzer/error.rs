use core::fmt;

use serde::Serialize;

use crate::api::{Diagnostic, Severity};
use crate::parser::{ParseError, Span, line_col};

/// One validator finding, located in its expression source.
///
/// Used for both errors and warnings. `context` carries the content path
/// supplied by the caller (for example `rules[3].condition`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionError {
    pub message: String,
    pub source: String,
    /// Byte offset of the finding in `source`.
    pub position: usize,
    pub line: usize,
    pub column: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip)]
    pub span: Span,
}

impl ExpressionError {
    pub fn new(message: impl Into<String>, source: &str, span: Span, context: Option<&str>) -> Self {
        let (line, column) = line_col(source, span.start());
        Self {
            message: message.into(),
            source: source.to_string(),
            position: span.start(),
            line,
            column,
            context: context.map(str::to_string),
            span,
        }
    }

    pub(crate) fn from_parse(err: &ParseError, context: Option<&str>) -> Self {
        Self {
            message: err.to_string(),
            source: err.source.clone(),
            position: err.span.start(),
            line: err.line,
            column: err.column,
            context: context.map(str::to_string),
            span: err.span.clone(),
        }
    }

    pub fn to_diagnostic(&self, severity: Severity) -> Diagnostic {
        Diagnostic {
            severity,
            message: self.message.clone(),
            span: self.span.clone(),
            help: None,
            code: Some(
                match severity {
                    Severity::Error => "V001",
                    _ => "V002",
                }
                .to_string(),
            ),
        }
    }
}

impl fmt::Display for ExpressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] ", context)?;
        }
        write!(f, "Error: {}", self.message)?;
        write!(f, "\n  at line {}, column {}", self.line, self.column)?;
        if !self.source.is_empty() {
            write!(f, "\n  in expression: \"{}\"", self.source)?;
        }
        Ok(())
    }
}
