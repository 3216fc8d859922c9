//! Runtime evaluation errors.
//!
//! Raised while walking a parsed expression: unresolved names, bad
//! arguments to builtins, arithmetic faults and resource limits. These
//! propagate to the immediate caller; soft type mismatches on typed
//! results are handled later by `ComputedValueSystem` and never show up
//! here.

use ecow::EcoString;
use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::parser::{BinaryOp, Span};
use crate::values::TypeMismatch;

/// Runtime evaluation error with the span of the node that failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Option<Span>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalErrorKind {
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(EcoString),

    #[error("Unknown function: {0}")]
    UnknownFunction(EcoString),

    #[error("'self' is not available in this context")]
    MissingSelf,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("{function}() expects {expected} arguments, got {found}")]
    Arity {
        function: &'static str,
        expected: &'static str,
        found: usize,
    },

    #[error(transparent)]
    TypeMismatch(#[from] TypeMismatch),

    #[error("Unknown {target} property: {property}")]
    UnknownProperty {
        target: &'static str,
        property: EcoString,
    },

    #[error("Operator '{op}' not supported for {operand}")]
    UnsupportedOperator { op: BinaryOp, operand: &'static str },

    #[error("{function}(): {message}")]
    InvalidArgument {
        function: &'static str,
        message: &'static str,
    },

    #[error("'{name}' cannot be used as a value")]
    NotAValue { name: &'static str },

    #[error("Evaluation stack overflow: depth exceeds maximum of {max_depth}")]
    StackOverflow { max_depth: usize },
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            EvalErrorKind::UnknownIdentifier(_) => {
                ("R001", Some("Declare it as a game variable"))
            }
            EvalErrorKind::UnknownFunction(_) => ("R002", None),
            EvalErrorKind::MissingSelf => (
                "R003",
                Some("'self' is only set when evaluating for an entity"),
            ),
            EvalErrorKind::DivisionByZero | EvalErrorKind::ModuloByZero => ("R004", None),
            EvalErrorKind::Arity { .. } | EvalErrorKind::InvalidArgument { .. } => ("R005", None),
            EvalErrorKind::TypeMismatch(_) | EvalErrorKind::NotAValue { .. } => ("R006", None),
            EvalErrorKind::UnknownProperty { .. } => ("R007", None),
            EvalErrorKind::UnsupportedOperator { .. } => ("R008", None),
            EvalErrorKind::StackOverflow { .. } => (
                "R009",
                Some("Reduce nesting or simplify the expression"),
            ),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone().unwrap_or(Span::new(0, 0)),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

impl From<EvalErrorKind> for EvalError {
    fn from(kind: EvalErrorKind) -> Self {
        Self { kind, span: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::ValueKind;

    #[test]
    fn test_messages() {
        assert_eq!(
            EvalErrorKind::Arity {
                function: "clamp",
                expected: "3",
                found: 2
            }
            .to_string(),
            "clamp() expects 3 arguments, got 2"
        );
        assert_eq!(
            EvalErrorKind::from(TypeMismatch {
                expected: ValueKind::Number,
                found: ValueKind::Str
            })
            .to_string(),
            "Expected number, got string"
        );
        assert_eq!(
            EvalErrorKind::UnknownProperty {
                target: "vector",
                property: "z".into()
            }
            .to_string(),
            "Unknown vector property: z"
        );
    }

    #[test]
    fn test_diagnostic_without_span_points_at_start() {
        let err = EvalError::from(EvalErrorKind::DivisionByZero);
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.span, Span::new(0, 0));
        assert_eq!(diagnostic.code.as_deref(), Some("R004"));
    }
}
