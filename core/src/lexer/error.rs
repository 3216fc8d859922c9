use thiserror::Error;

use crate::parser::Span;

/// Tokenizer failure with the location where it was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {line}, column {column}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexErrorKind {
    #[error("Unterminated string")]
    UnterminatedString,
    #[error("Unterminated string (newline in string)")]
    NewlineInString,
    #[error("Unterminated template string")]
    UnterminatedTemplate,
    #[error("Unterminated expression in template string")]
    UnterminatedTemplateExpr,
    #[error("Invalid number: expected digit after exponent")]
    InvalidExponent,
    #[error("Unexpected character: '{0}'")]
    UnexpectedChar(char),
}
