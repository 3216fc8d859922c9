//! Static validator for expression sources.
//!
//! Parses with the same grammar as the evaluator, then classifies every node
//! into a [`ReturnType`] using the builtin return rules. Findings are
//! collected into a [`ValidationResult`] rather than returned as errors, so a
//! whole content file can be linted in one pass.

#[allow(clippy::module_inception)]
mod analyzer;
mod error;


pub use analyzer::{
    BatchValidationResult, ExpressionSource, ReturnType, ValidateOptions, ValidationResult,
    format_validation_errors, validate_all_expressions, validate_expression,
};
pub use error::ExpressionError;
