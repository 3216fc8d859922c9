//! Core of the gamexpr expression language.
//!
//! Pipeline: [`lexer`] turns source text into tokens, [`parser`] builds an
//! [`parser::Expr`] tree, [`evaluator`] walks it against an
//! [`evaluator::EvalContext`] using the builtin table in [`stdlib`].
//! [`analyzer`] performs static validation without evaluating anything,
//! [`api`] hosts the compile cache and typed `resolve_*` entry points, and
//! [`context`] builds one flat evaluation context per game-state update.

pub mod analyzer;
pub mod api;
pub mod context;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod stdlib;
pub mod values;

/// Identifiers that always resolve to engine-provided values.
///
/// They shadow any variable with the same name and never count as
/// dependencies of an expression.
pub const RESERVED_GLOBALS: [&str; 11] = [
    "score", "lives", "time", "wave", "dt", "frameId", "PI", "E", "self", "true", "false",
];

/// Returns true if `name` is one of [`RESERVED_GLOBALS`].
pub fn is_reserved_global(name: &str) -> bool {
    RESERVED_GLOBALS.contains(&name)
}
