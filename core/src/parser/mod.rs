mod error;
mod parsed_expr;
#[allow(clippy::module_inception)]
mod parser;
mod syntax;

pub use error::{ParseError, ParseErrorKind};
pub use parsed_expr::{Expr, ExprKind, TemplatePart};
pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_max_depth};
pub use syntax::{BinaryOp, Span, UnaryOp, line_col};

#[cfg(test)]
mod parse_test;
