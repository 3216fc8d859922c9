//! Tree-walking evaluator for gamexpr expressions.
//!
//! The evaluator interprets parsed expressions ([`Expr`]) against an
//! [`EvalContext`] and produces a [`RuntimeValue`].
//!
//! ## Design Principles
//!
//! - **Never panic**: All adversarial inputs must be handled gracefully
//! - **Stack-safe**: Depth tracking prevents stack overflow from deeply nested expressions
//! - **Sandboxed**: Expressions only see the context; randomness comes from `ctx.random`
//!
//! ## Example
//!
//! ```
//! use gamexpr_core::{evaluator, parser};
//! use gamexpr_core::evaluator::EvalContext;
//! use gamexpr_core::values::RuntimeValue;
//!
//! let expr = parser::parse("1 + 2 * 3").unwrap();
//! let ctx = EvalContext::default();
//! assert_eq!(evaluator::eval(&expr, &ctx).unwrap(), RuntimeValue::Number(7.0));
//! ```

mod context;
mod error;
mod eval;
mod operators;


pub use context::{
    DEFAULT_SEED, EntityContext, EntityQuery, EntitySnapshot, EvalContext, GameState,
    RandomSource, SeededRandom, Transform,
};
pub use error::{EvalError, EvalErrorKind};
pub use eval::Evaluator;

use crate::{parser::Expr, values::RuntimeValue};

/// Default maximum evaluation depth.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Evaluate a parsed expression with the default depth limit.
pub fn eval(expr: &Expr, ctx: &EvalContext) -> Result<RuntimeValue, EvalError> {
    eval_with_limits(expr, ctx, DEFAULT_MAX_DEPTH)
}

/// Evaluate a parsed expression with a custom depth limit.
pub fn eval_with_limits(
    expr: &Expr,
    ctx: &EvalContext,
    max_depth: usize,
) -> Result<RuntimeValue, EvalError> {
    Evaluator::new(ctx, max_depth).eval(expr)
}
