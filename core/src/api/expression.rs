//! Compiled gamexpr expressions.

use ecow::EcoString;

use super::{EngineOptions, Error};
use crate::evaluator::{self, EvalContext, EvalError};
use crate::parser::{self, Expr, ParseError};
use crate::values::RuntimeValue;

/// A parsed, dependency-analyzed expression ready for repeated evaluation.
///
/// Owns its tree and source, so it can be cached and shared (`Arc`) across
/// frames without borrowing from anything.
///
/// # Example
///
/// ```
/// use gamexpr_core::api;
/// use gamexpr_core::evaluator::EvalContext;
/// use gamexpr_core::values::RuntimeValue;
///
/// let expr = api::compile("base * 2").unwrap();
/// assert_eq!(expr.dependencies()[0].as_str(), "base");
///
/// let ctx = EvalContext::default().with_variable("base", 21.0);
/// assert_eq!(expr.evaluate(&ctx).unwrap(), RuntimeValue::Number(42.0));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: EcoString,
    expr: Expr,
    /// Referenced variable names in first-use order, reserved globals excluded.
    dependencies: Vec<EcoString>,
    max_eval_depth: usize,
}

impl CompiledExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Expr {
        &self.expr
    }

    pub fn dependencies(&self) -> &[EcoString] {
        &self.dependencies
    }

    /// Evaluate against `ctx`.
    pub fn evaluate(&self, ctx: &EvalContext) -> Result<RuntimeValue, EvalError> {
        evaluator::eval_with_limits(&self.expr, ctx, self.max_eval_depth)
    }
}

/// Compile `source` with default limits.
pub fn compile(source: &str) -> Result<CompiledExpression, ParseError> {
    compile_with_options(source, &EngineOptions::default())
}

pub fn compile_with_options(
    source: &str,
    options: &EngineOptions,
) -> Result<CompiledExpression, ParseError> {
    let expr = parser::parse_with_max_depth(source, options.max_parse_depth)?;
    let dependencies = expr.dependencies();
    Ok(CompiledExpression {
        source: source.into(),
        expr,
        dependencies,
        max_eval_depth: options.max_eval_depth,
    })
}

/// Compile and evaluate in one step.
pub fn evaluate(source: &str, ctx: &EvalContext) -> Result<RuntimeValue, Error> {
    let compiled = compile(source)?;
    compiled
        .evaluate(ctx)
        .map_err(|err| Error::runtime(&err, source))
}
