//! Core evaluation logic.

use ecow::EcoString;
use smallvec::SmallVec;

use crate::{
    evaluator::{
        EntityContext, EvalContext, EvalError, EvalErrorKind,
        context::Transform,
        operators::{eval_binary, eval_unary},
    },
    parser::{BinaryOp, Expr, ExprKind, Span, TemplatePart},
    stdlib,
    values::RuntimeValue,
};

/// Result of evaluating a name or member access.
///
/// `self` and `self.transform` are records rather than values; they only
/// become values when a property is read (or, for a transform, when it is
/// used as a position).
enum Operand<'ctx> {
    Value(RuntimeValue),
    Entity(&'ctx EntityContext),
    Transform(&'ctx Transform),
}

/// Tree-walking evaluator bound to one context.
pub struct Evaluator<'ctx> {
    ctx: &'ctx EvalContext,
    max_depth: usize,
    depth: usize,
}

impl<'ctx> Evaluator<'ctx> {
    pub fn new(ctx: &'ctx EvalContext, max_depth: usize) -> Self {
        Self {
            ctx,
            max_depth,
            depth: 0,
        }
    }

    /// Evaluate an expression node.
    pub fn eval(&mut self, expr: &Expr) -> Result<RuntimeValue, EvalError> {
        let operand = self.eval_operand(expr)?;
        self.operand_value(operand, &expr.span)
    }

    fn eval_operand(&mut self, expr: &Expr) -> Result<Operand<'ctx>, EvalError> {
        // Check depth before recursing
        if self.depth >= self.max_depth {
            return Err(EvalError::new(
                EvalErrorKind::StackOverflow {
                    max_depth: self.max_depth,
                },
                expr.span.clone(),
            ));
        }

        self.depth += 1;
        let result = self.eval_operand_inner(expr);
        self.depth -= 1;

        result
    }

    fn eval_operand_inner(&mut self, expr: &Expr) -> Result<Operand<'ctx>, EvalError> {
        let value = match &expr.kind {
            ExprKind::Number(n) => RuntimeValue::Number(*n),
            ExprKind::Bool(b) => RuntimeValue::Bool(*b),
            ExprKind::Str(s) => RuntimeValue::Str(s.clone()),

            ExprKind::Vector { x, y } => {
                let x = self.eval_number(x)?;
                let y = self.eval_number(y)?;
                RuntimeValue::Vec2(crate::values::Vec2::new(x, y))
            }

            ExprKind::Ident(name) => return self.resolve_identifier(name, &expr.span),

            ExprKind::Member { object, property } => {
                let object = self.eval_operand(object)?;
                return self
                    .resolve_member(object, property)
                    .map_err(|kind| EvalError::new(kind, expr.span.clone()));
            }

            ExprKind::Binary { op, left, right } => match op {
                // Short-circuit evaluation
                BinaryOp::And => {
                    let left = self.eval(left)?;
                    RuntimeValue::Bool(left.is_truthy() && self.eval(right)?.is_truthy())
                }
                BinaryOp::Or => {
                    let left = self.eval(left)?;
                    RuntimeValue::Bool(left.is_truthy() || self.eval(right)?.is_truthy())
                }
                _ => {
                    let left = self.eval(left)?;
                    let right = self.eval(right)?;
                    eval_binary(*op, &left, &right)
                        .map_err(|kind| EvalError::new(kind, expr.span.clone()))?
                }
            },

            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                eval_unary(*op, &operand).map_err(|kind| EvalError::new(kind, expr.span.clone()))?
            }

            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval(cond)?.is_truthy() {
                    self.eval(then_branch)?
                } else {
                    self.eval(else_branch)?
                }
            }

            ExprKind::Call {
                name,
                name_span,
                args,
            } => {
                let Some(builtin) = stdlib::lookup(name) else {
                    return Err(EvalError::new(
                        EvalErrorKind::UnknownFunction(name.clone()),
                        name_span.clone(),
                    ));
                };
                let values = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<SmallVec<[RuntimeValue; 4]>, _>>()?;
                (builtin.func)(&values, self.ctx)
                    .map_err(|kind| EvalError::new(kind, expr.span.clone()))?
            }

            ExprKind::Template(parts) => {
                let mut out = EcoString::new();
                for part in parts {
                    match part {
                        TemplatePart::Text(text) => out.push_str(text),
                        TemplatePart::Expr(inner) => {
                            let value = self.eval(inner)?;
                            out.push_str(&value.to_string());
                        }
                    }
                }
                RuntimeValue::Str(out)
            }
        };

        Ok(Operand::Value(value))
    }

    fn eval_number(&mut self, expr: &Expr) -> Result<f64, EvalError> {
        self.eval(expr)?
            .as_number()
            .map_err(|err| EvalError::new(err.into(), expr.span.clone()))
    }

    /// Reserved globals take precedence over variables of the same name.
    fn resolve_identifier(&self, name: &EcoString, span: &Span) -> Result<Operand<'ctx>, EvalError> {
        let state = &self.ctx.state;
        let value = match name.as_str() {
            "score" => state.score,
            "lives" => state.lives,
            "time" => state.time,
            "wave" => state.wave,
            "dt" => state.dt,
            "frameId" => state.frame_id as f64,
            "PI" => core::f64::consts::PI,
            "E" => core::f64::consts::E,
            "self" => {
                return match &self.ctx.self_entity {
                    Some(entity) => Ok(Operand::Entity(entity)),
                    None => Err(EvalError::new(EvalErrorKind::MissingSelf, span.clone())),
                };
            }
            _ => {
                return match self.ctx.variables.get(name) {
                    Some(value) => Ok(Operand::Value(value.clone())),
                    None => Err(EvalError::new(
                        EvalErrorKind::UnknownIdentifier(name.clone()),
                        span.clone(),
                    )),
                };
            }
        };
        Ok(Operand::Value(RuntimeValue::Number(value)))
    }

    fn resolve_member(
        &self,
        object: Operand<'ctx>,
        property: &EcoString,
    ) -> Result<Operand<'ctx>, EvalErrorKind> {
        let unknown = |target: &'static str| EvalErrorKind::UnknownProperty {
            target,
            property: property.clone(),
        };

        let value = match object {
            Operand::Entity(entity) => match property.as_str() {
                "id" => RuntimeValue::Str(entity.id.clone()),
                "transform" => return Ok(Operand::Transform(&entity.transform)),
                "velocity" => RuntimeValue::Vec2(entity.velocity.ok_or_else(|| unknown("self"))?),
                "health" => RuntimeValue::Number(entity.health.ok_or_else(|| unknown("self"))?),
                "maxHealth" => {
                    RuntimeValue::Number(entity.max_health.ok_or_else(|| unknown("self"))?)
                }
                other => entity.extra.get(other).cloned().ok_or_else(|| unknown("self"))?,
            },
            Operand::Transform(transform) => match property.as_str() {
                "x" => RuntimeValue::Number(transform.x),
                "y" => RuntimeValue::Number(transform.y),
                "angle" => RuntimeValue::Number(transform.angle),
                _ => return Err(unknown("transform")),
            },
            Operand::Value(RuntimeValue::Vec2(v)) => match property.as_str() {
                "x" | "r" => RuntimeValue::Number(v.x),
                "y" | "g" => RuntimeValue::Number(v.y),
                _ => return Err(unknown("vector")),
            },
            Operand::Value(RuntimeValue::List(items)) => {
                if property.as_str() == "length" {
                    RuntimeValue::Number(items.len() as f64)
                } else {
                    property
                        .parse::<usize>()
                        .ok()
                        .and_then(|index| items.get(index).cloned())
                        .ok_or_else(|| unknown("list"))?
                }
            }
            Operand::Value(other) => {
                return Err(unknown(match other {
                    RuntimeValue::Number(_) => "number",
                    RuntimeValue::Bool(_) => "boolean",
                    _ => "string",
                }));
            }
        };
        Ok(Operand::Value(value))
    }

    fn operand_value(&self, operand: Operand<'ctx>, span: &Span) -> Result<RuntimeValue, EvalError> {
        match operand {
            Operand::Value(value) => Ok(value),
            Operand::Transform(transform) => Ok(RuntimeValue::Vec2(transform.position())),
            Operand::Entity(_) => Err(EvalError::new(
                EvalErrorKind::NotAValue { name: "self" },
                span.clone(),
            )),
        }
    }
}
