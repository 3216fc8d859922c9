//! Binary and unary operator implementations.
//!
//! `&&` and `||` short-circuit and live in the evaluator itself; everything
//! else is a pure function of two already-evaluated operands.

use crate::{
    evaluator::EvalErrorKind,
    parser::{BinaryOp, UnaryOp},
    values::{RuntimeValue, Vec2},
};

/// Evaluate a non-logical binary operation.
///
/// A vector on either side selects componentwise vector arithmetic (a number
/// on the other side broadcasts). Otherwise `+` concatenates when either side
/// is a string, `==` / `!=` compare structurally, and the remaining operators
/// work on numbers (booleans count as `0` / `1`).
pub(super) fn eval_binary(
    op: BinaryOp,
    left: &RuntimeValue,
    right: &RuntimeValue,
) -> Result<RuntimeValue, EvalErrorKind> {
    if left.is_vec2() || right.is_vec2() {
        return eval_binary_vec2(op, left.as_vec2()?, right.as_vec2()?);
    }

    match op {
        BinaryOp::Eq => return Ok(RuntimeValue::Bool(left == right)),
        BinaryOp::Ne => return Ok(RuntimeValue::Bool(left != right)),
        BinaryOp::Add if left.is_str() || right.is_str() => {
            return Ok(RuntimeValue::Str(ecow::eco_format!("{}{}", left, right)));
        }
        _ => {}
    }

    let a = left.as_number()?;
    let b = right.as_number()?;
    eval_binary_number(op, a, b)
}

/// Arithmetic and relational operators on numbers.
///
/// Division and modulo by zero are errors rather than infinities.
pub(super) fn eval_binary_number(
    op: BinaryOp,
    a: f64,
    b: f64,
) -> Result<RuntimeValue, EvalErrorKind> {
    let value = match op {
        BinaryOp::Add => RuntimeValue::Number(a + b),
        BinaryOp::Sub => RuntimeValue::Number(a - b),
        BinaryOp::Mul => RuntimeValue::Number(a * b),
        BinaryOp::Div => {
            if b == 0.0 {
                return Err(EvalErrorKind::DivisionByZero);
            }
            RuntimeValue::Number(a / b)
        }
        BinaryOp::Rem => {
            if b == 0.0 {
                return Err(EvalErrorKind::ModuloByZero);
            }
            // Sign follows the dividend, like C fmod.
            RuntimeValue::Number(a % b)
        }
        BinaryOp::Lt => RuntimeValue::Bool(a < b),
        BinaryOp::Le => RuntimeValue::Bool(a <= b),
        BinaryOp::Gt => RuntimeValue::Bool(a > b),
        BinaryOp::Ge => RuntimeValue::Bool(a >= b),
        BinaryOp::Eq => RuntimeValue::Bool(a == b),
        BinaryOp::Ne => RuntimeValue::Bool(a != b),
        BinaryOp::And => RuntimeValue::Bool(a != 0.0 && b != 0.0),
        BinaryOp::Or => RuntimeValue::Bool(a != 0.0 || b != 0.0),
    };
    Ok(value)
}

/// Componentwise vector operators.
pub(super) fn eval_binary_vec2(op: BinaryOp, a: Vec2, b: Vec2) -> Result<RuntimeValue, EvalErrorKind> {
    let value = match op {
        BinaryOp::Add => RuntimeValue::Vec2(a + b),
        BinaryOp::Sub => RuntimeValue::Vec2(a - b),
        BinaryOp::Mul => RuntimeValue::Vec2(a * b),
        BinaryOp::Div => {
            if b.x == 0.0 || b.y == 0.0 {
                return Err(EvalErrorKind::DivisionByZero);
            }
            RuntimeValue::Vec2(a / b)
        }
        BinaryOp::Eq => RuntimeValue::Bool(a == b),
        BinaryOp::Ne => RuntimeValue::Bool(a != b),
        _ => {
            return Err(EvalErrorKind::UnsupportedOperator {
                op,
                operand: "vectors",
            });
        }
    };
    Ok(value)
}

pub(super) fn eval_unary(op: UnaryOp, operand: &RuntimeValue) -> Result<RuntimeValue, EvalErrorKind> {
    match op {
        UnaryOp::Neg => match operand {
            RuntimeValue::Vec2(v) => Ok(RuntimeValue::Vec2(-*v)),
            other => Ok(RuntimeValue::Number(-other.as_number()?)),
        },
        UnaryOp::Not => Ok(RuntimeValue::Bool(!operand.is_truthy())),
    }
}
