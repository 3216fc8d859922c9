//! Vector builtins: vec2, length, normalize, dot, distance
//!
//! Wherever a vector is expected a number is accepted and broadcast to
//! both components.

use crate::{
    evaluator::{EvalContext, EvalErrorKind},
    values::{RuntimeValue, Vec2},
};

use super::arity;

type BuiltinResult = Result<RuntimeValue, EvalErrorKind>;

/// `vec2(v)` broadcasts, `vec2(x, y)` builds.
pub fn vec2(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    match args {
        [v] => Ok(RuntimeValue::Vec2(Vec2::splat(v.as_number()?))),
        [x, y] => Ok(RuntimeValue::Vec2(Vec2::new(x.as_number()?, y.as_number()?))),
        _ => Err(arity("vec2", "1 or 2", args)),
    }
}

/// Euclidean length of a vector, or absolute value of a number.
pub fn length(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [v] = args else {
        return Err(arity("length", "1", args));
    };
    Ok(RuntimeValue::Number(match v {
        RuntimeValue::Vec2(v) => v.length(),
        other => other.as_number()?.abs(),
    }))
}

/// Unit vector in the same direction. The zero vector stays zero.
pub fn normalize(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [v] = args else {
        return Err(arity("normalize", "1", args));
    };
    Ok(RuntimeValue::Vec2(v.as_vec2()?.normalize()))
}

pub fn dot(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [a, b] = args else {
        return Err(arity("dot", "2", args));
    };
    Ok(RuntimeValue::Number(a.as_vec2()?.dot(b.as_vec2()?)))
}

pub fn distance(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [a, b] = args else {
        return Err(arity("distance", "2", args));
    };
    Ok(RuntimeValue::Number(a.as_vec2()?.distance(b.as_vec2()?)))
}
