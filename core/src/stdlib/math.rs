//! Math builtins
//!
//! Functions: min, max, clamp, lerp, mix, abs, floor, ceil, round, sqrt,
//!            pow, sin, cos, tan, atan2, sign, smoothstep, step, fract, mod
//!
//! `min`, `max`, `clamp`, `lerp`/`mix`, `abs`, `floor`, `ceil` and `round`
//! also accept vectors and work componentwise.

use crate::{
    evaluator::{EvalContext, EvalErrorKind},
    values::{RuntimeValue, Vec2},
};

use super::arity;

type BuiltinResult = Result<RuntimeValue, EvalErrorKind>;

/// Round half up (`-2.5` rounds to `-2`).
pub(crate) fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Unary function that maps vectors componentwise.
macro_rules! componentwise {
    ($fn_name:ident, $name:literal, $op:expr) => {
        pub fn $fn_name(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
            let [a] = args else {
                return Err(arity($name, "1", args));
            };
            let op: fn(f64) -> f64 = $op;
            Ok(match a {
                RuntimeValue::Vec2(v) => RuntimeValue::Vec2(v.map(op)),
                other => RuntimeValue::Number(op(other.as_number()?)),
            })
        }
    };
}

/// Unary function on numbers only.
macro_rules! scalar {
    ($fn_name:ident, $name:literal, $op:expr) => {
        pub fn $fn_name(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
            let [a] = args else {
                return Err(arity($name, "1", args));
            };
            let op: fn(f64) -> f64 = $op;
            Ok(RuntimeValue::Number(op(a.as_number()?)))
        }
    };
}

// ============================================================================
// Basic Operations
// ============================================================================

pub fn min(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [a, b] = args else {
        return Err(arity("min", "2", args));
    };
    if let (RuntimeValue::Vec2(a), RuntimeValue::Vec2(b)) = (a, b) {
        return Ok(RuntimeValue::Vec2(a.zip_with(*b, f64::min)));
    }
    Ok(RuntimeValue::Number(a.as_number()?.min(b.as_number()?)))
}

pub fn max(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [a, b] = args else {
        return Err(arity("max", "2", args));
    };
    if let (RuntimeValue::Vec2(a), RuntimeValue::Vec2(b)) = (a, b) {
        return Ok(RuntimeValue::Vec2(a.zip_with(*b, f64::max)));
    }
    Ok(RuntimeValue::Number(a.as_number()?.max(b.as_number()?)))
}

/// `clamp(value, lo, hi)`. An inverted range yields `lo`.
pub fn clamp(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [value, lo, hi] = args else {
        return Err(arity("clamp", "3", args));
    };
    // f64::clamp panics on lo > hi, so compose min/max instead.
    let clamp = |v: f64, lo: f64, hi: f64| lo.max(hi.min(v));

    if let RuntimeValue::Vec2(v) = value {
        let lo = lo.as_vec2()?;
        let hi = hi.as_vec2()?;
        return Ok(RuntimeValue::Vec2(Vec2::new(
            clamp(v.x, lo.x, hi.x),
            clamp(v.y, lo.y, hi.y),
        )));
    }
    Ok(RuntimeValue::Number(clamp(
        value.as_number()?,
        lo.as_number()?,
        hi.as_number()?,
    )))
}

fn lerp_impl(name: &'static str, args: &[RuntimeValue]) -> BuiltinResult {
    let [a, b, t] = args else {
        return Err(arity(name, "3", args));
    };
    let t = t.as_number()?;
    if let (RuntimeValue::Vec2(a), RuntimeValue::Vec2(b)) = (a, b) {
        return Ok(RuntimeValue::Vec2(*a + (*b - *a) * t));
    }
    let a = a.as_number()?;
    let b = b.as_number()?;
    Ok(RuntimeValue::Number(a + (b - a) * t))
}

pub fn lerp(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    lerp_impl("lerp", args)
}

/// Alias of `lerp`.
pub fn mix(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    lerp_impl("mix", args)
}

componentwise!(abs, "abs", f64::abs);
componentwise!(floor, "floor", f64::floor);
componentwise!(ceil, "ceil", f64::ceil);
componentwise!(round, "round", round_half_up);

// ============================================================================
// Powers and Trigonometry
// ============================================================================

scalar!(sqrt, "sqrt", f64::sqrt);
scalar!(sin, "sin", f64::sin);
scalar!(cos, "cos", f64::cos);
scalar!(tan, "tan", f64::tan);

pub fn pow(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [base, exp] = args else {
        return Err(arity("pow", "2", args));
    };
    Ok(RuntimeValue::Number(base.as_number()?.powf(exp.as_number()?)))
}

/// `atan2(y, x)`
pub fn atan2(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [y, x] = args else {
        return Err(arity("atan2", "2", args));
    };
    Ok(RuntimeValue::Number(y.as_number()?.atan2(x.as_number()?)))
}

// ============================================================================
// Shaping
// ============================================================================

// NaN and zero both map to 0.
scalar!(sign, "sign", |n| if n > 0.0 {
    1.0
} else if n < 0.0 {
    -1.0
} else {
    0.0
});

scalar!(fract, "fract", |x| x - x.floor());

/// `smoothstep(edge0, edge1, x)`: Hermite curve with `t` clamped to `[0, 1]`.
pub fn smoothstep(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [edge0, edge1, x] = args else {
        return Err(arity("smoothstep", "3", args));
    };
    let edge0 = edge0.as_number()?;
    let edge1 = edge1.as_number()?;
    let x = x.as_number()?;
    let t = 0f64.max(1f64.min((x - edge0) / (edge1 - edge0)));
    Ok(RuntimeValue::Number(t * t * (3.0 - 2.0 * t)))
}

/// `step(edge, x)`: `0` below the edge, `1` at or above it.
pub fn step(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [edge, x] = args else {
        return Err(arity("step", "2", args));
    };
    let value = if x.as_number()? < edge.as_number()? { 0.0 } else { 1.0 };
    Ok(RuntimeValue::Number(value))
}

/// Floored modulo: the result takes the sign of the divisor.
pub fn modulo(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [x, y] = args else {
        return Err(arity("mod", "2", args));
    };
    let x = x.as_number()?;
    let y = y.as_number()?;
    Ok(RuntimeValue::Number(x - y * (x / y).floor()))
}
