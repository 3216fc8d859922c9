//! Random builtins: rand, randomInt, choose, weightedChoice
//!
//! Every draw goes through `EvalContext::random`, so a seeded context
//! replays the same sequence.

use crate::{
    evaluator::{EvalContext, EvalErrorKind},
    values::RuntimeValue,
};

use super::arity;

type BuiltinResult = Result<RuntimeValue, EvalErrorKind>;

/// `rand()` in `[0, 1]`, `rand(lo, hi)` scaled into `[lo, hi]`.
pub fn rand(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    match args {
        [] => Ok(RuntimeValue::Number(ctx.random())),
        [lo, hi] => {
            let lo = lo.as_number()?;
            let hi = hi.as_number()?;
            Ok(RuntimeValue::Number(lo + ctx.random() * (hi - lo)))
        }
        _ => Err(arity("rand", "0 or 2", args)),
    }
}

/// Integer in `[floor(lo), floor(hi)]`, both ends inclusive.
pub fn random_int(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [lo, hi] = args else {
        return Err(arity("randomInt", "2", args));
    };
    let lo = lo.as_number()?.floor();
    let hi = hi.as_number()?.floor();
    Ok(RuntimeValue::Number(
        lo + (ctx.random() * (hi - lo + 1.0)).floor(),
    ))
}

/// One of the arguments, uniformly.
pub fn choose(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    if args.is_empty() {
        return Err(EvalErrorKind::InvalidArgument {
            function: "choose",
            message: "requires at least one argument",
        });
    }
    Ok(pick(args, ctx).clone())
}

/// `weightedChoice(v1, w1, v2, w2, ...)`
///
/// A zero total weight selects the first value. Rounding at the top of the
/// range falls back to the last value.
pub fn weighted_choice(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    if args.len() < 2 || args.len() % 2 != 0 {
        return Err(EvalErrorKind::InvalidArgument {
            function: "weightedChoice",
            message: "requires pairs of (value, weight) arguments",
        });
    }

    let mut pairs = Vec::with_capacity(args.len() / 2);
    let mut total = 0.0;
    for pair in args.chunks_exact(2) {
        let weight = pair[1].as_number()?;
        if weight < 0.0 {
            return Err(EvalErrorKind::InvalidArgument {
                function: "weightedChoice",
                message: "weights must be non-negative",
            });
        }
        total += weight;
        pairs.push((&pair[0], weight));
    }

    // `args.len() >= 2` guarantees at least one pair.
    let (first, _) = pairs[0];
    if total == 0.0 {
        return Ok(first.clone());
    }

    let mut roll = ctx.random() * total;
    for &(value, weight) in &pairs {
        roll -= weight;
        if roll <= 0.0 {
            return Ok(value.clone());
        }
    }
    let (last, _) = pairs[pairs.len() - 1];
    Ok(last.clone())
}

/// Uniform pick from a non-empty slice.
pub(crate) fn pick<'a>(items: &'a [RuntimeValue], ctx: &EvalContext) -> &'a RuntimeValue {
    let index = (ctx.random() * items.len() as f64).floor() as usize;
    // A source returning exactly 1.0 would index one past the end.
    &items[index.min(items.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::GameState;

    fn fixed(value: f64) -> EvalContext {
        EvalContext::new(GameState::default()).with_random(move || value)
    }

    fn num(n: f64) -> RuntimeValue {
        RuntimeValue::Number(n)
    }

    #[test]
    fn test_rand_range() {
        assert_eq!(rand(&[num(10.0), num(20.0)], &fixed(0.5)), Ok(num(15.0)));
        assert!(rand(&[num(1.0)], &fixed(0.5)).is_err());
    }

    #[test]
    fn test_random_int_is_inclusive() {
        assert_eq!(random_int(&[num(1.0), num(6.0)], &fixed(0.0)), Ok(num(1.0)));
        assert_eq!(random_int(&[num(1.0), num(6.0)], &fixed(0.999)), Ok(num(6.0)));
        assert_eq!(random_int(&[num(1.7), num(3.2)], &fixed(0.0)), Ok(num(1.0)));
    }

    #[test]
    fn test_choose_with_source_at_one() {
        let args = [num(1.0), num(2.0)];
        assert_eq!(choose(&args, &fixed(1.0)), Ok(num(2.0)));
        assert!(choose(&[], &fixed(0.0)).is_err());
    }

    #[test]
    fn test_weighted_choice() {
        let args = [
            RuntimeValue::from("common"),
            num(3.0),
            RuntimeValue::from("rare"),
            num(1.0),
        ];
        // roll = 0.5 * 4 = 2, first weight absorbs it
        assert_eq!(weighted_choice(&args, &fixed(0.5)), Ok(RuntimeValue::from("common")));
        // roll = 0.9 * 4 = 3.6, falls through to the second pair
        assert_eq!(weighted_choice(&args, &fixed(0.9)), Ok(RuntimeValue::from("rare")));
    }

    #[test]
    fn test_weighted_choice_zero_total_picks_first() {
        let args = [num(7.0), num(0.0), num(8.0), num(0.0)];
        assert_eq!(weighted_choice(&args, &fixed(0.5)), Ok(num(7.0)));
    }

    #[test]
    fn test_weighted_choice_rejects_bad_input() {
        let ctx = fixed(0.5);
        assert!(weighted_choice(&[num(1.0), num(1.0), num(2.0)], &ctx).is_err());
        let err = weighted_choice(&[num(1.0), num(-1.0)], &ctx).unwrap_err();
        assert_eq!(err.to_string(), "weightedChoice(): weights must be non-negative");
    }
}
