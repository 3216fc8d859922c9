//! List builtins
//!
//! Lists are immutable. Accessors return `0` for an empty list or an
//! out-of-range index instead of failing.

use crate::{
    evaluator::{EvalContext, EvalErrorKind},
    values::RuntimeValue,
};

use super::{arity, random::pick};

type BuiltinResult = Result<RuntimeValue, EvalErrorKind>;

const EMPTY: RuntimeValue = RuntimeValue::Number(0.0);

/// `list(a, b, ...)`
pub fn list(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    Ok(args.iter().cloned().collect())
}

pub fn list_length(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [list] = args else {
        return Err(arity("listLength", "1", args));
    };
    Ok(RuntimeValue::Number(list.as_list()?.len() as f64))
}

/// `listGet(list, index)`. The index is floored.
pub fn list_get(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [list, index] = args else {
        return Err(arity("listGet", "2", args));
    };
    let items = list.as_list()?;
    let index = index.as_number()?.floor();
    if index < 0.0 || index >= items.len() as f64 {
        return Ok(EMPTY);
    }
    Ok(items[index as usize].clone())
}

pub fn list_contains(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [list, needle] = args else {
        return Err(arity("listContains", "2", args));
    };
    Ok(RuntimeValue::Bool(list.as_list()?.contains(needle)))
}

pub fn list_first(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [list] = args else {
        return Err(arity("listFirst", "1", args));
    };
    Ok(list.as_list()?.first().cloned().unwrap_or(EMPTY))
}

pub fn list_last(args: &[RuntimeValue], _ctx: &EvalContext) -> BuiltinResult {
    let [list] = args else {
        return Err(arity("listLast", "1", args));
    };
    Ok(list.as_list()?.last().cloned().unwrap_or(EMPTY))
}

pub fn list_random(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [list] = args else {
        return Err(arity("listRandom", "1", args));
    };
    let items = list.as_list()?;
    if items.is_empty() {
        return Ok(EMPTY);
    }
    Ok(pick(items, ctx).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[f64]) -> RuntimeValue {
        values.iter().copied().map(RuntimeValue::Number).collect()
    }

    #[test]
    fn test_list_get_floors_and_bounds() {
        let ctx = EvalContext::default();
        let l = nums(&[10.0, 20.0, 30.0]);
        assert_eq!(
            list_get(&[l.clone(), RuntimeValue::Number(1.9)], &ctx),
            Ok(RuntimeValue::Number(20.0))
        );
        assert_eq!(list_get(&[l.clone(), RuntimeValue::Number(3.0)], &ctx), Ok(EMPTY));
        assert_eq!(list_get(&[l, RuntimeValue::Number(-0.5)], &ctx), Ok(EMPTY));
    }

    #[test]
    fn test_empty_list_accessors() {
        let ctx = EvalContext::default();
        let empty = nums(&[]);
        assert_eq!(list_first(&[empty.clone()], &ctx), Ok(EMPTY));
        assert_eq!(list_last(&[empty.clone()], &ctx), Ok(EMPTY));
        assert_eq!(list_random(&[empty], &ctx), Ok(EMPTY));
    }

    #[test]
    fn test_list_contains_is_structural() {
        let ctx = EvalContext::default();
        let l = nums(&[1.0, 2.0]);
        assert_eq!(
            list_contains(&[l.clone(), RuntimeValue::Number(2.0)], &ctx),
            Ok(RuntimeValue::Bool(true))
        );
        assert_eq!(
            list_contains(&[l, RuntimeValue::Bool(true)], &ctx),
            Ok(RuntimeValue::Bool(false))
        );
    }

    #[test]
    fn test_non_list_argument() {
        let ctx = EvalContext::default();
        let err = list_length(&[RuntimeValue::Number(1.0)], &ctx).unwrap_err();
        assert_eq!(err.to_string(), "Expected list, got number");
    }
}
