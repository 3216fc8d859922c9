//! Entity builtins: tag queries against the host world.
//!
//! Screen space grows downward, so `highestY` is the smallest y and
//! `lowestY` the largest. Without an `EntityQuery` on the context, or when
//! no entity carries the tag, every query degrades to a neutral result.

use tracing::trace;

use crate::{
    evaluator::{EntitySnapshot, EvalContext, EvalErrorKind},
    values::{RuntimeValue, Vec2},
};

use super::{arity, tag_of};

type BuiltinResult = Result<RuntimeValue, EvalErrorKind>;

fn query(ctx: &EvalContext, tag: &RuntimeValue) -> Vec<EntitySnapshot> {
    let tag = tag_of(tag);
    match &ctx.entity_query {
        Some(query) => query.entities_by_tag(&tag),
        None => {
            trace!(tag = %tag, "entity query without a host world");
            Vec::new()
        }
    }
}

pub fn entity_count(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag] = args else {
        return Err(arity("entityCount", "1", args));
    };
    Ok(RuntimeValue::Number(query(ctx, tag).len() as f64))
}

pub fn entity_exists(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag] = args else {
        return Err(arity("entityExists", "1", args));
    };
    Ok(RuntimeValue::Bool(!query(ctx, tag).is_empty()))
}

/// Topmost y among tagged entities, `0` when there are none.
pub fn highest_y(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag] = args else {
        return Err(arity("highestY", "1", args));
    };
    let y = query(ctx, tag)
        .iter()
        .map(|e| e.position.y)
        .reduce(f64::min)
        .unwrap_or(0.0);
    Ok(RuntimeValue::Number(y))
}

/// Bottommost y among tagged entities, `0` when there are none.
pub fn lowest_y(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag] = args else {
        return Err(arity("lowestY", "1", args));
    };
    let y = query(ctx, tag)
        .iter()
        .map(|e| e.position.y)
        .reduce(f64::max)
        .unwrap_or(0.0);
    Ok(RuntimeValue::Number(y))
}

/// Position of the tagged entity closest to `pos`; ties keep the first.
pub fn nearest_entity(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag, pos] = args else {
        return Err(arity("nearestEntity", "2", args));
    };
    let pos = pos.as_vec2()?;
    let mut nearest = None;
    let mut best = f64::INFINITY;
    for entity in query(ctx, tag) {
        let delta = entity.position - pos;
        let dist = delta.dot(delta);
        if dist < best {
            best = dist;
            nearest = Some(entity.position);
        }
    }
    Ok(RuntimeValue::Vec2(nearest.unwrap_or(Vec2::ZERO)))
}

/// Distance from `pos` to the closest tagged entity, infinity when none.
pub fn min_distance_to_tag(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag, pos] = args else {
        return Err(arity("minDistanceToTag", "2", args));
    };
    let pos = pos.as_vec2()?;
    let min = query(ctx, tag)
        .iter()
        .map(|e| e.position.distance(pos))
        .fold(f64::INFINITY, f64::min);
    trace!(tag = %tag, min, "minDistanceToTag");
    Ok(RuntimeValue::Number(min))
}

/// Position of the first tagged entity, `vec2(0, 0)` when none.
pub fn entity_pos(args: &[RuntimeValue], ctx: &EvalContext) -> BuiltinResult {
    let [tag] = args else {
        return Err(arity("entityPos", "1", args));
    };
    let pos = query(ctx, tag)
        .first()
        .map(|e| e.position)
        .unwrap_or(Vec2::ZERO);
    Ok(RuntimeValue::Vec2(pos))
}
