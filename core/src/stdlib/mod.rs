//! gamexpr builtin function library
//!
//! The fixed table of functions an expression can call:
//! - Math: scalar math with vector overloads where noted
//! - Vector: construction, length, normalization, dot product, distance
//! - Random: draws from the context's random source only
//! - List: construction and read-only queries
//! - Entity: tag queries through the context's `EntityQuery`
//!
//! The table is not extensible from the language. Each entry carries a
//! [`ReturnRule`] so the validator can classify calls without running them.

use hashbrown::HashMap;
use lazy_static::lazy_static;

use crate::evaluator::{EvalContext, EvalErrorKind};
use crate::values::RuntimeValue;

pub mod entity;
pub mod list;
pub mod math;
pub mod random;
pub mod vector;


/// Signature shared by every builtin. Arguments arrive fully evaluated.
pub type BuiltinFn = fn(&[RuntimeValue], &EvalContext) -> Result<RuntimeValue, EvalErrorKind>;

/// Static result type of a builtin, as seen by the validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnRule {
    Number,
    Boolean,
    Vec2,
    /// `vec2` when the first argument is a vector, otherwise `number`.
    FollowsFirstArg,
    Unknown,
}

#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
    pub returns: ReturnRule,
}

lazy_static! {
    static ref BUILTINS: HashMap<&'static str, Builtin> = {
        use ReturnRule::*;

        let entries: [(&'static str, BuiltinFn, ReturnRule); 43] = [
            // Math
            ("min", math::min, FollowsFirstArg),
            ("max", math::max, FollowsFirstArg),
            ("clamp", math::clamp, FollowsFirstArg),
            ("lerp", math::lerp, FollowsFirstArg),
            ("mix", math::mix, FollowsFirstArg),
            ("abs", math::abs, FollowsFirstArg),
            ("floor", math::floor, FollowsFirstArg),
            ("ceil", math::ceil, FollowsFirstArg),
            ("round", math::round, FollowsFirstArg),
            ("sqrt", math::sqrt, Number),
            ("pow", math::pow, Number),
            ("sin", math::sin, Number),
            ("cos", math::cos, Number),
            ("tan", math::tan, Number),
            ("atan2", math::atan2, Number),
            ("sign", math::sign, Number),
            ("smoothstep", math::smoothstep, Number),
            ("step", math::step, Number),
            ("fract", math::fract, Number),
            ("mod", math::modulo, Number),
            // Vector
            ("vec2", vector::vec2, Vec2),
            ("length", vector::length, Number),
            ("normalize", vector::normalize, Vec2),
            ("dot", vector::dot, Number),
            ("distance", vector::distance, Number),
            // Random
            ("rand", random::rand, Number),
            ("randomInt", random::random_int, Number),
            ("choose", random::choose, Unknown),
            ("weightedChoice", random::weighted_choice, Unknown),
            // List
            ("list", list::list, Unknown),
            ("listLength", list::list_length, Number),
            ("listGet", list::list_get, Unknown),
            ("listContains", list::list_contains, Boolean),
            ("listFirst", list::list_first, Unknown),
            ("listLast", list::list_last, Unknown),
            ("listRandom", list::list_random, Unknown),
            // Entity
            ("entityCount", entity::entity_count, Number),
            ("entityExists", entity::entity_exists, Boolean),
            ("highestY", entity::highest_y, Number),
            ("lowestY", entity::lowest_y, Number),
            ("nearestEntity", entity::nearest_entity, Vec2),
            ("minDistanceToTag", entity::min_distance_to_tag, Number),
            ("entityPos", entity::entity_pos, Vec2),
        ];

        entries
            .into_iter()
            .map(|(name, func, returns)| (name, Builtin { name, func, returns }))
            .collect()
    };
}

/// Look up a builtin by name.
pub fn lookup(name: &str) -> Option<&'static Builtin> {
    BUILTINS.get(name)
}

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains_key(name)
}

/// Names of all builtins, sorted.
pub fn names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = BUILTINS.keys().copied().collect();
    names.sort_unstable();
    names
}

/// Arity error for `function` called with `args`.
pub(crate) fn arity(function: &'static str, expected: &'static str, args: &[RuntimeValue]) -> EvalErrorKind {
    EvalErrorKind::Arity {
        function,
        expected,
        found: args.len(),
    }
}

/// String form of a tag argument, as used by the entity builtins.
pub(crate) fn tag_of(value: &RuntimeValue) -> String {
    value.to_string()
}
