//! Everything an expression can see while it is evaluated.

use core::cell::Cell;
use core::fmt;
use std::sync::Arc;

use ecow::EcoString;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::values::{RuntimeValue, Vec2};

/// Seed used when the host does not supply one.
pub const DEFAULT_SEED: u32 = 12345;

/// Live game-state scalars exposed as the `score`, `lives`, `time`, `wave`,
/// `frameId` and `dt` globals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GameState {
    pub score: f64,
    pub lives: f64,
    pub time: f64,
    pub wave: f64,
    pub frame_id: u64,
    pub dt: f64,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            score: 0.0,
            lives: 3.0,
            time: 0.0,
            wave: 1.0,
            frame_id: 0,
            dt: 1.0 / 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
}

impl Transform {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Read-only view of the entity an expression runs on, reachable as `self`.
///
/// Known properties are `id`, `transform`, `velocity`, `health` and
/// `maxHealth`; any other key is looked up in `extra`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityContext {
    pub id: EcoString,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<Vec2>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_health: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<EcoString, RuntimeValue>,
}

impl EntityContext {
    pub fn new(id: impl Into<EcoString>, transform: Transform) -> Self {
        Self {
            id: id.into(),
            transform,
            ..Default::default()
        }
    }
}

/// Position of an entity returned by an [`EntityQuery`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    pub id: EcoString,
    pub position: Vec2,
}

/// Tag lookup into the host's entity world, used by the entity builtins.
pub trait EntityQuery {
    fn entities_by_tag(&self, tag: &str) -> Vec<EntitySnapshot>;
}

/// Source of uniformly distributed numbers in `[0, 1]`.
///
/// Every random builtin draws from the context's source and nowhere else.
pub trait RandomSource {
    fn next_f64(&self) -> f64;
}

impl<F: Fn() -> f64> RandomSource for F {
    fn next_f64(&self) -> f64 {
        self()
    }
}

/// Deterministic linear congruential generator.
///
/// `state = (state * 1103515245 + 12345) & 0x7fffffff`, yielding
/// `state / 0x7fffffff`.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: Cell<i64>,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        Self {
            state: Cell::new(i64::from(seed)),
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&self) -> f64 {
        // The product is rounded to f64 before masking; existing seeded
        // content depends on exactly this sequence.
        let product = self.state.get() as f64 * 1_103_515_245.0 + 12_345.0;
        let next = (product as i64) & 0x7fff_ffff;
        self.state.set(next);
        next as f64 / 0x7fff_ffff as f64
    }
}

/// The flat set of globals, resolved variables, entity context and RNG
/// available to one evaluation.
pub struct EvalContext {
    pub state: GameState,
    pub self_entity: Option<EntityContext>,
    /// Resolved primitives only; expressions are never stored here.
    pub variables: HashMap<EcoString, RuntimeValue>,
    pub random: Box<dyn RandomSource>,
    pub entity_query: Option<Arc<dyn EntityQuery>>,
}

impl EvalContext {
    /// Context with the given state, no variables and an RNG seeded with
    /// [`DEFAULT_SEED`].
    pub fn new(state: GameState) -> Self {
        Self::with_seed(state, DEFAULT_SEED)
    }

    pub fn with_seed(state: GameState, seed: u32) -> Self {
        Self {
            state,
            self_entity: None,
            variables: HashMap::new(),
            random: Box::new(SeededRandom::new(seed)),
            entity_query: None,
        }
    }

    pub fn with_variable(mut self, name: impl Into<EcoString>, value: impl Into<RuntimeValue>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn with_self(mut self, entity: EntityContext) -> Self {
        self.self_entity = Some(entity);
        self
    }

    pub fn with_entity_query(mut self, query: Arc<dyn EntityQuery>) -> Self {
        self.entity_query = Some(query);
        self
    }

    pub fn with_random(mut self, random: impl RandomSource + 'static) -> Self {
        self.random = Box::new(random);
        self
    }

    pub fn frame_id(&self) -> u64 {
        self.state.frame_id
    }

    /// Draw the next number from the context's random source.
    pub fn random(&self) -> f64 {
        self.random.next_f64()
    }
}

impl Default for EvalContext {
    fn default() -> Self {
        Self::new(GameState::default())
    }
}

impl fmt::Debug for EvalContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvalContext")
            .field("state", &self.state)
            .field("self_entity", &self.self_entity)
            .field("variables", &self.variables)
            .field("entity_query", &self.entity_query.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_deterministic() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        for _ in 0..100 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn test_seeded_random_first_value() {
        // 12345 * 1103515245 + 12345 = 13622895712170, masked to 31 bits.
        let rng = SeededRandom::new(12345);
        let expected = (13_622_895_712_170_i64 & 0x7fff_ffff) as f64 / 0x7fff_ffff as f64;
        assert_eq!(rng.next_f64(), expected);
    }

    #[test]
    fn test_seeded_random_stays_in_unit_interval() {
        let rng = SeededRandom::new(7);
        for _ in 0..1000 {
            let r = rng.next_f64();
            assert!((0.0..=1.0).contains(&r), "out of range: {r}");
        }
    }

    #[test]
    fn test_default_game_state() {
        let state = GameState::default();
        assert_eq!(state.lives, 3.0);
        assert_eq!(state.wave, 1.0);
        assert_eq!(state.dt, 1.0 / 60.0);
    }

    #[test]
    fn test_game_state_deserializes_partial_camel_case() {
        let state: GameState = serde_json::from_str(r#"{"score": 10, "frameId": 4}"#).unwrap();
        assert_eq!(state.score, 10.0);
        assert_eq!(state.frame_id, 4);
        assert_eq!(state.lives, 3.0);
    }

    #[test]
    fn test_entity_context_keeps_extra_keys() {
        let entity: EntityContext = serde_json::from_str(
            r#"{"id": "p1", "transform": {"x": 1, "y": 2}, "ammo": 5}"#,
        )
        .unwrap();
        assert_eq!(entity.transform.position(), Vec2::new(1.0, 2.0));
        assert_eq!(entity.extra.get("ammo"), Some(&RuntimeValue::Number(5.0)));
    }
}
