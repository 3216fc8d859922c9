//! Compile cache, frame cache and typed resolution of [`Value`] fields.

use std::sync::Arc;

use ecow::EcoString;
use hashbrown::HashMap;
use tracing::{debug, warn};

use super::{CachePolicy, CompiledExpression, EngineOptions, Error, Value, compile_with_options};
use crate::evaluator::EvalContext;
use crate::values::{RuntimeValue, ValueKind, Vec2};

/// A type a [`Value`] field can resolve to.
pub trait Resolvable: Sized {
    /// Kind named in the warning when an expression returns something else.
    const EXPECTED: ValueKind;

    /// Converts an evaluation result, or `None` when it has the wrong shape.
    fn from_runtime(value: &RuntimeValue) -> Option<Self>;

    /// Substituted when the result has the wrong shape.
    fn fallback() -> Self;
}

impl Resolvable for f64 {
    const EXPECTED: ValueKind = ValueKind::Number;

    fn from_runtime(value: &RuntimeValue) -> Option<Self> {
        match value {
            RuntimeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn fallback() -> Self {
        0.0
    }
}

impl Resolvable for Vec2 {
    const EXPECTED: ValueKind = ValueKind::Vec2;

    fn from_runtime(value: &RuntimeValue) -> Option<Self> {
        match value {
            RuntimeValue::Vec2(v) => Some(*v),
            _ => None,
        }
    }

    fn fallback() -> Self {
        Vec2::ZERO
    }
}

impl Resolvable for bool {
    const EXPECTED: ValueKind = ValueKind::Bool;

    fn from_runtime(value: &RuntimeValue) -> Option<Self> {
        match value {
            RuntimeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn fallback() -> Self {
        false
    }
}

/// Any result converts to text.
impl Resolvable for EcoString {
    const EXPECTED: ValueKind = ValueKind::Str;

    fn from_runtime(value: &RuntimeValue) -> Option<Self> {
        Some(match value {
            RuntimeValue::Str(s) => s.clone(),
            other => other.to_string().into(),
        })
    }

    fn fallback() -> Self {
        EcoString::new()
    }
}

/// Resolves [`Value`] fields for one game session.
///
/// Compiled expressions are cached by source for the lifetime of the
/// system. Results of frame-cached expressions are kept until the context's
/// `frameId` changes, at which point the whole frame cache is dropped.
///
/// Not shared between threads; a host owns one per session and calls
/// [`clear_cache`](Self::clear_cache) on teardown or content reload.
#[derive(Debug, Default)]
pub struct ComputedValueSystem {
    options: EngineOptions,
    compiled: HashMap<EcoString, Arc<CompiledExpression>>,
    frame_cache: HashMap<EcoString, RuntimeValue>,
    frame_id: Option<u64>,
}

impl ComputedValueSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Compile `source`, reusing an earlier compilation when present.
    /// Failed compilations are not cached.
    pub fn compile_expression(&mut self, source: &str) -> Result<Arc<CompiledExpression>, Error> {
        if let Some(compiled) = self.compiled.get(source) {
            return Ok(Arc::clone(compiled));
        }
        debug!(source, "compiling expression");
        let compiled = Arc::new(compile_with_options(source, &self.options)?);
        self.compiled.insert(source.into(), Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Number of distinct sources compiled so far.
    pub fn compiled_count(&self) -> usize {
        self.compiled.len()
    }

    /// Drop both caches and forget the last seen frame.
    pub fn clear_cache(&mut self) {
        debug!(
            compiled = self.compiled.len(),
            frame = self.frame_cache.len(),
            "clearing expression caches"
        );
        self.compiled.clear();
        self.frame_cache.clear();
        self.frame_id = None;
    }

    pub fn resolve_number(&mut self, value: &Value<f64>, ctx: &EvalContext) -> Result<f64, Error> {
        self.resolve(value, ctx)
    }

    pub fn resolve_vec2(&mut self, value: &Value<Vec2>, ctx: &EvalContext) -> Result<Vec2, Error> {
        self.resolve(value, ctx)
    }

    pub fn resolve_boolean(&mut self, value: &Value<bool>, ctx: &EvalContext) -> Result<bool, Error> {
        self.resolve(value, ctx)
    }

    pub fn resolve_string(
        &mut self,
        value: &Value<EcoString>,
        ctx: &EvalContext,
    ) -> Result<EcoString, Error> {
        self.resolve(value, ctx)
    }

    /// Resolve a field to `T`.
    ///
    /// Literals are returned as is. Expressions are compiled (cached) and
    /// evaluated; a result of the wrong shape is logged and replaced with
    /// [`Resolvable::fallback`]. Compile and evaluation errors propagate.
    pub fn resolve<T>(&mut self, value: &Value<T>, ctx: &EvalContext) -> Result<T, Error>
    where
        T: Resolvable + Clone,
    {
        let expression = match value {
            Value::Literal(literal) => return Ok(literal.clone()),
            Value::Expression(expression) => expression,
        };

        let frame_cached = expression.cache == CachePolicy::Frame;
        if frame_cached {
            if let Some(hit) = self.frame_lookup(&expression.expr, ctx.frame_id()) {
                if let Some(typed) = T::from_runtime(hit) {
                    return Ok(typed);
                }
            }
        }

        let compiled = self.compile_expression(&expression.expr)?;
        let result = compiled
            .evaluate(ctx)
            .map_err(|err| Error::runtime(&err, expression.expr.as_str()))?;

        let Some(typed) = T::from_runtime(&result) else {
            warn!(
                expression = expression.label(),
                expected = %T::EXPECTED,
                found = %result.kind(),
                "expression returned the wrong type, using default"
            );
            return Ok(T::fallback());
        };

        if frame_cached {
            self.frame_store(expression.expr.clone(), ctx.frame_id(), result);
        }
        Ok(typed)
    }

    fn frame_lookup(&self, key: &str, frame_id: u64) -> Option<&RuntimeValue> {
        if self.frame_id != Some(frame_id) {
            return None;
        }
        self.frame_cache.get(key)
    }

    fn frame_store(&mut self, key: EcoString, frame_id: u64, value: RuntimeValue) {
        if self.frame_id != Some(frame_id) {
            if !self.frame_cache.is_empty() {
                debug!(
                    previous = ?self.frame_id,
                    frame_id,
                    "new frame, dropping frame cache"
                );
            }
            self.frame_cache.clear();
            self.frame_id = Some(frame_id);
        }
        self.frame_cache.insert(key, value);
    }
}
