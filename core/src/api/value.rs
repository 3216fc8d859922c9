//! Config fields that hold either a literal or an expression.

use ecow::EcoString;
use serde::{Deserialize, Serialize};

/// When a frame-cached expression is re-evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CachePolicy {
    /// Evaluate on every resolve.
    #[default]
    None,
    /// Evaluate once per `frameId`.
    Frame,
}

/// Designer-authored expression: `{"expr": "...", "debugName": "...", "cache": "frame"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionValue {
    pub expr: EcoString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_name: Option<EcoString>,
    #[serde(default, skip_serializing_if = "is_default_policy")]
    pub cache: CachePolicy,
}

fn is_default_policy(policy: &CachePolicy) -> bool {
    *policy == CachePolicy::None
}

impl ExpressionValue {
    pub fn new(expr: impl Into<EcoString>) -> Self {
        Self {
            expr: expr.into(),
            debug_name: None,
            cache: CachePolicy::None,
        }
    }

    pub fn with_debug_name(mut self, name: impl Into<EcoString>) -> Self {
        self.debug_name = Some(name.into());
        self
    }

    pub fn frame_cached(mut self) -> Self {
        self.cache = CachePolicy::Frame;
        self
    }

    /// Name used in log messages: the debug name, else the source.
    pub fn label(&self) -> &str {
        self.debug_name.as_deref().unwrap_or(&self.expr)
    }
}

/// A field that is either a literal `T` or an expression producing one.
///
/// Serialized untagged; an object with an `expr` key is an expression,
/// anything else is read as a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value<T> {
    Expression(ExpressionValue),
    Literal(T),
}

impl<T> Value<T> {
    pub fn expr(source: impl Into<EcoString>) -> Self {
        Value::Expression(ExpressionValue::new(source))
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }
}

impl<T> From<ExpressionValue> for Value<T> {
    fn from(value: ExpressionValue) -> Self {
        Value::Expression(value)
    }
}
