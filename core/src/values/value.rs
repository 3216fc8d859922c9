use core::fmt;

use ecow::{EcoString, EcoVec};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Vec2;

/// Result of evaluating an expression.
///
/// Serialized untagged, so JSON config can hold bare literals:
/// `3`, `true`, `"text"`, `{"x": 1, "y": 2}` or `[1, 2, 3]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuntimeValue {
    Number(f64),
    Bool(bool),
    Str(EcoString),
    Vec2(Vec2),
    List(EcoVec<RuntimeValue>),
}

/// Shape of a [`RuntimeValue`], used in type errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Number,
    Bool,
    Str,
    Vec2,
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::Number => "number",
            ValueKind::Bool => "boolean",
            ValueKind::Str => "string",
            ValueKind::Vec2 => "vec2",
            ValueKind::List => "list",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Expected {expected}, got {found}")]
pub struct TypeMismatch {
    pub expected: ValueKind,
    pub found: ValueKind,
}

impl RuntimeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            RuntimeValue::Number(_) => ValueKind::Number,
            RuntimeValue::Bool(_) => ValueKind::Bool,
            RuntimeValue::Str(_) => ValueKind::Str,
            RuntimeValue::Vec2(_) => ValueKind::Vec2,
            RuntimeValue::List(_) => ValueKind::List,
        }
    }

    fn mismatch(&self, expected: ValueKind) -> TypeMismatch {
        TypeMismatch {
            expected,
            found: self.kind(),
        }
    }

    /// Numeric view of the value. Booleans coerce to `0` / `1`.
    pub fn as_number(&self) -> Result<f64, TypeMismatch> {
        match self {
            RuntimeValue::Number(n) => Ok(*n),
            RuntimeValue::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
            other => Err(other.mismatch(ValueKind::Number)),
        }
    }

    /// Vector view of the value. A number broadcasts to both components.
    pub fn as_vec2(&self) -> Result<Vec2, TypeMismatch> {
        match self {
            RuntimeValue::Vec2(v) => Ok(*v),
            RuntimeValue::Number(n) => Ok(Vec2::splat(*n)),
            other => Err(other.mismatch(ValueKind::Vec2)),
        }
    }

    pub fn as_list(&self) -> Result<&[RuntimeValue], TypeMismatch> {
        match self {
            RuntimeValue::List(items) => Ok(items.as_slice()),
            other => Err(other.mismatch(ValueKind::List)),
        }
    }

    pub fn as_str(&self) -> Result<&str, TypeMismatch> {
        match self {
            RuntimeValue::Str(s) => Ok(s.as_str()),
            other => Err(other.mismatch(ValueKind::Str)),
        }
    }

    /// `0`, `NaN`, `""`, `false`, the zero vector and the empty list are
    /// falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            RuntimeValue::Number(n) => *n != 0.0 && !n.is_nan(),
            RuntimeValue::Bool(b) => *b,
            RuntimeValue::Str(s) => !s.is_empty(),
            RuntimeValue::Vec2(v) => !v.is_zero(),
            RuntimeValue::List(items) => !items.is_empty(),
        }
    }

    pub fn is_vec2(&self) -> bool {
        matches!(self, RuntimeValue::Vec2(_))
    }

    pub fn is_str(&self) -> bool {
        matches!(self, RuntimeValue::Str(_))
    }
}

impl From<f64> for RuntimeValue {
    fn from(n: f64) -> Self {
        RuntimeValue::Number(n)
    }
}

impl From<i32> for RuntimeValue {
    fn from(n: i32) -> Self {
        RuntimeValue::Number(f64::from(n))
    }
}

impl From<bool> for RuntimeValue {
    fn from(b: bool) -> Self {
        RuntimeValue::Bool(b)
    }
}

impl From<&str> for RuntimeValue {
    fn from(s: &str) -> Self {
        RuntimeValue::Str(s.into())
    }
}

impl From<String> for RuntimeValue {
    fn from(s: String) -> Self {
        RuntimeValue::Str(s.into())
    }
}

impl From<EcoString> for RuntimeValue {
    fn from(s: EcoString) -> Self {
        RuntimeValue::Str(s)
    }
}

impl From<Vec2> for RuntimeValue {
    fn from(v: Vec2) -> Self {
        RuntimeValue::Vec2(v)
    }
}

impl From<Vec<RuntimeValue>> for RuntimeValue {
    fn from(items: Vec<RuntimeValue>) -> Self {
        RuntimeValue::List(items.into_iter().collect())
    }
}

impl FromIterator<RuntimeValue> for RuntimeValue {
    fn from_iter<I: IntoIterator<Item = RuntimeValue>>(iter: I) -> Self {
        RuntimeValue::List(iter.into_iter().collect())
    }
}
