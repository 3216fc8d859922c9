//! Game variables as declared in content files.

use core::fmt;

use ecow::EcoString;
use hashbrown::HashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::BuildError;
use crate::api::{ExpressionValue, Value};
use crate::values::{RuntimeValue, Vec2};

/// Slider range for a tunable variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tuning {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

/// A variable carrying editor metadata next to its value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableWithTuning {
    pub value: Value<RuntimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<EcoString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EcoString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuning: Option<Tuning>,
}

/// One entry of a game's variable table: a literal, an expression, or
/// either of those wrapped with tuning metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameVariable {
    Tuned(VariableWithTuning),
    Plain(Value<RuntimeValue>),
}

impl GameVariable {
    pub fn value(&self) -> &Value<RuntimeValue> {
        match self {
            GameVariable::Tuned(tuned) => &tuned.value,
            GameVariable::Plain(value) => value,
        }
    }

    /// Whether the variable exposes a tuning range.
    pub fn is_tunable(&self) -> bool {
        matches!(self, GameVariable::Tuned(VariableWithTuning { tuning: Some(_), .. }))
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            GameVariable::Tuned(tuned) => tuned.category.as_deref(),
            GameVariable::Plain(_) => None,
        }
    }

    /// Display label: the explicit label, otherwise `key` split at case
    /// changes and title-cased (`jumpForce` becomes `Jump Force`).
    pub fn label(&self, key: &str) -> String {
        if let GameVariable::Tuned(VariableWithTuning {
            label: Some(label), ..
        }) = self
        {
            return label.to_string();
        }
        title_case(key)
    }
}

macro_rules! literal_variable {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for GameVariable {
                fn from(value: $ty) -> Self {
                    GameVariable::Plain(Value::Literal(RuntimeValue::from(value)))
                }
            }
        )*
    };
}

literal_variable!(f64, bool, &str, Vec2, RuntimeValue);

impl From<ExpressionValue> for GameVariable {
    fn from(value: ExpressionValue) -> Self {
        GameVariable::Plain(Value::Expression(value))
    }
}

fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if i == 0 {
            out.extend(ch.to_uppercase());
        } else {
            if ch.is_uppercase() {
                out.push(' ');
            }
            out.push(ch);
        }
    }
    out
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Variables in declaration order, with names checked on insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableMap {
    entries: Vec<(EcoString, GameVariable)>,
    index: HashMap<EcoString, usize>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable. Fails on a malformed or already declared name.
    pub fn insert(
        &mut self,
        name: impl Into<EcoString>,
        variable: impl Into<GameVariable>,
    ) -> Result<(), BuildError> {
        let name = name.into();
        if !is_valid_name(&name) {
            return Err(BuildError::InvalidName { name });
        }
        if self.index.contains_key(&name) {
            return Err(BuildError::DuplicateName { name });
        }
        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, variable.into()));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(
        mut self,
        name: impl Into<EcoString>,
        variable: impl Into<GameVariable>,
    ) -> Result<Self, BuildError> {
        self.insert(name, variable)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&GameVariable> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&EcoString, &GameVariable)> {
        self.entries.iter().map(|(name, variable)| (name, variable))
    }

    pub fn names(&self) -> impl Iterator<Item = &EcoString> {
        self.entries.iter().map(|(name, _)| name)
    }
}

impl Serialize for VariableMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, variable) in &self.entries {
            map.serialize_entry(name, variable)?;
        }
        map.end()
    }
}

/// Reads a JSON object in document order, applying the same name checks
/// as [`VariableMap::insert`].
impl<'de> Deserialize<'de> for VariableMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = VariableMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of variable names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<VariableMap, A::Error> {
                let mut map = VariableMap::new();
                while let Some((name, variable)) = access.next_entry::<EcoString, GameVariable>()? {
                    map.insert(name, variable).map_err(serde::de::Error::custom)?;
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_case_labels() {
        assert_eq!(GameVariable::from(42.0).label("jumpForce"), "Jump Force");
        assert_eq!(GameVariable::from(10.0).label("gravity"), "Gravity");

        let tuned = GameVariable::Tuned(VariableWithTuning {
            value: Value::Literal(RuntimeValue::Number(15.0)),
            label: Some("Player Jump Height".into()),
            category: None,
            tuning: None,
        });
        assert_eq!(tuned.label("jumpForce"), "Player Jump Height");
    }

    #[test]
    fn test_tunable() {
        let json = r#"{"value": 10, "tuning": {"min": 0, "max": 20, "step": 1}}"#;
        let tuned: GameVariable = serde_json::from_str(json).unwrap();
        assert!(tuned.is_tunable());
        assert_eq!(tuned.value(), &Value::Literal(RuntimeValue::Number(10.0)));

        let untuned: GameVariable =
            serde_json::from_str(r#"{"value": "dark", "label": "Visual Theme"}"#).unwrap();
        assert!(!untuned.is_tunable());
        assert!(!GameVariable::from(3.0).is_tunable());
    }

    #[test]
    fn test_plain_shapes() {
        let expr: GameVariable = serde_json::from_str(r#"{"expr": "level * 0.5"}"#).unwrap();
        assert_eq!(
            expr.value(),
            &Value::Expression(ExpressionValue::new("level * 0.5"))
        );

        let vec: GameVariable = serde_json::from_str(r#"{"x": 5, "y": 10}"#).unwrap();
        assert_eq!(
            vec.value(),
            &Value::Literal(RuntimeValue::Vec2(Vec2::new(5.0, 10.0)))
        );
    }

    #[test]
    fn test_names_are_validated() {
        assert!(is_valid_name("_speed2"));
        assert!(!is_valid_name("2speed"));
        assert!(!is_valid_name("max-speed"));
        assert!(!is_valid_name(""));

        let mut map = VariableMap::new();
        map.insert("speed", 1.0).unwrap();
        assert_eq!(
            map.insert("speed", 2.0),
            Err(BuildError::DuplicateName {
                name: "speed".into()
            })
        );
        assert!(matches!(
            map.insert("bad name", 2.0),
            Err(BuildError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let json = r#"{"zeta": 1, "alpha": {"expr": "zeta + 1"}, "mid": true}"#;
        let map: VariableMap = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = map.names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_rejects_bad_names() {
        let err = serde_json::from_str::<VariableMap>(r#"{"1st": 1}"#).unwrap_err();
        assert!(err.to_string().contains("Invalid variable name '1st'"));
    }
}
