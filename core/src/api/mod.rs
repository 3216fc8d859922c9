//! Public API for the gamexpr expression language.
//!
//! - [`compile`] / [`evaluate`]: one-off compilation and evaluation.
//! - [`ComputedValueSystem`]: cached, typed resolution of [`Value`] fields
//!   inside the game loop.
//!
//! # Example
//!
//! ```
//! use gamexpr_core::api::{ComputedValueSystem, ExpressionValue, Value};
//! use gamexpr_core::evaluator::{EvalContext, GameState};
//!
//! let mut system = ComputedValueSystem::new();
//! let ctx = EvalContext::new(GameState { score: 40.0, ..GameState::default() });
//!
//! let literal: Value<f64> = Value::Literal(3.0);
//! let computed: Value<f64> = ExpressionValue::new("score + 2").into();
//!
//! assert_eq!(system.resolve_number(&literal, &ctx).unwrap(), 3.0);
//! assert_eq!(system.resolve_number(&computed, &ctx).unwrap(), 42.0);
//! ```

mod computed;
mod error;
mod expression;
mod options;
mod value;


pub use computed::{ComputedValueSystem, Resolvable};
pub use error::{Diagnostic, Error, Severity};
pub use expression::{CompiledExpression, compile, compile_with_options, evaluate};
pub use options::EngineOptions;
pub use value::{CachePolicy, ExpressionValue, Value};
