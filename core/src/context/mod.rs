//! Evaluation contexts built from a game's variable table.
//!
//! Variables may be literals or expressions over other variables. The
//! builder orders them by dependency, evaluates each one once and stores
//! the results as plain values, so expressions evaluated later see a flat
//! table.
//!
//! ```
//! use gamexpr_core::api::ExpressionValue;
//! use gamexpr_core::context::{BuildOptions, VariableMap, build_eval_context};
//! use gamexpr_core::evaluator::GameState;
//! use gamexpr_core::values::RuntimeValue;
//!
//! let variables = VariableMap::new()
//!     .with("speed", ExpressionValue::new("base * 2")).unwrap()
//!     .with("base", 5.0).unwrap();
//!
//! let ctx = build_eval_context(BuildOptions::new(GameState::default(), &variables)).unwrap();
//! assert_eq!(ctx.variables["speed"], RuntimeValue::Number(10.0));
//! ```

mod builder;
mod error;
mod variable;

#[cfg(test)]
mod builder_test;

pub use builder::{BuildOptions, EvalContextBuilder, build_eval_context};
pub use error::BuildError;
pub use variable::{GameVariable, Tuning, VariableMap, VariableWithTuning, is_valid_name};
