//! Gamexpr - a small expression language for game content
//!
//! # Overview
//!
//! Gamexpr lets designers write gameplay values as expressions instead of
//! constants. Common use cases include:
//!
//! - Difficulty curves (`clamp(wave * 0.2 + 1, 1, 3)`)
//! - Derived tuning variables (`jumpForce = gravity * 0.5`)
//! - Spawn positions and per-entity behaviour (`self.transform + vec2(0, -20)`)
//! - Labels and UI text (`'Wave ' + wave`)
//!
//! Expressions are sandboxed: they see only the evaluation context, never
//! mutate it, and draw randomness from a seeded source.
//!
//! # Quick Start
//!
//! ```
//! use gamexpr::{BuildOptions, ComputedValueSystem, ExpressionValue, GameState, Value, VariableMap};
//!
//! let variables = VariableMap::new()
//!     .with("baseSpeed", 120.0).unwrap()
//!     .with("speed", ExpressionValue::new("baseSpeed * (1 + wave * 0.1)")).unwrap();
//!
//! let state = GameState { wave: 5.0, ..GameState::default() };
//! let ctx = gamexpr::build_eval_context(BuildOptions::new(state, &variables)).unwrap();
//!
//! let mut system = ComputedValueSystem::new();
//! let field: Value<f64> = ExpressionValue::new("speed / 2").into();
//! assert_eq!(system.resolve_number(&field, &ctx).unwrap(), 90.0);
//! ```
//!
//! # Validation
//!
//! Content can be checked before it ships:
//!
//! ```
//! use gamexpr::{ValidateOptions, validate_expression};
//!
//! let result = validate_expression("score * multiplier", &ValidateOptions::new());
//! assert!(!result.valid);
//! assert_eq!(result.errors[0].message, "Unknown identifier: 'multiplier'");
//! ```

mod error_renderer;

// Re-export public API from gamexpr_core
pub use gamexpr_core::api::{
    CachePolicy, CompiledExpression, ComputedValueSystem, Diagnostic, EngineOptions, Error,
    ExpressionValue, Resolvable, Severity, Value, compile, compile_with_options, evaluate,
};

// Re-export context construction
pub use gamexpr_core::context::{
    BuildError, BuildOptions, EvalContextBuilder, GameVariable, Tuning, VariableMap,
    VariableWithTuning, build_eval_context,
};

// Re-export validation
pub use gamexpr_core::analyzer::{
    BatchValidationResult, ExpressionError, ExpressionSource, ReturnType, ValidateOptions,
    ValidationResult, format_validation_errors, validate_all_expressions, validate_expression,
};

// Re-export runtime types
pub use gamexpr_core::evaluator::{
    EntityContext, EntityQuery, EntitySnapshot, EvalContext, EvalError, GameState, RandomSource,
    SeededRandom, Transform,
};
pub use gamexpr_core::values::{self, RuntimeValue, Vec2};
pub use gamexpr_core::{RESERVED_GLOBALS, is_reserved_global, stdlib};

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
    render_validation_to_string,
};
