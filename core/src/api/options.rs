//! Configuration options for compiling and evaluating expressions.

use serde::{Deserialize, Serialize};

/// Limits applied to every expression compiled through the API.
///
/// Deserializes from the host's settings with missing fields defaulted.
///
/// # Example
///
/// ```
/// use gamexpr_core::api::EngineOptions;
///
/// let options = EngineOptions {
///     max_parse_depth: 64,
///     ..EngineOptions::default()
/// };
/// assert_eq!(options.max_eval_depth, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineOptions {
    /// Maximum nesting accepted by the parser.
    ///
    /// Default: 256
    pub max_parse_depth: usize,

    /// Maximum evaluation stack depth.
    ///
    /// Default: 1000
    pub max_eval_depth: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_parse_depth: crate::parser::DEFAULT_MAX_DEPTH,
            max_eval_depth: crate::evaluator::DEFAULT_MAX_DEPTH,
        }
    }
}
