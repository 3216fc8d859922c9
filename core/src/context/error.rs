use ecow::EcoString;
use thiserror::Error;

use crate::evaluator::EvalError;
use crate::parser::ParseError;

/// Why a variable table could not be turned into an evaluation context.
///
/// Graph errors (`CyclicDependency`, `UnknownVariable`) are detected before
/// any variable is evaluated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// `cycle` starts at `variable_name` and lists every variable on the loop.
    #[error("Cyclic dependency detected: {} -> {variable_name}", join(.cycle))]
    CyclicDependency {
        cycle: Vec<EcoString>,
        variable_name: EcoString,
    },

    #[error("Unknown variable '{variable_name}' referenced in expression for '{referenced_in}'")]
    UnknownVariable {
        variable_name: EcoString,
        referenced_in: EcoString,
    },

    #[error("Invalid variable name '{name}'")]
    InvalidName { name: EcoString },

    #[error("Variable '{name}' is declared more than once")]
    DuplicateName { name: EcoString },

    #[error("Failed to compile variable '{variable}': {error}")]
    Compile {
        variable: EcoString,
        #[source]
        error: ParseError,
    },

    #[error("Failed to evaluate variable '{variable}': {error}")]
    Evaluation {
        variable: EcoString,
        #[source]
        error: EvalError,
    },
}

fn join(names: &[EcoString]) -> String {
    names
        .iter()
        .map(EcoString::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}
