//! Static validation: parse, then classify every node without evaluating.

use ecow::EcoString;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::ExpressionError;
use crate::{
    is_reserved_global,
    parser::{self, BinaryOp, Expr, ExprKind, Span, TemplatePart, UnaryOp},
    stdlib::{self, ReturnRule},
};

const TRANSFORM_PROPERTIES: [&str; 3] = ["x", "y", "angle"];
const VELOCITY_PROPERTIES: [&str; 2] = ["x", "y"];
const VECTOR_PROPERTIES: [&str; 4] = ["x", "y", "r", "g"];
const SELF_PROPERTIES: [&str; 5] = ["id", "transform", "velocity", "health", "maxHealth"];

/// Static result type of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    Number,
    Boolean,
    String,
    Vec2,
    Unknown,
}

/// Inputs to [`validate_expression`].
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Names that resolve as variables in addition to the reserved globals.
    pub known_variables: HashSet<EcoString>,
    /// Content path attached to every finding.
    pub path: Option<String>,
}

impl ValidateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_variables<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<EcoString>,
    {
        self.known_variables.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ExpressionError>,
    pub warnings: Vec<ExpressionError>,
    /// Referenced variable names, excluding reserved globals.
    pub dependencies: Vec<EcoString>,
    pub return_type: ReturnType,
}

/// An expression to check in a batch, with the path it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSource {
    pub source: String,
    pub path: String,
}

/// Combined findings of [`validate_all_expressions`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BatchValidationResult {
    pub valid: bool,
    pub errors: Vec<ExpressionError>,
    pub warnings: Vec<ExpressionError>,
}

/// Shape of a node as seen by the validator. `self` is a record and never
/// a value, so it has no [`ReturnType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Value(ReturnType),
    SelfEntity,
}

impl Shape {
    const NUMBER: Shape = Shape::Value(ReturnType::Number);
    const BOOLEAN: Shape = Shape::Value(ReturnType::Boolean);
    const STRING: Shape = Shape::Value(ReturnType::String);
    const VEC2: Shape = Shape::Value(ReturnType::Vec2);
    const UNKNOWN: Shape = Shape::Value(ReturnType::Unknown);

    fn return_type(self) -> ReturnType {
        match self {
            Shape::Value(ty) => ty,
            Shape::SelfEntity => ReturnType::Unknown,
        }
    }
}

struct Validator<'a> {
    source: &'a str,
    known_variables: &'a HashSet<EcoString>,
    path: Option<&'a str>,
    errors: Vec<ExpressionError>,
    warnings: Vec<ExpressionError>,
}

/// Parse `source` and report unknown names and properties, inferring the
/// result type along the way. Never evaluates anything.
pub fn validate_expression(source: &str, options: &ValidateOptions) -> ValidationResult {
    validate_with(source, &options.known_variables, options.path.as_deref())
}

fn validate_with(
    source: &str,
    known_variables: &HashSet<EcoString>,
    path: Option<&str>,
) -> ValidationResult {
    let expr = match parser::parse(source) {
        Ok(expr) => expr,
        Err(err) => {
            return ValidationResult {
                valid: false,
                errors: vec![ExpressionError::from_parse(&err, path)],
                warnings: Vec::new(),
                dependencies: Vec::new(),
                return_type: ReturnType::Unknown,
            };
        }
    };

    let mut validator = Validator {
        source,
        known_variables,
        path,
        errors: Vec::new(),
        warnings: Vec::new(),
    };
    let return_type = validator.infer(&expr).return_type();

    ValidationResult {
        valid: validator.errors.is_empty(),
        errors: validator.errors,
        warnings: validator.warnings,
        dependencies: expr.dependencies(),
        return_type,
    }
}

/// Validate many expressions against one set of known variables.
pub fn validate_all_expressions<'a, I>(
    expressions: I,
    known_variables: &HashSet<EcoString>,
) -> BatchValidationResult
where
    I: IntoIterator<Item = &'a ExpressionSource>,
{
    let mut batch = BatchValidationResult::default();
    for entry in expressions {
        let result = validate_with(&entry.source, known_variables, Some(entry.path.as_str()));
        batch.errors.extend(result.errors);
        batch.warnings.extend(result.warnings);
    }
    batch.valid = batch.errors.is_empty();
    batch
}

/// Human-readable report of the errors in `result`, empty when valid.
pub fn format_validation_errors(result: &ValidationResult) -> String {
    if result.valid {
        return String::new();
    }
    result
        .errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl Validator<'_> {
    fn error(&mut self, message: String, span: &Span) {
        self.errors
            .push(ExpressionError::new(message, self.source, span.clone(), self.path));
    }

    fn warning(&mut self, message: String, span: &Span) {
        self.warnings
            .push(ExpressionError::new(message, self.source, span.clone(), self.path));
    }

    fn infer(&mut self, expr: &Expr) -> Shape {
        match &expr.kind {
            ExprKind::Number(_) => Shape::NUMBER,
            ExprKind::Bool(_) => Shape::BOOLEAN,
            ExprKind::Str(_) => Shape::STRING,

            ExprKind::Template(parts) => {
                for part in parts {
                    if let TemplatePart::Expr(inner) = part {
                        self.infer(inner);
                    }
                }
                Shape::STRING
            }

            ExprKind::Vector { x, y } => {
                self.infer(x);
                self.infer(y);
                Shape::VEC2
            }

            ExprKind::Ident(name) => self.identifier(name, &expr.span),

            ExprKind::Member { object, property } => self.member(object, property, &expr.span),

            ExprKind::Binary { op, left, right } => {
                let left = self.infer(left).return_type();
                let right = self.infer(right).return_type();
                Shape::Value(binary_type(*op, left, right))
            }

            ExprKind::Unary { op, operand } => {
                let operand = self.infer(operand).return_type();
                match op {
                    UnaryOp::Not => Shape::BOOLEAN,
                    UnaryOp::Neg if operand == ReturnType::Vec2 => Shape::VEC2,
                    UnaryOp::Neg => Shape::NUMBER,
                }
            }

            ExprKind::Ternary {
                cond,
                then_branch,
                else_branch,
            } => {
                self.infer(cond);
                let then_ty = self.infer(then_branch).return_type();
                let else_ty = self.infer(else_branch).return_type();
                Shape::Value(match (then_ty, else_ty) {
                    (a, b) if a == b => a,
                    (ReturnType::Unknown, other) | (other, ReturnType::Unknown) => other,
                    _ => ReturnType::Unknown,
                })
            }

            ExprKind::Call {
                name,
                name_span,
                args,
            } => {
                // Arguments are checked even when the function is unknown.
                let arg_types: Vec<ReturnType> =
                    args.iter().map(|arg| self.infer(arg).return_type()).collect();

                let Some(builtin) = stdlib::lookup(name) else {
                    self.error(format!("Unknown function: '{}'", name), name_span);
                    return Shape::UNKNOWN;
                };
                Shape::Value(match builtin.returns {
                    ReturnRule::Number => ReturnType::Number,
                    ReturnRule::Boolean => ReturnType::Boolean,
                    ReturnRule::Vec2 => ReturnType::Vec2,
                    ReturnRule::FollowsFirstArg => match arg_types.first() {
                        Some(ReturnType::Vec2) => ReturnType::Vec2,
                        _ => ReturnType::Number,
                    },
                    ReturnRule::Unknown => ReturnType::Unknown,
                })
            }
        }
    }

    fn identifier(&mut self, name: &EcoString, span: &Span) -> Shape {
        if is_reserved_global(name) {
            return match name.as_str() {
                "self" => Shape::SelfEntity,
                "true" | "false" => Shape::BOOLEAN,
                _ => Shape::NUMBER,
            };
        }
        if !self.known_variables.contains(name) {
            self.error(format!("Unknown identifier: '{}'", name), span);
        }
        Shape::UNKNOWN
    }

    fn member(&mut self, object: &Expr, property: &EcoString, span: &Span) -> Shape {
        // `self.transform.<p>` and `self.velocity.<p>` only warn, so content
        // written against a newer entity schema still loads.
        if let Some(field) = self_field(object) {
            match field {
                "transform" => {
                    if !TRANSFORM_PROPERTIES.contains(&property.as_str()) {
                        self.warning(
                            format!(
                                "Unknown transform property: '{}'. Expected: x, y, angle",
                                property
                            ),
                            span,
                        );
                    }
                    return Shape::NUMBER;
                }
                "velocity" => {
                    if !VELOCITY_PROPERTIES.contains(&property.as_str()) {
                        self.warning(
                            format!("Unknown velocity property: '{}'. Expected: x, y", property),
                            span,
                        );
                    }
                    return Shape::NUMBER;
                }
                _ => {}
            }
        }

        match self.infer(object) {
            Shape::SelfEntity => match property.as_str() {
                "transform" | "velocity" => Shape::VEC2,
                "id" => Shape::STRING,
                "health" | "maxHealth" => Shape::NUMBER,
                _ => {
                    self.error(
                        format!(
                            "Unknown self property: '{}'. Valid properties: {}",
                            property,
                            SELF_PROPERTIES.join(", ")
                        ),
                        span,
                    );
                    Shape::UNKNOWN
                }
            },
            Shape::Value(ReturnType::Vec2) => {
                if !VECTOR_PROPERTIES.contains(&property.as_str()) {
                    self.error(
                        format!(
                            "Unknown vector property: '{}'. Valid properties: x, y, r, g",
                            property
                        ),
                        span,
                    );
                    return Shape::UNKNOWN;
                }
                Shape::NUMBER
            }
            Shape::Value(_) => Shape::UNKNOWN,
        }
    }
}

/// `p` when `expr` is `self.p`.
fn self_field(expr: &Expr) -> Option<&str> {
    let ExprKind::Member { object, property } = &expr.kind else {
        return None;
    };
    match &object.kind {
        ExprKind::Ident(name) if name.as_str() == "self" => Some(property.as_str()),
        _ => None,
    }
}

fn binary_type(op: BinaryOp, left: ReturnType, right: ReturnType) -> ReturnType {
    let either = |ty: ReturnType| left == ty || right == ty;
    match op {
        // A vector operand always selects vector arithmetic, even next to a string.
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div
            if either(ReturnType::Vec2) =>
        {
            ReturnType::Vec2
        }
        BinaryOp::Rem if either(ReturnType::Vec2) => ReturnType::Unknown,
        BinaryOp::Add if either(ReturnType::String) => ReturnType::String,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            ReturnType::Number
        }
        _ => ReturnType::Boolean,
    }
}
