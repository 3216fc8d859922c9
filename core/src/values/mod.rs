//! Runtime values produced by evaluating an expression.

mod display;
mod value;
mod vec2;

#[cfg(test)]
mod value_test;

pub use display::format_number;
pub use value::{RuntimeValue, TypeMismatch, ValueKind};
pub use vec2::Vec2;
