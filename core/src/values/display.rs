use core::fmt;

use super::RuntimeValue;

/// Format a number the way designers see it in templates and string
/// concatenation: integral values without a fractional part, `Infinity` /
/// `NaN` spelled out, exponent notation only for very large or very small
/// magnitudes.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        // Also covers -0.
        return "0".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 || abs < 1e-6 {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => formatted,
        };
    }

    format!("{}", n)
}

impl fmt::Display for RuntimeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeValue::Number(n) => f.write_str(&format_number(*n)),
            RuntimeValue::Bool(b) => write!(f, "{}", b),
            RuntimeValue::Str(s) => f.write_str(s),
            RuntimeValue::Vec2(v) => write!(f, "{}", v),
            RuntimeValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}
