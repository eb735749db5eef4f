//! Arithmetic Engine
//!
//! Applies one binary operator to two operands using plain `f64` semantics.
//! There is no expression grammar, precedence or rounding here: the keypad
//! state machine feeds operands in left-to-right order and displays whatever
//! the float operation produces.
//!
//! Division by zero is not trapped. `7 ÷ 0` is `inf`, `0 ÷ 0` is `NaN`, and
//! both are shown to the user as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four keypad operators
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `+`
    Add,
    /// `-`
    Subtract,
    /// `×`
    Multiply,
    /// `÷`
    Divide,
}

impl Operator {
    /// All operators in keypad order
    pub const ALL: [Operator; 4] = [
        Operator::Divide,
        Operator::Multiply,
        Operator::Subtract,
        Operator::Add,
    ];

    /// Display glyph used in expression labels
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '×',
            Self::Divide => '÷',
        }
    }

    /// Parse an operator glyph.
    ///
    /// Accepts the display glyphs plus the keyboard aliases `*` and `/`.
    #[must_use]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            '+' => Some(Self::Add),
            '-' => Some(Self::Subtract),
            '×' | '*' => Some(Self::Multiply),
            '÷' | '/' => Some(Self::Divide),
            _ => None,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Apply `op` to `first` and `second`, in that order.
#[must_use]
pub fn apply(first: f64, second: f64, op: Operator) -> f64 {
    match op {
        Operator::Add => first + second,
        Operator::Subtract => first - second,
        Operator::Multiply => first * second,
        Operator::Divide => first / second,
    }
}

/// Convert a value to display text.
///
/// Uses the standard float formatting (`8.0` is `"8"`, infinity is `"inf"`).
/// Negative zero is shown as `"0"`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    value.to_string()
}

/// Parse display text into an operand.
///
/// Lenient: the whole text is tried first, then its longest numeric prefix
/// (`"5."` is 5, `"12abc"` is 12). Text without a numeric prefix, such as
/// `"Error"` or a lone `"-"`, is NaN. Never fails.
#[must_use]
pub fn parse_operand(text: &str) -> f64 {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        return value;
    }

    let end = numeric_prefix_len(trimmed);
    trimmed[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Length in bytes of the longest `[sign] digits [. digits] [e [sign] digits]` prefix
fn numeric_prefix_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if has_digits || frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        }
    }

    if !has_digits {
        return 0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    end
}
