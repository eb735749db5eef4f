//! Keypad State Machine
//!
//! Tracks what the calculator display shows while the user presses keys.
//!
//! [`DisplayState`] is an immutable value. Every keypad command produces a new
//! state (or a [`NoOp`] reason when the command makes no sense right now), and
//! the [`Conductor`](crate::Conductor) swaps the whole value in one step before
//! publishing it to surfaces. Nothing edits a display field in place.
//!
//! Evaluation is strictly left to right with no precedence: pressing an
//! operator while another is pending folds the pending one first, so
//! `2 + 3 ×` shows `5` before the multiplication starts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arithmetic::{apply, format_number, parse_operand, Operator};

/// A single keypad input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeypadCommand {
    /// Digit key, 0 through 9
    Digit(u8),
    /// Decimal point
    Decimal,
    /// Binary operator
    Operator(Operator),
    /// `=`
    Equals,
    /// `%`
    Percent,
    /// `+/-`
    SignToggle,
    /// `AC`
    Clear,
    /// Delete the last character (keyboard only)
    Backspace,
}

/// Why a command left the display untouched
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum NoOp {
    /// Equals pressed without a stored operand and pending operator
    #[error("no pending operation to evaluate")]
    InvalidOperatorState,
    /// Percent or sign toggle on a zero value
    #[error("current value is zero")]
    ZeroValue,
    /// Decimal pressed when the entry already has a decimal point
    #[error("entry already contains a decimal point")]
    DecimalPresent,
    /// Digit outside 0..=9
    #[error("invalid digit {0}")]
    InvalidDigit(u8),
}

/// Coarse phase of the keypad, derived from the display fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeypadPhase {
    /// Digits are accumulating into the current entry
    Entering,
    /// An operator was chosen and the next operand has not started
    OperatorPending,
    /// An equals computation just completed
    Result,
}

/// Calculator display and pending-operation state
///
/// `current_text` is never empty and keypad input never puts more than one
/// decimal point into it. Text placed by [`DisplayState::with_current_text`]
/// (AI answers, `"Error"`) is shown verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DisplayState {
    current_text: String,
    previous_operand: Option<String>,
    pending_operator: Option<Operator>,
    awaiting_new_entry: bool,
    expression_label: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            current_text: "0".to_string(),
            previous_operand: None,
            pending_operator: None,
            awaiting_new_entry: false,
            expression_label: String::new(),
        }
    }
}

impl DisplayState {
    /// Initial state: `"0"`, nothing pending, empty expression
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text in the main display
    #[must_use]
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    /// Left operand waiting for the pending operator
    #[must_use]
    pub fn previous_operand(&self) -> Option<&str> {
        self.previous_operand.as_deref()
    }

    /// Operator waiting for its second operand
    #[must_use]
    pub fn pending_operator(&self) -> Option<Operator> {
        self.pending_operator
    }

    /// Whether the next digit starts a fresh number
    #[must_use]
    pub fn awaiting_new_entry(&self) -> bool {
        self.awaiting_new_entry
    }

    /// Secondary line above the display (e.g. `"5 + 3 ="`)
    #[must_use]
    pub fn expression_label(&self) -> &str {
        &self.expression_label
    }

    /// Numeric value of the current text
    #[must_use]
    pub fn current_value(&self) -> f64 {
        parse_operand(&self.current_text)
    }

    /// Current keypad phase
    #[must_use]
    pub fn phase(&self) -> KeypadPhase {
        match (self.awaiting_new_entry, self.pending_operator) {
            (true, Some(_)) => KeypadPhase::OperatorPending,
            (true, None) => KeypadPhase::Result,
            (false, _) => KeypadPhase::Entering,
        }
    }

    /// Copy of this state showing `text` in the main display.
    ///
    /// Empty text is shown as `"0"`.
    #[must_use]
    pub fn with_current_text(&self, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            current_text: if text.is_empty() {
                "0".to_string()
            } else {
                text
            },
            ..self.clone()
        }
    }

    /// Copy of this state with a new expression label
    #[must_use]
    pub fn with_expression_label(&self, label: impl Into<String>) -> Self {
        Self {
            expression_label: label.into(),
            ..self.clone()
        }
    }

    /// Apply a command, returning the next state.
    ///
    /// # Errors
    ///
    /// Returns the [`NoOp`] reason when the command does not apply in the
    /// current state. The caller keeps the existing state in that case.
    pub fn apply(&self, command: KeypadCommand) -> Result<Self, NoOp> {
        match command {
            KeypadCommand::Digit(digit) => self.press_digit(digit),
            KeypadCommand::Decimal => self.press_decimal(),
            KeypadCommand::Operator(op) => Ok(self.press_operator(op)),
            KeypadCommand::Equals => self.press_equals(),
            KeypadCommand::Percent => self.press_percent(),
            KeypadCommand::SignToggle => self.press_sign_toggle(),
            KeypadCommand::Clear => Ok(Self::new()),
            KeypadCommand::Backspace => Ok(self.press_backspace()),
        }
    }

    /// Total form of [`apply`](Self::apply): a no-op yields an unchanged copy
    #[must_use]
    pub fn next(&self, command: KeypadCommand) -> Self {
        self.apply(command).unwrap_or_else(|_| self.clone())
    }

    fn press_digit(&self, digit: u8) -> Result<Self, NoOp> {
        let ch = char::from_digit(u32::from(digit), 10).ok_or(NoOp::InvalidDigit(digit))?;
        let mut next = self.clone();

        if self.awaiting_new_entry {
            next.current_text = ch.to_string();
            next.awaiting_new_entry = false;
        } else if self.current_text == "0" {
            next.current_text = ch.to_string();
        } else {
            next.current_text.push(ch);
        }

        Ok(next)
    }

    fn press_decimal(&self) -> Result<Self, NoOp> {
        let mut next = self.clone();

        if self.awaiting_new_entry {
            next.current_text = "0.".to_string();
            next.awaiting_new_entry = false;
        } else if self.current_text.contains('.') {
            return Err(NoOp::DecimalPresent);
        } else {
            next.current_text.push('.');
        }

        Ok(next)
    }

    fn press_operator(&self, op: Operator) -> Self {
        let mut next = self.clone();

        match (&self.previous_operand, self.pending_operator) {
            (None, _) => {
                next.previous_operand = Some(self.current_text.clone());
            }
            (Some(previous), Some(pending)) => {
                let result = format_number(apply(
                    parse_operand(previous),
                    self.current_value(),
                    pending,
                ));
                next.current_text = result.clone();
                next.previous_operand = Some(result);
            }
            (Some(_), None) => {}
        }

        next.awaiting_new_entry = true;
        next.pending_operator = Some(op);
        // Label keeps the operand as typed, not the folded result
        next.expression_label = format!("{} {}", self.current_text, op);
        next
    }

    fn press_equals(&self) -> Result<Self, NoOp> {
        let (Some(previous), Some(pending)) = (&self.previous_operand, self.pending_operator)
        else {
            return Err(NoOp::InvalidOperatorState);
        };

        let result = apply(parse_operand(previous), self.current_value(), pending);

        Ok(Self {
            current_text: format_number(result),
            previous_operand: None,
            pending_operator: None,
            awaiting_new_entry: true,
            expression_label: format!("{previous} {pending} {} =", self.current_text),
        })
    }

    fn press_percent(&self) -> Result<Self, NoOp> {
        let value = self.current_value();
        if value == 0.0 {
            return Err(NoOp::ZeroValue);
        }
        Ok(self.with_current_text(format_number(value / 100.0)))
    }

    fn press_sign_toggle(&self) -> Result<Self, NoOp> {
        let value = self.current_value();
        if value == 0.0 {
            return Err(NoOp::ZeroValue);
        }
        Ok(self.with_current_text(format_number(value * -1.0)))
    }

    fn press_backspace(&self) -> Self {
        let mut next = self.clone();
        next.current_text.pop();
        if next.current_text.is_empty() {
            next.current_text = "0".to_string();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    use super::KeypadCommand::{Backspace, Clear, Decimal, Digit, Equals, Percent, SignToggle};

    fn op(operator: Operator) -> KeypadCommand {
        KeypadCommand::Operator(operator)
    }

    fn press_all(commands: &[KeypadCommand]) -> DisplayState {
        commands
            .iter()
            .fold(DisplayState::new(), |state, cmd| state.next(*cmd))
    }

    #[test]
    fn test_initial_state() {
        let state = DisplayState::new();
        assert_eq!(state.current_text(), "0");
        assert_eq!(state.previous_operand(), None);
        assert_eq!(state.pending_operator(), None);
        assert!(!state.awaiting_new_entry());
        assert_eq!(state.expression_label(), "");
        assert_eq!(state.phase(), KeypadPhase::Entering);
    }

    #[test]
    fn test_digits_replace_lone_zero() {
        let state = press_all(&[Digit(0), Digit(7), Digit(0), Digit(3)]);
        assert_eq!(state.current_text(), "703");
    }

    #[test]
    fn test_invalid_digit_is_noop() {
        assert_eq!(
            DisplayState::new().apply(Digit(12)),
            Err(NoOp::InvalidDigit(12))
        );
    }

    #[test]
    fn test_five_plus_three_equals() {
        let state = press_all(&[Digit(5), op(Operator::Add), Digit(3), Equals]);
        assert_eq!(state.current_text(), "8");
        assert_eq!(state.expression_label(), "5 + 3 =");
        assert_eq!(state.previous_operand(), None);
        assert_eq!(state.pending_operator(), None);
        assert!(state.awaiting_new_entry());
        assert_eq!(state.phase(), KeypadPhase::Result);
    }

    #[test]
    fn test_seven_divided_by_zero_is_infinity() {
        let state = press_all(&[Digit(7), op(Operator::Divide), Digit(0), Equals]);
        assert_eq!(state.current_text(), f64::INFINITY.to_string());
        assert_eq!(state.expression_label(), "7 ÷ 0 =");
    }

    #[test]
    fn test_operator_stores_operand_and_label() {
        let state = press_all(&[Digit(1), Digit(2), op(Operator::Multiply)]);
        assert_eq!(state.previous_operand(), Some("12"));
        assert_eq!(state.pending_operator(), Some(Operator::Multiply));
        assert_eq!(state.expression_label(), "12 ×");
        assert_eq!(state.phase(), KeypadPhase::OperatorPending);
    }

    #[test]
    fn test_chained_operators_fold_left_to_right() {
        let state = press_all(&[
            Digit(2),
            op(Operator::Add),
            Digit(3),
            op(Operator::Multiply),
            Digit(4),
            Equals,
        ]);
        assert_eq!(state.current_text(), "20");
        assert_eq!(state.expression_label(), "5 × 4 =");
    }

    #[test]
    fn test_intermediate_result_shown_on_operator() {
        let state = press_all(&[Digit(2), op(Operator::Add), Digit(3), op(Operator::Subtract)]);
        assert_eq!(state.current_text(), "5");
        assert_eq!(state.previous_operand(), Some("5"));
        assert_eq!(state.expression_label(), "3 -");
    }

    #[test]
    fn test_chained_operator_label_uses_typed_operand() {
        let state = press_all(&[Digit(5), op(Operator::Add), Digit(3), op(Operator::Add)]);
        assert_eq!(state.current_text(), "8");
        assert_eq!(state.expression_label(), "3 +");
    }

    #[test]
    fn test_repeated_operator_recomputes_from_stored_operand() {
        let first = press_all(&[Digit(5), op(Operator::Add)]);
        assert_eq!(first.previous_operand(), Some("5"));

        let second = first.next(op(Operator::Multiply));
        // 5 + 5 with the same stored operand slot, then × becomes pending
        assert_eq!(second.current_text(), "10");
        assert_eq!(second.previous_operand(), Some("10"));
        assert_eq!(second.pending_operator(), Some(Operator::Multiply));
        assert!(second.awaiting_new_entry());
    }

    #[test]
    fn test_equals_without_pending_operation_is_noop() {
        let state = press_all(&[Digit(9)]);
        assert_eq!(state.apply(Equals), Err(NoOp::InvalidOperatorState));
        assert_eq!(state.next(Equals), state);
    }

    #[test]
    fn test_equals_twice_is_noop_second_time() {
        let state = press_all(&[Digit(4), op(Operator::Add), Digit(1), Equals]);
        assert_eq!(state.apply(Equals), Err(NoOp::InvalidOperatorState));
    }

    #[test]
    fn test_digit_after_result_starts_new_entry() {
        let state = press_all(&[Digit(4), op(Operator::Add), Digit(1), Equals, Digit(9)]);
        assert_eq!(state.current_text(), "9");
        assert!(!state.awaiting_new_entry());
    }

    #[test]
    fn test_operator_after_result_continues_from_result() {
        let state = press_all(&[
            Digit(4),
            op(Operator::Add),
            Digit(1),
            Equals,
            op(Operator::Multiply),
            Digit(2),
            Equals,
        ]);
        assert_eq!(state.current_text(), "10");
        assert_eq!(state.expression_label(), "5 × 2 =");
    }

    #[test]
    fn test_decimal_press_is_idempotent() {
        let state = press_all(&[Digit(3), Decimal, Decimal]);
        assert_eq!(state.current_text(), "3.");
        assert_eq!(state.current_text().matches('.').count(), 1);
        assert_eq!(
            press_all(&[Digit(3), Decimal]).apply(Decimal),
            Err(NoOp::DecimalPresent)
        );
    }

    #[test]
    fn test_decimal_starts_new_entry_with_zero() {
        let state = press_all(&[Digit(8), op(Operator::Subtract), Decimal, Digit(5)]);
        assert_eq!(state.current_text(), "0.5");

        let state = state.next(Equals);
        assert_eq!(state.current_text(), "7.5");
    }

    #[test]
    fn test_decimal_on_initial_zero() {
        let state = press_all(&[Decimal, Digit(2), Digit(5)]);
        assert_eq!(state.current_text(), "0.25");
    }

    #[test]
    fn test_percent() {
        let state = press_all(&[Digit(5), Digit(0), Percent]);
        assert_eq!(state.current_text(), "0.5");
        assert_eq!(DisplayState::new().apply(Percent), Err(NoOp::ZeroValue));
    }

    #[test]
    fn test_sign_toggle() {
        let state = press_all(&[Digit(4), Digit(2), SignToggle]);
        assert_eq!(state.current_text(), "-42");
        assert_eq!(state.next(SignToggle).current_text(), "42");
        assert_eq!(DisplayState::new().apply(SignToggle), Err(NoOp::ZeroValue));
    }

    #[test]
    fn test_sign_toggle_normalizes_trailing_decimal() {
        let state = press_all(&[Digit(5), Decimal, SignToggle]);
        assert_eq!(state.current_text(), "-5");
    }

    #[test]
    fn test_backspace() {
        let state = press_all(&[Digit(1), Digit(2), Digit(3), Backspace]);
        assert_eq!(state.current_text(), "12");

        let state = press_all(&[Digit(7), Backspace]);
        assert_eq!(state.current_text(), "0");

        let state = DisplayState::new().next(Backspace);
        assert_eq!(state, DisplayState::new());
    }

    #[test]
    fn test_backspace_keeps_pending_operation() {
        let state = press_all(&[Digit(9), op(Operator::Add), Digit(4), Digit(4), Backspace]);
        assert_eq!(state.current_text(), "4");
        assert_eq!(state.pending_operator(), Some(Operator::Add));
        assert_eq!(state.next(Equals).current_text(), "13");
    }

    #[test]
    fn test_clear_restores_initial_state() {
        let busy = press_all(&[
            Digit(9),
            Decimal,
            Digit(1),
            op(Operator::Divide),
            Digit(3),
            op(Operator::Add),
        ]);
        assert_ne!(busy, DisplayState::new());
        assert_eq!(busy.next(Clear), DisplayState::new());

        let errored = DisplayState::new()
            .with_current_text("Error")
            .with_expression_label("what is 2 + 2");
        assert_eq!(errored.next(Clear), DisplayState::new());
    }

    #[test]
    fn test_with_current_text_never_empty() {
        let state = DisplayState::new().with_current_text("");
        assert_eq!(state.current_text(), "0");
    }

    #[test]
    fn test_error_text_parses_as_nan() {
        let state = DisplayState::new().with_current_text("Error");
        assert!(state.current_value().is_nan());
        // NaN is not zero, so percent still applies
        assert_eq!(state.next(Percent).current_text(), "NaN");
    }
}
