//! Key Map
//!
//! Pure translation from terminal key presses to calculator actions. Nothing
//! here touches the Conductor; the app decides what each action sends.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use aicalc_core::{CalcMode, KeypadCommand, Operator};

/// What a key press means in the current mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Leave the application
    Quit,
    /// Switch between standard and AI mode
    ToggleMode,
    /// A keypad button (standard mode, or Clear in AI mode)
    Keypad(KeypadCommand),
    /// Append a character to the AI prompt
    InsertChar(char),
    /// Remove the last character of the AI prompt
    DeleteChar,
    /// Send the AI prompt
    Submit,
    /// Show or hide the history panel
    ToggleHistory,
    /// Move the history cursor up
    HistoryUp,
    /// Move the history cursor down
    HistoryDown,
    /// Restore the history entry under the cursor
    HistoryPick,
    /// Key has no meaning here
    Ignore,
}

/// Map a key event for the given mode
///
/// `history_open` only matters in AI mode, where it turns Enter into a
/// history pick.
#[must_use]
pub fn map_key(key: KeyEvent, mode: CalcMode, history_open: bool) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && key.code == KeyCode::Char('c') {
        return KeyAction::Quit;
    }
    if key.code == KeyCode::Tab {
        return KeyAction::ToggleMode;
    }

    match mode {
        CalcMode::Standard => map_standard(key.code, ctrl),
        CalcMode::Ai => map_ai(key.code, ctrl, history_open),
    }
}

fn map_standard(code: KeyCode, ctrl: bool) -> KeyAction {
    if ctrl {
        return KeyAction::Ignore;
    }
    match code {
        KeyCode::Char(c @ '0'..='9') => {
            let digit = c.to_digit(10).and_then(|d| u8::try_from(d).ok());
            digit.map_or(KeyAction::Ignore, |d| {
                KeyAction::Keypad(KeypadCommand::Digit(d))
            })
        }
        KeyCode::Char('.' | ',') => KeyAction::Keypad(KeypadCommand::Decimal),
        KeyCode::Char('+') => KeyAction::Keypad(KeypadCommand::Operator(Operator::Add)),
        KeyCode::Char('-') => KeyAction::Keypad(KeypadCommand::Operator(Operator::Subtract)),
        KeyCode::Char('*' | 'x') => KeyAction::Keypad(KeypadCommand::Operator(Operator::Multiply)),
        KeyCode::Char('/') => KeyAction::Keypad(KeypadCommand::Operator(Operator::Divide)),
        KeyCode::Char('=') | KeyCode::Enter => KeyAction::Keypad(KeypadCommand::Equals),
        KeyCode::Char('%') => KeyAction::Keypad(KeypadCommand::Percent),
        KeyCode::Char('n') => KeyAction::Keypad(KeypadCommand::SignToggle),
        KeyCode::Backspace => KeyAction::Keypad(KeypadCommand::Backspace),
        KeyCode::Esc => KeyAction::Keypad(KeypadCommand::Clear),
        _ => KeyAction::Ignore,
    }
}

fn map_ai(code: KeyCode, ctrl: bool, history_open: bool) -> KeyAction {
    if ctrl {
        return match code {
            KeyCode::Char('l') => KeyAction::Keypad(KeypadCommand::Clear),
            _ => KeyAction::Ignore,
        };
    }
    match code {
        KeyCode::F(2) => KeyAction::ToggleHistory,
        KeyCode::Up if history_open => KeyAction::HistoryUp,
        KeyCode::Down if history_open => KeyAction::HistoryDown,
        KeyCode::Enter if history_open => KeyAction::HistoryPick,
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::Backspace => KeyAction::DeleteChar,
        KeyCode::Esc if history_open => KeyAction::ToggleHistory,
        KeyCode::Char(c) => KeyAction::InsertChar(c),
        _ => KeyAction::Ignore,
    }
}

/// Prompt text after an editing action, or `None` if the action is not an edit
#[must_use]
pub fn edit_prompt(prompt: &str, action: KeyAction) -> Option<String> {
    match action {
        KeyAction::InsertChar(c) => {
            let mut next = prompt.to_string();
            next.push(c);
            Some(next)
        }
        KeyAction::DeleteChar => {
            let mut next = prompt.to_string();
            next.pop()?;
            Some(next)
        }
        _ => None,
    }
}
