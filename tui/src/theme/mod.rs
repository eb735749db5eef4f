//! Theme and Colors
//!
//! One palette for the whole surface. Mode colors make the active mode
//! obvious at a glance.

use ratatui::style::{Color, Modifier, Style};

use aicalc_core::{CalcMode, NotifyLevel};

// ============================================================================
// Display Colors
// ============================================================================

/// Main number on the display
pub const DISPLAY_TEXT: Color = Color::Rgb(235, 235, 235);

/// Expression line above the number
pub const EXPRESSION_TEXT: Color = Color::Rgb(150, 150, 150);

/// AI explanation text
pub const EXPLANATION_TEXT: Color = Color::Rgb(150, 180, 255);

// ============================================================================
// Mode Colors
// ============================================================================

/// Standard keypad mode accent
pub const STANDARD_ACCENT: Color = Color::Rgb(255, 200, 90);

/// AI mode accent
pub const AI_ACCENT: Color = Color::Magenta;

// ============================================================================
// UI Colors
// ============================================================================

/// Prompt input green
pub const PROMPT_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning amber
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Highlighted history row background
pub const SELECTION_BG: Color = Color::Rgb(60, 60, 90);

/// Accent color for a mode
#[must_use]
pub fn mode_accent(mode: CalcMode) -> Color {
    match mode {
        CalcMode::Standard => STANDARD_ACCENT,
        CalcMode::Ai => AI_ACCENT,
    }
}

/// Style for a notification line
#[must_use]
pub fn notify_style(level: NotifyLevel) -> Style {
    let color = match level {
        NotifyLevel::Info => DIM_GRAY,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    };
    Style::default().fg(color)
}

/// Style for the big display number
#[must_use]
pub fn display_style() -> Style {
    Style::default().fg(DISPLAY_TEXT).add_modifier(Modifier::BOLD)
}
