//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces. A surface keeps no
//! calculator logic of its own: it renders the latest [`SessionSnapshot`] and
//! history list it was given, and shows notifications.

use serde::{Deserialize, Serialize};

use crate::history::HistoryEntry;

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Session Messages
    // ============================================
    /// The session changed; replace the rendered state wholesale
    Snapshot {
        /// The new session projection
        snapshot: SessionSnapshot,
    },

    /// The AI history changed (newest first)
    History {
        /// Full history list
        entries: Vec<HistoryEntry>,
    },

    // ============================================
    // System Messages
    // ============================================
    /// Show a notification to the user
    Notify {
        /// Notification level
        level: NotifyLevel,
        /// Title (optional)
        title: Option<String>,
        /// Message content
        message: String,
    },

    /// Conductor state change
    State {
        /// The new state
        state: ConductorState,
    },

    /// Surface should shut down
    Quit {
        /// Optional farewell message
        message: Option<String>,
    },
}

impl ConductorMessage {
    /// Notification without a title
    pub fn notify(level: NotifyLevel, message: impl Into<String>) -> Self {
        Self::Notify {
            level,
            title: None,
            message: message.into(),
        }
    }
}

/// Calculator mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalcMode {
    /// Arithmetic keypad
    #[default]
    Standard,
    /// Free-text prompts answered by the AI gateway
    Ai,
}

impl CalcMode {
    /// The other mode
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Standard => Self::Ai,
            Self::Ai => Self::Standard,
        }
    }

    /// Short label for status lines
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Ai => "AI",
        }
    }
}

/// Read-only projection of the session handed to surfaces
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Active mode
    pub mode: CalcMode,
    /// Main display text
    pub current_text: String,
    /// Secondary line above the display
    pub expression_label: String,
    /// AI explanation line (empty when there is none)
    pub explanation: String,
    /// AI prompt being edited
    pub prompt_draft: String,
    /// Whether an AI request is in flight
    pub solving: bool,
}

/// Notification levels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyLevel {
    /// Informational
    Info,
    /// Warning
    Warning,
    /// Error
    Error,
    /// Success
    Success,
}

/// Conductor operational states
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorState {
    /// Starting up, no surface connected yet
    Initializing,
    /// Ready for input
    Ready,
    /// Waiting on the AI gateway
    Solving,
    /// Shutting down
    ShuttingDown,
}

impl ConductorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Starting up...",
            Self::Ready => "Ready",
            Self::Solving => "Solving...",
            Self::ShuttingDown => "Shutting down...",
        }
    }

    /// Whether the conductor is busy with a request
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Solving)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conductor_state_description() {
        assert_eq!(ConductorState::Ready.description(), "Ready");
        assert_eq!(ConductorState::Solving.description(), "Solving...");
        assert!(ConductorState::Solving.is_busy());
        assert!(!ConductorState::Ready.is_busy());
    }

    #[test]
    fn test_calc_mode_toggle() {
        assert_eq!(CalcMode::default(), CalcMode::Standard);
        assert_eq!(CalcMode::Standard.toggled(), CalcMode::Ai);
        assert_eq!(CalcMode::Ai.toggled().label(), "Standard");
    }

    #[test]
    fn test_message_serializes() {
        let msg = ConductorMessage::Snapshot {
            snapshot: SessionSnapshot {
                current_text: "8".to_string(),
                expression_label: "5 + 3 =".to_string(),
                ..SessionSnapshot::default()
            },
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: ConductorMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
