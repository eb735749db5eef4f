//! Surface Events
//!
//! Events sent from UI surfaces to the Conductor. Surfaces only report what
//! the user did; the Conductor decides what it means for the current mode.

use serde::{Deserialize, Serialize};

use crate::keypad::KeypadCommand;

/// Events from UI Surface to Conductor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceEvent {
    // ============================================
    // Connection Events
    // ============================================
    /// Surface connected to Conductor
    Connected,

    // ============================================
    // User Input Events
    // ============================================
    /// A keypad button or its keyboard equivalent
    Keypad {
        /// The command pressed
        command: KeypadCommand,
    },

    /// User submitted an AI prompt
    SubmitPrompt {
        /// The prompt as typed
        text: String,
    },

    /// User edited the AI prompt box
    PromptEdited {
        /// Full current prompt text
        text: String,
    },

    /// User picked a history entry
    SelectHistory {
        /// Position in the newest-first list
        index: usize,
    },

    /// User switched between standard and AI mode
    ToggleMode,

    // ============================================
    // Lifecycle Events
    // ============================================
    /// User requested quit
    QuitRequested,
}

impl SurfaceEvent {
    /// Shorthand for a keypad event
    #[must_use]
    pub fn keypad(command: KeypadCommand) -> Self {
        Self::Keypad { command }
    }

    /// Short name for logging
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Keypad { .. } => "keypad",
            Self::SubmitPrompt { .. } => "submit_prompt",
            Self::PromptEdited { .. } => "prompt_edited",
            Self::SelectHistory { .. } => "select_history",
            Self::ToggleMode => "toggle_mode",
            Self::QuitRequested => "quit_requested",
        }
    }
}
