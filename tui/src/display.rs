//! Display State Types
//!
//! The render model for the terminal. It is derived only from
//! `ConductorMessage`s plus purely visual state (history panel, cursor).
//! The surface is a thin client: it never computes a calculator value.

use aicalc_core::{
    CalcMode, ConductorMessage, ConductorState, HistoryEntry, NotifyLevel, SessionSnapshot,
};

/// A notification to display
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayNotification {
    /// Notification level
    pub level: NotifyLevel,
    /// Optional title
    pub title: Option<String>,
    /// Message content
    pub message: String,
}

impl DisplayNotification {
    /// Single line form for the status bar
    #[must_use]
    pub fn line(&self) -> String {
        match &self.title {
            Some(title) if title != &self.message => format!("{}: {}", title, self.message),
            _ => self.message.clone(),
        }
    }
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct SurfaceState {
    /// Latest session projection from the Conductor
    pub snapshot: SessionSnapshot,
    /// AI history, newest first
    pub history: Vec<HistoryEntry>,
    /// Conductor state
    pub conductor_state: ConductorState,
    /// Pending notification (if any)
    pub notification: Option<DisplayNotification>,
    /// Whether the history panel is shown
    pub history_open: bool,
    /// Highlighted row in the history panel
    pub history_cursor: usize,
    /// Set once the Conductor says goodbye
    pub quit_requested: bool,
    /// Farewell text from the Conductor
    pub goodbye: Option<String>,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            snapshot: SessionSnapshot {
                current_text: "0".to_string(),
                ..SessionSnapshot::default()
            },
            history: Vec::new(),
            conductor_state: ConductorState::Initializing,
            notification: None,
            history_open: false,
            history_cursor: 0,
            quit_requested: false,
            goodbye: None,
        }
    }
}

impl SurfaceState {
    /// Create a new display state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a `ConductorMessage` to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            ConductorMessage::Snapshot { snapshot } => {
                if snapshot.mode == CalcMode::Standard {
                    self.history_open = false;
                }
                self.snapshot = snapshot;
            }
            ConductorMessage::History { entries } => {
                self.history = entries;
                self.clamp_cursor();
            }
            ConductorMessage::Notify {
                level,
                title,
                message,
            } => {
                self.notification = Some(DisplayNotification {
                    level,
                    title,
                    message,
                });
            }
            ConductorMessage::State { state } => {
                self.conductor_state = state;
            }
            ConductorMessage::Quit { message } => {
                self.quit_requested = true;
                self.goodbye = message;
            }
        }
    }

    /// Current mode
    #[must_use]
    pub fn mode(&self) -> CalcMode {
        self.snapshot.mode
    }

    /// Prompt text the Conductor last acknowledged
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.snapshot.prompt_draft
    }

    /// Show or hide the history panel
    ///
    /// The panel only exists in AI mode.
    pub fn toggle_history(&mut self) {
        if self.mode() == CalcMode::Ai {
            self.history_open = !self.history_open;
            self.clamp_cursor();
        }
    }

    /// Move the history cursor toward newer entries
    pub fn cursor_up(&mut self) {
        self.history_cursor = self.history_cursor.saturating_sub(1);
    }

    /// Move the history cursor toward older entries
    pub fn cursor_down(&mut self) {
        if self.history_cursor + 1 < self.history.len() {
            self.history_cursor += 1;
        }
    }

    /// Index to restore, if the panel has anything to pick
    #[must_use]
    pub fn selected_index(&self) -> Option<usize> {
        (self.history_open && self.history_cursor < self.history.len())
            .then_some(self.history_cursor)
    }

    /// Clear the notification
    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    fn clamp_cursor(&mut self) {
        self.history_cursor = self
            .history_cursor
            .min(self.history.len().saturating_sub(1));
    }
}
