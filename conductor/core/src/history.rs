//! AI History
//!
//! In-memory record of answered AI prompts for the current session, newest
//! first. Entries are created only from successful gateway answers and never
//! change afterwards. Nothing is persisted.

use serde::{Deserialize, Serialize};

/// One answered AI prompt
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    prompt_text: String,
    result_text: String,
    explanation_text: Option<String>,
}

impl HistoryEntry {
    /// Create an entry
    pub fn new(
        prompt_text: impl Into<String>,
        result_text: impl Into<String>,
        explanation_text: Option<String>,
    ) -> Self {
        Self {
            prompt_text: prompt_text.into(),
            result_text: result_text.into(),
            explanation_text,
        }
    }

    /// The prompt as the user typed it
    #[must_use]
    pub fn prompt_text(&self) -> &str {
        &self.prompt_text
    }

    /// The answer returned by the gateway
    #[must_use]
    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// The gateway's explanation, if one was given
    #[must_use]
    pub fn explanation_text(&self) -> Option<&str> {
        self.explanation_text.as_deref()
    }
}

/// Fields needed to put a history entry back on screen
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestoredEntry {
    /// Prompt text, restored as both the prompt draft and the expression label
    pub prompt: String,
    /// Result text for the main display
    pub result: String,
    /// Explanation line (empty when the entry had none)
    pub explanation: String,
}

impl From<&HistoryEntry> for RestoredEntry {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            prompt: entry.prompt_text.clone(),
            result: entry.result_text.clone(),
            explanation: entry.explanation_text.clone().unwrap_or_default(),
        }
    }
}

/// Newest-first list of answered prompts
#[derive(Clone, Debug, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry at the front
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    /// All entries, newest first
    #[must_use]
    pub fn list(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Most recent entry
    #[must_use]
    pub fn first(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    /// Read the fields needed to restore entry `index` (0 = newest).
    ///
    /// Does not modify the store.
    #[must_use]
    pub fn load_entry(&self, index: usize) -> Option<RestoredEntry> {
        self.entries.get(index).map(RestoredEntry::from)
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
