//! Conductor - The Session Core
//!
//! The Conductor owns the calculator session: mode, keypad display state,
//! AI explanation, prompt draft, history and the in-flight AI request. It is
//! the only place any of that is replaced.
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It communicates through:
//! - `SurfaceEvent`: Events received FROM the UI surface
//! - `ConductorMessage`: Updates sent TO the UI surface
//!
//! A surface renders the latest `Snapshot` it was sent and nothing else.
//!
//! # AI Requests
//!
//! At most one request is in flight. It runs on a spawned tokio task and the
//! surface calls [`Conductor::poll_pending`] once per frame to collect the
//! outcome without blocking. Toggling mode or clearing aborts the task, so a
//! late answer can never overwrite a cleared display.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::events::SurfaceEvent;
use crate::gateway::{AiGateway, CalculationResult, RemoteFailure};
use crate::history::{HistoryEntry, HistoryStore};
use crate::keypad::{DisplayState, KeypadCommand};
use crate::messages::{CalcMode, ConductorMessage, ConductorState, NotifyLevel, SessionSnapshot};

/// Display text after a failed AI request
pub const ERROR_TEXT: &str = "Error";

/// Explanation shown after a failed AI request
pub const ERROR_EXPLANATION: &str = "Could not reach AI service.";

/// Conductor configuration
#[derive(Clone, Debug)]
pub struct ConductorConfig {
    /// Longest prompt (in characters) that will be sent to the gateway
    pub max_prompt_chars: usize,
    /// Whether to send an info notification naming the gateway when a surface connects
    pub greet_on_connect: bool,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            max_prompt_chars: 2000,
            greet_on_connect: true,
        }
    }
}

impl ConductorConfig {
    /// Create configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_prompt_chars: std::env::var("AICALC_MAX_PROMPT_CHARS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.max_prompt_chars),
            greet_on_connect: std::env::var("AICALC_GREET")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(defaults.greet_on_connect),
        }
    }
}

/// An AI request that has been spawned but not yet collected
struct PendingSolve {
    prompt: String,
    handle: JoinHandle<Result<CalculationResult, RemoteFailure>>,
}

/// The Conductor - headless calculator session
pub struct Conductor<G: AiGateway> {
    /// Configuration
    config: ConductorConfig,
    /// AI gateway
    gateway: Arc<G>,
    /// Current operational state
    state: ConductorState,
    /// Active mode
    mode: CalcMode,
    /// Keypad display value (replaced, never mutated)
    display: DisplayState,
    /// AI explanation line
    explanation: String,
    /// AI prompt being edited
    prompt_draft: String,
    /// Answered prompts, newest first
    history: HistoryStore,
    /// In-flight AI request
    pending: Option<PendingSolve>,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
}

impl<G: AiGateway + 'static> Conductor<G> {
    /// Create a new Conductor with the given gateway
    pub fn new(gateway: G, config: ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        Self {
            config,
            gateway: Arc::new(gateway),
            state: ConductorState::Initializing,
            mode: CalcMode::Standard,
            display: DisplayState::new(),
            explanation: String::new(),
            prompt_draft: String::new(),
            history: HistoryStore::new(),
            pending: None,
            tx,
        }
    }

    /// Get current state
    pub fn state(&self) -> ConductorState {
        self.state
    }

    /// Get active mode
    pub fn mode(&self) -> CalcMode {
        self.mode
    }

    /// Get the keypad display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Get the AI history
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Name of the configured gateway
    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Whether an AI request is in flight
    pub fn is_solving(&self) -> bool {
        self.pending.is_some()
    }

    /// Read-only projection of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            current_text: self.display.current_text().to_string(),
            expression_label: self.display.expression_label().to_string(),
            explanation: self.explanation.clone(),
            prompt_draft: self.prompt_draft.clone(),
            solving: self.pending.is_some(),
        }
    }

    /// Start the Conductor
    ///
    /// Probes the gateway once. An unreachable gateway is only a warning: the
    /// standard keypad works without it.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.set_state(ConductorState::Initializing).await;

        if !self.gateway.health_check().await {
            tracing::warn!(gateway = self.gateway.name(), "AI gateway not reachable");
            self.notify(
                NotifyLevel::Warning,
                &format!("{} is not reachable - AI mode may fail", self.gateway.name()),
            )
            .await;
        }

        self.set_state(ConductorState::Ready).await;
        Ok(())
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        tracing::trace!(event = event.kind(), "Surface event");

        match event {
            SurfaceEvent::Connected => {
                if self.state == ConductorState::Initializing {
                    self.state = ConductorState::Ready;
                }
                self.send(ConductorMessage::State { state: self.state })
                    .await;
                self.send_snapshot().await;
                self.send_history().await;

                if self.config.greet_on_connect {
                    self.notify(
                        NotifyLevel::Info,
                        &format!("AI mode answers via {}", self.gateway.name()),
                    )
                    .await;
                }
            }

            SurfaceEvent::Keypad { command } => {
                self.handle_keypad(command).await;
            }

            SurfaceEvent::SubmitPrompt { text } => {
                self.submit_prompt(text).await;
            }

            SurfaceEvent::PromptEdited { text } => {
                if self.mode == CalcMode::Ai {
                    self.prompt_draft = text;
                    self.send_snapshot().await;
                } else {
                    tracing::debug!("Prompt edit ignored outside AI mode");
                }
            }

            SurfaceEvent::SelectHistory { index } => {
                self.select_history(index).await;
            }

            SurfaceEvent::ToggleMode => {
                self.clear_session().await;
                self.mode = self.mode.toggled();
                tracing::info!(mode = self.mode.label(), "Mode changed");
                self.send_snapshot().await;
            }

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    async fn handle_keypad(&mut self, command: KeypadCommand) {
        if command == KeypadCommand::Clear {
            self.clear_session().await;
            self.send_snapshot().await;
            return;
        }

        if self.mode == CalcMode::Ai {
            tracing::debug!(?command, "Keypad command ignored in AI mode");
            return;
        }

        match self.display.apply(command) {
            Ok(next) => {
                tracing::debug!(
                    ?command,
                    current = next.current_text(),
                    expression = next.expression_label(),
                    "Keypad transition"
                );
                if next != self.display {
                    self.display = next;
                    self.send_snapshot().await;
                }
            }
            Err(reason) => {
                tracing::debug!(?command, %reason, "Keypad no-op");
            }
        }
    }

    /// Submit an AI prompt
    async fn submit_prompt(&mut self, text: String) {
        if self.mode != CalcMode::Ai {
            tracing::debug!("Prompt submission ignored outside AI mode");
            return;
        }

        if text.trim().is_empty() {
            tracing::debug!("Empty prompt ignored");
            return;
        }

        if self.pending.is_some() {
            tracing::warn!("Prompt rejected: a request is already in flight");
            self.notify(
                NotifyLevel::Warning,
                "Still solving the previous prompt - wait for it to finish",
            )
            .await;
            return;
        }

        let length = text.chars().count();
        if length > self.config.max_prompt_chars {
            tracing::warn!(
                length,
                max = self.config.max_prompt_chars,
                "Prompt rejected: too long"
            );
            self.notify(
                NotifyLevel::Warning,
                &format!(
                    "Prompt is too long ({length} characters, max {})",
                    self.config.max_prompt_chars
                ),
            )
            .await;
            return;
        }

        tracing::info!(gateway = self.gateway.name(), "Submitting AI prompt");

        self.prompt_draft = text.clone();
        self.display = self.display.with_expression_label(text.as_str());

        let gateway = Arc::clone(&self.gateway);
        let prompt = text.clone();
        let handle = tokio::spawn(async move { gateway.solve(&prompt).await });
        self.pending = Some(PendingSolve { prompt: text, handle });

        self.set_state(ConductorState::Solving).await;
        self.send_snapshot().await;
    }

    /// Collect a finished AI request without blocking
    ///
    /// Call this regularly (once per frame). Returns true if a request
    /// completed.
    pub async fn poll_pending(&mut self) -> bool {
        let finished = self
            .pending
            .as_ref()
            .is_some_and(|pending| pending.handle.is_finished());
        if !finished {
            return false;
        }

        match self.pending.take() {
            Some(pending) => {
                let outcome = pending.handle.await;
                self.finish_solve(pending.prompt, outcome).await;
                true
            }
            None => false,
        }
    }

    /// Wait for the in-flight AI request, if any, and apply its outcome
    ///
    /// Returns true if a request completed.
    pub async fn wait_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                let outcome = pending.handle.await;
                self.finish_solve(pending.prompt, outcome).await;
                true
            }
            None => false,
        }
    }

    async fn finish_solve(
        &mut self,
        prompt: String,
        outcome: Result<Result<CalculationResult, RemoteFailure>, JoinError>,
    ) {
        match outcome {
            Ok(Ok(answer)) => {
                tracing::info!(result = %answer.result, "AI prompt solved");
                self.display = self.display.with_current_text(answer.result.as_str());
                self.explanation = answer.explanation.clone();
                self.history.append(HistoryEntry::new(
                    prompt,
                    answer.result,
                    Some(answer.explanation),
                ));
                self.send_history().await;
            }
            Ok(Err(failure)) => {
                tracing::warn!(gateway = self.gateway.name(), error = %failure, "AI request failed");
                self.show_failure();
                self.send(ConductorMessage::Notify {
                    level: NotifyLevel::Error,
                    title: Some(ERROR_EXPLANATION.to_string()),
                    message: failure.to_string(),
                })
                .await;
            }
            Err(join_error) => {
                tracing::warn!(error = %join_error, "AI request task did not complete");
                self.show_failure();
                self.notify(NotifyLevel::Error, ERROR_EXPLANATION).await;
            }
        }

        self.set_state(ConductorState::Ready).await;
        self.send_snapshot().await;
    }

    fn show_failure(&mut self) {
        self.display = self.display.with_current_text(ERROR_TEXT);
        self.explanation = ERROR_EXPLANATION.to_string();
    }

    /// Restore a history entry to the display
    async fn select_history(&mut self, index: usize) {
        if self.mode != CalcMode::Ai {
            tracing::debug!(index, "History selection ignored outside AI mode");
            return;
        }

        let Some(restored) = self.history.load_entry(index) else {
            tracing::debug!(index, len = self.history.len(), "History index out of range");
            return;
        };

        self.display = DisplayState::new()
            .with_current_text(restored.result)
            .with_expression_label(restored.prompt.as_str());
        self.prompt_draft = restored.prompt;
        self.explanation = restored.explanation;
        self.send_snapshot().await;
    }

    /// Abort any in-flight request and reset display, explanation and prompt
    async fn clear_session(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
            tracing::info!("In-flight AI request cancelled");
            self.set_state(ConductorState::Ready).await;
        }

        self.display = DisplayState::new();
        self.explanation.clear();
        self.prompt_draft.clear();
    }

    /// Shutdown the Conductor
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
        self.set_state(ConductorState::ShuttingDown).await;

        self.send(ConductorMessage::Quit {
            message: Some("Goodbye!".to_string()),
        })
        .await;

        Ok(())
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: ConductorState) {
        self.state = state;
        self.send(ConductorMessage::State { state }).await;
    }

    async fn send_snapshot(&self) {
        self.send(ConductorMessage::Snapshot {
            snapshot: self.snapshot(),
        })
        .await;
    }

    async fn send_history(&self) {
        self.send(ConductorMessage::History {
            entries: self.history.list().to_vec(),
        })
        .await;
    }

    /// Send notification
    async fn notify(&self, level: NotifyLevel, message: &str) {
        self.send(ConductorMessage::notify(level, message)).await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}
