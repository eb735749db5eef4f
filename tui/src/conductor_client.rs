//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network) and provides
//! a convenient interface for sending events and receiving messages.
//!
//! The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use aicalc_core::{
    AiGateway, Conductor, ConductorConfig, ConductorMessage, KeypadCommand, SurfaceEvent,
};

/// Channel capacity between Conductor and surface
const MESSAGE_BUFFER: usize = 100;

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<G: AiGateway + 'static = Box<dyn AiGateway>> {
    /// The embedded Conductor instance
    conductor: Conductor<G>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl<G: AiGateway + 'static> ConductorClient<G> {
    /// Create a client around an already built gateway
    pub fn new(gateway: G, config: ConductorConfig) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);
        let conductor = Conductor::new(gateway, config, tx);
        Self { conductor, rx }
    }

    /// Start the Conductor (probes the gateway)
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.conductor.start().await
    }

    /// Connect this surface to the Conductor
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::Connected).await
    }

    /// Press a keypad button
    pub async fn keypad(&mut self, command: KeypadCommand) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::keypad(command))
            .await
    }

    /// Report the prompt box contents
    pub async fn edit_prompt(&mut self, text: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::PromptEdited { text })
            .await
    }

    /// Send the prompt to the AI gateway
    pub async fn submit_prompt(&mut self, text: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::SubmitPrompt { text })
            .await
    }

    /// Restore a history entry
    pub async fn select_history(&mut self, index: usize) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::SelectHistory { index })
            .await
    }

    /// Switch between standard and AI mode
    pub async fn toggle_mode(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::ToggleMode).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::QuitRequested)
            .await
    }

    /// Collect a finished AI request (must be called regularly)
    pub async fn poll_pending(&mut self) -> bool {
        self.conductor.poll_pending().await
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }
}
