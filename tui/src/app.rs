//! Main Application
//!
//! The event loop: terminal keys go through the key map to the Conductor,
//! Conductor messages update the [`SurfaceState`], and each frame is drawn
//! from that state alone.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use aicalc_core::{AiGateway, ConductorState};

use crate::conductor_client::ConductorClient;
use crate::display::SurfaceState;
use crate::keymap::{self, KeyAction};
use crate::render;

/// Longest a single startup step may hold up a frame
const STARTUP_STEP_TIMEOUT: Duration = Duration::from_millis(250);

/// Startup runs one step per frame so the first frames render immediately
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StartupPhase {
    NeedStart,
    NeedConnect,
    Done,
}

/// Main application state
pub struct App<G: AiGateway + 'static = Box<dyn AiGateway>> {
    /// Whether the app is running
    running: bool,
    /// Embedded Conductor
    conductor: ConductorClient<G>,
    /// Render model
    display: SurfaceState,
    /// Where startup has got to
    startup_phase: StartupPhase,
}

impl<G: AiGateway + 'static> App<G> {
    /// Create an app around a Conductor client
    pub fn new(conductor: ConductorClient<G>) -> Self {
        Self {
            running: true,
            conductor,
            display: SurfaceState::new(),
            startup_phase: StartupPhase::NeedStart,
        }
    }

    /// Current render model
    #[must_use]
    pub fn display(&self) -> &SurfaceState {
        &self.display
    }

    /// Whether the loop should keep going
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Farewell text to print after the terminal is restored
    #[must_use]
    pub fn goodbye(&self) -> Option<&str> {
        self.display.goodbye.as_deref()
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        // ~30 FPS is plenty for a calculator display
        let frame_duration = Duration::from_millis(33);

        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| render::draw_ui(frame, &self.display))?;

        while self.running {
            let frame_start = Instant::now();

            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key).await?;
                        }
                        Some(Err(e)) => {
                            tracing::warn!(error = %e, "Terminal event error");
                        }
                        None => self.running = false,
                        _ => {}
                    }
                }

                // Frame tick: advance startup, then fall through to render
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    self.step_startup().await;
                }
            }

            self.tick().await;

            terminal.draw(|frame| render::draw_ui(frame, &self.display))?;

            // Frame rate limiting
            let elapsed = frame_start.elapsed();
            if elapsed < frame_duration {
                tokio::time::sleep(frame_duration - elapsed).await;
            }
        }

        Ok(())
    }

    /// Advance startup by one step
    ///
    /// A gateway probe that overruns its step is abandoned; the Conductor
    /// becomes ready on connect regardless.
    pub async fn step_startup(&mut self) {
        match self.startup_phase {
            StartupPhase::NeedStart => {
                match tokio::time::timeout(STARTUP_STEP_TIMEOUT, self.conductor.start()).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => tracing::warn!(error = %e, "Conductor start error"),
                    Err(_) => tracing::warn!("Gateway probe timed out during startup"),
                }
                self.startup_phase = StartupPhase::NeedConnect;
            }
            StartupPhase::NeedConnect => {
                if let Err(e) = self.conductor.connect().await {
                    tracing::warn!(error = %e, "Conductor connect error");
                }
                self.startup_phase = StartupPhase::Done;
            }
            StartupPhase::Done => {}
        }
    }

    /// Per-frame work: collect a finished AI answer and apply messages
    pub async fn tick(&mut self) {
        self.conductor.poll_pending().await;
        self.process_conductor_messages();

        if self.display.quit_requested
            || matches!(self.display.conductor_state, ConductorState::ShuttingDown)
        {
            self.running = false;
        }
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.conductor.recv_all() {
            self.display.apply_message(msg);
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<()> {
        let action = keymap::map_key(key, self.display.mode(), self.display.history_open);

        match action {
            KeyAction::Quit => self.conductor.request_quit().await?,
            KeyAction::ToggleMode => {
                self.display.clear_notification();
                self.conductor.toggle_mode().await?;
            }
            KeyAction::Keypad(command) => {
                self.display.clear_notification();
                self.conductor.keypad(command).await?;
            }
            KeyAction::InsertChar(_) | KeyAction::DeleteChar => {
                if let Some(text) = keymap::edit_prompt(self.display.prompt(), action) {
                    self.conductor.edit_prompt(text).await?;
                }
            }
            KeyAction::Submit => {
                self.display.clear_notification();
                let text = self.display.prompt().to_string();
                self.conductor.submit_prompt(text).await?;
            }
            KeyAction::ToggleHistory => self.display.toggle_history(),
            KeyAction::HistoryUp => self.display.cursor_up(),
            KeyAction::HistoryDown => self.display.cursor_down(),
            KeyAction::HistoryPick => {
                if let Some(index) = self.display.selected_index() {
                    self.conductor.select_history(index).await?;
                    self.display.history_open = false;
                }
            }
            KeyAction::Ignore => {}
        }

        // Apply the Conductor's answer before the next key is mapped
        self.process_conductor_messages();
        Ok(())
    }
}
