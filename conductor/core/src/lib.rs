//! aicalc Core - Headless Calculator Logic
//!
//! This crate holds everything stateful about the calculator, completely
//! independent of any UI framework. It can drive the terminal surface or run
//! headless for tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      UI Surface (TUI)                        │
//! │            keymap → SurfaceEvent    Snapshot → render        │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//!                     SurfaceEvent (up)
//!                   ConductorMessage (down)
//!                                │
//! ┌──────────────────────────────┼───────────────────────────────┐
//! │                         AICALC CORE                          │
//! │  ┌───────────────────────────┴────────────────────────────┐  │
//! │  │                       Conductor                        │  │
//! │  │  ┌──────────┐  ┌──────────┐  ┌─────────┐  ┌─────────┐  │  │
//! │  │  │  Keypad  │  │Arithmetic│  │ History │  │ Gateway │  │  │
//! │  │  │  State   │  │  Engine  │  │  Store  │  │  (AI)   │  │  │
//! │  │  └──────────┘  └──────────┘  └─────────┘  └─────────┘  │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use aicalc_core::{
//!     build_gateway, Conductor, ConductorConfig, KeypadCommand, SurfaceEvent, load_config,
//! };
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let gateway = build_gateway(&config.gateway_config(), config.timeout)?;
//!
//!     let (tx, mut rx) = mpsc::channel(100);
//!     let mut conductor = Conductor::new(gateway, ConductorConfig::from_env(), tx);
//!     conductor.start().await?;
//!     conductor.handle_event(SurfaceEvent::Connected).await?;
//!
//!     conductor.handle_event(SurfaceEvent::keypad(KeypadCommand::Digit(7))).await?;
//!
//!     loop {
//!         while let Ok(msg) = rx.try_recv() {
//!             // Render message to UI
//!         }
//!         // Collect a finished AI request, if any
//!         conductor.poll_pending().await;
//!     }
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`arithmetic`]: Binary operators over `f64`, operand parsing, result formatting
//! - [`keypad`]: Immutable display state and keypad transitions
//! - [`history`]: In-memory AI prompt history, newest first
//! - [`gateway`]: AI gateway trait plus Gemini and Ollama clients
//! - [`conductor`]: The session owner driven by surface events
//! - [`config`]: TOML, environment and CLI configuration
//! - [`events`]: Events from UI surfaces to Conductor
//! - [`messages`]: Messages from Conductor to UI surfaces
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arithmetic;
pub mod conductor;
pub mod config;
pub mod events;
pub mod gateway;
pub mod history;
pub mod keypad;
pub mod messages;

// Re-exports for convenience
pub use arithmetic::{apply, format_number, parse_operand, Operator};
pub use conductor::{Conductor, ConductorConfig, ERROR_EXPLANATION, ERROR_TEXT};
pub use events::SurfaceEvent;
pub use gateway::{
    build_gateway, connect_gateway, AiGateway, CalculationResult, GatewayConfig, GeminiGateway,
    OllamaGateway, RemoteFailure, UnavailableGateway, DEFAULT_TIMEOUT,
};
pub use history::{HistoryEntry, HistoryStore, RestoredEntry};
pub use keypad::{DisplayState, KeypadCommand, KeypadPhase, NoOp};
pub use messages::{CalcMode, ConductorMessage, ConductorState, NotifyLevel, SessionSnapshot};

// Config exports
pub use config::{
    default_config_path, load_config, load_config_from_path, load_config_layered,
    load_config_with_env, load_config_with_overrides, AppConfig, AppToml, ConfigError,
    ConfigOverrides, ConfigSource, Provider,
};
