//! aicalc TUI - Terminal surface for the aicalc calculator
//!
//! A thin client over `aicalc-core`: it maps keys to surface events, keeps a
//! render model built from conductor messages, and draws it.
//!
//! # Architecture
//!
//! - **Keymap**: Pure key → action translation per mode
//! - **Display**: Render model fed by `ConductorMessage`s
//! - **Render**: ratatui widgets for display, prompt, history and status
//! - **App**: The select loop tying terminal events and the Conductor together

pub mod app;
pub mod conductor_client;
pub mod display;
pub mod keymap;
pub mod render;
pub mod theme;

pub use app::App;
pub use conductor_client::ConductorClient;
pub use display::{DisplayNotification, SurfaceState};
pub use keymap::{edit_prompt, map_key, KeyAction};
