//! aicalc Entry Point
//!
//! Launches the terminal calculator.
//!
//! Usage:
//!   aicalc [OPTIONS]
//!
//! Logs go to `$XDG_CACHE_HOME/aicalc/aicalc.log` unless `--log-stderr` is
//! given, since the terminal itself is in raw alternate-screen mode.

use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use aicalc_core::{
    connect_gateway, default_config_path, load_config_with_overrides, ConductorConfig,
    ConfigOverrides, Provider,
};
use aicalc_tui::{App, ConductorClient};

/// Default log filter when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "aicalc=info,aicalc_tui=info,aicalc_core=info";

/// Terminal calculator with an AI mode
#[derive(Debug, Parser)]
#[command(name = "aicalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/aicalc/config.toml)
    #[arg(short = 'c', long, env = "AICALC_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// AI provider: gemini or ollama
    #[arg(short = 'p', long, value_name = "NAME")]
    provider: Option<String>,

    /// Model name for the selected provider
    #[arg(long)]
    model: Option<String>,

    /// AI request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Ollama host
    #[arg(long)]
    ollama_host: Option<String>,

    /// Ollama port
    #[arg(long)]
    ollama_port: Option<u16>,

    /// Log to stderr instead of the log file
    #[arg(long)]
    log_stderr: bool,
}

impl Cli {
    fn overrides(&self) -> anyhow::Result<ConfigOverrides> {
        let mut overrides = ConfigOverrides::new();
        if let Some(provider) = &self.provider {
            overrides = overrides.with_provider(provider.parse::<Provider>()?);
        }
        if let Some(model) = &self.model {
            overrides = overrides.with_model(model.clone());
        }
        if let Some(secs) = self.timeout {
            overrides = overrides.with_timeout_secs(secs);
        }
        if let Some(host) = &self.ollama_host {
            overrides = overrides.with_ollama_host(host.clone());
        }
        if let Some(port) = self.ollama_port {
            overrides = overrides.with_ollama_port(port);
        }
        Ok(overrides)
    }
}

fn init_logging(log_stderr: bool) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if log_stderr {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
        return Ok(());
    }

    let log_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("aicalc");
    fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let log_path = log_dir.join("aicalc.log");
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("opening log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_stderr)?;

    let config = load_config_with_overrides(
        cli.config.clone().or_else(default_config_path),
        &cli.overrides()?,
    )?;
    tracing::info!(source = %config.source(), provider = %config.provider, "Configuration loaded");

    // Falls back to a failing stand-in so the keypad works without a key
    let gateway = connect_gateway(&config.gateway_config(), config.timeout);

    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        eprintln!("Error: aicalc requires a terminal (TTY)");
        eprintln!();
        eprintln!("Run it interactively, or over SSH with -t.");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let client = ConductorClient::new(gateway, ConductorConfig::from_env());
    let mut app = App::new(client);
    let result = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(goodbye) = app.goodbye() {
        println!("{goodbye}");
    }

    result
}
