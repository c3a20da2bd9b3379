//! user-records binary entry point.
//!
//! Parses settings, starts file logging and the HTTP runtime, then runs the
//! TUI event loop and restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing_subscriber::EnvFilter;

use user_records::Result;
use user_records::api::{HttpRecordsApi, RecordsApi};
use user_records::app::dispatch::Dispatcher;
use user_records::app::keymap::Keymap;
use user_records::app::timers::{BACKDROP_INTERVAL, Backdrop};
use user_records::app::{self, AppState, Theme};
use user_records::config::Cli;

/// Send tracing output to the log file; the terminal belongs to the TUI.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("open log file {}", cli.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let api = HttpRecordsApi::new(&cli.api_url, cli.request_timeout())
        .context("configure API client")?;
    let endpoint = api.collection_url().to_string();
    let api: Arc<dyn RecordsApi> = Arc::new(api);

    let runtime = tokio::runtime::Runtime::new().context("start async runtime")?;
    let (dispatcher, outcomes) = Dispatcher::new(api, runtime.handle().clone());

    let mut state = AppState::new(
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
        Backdrop::new(cli.backdrops(), BACKDROP_INTERVAL),
        endpoint,
    );

    let mut terminal = init_terminal().map_err(|e| anyhow::anyhow!("init terminal: {e}"))?;
    let res = app::run(&mut terminal, &mut state, &dispatcher, &outcomes);
    restore_terminal(&mut terminal);

    if let Err(err) = res {
        tracing::error!(error = ?err, "application error");
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
