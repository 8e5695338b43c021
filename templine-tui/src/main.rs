//! Templine TUI entry point.
//!
//! Loads the series once on a worker thread, then plays it back year by year.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use templine_core::{telemetry, Config};
use templine_tui::app::AppState;
use templine_tui::worker;
use templine_tui::{input, ui};

#[derive(Parser, Debug)]
#[command(
    name = "templine-tui",
    about = "Templine TUI — play back the historical temperature series"
)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = Config::load(cli.config.as_deref())?;

    let log_path = telemetry::default_log_path();
    telemetry::init_file(&log_path)
        .with_context(|| format!("cannot open log file {}", log_path.display()))?;
    info!(source = %config.source().describe(), "starting TUI");

    // Worker channels
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(cmd_rx, resp_tx)?;

    let mut app = AppState::new(&config, cmd_tx, resp_rx);
    app.request_load();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Cancel playback and stop the worker. A fetch still in flight is not
    // interrupted; its thread exits once the request returns.
    app.shutdown();
    if app.loader.is_finished() {
        let _ = worker_handle.join();
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Drain worker responses (non-blocking)
        app.drain_worker();

        // 3. Deliver a due playback tick
        app.on_frame(Instant::now());

        // 4. Poll for input until the next tick or frame
        if event::poll(app.poll_timeout(Instant::now()))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 5. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
