//! PennyDash TUI entry point.

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use pennydash_core::api::HttpPennyApi;
use pennydash_core::config::DashConfig;
use pennydash_core::orchestrator::OrchestratorSettings;
use pennydash_tui::{AppState, Dashboard, input, logging, persistence, ui};

#[derive(Parser)]
#[command(name = "pennydash-tui", about = "Terminal dashboard for penny-stock data")]
struct Args {
    /// Config file (default: <config_dir>/pennydash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(DashConfig::default_path);
    let mut config = DashConfig::load_or_default(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    if let Some(url) = args.base_url {
        config.api.base_url = url;
    }

    let log_path = logging::init(&config.log.level)?;
    log::info!("pennydash-tui starting against {} (log: {})", config.api.base_url, log_path.display());

    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let api = HttpPennyApi::new(config.api.base_url.clone(), config.api.timeout())?;
    let dashboard = Dashboard::spawn(Arc::new(api), OrchestratorSettings::from_config(&config))?;
    let mut app = AppState::new(dashboard);

    let state_path = persistence::default_path();
    persistence::apply(&mut app, persistence::load(&state_path));
    app.dashboard.start(Instant::now());

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        log::warn!("could not save view state: {e}");
    }

    // Stops polling and joins the worker.
    drop(app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    log::info!("pennydash-tui exited");
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
        for applied in app.dashboard.poll_responses() {
            app.handle_applied(applied);
        }

        // 3. Poll timer
        app.dashboard.tick(Instant::now());

        // 4. Input (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        if !app.running {
            break;
        }
    }
    Ok(())
}
